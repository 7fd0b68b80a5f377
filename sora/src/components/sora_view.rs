//! Root view: sky with the weather card, the map, and the help bar

use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, Borders},
    Frame,
};

use super::{
    Component, HelpBar, HelpBarProps, Sky, SkyProps, WeatherPanel, WeatherPanelProps, WorldMap,
    WorldMapProps,
};
use tui_dispatch::EventKind;

use crate::action::Action;
use crate::state::AppState;

pub const SPINNERS: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub struct SoraViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct SoraView {
    map: WorldMap,
}

impl SoraView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for SoraView {
    type Props<'a> = SoraViewProps<'a>;

    fn handle_event(&mut self, event: &EventKind, props: Self::Props<'_>) -> Vec<Action> {
        if let EventKind::Resize(width, height) = event {
            return vec![Action::UiTerminalResize(*width, *height)];
        }
        if !props.is_focused {
            return vec![];
        }

        match event {
            EventKind::Key(key) if key.kind == KeyEventKind::Release => vec![],
            EventKind::Key(key) => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    vec![Action::Quit]
                }
                KeyCode::Char('r') | KeyCode::F(5) => vec![Action::WeatherRefresh],
                KeyCode::Char('m') => vec![Action::UiToggleMap],
                KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
                _ => vec![],
            },
            EventKind::Mouse(_) if props.state.show_map => self.map.handle_event(
                event,
                WorldMapProps {
                    markers: &props.state.markers,
                    current: props.state.controller.coordinate(),
                    is_focused: true,
                },
            ),
            _ => vec![],
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;

        let busy = if state.controller.is_busy() {
            let spinner = SPINNERS[(state.tick_count as usize / 4) % SPINNERS.len()];
            format!(" {} ", spinner)
        } else {
            String::new()
        };

        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
            .title(format!(" ☁ sora{}", busy))
            .title_style(Style::default().fg(Color::Cyan).bold())
            .title_alignment(Alignment::Center);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let [body, help] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let sky_area = if state.show_map {
            let [sky, map] =
                Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                    .areas(body);
            self.map.render(
                frame,
                map,
                WorldMapProps {
                    markers: &state.markers,
                    current: state.controller.coordinate(),
                    is_focused: props.is_focused,
                },
            );
            sky
        } else {
            body
        };

        Sky.render(
            frame,
            sky_area,
            SkyProps {
                engine: &state.engine,
            },
        );
        WeatherPanel.render(
            frame,
            sky_area,
            WeatherPanelProps {
                display: state.controller.display(),
                phase: state.controller.phase(),
                preview: state.preview,
                demo: state.demo,
            },
        );

        HelpBar.render(
            frame,
            help,
            HelpBarProps {
                show_map: state.show_map,
            },
        );
    }
}
