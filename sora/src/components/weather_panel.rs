use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use sora_core::{DisplayText, EffectTier, Phase};

use super::Component;
use crate::action::Action;

pub const PANEL_WIDTH: u16 = 38;
pub const PANEL_HEIGHT: u16 = 9;

/// The five text regions, drawn as a card over the sky
pub struct WeatherPanel;

pub struct WeatherPanelProps<'a> {
    pub display: &'a DisplayText,
    pub phase: Phase,
    pub preview: Option<EffectTier>,
    pub demo: bool,
}

impl WeatherPanel {
    /// Centered card area inside `area`
    pub fn card_area(area: Rect) -> Rect {
        let [row] = Layout::vertical([Constraint::Length(PANEL_HEIGHT.min(area.height))])
            .flex(Flex::Center)
            .areas(area);
        let [card] = Layout::horizontal([Constraint::Length(PANEL_WIDTH.min(area.width))])
            .flex(Flex::Center)
            .areas(row);
        card
    }
}

impl Component<Action> for WeatherPanel {
    type Props<'a> = WeatherPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let card = Self::card_area(area);
        if card.is_empty() {
            return;
        }

        let failed = props.phase == Phase::Failed;
        let border = if failed {
            Color::Rgb(200, 90, 90)
        } else {
            Color::Rgb(80, 80, 100)
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border));
        if props.demo {
            block = block.title_bottom(Line::from(" demo data ").right_aligned().dark_gray());
        }

        let display = props.display;
        let lines = match props.preview {
            Some(tier) => vec![
                Line::from(Span::styled("preview", Style::default().fg(Color::White).bold())),
                Line::from(Span::styled(tier.label(), Style::default().fg(Color::Gray))),
            ],
            None if failed => vec![
                Line::from(Span::styled(
                    display.location.as_str(),
                    Style::default().fg(Color::LightRed).bold(),
                )),
                Line::default(),
                Line::from(Span::styled(
                    display.description.as_str(),
                    Style::default().fg(Color::Gray),
                )),
            ],
            None => vec![
                Line::from(Span::styled(
                    display.location.as_str(),
                    Style::default().fg(Color::White).bold(),
                )),
                Line::from(Span::styled(
                    display.description.as_str(),
                    Style::default().fg(Color::Gray),
                )),
                Line::default(),
                Line::from(Span::styled(
                    display.temperature.as_str(),
                    Style::default().fg(Color::Yellow).bold(),
                )),
                Line::from(Span::styled(
                    display.humidity.as_str(),
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(Span::styled(
                    display.wind.as_str(),
                    Style::default().fg(Color::Cyan),
                )),
            ],
        };

        frame.render_widget(Clear, card);
        let inner = block.inner(card);
        frame.render_widget(block, card);

        // Error messages are long and get the whole card to wrap in
        let height = if failed {
            inner.height
        } else {
            lines.len() as u16
        };
        let [text_area] = Layout::vertical([Constraint::Length(height.min(inner.height))])
            .flex(Flex::Center)
            .areas(inner);
        frame.render_widget(
            Paragraph::new(lines).centered().wrap(Wrap { trim: true }),
            text_area,
        );
    }
}
