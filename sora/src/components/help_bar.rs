use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::Component;
use crate::action::Action;

pub struct HelpBar;

pub struct HelpBarProps {
    pub show_map: bool,
}

impl Component<Action> for HelpBar {
    type Props<'a> = HelpBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let key = Style::default().fg(Color::Cyan).bold();
        let text = Style::default().fg(Color::DarkGray);

        let mut spans = vec![
            Span::styled(" r", key),
            Span::styled(" refresh  ", text),
            Span::styled("m", key),
            Span::styled(if props.show_map { " hide map  " } else { " show map  " }, text),
        ];
        if props.show_map {
            spans.push(Span::styled("click", key));
            spans.push(Span::styled(" pick place  ", text));
        }
        spans.push(Span::styled("q", key));
        spans.push(Span::styled(" quit ", text));

        frame.render_widget(Paragraph::new(Line::from(spans).centered()), area);
    }
}
