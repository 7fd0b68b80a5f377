//! Clickable world map
//!
//! A left click inside the map asks for the weather at that point. The
//! click is turned back into a coordinate with the inverse of the canvas's
//! equirectangular projection.

use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Block, BorderType, Borders,
    },
    Frame,
};
use sora_core::Coordinate;

use super::Component;
use tui_dispatch::EventKind;

use crate::action::Action;

/// Keeps the inner map area from the last render for hit-testing.
#[derive(Debug, Default)]
pub struct WorldMap {
    map_area: Rect,
}

pub struct WorldMapProps<'a> {
    /// Clicked points, newest last
    pub markers: &'a [Coordinate],
    /// Coordinate of the current weather
    pub current: Option<Coordinate>,
    pub is_focused: bool,
}

impl WorldMap {
    pub fn map_area(&self) -> Rect {
        self.map_area
    }
}

/// Coordinate under a terminal cell, or `None` outside `area`.
pub fn cell_to_coordinate(area: Rect, column: u16, row: u16) -> Option<Coordinate> {
    if area.is_empty()
        || column < area.x
        || row < area.y
        || column >= area.right()
        || row >= area.bottom()
    {
        return None;
    }
    let fx = (column - area.x) as f64 + 0.5;
    let fy = (row - area.y) as f64 + 0.5;
    let lon = -180.0 + fx / area.width as f64 * 360.0;
    let lat = 90.0 - fy / area.height as f64 * 180.0;
    Some(Coordinate::new(lat, lon))
}

impl Component<Action> for WorldMap {
    type Props<'a> = WorldMapProps<'a>;

    fn handle_event(&mut self, event: &EventKind, props: Self::Props<'_>) -> Vec<Action> {
        if !props.is_focused {
            return vec![];
        }

        match event {
            EventKind::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                cell_to_coordinate(self.map_area, mouse.column, mouse.row)
                    .map(Action::WeatherFetchAt)
                    .into_iter()
                    .collect()
            }
            _ => vec![],
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
            .title(" map ")
            .title_style(Style::default().fg(Color::Cyan).bold());
        self.map_area = block.inner(area);

        let markers = props.markers;
        let current = props.current;
        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([-180.0, 180.0])
            .y_bounds([-90.0, 90.0])
            .paint(move |ctx| {
                ctx.draw(&Map {
                    color: Color::Rgb(70, 120, 90),
                    resolution: MapResolution::High,
                });
                ctx.layer();
                for marker in markers {
                    let cross = Span::styled("×", Style::default().fg(Color::Gray));
                    ctx.print(marker.lon, marker.lat, cross);
                }
                if let Some(here) = current {
                    let dot = Span::styled("●", Style::default().fg(Color::Yellow).bold());
                    ctx.print(here.lon, here.lat, dot);
                }
            });
        frame.render_widget(canvas, area);
    }
}

/// Left button press at a cell
#[cfg(test)]
pub(crate) fn click(column: u16, row: u16) -> crossterm::event::MouseEvent {
    crossterm::event::MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: crossterm::event::KeyModifiers::NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cell_to_coordinate_corners_and_center() {
        let area = Rect::new(10, 5, 36, 18);

        let top_left = cell_to_coordinate(area, 10, 5).unwrap();
        assert!(close(top_left.lon, -175.0));
        assert!(close(top_left.lat, 85.0));

        let bottom_right = cell_to_coordinate(area, 45, 22).unwrap();
        assert!(close(bottom_right.lon, 175.0));
        assert!(close(bottom_right.lat, -85.0));

        assert!(cell_to_coordinate(area, 9, 5).is_none());
        assert!(cell_to_coordinate(area, 46, 5).is_none());
        assert!(cell_to_coordinate(area, 10, 23).is_none());
    }

    #[test]
    fn test_click_inside_map_fetches() {
        let mut render = RenderHarness::new(40, 20);
        let mut map = WorldMap::default();
        render.render_to_string_plain(|frame| {
            map.render(
                frame,
                frame.area(),
                WorldMapProps {
                    markers: &[],
                    current: None,
                    is_focused: true,
                },
            );
        });
        assert_eq!(map.map_area(), Rect::new(1, 1, 38, 18));

        let actions = map.handle_event(
            &EventKind::Mouse(click(1, 1)),
            WorldMapProps {
                markers: &[],
                current: None,
                is_focused: true,
            },
        );
        actions.assert_count(1);
        assert!(matches!(actions[0], Action::WeatherFetchAt(c) if c.lat > 80.0 && c.lon < -170.0));
    }

    #[test]
    fn test_click_on_border_is_ignored() {
        let mut map = WorldMap {
            map_area: Rect::new(1, 1, 38, 18),
        };
        let props = WorldMapProps {
            markers: &[],
            current: None,
            is_focused: true,
        };
        map.handle_event(&EventKind::Mouse(click(0, 0)), props)
            .assert_empty();
    }

    #[test]
    fn test_unfocused_ignores_clicks() {
        let mut map = WorldMap {
            map_area: Rect::new(0, 0, 40, 20),
        };
        let props = WorldMapProps {
            markers: &[],
            current: None,
            is_focused: false,
        };
        map.handle_event(&EventKind::Mouse(click(5, 5)), props)
            .assert_empty();
    }

    #[test]
    fn test_render_shows_current_marker() {
        let mut render = RenderHarness::new(40, 20);
        let mut map = WorldMap::default();
        let tokyo = Coordinate::new(35.6762, 139.6503);

        let output = render.render_to_string_plain(|frame| {
            map.render(
                frame,
                frame.area(),
                WorldMapProps {
                    markers: &[],
                    current: Some(tokyo),
                    is_focused: true,
                },
            );
        });

        assert!(output.contains('●'));
        assert!(output.contains("map"));
    }
}
