//! Paints the engine's particles into the terminal buffer
//!
//! Particle placement is stored as fractions of the container, so the same
//! surface fills any terminal size. Motion comes from each particle's
//! progress through its lifetime:
//!
//! - rain falls from the top edge to the bottom
//! - clouds drift from the left edge across to the right
//! - sun rays brighten and fade in place

use std::f32::consts::PI;

use ratatui::{buffer::Buffer, layout::Rect, style::Color, Frame};
use sora_core::{
    CloudDensity, EffectEngine, EffectKind, EffectTier, Particle, RainIntensity, SunIntensity,
};

use super::Component;
use crate::action::Action;

pub struct Sky;

pub struct SkyProps<'a> {
    pub engine: &'a EffectEngine,
}

impl Component<Action> for Sky {
    type Props<'a> = SkyProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        paint(frame.buffer_mut(), area, props.engine);
    }
}

/// Draw every live particle. Cloud first so rain and rays land on top.
pub fn paint(buf: &mut Buffer, area: Rect, engine: &EffectEngine) {
    if area.is_empty() {
        return;
    }
    let now = engine.now();
    for kind in [EffectKind::Cloud, EffectKind::Rain, EffectKind::Sunshine] {
        for particle in engine.container(kind).iter() {
            let progress = particle.progress(now);
            match particle.tier {
                EffectTier::Rain(intensity) => paint_drop(buf, area, particle, progress, intensity),
                EffectTier::Cloud { density, .. } => {
                    paint_cloud(buf, area, particle, progress, density)
                }
                EffectTier::Sunshine(intensity) => {
                    paint_ray(buf, area, particle, progress, intensity)
                }
            }
        }
    }
}

fn put(buf: &mut Buffer, area: Rect, x: i32, y: i32, symbol: &str, color: Color) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (area.x as i32 + x, area.y as i32 + y);
    if x >= area.right() as i32 || y >= area.bottom() as i32 {
        return;
    }
    if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
        cell.set_symbol(symbol).set_fg(color);
    }
}

fn paint_drop(
    buf: &mut Buffer,
    area: Rect,
    particle: &Particle,
    progress: f32,
    intensity: RainIntensity,
) {
    let (symbol, color) = match intensity {
        RainIntensity::Light => ("╷", Color::Rgb(150, 180, 220)),
        RainIntensity::Medium => ("│", Color::Rgb(110, 150, 230)),
        RainIntensity::Heavy => ("┃", Color::Rgb(80, 120, 240)),
    };
    // 15..35 drop length becomes a 1..3 cell streak
    let length = (particle.size / 12.0).ceil().clamp(1.0, 3.0) as i32;
    let x = (particle.x * area.width as f32) as i32;
    let head = (progress * (area.height as i32 + length) as f32) as i32;
    for i in 0..length {
        put(buf, area, x, head - i, symbol, color);
    }
}

fn paint_cloud(
    buf: &mut Buffer,
    area: Rect,
    particle: &Particle,
    progress: f32,
    density: CloudDensity,
) {
    let (symbol, color) = match density {
        CloudDensity::Light => ("░", Color::Rgb(200, 200, 210)),
        CloudDensity::Medium => ("▒", Color::Rgb(170, 170, 185)),
        CloudDensity::Dense => ("▓", Color::Rgb(135, 135, 150)),
    };
    let width = particle.size.round().max(1.0) as i32;
    let left = -width + (progress * (area.width as i32 + width) as f32) as i32;
    // Clouds keep to the upper part of the sky
    let row = (particle.y * area.height as f32 * 0.6) as i32;

    let crown = width * 3 / 5;
    let crown_left = left + (width - crown) / 2;
    for dx in 0..crown {
        put(buf, area, crown_left + dx, row, symbol, color);
    }
    for dx in 0..width {
        put(buf, area, left + dx, row + 1, symbol, color);
    }
}

fn paint_ray(
    buf: &mut Buffer,
    area: Rect,
    particle: &Particle,
    progress: f32,
    intensity: SunIntensity,
) {
    let color = match intensity {
        SunIntensity::Gentle => Color::Rgb(250, 230, 150),
        SunIntensity::Medium => Color::Rgb(255, 215, 90),
        SunIntensity::Strong => Color::Rgb(255, 190, 40),
    };
    let glow = (progress * PI).sin();
    let symbol = if glow < 0.35 {
        "·"
    } else if glow < 0.7 {
        "✧"
    } else {
        "✦"
    };

    let x = (particle.x * area.width as f32) as i32;
    let y = (particle.y * area.height as f32) as i32;
    put(buf, area, x, y, symbol, color);

    // Bigger rays flare sideways at their brightest
    if glow >= 0.7 {
        let reach = particle.size.floor() as i32 - 1;
        for dx in 1..=reach {
            put(buf, area, x - dx, y, "─", color);
            put(buf, area, x + dx, y, "─", color);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use sora_core::CloudSpeed;
    use tui_dispatch::testing::RenderHarness;

    #[test]
    fn test_empty_engine_paints_nothing() {
        let mut render = RenderHarness::new(20, 6);
        let engine = EffectEngine::new(3);

        let output = render.render_to_string_plain(|frame| {
            Sky.render(frame, frame.area(), SkyProps { engine: &engine });
        });

        assert!(output.trim().is_empty());
    }

    #[test]
    fn test_rain_paints_drops() {
        let mut render = RenderHarness::new(40, 12);
        let mut engine = EffectEngine::new(3);
        engine.start_rain(RainIntensity::Heavy);
        engine.advance(Duration::from_millis(400));

        let output = render.render_to_string_plain(|frame| {
            Sky.render(frame, frame.area(), SkyProps { engine: &engine });
        });

        assert!(output.contains('┃'));
    }

    #[test]
    fn test_cloud_paints_band() {
        let mut render = RenderHarness::new(40, 12);
        let mut engine = EffectEngine::new(3);
        engine.start_cloud(CloudDensity::Dense, CloudSpeed::Fast);
        engine.advance(Duration::from_secs(4));

        let output = render.render_to_string_plain(|frame| {
            Sky.render(frame, frame.area(), SkyProps { engine: &engine });
        });

        assert!(output.contains('▓'));
    }

    #[test]
    fn test_paint_stays_inside_area() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 10));
        let area = Rect::new(5, 2, 10, 4);
        let mut engine = EffectEngine::new(9);
        engine.start_cloud(CloudDensity::Dense, CloudSpeed::Fast);
        engine.start_rain(RainIntensity::Heavy);
        engine.advance(Duration::from_secs(5));

        paint(&mut buf, area, &engine);

        for y in 0..10 {
            for x in 0..30 {
                if !area.contains((x, y).into()) {
                    assert_eq!(buf[(x, y)].symbol(), " ", "painted outside at ({x}, {y})");
                }
            }
        }
    }
}
