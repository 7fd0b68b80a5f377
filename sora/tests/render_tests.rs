//! Render tests for the full view
//!
//! Each test builds an `AppState`, drives it through the reducer the way the
//! runtime would, renders into a `TestBackend` and checks the text.

use std::time::Duration;

use sora::components::{Component, SoraView, SoraViewProps};
use sora::reducer::reducer;
use sora::{Action, AppState, Effect};
use sora_core::{
    Coordinate, DemoSource, EffectKind, EffectTier, Language, RainIntensity, RequestId,
    SunIntensity, WeatherError, WeatherObservation, DEFAULT_COORDINATE,
};
use tui_dispatch::testing::*;

fn render(state: &AppState, width: u16, height: u16) -> String {
    let mut harness = RenderHarness::new(width, height);
    let mut view = SoraView::new();
    harness.render_to_string_plain(|frame| {
        view.render(
            frame,
            frame.area(),
            SoraViewProps {
                state,
                is_focused: true,
            },
        );
    })
}

/// Refresh and resolve the location; returns the fetch request.
fn locate(state: &mut AppState) -> RequestId {
    let result = reducer(state, Action::WeatherRefresh);
    let request = match result.effects.first() {
        Some(Effect::ResolveLocation { request }) => *request,
        other => panic!("expected ResolveLocation, got {:?}", other),
    };
    reducer(
        state,
        Action::LocationDidResolve {
            request,
            coordinate: DEFAULT_COORDINATE,
        },
    );
    request
}

#[test]
fn test_render_locating_placeholders() {
    let mut state = AppState::default();
    reducer(&mut state, Action::WeatherRefresh);

    let output = render(&state, 100, 30);

    assert!(output.contains("位置情報を取得中..."), "should show locating text");
    assert!(
        output.contains("天気情報を読み込み中..."),
        "should show loading text"
    );
}

#[test]
fn test_render_rainy_tokyo() {
    let mut state = AppState::default();
    let request = locate(&mut state);
    reducer(
        &mut state,
        Action::WeatherDidLoad {
            request,
            observation: DemoSource::fixed_observation(),
        },
    );
    reducer(&mut state, Action::Tick(Duration::from_millis(600)));

    let output = render(&state, 100, 30);

    assert!(output.contains("東京"), "should show location");
    assert!(output.contains("小雨"), "should show description");
    assert!(output.contains("19°C"), "should show rounded temperature");
    assert!(output.contains("湿度: 75%"), "should show humidity");
    assert!(output.contains("風速: 3.2 m/s"), "should show wind");
    assert!(
        !state.engine.container(EffectKind::Rain).is_empty(),
        "rain should be falling"
    );
}

#[test]
fn test_render_error_state() {
    let mut state = AppState::default();
    let request = locate(&mut state);
    reducer(
        &mut state,
        Action::WeatherDidError {
            request,
            error: WeatherError::Unauthorized,
        },
    );

    let output = render(&state, 120, 30);

    assert!(output.contains("エラーが発生しました"), "should show error label");
    assert!(output.contains("APIキー"), "should show the error message");
}

#[test]
fn test_render_english_labels() {
    let mut state = AppState::new(Language::En, 5);
    let request = locate(&mut state);
    reducer(
        &mut state,
        Action::WeatherDidLoad {
            request,
            observation: WeatherObservation {
                location_name: "Lisbon".into(),
                condition_main: "Clear".into(),
                condition_description: "clear sky".into(),
                temperature_celsius: 26.5,
                humidity_percent: 40.0,
                wind_speed_mps: 5.5,
            },
        },
    );

    let output = render(&state, 100, 30);

    assert!(output.contains("Lisbon"));
    assert!(output.contains("27°C"));
    assert!(output.contains("Humidity: 40%"));
    assert!(output.contains("Wind: 5.5 m/s"));
    assert_eq!(
        state.controller.effect(),
        Some(EffectTier::Sunshine(SunIntensity::Strong))
    );
}

#[test]
fn test_render_help_bar() {
    let state = AppState::default();

    let output = render(&state, 100, 30);

    assert!(output.contains("refresh"), "should show refresh hint");
    assert!(output.contains("hide map"), "should show map hint");
    assert!(output.contains("quit"), "should show quit hint");
    assert!(output.contains("╭ map "), "map panel should be shown");
}

#[test]
fn test_render_without_map() {
    let mut state = AppState::default();
    reducer(&mut state, Action::UiToggleMap);

    let output = render(&state, 100, 30);

    assert!(!output.contains("╭ map "), "map panel should be hidden");
    assert!(output.contains("show map"));
}

#[test]
fn test_render_preview_mode() {
    let mut state = AppState::default().with_preview(EffectTier::Rain(RainIntensity::Heavy));
    reducer(&mut state, Action::Tick(Duration::from_millis(500)));

    let output = render(&state, 100, 30);

    assert!(output.contains("preview"));
    assert!(output.contains("rain (heavy)"));
    assert!(output.contains('┃'), "should show heavy rain drops");
}

#[test]
fn test_map_click_marks_and_fetches() {
    let mut state = AppState::default();
    let clicked = Coordinate::new(48.85, 2.35);

    let result = reducer(&mut state, Action::WeatherFetchAt(clicked));
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::FetchWeather { coordinate, .. }] if *coordinate == clicked
    ));

    let output = render(&state, 100, 30);
    assert!(output.contains('●'), "current location marker");
    assert!(output.contains("天気情報を読み込み中..."));
}
