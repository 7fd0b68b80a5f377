//! sora - terminal weather with particle effects
//!
//! # Usage
//!
//! ```sh
//! # Weather for the current location (demo data without a key)
//! OPENWEATHER_API_KEY=... sora
//!
//! # A fixed place, English labels, logs to a file
//! sora --lat 51.5 --lon -0.12 --lang en --log-file sora.log
//!
//! # Just watch an effect
//! sora --preview rain:heavy
//!
//! # Check that the key works
//! sora --check-key
//! ```

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use sora::components::{Component, SoraView, SoraViewProps};
use sora::config::{Args, Settings};
use sora::middleware::TracingMiddleware;
use sora::reducer::reducer;
use sora::{Action, AppState, Services};
use sora_core::{DeviceLocator, LocationProvider, OpenWeatherClient, WeatherBackend};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tui_dispatch::{
    EffectContext, EffectRuntime, EffectStoreWithMiddleware, EventKind, EventOutcome,
    RenderContext,
};

#[tokio::main]
async fn main() -> io::Result<()> {
    let settings = Settings::from_args(Args::parse());
    init_tracing(settings.log_file.as_deref())?;

    if settings.check_key {
        return check_key(&settings).await;
    }

    let backend = WeatherBackend::from_credential(
        &settings.credential,
        settings.api.clone(),
        settings.demo_mode,
    );
    let locator = LocationProvider::new(settings.locator.clone());
    info!(demo = backend.is_demo(), preview = ?settings.preview, "starting");

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_app(&mut terminal, settings, backend, locator).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Log to `path` when given. The terminal owns stdout, so nothing is logged otherwise.
fn init_tracing(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sora=debug,sora_core=info,warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

async fn check_key(settings: &Settings) -> io::Result<()> {
    let Some(key) = settings.credential.key() else {
        eprintln!("Error: no API key configured.");
        eprintln!("Set OPENWEATHER_API_KEY or pass --api-key.");
        std::process::exit(2);
    };

    let client = OpenWeatherClient::new(key, settings.api.clone());
    match client.check_credential().await {
        Ok(()) => {
            println!("API key is valid.");
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: API key check failed ({}).", e);
            eprintln!("{}", e.user_message(settings.api.language));
            std::process::exit(1);
        }
    }
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    settings: Settings,
    backend: WeatherBackend,
    locator: LocationProvider<DeviceLocator>,
) -> io::Result<()> {
    let mut state =
        AppState::new(settings.api.language, settings.seed).with_demo(backend.is_demo());
    if let Some(tier) = settings.preview {
        state = state.with_preview(tier);
    }

    let store = EffectStoreWithMiddleware::new(state, reducer, TracingMiddleware);
    let mut runtime = EffectRuntime::from_store(store);

    // Frame tick carries real elapsed time into the effect engine
    let last_frame = Mutex::new(Instant::now());
    runtime
        .subscriptions()
        .interval("frame", settings.frame_interval, move || {
            let now = Instant::now();
            let elapsed = match last_frame.lock() {
                Ok(mut last) => now - std::mem::replace(&mut *last, now),
                Err(_) => Duration::ZERO,
            };
            Action::Tick(elapsed)
        });

    if settings.preview.is_none() {
        if let Some(period) = settings.refresh_interval {
            runtime
                .subscriptions()
                .interval("refresh", period, || Action::WeatherRefresh);
        }
        runtime.enqueue(Action::WeatherRefresh);
    }

    let services = Services::new(backend, locator);
    let view = RefCell::new(SoraView::new());

    runtime
        .run(
            terminal,
            |frame, area, state, _ctx: RenderContext| {
                view.borrow_mut().render(
                    frame,
                    area,
                    SoraViewProps {
                        state,
                        is_focused: true,
                    },
                );
            },
            |event: &EventKind, state| {
                EventOutcome::from_actions(view.borrow_mut().handle_event(
                    event,
                    SoraViewProps {
                        state,
                        is_focused: true,
                    },
                ))
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx: &mut EffectContext<Action>| services.handle(effect, ctx.tasks()),
        )
        .await
}
