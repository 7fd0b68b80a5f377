//! Reducer: `(state, action) -> DispatchResult<Effect>`
//!
//! All state changes happen here. Async work is described as [`Effect`]s
//! and run by the effect handler, which answers with `Did` actions.

use tracing::debug;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::AppState;
use tui_dispatch::DispatchResult;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Weather =====
        Action::WeatherRefresh => {
            if state.preview.is_some() {
                debug!("preview active, refresh skipped");
                return DispatchResult::unchanged();
            }
            let request = state.controller.begin_locating();
            DispatchResult::changed_with(Effect::ResolveLocation { request })
        }

        Action::WeatherFetchAt(coordinate) => {
            if state.preview.is_some() {
                return DispatchResult::unchanged();
            }
            state.add_marker(coordinate);
            let request = state.controller.begin_fetching_at(coordinate);
            DispatchResult::changed_with(Effect::FetchWeather {
                request,
                coordinate,
            })
        }

        Action::LocationDidResolve {
            request,
            coordinate,
        } => {
            if state.controller.begin_fetching(request, coordinate) {
                DispatchResult::changed_with(Effect::FetchWeather {
                    request,
                    coordinate,
                })
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::WeatherDidLoad {
            request,
            observation,
        } => redraw_if(state.controller.complete(
            request,
            Ok(observation),
            &mut state.engine,
        )),

        Action::WeatherDidError { request, error } => redraw_if(
            state
                .controller
                .complete(request, Err(error), &mut state.engine),
        ),

        // ===== UI =====
        Action::UiToggleMap => {
            state.show_map = !state.show_map;
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            let changed = state.terminal_size != (width, height);
            state.terminal_size = (width, height);
            redraw_if(changed)
        }

        // ===== Global =====
        Action::Tick(elapsed) => {
            let was_animating = state.is_animating();
            state.engine.advance(elapsed);
            state.tick_count = state.tick_count.wrapping_add(1);
            // Keep drawing while particles move or the spinner turns
            redraw_if(
                was_animating || state.is_animating() || state.controller.is_busy(),
            )
        }

        // Handled by the runtime loop
        Action::Quit => DispatchResult::unchanged(),
    }
}

fn redraw_if(changed: bool) -> DispatchResult<Effect> {
    if changed {
        DispatchResult::changed()
    } else {
        DispatchResult::unchanged()
    }
}
