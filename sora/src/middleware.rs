//! Dispatch logging

use tracing::{debug, trace};
use tui_dispatch::{Action as DispatchAction, ActionSummary, Middleware};

use crate::action::Action;

/// Logs every dispatched action. Frame ticks go to `trace`, the rest to `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware<Action> for TracingMiddleware {
    fn before(&mut self, action: &Action) {
        if action.is_noisy() {
            trace!(action = action.name(), "dispatch");
        } else {
            debug!(
                action = action.name(),
                category = action.category().unwrap_or("-"),
                summary = %action.summary(),
                "dispatch"
            );
        }
    }

    fn after(&mut self, action: &Action, state_changed: bool) {
        if !action.is_noisy() {
            trace!(action = action.name(), state_changed, "dispatched");
        }
    }
}
