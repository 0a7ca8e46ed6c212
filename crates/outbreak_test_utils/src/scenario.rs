//! Scenario-driving harness.
//!
//! Steps a session with per-tick inputs from a closure until it
//! reaches a terminal state or a tick budget runs out.

use outbreak_core::prelude::*;

/// Idle inputs sized to the session's human slots.
#[must_use]
pub fn idle_inputs(session: &MatchSession) -> Vec<PlayerInput> {
    vec![PlayerInput::default(); session.setup().human_count()]
}

/// Tick `session` until it terminates or `max_ticks` elapse, feeding
/// it inputs from `inputs` each tick. Returns the terminal state, or
/// `None` if the budget ran out first.
pub fn run_until_terminal(
    session: &mut MatchSession,
    max_ticks: u64,
    mut inputs: impl FnMut(&MatchSession) -> Vec<PlayerInput>,
) -> Option<MatchState> {
    for _ in 0..max_ticks {
        let frame = inputs(session);
        let events = session.tick(&frame);
        if let Some(state) = events.finished {
            return Some(state);
        }
    }
    None
}
