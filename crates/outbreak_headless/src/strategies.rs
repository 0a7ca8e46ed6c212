//! Scripted input policies for human slots in headless runs.
//!
//! The simulation expects one [`PlayerInput`] per human slot per tick.
//! Headless runs have no keyboards, so human slots are driven either
//! by idle inputs or by quantizing the core AI policy's intent into
//! the input shape the session accepts.

use rand::Rng;
use serde::{Deserialize, Serialize};

use outbreak_core::ai;
use outbreak_core::prelude::*;

/// How human slots behave in a headless match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// Human slots do nothing (smoke tests, pure-AI observation).
    Idle,
    /// Human slots play the core AI policy through the input interface.
    #[default]
    Scripted,
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "scripted" => Ok(Self::Scripted),
            other => Err(format!("unknown strategy '{other}' (idle|scripted)")),
        }
    }
}

/// Inputs for every human slot this tick under `strategy`.
pub fn frame_inputs<R: Rng>(
    session: &MatchSession,
    strategy: Strategy,
    rng: &mut R,
) -> Vec<PlayerInput> {
    let humans = session.setup().human_count();
    match strategy {
        Strategy::Idle => vec![PlayerInput::default(); humans],
        Strategy::Scripted => (0..humans)
            .map(|slot| scripted_input(session, slot, rng))
            .collect(),
    }
}

/// Quantize the AI policy's intent for the character bound to `slot`
/// into a [`PlayerInput`].
///
/// The aimed-shot angle is lost in translation; the shot fires along
/// the character's facing like a real key press would.
pub fn scripted_input<R: Rng>(session: &MatchSession, slot: usize, rng: &mut R) -> PlayerInput {
    let Some(index) = session
        .roster()
        .iter()
        .position(|c| c.controller == (Controller::Human { slot }))
    else {
        return PlayerInput::default();
    };
    let intent = ai::decide(
        index,
        session.roster(),
        session.arena(),
        session.tunables(),
        session.cooldown_ticks(),
        rng,
    );
    PlayerInput {
        move_x: axis(intent.movement.x),
        move_y: axis(intent.movement.y),
        action_held: intent.attack,
        shoot_pressed: intent.shoot.is_some(),
    }
}

fn axis(component: f32) -> i8 {
    if component > f32::EPSILON {
        1
    } else if component < -f32::EPSILON {
        -1
    } else {
        0
    }
}
