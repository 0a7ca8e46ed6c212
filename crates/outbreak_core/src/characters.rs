//! Character state and per-tick intents.
//!
//! Characters are plain data; all behavior lives in the systems and
//! the session loop. A character's faction moves one way only:
//! `Survivor` to `Infected`.

use serde::{Deserialize, Serialize};

use crate::collision::Rect;
use crate::config::{AmmoCap, Tunables};
use crate::math::Vec2;

/// Combatant faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    /// Can shoot; loses by being converted.
    Survivor,
    /// Converts survivors by proximity attack; cannot be converted back.
    Infected,
}

/// Ammunition counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ammo {
    /// Finite volley count.
    Limited(u32),
    /// Never consumed.
    Unlimited,
}

impl Ammo {
    /// Starting ammunition for a match-setup cap.
    #[must_use]
    pub const fn from_cap(cap: AmmoCap) -> Self {
        match cap {
            AmmoCap::Limited(n) => Self::Limited(n),
            AmmoCap::Unlimited => Self::Unlimited,
        }
    }

    /// True if no volley can be fired.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Limited(0))
    }

    /// Consume one volley. Returns `false` (without change) when empty;
    /// unlimited ammunition is unaffected.
    pub fn try_consume(&mut self) -> bool {
        match self {
            Self::Limited(0) => false,
            Self::Limited(n) => {
                *n -= 1;
                true
            }
            Self::Unlimited => true,
        }
    }

    /// Remaining volley count, `None` for unlimited.
    #[must_use]
    pub const fn remaining(&self) -> Option<u32> {
        match self {
            Self::Limited(n) => Some(*n),
            Self::Unlimited => None,
        }
    }
}

/// Who computes a character's intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    /// Human slot; indexes the per-tick input slice.
    Human {
        /// Position in the input slice supplied to the session.
        slot: usize,
    },
    /// Intents come from the AI policy.
    Ai,
}

impl Controller {
    /// True for the AI controller.
    #[must_use]
    pub const fn is_ai(&self) -> bool {
        matches!(self, Self::Ai)
    }
}

/// One combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Stable roster index (binds skins and HUD rows externally).
    pub index: usize,
    /// Display name.
    pub name: String,
    /// Intent source.
    pub controller: Controller,
    /// Current faction.
    pub faction: Faction,
    /// World position of the character center.
    pub position: Vec2,
    /// Last nonzero requested displacement; aims human shots.
    pub facing: Vec2,
    /// Ticks until respawn; 0 means alive.
    pub respawn_ticks: u32,
    /// Ticks until the next area attack is available.
    pub attack_cooldown: u32,
    /// Ticks until the next volley is available.
    pub shoot_cooldown: u32,
    /// Remaining ammunition.
    pub ammo: Ammo,
}

impl Character {
    /// Create a character at a spawn position.
    #[must_use]
    pub fn new(
        index: usize,
        name: impl Into<String>,
        controller: Controller,
        faction: Faction,
        position: Vec2,
        ammo: Ammo,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            controller,
            faction,
            position,
            facing: Vec2::new(1.0, 0.0),
            respawn_ticks: 0,
            attack_cooldown: 0,
            shoot_cooldown: 0,
            ammo,
        }
    }

    /// Alive characters participate in movement, combat, and targeting.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.respawn_ticks == 0
    }

    /// Bounding box for a character half-extent.
    #[must_use]
    pub fn bounds(&self, half: f32) -> Rect {
        Rect::from_center(self.position, half)
    }

    /// Movement speed for the character's current faction.
    #[must_use]
    pub const fn speed(&self, tunables: &Tunables) -> f32 {
        match self.faction {
            Faction::Survivor => tunables.survivor_speed,
            Faction::Infected => tunables.infected_speed,
        }
    }

    /// One-way transition to `Infected`.
    pub fn infect(&mut self) {
        self.faction = Faction::Infected;
    }
}

/// Per-tick input for one human-controlled character, supplied by the
/// external input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Horizontal movement axis, -1/0/1.
    pub move_x: i8,
    /// Vertical movement axis, -1/0/1.
    pub move_y: i8,
    /// Action button held (infected area attack).
    pub action_held: bool,
    /// Shoot trigger edge (survivor volley).
    pub shoot_pressed: bool,
}

/// Where a volley is aimed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotPlan {
    /// Along the shooter's facing vector, with the wide human spread.
    Facing,
    /// At an explicit angle in radians, with the narrow AI spread.
    Aimed(f32),
}

/// Resolved per-tick intent for one character.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intent {
    /// Requested displacement this tick, already speed-scaled.
    pub movement: Vec2,
    /// Whether the infected area attack is requested.
    pub attack: bool,
    /// Volley request, if any.
    pub shoot: Option<ShotPlan>,
}

impl Intent {
    /// No movement, no actions.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            movement: Vec2::ZERO,
            attack: false,
            shoot: None,
        }
    }
}
