//! Session configuration: tunables and per-match setup.
//!
//! All knobs are validated at session construction, before any tick
//! runs. The simulation itself never reads ambient global state; an
//! immutable [`Tunables`] travels with the session.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::session::TICK_RATE;

/// Allowed match timer durations in minutes.
pub const TIMER_CHOICES: [u32; 5] = [1, 2, 5, 10, 15];

/// AI difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    /// Tier 1: 50% accuracy.
    #[default]
    Easy,
    /// Tier 2: 75% accuracy.
    Medium,
    /// Tier 3: 100% accuracy.
    Hard,
}

impl Difficulty {
    /// Map a numeric tier (1-3) to a difficulty.
    #[must_use]
    pub const fn from_tier(tier: u8) -> Option<Self> {
        match tier {
            1 => Some(Self::Easy),
            2 => Some(Self::Medium),
            3 => Some(Self::Hard),
            _ => None,
        }
    }

    /// Numeric tier (1-3).
    #[must_use]
    pub const fn tier(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    /// Probability that the AI follows through on an attack or shot
    /// opportunity: `0.5 + (tier - 1) * 0.25`.
    #[must_use]
    pub fn accuracy(self) -> f32 {
        0.5 + (f32::from(self.tier()) - 1.0) * 0.25
    }
}

/// Ammunition cap selected at match setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmmoCap {
    /// Each survivor starts with this many volleys.
    Limited(u32),
    /// Ammunition is never consumed.
    Unlimited,
}

impl Default for AmmoCap {
    fn default() -> Self {
        Self::Unlimited
    }
}

/// Numeric tunables supplied by the configuration collaborator.
///
/// Defaults match the original game balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tunables {
    /// Character half-extent in world units (bounding box is twice this).
    pub character_radius: f32,
    /// Survivor movement speed in units per tick.
    pub survivor_speed: f32,
    /// Infected movement speed in units per tick.
    pub infected_speed: f32,
    /// Bullet speed in units per tick.
    pub bullet_speed: f32,
    /// Shared attack/shoot cooldown duration in seconds.
    pub action_cooldown_secs: f32,
    /// AI difficulty tier.
    pub ai_difficulty: Difficulty,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            character_radius: 20.0,
            survivor_speed: 5.0,
            infected_speed: 7.0,
            bullet_speed: 10.0,
            action_cooldown_secs: 1.0,
            ai_difficulty: Difficulty::Easy,
        }
    }
}

impl Tunables {
    /// Set the AI difficulty.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.ai_difficulty = difficulty;
        self
    }

    /// Set the shared action cooldown duration.
    #[must_use]
    pub const fn with_cooldown_secs(mut self, secs: f32) -> Self {
        self.action_cooldown_secs = secs;
        self
    }

    /// Cooldown duration in ticks, computed once at session start.
    #[must_use]
    pub fn cooldown_ticks(&self) -> u32 {
        (self.action_cooldown_secs * TICK_RATE as f32).round() as u32
    }

    /// Reject out-of-range values before any tick runs.
    pub fn validate(&self) -> Result<()> {
        if !(self.character_radius > 0.0 && self.character_radius.is_finite()) {
            return Err(GameError::invalid_config(
                "character_radius",
                format!("must be positive, got {}", self.character_radius),
            ));
        }
        for (field, value) in [
            ("survivor_speed", self.survivor_speed),
            ("infected_speed", self.infected_speed),
            ("bullet_speed", self.bullet_speed),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(GameError::invalid_config(
                    field,
                    format!("must be positive, got {value}"),
                ));
            }
        }
        if !(self.action_cooldown_secs >= 0.0 && self.action_cooldown_secs.is_finite()) {
            return Err(GameError::invalid_config(
                "action_cooldown_secs",
                format!("must be non-negative, got {}", self.action_cooldown_secs),
            ));
        }
        Ok(())
    }
}

/// Per-match setup selected by the player-selection flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSetup {
    /// Total roster size, 2-5 (the optional AI occupies one slot).
    pub player_count: u8,
    /// Whether the last roster slot is AI-controlled.
    pub include_ai: bool,
    /// Match timer duration in minutes (1/2/5/10/15).
    pub timer_minutes: u32,
    /// Ammunition cap for survivors.
    pub ammo: AmmoCap,
    /// Seed for arena generation, infection seeding, and AI rolls.
    pub seed: u64,
}

impl Default for MatchSetup {
    fn default() -> Self {
        Self {
            player_count: 2,
            include_ai: false,
            timer_minutes: 5,
            ammo: AmmoCap::Unlimited,
            seed: 0,
        }
    }
}

impl MatchSetup {
    /// Set the roster size.
    #[must_use]
    pub const fn with_players(mut self, count: u8) -> Self {
        self.player_count = count;
        self
    }

    /// Enable or disable the AI slot.
    #[must_use]
    pub const fn with_ai(mut self, include_ai: bool) -> Self {
        self.include_ai = include_ai;
        self
    }

    /// Set the timer duration.
    #[must_use]
    pub const fn with_timer_minutes(mut self, minutes: u32) -> Self {
        self.timer_minutes = minutes;
        self
    }

    /// Set the ammunition cap.
    #[must_use]
    pub const fn with_ammo(mut self, ammo: AmmoCap) -> Self {
        self.ammo = ammo;
        self
    }

    /// Set the match seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of human-controlled slots.
    #[must_use]
    pub const fn human_count(&self) -> usize {
        self.player_count as usize - self.include_ai as usize
    }

    /// Reject out-of-range values before any tick runs.
    pub fn validate(&self) -> Result<()> {
        if self.player_count < 2 || self.player_count > 5 {
            return Err(GameError::invalid_config(
                "player_count",
                format!("must be 2-5, got {}", self.player_count),
            ));
        }
        if !TIMER_CHOICES.contains(&self.timer_minutes) {
            return Err(GameError::invalid_config(
                "timer_minutes",
                format!("must be one of {TIMER_CHOICES:?}, got {}", self.timer_minutes),
            ));
        }
        if let AmmoCap::Limited(0) = self.ammo {
            return Err(GameError::invalid_config("ammo", "limited cap must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_accuracy() {
        assert!((Difficulty::Easy.accuracy() - 0.5).abs() < 1e-6);
        assert!((Difficulty::Medium.accuracy() - 0.75).abs() < 1e-6);
        assert!((Difficulty::Hard.accuracy() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_difficulty_tiers() {
        assert_eq!(Difficulty::from_tier(1), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_tier(3), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_tier(0), None);
        assert_eq!(Difficulty::from_tier(4), None);
    }

    #[test]
    fn test_default_tunables_valid() {
        assert!(Tunables::default().validate().is_ok());
    }

    #[test]
    fn test_cooldown_ticks() {
        let tunables = Tunables::default().with_cooldown_secs(1.0);
        assert_eq!(tunables.cooldown_ticks(), 60);
        let tunables = tunables.with_cooldown_secs(0.5);
        assert_eq!(tunables.cooldown_ticks(), 30);
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let mut tunables = Tunables::default();
        tunables.survivor_speed = 0.0;
        assert!(tunables.validate().is_err());
        tunables.survivor_speed = -3.0;
        assert!(tunables.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_player_count() {
        assert!(MatchSetup::default().with_players(1).validate().is_err());
        assert!(MatchSetup::default().with_players(6).validate().is_err());
        assert!(MatchSetup::default().with_players(5).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_timer() {
        assert!(MatchSetup::default().with_timer_minutes(3).validate().is_err());
        assert!(MatchSetup::default().with_timer_minutes(15).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_ammo_cap() {
        let setup = MatchSetup::default().with_ammo(AmmoCap::Limited(0));
        assert!(setup.validate().is_err());
        let setup = MatchSetup::default().with_ammo(AmmoCap::Limited(10));
        assert!(setup.validate().is_ok());
    }

    #[test]
    fn test_human_count() {
        let setup = MatchSetup::default().with_players(4).with_ai(true);
        assert_eq!(setup.human_count(), 3);
        let setup = MatchSetup::default().with_players(4).with_ai(false);
        assert_eq!(setup.human_count(), 4);
    }
}
