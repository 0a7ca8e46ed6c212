//! Run a single match to completion.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::info;

use outbreak_core::prelude::*;

use crate::strategies::{frame_inputs, Strategy};

/// Seed perturbation for the scripted-input RNG so it does not mirror
/// the session's own stream.
const STRATEGY_SEED_XOR: u64 = 0x5743_5249_5054_4544;

/// Configuration for one headless match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Simulation tunables.
    pub tunables: Tunables,
    /// Match setup (seed included).
    pub setup: MatchSetup,
    /// Hard tick budget in case no win condition fires.
    pub max_ticks: u64,
    /// Policy driving the human slots.
    pub strategy: Strategy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tunables: Tunables::default(),
            setup: MatchSetup::default(),
            // 15 minutes at 60 tps, plus slack for respawn tails.
            max_ticks: 60_000,
            strategy: Strategy::default(),
        }
    }
}

/// Outcome and tallies of one headless match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// Seed the match ran with.
    pub seed: u64,
    /// Terminal state, or `None` if the tick budget ran out.
    pub outcome: Option<MatchState>,
    /// Ticks simulated.
    pub ticks: u64,
    /// Total survivor-to-infected conversions.
    pub conversions: usize,
    /// Total infected knockdowns by bullets.
    pub downs: usize,
    /// Total volleys fired.
    pub volleys: usize,
    /// Survivors standing at the end.
    pub survivors_left: usize,
}

/// Run one match under `config`.
///
/// # Errors
///
/// Propagates session-construction failures (invalid configuration or
/// arena generation exhausting its retry budget).
pub fn run_match(config: &RunConfig) -> Result<MatchReport> {
    let mut session = MatchSession::new(config.tunables, config.setup)?;
    let mut rng = Pcg32::seed_from_u64(config.setup.seed ^ STRATEGY_SEED_XOR);

    let mut report = MatchReport {
        seed: config.setup.seed,
        outcome: None,
        ticks: 0,
        conversions: 0,
        downs: 0,
        volleys: 0,
        survivors_left: 0,
    };

    for _ in 0..config.max_ticks {
        let inputs = frame_inputs(&session, config.strategy, &mut rng);
        let events = session.tick(&inputs);
        report.conversions += events.conversions.len();
        report.downs += events.downed.len();
        report.volleys += events.volleys.len();
        if let Some(state) = events.finished {
            report.outcome = Some(state);
            break;
        }
    }

    report.ticks = session.current_tick();
    report.survivors_left = session
        .roster()
        .iter()
        .filter(|c| c.faction == Faction::Survivor)
        .count();
    info!(
        seed = report.seed,
        ticks = report.ticks,
        outcome = ?report.outcome,
        "match complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_match_times_out_to_survivors() {
        // With everyone idle and a 1-minute timer, survivors outlast it.
        let config = RunConfig {
            setup: MatchSetup::default()
                .with_players(3)
                .with_timer_minutes(1)
                .with_seed(4),
            strategy: Strategy::Idle,
            ..RunConfig::default()
        };
        let report = run_match(&config).unwrap();
        assert_eq!(report.outcome, Some(MatchState::SurvivorsWin));
        assert_eq!(report.ticks, 3600);
        assert_eq!(report.volleys, 0);
    }

    #[test]
    fn test_scripted_match_reaches_terminal_state() {
        let config = RunConfig {
            setup: MatchSetup::default()
                .with_players(2)
                .with_timer_minutes(1)
                .with_seed(9),
            strategy: Strategy::Scripted,
            ..RunConfig::default()
        };
        let report = run_match(&config).unwrap();
        assert!(report.outcome.is_some(), "1-minute match must resolve");
    }

    #[test]
    fn test_invalid_setup_propagates() {
        let config = RunConfig {
            setup: MatchSetup::default().with_players(9),
            ..RunConfig::default()
        };
        assert!(run_match(&config).is_err());
    }
}
