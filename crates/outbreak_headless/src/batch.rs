//! Batch match runner for balance sweeps.
//!
//! Runs many matches across a seed range in parallel with rayon and
//! aggregates outcomes. Writing the summary to disk is left to the
//! caller.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use outbreak_core::prelude::*;

use crate::runner::{run_match, MatchReport, RunConfig};

/// Configuration for a batch sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Template for every match; the seed is overridden per game.
    pub run: RunConfig,
    /// Number of matches to run.
    pub count: u32,
    /// First seed; match `i` runs with `seed_start + i`.
    pub seed_start: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            count: 100,
            seed_start: 0,
        }
    }
}

/// Aggregated outcomes of a batch sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Matches attempted.
    pub games: u32,
    /// Matches ending in an infected win.
    pub infected_wins: u32,
    /// Matches ending in a survivors' win.
    pub survivor_wins: u32,
    /// Matches that hit the tick budget without a winner.
    pub unfinished: u32,
    /// Matches whose session construction failed (bad seeds).
    pub failed: u32,
    /// Mean match length in ticks, over completed matches.
    pub mean_ticks: f64,
    /// Per-match reports.
    pub reports: Vec<MatchReport>,
}

impl BatchSummary {
    /// Infected win rate over decided matches.
    #[must_use]
    pub fn infected_win_rate(&self) -> f64 {
        let decided = self.infected_wins + self.survivor_wins;
        if decided == 0 {
            return 0.0;
        }
        f64::from(self.infected_wins) / f64::from(decided)
    }
}

/// Run `config.count` matches in parallel and aggregate the results.
#[must_use]
pub fn run_batch(config: &BatchConfig) -> BatchSummary {
    let results: Vec<Result<MatchReport>> = (0..config.count)
        .into_par_iter()
        .map(|i| {
            let mut run = config.run.clone();
            run.setup = run.setup.with_seed(config.seed_start + u64::from(i));
            run_match(&run)
        })
        .collect();

    let mut summary = BatchSummary {
        games: config.count,
        infected_wins: 0,
        survivor_wins: 0,
        unfinished: 0,
        failed: 0,
        mean_ticks: 0.0,
        reports: Vec::with_capacity(results.len()),
    };

    let mut total_ticks = 0u64;
    for result in results {
        match result {
            Ok(report) => {
                match report.outcome {
                    Some(MatchState::InfectedWin) => summary.infected_wins += 1,
                    Some(MatchState::SurvivorsWin) => summary.survivor_wins += 1,
                    Some(MatchState::Running) | None => summary.unfinished += 1,
                }
                total_ticks += report.ticks;
                summary.reports.push(report);
            }
            Err(err) => {
                warn!(%err, "match failed to start");
                summary.failed += 1;
            }
        }
    }
    if !summary.reports.is_empty() {
        summary.mean_ticks = total_ticks as f64 / summary.reports.len() as f64;
    }

    info!(
        games = summary.games,
        infected_wins = summary.infected_wins,
        survivor_wins = summary.survivor_wins,
        unfinished = summary.unfinished,
        failed = summary.failed,
        "batch complete"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::Strategy;

    #[test]
    fn test_small_batch_aggregates() {
        let config = BatchConfig {
            run: RunConfig {
                setup: MatchSetup::default()
                    .with_players(2)
                    .with_timer_minutes(1),
                strategy: Strategy::Idle,
                ..RunConfig::default()
            },
            count: 4,
            seed_start: 100,
        };
        let summary = run_batch(&config);
        assert_eq!(summary.games, 4);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.reports.len(), 4);
        // Idle humans never convert: every match times out to survivors.
        assert_eq!(summary.survivor_wins, 4);
        assert!((summary.infected_win_rate() - 0.0).abs() < f64::EPSILON);
        // Seeds are assigned in order from seed_start.
        let mut seeds: Vec<u64> = summary.reports.iter().map(|r| r.seed).collect();
        seeds.sort_unstable();
        assert_eq!(seeds, vec![100, 101, 102, 103]);
    }
}
