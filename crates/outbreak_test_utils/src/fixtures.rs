//! Test fixtures and helpers.
//!
//! Pre-built arenas and sessions for consistent testing. Helpers here
//! may panic; they are for test setup only.

use outbreak_core::prelude::*;

/// Default tunables used across tests.
#[must_use]
pub fn test_tunables() -> Tunables {
    Tunables::default()
}

/// An arena with no obstacles at the default dimensions.
#[must_use]
pub fn open_arena() -> Arena {
    Arena::from_parts(ArenaConfig::default(), Vec::new())
}

/// An arena with a fixed obstacle set at the default dimensions.
#[must_use]
pub fn walled_arena(obstacles: Vec<Rect>) -> Arena {
    Arena::from_parts(ArenaConfig::default(), obstacles)
}

/// Build a session over an open arena whose secretly infected slot is
/// `infected_index`, by searching seeds.
///
/// # Panics
///
/// Panics if no seed in the search budget lands the infection on the
/// requested slot, or if the setup itself is invalid.
#[must_use]
pub fn session_with_infected_at(
    tunables: Tunables,
    setup: MatchSetup,
    infected_index: usize,
) -> MatchSession {
    for seed in 0..1024 {
        let session = MatchSession::with_arena(tunables, setup.with_seed(seed), open_arena())
            .expect("fixture setup must be valid");
        if session.roster()[infected_index].faction == Faction::Infected {
            return session;
        }
    }
    panic!("no seed in budget infects slot {infected_index}");
}
