//! Scenario loading.
//!
//! Scenarios are RON files bundling the tunables and match setup for a
//! headless run, so balance experiments are reproducible from a file
//! instead of a command line.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use outbreak_core::prelude::{AmmoCap, MatchSetup, Tunables};

/// Error type for scenario operations.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Failed to read the file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Failed to serialize RON.
    #[error("Failed to serialize scenario: {0}")]
    SerializeError(#[from] ron::Error),
}

/// A complete headless-match scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchScenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Simulation tunables.
    pub tunables: Tunables,
    /// Match setup (the seed acts as a default and is usually
    /// overridden per run).
    pub setup: MatchSetup,
}

impl Default for MatchScenario {
    fn default() -> Self {
        Self {
            name: "Default Outbreak".to_string(),
            description: "2 players plus AI, 5 minute timer, 20 ammo".to_string(),
            tunables: Tunables::default(),
            setup: MatchSetup::default()
                .with_players(3)
                .with_ai(true)
                .with_ammo(AmmoCap::Limited(20)),
        }
    }
}

impl MatchScenario {
    /// Load a scenario from a RON file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    /// Serialize to pretty RON for writing a template file.
    pub fn to_ron(&self) -> Result<String, ScenarioError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}
