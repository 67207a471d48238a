use anyhow::{bail, Result};
use clap::Parser;

use super::{AppConfig, MAX_SPIN_MS, MIN_SPIN_MS};

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values before anything touches the terminal or the store.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SPIN_MS..=MAX_SPIN_MS).contains(&self.spin_ms) {
            bail!(
                "--spin-ms must be between {MIN_SPIN_MS} and {MAX_SPIN_MS}, got {}",
                self.spin_ms
            );
        }
        if self.has_profile_updates() && self.resolved_user().is_none() {
            bail!("profile updates require --user (or DECISION_ROULETTE_USER)");
        }
        Ok(())
    }

    /// The configured identity, ignoring blank values.
    pub fn resolved_user(&self) -> Option<&str> {
        self.user
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}
