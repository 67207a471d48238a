//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use clap::Parser;
use std::path::PathBuf;

use crate::profile::ProfileFields;

use defaults::default_profile_store_path;
pub use defaults::{DEFAULT_SPIN_MS, MAX_SPIN_MS, MIN_SPIN_MS};

/// CLI options for the Decision Roulette TUI.
#[derive(Debug, Parser, Clone)]
#[command(about = "Decision Roulette TUI", author, version)]
pub struct AppConfig {
    /// Identity to sign in as (no verification is performed)
    #[arg(long, env = "DECISION_ROULETTE_USER")]
    pub user: Option<String>,

    /// Location of the JSON profile store
    #[arg(
        long = "profile-store",
        env = "DECISION_ROULETTE_PROFILE_STORE",
        default_value_os_t = default_profile_store_path()
    )]
    pub profile_store: PathBuf,

    /// Print the current identity and profile, then exit
    #[arg(long, default_value_t = false)]
    pub whoami: bool,

    /// Update the profile username, then exit (blank clears it)
    #[arg(long = "set-username", value_name = "USERNAME")]
    pub set_username: Option<String>,

    /// Update the profile full name, then exit (blank clears it)
    #[arg(long = "set-full-name", value_name = "NAME")]
    pub set_full_name: Option<String>,

    /// Update the profile avatar URL, then exit (blank clears it)
    #[arg(long = "set-avatar-url", value_name = "URL")]
    pub set_avatar_url: Option<String>,

    /// Spin animation duration in milliseconds
    #[arg(long = "spin-ms", default_value_t = DEFAULT_SPIN_MS)]
    pub spin_ms: u64,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "DECISION_ROULETTE_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(
        long = "no-logs",
        env = "DECISION_ROULETTE_NO_LOGS",
        default_value_t = false
    )]
    pub no_logs: bool,

    /// Allow logging user content (option labels, profile fields)
    #[arg(
        long = "log-content",
        env = "DECISION_ROULETTE_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,
}

impl AppConfig {
    /// Whether any profile update flag was given.
    pub fn has_profile_updates(&self) -> bool {
        self.set_username.is_some()
            || self.set_full_name.is_some()
            || self.set_avatar_url.is_some()
    }

    /// Collect the profile update flags into store fields.
    pub fn profile_fields(&self) -> ProfileFields {
        ProfileFields {
            full_name: self.set_full_name.clone(),
            username: self.set_username.clone(),
            avatar_url: self.set_avatar_url.clone(),
        }
    }
}
