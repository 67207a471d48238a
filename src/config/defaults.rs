use std::env;
use std::path::PathBuf;

/// Animation window before a spin result becomes visible (milliseconds).
pub const DEFAULT_SPIN_MS: u64 = 4_000;
pub const MIN_SPIN_MS: u64 = 500;
pub const MAX_SPIN_MS: u64 = 60_000;

/// Default location of the JSON profile store.
pub fn default_profile_store_path() -> PathBuf {
    env::temp_dir().join("decision_roulette_profiles.json")
}
