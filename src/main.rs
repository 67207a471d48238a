//! Decision Roulette entrypoint: profile CLI operations, or the interactive
//! wheel TUI.

use anyhow::{Context, Result};
use decision_roulette::app::App;
use decision_roulette::config::AppConfig;
use decision_roulette::identity::{IdentityProvider, LocalIdentity};
use decision_roulette::logging::{init_logging, log_debug};
use decision_roulette::profile::{JsonProfileStore, ProfileError, ProfileStore};
use decision_roulette::ui;

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);
    log_debug("starting decision-roulette");

    let identity = LocalIdentity::new(config.user.clone());
    let mut store = JsonProfileStore::open(&config.profile_store).with_context(|| {
        format!(
            "failed to open profile store {}",
            config.profile_store.display()
        )
    })?;

    if config.whoami {
        return run_whoami(&identity, &store);
    }
    if config.has_profile_updates() {
        return run_profile_update(&identity, &mut store, &config);
    }

    let greeting = identity.current_user().map(|user| match store.get(&user) {
        Some(profile) => profile.display_name().to_string(),
        None => user.to_string(),
    });

    let mut app = App::new(&config, greeting);
    ui::run_app(&mut app)
}

fn run_whoami(identity: &impl IdentityProvider, store: &impl ProfileStore) -> Result<()> {
    let Some(user) = identity.current_user() else {
        println!("not signed in");
        return Ok(());
    };
    println!("user: {user}");
    match store.get(&user) {
        Some(profile) => {
            println!("full name:  {}", profile.full_name.as_deref().unwrap_or("-"));
            println!("username:   {}", profile.username.as_deref().unwrap_or("-"));
            println!("avatar URL: {}", profile.avatar_url.as_deref().unwrap_or("-"));
        }
        None => println!("no profile on record"),
    }
    Ok(())
}

fn run_profile_update(
    identity: &impl IdentityProvider,
    store: &mut impl ProfileStore,
    config: &AppConfig,
) -> Result<()> {
    // validate() already required an identity for profile updates.
    let user = identity
        .current_user()
        .context("profile updates require --user")?;
    match store.upsert(&user, config.profile_fields()) {
        Ok(record) => {
            println!("profile updated for {user}");
            println!("full name:  {}", record.full_name.as_deref().unwrap_or("-"));
            println!("username:   {}", record.username.as_deref().unwrap_or("-"));
            println!("avatar URL: {}", record.avatar_url.as_deref().unwrap_or("-"));
            Ok(())
        }
        Err(err @ ProfileError::UsernameTaken) => Err(anyhow::anyhow!(err)),
        Err(err) => Err(err).context("profile update failed"),
    }
}
