//! Decision Roulette: a terminal wheel-of-fortune for indecisive moments.
//!
//! The `wheel` module owns the selection and rotation math; `app` ties it to
//! the TUI session; `identity` and `profile` are the thin boundaries to the
//! identity provider and the persisted profile record.

pub mod app;
pub mod config;
pub mod identity;
pub mod logging;
pub mod profile;
pub mod terminal_restore;
pub mod ui;
pub mod wheel;

pub use app::App;
pub use wheel::{SpinResult, Wheel, SLOT_COUNT};
