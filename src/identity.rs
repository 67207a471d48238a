//! Identity boundary. Credential storage, one-time codes, and sessions all
//! belong to a real identity provider; this app only needs to know who, if
//! anyone, is signed in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the current identity.
pub trait IdentityProvider {
    fn current_user(&self) -> Option<UserId>;
}

/// Identity resolved from configuration (`--user` flag or environment).
/// Performs no verification; that is the real provider's job.
pub struct LocalIdentity {
    user: Option<UserId>,
}

impl LocalIdentity {
    pub fn new(user: Option<String>) -> Self {
        let user = user
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .map(UserId::new);
        Self { user }
    }
}

impl IdentityProvider for LocalIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}
