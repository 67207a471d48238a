//! Profile records and their store. One keyed record per user with a
//! uniqueness constraint on `username`; a duplicate username surfaces as a
//! distinguishable conflict so the caller can tell it apart from storage
//! failures.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::logging::log_debug;

const USERNAME_MIN_CHARS: usize = 3;
const USERNAME_MAX_CHARS: usize = 30;
const FULL_NAME_MAX_CHARS: usize = 100;
const AVATAR_URL_MAX_CHARS: usize = 500;

/// One user's profile. All fields are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl ProfileRecord {
    fn empty(id: UserId) -> Self {
        Self {
            id,
            full_name: None,
            username: None,
            avatar_url: None,
        }
    }

    /// Name to greet the user with: full name, then username, then raw id.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}

/// Fields to change in an upsert. `None` leaves a field untouched; a blank
/// value clears it.
#[derive(Debug, Default, Clone)]
pub struct ProfileFields {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileFields {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.username.is_none() && self.avatar_url.is_none()
    }
}

/// Failures the caller must distinguish.
#[derive(Debug)]
pub enum ProfileError {
    /// The requested username is already held by another user.
    UsernameTaken,
    /// A field failed validation.
    InvalidField {
        field: &'static str,
        reason: String,
    },
    /// The backing file could not be read or written.
    Storage(String),
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::UsernameTaken => write!(f, "this username is already taken"),
            ProfileError::InvalidField { field, reason } => write!(f, "{field}: {reason}"),
            ProfileError::Storage(msg) => write!(f, "profile store failure: {msg}"),
        }
    }
}

impl std::error::Error for ProfileError {}

/// Keyed profile storage boundary.
pub trait ProfileStore {
    fn get(&self, user: &UserId) -> Option<ProfileRecord>;
    fn upsert(&mut self, user: &UserId, fields: ProfileFields)
        -> Result<ProfileRecord, ProfileError>;
}

/// Normalize and validate a username: trimmed, lowercased, 3-30 chars of
/// `[a-z0-9_-]`. Blank means "clear the field".
pub fn validate_username(value: &str) -> Result<Option<String>, ProfileError> {
    let trimmed = value.trim().to_lowercase();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() < USERNAME_MIN_CHARS {
        return Err(invalid(
            "username",
            format!("must be at least {USERNAME_MIN_CHARS} characters long"),
        ));
    }
    if trimmed.chars().count() > USERNAME_MAX_CHARS {
        return Err(invalid(
            "username",
            format!("must be no more than {USERNAME_MAX_CHARS} characters long"),
        ));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(invalid(
            "username",
            "can only contain lowercase letters, numbers, underscores, and hyphens".into(),
        ));
    }
    Ok(Some(trimmed))
}

/// Validate a full name: trimmed, at most 100 chars. Blank clears.
pub fn validate_full_name(value: &str) -> Result<Option<String>, ProfileError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > FULL_NAME_MAX_CHARS {
        return Err(invalid(
            "full name",
            format!("must be no more than {FULL_NAME_MAX_CHARS} characters long"),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Validate an avatar URL: http(s), no whitespace, at most 500 chars.
/// Blank clears.
pub fn validate_avatar_url(value: &str) -> Result<Option<String>, ProfileError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    if !has_scheme || trimmed.chars().any(char::is_whitespace) {
        return Err(invalid("avatar URL", "please enter a valid URL".into()));
    }
    if trimmed.chars().count() > AVATAR_URL_MAX_CHARS {
        return Err(invalid(
            "avatar URL",
            format!("must be no more than {AVATAR_URL_MAX_CHARS} characters long"),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

fn invalid(field: &'static str, reason: String) -> ProfileError {
    ProfileError::InvalidField { field, reason }
}

/// Profile store persisted as a JSON file. Loaded eagerly, written back on
/// every successful upsert.
pub struct JsonProfileStore {
    path: PathBuf,
    records: BTreeMap<String, ProfileRecord>,
}

impl JsonProfileStore {
    pub fn open(path: &Path) -> Result<Self, ProfileError> {
        let records = match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| ProfileError::Storage(format!("{}: {err}", path.display())))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(ProfileError::Storage(format!("{}: {err}", path.display())));
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    fn persist(&self) -> Result<(), ProfileError> {
        let contents = serde_json::to_string_pretty(&self.records)
            .map_err(|err| ProfileError::Storage(err.to_string()))?;
        fs::write(&self.path, contents)
            .map_err(|err| ProfileError::Storage(format!("{}: {err}", self.path.display())))
    }
}

impl ProfileStore for JsonProfileStore {
    fn get(&self, user: &UserId) -> Option<ProfileRecord> {
        self.records.get(user.as_str()).cloned()
    }

    fn upsert(
        &mut self,
        user: &UserId,
        fields: ProfileFields,
    ) -> Result<ProfileRecord, ProfileError> {
        let mut record = self
            .records
            .get(user.as_str())
            .cloned()
            .unwrap_or_else(|| ProfileRecord::empty(user.clone()));

        if let Some(full_name) = fields.full_name.as_deref() {
            record.full_name = validate_full_name(full_name)?;
        }
        if let Some(avatar_url) = fields.avatar_url.as_deref() {
            record.avatar_url = validate_avatar_url(avatar_url)?;
        }
        if let Some(username) = fields.username.as_deref() {
            let normalized = validate_username(username)?;
            if let Some(candidate) = normalized.as_deref() {
                let taken = self.records.values().any(|other| {
                    other.id != *user && other.username.as_deref() == Some(candidate)
                });
                if taken {
                    return Err(ProfileError::UsernameTaken);
                }
            }
            record.username = normalized;
        }

        self.records
            .insert(user.as_str().to_string(), record.clone());
        self.persist()?;
        log_debug(&format!("profile upserted for {user}"));
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_store_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("roulette_profiles_{tag}_{nanos}.json"))
    }

    fn open_store(tag: &str) -> (JsonProfileStore, PathBuf) {
        let path = temp_store_path(tag);
        let store = JsonProfileStore::open(&path).expect("open store");
        (store, path)
    }

    #[test]
    fn username_is_normalized_and_bounded() {
        assert_eq!(validate_username("  Alice_99 ").unwrap().unwrap(), "alice_99");
        assert_eq!(validate_username("   ").unwrap(), None);
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("bad!char").is_err());
    }

    #[test]
    fn full_name_and_avatar_rules() {
        assert_eq!(validate_full_name(" Ada Lovelace ").unwrap().unwrap(), "Ada Lovelace");
        assert!(validate_full_name(&"x".repeat(101)).is_err());
        assert_eq!(
            validate_avatar_url("https://example.com/a.png").unwrap().unwrap(),
            "https://example.com/a.png"
        );
        assert!(validate_avatar_url("not a url").is_err());
        let long = format!("https://example.com/{}", "a".repeat(500));
        assert!(validate_avatar_url(&long).is_err());
    }

    #[test]
    fn upsert_round_trips_through_the_file() {
        let (mut store, path) = open_store("roundtrip");
        let user = UserId::new("u1");
        let record = store
            .upsert(
                &user,
                ProfileFields {
                    full_name: Some("Ada".into()),
                    username: Some("ada".into()),
                    avatar_url: None,
                },
            )
            .expect("upsert");
        assert_eq!(record.display_name(), "Ada");

        let reopened = JsonProfileStore::open(&path).expect("reopen");
        let loaded = reopened.get(&user).expect("record present");
        assert_eq!(loaded.username.as_deref(), Some("ada"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn duplicate_username_is_a_conflict() {
        let (mut store, path) = open_store("conflict");
        store
            .upsert(
                &UserId::new("u1"),
                ProfileFields {
                    username: Some("taken".into()),
                    ..Default::default()
                },
            )
            .expect("first upsert");
        let err = store
            .upsert(
                &UserId::new("u2"),
                ProfileFields {
                    username: Some("Taken".into()),
                    ..Default::default()
                },
            )
            .expect_err("second upsert must conflict");
        assert!(matches!(err, ProfileError::UsernameTaken));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn same_user_keeps_their_own_username() {
        let (mut store, path) = open_store("self");
        let user = UserId::new("u1");
        for _ in 0..2 {
            store
                .upsert(
                    &user,
                    ProfileFields {
                        username: Some("mine".into()),
                        ..Default::default()
                    },
                )
                .expect("re-upserting own username is fine");
        }
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn blank_value_clears_a_field() {
        let (mut store, path) = open_store("clear");
        let user = UserId::new("u1");
        store
            .upsert(
                &user,
                ProfileFields {
                    username: Some("gone_soon".into()),
                    ..Default::default()
                },
            )
            .expect("set");
        let record = store
            .upsert(
                &user,
                ProfileFields {
                    username: Some("  ".into()),
                    ..Default::default()
                },
            )
            .expect("clear");
        assert_eq!(record.username, None);
        let _ = fs::remove_file(&path);
    }
}
