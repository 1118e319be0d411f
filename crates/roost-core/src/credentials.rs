use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// The single persisted credential record.
///
/// Serialized field names are the storage format and must not change:
/// the record is stored as
/// `{"userID": ..., "password": ..., "autoLoginEnabled": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub password: String,
    #[serde(rename = "autoLoginEnabled")]
    pub auto_login_enabled: bool,
}

impl CredentialRecord {
    pub fn new(
        user_id: impl Into<String>,
        password: impl Into<String>,
        auto_login_enabled: bool,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
            auto_login_enabled,
        }
    }

    /// Validate the record at the save boundary. Values are opaque to
    /// roost; the only requirement is that both fields are non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.is_empty() {
            return Err(Error::InvalidRecord(
                "user ID must not be empty".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(Error::InvalidRecord(
                "password must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial record for read-modify-write merges.
///
/// `None` fields are left untouched. A patch only ever updates an
/// existing record; it never creates one.
#[derive(Debug, Clone, Default)]
pub struct CredentialPatch {
    pub user_id: Option<String>,
    pub password: Option<String>,
    pub auto_login_enabled: Option<bool>,
}

impl CredentialPatch {
    /// Patch that only flips the auto-login intent, preserving the
    /// stored identity.
    pub fn auto_login(enabled: bool) -> Self {
        Self {
            auto_login_enabled: Some(enabled),
            ..Self::default()
        }
    }

    pub fn apply(self, record: &mut CredentialRecord) {
        if let Some(user_id) = self.user_id {
            record.user_id = user_id;
        }
        if let Some(password) = self.password {
            record.password = password;
        }
        if let Some(enabled) = self.auto_login_enabled {
            record.auto_login_enabled = enabled;
        }
    }
}
