use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// Relative fallback shown when an account never uploaded an avatar
pub const DEFAULT_AVATAR_PATH: &str = "assets/avatar-default.png";

/// A user account as persisted in the users document.
///
/// Wire field names keep the PascalCase shape of the existing documents.
/// `password` always holds the SHA-256 hex digest, never plaintext.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct User {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "PhoneNum")]
    pub phone: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Avatar", default = "default_avatar")]
    pub avatar: String,
}

impl Record for User {
    fn identity(&self) -> &str {
        &self.username
    }
}

fn default_avatar() -> String {
    DEFAULT_AVATAR_PATH.to_string()
}
