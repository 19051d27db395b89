//! Credential and identity models

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Username/password pair from the fixed credential list.
///
/// Passwords are kept and compared in clear text. This is a placeholder
/// mechanism, not suitable for real deployments.
#[derive(Clone, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Identity returned on a successful credential match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    pub username: String,
}
