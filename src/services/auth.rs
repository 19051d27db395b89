//! Credential validation against the configured fixed list

use std::sync::Arc;

use crate::models::credential::{Credential, Identity};

#[derive(Clone)]
pub struct CredentialValidator {
    credentials: Arc<[Credential]>,
}

impl CredentialValidator {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self {
            credentials: credentials.into(),
        }
    }

    /// Exact, case-sensitive match of both username and password.
    /// A mismatch is reported as `None`, never as an error.
    pub fn validate(&self, username: &str, password: &str) -> Option<Identity> {
        let found = self
            .credentials
            .iter()
            .find(|c| c.username == username && c.password == password)
            .map(|c| Identity {
                username: c.username.clone(),
            });

        match found {
            Some(_) => tracing::info!(username, "Credential check succeeded"),
            None => tracing::warn!(username, "Credential check failed"),
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    fn validator() -> CredentialValidator {
        CredentialValidator::new(AuthConfig::default().users)
    }

    #[test]
    fn test_validate_matching_pair() {
        assert_eq!(
            validator().validate("admin", "admin123"),
            Some(Identity {
                username: "admin".to_string()
            })
        );
        assert_eq!(
            validator().validate("librarian", "library123").map(|i| i.username),
            Some("librarian".to_string())
        );
    }

    #[test]
    fn test_validate_wrong_password() {
        assert_eq!(validator().validate("admin", "wrong"), None);
    }

    #[test]
    fn test_validate_is_exact() {
        let v = validator();
        assert_eq!(v.validate("Admin", "admin123"), None);
        assert_eq!(v.validate("admin ", "admin123"), None);
        assert_eq!(v.validate("admin", "ADMIN123"), None);
        // Password from another entry does not match
        assert_eq!(v.validate("admin", "library123"), None);
        assert_eq!(v.validate("", ""), None);
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let v = CredentialValidator::new(Vec::new());
        assert_eq!(v.validate("admin", "admin123"), None);
    }
}
