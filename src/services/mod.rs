//! Business logic services

pub mod auth;
pub mod catalog;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub auth: auth::CredentialValidator,
}

impl Services {
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository),
            auth: auth::CredentialValidator::new(auth_config.users),
        }
    }
}
