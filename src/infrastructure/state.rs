//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::config::Config;
use crate::domain::{ResultRepository, UserRepository};
use crate::infrastructure::{SeaOrmResultRepository, SeaOrmUserRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Result repository
    pub result_repo: Arc<dyn ResultRepository>,
    /// User repository
    pub user_repo: Arc<dyn UserRepository>,
    /// Token signing keys
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    /// Create a new AppState backed by SeaORM repositories
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        Self::with_repositories(
            Arc::new(SeaOrmResultRepository::new(db.clone())),
            Arc::new(SeaOrmUserRepository::new(db)),
            JwtKeys::new(&config.jwt_secret, config.jwt_ttl_hours),
        )
    }

    /// Create an AppState over arbitrary repositories (in-memory fakes in tests)
    pub fn with_repositories(
        result_repo: Arc<dyn ResultRepository>,
        user_repo: Arc<dyn UserRepository>,
        jwt: JwtKeys,
    ) -> Self {
        Self {
            result_repo,
            user_repo,
            jwt: Arc::new(jwt),
        }
    }
}
