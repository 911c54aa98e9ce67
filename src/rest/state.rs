//! API state management for the REST server.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{AdminDirectory, JwtConfig};
use crate::config::Config;
use crate::payments::TokenLedger;
use crate::profile::ProfileRegistry;

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    /// Biodata profile registry (thread-safe read-write access)
    pub profiles: Arc<RwLock<ProfileRegistry>>,
    /// Connection-token ledger
    pub ledger: Arc<RwLock<TokenLedger>>,
    /// Admin accounts for login
    pub admins: Arc<AdminDirectory>,
    /// JWT signing material
    pub jwt: JwtConfig,
    /// Application configuration
    pub config: Arc<Config>,
}

impl ApiState {
    /// Create new API state from config, loading stores from disk.
    pub fn new(config: Config) -> Self {
        let mut profiles = ProfileRegistry::new();
        if let Err(e) = profiles.load_all(&config.profiles_path()) {
            tracing::warn!("Failed to load biodata profiles: {}", e);
        }

        let ledger = match TokenLedger::load(&config.state_path()) {
            Ok(ledger) => ledger,
            Err(e) => {
                tracing::warn!("Failed to load token ledger: {}", e);
                TokenLedger::new()
            }
        };

        let admins = AdminDirectory::with_admin(&config.auth.admin_email, &config.auth.admin_password);
        let jwt = JwtConfig::from_secret(
            config.auth.jwt_secret.as_bytes(),
            config.auth.token_ttl_minutes,
        );

        Self {
            profiles: Arc::new(RwLock::new(profiles)),
            ledger: Arc::new(RwLock::new(ledger)),
            admins: Arc::new(admins),
            jwt,
            config: Arc::new(config),
        }
    }

    /// Directory holding the profile JSON files
    pub fn profiles_path(&self) -> PathBuf {
        self.config.profiles_path()
    }
}
