use crate::core::{Result, StoreError};
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
pub const ENV_STORE_PATH: &str = "ATHLEDB_STORE";
pub const ENV_BIND_ADDR: &str = "ATHLEDB_BIND";

const DEFAULT_STORE_PATH: &str = "data/athleland.json";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Service configuration
///
/// Sourced from the environment with builder-style overrides on top.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The shared admin password the login gate checks against
    pub admin_password: String,

    /// Where the persisted store blob lives
    pub store_path: PathBuf,

    /// Listen address for the HTTP service
    pub bind_addr: String,
}

impl AppConfig {
    pub fn new(admin_password: &str) -> Self {
        Self {
            admin_password: admin_password.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }

    /// Reads configuration from the environment. The admin password has no
    /// default: refusing to come up beats coming up with a guessable gate.
    pub fn from_env() -> Result<Self> {
        let admin_password = env::var(ENV_ADMIN_PASSWORD).map_err(|_| {
            StoreError::Configuration(format!("{} is not set", ENV_ADMIN_PASSWORD))
        })?;

        let mut config = Self::new(&admin_password);
        if let Ok(path) = env::var(ENV_STORE_PATH) {
            config.store_path = PathBuf::from(path);
        }
        if let Ok(addr) = env::var(ENV_BIND_ADDR) {
            config.bind_addr = addr;
        }
        Ok(config)
    }

    /// The store path alone, for maintenance commands that never touch the
    /// login gate.
    pub fn store_path_from_env() -> PathBuf {
        env::var(ENV_STORE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH))
    }

    /// Set the store path
    pub fn store_path(mut self, path: impl AsRef<Path>) -> Self {
        self.store_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the listen address
    pub fn bind_addr(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.admin_password.trim().is_empty() {
            return Err(StoreError::Configuration(
                "admin password cannot be empty".into(),
            ));
        }
        if self.bind_addr.is_empty() {
            return Err(StoreError::Configuration(
                "bind address cannot be empty".into(),
            ));
        }
        Ok(())
    }
}
