//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Collaborator credentials (object-store endpoint, bucket,
//! signing keys) are explicit configuration passed into each component at
//! construction, never ambient environment access.

pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::storage::{ArchiveConfig, GrantConfig, ObjectStoreConfig, UploadConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Object store connection and credentials.
    #[serde(default)]
    pub object_store: ObjectStoreConfig,
    /// Signed-URL grant settings.
    #[serde(default)]
    pub grants: GrantConfig,
    /// Archive assembly settings.
    #[serde(default)]
    pub archive: ArchiveConfig,
    /// Upload settings.
    #[serde(default)]
    pub upload: UploadConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `STASHBOX_`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("STASHBOX")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
