//! FestWish configuration
//!
//! ## Configuration Sources (in precedence order)
//!
//! 1. Path passed with `--config`
//! 2. `<platform config dir>/festwish/config.yaml`
//! 3. Built-in defaults (local mode, built-in catalog)
//!
//! ## Example
//!
//! ```yaml
//! mode: remote
//! catalog_dir: ./catalog
//! strict_relationships: false
//! remote:
//!   base_url: https://api.festwish.app/api/v1
//!   timeout_seconds: 10
//!   token_env: FESTWISH_TOKEN
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog::{CatalogLoader, Catalogs};
use crate::resolver::{ContentResolver, LocalResolver};
use crate::session::Session;

pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Where content comes from; chosen once per process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverMode {
    #[default]
    Local,
    Remote,
}

/// Settings for the remote content provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// API root, e.g. `https://api.festwish.app/api/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Environment variable holding the access token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            token_env: default_token_env(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_token_env() -> String {
    "FESTWISH_TOKEN".to_string()
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FestwishConfig {
    #[serde(default)]
    pub mode: ResolverMode,

    /// Directory with catalog JSON files (local mode); built-in catalog when unset
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,

    /// Unknown relationship ids fail with NotFound instead of "no message"
    #[serde(default)]
    pub strict_relationships: bool,

    #[serde(default)]
    pub remote: RemoteConfig,
}

impl FestwishConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content).context("Failed to parse FestWish config YAML")
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        // Relative catalog paths are relative to the config file
        if let (Some(dir), Some(parent)) = (config.catalog_dir.as_ref(), path.parent()) {
            if dir.is_relative() {
                config.catalog_dir = Some(parent.join(dir));
            }
        }

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load with the precedence described in the module docs
    pub fn discover(cli_override: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_override {
            return Self::load_from_path(path);
        }

        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Platform config location, if the platform has one
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("app", "festwish", "festwish")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load the catalogs this configuration points at
    pub fn load_catalogs(&self) -> Result<Catalogs> {
        match &self.catalog_dir {
            Some(dir) => CatalogLoader::from_dir(dir),
            None => CatalogLoader::builtin(),
        }
    }

    /// Build the provider selected by `mode`
    ///
    /// Catalogs are only loaded in local mode; the remote provider answers
    /// everything from the API.
    pub fn build_resolver(&self, session: Session) -> Result<Arc<dyn ContentResolver>> {
        match self.mode {
            ResolverMode::Local => {
                let catalogs = Arc::new(
                    self.load_catalogs()
                        .context("Could not load festival catalogs")?,
                );
                info!(
                    "Using local content resolver (strict_relationships: {})",
                    self.strict_relationships
                );
                Ok(Arc::new(
                    LocalResolver::new(catalogs).strict_relationships(self.strict_relationships),
                ))
            }
            ResolverMode::Remote => self.build_remote_resolver(session),
        }
    }

    #[cfg(feature = "remote")]
    fn build_remote_resolver(&self, session: Session) -> Result<Arc<dyn ContentResolver>> {
        info!(
            "Using remote content resolver at {}",
            self.remote.base_url
        );
        let resolver = crate::resolver::RemoteResolver::new(self.remote.clone(), session)?;
        Ok(Arc::new(resolver))
    }

    /// Stub for when the remote feature is disabled
    #[cfg(not(feature = "remote"))]
    fn build_remote_resolver(&self, _session: Session) -> Result<Arc<dyn ContentResolver>> {
        anyhow::bail!("Remote mode is not enabled. Rebuild with --features remote")
    }
}
