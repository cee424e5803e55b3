use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use log::debug;
use serde::Deserialize;

use super::{FetchError, StdResult};

/// The name of the directory holding the configuration, under `~/.config`.
pub const CONFIG_DIRECTORY_NAME: &str = "ghutils";

/// The name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// The content of the JSON configuration file.
#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
struct ConfigFile {
    token: Option<String>,
}

impl ConfigFile {
    fn load(path: &Path) -> StdResult<Self> {
        if !path.exists() {
            debug!("No configuration file at {}", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {}", path.display()))
    }
}

/// Returns the default location of the configuration file, `~/.config/ghutils/config.json`
/// on every platform.
pub fn default_config_path() -> StdResult<PathBuf> {
    dirs::home_dir()
        .map(|home| {
            home.join(".config")
                .join(CONFIG_DIRECTORY_NAME)
                .join(CONFIG_FILE_NAME)
        })
        .ok_or_else(|| anyhow!("Unable to locate the user home directory"))
}

/// The configuration of a listing run, resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    token: String,
    endpoint: String,
    page_size: u16,
}

impl Config {
    /// Resolves the configuration.
    ///
    /// A token given explicitly wins over the `token` key of the configuration file.
    /// Fails with [FetchError::Auth] when neither provides one.
    pub fn resolve(
        token: Option<String>,
        config_path: &Path,
        endpoint: &str,
        page_size: u16,
    ) -> StdResult<Self> {
        let token = match token {
            Some(token) => Some(token),
            None => ConfigFile::load(config_path)?.token,
        };
        let token = token.filter(|token| !token.trim().is_empty()).ok_or_else(|| {
            FetchError::Auth(format!(
                "token is not set. Please use \"-t TOKEN\" option or add {{\"token\": \"TOKEN\"}} to {}.",
                config_path.display()
            ))
        })?;

        Ok(Self {
            token,
            endpoint: endpoint.to_string(),
            page_size,
        })
    }

    /// Retrieves the API token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Retrieves the GraphQL endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Retrieves the page size.
    pub fn page_size(&self) -> u16 {
        self.page_size
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("page_size", &self.page_size)
            .finish()
    }
}
