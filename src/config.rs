//! Settings resolution.
//!
//! Settings are merged from three layers, each overriding the previous one:
//!
//! 1. a TOML config file with a `[settings]` table
//! 2. `HOSTUP_*` environment variables
//! 3. explicit overrides (command-line arguments)
//!
//! Empty values never override anything. Username and password are required;
//! the API endpoint and the token cache location have defaults.
//!
//! ```toml
//! [settings]
//! username = "user@example.com"
//! password = "secret"
//! api_endpoint = "https://min.hostup.se/api"
//! token_cache_path = "/var/cache/hostup-dns/token.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::hostup::{Credentials, DEFAULT_API_ENDPOINT};

pub const CONFIG_FILE_ENV: &str = "HOSTUP_CONFIG_FILE";
pub const USERNAME_ENV: &str = "HOSTUP_USERNAME";
pub const PASSWORD_ENV: &str = "HOSTUP_PASSWORD";
pub const API_ENDPOINT_ENV: &str = "HOSTUP_API_ENDPOINT";
pub const TOKEN_CACHE_ENV: &str = "HOSTUP_TOKEN_CACHE";

const APP_DIR: &str = "hostup-dns";

/// Errors raised while resolving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("username is required and cannot be empty")]
    MissingUsername,

    #[error("password is required and cannot be empty")]
    MissingPassword,

    #[error("configuration file '{}' does not exist", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read configuration file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no cache directory available; set HOSTUP_TOKEN_CACHE")]
    NoCacheDir,
}

/// One layer of optional settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PartialSettings {
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_endpoint: Option<String>,
    pub token_cache_path: Option<PathBuf>,
}

impl PartialSettings {
    /// Reads the `HOSTUP_*` variables through `env`.
    pub fn from_env<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            username: env(USERNAME_ENV),
            password: env(PASSWORD_ENV),
            api_endpoint: env(API_ENDPOINT_ENV),
            token_cache_path: env(TOKEN_CACHE_ENV).map(PathBuf::from),
        }
    }

    /// Reads the `[settings]` table of a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct ConfigFile {
            #[serde(default)]
            settings: PartialSettings,
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.settings)
    }

    /// Overlays `other` on top of `self`, ignoring empty values.
    pub fn merge(self, other: PartialSettings) -> Self {
        Self {
            username: pick(self.username, other.username),
            password: pick(self.password, other.password),
            api_endpoint: pick(self.api_endpoint, other.api_endpoint),
            token_cache_path: pick(self.token_cache_path, other.token_cache_path),
        }
    }
}

fn pick<T: PartialEq + Default>(base: Option<T>, over: Option<T>) -> Option<T> {
    let non_empty = |v: Option<T>| v.filter(|v| *v != T::default());
    non_empty(over).or_else(|| non_empty(base))
}

/// Resolves [`Credentials`] from file, environment and overrides.
///
/// `config_file` is an explicitly requested file and must exist; without it
/// the file named by [`CONFIG_FILE_ENV`] is used, then the default location
/// under the user's config directory, which may be absent.
pub fn resolve<F>(
    config_file: Option<&Path>,
    overrides: PartialSettings,
    env: F,
) -> Result<Credentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let explicit = config_file
        .map(Path::to_path_buf)
        .or_else(|| env(CONFIG_FILE_ENV).filter(|p| !p.is_empty()).map(PathBuf::from));

    let file_settings = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path));
            }
            PartialSettings::from_file(&path)?
        }
        None => match default_config_file().filter(|p| p.exists()) {
            Some(path) => PartialSettings::from_file(&path)?,
            None => PartialSettings::default(),
        },
    };

    let merged = file_settings
        .merge(PartialSettings::from_env(&env))
        .merge(overrides);

    let username = merged.username.ok_or(ConfigError::MissingUsername)?;
    let password = merged.password.ok_or(ConfigError::MissingPassword)?;
    let api_endpoint = merged
        .api_endpoint
        .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());
    let token_cache_path = match merged.token_cache_path {
        Some(path) => path,
        None => default_token_cache_path().ok_or(ConfigError::NoCacheDir)?,
    };

    Ok(Credentials::new(
        username,
        password,
        api_endpoint,
        token_cache_path,
    ))
}

/// `<config dir>/hostup-dns/config.toml`.
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// `<cache dir>/hostup-dns/token.json`.
pub fn default_token_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_DIR).join("token.json"))
}
