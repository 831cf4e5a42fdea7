//! File-backed token cache.
//!
//! A single JSON file holds the last issued [`Token`] so that consecutive CLI
//! invocations do not have to log in again. Within one process the token is
//! also kept in memory, which saves re-reading the file for every request.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::token::Token;

/// Tokens with less lifetime left than this (in seconds) are discarded.
pub const EXPIRY_THRESHOLD_SECS: i64 = 300;

/// I/O failure on the cache file.
#[derive(Debug, Error)]
#[error("token cache {}: {source}", path.display())]
pub struct CacheError {
    /// The file or directory involved.
    pub path: PathBuf,
    /// The underlying error.
    #[source]
    pub source: io::Error,
}

impl CacheError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Token cache backed by one file plus an in-process copy.
#[derive(Debug)]
pub struct TokenCache {
    path: PathBuf,
    held: Mutex<Option<Token>>,
}

impl TokenCache {
    /// Creates a cache stored at `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            held: Mutex::new(None),
        }
    }

    /// The cache file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn held(&self) -> MutexGuard<'_, Option<Token>> {
        self.held.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces the cache file with `token` and keeps it in memory.
    pub fn save(&self, token: &Token) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CacheError::new(parent, e))?;
        }

        let contents = serde_json::to_vec(token)
            .map_err(|e| CacheError::new(&self.path, io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let tmp_path = self.tmp_path();
        write_private(&tmp_path, &contents).map_err(|e| CacheError::new(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(CacheError::new(&self.path, e));
        }

        tracing::debug!(
            path = %self.path.display(),
            expiration = token.expiration(),
            "token cached"
        );
        *self.held() = Some(token.clone());
        Ok(())
    }

    /// Returns the cached token if it is still valid for at least
    /// [`EXPIRY_THRESHOLD_SECS`].
    pub fn load(&self) -> Result<Option<Token>, CacheError> {
        self.load_at(Utc::now())
    }

    /// Same as [`load`](Self::load), evaluated at `now`.
    pub fn load_at(&self, now: DateTime<Utc>) -> Result<Option<Token>, CacheError> {
        if let Some(token) = self.held().as_ref() {
            if token.seconds_until_expiration(now) >= EXPIRY_THRESHOLD_SECS {
                return Ok(Some(token.clone()));
            }
        }

        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                *self.held() = None;
                return Ok(None);
            }
            Err(e) => return Err(CacheError::new(&self.path, e)),
        };

        let token: Token = match serde_json::from_slice(&contents) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "discarding unreadable token cache"
                );
                self.delete()?;
                return Ok(None);
            }
        };

        let remaining = token.seconds_until_expiration(now);
        if remaining >= EXPIRY_THRESHOLD_SECS {
            tracing::debug!(path = %self.path.display(), remaining, "using cached token");
            *self.held() = Some(token.clone());
            Ok(Some(token))
        } else {
            tracing::debug!(
                path = %self.path.display(),
                remaining,
                "cached token about to expire, removing"
            );
            self.delete()?;
            Ok(None)
        }
    }

    /// Forgets the token, removing the cache file if present.
    pub fn delete(&self) -> Result<(), CacheError> {
        *self.held() = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::new(&self.path, e)),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Writes `contents` to a fresh file readable by the owner only.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}
