//! Credential storage consumed by the transport.
//!
//! Stores the bearer token in `<home>/credentials.json` with restricted
//! permissions (0600). Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Environment variable holding a token that bypasses the credentials file.
pub const TOKEN_ENV: &str = "INQUIRO_TOKEN";

/// Shown when the backend rejects the stored token.
pub const SESSION_EXPIRED_HINT: &str =
    "Session expired. Run `inquiro auth set-token <TOKEN>` to sign in again.";

/// Source of the bearer token attached to every request.
///
/// `clear` is invoked by the transport when the backend reports an expired
/// session (HTTP 401).
pub trait CredentialStore: Send + Sync {
    fn token(&self) -> Option<String>;

    fn clear(&self) -> Result<()>;
}

/// Serialized credentials file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub token: String,
    /// Profile returned by the login endpoint, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

/// File-backed credential store.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under `INQUIRO_HOME`.
    pub fn default_location() -> Self {
        Self::new(paths::credentials_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads stored credentials, `None` if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<StoredCredentials>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read credentials from {}", self.path.display()))?;
        let stored = serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse credentials from {}", self.path.display())
        })?;
        Ok(Some(stored))
    }

    /// Saves credentials to disk with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(credentials).context("Failed to serialize credentials")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

impl CredentialStore for TokenFile {
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(stored) => stored
                .map(|c| c.token.trim().to_string())
                .filter(|t| !t.is_empty()),
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "ignoring unreadable credentials");
                None
            }
        }
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove credentials {}", self.path.display())),
        }
    }
}

/// In-memory token, typically taken from `INQUIRO_TOKEN`.
#[derive(Debug, Default)]
pub struct StaticToken {
    token: Mutex<Option<String>>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Reads `INQUIRO_TOKEN`, `None` when unset or blank.
    pub fn from_env() -> Option<Self> {
        std::env::var(TOKEN_ENV)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Self::new)
    }
}

impl CredentialStore for StaticToken {
    fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    fn clear(&self) -> Result<()> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
        Ok(())
    }
}

/// Picks the environment token when set, otherwise the credentials file.
pub fn default_store() -> Arc<dyn CredentialStore> {
    match StaticToken::from_env() {
        Some(token) => Arc::new(token),
        None => Arc::new(TokenFile::default_location()),
    }
}

/// Masks a token for display, keeping only the last four characters.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_token_file_round_trip_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = TokenFile::new(dir.path().join("credentials.json"));
        assert!(store.token().is_none());

        store
            .save(&StoredCredentials {
                token: "abc123".to_string(),
                user: Some(serde_json::json!({"email": "a@b.c"})),
            })
            .unwrap();
        assert_eq!(store.token().as_deref(), Some("abc123"));

        store.clear().unwrap();
        assert!(store.token().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = TokenFile::new(dir.path().join("credentials.json"));
        store
            .save(&StoredCredentials {
                token: "secret".to_string(),
                user: None,
            })
            .unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_static_token_clear() {
        let store = StaticToken::new("tok");
        assert_eq!(store.token().as_deref(), Some("tok"));
        store.clear().unwrap();
        assert!(store.token().is_none());
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abcdefgh"), "****efgh");
        assert_eq!(mask_token("abc"), "****");
    }
}
