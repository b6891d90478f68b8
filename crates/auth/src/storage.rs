use crate::credentials::Credentials;
use crate::error::AuthError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// JSON file holding the cached credentials.
#[derive(Debug, Clone)]
pub struct CredentialStorage {
    path: PathBuf,
}

impl CredentialStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` when the cache is absent or cannot be used.
    pub async fn load(&self) -> Option<Credentials> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No credential cache at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Cannot read credential cache {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                warn!("Ignoring invalid credential cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub async fn save(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let content = serde_json::to_string_pretty(credentials)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AuthError::Storage(e.to_string()))?;
            }
        }

        let storage_error = |e: std::io::Error| {
            AuthError::Storage(format!("{}: {}", self.path.display(), e))
        };

        // The cache may hold a private key: owner read/write only.
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).await.map_err(storage_error)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(storage_error)?;
        }
        file.write_all(content.as_bytes())
            .await
            .map_err(storage_error)?;
        file.sync_all().await.map_err(storage_error)?;

        debug!("Stored credentials in {}", self.path.display());
        Ok(())
    }
}
