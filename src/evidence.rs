//! Local filesystem storage for evidence files attached to inmate records.
//!
//! Files are stored under a generated uuid-hex name (original extension
//! preserved) so concurrent uploads cannot collide and original names never
//! leak into URLs. The inmate row holds the only reference to a stored file.

use anyhow::Result;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct EvidenceStore {
    root: PathBuf,
}

impl EvidenceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Persists an upload under a fresh generated name and returns that name.
    /// Only the extension of the original filename survives.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        self.ensure_exists().await?;

        let token = uuid::Uuid::new_v4().simple().to_string();
        let stored_name = match Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some(ext) => format!("{token}.{ext}"),
            None => token,
        };

        let path = self.root.join(&stored_name);
        fs::write(&path, bytes).await?;

        debug!("Stored evidence file {:?} as {}", original_name, stored_name);
        Ok(stored_name)
    }

    /// Removes a stored file if it exists. Best-effort: the inmate row is the
    /// source of truth, so a missing file or a failed unlink is logged and
    /// swallowed rather than surfaced.
    pub async fn remove(&self, stored_name: &str) {
        let Some(path) = self.safe_path(stored_name) else {
            warn!("Refusing to remove evidence file with unsafe name: {stored_name}");
            return;
        };

        match fs::remove_file(&path).await {
            Ok(()) => debug!("Removed evidence file {}", stored_name),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove evidence file {}: {}", stored_name, e),
        }
    }

    /// Resolves a stored name to its on-disk path, or `None` when the name is
    /// unsafe or the file does not exist.
    pub async fn resolve(&self, stored_name: &str) -> Option<PathBuf> {
        let path = self.safe_path(stored_name)?;
        if fs::metadata(&path).await.is_ok() {
            Some(path)
        } else {
            None
        }
    }

    /// Rejects names that could escape the upload directory. Stored names are
    /// always single flat filenames.
    fn safe_path(&self, stored_name: &str) -> Option<PathBuf> {
        let candidate = Path::new(stored_name);
        let mut components = candidate.components();

        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.root.join(stored_name)),
            _ => None,
        }
    }
}
