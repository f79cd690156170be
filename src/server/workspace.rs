use crate::adapters::storage::LocalStorage;
use crate::utils::error::Result;
use std::path::Path;
use tempfile::TempDir;

/// Scratch directory for one request under the output root. Everything the
/// request writes lives here and is removed when the workspace is dropped,
/// whichever way the request ends.
pub struct RequestWorkspace {
    dir: TempDir,
}

impl RequestWorkspace {
    pub fn create(output_root: &str, order_number: &str) -> Result<Self> {
        std::fs::create_dir_all(output_root)?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", order_number))
            .tempdir_in(output_root)?;
        tracing::debug!("Created request workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn storage(&self) -> LocalStorage {
        LocalStorage::new(self.dir.path())
    }
}

impl Drop for RequestWorkspace {
    fn drop(&mut self) {
        tracing::debug!("Removing request workspace {}", self.dir.path().display());
    }
}
