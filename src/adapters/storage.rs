use crate::domain::ports::Storage;
use crate::utils::error::{LabelError, Result};
use std::path::{Component, Path, PathBuf};

/// Filesystem storage rooted at a base directory. Paths are relative to the
/// base and may not climb out of it.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || path.is_empty() {
            return Err(LabelError::InvalidConfigValueError {
                field: "storage_path".to_string(),
                value: path.to_string(),
                reason: "Path must stay inside the storage root".to_string(),
            });
        }
        Ok(self.base_path.join(relative))
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path)?;
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        tokio_test::block_on(async {
            storage.write_file("PO-7/宁波.docx", b"doc").await.unwrap();
            assert_eq!(storage.read_file("PO-7/宁波.docx").await.unwrap(), b"doc");
        });
        assert!(dir.path().join("PO-7").is_dir());
    }

    #[test]
    fn test_rejects_paths_outside_root() {
        let storage = LocalStorage::new("/tmp/labels");
        assert!(storage.resolve("../escape.zip").is_err());
        assert!(storage.resolve("/etc/passwd").is_err());
        assert!(storage.resolve("").is_err());
        assert_eq!(
            storage.resolve("uploads/book.xlsx").unwrap(),
            PathBuf::from("/tmp/labels/uploads/book.xlsx")
        );
    }
}
