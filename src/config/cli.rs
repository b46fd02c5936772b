use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

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

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

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
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("public"));

        storage.write_file("nested/out.png", b"png").await.unwrap();

        let data = std::fs::read(temp_dir.path().join("public/nested/out.png")).unwrap();
        assert_eq!(data, b"png");
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("out.xlsx", b"first").await.unwrap();
        storage.write_file("out.xlsx", b"second").await.unwrap();

        assert_eq!(std::fs::read(temp_dir.path().join("out.xlsx")).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_write_into_file_path_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("blocker"), b"x").unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("blocker"));

        let err = storage.write_file("out.png", b"png").await.unwrap_err();
        assert_eq!(err.kind(), crate::utils::error::ErrorKind::Io);
    }
}
