//! Filesystem operations behind a trait
//!
//! The mutation steps remove project directories and copy resource
//! files around. Keeping those behind a trait avoids platform-specific
//! shell commands and lets workflow tests run against a fake.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// Filesystem operations used by the project workflows
#[async_trait]
pub trait FsOps: Send + Sync {
    /// Recursively remove a directory; missing directories are not an error
    async fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// Copy `src` to `dest`, overwriting an existing file
    async fn copy_file(&self, src: &Path, dest: &Path) -> Result<()>;

    /// List `*.resx` files directly under `dir`, sorted by name
    async fn list_resx_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Real filesystem implementation
pub struct LocalFs;

#[async_trait]
impl FsOps for LocalFs {
    async fn remove_dir_all(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "Removing directory");
        match tokio::fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::anyhow!(
                "Failed to remove {}: {}",
                path.display(),
                e
            )),
        }
    }

    async fn copy_file(&self, src: &Path, dest: &Path) -> Result<()> {
        debug!(src = %src.display(), dest = %dest.display(), "Copying file");
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(src, dest).await.map_err(|e| {
            anyhow::anyhow!(
                "Failed to copy {} to {}: {}",
                src.display(),
                dest.display(),
                e
            )
        })?;
        Ok(())
    }

    async fn list_resx_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let pattern = dir.join("*.resx");
        let pattern = pattern
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Non-UTF8 path: {}", dir.display()))?;

        let mut files: Vec<PathBuf> = glob::glob(pattern)?
            .filter_map(|entry| entry.ok())
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        Ok(files)
    }
}
