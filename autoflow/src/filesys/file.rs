//! Single-file reads and crash-safe replacement

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::FlowError;

/// Handle on one file path; nothing is opened until a read or write
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole contents, `None` when the file does not exist
    pub async fn read_optional(&self) -> Result<Option<String>, FlowError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the contents. Readers see either the old or the new bytes,
    /// never a partial write.
    pub async fn write_atomic(&self, contents: &[u8]) -> Result<(), FlowError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let staging = self.path.with_extension("tmp");
        {
            let mut out = fs::File::create(&staging).await?;
            out.write_all(contents).await?;
            out.sync_all().await?;
        }
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}
