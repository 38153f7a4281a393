//! Where the builder keeps its files
//!
//! ```text
//! <base>/settings.json
//! <base>/state/<blob key>.json
//! ```

use std::path::PathBuf;

use crate::filesys::file::File;

/// Environment variable overriding the base directory
pub const HOME_ENV: &str = "AUTOFLOW_HOME";

#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn settings_file(&self) -> File {
        File::new(self.base_dir.join("settings.json"))
    }

    /// Directory of the blob store holding the workspace
    pub fn blobs_dir(&self) -> PathBuf {
        self.base_dir.join("state")
    }
}

impl Default for StorageLayout {
    /// `$AUTOFLOW_HOME`, else `~/.autoflow`, else `./.autoflow`
    fn default() -> Self {
        let home = || {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map(|home| PathBuf::from(home).join(".autoflow"))
        };
        let base_dir = std::env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .or_else(home)
            .unwrap_or_else(|| PathBuf::from(".autoflow"));
        Self::new(base_dir)
    }
}
