use crate::config::default_download_directory;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where downloaded recordings are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Target directory. Created on first download if missing.
    #[serde(default = "default_download_directory")]
    pub directory: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: default_download_directory(),
        }
    }
}
