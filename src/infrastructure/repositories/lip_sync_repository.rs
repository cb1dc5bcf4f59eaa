use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Repository for a lip-sync model run as an external process
#[async_trait]
pub trait LipSyncRepository: Send + Sync {
    /// Animate `face` to match `audio` and return the path of the produced video.
    ///
    /// The process gives no structured result: success means it exited
    /// cleanly and the output file exists. Anything else is `Err`.
    async fn run(&self, face: &Path, audio: &Path) -> Result<PathBuf, String>;

    /// Model checkpoint that would be used, if one is present
    fn checkpoint(&self) -> Option<PathBuf>;
}
