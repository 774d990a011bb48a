use std::path::{Path, PathBuf};

use tracing::info;

use crate::Result;

/// A finished export: payload plus the metadata a file-save sink needs
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub bytes: Vec<u8>,

    /// Suggested file name, e.g. `reel.webm`
    pub filename: String,

    pub mime_type: String,

    /// Encoded play time; zero for single images
    pub duration_ms: u64,

    pub frame_count: u64,

    pub fps: u32,
}

impl Artifact {
    /// A payload with no timing information
    pub fn file<N, M>(bytes: Vec<u8>, filename: N, mime_type: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Self {
            bytes,
            filename: filename.into(),
            mime_type: mime_type.into(),
            duration_ms: 0,
            frame_count: 0,
            fps: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write into `dir` under the suggested file name
    pub async fn save_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        tokio::fs::write(&path, &self.bytes).await?;
        info!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}
