use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::DecodeError;
use crate::export::Artifact;
use crate::Result;

/// Hand each clip back unmodified as its own artifact
///
/// Clips are not concatenated; each becomes `video-segment-<n>.<ext>` with
/// `n` counting from 1. `on_progress` receives the completed fraction after
/// every clip.
pub async fn passthrough_clips<F>(clips: &[PathBuf], mut on_progress: F) -> Result<Vec<Artifact>>
where
    F: FnMut(f64),
{
    info!("Passing through {} video clips", clips.len());

    let mut artifacts = Vec::with_capacity(clips.len());
    for (index, path) in clips.iter().enumerate() {
        let bytes = tokio::fs::read(path).await.map_err(|_| DecodeError::LoadFailed {
            source_name: path.display().to_string(),
        })?;

        let extension = clip_extension(path);
        let mime_type = clip_mime_type(&extension);
        debug!("Clip {} -> {} bytes", path.display(), bytes.len());

        artifacts.push(Artifact::file(
            bytes,
            format!("video-segment-{}.{}", index + 1, extension),
            mime_type,
        ));
        on_progress((index + 1) as f64 / clips.len() as f64);
    }

    Ok(artifacts)
}

fn clip_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "webm".to_string())
}

fn clip_mime_type(extension: &str) -> String {
    match extension {
        "mp4" | "m4v" => "video/mp4".to_string(),
        "mov" => "video/quicktime".to_string(),
        "mkv" => "video/x-matroska".to_string(),
        other => format!("video/{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_clips_pass_through_unmodified() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.MP4");
        let second = dir.path().join("b.webm");
        std::fs::write(&first, b"first").unwrap();
        std::fs::write(&second, b"second").unwrap();

        let mut progress = Vec::new();
        let artifacts = passthrough_clips(&[first, second], |p| progress.push(p))
            .await
            .unwrap();

        assert_eq!(artifacts[0].filename, "video-segment-1.mp4");
        assert_eq!(artifacts[0].mime_type, "video/mp4");
        assert_eq!(artifacts[0].bytes, b"first");
        assert_eq!(artifacts[1].filename, "video-segment-2.webm");
        assert_eq!(progress, vec![0.5, 1.0]);
    }

    #[tokio::test]
    async fn test_missing_clip_fails() {
        let result = passthrough_clips(&[PathBuf::from("/no/such/clip.webm")], |_| {}).await;
        assert!(result.is_err());
    }
}
