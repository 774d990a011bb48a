use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::capture::FrameEncoder;
use crate::error::EncodeError;
use crate::render::Frame;
use crate::Result;

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// How the ffmpeg process is invoked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegSettings {
    /// Executable name or path
    pub binary: String,

    /// Video codec passed to `-c:v`
    pub codec: String,

    /// Output muxer passed to `-f`
    pub container: String,

    /// Constant rate factor, 0 (lossless) to 63
    pub crf: u8,
}

impl Default for FfmpegSettings {
    fn default() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
            codec: "libvpx-vp9".to_string(),
            container: "webm".to_string(),
            crf: 31,
        }
    }
}

impl FfmpegSettings {
    pub fn with_crf(mut self, crf: u8) -> Self {
        self.crf = crf;
        self
    }

    pub fn mime_type(&self) -> String {
        match self.container.as_str() {
            "webm" => "video/webm".to_string(),
            "mp4" => "video/mp4".to_string(),
            "matroska" | "mkv" => "video/x-matroska".to_string(),
            other => format!("video/{}", other),
        }
    }

    pub fn extension(&self) -> &str {
        match self.container.as_str() {
            "matroska" => "mkv",
            other => other,
        }
    }
}

/// Streams raw RGB frames through an external ffmpeg process
///
/// Frames go in on stdin as `rgb24`; the muxed container comes back on
/// stdout and is forwarded as chunks by a background reader task.
pub struct FfmpegEncoder {
    settings: FfmpegSettings,
    mime_type: String,
    frame_len: usize,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    chunks: Option<mpsc::UnboundedReceiver<Vec<u8>>>,
    reader: Option<JoinHandle<std::io::Result<()>>>,
    stderr: Option<JoinHandle<String>>,
}

impl FfmpegEncoder {
    pub fn new(settings: FfmpegSettings) -> Self {
        let mime_type = settings.mime_type();
        Self {
            settings,
            mime_type,
            frame_len: 0,
            child: None,
            stdin: None,
            chunks: None,
            reader: None,
            stderr: None,
        }
    }

    pub fn settings(&self) -> &FfmpegSettings {
        &self.settings
    }

    /// Whether `binary -version` runs successfully
    pub async fn is_available(binary: &str) -> bool {
        Command::new(binary)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn build_command(&self, width: u32, height: u32, fps: u32) -> Command {
        let mut cmd = Command::new(&self.settings.binary);
        cmd.args(["-hide_banner", "-loglevel", "error"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-s", &format!("{}x{}", width, height)])
            .args(["-r", &fps.to_string()])
            .args(["-i", "pipe:0"])
            .args(["-c:v", &self.settings.codec])
            .args(["-crf", &self.settings.crf.to_string(), "-b:v", "0"])
            .args(["-pix_fmt", "yuv420p"])
            .args(["-f", &self.settings.container, "pipe:1"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn drain_ready(&mut self) -> Vec<Vec<u8>> {
        let mut ready = Vec::new();
        if let Some(rx) = self.chunks.as_mut() {
            while let Ok(chunk) = rx.try_recv() {
                ready.push(chunk);
            }
        }
        ready
    }
}

#[async_trait]
impl FrameEncoder for FfmpegEncoder {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn extension(&self) -> &str {
        self.settings.extension()
    }

    async fn begin(&mut self, width: u32, height: u32, fps: u32) -> Result<()> {
        if !Self::is_available(&self.settings.binary).await {
            return Err(EncodeError::Unavailable {
                reason: format!("'{}' not found. Please install FFmpeg.", self.settings.binary),
            }
            .into());
        }

        let mut child = self
            .build_command(width, height, fps)
            .spawn()
            .map_err(|e| EncodeError::Unavailable {
                reason: format!("Failed to spawn FFmpeg process: {}", e),
            })?;

        let (Some(stdin), Some(mut stdout), Some(mut stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            return Err(EncodeError::Failed {
                reason: "FFmpeg pipes were not captured".to_string(),
            }
            .into());
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let reader = tokio::spawn(async move {
            let mut buf = vec![0u8; READ_CHUNK_SIZE];
            loop {
                let n = stdout.read(&mut buf).await?;
                if n == 0 || tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Ok(())
        });
        let stderr = tokio::spawn(async move {
            let mut text = String::new();
            let _ = stderr.read_to_string(&mut text).await;
            text
        });

        info!(
            "FFmpeg started: {}x{} @ {} fps, {} in {}",
            width, height, fps, self.settings.codec, self.settings.container
        );

        self.frame_len = width as usize * height as usize * 3;
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.chunks = Some(rx);
        self.reader = Some(reader);
        self.stderr = Some(stderr);
        Ok(())
    }

    async fn encode_frame(&mut self, frame: &Frame) -> Result<Vec<Vec<u8>>> {
        let bytes = frame.as_rgb_bytes();
        if bytes.len() != self.frame_len {
            return Err(EncodeError::Failed {
                reason: format!("Frame size {} does not match stream size {}", bytes.len(), self.frame_len),
            }
            .into());
        }

        let stdin = self.stdin.as_mut().ok_or(EncodeError::NotCapturing)?;
        stdin.write_all(bytes).await.map_err(|e| EncodeError::Failed {
            reason: format!("FFmpeg closed its input: {}", e),
        })?;

        Ok(self.drain_ready())
    }

    async fn finish(&mut self) -> Result<Vec<Vec<u8>>> {
        let mut stdin = self.stdin.take().ok_or(EncodeError::NotCapturing)?;
        stdin.shutdown().await.map_err(|e| EncodeError::Failed {
            reason: format!("Failed to close FFmpeg input: {}", e),
        })?;
        drop(stdin);

        if let Some(reader) = self.reader.take() {
            reader
                .await
                .map_err(|e| EncodeError::Failed {
                    reason: format!("FFmpeg reader task failed: {}", e),
                })?
                .map_err(|e| EncodeError::Failed {
                    reason: format!("Failed to read FFmpeg output: {}", e),
                })?;
        }

        let mut remaining = Vec::new();
        if let Some(mut rx) = self.chunks.take() {
            while let Some(chunk) = rx.recv().await {
                remaining.push(chunk);
            }
        }

        let status = match self.child.take() {
            Some(mut child) => child.wait().await.map_err(|e| EncodeError::Failed {
                reason: format!("FFmpeg execution failed: {}", e),
            })?,
            None => return Err(EncodeError::NotCapturing.into()),
        };

        let stderr = match self.stderr.take() {
            Some(handle) => handle.await.unwrap_or_default(),
            None => String::new(),
        };

        if !status.success() {
            return Err(EncodeError::Failed {
                reason: format!("FFmpeg failed: {}", stderr.trim()),
            }
            .into());
        }

        debug!("FFmpeg finished with {} trailing chunks", remaining.len());
        Ok(remaining)
    }

    async fn abort(&mut self) {
        self.stdin = None;
        self.chunks = None;
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if let Some(stderr) = self.stderr.take() {
            stderr.abort();
        }
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill().await {
                warn!("Failed to stop FFmpeg: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReelError;

    #[test]
    fn test_default_settings_are_webm_vp9() {
        let settings = FfmpegSettings::default();
        assert_eq!(settings.codec, "libvpx-vp9");
        assert_eq!(settings.mime_type(), "video/webm");
        assert_eq!(settings.extension(), "webm");
    }

    #[test]
    fn test_container_mime_types() {
        let mp4 = FfmpegSettings { container: "mp4".to_string(), ..Default::default() };
        assert_eq!(mp4.mime_type(), "video/mp4");

        let mkv = FfmpegSettings { container: "matroska".to_string(), ..Default::default() };
        assert_eq!(mkv.mime_type(), "video/x-matroska");
        assert_eq!(mkv.extension(), "mkv");
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let settings = FfmpegSettings {
            binary: "definitely-not-an-ffmpeg-binary".to_string(),
            ..Default::default()
        };
        let mut encoder = FfmpegEncoder::new(settings);

        match encoder.begin(16, 16, 30).await {
            Err(ReelError::Encode(EncodeError::Unavailable { .. })) => {}
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_frames_before_begin_are_rejected() {
        let mut encoder = FfmpegEncoder::new(FfmpegSettings::default());
        assert!(encoder.encode_frame(&Frame::new_black(0, 0)).await.is_err());
        assert!(encoder.finish().await.is_err());
    }
}
