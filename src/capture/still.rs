use async_trait::async_trait;
use tokio::task;

use crate::capture::FrameEncoder;
use crate::error::EncodeError;
use crate::render::Frame;
use crate::Result;

/// Encodes the first captured frame as a PNG and ignores the rest
#[derive(Debug, Default)]
pub struct StillImageEncoder {
    first: Option<Frame>,
}

impl StillImageEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FrameEncoder for StillImageEncoder {
    fn mime_type(&self) -> &str {
        "image/png"
    }

    fn extension(&self) -> &str {
        "png"
    }

    async fn begin(&mut self, _width: u32, _height: u32, _fps: u32) -> Result<()> {
        self.first = None;
        Ok(())
    }

    async fn encode_frame(&mut self, frame: &Frame) -> Result<Vec<Vec<u8>>> {
        if self.first.is_none() {
            self.first = Some(frame.clone());
        }
        Ok(Vec::new())
    }

    async fn finish(&mut self) -> Result<Vec<Vec<u8>>> {
        let frame = self.first.take().ok_or_else(|| EncodeError::Failed {
            reason: "No frame was captured".to_string(),
        })?;

        let png = task::spawn_blocking(move || frame.encode_png())
            .await
            .map_err(|e| EncodeError::Failed {
                reason: format!("PNG encoder task failed: {}", e),
            })?
            .map_err(|e| EncodeError::Failed {
                reason: format!("PNG encoding failed: {}", e),
            })?;

        Ok(vec![png])
    }

    async fn abort(&mut self) {
        self.first = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keeps_only_first_frame() {
        let mut encoder = StillImageEncoder::new();
        encoder.begin(2, 2, 30).await.unwrap();
        encoder.encode_frame(&Frame::new_filled(2, 2, [255, 0, 0])).await.unwrap();
        encoder.encode_frame(&Frame::new_filled(2, 2, [0, 0, 255])).await.unwrap();

        let chunks = encoder.finish().await.unwrap();
        assert_eq!(chunks.len(), 1);

        let decoded = image::load_from_memory(&chunks[0]).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0]);
    }

    #[tokio::test]
    async fn test_finish_without_frames_fails() {
        let mut encoder = StillImageEncoder::new();
        encoder.begin(2, 2, 30).await.unwrap();
        assert!(encoder.finish().await.is_err());
    }
}
