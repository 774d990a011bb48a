use tracing::{debug, info, warn};

use crate::capture::FrameEncoder;
use crate::error::{EncodeError, ValidationError};
use crate::export::Artifact;
use crate::render::{Frame, RenderSurface};
use crate::Result;

/// Chunk accounting for one capture session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureReport {
    pub frames_captured: u64,

    /// Chunks concatenated into the artifact
    pub finalized_chunks: usize,

    /// Chunks thrown away by a failure or cancellation
    pub discarded_chunks: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Capturing,
    Finalized,
    Discarded,
}

/// Accumulates encoder output for one artifact
///
/// Chunks are kept in arrival order. The session either finalizes into an
/// [`Artifact`] containing every chunk, or discards them all; there is no
/// partial outcome.
pub struct CaptureSession {
    encoder: Box<dyn FrameEncoder>,
    fps: u32,
    chunks: Vec<Vec<u8>>,
    state: SessionState,
    report: CaptureReport,
}

impl CaptureSession {
    /// Begin capturing frames shaped like `surface` at `fps`
    pub async fn start<S>(mut encoder: Box<dyn FrameEncoder>, surface: &S, fps: u32) -> Result<Self>
    where
        S: RenderSurface + ?Sized,
    {
        if fps == 0 {
            return Err(ValidationError::InvalidOption {
                key: "fps".to_string(),
                value: fps.to_string(),
            }
            .into());
        }

        let (width, height) = surface.dimensions();
        encoder.begin(width, height, fps).await?;
        debug!("Capture started: {}x{} @ {} fps ({})", width, height, fps, encoder.mime_type());

        Ok(Self {
            encoder,
            fps,
            chunks: Vec::new(),
            state: SessionState::Capturing,
            report: CaptureReport::default(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Capturing
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn pending_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn report(&self) -> CaptureReport {
        self.report
    }

    /// Append one encoder chunk; empty chunks carry nothing and are skipped
    pub fn on_chunk(&mut self, bytes: Vec<u8>) {
        if !bytes.is_empty() {
            self.chunks.push(bytes);
        }
    }

    /// Hand one frame to the encoder and collect whatever it emitted
    pub async fn capture_frame(&mut self, frame: &Frame) -> Result<()> {
        self.ensure_active()?;

        match self.encoder.encode_frame(frame).await {
            Ok(chunks) => {
                for chunk in chunks {
                    self.on_chunk(chunk);
                }
                self.report.frames_captured += 1;
                Ok(())
            }
            Err(e) => {
                warn!("Encoder failed on frame {}: {}", self.report.frames_captured, e);
                self.discard().await;
                Err(e)
            }
        }
    }

    /// Finalize the encoder and join every chunk into one artifact named
    /// `<stem>.<ext>`
    pub async fn stop(&mut self, stem: &str) -> Result<Artifact> {
        self.ensure_active()?;

        let trailing = match self.encoder.finish().await {
            Ok(trailing) => trailing,
            Err(e) => {
                warn!("Encoder failed to finalize: {}", e);
                self.discard().await;
                return Err(e);
            }
        };
        for chunk in trailing {
            self.on_chunk(chunk);
        }

        self.state = SessionState::Finalized;
        self.report.finalized_chunks = self.chunks.len();

        let frames = self.report.frames_captured;
        let fps = u64::from(self.fps);
        let bytes = std::mem::take(&mut self.chunks).concat();
        info!("Capture finalized: {} frames, {} chunks, {} bytes", frames, self.report.finalized_chunks, bytes.len());

        Ok(Artifact {
            bytes,
            filename: format!("{}.{}", stem, self.encoder.extension()),
            mime_type: self.encoder.mime_type().to_string(),
            duration_ms: (frames * 1000 + fps / 2) / fps,
            frame_count: frames,
            fps: self.fps,
        })
    }

    /// Abort the encoder and drop every accumulated chunk
    pub async fn discard(&mut self) {
        if !self.is_active() {
            return;
        }

        self.encoder.abort().await;
        self.report.discarded_chunks = self.chunks.len();
        self.chunks.clear();
        self.state = SessionState::Discarded;
        debug!("Capture discarded {} chunks", self.report.discarded_chunks);
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(EncodeError::NotCapturing.into())
        }
    }
}
