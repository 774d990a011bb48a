use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::capture::{
    CaptureReport, CaptureSession, FfmpegEncoder, FfmpegSettings, FrameEncoder, StillImageEncoder,
};
use crate::error::{ReelError, ValidationError};
use crate::export::{Artifact, ExportFormat, ExportOptions};
use crate::render::{Frame, RenderSurface, SoftwareSurface};
use crate::timeline::{LoadedSlide, Slide, Timeline};
use crate::transitions::{transition_progress, TransitionCatalog, TransitionSelector};
use crate::Result;

/// Builds the encoder backend for one export
pub type EncoderFactory = Box<dyn Fn(&ExportOptions) -> Box<dyn FrameEncoder> + Send + Sync>;

/// File stem of reel artifacts
const REEL_STEM: &str = "reel";

/// Headless driver that renders a timeline once into an artifact
///
/// Uses the same render surface, filter pipeline and transition selection
/// as live preview, but walks frames as fast as the encoder accepts them
/// instead of on a clock.
pub struct ExportOrchestrator {
    ffmpeg: FfmpegSettings,
    encoder_factory: Option<EncoderFactory>,
    catalog: TransitionCatalog,
    selector: TransitionSelector,
    last_report: Option<CaptureReport>,
}

impl ExportOrchestrator {
    pub fn new(ffmpeg: FfmpegSettings) -> Self {
        Self {
            ffmpeg,
            encoder_factory: None,
            catalog: TransitionCatalog::standard(),
            selector: TransitionSelector::new(),
            last_report: None,
        }
    }

    /// Replace the built-in encoder choice
    pub fn with_encoder_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&ExportOptions) -> Box<dyn FrameEncoder> + Send + Sync + 'static,
    {
        self.encoder_factory = Some(Box::new(factory));
        self
    }

    pub fn with_selector(mut self, selector: TransitionSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Chunk accounting from the most recent export that started capturing
    pub fn last_report(&self) -> Option<CaptureReport> {
        self.last_report
    }

    fn make_encoder(&self, options: &ExportOptions) -> Box<dyn FrameEncoder> {
        if let Some(factory) = &self.encoder_factory {
            return factory(options);
        }
        match options.format {
            ExportFormat::Video => Box::new(FfmpegEncoder::new(
                self.ffmpeg.clone().with_crf(options.quality_tier.crf()),
            )),
            ExportFormat::AnimatedImage | ExportFormat::StillImage => Box::new(StillImageEncoder::new()),
        }
    }

    /// Render `timeline` with `options` into one artifact
    ///
    /// `on_progress` receives the completed fraction after each slide.
    /// Validation happens before anything is rendered. Decode and encode
    /// failures, and cancelling `cancel`, discard all captured output.
    ///
    /// Single-image formats capture only the first slide, drawn with its
    /// transition settled.
    pub async fn export_reel<F>(
        &mut self,
        timeline: &Timeline,
        options: &ExportOptions,
        cancel: &CancelToken,
        mut on_progress: F,
    ) -> Result<Artifact>
    where
        F: FnMut(f64),
    {
        let timeline = timeline.clone();
        let options = options.clone();

        if timeline.is_empty() {
            return Err(ValidationError::EmptyTimeline.into());
        }
        timeline.validate()?;
        options.validate()?;
        let durations = options.slide_durations(&timeline);
        options.validate_durations(&durations)?;
        if cancel.is_cancelled() {
            return Err(ReelError::Cancelled);
        }

        let plan = if options.format.is_single_image() {
            vec![1]
        } else {
            options.frame_plan(&durations)
        };
        info!(
            "Exporting {} slides as {} at {}x{} @ {} fps ({} frames)",
            timeline.len(),
            options.format,
            options.dimensions.width,
            options.dimensions.height,
            options.fps,
            plan.iter().sum::<u64>()
        );

        self.last_report = None;
        let mut surface = SoftwareSurface::new(options.dimensions.width, options.dimensions.height);
        let mut session = CaptureSession::start(self.make_encoder(&options), &surface, options.fps).await?;

        let outcome = if options.format.is_single_image() {
            self.render_first(&timeline, &mut surface, &mut session, cancel, &mut on_progress)
                .await
        } else {
            self.render_all(&timeline, &options, &plan, &mut surface, &mut session, cancel, &mut on_progress)
                .await
        };

        let result = match outcome {
            Ok(()) => session.stop(REEL_STEM).await,
            Err(e) => {
                session.discard().await;
                Err(e)
            }
        };
        self.last_report = Some(session.report());

        match &result {
            Ok(artifact) => info!(
                "Export complete: {} ({} bytes, {} ms)",
                artifact.filename,
                artifact.len(),
                artifact.duration_ms
            ),
            Err(ReelError::Cancelled) => info!("Export cancelled"),
            Err(e) => warn!("Export failed: {}", e),
        }
        result
    }

    async fn render_all<F>(
        &mut self,
        timeline: &Timeline,
        options: &ExportOptions,
        plan: &[u64],
        surface: &mut SoftwareSurface,
        session: &mut CaptureSession,
        cancel: &CancelToken,
        on_progress: &mut F,
    ) -> Result<()>
    where
        F: FnMut(f64),
    {
        let total = timeline.len();

        for (index, (slide, &frames)) in timeline.slides().iter().zip(plan).enumerate() {
            if cancel.is_cancelled() {
                return Err(ReelError::Cancelled);
            }

            let loaded = load_slide(slide, cancel).await?;
            let transition = *self.selector.resolve(timeline.transition_mode(), &self.catalog);
            debug!("Slide {}/{} ({}) via {}: {} frames", index + 1, total, slide.id, transition.id, frames);

            for frame in 0..frames {
                if cancel.is_cancelled() {
                    return Err(ReelError::Cancelled);
                }
                let progress = transition_progress(options.frame_time_ms(frame), &transition);
                surface.draw_slide(&loaded, progress, &transition);
                capture_frame(session, surface.frame(), cancel).await?;
            }

            on_progress((index + 1) as f64 / total as f64);
        }

        Ok(())
    }

    async fn render_first<F>(
        &mut self,
        timeline: &Timeline,
        surface: &mut SoftwareSurface,
        session: &mut CaptureSession,
        cancel: &CancelToken,
        on_progress: &mut F,
    ) -> Result<()>
    where
        F: FnMut(f64),
    {
        let first = timeline.get(0).ok_or(ValidationError::EmptyTimeline)?;
        let loaded = load_slide(first, cancel).await?;
        let transition = *self.selector.resolve(timeline.transition_mode(), &self.catalog);
        debug!("Still of slide {} (settled {})", first.id, transition.id);

        surface.draw_slide(&loaded, 1.0, &transition);
        capture_frame(session, surface.frame(), cancel).await?;
        on_progress(1.0);
        Ok(())
    }
}

/// Hand one frame to the encoder, abandoning the write if the export is cancelled
async fn capture_frame(session: &mut CaptureSession, frame: &Frame, cancel: &CancelToken) -> Result<()> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ReelError::Cancelled),
        captured = session.capture_frame(frame) => captured,
    }
}

/// Decode a slide, giving up as soon as the export is cancelled
async fn load_slide(slide: &Slide, cancel: &CancelToken) -> Result<LoadedSlide> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ReelError::Cancelled),
        loaded = slide.load() => loaded,
    }
}

impl Default for ExportOrchestrator {
    fn default() -> Self {
        Self::new(FfmpegSettings::default())
    }
}
