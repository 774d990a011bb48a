use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::playback::{PlaybackClock, PlaybackState, TickOutcome};
use crate::render::{Frame, RenderSurface, SoftwareSurface};
use crate::timeline::{LoadedSlide, Timeline};
use crate::transitions::TransitionSelector;
use crate::Result;

/// Live preview: a clock driving a render surface
///
/// Slides are decoded once up front; every tick redraws the current slide
/// through the same surface and transition-progress helper the exporter uses.
pub struct PreviewPlayer<S: RenderSurface = SoftwareSurface> {
    clock: PlaybackClock,
    slides: Vec<LoadedSlide>,
    surface: S,
}

impl<S: RenderSurface> PreviewPlayer<S> {
    /// Snapshot `timeline`, decode its slides and prepare to play on `surface`
    pub async fn load(timeline: &Timeline, surface: S, tick_ms: u64) -> Result<Self> {
        Self::load_with_selector(timeline, surface, tick_ms, TransitionSelector::new()).await
    }

    pub async fn load_with_selector(
        timeline: &Timeline,
        surface: S,
        tick_ms: u64,
        selector: TransitionSelector,
    ) -> Result<Self> {
        let clock = PlaybackClock::with_selector(timeline, tick_ms, selector);
        let slides = clock.timeline().decode_all().await?;
        debug!("Preview loaded {} slides", slides.len());

        Ok(Self { clock, slides, surface })
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut PlaybackClock {
        &mut self.clock
    }

    pub fn state(&self) -> &PlaybackState {
        self.clock.state()
    }

    pub fn frame(&self) -> &Frame {
        self.surface.frame()
    }

    /// Give the surface back once the preview is done with it
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Draw the current slide at the clock's current transition progress
    pub fn render_current(&mut self) {
        let index = self.clock.state().current_slide_index;
        let Some(slide) = self.slides.get(index) else {
            return;
        };
        self.surface
            .draw_slide(slide, self.clock.transition_progress(), self.clock.transition());
    }

    /// Advance one tick and redraw
    pub fn step(&mut self) -> TickOutcome {
        let outcome = self.clock.tick();
        if outcome != TickOutcome::Idle {
            self.render_current();
        }
        outcome
    }

    /// Play until `cancel` fires, calling `on_frame` after every redraw.
    ///
    /// Returns the number of ticks processed. An empty timeline returns
    /// immediately without drawing.
    pub async fn run<F>(&mut self, cancel: &CancelToken, mut on_frame: F) -> u64
    where
        F: FnMut(&PlaybackState, &Frame),
    {
        if !self.clock.start() {
            debug!("Nothing to preview");
            return 0;
        }

        info!("Preview started: {} slides", self.slides.len());
        self.render_current();
        on_frame(self.clock.state(), self.surface.frame());

        let mut ticker = interval(Duration::from_millis(self.clock.tick_ms()));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        let mut ticks = 0;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if !self.clock.state().is_playing {
                        break;
                    }
                    self.step();
                    ticks += 1;
                    on_frame(self.clock.state(), self.surface.frame());
                }
            }
        }

        self.clock.stop();
        info!("Preview stopped after {} ticks", ticks);
        ticks
    }
}
