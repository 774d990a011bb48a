use tracing::debug;

use crate::timeline::Timeline;
use crate::transitions::{
    transition_progress, TransitionCatalog, TransitionDescriptor, TransitionSelector,
};

/// Reference tick interval
pub const DEFAULT_TICK_MS: u64 = 100;

/// Observable playback position
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_slide_index: usize,

    /// Progress through the current slide, `0.0..=100.0`
    pub progress_percent: f64,

    pub is_playing: bool,

    /// Transition that played (or is playing) into the current slide
    pub resolved_transition_id: &'static str,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Not playing, or nothing to play
    Idle,

    /// Progress moved within the current slide
    Advanced { progress_percent: f64 },

    /// The current slide finished and playback moved on
    Boundary {
        from: usize,
        to: usize,
        transition_id: &'static str,
    },
}

/// Tick-driven slide-advance state machine for live preview
///
/// Owns a snapshot of the timeline taken at construction; later edits to the
/// caller's timeline are not observed.
pub struct PlaybackClock {
    timeline: Timeline,
    catalog: TransitionCatalog,
    selector: TransitionSelector,
    tick_ms: u64,
    elapsed_ms: u64,
    transition: TransitionDescriptor,
    state: PlaybackState,
}

impl PlaybackClock {
    pub fn new(timeline: &Timeline, tick_ms: u64) -> Self {
        Self::with_selector(timeline, tick_ms, TransitionSelector::new())
    }

    pub fn with_selector(timeline: &Timeline, tick_ms: u64, mut selector: TransitionSelector) -> Self {
        let catalog = TransitionCatalog::standard();
        let transition = *selector.resolve(timeline.transition_mode(), &catalog);

        Self {
            timeline: timeline.clone(),
            catalog,
            selector,
            tick_ms: tick_ms.max(1),
            elapsed_ms: 0,
            transition,
            state: PlaybackState {
                current_slide_index: 0,
                progress_percent: 0.0,
                is_playing: false,
                resolved_transition_id: transition.id,
            },
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    /// Begin playing. Returns `false` (and stays stopped) for an empty timeline.
    pub fn start(&mut self) -> bool {
        if self.timeline.is_empty() {
            return false;
        }
        self.state.is_playing = true;
        true
    }

    pub fn stop(&mut self) {
        self.state.is_playing = false;
    }

    pub fn toggle(&mut self) -> bool {
        if self.state.is_playing {
            self.stop();
            false
        } else {
            self.start()
        }
    }

    /// Jump to `index` (clamped) and restart its progress
    pub fn seek(&mut self, index: usize) {
        if self.timeline.is_empty() {
            return;
        }
        self.state.current_slide_index = index.min(self.timeline.len() - 1);
        self.state.progress_percent = 0.0;
        self.elapsed_ms = 0;
    }

    /// Step forward one slide without wrapping
    pub fn next(&mut self) {
        self.seek(self.state.current_slide_index + 1);
    }

    /// Step back one slide without wrapping
    pub fn previous(&mut self) {
        self.seek(self.state.current_slide_index.saturating_sub(1));
    }

    /// Advance by one tick interval
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_playing || self.timeline.is_empty() {
            return TickOutcome::Idle;
        }

        let index = self.state.current_slide_index;
        let duration = self.timeline.duration_of(index).max(1);
        self.elapsed_ms += self.tick_ms;

        if self.elapsed_ms >= duration {
            let next = (index + 1) % self.timeline.len();
            self.transition = *self.selector.resolve(self.timeline.transition_mode(), &self.catalog);
            self.elapsed_ms = 0;
            self.state.current_slide_index = next;
            self.state.progress_percent = 0.0;
            self.state.resolved_transition_id = self.transition.id;

            debug!("Slide {} -> {} via {}", index, next, self.transition.id);
            return TickOutcome::Boundary {
                from: index,
                to: next,
                transition_id: self.transition.id,
            };
        }

        self.state.progress_percent = self.elapsed_ms as f64 * 100.0 / duration as f64;
        TickOutcome::Advanced {
            progress_percent: self.state.progress_percent,
        }
    }

    /// Milliseconds spent on the current slide
    pub fn elapsed_in_slide_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Transition entering the current slide
    pub fn transition(&self) -> &TransitionDescriptor {
        &self.transition
    }

    /// Progress of the entering transition, `0.0..=1.0`
    pub fn transition_progress(&self) -> f32 {
        transition_progress(self.elapsed_ms, &self.transition)
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.timeline.total_duration_ms()
    }

    /// Fill of the progress-bar segment for slide `index`, `0.0..=100.0`
    pub fn segment_fill(&self, index: usize) -> f64 {
        let current = self.state.current_slide_index;
        if index < current {
            100.0
        } else if index == current {
            self.state.progress_percent
        } else {
            0.0
        }
    }
}
