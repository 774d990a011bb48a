//! # Transition System
//!
//! Named transitions played at slide boundaries, and the policy that decides
//! which one plays.
//!
//! ## Built-in Transitions
//!
//! - **fade** / **cross-dissolve**: opacity ramps
//! - **slide-left/right/up/down**: the incoming slide translates into place
//! - **zoom-in** / **zoom-out**: scale toward rest while fading in
//! - **flip-horizontal** / **flip-vertical**: the slide unfolds along one axis
//! - **ken-burns**: slow zoom with a slight pan
//! - **swirl**: rotates and grows into place
//!
//! `auto-mix` is not a transition itself: it asks the [`TransitionSelector`]
//! to draw one of the above at random for every boundary.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reel_composer::transitions::{TransitionCatalog, TransitionSelector};
//!
//! let catalog = TransitionCatalog::standard();
//! let mut selector = TransitionSelector::seeded(7);
//! let fade = selector.resolve("fade", &catalog);
//! assert_eq!(fade.id, "fade");
//! ```

pub mod catalog;
pub mod effect;
pub mod selector;

pub use catalog::{transition_progress, TransitionCatalog, TransitionDescriptor};
pub use effect::{Placement, SlideDirection, TransitionEffect};
pub use selector::TransitionSelector;

/// Pseudo-mode that picks a random transition per boundary
pub const AUTO_MIX: &str = "auto-mix";

/// Catalog entry used when a mode is not recognized
pub const DEFAULT_TRANSITION: &str = "fade";
