//! # Project Storage
//!
//! Plain CRUD persistence for saved projects and app settings, kept as one
//! JSON document. Nothing in playback or export depends on it; it only turns
//! stored records back into timelines.

pub mod models;
pub mod store;

pub use models::{
    NewProject, ProjectKind, ProjectPatch, ProjectSettings, SavedProject, SlideRecord, Snapshot,
    VideoRecord,
};
pub use store::{ProjectStore, PROJECT_EXPORT_FILENAME};
