use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filters::FilterParams;
use crate::timeline::{Slide, Timeline, DEFAULT_SLIDE_DURATION_MS};
use crate::transitions::AUTO_MIX;

/// What a project composes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    #[default]
    Photo,
    Video,
}

/// A stored slide: where its pixels live plus its edits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideRecord {
    pub id: String,

    /// File path of the source image
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterParams>,

    #[serde(default)]
    pub edited: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl SlideRecord {
    pub fn from_slide(slide: &Slide) -> Self {
        Self {
            id: slide.id.clone(),
            source: slide.source.name(),
            filters: slide.filters,
            edited: slide.edited,
            duration_ms: slide.duration_ms,
        }
    }

    pub fn to_slide(&self) -> Slide {
        let mut slide = Slide::from_path(&self.source).with_id(self.id.clone());
        slide.filters = self.filters;
        slide.edited = self.edited;
        slide.duration_ms = self.duration_ms;
        slide
    }
}

/// A stored video clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Per-project playback choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    pub reel_duration_ms: u64,
    pub transition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_duration_ms: Option<u64>,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            reel_duration_ms: DEFAULT_SLIDE_DURATION_MS,
            transition: AUTO_MIX.to_string(),
            photo_duration_ms: None,
        }
    }
}

/// A project as supplied by the caller, before the store assigns identity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub kind: ProjectKind,
    pub slides: Vec<SlideRecord>,
    pub videos: Vec<VideoRecord>,
    pub settings: ProjectSettings,
}

/// A project as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProject {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    #[serde(default)]
    pub slides: Vec<SlideRecord>,
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub settings: ProjectSettings,
}

impl SavedProject {
    pub(crate) fn assign(project: NewProject, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: project.name,
            kind: project.kind,
            slides: project.slides,
            videos: project.videos,
            created_at: now,
            updated_at: now,
            settings: project.settings,
        }
    }

    /// The caller-supplied part, without id or timestamps
    pub fn contents(&self) -> NewProject {
        NewProject {
            name: self.name.clone(),
            kind: self.kind,
            slides: self.slides.clone(),
            videos: self.videos.clone(),
            settings: self.settings.clone(),
        }
    }

    /// Rebuild a playable timeline from the stored slides
    pub fn timeline(&self) -> Timeline {
        let duration = self.settings.photo_duration_ms.unwrap_or(self.settings.reel_duration_ms);
        Timeline::from_slides(self.slides.iter().map(SlideRecord::to_slide).collect(), duration)
            .with_transition(self.settings.transition.clone())
    }
}

/// Partial update; `None` fields are left as they are
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub slides: Option<Vec<SlideRecord>>,
    pub videos: Option<Vec<VideoRecord>>,
    pub settings: Option<ProjectSettings>,
}

impl ProjectPatch {
    pub(crate) fn apply_to(self, project: &mut SavedProject) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(slides) = self.slides {
            project.slides = slides;
        }
        if let Some(videos) = self.videos {
            project.videos = videos;
        }
        if let Some(settings) = self.settings {
            project.settings = settings;
        }
    }
}

/// Everything the store holds, in its serialized form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub projects: Vec<SavedProject>,

    #[serde(default = "empty_settings")]
    pub settings: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            settings: empty_settings(),
            exported_at: None,
        }
    }
}

pub(crate) fn empty_settings() -> Value {
    Value::Object(Default::default())
}
