use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StorageError;
use crate::export::Artifact;
use crate::storage::models::{NewProject, ProjectPatch, SavedProject, Snapshot};
use crate::Result;

/// Suggested file name for a single exported project
pub const PROJECT_EXPORT_FILENAME: &str = "reel-project.json";

#[derive(Debug, Clone)]
enum Backend {
    Memory,
    File(PathBuf),
}

/// CRUD store for saved projects and app settings
///
/// Every mutation builds the next state, persists it, and only then swaps it
/// in; a failed write leaves both disk and memory at the last good state.
/// File writes go through a temp file and a rename.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    backend: Backend,
    data: Snapshot,
}

impl ProjectStore {
    /// A store that never touches disk
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory,
            data: Snapshot::default(),
        }
    }

    /// Load the store at `path`; a missing file is an empty store
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let data = match tokio::fs::read_to_string(&path).await {
            Ok(text) => serde_json::from_str::<Snapshot>(&text).map_err(|e| StorageError::Corrupt {
                reason: format!("{}: {}", path.display(), e),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No project store at {}, starting empty", path.display());
                Snapshot::default()
            }
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
        };

        info!("Opened project store {} ({} projects)", path.display(), data.projects.len());
        Ok(Self {
            backend: Backend::File(path),
            data,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::File(path) => Some(path),
            Backend::Memory => None,
        }
    }

    /// Store a new project, assigning its id and timestamps
    pub async fn save(&mut self, project: NewProject) -> Result<SavedProject> {
        let saved = SavedProject::assign(project, Uuid::new_v4().simple().to_string(), Utc::now());

        let mut next = self.data.clone();
        next.projects.push(saved.clone());
        self.commit(next).await?;

        info!("Saved project {} ({})", saved.name, saved.id);
        Ok(saved)
    }

    /// All projects in insertion order
    pub fn list(&self) -> &[SavedProject] {
        &self.data.projects
    }

    pub fn get(&self, id: &str) -> Option<&SavedProject> {
        self.data.projects.iter().find(|p| p.id == id)
    }

    /// Apply `patch` and refresh `updated_at`; `None` when `id` is unknown
    pub async fn update(&mut self, id: &str, patch: ProjectPatch) -> Result<Option<SavedProject>> {
        let mut next = self.data.clone();
        let Some(project) = next.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        patch.apply_to(project);
        project.updated_at = Utc::now().max(project.created_at);
        let updated = project.clone();

        self.commit(next).await?;
        debug!("Updated project {}", id);
        Ok(Some(updated))
    }

    /// Remove a project; `false` when nothing matched
    pub async fn delete(&mut self, id: &str) -> Result<bool> {
        let mut next = self.data.clone();
        let before = next.projects.len();
        next.projects.retain(|p| p.id != id);
        if next.projects.len() == before {
            return Ok(false);
        }

        self.commit(next).await?;
        info!("Deleted project {}", id);
        Ok(true)
    }

    /// App-wide settings object
    pub fn settings(&self) -> &Value {
        &self.data.settings
    }

    pub async fn save_settings(&mut self, settings: Value) -> Result<()> {
        let mut next = self.data.clone();
        next.settings = settings;
        self.commit(next).await
    }

    /// Serialize every project and the settings, stamped with the export time
    pub fn export_snapshot(&self) -> Result<String> {
        let snapshot = Snapshot {
            exported_at: Some(Utc::now()),
            ..self.data.clone()
        };
        serde_json::to_string_pretty(&snapshot).map_err(|e| {
            StorageError::Corrupt {
                reason: format!("Failed to serialize snapshot: {}", e),
            }
            .into()
        })
    }

    /// Replace the whole store with `data`
    ///
    /// Returns `false`, leaving the store untouched, when `data` does not
    /// parse as a snapshot or cannot be persisted.
    pub async fn import_snapshot(&mut self, data: &str) -> bool {
        let snapshot = match serde_json::from_str::<Snapshot>(data) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Rejected snapshot import: {}", e);
                return false;
            }
        };

        let next = Snapshot {
            exported_at: None,
            ..snapshot
        };
        match self.commit(next).await {
            Ok(()) => {
                info!("Imported {} projects", self.data.projects.len());
                true
            }
            Err(e) => {
                warn!("Snapshot import not persisted: {}", e);
                false
            }
        }
    }

    /// Remove every project and reset settings
    pub async fn clear(&mut self) -> Result<()> {
        self.commit(Snapshot::default()).await?;
        info!("Cleared project store");
        Ok(())
    }

    /// One project as a downloadable pretty-printed JSON artifact
    pub fn export_project(&self, id: &str) -> Result<Option<Artifact>> {
        let Some(project) = self.get(id) else {
            return Ok(None);
        };

        let json = serde_json::to_vec_pretty(project).map_err(|e| StorageError::Corrupt {
            reason: format!("Failed to serialize project {}: {}", id, e),
        })?;
        Ok(Some(Artifact::file(json, PROJECT_EXPORT_FILENAME, "application/json")))
    }

    async fn commit(&mut self, next: Snapshot) -> Result<()> {
        if let Backend::File(path) = &self.backend {
            write_atomic(path, &next).await?;
        }
        self.data = next;
        Ok(())
    }
}

async fn write_atomic(path: &Path, data: &Snapshot) -> Result<()> {
    let write_failed = |reason: String| StorageError::WriteFailed {
        path: path.display().to_string(),
        reason,
    };

    let json = serde_json::to_vec_pretty(data).map_err(|e| write_failed(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| write_failed(e.to_string()))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &json)
        .await
        .map_err(|e| write_failed(e.to_string()))?;

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(write_failed(e.to_string()).into());
    }

    debug!("Wrote project store {} ({} bytes)", path.display(), json.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterParams;
    use crate::storage::models::{ProjectKind, ProjectSettings, SlideRecord};
    use crate::ReelError;
    use tempfile::TempDir;

    fn sample(name: &str) -> NewProject {
        NewProject {
            name: name.to_string(),
            kind: ProjectKind::Photo,
            slides: vec![SlideRecord {
                id: "s1".to_string(),
                source: "/photos/beach.jpg".to_string(),
                filters: Some(FilterParams::new(110.0, 95.0, 120.0, 0.0)),
                edited: true,
                duration_ms: None,
            }],
            videos: Vec::new(),
            settings: ProjectSettings {
                transition: "fade".to_string(),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_save_get_delete() {
        let mut store = ProjectStore::in_memory();
        let saved = store.save(sample("Trip")).await.unwrap();

        let fetched = store.get(&saved.id).unwrap();
        assert_eq!(fetched.contents(), sample("Trip"));
        assert_eq!(fetched.created_at, fetched.updated_at);

        assert!(store.delete(&saved.id).await.unwrap());
        assert!(store.get(&saved.id).is_none());
        assert!(!store.delete(&saved.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_refreshes_timestamp() {
        let mut store = ProjectStore::in_memory();
        let saved = store.save(sample("Draft")).await.unwrap();

        let patch = ProjectPatch {
            name: Some("Final".to_string()),
            ..Default::default()
        };
        let updated = store.update(&saved.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.name, "Final");
        assert_eq!(updated.slides, saved.slides);
        assert!(updated.updated_at >= saved.updated_at);
        assert!(store.update("missing", ProjectPatch::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("projects.json");

        let mut store = ProjectStore::open(&path).await.unwrap();
        let saved = store.save(sample("Persisted")).await.unwrap();
        store
            .save_settings(serde_json::json!({ "theme": "dark" }))
            .await
            .unwrap();

        let reopened = ProjectStore::open(&path).await.unwrap();
        assert_eq!(reopened.get(&saved.id), Some(&saved));
        assert_eq!(reopened.settings()["theme"], "dark");
    }

    #[tokio::test]
    async fn test_failed_write_keeps_last_good_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projects.json");
        let mut store = ProjectStore::open(&path).await.unwrap();
        store.save(sample("Kept")).await.unwrap();

        // A directory in place of the store file makes the rename fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = store.save(sample("Lost")).await.unwrap_err();
        assert!(matches!(err, ReelError::Storage(StorageError::WriteFailed { .. })));
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].name, "Kept");
    }

    #[tokio::test]
    async fn test_snapshot_round_trip_replaces_store() {
        let mut source = ProjectStore::in_memory();
        source.save(sample("One")).await.unwrap();
        source.save(sample("Two")).await.unwrap();
        let snapshot = source.export_snapshot().unwrap();
        assert!(snapshot.contains("exportedAt"));

        let mut target = ProjectStore::in_memory();
        target.save(sample("Old")).await.unwrap();
        assert!(target.import_snapshot(&snapshot).await);

        let names: Vec<&str> = target.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two"]);
    }

    #[tokio::test]
    async fn test_malformed_import_leaves_store_unchanged() {
        let mut store = ProjectStore::in_memory();
        store.save(sample("Existing")).await.unwrap();
        let before = store.list().to_vec();

        assert!(!store.import_snapshot("{ not json").await);
        assert!(!store.import_snapshot(r#"{ "settings": {} }"#).await);
        assert!(!store.import_snapshot(r#"{ "projects": [{ "id": 3 }] }"#).await);
        assert_eq!(store.list(), before.as_slice());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(&path, "garbage").unwrap();

        let err = ProjectStore::open(&path).await.unwrap_err();
        assert!(matches!(err, ReelError::Storage(StorageError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_clear_and_project_export() {
        let mut store = ProjectStore::in_memory();
        let saved = store.save(sample("Exported")).await.unwrap();

        let artifact = store.export_project(&saved.id).unwrap().unwrap();
        assert_eq!(artifact.filename, PROJECT_EXPORT_FILENAME);
        assert_eq!(artifact.mime_type, "application/json");
        let parsed: SavedProject = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(parsed, saved);

        store.clear().await.unwrap();
        assert!(store.list().is_empty());
        assert!(store.export_project(&saved.id).unwrap().is_none());
    }
}
