//! Synchronizing scene files with the controller.
//!
//! The controller is reached through [`SceneStore`]; this module decides
//! between creating and updating a scene and keeps the embedded header in
//! step with the ids the controller hands out.

use std::future::Future;
use std::path::Path;

use crate::body::SceneBody;
use crate::error::SceneError;
use crate::header::parse_header;
use crate::scene::{file_stem, is_source_path, SceneRecord};

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

/// Result of creating an empty scene on the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedScene {
    pub id: i64,
    /// Object type reported by the controller, empty if it sent none.
    pub object_type: String,
}

/// Result of writing a scene to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Updated,
    /// No scene with the record's id exists.
    Missing,
}

/// Remote collection of scenes addressed by id.
pub trait SceneStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// All scenes. Bodies may be omitted by the controller.
    fn list_scenes(&self) -> impl Future<Output = Result<Vec<SceneRecord>, Self::Error>> + Send;

    /// One scene with its body, `None` if no such scene exists.
    fn get_scene(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<SceneRecord>, Self::Error>> + Send;

    /// Allocate a new, empty scene named `name`.
    fn create_scene(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<CreatedScene, Self::Error>> + Send;

    /// Overwrite the scene identified by `record.id`.
    fn put_scene(
        &self,
        record: &SceneRecord,
    ) -> impl Future<Output = Result<PutOutcome, Self::Error>> + Send;
}

// ---------------------------------------------------------------------------
// Preparing an upload
// ---------------------------------------------------------------------------

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct UploadOverrides {
    pub scene_id: Option<i64>,
    pub room_id: Option<i64>,
    pub name: Option<String>,
    /// Write a header even if nothing else requires one.
    pub create_header: bool,
}

/// Fill in defaults from `source_path` and apply `overrides` to a record
/// freshly parsed from that file.
///
/// Returns `true` when the embedded header must be rewritten to persist the
/// changes.
pub fn apply_overrides(
    record: &mut SceneRecord,
    source_path: &Path,
    overrides: &UploadOverrides,
) -> bool {
    let mut rewrite = false;

    if record.id.is_none() {
        record.name = file_stem(source_path);
        if is_source_path(source_path) {
            record.is_source_file = true;
        }
        if let Some(name) = &overrides.name {
            record.name = name.clone();
            rewrite = true;
        }
        if overrides.create_header {
            rewrite = true;
        }
    } else if let Some(name) = &overrides.name {
        record.name = name.clone();
        rewrite = true;
    } else if record.name.is_empty() {
        record.name = file_stem(source_path);
        rewrite = true;
    }

    if let Some(room_id) = overrides.room_id {
        record.room_id = room_id;
        rewrite = true;
    }

    if let Some(scene_id) = overrides.scene_id {
        record.id = Some(scene_id);
        rewrite = true;
    }

    rewrite
}

// ---------------------------------------------------------------------------
// Upload / download
// ---------------------------------------------------------------------------

/// What [`upload`] did on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Created { id: i64 },
    Updated { id: i64 },
}

impl UploadOutcome {
    pub fn id(&self) -> i64 {
        match self {
            Self::Created { id } | Self::Updated { id } => *id,
        }
    }
}

/// Send `record` to the controller, creating the scene first when it has
/// no id yet.
///
/// The record is validated before anything is sent. Updating an id the
/// controller does not know fails with [`SceneError::RemoteConflict`]; it is
/// never turned into a create.
pub async fn upload<S: SceneStore>(
    store: &S,
    mut record: SceneRecord,
) -> Result<UploadOutcome, SceneError> {
    record.validate()?;

    let Some(id) = record.id else {
        let created = store
            .create_scene(&record.name)
            .await
            .map_err(SceneError::store)?;
        tracing::info!(scene_id = created.id, name = %record.name, "Created scene");

        record.id = Some(created.id);
        if !created.object_type.is_empty() {
            record.object_type = created.object_type;
        }
        record.update_header();
        put(store, &record, created.id).await?;
        return Ok(UploadOutcome::Created { id: created.id });
    };

    put(store, &record, id).await?;
    Ok(UploadOutcome::Updated { id })
}

async fn put<S: SceneStore>(store: &S, record: &SceneRecord, id: i64) -> Result<(), SceneError> {
    match store.put_scene(record).await.map_err(SceneError::store)? {
        PutOutcome::Updated => {
            tracing::info!(scene_id = id, name = %record.name, "Uploaded scene");
            Ok(())
        }
        PutOutcome::Missing => Err(SceneError::RemoteConflict {
            id,
            name: record.name.clone(),
        }),
    }
}

/// Fetch one scene, failing with [`SceneError::NotFound`] if it is absent.
pub async fn fetch_scene<S: SceneStore>(store: &S, id: i64) -> Result<SceneRecord, SceneError> {
    store
        .get_scene(id)
        .await
        .map_err(SceneError::store)?
        .ok_or(SceneError::NotFound {
            entity: "scene",
            id,
        })
}

/// File content for a downloaded scene: the body followed by a header when
/// the body does not already carry one.
pub fn download_content(record: &SceneRecord) -> SceneBody {
    let mut out = Vec::with_capacity(record.body.len() + 256);
    out.extend_from_slice(record.body.as_bytes());
    out.push(b'\n');
    if parse_header(&record.body).is_none() {
        tracing::info!(scene_id = ?record.id, "Scene has no header, adding one");
        out.extend_from_slice(record.to_header().as_bytes());
    }
    SceneBody::from(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
