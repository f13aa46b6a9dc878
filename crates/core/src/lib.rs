//! Scene file handling for the HC2 home-automation controller.
//!
//! Scenes are Lua scripts whose controller metadata (id, room, run
//! configuration, ...) lives in an embedded comment header. This crate
//! parses and rewrites that header, validates records, inlines `require`d
//! libraries for upload, and drives create-or-update against any
//! [`sync::SceneStore`]. It performs no network I/O itself.

pub mod action;
pub mod body;
pub mod debug_log;
pub mod error;
pub mod header;
pub mod include;
pub mod reconcile;
pub mod scene;
pub mod sync;
pub mod version;

pub use action::SceneAction;
pub use body::SceneBody;
pub use debug_log::{DebugCursor, DebugMessage};
pub use error::SceneError;
pub use include::{FileSource, FsSource, IncludeExpander};
pub use scene::{RunConfig, SceneRecord, LUA_SCENE_TYPE};
pub use sync::{SceneStore, UploadOverrides, UploadOutcome};
