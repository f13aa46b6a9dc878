//! The scene record: a Lua automation script plus the metadata the
//! controller keeps about it.
//!
//! A record is built one of three ways:
//!
//! - [`SceneRecord::new`] for authoring a new scene (no id yet),
//! - deserializing the controller's scene JSON,
//! - parsing local file content with [`SceneRecord::parse`] or
//!   [`SceneRecord::load_file`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::body::SceneBody;
use crate::error::SceneError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// The only object type the controller accepts for script scenes.
pub const LUA_SCENE_TYPE: &str = "com.fibaro.luaScene";

/// File extension of scene source files (without the dot).
pub const LUA_EXTENSION: &str = "lua";

/// Default number of concurrently running instances for new scenes.
pub const DEFAULT_MAX_RUNNING_INSTANCES: i64 = 2;

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// How the controller is allowed to start a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunConfig {
    TriggerAndManual,
    ManualOnly,
    Disabled,
}

impl RunConfig {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TriggerAndManual => "TRIGGER_AND_MANUAL",
            Self::ManualOnly => "MANUAL_ONLY",
            Self::Disabled => "DISABLED",
        }
    }

    /// Parse a run configuration. Returns `None` for unknown values.
    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "TRIGGER_AND_MANUAL" => Some(Self::TriggerAndManual),
            "MANUAL_ONLY" => Some(Self::ManualOnly),
            "DISABLED" => Some(Self::Disabled),
            _ => None,
        }
    }

    /// All valid run configuration values.
    pub const ALL: &'static [&'static str] = &["TRIGGER_AND_MANUAL", "MANUAL_ONLY", "DISABLED"];
}

impl std::fmt::Display for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Scene record
// ---------------------------------------------------------------------------

/// A scene as exchanged with the controller and stored in local files.
///
/// `run_config` and `object_type` stay plain strings: files are hand-edited
/// and may carry values the controller rejects, which [`SceneRecord::validate`]
/// reports instead of silently dropping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRecord {
    /// Controller-assigned id; `None` until the scene has been created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "roomID", default, skip_serializing_if = "is_zero")]
    pub room_id: i64,

    #[serde(rename = "runConfig", default, skip_serializing_if = "String::is_empty")]
    pub run_config: String,

    #[serde(rename = "maxRunningInstances", default, skip_serializing_if = "is_zero")]
    pub max_running_instances: i64,

    /// Full script, including any embedded header blocks.
    #[serde(rename = "lua", default, skip_serializing_if = "SceneBody::is_empty")]
    pub body: SceneBody,

    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub object_type: String,

    #[serde(default)]
    pub autostart: bool,

    #[serde(rename = "isLua", default)]
    pub is_source_file: bool,

    #[serde(default)]
    pub visible: bool,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl Default for SceneRecord {
    /// A blank record with every field at its zero value and no id.
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            room_id: 0,
            run_config: String::new(),
            max_running_instances: 0,
            body: SceneBody::new(),
            object_type: String::new(),
            autostart: false,
            is_source_file: false,
            visible: false,
        }
    }
}

impl SceneRecord {
    /// A record ready for authoring a new scene.
    pub fn new() -> Self {
        Self {
            visible: true,
            run_config: RunConfig::ManualOnly.as_str().to_string(),
            object_type: LUA_SCENE_TYPE.to_string(),
            max_running_instances: DEFAULT_MAX_RUNNING_INSTANCES,
            ..Self::default()
        }
    }

    /// Read a scene source file and parse its embedded header.
    ///
    /// The file is the primary subject of the caller's operation, so any
    /// read failure is returned rather than degraded.
    pub fn load_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read(path).map_err(|e| SceneError::from_io(path, e))?;
        let mut record = Self::new();
        record.parse(&content);
        tracing::debug!(path = %path.display(), scene_id = ?record.id, "Loaded scene file");
        Ok(record)
    }

    /// The id as written on the wire, `-1` when the scene does not exist yet.
    pub fn wire_id(&self) -> i64 {
        self.id.unwrap_or(-1)
    }

    /// `true` when every rule the controller enforces on upload holds.
    pub fn sanity_check(&self) -> bool {
        self.violations().is_empty()
    }

    /// Check the fields the controller enforces, reporting every violation.
    pub fn validate(&self) -> Result<(), SceneError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SceneError::ValidationFailed(violations.join("; ")))
        }
    }

    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if !self.run_config.is_empty() && RunConfig::from_str_value(&self.run_config).is_none() {
            violations.push(format!(
                "runConfig '{}' must be one of {}",
                self.run_config,
                RunConfig::ALL.join(", ")
            ));
        }
        if !self.object_type.is_empty() && self.object_type != LUA_SCENE_TYPE {
            violations.push(format!(
                "type '{}' must be '{LUA_SCENE_TYPE}'",
                self.object_type
            ));
        }
        violations
    }
}

/// File name without directory and extension, e.g. `lights` for `a/lights.lua`.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `true` when `path` carries the scene source extension.
pub fn is_source_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == LUA_EXTENSION)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
