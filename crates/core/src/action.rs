//! Commands that can be triggered on a scene.

use serde::{Deserialize, Serialize};

/// Action sent to `/scenes/{id}/action/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneAction {
    Start,
    Stop,
    Enable,
    Disable,
}

impl SceneAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }

    /// Parse an action name. Returns `None` for unknown values.
    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            "enable" => Some(Self::Enable),
            "disable" => Some(Self::Disable),
            _ => None,
        }
    }

    /// Whether the action runs the scene (and so may produce debug output).
    pub fn runs_scene(&self) -> bool {
        matches!(self, Self::Start | Self::Stop)
    }

    pub const ALL: &'static [&'static str] = &["start", "stop", "enable", "disable"];
}

impl std::fmt::Display for SceneAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SceneAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneAction::from_str_value(s)
            .ok_or_else(|| format!("unknown action '{s}', expected one of {}", Self::ALL.join(", ")))
    }
}
