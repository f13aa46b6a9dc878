use std::path::PathBuf;

/// Failures surfaced by scene loading, validation and synchronization.
///
/// Malformed header values never show up here: the codec absorbs them into
/// absent fields. Missing include targets are likewise rendered inline.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Scene \"{name}\" with id {id} does not exist on the controller")]
    RemoteConflict { id: i64, name: String },

    #[error("Include expansion still found require statements after {passes} passes (include cycle?)")]
    IncludeDepthExceeded { passes: usize },

    #[error("Remote store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SceneError {
    /// Classify an I/O failure on `path`, keeping "not found" distinct.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Wrap an error reported by a [`crate::sync::SceneStore`] implementation.
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn missing_file_maps_to_file_not_found() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = SceneError::from_io("/tmp/nope.lua", inner);
        assert_matches!(err, SceneError::FileNotFound { .. });
        assert_eq!(err.to_string(), "File not found: /tmp/nope.lua");
    }

    #[test]
    fn other_io_errors_keep_their_source() {
        let inner = std::io::Error::other("boom");
        let err = SceneError::from_io("/tmp/x.lua", inner);
        assert_matches!(err, SceneError::Io { .. });
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn display_remote_conflict() {
        let err = SceneError::RemoteConflict {
            id: 17,
            name: "Hallway".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Scene \"Hallway\" with id 17 does not exist on the controller"
        );
    }
}
