use std::path::PathBuf;

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while converting or persisting records.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// No registered blueprint accepted a record.
    #[error("no registered {capability} blueprint accepts a record of type \"{}\"", .kind.as_deref().unwrap_or("<untyped>"))]
    NoMatchingBlueprint {
        /// The capability the registry serves, e.g. `modification`.
        capability: String,
        /// The record's `type` tag, if it had one.
        kind: Option<String>,
    },

    /// A required field is missing, has the wrong shape, or names an unknown value.
    #[error("malformed record: field \"{field}\" {reason}")]
    MalformedRecord {
        /// Offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A relative modification record wraps another relative modification.
    #[error("invalid composition: {0}")]
    InvalidComposition(String),

    /// An artifact without an id cannot be stored.
    #[error("{artifact} has no id and cannot be saved")]
    MissingIdentifier {
        /// What kind of artifact, e.g. `schematic`.
        artifact: String,
    },

    /// An id that cannot be used as a file name.
    #[error("invalid id \"{0}\": use letters, digits, '-' or '_'")]
    InvalidIdentifier(String),

    /// A value whose kind has no blueprint, or whose blueprint rejects it.
    #[error("cannot serialize {kind}: {reason}")]
    Unserializable {
        /// Kind tag of the value.
        kind: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A store path exists but is not a directory.
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    /// Filesystem failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Text that is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// A [`CodecError::MalformedRecord`] for `field`.
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// A [`CodecError::MalformedRecord`] for a missing `field`.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::malformed(field, "is missing")
    }

    /// Whether this error describes a single bad record rather than an
    /// environment failure.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            Self::NoMatchingBlueprint { .. }
                | Self::MalformedRecord { .. }
                | Self::InvalidComposition(_)
                | Self::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_matching_blueprint_message() {
        let typed = CodecError::NoMatchingBlueprint {
            capability: "modification".into(),
            kind: Some("teleport".into()),
        };
        assert_eq!(
            typed.to_string(),
            "no registered modification blueprint accepts a record of type \"teleport\""
        );
        let untyped = CodecError::NoMatchingBlueprint {
            capability: "transition".into(),
            kind: None,
        };
        assert!(untyped.to_string().contains("<untyped>"));
    }

    #[test]
    fn malformed_helpers() {
        let err = CodecError::missing("vector");
        assert_eq!(err.to_string(), "malformed record: field \"vector\" is missing");
        assert!(err.is_record_error());
        assert!(!CodecError::NotADirectory("x".into()).is_record_error());
    }
}
