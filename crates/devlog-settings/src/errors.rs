//! Settings errors.

use thiserror::Error;

/// Settings load and validation failures.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("cannot read devlog settings: {0}")]
    Io(#[from] std::io::Error),
    /// The settings file is not valid JSON, or does not fit the schema.
    #[error("malformed devlog settings: {0}")]
    Json(#[from] serde_json::Error),
    /// A value parsed but is out of range.
    #[error("devlog setting out of range: {0}")]
    InvalidValue(String),
}

/// Result alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_is_json_error() {
        let err: SettingsError = serde_json::from_str::<crate::DevlogSettings>(r#"{"storage": 3}"#)
            .unwrap_err()
            .into();
        assert!(matches!(err, SettingsError::Json(_)));
        assert!(err.to_string().starts_with("malformed devlog settings"));
    }

    #[test]
    fn out_of_range_message_names_the_key() {
        let err = SettingsError::InvalidValue("status.sliceLimit must be at least 1".into());
        assert_eq!(
            err.to_string(),
            "devlog setting out of range: status.sliceLimit must be at least 1"
        );
    }
}
