//! Command-surface errors and their exit codes.

use thiserror::Error;

/// Exit code for bad arguments or input.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for lookup and storage failures.
pub const EXIT_FAILURE: u8 = 1;

/// Failures the command surface reports to the user.
#[derive(Debug, Error)]
pub enum CliError {
    /// Arguments or input were malformed.
    #[error("{0}")]
    Usage(String),

    /// No work item matches the given ID prefix.
    #[error("{0}")]
    NotFound(String),
}

/// Process exit code for an error returned by a command.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<CliError>() {
        Some(CliError::Usage(_)) => EXIT_USAGE,
        Some(CliError::NotFound(_)) | None => EXIT_FAILURE,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;

    #[test]
    fn usage_maps_to_two() {
        let err = anyhow::Error::new(CliError::Usage("bad json".into()));
        assert_eq!(exit_code(&err), EXIT_USAGE);
    }

    #[test]
    fn not_found_and_other_map_to_one() {
        let err = anyhow::Error::new(CliError::NotFound("no work item found matching: 0192".into()));
        assert_eq!(exit_code(&err), EXIT_FAILURE);
        assert_eq!(exit_code(&anyhow::anyhow!("disk full")), EXIT_FAILURE);
    }

    #[test]
    fn context_preserves_kind() {
        let err: anyhow::Result<()> = Err(CliError::Usage("x".into())).context("while parsing");
        assert_eq!(exit_code(&err.unwrap_err()), EXIT_USAGE);
    }
}
