//! Error types for every stage of a search run.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::options::MAX_QUERY_COMPONENTS;

/// A malformed, out-of-range or contradictory option.
///
/// Each check of the validator fails with its own variant so callers (and
/// tests) can tell exactly which rule was broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Search query cannot be empty (add query-specific options)")]
    EmptyQuery,

    #[error(
        "Query exceeds maximum of {} components (i.e. topic, language, stars, created). See documentation for details.",
        MAX_QUERY_COMPONENTS
    )]
    QueryLimit { components: usize },

    #[error("--{option} must be a number.")]
    NotANumber { option: &'static str },

    #[error("The provided limit is not within the allowed range (1-500).")]
    LimitOutOfRange { limit: i64 },

    #[error("--{option} cannot be negative.")]
    NegativeStars { option: &'static str },

    #[error("--stars-min cannot be greater than --stars-max")]
    StarsMinAboveMax { min: u64, max: u64 },

    #[error("--{option} must have a format of YYYY-MM-DD.")]
    MalformedDate { option: &'static str },

    #[error("--{option} is an invalid date")]
    InvalidDate { option: &'static str },

    #[error("--created-after cannot be in the future")]
    CreatedAfterInFuture,

    #[error("--created-before must not be earlier than --created-after")]
    CreatedBeforePrecedesAfter,

    #[error("Order cannot be configured unless sorting criteria is specified.")]
    OrderWithoutSort,

    #[error("Cannot set output name when output format is stdout.")]
    OutputNameWithStdout,
}

/// Failure to load or save the persisted rate-limit state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("{} is not valid: {source}", path.display())]
    Format {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Failure to write results.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Label printed in front of a failure, naming the stage it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parsing,
    Validation,
    Server,
    Output,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Parsing => "Parsing",
            Stage::Validation => "Validation",
            Stage::Server => "Server",
            Stage::Output => "Output",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum SeekError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(
        "The rate limit of {limit} requests/min has been reached. Please try again in {remaining_secs} seconds."
    )]
    RateLimitActive { limit: u32, remaining_secs: i64 },

    #[error("The rate limit of {limit} requests/min has been reached. Please try again soon.")]
    RateLimitExceeded { limit: u32 },

    #[error("(Forwarded from GitHub:) {0}")]
    Upstream(String),

    #[error("Unexpected response format from GitHub.")]
    UnexpectedResponse,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limit state unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("Confirmation prompt failed: {0}")]
    Prompt(#[source] io::Error),

    #[error("Could not write results: {0}")]
    Output(#[from] OutputError),

    /// The user declined a confirmation. Not a failure.
    #[error("Terminating... No requests sent.")]
    Cancelled,
}

impl SeekError {
    /// The stage label for this error, or `None` for a declined confirmation.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SeekError::Validation(_) => Some(Stage::Validation),
            SeekError::RateLimitActive { .. }
            | SeekError::RateLimitExceeded { .. }
            | SeekError::Upstream(_)
            | SeekError::UnexpectedResponse
            | SeekError::Http(_)
            | SeekError::Store(_) => Some(Stage::Server),
            SeekError::Prompt(_) => Some(Stage::Validation),
            SeekError::Output(_) => Some(Stage::Output),
            SeekError::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SeekError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_name_the_flag() {
        let err = ValidationError::NotANumber { option: "stars-min" };
        assert_eq!(err.to_string(), "--stars-min must be a number.");

        let err = ValidationError::MalformedDate {
            option: "created-before",
        };
        assert_eq!(
            err.to_string(),
            "--created-before must have a format of YYYY-MM-DD."
        );
    }

    #[test]
    fn test_query_limit_is_a_validation_failure() {
        let err: SeekError = ValidationError::QueryLimit { components: 7 }.into();
        assert_eq!(err.stage(), Some(Stage::Validation));
        assert!(err.to_string().contains("maximum of 6 components"));
    }

    #[test]
    fn test_cancellation_has_no_stage() {
        assert_eq!(SeekError::Cancelled.stage(), None);
        assert!(SeekError::Cancelled.is_cancelled());
        assert_eq!(
            SeekError::RateLimitExceeded { limit: 10 }.stage(),
            Some(Stage::Server)
        );
        let disk_full = OutputError::Io {
            path: PathBuf::from("out.json"),
            source: io::Error::other("disk full"),
        };
        assert_eq!(SeekError::from(disk_full).stage(), Some(Stage::Output));
    }

    #[test]
    fn test_store_error_keeps_its_cause() {
        use std::error::Error as _;

        let err = SeekError::from(StoreError::Io {
            path: PathBuf::from("/nowhere/state.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(err.stage(), Some(Stage::Server));
        assert_eq!(
            err.to_string(),
            "Rate limit state unavailable: /nowhere/state.json: denied"
        );

        let store = err.source().expect("store error is the source");
        let io = store.source().expect("io error is the root cause");
        assert_eq!(io.to_string(), "denied");
    }
}
