//! Errors raised at the edges of the pipeline
//!
//! The pipeline itself is total; only text coming in from the event feed and command
//! tokens read back from a transport can be rejected.

use thiserror::Error;

/// A line of the event feed could not be understood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseEventError {
    /// The line has no timestamp field
    #[error("missing timestamp")]
    MissingTimestamp,
    /// The timestamp is not an unsigned integer
    #[error("invalid timestamp")]
    InvalidTimestamp,
    /// The line has a timestamp but no event kind
    #[error("missing event kind")]
    MissingKind,
    /// The event kind is not part of the feed protocol
    #[error("unknown event kind")]
    UnknownKind,
    /// A required field is absent
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// A numeric field could not be parsed
    #[error("invalid number in field `{0}`")]
    InvalidNumber(&'static str),
    /// The pose name is not one of the armband poses
    #[error("unknown pose name")]
    UnknownPose,
    /// The arm name is not `left`, `right` or `unknown`
    #[error("unknown arm name")]
    UnknownArm,
    /// Extra fields follow a complete event
    #[error("unexpected trailing fields")]
    TrailingFields,
}

/// A command token is not part of the vehicle vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown command token")]
pub struct ParseCommandError;
