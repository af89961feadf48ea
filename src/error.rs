//! Error types for the navigation core.

/// Errors surfaced by parsing and navigation.
///
/// Boundary moves (`next()` on the last step, `previous()` on the first)
/// are not errors and never produce one of these.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("malformed {what}: {source}")]
    MalformedInput {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("step (leg {leg}, step {step}) is out of range")]
    OutOfRange { leg: usize, step: usize },

    #[error("flat step {index} is out of range ({len} steps)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("maneuver {maneuver} of step (leg {leg}, step {step}) is out of range")]
    ManeuverOutOfRange {
        leg: usize,
        step: usize,
        maneuver: usize,
    },

    #[error("no route loaded")]
    NoRoute,

    #[error("JSON serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NavError>;

/// Failure reported by an external map renderer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("renderer call failed: {0}")]
pub struct RendererError(pub String);
