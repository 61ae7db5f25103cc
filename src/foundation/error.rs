use crate::drawable::DrawableId;

/// Convenience result type used across handanim.
pub type HandanimResult<T> = Result<T, HandanimError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every error is reported to the caller; none of them is fatal to the process. A caller
/// rendering a long timeline may skip the offending event or frame and continue.
#[derive(thiserror::Error, Debug)]
pub enum HandanimError {
    /// An animation interval ends before it starts (or is not finite).
    #[error("invalid interval: end {end} is before start {start}")]
    InvalidInterval {
        /// Interval start in seconds.
        start: f64,
        /// Interval end in seconds.
        end: f64,
    },

    /// An event targets a drawable that is not reachable from the scene graph.
    #[error("dangling reference: drawable {0} is not part of the scene")]
    DanglingReference(DrawableId),

    /// A geometry operation appears without a preceding position-establishing operation.
    #[error("malformed sequence: {0}")]
    MalformedSequence(String),

    /// A creation event was attached directly to a group.
    #[error("invalid group event: group {0} cannot carry a creation event")]
    InvalidGroupDeletion(DrawableId),

    /// Invalid user-provided construction data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while evaluating timeline state for a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from collaborators.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandanimError {
    /// Build a [`HandanimError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HandanimError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`HandanimError::MalformedSequence`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSequence(msg.into())
    }

    /// Build a [`HandanimError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
