//! Validation errors

use crate::float_types::Real;

/// Preconditions a parameter set must meet before any solid is built.
///
/// Construction itself never fails: every check that could leave a radius
/// negative or a wall empty happens here, up front.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A length that must be strictly positive is zero, negative or not finite
    #[error("(NonPositive) {name} must be a positive length, got {value}")]
    NonPositive { name: &'static str, value: Real },
    /// Fewer than one engaged thread turn
    #[error("(TooFewTurns) at least one thread turn is required, got {0}")]
    TooFewTurns(u32),
    /// The wall eats the whole camera-side radius
    #[error("(WallTooThick) wall thickness {wall} must stay below {limit}")]
    WallTooThick { wall: Real, limit: Real },
    /// The camera-side bore reaches the thread root, leaving the sleeve empty
    #[error("(SleeveWithoutWall) bore radius {bore} reaches the thread root radius {root}")]
    SleeveWithoutWall { root: Real, bore: Real },
    /// A thread shorter than one pitch has no full crest
    #[error("(EngagementShorterThanPitch) thread length {length} is shorter than its pitch {pitch}")]
    EngagementShorterThanPitch { length: Real, pitch: Real },
    /// The internal thread does not fit inside the lens socket
    #[error("(ThreadExceedsSocket) lens thread length {thread} exceeds socket height {socket}")]
    ThreadExceedsSocket { thread: Real, socket: Real },
    /// The cone is too short to seat a fused socket inside its wide end
    #[error("(ConeTooShort) cone height {height} must exceed {required} to seat the socket")]
    ConeTooShort { height: Real, required: Real },
    /// Round primitives need a minimum number of facets to stay convex and closed
    #[error("(TooFewSegments) at least 8 segments are required, got {0}")]
    TooFewSegments(usize),
    /// A tuning constant is outside its usable range
    #[error("(Tuning) {0}")]
    Tuning(String),
}

/// Returns `Err(NonPositive)` unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: Real) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositive { name, value })
    }
}
