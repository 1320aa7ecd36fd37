//! Error taxonomy for the level-synthesis pipeline (spec §7).

use std::fmt;

/// Errors produced by the generation pipeline.
///
/// Every variant corresponds to a row of the error taxonomy table in §7 of
/// the specification. Errors are wrapped with the originating component's
/// name as they propagate (see [`Error::wrap`]) so the failure path is
/// recoverable from the message/source chain.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A parameter failed validation (out-of-range difficulty, minRooms >
    /// maxRooms, dimensions below the generator's minimum, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Lookup of a biome definition failed.
    #[error("unknown biome: {0}")]
    UnknownBiome(String),

    /// Lookup of a registered generator failed.
    #[error("unknown generator: {0}")]
    UnknownGenerator(String),

    /// A required key was absent from `constraints`.
    #[error("missing constraint key: {0}")]
    MissingConstraint(String),

    /// A `constraints` value was present but of the wrong shape.
    #[error("invalid constraint value for `{key}`: expected {expected}")]
    InvalidConstraint {
        key: String,
        expected: &'static str,
    },

    /// Post-enforcement connectivity graph is still disconnected, or no
    /// entrance/exit room exists (I3/I5/I6 violation).
    #[error("connectivity enforcement failed: {0}")]
    ConnectivityFailed(String),

    /// The caller's cancellation token fired mid-generation.
    #[error("generation cancelled")]
    Cancelled,

    /// Wraps an upstream error with the name of the component that observed
    /// it, so the path from entry to failure can be read off the message.
    #[error("{component}: {source}")]
    Wrapped {
        component: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap `self` with the name of the component that is propagating it.
    pub fn wrap(self, component: &'static str) -> Error {
        Error::Wrapped {
            component,
            source: Box::new(self),
        }
    }

    /// Convenience constructor for parameter-validation failures.
    pub fn invalid_parameter(msg: impl fmt::Display) -> Error {
        Error::InvalidParameter(msg.to_string())
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
