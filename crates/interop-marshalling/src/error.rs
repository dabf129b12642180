//! Ordering Error Types
//!
//! The marshalling model itself cannot fail. Ordering a whole signature by
//! its dependencies can, when the elements do not form a valid graph.

use interop_types::PositionKey;
use smol_str::SmolStr;
use thiserror::Error;

/// Result type for dependency ordering
pub type OrderingResult<T> = Result<T, OrderingError>;

/// Reasons a signature cannot be ordered by dependencies
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    /// Two elements claim the same signature position
    #[error("duplicate signature position: {key}")]
    DuplicatePosition {
        /// The position claimed twice
        key: PositionKey,
    },

    /// An element depends on a position that is not part of the signature
    #[error("element `{dependent}` depends on {missing}, which is not part of the signature")]
    UnknownDependency {
        /// Identifier of the element with the dangling dependency
        dependent: SmolStr,
        /// The position nothing in the signature occupies
        missing: PositionKey,
    },

    /// Elements depend on each other in a cycle
    #[error("dependency cycle between elements: {}", .elements.join(", "))]
    Cycle {
        /// Identifiers of the elements on a cycle, in signature order. Elements
        /// that merely wait on a cycle are left out.
        elements: Vec<SmolStr>,
    },
}
