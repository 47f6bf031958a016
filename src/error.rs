//! Error types for tight-binding model construction.

use thiserror::Error;

/// Top-level error type for model construction and resolution.
///
/// Every failure in this crate is immediate and synchronous; sanitization is
/// all-or-nothing per field and no partially-constructed value is ever returned.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Malformed sublattice, region, cell-distance or range argument, raised at
    /// selector construction and never deferred.
    #[error("Invalid selector specification: {reason}")]
    InvalidSelectorSpec { reason: String },

    /// Malformed lattice description (mismatched table lengths, duplicate or
    /// empty sublattice names, out-of-range sublattice assignment).
    #[error("Invalid lattice specification: {reason}")]
    InvalidLatticeSpec { reason: String },

    /// A cell-distance vector's rank disagrees with the lattice's periodicity
    /// rank, raised at resolution.
    #[error("Cell distance rank mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Membership predicate invoked on a still-symbolic selector. The typed
    /// surface makes this unreachable (the predicate is defined only on resolved
    /// selector types); the variant exists so dynamically-driven callers have a
    /// stable code for the contract violation.
    #[error("Membership test invoked on an unresolved selector")]
    UnresolvedSelectorUsed,

    /// An onsite term was passed to the off-diagonal restriction, which is
    /// defined only for hopping terms.
    #[error("Invalid model structure: {reason}")]
    InvalidModelStructure { reason: String },

    /// Sublattice group sizes for the off-diagonal restriction do not sum to the
    /// lattice's sublattice count.
    #[error("Invalid sublattice grouping: group sizes sum to {actual}, lattice has {expected} sublattices")]
    InvalidGroupSpec { expected: usize, actual: usize },
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    pub(crate) fn selector_spec(reason: impl Into<String>) -> Self {
        ModelError::InvalidSelectorSpec { reason: reason.into() }
    }

    pub(crate) fn lattice_spec(reason: impl Into<String>) -> Self {
        ModelError::InvalidLatticeSpec { reason: reason.into() }
    }
}
