
//! Tight-binding model construction library
//!
//! This library provides composable geometric and topological selectors for declaring
//! which onsite energies and which hoppings of a periodic lattice receive a given
//! contribution, a term/model algebra to combine such declarations, and element
//! modifiers that transform already-assembled matrix entries. A separate assembly
//! pass consumes resolved models to populate sparse Bloch Hamiltonians; no matrix
//! storage or numeric linear algebra happens here.

pub mod config;
pub mod error;
pub mod lattice;
pub mod model;

pub use error::{ModelError, Result};
pub use lattice::{CellDistance, Lattice};
pub use model::{
    hopping_modifier, hopping_selector, hopping_term, off_diagonal, only_hopping_terms,
    only_onsite_terms, onsite_modifier, onsite_selector, onsite_term, Amplitude, Model,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
