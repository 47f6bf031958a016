// Lattice module: Contains the periodic lattice collaborator and related functionality
// This module provides the read-only site/sublattice/periodicity data consumed by
// selector resolution and by the external Hamiltonian-assembly pass

// ======================== MODULE DECLARATIONS ========================
pub mod cell_distance;
pub mod construction;
pub mod site_lattice;


// ======================== HARMONIC INDEXING ========================
pub use cell_distance::CellDistance; // struct - integer vector indexing a periodic replica of the home cell
// CellDistance impl methods:
//   new(components: Vec<i32>) -> Self          - creates a cell distance from components
//   zero(rank: usize) -> Self                  - the home cell for a given periodicity rank
//   rank(&self) -> usize                       - number of components
//   components(&self) -> &[i32]                - raw components
//   is_zero(&self) -> bool                     - true for the home cell
//   Sub (&a - &b)                              - component-wise difference

// ======================== LATTICE STRUCTURE ========================
pub use site_lattice::Lattice; // struct - periodic lattice of sites grouped into named sublattices
// Lattice impl methods:
//   new(periodicity, sublat_names, positions, site_sublat) -> Result<Self> - validated construction
//   num_sites(&self) -> usize                                  - sites in the home cell
//   num_sublats(&self) -> usize                                - number of named sublattices
//   rank(&self) -> usize                                       - periodicity rank L
//   position(&self, site) -> Vector3<f64>                      - home-cell site position
//   sublat_of(&self, site) -> usize                            - sublattice ordinal of a site
//   sublat_index(&self, name) -> Option<usize>                 - name → ordinal lookup
//   sublat_name(&self, index) -> &str                          - ordinal → name lookup
//   periodicity_vector(&self, i) -> Vector3<f64>               - Bravais vector i
//   absolute_position(&self, site, dn) -> Result<Vector3<f64>> - position in replica dn
//   bond_geometry(&self, row, col, dn_row, dn_col) -> Result<(r, dr)> - bond center and displacement

// ======================== STANDARD CONSTRUCTIONS ========================
pub use construction::{
    honeycomb_lattice, // fn(a: f64) -> Result<Lattice> - two-sublattice honeycomb lattice
    linear_chain,      // fn(a: f64) -> Result<Lattice> - one-dimensional chain
    square_lattice,    // fn(a: f64) -> Result<Lattice> - single-sublattice square lattice
};
