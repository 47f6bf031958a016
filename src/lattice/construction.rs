use nalgebra::Vector3;

use crate::error::Result;
use crate::lattice::site_lattice::Lattice;

/// Standard lattice construction utilities for common periodic lattices

/// Create a one-dimensional chain with lattice parameter `a` and a single site
/// per cell on sublattice "A".
pub fn linear_chain(a: f64) -> Result<Lattice> {
    Lattice::new(
        &[Vector3::new(a, 0.0, 0.0)],
        vec!["A".to_string()],
        vec![Vector3::zeros()],
        vec![0],
    )
}

/// Create a square lattice with lattice parameter `a` and a single site per cell
/// on sublattice "A".
pub fn square_lattice(a: f64) -> Result<Lattice> {
    Lattice::new(
        &[Vector3::new(a, 0.0, 0.0), Vector3::new(0.0, a, 0.0)],
        vec!["A".to_string()],
        vec![Vector3::zeros()],
        vec![0],
    )
}

/// Create a honeycomb lattice with lattice parameter `a` and two sublattices
/// "A" and "B". The nearest-neighbor distance is `a / sqrt(3)`.
pub fn honeycomb_lattice(a: f64) -> Result<Lattice> {
    let cos30 = 3.0_f64.sqrt() / 2.0;
    Lattice::new(
        &[
            Vector3::new(a * cos30, a / 2.0, 0.0),
            Vector3::new(-a * cos30, a / 2.0, 0.0),
        ],
        vec!["A".to_string(), "B".to_string()],
        vec![
            Vector3::new(0.0, -a / (2.0 * 3.0_f64.sqrt()), 0.0),
            Vector3::new(0.0, a / (2.0 * 3.0_f64.sqrt()), 0.0),
        ],
        vec![0, 1],
    )
}
