use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::config::BASE_VECTOR_TOLERANCE;
use crate::error::{ModelError, Result};
use crate::lattice::cell_distance::CellDistance;

/// A periodic lattice of sites grouped into named sublattices, embedded in 3D space.
///
/// This is the read-only collaborator consumed by selector resolution and by the
/// external Hamiltonian-assembly pass. It exposes ordered site positions, an
/// ordered table of unique sublattice names, a per-site sublattice assignment and
/// a Bravais matrix whose first `rank` columns are the periodicity vectors.
///
/// # Fields
/// * `positions` - Cartesian site positions within the home unit cell
/// * `site_sublat` - Sublattice ordinal of each site (parallel to `positions`)
/// * `sublat_names` - Ordered, unique sublattice names (name ↔ ordinal table)
/// * `bravais` - Periodicity vectors as the first `rank` columns
/// * `rank` - Number of periodicity vectors (0 ..= 3)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    positions: Vec<Vector3<f64>>,
    site_sublat: Vec<usize>,
    sublat_names: Vec<String>,
    bravais: Matrix3<f64>,
    rank: usize,
}

impl Lattice {
    /// Construct a lattice from periodicity vectors, a sublattice name table, site
    /// positions and the per-site sublattice assignment.
    ///
    /// Validation is all-or-nothing: table lengths must agree, sublattice names
    /// must be unique and non-empty, every assignment must reference an existing
    /// sublattice, and at most three periodicity vectors are accepted.
    pub fn new(
        periodicity: &[Vector3<f64>],
        sublat_names: Vec<String>,
        positions: Vec<Vector3<f64>>,
        site_sublat: Vec<usize>,
    ) -> Result<Self> {
        if periodicity.len() > 3 {
            return Err(ModelError::lattice_spec(format!(
                "at most 3 periodicity vectors supported, got {}",
                periodicity.len()
            )));
        }
        for (i, vector) in periodicity.iter().enumerate() {
            if vector.norm() < BASE_VECTOR_TOLERANCE {
                return Err(ModelError::lattice_spec(format!(
                    "periodicity vector {} is zero or too close to zero",
                    i
                )));
            }
        }
        if positions.len() != site_sublat.len() {
            return Err(ModelError::lattice_spec(format!(
                "{} site positions but {} sublattice assignments",
                positions.len(),
                site_sublat.len()
            )));
        }
        for name in &sublat_names {
            if name.trim().is_empty() {
                return Err(ModelError::lattice_spec("empty sublattice name"));
            }
        }
        for (i, name) in sublat_names.iter().enumerate() {
            if sublat_names[..i].contains(name) {
                return Err(ModelError::lattice_spec(format!(
                    "duplicate sublattice name '{}'",
                    name
                )));
            }
        }
        if let Some(&bad) = site_sublat.iter().find(|&&s| s >= sublat_names.len()) {
            return Err(ModelError::lattice_spec(format!(
                "site assigned to sublattice {} but only {} sublattices exist",
                bad,
                sublat_names.len()
            )));
        }

        let mut bravais = Matrix3::zeros();
        for (i, vector) in periodicity.iter().enumerate() {
            bravais.set_column(i, vector);
        }

        Ok(Lattice {
            positions,
            site_sublat,
            sublat_names,
            bravais,
            rank: periodicity.len(),
        })
    }

    /// Number of sites in the home unit cell.
    pub fn num_sites(&self) -> usize {
        self.positions.len()
    }

    /// Number of named sublattices.
    pub fn num_sublats(&self) -> usize {
        self.sublat_names.len()
    }

    /// Periodicity rank `L` (number of Bravais vectors).
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Cartesian position of a site within the home cell.
    pub fn position(&self, site: usize) -> Vector3<f64> {
        self.positions[site]
    }

    /// Sublattice ordinal of a site.
    pub fn sublat_of(&self, site: usize) -> usize {
        self.site_sublat[site]
    }

    /// Look up a sublattice ordinal by name.
    pub fn sublat_index(&self, name: &str) -> Option<usize> {
        self.sublat_names.iter().position(|n| n == name)
    }

    /// Name of a sublattice ordinal.
    pub fn sublat_name(&self, index: usize) -> &str {
        &self.sublat_names[index]
    }

    /// Ordered sublattice name table.
    pub fn sublat_names(&self) -> &[String] {
        &self.sublat_names
    }

    /// Periodicity vector `i` (column `i` of the Bravais matrix).
    pub fn periodicity_vector(&self, i: usize) -> Vector3<f64> {
        debug_assert!(i < self.rank);
        self.bravais.column(i).into()
    }

    /// Absolute position of a site in the periodic replica indexed by `dn`:
    /// `position(site) + Σ dn_i · a_i`.
    pub fn absolute_position(&self, site: usize, dn: &CellDistance) -> Result<Vector3<f64>> {
        if dn.rank() != self.rank {
            return Err(ModelError::DimensionMismatch {
                expected: self.rank,
                actual: dn.rank(),
            });
        }
        let mut r = self.positions[site];
        for (i, &n) in dn.components().iter().enumerate() {
            r += (n as f64) * self.bravais.column(i);
        }
        Ok(r)
    }

    /// Bond center and displacement for a candidate hopping: `dr` points from the
    /// column site to the row site, `r` is the midpoint of the two absolute
    /// positions.
    pub fn bond_geometry(
        &self,
        row: usize,
        col: usize,
        dn_row: &CellDistance,
        dn_col: &CellDistance,
    ) -> Result<(Vector3<f64>, Vector3<f64>)> {
        let row_abs = self.absolute_position(row, dn_row)?;
        let col_abs = self.absolute_position(col, dn_col)?;
        let dr = row_abs - col_abs;
        let r = (row_abs + col_abs) / 2.0;
        Ok((r, dr))
    }
}
