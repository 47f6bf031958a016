use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// Integer vector indexing a periodic replica ("harmonic") of the home unit cell.
///
/// The number of components must equal the periodicity rank `L` of the lattice a
/// selector is resolved against; the rank check happens at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellDistance(Vec<i32>);

impl CellDistance {
    /// Create a cell distance from its integer components.
    pub fn new(components: Vec<i32>) -> Self {
        CellDistance(components)
    }

    /// The home cell for a lattice of periodicity rank `rank`.
    pub fn zero(rank: usize) -> Self {
        CellDistance(vec![0; rank])
    }

    /// Number of components (must match the lattice periodicity rank).
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn components(&self) -> &[i32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }
}

impl From<Vec<i32>> for CellDistance {
    fn from(components: Vec<i32>) -> Self {
        CellDistance(components)
    }
}

impl From<&[i32]> for CellDistance {
    fn from(components: &[i32]) -> Self {
        CellDistance(components.to_vec())
    }
}

impl Sub for &CellDistance {
    type Output = CellDistance;

    /// Component-wise difference. Both operands must have the same rank.
    fn sub(self, other: &CellDistance) -> CellDistance {
        debug_assert_eq!(self.rank(), other.rank());
        CellDistance(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| a - b)
                .collect(),
        )
    }
}

impl fmt::Display for CellDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}
