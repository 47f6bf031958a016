// Constants

// Tolerances
pub const BASE_VECTOR_TOLERANCE: f64 = 1e-10; // For construction of Bravais matrices
pub const LATTICE_TOLERANCE: f64 = 1e-10; // For most lattice operations

/// Slack added to a finite hopping range at construction so that a bond of length
/// exactly `range` is still accepted after floating-point rounding. Equal to
/// sqrt(f64::EPSILON); kept as a literal because `f64::sqrt` is not const.
pub const RANGE_TOLERANCE: f64 = 1.490_116_119_384_765_6e-8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_tolerance_is_sqrt_epsilon() {
        assert_eq!(RANGE_TOLERANCE, f64::EPSILON.sqrt());
    }
}
