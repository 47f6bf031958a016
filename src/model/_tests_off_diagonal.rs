#[cfg(test)]
mod _tests_off_diagonal {
    use std::sync::Arc;

    use super::super::off_diagonal::off_diagonal;
    use super::super::selector::{hopping_selector, onsite_selector, Constraint, PairSpec};
    use super::super::term::{hopping_term, onsite_term, ResolvedTerm};
    use crate::error::ModelError;
    use crate::lattice::Lattice;
    use nalgebra::Vector3;

    /// Four sublattices in one cell, intended as two groups of two.
    fn four_sublat_lattice() -> Arc<Lattice> {
        Arc::new(
            Lattice::new(
                &[Vector3::new(4.0, 0.0, 0.0)],
                vec![
                    "A".to_string(),
                    "B".to_string(),
                    "C".to_string(),
                    "D".to_string(),
                ],
                vec![
                    Vector3::new(0.0, 0.0, 0.0),
                    Vector3::new(1.0, 0.0, 0.0),
                    Vector3::new(2.0, 0.0, 0.0),
                    Vector3::new(3.0, 0.0, 0.0),
                ],
                vec![0, 1, 2, 3],
            )
            .unwrap(),
        )
    }

    fn group_of(sublat: usize, group_sizes: &[usize]) -> usize {
        let mut remaining = sublat;
        for (group, &size) in group_sizes.iter().enumerate() {
            if remaining < size {
                return group;
            }
            remaining -= size;
        }
        unreachable!("sublattice outside grouping");
    }

    #[test]
    fn test_group_sizes_must_sum_to_sublattice_count() {
        let lat = four_sublat_lattice();
        let model = hopping_term(1.0, hopping_selector());
        let result = off_diagonal(&model, &lat, &[2, 1]);
        assert!(matches!(
            result,
            Err(ModelError::InvalidGroupSpec { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_onsite_terms_are_rejected() {
        let lat = four_sublat_lattice();
        let model = hopping_term(1.0, hopping_selector()) + onsite_term(1.0, onsite_selector());
        let result = off_diagonal(&model, &lat, &[2, 2]);
        assert!(matches!(
            result,
            Err(ModelError::InvalidModelStructure { .. })
        ));
    }

    #[test]
    fn test_unconstrained_pairs_keep_only_inter_group_pairs() {
        let lat = four_sublat_lattice();
        let groups = [2usize, 2];
        let model = hopping_term(1.0, hopping_selector());
        let restricted = off_diagonal(&model, &lat, &groups).unwrap();

        assert_eq!(restricted.terms().len(), 1);
        let ResolvedTerm::Hopping(term) = &restricted.terms()[0] else {
            panic!("expected a hopping term");
        };
        let Constraint::Only(pairs) = term.selector().sublat_pairs() else {
            panic!("restriction must materialize the pair set");
        };
        // Off-diagonal closure: no surviving pair stays within one group.
        assert!(!pairs.is_empty());
        for &(a, b) in pairs {
            assert_ne!(group_of(a, &groups), group_of(b, &groups));
        }
        // All 2×2×2 ordered cross-group pairs survive.
        assert_eq!(pairs.len(), 8);
    }

    #[test]
    fn test_constrained_pairs_are_filtered() {
        let lat = four_sublat_lattice();
        let model = hopping_term(
            1.0,
            hopping_selector()
                .try_with_sublats(PairSpec::List(vec![
                    PairSpec::Pair("A".to_string(), "B".to_string()), // same group
                    PairSpec::Pair("A".to_string(), "C".to_string()), // cross group
                    PairSpec::Pair("D".to_string(), "B".to_string()), // cross group
                ]))
                .unwrap(),
        );
        let restricted = off_diagonal(&model, &lat, &[2, 2]).unwrap();
        let ResolvedTerm::Hopping(term) = &restricted.terms()[0] else {
            panic!("expected a hopping term");
        };
        assert_eq!(
            term.selector().sublat_pairs(),
            &Constraint::Only(vec![(0, 2), (3, 1)])
        );
    }

    #[test]
    fn test_single_group_leaves_nothing() {
        let lat = four_sublat_lattice();
        let model = hopping_term(1.0, hopping_selector());
        let restricted = off_diagonal(&model, &lat, &[4]).unwrap();
        let ResolvedTerm::Hopping(term) = &restricted.terms()[0] else {
            panic!("expected a hopping term");
        };
        assert_eq!(term.selector().sublat_pairs(), &Constraint::Only(vec![]));
    }
}
