#[cfg(test)]
mod _tests_term {
    use std::sync::Arc;

    use super::super::amplitude::Amplitude;
    use super::super::selector::{hopping_selector, onsite_selector, Constraint, SublatSpec};
    use super::super::term::*;
    use crate::lattice::construction::honeycomb_lattice;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use num_complex::Complex64;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn scalar(amplitude: &Amplitude) -> Complex64 {
        match amplitude {
            Amplitude::Scalar(s) => *s,
            _ => panic!("expected a scalar amplitude"),
        }
    }

    /// Evaluate every term of a model at one candidate and accumulate, the way
    /// the assembly pass would after membership testing.
    fn evaluate_sum(model: &Model, r: &Vector3<f64>, dr: &Vector3<f64>) -> Complex64 {
        model
            .terms()
            .iter()
            .map(|term| match term {
                Term::Onsite(t) => scalar(&t.evaluate(r)),
                Term::Hopping(t) => scalar(&t.evaluate(r, dr)),
            })
            .sum()
    }

    #[test]
    fn test_uniform_term_ignores_position() {
        let model = onsite_term(2.0, onsite_selector());
        let Term::Onsite(term) = &model.terms()[0] else {
            panic!("expected an onsite term");
        };
        assert_eq!(scalar(&term.evaluate(&Vector3::zeros())), c(2.0, 0.0));
        assert_eq!(
            scalar(&term.evaluate(&Vector3::new(5.0, -1.0, 0.0))),
            c(2.0, 0.0)
        );
    }

    #[test]
    fn test_position_dependent_generator() {
        let model = hopping_term(
            HoppingGenerator::from_fn(|r, dr| Amplitude::real(r.x + dr.norm())),
            hopping_selector(),
        );
        let Term::Hopping(term) = &model.terms()[0] else {
            panic!("expected a hopping term");
        };
        let value = term.evaluate(&Vector3::new(0.5, 0.0, 0.0), &Vector3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(scalar(&value).re, 2.5);
    }

    #[test]
    fn test_scalar_multiplication_distributes() {
        let model = onsite_term(1.0, onsite_selector()) + hopping_term(3.0, hopping_selector());
        let r = Vector3::new(0.2, 0.0, 0.0);
        let dr = Vector3::new(1.0, 0.0, 0.0);

        let scaled = model.clone() * c(0.0, 2.0);
        assert_eq!(
            evaluate_sum(&scaled, &r, &dr),
            c(0.0, 2.0) * evaluate_sum(&model, &r, &dr)
        );

        let scaled = 2.5 * model.clone();
        assert_relative_eq!(scaled.terms()[0].coefficient().re, 2.5);
        assert_relative_eq!(scaled.terms()[1].coefficient().re, 2.5);
    }

    #[test]
    fn test_additive_inverse_evaluates_to_zero() {
        let model = onsite_term(1.5, onsite_selector()) + hopping_term(c(0.0, 1.0), hopping_selector());
        let zero_sum = model.clone() + (-model);
        let r = Vector3::new(0.3, 0.4, 0.0);
        let dr = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(evaluate_sum(&zero_sum, &r, &dr), c(0.0, 0.0));
    }

    #[test]
    fn test_subtraction_is_addition_of_negation() {
        let a = onsite_term(2.0, onsite_selector());
        let b = onsite_term(0.5, onsite_selector());
        let difference = a.clone() - b;
        let r = Vector3::zeros();
        assert_eq!(evaluate_sum(&difference, &r, &r), c(1.5, 0.0));
        assert_eq!(difference.terms().len(), 2);
    }

    #[test]
    fn test_addition_preserves_term_order() {
        let model = onsite_term(1.0, onsite_selector())
            + hopping_term(2.0, hopping_selector())
            + onsite_term(3.0, onsite_selector());
        let kinds: Vec<bool> = model
            .terms()
            .iter()
            .map(|t| matches!(t, Term::Onsite(_)))
            .collect();
        assert_eq!(kinds, vec![true, false, true]);
    }

    #[test]
    fn test_is_hermitian_is_conjunction_of_flags() {
        let hermitian = onsite_term(1.0, onsite_selector()) + hopping_term(1.0, hopping_selector());
        assert!(hermitian.is_hermitian());

        let mixed = hermitian
            + hopping_term(1.0, hopping_selector().with_force_hermitian(false));
        assert!(!mixed.is_hermitian());
    }

    #[test]
    fn test_projection_filters_by_kind() {
        let model = onsite_term(1.0, onsite_selector())
            + hopping_term(2.0, hopping_selector())
            + onsite_term(3.0, onsite_selector());

        let onsite_only = only_onsite_terms(&model, None);
        assert_eq!(onsite_only.terms().len(), 2);
        assert!(onsite_only
            .terms()
            .iter()
            .all(|t| matches!(t, Term::Onsite(_))));

        let hopping_only = only_hopping_terms(&model, None);
        assert_eq!(hopping_only.terms().len(), 1);
    }

    #[test]
    fn test_projection_applies_selector_override() {
        let model = onsite_term(1.0, onsite_selector()) + onsite_term(2.0, onsite_selector());
        let override_sel = onsite_selector()
            .try_with_sublats(SublatSpec::Name("B".to_string()))
            .unwrap();
        let projected = only_onsite_terms(&model, Some(&override_sel));
        for term in projected.terms() {
            let Term::Onsite(t) = term else {
                panic!("expected onsite terms only");
            };
            assert_eq!(
                t.selector().sublats(),
                &Constraint::Only(vec!["B".to_string()])
            );
        }
    }

    #[test]
    fn test_model_resolve_binds_every_term() {
        let lat = Arc::new(honeycomb_lattice(1.0).unwrap());
        let model = onsite_term(1.0, onsite_selector()) + hopping_term(2.0, hopping_selector());
        let resolved = model.resolve(&lat).unwrap();
        assert_eq!(resolved.terms().len(), 2);
        assert!(resolved.is_hermitian());
        match &resolved.terms()[1] {
            ResolvedTerm::Hopping(term) => {
                assert!(term.selector().sublat_pairs().is_any());
            }
            _ => panic!("second term must be a hopping term"),
        }
    }

    #[test]
    fn test_display_lists_terms_in_order() {
        let model = onsite_term(1.0, onsite_selector()) + hopping_term(2.0, hopping_selector());
        let shown = format!("{}", model);
        assert!(shown.contains("2 term(s)"));
        let onsite_at = shown.find("onsite").unwrap();
        let hopping_at = shown.find("hopping").unwrap();
        assert!(onsite_at < hopping_at);
    }
}
