#[cfg(test)]
mod _tests_amplitude {
    use super::super::amplitude::Amplitude;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use num_complex::Complex64;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_scalar_adjoint_conjugates() {
        let a = Amplitude::Scalar(c(1.0, 2.0));
        assert_eq!(a.adjoint(), Amplitude::Scalar(c(1.0, -2.0)));
    }

    #[test]
    fn test_matrix_adjoint_is_conjugate_transpose() {
        let m = DMatrix::from_row_slice(2, 2, &[c(0.0, 0.0), c(0.0, 1.0), c(2.0, 0.0), c(0.0, 0.0)]);
        let adj = Amplitude::Matrix(m).adjoint();
        match adj {
            Amplitude::Matrix(a) => {
                assert_eq!(a[(1, 0)], c(0.0, -1.0));
                assert_eq!(a[(0, 1)], c(2.0, 0.0));
            }
            _ => panic!("adjoint of a matrix must stay a matrix"),
        }
    }

    #[test]
    fn test_scalar_plus_matrix_adds_to_diagonal() {
        let m = DMatrix::from_element(2, 2, c(1.0, 0.0));
        let sum = Amplitude::Scalar(c(3.0, 0.0)) + Amplitude::Matrix(m);
        match sum {
            Amplitude::Matrix(s) => {
                assert_eq!(s[(0, 0)], c(4.0, 0.0));
                assert_eq!(s[(0, 1)], c(1.0, 0.0));
                assert_eq!(s[(1, 1)], c(4.0, 0.0));
            }
            _ => panic!("scalar + matrix must promote to a matrix"),
        }
    }

    #[test]
    fn test_average_symmetrizes() {
        let a = Amplitude::Scalar(c(1.0, 1.0));
        let avg = a.average(&a.adjoint());
        match avg {
            Amplitude::Scalar(s) => {
                assert_relative_eq!(s.re, 1.0);
                assert_relative_eq!(s.im, 0.0);
            }
            _ => panic!("average of scalars must stay scalar"),
        }
    }

    #[test]
    fn test_zero_like_and_negation() {
        let a = Amplitude::Scalar(c(2.0, -1.0));
        assert_eq!(a.clone() + (-a.clone()), a.zero_like());

        let m = Amplitude::Matrix(DMatrix::from_element(2, 3, c(1.0, 0.0)));
        assert_eq!(m.clone() + (-m.clone()), m.zero_like());
    }

    #[test]
    fn test_scaling() {
        let a = Amplitude::real(2.0) * c(0.0, 1.0);
        assert_eq!(a, Amplitude::Scalar(c(0.0, 2.0)));
        assert_eq!(Amplitude::real(2.0) * 1.5, Amplitude::real(3.0));
    }
}
