use std::ops::{Add, Mul, Neg};

use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Value of a single Hamiltonian matrix entry.
///
/// Scalar entries cover single-orbital sites; matrix entries carry the orbital
/// block of multi-orbital sites. Mixed scalar/matrix arithmetic treats the scalar
/// as a multiple of the identity so the model algebra stays total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Amplitude {
    Scalar(Complex64),
    Matrix(DMatrix<Complex64>),
}

impl Amplitude {
    /// Real scalar entry.
    pub fn real(value: f64) -> Self {
        Amplitude::Scalar(Complex64::new(value, 0.0))
    }

    /// Hermitian adjoint: complex conjugate for scalars, conjugate transpose for
    /// matrix blocks.
    pub fn adjoint(&self) -> Amplitude {
        match self {
            Amplitude::Scalar(s) => Amplitude::Scalar(s.conj()),
            Amplitude::Matrix(m) => Amplitude::Matrix(m.adjoint()),
        }
    }

    /// Arithmetic mean of two amplitudes, used for Hermitian symmetrization.
    pub fn average(&self, other: &Amplitude) -> Amplitude {
        (self.clone() + other.clone()) * 0.5
    }

    /// The additive identity with the same shape as `self`.
    pub fn zero_like(&self) -> Amplitude {
        match self {
            Amplitude::Scalar(_) => Amplitude::Scalar(Complex64::new(0.0, 0.0)),
            Amplitude::Matrix(m) => Amplitude::Matrix(DMatrix::zeros(m.nrows(), m.ncols())),
        }
    }

    fn add_scalar_to_diagonal(m: &DMatrix<Complex64>, s: Complex64) -> DMatrix<Complex64> {
        let mut out = m.clone();
        for i in 0..m.nrows().min(m.ncols()) {
            out[(i, i)] += s;
        }
        out
    }
}

impl From<Complex64> for Amplitude {
    fn from(value: Complex64) -> Self {
        Amplitude::Scalar(value)
    }
}

impl From<f64> for Amplitude {
    fn from(value: f64) -> Self {
        Amplitude::real(value)
    }
}

impl From<DMatrix<Complex64>> for Amplitude {
    fn from(value: DMatrix<Complex64>) -> Self {
        Amplitude::Matrix(value)
    }
}

impl Add for Amplitude {
    type Output = Amplitude;

    fn add(self, other: Amplitude) -> Amplitude {
        match (self, other) {
            (Amplitude::Scalar(a), Amplitude::Scalar(b)) => Amplitude::Scalar(a + b),
            (Amplitude::Matrix(a), Amplitude::Matrix(b)) => Amplitude::Matrix(a + b),
            (Amplitude::Scalar(s), Amplitude::Matrix(m))
            | (Amplitude::Matrix(m), Amplitude::Scalar(s)) => {
                Amplitude::Matrix(Amplitude::add_scalar_to_diagonal(&m, s))
            }
        }
    }
}

impl Mul<Complex64> for Amplitude {
    type Output = Amplitude;

    fn mul(self, factor: Complex64) -> Amplitude {
        match self {
            Amplitude::Scalar(s) => Amplitude::Scalar(s * factor),
            Amplitude::Matrix(m) => Amplitude::Matrix(m * factor),
        }
    }
}

impl Mul<f64> for Amplitude {
    type Output = Amplitude;

    fn mul(self, factor: f64) -> Amplitude {
        self * Complex64::new(factor, 0.0)
    }
}

impl Neg for Amplitude {
    type Output = Amplitude;

    fn neg(self) -> Amplitude {
        self * Complex64::new(-1.0, 0.0)
    }
}
