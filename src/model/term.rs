use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use nalgebra::{DMatrix, Vector3};
use num_complex::Complex64;

use crate::error::Result;
use crate::lattice::Lattice;
use crate::model::amplitude::Amplitude;
use crate::model::selector::{
    HoppingSelector, OnsiteSelector, ResolvedHoppingSelector, ResolvedOnsiteSelector,
};

/// Value generator of an onsite term. The arity is fixed at construction; no
/// callable introspection happens anywhere.
#[derive(Clone)]
pub enum OnsiteGenerator {
    /// Position-independent value.
    Uniform(Amplitude),
    /// Value computed from the site's absolute position.
    Position(Arc<dyn Fn(&Vector3<f64>) -> Amplitude + Send + Sync>),
}

impl OnsiteGenerator {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Vector3<f64>) -> Amplitude + Send + Sync + 'static,
    {
        OnsiteGenerator::Position(Arc::new(f))
    }
}

impl From<Amplitude> for OnsiteGenerator {
    fn from(value: Amplitude) -> Self {
        OnsiteGenerator::Uniform(value)
    }
}

impl From<Complex64> for OnsiteGenerator {
    fn from(value: Complex64) -> Self {
        OnsiteGenerator::Uniform(Amplitude::Scalar(value))
    }
}

impl From<f64> for OnsiteGenerator {
    fn from(value: f64) -> Self {
        OnsiteGenerator::Uniform(Amplitude::real(value))
    }
}

impl From<DMatrix<Complex64>> for OnsiteGenerator {
    fn from(value: DMatrix<Complex64>) -> Self {
        OnsiteGenerator::Uniform(Amplitude::Matrix(value))
    }
}

impl fmt::Debug for OnsiteGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnsiteGenerator::Uniform(amplitude) => {
                f.debug_tuple("Uniform").field(amplitude).finish()
            }
            OnsiteGenerator::Position(_) => f.debug_tuple("Position").field(&"<fn>").finish(),
        }
    }
}

/// Value generator of a hopping term, over the bond center and displacement.
#[derive(Clone)]
pub enum HoppingGenerator {
    Uniform(Amplitude),
    Position(Arc<dyn Fn(&Vector3<f64>, &Vector3<f64>) -> Amplitude + Send + Sync>),
}

impl HoppingGenerator {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Vector3<f64>, &Vector3<f64>) -> Amplitude + Send + Sync + 'static,
    {
        HoppingGenerator::Position(Arc::new(f))
    }
}

impl From<Amplitude> for HoppingGenerator {
    fn from(value: Amplitude) -> Self {
        HoppingGenerator::Uniform(value)
    }
}

impl From<Complex64> for HoppingGenerator {
    fn from(value: Complex64) -> Self {
        HoppingGenerator::Uniform(Amplitude::Scalar(value))
    }
}

impl From<f64> for HoppingGenerator {
    fn from(value: f64) -> Self {
        HoppingGenerator::Uniform(Amplitude::real(value))
    }
}

impl From<DMatrix<Complex64>> for HoppingGenerator {
    fn from(value: DMatrix<Complex64>) -> Self {
        HoppingGenerator::Uniform(Amplitude::Matrix(value))
    }
}

impl fmt::Debug for HoppingGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoppingGenerator::Uniform(amplitude) => {
                f.debug_tuple("Uniform").field(amplitude).finish()
            }
            HoppingGenerator::Position(_) => f.debug_tuple("Position").field(&"<fn>").finish(),
        }
    }
}

// ======================== TERMS ========================

/// Onsite contribution: a value generator gated by a selector, scaled by a
/// coefficient. Evaluation and membership testing are always two separate calls;
/// the generator is never composed with the selector implicitly.
#[derive(Debug, Clone)]
pub struct OnsiteTerm {
    generator: OnsiteGenerator,
    selector: OnsiteSelector,
    coefficient: Complex64,
}

impl OnsiteTerm {
    /// The term's value at a site's absolute position. Uniform generators ignore
    /// the position.
    pub fn evaluate(&self, r: &Vector3<f64>) -> Amplitude {
        match &self.generator {
            OnsiteGenerator::Uniform(amplitude) => amplitude.clone() * self.coefficient,
            OnsiteGenerator::Position(f) => f(r) * self.coefficient,
        }
    }

    pub fn selector(&self) -> &OnsiteSelector {
        &self.selector
    }

    pub fn coefficient(&self) -> Complex64 {
        self.coefficient
    }

    fn scaled(&self, factor: Complex64) -> OnsiteTerm {
        OnsiteTerm {
            generator: self.generator.clone(),
            selector: self.selector.clone(),
            coefficient: self.coefficient * factor,
        }
    }

    fn with_selector(&self, selector: OnsiteSelector) -> OnsiteTerm {
        OnsiteTerm {
            generator: self.generator.clone(),
            selector,
            coefficient: self.coefficient,
        }
    }
}

/// Hopping contribution: a value generator over bond center and displacement,
/// gated by a hopping selector, scaled by a coefficient.
#[derive(Debug, Clone)]
pub struct HoppingTerm {
    generator: HoppingGenerator,
    selector: HoppingSelector,
    coefficient: Complex64,
}

impl HoppingTerm {
    pub fn evaluate(&self, r: &Vector3<f64>, dr: &Vector3<f64>) -> Amplitude {
        match &self.generator {
            HoppingGenerator::Uniform(amplitude) => amplitude.clone() * self.coefficient,
            HoppingGenerator::Position(f) => f(r, dr) * self.coefficient,
        }
    }

    pub fn selector(&self) -> &HoppingSelector {
        &self.selector
    }

    pub fn coefficient(&self) -> Complex64 {
        self.coefficient
    }

    pub(crate) fn generator(&self) -> &HoppingGenerator {
        &self.generator
    }

    fn scaled(&self, factor: Complex64) -> HoppingTerm {
        HoppingTerm {
            generator: self.generator.clone(),
            selector: self.selector.clone(),
            coefficient: self.coefficient * factor,
        }
    }

    fn with_selector(&self, selector: HoppingSelector) -> HoppingTerm {
        HoppingTerm {
            generator: self.generator.clone(),
            selector,
            coefficient: self.coefficient,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Term {
    Onsite(OnsiteTerm),
    Hopping(HoppingTerm),
}

impl Term {
    pub fn coefficient(&self) -> Complex64 {
        match self {
            Term::Onsite(term) => term.coefficient,
            Term::Hopping(term) => term.coefficient,
        }
    }

    pub fn force_hermitian(&self) -> bool {
        match self {
            Term::Onsite(term) => term.selector.force_hermitian(),
            Term::Hopping(term) => term.selector.force_hermitian(),
        }
    }

    fn scaled(&self, factor: Complex64) -> Term {
        match self {
            Term::Onsite(term) => Term::Onsite(term.scaled(factor)),
            Term::Hopping(term) => Term::Hopping(term.scaled(factor)),
        }
    }
}

// ======================== MODEL ========================

/// Ordered collection of terms with a scaling/addition algebra. Order affects
/// only display, never any algebraic law.
#[derive(Debug, Clone, Default)]
pub struct Model {
    terms: Vec<Term>,
}

/// Build a single-term model contributing `value` to the onsite energies selected
/// by `selector`.
pub fn onsite_term(value: impl Into<OnsiteGenerator>, selector: OnsiteSelector) -> Model {
    Model {
        terms: vec![Term::Onsite(OnsiteTerm {
            generator: value.into(),
            selector,
            coefficient: Complex64::new(1.0, 0.0),
        })],
    }
}

/// Build a single-term model contributing `value` to the hoppings selected by
/// `selector`.
pub fn hopping_term(value: impl Into<HoppingGenerator>, selector: HoppingSelector) -> Model {
    Model {
        terms: vec![Term::Hopping(HoppingTerm {
            generator: value.into(),
            selector,
            coefficient: Complex64::new(1.0, 0.0),
        })],
    }
}

impl Model {
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Structural Hermiticity declaration: the conjunction of every term
    /// selector's `force_hermitian` flag. This is not a runtime check of actual
    /// values.
    pub fn is_hermitian(&self) -> bool {
        self.terms.iter().all(|term| term.force_hermitian())
    }

    /// Resolve every term's selector against `lattice`, producing the
    /// assembler-facing [`ResolvedModel`].
    pub fn resolve(&self, lattice: &Arc<Lattice>) -> Result<ResolvedModel> {
        let terms = self
            .terms
            .iter()
            .map(|term| match term {
                Term::Onsite(t) => Ok(ResolvedTerm::Onsite(ResolvedOnsiteTerm {
                    generator: t.generator.clone(),
                    coefficient: t.coefficient,
                    selector: t.selector.resolve(lattice)?,
                })),
                Term::Hopping(t) => Ok(ResolvedTerm::Hopping(ResolvedHoppingTerm {
                    generator: t.generator.clone(),
                    coefficient: t.coefficient,
                    selector: t.selector.resolve(lattice)?,
                })),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ResolvedModel { terms })
    }
}

/// Project a model onto its onsite terms. A selector override, when given, is
/// merged into every surviving term's selector (override fields win where
/// constrained).
pub fn only_onsite_terms(model: &Model, override_sel: Option<&OnsiteSelector>) -> Model {
    let terms = model
        .terms
        .iter()
        .filter_map(|term| match term {
            Term::Onsite(t) => Some(match override_sel {
                Some(ov) => Term::Onsite(t.with_selector(t.selector.merge(ov))),
                None => Term::Onsite(t.clone()),
            }),
            Term::Hopping(_) => None,
        })
        .collect();
    Model { terms }
}

/// Project a model onto its hopping terms, with an optional selector override.
pub fn only_hopping_terms(model: &Model, override_sel: Option<&HoppingSelector>) -> Model {
    let terms = model
        .terms
        .iter()
        .filter_map(|term| match term {
            Term::Hopping(t) => Some(match override_sel {
                Some(ov) => Term::Hopping(t.with_selector(t.selector.merge(ov))),
                None => Term::Hopping(t.clone()),
            }),
            Term::Onsite(_) => None,
        })
        .collect();
    Model { terms }
}

impl Add for Model {
    type Output = Model;

    /// Concatenates term sequences, preserving relative order.
    fn add(mut self, mut other: Model) -> Model {
        self.terms.append(&mut other.terms);
        self
    }
}

impl Sub for Model {
    type Output = Model;

    fn sub(self, other: Model) -> Model {
        self + (-other)
    }
}

impl Neg for Model {
    type Output = Model;

    fn neg(self) -> Model {
        self * Complex64::new(-1.0, 0.0)
    }
}

impl Mul<Complex64> for Model {
    type Output = Model;

    /// Scalar multiplication distributes over every term's coefficient.
    fn mul(self, factor: Complex64) -> Model {
        Model {
            terms: self.terms.iter().map(|term| term.scaled(factor)).collect(),
        }
    }
}

impl Mul<f64> for Model {
    type Output = Model;

    fn mul(self, factor: f64) -> Model {
        self * Complex64::new(factor, 0.0)
    }
}

impl Mul<Model> for Complex64 {
    type Output = Model;

    fn mul(self, model: Model) -> Model {
        model * self
    }
}

impl Mul<Model> for f64 {
    type Output = Model;

    fn mul(self, model: Model) -> Model {
        model * self
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model with {} term(s):", self.terms.len())?;
        for term in &self.terms {
            match term {
                Term::Onsite(t) => {
                    writeln!(f, "  onsite  (coefficient {})", t.coefficient)?;
                }
                Term::Hopping(t) => {
                    writeln!(f, "  hopping (coefficient {})", t.coefficient)?;
                }
            }
        }
        Ok(())
    }
}

// ======================== RESOLVED MODEL ========================

/// Onsite term bound to a lattice, ready for membership testing and evaluation
/// by the assembly pass.
#[derive(Debug, Clone)]
pub struct ResolvedOnsiteTerm {
    generator: OnsiteGenerator,
    coefficient: Complex64,
    selector: ResolvedOnsiteSelector,
}

impl ResolvedOnsiteTerm {
    pub fn evaluate(&self, r: &Vector3<f64>) -> Amplitude {
        match &self.generator {
            OnsiteGenerator::Uniform(amplitude) => amplitude.clone() * self.coefficient,
            OnsiteGenerator::Position(f) => f(r) * self.coefficient,
        }
    }

    pub fn selector(&self) -> &ResolvedOnsiteSelector {
        &self.selector
    }
}

/// Hopping term bound to a lattice.
#[derive(Debug, Clone)]
pub struct ResolvedHoppingTerm {
    generator: HoppingGenerator,
    coefficient: Complex64,
    selector: ResolvedHoppingSelector,
}

impl ResolvedHoppingTerm {
    pub fn evaluate(&self, r: &Vector3<f64>, dr: &Vector3<f64>) -> Amplitude {
        match &self.generator {
            HoppingGenerator::Uniform(amplitude) => amplitude.clone() * self.coefficient,
            HoppingGenerator::Position(f) => f(r, dr) * self.coefficient,
        }
    }

    pub fn selector(&self) -> &ResolvedHoppingSelector {
        &self.selector
    }

    pub(crate) fn from_parts(
        generator: HoppingGenerator,
        coefficient: Complex64,
        selector: ResolvedHoppingSelector,
    ) -> Self {
        ResolvedHoppingTerm {
            generator,
            coefficient,
            selector,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ResolvedTerm {
    Onsite(ResolvedOnsiteTerm),
    Hopping(ResolvedHoppingTerm),
}

impl ResolvedTerm {
    pub fn force_hermitian(&self) -> bool {
        match self {
            ResolvedTerm::Onsite(term) => term.selector.force_hermitian(),
            ResolvedTerm::Hopping(term) => term.selector.force_hermitian(),
        }
    }
}

/// Model with every selector bound to one lattice. The assembly collaborator
/// iterates the terms in order and, for each candidate site or bond, first tests
/// the term's resolved selector and only then evaluates and accumulates the
/// value; no implicit gating happens here.
#[derive(Debug, Clone)]
pub struct ResolvedModel {
    terms: Vec<ResolvedTerm>,
}

impl ResolvedModel {
    pub fn terms(&self) -> &[ResolvedTerm] {
        &self.terms
    }

    pub fn is_hermitian(&self) -> bool {
        self.terms.iter().all(|term| term.force_hermitian())
    }

    pub(crate) fn from_terms(terms: Vec<ResolvedTerm>) -> Self {
        ResolvedModel { terms }
    }
}
