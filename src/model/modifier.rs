use std::fmt;
use std::sync::Arc;

use nalgebra::Vector3;

use crate::error::Result;
use crate::lattice::Lattice;
use crate::model::amplitude::Amplitude;
use crate::model::selector::{
    HoppingSelector, OnsiteSelector, ResolvedHoppingSelector, ResolvedOnsiteSelector,
};

/// Transforming function of an onsite element modifier. Whether the function
/// sees the site position is declared here, at construction; no callable
/// introspection happens anywhere.
#[derive(Clone)]
pub enum OnsiteMapping {
    Plain(Arc<dyn Fn(&Amplitude) -> Amplitude + Send + Sync>),
    Position(Arc<dyn Fn(&Amplitude, &Vector3<f64>) -> Amplitude + Send + Sync>),
}

impl OnsiteMapping {
    pub fn plain<F>(f: F) -> Self
    where
        F: Fn(&Amplitude) -> Amplitude + Send + Sync + 'static,
    {
        OnsiteMapping::Plain(Arc::new(f))
    }

    pub fn position<F>(f: F) -> Self
    where
        F: Fn(&Amplitude, &Vector3<f64>) -> Amplitude + Send + Sync + 'static,
    {
        OnsiteMapping::Position(Arc::new(f))
    }

    fn apply(&self, value: &Amplitude, r: &Vector3<f64>) -> Amplitude {
        match self {
            OnsiteMapping::Plain(f) => f(value),
            OnsiteMapping::Position(f) => f(value, r),
        }
    }
}

impl fmt::Debug for OnsiteMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnsiteMapping::Plain(_) => write!(f, "OnsiteMapping::Plain(<fn>)"),
            OnsiteMapping::Position(_) => write!(f, "OnsiteMapping::Position(<fn>)"),
        }
    }
}

/// Transforming function of a hopping element modifier, optionally over the bond
/// center and displacement.
#[derive(Clone)]
pub enum HoppingMapping {
    Plain(Arc<dyn Fn(&Amplitude) -> Amplitude + Send + Sync>),
    Position(Arc<dyn Fn(&Amplitude, &Vector3<f64>, &Vector3<f64>) -> Amplitude + Send + Sync>),
}

impl HoppingMapping {
    pub fn plain<F>(f: F) -> Self
    where
        F: Fn(&Amplitude) -> Amplitude + Send + Sync + 'static,
    {
        HoppingMapping::Plain(Arc::new(f))
    }

    pub fn position<F>(f: F) -> Self
    where
        F: Fn(&Amplitude, &Vector3<f64>, &Vector3<f64>) -> Amplitude + Send + Sync + 'static,
    {
        HoppingMapping::Position(Arc::new(f))
    }

    fn apply(&self, value: &Amplitude, r: &Vector3<f64>, dr: &Vector3<f64>) -> Amplitude {
        match self {
            HoppingMapping::Plain(f) => f(value),
            HoppingMapping::Position(f) => f(value, r, dr),
        }
    }
}

impl fmt::Debug for HoppingMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoppingMapping::Plain(_) => write!(f, "HoppingMapping::Plain(<fn>)"),
            HoppingMapping::Position(_) => write!(f, "HoppingMapping::Position(<fn>)"),
        }
    }
}

// ======================== UNRESOLVED MODIFIERS ========================

/// Post-hoc transformer of already-assembled onsite entries, applied in a second
/// assembly pass to every entry its selector matches.
#[derive(Debug, Clone)]
pub struct OnsiteModifier {
    mapping: OnsiteMapping,
    selector: OnsiteSelector,
}

/// Build an onsite element modifier from a transforming function and a selector.
pub fn onsite_modifier(mapping: OnsiteMapping, selector: OnsiteSelector) -> OnsiteModifier {
    OnsiteModifier { mapping, selector }
}

impl OnsiteModifier {
    pub fn selector(&self) -> &OnsiteSelector {
        &self.selector
    }

    /// Bind to a lattice. The symmetrization policy is frozen here:
    /// `add_conjugate = selector.force_hermitian`.
    pub fn resolve(&self, lattice: &Arc<Lattice>) -> Result<ResolvedOnsiteModifier> {
        let add_conjugate = self.selector.force_hermitian();
        Ok(ResolvedOnsiteModifier {
            mapping: self.mapping.clone(),
            selector: self.selector.resolve(lattice)?,
            add_conjugate,
        })
    }
}

/// Post-hoc transformer of already-assembled hopping entries.
#[derive(Debug, Clone)]
pub struct HoppingModifier {
    mapping: HoppingMapping,
    selector: HoppingSelector,
}

/// Build a hopping element modifier from a transforming function and a selector.
pub fn hopping_modifier(mapping: HoppingMapping, selector: HoppingSelector) -> HoppingModifier {
    HoppingModifier { mapping, selector }
}

impl HoppingModifier {
    pub fn selector(&self) -> &HoppingSelector {
        &self.selector
    }

    /// Bind to a lattice. The symmetrization policy is frozen here, computed from
    /// the still-unresolved sublattice spec: restricting to directed sublattice
    /// pairs disables automatic symmetrization, since the adjoint entry would
    /// land in a different, unselected block.
    pub fn resolve(&self, lattice: &Arc<Lattice>) -> Result<ResolvedHoppingModifier> {
        let add_conjugate = self.selector.sublats().is_any() && self.selector.force_hermitian();
        Ok(ResolvedHoppingModifier {
            mapping: self.mapping.clone(),
            selector: self.selector.resolve(lattice)?,
            add_conjugate,
        })
    }
}

// ======================== RESOLVED MODIFIERS ========================

/// Onsite modifier bound to a lattice, with the `add_conjugate` policy frozen at
/// resolution time.
#[derive(Debug, Clone)]
pub struct ResolvedOnsiteModifier {
    mapping: OnsiteMapping,
    selector: ResolvedOnsiteSelector,
    add_conjugate: bool,
}

impl ResolvedOnsiteModifier {
    pub fn selector(&self) -> &ResolvedOnsiteSelector {
        &self.selector
    }

    pub fn add_conjugate(&self) -> bool {
        self.add_conjugate
    }

    /// Transform an existing onsite entry at absolute position `r`.
    ///
    /// With `add_conjugate` the result is symmetrized: the function is applied to
    /// the value and to its Hermitian adjoint, the second result is adjointed
    /// back, and the two are averaged.
    pub fn apply(&self, value: &Amplitude, r: &Vector3<f64>) -> Amplitude {
        if self.add_conjugate {
            let direct = self.mapping.apply(value, r);
            let mirrored = self.mapping.apply(&value.adjoint(), r).adjoint();
            direct.average(&mirrored)
        } else {
            self.mapping.apply(value, r)
        }
    }
}

/// Hopping modifier bound to a lattice.
#[derive(Debug, Clone)]
pub struct ResolvedHoppingModifier {
    mapping: HoppingMapping,
    selector: ResolvedHoppingSelector,
    add_conjugate: bool,
}

impl ResolvedHoppingModifier {
    pub fn selector(&self) -> &ResolvedHoppingSelector {
        &self.selector
    }

    pub fn add_conjugate(&self) -> bool {
        self.add_conjugate
    }

    /// Transform an existing hopping entry with bond center `r` and displacement
    /// `dr`.
    ///
    /// With `add_conjugate` the mirror bond (adjoint value, negated displacement)
    /// is transformed as well, adjointed back and averaged in.
    pub fn apply(&self, value: &Amplitude, r: &Vector3<f64>, dr: &Vector3<f64>) -> Amplitude {
        if self.add_conjugate {
            let direct = self.mapping.apply(value, r, dr);
            let mirrored = self.mapping.apply(&value.adjoint(), r, &-dr).adjoint();
            direct.average(&mirrored)
        } else {
            self.mapping.apply(value, r, dr)
        }
    }
}
