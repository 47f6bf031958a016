use std::fmt;
use std::sync::Arc;

use log::debug;
use nalgebra::Vector3;

use crate::config::RANGE_TOLERANCE;
use crate::error::{ModelError, Result};
use crate::lattice::{CellDistance, Lattice};

/// Geometric predicate over a site's absolute position.
pub type SiteRegion = Arc<dyn Fn(&Vector3<f64>) -> bool + Send + Sync>;
/// Geometric predicate over a bond's center and displacement.
pub type BondRegion = Arc<dyn Fn(&Vector3<f64>, &Vector3<f64>) -> bool + Send + Sync>;

/// Per-field constraint: `Any` matches everything, `Only(set)` matches members of
/// the set. `Only(vec![])` is a valid, distinct value matching nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint<T> {
    Any,
    Only(Vec<T>),
}

impl<T: PartialEq> Constraint<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Only(set) => set.contains(value),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Constraint::Any)
    }
}

// ======================== INPUT SPECIFICATIONS ========================

/// Accepted shapes for an onsite sublattice constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SublatSpec {
    /// Match all sublattices.
    Any,
    /// A single sublattice name.
    Name(String),
    /// A set of names; the empty set matches nothing.
    Names(Vec<String>),
}

/// Accepted shapes for a hopping sublattice-pair constraint.
///
/// Pairs are ordered `(row, col)` sublattices of the candidate bond.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairSpec {
    /// Match all sublattice pairs.
    Any,
    /// A bare name, expanded to the intra-sublattice pair `(name, name)`.
    Name(String),
    /// An ordered pair `(a, b)`, stored as given.
    Pair(String, String),
    /// Pair syntax `from → to`, canonicalized as the reversed tuple `(to, from)`.
    /// This reversal is a long-standing compatibility convention; it is preserved
    /// exactly even though its original intent is ambiguous.
    Directed { from: String, to: String },
    /// A set of pairs; the empty set matches nothing. Nested `Any` or `List`
    /// entries are invalid.
    List(Vec<PairSpec>),
}

/// Accepted shapes for a cell-distance constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnSpec {
    /// Match all cell distances.
    Any,
    /// A single integer vector, wrapped as a one-element set.
    Single(Vec<i32>),
    /// A set of integer vectors; the empty set matches nothing. All vectors must
    /// have the same rank.
    Set(Vec<Vec<i32>>),
}

// ======================== SANITIZATION ========================

fn valid_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ModelError::selector_spec("empty sublattice name"));
    }
    Ok(())
}

fn sanitize_site_sublats(spec: SublatSpec) -> Result<Constraint<String>> {
    match spec {
        SublatSpec::Any => Ok(Constraint::Any),
        SublatSpec::Name(name) => {
            valid_name(&name)?;
            Ok(Constraint::Only(vec![name]))
        }
        SublatSpec::Names(names) => {
            for name in &names {
                valid_name(name)?;
            }
            Ok(Constraint::Only(names))
        }
    }
}

fn canonical_pair(spec: PairSpec) -> Result<(String, String)> {
    match spec {
        PairSpec::Name(name) => {
            valid_name(&name)?;
            Ok((name.clone(), name))
        }
        PairSpec::Pair(a, b) => {
            valid_name(&a)?;
            valid_name(&b)?;
            Ok((a, b))
        }
        // Reversed on purpose: `from → to` selects the (to, from) block.
        PairSpec::Directed { from, to } => {
            valid_name(&from)?;
            valid_name(&to)?;
            Ok((to, from))
        }
        PairSpec::Any | PairSpec::List(_) => Err(ModelError::selector_spec(
            "sublattice pair list entries must be names or pairs",
        )),
    }
}

fn sanitize_pair_sublats(spec: PairSpec) -> Result<Constraint<(String, String)>> {
    match spec {
        PairSpec::Any => Ok(Constraint::Any),
        PairSpec::List(entries) => {
            let pairs = entries
                .into_iter()
                .map(canonical_pair)
                .collect::<Result<Vec<_>>>()?;
            Ok(Constraint::Only(pairs))
        }
        single => Ok(Constraint::Only(vec![canonical_pair(single)?])),
    }
}

fn sanitize_dcells(spec: DnSpec) -> Result<Constraint<CellDistance>> {
    match spec {
        DnSpec::Any => Ok(Constraint::Any),
        DnSpec::Single(dn) => Ok(Constraint::Only(vec![CellDistance::new(dn)])),
        DnSpec::Set(dns) => {
            if let Some(first) = dns.first() {
                let rank = first.len();
                if dns.iter().any(|dn| dn.len() != rank) {
                    return Err(ModelError::selector_spec(
                        "cell distances in one set must all have the same rank",
                    ));
                }
            }
            Ok(Constraint::Only(
                dns.into_iter().map(CellDistance::new).collect(),
            ))
        }
    }
}

/// Canonicalize a maximum bond length. Finite values receive the
/// [`RANGE_TOLERANCE`] slack so a bond of length exactly `range` is accepted;
/// `f64::INFINITY` (unconstrained) passes through unmodified.
fn sanitize_range(range: f64) -> Result<f64> {
    if range.is_nan() || range < 0.0 {
        return Err(ModelError::selector_spec(format!(
            "hopping range must be non-negative, got {}",
            range
        )));
    }
    if range.is_infinite() {
        Ok(f64::INFINITY)
    } else {
        Ok(range + RANGE_TOLERANCE)
    }
}

// ======================== UNRESOLVED SELECTORS ========================

/// Symbolic onsite selector: constraints expressed over sublattice names, not yet
/// bound to any lattice. The membership predicate exists only on the resolved
/// counterpart, [`ResolvedOnsiteSelector`].
#[derive(Clone)]
pub struct OnsiteSelector {
    region: Option<SiteRegion>,
    sublats: Constraint<String>,
    force_hermitian: bool,
}

/// Build an unconstrained onsite selector (`force_hermitian = true`), to be
/// refined with the `with_*`/`try_with_*` methods. This is the only entry point
/// constructing [`OnsiteSelector`] values.
pub fn onsite_selector() -> OnsiteSelector {
    OnsiteSelector {
        region: None,
        sublats: Constraint::Any,
        force_hermitian: true,
    }
}

impl OnsiteSelector {
    pub fn with_region(mut self, region: SiteRegion) -> Self {
        self.region = Some(region);
        self
    }

    pub fn try_with_sublats(mut self, spec: SublatSpec) -> Result<Self> {
        self.sublats = sanitize_site_sublats(spec)?;
        Ok(self)
    }

    pub fn with_force_hermitian(mut self, force_hermitian: bool) -> Self {
        self.force_hermitian = force_hermitian;
        self
    }

    pub fn sublats(&self) -> &Constraint<String> {
        &self.sublats
    }

    pub fn force_hermitian(&self) -> bool {
        self.force_hermitian
    }

    /// Pure field-by-field merge: every field of `override_sel` that is
    /// constrained (or present) replaces the corresponding field of `self`.
    /// `force_hermitian` is always present, so the override's value wins.
    pub fn merge(&self, override_sel: &OnsiteSelector) -> OnsiteSelector {
        OnsiteSelector {
            region: override_sel.region.clone().or_else(|| self.region.clone()),
            sublats: if override_sel.sublats.is_any() {
                self.sublats.clone()
            } else {
                override_sel.sublats.clone()
            },
            force_hermitian: override_sel.force_hermitian,
        }
    }

    /// Bind the selector to a lattice, translating sublattice names to ordinals.
    /// Names absent from the lattice's table are silently dropped, so one
    /// selector can be reused across lattices that only partially share
    /// sublattice names.
    pub fn resolve(&self, lattice: &Arc<Lattice>) -> Result<ResolvedOnsiteSelector> {
        let sublats = match &self.sublats {
            Constraint::Any => Constraint::Any,
            Constraint::Only(names) => {
                let mut indices = Vec::with_capacity(names.len());
                for name in names {
                    match lattice.sublat_index(name) {
                        Some(index) if !indices.contains(&index) => indices.push(index),
                        Some(_) => {}
                        None => debug!("dropping unknown sublattice name '{}'", name),
                    }
                }
                Constraint::Only(indices)
            }
        };
        Ok(ResolvedOnsiteSelector {
            lattice: Arc::clone(lattice),
            region: self.region.clone(),
            sublats,
            force_hermitian: self.force_hermitian,
        })
    }
}

impl fmt::Debug for OnsiteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnsiteSelector")
            .field("region", &self.region.as_ref().map(|_| "<fn>"))
            .field("sublats", &self.sublats)
            .field("force_hermitian", &self.force_hermitian)
            .finish()
    }
}

/// Symbolic hopping selector: constraints expressed over sublattice name pairs,
/// cell distances and a maximum bond length, not yet bound to any lattice.
#[derive(Clone)]
pub struct HoppingSelector {
    region: Option<BondRegion>,
    sublats: Constraint<(String, String)>,
    dcells: Constraint<CellDistance>,
    range: f64,
    force_hermitian: bool,
}

/// Build a hopping selector with unconstrained region, sublattices and cell
/// distances, a default range of `1.0` (canonicalized) and
/// `force_hermitian = true`. This is the only entry point constructing
/// [`HoppingSelector`] values.
pub fn hopping_selector() -> HoppingSelector {
    HoppingSelector {
        region: None,
        sublats: Constraint::Any,
        dcells: Constraint::Any,
        range: 1.0 + RANGE_TOLERANCE,
        force_hermitian: true,
    }
}

impl HoppingSelector {
    pub fn with_region(mut self, region: BondRegion) -> Self {
        self.region = Some(region);
        self
    }

    pub fn try_with_sublats(mut self, spec: PairSpec) -> Result<Self> {
        self.sublats = sanitize_pair_sublats(spec)?;
        Ok(self)
    }

    pub fn try_with_dcells(mut self, spec: DnSpec) -> Result<Self> {
        self.dcells = sanitize_dcells(spec)?;
        Ok(self)
    }

    /// Set the maximum bond length. Finite values are canonicalized with the
    /// epsilon slack; `f64::INFINITY` leaves the range unconstrained.
    pub fn try_with_range(mut self, range: f64) -> Result<Self> {
        self.range = sanitize_range(range)?;
        Ok(self)
    }

    pub fn with_force_hermitian(mut self, force_hermitian: bool) -> Self {
        self.force_hermitian = force_hermitian;
        self
    }

    pub fn sublats(&self) -> &Constraint<(String, String)> {
        &self.sublats
    }

    pub fn force_hermitian(&self) -> bool {
        self.force_hermitian
    }

    /// Pure field-by-field merge, as for [`OnsiteSelector::merge`]. An infinite
    /// (unconstrained) override range keeps the base's range.
    pub fn merge(&self, override_sel: &HoppingSelector) -> HoppingSelector {
        HoppingSelector {
            region: override_sel.region.clone().or_else(|| self.region.clone()),
            sublats: if override_sel.sublats.is_any() {
                self.sublats.clone()
            } else {
                override_sel.sublats.clone()
            },
            dcells: if override_sel.dcells.is_any() {
                self.dcells.clone()
            } else {
                override_sel.dcells.clone()
            },
            range: if override_sel.range.is_infinite() {
                self.range
            } else {
                override_sel.range
            },
            force_hermitian: override_sel.force_hermitian,
        }
    }

    /// Bind the selector to a lattice. Name pairs resolve to ordinal pairs in
    /// construction-time order; a pair whose either name is absent from the
    /// lattice's table is silently dropped. Cell distances are checked against
    /// the lattice's periodicity rank.
    pub fn resolve(&self, lattice: &Arc<Lattice>) -> Result<ResolvedHoppingSelector> {
        let sublats = match &self.sublats {
            Constraint::Any => Constraint::Any,
            Constraint::Only(pairs) => {
                let mut indices = Vec::with_capacity(pairs.len());
                for (a, b) in pairs {
                    match (lattice.sublat_index(a), lattice.sublat_index(b)) {
                        (Some(ia), Some(ib)) => {
                            if !indices.contains(&(ia, ib)) {
                                indices.push((ia, ib));
                            }
                        }
                        _ => debug!("dropping sublattice pair ('{}', '{}')", a, b),
                    }
                }
                Constraint::Only(indices)
            }
        };
        check_dcell_ranks(&self.dcells, lattice)?;
        Ok(ResolvedHoppingSelector {
            lattice: Arc::clone(lattice),
            region: self.region.clone(),
            sublats,
            dcells: self.dcells.clone(),
            range: self.range,
            force_hermitian: self.force_hermitian,
        })
    }
}

impl fmt::Debug for HoppingSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoppingSelector")
            .field("region", &self.region.as_ref().map(|_| "<fn>"))
            .field("sublats", &self.sublats)
            .field("dcells", &self.dcells)
            .field("range", &self.range)
            .field("force_hermitian", &self.force_hermitian)
            .finish()
    }
}

fn check_dcell_ranks(dcells: &Constraint<CellDistance>, lattice: &Lattice) -> Result<()> {
    if let Constraint::Only(dns) = dcells {
        for dn in dns {
            if dn.rank() != lattice.rank() {
                return Err(ModelError::DimensionMismatch {
                    expected: lattice.rank(),
                    actual: dn.rank(),
                });
            }
        }
    }
    Ok(())
}

// ======================== RESOLVED SELECTORS ========================

/// Onsite selector bound to a lattice: sublattice constraints are ordinal sets
/// and the membership predicate is available. Immutable and `Send + Sync`, so it
/// can be shared across concurrent assembly workers.
#[derive(Clone)]
pub struct ResolvedOnsiteSelector {
    lattice: Arc<Lattice>,
    region: Option<SiteRegion>,
    sublats: Constraint<usize>,
    force_hermitian: bool,
}

impl ResolvedOnsiteSelector {
    /// Re-resolution is idempotent: names are gone after the first resolution,
    /// so the ordinal set is forwarded unchanged.
    pub fn resolve(&self, lattice: &Arc<Lattice>) -> Result<ResolvedOnsiteSelector> {
        let mut out = self.clone();
        out.lattice = Arc::clone(lattice);
        Ok(out)
    }

    /// Membership test for the candidate site in the periodic replica `dn`.
    ///
    /// Short-circuit conjunction in fixed order: region, then sublattice.
    pub fn matches(&self, site: usize, dn: &CellDistance) -> bool {
        if let Some(region) = &self.region {
            let r = match self.lattice.absolute_position(site, dn) {
                Ok(r) => r,
                Err(_) => return false,
            };
            if !region(&r) {
                return false;
            }
        }
        self.sublats.admits(&self.lattice.sublat_of(site))
    }

    pub fn sublat_indices(&self) -> &Constraint<usize> {
        &self.sublats
    }

    pub fn force_hermitian(&self) -> bool {
        self.force_hermitian
    }

    pub fn lattice(&self) -> &Arc<Lattice> {
        &self.lattice
    }
}

impl fmt::Debug for ResolvedOnsiteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOnsiteSelector")
            .field("region", &self.region.as_ref().map(|_| "<fn>"))
            .field("sublats", &self.sublats)
            .field("force_hermitian", &self.force_hermitian)
            .finish()
    }
}

/// Hopping selector bound to a lattice: sublattice-pair constraints are ordinal
/// pairs and the membership predicate is available.
#[derive(Clone)]
pub struct ResolvedHoppingSelector {
    lattice: Arc<Lattice>,
    region: Option<BondRegion>,
    sublats: Constraint<(usize, usize)>,
    dcells: Constraint<CellDistance>,
    range: f64,
    force_hermitian: bool,
}

impl ResolvedHoppingSelector {
    /// Re-resolution is idempotent: the ordinal pair set is forwarded unchanged
    /// after re-checking the cell-distance ranks against the new lattice.
    pub fn resolve(&self, lattice: &Arc<Lattice>) -> Result<ResolvedHoppingSelector> {
        check_dcell_ranks(&self.dcells, lattice)?;
        let mut out = self.clone();
        out.lattice = Arc::clone(lattice);
        Ok(out)
    }

    /// Membership test for the candidate bond `(row, col)` between replicas
    /// `dn_row` and `dn_col`.
    ///
    /// Short-circuit conjunction in fixed order, cheapest and most discriminating
    /// first: self-loop exclusion, region, cell-distance set, range, sublattice
    /// pair.
    pub fn matches(
        &self,
        row: usize,
        col: usize,
        dn_row: &CellDistance,
        dn_col: &CellDistance,
    ) -> bool {
        // A hopping never connects a site to itself in the same replica.
        if row == col && dn_row == dn_col {
            return false;
        }
        let dr = if self.region.is_some() || self.range.is_finite() {
            let (r, dr) = match self.lattice.bond_geometry(row, col, dn_row, dn_col) {
                Ok(geometry) => geometry,
                Err(_) => return false,
            };
            if let Some(region) = &self.region {
                if !region(&r, &dr) {
                    return false;
                }
            }
            Some(dr)
        } else {
            None
        };
        if !self.dcells.admits(&(dn_row - dn_col)) {
            return false;
        }
        if let Some(dr) = dr {
            if dr.norm() > self.range {
                return false;
            }
        }
        self.sublats
            .admits(&(self.lattice.sublat_of(row), self.lattice.sublat_of(col)))
    }

    pub fn sublat_pairs(&self) -> &Constraint<(usize, usize)> {
        &self.sublats
    }

    pub fn dcell_set(&self) -> &Constraint<CellDistance> {
        &self.dcells
    }

    /// The canonicalized maximum bond length (`f64::INFINITY` if unconstrained).
    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn force_hermitian(&self) -> bool {
        self.force_hermitian
    }

    pub fn lattice(&self) -> &Arc<Lattice> {
        &self.lattice
    }

    /// Replace the resolved sublattice-pair set, keeping all other constraints.
    /// Used by the off-diagonal restriction.
    pub(crate) fn with_sublat_pairs(&self, pairs: Constraint<(usize, usize)>) -> Self {
        let mut out = self.clone();
        out.sublats = pairs;
        out
    }
}

impl fmt::Debug for ResolvedHoppingSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedHoppingSelector")
            .field("region", &self.region.as_ref().map(|_| "<fn>"))
            .field("sublats", &self.sublats)
            .field("dcells", &self.dcells)
            .field("range", &self.range)
            .field("force_hermitian", &self.force_hermitian)
            .finish()
    }
}
