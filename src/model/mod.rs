// Model module: Contains the selector, term/model and element-modifier core
// This module provides the composable predicate bundles and the model algebra an
// external assembly pass consumes to populate sparse Bloch Hamiltonians

// ======================== MODULE DECLARATIONS ========================
pub mod amplitude;
pub mod modifier;
pub mod off_diagonal;
pub mod regions;
pub mod selector;
pub mod term;

// Test modules
mod _tests_amplitude;
mod _tests_off_diagonal;
mod _tests_term;

// ======================== MATRIX-ENTRY VALUES ========================
pub use amplitude::Amplitude; // enum - scalar or orbital-block matrix entry value
// Amplitude impl methods:
//   real(value: f64) -> Self                - real scalar entry
//   adjoint(&self) -> Amplitude             - Hermitian adjoint
//   average(&self, other) -> Amplitude      - arithmetic mean, for symmetrization
//   zero_like(&self) -> Amplitude           - additive identity of the same shape
//   Add, Neg, Mul<Complex64>, Mul<f64>      - entry arithmetic

// ======================== SELECTORS ========================
pub use selector::{
    hopping_selector, // fn() -> HoppingSelector - unconstrained hopping selector (range 1.0)
    onsite_selector,  // fn() -> OnsiteSelector - unconstrained onsite selector
    BondRegion,       // type - Arc<dyn Fn(&r, &dr) -> bool>, geometric bond predicate
    Constraint,       // enum - Any vs Only(set); Only([]) matches nothing
    DnSpec,           // enum - accepted cell-distance constraint shapes
    HoppingSelector,  // struct - symbolic hopping selector (names, dcells, range)
    OnsiteSelector,   // struct - symbolic onsite selector (names)
    PairSpec,         // enum - accepted sublattice-pair shapes (incl. reversed pair syntax)
    ResolvedHoppingSelector, // struct - lattice-bound hopping selector with membership test
    ResolvedOnsiteSelector,  // struct - lattice-bound onsite selector with membership test
    SiteRegion,       // type - Arc<dyn Fn(&r) -> bool>, geometric site predicate
    SublatSpec,       // enum - accepted onsite sublattice shapes
};
// Selector impl methods (symbolic):
//   with_region / try_with_sublats / try_with_dcells / try_with_range / with_force_hermitian
//   merge(&self, override) -> Self           - pure field-by-field override merge
//   resolve(&self, &Arc<Lattice>) -> Result<Resolved...> - name → ordinal binding
// Resolved selector impl methods:
//   matches(site, dn) -> bool                            - onsite membership
//   matches(row, col, dn_row, dn_col) -> bool            - hopping membership
//   resolve(&self, &Arc<Lattice>) -> Result<Self>        - idempotent re-resolution

// ======================== TERMS & MODEL ALGEBRA ========================
pub use term::{
    hopping_term,       // fn(value, HoppingSelector) -> Model - single hopping-term model
    only_hopping_terms, // fn(&Model, Option<&HoppingSelector>) -> Model - kind projection
    only_onsite_terms,  // fn(&Model, Option<&OnsiteSelector>) -> Model - kind projection
    onsite_term,        // fn(value, OnsiteSelector) -> Model - single onsite-term model
    HoppingGenerator,   // enum - uniform or position-dependent hopping value
    HoppingTerm,        // struct - (generator, selector, coefficient)
    Model,              // struct - ordered term collection with Add/Sub/Neg/Mul algebra
    OnsiteGenerator,    // enum - uniform or position-dependent onsite value
    OnsiteTerm,         // struct - (generator, selector, coefficient)
    ResolvedHoppingTerm, // struct - hopping term bound to a lattice
    ResolvedModel,      // struct - assembler-facing resolved term sequence
    ResolvedOnsiteTerm, // struct - onsite term bound to a lattice
    ResolvedTerm,       // enum - resolved term of either kind
    Term,               // enum - term of either kind
};

// ======================== ELEMENT MODIFIERS ========================
pub use modifier::{
    hopping_modifier, // fn(HoppingMapping, HoppingSelector) -> HoppingModifier
    onsite_modifier,  // fn(OnsiteMapping, OnsiteSelector) -> OnsiteModifier
    HoppingMapping,   // enum - plain or position-dependent transforming function
    HoppingModifier,  // struct - symbolic hopping element modifier
    OnsiteMapping,    // enum - plain or position-dependent transforming function
    OnsiteModifier,   // struct - symbolic onsite element modifier
    ResolvedHoppingModifier, // struct - lattice-bound, add_conjugate frozen at resolution
    ResolvedOnsiteModifier,  // struct - lattice-bound, add_conjugate frozen at resolution
};

// ======================== OFF-DIAGONAL RESTRICTION ========================
pub use off_diagonal::off_diagonal; // fn(&Model, &Arc<Lattice>, &[usize]) -> Result<ResolvedModel>

// ======================== REGION HELPERS ========================
pub use regions::{
    bond_center_within, // fn(SiteRegion) -> BondRegion - test only the bond center
    half_space,         // fn(normal, offset) -> SiteRegion
    within_circle,      // fn(center, radius) -> SiteRegion
    within_rectangle,   // fn(center, half_widths) -> SiteRegion
};
