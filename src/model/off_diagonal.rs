use std::sync::Arc;

use crate::error::{ModelError, Result};
use crate::lattice::Lattice;
use crate::model::selector::Constraint;
use crate::model::term::{Model, ResolvedHoppingTerm, ResolvedModel, ResolvedTerm, Term};

/// Restrict a hopping-only model to inter-group hoppings.
///
/// The lattice's sublattices are partitioned into contiguous groups in order:
/// group 0 covers ordinals `0..group_sizes[0]`, group 1 the next
/// `group_sizes[1]` ordinals, and so on. Each hopping term's selector is
/// resolved against `lattice` and its sublattice-pair set is filtered to retain
/// only pairs whose two sublattices fall in different groups; an unconstrained
/// pair set is materialized over all ordered pairs first.
///
/// Fails with [`ModelError::InvalidGroupSpec`] when the group sizes do not sum
/// to the sublattice count, and with [`ModelError::InvalidModelStructure`] when
/// the model contains an onsite term.
pub fn off_diagonal(
    model: &Model,
    lattice: &Arc<Lattice>,
    group_sizes: &[usize],
) -> Result<ResolvedModel> {
    let num_sublats = lattice.num_sublats();
    let total: usize = group_sizes.iter().sum();
    if total != num_sublats {
        return Err(ModelError::InvalidGroupSpec {
            expected: num_sublats,
            actual: total,
        });
    }

    // group_of[s] = group index of sublattice ordinal s
    let mut group_of = Vec::with_capacity(num_sublats);
    for (group, &size) in group_sizes.iter().enumerate() {
        group_of.extend(std::iter::repeat(group).take(size));
    }

    let mut terms = Vec::with_capacity(model.terms().len());
    for term in model.terms() {
        match term {
            Term::Onsite(_) => {
                return Err(ModelError::InvalidModelStructure {
                    reason: "off-diagonal restriction is defined only for hopping terms".into(),
                });
            }
            Term::Hopping(hopping) => {
                let resolved = hopping.selector().resolve(lattice)?;
                let pairs = match resolved.sublat_pairs() {
                    Constraint::Any => all_ordered_pairs(num_sublats),
                    Constraint::Only(pairs) => pairs.clone(),
                };
                let inter_group: Vec<(usize, usize)> = pairs
                    .into_iter()
                    .filter(|&(a, b)| group_of[a] != group_of[b])
                    .collect();
                terms.push(ResolvedTerm::Hopping(ResolvedHoppingTerm::from_parts(
                    hopping.generator().clone(),
                    hopping.coefficient(),
                    resolved.with_sublat_pairs(Constraint::Only(inter_group)),
                )));
            }
        }
    }

    Ok(ResolvedModel::from_terms(terms))
}

fn all_ordered_pairs(num_sublats: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(num_sublats * num_sublats);
    for a in 0..num_sublats {
        for b in 0..num_sublats {
            pairs.push((a, b));
        }
    }
    pairs
}
