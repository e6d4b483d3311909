//! # Candidate Sets
//!
//! The fixed population of units one deployment pass operates on. A candidate
//! set is populated once and never mutated, so every task of a pass can read it
//! concurrently without locking.

use std::collections::HashSet;

use super::{Context, DeploymentUnit, ModelProvider, WorkUnit};

#[derive(Debug, Clone)]
pub struct CandidateSet<U: WorkUnit> {
    context: Option<Context>,
    units: Vec<U>,
    members: HashSet<U>,
}

impl<T: WorkUnit, Q: WorkUnit> CandidateSet<DeploymentUnit<T, Q>> {
    /// Select the population for `context` from the model.
    ///
    /// Named queries are kept apart from type-like units: a named-query pass
    /// contains only `DeploymentUnit::NamedQuery` units.
    pub fn select<P>(context: Context, provider: &P) -> Self
    where
        P: ModelProvider<Type = T, Query = Q> + ?Sized,
    {
        let units: Vec<DeploymentUnit<T, Q>> = match context {
            Context::ManagedTypes => provider
                .managed_types()
                .into_iter()
                .map(DeploymentUnit::Type)
                .collect(),
            Context::IdentifiableTypes => provider
                .identifiable_types()
                .into_iter()
                .map(DeploymentUnit::Type)
                .collect(),
            Context::Entities => provider
                .entity_types()
                .into_iter()
                .map(DeploymentUnit::Type)
                .collect(),
            Context::NamedQueries => provider
                .named_queries()
                .into_iter()
                .map(DeploymentUnit::NamedQuery)
                .collect(),
        };

        let mut candidates = Self::from_units(units);
        candidates.context = Some(context);
        candidates
    }
}

impl<U: WorkUnit> CandidateSet<U> {
    /// Build a candidate set from arbitrary units, keeping first-seen order.
    /// Repeated units collapse onto their first occurrence.
    pub fn from_units(units: impl IntoIterator<Item = U>) -> Self {
        let mut members = HashSet::new();
        let units = units
            .into_iter()
            .filter(|unit| members.insert(unit.clone()))
            .collect();

        Self {
            context: None,
            units,
            members,
        }
    }

    /// Context the set was selected for, if it came from a model
    pub fn context(&self) -> Option<Context> {
        self.context
    }

    pub fn contains(&self, unit: &U) -> bool {
        self.members.contains(unit)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, U> {
        self.units.iter()
    }

    pub fn units(&self) -> &[U] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl<'a, U: WorkUnit> IntoIterator for &'a CandidateSet<U> {
    type Item = &'a U;
    type IntoIter = std::slice::Iter<'a, U>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

impl<U: WorkUnit> FromIterator<U> for CandidateSet<U> {
    fn from_iter<I: IntoIterator<Item = U>>(iter: I) -> Self {
        Self::from_units(iter)
    }
}
