//! Work unit contracts.

use std::fmt::Debug;
use std::hash::Hash;

/// An opaque handle identifying one piece of deployment work.
///
/// `Eq` and `Hash` define the unit's identity. Implementations over shared
/// model objects should compare by key (or pointer), not by structure, so two
/// distinct types with equal contents remain distinct units.
pub trait WorkUnit: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Whether completion of this unit is recorded for other tasks to observe.
    fn is_tracked(&self) -> bool {
        true
    }

    /// Depth of the unit in its hierarchy; zero for roots.
    ///
    /// Shallower units are dequeued first so that units others depend on
    /// (supertypes, referenced types) tend to complete before their dependents
    /// start polling for them.
    fn hierarchy_depth(&self) -> u32 {
        0
    }

    /// Human-readable name used in logs and task errors
    fn label(&self) -> String {
        format!("{self:?}")
    }
}

/// A unit selected from a [`super::ModelProvider`]: either a type-like unit or
/// a named query descriptor.
///
/// Named queries are fire-and-forget: they are never recorded as completed and
/// never consulted through completion queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeploymentUnit<T, Q> {
    Type(T),
    NamedQuery(Q),
}

impl<T, Q> DeploymentUnit<T, Q> {
    pub fn as_type(&self) -> Option<&T> {
        match self {
            Self::Type(unit) => Some(unit),
            Self::NamedQuery(_) => None,
        }
    }

    pub fn as_named_query(&self) -> Option<&Q> {
        match self {
            Self::Type(_) => None,
            Self::NamedQuery(query) => Some(query),
        }
    }

    pub fn is_named_query(&self) -> bool {
        matches!(self, Self::NamedQuery(_))
    }
}

impl<T: WorkUnit, Q: WorkUnit> WorkUnit for DeploymentUnit<T, Q> {
    fn is_tracked(&self) -> bool {
        match self {
            Self::Type(unit) => unit.is_tracked(),
            Self::NamedQuery(_) => false,
        }
    }

    fn hierarchy_depth(&self) -> u32 {
        match self {
            Self::Type(unit) => unit.hierarchy_depth(),
            Self::NamedQuery(query) => query.hierarchy_depth(),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Type(unit) => unit.label(),
            Self::NamedQuery(query) => query.label(),
        }
    }
}

macro_rules! impl_work_unit {
    ($($ty:ty),* $(,)?) => {
        $(impl WorkUnit for $ty {
            fn label(&self) -> String {
                self.to_string()
            }
        })*
    };
}

impl_work_unit!(String, &'static str, u32, u64, usize, i64, uuid::Uuid);
