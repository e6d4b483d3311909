//! Model provider contract.

use super::WorkUnit;

/// Source of candidate units.
///
/// Implemented by whatever holds the loaded model; the orchestrator only reads
/// these populations once, when a pass is constructed.
pub trait ModelProvider {
    /// Type-like units (managed types, identifiable types, entities)
    type Type: WorkUnit;

    /// Named query descriptors
    type Query: WorkUnit;

    fn managed_types(&self) -> Vec<Self::Type>;

    fn identifiable_types(&self) -> Vec<Self::Type>;

    fn entity_types(&self) -> Vec<Self::Type>;

    fn named_queries(&self) -> Vec<Self::Query>;
}

impl<P: ModelProvider + ?Sized> ModelProvider for &P {
    type Type = P::Type;
    type Query = P::Query;

    fn managed_types(&self) -> Vec<Self::Type> {
        (**self).managed_types()
    }

    fn identifiable_types(&self) -> Vec<Self::Type> {
        (**self).identifiable_types()
    }

    fn entity_types(&self) -> Vec<Self::Type> {
        (**self).entity_types()
    }

    fn named_queries(&self) -> Vec<Self::Query> {
        (**self).named_queries()
    }
}

impl<P: ModelProvider + ?Sized> ModelProvider for std::sync::Arc<P> {
    type Type = P::Type;
    type Query = P::Query;

    fn managed_types(&self) -> Vec<Self::Type> {
        (**self).managed_types()
    }

    fn identifiable_types(&self) -> Vec<Self::Type> {
        (**self).identifiable_types()
    }

    fn entity_types(&self) -> Vec<Self::Type> {
        (**self).entity_types()
    }

    fn named_queries(&self) -> Vec<Self::Query> {
        (**self).named_queries()
    }
}
