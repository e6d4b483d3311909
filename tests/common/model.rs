//! In-memory metamodel used as the model provider in integration tests.

use deployment_core::{Context, DeploymentUnit, ModelProvider, WorkUnit};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub type ModelUnit = DeploymentUnit<MetaType, NamedQuery>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Embeddable,
    MappedSuperclass,
    Entity,
}

/// A type of the test model; identity is the type name only
#[derive(Debug, Clone)]
pub struct MetaType {
    pub name: String,
    pub kind: TypeKind,
    pub supertype: Option<Arc<MetaType>>,
    pub depth: u32,
}

impl MetaType {
    pub fn supertype(&self) -> Option<&MetaType> {
        self.supertype.as_deref()
    }
}

impl PartialEq for MetaType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for MetaType {}

impl Hash for MetaType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl WorkUnit for MetaType {
    fn hierarchy_depth(&self) -> u32 {
        self.depth
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedQuery {
    pub name: String,
    pub query: String,
}

impl WorkUnit for NamedQuery {
    fn label(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TestModel {
    types: Vec<MetaType>,
    queries: Vec<NamedQuery>,
}

impl TestModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supertypes must be declared before their subtypes
    pub fn with_type(mut self, name: &str, kind: TypeKind, supertype: Option<&str>) -> Self {
        let supertype = supertype.map(|super_name| {
            let declared = self
                .find(super_name)
                .unwrap_or_else(|| panic!("supertype {super_name} is not declared"));
            Arc::new(declared.clone())
        });
        let depth = supertype.as_ref().map_or(0, |parent| parent.depth + 1);

        self.types.push(MetaType {
            name: name.to_string(),
            kind,
            supertype,
            depth,
        });
        self
    }

    pub fn with_query(mut self, name: &str, query: &str) -> Self {
        self.queries.push(NamedQuery {
            name: name.to_string(),
            query: query.to_string(),
        });
        self
    }

    /// A small model with a three-level entity hierarchy and named queries
    pub fn sample() -> Self {
        Self::new()
            .with_type("BaseEntity", TypeKind::MappedSuperclass, None)
            .with_type("Address", TypeKind::Embeddable, None)
            .with_type("Person", TypeKind::Entity, Some("BaseEntity"))
            .with_type("Order", TypeKind::Entity, Some("BaseEntity"))
            .with_type("Customer", TypeKind::Entity, Some("Person"))
            .with_type("PreferredCustomer", TypeKind::Entity, Some("Customer"))
            .with_query("Person.findAll", "select p from Person p")
            .with_query("Customer.byName", "select c from Customer c where c.name = :name")
            .with_query("Order.recent", "select o from Order o order by o.created desc")
    }

    /// `count` unrelated root entities
    pub fn flat(count: usize) -> Self {
        (0..count).fold(Self::new(), |model, i| {
            model.with_type(&format!("Entity{i}"), TypeKind::Entity, None)
        })
    }

    /// Same hierarchy as [`TestModel::sample`], subtypes declared first
    pub fn reversed(mut self) -> Self {
        self.types.reverse();
        self
    }

    pub fn find(&self, name: &str) -> Option<&MetaType> {
        self.types.iter().find(|meta_type| meta_type.name == name)
    }

    pub fn unit(&self, name: &str) -> ModelUnit {
        match self.find(name) {
            Some(meta_type) => DeploymentUnit::Type(meta_type.clone()),
            None => panic!("type {name} is not declared"),
        }
    }

    /// A type that is not part of this model
    pub fn foreign_unit(name: &str) -> ModelUnit {
        DeploymentUnit::Type(MetaType {
            name: name.to_string(),
            kind: TypeKind::Entity,
            supertype: None,
            depth: 0,
        })
    }

    pub fn types(&self) -> &[MetaType] {
        &self.types
    }

    /// Labels of the units the provider returns for `context`
    pub fn labels_for(&self, context: Context) -> Vec<String> {
        match context {
            Context::ManagedTypes => self.managed_types().iter().map(WorkUnit::label).collect(),
            Context::IdentifiableTypes => {
                self.identifiable_types().iter().map(WorkUnit::label).collect()
            }
            Context::Entities => self.entity_types().iter().map(WorkUnit::label).collect(),
            Context::NamedQueries => self.named_queries().iter().map(WorkUnit::label).collect(),
        }
    }
}

impl ModelProvider for TestModel {
    type Type = MetaType;
    type Query = NamedQuery;

    fn managed_types(&self) -> Vec<MetaType> {
        self.types.clone()
    }

    fn identifiable_types(&self) -> Vec<MetaType> {
        self.types
            .iter()
            .filter(|meta_type| meta_type.kind != TypeKind::Embeddable)
            .cloned()
            .collect()
    }

    fn entity_types(&self) -> Vec<MetaType> {
        self.types
            .iter()
            .filter(|meta_type| meta_type.kind == TypeKind::Entity)
            .cloned()
            .collect()
    }

    fn named_queries(&self) -> Vec<NamedQuery> {
        self.queries.clone()
    }
}
