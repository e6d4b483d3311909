//! Candidate selection per deployment context.

use deployment_core::{CandidateSet, Context, ModelOrchestrator, TaskOrchestrator, WorkUnit};
use std::collections::HashSet;

use crate::common::{test_config, TestModel};

fn labels(orchestrator: &ModelOrchestrator<TestModel>) -> Vec<String> {
    orchestrator.candidates().iter().map(WorkUnit::label).collect()
}

#[test]
fn test_each_context_selects_its_population() {
    let model = TestModel::sample();
    let config = test_config(1);

    for context in Context::ALL {
        let orchestrator =
            TaskOrchestrator::for_model(context.as_str(), context, &model, &config).unwrap();

        let selected: HashSet<String> = labels(&orchestrator).into_iter().collect();
        let expected: HashSet<String> = model.labels_for(context).into_iter().collect();
        assert_eq!(selected, expected, "population mismatch for {context}");
        assert_eq!(orchestrator.context(), Some(context));
    }
}

#[test]
fn test_selection_keeps_provider_order() {
    let model = TestModel::sample();
    let orchestrator =
        TaskOrchestrator::for_model("entities", Context::Entities, &model, &test_config(1))
            .unwrap();

    assert_eq!(
        labels(&orchestrator),
        vec!["Person", "Order", "Customer", "PreferredCustomer"]
    );
}

#[test]
fn test_population_sizes_follow_type_kinds() {
    let model = TestModel::sample();

    let managed = CandidateSet::select(Context::ManagedTypes, &model);
    let identifiable = CandidateSet::select(Context::IdentifiableTypes, &model);
    let entities = CandidateSet::select(Context::Entities, &model);
    let queries = CandidateSet::select(Context::NamedQueries, &model);

    assert_eq!(managed.len(), 6);
    assert_eq!(identifiable.len(), 5);
    assert_eq!(entities.len(), 4);
    assert_eq!(queries.len(), 3);
}

#[test]
fn test_named_query_pass_contains_only_queries() {
    let model = TestModel::sample();
    let candidates = CandidateSet::select(Context::NamedQueries, &model);

    assert!(candidates.iter().all(|unit| unit.is_named_query()));
    assert!(!candidates.contains(&model.unit("Person")));
}

#[test]
fn test_type_passes_contain_no_queries() {
    let model = TestModel::sample();

    for context in [Context::ManagedTypes, Context::IdentifiableTypes, Context::Entities] {
        let candidates = CandidateSet::select(context, &model);
        assert!(candidates.iter().all(|unit| !unit.is_named_query()));
    }
}

#[test]
fn test_empty_model_selects_nothing() {
    let model = TestModel::new();

    for context in Context::ALL {
        assert!(CandidateSet::select(context, &model).is_empty());
    }
}
