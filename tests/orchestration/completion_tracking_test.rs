//! Completion queries and recording on a constructed pass.

use deployment_core::{BoxError, Context, PassContext, TaskOrchestrator, UnitOutcome};

use crate::common::{test_config, ModelUnit, TestModel};

#[test]
fn test_absent_and_foreign_units_count_as_completed() {
    let model = TestModel::sample();
    let orchestrator =
        TaskOrchestrator::for_model("entities", Context::Entities, &model, &test_config(1))
            .unwrap();

    assert!(orchestrator.has_completed(None));
    assert!(orchestrator.has_completed(Some(&TestModel::foreign_unit("Invoice"))));
    // Address is managed but not an entity, so outside this pass
    assert!(orchestrator.has_completed(Some(&model.unit("Address"))));
}

#[test]
fn test_in_scope_units_start_incomplete() {
    let model = TestModel::sample();
    let orchestrator =
        TaskOrchestrator::for_model("managed", Context::ManagedTypes, &model, &test_config(1))
            .unwrap();

    for meta_type in model.types() {
        assert!(
            !orchestrator.has_completed(Some(&model.unit(&meta_type.name))),
            "{} should not be completed yet",
            meta_type.name
        );
    }
    assert_eq!(orchestrator.completed_count(), 0);
}

#[test]
fn test_mark_completed_flips_only_that_unit() {
    let model = TestModel::sample();
    let orchestrator =
        TaskOrchestrator::for_model("managed", Context::ManagedTypes, &model, &test_config(1))
            .unwrap();

    orchestrator.mark_completed(&model.unit("Person"));

    assert!(orchestrator.has_completed(Some(&model.unit("Person"))));
    assert!(!orchestrator.has_completed(Some(&model.unit("Customer"))));
    assert_eq!(orchestrator.completed_count(), 1);
}

#[test]
fn test_mark_completed_is_idempotent() {
    let model = TestModel::sample();
    let orchestrator =
        TaskOrchestrator::for_model("managed", Context::ManagedTypes, &model, &test_config(1))
            .unwrap();

    orchestrator.mark_completed(&model.unit("Order"));
    orchestrator.mark_completed(&model.unit("Order"));

    assert!(orchestrator.has_completed(Some(&model.unit("Order"))));
    assert_eq!(orchestrator.completed_count(), 1);
    assert_eq!(orchestrator.pass().tracker().snapshot().len(), 1);
}

#[test]
fn test_named_queries_never_enter_the_tracker() {
    let model = TestModel::sample();
    let orchestrator =
        TaskOrchestrator::for_model("queries", Context::NamedQueries, &model, &test_config(1))
            .unwrap();

    let before = orchestrator.pass().tracker().len();
    for query in orchestrator.candidates().units().to_vec() {
        orchestrator.mark_completed(&query);
    }

    assert_eq!(orchestrator.pass().tracker().len(), before);
}

#[test]
fn test_mark_completed_from_many_threads() {
    let model = TestModel::flat(64);
    let orchestrator =
        TaskOrchestrator::for_model("flat", Context::Entities, &model, &test_config(1)).unwrap();
    let units = orchestrator.candidates().units().to_vec();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for unit in &units {
                    orchestrator.mark_completed(unit);
                }
            });
        }
    });

    assert_eq!(orchestrator.completed_count(), 64);
    assert!(units.iter().all(|unit| orchestrator.has_completed(Some(unit))));
}

#[test]
fn test_named_queries_in_scope_count_as_completed() {
    let model = TestModel::sample();
    let orchestrator =
        TaskOrchestrator::for_model("queries", Context::NamedQueries, &model, &test_config(1))
            .unwrap();
    let queries = orchestrator.candidates().units().to_vec();
    assert!(!queries.is_empty());

    assert!(queries.iter().all(|query| orchestrator.has_completed(Some(query))));

    orchestrator
        .perform(|_: &ModelUnit, _: &PassContext<ModelUnit>| -> Result<UnitOutcome, BoxError> {
            Ok(UnitOutcome::Completed)
        })
        .unwrap();

    assert!(queries.iter().all(|query| orchestrator.has_completed(Some(query))));
    assert_eq!(orchestrator.completed_count(), 0);
}
