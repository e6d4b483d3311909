//! Repeated large passes; completion tracking must not lose or duplicate units.

use deployment_core::{BoxError, CandidateSet, Context, PassContext, TaskOrchestrator, UnitOutcome};
use std::collections::HashSet;

use crate::common::{test_config, RecordingProcessor, TestModel};

const UNITS: u32 = 1000;
const RUNS: usize = 10;

#[test]
fn test_thousand_noop_units_complete_every_run() {
    for run in 0..RUNS {
        let orchestrator = TaskOrchestrator::new(
            format!("stress-{run}"),
            CandidateSet::from_units(0..UNITS),
            &test_config(4),
        )
        .unwrap();

        let summary = orchestrator
            .perform(|_: &u32, _: &PassContext<u32>| -> Result<UnitOutcome, BoxError> {
                Ok(UnitOutcome::Completed)
            })
            .unwrap();

        let snapshot = orchestrator.pass().tracker().snapshot();
        let unique: HashSet<u32> = snapshot.iter().copied().collect();
        assert_eq!(summary.completed, UNITS as usize, "run {run}");
        assert_eq!(snapshot.len(), UNITS as usize, "run {run}");
        assert_eq!(unique.len(), UNITS as usize, "run {run}");
        assert!((0..UNITS).all(|unit| unique.contains(&unit)), "run {run}");
    }
}

#[test]
fn test_large_model_pass_processes_every_type_once() {
    let model = TestModel::flat(UNITS as usize);

    for _ in 0..3 {
        let orchestrator =
            TaskOrchestrator::for_model("flat", Context::Entities, &model, &test_config(4))
                .unwrap();
        let processor = RecordingProcessor::new();

        orchestrator.perform(processor.clone()).unwrap();

        let processed = processor.processed();
        let unique: HashSet<&String> = processed.iter().collect();
        assert_eq!(processed.len(), UNITS as usize);
        assert_eq!(unique.len(), UNITS as usize);
        assert_eq!(orchestrator.completed_count(), UNITS as usize);
    }
}
