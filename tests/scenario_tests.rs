//! End-to-end runs of the reference scenario through the normalisation
//! pipeline, checked against the witness files.

mod test_utils;

use std::sync::Arc;

use hierlog::pipeline::presets;
use hierlog::{Hierarchy, Level, MemorySink, SharedSink, compare, scenario};
use rstest::rstest;
use test_utils::SharedBuf;
use test_utils::fixtures::{simple_hierarchy, ttcc_hierarchy, witness};

fn witness_lines(name: &str) -> Vec<String> {
    std::fs::read_to_string(witness(name))
        .expect("witness file is checked in")
        .lines()
        .map(str::to_owned)
        .collect()
}

#[rstest]
fn simple_output_matches_witness(simple_hierarchy: (SharedBuf, Hierarchy)) {
    let (buffer, hierarchy) = simple_hierarchy;
    let outcome = scenario::run_minimum(&hierarchy).expect("scenario runs");
    assert!(outcome.is_expected());

    let mut pipeline = presets::simple_pipeline().expect("presets compile");
    let filtered = pipeline.normalize(&buffer.text());
    let comparison = compare::diff(&witness_lines("simple"), &filtered);
    assert!(comparison.is_match(), "{comparison}");
}

#[rstest]
fn ttcc_output_matches_witness(ttcc_hierarchy: (SharedBuf, Hierarchy)) {
    let (buffer, hierarchy) = ttcc_hierarchy;
    // Noise outside the scenario is cut by the pipeline.
    hierarchy
        .get_logger("setup")
        .expect("valid name")
        .info("preparing run");
    scenario::run_minimum(&hierarchy).expect("scenario runs");
    hierarchy.get_logger("teardown").expect("valid name").warn("done");

    let mut pipeline = presets::ttcc_pipeline().expect("presets compile");
    let filtered = pipeline.normalize(&buffer.text());
    assert!(compare::equal(&witness_lines("ttcc"), &filtered));
}

#[rstest]
fn raising_root_threshold_changes_output(simple_hierarchy: (SharedBuf, Hierarchy)) {
    let (buffer, hierarchy) = simple_hierarchy;
    hierarchy.set_threshold(Level::Error);
    let outcome = scenario::run_minimum(&hierarchy).expect("scenario runs");
    assert!(!outcome.is_expected());

    let mut pipeline = presets::simple_pipeline().expect("presets compile");
    let filtered = pipeline.normalize(&buffer.text());
    let comparison = compare::diff(&witness_lines("simple"), &filtered);
    assert!(!comparison.is_match());
    assert_eq!(
        comparison.first_mismatch().map(|m| m.index),
        Some(4),
        "first divergence is the suppressed WARN on INF"
    );
}

#[rstest]
fn reset_between_runs_gives_identical_output(simple_hierarchy: (SharedBuf, Hierarchy)) {
    let (first, hierarchy) = simple_hierarchy;
    scenario::run_minimum(&hierarchy).expect("first run");
    hierarchy.reset();

    let second = MemorySink::new();
    let shared: SharedSink = Arc::new(second.clone());
    hierarchy.root().add_sink(shared).expect("root survives reset");
    scenario::run_minimum(&hierarchy).expect("second run");

    let mut pipeline = presets::simple_pipeline().expect("presets compile");
    let before = pipeline.normalize(&first.text());
    let after = pipeline.normalize(&second.contents());
    assert!(compare::equal(&before, &after));
    assert_eq!(first.text().lines().count(), before.len());
}

#[test]
fn non_additive_intermediate_hides_scenario_from_root() {
    let hierarchy = Hierarchy::new();
    let root_sink = MemorySink::new();
    let inf_sink = MemorySink::new();
    hierarchy
        .root()
        .add_sink(Arc::new(root_sink.clone()))
        .expect("live");
    let inf = hierarchy.get_logger("INF").expect("valid name");
    inf.add_sink(Arc::new(inf_sink.clone())).expect("live");
    inf.set_additivity(false).expect("live");

    scenario::run_minimum(&hierarchy).expect("scenario runs");

    let inf_messages = inf_sink.messages();
    assert!(inf_messages.iter().all(|m| m != "Message 0"));
    assert!(inf_messages.contains(&"Message 2".to_string()));
    assert!(inf_messages.contains(&"Message 13".to_string()));
    assert!(!root_sink.messages().contains(&"Message 2".to_string()));
    assert!(root_sink.messages().contains(&"Message 0".to_string()));
    assert_eq!(
        root_sink.len() + inf_sink.len(),
        scenario::EMITTED_CALLS + 1
    );
}
