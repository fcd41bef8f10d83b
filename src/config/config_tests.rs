//! Unit tests for configuration builders.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::hierarchy::Hierarchy;
use crate::level::Level;
use crate::sink::{MemorySink, SharedSink};

#[fixture]
fn hierarchy() -> Hierarchy {
    Hierarchy::new()
}

fn memory() -> (MemorySink, SharedSink) {
    let sink = MemorySink::new();
    let shared: SharedSink = Arc::new(sink.clone());
    (sink, shared)
}

#[rstest]
fn build_rejects_invalid_version(hierarchy: Hierarchy) {
    let builder = ConfigBuilder::new()
        .with_version(2)
        .with_root_logger(LoggerConfigBuilder::new());
    assert!(matches!(
        builder.build_and_apply(&hierarchy),
        Err(ConfigError::UnsupportedVersion(2))
    ));
}

#[rstest]
fn build_rejects_missing_root(hierarchy: Hierarchy) {
    let err = ConfigBuilder::new()
        .build_and_apply(&hierarchy)
        .expect_err("root is required");
    assert!(matches!(err, ConfigError::MissingRootLogger));
}

#[rstest]
fn levels_and_additivity_are_applied(hierarchy: Hierarchy) {
    let (sink, shared) = memory();
    ConfigBuilder::new()
        .with_sink("mem", SinkBuilder::shared(shared))
        .with_root_logger(LoggerConfigBuilder::new().with_sinks(["mem"]))
        .with_logger("ERR", LoggerConfigBuilder::new().with_level(Level::Error))
        .with_logger(
            "quiet",
            LoggerConfigBuilder::new()
                .with_level(Level::Fatal)
                .with_additivity(false),
        )
        .build_and_apply(&hierarchy)
        .expect("valid configuration");

    let err = hierarchy.get_logger("ERR").expect("configured");
    assert_eq!(err.level(), Ok(Some(Level::Error)));
    assert!(err.warn("dropped").is_suppressed());
    assert!(err.error("kept").is_emitted());

    let quiet = hierarchy.get_logger("quiet").expect("configured");
    assert_eq!(quiet.additivity(), Ok(false));
    quiet.fatal("not routed to root");

    assert_eq!(sink.messages(), vec!["kept"]);
}

#[rstest]
fn shared_sink_attached_once_per_logger(hierarchy: Hierarchy) {
    let logger_cfg = LoggerConfigBuilder::new().with_sinks(["out"]);
    ConfigBuilder::new()
        .with_sink("out", SinkBuilder::stderr())
        .with_root_logger(LoggerConfigBuilder::new())
        .with_logger("first", logger_cfg.clone())
        .with_logger("second", logger_cfg)
        .build_and_apply(&hierarchy)
        .expect("valid configuration");

    let first = hierarchy.get_logger("first").expect("configured").sinks().expect("live");
    let second = hierarchy.get_logger("second").expect("configured").sinks().expect("live");
    assert_eq!(first.len(), 1);
    assert!(Arc::ptr_eq(&first[0], &second[0]), "sink should be shared");
}

#[rstest]
fn unknown_sink_id_leaves_hierarchy_untouched(hierarchy: Hierarchy) {
    let (_, shared) = memory();
    hierarchy.root().add_sink(Arc::clone(&shared)).expect("live");
    hierarchy.set_threshold(Level::Info);

    let err = ConfigBuilder::new()
        .with_threshold(Level::Fatal)
        .with_root_logger(LoggerConfigBuilder::new().with_level(Level::Error))
        .with_logger("child", LoggerConfigBuilder::new().with_sinks(["missing", "gone"]))
        .build_and_apply(&hierarchy)
        .expect_err("unknown sink ids");

    assert!(matches!(&err, ConfigError::UnknownSinkIds(ids) if ids == &["missing", "gone"]));
    assert_eq!(err.to_string(), "unknown sink ids: missing, gone");
    assert_eq!(hierarchy.threshold(), Level::Info);
    assert_eq!(hierarchy.root().level(), Ok(Some(Level::Debug)));
    assert_eq!(hierarchy.root().sinks().expect("live").len(), 1);
    assert!(!hierarchy.exists("child"));
}

#[rstest]
fn duplicate_sink_ids_rejected(hierarchy: Hierarchy) {
    let err = ConfigBuilder::new()
        .with_sink("a", SinkBuilder::stdout())
        .with_root_logger(LoggerConfigBuilder::new().with_sinks(["a", "a"]))
        .build_and_apply(&hierarchy)
        .expect_err("duplicate ids");
    assert!(matches!(err, ConfigError::DuplicateSinkIds(ids) if ids == ["a"]));
}

#[rstest]
#[case("")]
#[case("a..b")]
#[case(".leading")]
fn invalid_logger_names_rejected(hierarchy: Hierarchy, #[case] name: &str) {
    let err = ConfigBuilder::new()
        .with_root_logger(LoggerConfigBuilder::new())
        .with_logger(name, LoggerConfigBuilder::new())
        .build_and_apply(&hierarchy)
        .expect_err("invalid name");
    assert!(matches!(err, ConfigError::InvalidLoggerName(n) if n == name));
}

#[rstest]
fn empty_file_path_is_a_sink_build_error(hierarchy: Hierarchy) {
    let err = ConfigBuilder::new()
        .with_sink("file", SinkBuilder::file(""))
        .with_root_logger(LoggerConfigBuilder::new())
        .build_and_apply(&hierarchy)
        .expect_err("empty path");
    assert!(matches!(
        err,
        ConfigError::SinkBuild {
            ref id,
            source: SinkBuildError::InvalidConfig(_),
        } if id == "file"
    ));
}

#[rstest]
fn file_sinks_write_rendered_lines(hierarchy: Hierarchy) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.log");
    std::fs::write(&path, "previous\n").expect("seed file");

    ConfigBuilder::new()
        .with_sink("file", SinkBuilder::append(&path))
        .with_root_logger(LoggerConfigBuilder::new().with_sinks(["file"]))
        .build_and_apply(&hierarchy)
        .expect("valid configuration");
    hierarchy.get_logger("app").expect("valid").info("appended");
    assert!(hierarchy.flush_sinks());

    assert_eq!(
        std::fs::read_to_string(&path).expect("read"),
        "previous\nINFO - appended\n"
    );
}

#[rstest]
fn reset_layout_and_threshold_are_applied(hierarchy: Hierarchy) {
    let stale = hierarchy.get_logger("old").expect("valid");
    let (sink, shared) = memory();
    ConfigBuilder::new()
        .with_reset(true)
        .with_threshold(Level::Warn)
        .with_layout(LayoutBuilder::Ttcc {
            date_format: Some("D".into()),
        })
        .with_sink("mem", SinkBuilder::shared(shared))
        .with_root_logger(LoggerConfigBuilder::new().with_sinks(["mem"]))
        .build_and_apply(&hierarchy)
        .expect("valid configuration");

    assert!(!hierarchy.exists("old"));
    assert!(stale.level().is_err());
    let logger = hierarchy.get_logger("new").expect("valid");
    logger.info("below threshold");
    logger.warn("shown");
    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("D ["));
    assert!(lines[0].ends_with("] WARN new - shown"));
}

#[test]
fn logger_builder_keeps_sink_order() {
    let cfg = LoggerConfigBuilder::new().with_sinks(["z", "a", "m"]);
    assert_eq!(cfg.sink_ids(), ["z", "a", "m"]);
    assert_eq!(cfg.level_opt(), None);
    assert_eq!(cfg.additivity_opt(), None);
}
