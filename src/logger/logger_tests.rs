//! Unit tests for logger handles.

use super::*;
use crate::sink::MemorySink;
use rstest::rstest;
use std::sync::Arc;

fn hierarchy_with_root_sink() -> (Hierarchy, MemorySink) {
    let hierarchy = Hierarchy::new();
    let sink = MemorySink::new();
    hierarchy
        .root()
        .add_sink(Arc::new(sink.clone()))
        .expect("root is always live");
    (hierarchy, sink)
}

#[rstest]
#[case(Level::Fatal, "FATAL - m")]
#[case(Level::Error, "ERROR - m")]
#[case(Level::Warn, "WARN - m")]
#[case(Level::Info, "INFO - m")]
#[case(Level::Debug, "DEBUG - m")]
fn convenience_methods_use_their_level(#[case] level: Level, #[case] expected: &str) {
    let (hierarchy, sink) = hierarchy_with_root_sink();
    let logger = hierarchy.get_logger("core").expect("valid name");
    let outcome = match level {
        Level::Fatal => logger.fatal("m"),
        Level::Error => logger.error("m"),
        Level::Warn => logger.warn("m"),
        Level::Info => logger.info("m"),
        _ => logger.debug("m"),
    };
    assert_eq!(outcome.rendered(), Some(expected));
    assert_eq!(sink.lines(), vec![expected.to_string()]);
    assert_eq!(sink.captured()[0].event.level, level);
}

#[test]
fn handles_to_same_name_share_configuration() {
    let hierarchy = Hierarchy::new();
    let a = hierarchy.get_logger("INF").expect("valid name");
    let b = hierarchy.get_logger("INF").expect("valid name");
    a.set_level(Level::Info).expect("live");
    assert_eq!(b.level(), Ok(Some(Level::Info)));
    assert!(!b.is_enabled_for(Level::Debug));
    assert!(b.is_enabled_for(Level::Info));
}

#[test]
fn parent_handle_walks_up_to_root() {
    let hierarchy = Hierarchy::new();
    let leaf = hierarchy.get_logger("a.b").expect("valid name");
    let names: Vec<String> = std::iter::successors(Some(leaf), |l| {
        l.parent().expect("live")
    })
    .map(|l| l.name().to_string())
    .collect();
    assert_eq!(names, vec!["a.b", "a", "root"]);
}

#[test]
fn log_with_error_attaches_payload() {
    let (hierarchy, sink) = hierarchy_with_root_sink();
    let logger = hierarchy.get_logger("svc").expect("valid name");
    let err = std::io::Error::other("disk on fire");
    logger.error_with_error("write failed", ErrorPayload::from_error(&err));
    assert_eq!(
        sink.lines(),
        vec!["ERROR - write failed\nError: disk on fire".to_string()]
    );
}

#[test]
fn debug_output_names_the_logger() {
    let hierarchy = Hierarchy::new();
    let logger = hierarchy.get_logger("x.y").expect("valid name");
    assert!(format!("{logger:?}").contains("\"x.y\""));
}
