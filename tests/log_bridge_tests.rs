//! Installing the `log` bridge as the process-wide logger.

use std::sync::Arc;

use hierlog::{Hierarchy, Level, MemorySink, log_compat};

#[test]
fn installed_bridge_routes_log_macros() {
    let hierarchy = Arc::new(Hierarchy::new());
    let sink = MemorySink::new();
    hierarchy.root().add_sink(Arc::new(sink.clone())).expect("live");
    hierarchy
        .get_logger("log_bridge_tests.quiet")
        .expect("valid name")
        .set_level(Level::Error)
        .expect("live");

    assert!(log_compat::install(Arc::clone(&hierarchy)));
    // A second install reports the cached outcome.
    assert!(log_compat::install(Arc::new(Hierarchy::new())));

    log::info!("routed through {}", "the bridge");
    log::warn!(target: "log_bridge_tests::quiet", "below ERROR");
    log::error!(target: "log_bridge_tests::quiet", "at ERROR");

    let captured = sink.captured();
    let routed: Vec<(&str, &str)> = captured
        .iter()
        .map(|c| (c.event.logger.as_str(), c.event.message.as_str()))
        .collect();
    assert_eq!(
        routed,
        vec![
            ("log_bridge_tests", "routed through the bridge"),
            ("log_bridge_tests.quiet", "at ERROR"),
        ]
    );
    assert!(captured[0].event.metadata.filename.ends_with("log_bridge_tests.rs"));
    assert_eq!(sink.lines()[1], "ERROR - at ERROR");
}
