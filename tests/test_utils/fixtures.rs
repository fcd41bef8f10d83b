//! Fixtures providing `(SharedBuf, Hierarchy)` pairs whose root logger
//! writes into an in-memory buffer.

use std::path::PathBuf;
use std::sync::Arc;

use hierlog::{Hierarchy, SharedLayout, SimpleLayout, TtccLayout, WriterSink};
use rstest::fixture;

use super::shared_buffer::SharedBuf;

fn buffered(layout: impl Into<SharedLayout>) -> (SharedBuf, Hierarchy) {
    let buffer = SharedBuf::new();
    let hierarchy = Hierarchy::with_layout(layout);
    hierarchy
        .root()
        .add_sink(Arc::new(WriterSink::new(buffer.clone())))
        .expect("root is always live");
    (buffer, hierarchy)
}

/// Hierarchy rendering with `SimpleLayout` into a fresh buffer.
#[fixture]
pub fn simple_hierarchy() -> (SharedBuf, Hierarchy) {
    buffered(SimpleLayout)
}

/// Hierarchy rendering with `TtccLayout` into a fresh buffer.
#[allow(dead_code)]
#[fixture]
pub fn ttcc_hierarchy() -> (SharedBuf, Hierarchy) {
    buffered(TtccLayout::new())
}

/// Path of a checked-in witness file.
#[allow(dead_code)]
pub fn witness(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("witness")
        .join(name)
}
