//! Ready-made filters for output that varies between runs.
//!
//! Each preset is idempotent: normalising already-normalised text leaves it
//! unchanged. The placeholders (`(X)`, `<date>`, `<timestamp>`, `[main]`)
//! are chosen so they never match the pattern that produced them.

use super::{FilterSpec, LinePipeline, PipelineError};

/// Placeholder replacing a `(file:line)` call-site location.
pub const LOCATION_PLACEHOLDER: &str = "(X)";
/// Placeholder replacing a leading TTCC-style date.
pub const DATE_PLACEHOLDER: &str = "<date>";
pub const TIMESTAMP_PLACEHOLDER: &str = "<timestamp>";
/// Thread name every thread field is rewritten to.
pub const THREAD_PLACEHOLDER: &str = "main";

const ABSOLUTE_DATE: &str = r"\d{1,2} [A-Za-z]{3,4}\.? \d{4} \d{2}:\d{2}:\d{2},\d{3}";
const LEVEL_NAMES: &str = "(DEBUG|INFO|WARN|ERROR|FATAL)";

/// `(src/file.rs:12)` or `(src/file.rs:12:5)` becomes `(X)`.
pub fn line_numbers() -> FilterSpec {
    FilterSpec::substitute(r"\([^()\s]*:\d+(:\d+)?\)", LOCATION_PLACEHOLDER)
}

/// A leading `18 Feb 2002 20:02:41,000` becomes `<date>`.
pub fn absolute_date_and_time() -> FilterSpec {
    FilterSpec::substitute(format!("^{ABSOLUTE_DATE}"), DATE_PLACEHOLDER)
}

/// RFC 3339 / ISO 8601 timestamps anywhere in the line become `<timestamp>`.
pub fn iso8601() -> FilterSpec {
    FilterSpec::substitute(
        r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}([.,]\d+)?(Z|[+-]\d{2}:?\d{2})?",
        TIMESTAMP_PLACEHOLDER,
    )
}

/// The bracketed thread field preceding a level name becomes `[main]`.
pub fn thread_names() -> FilterSpec {
    FilterSpec::substitute(
        format!(r"\[[^\]]*\] {LEVEL_NAMES} "),
        format!("[{THREAD_PLACEHOLDER}] ${{1}} "),
    )
}

/// Drop stack frames belonging to the standard library and process startup.
pub fn runtime_frames() -> FilterSpec {
    FilterSpec::drop_matching(
        r"^\s+at (?:(?:std|core|alloc)::|<.* as (?:std|core|alloc)::|__rust|rust_begin_unwind|__libc_start|_start\b|BaseThreadInitThunk|RtlUserThreadStart|__scrt_common_main|<unknown>)",
    )
}

/// Drop stack frames belonging to the `cargo test` harness.
pub fn test_runner_frames() -> FilterSpec {
    FilterSpec::drop_matching(r"^\s+at (?:test::|<.* as test::)")
}

/// Filters applied to output written with [`SimpleLayout`](crate::layout::SimpleLayout).
pub fn simple_filters() -> Vec<FilterSpec> {
    vec![line_numbers(), runtime_frames(), test_runner_frames()]
}

/// Filters applied to output written with [`TtccLayout`](crate::layout::TtccLayout).
///
/// Only lines shaped like scenario output survive, and of those only the
/// region between the first numbered message and the closing summary line.
/// The gate sees retained lines only, so normalised output opens it on the
/// same line again.
pub fn ttcc_filters() -> Vec<FilterSpec> {
    let date = format!("(?:{ABSOLUTE_DATE}|{DATE_PLACEHOLDER})");
    let head = format!(r"^{date} \[[^\]]*\] {LEVEL_NAMES} \S+ - ");
    vec![
        FilterSpec::retain([
            format!(r"{head}Message \d{{1,2}}$"),
            format!(r"{head}Messages should bear numbers 0 through 23\.$"),
            r"^Exception: Just testing\.?$".to_string(),
            r"^\s+at .*\((?:[^()\s]*:\d{1,4}(?::\d+)?|X)\)$".to_string(),
            r"^\s+at .*\(Unknown Source\)$".to_string(),
        ]),
        FilterSpec::gate(
            r" - Message 0$",
            r" - Messages should bear numbers 0 through 23\.$",
        ),
        line_numbers(),
        absolute_date_and_time(),
        thread_names(),
        runtime_frames(),
        test_runner_frames(),
    ]
}

pub fn simple_pipeline() -> Result<LinePipeline, PipelineError> {
    LinePipeline::builder().with_all(simple_filters()).build()
}

pub fn ttcc_pipeline() -> Result<LinePipeline, PipelineError> {
    LinePipeline::builder().with_all(ttcc_filters()).build()
}
