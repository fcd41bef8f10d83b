//! Scripted reference run used by the verification CLI.
//!
//! [`run_minimum`] configures a fixed set of loggers and issues 35 numbered
//! calls against them followed by a summary line. Calls 0 to 23 pass their
//! logger's effective level; calls 24 to 34 do not. Call 23 carries an
//! error payload.

use crate::error_payload::ErrorPayload;
use crate::hierarchy::{Hierarchy, HierarchyError};
use crate::level::Level;

/// Final line logged through `INF` at the end of the run.
pub const SUMMARY_MESSAGE: &str = "Messages should bear numbers 0 through 23.";
/// Numbered calls expected to be emitted.
pub const EMITTED_CALLS: usize = 24;
/// Numbered calls expected to be suppressed.
pub const SUPPRESSED_CALLS: usize = 11;

const ERROR_CALL: usize = 23;

/// Explicit levels set before the run; other loggers inherit.
const LEVELS: [(&str, Level); 4] = [
    ("ERR", Level::Error),
    ("INF", Level::Info),
    ("INF.ERR", Level::Error),
    ("DEB", Level::Debug),
];

const UNSET: [&str; 3] = ["INF.UNDEF", "INF.ERR.UNDEF", "UNDEF"];

/// Numbered calls in issue order: the call number is the index.
const CALLS: [(&str, Level); 35] = [
    ("ERR", Level::Fatal),
    ("ERR", Level::Error),
    ("INF", Level::Fatal),
    ("INF", Level::Error),
    ("INF", Level::Warn),
    ("INF", Level::Info),
    ("INF.UNDEF", Level::Fatal),
    ("INF.UNDEF", Level::Error),
    ("INF.UNDEF", Level::Warn),
    ("INF.UNDEF", Level::Info),
    ("INF.ERR", Level::Fatal),
    ("INF.ERR", Level::Error),
    ("INF.ERR.UNDEF", Level::Fatal),
    ("INF.ERR.UNDEF", Level::Error),
    ("DEB", Level::Fatal),
    ("DEB", Level::Error),
    ("DEB", Level::Warn),
    ("DEB", Level::Info),
    ("DEB", Level::Debug),
    ("UNDEF", Level::Fatal),
    ("UNDEF", Level::Error),
    ("UNDEF", Level::Warn),
    ("UNDEF", Level::Info),
    ("UNDEF", Level::Debug),
    // None of the following pass.
    ("ERR", Level::Warn),
    ("ERR", Level::Info),
    ("ERR", Level::Debug),
    ("INF", Level::Debug),
    ("INF.UNDEF", Level::Debug),
    ("INF.ERR", Level::Warn),
    ("INF.ERR", Level::Info),
    ("INF.ERR", Level::Debug),
    ("INF.ERR.UNDEF", Level::Warn),
    ("INF.ERR.UNDEF", Level::Info),
    ("INF.ERR.UNDEF", Level::Debug),
];

/// Tally of a scenario run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScenarioOutcome {
    /// Numbered calls that were emitted.
    pub emitted: usize,
    /// Numbered calls that were suppressed.
    pub suppressed: usize,
    /// Sink failures across every emitted call, summary included.
    pub sink_failures: usize,
}

impl ScenarioOutcome {
    /// `true` when exactly calls 0 to 23 were emitted.
    pub fn is_expected(&self) -> bool {
        self.emitted == EMITTED_CALLS && self.suppressed == SUPPRESSED_CALLS
    }
}

/// Set the explicit levels used by the run and create the unset loggers.
pub fn configure_minimum(hierarchy: &Hierarchy) -> Result<(), HierarchyError> {
    for (name, level) in LEVELS {
        hierarchy.get_logger(name)?.set_level(level)?;
    }
    for name in UNSET {
        hierarchy.get_or_create(name)?;
    }
    Ok(())
}

/// Configure the loggers and issue every scripted call.
///
/// Sinks must already be attached, normally to the root logger.
pub fn run_minimum(hierarchy: &Hierarchy) -> Result<ScenarioOutcome, HierarchyError> {
    configure_minimum(hierarchy)?;

    let mut outcome = ScenarioOutcome::default();
    for (number, (name, level)) in CALLS.into_iter().enumerate() {
        let logger = hierarchy.get_logger(name)?;
        let message = format!("Message {number}");
        let dispatch = if number == ERROR_CALL {
            let error = ErrorPayload::new("Exception", "Just testing.")
                .with_caller_frame(concat!(module_path!(), "::run_minimum"));
            logger.log_with_error(level, &message, error)
        } else {
            logger.log(level, &message)
        };
        match dispatch.report() {
            Some(report) => {
                outcome.emitted += 1;
                outcome.sink_failures += report.failures.len();
            }
            None => outcome.suppressed += 1,
        }
    }

    let summary = hierarchy.get_logger("INF")?.info(SUMMARY_MESSAGE);
    if let Some(report) = summary.report() {
        outcome.sink_failures += report.failures.len();
    }
    Ok(outcome)
}
