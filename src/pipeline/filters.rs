//! Concrete line filters.

use regex::{Regex, RegexSet};

use super::{LineFilter, Verdict};

/// Rewrite every match of `pattern` with `replacement`.
///
/// `replacement` follows `regex` expansion rules, so `${1}` refers to the
/// first capture group.
#[derive(Clone, Debug)]
pub struct SubstituteFilter {
    pattern: Regex,
    replacement: String,
}

impl SubstituteFilter {
    pub fn new(pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            pattern,
            replacement: replacement.into(),
        }
    }
}

impl LineFilter for SubstituteFilter {
    fn apply(&mut self, line: &str) -> Verdict {
        let rewritten = self.pattern.replace_all(line, self.replacement.as_str());
        if rewritten == line {
            Verdict::Pass
        } else {
            Verdict::Rewrite(rewritten.into_owned())
        }
    }
}

/// Drop lines matching `pattern`.
#[derive(Clone, Debug)]
pub struct DropFilter {
    pattern: Regex,
}

impl DropFilter {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl LineFilter for DropFilter {
    fn apply(&mut self, line: &str) -> Verdict {
        if self.pattern.is_match(line) {
            Verdict::Drop
        } else {
            Verdict::Pass
        }
    }
}

/// Keep only the lines of regions bounded by control patterns.
///
/// A region opens on a line matching `start` and closes after the next
/// line matching `end`; both control lines are kept. The start line itself
/// is not tested against `end`. Lines outside every region are dropped.
#[derive(Clone, Debug)]
pub struct GateFilter {
    start: Regex,
    end: Regex,
    inside: bool,
}

impl GateFilter {
    pub fn new(start: Regex, end: Regex) -> Self {
        Self {
            start,
            end,
            inside: false,
        }
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }
}

impl LineFilter for GateFilter {
    fn apply(&mut self, line: &str) -> Verdict {
        if self.inside {
            if self.end.is_match(line) {
                self.inside = false;
            }
            return Verdict::Pass;
        }
        if self.start.is_match(line) {
            self.inside = true;
            Verdict::Pass
        } else {
            Verdict::Drop
        }
    }

    fn reset(&mut self) {
        self.inside = false;
    }
}

/// Keep only lines matching at least one of a set of patterns.
#[derive(Clone, Debug)]
pub struct RetainFilter {
    patterns: RegexSet,
}

impl RetainFilter {
    pub fn new(patterns: RegexSet) -> Self {
        Self { patterns }
    }
}

impl LineFilter for RetainFilter {
    fn apply(&mut self, line: &str) -> Verdict {
        if self.patterns.is_match(line) {
            Verdict::Pass
        } else {
            Verdict::Drop
        }
    }
}
