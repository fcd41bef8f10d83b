//! Declarative filter specifications and the pipeline builder.

use regex::{Regex, RegexSet};

use super::filters::{DropFilter, GateFilter, RetainFilter, SubstituteFilter};
use super::{LineFilter, LinePipeline, PipelineError};

/// Uncompiled description of a built-in filter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum FilterSpec {
    /// Build a [`SubstituteFilter`].
    Substitute { pattern: String, replacement: String },
    /// Build a [`DropFilter`].
    Drop { pattern: String },
    /// Build a [`GateFilter`].
    Gate { start: String, end: String },
    /// Build a [`RetainFilter`].
    Retain { patterns: Vec<String> },
}

fn compile(pattern: &str) -> Result<Regex, PipelineError> {
    Regex::new(pattern).map_err(|source| PipelineError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn compile_set(patterns: &[String]) -> Result<RegexSet, PipelineError> {
    // Compile individually first so the error names the offending pattern.
    for pattern in patterns {
        compile(pattern)?;
    }
    RegexSet::new(patterns).map_err(|source| PipelineError::InvalidPattern {
        pattern: patterns.join(" | "),
        source,
    })
}

impl FilterSpec {
    pub fn substitute(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self::Substitute {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    pub fn drop_matching(pattern: impl Into<String>) -> Self {
        Self::Drop {
            pattern: pattern.into(),
        }
    }

    pub fn gate(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self::Gate {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn retain<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Retain {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Compile the spec into a boxed filter.
    pub fn build(&self) -> Result<Box<dyn LineFilter>, PipelineError> {
        Ok(match self {
            Self::Substitute {
                pattern,
                replacement,
            } => Box::new(SubstituteFilter::new(compile(pattern)?, replacement.clone())),
            Self::Drop { pattern } => Box::new(DropFilter::new(compile(pattern)?)),
            Self::Gate { start, end } => Box::new(GateFilter::new(compile(start)?, compile(end)?)),
            Self::Retain { patterns } => Box::new(RetainFilter::new(compile_set(patterns)?)),
        })
    }
}

enum Stage {
    Spec(FilterSpec),
    Custom(Box<dyn LineFilter>),
}

/// Collects filter stages and compiles them into a [`LinePipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Stage>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a built-in filter.
    pub fn with(mut self, spec: FilterSpec) -> Self {
        self.stages.push(Stage::Spec(spec));
        self
    }

    /// Append several built-in filters in order.
    pub fn with_all<I>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = FilterSpec>,
    {
        self.stages.extend(specs.into_iter().map(Stage::Spec));
        self
    }

    pub fn substitute(self, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.with(FilterSpec::substitute(pattern, replacement))
    }

    pub fn drop_matching(self, pattern: impl Into<String>) -> Self {
        self.with(FilterSpec::drop_matching(pattern))
    }

    pub fn gate(self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.with(FilterSpec::gate(start, end))
    }

    pub fn retain<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(FilterSpec::retain(patterns))
    }

    /// Append a caller-supplied filter.
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: LineFilter + 'static,
    {
        self.stages.push(Stage::Custom(Box::new(filter)));
        self
    }

    /// Compile every stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidPattern`] for the first pattern that
    /// fails to compile.
    pub fn build(self) -> Result<LinePipeline, PipelineError> {
        let mut filters = Vec::with_capacity(self.stages.len());
        for stage in self.stages {
            filters.push(match stage {
                Stage::Spec(spec) => spec.build()?,
                Stage::Custom(filter) => filter,
            });
        }
        Ok(LinePipeline::from_filters(filters))
    }
}
