//! Line-oriented normalisation of captured log output.
//!
//! A [`LinePipeline`] is an ordered chain of [`LineFilter`]s. Each input
//! line is offered to the filters left to right; a filter may pass it on
//! unchanged, replace it, or drop it, in which case later filters never see
//! it. Filters are built from [`FilterSpec`] values by [`PipelineBuilder`],
//! which compiles every pattern up front so that a bad pattern is reported
//! before any line is processed.
//!
//! [`presets`] holds the filters that neutralise timestamps, call-site line
//! numbers, thread names and runtime stack frames.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

mod builder;
mod filters;
pub mod presets;

pub use builder::{FilterSpec, PipelineBuilder};
pub use filters::{DropFilter, GateFilter, RetainFilter, SubstituteFilter};

/// What a filter decided for one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Keep the line as it is.
    Pass,
    /// Keep the line, replaced by the given text.
    Rewrite(String),
    /// Remove the line from the output.
    Drop,
}

/// A single stage of a [`LinePipeline`].
///
/// Filters may keep state across lines; [`reset`](Self::reset) is called at
/// the start of every run so each run starts from the same state.
pub trait LineFilter: Send {
    fn apply(&mut self, line: &str) -> Verdict;

    fn reset(&mut self) {}
}

/// Errors raised while building or running a pipeline over files.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A filter pattern failed to compile.
    #[error("invalid filter pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Ordered chain of line filters.
#[derive(Default)]
pub struct LinePipeline {
    filters: Vec<Box<dyn LineFilter>>,
}

impl LinePipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub(crate) fn from_filters(filters: Vec<Box<dyn LineFilter>>) -> Self {
        Self { filters }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Lazily normalise `lines`.
    ///
    /// Every filter is reset before the first line is read.
    pub fn run<I>(&mut self, lines: I) -> Normalized<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for filter in &mut self.filters {
            filter.reset();
        }
        Normalized {
            filters: &mut self.filters,
            lines: lines.into_iter(),
        }
    }

    /// Normalise a block of text, splitting it on line breaks.
    pub fn normalize(&mut self, text: &str) -> Vec<String> {
        self.run(text.lines()).collect()
    }
}

/// Iterator returned by [`LinePipeline::run`].
pub struct Normalized<'p, I> {
    filters: &'p mut [Box<dyn LineFilter>],
    lines: I,
}

impl<I> Iterator for Normalized<'_, I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for line in self.lines.by_ref() {
            if let Some(kept) = apply_filters(self.filters, line.as_ref()) {
                return Some(kept);
            }
        }
        None
    }
}

fn apply_filters(filters: &mut [Box<dyn LineFilter>], line: &str) -> Option<String> {
    let mut current = Cow::Borrowed(line);
    for filter in filters.iter_mut() {
        match filter.apply(&current) {
            Verdict::Pass => {}
            Verdict::Rewrite(replacement) => current = Cow::Owned(replacement),
            Verdict::Drop => return None,
        }
    }
    Some(current.into_owned())
}

/// Normalise the file at `input` into `output`; returns the lines written.
pub fn transform(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    pipeline: &mut LinePipeline,
) -> Result<usize, PipelineError> {
    let input = input.as_ref();
    let output = output.as_ref();
    let text = fs::read_to_string(input).map_err(|source| PipelineError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let lines = pipeline.normalize(&text);
    let mut contents = String::with_capacity(text.len());
    for line in &lines {
        contents.push_str(line);
        contents.push('\n');
    }
    fs::write(output, contents).map_err(|source| PipelineError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    Ok(lines.len())
}
