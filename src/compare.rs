//! Line-by-line comparison of normalised output against a witness.
//!
//! Lines are compared by position only; there is no alignment or
//! resynchronisation after an insertion. Content must match exactly,
//! including whitespace, and the two sequences must have the same length.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// One position where expected and actual output differ.
///
/// `None` on either side means that sequence ended before this index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LineMismatch {
    pub index: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

/// Result of comparing two line sequences.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub expected_lines: usize,
    pub actual_lines: usize,
    pub mismatches: Vec<LineMismatch>,
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// First differing position, if any.
    pub fn first_mismatch(&self) -> Option<&LineMismatch> {
        self.mismatches.first()
    }
}

fn show(line: Option<&String>) -> &str {
    line.map_or("<end of output>", String::as_str)
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_match() {
            return write!(f, "{} lines match", self.expected_lines);
        }
        writeln!(
            f,
            "{} of {} lines differ (expected {} lines, got {})",
            self.mismatches.len(),
            self.expected_lines.max(self.actual_lines),
            self.expected_lines,
            self.actual_lines
        )?;
        for m in &self.mismatches {
            writeln!(f, "line {}:", m.index + 1)?;
            writeln!(f, "  expected: {}", show(m.expected.as_ref()))?;
            writeln!(f, "  actual:   {}", show(m.actual.as_ref()))?;
        }
        Ok(())
    }
}

/// `true` when both sequences have the same length and identical lines.
pub fn equal<E, A>(expected: &[E], actual: &[A]) -> bool
where
    E: AsRef<str>,
    A: AsRef<str>,
{
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(e, a)| e.as_ref() == a.as_ref())
}

/// Positional diff of two line sequences.
pub fn diff<E, A>(expected: &[E], actual: &[A]) -> Comparison
where
    E: AsRef<str>,
    A: AsRef<str>,
{
    let len = expected.len().max(actual.len());
    let mismatches = (0..len)
        .filter_map(|index| {
            let e = expected.get(index).map(AsRef::as_ref);
            let a = actual.get(index).map(AsRef::as_ref);
            (e != a).then(|| LineMismatch {
                index,
                expected: e.map(str::to_owned),
                actual: a.map(str::to_owned),
            })
        })
        .collect();
    Comparison {
        expected_lines: expected.len(),
        actual_lines: actual.len(),
        mismatches,
    }
}

#[derive(Debug, Error)]
#[error("failed to read {}: {source}", .path.display())]
pub struct CompareError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

fn read_lines(path: &Path) -> Result<Vec<String>, CompareError> {
    let text = fs::read_to_string(path).map_err(|source| CompareError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.lines().map(str::to_owned).collect())
}

/// Compare two files line by line.
pub fn compare_files(
    expected: impl AsRef<Path>,
    actual: impl AsRef<Path>,
) -> Result<Comparison, CompareError> {
    let expected = read_lines(expected.as_ref())?;
    let actual = read_lines(actual.as_ref())?;
    Ok(diff(&expected, &actual))
}
