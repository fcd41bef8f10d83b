//! Layouts render a [`LogEvent`] into the text handed to sinks.
//!
//! Provides the core [`Layout`] trait, a cloneable [`SharedLayout`] wrapper
//! for trait objects and the two layouts the verification harness uses:
//! [`SimpleLayout`] and [`TtccLayout`].

use std::{fmt, sync::Arc};

use chrono::{DateTime, Local};

use crate::log_record::LogEvent;

mod error;

pub use error::{format_error_payload, format_stack_frame};

/// Date pattern used by [`TtccLayout`] by default, e.g.
/// `18 Feb 2002 20:02:41,551`.
pub const DATE_AND_TIME_FORMAT: &str = "%d %b %Y %H:%M:%S,%3f";

/// Trait for rendering log events into strings.
///
/// Implementors must be pure and thread-safe (`Send + Sync`) because a
/// single layout renders every event of a hierarchy. A rendered event may
/// span several lines but carries no trailing newline; sinks add it.
pub trait Layout: Send + Sync {
    /// Render an event into its textual representation.
    fn render(&self, event: &LogEvent) -> String;
}

/// Shared layout trait object.
#[derive(Clone)]
pub struct SharedLayout {
    inner: Arc<dyn Layout>,
}

impl SharedLayout {
    /// Create a shared layout from an owned implementation.
    pub fn new<L>(layout: L) -> Self
    where
        L: Layout + 'static,
    {
        Self {
            inner: Arc::new(layout),
        }
    }

    /// Wrap an existing shared trait object.
    pub fn from_arc(inner: Arc<dyn Layout>) -> Self {
        Self { inner }
    }

    pub fn render(&self, event: &LogEvent) -> String {
        self.inner.render(event)
    }
}

impl Default for SharedLayout {
    fn default() -> Self {
        Self::new(SimpleLayout)
    }
}

impl fmt::Debug for SharedLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedLayout(<dyn Layout>)")
    }
}

impl<L> From<L> for SharedLayout
where
    L: Layout + 'static,
{
    fn from(layout: L) -> Self {
        Self::new(layout)
    }
}

/// Append the rendered error payload, if any, below the first line.
fn push_error(output: &mut String, event: &LogEvent) {
    if let Some(error) = &event.error {
        output.push('\n');
        let rendered = format_error_payload(error);
        output.push_str(rendered.trim_end_matches('\n'));
    }
}

/// Renders `LEVEL - message`.
#[derive(Copy, Clone, Debug, Default)]
pub struct SimpleLayout;

impl Layout for SimpleLayout {
    fn render(&self, event: &LogEvent) -> String {
        let mut output = format!("{} - {}", event.level, event.message);
        push_error(&mut output, event);
        output
    }
}

/// Renders `date [thread] LEVEL logger - message`.
///
/// Time, thread, category and context: the date uses the local time zone
/// and [`DATE_AND_TIME_FORMAT`] unless another `chrono` pattern is given.
#[derive(Clone, Debug)]
pub struct TtccLayout {
    date_format: String,
}

impl TtccLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom `chrono` strftime pattern for the date field.
    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }
}

impl Default for TtccLayout {
    fn default() -> Self {
        Self {
            date_format: DATE_AND_TIME_FORMAT.to_string(),
        }
    }
}

impl Layout for TtccLayout {
    fn render(&self, event: &LogEvent) -> String {
        let timestamp: DateTime<Local> = event.metadata.timestamp.into();
        let mut output = format!(
            "{} [{}] {} {} - {}",
            timestamp.format(&self.date_format),
            event.metadata.thread_label(),
            event.level,
            event.logger,
            event.message
        );
        push_error(&mut output, event);
        output
    }
}

impl Layout for Arc<dyn Layout> {
    fn render(&self, event: &LogEvent) -> String {
        (**self).render(event)
    }
}

impl Layout for Box<dyn Layout> {
    fn render(&self, event: &LogEvent) -> String {
        (**self).render(event)
    }
}
