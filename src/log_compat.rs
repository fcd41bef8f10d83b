//! Compatibility bridge for the Rust `log` crate.
//!
//! [`LogBridge`] implements `log::Log` by forwarding records into a
//! [`Hierarchy`]. Record targets become logger names, with `::` rewritten
//! to `.` so module paths land in the matching part of the tree. Targets
//! that are not valid logger names fall back to the root logger.
//!
//! hierlog reports its own sink failures through `log`. When the bridge is
//! installed those reports would re-enter the hierarchy; a thread-local
//! guard drops records raised while the bridge is already dispatching.

use std::borrow::Cow;
use std::cell::Cell;
use std::sync::Arc;

use log::{Metadata, Record};
use once_cell::sync::OnceCell;

use crate::hierarchy::{Hierarchy, LoggerId};
use crate::level::Level;
use crate::log_record::{EventMetadata, LogEvent};

/// Adapter implementing the Rust `log::Log` trait over a hierarchy.
pub struct LogBridge {
    hierarchy: Arc<Hierarchy>,
}

impl LogBridge {
    pub fn new(hierarchy: Arc<Hierarchy>) -> Self {
        Self { hierarchy }
    }

    pub fn hierarchy(&self) -> &Arc<Hierarchy> {
        &self.hierarchy
    }

    fn resolve(&self, target: &str) -> LoggerId {
        let normalised = normalise_target(target);
        self.hierarchy
            .get_or_create(&normalised)
            .unwrap_or_else(|_| self.hierarchy.root().id())
    }

    /// Nearest existing node for `target`, creating nothing.
    ///
    /// A missing node would inherit its level from this one, so level
    /// queries answer the same as they would after creation.
    fn resolve_existing(&self, target: &str) -> LoggerId {
        let normalised = normalise_target(target);
        let mut name: &str = &normalised;
        loop {
            if let Some(id) = self.hierarchy.lookup(name) {
                return id;
            }
            match name.rsplit_once('.') {
                Some((parent, _)) => name = parent,
                None => return self.hierarchy.root().id(),
            }
        }
    }
}

fn map_log_level(level: log::Level) -> Level {
    match level {
        log::Level::Trace | log::Level::Debug => Level::Debug,
        log::Level::Info => Level::Info,
        log::Level::Warn => Level::Warn,
        log::Level::Error => Level::Error,
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        map_log_level(level)
    }
}

fn normalise_target(target: &str) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", "."))
    } else {
        Cow::Borrowed(target)
    }
}

thread_local! {
    static IN_BRIDGE: Cell<bool> = const { Cell::new(false) };
}

/// Clears the reentrancy flag when dropped.
struct BridgeGuard;

impl BridgeGuard {
    fn enter() -> Option<Self> {
        IN_BRIDGE.with(|flag| {
            if flag.replace(true) {
                None
            } else {
                Some(Self)
            }
        })
    }
}

impl Drop for BridgeGuard {
    fn drop(&mut self) {
        IN_BRIDGE.with(|flag| flag.set(false));
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        let id = self.resolve_existing(metadata.target());
        self.hierarchy.is_enabled_for(id, Level::from(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        let Some(_guard) = BridgeGuard::enter() else {
            return;
        };
        let id = self.resolve(record.target());
        let level = Level::from(record.level());
        self.hierarchy.dispatch(id, level, |logger| {
            let metadata = EventMetadata::for_source(
                record.file().unwrap_or_default(),
                record.line().unwrap_or(0),
            );
            LogEvent::with_metadata(logger, level, &record.args().to_string(), metadata)
        });
    }

    fn flush(&self) {
        self.hierarchy.flush_sinks();
    }
}

static INSTALL_RESULT: OnceCell<bool> = OnceCell::new();

/// Install a bridge over `hierarchy` as the global `log` logger.
///
/// Returns `true` on success. When a different global logger is already
/// set, installation fails and `false` is returned. Subsequent calls return
/// the cached outcome and ignore their argument.
pub fn install(hierarchy: Arc<Hierarchy>) -> bool {
    *INSTALL_RESULT.get_or_init(|| {
        let bridge: &'static LogBridge = Box::leak(Box::new(LogBridge::new(hierarchy)));
        if log::set_logger(bridge).is_err() {
            return false;
        }
        log::set_max_level(log::LevelFilter::Trace);
        true
    })
}
