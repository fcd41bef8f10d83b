//! Registry of named loggers arranged in a dot-separated namespace.
//!
//! Nodes live in an arena owned by the [`Hierarchy`] and refer to their
//! parent by index. Callers address nodes through [`LoggerId`] values that
//! carry the generation they were issued in; [`Hierarchy::reset`] bumps the
//! generation so ids handed out before a reset can never reach the nodes or
//! sinks created after it. The root node keeps index zero for the lifetime of
//! the hierarchy, so its id survives resets.
//!
//! All state sits behind a single `parking_lot::RwLock`: dispatch takes the
//! read side, every mutation takes the write side.

use std::collections::{HashMap, HashSet};
use std::iter;
use std::sync::Arc;

use log::warn;
use parking_lot::{RwLock, RwLockReadGuard};
use thiserror::Error;

use crate::layout::SharedLayout;
use crate::level::Level;
use crate::logger::Logger;
use crate::sink::SharedSink;

/// Reserved name of the root logger.
pub const ROOT_LOGGER_NAME: &str = "root";

/// Level assigned to the root logger on construction and on reset.
pub const DEFAULT_ROOT_LEVEL: Level = Level::Debug;

const ROOT_INDEX: usize = 0;

/// Errors raised by hierarchy operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// The name is empty or contains an empty dot-separated segment.
    #[error("invalid logger name: {0:?}")]
    InvalidName(String),
    /// The id was issued before the last reset.
    #[error("logger handle is stale; the hierarchy was reset after it was issued")]
    StaleLogger,
    /// The root logger cannot be made to inherit a level.
    #[error("the root logger must keep an explicit level")]
    RootLevelRequired,
}

/// Generation-checked reference to a logger node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoggerId {
    index: usize,
    generation: u64,
}

pub(crate) struct LoggerNode {
    pub(crate) name: String,
    pub(crate) level: Option<Level>,
    pub(crate) parent: Option<usize>,
    pub(crate) sinks: Vec<SharedSink>,
    pub(crate) additive: bool,
}

impl LoggerNode {
    fn new(name: &str, parent: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            level: None,
            parent,
            sinks: Vec::new(),
            additive: true,
        }
    }

    fn root() -> Self {
        let mut node = Self::new(ROOT_LOGGER_NAME, None);
        node.level = Some(DEFAULT_ROOT_LEVEL);
        node
    }
}

pub(crate) struct Registry {
    nodes: Vec<LoggerNode>,
    by_name: HashMap<String, usize>,
    pub(crate) threshold: Level,
    pub(crate) layout: SharedLayout,
    generation: u64,
}

impl Registry {
    fn new(layout: SharedLayout) -> Self {
        Self {
            nodes: vec![LoggerNode::root()],
            by_name: HashMap::from([(ROOT_LOGGER_NAME.to_string(), ROOT_INDEX)]),
            threshold: Level::All,
            layout,
            generation: 0,
        }
    }

    fn id(&self, index: usize) -> LoggerId {
        LoggerId {
            index,
            generation: self.generation,
        }
    }

    /// Map an id onto an arena index, rejecting ids from older generations.
    pub(crate) fn resolve(&self, id: LoggerId) -> Result<usize, HierarchyError> {
        if id.index == ROOT_INDEX {
            return Ok(ROOT_INDEX);
        }
        if id.generation != self.generation || id.index >= self.nodes.len() {
            return Err(HierarchyError::StaleLogger);
        }
        Ok(id.index)
    }

    pub(crate) fn node(&self, index: usize) -> &LoggerNode {
        &self.nodes[index]
    }

    fn node_mut(&mut self, id: LoggerId) -> Result<&mut LoggerNode, HierarchyError> {
        let index = self.resolve(id)?;
        Ok(&mut self.nodes[index])
    }

    fn insert(&mut self, name: &str, parent: usize) -> usize {
        let index = self.nodes.len();
        self.nodes.push(LoggerNode::new(name, Some(parent)));
        self.by_name.insert(name.to_string(), index);
        index
    }

    /// Return the node for `name`, creating it and any missing ancestors.
    fn get_or_create(&mut self, name: &str) -> usize {
        if let Some(&index) = self.by_name.get(name) {
            return index;
        }
        let prefix_ends = name
            .match_indices('.')
            .map(|(pos, _)| pos)
            .chain(iter::once(name.len()));
        let mut parent = ROOT_INDEX;
        for end in prefix_ends {
            let prefix = &name[..end];
            parent = match self.by_name.get(prefix) {
                Some(&existing) => existing,
                None => self.insert(prefix, parent),
            };
        }
        parent
    }

    /// Walk up from `index` to the first explicit level.
    pub(crate) fn effective_level(&self, index: usize) -> Level {
        let mut current = index;
        loop {
            let node = &self.nodes[current];
            if let Some(level) = node.level {
                return level;
            }
            match node.parent {
                Some(parent) => current = parent,
                // Only root lacks a parent and root always has a level.
                None => return DEFAULT_ROOT_LEVEL,
            }
        }
    }

    /// Collect the sinks reached from `index`, honouring additivity.
    pub(crate) fn collect_sinks(&self, index: usize) -> Vec<SharedSink> {
        let mut sinks = Vec::new();
        let mut current = Some(index);
        while let Some(idx) = current {
            let node = &self.nodes[idx];
            sinks.extend(node.sinks.iter().cloned());
            if !node.additive {
                break;
            }
            current = node.parent;
        }
        sinks
    }

    fn reset(&mut self) {
        for node in &mut self.nodes {
            node.sinks.clear();
        }
        self.nodes.truncate(1);
        self.nodes[ROOT_INDEX] = LoggerNode::root();
        self.by_name.clear();
        self.by_name.insert(ROOT_LOGGER_NAME.to_string(), ROOT_INDEX);
        self.threshold = Level::All;
        self.generation += 1;
    }
}

/// Reject empty names and names with empty dot-separated segments.
pub fn validate_name(name: &str) -> Result<(), HierarchyError> {
    if name.is_empty() || name.split('.').any(str::is_empty) {
        return Err(HierarchyError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Owner of every logger node, the repository threshold and the layout.
///
/// A hierarchy is an explicit context object: construct one per run or test
/// scope and hand references to the code that logs through it.
pub struct Hierarchy {
    registry: RwLock<Registry>,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl Hierarchy {
    /// Create a hierarchy rendering with [`SimpleLayout`](crate::SimpleLayout).
    pub fn new() -> Self {
        Self::with_layout(SharedLayout::default())
    }

    pub fn with_layout(layout: impl Into<SharedLayout>) -> Self {
        Self {
            registry: RwLock::new(Registry::new(layout.into())),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read()
    }

    /// Handle to the root logger.
    pub fn root(&self) -> Logger<'_> {
        let id = self.registry.read().id(ROOT_INDEX);
        Logger::new(self, id, ROOT_LOGGER_NAME.to_string())
    }

    /// Return the logger called `name`, creating it and its ancestors.
    ///
    /// Repeated calls with the same name return handles to the same node
    /// until the hierarchy is reset.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::InvalidName`] for empty names or names with
    /// an empty segment such as `a..b` or `.a`.
    pub fn get_logger(&self, name: &str) -> Result<Logger<'_>, HierarchyError> {
        let id = self.get_or_create(name)?;
        Ok(Logger::new(self, id, name.to_string()))
    }

    /// Id-level form of [`get_logger`](Self::get_logger).
    pub fn get_or_create(&self, name: &str) -> Result<LoggerId, HierarchyError> {
        validate_name(name)?;
        {
            let registry = self.registry.read();
            if let Some(&index) = registry.by_name.get(name) {
                return Ok(registry.id(index));
            }
        }
        let mut registry = self.registry.write();
        let index = registry.get_or_create(name);
        Ok(registry.id(index))
    }

    /// Return `true` if a node called `name` currently exists.
    pub fn exists(&self, name: &str) -> bool {
        self.registry.read().by_name.contains_key(name)
    }

    /// Id of the node called `name` without creating it.
    pub fn lookup(&self, name: &str) -> Option<LoggerId> {
        let registry = self.registry.read();
        registry.by_name.get(name).map(|&index| registry.id(index))
    }

    /// Sorted names of every existing node, root included.
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registry.read().by_name.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn name(&self, id: LoggerId) -> Result<String, HierarchyError> {
        let registry = self.registry.read();
        let index = registry.resolve(id)?;
        Ok(registry.node(index).name.clone())
    }

    /// Id of the parent node; `None` for root.
    pub fn parent(&self, id: LoggerId) -> Result<Option<LoggerId>, HierarchyError> {
        let registry = self.registry.read();
        let index = registry.resolve(id)?;
        Ok(registry.node(index).parent.map(|p| registry.id(p)))
    }

    pub fn explicit_level(&self, id: LoggerId) -> Result<Option<Level>, HierarchyError> {
        let registry = self.registry.read();
        let index = registry.resolve(id)?;
        Ok(registry.node(index).level)
    }

    /// Resolve the threshold applied to `id`, inheriting from ancestors.
    pub fn effective_level(&self, id: LoggerId) -> Result<Level, HierarchyError> {
        let registry = self.registry.read();
        let index = registry.resolve(id)?;
        Ok(registry.effective_level(index))
    }

    /// Set or clear the explicit level of a node.
    ///
    /// # Errors
    ///
    /// Clearing the root level fails with
    /// [`HierarchyError::RootLevelRequired`].
    pub fn set_level(&self, id: LoggerId, level: Option<Level>) -> Result<(), HierarchyError> {
        let mut registry = self.registry.write();
        let index = registry.resolve(id)?;
        if index == ROOT_INDEX && level.is_none() {
            return Err(HierarchyError::RootLevelRequired);
        }
        registry.nodes[index].level = level;
        Ok(())
    }

    pub fn additivity(&self, id: LoggerId) -> Result<bool, HierarchyError> {
        let registry = self.registry.read();
        let index = registry.resolve(id)?;
        Ok(registry.node(index).additive)
    }

    /// Control whether dispatch continues to ancestor sinks past this node.
    pub fn set_additivity(&self, id: LoggerId, additive: bool) -> Result<(), HierarchyError> {
        self.registry.write().node_mut(id)?.additive = additive;
        Ok(())
    }

    /// Attach `sink` to the node; dispatch order follows attachment order.
    pub fn add_sink(&self, id: LoggerId, sink: SharedSink) -> Result<(), HierarchyError> {
        self.registry.write().node_mut(id)?.sinks.push(sink);
        Ok(())
    }

    /// Detach the first attachment of `sink`; returns whether one was found.
    pub fn remove_sink(&self, id: LoggerId, sink: &SharedSink) -> Result<bool, HierarchyError> {
        let mut registry = self.registry.write();
        let node = registry.node_mut(id)?;
        match node.sinks.iter().position(|s| Arc::ptr_eq(s, sink)) {
            Some(pos) => {
                node.sinks.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn clear_sinks(&self, id: LoggerId) -> Result<(), HierarchyError> {
        self.registry.write().node_mut(id)?.sinks.clear();
        Ok(())
    }

    /// Sinks attached directly to the node, in attachment order.
    pub fn sinks(&self, id: LoggerId) -> Result<Vec<SharedSink>, HierarchyError> {
        let registry = self.registry.read();
        let index = registry.resolve(id)?;
        Ok(registry.node(index).sinks.clone())
    }

    /// Repository-wide minimum level; calls below it are always suppressed.
    pub fn threshold(&self) -> Level {
        self.registry.read().threshold
    }

    pub fn set_threshold(&self, level: Level) {
        self.registry.write().threshold = level;
    }

    pub fn layout(&self) -> SharedLayout {
        self.registry.read().layout.clone()
    }

    pub fn set_layout(&self, layout: impl Into<SharedLayout>) {
        self.registry.write().layout = layout.into();
    }

    /// Number of resets performed so far.
    pub fn generation(&self) -> u64 {
        self.registry.read().generation
    }

    /// Detach all sinks, drop every non-root node and restore defaults.
    ///
    /// The layout is kept. Ids issued before the reset become stale, except
    /// the root's.
    pub fn reset(&self) {
        self.registry.write().reset();
    }

    /// Flush every distinct attached sink; `true` when all succeed.
    pub fn flush_sinks(&self) -> bool {
        let sinks: Vec<SharedSink> = {
            let registry = self.registry.read();
            let mut seen = HashSet::new();
            registry
                .nodes
                .iter()
                .flat_map(|node| node.sinks.iter())
                .filter(|sink| seen.insert(Arc::as_ptr(sink) as *const () as usize))
                .cloned()
                .collect()
        };
        let mut all_ok = true;
        for sink in sinks {
            if let Err(err) = sink.flush() {
                warn!("hierlog: sink flush failed: {err}");
                all_ok = false;
            }
        }
        all_ok
    }
}

#[cfg(test)]
#[path = "hierarchy_tests.rs"]
mod hierarchy_tests;
