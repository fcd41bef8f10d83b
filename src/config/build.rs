//! Validation and application of configuration to a hierarchy.

use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::hierarchy::{Hierarchy, ROOT_LOGGER_NAME, validate_name};
use crate::sink::SharedSink;

use super::types::{ConfigBuilder, ConfigError, LoggerConfigBuilder};

impl ConfigBuilder {
    /// Validate the configuration and apply it to `hierarchy`.
    ///
    /// Every check runs before the hierarchy is touched, so a failed build
    /// leaves it as it was. Each sink is built once and shared between all
    /// loggers that reference it.
    pub fn build_and_apply(&self, hierarchy: &Hierarchy) -> Result<(), ConfigError> {
        if self.version() != 1 {
            return Err(ConfigError::UnsupportedVersion(self.version()));
        }
        let Some(root) = self.root_logger() else {
            return Err(ConfigError::MissingRootLogger);
        };
        for name in self.logger_builders().keys() {
            validate_name(name).map_err(|_| ConfigError::InvalidLoggerName(name.clone()))?;
        }

        let targets: Vec<(&str, &LoggerConfigBuilder)> = std::iter::once((ROOT_LOGGER_NAME, root))
            .chain(self.logger_builders().iter().map(|(n, c)| (n.as_str(), c)))
            .collect();
        for (_, cfg) in &targets {
            Self::collect_items(cfg.sink_ids(), self.sink_builders())?;
        }

        let built_sinks = Self::build_map(
            self.sink_builders(),
            |b| b.build(),
            |id, source| ConfigError::SinkBuild { id, source },
        )?;
        let mut plans = Vec::with_capacity(targets.len());
        for (name, cfg) in targets {
            let sinks: Vec<SharedSink> = Self::collect_items(cfg.sink_ids(), &built_sinks)?
                .into_iter()
                .cloned()
                .collect();
            plans.push((name, cfg, sinks));
        }

        if self.reset {
            hierarchy.reset();
        }
        if let Some(threshold) = self.threshold {
            hierarchy.set_threshold(threshold);
        }
        if let Some(layout) = &self.layout {
            hierarchy.set_layout(layout.build());
        }
        for (name, cfg, sinks) in plans {
            Self::apply_logger_config(hierarchy, name, cfg, sinks)?;
        }
        debug!(
            "hierlog: applied configuration for {} loggers and {} sinks",
            self.logger_builders().len() + 1,
            built_sinks.len()
        );
        Ok(())
    }

    fn build_map<B, O, E, F, G>(
        items: &BTreeMap<String, B>,
        mut build: F,
        wrap_err: G,
    ) -> Result<BTreeMap<String, O>, ConfigError>
    where
        F: FnMut(&B) -> Result<O, E>,
        G: Fn(String, E) -> ConfigError,
    {
        let mut built = BTreeMap::new();
        for (id, builder) in items {
            let obj = build(builder).map_err(|e| wrap_err(id.clone(), e))?;
            built.insert(id.clone(), obj);
        }
        Ok(built)
    }

    fn collect_items<'a, T>(
        ids: &[String],
        pool: &'a BTreeMap<String, T>,
    ) -> Result<Vec<&'a T>, ConfigError> {
        let mut seen = HashSet::new();
        let mut dup = Vec::new();
        let mut missing = Vec::new();
        let mut items = Vec::new();

        for id in ids {
            if !seen.insert(id.as_str()) {
                dup.push(id.clone());
                continue;
            }
            match pool.get(id) {
                Some(item) => items.push(item),
                None => missing.push(id.clone()),
            }
        }

        if !dup.is_empty() {
            return Err(ConfigError::DuplicateSinkIds(dup));
        }
        if !missing.is_empty() {
            return Err(ConfigError::UnknownSinkIds(missing));
        }
        Ok(items)
    }

    // Replaces the logger's sinks; level and additivity change only when set.
    fn apply_logger_config(
        hierarchy: &Hierarchy,
        name: &str,
        cfg: &LoggerConfigBuilder,
        sinks: Vec<SharedSink>,
    ) -> Result<(), ConfigError> {
        let logger = hierarchy.get_logger(name)?;
        logger.clear_sinks()?;
        for sink in sinks {
            logger.add_sink(sink)?;
        }
        if let Some(level) = cfg.level_opt() {
            logger.set_level(level)?;
        }
        if let Some(additive) = cfg.additivity_opt() {
            logger.set_additivity(additive)?;
        }
        Ok(())
    }
}
