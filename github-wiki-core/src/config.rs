//! Configuration sources: typed key lookup over a structured document.
//!
//! Keys are dotted paths into nested YAML mappings, so `phpdoc.command`
//! reads `command` from the `phpdoc` mapping. Two implementations exist:
//! [`NullConfig`] (every lookup yields the caller's default) and
//! [`YamlConfig`] (backed by a parsed file). Layering is done with
//! [`YamlConfig::merge_with`], where the overlay wins for every key present
//! in both documents.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::{debug, error, info};

use crate::error::ConfigError;

/// Typed, default-aware lookup of configuration keys.
pub trait ConfigSource {
    /// Text value of `key`, or `default` when the key is absent or not a scalar.
    fn get_string(&self, key: &str, default: &str) -> String;

    /// Boolean value of `key`, or `default` when absent or not interpretable.
    fn get_bool(&self, key: &str, default: bool) -> bool;

    /// List value of `key`; empty when absent.
    fn get_array(&self, key: &str) -> Vec<String>;
}

/// Source used when no configuration file could be found.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullConfig;

impl ConfigSource for NullConfig {
    fn get_string(&self, _key: &str, default: &str) -> String {
        default.to_string()
    }

    fn get_bool(&self, _key: &str, default: bool) -> bool {
        default
    }

    fn get_array(&self, _key: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Source backed by a YAML document.
#[derive(Debug, Clone)]
pub struct YamlConfig {
    root: Value,
    origin: Option<PathBuf>,
}

impl YamlConfig {
    /// Loads and parses the YAML file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        info!(config_path = ?path_ref, "Loading configuration from file");

        let content = fs::read_to_string(path_ref).map_err(|e| {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            ConfigError::Read {
                path: path_ref.to_path_buf(),
                source: e,
            }
        })?;

        let mut config = Self::from_str(&content).map_err(|e| {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            ConfigError::Parse {
                path: path_ref.to_path_buf(),
                source: e,
            }
        })?;
        config.origin = Some(path_ref.to_path_buf());

        info!(config_path = ?path_ref, "Parsed config YAML successfully");
        Ok(config)
    }

    /// Parses a YAML document held in memory. An empty document is an empty mapping.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, serde_yaml::Error> {
        let root: Value = serde_yaml::from_str(content)?;
        let root = match root {
            Value::Null => Value::Mapping(Mapping::new()),
            other => other,
        };
        Ok(Self { root, origin: None })
    }

    /// File this document was loaded from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Overlays `other` onto `self`: values from `other` win for any key
    /// present in both, nested mappings are merged key by key.
    pub fn merge_with(mut self, other: YamlConfig) -> YamlConfig {
        debug!(base = ?self.origin, overlay = ?other.origin, "Merging configuration documents");
        overlay(&mut self.root, other.root);
        if other.origin.is_some() {
            self.origin = other.origin;
        }
        self
    }

    /// Folds an ordered list of documents left to right; later documents win.
    pub fn merge_all<I>(sources: I) -> Option<YamlConfig>
    where
        I: IntoIterator<Item = YamlConfig>,
    {
        sources.into_iter().reduce(YamlConfig::merge_with)
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        key.split('.').try_fold(&self.root, |node, segment| match node {
            Value::Mapping(map) => map.get(segment),
            _ => None,
        })
    }
}

impl ConfigSource for YamlConfig {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.lookup(key)
            .and_then(scalar_to_string)
            .unwrap_or_else(|| default.to_string())
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.lookup(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => {
                let s = s.trim().to_ascii_lowercase();
                match s.as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => default,
                }
            }
            Some(Value::Number(n)) => n.as_i64().map(|n| n != 0).unwrap_or(default),
            _ => default,
        }
    }

    fn get_array(&self, key: &str) -> Vec<String> {
        match self.lookup(key) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(value) => scalar_to_string(value).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Recursive mapping overlay; non-mapping values in `top` replace `base` wholesale.
fn overlay(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Mapping(base_map), Value::Mapping(top_map)) => {
            for (key, top_value) in top_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => overlay(base_value, top_value),
                    None => {
                        base_map.insert(key, top_value);
                    }
                }
            }
        }
        (base, top) => *base = top,
    }
}
