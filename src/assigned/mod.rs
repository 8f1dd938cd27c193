//! Loader for a flat `KEY=VALUE` assignment file such as a kernel `.config`.
use crate::errors::{KconfigGraphError, ParseError};
use std::collections::HashMap;
use std::path::Path;

/// Key prefix used by kernel `.config` files.
pub const DEFAULT_PREFIX: &str = "CONFIG_";

/// Explicitly assigned options, keyed by name without the prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignedConfig {
    values: HashMap<String, String>,
}

impl AssignedConfig {
    /// Load `path` using the `CONFIG_` prefix.
    ///
    /// # Errors
    /// Returns `KconfigGraphError::AssignedConfig` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, KconfigGraphError> {
        Self::load_with_prefix(path, DEFAULT_PREFIX)
    }

    /// # Errors
    /// Returns `KconfigGraphError::AssignedConfig` if the file cannot be read.
    /// Bytes that are not UTF-8 are decoded lossily.
    pub fn load_with_prefix(path: &Path, prefix: &str) -> Result<Self, KconfigGraphError> {
        let bytes = std::fs::read(path).map_err(|e| KconfigGraphError::AssignedConfig {
            file: path.to_path_buf(),
            source: ParseError::Io(e),
        })?;
        let config = Self::parse_str(&String::from_utf8_lossy(&bytes), prefix);
        log::info!("loaded {} assigned options from {}", config.len(), path.display());
        Ok(config)
    }

    /// Parse assignment text. Lines without `prefix` or without `=` are ignored.
    #[must_use]
    pub fn parse_str(content: &str, prefix: &str) -> Self {
        let mut values = HashMap::new();
        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(rest) = line.strip_prefix(prefix) else {
                continue;
            };
            if let Some((key, value)) = rest.split_once('=') {
                values.insert(key.to_string(), value.to_string());
            }
        }
        Self { values }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for AssignedConfig {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}
