//! Namespaced item keys.
//!
//! Data files reference items by a stable key such as `craftbench:oak_log`
//! rather than by numeric id, so ids can be reassigned between catalog
//! revisions without touching recipes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace applied when a key omits one.
pub const DEFAULT_NAMESPACE: &str = "craftbench";

/// Reasons an [`ItemKey`] fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemKeyError {
    /// Input was blank.
    #[error("item key cannot be empty")]
    Empty,
    /// Namespace part was empty or contained disallowed characters.
    #[error("invalid item key namespace {0:?} (allowed: a-z0-9_.-)")]
    Namespace(String),
    /// Path part was empty or contained disallowed characters.
    #[error("invalid item key path {0:?} (allowed: a-z0-9_./-)")]
    Path(String),
}

/// A key of the form `namespace:path`, ordered lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemKey {
    namespace: String,
    path: String,
}

impl ItemKey {
    /// Parse `namespace:path` or a bare `path` in [`DEFAULT_NAMESPACE`].
    pub fn parse(input: &str) -> Result<Self, ItemKeyError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ItemKeyError::Empty);
        }

        let (namespace, path) = input
            .split_once(':')
            .unwrap_or((DEFAULT_NAMESPACE, input));
        let (namespace, path) = (namespace.trim(), path.trim());

        if namespace.is_empty() || namespace.len() > 64 || !namespace.chars().all(is_key_char) {
            return Err(ItemKeyError::Namespace(namespace.to_string()));
        }
        if path.is_empty() || path.len() > 128 || !path.chars().all(|c| c == '/' || is_key_char(c))
        {
            return Err(ItemKeyError::Path(path.to_string()));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Namespace component.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Path component.
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn is_key_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ItemKey {
    type Err = ItemKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemKey {
    type Error = ItemKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemKey> for String {
    fn from(key: ItemKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_key() {
        let key = ItemKey::parse("mods:oak_log").unwrap();
        assert_eq!(key.namespace(), "mods");
        assert_eq!(key.path(), "oak_log");
        assert_eq!(key.to_string(), "mods:oak_log");
    }

    #[test]
    fn bare_path_uses_default_namespace() {
        let key: ItemKey = "stick".parse().unwrap();
        assert_eq!(key.to_string(), "craftbench:stick");
    }

    #[test]
    fn rejects_malformed_keys() {
        assert_eq!(ItemKey::parse("  "), Err(ItemKeyError::Empty));
        assert!(matches!(
            ItemKey::parse("Mods:stick"),
            Err(ItemKeyError::Namespace(_))
        ));
        assert!(matches!(
            ItemKey::parse("craftbench:Oak Log"),
            Err(ItemKeyError::Path(_))
        ));
        assert!(ItemKey::parse("craftbench:").is_err());
        assert!(ItemKey::parse(":stick").is_err());
    }

    #[test]
    fn serde_uses_display_form() {
        let key = ItemKey::parse("oak_planks").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#""craftbench:oak_planks""#);
        let back: ItemKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
