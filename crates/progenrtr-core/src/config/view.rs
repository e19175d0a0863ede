//! Read-only, ordered views over parsed configuration
//!
//! A [`StructuredView`] is built once and never mutated. It offers two ways of
//! reading a name:
//! - strict: [`StructuredView::get`] fails with `AttributeNotFound`,
//!   [`StructuredView::item`] fails with `KeyNotFound`
//! - defaulted: [`StructuredView::get_or`] and [`StructuredView::get_opt`] never fail

use super::error::{ConfigError, Result};
use super::store::RawStore;
use std::fmt;

/// Immutable ordered mapping from names to values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredView<V = String> {
    entries: Vec<(String, V)>,
}

impl<V> Default for StructuredView<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> StructuredView<V> {
    /// Wrap every key of `map`; a repeated key keeps its first position and last value
    pub fn from_mapping<I, K>(map: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        let mut entries: Vec<(String, V)> = Vec::new();
        for (key, value) in map {
            let key = key.into();
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => entries.push((key, value)),
            }
        }
        Self { entries }
    }

    /// Strict attribute-style access
    pub fn get(&self, name: &str) -> Result<&V> {
        self.get_opt(name).ok_or_else(|| ConfigError::AttributeNotFound {
            name: name.to_string(),
        })
    }

    /// Strict subscript-style access
    pub fn item(&self, key: &str) -> Result<&V> {
        self.get_opt(key).ok_or_else(|| ConfigError::KeyNotFound {
            name: key.to_string(),
        })
    }

    /// Defaulted access: `default` when `name` is absent
    pub fn get_or<'a>(&'a self, name: &str, default: &'a V) -> &'a V {
        self.get_opt(name).unwrap_or(default)
    }

    /// Defaulted access with no default
    pub fn get_opt(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_opt(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attribute names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl StructuredView<String> {
    /// View over a single section, including inherited `DEFAULT` options
    pub fn from_section(store: &RawStore, section: &str) -> Result<Self> {
        let entries = store
            .section(section)
            .ok_or_else(|| ConfigError::KeyNotFound {
                name: section.to_string(),
            })?;

        Ok(entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect())
    }
}

impl StructuredView<StructuredView<String>> {
    /// Whole-file view: one nested view per section
    pub fn from_store(store: &RawStore) -> Self {
        store
            .section_names()
            .filter_map(|name| {
                let section = StructuredView::from_section(store, name).ok()?;
                Some((name.to_string(), section))
            })
            .collect()
    }
}

impl<V> FromIterator<(String, V)> for StructuredView<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self::from_mapping(iter)
    }
}

impl<V: fmt::Display> fmt::Display for StructuredView<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, (name, value)) in self.entries.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}
