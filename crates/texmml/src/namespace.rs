//! Hash-map aliases and the per-document table of user definitions.
//!
//! A [`Namespace`] holds the names a document defines at run time
//! (`\newcommand`, `\def`, `\let`, `\newenvironment`). Lookups consult it
//! before the package tables, so a user definition shadows a built-in one
//! for the rest of the document.

use rapidhash::{RapidHashMap, RapidHashSet};

/// Make it easier to switch between different hash backends.
pub type KeyMap<K, V> = RapidHashMap<K, V>;
/// Alias for the default hash set.
pub type KeySet<K> = RapidHashSet<K>;
/// Mapping type alias
pub type Mapping<V> = KeyMap<String, V>;

/// Document-scoped definitions keyed by name.
///
/// Unlike TeX, definitions are not local to the group they appear in: a
/// `\def` inside braces stays visible after the closing brace.
#[derive(Debug, Clone)]
pub struct Namespace<V> {
    current: Mapping<V>,
}

impl<V> Default for Namespace<V> {
    fn default() -> Self {
        Self {
            current: Mapping::default(),
        }
    }
}

impl<V> Namespace<V> {
    /// Get the current definition of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.current.get(name)
    }

    /// Whether `name` has a definition.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.current.contains_key(name)
    }

    /// Define or redefine `name`, returning the previous definition.
    pub fn set(&mut self, name: String, value: V) -> Option<V> {
        self.current.insert(name, value)
    }

    /// Remove the definition of `name`.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.current.remove(name)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Whether nothing has been defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_shadows_previous_value() {
        let mut ns: Namespace<u32> = Namespace::default();
        assert!(ns.is_empty());
        assert_eq!(ns.set("a".to_owned(), 1), None);
        assert_eq!(ns.set("a".to_owned(), 2), Some(1));
        assert_eq!(ns.get("a"), Some(&2));
        assert_eq!(ns.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut ns: Namespace<&str> = Namespace::default();
        ns.set("x".to_owned(), "y");
        assert!(ns.has("x"));
        assert_eq!(ns.remove("x"), Some("y"));
        assert!(!ns.has("x"));
    }
}
