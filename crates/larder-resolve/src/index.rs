//! Name → id index used during batch reconciliation.

use std::collections::HashMap;

use crate::normalize;

/// Maps names to record ids under two keys per record: the trimmed,
/// lowercased name and its [`normalize`]d form.
///
/// Built once per batch from the local store. During sequential phases new
/// records are [`insert`](Self::insert)ed as they are created; during
/// concurrent phases it is shared read-only.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    ids: HashMap<String, String>,
    records: usize,
}

impl NameIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from `(name, id)` pairs.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut index = Self::new();
        for (name, id) in records {
            index.insert(name, id);
        }
        index
    }

    /// Register `name` for `id`. The first id registered under a key wins.
    pub fn insert(&mut self, name: &str, id: &str) {
        let raw = raw_key(name);
        if raw.is_empty() {
            return;
        }
        let normalized = normalize(&raw);
        self.ids.entry(raw).or_insert_with(|| id.to_string());
        self.ids.entry(normalized).or_insert_with(|| id.to_string());
        self.records += 1;
    }

    /// Look up `name` by its raw key, then by its normalized key.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let raw = raw_key(name);
        if raw.is_empty() {
            return None;
        }
        self.ids
            .get(&raw)
            .or_else(|| self.ids.get(&normalize(&raw)))
            .map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of records inserted (not keys).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records == 0
    }
}

fn raw_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_by_raw_and_normalized_keys() {
        let index = NameIndex::from_records([("Cherry Tomatoes", "ing-1"), ("Basil", "ing-2")]);

        assert_eq!(index.get("cherry tomatoes"), Some("ing-1"));
        assert_eq!(index.get("Cherry  Tomato"), Some("ing-1"));
        assert_eq!(index.get(" BASIL "), Some("ing-2"));
        assert_eq!(index.get("basils"), Some("ing-2"));
        assert_eq!(index.get("oregano"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn first_registration_wins() {
        let mut index = NameIndex::new();
        index.insert("Eggs", "alg-1");
        index.insert("egg", "alg-2");
        assert_eq!(index.get("eggs"), Some("alg-1"));
        assert_eq!(index.get("egg"), Some("alg-1"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn empty_names_are_ignored() {
        let mut index = NameIndex::new();
        index.insert("   ", "alg-1");
        assert!(index.is_empty());
        assert!(!index.contains(""));
    }
}
