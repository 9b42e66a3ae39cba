//! `ResponseMap` (spec.md §4.4.1): the insertion-ordered `Map<String,
//! OutputValue>` produced by resolving a selection set.
//!
//! Distinct from [`super::Object`], the generic Value model's map (spec.md
//! §4.2), which sorts its keys lexicographically on the wire: a selection
//! set's response map must instead preserve source order (spec.md §4.4.1,
//! §4.4.4, the "Alias uniqueness in output" edge case), so it gets its own
//! type rather than reusing `Object`'s sorted `Serialize` impl.

use indexmap::IndexMap;

use super::Value;

/// An insertion-ordered map of response name to completed value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResponseMap {
    fields: IndexMap<String, Value>,
}

impl ResponseMap {
    /// Creates an empty [`ResponseMap`] with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Inserts a field, returning the previous value under that key, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Looks up a field by response name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether this map has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a ResponseMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
