//! Rule-shaped storage for message fields.

use crate::value::Value;
use std::collections::HashSet;

/// Values keyed by a string, kept in first-insertion order.
///
/// Sets key members by [`Value::set_key`] and keep the first-seen value for a
/// key; maps key by the caller's key and replace the value in place.
#[derive(Debug, Clone, Default)]
pub(crate) struct Keyed {
    entries: Vec<(String, Value)>,
    keys: HashSet<String>,
}

impl Keyed {
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub(crate) fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Inserts unless the key is present. Returns whether it was inserted.
    pub(crate) fn insert_first(&mut self, key: String, value: Value) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.insert(key.clone());
        self.entries.push((key, value));
        true
    }

    /// Inserts or replaces the value for the key.
    pub(crate) fn upsert(&mut self, key: String, value: Value) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
            return;
        }
        self.keys.insert(key.clone());
        self.entries.push((key, value));
    }

    /// Adds a set member under its normalized key.
    pub(crate) fn insert_member(&mut self, value: Value) -> bool {
        self.insert_first(value.set_key(), value)
    }

    /// Number of entries left once the given keys are gone.
    pub(crate) fn len_without(&self, removed: &HashSet<&str>) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| !removed.contains(k.as_str()))
            .count()
    }

    /// Drops the given keys in place; surviving values are not copied.
    pub(crate) fn remove_keys(&mut self, removed: &HashSet<&str>) {
        self.entries.retain(|(k, _)| !removed.contains(k.as_str()));
        self.keys.retain(|k| !removed.contains(k.as_str()));
    }
}

impl PartialEq for Keyed {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<Value> for Keyed {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut out = Self::default();
        for value in iter {
            out.insert_member(value);
        }
        out
    }
}

/// A stored field value, shaped by the field's rule.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Stored {
    Single(Value),
    Set(Keyed),
    List(Vec<Value>),
    Map(Keyed),
}

impl Stored {
    /// True when a collection holds nothing.
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Set(k) | Self::Map(k) => k.is_empty(),
            Self::List(l) => l.is_empty(),
        }
    }

    /// Every stored value.
    pub(crate) fn values_mut(&mut self) -> Box<dyn Iterator<Item = &mut Value> + '_> {
        match self {
            Self::Single(v) => Box::new(std::iter::once(v)),
            Self::Set(k) | Self::Map(k) => Box::new(k.entries_mut()),
            Self::List(l) => Box::new(l.iter_mut()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_first_casing() {
        let set: Keyed = ["Chicken", "chicken", " CHICKEN "]
            .into_iter()
            .map(Value::from)
            .collect();
        assert_eq!(set.len(), 1);
        assert_eq!(set.values().next(), Some(&Value::from("Chicken")));
        assert!(set.contains_key("chicken"));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut map = Keyed::default();
        map.upsert("a".into(), Value::Int(1));
        map.upsert("b".into(), Value::Int(2));
        map.upsert("a".into(), Value::Int(3));
        let keys: Vec<_> = map.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_remove_keys_in_place() {
        let mut set: Keyed = ["a", "b", "c"].into_iter().map(Value::from).collect();
        let removed: HashSet<&str> = ["b", "zzz"].into_iter().collect();

        assert_eq!(set.len_without(&removed), 2);
        assert_eq!(set.len(), 3);

        set.remove_keys(&removed);
        assert_eq!(set.len(), 2);
        assert!(!set.contains_key("b"));
        assert!(set.insert_member(Value::from("B")));
    }

    #[test]
    fn test_empty_collections() {
        assert!(Stored::List(vec![]).is_empty());
        assert!(Stored::Set(Keyed::default()).is_empty());
        assert!(!Stored::Single(Value::Bool(false)).is_empty());
    }
}
