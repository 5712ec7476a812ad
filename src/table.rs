//! A TOML table.

use crate::Value;
use alloc::borrow::Cow;
use alloc::collections::BTreeMap;

/// A TOML table.
///
/// Keys are borrowed from the source document when they needed no escape processing (bare keys,
/// or quoted keys with no escapes) and owned otherwise.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Table<'a>(
    #[cfg_attr(feature = "serde", serde(borrow))] BTreeMap<Cow<'a, str>, Value<'a>>,
);

impl<'a> Table<'a> {
    /// Create a new, empty table.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a key-value pair into the table, overwriting any previous value.
    pub fn insert(&mut self, key: Cow<'a, str>, value: Value<'a>) {
        self.0.insert(key, value);
    }

    /// Get the value for the given key.
    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        self.0.get(key)
    }

    /// Whether the table directly contains the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Get the number of entries in the table.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get an iterator over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, 'a> {
        Iter::new(self)
    }

    pub(crate) fn entry(
        &mut self,
        key: Cow<'a, str>,
    ) -> alloc::collections::btree_map::Entry<'_, Cow<'a, str>, Value<'a>> {
        self.0.entry(key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Value<'a>> {
        self.0.get_mut(key)
    }
}

impl<'a> FromIterator<(Cow<'a, str>, Value<'a>)> for Table<'a> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (Cow<'a, str>, Value<'a>)>,
    {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, Value<'a>)> for Table<'a> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Value<'a>)>,
    {
        Self(
            iter.into_iter()
                .map(|(k, v)| (Cow::Borrowed(k), v))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for Table<'a> {
    type Item = (Cow<'a, str>, Value<'a>);
    type IntoIter = IntoIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            iter: self.0.into_iter(),
        }
    }
}

/// An owning iterator over the key-value pairs of a table.
#[derive(Debug)]
pub struct IntoIter<'a> {
    iter: alloc::collections::btree_map::IntoIter<Cow<'a, str>, Value<'a>>,
}

impl<'a> Iterator for IntoIter<'a> {
    type Item = (Cow<'a, str>, Value<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}

/// An iterator over the key-value pairs of a table.
#[derive(Debug)]
pub struct Iter<'i, 'a> {
    iter: alloc::collections::btree_map::Iter<'i, Cow<'a, str>, Value<'a>>,
}

impl<'t, 'a> Iter<'t, 'a> {
    fn new(table: &'t Table<'a>) -> Iter<'t, 'a> {
        Iter {
            iter: table.0.iter(),
        }
    }
}

impl<'i, 'a> Iterator for Iter<'i, 'a> {
    type Item = (&'i str, &'i Value<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, v)| (k.as_ref(), v))
    }
}

impl<'i, 'a> IntoIterator for &'i Table<'a> {
    type Item = (&'i str, &'i Value<'a>);
    type IntoIter = Iter<'i, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
