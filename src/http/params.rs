use std::collections::hash_map::{self, Entry, HashMap};
use std::{mem, slice};

/// Decoded `application/x-www-form-urlencoded` data.
///
/// Used both for the query string of a request and for URL encoded
/// request bodies. A key that appears more than once maps to every
/// value it was given, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(HashMap<String, Param>);

/// The value(s) stored under one key of [`Params`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Param {
    /// The key appeared once.
    One(String),
    /// The key appeared more than once.
    Many(Vec<String>),
}

impl Param {
    /// The first value given for this key.
    pub fn first(&self) -> &str {
        match self {
            Param::One(value) => value,
            Param::Many(values) => values.first().map(String::as_str).unwrap_or_default(),
        }
    }

    /// Every value given for this key.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Param::One(value) => slice::from_ref(value),
            Param::Many(values) => values,
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Param::One(first) => {
                let first = mem::take(first);
                *self = Param::Many(vec![first, value]);
            }
            Param::Many(values) => values.push(value),
        }
    }
}

impl Params {
    /// Create an empty set of parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode URL encoded bytes, applying `+` and percent decoding.
    pub(crate) fn parse(input: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(input).map(Params::from_iter)
    }

    /// Returns the value(s) stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.0.get(name)
    }

    /// Returns the first value stored under `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).map(Param::first)
    }

    /// Returns every value stored under `name`, or an empty slice.
    pub fn all(&self, name: &str) -> &[String] {
        self.get(name).map(Param::as_slice).unwrap_or_default()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Param> {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (String, String)>,
    {
        let mut map: HashMap<String, Param> = HashMap::new();

        for (key, value) in iter {
            match map.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().push(value),
                Entry::Vacant(entry) => {
                    entry.insert(Param::One(value));
                }
            }
        }

        Params(map)
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a Param);
    type IntoIter = hash_map::Iter<'a, String, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
