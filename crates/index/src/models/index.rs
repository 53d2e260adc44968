use std::collections::HashMap;

use super::Record;
use crate::consts::DEFAULT_VARIABLE;

/// An ordered, read-only sequence of documentation records.
///
/// Records keep the order the generator traversed the source pages in. The
/// index never hands out mutable access; build a new one instead.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SearchIndex {
    /// Name of the global the index is assigned to in the JavaScript file.
    #[serde(skip, default = "default_variable")]
    variable: String,
    docs: Vec<Record>,
}

fn default_variable() -> String {
    DEFAULT_VARIABLE.to_string()
}

/// A page of the documentation site and the positions of its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    /// Display name of the page
    pub name: &'a str,
    /// Positions (into the index) of every record on this page, ascending
    pub positions: Vec<usize>,
}

impl SearchIndex {
    pub fn new(variable: impl Into<String>, docs: Vec<Record>) -> Self {
        Self { variable: variable.into(), docs }
    }

    /// Name of the JavaScript variable the index is assigned to.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// All records in their original order.
    pub fn docs(&self) -> &[Record] {
        &self.docs
    }

    /// The record at `position`, if it exists.
    pub fn get(&self, position: usize) -> Option<&Record> {
        self.docs.get(position)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Iterates over `(position, record)` pairs in original order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Record)> {
        self.docs.iter().enumerate()
    }

    /// Pages in order of first appearance.
    pub fn pages(&self) -> Vec<Page<'_>> {
        let mut order: Vec<Page<'_>> = Vec::new();
        let mut lookup: HashMap<&str, usize> = HashMap::new();
        for (position, record) in self.iter() {
            let slot = *lookup.entry(record.page.as_str()).or_insert_with(|| {
                order.push(Page { name: record.page.as_str(), positions: Vec::new() });
                order.len() - 1
            });
            order[slot].positions.push(position);
        }
        order
    }

    /// Every record whose location is exactly `location`, with its position.
    pub fn by_location<'a>(&'a self, location: &'a str) -> impl Iterator<Item = (usize, &'a Record)> + 'a {
        self.iter().filter(move |(_, record)| record.location.as_str() == location)
    }

    /// Consumes the index, returning the records.
    pub fn into_docs(self) -> Vec<Record> {
        self.docs
    }
}
impl Default for SearchIndex {
    fn default() -> Self {
        Self::new(DEFAULT_VARIABLE, Vec::new())
    }
}
impl FromIterator<Record> for SearchIndex {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self::new(DEFAULT_VARIABLE, iter.into_iter().collect())
    }
}
impl<'a> IntoIterator for &'a SearchIndex {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;
    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}
