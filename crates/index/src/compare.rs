//! Index Comparison

use std::collections::{HashMap, VecDeque};

use tracing::instrument;

use crate::models::{Category, Record, SearchIndex};

/// A record whose text changed between two indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<'a> {
    pub old_position: usize,
    pub new_position: usize,
    pub old: &'a Record,
    pub new: &'a Record,
}

/// Differences between two indices, e.g. two preview builds of the same docs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff<'a> {
    /// Records only in the new index, by position in the new index
    pub added: Vec<(usize, &'a Record)>,
    /// Records only in the old index, by position in the old index
    pub removed: Vec<(usize, &'a Record)>,
    /// Records identified by location, category and title whose text changed
    pub changed: Vec<Change<'a>>,
    /// Records present, identically, in both
    pub unchanged: usize,
}
impl Diff<'_> {
    /// Returns `true` if both indices hold the same records. Order is ignored.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

type Key<'a> = (&'a str, Category, &'a str);

fn key(record: &Record) -> Key<'_> {
    (record.location.as_str(), record.category, record.title.as_str())
}

fn key_counts<'a>(index: &'a SearchIndex) -> HashMap<Key<'a>, usize> {
    let mut counts = HashMap::new();
    for record in index {
        *counts.entry(key(record)).or_insert(0) += 1;
    }
    counts
}

/// Compares two indices.
///
/// Identical records are paired first, in order, so repeated records are
/// matched one-to-one. Of what remains, a record is reported as changed
/// rather than removed and re-added only when its location, category and
/// title identify it uniquely in both indices; page prose shares those with
/// its siblings and so shows up as removed and added instead.
#[instrument(skip(old, new), fields(old_records = old.len(), new_records = new.len()))]
pub fn diff<'a>(old: &'a SearchIndex, new: &'a SearchIndex) -> Diff<'a> {
    let mut available: HashMap<&Record, VecDeque<usize>> = HashMap::new();
    for (position, record) in new.iter() {
        available.entry(record).or_default().push_back(position);
    }
    let mut unchanged = 0;
    let mut removed = Vec::new();
    for (position, record) in old.iter() {
        match available.get_mut(record).and_then(VecDeque::pop_front) {
            Some(_) => unchanged += 1,
            None => removed.push((position, record)),
        }
    }
    let mut added: Vec<(usize, &Record)> =
        available.into_iter().flat_map(|(record, positions)| positions.into_iter().map(move |p| (p, record))).collect();
    added.sort_by_key(|(position, _)| *position);

    let (old_counts, new_counts) = (key_counts(old), key_counts(new));
    let unique = |record: &'a Record| {
        let key = key(record);
        old_counts.get(&key) == Some(&1) && new_counts.get(&key) == Some(&1)
    };
    let mut changed = Vec::new();
    removed.retain(|&(old_position, old_record)| {
        if !unique(old_record) {
            return true;
        }
        let Some(slot) = added.iter().position(|(_, new_record)| key(new_record) == key(old_record)) else {
            return true;
        };
        let (new_position, new_record) = added.remove(slot);
        changed.push(Change { old_position, new_position, old: old_record, new: new_record });
        false
    });

    Diff { added, removed, changed, unchanged }
}
