use std::collections::{BTreeMap, HashSet};

use tracing::instrument;

use crate::models::{Category, SearchIndex};

/// Summary counts over an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    /// Total number of records
    pub records: usize,
    /// Records per category, for categories that occur at all
    pub categories: BTreeMap<Category, usize>,
    /// Records per page, in order of first appearance
    pub pages: Vec<(String, usize)>,
    /// Records whose text is empty (section headings, mostly)
    pub empty_text: usize,
    /// Number of distinct `location` values
    pub distinct_locations: usize,
}
impl Stats {
    /// Number of records generated from docstrings.
    pub fn docstrings(&self) -> usize {
        self.categories.iter().filter(|(category, _)| category.is_docstring()).map(|(_, count)| count).sum()
    }

    pub fn count(&self, category: Category) -> usize {
        self.categories.get(&category).copied().unwrap_or_default()
    }
}

impl SearchIndex {
    /// Computes summary counts in a single pass.
    #[instrument(skip(self), fields(records = self.len()))]
    pub fn stats(&self) -> Stats {
        let mut categories = BTreeMap::new();
        let mut empty_text = 0;
        let mut locations = HashSet::new();
        for record in self {
            *categories.entry(record.category).or_insert(0) += 1;
            if record.text.is_empty() {
                empty_text += 1;
            }
            locations.insert(record.location.as_str());
        }
        Stats {
            records: self.len(),
            categories,
            pages: self.pages().into_iter().map(|page| (page.name.to_string(), page.positions.len())).collect(),
            empty_text,
            distinct_locations: locations.len(),
        }
    }
}
