//! Keyword search over titles and text, the way a static-site search widget
//! consumes the index.
//!
//! Field type dominates scoring: a term found in a title always outranks the
//! same term found only in prose, no matter how often the prose repeats it.
//! Within a field kind, docstrings outrank section headings, which outrank
//! page prose.

use std::fmt::{Display, Formatter, Result as FmtResult};

use tracing::instrument;

use crate::models::{Category, Record, SearchIndex};

const TITLE_EXACT: u32 = 1000;
const TITLE_PREFIX: u32 = 600;
const TITLE_CONTAINS: u32 = 400;
const TEXT_MATCH: u32 = 100;
const TEXT_REPEAT: u32 = 10;
const TEXT_REPEAT_CAP: usize = 3;
/// Multiplier keeping the category weight below the resolution of field scores.
const FIELD_SCALE: u32 = 10;

/// A parsed search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    terms: Vec<String>,
    categories: Vec<Category>,
    page: Option<String>,
    limit: Option<usize>,
}
impl Query {
    /// Splits on whitespace into lowercase terms, dropping repeats.
    ///
    /// # Examples
    ///
    /// ```
    /// use docsift_index::search::Query;
    /// let query = Query::parse("  DeepZ zonotope deepz ");
    /// assert_eq!(query.terms(), ["deepz", "zonotope"]);
    /// ```
    pub fn parse(input: &str) -> Self {
        let mut terms: Vec<String> = Vec::new();
        for term in input.split_whitespace().map(str::to_lowercase) {
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self { terms, ..Self::default() }
    }

    /// Only match records of this category. May be given several times.
    pub fn with_category(mut self, category: Category) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    /// Only match records on the page with this display name (case-insensitive).
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Return at most `limit` hits.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn admits(&self, record: &Record) -> bool {
        let category_ok = self.categories.is_empty() || self.categories.contains(&record.category);
        let page_ok = self.page.as_deref().is_none_or(|page| page.eq_ignore_ascii_case(&record.page));
        category_ok && page_ok
    }
}

/// A record matching every term of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit<'a> {
    /// Position of the record in the index
    pub position: usize,
    pub record: &'a Record,
    /// Higher is better; only meaningful relative to other hits of one query
    pub score: u32,
    /// Byte offset of the first term occurrence in the record's text
    text_match: Option<usize>,
}
impl Hit<'_> {
    /// Text surrounding the first match, at most `width` characters long,
    /// on one line. Falls back to the start of the text when no term was
    /// found in the text itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use docsift_index::models::{Category, Record, SearchIndex};
    /// use docsift_index::search::{Query, search};
    /// let index = SearchIndex::from_iter([Record::new(
    ///     "", "Home", "Home", "A Julia package for reachability analysis of artificial neural networks.", Category::Page,
    /// )]);
    /// let hits = search(&index, &Query::parse("reachability"));
    /// assert_eq!(hits[0].snippet(24), "… for reachability anal…");
    /// ```
    pub fn snippet(&self, width: usize) -> String {
        snippet(&self.record.text, self.text_match.unwrap_or(0), width)
    }
}
impl Display for Hit<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:>5} #{} {}", self.score, self.position, self.record)
    }
}

/// Runs the query, returning hits ordered by score (descending), then by
/// position in the index (ascending).
#[instrument(skip(index), fields(records = index.len(), hits))]
pub fn search<'a>(index: &'a SearchIndex, query: &Query) -> Vec<Hit<'a>> {
    if query.is_empty() {
        return Vec::new();
    }
    let mut hits: Vec<Hit<'a>> = index
        .iter()
        .filter(|(_, record)| query.admits(record))
        .filter_map(|(position, record)| {
            let (value, text_match) = score(record, &query.terms)?;
            Some(Hit { position, record, score: value, text_match })
        })
        .collect();
    hits.sort_by(|a, b| b.score.cmp(&a.score).then(a.position.cmp(&b.position)));
    if let Some(limit) = query.limit {
        hits.truncate(limit);
    }
    tracing::Span::current().record("hits", hits.len());
    hits
}

/// Scores a record against every term; `None` if any term is missing.
fn score(record: &Record, terms: &[String]) -> Option<(u32, Option<usize>)> {
    let title = record.title.to_lowercase();
    let short = record.short_title().to_lowercase();
    let text = record.text.to_lowercase();
    // Offsets into the lowercased text only carry over if lowercasing didn't
    // change any byte lengths.
    let offsets_valid = text.len() == record.text.len();
    let mut total = 0;
    let mut text_match: Option<usize> = None;
    for term in terms {
        let found = text.find(term.as_str());
        if let Some(offset) = found.filter(|_| offsets_valid) {
            text_match = Some(text_match.map_or(offset, |current| current.min(offset)));
        }
        total += if short == *term || title == *term {
            TITLE_EXACT
        } else if short.starts_with(term.as_str()) || title.starts_with(term.as_str()) {
            TITLE_PREFIX
        } else if title.contains(term.as_str()) {
            TITLE_CONTAINS
        } else if found.is_some() {
            let repeats = text.matches(term.as_str()).take(TEXT_REPEAT_CAP).count();
            TEXT_MATCH + TEXT_REPEAT * (repeats as u32).saturating_sub(1)
        } else {
            return None;
        };
    }
    Some((total * FIELD_SCALE + record.category.weight(), text_match))
}

fn snippet(text: &str, offset: usize, width: usize) -> String {
    // Room for at least one character between two ellipses.
    let width = width.max(3);
    let chars: Vec<char> = text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }).collect();
    if chars.len() <= width {
        return chars.into_iter().collect();
    }
    let center = text.get(..offset).map_or(0, |before| before.chars().count());
    let start = center.saturating_sub(width / 4).min(chars.len() - width);
    let end = start + width;
    let mut out = String::with_capacity(width + 2);
    // Ellipses are counted against the width.
    let (mut from, mut to) = (start, end);
    if from > 0 {
        out.push('…');
        from += 1;
    }
    if to < chars.len() {
        to -= 1;
    }
    out.extend(&chars[from..to]);
    if end < chars.len() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn index() -> SearchIndex {
        SearchIndex::from_iter([
            Record::new("lib/F/#F", "ForwardAlgorithms", "ForwardAlgorithms", "", Category::Section),
            Record::new(
                "lib/F/",
                "ForwardAlgorithms",
                "ForwardAlgorithms",
                "ForwardAlgorithm\nDeepZ\nAI2Zonotope",
                Category::Page,
            ),
            Record::new(
                "lib/F/#N.F.DeepZ",
                "ForwardAlgorithms",
                "N.F.DeepZ",
                "DeepZ <: ForwardAlgorithm\n\nForward algorithm based on zonotopes.",
                Category::Type,
            ),
            Record::new(
                "lib/F/#N.F.AI2Zonotope",
                "ForwardAlgorithms",
                "N.F.AI2Zonotope",
                "AI2Zonotope <: AI2\n\nAI2 forward algorithm using zonotopes.",
                Category::Type,
            ),
            Record::new("about/#Credits", "About", "Credits", "", Category::Section),
        ])
    }

    fn positions(hits: &[Hit<'_>]) -> Vec<usize> {
        hits.iter().map(|hit| hit.position).collect()
    }

    #[test]
    fn test_exact_title_outranks_text() {
        let index = index();
        let hits = search(&index, &Query::parse("DeepZ"));
        assert_eq!(positions(&hits), vec![2, 1]);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_title_contains_outranks_repeated_text() {
        let index = index();
        let hits = search(&index, &Query::parse("zonotope"));
        // AI2Zonotope contains the term in its title, the others only in prose.
        assert_eq!(positions(&hits), vec![3, 2, 1]);
    }

    #[test]
    fn test_all_terms_required() {
        let index = index();
        assert_eq!(positions(&search(&index, &Query::parse("deepz zonotopes"))), vec![2]);
        assert!(search(&index, &Query::parse("deepz verisig")).is_empty());
    }

    #[test]
    fn test_ties_break_on_category_then_position() {
        let index = index();
        let hits = search(&index, &Query::parse("forwardalgorithms"));
        // Section and page share the exact title; the section weighs more.
        assert_eq!(positions(&hits), vec![0, 1]);
    }

    #[rstest]
    #[case("a.set", vec![1, 0])]
    #[case("set", vec![1, 0])]
    #[case("a.setx", vec![0])]
    #[case("setx", vec![0])]
    fn test_exact_title_wins(#[case] query: &str, #[case] expected: Vec<usize>) {
        let index = SearchIndex::from_iter([
            Record::new("lib/A/#A.SetX", "A", "A.SetX", "", Category::Type),
            Record::new("lib/A/#A.Set", "A", "A.Set", "", Category::Type),
        ]);
        let hits = search(&index, &Query::parse(query));
        assert_eq!(positions(&hits), expected);
        if let [first, second] = hits.as_slice() {
            assert!(first.score > second.score);
        }
    }

    #[rstest]
    #[case(Query::parse("zonotope").with_category(Category::Type), vec![3, 2])]
    #[case(Query::parse("zonotope").with_category(Category::Page), vec![1])]
    #[case(Query::parse("credits").with_page("about"), vec![4])]
    #[case(Query::parse("credits").with_page("ForwardAlgorithms"), vec![])]
    #[case(Query::parse("zonotope").with_limit(1), vec![3])]
    #[case(Query::parse("   "), vec![])]
    fn test_filters(#[case] query: Query, #[case] expected: Vec<usize>) {
        let index = index();
        assert_eq!(positions(&search(&index, &query)), expected);
    }

    #[rstest]
    #[case("short text", 0, 20, "short text")]
    #[case("line one\nline two", 0, 20, "line one line two")]
    #[case("abcdefghijklmnopqrstuvwxyz", 0, 10, "abcdefghi…")]
    #[case("abcdefghijklmnopqrstuvwxyz", 25, 10, "…rstuvwxyz")]
    #[case("abcdefghijklmnopqrstuvwxyz", 12, 10, "…lmnopqrs…")]
    fn test_snippet(#[case] text: &str, #[case] offset: usize, #[case] width: usize, #[case] expected: &str) {
        let out = snippet(text, offset, width);
        assert_eq!(out, expected);
        assert!(out.chars().count() <= width);
    }

    #[test]
    fn test_snippet_multibyte() {
        let text = "set  – set of dimension dims[1] * dims[2] * dims[3]";
        let out = snippet(text, text.find("dimension").unwrap(), 16);
        assert_eq!(out, "…of dimension d…");
    }
}
