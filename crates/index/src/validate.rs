//! Structural checks over a loaded index.
//!
//! Parsing already guarantees every record has its fields with the right
//! types and a known category. These checks cover what the type system can't:
//! fields that are present but empty, and records that disagree with each
//! other about where a page lives.

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter, Result as FmtResult};

use tracing::instrument;

use crate::models::{Category, Record, SearchIndex};

/// How serious an [`Issue`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The index is usable, but a search client will behave oddly
    Warning,
    /// The record is unusable by a search client
    Error,
}
impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// What is wrong with a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// The record has no page name to group it under.
    EmptyPage,
    /// The record has no title to display.
    EmptyTitle,
    /// A section heading that doesn't link to an anchor.
    SectionWithoutAnchor,
    /// A docstring whose anchor isn't the binding it documents.
    AnchorTitleMismatch { anchor: String },
    /// The page name was already seen under a different path.
    PagePathConflict { page: String, first: String, found: String },
    /// The record is identical to an earlier one.
    Duplicate { first: usize },
}
impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::EmptyPage | Self::EmptyTitle | Self::SectionWithoutAnchor => Severity::Error,
            Self::AnchorTitleMismatch { .. } | Self::PagePathConflict { .. } | Self::Duplicate { .. } => {
                Severity::Warning
            },
        }
    }
}
impl Display for IssueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::EmptyPage => write!(f, "empty page name"),
            Self::EmptyTitle => write!(f, "empty title"),
            Self::SectionWithoutAnchor => write!(f, "section has no anchor"),
            Self::AnchorTitleMismatch { anchor } => write!(f, "anchor '{anchor}' does not match title"),
            Self::PagePathConflict { page, first, found } => {
                write!(f, "page '{page}' found at '{found}', previously at '{first}'")
            },
            Self::Duplicate { first } => write!(f, "duplicate of record {first}"),
        }
    }
}

/// A problem found at a specific record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Issue {
    pub position: usize,
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: IssueKind,
}
impl Issue {
    pub fn new(position: usize, kind: IssueKind) -> Self {
        Self { position, severity: kind.severity(), kind }
    }
}
impl Display for Issue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} at record {}: {}", self.severity, self.position, self.kind)
    }
}

/// Result of validating an index; issues are ordered by record position.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Report {
    pub records: usize,
    pub issues: Vec<Issue>,
}
impl Report {
    /// Returns `true` if no issue is an error. Warnings are allowed.
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.severity == Severity::Warning)
    }
}

/// Checks every record of the index.
#[instrument(skip(index), fields(records = index.len(), issues))]
pub fn validate(index: &SearchIndex) -> Report {
    let mut issues = Vec::new();
    let mut page_paths: HashMap<&str, &str> = HashMap::new();
    let mut seen: HashMap<&Record, usize> = HashMap::new();
    let mut conflicting: HashSet<(&str, &str)> = HashSet::new();

    for (position, record) in index.iter() {
        if record.page.trim().is_empty() {
            issues.push(Issue::new(position, IssueKind::EmptyPage));
        }
        if record.title.trim().is_empty() {
            issues.push(Issue::new(position, IssueKind::EmptyTitle));
        }
        match (record.category, record.location.anchor()) {
            (Category::Section, None | Some("")) => {
                issues.push(Issue::new(position, IssueKind::SectionWithoutAnchor));
            },
            (category, Some(anchor)) if category.is_docstring() && !anchor.is_empty() && anchor != record.title => {
                issues.push(Issue::new(position, IssueKind::AnchorTitleMismatch { anchor: anchor.to_string() }));
            },
            _ => {},
        }

        let path = record.location.path();
        let first = *page_paths.entry(record.page.as_str()).or_insert(path);
        // Report each conflicting path once per page, not once per record.
        if first != path && conflicting.insert((record.page.as_str(), path)) {
            issues.push(Issue::new(
                position,
                IssueKind::PagePathConflict {
                    page: record.page.clone(),
                    first: first.to_string(),
                    found: path.to_string(),
                },
            ));
        }

        if let Some(&first) = seen.get(record) {
            issues.push(Issue::new(position, IssueKind::Duplicate { first }));
        } else {
            seen.insert(record, position);
        }
    }

    tracing::Span::current().record("issues", issues.len());
    Report { records: index.len(), issues }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(records: Vec<Record>) -> SearchIndex {
        SearchIndex::from_iter(records)
    }

    #[test]
    fn test_well_formed_index() {
        let report = validate(&index(vec![
            Record::new("lib/Util/#Util", "Util", "Util", "", Category::Section),
            Record::new("lib/Util/", "Util", "Util", "text", Category::Page),
            Record::new("lib/Util/#N.Util.ConvSet", "Util", "N.Util.ConvSet", "doc", Category::Type),
            Record::new("#Pkg.jl", "Home", "Pkg.jl", "", Category::Section),
            Record::new("", "Home", "Home", "intro", Category::Page),
        ]));
        assert!(report.is_ok());
        assert!(report.issues.is_empty(), "{:?}", report.issues);
        assert_eq!(report.records, 5);
    }

    #[test]
    fn test_errors() {
        let report = validate(&index(vec![
            Record::new("about/", "", "About", "text", Category::Page),
            Record::new("about/", "About", " ", "text", Category::Page),
            Record::new("about/", "About", "About", "", Category::Section),
            Record::new("about/#", "About", "About", "", Category::Section),
        ]));
        assert!(!report.is_ok());
        let kinds: Vec<_> = report.errors().map(|issue| (issue.position, issue.kind.clone())).collect();
        assert_eq!(
            kinds,
            vec![
                (0, IssueKind::EmptyPage),
                (1, IssueKind::EmptyTitle),
                (2, IssueKind::SectionWithoutAnchor),
                (3, IssueKind::SectionWithoutAnchor),
            ]
        );
    }

    #[test]
    fn test_warnings() {
        let report = validate(&index(vec![
            Record::new("lib/A/#A.f", "A", "A.g", "doc", Category::Function),
            Record::new("lib/A/", "A", "A", "text", Category::Page),
            Record::new("lib/B/", "A", "A", "text", Category::Page),
            Record::new("lib/B/", "A", "A", "other", Category::Page),
            Record::new("lib/A/", "A", "A", "text", Category::Page),
        ]));
        assert!(report.is_ok());
        let kinds: Vec<_> = report.warnings().map(|issue| (issue.position, issue.kind.clone())).collect();
        assert_eq!(
            kinds,
            vec![
                (0, IssueKind::AnchorTitleMismatch { anchor: "A.f".to_string() }),
                (
                    2,
                    IssueKind::PagePathConflict {
                        page: "A".to_string(),
                        first: "lib/A/".to_string(),
                        found: "lib/B/".to_string()
                    }
                ),
                (4, IssueKind::Duplicate { first: 1 }),
            ]
        );
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue::new(7, IssueKind::Duplicate { first: 2 });
        assert_eq!(issue.to_string(), "warning at record 7: duplicate of record 2");
    }
}
