use std::fmt::{Display, Formatter, Result as FmtResult};

use super::{Category, Location};

/// A single searchable entry of a documentation site.
///
/// Field order matches the order the generator writes them in, which is also
/// the order they are re-serialized in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Record {
    /// Target anchor on the documentation site
    pub location: Location,
    /// Display name of the containing page
    pub page: String,
    /// Display name of the section or documented binding
    pub title: String,
    /// Rendered documentation prose (may be empty)
    #[serde(default)]
    pub text: String,
    /// Record kind
    pub category: Category,
}
impl Record {
    pub fn new(
        location: impl Into<Location>,
        page: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            location: location.into(),
            page: page.into(),
            title: title.into(),
            text: text.into(),
            category,
        }
    }

    /// Unqualified name of a documented binding.
    ///
    /// Docstring titles are fully qualified (`Package.Module.Name`); this
    /// returns the final segment. Section and page titles are returned as-is,
    /// since headings such as `NeuralNetworkReachability.jl` contain dots too.
    ///
    /// # Examples
    ///
    /// ```
    /// use docsift_index::models::{Category, Record};
    /// let record = Record::new("lib/Util/#X", "Util", "NeuralNetworkReachability.Util.ConvSet", "", Category::Type);
    /// assert_eq!(record.short_title(), "ConvSet");
    /// ```
    pub fn short_title(&self) -> &str {
        if !self.category.is_docstring() {
            return &self.title;
        }
        self.title.rsplit_once('.').map_or(self.title.as_str(), |(_, name)| name).trim()
    }

    /// Returns the first non-empty line of the text, if any.
    pub fn summary(&self) -> Option<&str> {
        self.text.lines().map(str::trim).find(|line| !line.is_empty())
    }
}
impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{}] {} ({})", self.category, self.title, self.location)
    }
}
