use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// Record kind, used by search clients to weight and group results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Prose paragraph belonging to a page
    Page,
    /// Section heading
    Section,
    /// Documented module
    Module,
    /// Documented type
    Type,
    /// Documented function
    Function,
    /// Documented method of a function
    Method,
    /// Documented macro
    Macro,
    /// Documented constant
    Constant,
    /// Documented keyword
    Keyword,
}
impl Category {
    /// Every category, in wire-name order of appearance in generated indices.
    pub const ALL: [Category; 9] = [
        Self::Section,
        Self::Page,
        Self::Module,
        Self::Type,
        Self::Function,
        Self::Method,
        Self::Macro,
        Self::Constant,
        Self::Keyword,
    ];

    /// Returns the wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Section => "section",
            Self::Module => "module",
            Self::Type => "type",
            Self::Function => "function",
            Self::Method => "method",
            Self::Macro => "macro",
            Self::Constant => "constant",
            Self::Keyword => "keyword",
        }
    }

    /// Returns `true` for records generated from a docstring, rather than
    /// from the prose or headings of a page.
    pub fn is_docstring(&self) -> bool {
        !matches!(self, Self::Page | Self::Section)
    }

    /// Group weight used when ranking otherwise equal matches.
    pub fn weight(&self) -> u32 {
        match self {
            Self::Page => 1,
            Self::Section => 2,
            _ => 3,
        }
    }
}
impl FromStr for Category {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match sanitize(s).as_str() {
            "page" => Self::Page,
            "section" => Self::Section,
            "module" => Self::Module,
            "type" => Self::Type,
            "function" => Self::Function,
            "method" => Self::Method,
            "macro" => Self::Macro,
            "constant" => Self::Constant,
            "keyword" => Self::Keyword,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "category",
                value: format!("unknown category: {}", s)
            }),
        })
    }
}
impl TryFrom<String> for Category {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl<'de> serde::Deserialize<'de> for Category {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = <String as serde::Deserialize>::deserialize(deserializer)?;
        name.parse().map_err(|_| serde::de::Error::custom(format!("unknown category: {name}")))
    }
}
impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
