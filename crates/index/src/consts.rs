use regex::Regex;
use std::sync::LazyLock;

/// Global the documentation generator assigns its search index to.
pub const DEFAULT_VARIABLE: &str = "documenterSearchIndex";
/// Key holding the record array in the assigned object.
pub(crate) const DOCS_KEY: &str = "docs";

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// `var documenterSearchIndex = ` (or `let`/`const`, or a bare assignment).
regex!(ASSIGNMENT_REGEX, r"^\s*(?:(?:var|let|const)\s+)?([A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z_$][A-Za-z0-9_$]*)*)\s*=\s*");
// Start of the object that carries the records, in the generator's layout.
regex!(DOCS_OBJECT_REGEX, r#"^\s*\{\s*"docs"\s*:"#);
