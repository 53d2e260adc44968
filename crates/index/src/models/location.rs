use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Target of a record on the documentation site, relative to the site root.
///
/// Stored exactly as generated so that re-serialization is lossless. The home
/// page of a site is the empty location `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Location {
    raw: String,
}
impl Location {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The location exactly as it appears in the index.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Page path, everything before the first `#` (e.g. `lib/Util/`).
    pub fn path(&self) -> &str {
        self.raw.split_once('#').map_or(self.raw.as_str(), |(path, _)| path)
    }

    /// Fragment after the first `#`, if there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use docsift_index::models::Location;
    /// let location = Location::new("lib/Util/#NeuralNetworkReachability.Util.ConvSet");
    /// assert_eq!(location.path(), "lib/Util/");
    /// assert_eq!(location.anchor(), Some("NeuralNetworkReachability.Util.ConvSet"));
    /// assert_eq!(Location::new("about/").anchor(), None);
    /// ```
    pub fn anchor(&self) -> Option<&str> {
        self.raw.split_once('#').map(|(_, anchor)| anchor)
    }

    /// Joins the location onto a site base URL, inserting a `/` if needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use docsift_index::models::Location;
    /// let location = Location::new("about/#Credits");
    /// assert_eq!(location.url("https://example.org/docs"), "https://example.org/docs/about/#Credits");
    /// assert_eq!(Location::new("").url("https://example.org/docs/"), "https://example.org/docs/");
    /// ```
    pub fn url(&self, base: &str) -> String {
        match base.ends_with('/') {
            true => format!("{}{}", base, self.raw),
            false => format!("{}/{}", base, self.raw),
        }
    }
}
impl FromStr for Location {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
impl From<String> for Location {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
impl From<&str> for Location {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "", None)]
    #[case("about/", "about/", None)]
    #[case("about/#Credits", "about/", Some("Credits"))]
    #[case("#NeuralNetworkReachability.jl", "", Some("NeuralNetworkReachability.jl"))]
    #[case("about/#Branches-and-pull-requests-(PR)", "about/", Some("Branches-and-pull-requests-(PR)"))]
    #[case("a/#b#c", "a/", Some("b#c"))]
    fn test_split(#[case] raw: &str, #[case] path: &str, #[case] anchor: Option<&str>) {
        let location = Location::new(raw);
        assert_eq!(location.path(), path);
        assert_eq!(location.anchor(), anchor);
        assert_eq!(location.to_string(), raw);
    }
}
