//! Re-serialization of a [`SearchIndex`] in the generator's own layout.

use exn::ResultExt;
use serde::Serialize;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::models::{Record, SearchIndex};

/// Borrowed view of a record, serialized in wire field order.
#[derive(Serialize)]
struct WireRecord<'a> {
    location: &'a str,
    page: &'a str,
    title: &'a str,
    text: &'a str,
    category: &'a str,
}
impl<'a> From<&'a Record> for WireRecord<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            location: record.location.as_str(),
            page: &record.page,
            title: &record.title,
            text: &record.text,
            category: record.category.as_str(),
        }
    }
}

#[derive(Serialize)]
struct WireIndex<'a> {
    docs: Vec<WireRecord<'a>>,
}

impl SearchIndex {
    /// Writes the index as the JavaScript assignment the generator emits.
    ///
    /// For an index read from a generated file, the output is byte-for-byte
    /// identical to that file.
    ///
    /// # Examples
    ///
    /// ```
    /// use docsift_index::models::{Category, Record, SearchIndex};
    /// let index = SearchIndex::from_iter([Record::new("", "Home", "Home", "Hi", Category::Page)]);
    /// assert_eq!(
    ///     index.to_js().unwrap(),
    ///     "var documenterSearchIndex = {\"docs\":\n[{\"location\":\"\",\"page\":\"Home\",\"title\":\"Home\",\"text\":\"Hi\",\"category\":\"page\"}]\n}\n"
    /// );
    /// ```
    #[instrument(skip(self), fields(records = self.len(), output_size))]
    pub fn to_js(&self) -> Result<String> {
        let mut output = Vec::with_capacity(64 + self.docs().iter().map(|r| 64 + r.text.len()).sum::<usize>());
        output.extend_from_slice(format!("var {} = {{\"docs\":\n[", self.variable()).as_bytes());
        for (position, record) in self.iter() {
            if position > 0 {
                output.push(b',');
            }
            serde_json::to_writer(&mut output, &WireRecord::from(record)).or_raise(|| ErrorKind::Serialize)?;
        }
        output.extend_from_slice(b"]\n}\n");
        tracing::Span::current().record("output_size", output.len());
        String::from_utf8(output).or_raise(|| ErrorKind::Serialize)
    }

    /// Writes the index as a plain JSON object (`{"docs": [...]}`).
    #[instrument(skip(self), fields(records = self.len()))]
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let wire = WireIndex { docs: self.docs().iter().map(WireRecord::from).collect() };
        let output = match pretty {
            true => serde_json::to_string_pretty(&wire),
            false => serde_json::to_string(&wire),
        };
        output.or_raise(|| ErrorKind::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Category, Record, SearchIndex};
    use crate::reader::IndexReader;

    fn sample() -> SearchIndex {
        SearchIndex::new(
            "idx",
            vec![
                Record::new("lib/Util/#Util", "Util", "Util", "", Category::Section),
                Record::new("lib/Util/", "Util", "Util", "Pages = [\"Util.md\"]\nDepth = 3", Category::Page),
                Record::new("lib/Util/#X", "Util", "X", "set  – set of dimension", Category::Type),
            ],
        )
    }

    #[test]
    fn test_to_js_layout() {
        let js = sample().to_js().unwrap();
        assert!(js.starts_with("var idx = {\"docs\":\n[{\"location\":\"lib/Util/#Util\""));
        assert!(js.contains(r#""text":"Pages = [\"Util.md\"]\nDepth = 3","category":"page"},{"#));
        assert!(js.contains("set  – set of dimension"));
        assert!(js.ends_with("\"category\":\"type\"}]\n}\n"));
    }

    #[test]
    fn test_empty_index() {
        let index = SearchIndex::default();
        assert_eq!(index.to_js().unwrap(), "var documenterSearchIndex = {\"docs\":\n[]\n}\n");
        assert_eq!(index.to_json(false).unwrap(), "{\"docs\":[]}");
    }

    #[test]
    fn test_reparse_is_identical() {
        let original = sample();
        let js = original.to_js().unwrap();
        let reparsed = IndexReader::from_text(&js).index().unwrap();
        assert_eq!(reparsed, original);
        assert_eq!(reparsed.to_js().unwrap(), js);

        let json = original.to_json(true).unwrap();
        let from_json = IndexReader::from_text(&json).index().unwrap();
        assert_eq!(from_json.docs(), original.docs());
        assert_eq!(from_json.variable(), "documenterSearchIndex");
    }
}
