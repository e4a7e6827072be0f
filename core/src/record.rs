use serde::{Deserialize, Serialize};
use std::fmt;

use crate::display::{render_html, DisplayFields};
use crate::ParseOptions;

/// Named fields of a [`Record`], spelled the way the reference manager stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Author,
    Title,
    Year,
    Journal,
    HtmlRepresentation,
}

impl Field {
    pub const BIBLIOGRAPHIC: [Field; 4] = [Field::Author, Field::Title, Field::Year, Field::Journal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Author => "author",
            Field::Title => "title",
            Field::Year => "year",
            Field::Journal => "journal",
            Field::HtmlRepresentation => "html_representation",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bibliographic entry built from a recommendation.
///
/// Fields are private: a record is built once by [`Record::new`] and the display
/// string always reflects the bibliographic fields it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    author: String,
    title: String,
    year: String,
    journal: String,
    html_representation: String,
}

impl Record {
    /// Build a record and render its display string. `url` only feeds the template.
    pub fn new(
        author: String,
        title: String,
        year: String,
        journal: String,
        url: &str,
        options: &ParseOptions,
    ) -> Self {
        let html_representation = render_html(
            &DisplayFields { url, title: &title, authors: &author, journal: &journal, year: &year },
            options.escape_html,
        );
        Self { author, title, year, journal, html_representation }
    }

    pub fn author(&self) -> &str { &self.author }
    pub fn title(&self) -> &str { &self.title }
    pub fn year(&self) -> &str { &self.year }
    pub fn journal(&self) -> &str { &self.journal }
    pub fn html_representation(&self) -> &str { &self.html_representation }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Author => &self.author,
            Field::Title => &self.title,
            Field::Year => &self.year,
            Field::Journal => &self.journal,
            Field::HtmlRepresentation => &self.html_representation,
        }
    }
}

/// Records in display order: ascending rank, ties in payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<Record>,
}

impl ResultSet {
    pub(crate) fn from_sorted(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn iter(&self) -> std::slice::Iter<'_, Record> { self.records.iter() }
    pub fn records(&self) -> &[Record] { &self.records }
    pub fn into_records(self) -> Vec<Record> { self.records }
}

impl IntoIterator for ResultSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookup_matches_accessors() {
        let r = Record::new("A.".into(), "T".into(), "2017".into(), "J".into(), "", &ParseOptions::default());
        assert_eq!(r.field(Field::Author), "A.");
        assert_eq!(r.field(Field::Year), r.year());
        assert_eq!(r.field(Field::HtmlRepresentation), r.html_representation());
    }

    #[test]
    fn serializes_with_reference_field_names() {
        let r = Record::new(String::new(), "T".into(), String::new(), String::new(), "", &ParseOptions::default());
        let v = serde_json::to_value(&r).unwrap();
        for f in Field::BIBLIOGRAPHIC {
            assert!(v.get(f.as_str()).is_some(), "missing {f}");
        }
        assert!(v["html_representation"].as_str().unwrap().contains(">T<"));
    }
}
