//! Normalized publication records produced by the MEDLINE parser.

use serde::{Deserialize, Serialize};

/// One publication after tolerant field extraction.
///
/// This is the normalized intermediate between the raw MEDLINE stream and
/// the relational load: both the publications table and the expanded author
/// rows are derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// PubMed identifier, primary key of the publications table
    pub pmid: i64,

    /// Full author names, in citation order
    pub authors: Vec<String>,

    /// Entrez date, truncated to `YYYY/MM/DD`
    pub pub_date: String,

    /// Abstract text, empty when the record has none
    pub abstract_text: String,

    /// Article title
    pub title: String,
}

/// Why a raw record was excluded from the normalized output.
///
/// A missing abstract is the only gap absorbed with a default; the fields
/// below are structurally essential, so a record lacking one produces no
/// output at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingPmid,
    MissingTitle,
    MissingDate,
    MissingAuthors,
}

impl SkipReason {
    /// MEDLINE tag of the absent field
    pub fn tag(&self) -> &'static str {
        match self {
            SkipReason::MissingPmid => "PMID",
            SkipReason::MissingTitle => "TI",
            SkipReason::MissingDate => "EDAT",
            SkipReason::MissingAuthors => "FAU",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing {}", self.tag())
    }
}

/// Outcome of normalizing one raw record.
///
/// The discard case is an ordinary result variant rather than an error, so
/// batch processing is a filter over outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Keep(ParsedRecord),
    Skip(SkipReason),
}

impl Outcome {
    /// The kept record, if any.
    pub fn into_record(self) -> Option<ParsedRecord> {
        match self {
            Outcome::Keep(record) => Some(record),
            Outcome::Skip(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParsedRecord {
        ParsedRecord {
            pmid: 1,
            authors: vec!["Smith, John".to_string()],
            pub_date: "2020/01/15".to_string(),
            abstract_text: String::new(),
            title: "Test".to_string(),
        }
    }

    #[test]
    fn test_outcome_into_record() {
        assert_eq!(Outcome::Keep(sample()).into_record(), Some(sample()));
        assert_eq!(Outcome::Skip(SkipReason::MissingTitle).into_record(), None);
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::MissingAuthors.to_string(), "missing FAU");
    }
}
