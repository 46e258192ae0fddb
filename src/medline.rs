//! MEDLINE field-tagged text parsing and tolerant record normalization.
//!
//! An efetch page in `rettype=medline&retmode=text` form is a stream of
//! records separated by blank lines. Each record is a sequence of key-value
//! pairs, e.g.
//!
//! ```plain
//! PMID- 12345678
//! TI  - Fantastic yeasts and where to find them: the hidden diversity of
//!       dimorphic fungal pathogens.
//! FAU - Smith, John
//! ```
//!
//! Values may continue over multiple lines; continuation lines start with
//! whitespace and are joined with a single space (no space after a
//! hyphen-terminated fragment, so hyphenated words survive wrapping).

use std::collections::HashMap;
use thiserror::Error;

use crate::models::{Outcome, ParsedRecord, SkipReason};

/// MEDLINE tags the normalizer extracts
const TAG_PMID: &str = "PMID";
const TAG_TITLE: &str = "TI";
const TAG_ABSTRACT: &str = "AB";
const TAG_ENTREZ_DATE: &str = "EDAT";
const TAG_FULL_AUTHOR: &str = "FAU";

/// Errors raised while normalizing raw records
#[derive(Debug, Error, PartialEq)]
pub enum MedlineError {
    /// The PMID field was present but not an integer. The identifier is the
    /// primary key downstream, so this is fatal rather than a skip.
    #[error("unparseable PMID value: {0:?}")]
    BadPmid(String),
}

/// Unparsed field-tagged data for one publication.
///
/// Duplicate tags keep all their values in order of appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, Vec<String>>,
}

impl RawRecord {
    /// First value of `tag`, if any.
    pub fn first(&self, tag: &str) -> Option<&str> {
        self.fields.get(tag).and_then(|v| v.first()).map(String::as_str)
    }

    /// All values of `tag`, in order of appearance.
    pub fn all(&self, tag: &str) -> &[String] {
        self.fields.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push(&mut self, tag: String, value: String) {
        self.fields.entry(tag).or_default().push(value);
    }

    fn append_to_last(&mut self, tag: &str, fragment: &str) {
        if let Some(value) = self.fields.get_mut(tag).and_then(|v| v.last_mut()) {
            if !(value.ends_with('-') || value.is_empty()) {
                value.push(' ');
            }
            value.push_str(fragment);
        }
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut record = Self::default();
        for (tag, value) in pairs {
            record.push(tag.to_string(), value.to_string());
        }
        record
    }
}

/// Parse one page of MEDLINE text into raw records.
///
/// Lines that do not form a `TAG - value` pair and are not continuations are
/// ignored.
pub fn parse_records(text: &str) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut current = RawRecord::default();
    let mut last_tag: Option<String> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            last_tag = None;
            continue;
        }

        if line.starts_with(' ') {
            // continuation of the previous value
            if let Some(tag) = &last_tag {
                current.append_to_last(tag, line.trim_start());
            }
            continue;
        }

        match split_on_dash(line) {
            Some((tag, value)) => {
                current.push(tag.to_string(), value.to_string());
                last_tag = Some(tag.to_string());
            }
            None => last_tag = None,
        }
    }

    if !current.is_empty() {
        records.push(current);
    }
    records
}

/// Split on the first `-` and strip the whitespace around it.
fn split_on_dash(line: &str) -> Option<(&str, &str)> {
    line.split_once('-')
        .map(|(l, r)| (l.trim_end(), r.trim_start()))
        .filter(|(tag, _)| !tag.is_empty())
}

/// Extract the normalized fields from one raw record.
///
/// Tolerant-parsing policy: a missing abstract is kept with an empty
/// default; a missing PMID, title, date or author list excludes the record
/// via [`Outcome::Skip`]. A PMID that is present but not an integer is a
/// hard error.
pub fn normalize(record: &RawRecord) -> Result<Outcome, MedlineError> {
    let pmid = match record.first(TAG_PMID) {
        None => return Ok(Outcome::Skip(SkipReason::MissingPmid)),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| MedlineError::BadPmid(raw.to_string()))?,
    };

    let title = match record.first(TAG_TITLE) {
        None => return Ok(Outcome::Skip(SkipReason::MissingTitle)),
        Some(title) => title.to_string(),
    };

    let abstract_text = record.first(TAG_ABSTRACT).unwrap_or("").to_string();

    let pub_date = match record.first(TAG_ENTREZ_DATE) {
        None => return Ok(Outcome::Skip(SkipReason::MissingDate)),
        // EDAT carries a time component, e.g. "2020/01/15 06:00"
        Some(edat) => edat.chars().take(10).collect(),
    };

    let authors = record.all(TAG_FULL_AUTHOR);
    if authors.is_empty() {
        return Ok(Outcome::Skip(SkipReason::MissingAuthors));
    }

    Ok(Outcome::Keep(ParsedRecord {
        pmid,
        authors: authors.to_vec(),
        pub_date,
        abstract_text,
        title,
    }))
}

/// Normalize a batch of raw records, dropping the skipped ones.
///
/// Skips are logged per record at debug level and summarized at info level
/// together with the accepted count.
pub fn accept_records(raw: &[RawRecord]) -> Result<Vec<ParsedRecord>, MedlineError> {
    let mut accepted = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;

    for record in raw {
        match normalize(record)? {
            Outcome::Keep(parsed) => accepted.push(parsed),
            Outcome::Skip(reason) => {
                skipped += 1;
                tracing::debug!(
                    pmid = record.first(TAG_PMID).unwrap_or("?"),
                    %reason,
                    "skipping record"
                );
            }
        }
    }

    tracing::info!(
        accepted = accepted.len(),
        skipped,
        "normalized record batch"
    );
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
PMID- 101
TI  - Fantastic yeasts and where to find them: the hidden diversity of
      dimorphic fungal pathogens.
AB  - An abstract that wraps across
      two lines.
EDAT- 2020/01/15 06:00
FAU - Smith, John
FAU - Doe, Jane

PMID- 102
TI  - Second article.
EDAT- 2020/02/01 06:00
FAU - Roe, Richard
";

    #[test]
    fn test_parse_records_splits_on_blank_lines() {
        let records = parse_records(PAGE);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].first("PMID"), Some("101"));
        assert_eq!(records[1].first("PMID"), Some("102"));
    }

    #[test]
    fn test_parse_records_joins_continuation_lines() {
        let records = parse_records(PAGE);
        assert_eq!(
            records[0].first("TI"),
            Some(
                "Fantastic yeasts and where to find them: the hidden diversity of \
                 dimorphic fungal pathogens."
            )
        );
        assert_eq!(
            records[0].first("AB"),
            Some("An abstract that wraps across two lines.")
        );
    }

    #[test]
    fn test_parse_records_hyphen_wrap_joined_without_space() {
        let text = "TI  - A hyphen-\n      ated title.\n";
        let records = parse_records(text);
        assert_eq!(records[0].first("TI"), Some("A hyphen-ated title."));
    }

    #[test]
    fn test_parse_records_keeps_duplicate_tags_in_order() {
        let records = parse_records(PAGE);
        assert_eq!(records[0].all("FAU"), ["Smith, John", "Doe, Jane"]);
    }

    #[test]
    fn test_parse_records_empty_input() {
        assert!(parse_records("").is_empty());
        assert!(parse_records("\n\n\n").is_empty());
    }

    #[test]
    fn test_normalize_complete_record() {
        let record = RawRecord::from_pairs(&[
            ("PMID", "12345678"),
            ("TI", "Example Title"),
            ("AB", "Example abstract."),
            ("EDAT", "2020/01/15 06:00"),
            ("FAU", "Smith, John"),
        ]);
        let parsed = normalize(&record).unwrap().into_record().unwrap();
        assert_eq!(parsed.pmid, 12345678);
        assert_eq!(parsed.title, "Example Title");
        assert_eq!(parsed.abstract_text, "Example abstract.");
        assert_eq!(parsed.pub_date, "2020/01/15");
        assert_eq!(parsed.authors, vec!["Smith, John".to_string()]);
    }

    #[test]
    fn test_normalize_missing_abstract_defaults_to_empty() {
        let record = RawRecord::from_pairs(&[
            ("PMID", "1"),
            ("TI", "No abstract here"),
            ("EDAT", "2020/01/15 06:00"),
            ("FAU", "Smith, John"),
        ]);
        let parsed = normalize(&record).unwrap().into_record().unwrap();
        assert_eq!(parsed.abstract_text, "");
    }

    #[test]
    fn test_normalize_skips_structural_gaps() {
        let missing_title = RawRecord::from_pairs(&[
            ("PMID", "1"),
            ("EDAT", "2020/01/15 06:00"),
            ("FAU", "Smith, John"),
        ]);
        assert_eq!(
            normalize(&missing_title).unwrap(),
            Outcome::Skip(SkipReason::MissingTitle)
        );

        let missing_date =
            RawRecord::from_pairs(&[("PMID", "1"), ("TI", "T"), ("FAU", "Smith, John")]);
        assert_eq!(
            normalize(&missing_date).unwrap(),
            Outcome::Skip(SkipReason::MissingDate)
        );

        let missing_authors =
            RawRecord::from_pairs(&[("PMID", "1"), ("TI", "T"), ("EDAT", "2020/01/15 06:00")]);
        assert_eq!(
            normalize(&missing_authors).unwrap(),
            Outcome::Skip(SkipReason::MissingAuthors)
        );

        let missing_pmid =
            RawRecord::from_pairs(&[("TI", "T"), ("EDAT", "2020/01/15 06:00"), ("FAU", "S, J")]);
        assert_eq!(
            normalize(&missing_pmid).unwrap(),
            Outcome::Skip(SkipReason::MissingPmid)
        );
    }

    #[test]
    fn test_normalize_bad_pmid_is_fatal() {
        let record = RawRecord::from_pairs(&[
            ("PMID", "not-a-number"),
            ("TI", "T"),
            ("EDAT", "2020/01/15 06:00"),
            ("FAU", "Smith, John"),
        ]);
        assert_eq!(
            normalize(&record),
            Err(MedlineError::BadPmid("not-a-number".to_string()))
        );
    }

    #[test]
    fn test_accept_records_filters_skips() {
        let raw = parse_records(PAGE);
        let mut with_gap = raw.clone();
        with_gap.push(RawRecord::from_pairs(&[
            ("PMID", "103"),
            ("EDAT", "2020/03/01 06:00"),
            ("FAU", "Smith, John"),
        ]));

        let accepted = accept_records(&with_gap).unwrap();
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].pmid, 101);
        assert_eq!(accepted[1].pmid, 102);
    }
}
