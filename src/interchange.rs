//! CSV interchange file between the harvest and load stages.
//!
//! One row per accepted publication, header `PMID,Authors,Pub_Date,
//! Abstract,Title`. The `Authors` column holds a quoted list literal such as
//! `['Smith, John', 'Doe, Jane']`, which is parsed back into a list before
//! author expansion.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::ParsedRecord;

/// Interchange file error types
#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("file name must end in .csv: {0}")]
    NotCsv(String),

    #[error("malformed author list: {0}")]
    AuthorList(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "PMID")]
    pmid: i64,
    #[serde(rename = "Authors")]
    authors: String,
    #[serde(rename = "Pub_Date")]
    pub_date: String,
    #[serde(rename = "Abstract")]
    abstract_text: String,
    #[serde(rename = "Title")]
    title: String,
}

/// Write an accepted record batch to a `.csv` file.
pub fn write_csv(path: impl AsRef<Path>, records: &[ParsedRecord]) -> Result<(), InterchangeError> {
    let path = path.as_ref();
    require_csv_extension(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(CsvRow {
            pmid: record.pmid,
            authors: format_author_list(&record.authors),
            pub_date: record.pub_date.clone(),
            abstract_text: record.abstract_text.clone(),
            title: record.title.clone(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Read an interchange file back into records, parsing the author lists.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<ParsedRecord>, InterchangeError> {
    let path = path.as_ref();
    require_csv_extension(path)?;

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: CsvRow = row?;
        records.push(ParsedRecord {
            pmid: row.pmid,
            authors: parse_author_list(&row.authors)?,
            pub_date: row.pub_date,
            abstract_text: row.abstract_text,
            title: row.title,
        });
    }
    Ok(records)
}

fn require_csv_extension(path: &Path) -> Result<(), InterchangeError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => Ok(()),
        _ => Err(InterchangeError::NotCsv(path.display().to_string())),
    }
}

/// Serialize author names as a single-quoted list literal.
fn format_author_list(authors: &[String]) -> String {
    let quoted: Vec<String> = authors
        .iter()
        .map(|name| format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Parse a list literal back into author names.
///
/// Accepts single- or double-quoted elements with backslash escapes.
fn parse_author_list(input: &str) -> Result<Vec<String>, InterchangeError> {
    let malformed = || InterchangeError::AuthorList(input.to_string());

    let inner = input
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(malformed)?;

    let mut authors = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        // skip separators and whitespace between elements
        while matches!(chars.peek(), Some(c) if c.is_whitespace() || *c == ',') {
            chars.next();
        }
        let quote = match chars.next() {
            None => break,
            Some(q @ ('\'' | '"')) => q,
            Some(_) => return Err(malformed()),
        };

        let mut name = String::new();
        loop {
            match chars.next() {
                None => return Err(malformed()),
                Some('\\') => match chars.next() {
                    None => return Err(malformed()),
                    Some(escaped) => name.push(escaped),
                },
                Some(c) if c == quote => break,
                Some(c) => name.push(c),
            }
        }
        authors.push(name);
    }
    Ok(authors)
}
