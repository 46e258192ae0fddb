//! Author row expansion and name decomposition.

use crate::models::ParsedRecord;

/// One author of one publication, ready for the relational load.
///
/// AID values are dense and assigned by flattened position at expansion
/// time; they are not stable across reloads.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorRow {
    /// Primary key of the authors table, 0-based expansion order
    pub aid: i64,

    /// Foreign key to the owning publication
    pub pmid: i64,

    /// Raw author-name string as it appeared in the record
    pub full_name: String,

    /// Text before the first comma, trimmed
    pub last_name: String,

    /// Text after the first comma, trimmed; empty when there is no comma
    pub first_name: String,
}

/// Flatten the author lists of a record batch into individual rows.
///
/// Order is publication order then author-list order, and the AID counter is
/// threaded through the whole flattened sequence.
pub fn expand_authors(records: &[ParsedRecord]) -> Vec<AuthorRow> {
    let mut rows = Vec::new();
    let mut aid: i64 = 0;
    for record in records {
        for full_name in &record.authors {
            let (last_name, first_name) = split_full_name(full_name);
            rows.push(AuthorRow {
                aid,
                pmid: record.pmid,
                full_name: full_name.clone(),
                last_name,
                first_name,
            });
            aid += 1;
        }
    }
    rows
}

/// Split a raw author name on the first comma into trimmed
/// `(last_name, first_name)` parts.
///
/// A name with no comma, such as a collective name, becomes the last name
/// with an empty first name.
pub fn split_full_name(full_name: &str) -> (String, String) {
    match full_name.split_once(',') {
        Some((last, first)) => (last.trim().to_string(), first.trim().to_string()),
        None => (full_name.trim().to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pmid: i64, authors: &[&str]) -> ParsedRecord {
        ParsedRecord {
            pmid,
            authors: authors.iter().map(|s| s.to_string()).collect(),
            pub_date: "2020/01/15".to_string(),
            abstract_text: String::new(),
            title: "Test".to_string(),
        }
    }

    #[test]
    fn test_expand_single_publication() {
        let records = vec![record(1, &["Smith, John", "Doe, Jane"])];
        let rows = expand_authors(&records);

        assert_eq!(
            rows,
            vec![
                AuthorRow {
                    aid: 0,
                    pmid: 1,
                    full_name: "Smith, John".to_string(),
                    last_name: "Smith".to_string(),
                    first_name: "John".to_string(),
                },
                AuthorRow {
                    aid: 1,
                    pmid: 1,
                    full_name: "Doe, Jane".to_string(),
                    last_name: "Doe".to_string(),
                    first_name: "Jane".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_aid_dense_across_publications() {
        let records = vec![
            record(10, &["Smith, John"]),
            record(20, &["Doe, Jane", "Roe, Richard"]),
        ];
        let rows = expand_authors(&records);

        let aids: Vec<i64> = rows.iter().map(|r| r.aid).collect();
        assert_eq!(aids, vec![0, 1, 2]);
        assert_eq!(rows[1].pmid, 20);
        assert_eq!(rows[2].pmid, 20);
    }

    #[test]
    fn test_expand_no_authors_emits_nothing() {
        let records = vec![record(1, &[])];
        assert!(expand_authors(&records).is_empty());
    }

    #[test]
    fn test_split_full_name() {
        assert_eq!(
            split_full_name("Smith, John"),
            ("Smith".to_string(), "John".to_string())
        );
        // Only the first comma splits
        assert_eq!(
            split_full_name("Smith, John, Jr"),
            ("Smith".to_string(), "John, Jr".to_string())
        );
        assert_eq!(
            split_full_name("  Smith ,  John  "),
            ("Smith".to_string(), "John".to_string())
        );
    }

    #[test]
    fn test_split_full_name_no_comma() {
        assert_eq!(split_full_name("Smith"), ("Smith".to_string(), String::new()));
        assert_eq!(
            split_full_name("COVID-19 Consortium"),
            ("COVID-19 Consortium".to_string(), String::new())
        );
    }
}
