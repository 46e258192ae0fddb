//! Record retrieval and pagination over an [`Entrez`] implementation.

use thiserror::Error;

use crate::entrez::{DateWindow, Entrez, EntrezError, RangeError};
use crate::medline::{self, RawRecord};

/// Identifier cap requested from a single search call
pub const DEFAULT_ID_CAP: usize = 100_000;

/// Records requested per fetch call
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Errors from a harvest run
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Entrez(#[from] EntrezError),
}

/// Retrieves all records matching a key term inside a date window.
///
/// One search call resolves the term to an identifier list; the records are
/// then fetched in sequential pages, each only after the previous one
/// completed. Remote errors propagate uncaught.
pub struct Harvester<'a> {
    source: &'a dyn Entrez,
    id_cap: usize,
    page_size: usize,
}

impl<'a> Harvester<'a> {
    pub fn new(source: &'a dyn Entrez) -> Self {
        Self {
            source,
            id_cap: DEFAULT_ID_CAP,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the paging constants.
    pub fn with_paging(mut self, id_cap: usize, page_size: usize) -> Self {
        self.id_cap = id_cap;
        self.page_size = page_size;
        self
    }

    /// Run the search-then-paginate protocol, returning raw records in
    /// retrieval order.
    pub fn run(&self, term: &str, window: &DateWindow) -> Result<Vec<RawRecord>, HarvestError> {
        if term.trim().is_empty() {
            return Err(RangeError::EmptyTerm.into());
        }

        let ids = self.source.search(term, window, self.id_cap)?;
        tracing::info!(matched = ids.len(), %term, "search complete");

        let mut records = Vec::with_capacity(ids.len());
        let mut retstart = 0;
        while retstart < ids.len() {
            let page = self.source.fetch(&ids, retstart, self.page_size)?;
            let parsed = medline::parse_records(&page);
            tracing::debug!(retstart, records = parsed.len(), "fetched page");
            records.extend(parsed);
            retstart += self.page_size;
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entrez::MockEntrez;

    fn window() -> DateWindow {
        DateWindow::new("2020/01/01", "2020/03/01").unwrap()
    }

    fn medline_block(pmid: usize) -> String {
        format!(
            "PMID- {pmid}\nTI  - Title {pmid}.\nEDAT- 2020/01/15 06:00\nFAU - Smith, John\n\n"
        )
    }

    #[test]
    fn test_empty_term_rejected() {
        let source = MockEntrez::with_ids(vec![]);
        let harvester = Harvester::new(&source);
        assert!(matches!(
            harvester.run("   ", &window()),
            Err(HarvestError::Range(RangeError::EmptyTerm))
        ));
    }

    #[test]
    fn test_no_matches_issues_no_fetch_calls() {
        let source = MockEntrez::with_ids(vec![]);
        let harvester = Harvester::new(&source);
        let records = harvester.run("HIV", &window()).unwrap();

        assert!(records.is_empty());
        assert!(source.fetch_calls().is_empty());
    }

    #[test]
    fn test_single_page_for_small_result() {
        let ids: Vec<String> = (0..5).map(|i| i.to_string()).collect();
        let source = MockEntrez::with_ids(ids).page_body(&medline_block(1));
        let harvester = Harvester::new(&source);
        harvester.run("HIV", &window()).unwrap();

        assert_eq!(source.fetch_calls(), vec![0]);
    }

    #[test]
    fn test_offsets_advance_by_page_size() {
        // 2500 ids at page size 1000 -> ceil = 3 calls at 0, 1000, 2000
        let ids: Vec<String> = (0..2500).map(|i| i.to_string()).collect();
        let source = MockEntrez::with_ids(ids).page_body(&medline_block(1));
        let harvester = Harvester::new(&source);
        harvester.run("HIV", &window()).unwrap();

        assert_eq!(source.fetch_calls(), vec![0, 1000, 2000]);
    }

    #[test]
    fn test_exact_multiple_of_page_size() {
        let ids: Vec<String> = (0..2000).map(|i| i.to_string()).collect();
        let source = MockEntrez::with_ids(ids).page_body(&medline_block(1));
        let harvester = Harvester::new(&source);
        harvester.run("HIV", &window()).unwrap();

        assert_eq!(source.fetch_calls(), vec![0, 1000]);
    }

    #[test]
    fn test_records_concatenated_in_retrieval_order() {
        let ids: Vec<String> = (0..3).map(|i| i.to_string()).collect();
        let source = MockEntrez::with_ids(ids)
            .page_body(&format!("{}{}", medline_block(101), medline_block(102)));
        let harvester = Harvester::new(&source);
        let records = harvester.run("HIV", &window()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].first("PMID"), Some("101"));
        assert_eq!(records[1].first("PMID"), Some("102"));
    }

    #[test]
    fn test_custom_paging() {
        let ids: Vec<String> = (0..7).map(|i| i.to_string()).collect();
        let source = MockEntrez::with_ids(ids).page_body(&medline_block(1));
        let harvester = Harvester::new(&source).with_paging(100, 3);
        harvester.run("HIV", &window()).unwrap();

        assert_eq!(source.fetch_calls(), vec![0, 3, 6]);
    }
}
