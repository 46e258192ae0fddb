//! Scripted [`Entrez`] implementation for tests.

use std::sync::Mutex;

use crate::entrez::{DateWindow, Entrez, EntrezError};

/// An in-memory Entrez service returning predefined responses.
///
/// Records the offset of every fetch call so tests can assert on the
/// pagination sequence.
#[derive(Debug, Default)]
pub struct MockEntrez {
    ids: Vec<String>,
    page_body: String,
    fetch_calls: Mutex<Vec<usize>>,
}

impl MockEntrez {
    /// A mock whose search call returns `ids`.
    pub fn with_ids(ids: Vec<String>) -> Self {
        Self {
            ids,
            ..Self::default()
        }
    }

    /// Set the MEDLINE text every fetch call returns.
    pub fn page_body(mut self, body: &str) -> Self {
        self.page_body = body.to_string();
        self
    }

    /// Offsets of the fetch calls made so far, in order.
    pub fn fetch_calls(&self) -> Vec<usize> {
        self.fetch_calls.lock().unwrap().clone()
    }
}

impl Entrez for MockEntrez {
    fn search(
        &self,
        _term: &str,
        _window: &DateWindow,
        retmax: usize,
    ) -> Result<Vec<String>, EntrezError> {
        Ok(self.ids.iter().take(retmax).cloned().collect())
    }

    fn fetch(
        &self,
        _ids: &[String],
        retstart: usize,
        _retmax: usize,
    ) -> Result<String, EntrezError> {
        self.fetch_calls.lock().unwrap().push(retstart);
        Ok(self.page_body.clone())
    }
}
