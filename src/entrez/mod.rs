//! Entrez E-utilities access.
//!
//! The remote call surface is the [`Entrez`] trait: one search call that
//! resolves a term and date window to an identifier list, and one fetch call
//! that retrieves a page of MEDLINE text for those identifiers. The
//! pagination logic in [`Harvester`] is written against the trait, so it is
//! testable with the scripted [`MockEntrez`] implementation and no network.

mod eutils;
mod harvest;
pub mod mock;

pub use eutils::EUtilsClient;
pub use harvest::{Harvester, HarvestError, DEFAULT_ID_CAP, DEFAULT_PAGE_SIZE};
pub use mock::MockEntrez;

use thiserror::Error;

/// Errors from the remote service or the transport underneath it
#[derive(Debug, Error)]
pub enum EntrezError {
    /// Network or HTTP error
    #[error("network error: {0}")]
    Network(String),

    /// Non-success response from the API
    #[error("API error: {0}")]
    Api(String),

    /// Malformed response payload
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for EntrezError {
    fn from(err: reqwest::Error) -> Self {
        EntrezError::Network(err.to_string())
    }
}

impl From<quick_xml::DeError> for EntrezError {
    fn from(err: quick_xml::DeError) -> Self {
        EntrezError::Parse(format!("XML: {}", err))
    }
}

/// Boundary validation errors for harvest inputs
#[derive(Debug, Error, PartialEq)]
pub enum RangeError {
    #[error("a key term must be supplied")]
    EmptyTerm,

    #[error("end date must be after or on start date")]
    EndBeforeStart,
}

/// A validated publication-date window in `YYYY/MM/DD` form.
///
/// Both bounds come from [`crate::utils::normalize_date`], so plain string
/// comparison orders them correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    mindate: String,
    maxdate: String,
}

impl DateWindow {
    /// Build a window, rejecting one whose end precedes its start.
    pub fn new(
        mindate: impl Into<String>,
        maxdate: impl Into<String>,
    ) -> Result<Self, RangeError> {
        let mindate = mindate.into();
        let maxdate = maxdate.into();
        if maxdate < mindate {
            return Err(RangeError::EndBeforeStart);
        }
        Ok(Self { mindate, maxdate })
    }

    pub fn mindate(&self) -> &str {
        &self.mindate
    }

    pub fn maxdate(&self) -> &str {
        &self.maxdate
    }
}

/// The remote bibliographic service, reduced to its two calls.
pub trait Entrez {
    /// Resolve `term` within `window` to an ordered list of record
    /// identifiers, up to `retmax` of them.
    fn search(
        &self,
        term: &str,
        window: &DateWindow,
        retmax: usize,
    ) -> Result<Vec<String>, EntrezError>;

    /// Fetch one page of MEDLINE-formatted text for `ids`, starting at
    /// `retstart` and returning at most `retmax` records.
    fn fetch(&self, ids: &[String], retstart: usize, retmax: usize)
        -> Result<String, EntrezError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_window_accepts_ordered_bounds() {
        let window = DateWindow::new("2020/01/01", "2020/03/01").unwrap();
        assert_eq!(window.mindate(), "2020/01/01");
        assert_eq!(window.maxdate(), "2020/03/01");
    }

    #[test]
    fn test_date_window_accepts_equal_bounds() {
        assert!(DateWindow::new("2020/01/01", "2020/01/01").is_ok());
    }

    #[test]
    fn test_date_window_rejects_inverted_bounds() {
        assert_eq!(
            DateWindow::new("2020/03/01", "2020/01/01"),
            Err(RangeError::EndBeforeStart)
        );
    }
}
