//! Blocking HTTP client for the NCBI E-utilities API.

use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;

use crate::config::EntrezConfig;
use crate::entrez::{DateWindow, Entrez, EntrezError};

/// E-utilities client issuing esearch and efetch calls over HTTP.
///
/// The base URL is configurable so tests can point it at a local server.
#[derive(Debug, Clone)]
pub struct EUtilsClient {
    http: reqwest::blocking::Client,
    base_url: String,
    email: String,
    tool: String,
}

impl EUtilsClient {
    /// Create a client from configuration.
    pub fn new(config: &EntrezConfig) -> Result<Self, EntrezError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            tool: config.tool.clone(),
        })
    }

    /// Build the esearch query string.
    fn build_search_url(&self, term: &str, window: &DateWindow, retmax: usize) -> String {
        let retmax = retmax.to_string();
        let params: [(&str, &str); 9] = [
            ("db", "pubmed"),
            ("term", term),
            ("retmax", &retmax),
            ("retmode", "xml"),
            ("datetype", "edat"),
            ("mindate", window.mindate()),
            ("maxdate", window.maxdate()),
            ("email", &self.email),
            ("tool", &self.tool),
        ];

        let params = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}/esearch.fcgi?{}", self.base_url, params)
    }

    /// Parse the esearch response XML into the identifier list.
    fn parse_search_response(xml: &str) -> Result<Vec<String>, EntrezError> {
        #[derive(Debug, Deserialize)]
        #[allow(non_snake_case)]
        struct ESearchResult {
            IdList: Option<IdList>,
        }

        #[derive(Debug, Deserialize)]
        struct IdList {
            #[serde(rename = "Id", default)]
            ids: Vec<String>,
        }

        let result: ESearchResult = from_str(xml)
            .map_err(|e| EntrezError::Parse(format!("esearch XML: {}", e)))?;

        Ok(result.IdList.map(|list| list.ids).unwrap_or_default())
    }
}

impl Entrez for EUtilsClient {
    fn search(
        &self,
        term: &str,
        window: &DateWindow,
        retmax: usize,
    ) -> Result<Vec<String>, EntrezError> {
        let url = self.build_search_url(term, window, retmax);
        tracing::debug!(%term, mindate = window.mindate(), maxdate = window.maxdate(), "esearch");

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| EntrezError::Network(format!("esearch request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(EntrezError::Api(format!(
                "esearch returned status {}",
                response.status()
            )));
        }

        let xml = response
            .text()
            .map_err(|e| EntrezError::Network(format!("failed to read esearch body: {}", e)))?;

        Self::parse_search_response(&xml)
    }

    fn fetch(
        &self,
        ids: &[String],
        retstart: usize,
        retmax: usize,
    ) -> Result<String, EntrezError> {
        // The id list can run to tens of thousands of entries, far past any
        // URL length limit, so efetch goes over POST.
        let url = format!("{}/efetch.fcgi", self.base_url);
        let form = [
            ("db", "pubmed".to_string()),
            ("id", ids.join(",")),
            ("rettype", "medline".to_string()),
            ("retmode", "text".to_string()),
            ("retstart", retstart.to_string()),
            ("retmax", retmax.to_string()),
            ("email", self.email.clone()),
            ("tool", self.tool.clone()),
        ];

        tracing::debug!(retstart, retmax, total_ids = ids.len(), "efetch");

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .map_err(|e| EntrezError::Network(format!("efetch request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(EntrezError::Api(format!(
                "efetch returned status {}",
                response.status()
            )));
        }

        response
            .text()
            .map_err(|e| EntrezError::Network(format!("failed to read efetch body: {}", e)))
    }
}
