//! Locality catalog: the Israeli locality dataset from data.gov.il,
//! deduplicated, normalized and sorted for the picker.

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;

use crate::{error::Error, model::Locality, text::collapse_whitespace};

const DATASTORE_URL: &str = "https://data.gov.il/api/3/action/datastore_search";
const LOCALITY_RESOURCE_ID: &str = "8f714b6f-c35c-4b40-a0e7-547b675eee0e";
const PAGE_LIMIT: u32 = 1500;

/// Client for the government locality dataset.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    base_url: String,
    http: Client,
}

impl CityCatalog {
    pub fn new() -> Self {
        Self::with_base_url(DATASTORE_URL)
    }

    /// Point the catalog at a different endpoint; used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    /// Fetch the full locality list: one entry per canonical (English) name,
    /// both names whitespace-normalized, sorted ascending by canonical name.
    ///
    /// Cancellation is the caller's concern: abort the task driving this
    /// future and no result (and no error) is ever reported.
    pub async fn load(&self) -> Result<Vec<Locality>, Error> {
        tracing::debug!(url = %self.base_url, "loading locality catalog");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("resource_id", LOCALITY_RESOURCE_ID),
                ("limit", &PAGE_LIMIT.to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::Status { status: status.as_u16() });
        }

        let body = res.text().await?;
        let parsed: DatastoreResponse = serde_json::from_str(&body)
            .map_err(|err| Error::Parse(format!("locality dataset: {err}")))?;

        let localities = build_catalog(parsed.result.records);
        tracing::debug!(count = localities.len(), "locality catalog loaded");
        Ok(localities)
    }
}

impl Default for CityCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct DatastoreResponse {
    result: DatastoreResult,
}

#[derive(Debug, Deserialize)]
struct DatastoreResult {
    records: Vec<LocalityRecord>,
}

/// Raw record shape of the datastore; never leaks past `build_catalog`.
#[derive(Debug, Deserialize)]
struct LocalityRecord {
    city_name_he: String,
    city_name_en: String,
}

/// Deduplicate by canonical name (last record wins), normalize both names,
/// and sort ascending by canonical name, case-insensitively.
fn build_catalog(records: Vec<LocalityRecord>) -> Vec<Locality> {
    let mut by_canonical: HashMap<String, Locality> = HashMap::new();

    for record in records {
        let locality = Locality {
            native_name: collapse_whitespace(&record.city_name_he),
            canonical_name: collapse_whitespace(&record.city_name_en),
        };
        by_canonical.insert(locality.canonical_name.clone(), locality);
    }

    let mut localities: Vec<Locality> = by_canonical.into_values().collect();
    localities.sort_by(|a, b| {
        a.canonical_name.to_lowercase().cmp(&b.canonical_name.to_lowercase())
    });
    localities
}
