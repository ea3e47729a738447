//! law.go.kr Open API client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::LawApiConfig;
use crate::error::Result;
use crate::http::{build_url, create_client, download_text};
use crate::source::{search_items, DocumentSource};
use crate::types::{DocumentType, IdParam};
use crate::xml::{parse_xml, AttrValue};

/// Response format requested from the API.
const RESPONSE_TYPE: &str = "XML";

/// HTTP-backed document source.
///
/// Does not derive `Debug`: the config carries the `OC` user id.
pub struct LawApiClient {
    http: Client,
    config: LawApiConfig,
}

impl LawApiClient {
    pub fn new(config: LawApiConfig) -> Result<Self> {
        let http = create_client(config.timeout)?;
        Ok(Self { http, config })
    }

    /// Build a client from `OPEN_LAW_ID` and the optional overrides.
    pub fn from_env() -> Result<Self> {
        Self::new(LawApiConfig::from_env()?)
    }

    pub fn config(&self) -> &LawApiConfig {
        &self.config
    }

    async fn get_tree(&self, base: &str, params: &[(&str, &str)], what: &str) -> Result<AttrValue> {
        let url = build_url(base, params)?;
        let body = download_text(&self.http, &url, what).await?;
        parse_xml(&body)
    }
}

#[async_trait]
impl DocumentSource for LawApiClient {
    async fn fetch(&self, doc_type: DocumentType, id_param: IdParam, id: &str) -> Result<AttrValue> {
        debug!(api_target = doc_type.target(), param = id_param.as_str(), id, "Fetching document");
        let params = [
            ("OC", self.config.user_id.as_str()),
            ("target", doc_type.target()),
            ("type", RESPONSE_TYPE),
            (id_param.as_str(), id),
        ];
        let what = format!("{} {id}", doc_type.display_name());
        self.get_tree(&self.config.service_url(), &params, &what).await
    }

    async fn search(&self, doc_type: DocumentType, query: &str) -> Result<Vec<AttrValue>> {
        debug!(api_target = doc_type.target(), query, "Searching");
        let params = [
            ("OC", self.config.user_id.as_str()),
            ("target", doc_type.target()),
            ("type", RESPONSE_TYPE),
            ("query", query),
        ];
        let what = format!("{} search", doc_type.display_name());
        let response = self.get_tree(&self.config.search_url(), &params, &what).await?;
        let hits = search_items(doc_type, &response);
        debug!(api_target = doc_type.target(), query, hits = hits.len(), "Search finished");
        Ok(hits)
    }
}
