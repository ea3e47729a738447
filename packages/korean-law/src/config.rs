//! Configuration constants, environment configuration and validation.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{LawError, Result};

/// Base URL of the national law information center Open API.
pub const LAW_API_BASE_URL: &str = "https://www.law.go.kr";

/// Path of the detail (document fetch) endpoint.
pub const SERVICE_PATH: &str = "/DRF/lawService.do";

/// Path of the search endpoint.
pub const SEARCH_PATH: &str = "/DRF/lawSearch.do";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the Open API user id (`OC` parameter).
pub const ENV_USER_ID: &str = "OPEN_LAW_ID";

/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "LAW_API_BASE_URL";

/// Environment variable overriding the HTTP timeout.
pub const ENV_TIMEOUT_SECS: &str = "LAW_API_TIMEOUT_SECS";

/// Maximum number of references resolved for one piece of text,
/// internal and external combined.
pub const MAX_RESOLVED_REFERENCES: usize = 5;

/// External candidate count above which the output notes truncation.
pub const EXTERNAL_TRUNCATION_THRESHOLD: usize = 3;

/// Number of articles listed in a table of contents.
pub const TOC_ARTICLE_LIMIT: usize = 30;

/// Number of results shown per document type in integrated search.
pub const INTEGRATED_SEARCH_TOP_N: usize = 3;

/// Suffix appended to a statute name to guess its enforcement decree.
pub const ENFORCEMENT_DECREE_SUFFIX: &str = " 시행령";

/// Phrases that delegate details to a subordinate regulation.
pub const DELEGATION_MARKERS: &[&str] = &[
    "대통령령",
    "총리령",
    "부령",
    "국회규칙",
    "대법원규칙",
    "헌법재판소규칙",
    "중앙선거관리위원회규칙",
];

/// English names of major statutes and their native names.
///
/// Matched case-insensitively before query classification.
pub const ENGLISH_LAW_NAMES: &[(&str, &str)] = &[
    ("administrative procedures act", "행정절차법"),
    ("labor standards act", "근로기준법"),
    ("commercial act", "상법"),
    ("criminal act", "형법"),
    ("civil act", "민법"),
    ("constitution", "대한민국헌법"),
    ("school violence", "학교폭력"),
];

/// Maximum characters of amendment text shown in a law history.
pub const HISTORY_AMENDMENT_CHARS: usize = 500;

/// Maximum characters of amendment reasons shown in a law history.
pub const HISTORY_REASON_CHARS: usize = 1000;

/// Maximum characters of amendment text shown in an old/new comparison.
pub const COMPARISON_AMENDMENT_CHARS: usize = 2000;

/// Document identifier pattern: digits, letters, hyphens.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DOCUMENT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z][0-9A-Za-z-]*$").expect("valid regex"));

/// Connection settings for the law.go.kr Open API.
#[derive(Debug, Clone)]
pub struct LawApiConfig {
    pub base_url: String,
    pub user_id: String,
    pub timeout: Duration,
}

impl LawApiConfig {
    /// Read the configuration from the environment.
    ///
    /// `OPEN_LAW_ID` is required; base URL and timeout fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let user_id = std::env::var(ENV_USER_ID)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| LawError::Config(format!("{ENV_USER_ID} environment variable is not set")))?;

        let base_url = std::env::var(ENV_BASE_URL).unwrap_or_else(|_| LAW_API_BASE_URL.into());

        let timeout_secs: u64 = std::env::var(ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(HTTP_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            user_id,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            base_url: LAW_API_BASE_URL.into(),
            user_id: user_id.into(),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the detail endpoint.
    #[must_use]
    pub fn service_url(&self) -> String {
        format!("{}{SERVICE_PATH}", self.base_url.trim_end_matches('/'))
    }

    /// Full URL of the search endpoint.
    #[must_use]
    pub fn search_url(&self) -> String {
        format!("{}{SEARCH_PATH}", self.base_url.trim_end_matches('/'))
    }
}

/// Validate a raw document identifier (the `id` half of a typed identifier).
///
/// # Examples
/// ```
/// use korean_law::config::validate_document_id;
///
/// assert!(validate_document_id("248613").is_ok());
/// assert!(validate_document_id("").is_err());
/// assert!(validate_document_id("12 34").is_err());
/// ```
pub fn validate_document_id(id: &str) -> Result<()> {
    if DOCUMENT_ID_PATTERN.is_match(id) {
        Ok(())
    } else {
        Err(LawError::InvalidIdFormat(id.to_string()))
    }
}

/// Public law.go.kr page for a statute, used as a pointer in rendered output.
pub fn law_page_url(law_id: &str) -> String {
    format!("{LAW_API_BASE_URL}/lsInfoP.do?lsiSeq={law_id}")
}

/// Public old/new article comparison table (신구조문대비표) of a statute.
pub fn comparison_page_url(law_id: &str) -> String {
    format!("{LAW_API_BASE_URL}/lsScLsComp.do?lsiSeq={law_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_document_id_valid() {
        assert!(validate_document_id("248613").is_ok());
        assert!(validate_document_id("2010Da102991").is_ok());
        assert!(validate_document_id("123-4").is_ok());
    }

    #[test]
    fn test_validate_document_id_invalid() {
        assert!(validate_document_id("").is_err());
        assert!(validate_document_id("-12").is_err());
        assert!(validate_document_id("12;drop").is_err());
        assert!(validate_document_id("statute:12").is_err());
    }

    #[test]
    fn test_config_urls() {
        let config = LawApiConfig::new("tester").with_base_url("http://localhost:8080/");
        assert_eq!(config.service_url(), "http://localhost:8080/DRF/lawService.do");
        assert_eq!(config.search_url(), "http://localhost:8080/DRF/lawSearch.do");
    }

    #[test]
    fn test_config_defaults() {
        let config = LawApiConfig::new("tester");
        assert_eq!(config.base_url, LAW_API_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(HTTP_TIMEOUT_SECS));
    }

    #[test]
    fn test_law_page_url() {
        assert_eq!(
            law_page_url("248613"),
            "https://www.law.go.kr/lsInfoP.do?lsiSeq=248613"
        );
        assert_eq!(
            comparison_page_url("248613"),
            "https://www.law.go.kr/lsScLsComp.do?lsiSeq=248613"
        );
    }
}
