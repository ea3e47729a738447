//! In-memory document source backed by XML fixtures.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{LawError, Result};
use crate::source::{search_items, DocumentSource};
use crate::types::{DocumentType, IdParam};
use crate::xml::{parse_xml, AttrValue};

/// Document source serving canned XML responses.
///
/// Documents are registered per type and id, optionally for one identifier
/// parameter only. Searches are keyed by the exact query string; an unknown
/// query yields zero hits. Every request is recorded and can be inspected
/// through [`MemorySource::requests`].
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: HashMap<(DocumentType, Option<IdParam>, String), String>,
    searches: HashMap<(DocumentType, String), String>,
    failing_searches: HashSet<DocumentType>,
    log: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a detail response served for any identifier parameter.
    pub fn with_document(mut self, doc_type: DocumentType, id: &str, xml: &str) -> Self {
        self.documents
            .insert((doc_type, None, id.to_string()), xml.to_string());
        self
    }

    /// Register a detail response served only for `id_param`.
    pub fn with_document_at(
        mut self,
        doc_type: DocumentType,
        id_param: IdParam,
        id: &str,
        xml: &str,
    ) -> Self {
        self.documents
            .insert((doc_type, Some(id_param), id.to_string()), xml.to_string());
        self
    }

    /// Register a search response (the whole XML body) for one query.
    pub fn with_search(mut self, doc_type: DocumentType, query: &str, xml: &str) -> Self {
        self.searches
            .insert((doc_type, query.to_string()), xml.to_string());
        self
    }

    /// Make every search of `doc_type` fail as an upstream error.
    pub fn with_failing_search(mut self, doc_type: DocumentType) -> Self {
        self.failing_searches.insert(doc_type);
        self
    }

    /// Requests served so far, as `fetch TYPE PARAM=ID` or `search TYPE QUERY`.
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn record(&self, entry: String) {
        if let Ok(mut log) = self.log.lock() {
            log.push(entry);
        }
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn fetch(&self, doc_type: DocumentType, id_param: IdParam, id: &str) -> Result<AttrValue> {
        self.record(format!("fetch {} {}={id}", doc_type.prefix(), id_param.as_str()));

        let xml = self
            .documents
            .get(&(doc_type, Some(id_param), id.to_string()))
            .or_else(|| self.documents.get(&(doc_type, None, id.to_string())))
            .ok_or_else(|| LawError::NotFound(format!("{} {id}", doc_type.display_name())))?;
        parse_xml(xml)
    }

    async fn search(&self, doc_type: DocumentType, query: &str) -> Result<Vec<AttrValue>> {
        self.record(format!("search {} {query}", doc_type.prefix()));

        if self.failing_searches.contains(&doc_type) {
            return Err(LawError::HttpStatus {
                status: 503,
                target: format!("{} search", doc_type.display_name()),
            });
        }
        match self.searches.get(&(doc_type, query.to_string())) {
            Some(xml) => Ok(search_items(doc_type, &parse_xml(xml)?)),
            None => Ok(Vec::new()),
        }
    }
}
