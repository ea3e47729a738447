//! Document sources.
//!
//! A [`DocumentSource`] turns `{document type, identifier}` into an attribute
//! tree and a search query into a list of hit trees. Everything above this
//! layer works on [`AttrValue`]s and never sees HTTP or raw XML.

mod api;
mod memory;

pub use api::LawApiClient;
pub use memory::MemorySource;

use async_trait::async_trait;

use crate::document::Document;
use crate::error::{LawError, Result};
use crate::types::{
    AdminRuleHit, DocumentType, IdParam, InterpretationHit, LegalTermHit, PrecedentHit, StatuteHit,
};
use crate::xml::{one_or_many, AttrValue};

/// Trait for document sources, enabling offline use and tests.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the detail tree of one document.
    async fn fetch(&self, doc_type: DocumentType, id_param: IdParam, id: &str) -> Result<AttrValue>;

    /// Search documents of one type; returns one tree per hit.
    async fn search(&self, doc_type: DocumentType, query: &str) -> Result<Vec<AttrValue>>;
}

/// Extract the hit items of a search response.
///
/// A response without the expected root or items means zero hits.
pub fn search_items(doc_type: DocumentType, response: &AttrValue) -> Vec<AttrValue> {
    let (root, item) = doc_type.search_elements();
    let items = response.get(root).and_then(|r| r.get(item));
    one_or_many(items)
        .into_iter()
        .filter(|hit| hit.is_map())
        .cloned()
        .collect()
}

/// Fetch a document with the type's primary identifier parameter and convert it.
pub async fn fetch_document<S>(source: &S, doc_type: DocumentType, id: &str) -> Result<Document>
where
    S: DocumentSource + ?Sized,
{
    fetch_document_with(source, doc_type, doc_type.id_param(), id).await
}

/// Fetch a document with an explicit identifier parameter and convert it.
pub async fn fetch_document_with<S>(
    source: &S,
    doc_type: DocumentType,
    id_param: IdParam,
    id: &str,
) -> Result<Document>
where
    S: DocumentSource + ?Sized,
{
    let tree = source.fetch(doc_type, id_param, id).await?;
    Document::from_tree(doc_type, &tree).map_err(|e| match e {
        LawError::MissingElement { .. } => {
            LawError::NotFound(format!("{} {id}", doc_type.display_name()))
        }
        other => other,
    })
}

pub async fn search_statutes<S>(source: &S, query: &str) -> Result<Vec<StatuteHit>>
where
    S: DocumentSource + ?Sized,
{
    let hits = source.search(DocumentType::Statute, query).await?;
    Ok(hits.iter().map(StatuteHit::from_attrs).collect())
}

pub async fn search_precedents<S>(source: &S, query: &str) -> Result<Vec<PrecedentHit>>
where
    S: DocumentSource + ?Sized,
{
    let hits = source.search(DocumentType::Precedent, query).await?;
    Ok(hits.iter().map(PrecedentHit::from_attrs).collect())
}

pub async fn search_admin_rules<S>(source: &S, query: &str) -> Result<Vec<AdminRuleHit>>
where
    S: DocumentSource + ?Sized,
{
    let hits = source.search(DocumentType::AdministrativeRule, query).await?;
    Ok(hits.iter().map(AdminRuleHit::from_attrs).collect())
}

pub async fn search_legal_terms<S>(source: &S, query: &str) -> Result<Vec<LegalTermHit>>
where
    S: DocumentSource + ?Sized,
{
    let hits = source.search(DocumentType::LegalTerm, query).await?;
    Ok(hits.iter().map(LegalTermHit::from_attrs).collect())
}

pub async fn search_interpretations<S>(source: &S, query: &str) -> Result<Vec<InterpretationHit>>
where
    S: DocumentSource + ?Sized,
{
    let hits = source.search(DocumentType::Interpretation, query).await?;
    Ok(hits.iter().map(InterpretationHit::from_attrs).collect())
}
