//! Text-returning operations.
//!
//! Every operation answers with human-readable text. Typed errors from the
//! components become `Error: ...` lines here and nowhere else; "not found"
//! outcomes are ordinary answers.

use tracing::{debug, info};

use crate::delegation::resolve_delegation;
use crate::document::Document;
use crate::error::{LawError, Result};
use crate::lookup::{load_statute, read_statute_article, ArticleOutcome};
use crate::query::{interpret_query, parse_article_query, select_statute, ArticleQuery, QueryIntent};
use crate::references::{resolve_references, StatuteContext};
use crate::render::{
    render_attachments, render_document, render_history, render_interpretation_hits,
    render_old_new_comparison, render_statute_hits, render_table_of_contents, render_term_hits,
};
use crate::search::integrated_search;
use crate::source::{
    fetch_document, fetch_document_with, search_interpretations, search_legal_terms,
    search_statutes, DocumentSource,
};
use crate::types::{article_label, strip_type_prefix, DocumentType, TypedId};

/// Law lookup operations over a document source.
pub struct LawService<S> {
    source: S,
}

impl<S: DocumentSource> LawService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Answer a free-text query: an article, a table of contents, or an
    /// integrated search.
    pub async fn search(&self, query: &str) -> String {
        info!(query, "Search");
        match interpret_query(query) {
            QueryIntent::Article(parsed) => text_or_error(self.statute_lookup(&parsed).await),
            QueryIntent::Search { query } => integrated_search(&self.source, &query).await.render(&query),
        }
    }

    /// Look up a statute by name, with an optional article: the article text
    /// when one is given, otherwise its table of contents.
    pub async fn lookup(&self, query: &str) -> String {
        info!(query, "Statute lookup");
        text_or_error(self.statute_lookup(&parse_article_query(query)).await)
    }

    async fn statute_lookup(&self, parsed: &ArticleQuery) -> Result<String> {
        let hits = search_statutes(&self.source, &parsed.statute).await?;
        let Some(best) = select_statute(&hits, &parsed.statute) else {
            return Ok(format!("No laws found for query: '{}'", parsed.statute));
        };
        if best.id.is_empty() {
            return Err(LawError::missing("법령일련번호", best.name.clone()));
        }
        debug!(name = %best.name, id = %best.id, "Selected statute");

        let mut statute = load_statute(&self.source, &best.id).await?;
        if statute.name.is_empty() {
            statute.name.clone_from(&best.name);
        }

        Ok(match &parsed.article {
            Some(number) => ArticleOutcome::from_statute(&statute, number).render(),
            None => render_table_of_contents(&statute.name, &statute.enforcement_date, &statute.articles),
        })
    }

    /// Read a document by typed identifier (`type:id`), appending resolved
    /// references when any resolved.
    pub async fn read_resource(&self, resource_id: &str) -> String {
        info!(resource_id, "Read resource");
        text_or_error(self.read_resource_inner(resource_id).await)
    }

    async fn read_resource_inner(&self, resource_id: &str) -> Result<String> {
        let typed: TypedId = resource_id.parse()?;
        let document = self.fetch_with_fallback(&typed).await?;
        debug!(doc_type = %document.doc_type(), title = document.title(), "Fetched document");
        let content = render_document(&document);

        let context = match &document {
            Document::Statute(statute) => Some(StatuteContext {
                name: &statute.name,
                id: None,
            }),
            _ => None,
        };
        let references = resolve_references(&self.source, &content, context).await;
        if references.is_empty() {
            Ok(content)
        } else {
            Ok(format!("{content}\n\n{references}"))
        }
    }

    /// Fetch a document; precedents fall back to the alternate identifier
    /// parameter and then to the constitutional-decision endpoint.
    async fn fetch_with_fallback(&self, typed: &TypedId) -> Result<Document> {
        let primary = fetch_document(&self.source, typed.doc_type, &typed.id).await;
        if typed.doc_type != DocumentType::Precedent {
            return primary;
        }
        let primary_err = match primary {
            Ok(document) => return Ok(document),
            Err(e) => e,
        };
        debug!(id = %typed.id, error = %primary_err, "Precedent fetch failed, trying fallbacks");

        if let Some(param) = typed.doc_type.alternate_id_param() {
            match fetch_document_with(&self.source, typed.doc_type, param, &typed.id).await {
                Ok(document) => return Ok(document),
                Err(e) => debug!(id = %typed.id, param = param.as_str(), error = %e, "Fallback failed"),
            }
        }
        match fetch_document(&self.source, DocumentType::ConstitutionalDecision, &typed.id).await {
            Ok(document) => Ok(document),
            Err(e) => {
                debug!(id = %typed.id, error = %e, "Constitutional decision fallback failed");
                Err(primary_err)
            }
        }
    }

    /// Read one article of a statute.
    pub async fn read_article(&self, law_id: &str, article_no: &str) -> String {
        info!(law_id, article_no, "Read article");
        let result = read_statute_article(&self.source, strip_type_prefix(law_id), article_no).await;
        text_or_error(result.map(|outcome| outcome.render()))
    }

    /// Render an article together with the articles it cites and the decree
    /// articles implementing it.
    pub async fn explore_chain(&self, query: &str) -> String {
        info!(query, "Explore legal chain");
        text_or_error(self.explore_chain_inner(query).await)
    }

    async fn explore_chain_inner(&self, query: &str) -> Result<String> {
        let parsed = parse_article_query(query);
        let Some(article_no) = parsed.article.as_deref() else {
            return Ok("Please provide a specific article, e.g., '고등교육법 제20조' or 'Civil Act Article 5'.".into());
        };

        let hits = search_statutes(&self.source, &parsed.statute).await?;
        let Some(target) = hits.first() else {
            return Ok(format!("Could not find law: {}", parsed.statute));
        };

        let outcome = read_statute_article(&self.source, &target.id, article_no).await?;
        let main_text = outcome.render();
        if !outcome.is_found() {
            return Ok(main_text);
        }

        let mut output = vec![
            format!("# Legal Chain Analysis: {} {}\n", target.name, article_label(article_no)),
            "## 1. Main Provision".to_string(),
            main_text.clone(),
        ];

        let context = StatuteContext {
            name: &target.name,
            id: Some(&target.id),
        };
        let references = resolve_references(&self.source, &main_text, Some(context)).await;
        if !references.is_empty() {
            output.push(format!("\n{references}"));
        }

        let delegation = resolve_delegation(&self.source, &main_text, &target.name, article_no)
            .await
            .render();
        if !delegation.is_empty() {
            output.push(format!("\n{delegation}"));
        }
        Ok(output.join("\n"))
    }

    /// Articles of a statute containing every whitespace-separated keyword.
    pub async fn search_articles(&self, law_id: &str, keywords: &str) -> String {
        info!(law_id, keywords, "Search articles");
        text_or_error(self.search_articles_inner(strip_type_prefix(law_id), keywords).await)
    }

    async fn search_articles_inner(&self, law_id: &str, keywords: &str) -> Result<String> {
        let statute = load_statute(&self.source, law_id).await?;
        if statute.articles.is_empty() {
            return Ok(format!("# {}\n\n(No articles found to search)", statute.name));
        }

        let terms: Vec<&str> = keywords.split_whitespace().collect();
        let matches: Vec<_> = statute
            .articles
            .iter()
            .filter(|article| {
                let text = article.full_text();
                terms.iter().all(|term| text.contains(term))
            })
            .collect();

        if matches.is_empty() {
            return Ok(format!(
                "# {}\n\nNo articles found matching keywords: '{keywords}'",
                statute.name
            ));
        }

        let mut lines = vec![
            format!("# {} - Search Results for '{keywords}'", statute.name),
            String::new(),
            format!("Found {} matching articles.", matches.len()),
            String::new(),
        ];
        for article in matches {
            lines.push(format!("## {}", article.header()));
            lines.push(article.full_text());
            lines.push(String::new());
        }
        Ok(lines.join("\n"))
    }

    pub async fn search_terms(&self, query: &str) -> String {
        info!(query, "Search legal terms");
        text_or_error(
            search_legal_terms(&self.source, query)
                .await
                .map(|hits| render_term_hits(query, &hits)),
        )
    }

    pub async fn search_interpretations(&self, query: &str) -> String {
        info!(query, "Search statutory interpretations");
        text_or_error(
            search_interpretations(&self.source, query)
                .await
                .map(|hits| render_interpretation_hits(query, &hits)),
        )
    }

    /// Attached tables (별표) and forms (서식) of a statute.
    pub async fn attachments(&self, law_id: &str) -> String {
        info!(law_id, "Statute attachments");
        let statute = load_statute(&self.source, strip_type_prefix(law_id)).await;
        text_or_error(statute.map(|s| render_attachments(&s)))
    }

    /// Revision information of a statute.
    pub async fn law_history(&self, law_id: &str) -> String {
        info!(law_id, "Law history");
        let law_id = strip_type_prefix(law_id);
        let statute = load_statute(&self.source, law_id).await;
        text_or_error(statute.map(|s| render_history(&s, law_id)))
    }

    /// Latest amendment of a statute and a link to its old/new article
    /// comparison table (신구조문대비표).
    pub async fn old_new_comparison(&self, law_id: &str) -> String {
        info!(law_id, "Old/new comparison");
        let law_id = strip_type_prefix(law_id);
        let statute = load_statute(&self.source, law_id).await;
        text_or_error(statute.map(|s| render_old_new_comparison(&s, law_id)))
    }

    /// Plain statute search: one `ID | Name | Date` line per hit.
    pub async fn search_statutes(&self, query: &str) -> String {
        info!(query, "Search statutes");
        text_or_error(
            search_statutes(&self.source, query)
                .await
                .map(|hits| render_statute_hits(&hits)),
        )
    }
}

fn text_or_error(result: Result<String>) -> String {
    result.unwrap_or_else(|e| {
        debug!(error = %e, client_error = e.is_client_error(), "Operation failed");
        format!("Error: {e}")
    })
}
