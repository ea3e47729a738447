//! Statute to enforcement decree delegation links.
//!
//! An Act article that leaves details to a presidential decree (or another
//! subordinate regulation) is implemented by decree articles citing it back
//! as `법 제N조`. Only one hop is followed: Act to decree.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::config::{DELEGATION_MARKERS, ENFORCEMENT_DECREE_SUFFIX};
use crate::lookup::load_statute;
use crate::query::names_match;
use crate::source::{search_statutes, DocumentSource};
use crate::types::{article_label, Article, Reference};

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ACT_BACK_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^가-힣])법\s*제\s*(\d+)\s*조(?:\s*의\s*(\d+))?").expect("valid regex")
});

/// Whether the text delegates details to a subordinate regulation.
pub fn has_delegation_marker(text: &str) -> bool {
    DELEGATION_MARKERS.iter().any(|marker| text.contains(marker))
}

/// The delegation made by Act article `article_no`, spanning the first
/// marker in `text` and targeting the statute's enforcement decree.
pub fn find_delegation(text: &str, statute_name: &str, article_no: &str) -> Option<Reference> {
    let (start, marker) = DELEGATION_MARKERS
        .iter()
        .filter_map(|marker| text.find(marker).map(|start| (start, marker)))
        .min_by_key(|(start, _)| *start)?;
    Some(Reference::delegation(
        start..start + marker.len(),
        format!("{statute_name}{ENFORCEMENT_DECREE_SUFFIX}"),
        article_no,
    ))
}

/// Whether the text cites Act article `article_no` back (`법 제N조`).
///
/// The match is exact: `법 제20조의2` does not cite article 20, and
/// `건축법 제20조` is a citation of another statute.
///
/// # Examples
/// ```
/// use korean_law::delegation::cites_act_article;
///
/// assert!(cites_act_article("법 제20조제1항에 따른", "20"));
/// assert!(!cites_act_article("법 제200조에 따른", "20"));
/// assert!(!cites_act_article("법 제20조의2에 따른", "20"));
/// assert!(cites_act_article("법 제20조의2에 따른", "20-2"));
/// ```
pub fn cites_act_article(text: &str, article_no: &str) -> bool {
    ACT_BACK_REFERENCE.captures_iter(text).any(|caps| {
        let main = caps.get(1).map_or("", |m| m.as_str());
        let cited = match caps.get(2) {
            Some(branch) => format!("{main}-{}", branch.as_str()),
            None => main.to_string(),
        };
        cited == article_no
    })
}

/// Outcome of looking for the decree articles implementing a delegation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegationOutcome {
    /// The text carries no delegation marker.
    NotApplicable,
    /// No enforcement decree could be found or retrieved.
    DecreeNotFound,
    /// The decree exists but none of its articles cites the Act article.
    NoMatchingArticle { decree_name: String, article_no: String },
    /// Decree articles citing the Act article, in decree order.
    Matches { decree_name: String, articles: Vec<Article> },
}

impl DelegationOutcome {
    /// Render the outcome; empty when there is nothing to report.
    pub fn render(&self) -> String {
        match self {
            Self::NotApplicable | Self::DecreeNotFound => String::new(),
            Self::NoMatchingArticle {
                decree_name,
                article_no,
            } => format!(
                "## Delegated Legislation ({decree_name})\n(No specific article found referencing Act {}.)",
                article_label(article_no)
            ),
            Self::Matches {
                decree_name,
                articles,
            } => {
                let mut lines = vec![format!("## Delegated Legislation ({decree_name})")];
                for article in articles {
                    lines.push(format!("### {}", article.header()));
                    lines.push(article.full_text());
                }
                lines.join("\n")
            }
        }
    }
}

/// Find the decree articles implementing a delegation in `text`.
///
/// # Arguments
/// * `statute_name` - Name of the Act the text belongs to
/// * `article_no` - Number of the Act article (`N` or `N-M`)
pub async fn resolve_delegation<S>(
    source: &S,
    text: &str,
    statute_name: &str,
    article_no: &str,
) -> DelegationOutcome
where
    S: DocumentSource + ?Sized,
{
    let Some(delegation) = find_delegation(text, statute_name, article_no) else {
        return DelegationOutcome::NotApplicable;
    };

    let decree_query = delegation.statute_name.unwrap_or_default();
    debug!(
        statute = statute_name,
        article = article_no,
        decree = %decree_query,
        marker = &text[delegation.span],
        "Resolving delegation"
    );

    let hits = match search_statutes(source, &decree_query).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!(error = %e, decree = %decree_query, "Decree search failed");
            return DelegationOutcome::DecreeNotFound;
        }
    };
    let Some(decree_hit) = hits
        .iter()
        .find(|hit| names_match(&hit.name, &decree_query))
        .or_else(|| hits.first())
    else {
        return DelegationOutcome::DecreeNotFound;
    };

    let decree = match load_statute(source, &decree_hit.id).await {
        Ok(decree) => decree,
        Err(e) => {
            warn!(error = %e, decree_id = %decree_hit.id, "Decree retrieval failed");
            return DelegationOutcome::DecreeNotFound;
        }
    };
    let decree_name = if decree.name.is_empty() {
        decree_query
    } else {
        decree.name
    };

    let articles: Vec<Article> = decree
        .articles
        .into_iter()
        .filter(|article| cites_act_article(&article.full_text(), article_no))
        .collect();

    if articles.is_empty() {
        DelegationOutcome::NoMatchingArticle {
            decree_name,
            article_no: article_no.to_string(),
        }
    } else {
        DelegationOutcome::Matches {
            decree_name,
            articles,
        }
    }
}
