//! Exact-article resolution within one statute.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::document::{Document, StatuteDocument};
use crate::error::{LawError, Result};
use crate::render::render_article;
use crate::source::{fetch_document, DocumentSource};
use crate::types::{Article, DocumentType};

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARTICLE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:제\s*)?(\d+)\s*(?:조)?\s*(?:(?:의|-)\s*(\d+))?\s*$").expect("valid regex")
});

/// Normalize a user-supplied article number to `N` or `N-M`.
///
/// Accepts `20`, `20-2`, `20의2`, `제20조` and `제20조의2`. Anything else is
/// returned trimmed and unchanged (it will simply not match).
///
/// # Examples
/// ```
/// use korean_law::lookup::normalize_article_number;
///
/// assert_eq!(normalize_article_number("제20조의2"), "20-2");
/// assert_eq!(normalize_article_number(" 103 "), "103");
/// ```
pub fn normalize_article_number(raw: &str) -> String {
    let raw = raw.trim();
    match ARTICLE_NUMBER.captures(raw) {
        Some(caps) => {
            let main = caps.get(1).map_or("", |m| m.as_str());
            match caps.get(2) {
                Some(branch) => format!("{main}-{}", branch.as_str()),
                None => main.to_string(),
            }
        }
        None => raw.to_string(),
    }
}

/// Find an article by number, preferring provisions over headings.
pub fn find_article<'a>(articles: &'a [Article], number: &str) -> Option<&'a Article> {
    articles
        .iter()
        .find(|a| a.number == number && a.is_content())
        .or_else(|| articles.iter().find(|a| a.number == number))
}

/// Result of looking up one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    Found { law_name: String, article: Article },
    /// A normal negative result, not an error.
    NotFound { law_name: String, number: String },
}

impl ArticleOutcome {
    /// Pick the article from an already segmented statute.
    pub fn from_statute(statute: &StatuteDocument, number: &str) -> Self {
        match find_article(&statute.articles, number) {
            Some(article) => Self::Found {
                law_name: statute.name.clone(),
                article: article.clone(),
            },
            None => Self::NotFound {
                law_name: statute.name.clone(),
                number: number.to_string(),
            },
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn render(&self) -> String {
        match self {
            Self::Found { law_name, article } => render_article(law_name, article),
            Self::NotFound { law_name, number } => {
                format!("Article {number} not found in {law_name}.")
            }
        }
    }
}

/// Fetch and segment a statute by its serial id.
pub async fn load_statute<S>(source: &S, law_id: &str) -> Result<StatuteDocument>
where
    S: DocumentSource + ?Sized,
{
    match fetch_document(source, DocumentType::Statute, law_id).await? {
        Document::Statute(statute) => {
            debug!(
                law_id,
                name = %statute.name,
                articles = statute.articles.len(),
                warnings = statute.warnings.len(),
                "Loaded statute"
            );
            Ok(statute)
        }
        other => Err(LawError::missing(
            DocumentType::Statute.detail_root(),
            other.doc_type().display_name(),
        )),
    }
}

/// Fetch a statute and look up one of its articles.
pub async fn read_statute_article<S>(source: &S, law_id: &str, number: &str) -> Result<ArticleOutcome>
where
    S: DocumentSource + ?Sized,
{
    let statute = load_statute(source, law_id).await?;
    Ok(ArticleOutcome::from_statute(&statute, &normalize_article_number(number)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArticleKind;

    fn article(number: &str, kind: ArticleKind, text: &str) -> Article {
        Article {
            number: number.into(),
            title: String::new(),
            kind,
            body_lines: vec![text.into()],
        }
    }

    #[test]
    fn test_normalize_article_number() {
        assert_eq!(normalize_article_number("20"), "20");
        assert_eq!(normalize_article_number("20-2"), "20-2");
        assert_eq!(normalize_article_number("20의2"), "20-2");
        assert_eq!(normalize_article_number("제 20 조"), "20");
        assert_eq!(normalize_article_number("abc"), "abc");
    }

    #[test]
    fn test_find_article_prefers_content() {
        let articles = vec![
            article("2", ArticleKind::Header, "제1장 총칙"),
            article("2", ArticleKind::Content, "제2조 본문"),
        ];
        assert_eq!(find_article(&articles, "2").unwrap().full_text(), "제2조 본문");
    }

    #[test]
    fn test_find_article_falls_back_to_header() {
        let articles = vec![article("2", ArticleKind::Header, "제1장 총칙")];
        assert_eq!(find_article(&articles, "2").unwrap().kind, ArticleKind::Header);
        assert!(find_article(&articles, "3").is_none());
    }

    #[test]
    fn test_outcome_render_not_found() {
        let outcome = ArticleOutcome::NotFound {
            law_name: "민법".into(),
            number: "9999".into(),
        };
        assert!(!outcome.is_found());
        assert_eq!(outcome.render(), "Article 9999 not found in 민법.");
    }
}
