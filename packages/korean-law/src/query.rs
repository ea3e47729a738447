//! Free-text query interpretation.
//!
//! A query is either an article lookup ("민법 제103조", "Civil Act Article
//! 103", "형법 250") or a broad search ("학교폭력"). The rules are tried in
//! order and the first match wins:
//!
//! 1. native `제 N 조 [의 M]`
//! 2. English `Article N[-M]` / `Art. N`
//! 3. a bare number standing on its own
//! 4. anything else is a broad search
//!
//! English names of major statutes are translated before classification.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use crate::config::ENGLISH_LAW_NAMES;
use crate::types::StatuteHit;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NATIVE_ARTICLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"제\s*(\d+)\s*(?:조)?(?:\s*의\s*(\d+))?").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SUFFIXED_ARTICLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(\d+)\s*조(?:\s*의\s*(\d+))?").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ENGLISH_ARTICLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:Article|Art\.?)\s*(\d+(?:-\d+)?)").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)(\d+(?:-\d+)?)(?:\s|$)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FILLER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bof\b").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regexes that are guaranteed to be valid
static ENGLISH_NAMES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ENGLISH_LAW_NAMES
        .iter()
        .map(|(english, native)| {
            let pattern = format!("(?i){}", regex::escape(english));
            (Regex::new(&pattern).expect("valid regex"), *native)
        })
        .collect()
});

/// Statute name and optional article number extracted from a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    /// Candidate statute name (may be empty when the query held only a number).
    pub statute: String,
    /// Article number in `N` or `N-M` form.
    pub article: Option<String>,
}

/// What a free-text query asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIntent {
    /// Look up a statute, optionally one article of it.
    Article(ArticleQuery),
    /// Search statutes, precedents and administrative rules at once.
    Search { query: String },
}

/// Replace the first known English statute name in the query.
///
/// # Examples
/// ```
/// use korean_law::query::translate_english_names;
///
/// assert_eq!(translate_english_names("Civil Act Article 103"), "민법 Article 103");
/// assert_eq!(translate_english_names("민법 제103조"), "민법 제103조");
/// ```
pub fn translate_english_names(query: &str) -> String {
    for (pattern, native) in ENGLISH_NAMES.iter() {
        if pattern.is_match(query) {
            let translated = pattern.replace_all(query, *native).into_owned();
            tracing::debug!(query, translated = %translated, "Translated English statute name");
            return translated;
        }
    }
    query.to_string()
}

/// Classify a free-text query.
pub fn interpret_query(query: &str) -> QueryIntent {
    let translated = translate_english_names(query.trim());
    match match_article_rules(&translated) {
        Some(parsed) => QueryIntent::Article(parsed),
        None => QueryIntent::Search { query: translated },
    }
}

/// Extract a statute name and article number, treating a query without an
/// article pattern as a bare statute name.
///
/// Besides the classification rules, a number suffixed with `조` after a
/// statute name (`고등교육법 20조`) names an article.
///
/// # Examples
/// ```
/// use korean_law::query::parse_article_query;
///
/// let parsed = parse_article_query("민법 제103조");
/// assert_eq!(parsed.statute, "민법");
/// assert_eq!(parsed.article.as_deref(), Some("103"));
///
/// let bare = parse_article_query("고등교육법");
/// assert_eq!(bare.statute, "고등교육법");
/// assert_eq!(bare.article, None);
/// ```
pub fn parse_article_query(query: &str) -> ArticleQuery {
    let translated = translate_english_names(query.trim());
    match_article_rules(&translated)
        .or_else(|| match_suffixed_article(&translated))
        .unwrap_or_else(|| ArticleQuery {
            statute: clean_candidate(&translated),
            article: None,
        })
}

fn match_suffixed_article(query: &str) -> Option<ArticleQuery> {
    let caps = SUFFIXED_ARTICLE.captures(query)?;
    let statute = clean_candidate(&remove_span(query, whole_span(&caps)));
    (!statute.is_empty()).then(|| ArticleQuery {
        statute,
        article: Some(article_number(&caps)),
    })
}

fn match_article_rules(query: &str) -> Option<ArticleQuery> {
    if let Some(caps) = NATIVE_ARTICLE.captures(query) {
        let number = article_number(&caps);
        let remainder = remove_span(query, whole_span(&caps));
        let mut remainder: Vec<&str> = remainder.split_whitespace().collect();
        if remainder.last() == Some(&"조") {
            remainder.pop();
        }
        return Some(ArticleQuery {
            statute: clean_candidate(&remainder.join(" ")),
            article: Some(number),
        });
    }

    if let Some(caps) = ENGLISH_ARTICLE.captures(query) {
        let number = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let remainder = remove_span(query, whole_span(&caps));
        return Some(ArticleQuery {
            statute: clean_candidate(&remainder),
            article: Some(number),
        });
    }

    if let Some(number) = BARE_NUMBER.captures(query).and_then(|caps| caps.get(1)) {
        let remainder = clean_candidate(&remove_span(query, number.range()));
        return Some(if remainder.is_empty() {
            ArticleQuery {
                statute: clean_candidate(query),
                article: None,
            }
        } else {
            ArticleQuery {
                statute: remainder,
                article: Some(number.as_str().to_string()),
            }
        });
    }

    None
}

fn whole_span(caps: &Captures<'_>) -> std::ops::Range<usize> {
    caps.get(0).map_or(0..0, |m| m.range())
}

/// `N` or `N-M` from a native article match.
fn article_number(caps: &Captures<'_>) -> String {
    let main = caps.get(1).map_or("", |m| m.as_str());
    match caps.get(2) {
        Some(branch) => format!("{main}-{}", branch.as_str()),
        None => main.to_string(),
    }
}

fn remove_span(text: &str, span: std::ops::Range<usize>) -> String {
    format!("{} {}", &text[..span.start], &text[span.end..])
}

/// Drop filler words and collapse whitespace.
fn clean_candidate(text: &str) -> String {
    FILLER
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical form for comparing statute names: NFC, no whitespace.
pub fn normalize_name(name: &str) -> String {
    name.nfc().filter(|c| !c.is_whitespace()).collect()
}

/// Whether two statute names are equal ignoring whitespace.
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

/// Pick the statute a navigation query most likely means.
///
/// Preference: exact name in force, exact name, an Act (`법률`), the first hit.
pub fn select_statute<'a>(hits: &'a [StatuteHit], name: &str) -> Option<&'a StatuteHit> {
    let wanted = normalize_name(name);
    let exact = |hit: &&StatuteHit| normalize_name(&hit.name) == wanted;

    hits.iter()
        .filter(exact)
        .find(|hit| hit.is_current())
        .or_else(|| hits.iter().find(exact))
        .or_else(|| hits.iter().find(|hit| hit.is_act()))
        .or_else(|| hits.first())
}
