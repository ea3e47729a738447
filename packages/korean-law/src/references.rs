//! Citation discovery and bounded resolution.
//!
//! Two kinds of citations are resolved:
//! - external: `건축법 제11조`, an article of another statute
//! - internal: `제5조` on its own, an article of the statute the text belongs to
//!
//! Resolution is capped by a [`ResolutionBudget`] shared by both kinds,
//! internal references first. Every attempted reference spends a slot,
//! resolved or not, so the number of upstream requests stays bounded. A
//! reference that cannot be resolved is logged and skipped; it never fails
//! the whole call.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::config::{EXTERNAL_TRUNCATION_THRESHOLD, MAX_RESOLVED_REFERENCES};
use crate::error::Result;
use crate::lookup::{find_article, load_statute};
use crate::source::{search_statutes, DocumentSource};
use crate::types::{article_label, Article, Reference};

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static EXTERNAL_CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([가-힣]+법)」?\s*제\s*(\d+)\s*조(?:\s*의\s*(\d+))?").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARTICLE_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"제\s*(\d+)\s*조(?:\s*의\s*(\d+))?").expect("valid regex"));

/// Words that point back at a statute instead of naming one.
const DEMONSTRATIVES: &[&str] = &["동법", "본법", "이법"];

/// Demonstratives meaning the owning statute itself. Their citations are
/// still candidates for internal resolution; `동법` (a statute mentioned
/// earlier) is not.
const SELF_DEMONSTRATIVES: &[&str] = &["본법", "이법"];

/// Counter capping how many references one call may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionBudget {
    limit: usize,
    used: usize,
}

impl ResolutionBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    /// Whether another reference may be attempted.
    pub fn has_remaining(&self) -> bool {
        self.used < self.limit
    }

    /// Record one attempted reference. Returns `false` once the budget is spent.
    pub fn consume(&mut self) -> bool {
        if self.has_remaining() {
            self.used += 1;
            true
        } else {
            false
        }
    }

    pub fn used(&self) -> usize {
        self.used
    }
}

impl Default for ResolutionBudget {
    fn default() -> Self {
        Self::new(MAX_RESOLVED_REFERENCES)
    }
}

/// Statute the scanned text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatuteContext<'a> {
    pub name: &'a str,
    /// Serial id; internal references are resolved only when it is known.
    pub id: Option<&'a str>,
}

fn cited_number(caps: &Captures<'_>, main: usize, branch: usize) -> String {
    let number = caps.get(main).map_or("", |m| m.as_str());
    match caps.get(branch) {
        Some(b) => format!("{number}-{}", b.as_str()),
        None => number.to_string(),
    }
}

/// Find citations of other statutes, deduplicated by (name, article) in
/// first-occurrence order.
pub fn find_external_references(text: &str) -> Vec<Reference> {
    let mut seen = HashSet::new();
    let mut references = Vec::new();

    for caps in EXTERNAL_CITATION.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if is_demonstrative(name.as_str()) {
            continue;
        }
        let number = cited_number(&caps, 2, 3);
        if seen.insert((name.as_str().to_string(), number.clone())) {
            references.push(Reference::external(whole.range(), name.as_str(), number));
        }
    }
    references
}

fn is_demonstrative(name: &str) -> bool {
    DEMONSTRATIVES.contains(&name)
}

/// Spans that internal detection must not look into: external citations
/// and citations through a demonstrative naming some earlier statute.
fn masked_spans(text: &str) -> Vec<Range<usize>> {
    EXTERNAL_CITATION
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let whole = caps.get(0)?;
            (!SELF_DEMONSTRATIVES.contains(&name)).then(|| whole.range())
        })
        .collect()
}

/// Find bare article citations (`제N조[의M]`), deduplicated in
/// first-occurrence order.
///
/// A citation directly preceded by a Hangul syllable is part of a longer
/// word; one inside an external citation belongs to that statute. Articles
/// cited on the first line are the text's own heading and are skipped.
pub fn find_internal_references(text: &str) -> Vec<Reference> {
    let masked = masked_spans(text);
    let first_line_end = text.find('\n').unwrap_or(text.len());
    let own: HashSet<String> = ARTICLE_CITATION
        .captures_iter(&text[..first_line_end])
        .map(|caps| cited_number(&caps, 1, 2))
        .collect();

    let mut seen = HashSet::new();
    let mut references = Vec::new();
    for caps in ARTICLE_CITATION.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if preceded_by_hangul(text, whole.start())
            || masked.iter().any(|span| span.contains(&whole.start()))
        {
            continue;
        }
        let number = cited_number(&caps, 1, 2);
        if own.contains(&number) {
            continue;
        }
        if seen.insert(number.clone()) {
            references.push(Reference::internal(whole.range(), number));
        }
    }
    references
}

fn preceded_by_hangul(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_some_and(|c| ('가'..='힣').contains(&c))
}

/// One resolved reference, ready for output.
struct ResolvedBlock {
    heading: String,
    body: String,
}

/// Request-local cache of segmented statutes and statute searches.
#[derive(Default)]
struct StatuteCache {
    articles: HashMap<String, Vec<Article>>,
    searches: HashMap<String, Option<String>>,
}

impl StatuteCache {
    async fn articles<S>(&mut self, source: &S, law_id: &str) -> Result<&[Article]>
    where
        S: DocumentSource + ?Sized,
    {
        if !self.articles.contains_key(law_id) {
            let statute = load_statute(source, law_id).await?;
            self.articles.insert(law_id.to_string(), statute.articles);
        }
        Ok(self.articles.get(law_id).map(Vec::as_slice).unwrap_or_default())
    }

    /// Id of the first statute hit for `name`.
    async fn first_hit<S>(&mut self, source: &S, name: &str) -> Result<Option<String>>
    where
        S: DocumentSource + ?Sized,
    {
        if let Some(cached) = self.searches.get(name) {
            return Ok(cached.clone());
        }
        let hits = search_statutes(source, name).await?;
        let id = hits.into_iter().map(|hit| hit.id).find(|id| !id.is_empty());
        self.searches.insert(name.to_string(), id.clone());
        Ok(id)
    }
}

/// Resolve the citations found in `text`.
///
/// Returns a `## Referenced Articles` section, or an empty string when
/// nothing was resolved.
pub async fn resolve_references<S>(source: &S, text: &str, context: Option<StatuteContext<'_>>) -> String
where
    S: DocumentSource + ?Sized,
{
    let mut budget = ResolutionBudget::default();
    let mut cache = StatuteCache::default();
    let mut blocks = Vec::new();

    if let Some(owner_id) = context.and_then(|c| c.id) {
        for reference in find_internal_references(text) {
            if !budget.consume() {
                break;
            }
            let label = article_label(&reference.article_no);
            match cache.articles(source, owner_id).await {
                Ok(articles) => match find_article(articles, &reference.article_no) {
                    Some(article) => {
                        blocks.push(ResolvedBlock {
                            heading: format!("### [Internal] {label}"),
                            body: article.full_text(),
                        });
                    }
                    None => debug!(article = %label, "Internal reference not found, skipping"),
                },
                Err(e) => {
                    warn!(error = %e, article = %label, "Failed to resolve internal reference");
                }
            }
        }
    }

    let owner_name = context.map(|c| c.name).unwrap_or_default();
    let externals: Vec<Reference> = find_external_references(text)
        .into_iter()
        .filter(|r| {
            let name = r.statute_name.as_deref().unwrap_or_default();
            owner_name.is_empty() || !owner_name.contains(name)
        })
        .collect();

    for (index, reference) in externals.iter().enumerate() {
        if !budget.consume() {
            debug!(skipped = externals.len() - index, "Reference budget exhausted");
            break;
        }
        let name = reference.statute_name.as_deref().unwrap_or_default();
        let label = article_label(&reference.article_no);
        match resolve_external(source, &mut cache, name, &reference.article_no).await {
            Ok(Some(article)) => {
                blocks.push(ResolvedBlock {
                    heading: format!("### [External] {name} {label}"),
                    body: article.full_text(),
                });
            }
            Ok(None) => debug!(statute = name, article = %label, "External reference not found, skipping"),
            Err(e) => {
                warn!(error = %e, statute = name, article = %label, "Failed to resolve external reference");
            }
        }
    }

    if blocks.is_empty() {
        return String::new();
    }

    let mut sections = vec!["## Referenced Articles".to_string()];
    sections.extend(blocks.into_iter().map(|b| format!("{}\n{}", b.heading, b.body)));
    if externals.len() > EXTERNAL_TRUNCATION_THRESHOLD {
        sections.push(format!(
            "(Note: {} external references found; at most {MAX_RESOLVED_REFERENCES} references are resolved per request.)",
            externals.len()
        ));
    }
    sections.join("\n\n")
}

async fn resolve_external<S>(
    source: &S,
    cache: &mut StatuteCache,
    name: &str,
    article_no: &str,
) -> Result<Option<Article>>
where
    S: DocumentSource + ?Sized,
{
    let Some(law_id) = cache.first_hit(source, name).await? else {
        return Ok(None);
    };
    let articles = cache.articles(source, &law_id).await?;
    Ok(find_article(articles, article_no).cloned())
}
