//! Article segmentation.
//!
//! Turns the `조문` container of a statute (or ordinance) into an ordered list
//! of [`Article`] records with formatted body lines. Paragraphs (`항`) are
//! indented one level and sub-items (`호`) two levels.

use crate::types::{article_label, Article, ArticleKind};
use crate::xml::{one_or_many, AttrValue};

/// Indentation per nesting level.
const INDENT: &str = "  ";

/// Field names used to read articles from one document family.
#[derive(Debug, Clone, Copy)]
pub struct ArticleSchema {
    /// Element holding all articles.
    pub container: &'static str,
    /// Article item element names, first present wins.
    pub items: &'static [&'static str],
    /// Article content fields, first non-empty wins.
    pub content: &'static [&'static str],
    pub number: &'static str,
    pub branch: &'static str,
    /// Article title fields, first non-empty wins.
    pub title: &'static [&'static str],
    /// Flag telling headings (`전문`) from provisions (`조문`).
    pub kind_flag: &'static str,
    pub paragraph: &'static str,
    pub paragraph_number: &'static str,
    pub paragraph_content: &'static str,
    pub sub_item: &'static str,
    pub sub_item_number: &'static str,
    pub sub_item_content: &'static str,
}

/// Statutes, decrees and rules.
pub const STATUTE_SCHEMA: ArticleSchema = ArticleSchema {
    container: "조문",
    items: &["조문단위"],
    content: &["조문내용"],
    number: "조문번호",
    branch: "조문가지번호",
    title: &["조문제목"],
    kind_flag: "조문여부",
    paragraph: "항",
    paragraph_number: "항번호",
    paragraph_content: "항내용",
    sub_item: "호",
    sub_item_number: "호번호",
    sub_item_content: "호내용",
};

/// Autonomous ordinances, which use shorter field names in places.
pub const ORDINANCE_SCHEMA: ArticleSchema = ArticleSchema {
    container: "조문",
    items: &["조문단위", "조"],
    content: &["조문내용", "조내용"],
    number: "조문번호",
    branch: "조문가지번호",
    title: &["조문제목", "조제목"],
    kind_flag: "조문여부",
    paragraph: "항",
    paragraph_number: "항번호",
    paragraph_content: "항내용",
    sub_item: "호",
    sub_item_number: "호번호",
    sub_item_content: "호내용",
};

/// Result of segmenting one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    /// Articles in document order.
    pub articles: Vec<Article>,
    /// Non-fatal problems, one per skipped item.
    pub warnings: Vec<String>,
}

/// Segment the articles of a document.
///
/// # Arguments
/// * `document` - The detail root (e.g., the value under `법령`)
/// * `schema` - Field names for this document family
///
/// # Returns
/// All well-formed articles in source order. A malformed item is skipped with
/// a warning; it never aborts the rest. A document without an article
/// container yields an empty segmentation.
pub fn segment_articles(document: &AttrValue, schema: &ArticleSchema) -> Segmentation {
    let mut segmentation = Segmentation::default();

    let Some(container) = document.get(schema.container) else {
        return segmentation;
    };

    let items = schema
        .items
        .iter()
        .find_map(|key| container.get(key))
        .map(|value| one_or_many(Some(value)))
        .unwrap_or_default();

    for (index, item) in items.into_iter().enumerate() {
        match segment_item(item, schema) {
            Ok(article) => segmentation.articles.push(article),
            Err(reason) => {
                tracing::warn!(index, reason = %reason, "Skipping malformed article");
                segmentation
                    .warnings
                    .push(format!("Article item {}: {reason}", index + 1));
            }
        }
    }

    tracing::debug!(
        articles = segmentation.articles.len(),
        warnings = segmentation.warnings.len(),
        "Segmented articles"
    );
    segmentation
}

/// Convenience wrapper returning only the articles of a statute.
pub fn statute_articles(document: &AttrValue) -> Vec<Article> {
    segment_articles(document, &STATUTE_SCHEMA).articles
}

fn segment_item(item: &AttrValue, schema: &ArticleSchema) -> Result<Article, String> {
    if !item.is_map() {
        return Err("expected an element, found bare text".to_string());
    }

    let main_number = item.field(schema.number);
    if main_number.is_empty() {
        return Err(format!("missing {}", schema.number));
    }
    let branch = item.field(schema.branch);
    let number = if branch.is_empty() || branch == "0" {
        main_number
    } else {
        format!("{main_number}-{branch}")
    };

    let title = item.first_field(schema.title);
    let kind = ArticleKind::from_flag(&item.field(schema.kind_flag));

    let mut content = item.first_field(schema.content);
    if content.is_empty() {
        content = item.text();
    }
    let content = content.trim();

    let header = if title.is_empty() {
        article_label(&number)
    } else {
        format!("{}({title})", article_label(&number))
    };

    let mut body_lines = vec![format_article_line(&header, content)];

    for paragraph in one_or_many(item.get(schema.paragraph)) {
        let (label, text) = labeled_text(
            paragraph,
            schema.paragraph_number,
            schema.paragraph_content,
        );
        if !text.is_empty() {
            body_lines.push(format!("{INDENT}{}", format_labeled(&label, &text)));
        }

        for sub_item in one_or_many(paragraph.get(schema.sub_item)) {
            let (label, text) =
                labeled_text(sub_item, schema.sub_item_number, schema.sub_item_content);
            let line = format_labeled(&label, &text);
            if !line.is_empty() {
                body_lines.push(format!("{INDENT}{INDENT}{line}"));
            }
        }
    }

    Ok(Article {
        number,
        title,
        kind,
        body_lines,
    })
}

/// Read an ordinal label and its text from a paragraph or sub-item.
fn labeled_text(node: &AttrValue, label_key: &str, text_key: &str) -> (String, String) {
    if node.is_map() {
        (
            node.field(label_key).trim().to_string(),
            node.field(text_key).trim().to_string(),
        )
    } else {
        (String::new(), node.text().trim().to_string())
    }
}

/// Format the first line of an article.
///
/// Content that already begins with the header is emitted verbatim so the
/// header appears once.
///
/// # Examples
/// ```
/// use korean_law::segment::format_article_line;
///
/// assert_eq!(
///     format_article_line("제1조(목적)", "제1조(목적) 이 법은 ..."),
///     "제1조(목적) 이 법은 ..."
/// );
/// assert_eq!(
///     format_article_line("제1조(목적)", "이 법은 ..."),
///     "제1조(목적): 이 법은 ..."
/// );
/// ```
pub fn format_article_line(header: &str, content: &str) -> String {
    if content.is_empty() {
        header.to_string()
    } else if starts_with_label(content, header) {
        content.to_string()
    } else {
        format!("{header}: {content}")
    }
}

/// Join an ordinal label and text, unless the text already starts with it.
fn format_labeled(label: &str, text: &str) -> String {
    if label.is_empty() || starts_with_label(text, label) {
        text.to_string()
    } else if text.is_empty() {
        label.to_string()
    } else {
        format!("{label} {text}")
    }
}

/// Whether `text` starts with `label`, ignoring all whitespace.
pub fn starts_with_label(text: &str, label: &str) -> bool {
    let mut text_chars = text.chars().filter(|c| !c.is_whitespace());
    let mut label_chars = label.chars().filter(|c| !c.is_whitespace()).peekable();
    if label_chars.peek().is_none() {
        return false;
    }
    label_chars.all(|l| text_chars.next() == Some(l))
}
