//! Rendering of typed documents and search hits into markdown-like text.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use crate::config::{
    comparison_page_url, law_page_url, COMPARISON_AMENDMENT_CHARS, HISTORY_AMENDMENT_CHARS,
    HISTORY_REASON_CHARS, TOC_ARTICLE_LIMIT,
};
use crate::document::{
    AdminRuleDocument, DecisionDocument, Document, InterpretationDocument, LegalTermDocument,
    OrdinanceDocument, PrecedentDocument, StatuteDocument,
};
use crate::types::{Article, InterpretationHit, LegalTermHit, StatuteHit};

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));

/// Entities restored by [`clean_html`]. `&amp;` comes last so that
/// `&amp;lt;` decodes to `&lt;` and not to `<`.
const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&nbsp;", " "),
    ("&amp;", "&"),
];

/// Clean up body text returned by the API.
///
/// Strips CDATA markers, restores common HTML entities, turns `<br>`
/// variants into newlines and trims the result. Other markup is left alone.
///
/// # Examples
/// ```
/// use korean_law::render::clean_html;
///
/// assert_eq!(clean_html("<![CDATA[ 가&lt;나&gt;<br/>다 ]]>"), "가<나>\n다");
/// ```
pub fn clean_html(text: &str) -> String {
    let mut cleaned = text.replace("<![CDATA[", "").replace("]]>", "");
    for (entity, replacement) in ENTITIES {
        cleaned = cleaned.replace(entity, replacement);
    }
    LINE_BREAK.replace_all(&cleaned, "\n").trim().to_string()
}

/// Display a `YYYYMMDD` date as `YYYY-MM-DD`; other values pass through.
///
/// # Examples
/// ```
/// use korean_law::render::display_date;
///
/// assert_eq!(display_date("20240517"), "2024-05-17");
/// assert_eq!(display_date("2024.5.17"), "2024.5.17");
/// ```
pub fn display_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y%m%d") {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    raw.to_string()
}

/// Render any document.
pub fn render_document(document: &Document) -> String {
    match document {
        Document::Statute(doc) => render_statute(doc),
        Document::Precedent(doc) => render_precedent(doc),
        Document::ConstitutionalDecision(doc) => render_decision(doc),
        Document::AdministrativeRule(doc) => render_admin_rule(doc),
        Document::Ordinance(doc) => render_ordinance(doc),
        Document::LegalTerm(doc) => render_legal_term(doc),
        Document::Interpretation(doc) => render_interpretation(doc),
    }
}

pub fn render_statute(doc: &StatuteDocument) -> String {
    if doc.articles.is_empty() {
        return format!("# {}\n\n(No articles found)", doc.name);
    }
    let mut body: Vec<String> = doc.articles.iter().map(Article::full_text).collect();
    if !doc.warnings.is_empty() {
        body.push(String::new());
        body.extend(doc.warnings.iter().map(|w| format!("(Skipped unreadable article: {w})")));
    }
    format!("# {}\n\n{}", doc.name, body.join("\n"))
}

/// Render a single article under its statute name.
///
/// The heading uses the article's native label (e.g., `제20조의2`).
pub fn render_article(law_name: &str, article: &Article) -> String {
    format!("# {} {}\n\n{}", law_name, article.label(), article.full_text())
}

/// Render a table of contents of the first articles of a statute.
///
/// Consecutive entries with the same number and no title are collapsed into
/// one (they are continuation items of the article above).
pub fn render_table_of_contents(law_name: &str, enforcement_date: &str, articles: &[Article]) -> String {
    let mut entries: Vec<&Article> = Vec::new();
    for article in articles {
        let duplicate = entries
            .last()
            .is_some_and(|prev| prev.number == article.number && article.title.is_empty());
        if !duplicate {
            entries.push(article);
        }
    }

    let mut lines = vec![
        format!("# {law_name}"),
        format!("Enforcement Date: {}", display_date(enforcement_date)),
        String::new(),
        format!("## Table of Contents (First {TOC_ARTICLE_LIMIT} Articles)"),
    ];
    for article in entries.iter().take(TOC_ARTICLE_LIMIT) {
        let title = if article.title.is_empty() {
            "(No Title)"
        } else {
            article.title.as_str()
        };
        lines.push(format!("- {}: {}", article.label(), title));
    }
    if entries.len() > TOC_ARTICLE_LIMIT {
        lines.push(format!(
            "... and {} more articles.",
            entries.len() - TOC_ARTICLE_LIMIT
        ));
    }
    lines.push(String::new());
    lines.push("To read a specific article, try searching 'LawName Article X'.".into());
    lines.join("\n")
}

pub fn render_precedent(doc: &PrecedentDocument) -> String {
    let mut lines = vec![
        format!("# {}", doc.title),
        format!("**Case No:** {}", doc.case_no),
        format!("**Court:** {}", doc.court),
        format!("**Date:** {}", display_date(&doc.date)),
        String::new(),
        "## 판시사항 (Holding)".into(),
        clean_html(&doc.holding),
        String::new(),
        "## 판결요지 (Summary)".into(),
        clean_html(&doc.summary),
        String::new(),
        "## 전문 (Full Text)".into(),
        clean_html(&doc.full_text),
    ];
    push_related(&mut lines, &doc.referenced_articles, &doc.referenced_cases);
    lines.join("\n")
}

pub fn render_decision(doc: &DecisionDocument) -> String {
    let mut lines = vec![
        format!("# {}", doc.title),
        format!("**Case No:** {}", doc.case_no),
        format!("**Type:** {}", doc.case_type),
        format!("**Date:** {}", display_date(&doc.date)),
        String::new(),
        "## 판시사항 (Holding)".into(),
        clean_html(&doc.holding),
        String::new(),
        "## 결정요지 (Summary)".into(),
        clean_html(&doc.summary),
        String::new(),
        "## 전문 (Full Text)".into(),
        clean_html(&doc.full_text),
    ];
    push_related(&mut lines, &doc.referenced_articles, &doc.referenced_cases);
    lines.join("\n")
}

/// Related-resource sections, only when present.
fn push_related(lines: &mut Vec<String>, articles: &str, cases: &str) {
    let articles = clean_html(articles);
    let cases = clean_html(cases);
    if articles.is_empty() && cases.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("## 참조 정보 (Related Resources)".into());
    if !articles.is_empty() {
        lines.push(format!("### 참조 조문 (Referenced Articles)\n{articles}"));
    }
    if !cases.is_empty() {
        lines.push(format!("### 참조 판례 (Referenced Cases)\n{cases}"));
    }
}

pub fn render_admin_rule(doc: &AdminRuleDocument) -> String {
    let body = if !doc.articles.is_empty() {
        doc.articles
            .iter()
            .map(|a| clean_html(a))
            .collect::<Vec<_>>()
            .join("\n")
    } else if !doc.full_text.trim().is_empty() {
        clean_html(&doc.full_text)
    } else if !doc.addenda.trim().is_empty() {
        format!("\n[부칙]\n{}", clean_html(&doc.addenda))
    } else {
        "(No content found.)".to_string()
    };
    format!("# {} ({})\n\n{}", doc.name, doc.department, body)
}

pub fn render_ordinance(doc: &OrdinanceDocument) -> String {
    let body = if doc.articles.is_empty() {
        "(No parsed articles found. The law might use a different structure or be empty.)".to_string()
    } else {
        doc.articles
            .iter()
            .map(Article::full_text)
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!("# {} ({})\n\n{}", doc.name, doc.government, body)
}

pub fn render_legal_term(doc: &LegalTermDocument) -> String {
    format!(
        "# {}\n\n**Source:** {}\n**Ref:** {}\n\n## Definition\n{}",
        doc.name,
        doc.source,
        doc.defining_article,
        clean_html(&doc.definition)
    )
}

pub fn render_interpretation(doc: &InterpretationDocument) -> String {
    [
        format!("# {}", doc.title),
        format!("**Case No:** {}", doc.case_no),
        format!("**Date:** {}", display_date(&doc.date)),
        String::new(),
        "## 질의요지 (Question)".into(),
        clean_html(&doc.question),
        String::new(),
        "## 회답 (Answer)".into(),
        clean_html(&doc.answer),
        String::new(),
        "## 이유 (Reasoning)".into(),
        clean_html(&doc.reasoning),
    ]
    .join("\n")
}

/// List attached tables and forms of a statute.
pub fn render_attachments(doc: &StatuteDocument) -> String {
    if doc.attachments.is_empty() {
        return format!("# {}\n\nNo attached forms or tables found.", doc.name);
    }
    let mut lines = vec![format!("# {} - Attached Files", doc.name), String::new()];
    lines.extend(
        doc.attachments
            .iter()
            .map(|a| format!("[{} {}] {}", a.kind.label(), a.number, a.title)),
    );
    lines.push(String::new());
    lines.push("Note: Attachment files themselves are not downloaded; they exist in the official record.".into());
    lines.join("\n")
}

/// Revision information of a statute, with truncated amendment texts.
pub fn render_history(doc: &StatuteDocument, law_id: &str) -> String {
    let mut lines = vec![
        format!("# {} 연혁 정보", doc.name),
        String::new(),
        "## 현행 법령 정보".into(),
        format!("- **제개정구분**: {}", doc.revision_type),
        format!("- **시행일자**: {}", display_date(&doc.enforcement_date)),
        format!("- **공포일자**: {}", display_date(&doc.promulgation_date)),
        format!("- **공포번호**: {}", doc.promulgation_no),
        String::new(),
    ];
    push_truncated(&mut lines, "## 개정문", &doc.amendment, HISTORY_AMENDMENT_CHARS);
    push_truncated(&mut lines, "## 제개정이유", &doc.amendment_reason, HISTORY_REASON_CHARS);
    lines.push(format!(
        "> **Note**: 전체 연혁 정보는 [법령정보센터]({}) 에서 확인할 수 있습니다.",
        law_page_url(law_id)
    ));
    lines.join("\n")
}

/// Latest amendment of a statute with a pointer to the official old/new
/// article comparison table.
pub fn render_old_new_comparison(doc: &StatuteDocument, law_id: &str) -> String {
    let mut lines = vec![format!("# {} 신구조문대비", doc.name), String::new()];
    let amendment = clean_html(&doc.amendment);
    if !amendment.is_empty() {
        lines.push("## 최근 개정 내용".into());
        lines.push(format!("- **제개정구분**: {}", doc.revision_type));
        lines.push(format!("- **시행일자**: {}", display_date(&doc.enforcement_date)));
        lines.push(String::new());
        lines.push("### 개정문".into());
        lines.push("```".into());
        lines.push(amendment.chars().take(COMPARISON_AMENDMENT_CHARS).collect());
        if amendment.chars().count() > COMPARISON_AMENDMENT_CHARS {
            lines.push("...".into());
        }
        lines.push("```".into());
        lines.push(String::new());
    }
    lines.push("## 신구조문대비표 확인".into());
    lines.push(String::new());
    lines.push("> **Note**: 상세한 신구조문대비표는 국가법령정보센터에서 확인할 수 있습니다.".into());
    lines.push(String::new());
    lines.push(format!(
        "**[{} 신구조문대비표 보기]({})**",
        doc.name,
        comparison_page_url(law_id)
    ));
    lines.join("\n")
}

fn push_truncated(lines: &mut Vec<String>, heading: &str, text: &str, limit: usize) {
    let cleaned = clean_html(text);
    if cleaned.is_empty() {
        return;
    }
    lines.push(heading.to_string());
    lines.push(cleaned.chars().take(limit).collect());
    if cleaned.chars().count() > limit {
        lines.push("...".into());
    }
    lines.push(String::new());
}

/// One line per statute hit: `ID: statute:ID | Name: NAME | Date: DATE`.
pub fn render_statute_hits(hits: &[StatuteHit]) -> String {
    if hits.is_empty() {
        return "No results found.".to_string();
    }
    hits.iter()
        .map(|hit| {
            format!(
                "ID: statute:{} | Name: {} | Date: {}",
                hit.id,
                hit.name,
                display_date(&hit.promulgation_date)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_term_hits(query: &str, hits: &[LegalTermHit]) -> String {
    if hits.is_empty() {
        return "No legal terms found.".to_string();
    }
    let mut lines = vec![format!("# Legal Term Search Results for '{query}'"), String::new()];
    lines.extend(
        hits.iter()
            .map(|hit| format!("- **{}** (Source: {}) [ID: term:{}]", hit.name, hit.source, hit.id)),
    );
    lines.join("\n")
}

pub fn render_interpretation_hits(query: &str, hits: &[InterpretationHit]) -> String {
    if hits.is_empty() {
        return "No interpretations found.".to_string();
    }
    let mut lines = vec![
        format!("# Statutory Interpretation Search Results for '{query}'"),
        String::new(),
    ];
    lines.extend(hits.iter().map(|hit| {
        format!(
            "- **{}** (No: {}, Date: {}) [ID: interp:{}]",
            hit.title,
            hit.case_no,
            display_date(&hit.date),
            hit.id
        )
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Attachment, AttachmentKind};
    use crate::types::ArticleKind;
    use pretty_assertions::assert_eq;

    fn article(number: &str, title: &str) -> Article {
        Article {
            number: number.into(),
            title: title.into(),
            kind: ArticleKind::Content,
            body_lines: vec![format!("제{number}조 본문")],
        }
    }

    fn statute(articles: Vec<Article>) -> StatuteDocument {
        StatuteDocument {
            name: "민법".into(),
            enforcement_date: "20240517".into(),
            promulgation_date: "20240102".into(),
            promulgation_no: "19000".into(),
            revision_type: "일부개정".into(),
            articles,
            warnings: Vec::new(),
            attachments: Vec::new(),
            amendment: String::new(),
            amendment_reason: String::new(),
        }
    }

    #[test]
    fn test_clean_html_variants() {
        assert_eq!(clean_html("a<br>b<BR />c<br/>d"), "a\nb\nc\nd");
        assert_eq!(clean_html("&quot;x&quot;&nbsp;&amp;"), "\"x\" &");
        assert_eq!(clean_html("&amp;lt;"), "&lt;");
        assert_eq!(clean_html("  <p>kept</p>  "), "<p>kept</p>");
        assert_eq!(clean_html(""), "");
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("19580222"), "1958-02-22");
        assert_eq!(display_date("20241399"), "20241399");
        assert_eq!(display_date(""), "");
    }

    #[test]
    fn test_render_statute_empty() {
        assert_eq!(render_statute(&statute(Vec::new())), "# 민법\n\n(No articles found)");
    }

    #[test]
    fn test_render_statute_idempotent() {
        let doc = statute(vec![article("1", "목적"), article("2", "")]);
        assert_eq!(render_statute(&doc), render_statute(&doc));
        assert_eq!(render_statute(&doc), "# 민법\n\n제1조 본문\n제2조 본문");
    }

    #[test]
    fn test_render_article_branch_label() {
        let rendered = render_article("고등교육법", &article("20-2", ""));
        assert!(rendered.starts_with("# 고등교육법 제20조의2\n\n"));
    }

    #[test]
    fn test_toc_collapses_and_counts() {
        let mut articles = vec![article("1", "목적"), article("1", "")];
        articles.extend((2..=40).map(|n| article(&n.to_string(), "")));
        let toc = render_table_of_contents("민법", "20240517", &articles);
        assert!(toc.contains("Enforcement Date: 2024-05-17"));
        assert_eq!(toc.matches("- 제1조").count(), 1);
        assert!(toc.contains("- 제30조: (No Title)"));
        assert!(!toc.contains("- 제31조"));
        assert!(toc.contains("... and 10 more articles."));
    }

    #[test]
    fn test_render_precedent_related_only_when_present() {
        let mut doc = PrecedentDocument {
            title: "손해배상".into(),
            case_no: "2010다102991".into(),
            court: "대법원".into(),
            date: "20110127".into(),
            holding: "가<br/>나".into(),
            summary: String::new(),
            full_text: String::new(),
            referenced_articles: String::new(),
            referenced_cases: String::new(),
        };
        let plain = render_precedent(&doc);
        assert!(plain.contains("**Date:** 2011-01-27"));
        assert!(plain.contains("가\n나"));
        assert!(!plain.contains("Related Resources"));

        doc.referenced_articles = "민법 제750조".into();
        let related = render_precedent(&doc);
        assert!(related.contains("### 참조 조문 (Referenced Articles)\n민법 제750조"));
        assert!(!related.contains("참조 판례"));
    }

    #[test]
    fn test_render_related_cleans_markup() {
        let doc = DecisionDocument {
            title: "위헌소원".into(),
            case_no: "2009헌바17".into(),
            case_type: "헌바".into(),
            date: "20150226".into(),
            holding: String::new(),
            summary: String::new(),
            full_text: String::new(),
            referenced_articles: "형법 제241조<br/>민법 제840조 &amp; 제843조".into(),
            referenced_cases: "<![CDATA[대법원 2008. 4. 24. 선고 2007다1234 판결]]>".into(),
        };
        let rendered = render_decision(&doc);
        assert!(rendered.contains("### 참조 조문 (Referenced Articles)\n형법 제241조\n민법 제840조 & 제843조"));
        assert!(rendered.contains("### 참조 판례 (Referenced Cases)\n대법원 2008. 4. 24. 선고 2007다1234 판결"));
        assert!(!rendered.contains("<br/>"));
    }

    #[test]
    fn test_render_related_skips_markup_only_values() {
        let mut doc = PrecedentDocument {
            title: "손해배상".into(),
            case_no: "2010다102991".into(),
            court: "대법원".into(),
            date: "20110127".into(),
            holding: String::new(),
            summary: String::new(),
            full_text: String::new(),
            referenced_articles: "<br/>".into(),
            referenced_cases: " ".into(),
        };
        assert!(!render_precedent(&doc).contains("Related Resources"));
        doc.referenced_cases = "대법원 2009다1<br>".into();
        assert!(render_precedent(&doc).ends_with("### 참조 판례 (Referenced Cases)\n대법원 2009다1"));
    }

    #[test]
    fn test_render_statute_lists_skipped_items() {
        let mut doc = statute(vec![article("1", "목적")]);
        doc.warnings.push("Article item 2: missing article number".into());
        assert_eq!(
            render_statute(&doc),
            "# 민법\n\n제1조 본문\n\n(Skipped unreadable article: Article item 2: missing article number)"
        );
    }

    #[test]
    fn test_render_admin_rule_fallbacks() {
        let mut doc = AdminRuleDocument {
            name: "지침".into(),
            department: "교육부".into(),
            articles: Vec::new(),
            full_text: String::new(),
            addenda: String::new(),
        };
        assert_eq!(render_admin_rule(&doc), "# 지침 (교육부)\n\n(No content found.)");
        doc.addenda = "이 지침은 공포한 날부터 시행한다.".into();
        assert!(render_admin_rule(&doc).contains("[부칙]\n이 지침은"));
        doc.full_text = "전문 내용".into();
        assert!(render_admin_rule(&doc).ends_with("전문 내용"));
    }

    #[test]
    fn test_render_attachments() {
        let mut doc = statute(Vec::new());
        assert!(render_attachments(&doc).contains("No attached forms or tables found."));
        doc.attachments.push(Attachment {
            kind: AttachmentKind::Form,
            number: "1".into(),
            title: "신청서".into(),
        });
        assert!(render_attachments(&doc).contains("[서식 1] 신청서"));
    }

    #[test]
    fn test_render_history_truncates() {
        let mut doc = statute(Vec::new());
        doc.amendment = "가".repeat(HISTORY_AMENDMENT_CHARS + 10);
        let history = render_history(&doc, "265307");
        assert!(history.contains("## 개정문"));
        assert!(history.contains(&format!("{}\n...", "가".repeat(HISTORY_AMENDMENT_CHARS))));
        assert!(!history.contains("## 제개정이유"));
        assert!(history.contains("lsiSeq=265307"));
    }

    #[test]
    fn test_render_old_new_comparison() {
        let mut doc = statute(Vec::new());
        let bare = render_old_new_comparison(&doc, "265307");
        assert!(bare.starts_with("# 민법 신구조문대비\n\n## 신구조문대비표 확인"));
        assert!(!bare.contains("### 개정문"));

        doc.amendment = format!("<br/>{}", "가".repeat(COMPARISON_AMENDMENT_CHARS + 1));
        let comparison = render_old_new_comparison(&doc, "265307");
        assert!(comparison.contains("- **제개정구분**: 일부개정"));
        assert!(comparison.contains("- **시행일자**: 2024-05-17"));
        assert!(comparison.contains(&format!(
            "```\n{}\n...\n```",
            "가".repeat(COMPARISON_AMENDMENT_CHARS)
        )));
        assert!(comparison.ends_with(
            "**[민법 신구조문대비표 보기](https://www.law.go.kr/lsScLsComp.do?lsiSeq=265307)**"
        ));
    }

    #[test]
    fn test_render_statute_hits() {
        let hit = StatuteHit {
            name: "민법".into(),
            id: "265307".into(),
            promulgation_date: "20240917".into(),
            enforcement_date: String::new(),
            status: "현행".into(),
            class: "법률".into(),
        };
        assert_eq!(
            render_statute_hits(&[hit]),
            "ID: statute:265307 | Name: 민법 | Date: 2024-09-17"
        );
        assert_eq!(render_statute_hits(&[]), "No results found.");
    }
}
