//! Integrated search across statutes, precedents and administrative rules.

use tracing::{debug, warn};

use crate::config::INTEGRATED_SEARCH_TOP_N;
use crate::error::Result;
use crate::render::display_date;
use crate::source::{search_admin_rules, search_precedents, search_statutes, DocumentSource};
use crate::types::{AdminRuleHit, PrecedentHit, StatuteHit};

/// Top hits per document type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegratedResults {
    pub statutes: Vec<StatuteHit>,
    pub precedents: Vec<PrecedentHit>,
    pub admin_rules: Vec<AdminRuleHit>,
}

/// Run the three searches concurrently.
///
/// A failing endpoint is logged and contributes an empty section; the other
/// sections are unaffected.
pub async fn integrated_search<S>(source: &S, query: &str) -> IntegratedResults
where
    S: DocumentSource + ?Sized,
{
    debug!(query, "Integrated search");
    let (statutes, precedents, admin_rules) = tokio::join!(
        search_statutes(source, query),
        search_precedents(source, query),
        search_admin_rules(source, query),
    );

    IntegratedResults {
        statutes: top_n(statutes, "statutes"),
        precedents: top_n(precedents, "precedents"),
        admin_rules: top_n(admin_rules, "administrative rules"),
    }
}

fn top_n<T>(result: Result<Vec<T>>, section: &str) -> Vec<T> {
    match result {
        Ok(mut hits) => {
            hits.truncate(INTEGRATED_SEARCH_TOP_N);
            hits
        }
        Err(e) => {
            warn!(error = %e, section, "Search failed, showing no results");
            Vec::new()
        }
    }
}

impl IntegratedResults {
    pub fn is_empty(&self) -> bool {
        self.statutes.is_empty() && self.precedents.is_empty() && self.admin_rules.is_empty()
    }

    /// Render the three sections in fixed order.
    pub fn render(&self, query: &str) -> String {
        let mut lines = vec![format!("# Integrated Search Results for '{query}'"), String::new()];

        lines.push("## 1. Statutes (법령)".into());
        push_section(
            &mut lines,
            self.statutes.iter().map(|hit| {
                format!(
                    "- **{}** (Date: {}) [ID: statute:{}]",
                    hit.name,
                    display_date(&hit.enforcement_date),
                    hit.id
                )
            }),
        );
        lines.push(String::new());

        lines.push("## 2. Precedents (판례)".into());
        push_section(
            &mut lines,
            self.precedents
                .iter()
                .map(|hit| format!("- **{} {}** [ID: prec:{}]", hit.case_no, hit.name, hit.id)),
        );
        lines.push(String::new());

        lines.push("## 3. Administrative Rules (행정규칙)".into());
        push_section(
            &mut lines,
            self.admin_rules.iter().map(|hit| {
                format!("- **{}** ({}) [ID: admrul:{}]", hit.name, hit.department, hit.id)
            }),
        );
        lines.join("\n")
    }
}

fn push_section(lines: &mut Vec<String>, entries: impl Iterator<Item = String>) {
    let before = lines.len();
    lines.extend(entries);
    if lines.len() == before {
        lines.push("(No results)".into());
    }
}
