//! Typed documents.
//!
//! Each document type exposes its own fields. A detail response is converted
//! into one variant of [`Document`] by reading a fixed set of field names per
//! type; absent fields become empty strings.

use serde::Serialize;

use crate::error::{LawError, Result};
use crate::segment::{segment_articles, ORDINANCE_SCHEMA, STATUTE_SCHEMA};
use crate::types::{Article, DocumentType};
use crate::xml::{one_or_many, AttrValue};

/// A retrieved document of any type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Document {
    Statute(StatuteDocument),
    Precedent(PrecedentDocument),
    ConstitutionalDecision(DecisionDocument),
    AdministrativeRule(AdminRuleDocument),
    Ordinance(OrdinanceDocument),
    LegalTerm(LegalTermDocument),
    Interpretation(InterpretationDocument),
}

impl Document {
    /// Convert a detail response tree into a typed document.
    ///
    /// # Arguments
    /// * `doc_type` - Type the response was requested as
    /// * `tree` - Parsed response (map keyed by the root element)
    ///
    /// # Errors
    /// `LawError::MissingElement` when the expected root element is absent,
    /// which is how the API signals an unknown identifier.
    pub fn from_tree(doc_type: DocumentType, tree: &AttrValue) -> Result<Self> {
        let root_name = doc_type.detail_root();
        let root = tree
            .get(root_name)
            .ok_or_else(|| LawError::missing(root_name, doc_type.display_name()))?;

        Ok(match doc_type {
            DocumentType::Statute => Self::Statute(StatuteDocument::from_attrs(root)),
            DocumentType::Precedent => Self::Precedent(PrecedentDocument::from_attrs(root)),
            DocumentType::ConstitutionalDecision => {
                Self::ConstitutionalDecision(DecisionDocument::from_attrs(root))
            }
            DocumentType::AdministrativeRule => {
                Self::AdministrativeRule(AdminRuleDocument::from_attrs(root))
            }
            DocumentType::Ordinance => Self::Ordinance(OrdinanceDocument::from_attrs(root)),
            DocumentType::LegalTerm => Self::LegalTerm(LegalTermDocument::from_attrs(root)),
            DocumentType::Interpretation => {
                Self::Interpretation(InterpretationDocument::from_attrs(root))
            }
        })
    }

    #[must_use]
    pub fn doc_type(&self) -> DocumentType {
        match self {
            Self::Statute(_) => DocumentType::Statute,
            Self::Precedent(_) => DocumentType::Precedent,
            Self::ConstitutionalDecision(_) => DocumentType::ConstitutionalDecision,
            Self::AdministrativeRule(_) => DocumentType::AdministrativeRule,
            Self::Ordinance(_) => DocumentType::Ordinance,
            Self::LegalTerm(_) => DocumentType::LegalTerm,
            Self::Interpretation(_) => DocumentType::Interpretation,
        }
    }

    /// Title of the document, whatever its type.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Statute(d) => &d.name,
            Self::Precedent(d) => &d.title,
            Self::ConstitutionalDecision(d) => &d.title,
            Self::AdministrativeRule(d) => &d.name,
            Self::Ordinance(d) => &d.name,
            Self::LegalTerm(d) => &d.name,
            Self::Interpretation(d) => &d.title,
        }
    }
}

/// Attached table (별표) or form (서식).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Table,
    Form,
}

impl AttachmentKind {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Table => "별표",
            Self::Form => "서식",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub number: String,
    pub title: String,
}

/// Statute (법령).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatuteDocument {
    pub name: String,
    pub enforcement_date: String,
    pub promulgation_date: String,
    pub promulgation_no: String,
    pub revision_type: String,
    pub articles: Vec<Article>,
    /// Problems met while segmenting articles.
    pub warnings: Vec<String>,
    pub attachments: Vec<Attachment>,
    pub amendment: String,
    pub amendment_reason: String,
}

impl StatuteDocument {
    pub fn from_attrs(root: &AttrValue) -> Self {
        let basic = root.get("기본정보");
        let basic_field = |key: &str| basic.map(|b| b.field(key)).unwrap_or_default();
        let segmentation = segment_articles(root, &STATUTE_SCHEMA);

        let mut attachments = collect_attachments(
            root,
            AttachmentKind::Table,
            "별표",
            "별표단위",
            "별표번호",
            "별표제목",
        );
        attachments.extend(collect_attachments(
            root,
            AttachmentKind::Form,
            "서식",
            "서식단위",
            "서식번호",
            "서식제목",
        ));

        Self {
            name: basic_field("법령명_한글"),
            enforcement_date: basic_field("시행일자"),
            promulgation_date: basic_field("공포일자"),
            promulgation_no: basic_field("공포번호"),
            revision_type: basic_field("제개정구분"),
            articles: segmentation.articles,
            warnings: segmentation.warnings,
            attachments,
            amendment: root
                .get("개정문")
                .map(|a| a.field("개정문내용"))
                .unwrap_or_default(),
            amendment_reason: root
                .get("제개정이유")
                .map(|r| r.field("제개정이유내용"))
                .unwrap_or_default(),
        }
    }
}

/// Attachments may be listed directly or wrapped in a `...단위` element.
fn collect_attachments(
    root: &AttrValue,
    kind: AttachmentKind,
    container: &str,
    unit: &str,
    number_key: &str,
    title_key: &str,
) -> Vec<Attachment> {
    let Some(section) = root.get(container) else {
        return Vec::new();
    };
    let items = match section.get(unit) {
        Some(units) => one_or_many(Some(units)),
        None => one_or_many(Some(section)),
    };
    items
        .into_iter()
        .map(|item| Attachment {
            kind,
            number: item.field(number_key),
            title: item.field(title_key),
        })
        .filter(|a| !a.number.is_empty() || !a.title.is_empty())
        .collect()
}

/// Court precedent (판례).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrecedentDocument {
    pub title: String,
    pub case_no: String,
    pub court: String,
    pub date: String,
    pub holding: String,
    pub summary: String,
    pub full_text: String,
    pub referenced_articles: String,
    pub referenced_cases: String,
}

impl PrecedentDocument {
    pub fn from_attrs(root: &AttrValue) -> Self {
        Self {
            title: root.field("사건명"),
            case_no: root.field("사건번호"),
            court: root.field("법원명"),
            date: root.field("선고일자"),
            holding: root.field("판시사항"),
            summary: root.field("판결요지"),
            full_text: root.field("판례내용"),
            referenced_articles: root.field("참조조문"),
            referenced_cases: root.field("참조판례"),
        }
    }
}

/// Constitutional Court decision (헌재결정례).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionDocument {
    pub title: String,
    pub case_no: String,
    pub case_type: String,
    pub date: String,
    pub holding: String,
    pub summary: String,
    pub full_text: String,
    pub referenced_articles: String,
    pub referenced_cases: String,
}

impl DecisionDocument {
    pub fn from_attrs(root: &AttrValue) -> Self {
        Self {
            title: root.field("사건명"),
            case_no: root.field("사건번호"),
            case_type: root.field("사건종류명"),
            date: root.field("종국일자"),
            holding: root.field("판시사항"),
            summary: root.field("결정요지"),
            full_text: root.field("전문"),
            referenced_articles: root.field("참조조문"),
            referenced_cases: root.field("참조판례"),
        }
    }
}

/// Administrative rule (행정규칙).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminRuleDocument {
    pub name: String,
    pub department: String,
    /// Article texts, when the rule is split into articles.
    pub articles: Vec<String>,
    pub full_text: String,
    pub addenda: String,
}

impl AdminRuleDocument {
    pub fn from_attrs(root: &AttrValue) -> Self {
        let info = root.get("행정규칙기본정보");
        let info_field = |key: &str| info.map(|i| i.field(key)).unwrap_or_default();

        let articles = one_or_many(root.get("조문내용"))
            .into_iter()
            .map(AttrValue::flatten_text)
            .filter(|text| !text.trim().is_empty())
            .collect();

        Self {
            name: info_field("행정규칙명"),
            department: info_field("소관부처명"),
            articles,
            full_text: root.field("전문"),
            addenda: root.get("부칙").map(AttrValue::flatten_text).unwrap_or_default(),
        }
    }
}

/// Autonomous ordinance (자치법규).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrdinanceDocument {
    pub name: String,
    pub government: String,
    pub articles: Vec<Article>,
}

impl OrdinanceDocument {
    pub fn from_attrs(root: &AttrValue) -> Self {
        let info = root.get("자치법규기본정보");
        let info_field = |key: &str| info.map(|i| i.field(key)).unwrap_or_default();

        Self {
            name: info_field("자치법규명"),
            government: info_field("지자체기관명"),
            articles: segment_articles(root, &ORDINANCE_SCHEMA).articles,
        }
    }
}

/// Legal term definition (법령용어).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegalTermDocument {
    pub name: String,
    pub definition: String,
    pub source: String,
    pub defining_article: String,
}

impl LegalTermDocument {
    pub fn from_attrs(root: &AttrValue) -> Self {
        Self {
            name: root.field("법령용어명"),
            definition: root.field("법령용어내용"),
            source: root.field("출처법령명"),
            defining_article: root.field("용어정의조문"),
        }
    }
}

/// Statutory interpretation (법령해석례).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpretationDocument {
    pub title: String,
    pub case_no: String,
    pub date: String,
    pub question: String,
    pub answer: String,
    pub reasoning: String,
}

impl InterpretationDocument {
    pub fn from_attrs(root: &AttrValue) -> Self {
        Self {
            title: root.field("안건명"),
            case_no: root.field("안건번호"),
            date: root.field("회신일자"),
            question: root.field("질의요지"),
            answer: root.field("회답"),
            reasoning: root.field("이유"),
        }
    }
}
