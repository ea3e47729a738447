//! Core data types: document kinds, typed identifiers, articles, references
//! and search hits.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::validate_document_id;
use crate::error::{LawError, Result};
use crate::xml::AttrValue;

/// Kinds of documents served by the Open API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Statute (법령), including enforcement decrees and rules.
    #[serde(rename = "statute")]
    Statute,

    /// Court precedent (판례).
    #[serde(rename = "prec")]
    Precedent,

    /// Constitutional Court decision (헌재결정례).
    #[serde(rename = "const")]
    ConstitutionalDecision,

    /// Administrative rule (행정규칙).
    #[serde(rename = "admrul")]
    AdministrativeRule,

    /// Autonomous ordinance of a local government (자치법규).
    #[serde(rename = "ordin")]
    Ordinance,

    /// Legal term definition (법령용어).
    #[serde(rename = "term")]
    LegalTerm,

    /// Statutory interpretation (법령해석례).
    #[serde(rename = "interp")]
    Interpretation,
}

/// Query parameter that carries a document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdParam {
    /// `ID` parameter.
    Id,
    /// `MST` (serial number) parameter.
    Mst,
}

impl IdParam {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Mst => "MST",
        }
    }
}

impl DocumentType {
    /// All document types, in display order.
    pub const ALL: [DocumentType; 7] = [
        Self::Statute,
        Self::Precedent,
        Self::ConstitutionalDecision,
        Self::AdministrativeRule,
        Self::Ordinance,
        Self::LegalTerm,
        Self::Interpretation,
    ];

    /// Prefix used in typed identifiers (`prefix:id`).
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Statute => "statute",
            Self::Precedent => "prec",
            Self::ConstitutionalDecision => "const",
            Self::AdministrativeRule => "admrul",
            Self::Ordinance => "ordin",
            Self::LegalTerm => "term",
            Self::Interpretation => "interp",
        }
    }

    /// `target` parameter of the Open API.
    #[must_use]
    pub fn target(&self) -> &'static str {
        match self {
            Self::Statute => "law",
            Self::Precedent => "prec",
            Self::ConstitutionalDecision => "detc",
            Self::AdministrativeRule => "admrul",
            Self::Ordinance => "ordin",
            Self::LegalTerm => "lstrm",
            Self::Interpretation => "expc",
        }
    }

    /// Parameter that names a document of this type on the detail endpoint.
    ///
    /// Precedents also accept [`IdParam::Mst`]
    /// (see [`DocumentType::alternate_id_param`]).
    #[must_use]
    pub fn id_param(&self) -> IdParam {
        match self {
            Self::Statute | Self::Ordinance | Self::LegalTerm => IdParam::Mst,
            Self::Precedent
            | Self::ConstitutionalDecision
            | Self::AdministrativeRule
            | Self::Interpretation => IdParam::Id,
        }
    }

    /// Second parameter to try when the primary one yields nothing.
    #[must_use]
    pub fn alternate_id_param(&self) -> Option<IdParam> {
        match self {
            Self::Precedent => Some(IdParam::Mst),
            _ => None,
        }
    }

    /// Root element of a detail response.
    #[must_use]
    pub fn detail_root(&self) -> &'static str {
        match self {
            Self::Statute => "법령",
            Self::Precedent => "PrecService",
            Self::ConstitutionalDecision => "DetcService",
            Self::AdministrativeRule => "AdmRulService",
            Self::Ordinance => "LawService",
            Self::LegalTerm => "LawTermService",
            Self::Interpretation => "ExpcService",
        }
    }

    /// Root element and item element of a search response.
    #[must_use]
    pub fn search_elements(&self) -> (&'static str, &'static str) {
        match self {
            Self::Statute => ("LawSearch", "law"),
            Self::Precedent => ("PrecSearch", "prec"),
            Self::ConstitutionalDecision => ("DetcSearch", "detc"),
            Self::AdministrativeRule => ("AdmRulSearch", "admrul"),
            Self::Ordinance => ("OrdinSearch", "law"),
            Self::LegalTerm => ("LawTermSearch", "lawTerm"),
            Self::Interpretation => ("Expc", "expc"),
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Statute => "Statute",
            Self::Precedent => "Precedent",
            Self::ConstitutionalDecision => "Constitutional Court decision",
            Self::AdministrativeRule => "Administrative rule",
            Self::Ordinance => "Autonomous ordinance",
            Self::LegalTerm => "Legal term",
            Self::Interpretation => "Statutory interpretation",
        }
    }
}

impl FromStr for DocumentType {
    type Err = LawError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.prefix() == s)
            .ok_or_else(|| LawError::UnknownResourceType(s.to_string()))
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Handle naming one document across all document types: `"type:id"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedId {
    pub doc_type: DocumentType,
    pub id: String,
}

impl TypedId {
    pub fn new(doc_type: DocumentType, id: impl Into<String>) -> Self {
        Self {
            doc_type,
            id: id.into(),
        }
    }
}

impl FromStr for TypedId {
    type Err = LawError;

    /// Parse `"type:id"`.
    ///
    /// # Examples
    /// ```
    /// use korean_law::types::{DocumentType, TypedId};
    ///
    /// let typed: TypedId = "prec:228541".parse().unwrap();
    /// assert_eq!(typed.doc_type, DocumentType::Precedent);
    /// assert_eq!(typed.id, "228541");
    /// assert!("228541".parse::<TypedId>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let (prefix, id) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| LawError::InvalidIdFormat(s.to_string()))?;
        let doc_type: DocumentType = prefix.trim().parse()?;
        let id = id.trim();
        validate_document_id(id)?;
        Ok(Self::new(doc_type, id))
    }
}

impl fmt::Display for TypedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.doc_type.prefix(), self.id)
    }
}

/// Strip an optional `statute:` style prefix from a raw identifier.
///
/// # Examples
/// ```
/// use korean_law::types::strip_type_prefix;
///
/// assert_eq!(strip_type_prefix("statute:12345"), "12345");
/// assert_eq!(strip_type_prefix("12345"), "12345");
/// ```
pub fn strip_type_prefix(raw: &str) -> &str {
    raw.rsplit_once(':').map_or(raw, |(_, id)| id).trim()
}

/// Whether an article is a structural heading or an enforceable provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleKind {
    /// Chapter/section heading (`전문`).
    Header,
    /// Substantive provision (`조문`).
    Content,
}

impl ArticleKind {
    /// Parse the `조문여부` flag. Absent or unknown flags count as content.
    #[must_use]
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim() {
            "전문" => Self::Header,
            _ => Self::Content,
        }
    }
}

/// A single article of a statute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Article number, with a branch number joined by `-` (e.g., "20-2").
    pub number: String,

    /// Article title (may be empty).
    pub title: String,

    /// Heading or provision.
    pub kind: ArticleKind,

    /// Formatted lines: the article line, then indented paragraphs and items.
    pub body_lines: Vec<String>,
}

impl Article {
    /// Native label of the article number (e.g., "제20조의2").
    #[must_use]
    pub fn label(&self) -> String {
        article_label(&self.number)
    }

    /// Label with the title in parentheses, when there is one.
    #[must_use]
    pub fn header(&self) -> String {
        if self.title.is_empty() {
            self.label()
        } else {
            format!("{}({})", self.label(), self.title)
        }
    }

    /// All body lines joined.
    #[must_use]
    pub fn full_text(&self) -> String {
        self.body_lines.join("\n")
    }

    #[must_use]
    pub fn is_content(&self) -> bool {
        self.kind == ArticleKind::Content
    }
}

/// Native label for an article number.
///
/// # Examples
/// ```
/// use korean_law::types::article_label;
///
/// assert_eq!(article_label("103"), "제103조");
/// assert_eq!(article_label("20-2"), "제20조의2");
/// ```
pub fn article_label(number: &str) -> String {
    match number.split_once('-') {
        Some((main, branch)) => format!("제{main}조의{branch}"),
        None => format!("제{number}조"),
    }
}

/// Kinds of citations found in legal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Article of the same statute ("제5조").
    InternalArticle,
    /// Article of another statute ("건축법 제11조").
    ExternalStatuteArticle,
    /// Delegation to a subordinate regulation ("대통령령으로 정한다").
    Delegation,
}

/// A citation discovered while resolving one document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,

    /// Byte span of the citation in the scanned text.
    pub span: Range<usize>,

    /// Cited statute name; `None` for internal references.
    pub statute_name: Option<String>,

    /// Cited article number ("20-2" form).
    pub article_no: String,
}

impl Reference {
    pub fn internal(span: Range<usize>, article_no: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::InternalArticle,
            span,
            statute_name: None,
            article_no: article_no.into(),
        }
    }

    pub fn external(
        span: Range<usize>,
        statute_name: impl Into<String>,
        article_no: impl Into<String>,
    ) -> Self {
        Self {
            kind: ReferenceKind::ExternalStatuteArticle,
            span,
            statute_name: Some(statute_name.into()),
            article_no: article_no.into(),
        }
    }

    /// Delegation from Act article `article_no` to the decree `decree_name`.
    pub fn delegation(
        span: Range<usize>,
        decree_name: impl Into<String>,
        article_no: impl Into<String>,
    ) -> Self {
        Self {
            kind: ReferenceKind::Delegation,
            span,
            statute_name: Some(decree_name.into()),
            article_no: article_no.into(),
        }
    }
}

/// Statute search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatuteHit {
    pub name: String,
    pub id: String,
    pub promulgation_date: String,
    pub enforcement_date: String,
    /// `현행` when the statute is currently in force.
    pub status: String,
    /// Statute class, e.g., `법률` (Act) or `대통령령` (decree).
    pub class: String,
}

impl StatuteHit {
    pub fn from_attrs(item: &AttrValue) -> Self {
        Self {
            name: item.field("법령명한글"),
            id: item.field("법령일련번호"),
            promulgation_date: item.field("공포일자"),
            enforcement_date: item.field("시행일자"),
            status: item.field("현행연혁코드"),
            class: item.field("법령구분명"),
        }
    }

    #[must_use]
    pub fn is_current(&self) -> bool {
        self.status == "현행"
    }

    #[must_use]
    pub fn is_act(&self) -> bool {
        self.class == "법률"
    }
}

/// Precedent search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrecedentHit {
    pub name: String,
    pub case_no: String,
    pub id: String,
    pub date: String,
    pub court: String,
}

impl PrecedentHit {
    pub fn from_attrs(item: &AttrValue) -> Self {
        Self {
            name: item.field("사건명"),
            case_no: item.field("사건번호"),
            id: item.field("판례일련번호"),
            date: item.field("선고일자"),
            court: item.field("법원명"),
        }
    }
}

/// Administrative rule search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminRuleHit {
    pub name: String,
    pub id: String,
    pub department: String,
}

impl AdminRuleHit {
    pub fn from_attrs(item: &AttrValue) -> Self {
        Self {
            name: item.field("행정규칙명"),
            id: item.field("행정규칙일련번호"),
            department: item.field("소관부처명"),
        }
    }
}

/// Legal term search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegalTermHit {
    pub name: String,
    pub id: String,
    pub source: String,
}

impl LegalTermHit {
    pub fn from_attrs(item: &AttrValue) -> Self {
        Self {
            name: item.field("법령용어명"),
            id: item.field("법령용어일련번호"),
            source: item.field("출처법령명"),
        }
    }
}

/// Statutory interpretation search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpretationHit {
    pub title: String,
    pub case_no: String,
    pub date: String,
    pub id: String,
}

impl InterpretationHit {
    pub fn from_attrs(item: &AttrValue) -> Self {
        Self {
            title: item.field("안건명"),
            case_no: item.field("안건번호"),
            date: item.field("회신일자"),
            id: item.first_field(&["법령해석례일련번호", "법령해석일련번호"]),
        }
    }
}
