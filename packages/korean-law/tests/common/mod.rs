#![allow(dead_code)]

use std::fs;
use std::path::Path;

use korean_law::{DocumentType, MemorySource};

pub const CIVIL_ACT_ID: &str = "265307";
pub const HIGHER_EDUCATION_ID: &str = "500";

/// Load a test fixture file.
pub fn load_fixture(relative_path: &str) -> String {
    let fixture_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative_path);
    fs::read_to_string(&fixture_path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {e}", fixture_path.display()))
}

/// A statute search response with one current Act per `(id, name)`.
pub fn search_xml(hits: &[(&str, &str)]) -> String {
    let items: String = hits
        .iter()
        .map(|(id, name)| {
            format!(
                "<law><법령일련번호>{id}</법령일련번호><현행연혁코드>현행</현행연혁코드>\
                 <법령명한글>{name}</법령명한글><법령구분명>법률</법령구분명></law>"
            )
        })
        .collect();
    format!("<LawSearch><totalCnt>{}</totalCnt>{items}</LawSearch>", hits.len())
}

/// A statute detail response with one article per `(number, title, content)`.
pub fn statute_xml(name: &str, articles: &[(&str, &str, &str)]) -> String {
    let items: String = articles
        .iter()
        .map(|(number, title, content)| {
            format!(
                "<조문단위><조문번호>{number}</조문번호><조문여부>조문</조문여부>\
                 <조문제목>{title}</조문제목><조문내용>{content}</조문내용></조문단위>"
            )
        })
        .collect();
    format!("<법령><기본정보><법령명_한글>{name}</법령명_한글></기본정보><조문>{items}</조문></법령>")
}

/// Register a single-article statute reachable by name search.
pub fn with_statute(
    source: MemorySource,
    id: &str,
    name: &str,
    article_no: &str,
    content: &str,
) -> MemorySource {
    source
        .with_search(DocumentType::Statute, name, &search_xml(&[(id, name)]))
        .with_document(
            DocumentType::Statute,
            id,
            &statute_xml(name, &[(article_no, "", content)]),
        )
}

/// The Civil Act, with a historical and a current search hit.
pub fn civil_act_source() -> MemorySource {
    MemorySource::new()
        .with_search(DocumentType::Statute, "민법", &load_fixture("civil_act/search.xml"))
        .with_document(
            DocumentType::Statute,
            CIVIL_ACT_ID,
            &load_fixture("civil_act/detail.xml"),
        )
}

/// The Higher Education Act, its enforcement decree and the Lifelong
/// Education Act it cites.
pub fn higher_education_source() -> MemorySource {
    MemorySource::new()
        .with_search(
            DocumentType::Statute,
            "고등교육법",
            &load_fixture("higher_education/search.xml"),
        )
        .with_document(
            DocumentType::Statute,
            HIGHER_EDUCATION_ID,
            &load_fixture("higher_education/detail.xml"),
        )
        .with_search(
            DocumentType::Statute,
            "고등교육법 시행령",
            &load_fixture("higher_education/decree_search.xml"),
        )
        .with_document(
            DocumentType::Statute,
            "501",
            &load_fixture("higher_education/decree.xml"),
        )
        .with_search(
            DocumentType::Statute,
            "평생교육법",
            &load_fixture("lifelong_education/search.xml"),
        )
        .with_document(
            DocumentType::Statute,
            "600",
            &load_fixture("lifelong_education/detail.xml"),
        )
}

/// A precedent citing six distinct statutes, each resolvable.
pub fn precedent_source() -> MemorySource {
    let cited = [
        ("701", "민법", "750", "제750조(불법행위의 내용) 고의 또는 과실로 인한 위법행위로 타인에게 손해를 가한 자는 그 손해를 배상할 책임이 있다."),
        ("702", "상법", "24", "제24조(명의대여자의 책임) 타인에게 자기의 성명 또는 상호를 사용하여 영업을 할 것을 허락한 자는 연대하여 변제할 책임이 있다."),
        ("703", "형법", "347", "제347조(사기) 사람을 기망하여 재물의 교부를 받은 자는 10년 이하의 징역에 처한다."),
        ("704", "근로기준법", "23", "제23조(해고 등의 제한) 사용자는 근로자에게 정당한 이유 없이 해고하지 못한다."),
        ("705", "건축법", "11", "제11조(건축허가) 건축물을 건축하려는 자는 허가를 받아야 한다."),
        ("706", "주택법", "15", "제15조(사업계획의 승인) 주택건설사업을 시행하려는 자는 사업계획승인을 받아야 한다."),
    ];
    cited.iter().fold(
        MemorySource::new().with_document(
            DocumentType::Precedent,
            "228541",
            &load_fixture("documents/precedent.xml"),
        ),
        |source, (id, name, article_no, content)| {
            with_statute(source, id, name, article_no, content)
        },
    )
}
