//! End-to-end tests of the text operations over XML fixtures.

mod common;

use common::*;
use korean_law::types::IdParam;
use korean_law::{DocumentType, LawService, MemorySource};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_native_article_query_returns_article_text() {
    let service = LawService::new(civil_act_source());

    let output = service.search("민법 제103조").await;

    assert!(output.starts_with("# 민법 제103조"));
    assert!(output.contains("제103조(반사회질서의 법률행위)"));
    assert!(output.contains("선량한 풍속 기타 사회질서에 위반한 사항을 내용으로 하는 법률행위는 무효로 한다."));
    assert_eq!(output.matches("제103조(반사회질서의 법률행위)").count(), 1);
}

#[tokio::test]
async fn test_english_article_query_resolves_current_statute() {
    let source = civil_act_source();
    let service = LawService::new(source);

    let output = service.search("Civil Act Article 103").await;

    assert!(output.contains("무효로 한다."));
    // The historical hit (100) is listed first; the current one must win.
    let requests = service.source().requests();
    assert!(requests.contains(&format!("fetch statute MST={CIVIL_ACT_ID}")));
    assert!(!requests.contains(&"fetch statute MST=100".to_string()));
}

#[tokio::test]
async fn test_missing_article_is_a_plain_answer() {
    let service = LawService::new(civil_act_source());

    let output = service.search("민법 제9999조").await;

    assert_eq!(output, "Article 9999 not found in 민법.");
}

#[tokio::test]
async fn test_unknown_statute_is_a_plain_answer() {
    let service = LawService::new(MemorySource::new());

    let output = service.search("없는법 제1조").await;

    assert_eq!(output, "No laws found for query: '없는법'");
}

#[tokio::test]
async fn test_lookup_without_article_lists_table_of_contents() {
    let service = LawService::new(civil_act_source());

    let output = service.lookup("민법").await;

    assert!(output.starts_with("# 민법"));
    assert!(output.contains("Enforcement Date: 2025-01-31"));
    assert!(output.contains("- 제1조: 법원"));
    assert!(output.contains("- 제104조: 불공정한 법률행위"));
    assert!(!output.contains("more articles"));
}

#[tokio::test]
async fn test_integrated_search_without_matches() {
    let service = LawService::new(MemorySource::new());

    let output = service.search("존재하지않는검색어").await;

    assert!(output.starts_with("# Integrated Search Results for '존재하지않는검색어'"));
    assert_eq!(output.matches("(No results)").count(), 3);
}

#[tokio::test]
async fn test_read_resource_rejects_malformed_ids() {
    let service = LawService::new(MemorySource::new());

    let no_colon = service.read_resource("12345").await;
    assert!(no_colon.starts_with("Error: Invalid ID format"));

    let unknown = service.read_resource("alien:1").await;
    assert!(unknown.starts_with("Error: Unknown resource type"));

    // Neither reaches the source.
    assert!(service.source().requests().is_empty());
}

#[tokio::test]
async fn test_precedent_reference_resolution_is_bounded() {
    let service = LawService::new(precedent_source());

    let output = service.read_resource("prec:228541").await;

    assert!(output.starts_with("# 손해배상(기)"));
    assert!(output.contains("**Case No:** 2019다12345"));
    assert!(output.contains("**Date:** 2020-05-14"));
    assert!(output.contains("원고 <주식회사>"));
    assert!(output.contains("## Referenced Articles"));
    assert_eq!(output.matches("### [External]").count(), 5);
    assert!(output.contains("### [External] 민법 제750조"));
    assert!(output.contains("### [External] 건축법 제11조"));
    assert!(!output.contains("### [External] 주택법 제15조"));
    assert!(output.contains("(Note: 6 external references found"));
}

#[tokio::test]
async fn test_precedent_falls_back_to_mst() {
    let source = MemorySource::new().with_document_at(
        DocumentType::Precedent,
        IdParam::Mst,
        "777",
        &load_fixture("documents/precedent.xml"),
    );
    let service = LawService::new(source);

    let output = service.read_resource("prec:777").await;

    assert!(output.starts_with("# 손해배상(기)"));
    assert_eq!(
        service.source().requests()[..2].to_vec(),
        vec!["fetch prec ID=777".to_string(), "fetch prec MST=777".to_string()]
    );
}

#[tokio::test]
async fn test_precedent_falls_back_to_constitutional_decision() {
    let source = MemorySource::new().with_document(
        DocumentType::ConstitutionalDecision,
        "888",
        &load_fixture("documents/decision.xml"),
    );
    let service = LawService::new(source);

    let output = service.read_resource("prec:888").await;

    assert!(output.starts_with("# 형법 제241조 위헌소원"));
    assert!(output.contains("**Type:** 헌바"));
    assert!(output.contains("**Date:** 2015-02-26"));
    assert!(output.contains("형법 제241조는 헌법에 위반된다."));
    assert!(service
        .source()
        .requests()
        .contains(&"fetch const ID=888".to_string()));
}

#[tokio::test]
async fn test_precedent_fallback_exhausted_reports_primary_error() {
    let service = LawService::new(MemorySource::new());

    let output = service.read_resource("prec:999").await;

    assert_eq!(output, "Error: Precedent 999 not found");
    assert_eq!(service.source().requests().len(), 3);
}

#[tokio::test]
async fn test_read_other_document_types() {
    let source = MemorySource::new()
        .with_document(
            DocumentType::AdministrativeRule,
            "2100000012345",
            &load_fixture("documents/admin_rule.xml"),
        )
        .with_document(
            DocumentType::Ordinance,
            "1100",
            &load_fixture("documents/ordinance.xml"),
        )
        .with_document(
            DocumentType::LegalTerm,
            "4350",
            &load_fixture("documents/legal_term.xml"),
        )
        .with_document(
            DocumentType::Interpretation,
            "313107",
            &load_fixture("documents/interpretation.xml"),
        );
    let service = LawService::new(source);

    let rule = service.read_resource("admrul:2100000012345").await;
    assert!(rule.starts_with("# 학교폭력 사안처리 가이드북 운영 지침 (교육부)"));
    assert!(rule.contains("제1조(목적) 이 지침은"));
    assert!(rule.contains("제2조(적용범위)"));

    let ordinance = service.read_resource("ordin:1100").await;
    assert!(ordinance.starts_with("# 서울특별시 청소년 보호 조례 (서울특별시)"));
    assert!(ordinance.contains("제1조(목적) 이 조례는 청소년 보호에"));

    let term = service.read_resource("term:4350").await;
    assert!(term.starts_with("# 선의"));
    assert!(term.contains("**Source:** 민법"));
    assert!(term.contains("어떤 사실을 알지 못하는 것.\n도덕적 평가와는 관계가 없다."));

    let interpretation = service.read_resource("interp:313107").await;
    assert!(interpretation.contains("**Case No:** 21-0123"));
    assert!(interpretation.contains("## 회답 (Answer)\n나눌 수 있습니다."));
}

#[tokio::test]
async fn test_read_article_accepts_prefixed_id_and_branch_forms() {
    let service = LawService::new(civil_act_source());

    let found = service.read_article("statute:265307", "제103조").await;
    assert!(found.starts_with("# 민법 제103조"));

    let missing = service.read_article(CIVIL_ACT_ID, "20-2").await;
    assert_eq!(missing, "Article 20-2 not found in 민법.");
}

#[tokio::test]
async fn test_chain_with_references_and_delegation() {
    let service = LawService::new(higher_education_source());

    let output = service.explore_chain("고등교육법 제20조").await;

    assert!(output.starts_with("# Legal Chain Analysis: 고등교육법 제20조"));
    assert!(output.contains("## 1. Main Provision"));
    assert!(output.contains("② 학기ㆍ수업일수 및 휴업일 등에 관하여 필요한 사항은 대통령령으로 정한다."));

    assert!(output.contains("### [Internal] 제21조\n제21조(교육과정의 운영)"));
    assert!(output.contains("### [External] 평생교육법 제31조\n제31조(학력인정 평생교육시설)"));
    assert!(!output.contains("(Note:"));

    assert!(output.contains("## Delegated Legislation (고등교육법 시행령)"));
    assert_eq!(output.matches("### 제1").count(), 1);
    assert!(output.contains("### 제11조(학기)"));
    assert!(!output.contains("제12조(수업연한)"));
    assert!(!output.contains("제13조(학점의 인정)"));

    // The enforcement rule listed first in the decree search is never loaded.
    assert!(!service
        .source()
        .requests()
        .contains(&"fetch statute MST=502".to_string()));
}

#[tokio::test]
async fn test_chain_accepts_suffixed_article_number() {
    let service = LawService::new(higher_education_source());

    let output = service.explore_chain("고등교육법 20조").await;

    assert!(output.starts_with("# Legal Chain Analysis: 고등교육법 제20조"));
    assert!(output.contains("### [Internal] 제21조"));
}

#[tokio::test]
async fn test_chain_delegation_without_matching_decree_article() {
    let service = LawService::new(higher_education_source());

    let output = service.explore_chain("고등교육법 제21조").await;

    assert!(output.contains("제21조(교육과정의 운영)"));
    assert!(!output.contains("## Referenced Articles"));
    assert!(output.contains("## Delegated Legislation (고등교육법 시행령)"));
    assert!(output.contains("(No specific article found referencing Act 제21조.)"));
}

#[tokio::test]
async fn test_chain_requires_article_and_known_statute() {
    let service = LawService::new(MemorySource::new());

    let no_article = service.explore_chain("고등교육법").await;
    assert!(no_article.starts_with("Please provide a specific article"));

    let unknown = service.explore_chain("없는법 제1조").await;
    assert_eq!(unknown, "Could not find law: 없는법");
}

#[tokio::test]
async fn test_search_articles_by_keywords() {
    let service = LawService::new(civil_act_source());

    let output = service.search_articles("statute:265307", "법률행위 무효").await;

    assert!(output.starts_with("# 민법 - Search Results for '법률행위 무효'"));
    assert!(output.contains("Found 2 matching articles."));
    assert!(output.contains("## 제103조(반사회질서의 법률행위)"));
    assert!(output.contains("## 제104조(불공정한 법률행위)"));
    assert!(!output.contains("## 제1조(법원)"));

    let none = service.search_articles(CIVIL_ACT_ID, "우주항공").await;
    assert_eq!(none, "# 민법\n\nNo articles found matching keywords: '우주항공'");
}

#[tokio::test]
async fn test_attachments_and_history() {
    let service = LawService::new(civil_act_source());

    let attachments = service.attachments(CIVIL_ACT_ID).await;
    assert!(attachments.starts_with("# 민법 - Attached Files"));
    assert!(attachments.contains("[별표 0001] 법정이율 산정기준"));

    let history = service.law_history("statute:265307").await;
    assert!(history.starts_with("# 민법 연혁 정보"));
    assert!(history.contains("- **제개정구분**: 일부개정"));
    assert!(history.contains("- **공포일자**: 2024-09-17"));
    assert!(history.contains("- **공포번호**: 20432"));
    assert!(history.contains("민법 일부를 다음과 같이 개정한다.\n제1조 중"));
    assert!(history.contains("lsiSeq=265307"));
}

#[tokio::test]
async fn test_old_new_comparison() {
    let service = LawService::new(civil_act_source());

    let output = service.old_new_comparison("statute:265307").await;

    assert!(output.starts_with("# 민법 신구조문대비"));
    assert!(output.contains("## 최근 개정 내용\n- **제개정구분**: 일부개정\n- **시행일자**: 2025-01-31"));
    assert!(output.contains("### 개정문\n```\n민법 일부를 다음과 같이 개정한다.\n제1조 중"));
    assert!(output.contains("(https://www.law.go.kr/lsScLsComp.do?lsiSeq=265307)"));

    let missing = LawService::new(MemorySource::new()).old_new_comparison("1").await;
    assert_eq!(missing, "Error: Statute 1 not found");
}

#[tokio::test]
async fn test_term_and_interpretation_searches() {
    let source = MemorySource::new()
        .with_search(
            DocumentType::LegalTerm,
            "선의",
            &load_fixture("documents/term_search.xml"),
        )
        .with_search(
            DocumentType::Interpretation,
            "학기",
            &load_fixture("documents/interpretation_search.xml"),
        );
    let service = LawService::new(source);

    let terms = service.search_terms("선의").await;
    assert!(terms.contains("- **선의** (Source: 민법) [ID: term:4350]"));

    let interpretations = service.search_interpretations("학기").await;
    assert!(interpretations
        .contains("- **학교의 학기 구분에 관한 질의** (No: 21-0123, Date: 2021-06-10) [ID: interp:313107]"));

    assert_eq!(service.search_terms("악의").await, "No legal terms found.");
}

#[tokio::test]
async fn test_plain_statute_search() {
    let service = LawService::new(civil_act_source());

    let output = service.search_statutes("민법").await;

    assert_eq!(
        output,
        "ID: statute:100 | Name: 민법 | Date: 2022-12-27\nID: statute:265307 | Name: 민법 | Date: 2024-09-17"
    );
}
