use super::*;

#[test]
fn test_query_class_round_trip_names() {
    for class in [QueryClass::Document, QueryClass::Sql, QueryClass::Web] {
        assert_eq!(class.as_str().parse::<QueryClass>(), Ok(class));
        assert_eq!(class.to_string(), class.as_str());
    }
}

#[test]
fn test_query_class_rejects_unknown() {
    let err = "vector".parse::<QueryClass>().unwrap_err();
    assert_eq!(err, UnknownQueryClass("vector".to_string()));
    assert!(err.to_string().contains("vector"));

    assert!("Document".parse::<QueryClass>().is_err());
    assert!("".parse::<QueryClass>().is_err());
}

#[test]
fn test_corpus_selector_normalizes_paths() {
    let selector = CorpusSelector::new(["data/b.pdf", "/abs/path/a.pdf", "a.pdf", "  "]);
    assert_eq!(selector.iter().collect::<Vec<_>>(), vec!["a.pdf", "b.pdf"]);
    assert_eq!(selector.joined(), "a.pdf,b.pdf");
}

#[test]
fn test_corpus_selector_keeps_urls() {
    let selector = CorpusSelector::new(["https://example.com/sds/acetone"]);
    assert!(selector.matches("https://example.com/sds/acetone"));
    assert!(!selector.matches("acetone"));
}

#[test]
fn test_corpus_selector_order_independent() {
    let a = CorpusSelector::new(["a.pdf", "b.pdf"]);
    let b = CorpusSelector::new(["b.pdf", "a.pdf", "b.pdf"]);
    assert_eq!(a, b);
    assert_eq!(b.len(), 2);
}

#[test]
fn test_corpus_selector_all_matches_everything() {
    let all = CorpusSelector::all();
    assert!(all.is_all());
    assert!(all.matches("anything.docx"));

    let scoped = CorpusSelector::new(["a.pdf"]);
    assert!(scoped.matches("a.pdf"));
    assert!(!scoped.matches("b.pdf"));
}

#[test]
fn test_corpus_selector_serde_as_list() {
    let selector: CorpusSelector = serde_json::from_str(r#"["z.pdf","data/a.pdf"]"#).unwrap();
    assert_eq!(selector.joined(), "a.pdf,z.pdf");
    assert_eq!(
        serde_json::to_string(&selector).unwrap(),
        r#"["a.pdf","z.pdf"]"#
    );
}

#[test]
fn test_is_web_source() {
    assert!(is_web_source("https://example.com/sds/acetone"));
    assert!(!is_web_source("uploads/acetone.pdf"));
    assert!(!is_web_source("web_content"));
}
