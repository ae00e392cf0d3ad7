use std::sync::Arc;

use super::*;
use crate::constants::{DOC_NOT_FOUND_ANSWER, WEB_CONTENT_SOURCE};
use crate::llm::MockGenerator;
use crate::scoring::Passage;

fn long_text(words: usize) -> String {
    (0..words)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_chunk_blank_and_short_text() {
    assert!(chunk_text("", 1000, 200).is_empty());
    assert!(chunk_text("   \n ", 1000, 200).is_empty());
    assert_eq!(chunk_text("  short text  ", 10, 2), vec!["short text"]);
}

#[test]
fn test_chunk_long_text_respects_size_and_overlaps() {
    let text = long_text(400);
    let chunks = chunk_text(&text, 200, 50);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 200, "chunk too long: {}", chunk.len());
        assert!(!chunk.starts_with(' ') && !chunk.ends_with(' '));
    }

    for pair in chunks.windows(2) {
        let last_word = pair[0].split_whitespace().last().unwrap();
        assert!(
            pair[1].contains(last_word),
            "expected overlap of '{}' into next chunk",
            last_word
        );
    }

    assert!(chunks[0].starts_with("word0 "));
    assert!(chunks.last().unwrap().ends_with("word399"));
}

#[test]
fn test_chunk_never_splits_words() {
    let text = long_text(300);
    for chunk in chunk_text(&text, 150, 40) {
        for word in chunk.split_whitespace() {
            assert!(word.starts_with("word"), "split word: {}", word);
            assert!(word[4..].parse::<usize>().is_ok(), "split word: {}", word);
        }
    }
}

#[test]
fn test_format_with_citations() {
    let passages = vec![
        Passage::new("a".repeat(80), "sds.pdf"),
        Passage::new("short", "notes.md"),
    ];
    let formatted = format_with_citations("It is 42.", &passages);

    let expected = format!(
        "Answer: It is 42.\n\nCitations:\n[Doc 1] (sds.pdf): {}...\n[Doc 2] (notes.md): short...",
        "a".repeat(50)
    );
    assert_eq!(formatted, expected);
    assert_eq!(format_with_citations("plain", &[]), "plain");
}

#[test]
fn test_index_add_document_and_sources() {
    let index = InMemoryPassageIndex::new(200, 50);
    assert!(index.is_empty());

    assert_eq!(index.add_document("a.txt", "tiny").unwrap(), 1);
    let added = index.add_document("b.txt", &long_text(200)).unwrap();
    assert!(added > 1);
    index.add_web_content("from the web").unwrap();

    assert_eq!(index.passage_count(), 1 + added + 1);
    assert_eq!(
        index.sources(),
        vec!["a.txt".to_string(), "b.txt".to_string(), WEB_CONTENT_SOURCE.to_string()]
    );

    let err = index.add_document("c.txt", "   ").unwrap_err();
    assert!(matches!(err, RetrievalError::EmptyDocument { .. }));

    index.clear();
    assert!(index.is_empty());
}

#[tokio::test]
async fn test_index_search_prefers_overlapping_passages() {
    let index = InMemoryPassageIndex::default();
    index.add_document("a.txt", "the boiling point of water").unwrap();
    index.add_document("b.txt", "acetone flash point is minus twenty").unwrap();
    index.add_document("c.txt", "unrelated gardening notes").unwrap();

    let hits = index
        .search("acetone flash point", &CorpusSelector::all(), 2)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].source, "b.txt");
    assert_eq!(hits[1].source, "a.txt");
}

#[tokio::test]
async fn test_load_dir_indexes_text_files_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("guide.md"), "markdown guide content").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "plain notes content").unwrap();
    std::fs::write(dir.path().join("image.png"), [0_u8, 1, 2]).unwrap();
    std::fs::write(dir.path().join("empty.txt"), "   ").unwrap();
    std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

    let index = InMemoryPassageIndex::default();
    let loaded = index.load_dir(dir.path()).await.unwrap();

    assert_eq!(loaded, 2);
    assert_eq!(index.sources(), vec!["guide.md".to_string(), "notes.txt".to_string()]);
}

#[tokio::test]
async fn test_load_dir_missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let index = InMemoryPassageIndex::default();
    let loaded = index.load_dir(&dir.path().join("absent")).await.unwrap();
    assert_eq!(loaded, 0);
    assert!(index.is_empty());
}

fn seeded_index() -> Arc<InMemoryPassageIndex> {
    let index = InMemoryPassageIndex::default();
    index
        .add_document("acetone.pdf", "acetone flash point is minus twenty degrees")
        .unwrap();
    index
        .add_document("ethanol.pdf", "ethanol flash point is thirteen degrees")
        .unwrap();
    Arc::new(index)
}

#[tokio::test]
async fn test_corpus_candidates_filters_by_selector() {
    let index = seeded_index();

    let all = corpus_candidates(index.as_ref(), "flash point", &CorpusSelector::all(), 5)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let only = corpus_candidates(
        index.as_ref(),
        "flash point",
        &CorpusSelector::new(["uploads/ethanol.pdf"]),
        5,
    )
    .await
    .unwrap();
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].source, "ethanol.pdf");
}

fn crowded_index() -> Arc<InMemoryPassageIndex> {
    let index = InMemoryPassageIndex::default();
    for i in 0..5 {
        index
            .add_document(
                &format!("other{}.txt", i),
                "flash point flash point flash point ratings for solvents",
            )
            .unwrap();
    }
    index
        .add_document("target.txt", "the flash point is listed on the label")
        .unwrap();
    Arc::new(index)
}

#[tokio::test]
async fn test_search_scopes_to_corpus_before_top_k() {
    let index = crowded_index();
    let target = CorpusSelector::new(["target.txt"]);

    let global = index.search("flash point", &CorpusSelector::all(), 3).await.unwrap();
    assert!(global.iter().all(|p| p.source != "target.txt"));

    let scoped = index.search("flash point", &target, 3).await.unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].source, "target.txt");

    let candidates = corpus_candidates(index.as_ref(), "flash point", &target, 3)
        .await
        .unwrap();
    assert_eq!(candidates.len(), 1);
}

#[tokio::test]
async fn test_retriever_finds_outranked_corpus() {
    let generator = Arc::new(MockGenerator::fixed("On the label."));
    let retriever = CorpusRetriever::new(crowded_index(), generator.clone()).with_search_k(3);

    let answer = retriever
        .retrieve("flash point", &CorpusSelector::new(["target.txt"]))
        .await
        .unwrap();

    assert_ne!(answer.answer, DOC_NOT_FOUND_ANSWER);
    assert!(answer.confidence > 0.0);
    assert_eq!(answer.metadata.sources, vec!["target.txt".to_string()]);
    assert_eq!(generator.prompts().len(), 1);
}

#[tokio::test]
async fn test_retriever_answers_with_citations_and_confidence() {
    let generator = Arc::new(MockGenerator::fixed("Minus twenty degrees."));
    let retriever = CorpusRetriever::new(seeded_index(), generator.clone());

    let answer = retriever
        .retrieve("acetone flash point", &CorpusSelector::new(["acetone.pdf"]))
        .await
        .unwrap();

    assert!(answer.answer.starts_with("Answer: Minus twenty degrees.\n\nCitations:\n[Doc 1] (acetone.pdf): "));
    assert!(answer.confidence > 0.0 && answer.confidence < 1.0);
    assert_eq!(answer.passages.len(), 1);
    assert_eq!(answer.metadata.sources, vec!["acetone.pdf".to_string()]);
    assert_eq!(answer.metadata.candidates, 1);
    assert!(!answer.is_degraded());

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("acetone flash point is minus twenty degrees"));
    assert!(!prompts[0].contains("ethanol"));
}

#[tokio::test]
async fn test_retriever_empty_corpus_is_not_present() {
    let generator = Arc::new(MockGenerator::fixed("unused"));
    let retriever = CorpusRetriever::new(seeded_index(), generator.clone());

    let answer = retriever
        .retrieve("flash point", &CorpusSelector::new(["missing.pdf"]))
        .await
        .unwrap();

    assert_eq!(answer.answer, DOC_NOT_FOUND_ANSWER);
    assert_eq!(answer.confidence, 0.0);
    assert!(answer.passages.is_empty());
    assert!(!answer.is_degraded());
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_retriever_generation_failure_degrades() {
    let generator = Arc::new(MockGenerator::failing("provider down"));
    let retriever = CorpusRetriever::new(seeded_index(), generator);

    let answer = retriever
        .retrieve("acetone flash point", &CorpusSelector::all())
        .await
        .unwrap();

    assert_eq!(answer.answer, DOC_NOT_FOUND_ANSWER);
    assert_eq!(answer.confidence, 0.0);
    assert!(answer.is_degraded());
    assert!(!answer.passages.is_empty());
}

#[tokio::test]
async fn test_retriever_has_documents_tracks_index() {
    let index = Arc::new(InMemoryPassageIndex::default());
    let retriever = CorpusRetriever::new(index.clone(), Arc::new(MockGenerator::echo()));
    assert!(!retriever.has_documents());

    index.add_document("a.txt", "content").unwrap();
    assert!(retriever.has_documents());
}

#[tokio::test]
async fn test_mock_retriever_records_corpus() {
    let mock = MockRetriever::with_confidence("answer", 0.9);
    let corpus = CorpusSelector::new(["b.pdf", "a.pdf"]);
    let answer = mock.retrieve("q", &corpus).await.unwrap();

    assert_eq!(answer.answer, "answer");
    assert_eq!(answer.confidence, 0.9);
    assert_eq!(mock.call_count(), 1);
    assert_eq!(mock.last_corpus(), Some(corpus));

    assert!(MockRetriever::failing().retrieve("q", &CorpusSelector::all()).await.is_err());
    assert!(!MockRetriever::empty().has_documents());
}
