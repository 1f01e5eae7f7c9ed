// =============================================================================
// tokenizer/tests.rs — Tokenizer unit tests
// =============================================================================

use super::{Tokenizer, Vocabulary};

#[test]
fn test_whitespace_encode() {
    let tok = Tokenizer::new();
    let mut vocab = Vocabulary::new();
    let text = "Hello World!";
    let tokens = tok.encode(text, &mut vocab);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].text, "Hello");
    assert_eq!(tokens[1].text, "World!");
    let texts: Vec<Option<&str>> = tokens.iter().map(|t| vocab.text_of(t.vocabulary_id)).collect();
    assert_eq!(texts, vec![Some("Hello"), Some("World!")]);
}

#[test]
fn test_empty_string() {
    let tok = Tokenizer::new();
    let mut vocab = Vocabulary::new();
    assert!(tok.encode("", &mut vocab).is_empty());
    assert!(tok.encode(" \t\n  ", &mut vocab).is_empty());
    assert!(vocab.is_empty());
}

#[test]
fn test_runs_of_whitespace_collapse() {
    let tok = Tokenizer::new();
    let pieces: Vec<&str> = tok.segment("  a\t\tb \n c  ").collect();
    assert_eq!(pieces, vec!["a", "b", "c"]);
}

#[test]
fn test_casing_and_punctuation_preserved() {
    let tok = Tokenizer::new();
    let pieces: Vec<&str> = tok.segment("Sparse, routing! sparse").collect();
    assert_eq!(pieces, vec!["Sparse,", "routing!", "sparse"]);
}

#[test]
fn test_token_indices_are_positions() {
    let tok = Tokenizer::new();
    let mut vocab = Vocabulary::new();
    let tokens = tok.encode("x y x", &mut vocab);
    let idx: Vec<usize> = tokens.iter().map(|t| t.index).collect();
    assert_eq!(idx, vec![0, 1, 2]);
}

#[test]
fn test_ids_first_seen_and_reused() {
    let tok = Tokenizer::new();
    let mut vocab = Vocabulary::new();
    let tokens = tok.encode("to be or not to be", &mut vocab);
    let ids: Vec<u32> = tokens.iter().map(|t| t.vocabulary_id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 0, 1]);
    assert_eq!(vocab.len(), 4);
}

#[test]
fn test_vocabulary_monotonic_across_calls() {
    let tok = Tokenizer::new();
    let mut vocab = Vocabulary::new();
    tok.encode("alpha beta", &mut vocab);
    let before = vocab.len();
    let tokens = tok.encode("beta gamma alpha", &mut vocab);
    assert!(vocab.len() >= before);
    assert_eq!(vocab.get("alpha"), Some(0));
    assert_eq!(vocab.get("beta"), Some(1));
    assert_eq!(tokens[1].vocabulary_id, 2); // gamma is new
    assert_eq!(vocab.text_of(2), Some("gamma"));
}

#[test]
fn test_resolve_reports_new_entries() {
    let mut vocab = Vocabulary::new();
    assert_eq!(vocab.resolve("a"), (0, true));
    assert_eq!(vocab.resolve("a"), (0, false));
    assert_eq!(vocab.resolve("b"), (1, true));
    assert!(vocab.memory_bytes() > 0);
}
