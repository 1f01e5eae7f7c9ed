// =============================================================================
// tokenizer/core.rs — Whitespace tokenizer
// =============================================================================

use serde::Serialize;

use super::vocab::Vocabulary;

/// One prompt token: its text, position, and vocabulary id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub text: String,
    pub index: usize,
    pub vocabulary_id: u32,
}

/// Simple whitespace segmentation.  Casing and attached punctuation are kept
/// ("Hello," stays "Hello,"); this is not linguistic tokenization.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer
    }

    /// Split on runs of Unicode whitespace.  Never yields empty pieces.
    pub fn segment<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.split_whitespace()
    }

    /// Segment `text` and resolve every piece against `vocab`, extending it
    /// with first-seen strings.
    pub fn encode(&self, text: &str, vocab: &mut Vocabulary) -> Vec<Token> {
        self.segment(text)
            .enumerate()
            .map(|(index, piece)| {
                let (vocabulary_id, _) = vocab.resolve(piece);
                Token {
                    text: piece.to_owned(),
                    index,
                    vocabulary_id,
                }
            })
            .collect()
    }
}
