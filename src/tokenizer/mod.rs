// =============================================================================
// tokenizer/mod.rs — Module exports
// =============================================================================

mod constants;
mod core;
mod vocab;

#[cfg(test)]
mod tests;

pub use constants::UNK_TOKEN;
pub use self::core::{Token, Tokenizer};
pub use vocab::Vocabulary;
