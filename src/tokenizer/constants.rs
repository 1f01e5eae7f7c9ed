// =============================================================================
// tokenizer/constants.rs — Token constants
// =============================================================================
//
// Vocabulary layout:
//   0..n  = token strings in first-seen order (no reserved ids)
//
// The sentinel below is never inserted into the vocabulary; it is only
// reported when there is nothing to decode against.
// =============================================================================

pub const UNK_TOKEN: &str = "<unk>";
