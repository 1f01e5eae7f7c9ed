// =============================================================================
// tokenizer/vocab.rs — Append-only vocabulary (text ↔ id)
// =============================================================================

use std::collections::HashMap;

/// Token text → id, ids handed out in first-seen order.
///
/// Append-only: entries are never removed or renumbered, so `len()` only
/// grows and a text resolves to the same id for the lifetime of the value.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    /// Reverse vocabulary: id → text (arena indexed by id).
    texts: Vec<String>,
    /// Forward lookup: text → id.
    ids: HashMap<String, u32>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `text`, assigning the next unused id on first sight.
    /// Returns `(id, newly_inserted)`.
    pub fn resolve(&mut self, text: &str) -> (u32, bool) {
        if let Some(&id) = self.ids.get(text) {
            return (id, false);
        }
        let id = self.texts.len() as u32;
        self.texts.push(text.to_owned());
        self.ids.insert(text.to_owned(), id);
        (id, true)
    }

    /// Read-only lookup.
    pub fn get(&self, text: &str) -> Option<u32> {
        self.ids.get(text).copied()
    }

    pub fn text_of(&self, id: u32) -> Option<&str> {
        self.texts.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Rough heap footprint in bytes.
    pub fn memory_bytes(&self) -> usize {
        let text_mem: usize = self.texts.iter().map(|t| 2 * t.len() + 48).sum();
        text_mem + self.ids.len() * 8
    }
}
