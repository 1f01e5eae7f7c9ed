// =============================================================================
// model/embedding.rs — Lazily materialised embedding arena
// =============================================================================

use crate::seed::{signed_at, Stream};

/// Vector of `dim` floats per vocabulary id, stored contiguously.
///
/// Vocabulary ids are dense (0, 1, 2, …), so row `id` lives at
/// `data[id * dim..(id + 1) * dim]` and a miss on `id` materialises every
/// missing row up to and including it.  Rows are never invalidated.
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    dim: usize,
    data: Vec<f32>,
}

impl EmbeddingTable {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }

    /// Cached embedding for `id`, synthesising it on first reference.
    pub fn embedding_of(&mut self, id: u32) -> &[f32] {
        let id = id as usize;
        while self.len() <= id {
            let next = self.len() as u64;
            self.data.extend(synthesize(next, self.dim));
        }
        &self.data[id * self.dim..(id + 1) * self.dim]
    }

    /// Read-only lookup; `None` if `id` has not been materialised yet.
    pub fn get(&self, id: u32) -> Option<&[f32]> {
        let start = id as usize * self.dim;
        self.data.get(start..start + self.dim)
    }

    /// Rows in id order.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dim)
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn memory_bytes(&self) -> usize {
        self.data.len() * 4
    }
}

/// Seed path `(id, dimension)`, one generator call per dimension.
fn synthesize(id: u64, dim: usize) -> impl Iterator<Item = f32> {
    (0..dim as u64).map(move |d| signed_at(Stream::Embedding, &[id, d]))
}
