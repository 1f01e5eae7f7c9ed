// =============================================================================
// model/decoder.rs — Entry projection and embedding-similarity decoder
// =============================================================================
//
// A single generated H×F matrix P bridges the two widths:
//   entry:   h  = P · e          (embedding → hidden, once per token)
//   decode:  y  = Pᵀ · h         (hidden → embedding space)
//            id = argmax_v dot(y, e_v), ties → smallest id
//
// Token embeddings double as output weights, so the output layer grows with
// the vocabulary at no extra cost.
// =============================================================================

use crate::seed::{signed_at, Stream};
use crate::tensor::{dot_f32, matvec_transposed_with, matvec_with, sample_argmax};

use super::embedding::EmbeddingTable;

#[derive(Debug, Clone)]
pub struct Projector {
    hidden_dim: usize,
    embedding_dim: usize,
    /// [hidden_dim × embedding_dim]
    matrix: Vec<f32>,
}

impl Projector {
    pub fn new(hidden_dim: usize, embedding_dim: usize) -> Self {
        let mut matrix = Vec::with_capacity(hidden_dim * embedding_dim);
        for h in 0..hidden_dim as u64 {
            for f in 0..embedding_dim as u64 {
                matrix.push(signed_at(Stream::EntryProjection, &[h, f]));
            }
        }
        Self {
            hidden_dim,
            embedding_dim,
            matrix,
        }
    }

    #[inline]
    fn at(&self, h: usize, f: usize) -> f32 {
        self.matrix[h * self.embedding_dim + f]
    }

    /// Embedding (F) → hidden (H).  Not normalised.
    pub fn project_in(&self, embedding: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0f32; self.hidden_dim];
        matvec_with(&mut out, embedding, |h, f| self.at(h, f));
        out
    }

    /// Hidden (H) → embedding space (F) through the transpose.
    pub fn project_out(&self, hidden: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0f32; self.embedding_dim];
        matvec_transposed_with(&mut out, hidden, |h, f| self.at(h, f));
        out
    }

    /// Similarity logits against every embedding in the table, by id.
    pub fn logits(&self, hidden: &[f32], table: &EmbeddingTable) -> Vec<f32> {
        let query = self.project_out(hidden);
        table.rows().map(|row| dot_f32(&query, row)).collect()
    }

    /// Best-matching vocabulary id; `None` if the table is empty.
    pub fn decode(&self, hidden: &[f32], table: &EmbeddingTable) -> Option<u32> {
        sample_argmax(&self.logits(hidden, table)).map(|id| id as u32)
    }
}
