// =============================================================================
// model/engine.rs — Run orchestrator: tokenize → route → decode
// =============================================================================
//
// Context policy: the hidden state CARRIES OVER between tokens.
//
//   token 0 enters with   h = rescale(P·e₀)
//   token t enters with   h = rescale(exit_{t−1} + P·e_t)
//
// so token t's routing depends on every token before it, and the state
// decoded at the end has seen the whole prompt.  An empty prompt decodes the
// zero state.
//
// Locking: the token table (vocabulary + embeddings) is the only shared
// mutable state.  It is write-locked while a prompt is tokenized and
// embedded, read-locked while decoding, and not held at all while the layer
// stack runs; gates and experts are pure functions of their seeds.
// Admission and decoding take the lock separately, so a concurrent run may
// add words in between and two identical concurrent runs can predict
// different tokens.  Traces are unaffected.
// =============================================================================

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::tensor::{axpy, rescale_to_norm, residual_norm};
use crate::tokenizer::{Token, Tokenizer, Vocabulary, UNK_TOKEN};

use super::config::SparseConfig;
use super::decoder::Projector;
use super::embedding::EmbeddingTable;
use super::error::Result;
use super::layer::LayerStack;
use super::state::RoutingStats;
use super::trace::{ArchitectureDescription, SparseRunResult, TokenTrace};

/// Vocabulary and embeddings grow together, one row per id.
#[derive(Debug)]
struct TokenTable {
    vocab: Vocabulary,
    embeddings: EmbeddingTable,
}

pub struct SparseEngine {
    config: SparseConfig,
    tokenizer: Tokenizer,
    projector: Projector,
    stack: LayerStack,
    table: RwLock<TokenTable>,
    stats: Mutex<RoutingStats>,
}

impl SparseEngine {
    /// Validate `config` and build the engine.  Gates and the entry
    /// projection are generated here; experts are generated on demand.
    pub fn new(config: SparseConfig) -> Result<Self> {
        config.validate()?;
        let engine = Self::build(config);

        info!(
            layers = config.layers,
            neurons_per_layer = config.neurons_per_layer,
            top_k = config.top_k,
            hidden_dim = config.hidden_dim,
            embedding_dim = config.embedding_dim,
            params = config.param_count(),
            sparsity = config.sparsity(),
            "sparse engine ready"
        );
        Ok(engine)
    }

    /// Engine with the default architecture (always valid).
    pub fn with_defaults() -> Self {
        Self::build(SparseConfig::default())
    }

    fn build(config: SparseConfig) -> Self {
        Self {
            config,
            tokenizer: Tokenizer::new(),
            projector: Projector::new(config.hidden_dim, config.embedding_dim),
            stack: LayerStack::new(&config),
            table: RwLock::new(TokenTable {
                vocab: Vocabulary::new(),
                embeddings: EmbeddingTable::new(config.embedding_dim),
            }),
            stats: Mutex::new(RoutingStats::new(&config)),
        }
    }

    // -----------------------------------------------------------------------
    // run / describe
    // -----------------------------------------------------------------------

    /// Route every token of `prompt` through the layer stack and predict the
    /// next token.  Whitespace-only prompts yield no traces.
    pub fn run(&self, prompt: &str) -> SparseRunResult {
        let (tokens, embeddings) = self.admit(prompt);

        let hidden_dim = self.config.hidden_dim;
        let target = residual_norm(hidden_dim);
        let mut hidden = vec![0.0f32; hidden_dim];
        let mut token_traces = Vec::with_capacity(tokens.len());

        for (token, embedding) in tokens.into_iter().zip(&embeddings) {
            let entry = self.projector.project_in(embedding);
            axpy(&mut hidden, 1.0, &entry);
            rescale_to_norm(&mut hidden, target);

            let layers = self.stack.forward(&mut hidden);
            token_traces.push(TokenTrace {
                token: token.text,
                token_index: token.index,
                layers,
            });
        }

        let predicted_token = self.decode(&hidden);
        debug!(
            tokens = token_traces.len(),
            predicted = %predicted_token,
            "run complete"
        );

        self.stats.lock().record(&token_traces);

        SparseRunResult {
            predicted_token,
            token_traces,
        }
    }

    /// Configuration plus current vocabulary size.  No side effects.
    pub fn describe(&self) -> ArchitectureDescription {
        ArchitectureDescription::new(&self.config, self.vocabulary_size())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Tokenize and embed under the write lock; returns owned copies so the
    /// lock is released before any routing happens.
    fn admit(&self, prompt: &str) -> (Vec<Token>, Vec<Vec<f32>>) {
        let mut guard = self.table.write();
        let table = &mut *guard;

        let known = table.vocab.len();
        let tokens = self.tokenizer.encode(prompt, &mut table.vocab);
        let embeddings = tokens
            .iter()
            .map(|t| table.embeddings.embedding_of(t.vocabulary_id).to_vec())
            .collect();

        debug!(
            tokens = tokens.len(),
            new_vocabulary = table.vocab.len() - known,
            vocabulary = table.vocab.len(),
            "prompt admitted"
        );
        (tokens, embeddings)
    }

    fn decode(&self, hidden: &[f32]) -> String {
        let table = self.table.read();
        self.projector
            .decode(hidden, &table.embeddings)
            .and_then(|id| table.vocab.text_of(id))
            .unwrap_or(UNK_TOKEN)
            .to_owned()
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &SparseConfig {
        &self.config
    }

    pub fn vocabulary_size(&self) -> usize {
        self.table.read().vocab.len()
    }

    /// Vocabulary id for `text`, if it has been seen.
    pub fn vocabulary_id(&self, text: &str) -> Option<u32> {
        self.table.read().vocab.get(text)
    }

    /// Snapshot of cumulative routing statistics.
    pub fn routing_stats(&self) -> RoutingStats {
        self.stats.lock().clone()
    }

    pub fn reset_stats(&self) {
        self.stats.lock().reset();
    }

    pub fn sparse_stats_report(&self) -> String {
        self.stats.lock().report()
    }

    /// Approximate bytes held by the token table.
    pub fn memory_bytes(&self) -> usize {
        let table = self.table.read();
        table.vocab.memory_bytes() + table.embeddings.memory_bytes()
    }
}

impl Default for SparseEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
