// =============================================================================
// lib.rs — Deterministic sparse mixture-of-experts simulator
// =============================================================================
//
// Modules:
//   seed       seed path → reproducible float (every weight comes from here)
//   tensor     scalar kernels: dot, generated matvec, softmax/top-k, rescale
//   tokenizer  whitespace tokenizer + append-only vocabulary
//   model      embeddings, gating, experts, layer stack, decoder, engine
//
//   let engine = SparseEngine::with_defaults();
//   let result = engine.run("route tokens to only the neurons they need");
//   println!("{}", result.predicted_token);
// =============================================================================

pub mod model;
pub mod seed;
pub mod tensor;
pub mod tokenizer;

pub use model::{
    ArchitectureDescription, ConfigError, LayerTrace, RoutingStats, SelectedNeuron, SparseConfig,
    SparseEngine, SparseRunResult, TokenTrace, DEFAULT_PROMPT,
};
