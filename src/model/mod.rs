// =============================================================================
// model/mod.rs — Deterministic sparse mixture-of-experts simulator
// =============================================================================
//
// Pipeline per prompt:
//   whitespace tokens → vocabulary ids → generated embeddings (F)
//   → entry projection (H) → N × [gate → top-k experts → residual + rescale]
//   → tied projection back to F → nearest vocabulary embedding
//
// Default architecture: layers=4, neurons=16/layer, top_k=4, H=32, F=32
//
// No weight file exists.  Every gate, bias, expert weight and embedding is a
// pure function of a seed path (see seed.rs), so two engines built from the
// same configuration route and predict identically.  Expert weights are never
// stored; un-selected neurons cost nothing.
// =============================================================================

pub mod config;
pub mod constants;
pub mod decoder;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod experts;
pub mod gating;
pub mod layer;
pub mod state;
pub mod trace;

// Re-export main public APIs
pub use config::SparseConfig;
pub use constants::*;
pub use engine::SparseEngine;
pub use error::{ConfigError, Result};
pub use state::RoutingStats;
pub use trace::{ArchitectureDescription, LayerTrace, SelectedNeuron, SparseRunResult, TokenTrace};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::UNK_TOKEN;

    fn test_config() -> SparseConfig {
        // Small config for fast tests
        SparseConfig {
            layers: 3,
            neurons_per_layer: 8,
            top_k: 2,
            hidden_dim: 16,
            embedding_dim: 12,
        }
    }

    fn engine() -> SparseEngine {
        SparseEngine::new(test_config()).expect("valid config")
    }

    #[test]
    fn test_default_describe() {
        let engine = SparseEngine::with_defaults();
        let d = engine.describe();
        assert_eq!(d.layers, 4);
        assert_eq!(d.neurons_per_layer, 16);
        assert_eq!(d.top_k, 4);
        assert_eq!(d.hidden_dim, 32);
        assert_eq!(d.embedding_dim, 32);
        assert_eq!(d.vocabulary, 0);
    }

    #[test]
    fn test_describe_is_pure() {
        let engine = engine();
        engine.run("a b c");
        let first = engine.describe();
        let second = engine.describe();
        assert_eq!(first, second);
        assert_eq!(first.vocabulary, 3);
        assert_eq!(engine.routing_stats().runs, 1);
    }

    #[test]
    fn test_run_shape_and_sparsity() {
        let cfg = test_config();
        let engine = engine();
        let result = engine.run("the quick brown fox");
        assert_eq!(result.token_traces.len(), 4);
        for (i, t) in result.token_traces.iter().enumerate() {
            assert_eq!(t.token_index, i);
            assert_eq!(t.layers.len(), cfg.layers);
            for (l, layer) in t.layers.iter().enumerate() {
                assert_eq!(layer.layer_index, l);
                assert_eq!(layer.selected.len(), cfg.top_k);
                assert!((layer.weight_sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE);
                let mut ids = layer.neuron_ids();
                assert!(ids.iter().all(|&id| id < cfg.neurons_per_layer));
                ids.sort_unstable();
                ids.dedup();
                assert_eq!(ids.len(), cfg.top_k);
                for w in layer.selected.windows(2) {
                    assert!(w[0].weight >= w[1].weight);
                }
            }
        }
        assert_eq!(result.activated_neurons(), 4 * cfg.layers * cfg.top_k);
    }

    #[test]
    fn test_tokens_keep_text_and_order() {
        let result = engine().run("  Hello,   world  Hello, ");
        let texts: Vec<&str> = result.token_traces.iter().map(|t| t.token.as_str()).collect();
        assert_eq!(texts, vec!["Hello,", "world", "Hello,"]);
    }

    #[test]
    fn test_independent_engines_agree() {
        let a = engine();
        let b = engine();
        let prompt = "route tokens to only the neurons they need";
        assert_eq!(a.run(prompt), b.run(prompt));
    }

    #[test]
    fn test_repeat_run_is_identical_when_vocab_known() {
        let engine = engine();
        let first = engine.run("alpha beta gamma");
        let second = engine.run("alpha beta gamma");
        assert_eq!(first, second);
    }

    #[test]
    fn test_vocabulary_grows_monotonically() {
        let engine = engine();
        engine.run("one two");
        assert_eq!(engine.vocabulary_size(), 2);
        engine.run("two three two");
        assert_eq!(engine.vocabulary_size(), 3);
        engine.run("");
        assert_eq!(engine.vocabulary_size(), 3);
        assert_eq!(engine.vocabulary_id("one"), Some(0));
        assert_eq!(engine.vocabulary_id("three"), Some(2));
        assert_eq!(engine.vocabulary_id("four"), None);
    }

    #[test]
    fn test_prediction_is_known_token() {
        let engine = engine();
        let result = engine.run("sparse routing keeps most neurons silent");
        assert!(engine.vocabulary_id(&result.predicted_token).is_some());
    }

    #[test]
    fn test_empty_prompt_on_fresh_engine() {
        let engine = engine();
        let result = engine.run("   ");
        assert!(result.is_empty());
        assert_eq!(result.predicted_token, UNK_TOKEN);
        assert_eq!(engine.vocabulary_size(), 0);
    }

    #[test]
    fn test_empty_prompt_after_vocab_picks_first_id() {
        // Zero state scores every embedding equally; ties go to id 0.
        let engine = engine();
        engine.run("first second third");
        let result = engine.run("");
        assert!(result.is_empty());
        assert_eq!(result.predicted_token, "first");
    }

    #[test]
    fn test_prefix_routing_unaffected_by_suffix() {
        // Carry-over only flows forward: later tokens cannot change earlier traces.
        let engine = engine();
        let short = engine.run("context before");
        let long = engine.run("context before token");
        assert_eq!(short.token_traces[..], long.token_traces[..2]);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let base = test_config();
        let cases = [
            SparseConfig { layers: 0, ..base },
            SparseConfig { neurons_per_layer: 0, top_k: 0, ..base },
            SparseConfig { top_k: 0, ..base },
            SparseConfig { top_k: 9, ..base },
            SparseConfig { hidden_dim: 0, ..base },
            SparseConfig { embedding_dim: 0, ..base },
        ];
        for cfg in cases {
            assert!(SparseEngine::new(cfg).is_err(), "{:?} should be rejected", cfg);
        }
        assert!(matches!(
            SparseEngine::new(SparseConfig { top_k: 9, ..base }),
            Err(ConfigError::TopKExceedsNeurons { top_k: 9, neurons_per_layer: 8 })
        ));
    }

    #[test]
    fn test_top_k_equals_neurons_is_dense() {
        let cfg = SparseConfig { neurons_per_layer: 4, top_k: 4, ..test_config() };
        let engine = SparseEngine::new(cfg).expect("valid config");
        let result = engine.run("dense routing");
        for t in &result.token_traces {
            for l in &t.layers {
                assert_eq!(l.selected.len(), 4);
            }
        }
        assert_eq!(engine.routing_stats().expert_sparsity(), 0.0);
    }

    #[test]
    fn test_single_neuron_gets_full_weight() {
        let cfg = SparseConfig { neurons_per_layer: 1, top_k: 1, ..test_config() };
        let engine = SparseEngine::new(cfg).expect("valid config");
        let result = engine.run("x y");
        for t in &result.token_traces {
            for l in &t.layers {
                assert_eq!(l.selected[0].id, 0);
                assert!((l.selected[0].weight - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
            }
        }
    }

    #[test]
    fn test_routing_stats_accumulate_and_reset() {
        let cfg = test_config();
        let engine = engine();
        engine.run("a b c");
        engine.run("d");
        let stats = engine.routing_stats();
        assert_eq!(stats.runs, 2);
        assert_eq!(stats.tokens_routed, 4);
        assert_eq!(stats.total_activations(), (4 * cfg.layers * cfg.top_k) as u64);
        assert!((stats.expert_sparsity() - cfg.sparsity()).abs() < 1e-12);
        assert!(engine.sparse_stats_report().contains("4 tokens over 2 runs"));

        engine.reset_stats();
        assert_eq!(engine.routing_stats().runs, 0);
        assert_eq!(engine.routing_stats().total_activations(), 0);
    }

    #[test]
    fn test_memory_tracks_vocabulary() {
        let engine = engine();
        assert_eq!(engine.memory_bytes(), 0);
        engine.run("grow the table");
        assert!(engine.memory_bytes() >= 3 * test_config().embedding_dim * 4);
    }

    #[test]
    fn test_config_param_counts() {
        let cfg = SparseConfig::default();
        assert!(cfg.active_param_count() < cfg.param_count());
        assert!((cfg.sparsity() - 0.75).abs() < 1e-12);
    }
}
