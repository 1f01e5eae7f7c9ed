// =============================================================================
// model/trace.rs — Routing trace records returned to callers
// =============================================================================
//
// Serialized field names are camelCase: predictedToken, tokenTraces,
// tokenIndex, layerIndex, rawScore, neuronsPerLayer, topK, ...
// =============================================================================

use serde::{Deserialize, Serialize};

use super::config::SparseConfig;
use super::constants::INTENSITY_SCALE;

/// One neuron chosen by a layer's gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedNeuron {
    pub id: usize,
    /// Pre-softmax gate score.
    pub raw_score: f32,
    /// Post-softmax share among the selected neurons of this layer.
    pub weight: f32,
}

impl SelectedNeuron {
    /// Activation intensity in [0, 1] derived from the raw score.
    pub fn intensity(&self) -> f32 {
        (self.raw_score.abs() / INTENSITY_SCALE).min(1.0)
    }
}

/// The `top_k` neurons that fired at one layer, highest weight first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerTrace {
    pub layer_index: usize,
    pub selected: Vec<SelectedNeuron>,
}

impl LayerTrace {
    pub fn weight_sum(&self) -> f32 {
        self.selected.iter().map(|n| n.weight).sum()
    }

    pub fn neuron_ids(&self) -> Vec<usize> {
        self.selected.iter().map(|n| n.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTrace {
    pub token: String,
    pub token_index: usize,
    pub layers: Vec<LayerTrace>,
}

/// Everything a run exposes: the prediction plus per-token routing traces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparseRunResult {
    pub predicted_token: String,
    pub token_traces: Vec<TokenTrace>,
}

impl SparseRunResult {
    /// True when the prompt produced no tokens.
    pub fn is_empty(&self) -> bool {
        self.token_traces.is_empty()
    }

    /// Total neuron firings across all tokens and layers.
    pub fn activated_neurons(&self) -> usize {
        self.token_traces
            .iter()
            .flat_map(|t| &t.layers)
            .map(|l| l.selected.len())
            .sum()
    }
}

/// Static configuration plus the current vocabulary size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureDescription {
    pub layers: usize,
    pub neurons_per_layer: usize,
    pub top_k: usize,
    pub hidden_dim: usize,
    pub embedding_dim: usize,
    pub vocabulary: usize,
}

impl ArchitectureDescription {
    pub fn new(cfg: &SparseConfig, vocabulary: usize) -> Self {
        Self {
            layers: cfg.layers,
            neurons_per_layer: cfg.neurons_per_layer,
            top_k: cfg.top_k,
            hidden_dim: cfg.hidden_dim,
            embedding_dim: cfg.embedding_dim,
            vocabulary,
        }
    }
}
