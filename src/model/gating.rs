// =============================================================================
// model/gating.rs — Per-layer gating network (router)
// =============================================================================
//
//   raw[n]   = GATE_SCALE · dot(h, gate[n]) / sqrt(H) + GATE_BIAS_SCALE · bias[n]
//   select   = top-k of raw, descending, ties → smaller neuron id
//   weight   = softmax over the selected raw scores only
//
// Gate vectors are seeded by (layer, neuron, dim) and biases by
// (layer, neuron).  Both are small, so they are materialised once.
// =============================================================================

use tracing::trace;

use crate::seed::{signed_at, Stream};
use crate::tensor::{dot_f32, softmax_top_k};

use super::constants::{GATE_BIAS_SCALE, GATE_SCALE};
use super::trace::SelectedNeuron;

#[derive(Debug, Clone)]
pub struct GatingNetwork {
    layer_index: usize,
    hidden_dim: usize,
    n_neurons: usize,
    /// [n_neurons × hidden_dim], row per neuron
    gate: Vec<f32>,
    /// [n_neurons]
    bias: Vec<f32>,
    /// GATE_SCALE / sqrt(hidden_dim)
    scale: f32,
}

impl GatingNetwork {
    pub fn new(layer_index: usize, n_neurons: usize, hidden_dim: usize) -> Self {
        let l = layer_index as u64;
        let mut gate = Vec::with_capacity(n_neurons * hidden_dim);
        for n in 0..n_neurons as u64 {
            for d in 0..hidden_dim as u64 {
                gate.push(signed_at(Stream::Gate, &[l, n, d]));
            }
        }
        let bias = (0..n_neurons as u64)
            .map(|n| signed_at(Stream::GateBias, &[l, n]))
            .collect();

        Self {
            layer_index,
            hidden_dim,
            n_neurons,
            gate,
            bias,
            scale: GATE_SCALE / (hidden_dim as f32).sqrt(),
        }
    }

    /// Raw scores for every neuron, indexed by neuron id.
    pub fn score(&self, hidden: &[f32]) -> Vec<f32> {
        debug_assert_eq!(hidden.len(), self.hidden_dim);
        (0..self.n_neurons)
            .map(|n| {
                let row = &self.gate[n * self.hidden_dim..(n + 1) * self.hidden_dim];
                self.scale * dot_f32(row, hidden) + GATE_BIAS_SCALE * self.bias[n]
            })
            .collect()
    }

    /// Score, pick the top-k, and softmax-normalise their weights.
    pub fn route(&self, hidden: &[f32], top_k: usize) -> Vec<SelectedNeuron> {
        let raw = self.score(hidden);
        select(&raw, top_k, self.layer_index)
    }

    pub fn layer_index(&self) -> usize {
        self.layer_index
    }

    pub fn n_neurons(&self) -> usize {
        self.n_neurons
    }
}

/// Top-k selection over precomputed raw scores.
pub fn select(raw: &[f32], top_k: usize, layer_index: usize) -> Vec<SelectedNeuron> {
    let selected: Vec<SelectedNeuron> = softmax_top_k(raw, top_k)
        .into_iter()
        .map(|(id, weight)| SelectedNeuron {
            id,
            raw_score: raw[id],
            weight,
        })
        .collect();
    trace!(
        layer = layer_index,
        neurons = ?selected.iter().map(|n| n.id).collect::<Vec<_>>(),
        "routed"
    );
    selected
}
