// =============================================================================
// model/state.rs — Cumulative routing statistics
// =============================================================================

use serde::Serialize;

use super::config::SparseConfig;
use super::trace::TokenTrace;

/// RoutingStats — how often each neuron fired, across every run of an engine.
///
/// Purely observational; routing never reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingStats {
    pub runs: usize,
    pub tokens_routed: usize,
    pub neurons_per_layer: usize,
    /// [layer][neuron] firing counts
    pub activations: Vec<Vec<u64>>,
}

impl RoutingStats {
    pub fn new(cfg: &SparseConfig) -> Self {
        Self {
            runs: 0,
            tokens_routed: 0,
            neurons_per_layer: cfg.neurons_per_layer,
            activations: vec![vec![0; cfg.neurons_per_layer]; cfg.layers],
        }
    }

    /// Fold one run's traces in.
    pub fn record(&mut self, traces: &[TokenTrace]) {
        self.runs += 1;
        self.tokens_routed += traces.len();
        for token in traces {
            for layer in &token.layers {
                if let Some(counts) = self.activations.get_mut(layer.layer_index) {
                    for n in &layer.selected {
                        if let Some(c) = counts.get_mut(n.id) {
                            *c += 1;
                        }
                    }
                }
            }
        }
    }

    pub fn total_activations(&self) -> u64 {
        self.activations.iter().flatten().sum()
    }

    /// Neuron slots that could have fired if routing were dense.
    pub fn total_neuron_slots(&self) -> u64 {
        (self.tokens_routed * self.activations.len() * self.neurons_per_layer) as u64
    }

    /// Fraction of neuron slots left silent; 0 before anything was routed.
    pub fn expert_sparsity(&self) -> f64 {
        let slots = self.total_neuron_slots();
        if slots == 0 {
            return 0.0;
        }
        1.0 - self.total_activations() as f64 / slots as f64
    }

    /// Per-neuron share of routed tokens in which that neuron fired.
    pub fn utilization(&self, layer: usize) -> Option<Vec<f64>> {
        let counts = self.activations.get(layer)?;
        let tokens = self.tokens_routed.max(1) as f64;
        Some(counts.iter().map(|&c| c as f64 / tokens).collect())
    }

    /// Neurons that never fired at `layer` (pruning candidates).
    pub fn coldest(&self, layer: usize) -> Vec<usize> {
        self.activations
            .get(layer)
            .map(|counts| {
                counts
                    .iter()
                    .enumerate()
                    .filter(|(_, &c)| c == 0)
                    .map(|(id, _)| id)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.runs = 0;
        self.tokens_routed = 0;
        for counts in &mut self.activations {
            counts.iter_mut().for_each(|c| *c = 0);
        }
    }

    pub fn report(&self) -> String {
        let cold: usize = (0..self.activations.len()).map(|l| self.coldest(l).len()).sum();
        format!(
            "Routing stats: {}/{} neuron slots fired ({:.1}% sparse), {} tokens over {} runs, {} neurons never fired",
            self.total_activations(),
            self.total_neuron_slots(),
            self.expert_sparsity() * 100.0,
            self.tokens_routed,
            self.runs,
            cold,
        )
    }
}
