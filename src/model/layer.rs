// =============================================================================
// model/layer.rs — Sparse layer and layer stack
// =============================================================================
//
// One layer:  route → mix selected experts → residual add → renormalise
//
//   h' = rescale(h + Σ_k w_k · E_k(h),  sqrt(H))
//
// Renormalising to a fixed norm keeps the residual stream bounded no matter
// how many layers are stacked.
// =============================================================================

use crate::tensor::{axpy, rescale_to_norm, residual_norm};

use super::config::SparseConfig;
use super::experts::ExpertBank;
use super::gating::GatingNetwork;
use super::trace::LayerTrace;

#[derive(Debug, Clone)]
pub struct SparseLayer {
    pub gating: GatingNetwork,
    pub experts: ExpertBank,
}

impl SparseLayer {
    pub fn new(layer_index: usize, n_neurons: usize, hidden_dim: usize) -> Self {
        Self {
            gating: GatingNetwork::new(layer_index, n_neurons, hidden_dim),
            experts: ExpertBank::new(layer_index, hidden_dim),
        }
    }

    /// Apply the layer to `hidden` in place and return what fired.
    pub fn forward(&self, hidden: &mut [f32], top_k: usize) -> LayerTrace {
        let selected = self.gating.route(hidden, top_k);
        let delta = self.experts.mix(&selected, hidden);

        let target = residual_norm(hidden.len());
        axpy(hidden, 1.0, &delta);
        rescale_to_norm(hidden, target);

        LayerTrace {
            layer_index: self.gating.layer_index(),
            selected,
        }
    }
}

/// Layers 0..N−1, applied in order.
#[derive(Debug, Clone)]
pub struct LayerStack {
    layers: Vec<SparseLayer>,
    top_k: usize,
}

impl LayerStack {
    pub fn new(cfg: &SparseConfig) -> Self {
        let layers = (0..cfg.layers)
            .map(|l| SparseLayer::new(l, cfg.neurons_per_layer, cfg.hidden_dim))
            .collect();
        Self {
            layers,
            top_k: cfg.top_k,
        }
    }

    /// Thread `hidden` through every layer; one trace per layer.
    pub fn forward(&self, hidden: &mut [f32]) -> Vec<LayerTrace> {
        self.layers
            .iter()
            .map(|layer| layer.forward(hidden, self.top_k))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::l2_norm;

    fn start(dim: usize) -> Vec<f32> {
        let mut h: Vec<f32> = (0..dim).map(|i| ((i * 7 % 5) as f32) - 2.0).collect();
        rescale_to_norm(&mut h, residual_norm(dim));
        h
    }

    #[test]
    fn test_layer_keeps_fixed_norm() {
        let layer = SparseLayer::new(0, 16, 32);
        let mut h = start(32);
        for _ in 0..10 {
            layer.forward(&mut h, 4);
            assert!((l2_norm(&h) - residual_norm(32)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_stack_traces_in_layer_order() {
        let cfg = SparseConfig::default();
        let stack = LayerStack::new(&cfg);
        assert_eq!(stack.len(), cfg.layers);
        let mut h = start(cfg.hidden_dim);
        let traces = stack.forward(&mut h);
        assert_eq!(traces.len(), cfg.layers);
        for (i, t) in traces.iter().enumerate() {
            assert_eq!(t.layer_index, i);
            assert_eq!(t.selected.len(), cfg.top_k);
            assert!((t.weight_sum() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_stack_is_deterministic() {
        let cfg = SparseConfig::default();
        let mut a = start(cfg.hidden_dim);
        let mut b = a.clone();
        let ta = LayerStack::new(&cfg).forward(&mut a);
        let tb = LayerStack::new(&cfg).forward(&mut b);
        assert_eq!(ta, tb);
        assert_eq!(a, b);
    }

    #[test]
    fn test_layer_changes_hidden_state() {
        let layer = SparseLayer::new(0, 8, 16);
        let before = start(16);
        let mut after = before.clone();
        layer.forward(&mut after, 2);
        assert_ne!(before, after);
    }
}
