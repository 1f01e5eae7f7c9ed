// =============================================================================
// model/experts.rs — Per-layer expert bank
// =============================================================================
//
// Each neuron owns a square H×H linear map whose entries are generated from
// (layer, neuron, input_dim, output_dim).  Nothing is materialised: an
// expert's weights only exist while it is being evaluated, so un-selected
// neurons cost nothing.
// =============================================================================

use rayon::prelude::*;

use crate::seed::{signed_at, Stream};
use crate::tensor::{axpy, matvec_with};

use super::trace::SelectedNeuron;

#[derive(Debug, Clone)]
pub struct ExpertBank {
    layer_index: usize,
    hidden_dim: usize,
    /// 1 / sqrt(hidden_dim)
    out_scale: f32,
}

impl ExpertBank {
    pub fn new(layer_index: usize, hidden_dim: usize) -> Self {
        Self {
            layer_index,
            hidden_dim,
            out_scale: 1.0 / (hidden_dim as f32).sqrt(),
        }
    }

    /// Weight W[out][in] of expert `neuron`.
    #[inline]
    pub fn weight(&self, neuron: usize, input: usize, output: usize) -> f32 {
        signed_at(
            Stream::Expert,
            &[
                self.layer_index as u64,
                neuron as u64,
                input as u64,
                output as u64,
            ],
        )
    }

    /// out = W[neuron] · hidden / sqrt(H)
    pub fn forward(&self, neuron: usize, hidden: &[f32]) -> Vec<f32> {
        debug_assert_eq!(hidden.len(), self.hidden_dim);
        let mut out = vec![0.0f32; self.hidden_dim];
        matvec_with(&mut out, hidden, |o, i| self.weight(neuron, i, o));
        for v in out.iter_mut() {
            *v *= self.out_scale;
        }
        out
    }

    /// Weighted sum of the selected experts' outputs (the layer delta).
    ///
    /// Expert outputs are computed in parallel; accumulation runs in
    /// selection order so the float sum is identical on every run.
    pub fn mix(&self, selected: &[SelectedNeuron], hidden: &[f32]) -> Vec<f32> {
        let outputs: Vec<Vec<f32>> = selected
            .par_iter()
            .map(|n| self.forward(n.id, hidden))
            .collect();

        let mut delta = vec![0.0f32; self.hidden_dim];
        for (n, out) in selected.iter().zip(&outputs) {
            axpy(&mut delta, n.weight, out);
        }
        delta
    }

    pub fn layer_index(&self) -> usize {
        self.layer_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden(dim: usize) -> Vec<f32> {
        (0..dim).map(|i| ((i as f32) * 0.37).sin()).collect()
    }

    #[test]
    fn test_forward_is_deterministic() {
        let bank = ExpertBank::new(1, 16);
        let h = hidden(16);
        assert_eq!(bank.forward(3, &h), bank.forward(3, &h));
        assert_eq!(ExpertBank::new(1, 16).forward(3, &h), bank.forward(3, &h));
    }

    #[test]
    fn test_experts_differ() {
        let bank = ExpertBank::new(0, 16);
        let h = hidden(16);
        assert_ne!(bank.forward(0, &h), bank.forward(1, &h));
        assert_ne!(ExpertBank::new(1, 16).forward(0, &h), bank.forward(0, &h));
    }

    #[test]
    fn test_mix_single_expert_full_weight() {
        let bank = ExpertBank::new(0, 8);
        let h = hidden(8);
        let sel = vec![SelectedNeuron { id: 5, raw_score: 1.0, weight: 1.0 }];
        assert_eq!(bank.mix(&sel, &h), bank.forward(5, &h));
    }

    #[test]
    fn test_mix_is_weighted_sum() {
        let bank = ExpertBank::new(2, 8);
        let h = hidden(8);
        let sel = vec![
            SelectedNeuron { id: 1, raw_score: 2.0, weight: 0.75 },
            SelectedNeuron { id: 4, raw_score: 1.0, weight: 0.25 },
        ];
        let a = bank.forward(1, &h);
        let b = bank.forward(4, &h);
        let delta = bank.mix(&sel, &h);
        for i in 0..8 {
            let expected = 0.75 * a[i] + 0.25 * b[i];
            assert!((delta[i] - expected).abs() < 1e-6);
        }
        assert_eq!(bank.layer_index(), 2);
    }

    #[test]
    fn test_zero_input_zero_output() {
        let bank = ExpertBank::new(0, 8);
        assert!(bank.forward(0, &vec![0.0; 8]).iter().all(|&v| v == 0.0));
    }
}
