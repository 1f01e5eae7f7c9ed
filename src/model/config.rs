// =============================================================================
// model/config.rs — Engine Configuration
// =============================================================================

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_HIDDEN_DIM, DEFAULT_LAYERS, DEFAULT_NEURONS_PER_LAYER,
    DEFAULT_TOP_K,
};
use super::error::{ConfigError, Result};

/// SparseConfig — fixed at construction, never mutated afterwards.
///
/// Field names serialize in camelCase so a JSON file can use the same keys
/// the architecture description reports.  Missing keys fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SparseConfig {
    pub layers: usize,
    pub neurons_per_layer: usize,
    pub top_k: usize,
    pub hidden_dim: usize,
    pub embedding_dim: usize,
}

impl Default for SparseConfig {
    fn default() -> Self {
        Self {
            layers: DEFAULT_LAYERS,
            neurons_per_layer: DEFAULT_NEURONS_PER_LAYER,
            top_k: DEFAULT_TOP_K,
            hidden_dim: DEFAULT_HIDDEN_DIM,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl SparseConfig {
    /// Enforce `layers ≥ 1`, `1 ≤ top_k ≤ neurons_per_layer` and positive widths.
    pub fn validate(&self) -> Result<()> {
        if self.layers == 0 {
            return Err(ConfigError::ZeroLayers);
        }
        if self.neurons_per_layer == 0 {
            return Err(ConfigError::ZeroNeurons);
        }
        if self.top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        if self.top_k > self.neurons_per_layer {
            return Err(ConfigError::TopKExceedsNeurons {
                top_k: self.top_k,
                neurons_per_layer: self.neurons_per_layer,
            });
        }
        if self.hidden_dim == 0 {
            return Err(ConfigError::ZeroDimension { name: "hiddenDim" });
        }
        if self.embedding_dim == 0 {
            return Err(ConfigError::ZeroDimension { name: "embeddingDim" });
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Fraction of neurons that stay silent in each layer for each token.
    pub fn sparsity(&self) -> f64 {
        if self.neurons_per_layer == 0 {
            return 0.0;
        }
        1.0 - self.top_k as f64 / self.neurons_per_layer as f64
    }

    /// Total generated parameter count (approximate).
    pub fn param_count(&self) -> usize {
        let hidden = self.hidden_dim;
        let n = self.neurons_per_layer;

        let entry_projection = hidden * self.embedding_dim;
        let gate_per_layer = n * hidden + n; // vectors + bias
        let experts_per_layer = n * hidden * hidden;

        entry_projection + self.layers * (gate_per_layer + experts_per_layer)
    }

    /// Parameters actually touched per token (gates are always scored).
    pub fn active_param_count(&self) -> usize {
        let hidden = self.hidden_dim;
        let n = self.neurons_per_layer;
        self.hidden_dim * self.embedding_dim
            + self.layers * (n * hidden + n + self.top_k * hidden * hidden)
    }
}
