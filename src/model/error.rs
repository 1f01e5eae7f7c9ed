// =============================================================================
// model/error.rs — Configuration errors
// =============================================================================

use std::io;
use std::path::PathBuf;

/// Raised at construction; an invalid configuration is never clamped.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("layers must be at least 1")]
    ZeroLayers,

    #[error("neuronsPerLayer must be at least 1")]
    ZeroNeurons,

    #[error("topK must be at least 1")]
    ZeroTopK,

    #[error("topK ({top_k}) exceeds neuronsPerLayer ({neurons_per_layer})")]
    TopKExceedsNeurons { top_k: usize, neurons_per_layer: usize },

    #[error("{name} must be at least 1")]
    ZeroDimension { name: &'static str },

    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
