// =============================================================================
// model/constants.rs — Model Constants
// =============================================================================

// Default architecture (what `describe()` reports for a default engine)
pub const DEFAULT_LAYERS: usize = 4;
pub const DEFAULT_NEURONS_PER_LAYER: usize = 16;
pub const DEFAULT_TOP_K: usize = 4;
pub const DEFAULT_HIDDEN_DIM: usize = 32;
pub const DEFAULT_EMBEDDING_DIM: usize = 32;

/// Gate logits are `GATE_SCALE · dot(h, g) / sqrt(H)`; with a unit-RMS hidden
/// state this puts raw scores roughly in [-6, 6].
pub const GATE_SCALE: f32 = 3.0;
/// Amplitude of the per-neuron gate bias.
pub const GATE_BIAS_SCALE: f32 = 0.25;

/// |raw_score| at which a neuron is drawn at full activation intensity.
pub const INTENSITY_SCALE: f32 = 6.0;

/// Tolerance for "weights sum to 1".
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-6;

pub const DEFAULT_PROMPT: &str =
    "Design a sparse transformer that routes tokens to only the neurons they need.";
