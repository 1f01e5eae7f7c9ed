// =============================================================================
// tensor/mod.rs — Module exports
// =============================================================================

mod linalg;
mod normalization;
mod sampling;


pub use linalg::{axpy, dot_f32, matvec_transposed_with, matvec_with};
pub use normalization::{
    l2_norm, rescale_to_norm, residual_norm, routing_order, softmax, softmax_top_k,
    top_k_indices,
};
pub use sampling::sample_argmax;
