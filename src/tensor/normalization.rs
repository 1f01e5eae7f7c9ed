// =============================================================================
// tensor/normalization.rs — Softmax, top-k selection and norm rescaling
// =============================================================================
//
// All kernels here are scalar on purpose: routing weights end up in traces
// that must be bit-identical across machines, so no SIMD fast-exp paths.
// =============================================================================

use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Softmax
// ---------------------------------------------------------------------------
/// Numerically stable in-place softmax: subtract the max, exponentiate, scale.
pub fn softmax(x: &mut [f32]) {
    let max = x.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    if max == f32::NEG_INFINITY {
        return; // empty, or all -inf / NaN
    }
    // f64 accumulation keeps the sum stable for long rows
    let mut sum = 0.0f64;
    for v in x.iter_mut() {
        *v = (*v - max).exp();
        sum += *v as f64;
    }
    let inv = (1.0 / sum) as f32;
    for v in x.iter_mut() {
        *v *= inv;
    }
}

// ---------------------------------------------------------------------------
// Top-k
// ---------------------------------------------------------------------------
/// Total routing order: descending score, then ascending index.
#[inline]
pub fn routing_order(a: (usize, f32), b: (usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

/// Indices of the `k` highest scores, best first.  Equal scores keep the
/// smaller index first, so the result is a total, reproducible order.
pub fn top_k_indices(scores: &[f32], k: usize) -> Vec<usize> {
    let mut indexed: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    indexed.sort_by(|&a, &b| routing_order(a, b));
    indexed.truncate(k);
    indexed.into_iter().map(|(i, _)| i).collect()
}

/// Select the top-`k` entries, then softmax over the selected scores only.
/// Returns `(index, weight)` pairs in routing order; weights sum to 1.
pub fn softmax_top_k(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    let indices = top_k_indices(scores, k);
    let mut weights: Vec<f32> = indices.iter().map(|&i| scores[i]).collect();
    softmax(&mut weights);
    indices.into_iter().zip(weights).collect()
}

// ---------------------------------------------------------------------------
// Norm rescaling
// ---------------------------------------------------------------------------
/// Euclidean norm with f64 accumulation.
pub fn l2_norm(x: &[f32]) -> f32 {
    x.iter().map(|&v| (v as f64) * (v as f64)).sum::<f64>().sqrt() as f32
}

/// Rescale `x` in place to L2 norm `target`.  A zero vector stays zero.
pub fn rescale_to_norm(x: &mut [f32], target: f32) {
    let norm = l2_norm(x);
    if norm <= f32::EPSILON || !norm.is_finite() {
        for v in x.iter_mut() {
            *v = 0.0;
        }
        return;
    }
    let scale = target / norm;
    for v in x.iter_mut() {
        *v *= scale;
    }
}

/// Residual-stream norm for a width-`dim` vector: sqrt(dim), i.e. RMS 1.
#[inline]
pub fn residual_norm(dim: usize) -> f32 {
    (dim as f32).sqrt()
}
