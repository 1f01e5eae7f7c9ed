// =============================================================================
// tensor/linalg.rs — Dot products and generated-matrix products
// =============================================================================

/// Scalar f32 dot product with four independent accumulators.
/// Summation order is fixed, so results are reproducible bit-for-bit.
pub fn dot_f32(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    let mut s0 = 0.0f32;
    let mut s1 = 0.0f32;
    let mut s2 = 0.0f32;
    let mut s3 = 0.0f32;
    let chunks = len / 4;
    for c in 0..chunks {
        let i = c * 4;
        s0 += a[i] * b[i];
        s1 += a[i + 1] * b[i + 1];
        s2 += a[i + 2] * b[i + 2];
        s3 += a[i + 3] * b[i + 3];
    }
    for i in (chunks * 4)..len {
        s0 += a[i] * b[i];
    }
    (s0 + s1) + (s2 + s3)
}

/// out = W · x for a matrix whose entries are produced on demand.
///
/// `weight(row, col)` is called once per entry; nothing is materialised, so
/// a `rows × cols` expert costs no memory beyond `out`.
pub fn matvec_with<F>(out: &mut [f32], x: &[f32], weight: F)
where
    F: Fn(usize, usize) -> f32,
{
    for (r, o) in out.iter_mut().enumerate() {
        let mut acc = 0.0f32;
        for (c, &xv) in x.iter().enumerate() {
            acc += weight(r, c) * xv;
        }
        *o = acc;
    }
}

/// out = Wᵀ · x for the same generated matrix (`W` is `x.len() × out.len()`).
pub fn matvec_transposed_with<F>(out: &mut [f32], x: &[f32], weight: F)
where
    F: Fn(usize, usize) -> f32,
{
    for (c, o) in out.iter_mut().enumerate() {
        let mut acc = 0.0f32;
        for (r, &xv) in x.iter().enumerate() {
            acc += weight(r, c) * xv;
        }
        *o = acc;
    }
}

/// a[i] += scale · b[i]
#[inline]
pub fn axpy(a: &mut [f32], scale: f32, b: &[f32]) {
    for (av, &bv) in a.iter_mut().zip(b) {
        *av += scale * bv;
    }
}
