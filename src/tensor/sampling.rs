// =============================================================================
// tensor/sampling.rs — Greedy token selection
// =============================================================================

/// Greedy argmax over logits.  Ties resolve to the smallest index; an empty
/// slice yields `None`.
#[inline]
pub fn sample_argmax(logits: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &v) in logits.iter().enumerate() {
        match best {
            // strictly greater: an equal later score never displaces the earlier index
            Some((_, b)) if v.total_cmp(&b).is_gt() => best = Some((idx, v)),
            None => best = Some((idx, v)),
            _ => {}
        }
    }
    best.map(|(idx, _)| idx)
}
