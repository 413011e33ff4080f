//! Rejection sampling of collision-free slots.

/// Draw candidates until one does not overlap any existing item.
///
/// `generate` may return `None` for an attempt that produced no legal
/// candidate; the attempt still counts against `budget`. Returns `None`
/// once the budget is spent.
pub fn sample_free_slot<B, C, G, O>(existing: &[B], budget: u32, mut generate: G, overlaps: O) -> Option<C>
where
    G: FnMut() -> Option<C>,
    O: Fn(&C, &B) -> bool,
{
    for _ in 0..budget {
        let Some(candidate) = generate() else {
            continue;
        };
        if !existing.iter().any(|b| overlaps(&candidate, b)) {
            return Some(candidate);
        }
    }
    None
}
