use trellis_core::coords::{Rect, Vec2};
use trellis_core::style::{Margin, Size};

/// Floor for the greedy-share denominator, so an all-zero-share set of
/// greedy children degrades to zero-size lanes instead of dividing by
/// zero.
pub const SHARE_EPSILON: f32 = 1e-6;

// ── SlotSpec ──────────────────────────────────────────────────────────────

/// One child's inputs to the stacking distribution, projected onto the
/// stacking axis. `margin` is the child's total outer inset on that axis;
/// extents returned by [`stack_sizes`] are outer extents including it.
#[derive(Debug, Copy, Clone)]
pub struct SlotSpec {
    pub size: Size,
    pub intrinsic: f32,
    pub margin: f32,
}

// ── stacking distribution ─────────────────────────────────────────────────

/// Distribute `total` along the stacking axis.
///
/// Fixed children (`N` pixels, or `auto` at intrinsic size) take their
/// declared extent; remaining space — floored at zero — is split among
/// greedy children (`*`, `N%`) proportionally to their normalized shares.
pub fn stack_sizes(slots: &[SlotSpec], total: f32) -> Vec<f32> {
    let mut fixed_sum = 0.0;
    let mut share_sum = 0.0;
    for slot in slots {
        if slot.size.is_greedy() {
            share_sum += slot.size.share();
        } else {
            fixed_sum += slot.size.resolve(0.0, slot.intrinsic) + slot.margin;
        }
    }
    let remaining = (total - fixed_sum).max(0.0);
    let share_sum = share_sum.max(SHARE_EPSILON);

    slots
        .iter()
        .map(|slot| {
            if slot.size.is_greedy() {
                remaining * slot.size.share() / share_sum
            } else {
                slot.size.resolve(0.0, slot.intrinsic) + slot.margin
            }
        })
        .collect()
}

// ── rect helpers ──────────────────────────────────────────────────────────

/// Shrink `rect` by a margin on all four sides, clamping at zero size.
pub fn inset(rect: Rect, margin: Margin) -> Rect {
    Rect::from_origin_size(
        rect.origin + Vec2::new(margin.left, margin.top),
        Vec2::new(
            (rect.size.x - margin.h()).max(0.0),
            (rect.size.y - margin.v()).max(0.0),
        ),
    )
}
