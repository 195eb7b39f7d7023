use glam::Vec2;

use super::furniture::{FurnitureItem, FurnitureKind, FurnitureRegistry};
use super::{BENCH_HEIGHT_TOLERANCE, BENCH_TOP_EYE_HEIGHT, COLLISION_MARGIN, JUMP_OVER_CLEARANCE};

/// Whether a camera at `candidate` with eye height `height` intersects furniture.
///
/// Non-bench items are full-height solids. Benches can be jumped over once the
/// eye is more than [`JUMP_OVER_CLEARANCE`] above their top, and can be stood
/// on at [`BENCH_TOP_EYE_HEIGHT`] while inside the shrunk top surface.
pub(crate) fn is_blocked(registry: &FurnitureRegistry, candidate: Vec2, height: f32) -> bool {
    registry
        .items()
        .iter()
        .any(|item| item_blocks(item, candidate, height))
}

pub(crate) fn item_blocks(item: &FurnitureItem, candidate: Vec2, height: f32) -> bool {
    let delta = (candidate - item.center).abs();
    let half = item.half_extents();
    let overlaps = delta.x < half.x + COLLISION_MARGIN && delta.y < half.y + COLLISION_MARGIN;
    if !overlaps {
        return false;
    }
    if item.kind != FurnitureKind::Bench {
        return true;
    }

    if height > item.top_eye_height() + JUMP_OVER_CLEARANCE {
        false
    } else if (height - BENCH_TOP_EYE_HEIGHT).abs() < BENCH_HEIGHT_TOLERANCE {
        !item.is_over_top_surface(candidate)
    } else {
        true
    }
}
