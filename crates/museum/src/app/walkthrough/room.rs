use glam::{Vec2, Vec3};
use serde::Deserialize;

use super::{FOCUS_WALL_INSET, STANDING_EYE_HEIGHT, WALL_INSET, WATCHDOG_SLACK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WallSide {
    /// The -Z wall, facing +Z.
    North,
    South,
    East,
    West,
}

/// Axis-aligned room centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Room {
    /// Extent along X.
    pub(crate) width: f32,
    /// Extent along Z.
    pub(crate) length: f32,
    pub(crate) height: f32,
}

impl Room {
    pub(crate) fn new(width: f32, length: f32, height: f32) -> Self {
        Self {
            width,
            length,
            height,
        }
    }

    pub(crate) fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.length * 0.5)
    }

    /// Strict interior test used for every movement commit.
    pub(crate) fn is_walkable(&self, floor_point: Vec2) -> bool {
        let limit = self.half_extents() - Vec2::splat(WALL_INSET);
        floor_point.x.abs() < limit.x && floor_point.y.abs() < limit.y
    }

    pub(crate) fn clamp_walkable(&self, floor_point: Vec2) -> Vec2 {
        clamp_inset(floor_point, self.half_extents(), WALL_INSET)
    }

    pub(crate) fn clamp_focus(&self, floor_point: Vec2) -> Vec2 {
        clamp_inset(floor_point, self.half_extents(), FOCUS_WALL_INSET)
    }

    pub(crate) fn focus_eye_height(&self) -> f32 {
        self.height * 0.5 - 1.0
    }

    pub(crate) fn spawn_position(&self) -> Vec3 {
        Vec3::new(0.0, STANDING_EYE_HEIGHT, 0.0)
    }

    /// True when the camera has left the playable volume, including any
    /// non-finite coordinate.
    pub(crate) fn is_outside_watchdog_volume(&self, position: Vec3) -> bool {
        if !position.is_finite() {
            return true;
        }
        let half = self.half_extents();
        position.y < 0.0
            || position.x.abs() > half.x + WATCHDOG_SLACK
            || position.z.abs() > half.y + WATCHDOG_SLACK
    }

    /// Safe landing points for focus exit, in preference order.
    pub(crate) fn fallback_points(&self) -> [Vec2; 5] {
        let quarter = Vec2::new(self.width * 0.25, self.length * 0.25);
        [
            Vec2::ZERO,
            Vec2::new(quarter.x, quarter.y),
            Vec2::new(-quarter.x, quarter.y),
            Vec2::new(quarter.x, -quarter.y),
            Vec2::new(-quarter.x, -quarter.y),
        ]
    }
}

fn clamp_inset(floor_point: Vec2, half_extents: Vec2, inset: f32) -> Vec2 {
    let limit = (half_extents - Vec2::splat(inset)).max(Vec2::ZERO);
    floor_point.clamp(-limit, limit)
}
