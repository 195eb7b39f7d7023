//! First-person museum walkthrough: movement, collision and artwork focus.
//!
//! Floor-plane points are `Vec2(x, z)`; heights are camera eye heights with the
//! floor at `y = 0`.

mod artwork;
mod collision;
mod focus;
mod furniture;
mod layout;
mod loader;
mod movement;
mod room;
mod scene_impl;
mod selection;
mod state;
mod watchdog;

#[cfg(test)]
mod tests;

pub(crate) use room::WallSide;
pub(crate) use scene_impl::build_museum_scene;

/// Personal-space buffer added around every furniture footprint.
pub(crate) const COLLISION_MARGIN: f32 = 0.3;
/// Eye height when standing on top of a bench.
pub(crate) const BENCH_TOP_EYE_HEIGHT: f32 = 3.0;
pub(crate) const BENCH_HEIGHT_TOLERANCE: f32 = 0.1;
pub(crate) const STANDING_EYE_HEIGHT: f32 = 2.0;
pub(crate) const JUMP_OVER_CLEARANCE: f32 = 1.0;
pub(crate) const VELOCITY_DAMPING: f32 = 10.0;
pub(crate) const WALK_ACCELERATION: f32 = 50.0;
pub(crate) const GRAVITY: f32 = 30.0;
pub(crate) const JUMP_SPEED: f32 = 12.0;
pub(crate) const WALL_INSET: f32 = 1.0;
pub(crate) const FOCUS_WALL_INSET: f32 = 1.5;
pub(crate) const WATCHDOG_SLACK: f32 = 5.0;
pub(crate) const FOCUS_MIN_DISTANCE: f32 = 1.5;
pub(crate) const FOCUS_SIZE_FACTOR: f32 = 0.8;
pub(crate) const LOOK_SENSITIVITY_RAD_PER_PX: f32 = 0.002;
