use engine::Camera3D;
use glam::Vec2;

use super::collision::{is_blocked, item_blocks};
use super::furniture::{FurnitureItem, FurnitureRegistry};
use super::room::Room;
use super::{
    BENCH_HEIGHT_TOLERANCE, BENCH_TOP_EYE_HEIGHT, COLLISION_MARGIN, GRAVITY, JUMP_SPEED,
    STANDING_EYE_HEIGHT, VELOCITY_DAMPING, WALK_ACCELERATION,
};

/// Distance past a margin edge used when stepping a walker clear of it.
const EDGE_CLEARANCE: f32 = 0.001;

/// Held direction keys plus the one-tick jump edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MovementIntent {
    pub(crate) forward: bool,
    pub(crate) backward: bool,
    pub(crate) left: bool,
    pub(crate) right: bool,
    pub(crate) jump: bool,
}

impl MovementIntent {
    /// (strafe, forward) in the camera frame, normalized or zero.
    fn local_direction(&self) -> Vec2 {
        let axis = |positive: bool, negative: bool| positive as i32 as f32 - negative as i32 as f32;
        Vec2::new(
            axis(self.right, self.left),
            axis(self.forward, self.backward),
        )
        .normalize_or_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum JumpState {
    Grounded { on_bench: bool },
    Airborne { vertical_velocity: f32 },
}

impl JumpState {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            JumpState::Grounded { on_bench: false } => "floor",
            JumpState::Grounded { on_bench: true } => "bench",
            JumpState::Airborne { .. } => "airborne",
        }
    }
}

/// Which horizontal axes a tick actually committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct StepOutcome {
    pub(crate) moved_x: bool,
    pub(crate) moved_z: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MovementController {
    velocity: Vec2,
    jump: JumpState,
}

impl Default for MovementController {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            jump: JumpState::Grounded { on_bench: false },
        }
    }
}

impl MovementController {
    pub(crate) fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub(crate) fn jump_state(&self) -> JumpState {
        self.jump
    }

    /// Zero velocity and stand on the floor.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Re-derives the jump state after the camera was placed from outside,
    /// e.g. on focus exit.
    pub(crate) fn settle_at(
        &mut self,
        height: f32,
        floor_point: Vec2,
        furniture: &FurnitureRegistry,
    ) {
        self.velocity = Vec2::ZERO;
        self.jump = if height <= STANDING_EYE_HEIGHT {
            JumpState::Grounded { on_bench: false }
        } else if (height - BENCH_TOP_EYE_HEIGHT).abs() < BENCH_HEIGHT_TOLERANCE
            && furniture.is_over_bench_top(floor_point)
        {
            JumpState::Grounded { on_bench: true }
        } else {
            JumpState::Airborne {
                vertical_velocity: 0.0,
            }
        };
    }

    pub(crate) fn step(
        &mut self,
        dt: f32,
        intent: MovementIntent,
        camera: &mut Camera3D,
        room: &Room,
        furniture: &FurnitureRegistry,
    ) -> StepOutcome {
        self.velocity -= self.velocity * VELOCITY_DAMPING * dt;
        self.step_vertical(dt, intent.jump, camera, room, furniture);

        let local = intent.local_direction();
        let direction = camera.ground_right() * local.x + camera.ground_forward() * local.y;
        let candidate_velocity = self.velocity + direction * WALK_ACCELERATION * dt;

        let height = camera.position.y;
        let current = Vec2::new(camera.position.x, camera.position.z);
        let is_legal =
            |point: Vec2| room.is_walkable(point) && !is_blocked(furniture, point, height);

        let full = current + candidate_velocity * dt;
        let mut outcome = StepOutcome::default();
        let committed = if is_legal(full) {
            self.velocity = candidate_velocity;
            outcome = StepOutcome {
                moved_x: true,
                moved_z: true,
            };
            full
        } else {
            // Slide: X first, then Z from wherever X left us.
            let mut point = current;
            let x_only = Vec2::new(current.x + candidate_velocity.x * dt, current.y);
            if is_legal(x_only) {
                point = x_only;
                self.velocity.x = candidate_velocity.x;
                outcome.moved_x = true;
            }
            let z_only = Vec2::new(point.x, current.y + candidate_velocity.y * dt);
            if is_legal(z_only) {
                point = z_only;
                self.velocity.y = candidate_velocity.y;
                outcome.moved_z = true;
            }
            point
        };

        camera.position.x = committed.x;
        camera.position.z = committed.y;
        outcome
    }

    fn step_vertical(
        &mut self,
        dt: f32,
        jump_pressed: bool,
        camera: &mut Camera3D,
        room: &Room,
        furniture: &FurnitureRegistry,
    ) {
        let floor_point = Vec2::new(camera.position.x, camera.position.z);

        if jump_pressed && matches!(self.jump, JumpState::Grounded { .. }) {
            self.jump = JumpState::Airborne {
                vertical_velocity: JUMP_SPEED,
            };
        }

        match self.jump {
            JumpState::Airborne { vertical_velocity } => {
                let vertical_velocity = vertical_velocity - GRAVITY * dt;
                let clear_height = camera.position.y;
                let height = clear_height + vertical_velocity * dt;
                let falling = vertical_velocity < 0.0;

                // Dropping into the band above a bench top lands on it.
                let lands_on_bench = falling
                    && height > STANDING_EYE_HEIGHT
                    && furniture.is_over_bench_top(floor_point)
                    && (height <= BENCH_TOP_EYE_HEIGHT
                        || is_blocked(furniture, floor_point, height));

                if lands_on_bench {
                    camera.position.y = BENCH_TOP_EYE_HEIGHT;
                    self.jump = JumpState::Grounded { on_bench: true };
                } else if height <= STANDING_EYE_HEIGHT {
                    camera.position.y = STANDING_EYE_HEIGHT;
                    self.jump = JumpState::Grounded { on_bench: false };
                } else {
                    camera.position.y = height;
                    self.jump = JumpState::Airborne { vertical_velocity };
                }

                if falling && is_blocked(furniture, floor_point, camera.position.y) {
                    self.clear_descent(clear_height, camera, room, furniture);
                }
            }
            JumpState::Grounded { on_bench: true } => {
                if !furniture.is_over_bench_top(floor_point) {
                    self.jump = JumpState::Airborne {
                        vertical_velocity: 0.0,
                    };
                }
            }
            JumpState::Grounded { on_bench: false } => {}
        }
    }

    /// A descent ended inside the margin around a bench but off its top.
    /// Steps out over the nearest free edge, or holds the last clear height
    /// when every edge is walled or occupied.
    fn clear_descent(
        &mut self,
        clear_height: f32,
        camera: &mut Camera3D,
        room: &Room,
        furniture: &FurnitureRegistry,
    ) {
        let point = Vec2::new(camera.position.x, camera.position.z);
        let height = camera.position.y;
        let exit = furniture
            .items()
            .iter()
            .filter(|item| item_blocks(item, point, height))
            .flat_map(|item| margin_exits(item, point))
            .filter(|exit| room.is_walkable(*exit) && !is_blocked(furniture, *exit, height))
            .min_by(|a, b| {
                a.distance_squared(point)
                    .total_cmp(&b.distance_squared(point))
            });

        match exit {
            Some(exit) => {
                if exit.x != point.x {
                    self.velocity.x = 0.0;
                } else {
                    self.velocity.y = 0.0;
                }
                camera.position.x = exit.x;
                camera.position.z = exit.y;
                if self.jump == (JumpState::Grounded { on_bench: true })
                    && !furniture.is_over_bench_top(exit)
                {
                    self.jump = JumpState::Airborne {
                        vertical_velocity: 0.0,
                    };
                }
            }
            None => {
                camera.position.y = clear_height;
                self.jump = JumpState::Airborne {
                    vertical_velocity: 0.0,
                };
            }
        }
    }
}

/// Points just outside `item`'s margin, one per side, in line with `point`.
fn margin_exits(item: &FurnitureItem, point: Vec2) -> [Vec2; 4] {
    let reach = item.half_extents() + Vec2::splat(COLLISION_MARGIN + EDGE_CLEARANCE);
    [
        Vec2::new(item.center.x + reach.x, point.y),
        Vec2::new(item.center.x - reach.x, point.y),
        Vec2::new(point.x, item.center.y + reach.y),
        Vec2::new(point.x, item.center.y - reach.y),
    ]
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::super::furniture::{Footprint, FurnitureKind, Rotation};
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn room() -> Room {
        Room::new(30.0, 40.0, 10.0)
    }

    fn bench_at(center: Vec2) -> FurnitureRegistry {
        let mut builder = FurnitureRegistry::builder();
        builder.add(
            FurnitureKind::Bench,
            "bench",
            center,
            Footprint::new(4.0, 1.0, 1.5),
            Rotation::AxisAligned,
        );
        builder.build()
    }

    fn camera_at(x: f32, y: f32, z: f32) -> Camera3D {
        Camera3D {
            position: Vec3::new(x, y, z),
            ..Camera3D::default()
        }
    }

    fn forward() -> MovementIntent {
        MovementIntent {
            forward: true,
            ..MovementIntent::default()
        }
    }

    #[test]
    fn diagonal_intent_is_normalized() {
        let intent = MovementIntent {
            forward: true,
            right: true,
            ..MovementIntent::default()
        };
        assert!((intent.local_direction().length() - 1.0).abs() < 0.0001);
        let cancelled = MovementIntent {
            left: true,
            right: true,
            ..MovementIntent::default()
        };
        assert_eq!(cancelled.local_direction(), Vec2::ZERO);
    }

    #[test]
    fn forward_intent_moves_toward_negative_z_at_yaw_zero() {
        let mut controller = MovementController::default();
        let mut camera = camera_at(0.0, 2.0, 0.0);
        let empty = FurnitureRegistry::default();
        let outcome = controller.step(DT, forward(), &mut camera, &room(), &empty);

        assert!(outcome.moved_x && outcome.moved_z);
        assert!(camera.position.z < 0.0);
        assert!(camera.position.x.abs() < 0.0001);
        assert!((controller.velocity().y + WALK_ACCELERATION * DT).abs() < 0.0001);
    }

    #[test]
    fn velocity_approaches_terminal_speed() {
        let mut controller = MovementController::default();
        let mut camera = camera_at(0.0, 2.0, 15.0);
        let empty = FurnitureRegistry::default();
        for _ in 0..120 {
            controller.step(DT, forward(), &mut camera, &room(), &empty);
        }
        let speed = controller.velocity().length();
        assert!((speed - 5.0).abs() < 0.1, "speed {speed}");
    }

    #[test]
    fn damping_decays_velocity_without_input() {
        let mut controller = MovementController::default();
        let mut camera = camera_at(0.0, 2.0, 0.0);
        let empty = FurnitureRegistry::default();
        for _ in 0..30 {
            controller.step(DT, forward(), &mut camera, &room(), &empty);
        }
        let moving = controller.velocity().length();
        for _ in 0..60 {
            controller.step(DT, MovementIntent::default(), &mut camera, &room(), &empty);
        }
        assert!(controller.velocity().length() < moving * 0.01);
    }

    #[test]
    fn wall_blocks_and_slides_along_it() {
        let mut controller = MovementController::default();
        let mut camera = camera_at(0.0, 2.0, -18.95);
        camera.yaw = -std::f32::consts::FRAC_PI_4;
        let empty = FurnitureRegistry::default();
        for _ in 0..30 {
            controller.step(DT, forward(), &mut camera, &room(), &empty);
            assert!(room().is_walkable(Vec2::new(camera.position.x, camera.position.z)));
        }
        assert!(camera.position.x > 0.5, "slid to {:?}", camera.position);
        assert!(camera.position.z > -19.0);
    }

    #[test]
    fn bench_blocks_walking_into_it() {
        let furniture = bench_at(Vec2::new(0.0, -3.0));
        let mut controller = MovementController::default();
        let mut camera = camera_at(0.0, 2.0, 0.0);
        for _ in 0..240 {
            controller.step(DT, forward(), &mut camera, &room(), &furniture);
            let point = Vec2::new(camera.position.x, camera.position.z);
            assert!(!is_blocked(&furniture, point, camera.position.y));
        }
        assert!(camera.position.z > -1.96);
        assert!(camera.position.z < -1.5);
    }

    #[test]
    fn jump_rises_then_lands_on_floor() {
        let mut controller = MovementController::default();
        let mut camera = camera_at(5.0, 2.0, 5.0);
        let empty = FurnitureRegistry::default();
        let jump = MovementIntent {
            jump: true,
            ..MovementIntent::default()
        };
        controller.step(DT, jump, &mut camera, &room(), &empty);
        assert!(matches!(controller.jump_state(), JumpState::Airborne { .. }));
        assert!(camera.position.y > 2.0);

        let mut peak = camera.position.y;
        for _ in 0..120 {
            controller.step(DT, MovementIntent::default(), &mut camera, &room(), &empty);
            peak = peak.max(camera.position.y);
        }
        assert_eq!(controller.jump_state(), JumpState::Grounded { on_bench: false });
        assert_eq!(camera.position.y, STANDING_EYE_HEIGHT);
        // v^2 / 2g = 144 / 60
        assert!((peak - (2.0 + 2.4)).abs() < 0.25, "peak {peak}");
    }

    #[test]
    fn falling_over_bench_top_lands_on_it() {
        let furniture = bench_at(Vec2::ZERO);
        let mut controller = MovementController {
            velocity: Vec2::ZERO,
            jump: JumpState::Airborne {
                vertical_velocity: 0.0,
            },
        };
        let mut camera = camera_at(0.5, 4.6, 0.2);
        for _ in 0..60 {
            controller.step(DT, MovementIntent::default(), &mut camera, &room(), &furniture);
        }
        assert_eq!(controller.jump_state(), JumpState::Grounded { on_bench: true });
        assert_eq!(camera.position.y, BENCH_TOP_EYE_HEIGHT);
    }

    #[test]
    fn bench_edge_keeps_walker_on_top() {
        let furniture = bench_at(Vec2::ZERO);
        let mut controller = MovementController {
            velocity: Vec2::ZERO,
            jump: JumpState::Grounded { on_bench: true },
        };
        let mut camera = camera_at(0.0, 3.0, 0.0);
        camera.yaw = -std::f32::consts::FRAC_PI_2;

        for _ in 0..120 {
            controller.step(DT, forward(), &mut camera, &room(), &furniture);
        }
        assert!(camera.position.x <= 1.9 && camera.position.x > 1.5);
        assert_eq!(controller.jump_state(), JumpState::Grounded { on_bench: true });
        assert_eq!(camera.position.y, BENCH_TOP_EYE_HEIGHT);
    }

    #[test]
    fn jumping_off_bench_top_lands_on_floor() {
        let furniture = bench_at(Vec2::ZERO);
        let mut controller = MovementController {
            velocity: Vec2::ZERO,
            jump: JumpState::Grounded { on_bench: true },
        };
        let mut camera = camera_at(1.0, 3.0, 0.0);
        camera.yaw = -std::f32::consts::FRAC_PI_2;
        let jump_forward = MovementIntent {
            jump: true,
            ..forward()
        };

        controller.step(DT, jump_forward, &mut camera, &room(), &furniture);
        assert!(matches!(controller.jump_state(), JumpState::Airborne { .. }));
        for _ in 0..120 {
            controller.step(DT, forward(), &mut camera, &room(), &furniture);
        }
        assert_eq!(controller.jump_state(), JumpState::Grounded { on_bench: false });
        assert_eq!(camera.position.y, STANDING_EYE_HEIGHT);
        assert!(camera.position.x > 2.3);
    }

    #[test]
    fn jumping_onto_a_bench_edge_never_ends_inside_it() {
        let furniture = bench_at(Vec2::ZERO);
        for step in 0..60 {
            let start_x = 2.36 + step as f32 * 0.016;
            let mut controller = MovementController::default();
            let mut camera = camera_at(start_x, 2.0, 0.0);
            camera.yaw = std::f32::consts::FRAC_PI_2;

            for tick in 0..90 {
                let intent = MovementIntent {
                    forward: tick < 12,
                    jump: tick == 0,
                    ..MovementIntent::default()
                };
                controller.step(DT, intent, &mut camera, &room(), &furniture);
                let point = Vec2::new(camera.position.x, camera.position.z);
                assert!(
                    !is_blocked(&furniture, point, camera.position.y),
                    "start x={start_x} tick {tick}: {:?} blocked",
                    camera.position
                );
            }
            assert!(
                matches!(controller.jump_state(), JumpState::Grounded { .. }),
                "start x={start_x} still airborne"
            );
        }
    }

    #[test]
    fn descent_into_bench_margin_steps_out_over_nearest_edge() {
        let furniture = bench_at(Vec2::ZERO);
        let mut controller = MovementController {
            velocity: Vec2::ZERO,
            jump: JumpState::Airborne {
                vertical_velocity: 0.0,
            },
        };
        let mut camera = camera_at(2.2, 4.05, 0.1);
        for _ in 0..60 {
            controller.step(DT, MovementIntent::default(), &mut camera, &room(), &furniture);
        }
        assert_eq!(controller.jump_state(), JumpState::Grounded { on_bench: false });
        assert_eq!(camera.position.y, STANDING_EYE_HEIGHT);
        assert!(camera.position.x >= 2.3 && camera.position.x < 2.31);
        assert_eq!(camera.position.z, 0.1);
    }

    #[test]
    fn descent_over_bench_top_lands_before_entering_its_band() {
        let furniture = bench_at(Vec2::ZERO);
        let mut controller = MovementController {
            velocity: Vec2::ZERO,
            jump: JumpState::Airborne {
                vertical_velocity: 0.0,
            },
        };
        let mut camera = camera_at(1.5, 4.05, 0.0);
        let mut lowest_airborne = camera.position.y;
        for _ in 0..60 {
            controller.step(DT, MovementIntent::default(), &mut camera, &room(), &furniture);
            let point = Vec2::new(camera.position.x, camera.position.z);
            assert!(!is_blocked(&furniture, point, camera.position.y));
            if matches!(controller.jump_state(), JumpState::Airborne { .. }) {
                lowest_airborne = lowest_airborne.min(camera.position.y);
            }
        }
        assert!(lowest_airborne > 4.0, "dropped to {lowest_airborne} over the bench");
        assert_eq!(controller.jump_state(), JumpState::Grounded { on_bench: true });
        assert_eq!(camera.position.y, BENCH_TOP_EYE_HEIGHT);
    }

    #[test]
    fn settle_at_derives_jump_state_from_height() {
        let furniture = bench_at(Vec2::ZERO);
        let mut controller = MovementController::default();

        controller.settle_at(3.0, Vec2::new(0.5, 0.2), &furniture);
        assert_eq!(controller.jump_state(), JumpState::Grounded { on_bench: true });

        controller.settle_at(3.0, Vec2::new(8.0, 8.0), &furniture);
        assert!(matches!(controller.jump_state(), JumpState::Airborne { .. }));

        controller.settle_at(2.0, Vec2::new(8.0, 8.0), &furniture);
        assert_eq!(controller.jump_state(), JumpState::Grounded { on_bench: false });
        assert_eq!(controller.velocity(), Vec2::ZERO);
    }
}
