use std::path::PathBuf;

use engine::Camera3D;
use glam::{Vec2, Vec3};

use super::artwork::{Artwork, ArtworkPlacement, ArtworkRegistry, ImageDimensions};
use super::collision::is_blocked;
use super::focus::FocusController;
use super::furniture::{Footprint, FurnitureKind, FurnitureRegistry, Rotation};
use super::layout::build_furniture;
use super::loader::LoadCompletion;
use super::movement::{JumpState, MovementController, MovementIntent};
use super::room::Room;
use super::selection::select_focus_target;
use super::state::{SimulationState, TickInput};
use super::{LOOK_SENSITIVITY_RAD_PER_PX, STANDING_EYE_HEIGHT};

const DT: f32 = 1.0 / 60.0;
const LANDSCAPE: ImageDimensions = ImageDimensions {
    width: 300,
    height: 200,
};

fn room() -> Room {
    Room::new(30.0, 40.0, 10.0)
}

fn north_wall_artwork(x: f32, title: &str) -> Artwork {
    Artwork::new(
        ArtworkPlacement {
            position: Vec3::new(x, 5.0, -19.9),
            yaw: 0.0,
        },
        3.0,
        title,
        format!("{title} description"),
        PathBuf::from(format!("{title}.png")),
    )
}

/// Default layout with the given north-wall artworks, all loaded.
fn museum_state(artwork_xs: &[f32]) -> SimulationState {
    let room = room();
    let artworks = artwork_xs
        .iter()
        .enumerate()
        .map(|(index, x)| north_wall_artwork(*x, &format!("art{index}")))
        .collect();
    let mut state = SimulationState::new(
        room,
        build_furniture(&room),
        ArtworkRegistry::new(artworks),
    );
    for index in 0..artwork_xs.len() {
        state.apply_load_completion(LoadCompletion {
            index,
            result: Ok(LANDSCAPE),
        });
    }
    state
}

fn place(state: &mut SimulationState, position: Vec3, yaw: f32, pitch: f32) -> Camera3D {
    let camera = Camera3D {
        position,
        yaw,
        pitch,
    };
    *state.camera_mut() = camera;
    camera
}

fn focus_toggle() -> TickInput {
    TickInput {
        focus_toggle: true,
        ..TickInput::default()
    }
}

fn capture() -> TickInput {
    TickInput {
        capture: true,
        ..TickInput::default()
    }
}

fn walk_forward() -> TickInput {
    TickInput {
        intent: MovementIntent {
            forward: true,
            ..MovementIntent::default()
        },
        ..TickInput::default()
    }
}

fn standard_bench() -> FurnitureRegistry {
    let mut builder = FurnitureRegistry::builder();
    builder.add(
        FurnitureKind::Bench,
        "bench",
        Vec2::ZERO,
        Footprint::new(4.0, 1.0, 1.5),
        Rotation::AxisAligned,
    );
    builder.build()
}

#[test]
fn documented_bench_cases() {
    let bench = standard_bench();
    assert!(is_blocked(&bench, Vec2::new(0.0, 0.5), 1.0));
    assert!(!is_blocked(&bench, Vec2::new(0.0, 0.5), 4.5));
    assert!(!is_blocked(&bench, Vec2::new(1.9, 0.6), 3.0));
    assert!(is_blocked(&bench, Vec2::new(1.95, 0.7), 3.0));
}

#[test]
fn solid_furniture_blocking_ignores_height() {
    let furniture = build_furniture(&room());
    let heights = [0.0, 1.0, 2.0, 2.5, 3.5, 4.0, 6.0, 9.0];
    for item in furniture
        .items()
        .iter()
        .filter(|item| item.kind != FurnitureKind::Bench)
    {
        let half = item.half_extents();
        let inside = item.center + half * 0.5;
        let outside = item.center + Vec2::new(half.x + 0.5, 0.0);
        for height in heights {
            assert!(is_blocked(&furniture, inside, height), "{}", item.label);
            let outside_hit = furniture.items().iter().any(|other| {
                let delta = (outside - other.center).abs();
                let other_half = other.half_extents() + Vec2::splat(0.3);
                delta.x < other_half.x && delta.y < other_half.y
            });
            if !outside_hit {
                assert!(!is_blocked(&furniture, outside, height), "{}", item.label);
            }
        }
    }
}

#[test]
fn focus_round_trip_restores_pose_exactly() {
    let poses = [
        (Vec3::new(0.0, 2.0, -14.0), 0.0, 0.0),
        (Vec3::new(3.0, 2.0, -12.0), 0.2, 0.1),
        (Vec3::new(-4.0, 2.0, -15.0), -0.3, -0.05),
    ];
    for (position, yaw, pitch) in poses {
        let mut state = museum_state(&[0.0]);
        let original = place(&mut state, position, yaw, pitch);
        assert!(!is_blocked(
            state.furniture(),
            Vec2::new(position.x, position.z),
            position.y
        ));

        state.tick(DT, &focus_toggle());
        assert!(state.is_focused(), "no focus from {position:?}");
        assert_ne!(*state.camera(), original);

        state.tick(DT, &focus_toggle());
        assert!(!state.is_focused());
        assert_eq!(*state.camera(), original);
    }
}

#[test]
fn cancel_also_exits_focus() {
    let mut state = museum_state(&[0.0]);
    let original = place(&mut state, Vec3::new(0.0, 2.0, -14.0), 0.0, 0.0);
    state.tick(DT, &focus_toggle());
    state.tick(
        DT,
        &TickInput {
            cancel: true,
            ..TickInput::default()
        },
    );
    assert!(!state.is_focused());
    assert_eq!(*state.camera(), original);
    assert!(state.pointer_captured());
}

#[test]
fn repeated_focus_request_has_no_further_effect() {
    let room = room();
    let mut artworks = ArtworkRegistry::new(vec![north_wall_artwork(0.0, "only")]);
    artworks.mark_loaded(0, LANDSCAPE).expect("load");
    let mut controller = FocusController::default();
    let mut camera = Camera3D {
        position: Vec3::new(1.0, 2.0, -13.0),
        ..Camera3D::default()
    };

    assert_eq!(controller.enter(&mut camera, &room, &artworks), Some(0));
    let framed = camera;
    let session = controller.session().copied();

    assert_eq!(controller.enter(&mut camera, &room, &artworks), None);
    assert_eq!(camera, framed);
    assert_eq!(controller.session().copied(), session);
}

#[test]
fn focus_entry_shows_panel_and_releases_capture() {
    let mut state = museum_state(&[0.0]);
    state.tick(DT, &capture());
    assert!(state.pointer_captured());
    place(&mut state, Vec3::new(0.0, 2.0, -14.0), 0.0, 0.0);

    state.tick(DT, &focus_toggle());
    assert!(!state.pointer_captured());
    let panel = state.info_panel().expect("panel");
    assert_eq!(panel.title, "art0");
    assert_eq!(panel.description, "art0 description");

    state.tick(DT, &focus_toggle());
    assert!(state.pointer_captured());
    assert!(state.info_panel().is_none());
}

#[test]
fn movement_is_suspended_while_focused() {
    let mut state = museum_state(&[0.0]);
    state.tick(DT, &capture());
    place(&mut state, Vec3::new(0.0, 2.0, -14.0), 0.0, 0.0);
    state.tick(DT, &focus_toggle());
    let framed = *state.camera();

    let busy = TickInput {
        look_delta_px: Vec2::new(40.0, -25.0),
        capture: true,
        ..walk_forward()
    };
    for _ in 0..30 {
        state.tick(DT, &busy);
    }
    assert_eq!(*state.camera(), framed);
    assert!(state.is_focused());
}

#[test]
fn focus_request_without_loaded_artwork_is_ignored() {
    let room = room();
    let artworks = ArtworkRegistry::new(vec![north_wall_artwork(0.0, "pending")]);
    let mut state = SimulationState::new(room, build_furniture(&room), artworks);
    let original = place(&mut state, Vec3::new(0.0, 2.0, -14.0), 0.0, 0.0);

    state.tick(DT, &focus_toggle());
    assert!(!state.is_focused());
    assert_eq!(*state.camera(), original);
}

#[test]
fn exit_from_blocked_saved_pose_lands_on_nearest_free_fallback() {
    let mut state = museum_state(&[10.0]);
    // Inside the north-east corner planter.
    let yaw = 1.0826;
    place(&mut state, Vec3::new(13.2, 2.0, -18.2), yaw, 0.0);
    assert!(is_blocked(state.furniture(), Vec2::new(13.2, -18.2), 2.0));

    state.tick(DT, &focus_toggle());
    assert!(state.is_focused());
    state.tick(DT, &focus_toggle());

    let camera = state.camera();
    assert_eq!(camera.position, Vec3::new(7.5, STANDING_EYE_HEIGHT, -10.0));
    assert_eq!(camera.yaw, yaw);
    assert_eq!(
        state.movement().jump_state(),
        JumpState::Grounded { on_bench: false }
    );
}

#[test]
fn selection_prefers_higher_score_in_any_registry_order() {
    let eye = Vec3::new(0.0, 2.0, -12.0);
    let layouts: [[f32; 3]; 4] = [
        [0.0, 4.0, -6.0],
        [-2.5, 1.0, 7.0],
        [3.0, -3.5, 0.5],
        [6.5, -1.5, 2.0],
    ];
    for yaw in [-0.4f32, 0.0, 0.3] {
        let forward = Camera3D {
            position: eye,
            yaw,
            pitch: 0.1,
        }
        .forward();
        for xs in layouts {
            let build = |order: &[usize]| {
                let artworks = order
                    .iter()
                    .map(|&slot| north_wall_artwork(xs[slot], &format!("slot{slot}")))
                    .collect();
                let mut registry = ArtworkRegistry::new(artworks);
                for index in 0..order.len() {
                    registry.mark_loaded(index, LANDSCAPE).expect("load");
                }
                registry
            };
            let forward_order = build(&[0, 1, 2]);
            let reverse_order = build(&[2, 1, 0]);

            let pick = |registry: &ArtworkRegistry| {
                select_focus_target(eye, forward, registry.as_slice())
                    .and_then(|index| registry.get(index))
                    .map(|artwork| artwork.title.clone())
            };
            assert_eq!(pick(&forward_order), pick(&reverse_order), "{xs:?} yaw {yaw}");
        }
    }
}

#[test]
fn watchdog_recovers_on_the_next_tick() {
    let escapes = [
        Vec3::new(40.0, 2.0, 0.0),
        Vec3::new(0.0, 2.0, -26.0),
        Vec3::new(3.0, -0.5, 3.0),
        Vec3::new(f32::NAN, 2.0, 0.0),
        Vec3::new(0.0, f32::INFINITY, 0.0),
    ];
    for escaped in escapes {
        let mut state = museum_state(&[]);
        place(&mut state, escaped, 0.4, -0.2);
        state.tick(DT, &walk_forward());

        let camera = state.camera();
        assert_eq!(camera.position, Vec3::new(0.0, 2.0, 0.0), "from {escaped:?}");
        assert_eq!((camera.yaw, camera.pitch), (0.4, -0.2));
        assert_eq!(state.movement().velocity(), Vec2::ZERO);
        assert!(state.pointer_captured());
    }
}

#[test]
fn walking_into_walls_never_trips_the_watchdog() {
    let mut state = museum_state(&[]);
    state.tick(DT, &capture());
    place(&mut state, Vec3::new(-6.0, 2.0, 10.0), 2.6, 0.0);
    for _ in 0..600 {
        state.tick(DT, &walk_forward());
        let position = state.camera().position;
        assert!(!state.room().is_outside_watchdog_volume(position));
        assert!(state.room().is_walkable(Vec2::new(position.x, position.z)));
    }
}

#[test]
fn emergency_reset_recovers_from_focus() {
    let mut state = museum_state(&[0.0]);
    place(&mut state, Vec3::new(0.0, 2.0, -14.0), 0.3, 0.0);
    state.tick(DT, &focus_toggle());
    assert!(state.is_focused());

    state.tick(
        DT,
        &TickInput {
            emergency_reset: true,
            ..TickInput::default()
        },
    );
    assert!(!state.is_focused());
    assert!(state.info_panel().is_none());
    assert!(state.pointer_captured());
    assert_eq!(state.camera().position, Vec3::new(0.0, 2.0, 0.0));
}

#[test]
fn intents_and_look_are_ignored_until_capture() {
    let mut state = museum_state(&[]);
    let original = place(&mut state, Vec3::new(3.0, 2.0, 8.0), 0.0, 0.0);
    let look_and_walk = TickInput {
        look_delta_px: Vec2::new(100.0, 50.0),
        ..walk_forward()
    };
    for _ in 0..30 {
        state.tick(DT, &look_and_walk);
    }
    assert_eq!(*state.camera(), original);

    state.tick(DT, &capture());
    state.tick(DT, &look_and_walk);
    let camera = state.camera();
    assert!((camera.yaw + 100.0 * LOOK_SENSITIVITY_RAD_PER_PX).abs() < 0.0001);
    assert!((camera.pitch + 50.0 * LOOK_SENSITIVITY_RAD_PER_PX).abs() < 0.0001);
    assert_ne!(camera.position, original.position);
}

#[test]
fn escape_releases_capture_and_stops_walking() {
    let mut state = museum_state(&[]);
    place(&mut state, Vec3::new(3.0, 2.0, 8.0), 0.0, 0.0);
    state.tick(DT, &capture());
    state.tick(
        DT,
        &TickInput {
            cancel: true,
            ..TickInput::default()
        },
    );
    assert!(!state.pointer_captured());

    for _ in 0..120 {
        state.tick(DT, &walk_forward());
    }
    let settled = state.camera().position;
    state.tick(DT, &walk_forward());
    assert_eq!(state.camera().position, settled);
}

/// The only pose allowed inside a bench's blocked band: rising straight up off
/// its top, where horizontal moves are refused until the jump clears it.
fn rising_off_bench_top(
    controller: &MovementController,
    furniture: &FurnitureRegistry,
    point: Vec2,
) -> bool {
    matches!(
        controller.jump_state(),
        JumpState::Airborne { vertical_velocity } if vertical_velocity > 0.0
    ) && furniture.is_over_bench_top(point)
}

#[test]
fn movement_never_commits_an_illegal_position() {
    let room = room();
    let furniture = build_furniture(&room);
    let starts = [
        Vec3::new(0.0, 2.0, -2.0),
        Vec3::new(13.5, 2.0, 0.0),
        Vec3::new(-11.0, 2.0, -16.0),
        Vec3::new(8.0, 2.0, 13.0),
        // Beside the north-row bench, off its end and off its long side.
        Vec3::new(2.5, 2.0, -5.0),
        Vec3::new(0.0, 2.0, -3.8),
        // Beside the rotated east-side bench.
        Vec3::new(10.3, 2.0, 0.5),
    ];
    let yaws = [0.0f32, 0.7, 1.6, 3.1, -2.2];

    for start in starts {
        assert!(room.is_walkable(Vec2::new(start.x, start.z)));
        assert!(!is_blocked(&furniture, Vec2::new(start.x, start.z), start.y));

        for bits in 0u8..32 {
            let held = MovementIntent {
                forward: bits & 1 != 0,
                backward: bits & 2 != 0,
                left: bits & 4 != 0,
                right: bits & 8 != 0,
                jump: bits & 16 != 0,
            };
            for yaw in yaws {
                let mut controller = MovementController::default();
                let mut camera = Camera3D {
                    position: start,
                    yaw,
                    pitch: 0.0,
                };
                for tick in 0..120 {
                    // Directions let go partway so a jump can drift down onto an edge.
                    let intent = if tick < 15 {
                        held
                    } else {
                        MovementIntent {
                            jump: held.jump,
                            ..MovementIntent::default()
                        }
                    };
                    controller.step(DT, intent, &mut camera, &room, &furniture);
                    let point = Vec2::new(camera.position.x, camera.position.z);
                    assert!(room.is_walkable(point), "{point:?} outside walls");
                    assert!(
                        !is_blocked(&furniture, point, camera.position.y)
                            || rising_off_bench_top(&controller, &furniture, point),
                        "start {start:?} yaw {yaw} intent {bits} tick {tick}: \
                         {:?} blocked",
                        camera.position
                    );
                }
            }
        }
    }
}
