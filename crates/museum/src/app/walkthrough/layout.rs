use std::f32::consts::{FRAC_PI_2, PI};
use std::path::Path;

use glam::{Vec2, Vec3};
use tracing::debug;

use super::artwork::{Artwork, ArtworkPlacement, ArtworkRegistry};
use super::furniture::{Footprint, FurnitureKind, FurnitureRegistry, Rotation};
use super::room::{Room, WallSide};
use crate::app::config::ExhibitConfig;

const ARTWORK_HANG_HEIGHT: f32 = 5.0;
const ARTWORK_WALL_INSET: f32 = 0.1;

const BENCH: Footprint = Footprint::new(4.0, 1.0, 1.5);
const PLANTER: Footprint = Footprint::new(1.5, 2.0, 1.5);
const GIFT_BOX: Footprint = Footprint::new(1.0, 1.0, 1.0);
const SMALL_GIFT_BOX: Footprint = Footprint::new(0.7, 0.7, 0.7);
const BALLOON_CLUSTER: Footprint = Footprint::new(1.2, 4.0, 1.2);
const LANTERN_STAND: Footprint = Footprint::new(0.6, 3.0, 0.6);

/// Distance of side benches and corner planters from the walls.
const SIDE_BENCH_WALL_GAP: f32 = 3.5;
const PLANTER_WALL_GAP: f32 = 1.8;

/// Props scaled to the room so the center and the quarter points stay clear.
pub(crate) fn build_furniture(room: &Room) -> FurnitureRegistry {
    let half = room.half_extents();
    let (u, v) = (half.x, half.y);
    let mut builder = FurnitureRegistry::builder();

    builder
        .add(
            FurnitureKind::Bench,
            "bench_north_row",
            Vec2::new(0.0, -v * 0.25),
            BENCH,
            Rotation::AxisAligned,
        )
        .add(
            FurnitureKind::Bench,
            "bench_south_row",
            Vec2::new(0.0, v * 0.25),
            BENCH,
            Rotation::AxisAligned,
        )
        .add(
            FurnitureKind::Bench,
            "bench_east_side",
            Vec2::new(u - SIDE_BENCH_WALL_GAP, 0.0),
            BENCH,
            Rotation::QuarterTurn,
        )
        .add(
            FurnitureKind::Bench,
            "bench_west_side",
            Vec2::new(-(u - SIDE_BENCH_WALL_GAP), 0.0),
            BENCH,
            Rotation::QuarterTurn,
        );

    let planter = Vec2::new(u - PLANTER_WALL_GAP, v - PLANTER_WALL_GAP);
    for (label, sign) in [
        ("planter_north_east", Vec2::new(1.0, -1.0)),
        ("planter_north_west", Vec2::new(-1.0, -1.0)),
        ("planter_south_east", Vec2::new(1.0, 1.0)),
        ("planter_south_west", Vec2::new(-1.0, 1.0)),
    ] {
        builder.add(
            FurnitureKind::Planter,
            label,
            planter * sign,
            PLANTER,
            Rotation::AxisAligned,
        );
    }

    let gift = Vec2::new(u * 0.55, v * 0.75);
    builder
        .add(
            FurnitureKind::Decoration,
            "gift_box",
            gift,
            GIFT_BOX,
            Rotation::AxisAligned,
        )
        .add(
            FurnitureKind::Decoration,
            "gift_box_small",
            gift + Vec2::new(1.2, 0.0),
            SMALL_GIFT_BOX,
            Rotation::AxisAligned,
        )
        .add(
            FurnitureKind::Decoration,
            "gift_box_far",
            -gift,
            GIFT_BOX,
            Rotation::QuarterTurn,
        );

    let balloons = Vec2::new(u * 0.75, v * 0.55);
    builder
        .add(
            FurnitureKind::Decoration,
            "balloons_south_west",
            Vec2::new(-balloons.x, balloons.y),
            BALLOON_CLUSTER,
            Rotation::AxisAligned,
        )
        .add(
            FurnitureKind::Decoration,
            "balloons_north_east",
            Vec2::new(balloons.x, -balloons.y),
            BALLOON_CLUSTER,
            Rotation::AxisAligned,
        );

    let lantern = Vec2::new(u * 0.3, v * 0.85);
    for (label, sign) in [
        ("lantern_north_east", Vec2::new(1.0, -1.0)),
        ("lantern_north_west", Vec2::new(-1.0, -1.0)),
        ("lantern_south_east", Vec2::new(1.0, 1.0)),
        ("lantern_south_west", Vec2::new(-1.0, 1.0)),
    ] {
        builder.add(
            FurnitureKind::Decoration,
            label,
            lantern * sign,
            LANTERN_STAND,
            Rotation::AxisAligned,
        );
    }

    builder.build()
}

/// Hangs catalog entries on their walls, evenly spaced, in catalog order.
///
/// Registry indices match catalog indices.
pub(crate) fn place_artworks(
    room: &Room,
    exhibits: &[ExhibitConfig],
    images_dir: &Path,
) -> ArtworkRegistry {
    let per_wall = |side: WallSide| exhibits.iter().filter(|exhibit| exhibit.wall == side).count();
    let mut slot_on_wall = [0usize; 4];

    let artworks = exhibits
        .iter()
        .map(|exhibit| {
            let wall_index = wall_slot_index(exhibit.wall);
            let slot = slot_on_wall[wall_index];
            slot_on_wall[wall_index] += 1;

            let placement = wall_placement(room, exhibit.wall, slot, per_wall(exhibit.wall));
            debug!(
                title = %exhibit.title,
                wall = ?exhibit.wall,
                x = placement.position.x,
                z = placement.position.z,
                "artwork_placed"
            );
            Artwork::new(
                placement,
                exhibit.max_extent,
                exhibit.title.clone(),
                exhibit.description.clone(),
                images_dir.join(&exhibit.image),
            )
        })
        .collect();

    ArtworkRegistry::new(artworks)
}

fn wall_slot_index(side: WallSide) -> usize {
    match side {
        WallSide::North => 0,
        WallSide::South => 1,
        WallSide::East => 2,
        WallSide::West => 3,
    }
}

fn wall_placement(room: &Room, side: WallSide, slot: usize, count: usize) -> ArtworkPlacement {
    let half = room.half_extents();
    let span = match side {
        WallSide::North | WallSide::South => room.width,
        WallSide::East | WallSide::West => room.length,
    };
    let along = -span * 0.5 + span * (slot + 1) as f32 / (count + 1) as f32;

    let (position, yaw) = match side {
        WallSide::North => (
            Vec3::new(along, ARTWORK_HANG_HEIGHT, -half.y + ARTWORK_WALL_INSET),
            0.0,
        ),
        WallSide::South => (
            Vec3::new(along, ARTWORK_HANG_HEIGHT, half.y - ARTWORK_WALL_INSET),
            PI,
        ),
        WallSide::West => (
            Vec3::new(-half.x + ARTWORK_WALL_INSET, ARTWORK_HANG_HEIGHT, along),
            FRAC_PI_2,
        ),
        WallSide::East => (
            Vec3::new(half.x - ARTWORK_WALL_INSET, ARTWORK_HANG_HEIGHT, along),
            -FRAC_PI_2,
        ),
    };
    ArtworkPlacement { position, yaw }
}
