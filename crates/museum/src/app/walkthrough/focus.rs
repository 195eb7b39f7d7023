use engine::Camera3D;
use glam::{Vec2, Vec3};

use super::artwork::{Artwork, ArtworkRegistry};
use super::collision::is_blocked;
use super::furniture::FurnitureRegistry;
use super::room::Room;
use super::selection::select_focus_target;
use super::{FOCUS_MIN_DISTANCE, FOCUS_SIZE_FACTOR, STANDING_EYE_HEIGHT};

/// Saved state for one inspection, alive between focus enter and exit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FocusSession {
    pub(crate) saved_camera: Camera3D,
    pub(crate) artwork_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) enum FocusState {
    #[default]
    Free,
    Focused(FocusSession),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FocusController {
    state: FocusState,
}

impl FocusController {
    pub(crate) fn is_focused(&self) -> bool {
        matches!(self.state, FocusState::Focused(_))
    }

    pub(crate) fn session(&self) -> Option<&FocusSession> {
        match &self.state {
            FocusState::Focused(session) => Some(session),
            FocusState::Free => None,
        }
    }

    /// Frames the best loaded artwork. Returns its index, or `None` when
    /// already focused or nothing qualifies.
    pub(crate) fn enter(
        &mut self,
        camera: &mut Camera3D,
        room: &Room,
        artworks: &ArtworkRegistry,
    ) -> Option<usize> {
        if self.is_focused() {
            return None;
        }
        let index = select_focus_target(camera.position, camera.forward(), artworks.as_slice())?;
        let artwork = artworks.get(index)?;

        self.state = FocusState::Focused(FocusSession {
            saved_camera: *camera,
            artwork_index: index,
        });
        *camera = focus_pose(artwork, room);
        Some(index)
    }

    /// Restores the validated saved pose. Returns `false` when not focused.
    pub(crate) fn exit(
        &mut self,
        camera: &mut Camera3D,
        room: &Room,
        furniture: &FurnitureRegistry,
    ) -> bool {
        let FocusState::Focused(session) = std::mem::take(&mut self.state) else {
            return false;
        };
        *camera = validated_restore(session.saved_camera, room, furniture);
        true
    }

    /// Drops the session without touching the camera.
    pub(crate) fn abandon(&mut self) -> bool {
        matches!(std::mem::take(&mut self.state), FocusState::Focused(_))
    }
}

/// Camera pose that frames `artwork` from in front of its wall.
pub(crate) fn focus_pose(artwork: &Artwork, room: &Room) -> Camera3D {
    let distance =
        FOCUS_MIN_DISTANCE.max(artwork.width.max(artwork.height) * FOCUS_SIZE_FACTOR);
    let target = artwork.position() + artwork.placement.outward_normal() * distance;
    let floor_point = room.clamp_focus(Vec2::new(target.x, target.z));

    let mut camera = Camera3D {
        position: Vec3::new(floor_point.x, room.focus_eye_height(), floor_point.y),
        yaw: 0.0,
        pitch: 0.0,
    };
    camera.look_at(artwork.position());
    camera
}

/// Clamps a saved pose back into the room and moves it to the nearest free
/// fallback point if furniture now occupies it. Orientation is kept verbatim.
pub(crate) fn validated_restore(
    saved: Camera3D,
    room: &Room,
    furniture: &FurnitureRegistry,
) -> Camera3D {
    let saved_point = Vec2::new(saved.position.x, saved.position.z);
    let clamped = room.clamp_walkable(saved_point);
    let height = saved.position.y.max(STANDING_EYE_HEIGHT);

    let position = if is_blocked(furniture, clamped, height) {
        let fallback = nearest_free_fallback(room, furniture, saved_point).unwrap_or(Vec2::ZERO);
        Vec3::new(fallback.x, STANDING_EYE_HEIGHT, fallback.y)
    } else {
        Vec3::new(clamped.x, height, clamped.y)
    };

    Camera3D { position, ..saved }
}

fn nearest_free_fallback(
    room: &Room,
    furniture: &FurnitureRegistry,
    reference: Vec2,
) -> Option<Vec2> {
    let mut best: Option<(Vec2, f32)> = None;
    for point in room.fallback_points() {
        if is_blocked(furniture, point, STANDING_EYE_HEIGHT) {
            continue;
        }
        let distance = point.distance_squared(reference);
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((point, distance));
        }
    }
    best.map(|(point, _)| point)
}
