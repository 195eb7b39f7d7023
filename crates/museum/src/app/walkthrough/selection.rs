use std::f32::consts::{FRAC_PI_4, PI};

use glam::Vec3;

use super::artwork::Artwork;

const MIN_SELECTION_DISTANCE: f32 = 10.0;
const DISTANCE_SIZE_FACTOR: f32 = 3.0;
const ANGLE_SIZE_DIVISOR: f32 = 5.0;
const ANGLE_SCORE_WEIGHT: f32 = 10.0;

/// Picks the loaded artwork the camera is most plausibly looking at.
///
/// Candidates must be closer than `max(10, size * 3)` and within a view cone
/// that widens with the artwork's smaller side. Ties keep the earliest entry.
pub(crate) fn select_focus_target(
    camera_position: Vec3,
    camera_forward: Vec3,
    artworks: &[Artwork],
) -> Option<usize> {
    let forward = camera_forward.normalize_or_zero();
    let mut best: Option<(usize, f32)> = None;

    for (index, artwork) in artworks.iter().enumerate() {
        if !artwork.is_loaded() {
            continue;
        }
        let Some(score) = score_candidate(camera_position, forward, artwork) else {
            continue;
        };
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    best.map(|(index, _)| index)
}

fn score_candidate(camera_position: Vec3, forward: Vec3, artwork: &Artwork) -> Option<f32> {
    let offset = artwork.position() - camera_position;
    let distance = offset.length();
    let size = artwork.width.max(artwork.height);
    let max_distance = MIN_SELECTION_DISTANCE.max(size * DISTANCE_SIZE_FACTOR);
    if !distance.is_finite() || distance >= max_distance {
        return None;
    }

    let direction = offset.normalize_or_zero();
    let angle = forward.dot(direction).clamp(-1.0, 1.0).acos();
    let angle_threshold =
        FRAC_PI_4 * (1.0 + artwork.width.min(artwork.height) / ANGLE_SIZE_DIVISOR);
    if angle >= angle_threshold {
        return None;
    }

    Some((1.0 - angle / PI) * ANGLE_SCORE_WEIGHT + (max_distance - distance) + size)
}
