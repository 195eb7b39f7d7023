use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

const PLAN_VIEW_PADDING_PX: f32 = 24.0;
const PLAN_VIEW_MIN_PIXELS_PER_WORLD: f32 = 0.5;

/// Top-down projection of the room floor. World +X maps to screen right and
/// world +Z maps to screen down, so the -Z wall sits at the top of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlanView {
    pixels_per_world: f32,
    center_px: Vec2,
}

impl PlanView {
    pub(crate) fn fit(room_half_extents: Vec2, viewport: Viewport) -> Self {
        let center_px = Vec2::new(viewport.width as f32 * 0.5, viewport.height as f32 * 0.5);
        let usable = Vec2::new(
            (viewport.width as f32 - PLAN_VIEW_PADDING_PX * 2.0).max(1.0),
            (viewport.height as f32 - PLAN_VIEW_PADDING_PX * 2.0).max(1.0),
        );
        let extent = room_half_extents.max(Vec2::splat(1.0)) * 2.0;
        let pixels_per_world = (usable.x / extent.x)
            .min(usable.y / extent.y)
            .max(PLAN_VIEW_MIN_PIXELS_PER_WORLD);
        Self {
            pixels_per_world,
            center_px,
        }
    }

    /// Projects a floor point given as (x, z).
    pub(crate) fn to_screen(&self, floor_point: Vec2) -> (i32, i32) {
        let screen = self.center_px + floor_point * self.pixels_per_world;
        (screen.x.round() as i32, screen.y.round() as i32)
    }

    pub(crate) fn scale_len(&self, world_len: f32) -> i32 {
        (world_len * self.pixels_per_world).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_origin_maps_to_viewport_center() {
        let view = PlanView::fit(
            Vec2::new(15.0, 20.0),
            Viewport {
                width: 800,
                height: 600,
            },
        );
        assert_eq!(view.to_screen(Vec2::ZERO), (400, 300));
    }

    #[test]
    fn fit_uses_the_tighter_axis() {
        let viewport = Viewport {
            width: 848,
            height: 448,
        };
        let view = PlanView::fit(Vec2::new(20.0, 10.0), viewport);
        assert!((view.pixels_per_world - 20.0).abs() < 0.0001);
        assert_eq!(view.to_screen(Vec2::new(20.0, 10.0)), (824, 424));
        assert_eq!(view.to_screen(Vec2::new(-20.0, -10.0)), (24, 24));
    }

    #[test]
    fn tiny_viewport_keeps_positive_scale() {
        let view = PlanView::fit(
            Vec2::new(15.0, 20.0),
            Viewport {
                width: 1,
                height: 1,
            },
        );
        assert!(view.pixels_per_world >= PLAN_VIEW_MIN_PIXELS_PER_WORLD);
        assert_eq!(view.scale_len(2.0), (2.0 * view.pixels_per_world).round() as i32);
    }
}
