use std::sync::Arc;

use glam::Vec2;
use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::tools::draw_overlay;
use crate::app::{OverlayData, PlanShape, PlanShapeKind, SceneWorld};

use super::raster::{clear, fill_rect, line, rect_outline};
use super::{PlanView, Viewport};

const CLEAR_COLOR: [u8; 4] = [18, 20, 26, 255];
const FLOOR_COLOR: [u8; 4] = [46, 40, 36, 255];
const WALL_COLOR: [u8; 4] = [196, 188, 170, 255];
const SEAT_COLOR: [u8; 4] = [140, 96, 60, 255];
const PLANTER_COLOR: [u8; 4] = [70, 128, 64, 255];
const PROP_COLOR: [u8; 4] = [206, 92, 148, 255];
const ARTWORK_PENDING_COLOR: [u8; 4] = [90, 90, 100, 255];
const ARTWORK_LOADED_COLOR: [u8; 4] = [250, 214, 96, 255];
const CAMERA_COLOR: [u8; 4] = [90, 220, 255, 255];
const CAMERA_AIRBORNE_COLOR: [u8; 4] = [255, 255, 255, 255];
const CAMERA_MARKER_HALF_SIZE_PX: i32 = 4;
const VIEW_RAY_LENGTH_WORLD: f32 = 3.0;
const MIN_SHAPE_SIZE_PX: i32 = 2;
const STANDING_EYE_HEIGHT: f32 = 2.0;

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_world(
        &mut self,
        world: &SceneWorld,
        overlay_data: Option<&OverlayData>,
    ) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }

        let viewport = self.viewport;
        let frame = self.pixels.frame_mut();
        draw_plan_view(frame, viewport, world);
        draw_overlay(frame, viewport.width, viewport.height, world, overlay_data);
        self.pixels.render()
    }
}

fn draw_plan_view(frame: &mut [u8], viewport: Viewport, world: &SceneWorld) {
    clear(frame, CLEAR_COLOR);
    let view = PlanView::fit(world.room_half_extents(), viewport);
    let (width, height) = (viewport.width, viewport.height);

    let room = PlanShape {
        kind: PlanShapeKind::Prop,
        center: Vec2::ZERO,
        half_extents: world.room_half_extents(),
    };
    let (left, top, room_width, room_height) = shape_screen_rect(&view, &room);
    fill_rect(
        frame,
        width,
        height,
        left,
        top,
        room_width,
        room_height,
        FLOOR_COLOR,
    );
    rect_outline(
        frame,
        width,
        height,
        left,
        top,
        room_width,
        room_height,
        WALL_COLOR,
    );

    for shape in world.shapes() {
        let (x, y, w, h) = shape_screen_rect(&view, shape);
        fill_rect(frame, width, height, x, y, w, h, shape_color(shape.kind));
    }

    let camera = world.camera();
    let eye = Vec2::new(camera.position.x, camera.position.z);
    let (cx, cy) = view.to_screen(eye);
    let ray_end = view.to_screen(eye + camera.ground_forward() * VIEW_RAY_LENGTH_WORLD);
    line(frame, width, (cx, cy), ray_end, CAMERA_COLOR);
    let marker_color = if camera.position.y > STANDING_EYE_HEIGHT + 0.01 {
        CAMERA_AIRBORNE_COLOR
    } else {
        CAMERA_COLOR
    };
    fill_rect(
        frame,
        width,
        height,
        cx - CAMERA_MARKER_HALF_SIZE_PX,
        cy - CAMERA_MARKER_HALF_SIZE_PX,
        CAMERA_MARKER_HALF_SIZE_PX * 2 + 1,
        CAMERA_MARKER_HALF_SIZE_PX * 2 + 1,
        marker_color,
    );
}

fn shape_screen_rect(view: &PlanView, shape: &PlanShape) -> (i32, i32, i32, i32) {
    let (left, top) = view.to_screen(shape.center - shape.half_extents);
    let width = view
        .scale_len(shape.half_extents.x * 2.0)
        .max(MIN_SHAPE_SIZE_PX);
    let height = view
        .scale_len(shape.half_extents.y * 2.0)
        .max(MIN_SHAPE_SIZE_PX);
    (left, top, width, height)
}

fn shape_color(kind: PlanShapeKind) -> [u8; 4] {
    match kind {
        PlanShapeKind::Seat => SEAT_COLOR,
        PlanShapeKind::Planter => PLANTER_COLOR,
        PlanShapeKind::Prop => PROP_COLOR,
        PlanShapeKind::ArtworkPending => ARTWORK_PENDING_COLOR,
        PlanShapeKind::ArtworkLoaded => ARTWORK_LOADED_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::app::Camera3D;

    fn pixel_at(frame: &[u8], viewport: Viewport, x: i32, y: i32) -> [u8; 4] {
        let offset = (y as usize * viewport.width as usize + x as usize) * 4;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    fn sample_world() -> SceneWorld {
        let mut world = SceneWorld::default();
        world.set_room_half_extents(Vec2::new(10.0, 10.0));
        world.shapes_mut().push(PlanShape {
            kind: PlanShapeKind::Seat,
            center: Vec2::new(5.0, 5.0),
            half_extents: Vec2::new(2.0, 1.0),
        });
        world.set_camera(Camera3D {
            position: Vec3::new(-5.0, 2.0, -5.0),
            ..Camera3D::default()
        });
        world
    }

    #[test]
    fn renderer_type_is_non_generic() {
        let _ = std::mem::size_of::<Renderer>();
    }

    #[test]
    fn plan_view_draws_floor_shapes_and_camera() {
        let viewport = Viewport {
            width: 248,
            height: 248,
        };
        let mut frame = vec![0u8; (viewport.width * viewport.height * 4) as usize];
        let world = sample_world();
        draw_plan_view(&mut frame, viewport, &world);

        let view = PlanView::fit(world.room_half_extents(), viewport);
        let (sx, sy) = view.to_screen(Vec2::new(5.0, 5.0));
        assert_eq!(pixel_at(&frame, viewport, sx, sy), SEAT_COLOR);

        let (cx, cy) = view.to_screen(Vec2::new(-5.0, -5.0));
        assert_eq!(pixel_at(&frame, viewport, cx, cy), CAMERA_COLOR);

        let (fx, fy) = view.to_screen(Vec2::new(-5.0, 5.0));
        assert_eq!(pixel_at(&frame, viewport, fx, fy), FLOOR_COLOR);
        assert_eq!(pixel_at(&frame, viewport, 0, 0), CLEAR_COLOR);
    }

    #[test]
    fn zero_sized_shapes_still_get_a_visible_rect() {
        let view = PlanView::fit(
            Vec2::new(10.0, 10.0),
            Viewport {
                width: 100,
                height: 100,
            },
        );
        let (_, _, w, h) = shape_screen_rect(
            &view,
            &PlanShape {
                kind: PlanShapeKind::ArtworkPending,
                center: Vec2::ZERO,
                half_extents: Vec2::ZERO,
            },
        );
        assert_eq!((w, h), (MIN_SHAPE_SIZE_PX, MIN_SHAPE_SIZE_PX));
    }
}
