use glam::{Vec2, Vec3};

use super::input::{ActionStates, InputAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    jump_pressed: bool,
    focus_toggle_pressed: bool,
    cancel_pressed: bool,
    emergency_reset_pressed: bool,
    capture_pressed: bool,
    look_delta_px: Vec2,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        quit_requested: bool,
        actions: ActionStates,
        jump_pressed: bool,
        focus_toggle_pressed: bool,
        cancel_pressed: bool,
        emergency_reset_pressed: bool,
        capture_pressed: bool,
        look_delta_px: Vec2,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            actions,
            jump_pressed,
            focus_toggle_pressed,
            cancel_pressed,
            emergency_reset_pressed,
            capture_pressed,
            look_delta_px,
            window_width,
            window_height,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_jump_pressed(mut self, jump_pressed: bool) -> Self {
        self.jump_pressed = jump_pressed;
        self
    }

    pub fn with_focus_toggle_pressed(mut self, focus_toggle_pressed: bool) -> Self {
        self.focus_toggle_pressed = focus_toggle_pressed;
        self
    }

    pub fn with_cancel_pressed(mut self, cancel_pressed: bool) -> Self {
        self.cancel_pressed = cancel_pressed;
        self
    }

    pub fn with_emergency_reset_pressed(mut self, emergency_reset_pressed: bool) -> Self {
        self.emergency_reset_pressed = emergency_reset_pressed;
        self
    }

    pub fn with_capture_pressed(mut self, capture_pressed: bool) -> Self {
        self.capture_pressed = capture_pressed;
        self
    }

    pub fn with_look_delta_px(mut self, look_delta_px: Vec2) -> Self {
        self.look_delta_px = look_delta_px;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }

    pub fn jump_pressed(&self) -> bool {
        self.jump_pressed
    }

    pub fn focus_toggle_pressed(&self) -> bool {
        self.focus_toggle_pressed
    }

    /// Escape edge. Scenes decide whether it leaves a mode or releases capture.
    pub fn cancel_pressed(&self) -> bool {
        self.cancel_pressed
    }

    pub fn emergency_reset_pressed(&self) -> bool {
        self.emergency_reset_pressed
    }

    pub fn capture_pressed(&self) -> bool {
        self.capture_pressed
    }

    /// Raw pointer motion accumulated since the previous tick.
    pub fn look_delta_px(&self) -> Vec2 {
        self.look_delta_px
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

pub const CAMERA_PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// First-person camera. Yaw rotates about +Y; yaw 0 looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl Camera3D {
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    /// Forward direction flattened onto the floor plane, as (x, z).
    pub fn ground_forward(&self) -> Vec2 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec2::new(-sin_yaw, -cos_yaw)
    }

    /// Right direction on the floor plane, as (x, z).
    pub fn ground_right(&self) -> Vec2 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec2::new(cos_yaw, -sin_yaw)
    }

    pub fn rotate_by(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw = wrap_angle(self.yaw + yaw_delta);
        self.pitch = clamp_pitch(self.pitch + pitch_delta);
    }

    pub fn look_at(&mut self, target: Vec3) {
        let delta = target - self.position;
        let horizontal = Vec2::new(delta.x, delta.z).length();
        if horizontal <= f32::EPSILON && delta.y.abs() <= f32::EPSILON {
            return;
        }
        if horizontal > f32::EPSILON {
            self.yaw = (-delta.x).atan2(-delta.z);
        }
        self.pitch = clamp_pitch(delta.y.atan2(horizontal));
    }
}

fn clamp_pitch(pitch: f32) -> f32 {
    if !pitch.is_finite() {
        return 0.0;
    }
    pitch.clamp(-CAMERA_PITCH_LIMIT, CAMERA_PITCH_LIMIT)
}

fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let tau = std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(tau);
    if wrapped > std::f32::consts::PI {
        wrapped - tau
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanShapeKind {
    Seat,
    Planter,
    Prop,
    ArtworkPending,
    ArtworkLoaded,
}

/// Axis-aligned rectangle on the floor plane; `center` and `half_extents` are (x, z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanShape {
    pub kind: PlanShapeKind,
    pub center: Vec2,
    pub half_extents: Vec2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPanel {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Default)]
pub struct SceneWorld {
    camera: Camera3D,
    room_half_extents: Vec2,
    shapes: Vec<PlanShape>,
    info_panel: Option<InfoPanel>,
    pointer_capture: bool,
    hud_lines: Vec<String>,
}

impl SceneWorld {
    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: Camera3D) {
        self.camera = camera;
    }

    pub fn room_half_extents(&self) -> Vec2 {
        self.room_half_extents
    }

    pub fn set_room_half_extents(&mut self, half_extents: Vec2) {
        self.room_half_extents = half_extents;
    }

    pub fn shapes(&self) -> &[PlanShape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut Vec<PlanShape> {
        &mut self.shapes
    }

    pub fn info_panel(&self) -> Option<&InfoPanel> {
        self.info_panel.as_ref()
    }

    pub fn set_info_panel(&mut self, info_panel: Option<InfoPanel>) {
        self.info_panel = info_panel;
    }

    /// Whether the scene wants the pointer captured for free-look.
    pub fn pointer_capture(&self) -> bool {
        self.pointer_capture
    }

    pub fn set_pointer_capture(&mut self, captured: bool) {
        self.pointer_capture = captured;
    }

    pub fn hud_lines(&self) -> &[String] {
        &self.hud_lines
    }

    pub fn set_hud_lines(&mut self, lines: Vec<String>) {
        self.hud_lines = lines;
    }

    pub fn clear(&mut self) {
        self.camera = Camera3D::default();
        self.room_half_extents = Vec2::ZERO;
        self.shapes.clear();
        self.info_panel = None;
        self.pointer_capture = false;
        self.hud_lines.clear();
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
}

pub(crate) struct SceneHost {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

impl SceneHost {
    pub(crate) fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            world: SceneWorld::default(),
            is_loaded: false,
        }
    }

    pub(crate) fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load(&mut self.world);
        self.is_loaded = true;
    }

    pub(crate) fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if !self.is_loaded {
            return SceneCommand::None;
        }
        self.scene.update(fixed_dt_seconds, input, &mut self.world)
    }

    pub(crate) fn shutdown(&mut self) {
        if !self.is_loaded {
            return;
        }
        self.scene.unload(&mut self.world);
        self.world.clear();
        self.is_loaded = false;
    }

    pub(crate) fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub(crate) fn debug_title(&self) -> Option<String> {
        self.scene.debug_title(&self.world)
    }
}
