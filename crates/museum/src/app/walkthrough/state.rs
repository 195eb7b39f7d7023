use engine::{Camera3D, InfoPanel};
use glam::Vec2;
use tracing::{debug, info, warn};

use super::artwork::ArtworkRegistry;
use super::focus::FocusController;
use super::furniture::FurnitureRegistry;
use super::loader::LoadCompletion;
use super::movement::{MovementController, MovementIntent};
use super::room::Room;
use super::watchdog::{check_recovery, RecoveryReason};
use super::LOOK_SENSITIVITY_RAD_PER_PX;

/// Everything one fixed tick consumes. Edge fields are true for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TickInput {
    pub(crate) intent: MovementIntent,
    pub(crate) look_delta_px: Vec2,
    pub(crate) focus_toggle: bool,
    pub(crate) cancel: bool,
    pub(crate) emergency_reset: bool,
    pub(crate) capture: bool,
}

/// Walkthrough simulation owned by the museum scene.
#[derive(Debug)]
pub(crate) struct SimulationState {
    room: Room,
    furniture: FurnitureRegistry,
    artworks: ArtworkRegistry,
    camera: Camera3D,
    movement: MovementController,
    focus: FocusController,
    pointer_captured: bool,
}

impl SimulationState {
    pub(crate) fn new(room: Room, furniture: FurnitureRegistry, artworks: ArtworkRegistry) -> Self {
        Self {
            camera: Camera3D {
                position: room.spawn_position(),
                yaw: 0.0,
                pitch: 0.0,
            },
            room,
            furniture,
            artworks,
            movement: MovementController::default(),
            focus: FocusController::default(),
            pointer_captured: false,
        }
    }

    pub(crate) fn room(&self) -> &Room {
        &self.room
    }

    pub(crate) fn furniture(&self) -> &FurnitureRegistry {
        &self.furniture
    }

    pub(crate) fn artworks(&self) -> &ArtworkRegistry {
        &self.artworks
    }

    pub(crate) fn camera(&self) -> &Camera3D {
        &self.camera
    }

    #[cfg(test)]
    pub(crate) fn camera_mut(&mut self) -> &mut Camera3D {
        &mut self.camera
    }

    pub(crate) fn movement(&self) -> &MovementController {
        &self.movement
    }

    pub(crate) fn is_focused(&self) -> bool {
        self.focus.is_focused()
    }

    pub(crate) fn focused_artwork(&self) -> Option<usize> {
        self.focus.session().map(|session| session.artwork_index)
    }

    pub(crate) fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    pub(crate) fn tick(&mut self, dt: f32, input: &TickInput) {
        if let Some(reason) = check_recovery(
            &self.room,
            self.camera.position,
            self.focus.is_focused(),
            input.emergency_reset,
        ) {
            self.recover(reason);
            return;
        }

        if self.focus.is_focused() {
            if input.focus_toggle || input.cancel {
                self.exit_focus();
            }
            return;
        }

        if input.capture {
            self.set_pointer_capture(true);
        } else if input.cancel {
            self.set_pointer_capture(false);
        }

        if input.focus_toggle && self.enter_focus() {
            return;
        }

        let intent = if self.pointer_captured {
            let look = input.look_delta_px * LOOK_SENSITIVITY_RAD_PER_PX;
            self.camera.rotate_by(-look.x, -look.y);
            input.intent
        } else {
            MovementIntent::default()
        };
        self.movement.step(
            dt,
            intent,
            &mut self.camera,
            &self.room,
            &self.furniture,
        );
    }

    pub(crate) fn apply_load_completion(&mut self, completion: LoadCompletion) {
        let index = completion.index;
        let dimensions = match completion.result {
            Ok(dimensions) => dimensions,
            Err(error) => {
                warn!(index, error = %error, "artwork_load_failed");
                return;
            }
        };
        match self.artworks.mark_loaded(index, dimensions) {
            Ok(()) => {
                let title = self
                    .artworks
                    .get(index)
                    .map(|artwork| artwork.title.as_str())
                    .unwrap_or_default();
                info!(
                    index,
                    title,
                    width_px = dimensions.width,
                    height_px = dimensions.height,
                    loaded = self.artworks.loaded_count(),
                    total = self.artworks.len(),
                    "artwork_loaded"
                );
            }
            Err(error) => warn!(index, error = %error, "artwork_load_rejected"),
        }
    }

    /// Title card for the artwork under inspection.
    pub(crate) fn info_panel(&self) -> Option<InfoPanel> {
        let artwork = self.artworks.get(self.focused_artwork()?)?;
        Some(InfoPanel {
            title: artwork.title.clone(),
            description: artwork.description.clone(),
        })
    }

    pub(crate) fn hud_lines(&self) -> Vec<String> {
        let position = self.camera.position;
        let mode = if self.focus.is_focused() {
            "focus"
        } else if self.pointer_captured {
            "walk"
        } else {
            "paused (click to look)"
        };
        vec![
            format!(
                "Pos: {:.1} {:.1} {:.1}",
                position.x, position.y, position.z
            ),
            format!(
                "Look: yaw {:.0} pitch {:.0}",
                self.camera.yaw.to_degrees(),
                self.camera.pitch.to_degrees()
            ),
            format!("Mode: {mode}"),
            format!("Feet: {}", self.movement.jump_state().label()),
            format!(
                "Art: {}/{} loaded",
                self.artworks.loaded_count(),
                self.artworks.len()
            ),
        ]
    }

    fn enter_focus(&mut self) -> bool {
        let Some(index) = self
            .focus
            .enter(&mut self.camera, &self.room, &self.artworks)
        else {
            debug!("focus_no_target");
            return false;
        };
        self.set_pointer_capture(false);
        info!(
            index,
            title = self
                .artworks
                .get(index)
                .map(|artwork| artwork.title.as_str())
                .unwrap_or_default(),
            "focus_entered"
        );
        true
    }

    fn exit_focus(&mut self) {
        if !self
            .focus
            .exit(&mut self.camera, &self.room, &self.furniture)
        {
            return;
        }
        let position = self.camera.position;
        self.movement.settle_at(
            position.y,
            Vec2::new(position.x, position.z),
            &self.furniture,
        );
        self.set_pointer_capture(true);
        info!(
            x = position.x,
            y = position.y,
            z = position.z,
            "focus_exited"
        );
    }

    fn recover(&mut self, reason: RecoveryReason) {
        let previous = self.camera.position;
        let abandoned_focus = self.focus.abandon();
        self.camera.position = self.room.spawn_position();
        if !self.camera.yaw.is_finite() || !self.camera.pitch.is_finite() {
            self.camera.yaw = 0.0;
            self.camera.pitch = 0.0;
        }
        self.movement.reset();
        self.set_pointer_capture(true);
        warn!(
            reason = reason.as_str(),
            abandoned_focus,
            from_x = previous.x,
            from_y = previous.y,
            from_z = previous.z,
            "watchdog_recovery"
        );
    }

    fn set_pointer_capture(&mut self, captured: bool) {
        if self.pointer_captured != captured {
            debug!(captured, "pointer_capture_requested");
            self.pointer_captured = captured;
        }
    }
}
