use std::path::{Path, PathBuf};

use engine::{
    InputAction, InputSnapshot, PlanShape, PlanShapeKind, Scene, SceneCommand, SceneWorld,
};
use tracing::info;

use super::furniture::FurnitureKind;
use super::layout::{build_furniture, place_artworks};
use super::loader::ArtworkLoader;
use super::movement::MovementIntent;
use super::room::Room;
use super::state::{SimulationState, TickInput};
use crate::app::config::MuseumConfig;

pub(crate) struct MuseumScene {
    state: SimulationState,
    loader: Option<ArtworkLoader>,
}

impl MuseumScene {
    pub(crate) fn new(config: &MuseumConfig, images_dir: &Path) -> Self {
        let room = Room::new(config.room.width, config.room.length, config.room.height);
        let furniture = build_furniture(&room);
        let artworks = place_artworks(&room, &config.exhibits, images_dir);
        Self {
            state: SimulationState::new(room, furniture, artworks),
            loader: None,
        }
    }

    fn load_requests(&self) -> Vec<(usize, PathBuf)> {
        self.state
            .artworks()
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(_, artwork)| !artwork.is_loaded())
            .map(|(index, artwork)| (index, artwork.image_path.clone()))
            .collect()
    }

    fn drain_loads(&mut self) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        for completion in loader.drain() {
            self.state.apply_load_completion(completion);
        }
        if loader.pending() == 0 {
            info!(
                loaded = self.state.artworks().loaded_count(),
                total = self.state.artworks().len(),
                "artwork_loading_finished"
            );
            self.loader = None;
        }
    }

    fn publish(&self, world: &mut SceneWorld) {
        world.set_camera(*self.state.camera());
        world.set_room_half_extents(self.state.room().half_extents());
        world.set_info_panel(self.state.info_panel());
        world.set_pointer_capture(self.state.pointer_captured());
        world.set_hud_lines(self.state.hud_lines());

        let shapes = world.shapes_mut();
        shapes.clear();
        shapes.extend(self.state.furniture().items().iter().map(|item| PlanShape {
            kind: match item.kind {
                FurnitureKind::Bench => PlanShapeKind::Seat,
                FurnitureKind::Planter => PlanShapeKind::Planter,
                FurnitureKind::Decoration => PlanShapeKind::Prop,
            },
            center: item.center,
            half_extents: item.half_extents(),
        }));
        shapes.extend(self.state.artworks().as_slice().iter().map(|artwork| {
            let position = artwork.position();
            PlanShape {
                kind: if artwork.is_loaded() {
                    PlanShapeKind::ArtworkLoaded
                } else {
                    PlanShapeKind::ArtworkPending
                },
                center: glam::Vec2::new(position.x, position.z),
                half_extents: artwork.plan_half_extents(),
            }
        }));
    }
}

fn tick_input_from(input: &InputSnapshot) -> TickInput {
    TickInput {
        intent: MovementIntent {
            forward: input.is_down(InputAction::MoveForward),
            backward: input.is_down(InputAction::MoveBackward),
            left: input.is_down(InputAction::MoveLeft),
            right: input.is_down(InputAction::MoveRight),
            jump: input.jump_pressed(),
        },
        look_delta_px: input.look_delta_px(),
        focus_toggle: input.focus_toggle_pressed(),
        cancel: input.cancel_pressed(),
        emergency_reset: input.emergency_reset_pressed(),
        capture: input.capture_pressed(),
    }
}

impl Scene for MuseumScene {
    fn load(&mut self, world: &mut SceneWorld) {
        let requests = self.load_requests();
        let request_count = requests.len();
        self.loader = Some(ArtworkLoader::spawn(requests));
        self.publish(world);
        info!(
            furniture_count = self.state.furniture().len(),
            artwork_count = self.state.artworks().len(),
            pending_loads = request_count,
            "scene_loaded"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }

        self.drain_loads();
        self.state.tick(fixed_dt_seconds, &tick_input_from(input));
        self.publish(world);
        SceneCommand::None
    }

    fn unload(&mut self, _world: &mut SceneWorld) {
        self.loader = None;
        info!("scene_unloaded");
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        let position = self.state.camera().position;
        let focus = match self.state.focused_artwork() {
            Some(index) => self
                .state
                .artworks()
                .get(index)
                .map(|artwork| format!(" | viewing {}", artwork.title))
                .unwrap_or_default(),
            None => String::new(),
        };
        Some(format!(
            "({:.1}, {:.1}) | art {}/{}{}",
            position.x,
            position.z,
            self.state.artworks().loaded_count(),
            self.state.artworks().len(),
            focus
        ))
    }
}

pub(crate) fn build_museum_scene(config: &MuseumConfig, images_dir: &Path) -> Box<dyn Scene> {
    Box::new(MuseumScene::new(config, images_dir))
}
