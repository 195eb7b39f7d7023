mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod tools;

pub use input::InputAction;
pub use loop_runner::{run_app, run_app_with_metrics, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use rendering::{Renderer, Viewport};
pub use scene::{
    Camera3D, InfoPanel, InputSnapshot, PlanShape, PlanShapeKind, Scene, SceneCommand, SceneWorld,
};
pub(crate) use tools::OverlayData;
