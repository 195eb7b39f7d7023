pub(crate) mod raster;
mod renderer;
mod transform;

pub use renderer::Renderer;
pub use transform::Viewport;
pub(crate) use transform::PlanView;
