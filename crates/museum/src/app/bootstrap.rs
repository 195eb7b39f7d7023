use engine::{resolve_app_paths, LoopConfig, Scene, StartupError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_config, ConfigError, CONFIG_FILE_NAME};
use super::walkthrough;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Virtual Museum Startup ===");

    let paths = resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        images = %paths.images_dir.display(),
        "app_paths_resolved"
    );
    let museum = load_config(&paths.assets_dir.join(CONFIG_FILE_NAME))?;
    let scene = walkthrough::build_museum_scene(&museum, &paths.images_dir);

    Ok(AppWiring {
        config: LoopConfig::default(),
        scene,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
