use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use super::walkthrough::WallSide;

pub(crate) const CONFIG_FILE_NAME: &str = "museum.json";

const MIN_ROOM_SPAN: f32 = 20.0;
const MAX_ROOM_SPAN: f32 = 200.0;
const MIN_ROOM_HEIGHT: f32 = 8.0;
const MAX_ROOM_HEIGHT: f32 = 40.0;
const MAX_EXHIBIT_EXTENT: f32 = 8.0;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse config '{}' at {field}: {source}", path.display())]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation failed at {field}: {message}")]
    Validation { field: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct MuseumConfig {
    pub(crate) room: RoomConfig,
    pub(crate) exhibits: Vec<ExhibitConfig>,
}

impl Default for MuseumConfig {
    fn default() -> Self {
        Self {
            room: RoomConfig::default(),
            exhibits: default_exhibits(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RoomConfig {
    pub(crate) width: f32,
    pub(crate) length: f32,
    pub(crate) height: f32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: 30.0,
            length: 40.0,
            height: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ExhibitConfig {
    pub(crate) image: String,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) wall: WallSide,
    #[serde(default = "default_max_extent")]
    pub(crate) max_extent: f32,
}

fn default_max_extent() -> f32 {
    3.0
}

fn exhibit(image: &str, title: &str, description: &str, wall: WallSide) -> ExhibitConfig {
    ExhibitConfig {
        image: image.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        wall,
        max_extent: default_max_extent(),
    }
}

fn default_exhibits() -> Vec<ExhibitConfig> {
    vec![
        exhibit(
            "first_steps.jpg",
            "First Steps",
            "A wobbly walk across the living room carpet, captured mid-stride.",
            WallSide::North,
        ),
        exhibit(
            "beach_day.jpg",
            "Beach Day",
            "Sandcastles, a red bucket, and a tide that always won in the end.",
            WallSide::North,
        ),
        exhibit(
            "graduation.jpg",
            "Graduation",
            "Caps in the air and a crowd that would not stop cheering.",
            WallSide::East,
        ),
        exhibit(
            "road_trip.jpg",
            "Road Trip",
            "Three states, one map, and far too many gas station snacks.",
            WallSide::East,
        ),
        exhibit(
            "mountain_top.jpg",
            "Mountain Top",
            "The view after the long climb, worth every single step.",
            WallSide::South,
        ),
        exhibit(
            "birthday_cake.jpg",
            "The Cake",
            "Candles counted twice, wishes kept secret as tradition demands.",
            WallSide::South,
        ),
        exhibit(
            "old_friends.jpg",
            "Old Friends",
            "Reunited after years apart, still laughing at the same jokes.",
            WallSide::West,
        ),
        exhibit(
            "new_home.jpg",
            "New Home",
            "Boxes everywhere and a front door painted the brightest yellow.",
            WallSide::West,
        ),
    ]
}

/// Loads the museum config. A missing file yields the built-in defaults.
pub(crate) fn load_config(path: &Path) -> Result<MuseumConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "config_missing_using_defaults");
            return Ok(MuseumConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = parse_config(path, &raw)?;
    validate_config(&config)?;
    info!(
        path = %path.display(),
        exhibit_count = config.exhibits.len(),
        room_width = config.room.width,
        room_length = config.room.length,
        room_height = config.room.height,
        "config_loaded"
    );
    Ok(config)
}

fn parse_config(path: &Path, raw: &str) -> Result<MuseumConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, MuseumConfig>(&mut deserializer).map_err(|error| {
        let field = error.path().to_string();
        ConfigError::Parse {
            path: path.to_path_buf(),
            field,
            source: error.into_inner(),
        }
    })
}

fn validation_err(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        message: message.into(),
    }
}

fn check_range(field: &str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min || value > max {
        return Err(validation_err(
            field,
            format!("expected a value in [{min}, {max}], got {value}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_config(config: &MuseumConfig) -> Result<(), ConfigError> {
    check_range("room.width", config.room.width, MIN_ROOM_SPAN, MAX_ROOM_SPAN)?;
    check_range("room.length", config.room.length, MIN_ROOM_SPAN, MAX_ROOM_SPAN)?;
    check_range(
        "room.height",
        config.room.height,
        MIN_ROOM_HEIGHT,
        MAX_ROOM_HEIGHT,
    )?;

    for (index, exhibit) in config.exhibits.iter().enumerate() {
        if exhibit.image.trim().is_empty() {
            return Err(validation_err(
                format!("exhibits[{index}].image"),
                "must not be empty",
            ));
        }
        if exhibit.title.trim().is_empty() {
            return Err(validation_err(
                format!("exhibits[{index}].title"),
                "must not be empty",
            ));
        }
        check_range(
            &format!("exhibits[{index}].max_extent"),
            exhibit.max_extent,
            0.1,
            MAX_EXHIBIT_EXTENT,
        )?;
    }
    Ok(())
}
