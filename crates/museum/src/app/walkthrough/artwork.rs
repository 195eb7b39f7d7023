use std::path::PathBuf;

use glam::{Vec2, Vec3};
use thiserror::Error;

/// Plan-view thickness of an artwork panel.
const PANEL_HALF_THICKNESS: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ArtworkPlacement {
    pub(crate) position: Vec3,
    /// Yaw 0 faces +Z.
    pub(crate) yaw: f32,
}

impl ArtworkPlacement {
    pub(crate) fn outward_normal(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    fn along_wall(&self) -> Vec2 {
        Vec2::new(self.yaw.cos(), -self.yaw.sin())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImageDimensions {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Artwork {
    pub(crate) placement: ArtworkPlacement,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) image_path: PathBuf,
    max_extent: f32,
    loaded: bool,
}

impl Artwork {
    /// Unloaded entry; the square placeholder size is replaced on load.
    pub(crate) fn new(
        placement: ArtworkPlacement,
        max_extent: f32,
        title: impl Into<String>,
        description: impl Into<String>,
        image_path: PathBuf,
    ) -> Self {
        Self {
            placement,
            width: max_extent,
            height: max_extent,
            title: title.into(),
            description: description.into(),
            image_path,
            max_extent,
            loaded: false,
        }
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub(crate) fn position(&self) -> Vec3 {
        self.placement.position
    }

    /// Floor footprint (x, z) of the panel as seen from above.
    pub(crate) fn plan_half_extents(&self) -> Vec2 {
        let along = self.placement.along_wall().abs();
        let across = Vec2::new(along.y, along.x);
        along * (self.width * 0.5) + across * PANEL_HALF_THICKNESS
    }
}

/// Scales an image so its longer side equals `max_extent`.
pub(crate) fn world_size_for(max_extent: f32, dimensions: ImageDimensions) -> Option<Vec2> {
    if dimensions.width == 0 || dimensions.height == 0 {
        return None;
    }
    let (w, h) = (dimensions.width as f32, dimensions.height as f32);
    Some(if w >= h {
        Vec2::new(max_extent, max_extent * h / w)
    } else {
        Vec2::new(max_extent * w / h, max_extent)
    })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum MarkLoadedError {
    #[error("no artwork at index {0}")]
    UnknownIndex(usize),
    #[error("artwork {0} is already loaded")]
    AlreadyLoaded(usize),
    #[error("artwork {index} image has empty dimensions {width}x{height}")]
    EmptyImage { index: usize, width: u32, height: u32 },
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ArtworkRegistry {
    artworks: Vec<Artwork>,
}

impl ArtworkRegistry {
    pub(crate) fn new(artworks: Vec<Artwork>) -> Self {
        Self { artworks }
    }

    pub(crate) fn as_slice(&self) -> &[Artwork] {
        &self.artworks
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Artwork> {
        self.artworks.get(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.artworks.len()
    }

    pub(crate) fn loaded_count(&self) -> usize {
        self.artworks.iter().filter(|artwork| artwork.loaded).count()
    }

    /// Applies a finished image load. Loaded entries never change again.
    pub(crate) fn mark_loaded(
        &mut self,
        index: usize,
        dimensions: ImageDimensions,
    ) -> Result<(), MarkLoadedError> {
        let artwork = self
            .artworks
            .get_mut(index)
            .ok_or(MarkLoadedError::UnknownIndex(index))?;
        if artwork.loaded {
            return Err(MarkLoadedError::AlreadyLoaded(index));
        }
        let size = world_size_for(artwork.max_extent, dimensions).ok_or(
            MarkLoadedError::EmptyImage {
                index,
                width: dimensions.width,
                height: dimensions.height,
            },
        )?;
        artwork.width = size.x;
        artwork.height = size.y;
        artwork.loaded = true;
        Ok(())
    }
}
