use glam::Vec2;

use super::{BENCH_HEIGHT_TOLERANCE, STANDING_EYE_HEIGHT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FurnitureKind {
    Planter,
    Bench,
    Decoration,
}

/// Collision only distinguishes these two orientation classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rotation {
    AxisAligned,
    QuarterTurn,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Footprint {
    /// Extent along X before rotation.
    pub(crate) width: f32,
    pub(crate) height: f32,
    /// Extent along Z before rotation.
    pub(crate) depth: f32,
}

impl Footprint {
    pub(crate) const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FurnitureItem {
    pub(crate) kind: FurnitureKind,
    pub(crate) label: &'static str,
    pub(crate) center: Vec2,
    pub(crate) footprint: Footprint,
    pub(crate) rotation: Rotation,
}

impl FurnitureItem {
    /// Half extents on (x, z) after the rotation swap.
    pub(crate) fn half_extents(&self) -> Vec2 {
        let half = Vec2::new(self.footprint.width, self.footprint.depth) * 0.5;
        match self.rotation {
            Rotation::AxisAligned => half,
            Rotation::QuarterTurn => Vec2::new(half.y, half.x),
        }
    }

    /// Eye height of someone standing on top of this item.
    pub(crate) fn top_eye_height(&self) -> f32 {
        STANDING_EYE_HEIGHT + self.footprint.height
    }

    /// Inside the top surface shrunk by the bench tolerance on each axis.
    pub(crate) fn is_over_top_surface(&self, floor_point: Vec2) -> bool {
        let delta = (floor_point - self.center).abs();
        let surface = self.half_extents() - Vec2::splat(BENCH_HEIGHT_TOLERANCE);
        delta.x <= surface.x && delta.y <= surface.y
    }
}

/// Immutable obstacle list produced once by the layout builder.
#[derive(Debug, Clone, Default)]
pub(crate) struct FurnitureRegistry {
    items: Vec<FurnitureItem>,
}

impl FurnitureRegistry {
    pub(crate) fn builder() -> FurnitureRegistryBuilder {
        FurnitureRegistryBuilder::default()
    }

    pub(crate) fn items(&self) -> &[FurnitureItem] {
        &self.items
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_over_bench_top(&self, floor_point: Vec2) -> bool {
        self.items
            .iter()
            .filter(|item| item.kind == FurnitureKind::Bench)
            .any(|item| item.is_over_top_surface(floor_point))
    }
}

#[derive(Debug, Default)]
pub(crate) struct FurnitureRegistryBuilder {
    items: Vec<FurnitureItem>,
}

impl FurnitureRegistryBuilder {
    pub(crate) fn add(
        &mut self,
        kind: FurnitureKind,
        label: &'static str,
        center: Vec2,
        footprint: Footprint,
        rotation: Rotation,
    ) -> &mut Self {
        self.items.push(FurnitureItem {
            kind,
            label,
            center,
            footprint,
            rotation,
        });
        self
    }

    pub(crate) fn build(self) -> FurnitureRegistry {
        FurnitureRegistry { items: self.items }
    }
}
