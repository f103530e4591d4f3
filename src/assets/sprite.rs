use crate::asset::impl_asset;
use crate::{AssetCore, AssetKind, Uuid};
use glam::Vec2;

// How min/max/pivot in the sprite file are to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateMode
{
    // fractions of the texture
    #[default]
    Normalized,
    // texel positions
    Pixel,
}

impl CoordinateMode
{
    #[must_use]
    pub fn parse(text: &str) -> Self
    {
        if text.trim().eq_ignore_ascii_case("pixel") { Self::Pixel } else { Self::Normalized }
    }
}

// A rectangular region of a texture drawn with a material. min/max bound the
// region, pivot is normalized within it.
pub struct SpriteAsset
{
    core: AssetCore,
    texture: Uuid,
    material: Uuid,
    coordinate_mode: CoordinateMode,
    min: Vec2,
    max: Vec2,
    pivot: Vec2,
    pixels_per_unit: f32,
}

impl SpriteAsset
{
    #[must_use]
    pub fn new(core: AssetCore, texture: Uuid, material: Uuid, coordinate_mode: CoordinateMode, min: Vec2, max: Vec2, pivot: Vec2, pixels_per_unit: f32) -> Self
    {
        Self { core, texture, material, coordinate_mode, min, max, pivot, pixels_per_unit }
    }

    #[inline] #[must_use]
    pub fn coordinate_mode(&self) -> CoordinateMode { self.coordinate_mode }

    #[inline] #[must_use]
    pub fn texture(&self) -> Uuid { self.texture }

    #[inline] #[must_use]
    pub fn material(&self) -> Uuid { self.material }

    #[inline] #[must_use]
    pub fn min(&self) -> Vec2 { self.min }

    #[inline] #[must_use]
    pub fn max(&self) -> Vec2 { self.max }

    #[inline] #[must_use]
    pub fn pivot(&self) -> Vec2 { self.pivot }

    #[inline] #[must_use]
    pub fn pixels_per_unit(&self) -> f32 { self.pixels_per_unit }
}

impl_asset!(SpriteAsset, AssetKind::Sprite, deps: |s: &SpriteAsset| vec![s.material, s.texture]);
