use crate::asset::impl_asset;
use crate::{AssetCore, AssetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureFilter
{
    #[default]
    Nearest,
    Linear,
}

impl TextureFilter
{
    // unrecognized text falls back to the default
    #[must_use]
    pub fn parse(text: &str) -> Self
    {
        if text.trim().eq_ignore_ascii_case("linear") { Self::Linear } else { Self::Nearest }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode
{
    #[default]
    Repeat,
    Clamp,
    Mirror,
}

impl AddressMode
{
    #[must_use]
    pub fn parse(text: &str) -> Self
    {
        match text.trim().to_ascii_lowercase().as_str()
        {
            "clamp" => Self::Clamp,
            "mirror" => Self::Mirror,
            _ => Self::Repeat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MipmapMode
{
    #[default]
    Nearest,
    Linear,
}

impl MipmapMode
{
    #[must_use]
    pub fn parse(text: &str) -> Self
    {
        if text.trim().eq_ignore_ascii_case("linear") { Self::Linear } else { Self::Nearest }
    }
}

// How a texture is sampled; comes from the meta sidecar, not the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerSettings
{
    pub filter: TextureFilter,
    pub address_mode: AddressMode,
    pub mipmap_mode: MipmapMode,
}

// A decoded image, always RGBA8 in memory regardless of the source format.
pub struct TextureAsset
{
    core: AssetCore,
    width: u32,
    height: u32,
    sampler: SamplerSettings,
    pixels: Vec<u8>,
}

impl TextureAsset
{
    // expected backing size for RGBA8 dimensions; usize math so dimensions
    // whose texel count exceeds u32 do not wrap
    #[must_use]
    pub fn byte_size(width: u32, height: u32) -> usize
    {
        width as usize * height as usize * 4
    }

    #[must_use]
    pub fn new(core: AssetCore, width: u32, height: u32, sampler: SamplerSettings, pixels: Vec<u8>) -> Self
    {
        debug_assert_eq!(pixels.len(), Self::byte_size(width, height));
        Self { core, width, height, sampler, pixels }
    }

    #[inline] #[must_use]
    pub fn width(&self) -> u32 { self.width }

    #[inline] #[must_use]
    pub fn height(&self) -> u32 { self.height }

    #[inline] #[must_use]
    pub fn sampler(&self) -> SamplerSettings { self.sampler }

    #[inline] #[must_use]
    pub fn filter(&self) -> TextureFilter { self.sampler.filter }

    #[inline] #[must_use]
    pub fn pixels(&self) -> &[u8] { &self.pixels }
}

impl_asset!(TextureAsset, AssetKind::Texture);

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn byte_size_does_not_wrap_on_large_dimensions()
    {
        assert_eq!(TextureAsset::byte_size(2, 3), 24);
        // 64k x 64k texels overflow a u32 byte count
        assert_eq!(TextureAsset::byte_size(1 << 16, 1 << 16), 1usize << 34);
    }
}
