use crate::asset::impl_asset;
use crate::{AssetCore, AssetKind};

// Encoded audio plus the playback defaults from its sidecar. Decoding is the
// mixer's job; the registry only owns the bytes.
pub struct AudioClipAsset
{
    core: AssetCore,
    data: Vec<u8>,
    volume: f32,
    attenuation: f32,
    looping: bool,
    // seconds into the clip to resume at when looping
    loop_point: f32,
    // restarting playback cuts off any already-playing instance
    single_instance: bool,
}

impl AudioClipAsset
{
    #[must_use]
    pub fn new(core: AssetCore, data: Vec<u8>, volume: f32, attenuation: f32, looping: bool, loop_point: f32, single_instance: bool) -> Self
    {
        Self { core, data, volume, attenuation, looping, loop_point, single_instance }
    }

    #[inline] #[must_use]
    pub fn data(&self) -> &[u8] { &self.data }

    #[inline] #[must_use]
    pub fn volume(&self) -> f32 { self.volume }

    #[inline] #[must_use]
    pub fn attenuation(&self) -> f32 { self.attenuation }

    #[inline] #[must_use]
    pub fn looping(&self) -> bool { self.looping }

    #[inline] #[must_use]
    pub fn loop_point(&self) -> f32 { self.loop_point }

    #[inline] #[must_use]
    pub fn single_instance(&self) -> bool { self.single_instance }
}

impl_asset!(AudioClipAsset, AssetKind::AudioClip);
