use crate::asset::impl_asset;
use crate::{AssetCore, AssetKind, Uuid};
use std::path::PathBuf;

// Plain text content with no further structure (.txt, .csv).
pub struct GenericAsset
{
    core: AssetCore,
    text: String,
}

impl GenericAsset
{
    #[must_use]
    pub fn new(id: Uuid, path: impl Into<PathBuf>, text: impl Into<String>) -> Self
    {
        Self { core: AssetCore::new(id, path), text: text.into() }
    }

    #[inline] #[must_use]
    pub fn text(&self) -> &str { &self.text }
}

impl_asset!(GenericAsset, AssetKind::Text);

// A script source file; the bound class is named after the file stem.
pub struct ScriptAsset
{
    core: AssetCore,
    class_name: String,
}

impl ScriptAsset
{
    #[must_use]
    pub fn new(id: Uuid, path: impl Into<PathBuf>) -> Self
    {
        let core = AssetCore::new(id, path);
        let class_name = core.path().file_stem()
            .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
        Self { core, class_name }
    }

    #[inline] #[must_use]
    pub fn class_name(&self) -> &str { &self.class_name }
}

impl_asset!(ScriptAsset, AssetKind::Script);
