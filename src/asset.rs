use crate::{Owner, Ref, Uuid};
use std::any::Any;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use unicase::UniCase;

// the sidecar extension is appended to the full content file name
// ("hero.sprite" -> "hero.sprite.meta"); it is never itself loadable
pub const EXTENSION_META: &str = ".meta";

// All the asset categories the engine can load. Dispatch and the per-kind
// registry index both key off this closed set.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u16)]
pub enum AssetKind
{
    Text = 1,
    Script,
    Texture,
    Sprite,
    Shader,
    ShaderPass,
    MaterialTemplate,
    Material,
    Mesh,
    AudioClip,
    Animation,
    Animator,
}

// one extension maps to exactly one kind; lookups are case-insensitive
const EXTENSIONS: &[(&str, AssetKind)] =
&[
    ("txt", AssetKind::Text),
    ("csv", AssetKind::Text),
    ("cs", AssetKind::Script),
    ("bmp", AssetKind::Texture),
    ("jpg", AssetKind::Texture),
    ("jpeg", AssetKind::Texture),
    ("png", AssetKind::Texture),
    ("sprite", AssetKind::Sprite),
    ("shader", AssetKind::Shader),
    ("shaderpass", AssetKind::ShaderPass),
    ("materialtemplate", AssetKind::MaterialTemplate),
    ("material", AssetKind::Material),
    ("obj", AssetKind::Mesh),
    ("wav", AssetKind::AudioClip),
    ("mp3", AssetKind::AudioClip),
    ("animation", AssetKind::Animation),
    ("animator", AssetKind::Animator),
];

impl AssetKind
{
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<AssetKind>
    {
        let extension = UniCase::new(extension.trim_start_matches('.'));
        EXTENSIONS.iter()
            .find(|(e, _)| UniCase::new(*e) == extension)
            .map(|(_, kind)| *kind)
    }

    #[must_use]
    pub fn from_path(path: &Path) -> Option<AssetKind>
    {
        Self::from_extension(path.extension()?.to_str()?)
    }
}

// the meta sidecar path for a content path
#[must_use]
pub fn meta_path(path: &Path) -> PathBuf
{
    let mut full = path.as_os_str().to_os_string();
    full.push(EXTENSION_META);
    PathBuf::from(full)
}

// Identity shared by every concrete asset: a stable id and the origin path.
// Neither changes after construction.
#[derive(Debug, Clone)]
pub struct AssetCore
{
    id: Uuid,
    path: PathBuf,
}

impl AssetCore
{
    #[must_use]
    pub fn new(id: Uuid, path: impl Into<PathBuf>) -> Self
    {
        Self
        {
            id: if id.is_valid() { id } else { Uuid::create() },
            path: path.into(),
        }
    }

    #[inline] #[must_use]
    pub fn id(&self) -> Uuid { self.id }

    #[inline] #[must_use]
    pub fn path(&self) -> &Path { &self.path }
}

// Base identity for every loadable resource the registry manages.
pub trait Asset: Any
{
    fn id(&self) -> Uuid;
    fn path(&self) -> &Path;
    fn kind(&self) -> AssetKind;

    fn name(&self) -> String
    {
        self.path().file_stem().map_or_else(String::new, |s| s.to_string_lossy().into_owned())
    }

    // ids of the assets this one references, for reverse-dependency queries
    fn dependencies(&self) -> Vec<Uuid> { Vec::new() }

    fn as_any(self: Rc<Self>) -> Rc<dyn Any>;
}

// A concrete asset kind with a statically known category tag.
pub trait TypedAsset: Asset + Sized
{
    const KIND: AssetKind;
}

impl<A: Asset> Owner<A>
{
    // covariant conversion to the base handle; shares the same allocation
    #[must_use]
    pub fn into_asset(self) -> Owner<dyn Asset>
    {
        match self.as_rc()
        {
            Some(rc) =>
            {
                let rc: Rc<dyn Asset> = rc.clone();
                Owner::from_rc(rc)
            },
            None => Owner::empty(),
        }
    }
}
impl<A: Asset> Ref<A>
{
    #[must_use]
    pub fn as_asset(&self) -> Ref<dyn Asset>
    {
        match self.get()
        {
            Some(rc) =>
            {
                let rc: Rc<dyn Asset> = rc;
                Ref::from_weak(Rc::downgrade(&rc))
            },
            None => Ref::empty(),
        }
    }
}
impl Owner<dyn Asset>
{
    // observer handle downcast to a concrete published kind
    #[must_use]
    pub fn create_ref_as<A: TypedAsset>(&self) -> Option<Ref<A>>
    {
        match self.as_rc()
        {
            Some(rc) => downcast_weak(rc.clone()),
            None => None,
        }
    }
}
impl Ref<dyn Asset>
{
    #[must_use]
    pub fn downcast<A: TypedAsset>(&self) -> Option<Ref<A>>
    {
        downcast_weak(self.get()?)
    }
}

fn downcast_weak<A: TypedAsset>(rc: Rc<dyn Asset>) -> Option<Ref<A>>
{
    let typed = rc.as_any().downcast::<A>().ok()?;
    Some(Ref::from_weak(Rc::downgrade(&typed)))
}

// Implements Asset + TypedAsset for a concrete type embedding an AssetCore
// in a field named `core`. The optional `deps` closure reports referenced
// asset ids for reverse-dependency queries.
macro_rules! impl_asset
{
    ($ty:ty, $kind:expr) =>
    {
        impl crate::Asset for $ty
        {
            fn id(&self) -> crate::Uuid { self.core.id() }
            fn path(&self) -> &std::path::Path { self.core.path() }
            fn kind(&self) -> crate::AssetKind { <Self as crate::TypedAsset>::KIND }
            fn as_any(self: std::rc::Rc<Self>) -> std::rc::Rc<dyn std::any::Any> { self }
        }
        impl crate::TypedAsset for $ty
        {
            const KIND: crate::AssetKind = $kind;
        }
    };

    ($ty:ty, $kind:expr, deps: $deps:expr) =>
    {
        impl crate::Asset for $ty
        {
            fn id(&self) -> crate::Uuid { self.core.id() }
            fn path(&self) -> &std::path::Path { self.core.path() }
            fn kind(&self) -> crate::AssetKind { <Self as crate::TypedAsset>::KIND }
            fn dependencies(&self) -> Vec<crate::Uuid> { ($deps)(self) }
            fn as_any(self: std::rc::Rc<Self>) -> std::rc::Rc<dyn std::any::Any> { self }
        }
        impl crate::TypedAsset for $ty
        {
            const KIND: crate::AssetKind = $kind;
        }
    };
}
pub(crate) use impl_asset;

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn extension_maps_to_one_kind()
    {
        assert_eq!(AssetKind::from_extension("png"), Some(AssetKind::Texture));
        assert_eq!(AssetKind::from_extension(".png"), Some(AssetKind::Texture));
        assert_eq!(AssetKind::from_extension("PNG"), Some(AssetKind::Texture));
        assert_eq!(AssetKind::from_extension("sprite"), Some(AssetKind::Sprite));
        assert_eq!(AssetKind::from_extension("materialtemplate"), Some(AssetKind::MaterialTemplate));
        assert_eq!(AssetKind::from_extension("unknown"), None);
    }

    #[test]
    fn meta_extension_is_reserved()
    {
        assert_eq!(AssetKind::from_extension("meta"), None);
        assert_eq!(AssetKind::from_path(Path::new("tex.png.meta")), None);
    }

    #[test]
    fn kind_from_path_uses_extension()
    {
        assert_eq!(AssetKind::from_path(Path::new("chars/hero.sprite")), Some(AssetKind::Sprite));
        assert_eq!(AssetKind::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn meta_path_appends_to_full_name()
    {
        assert_eq!(meta_path(Path::new("tex.png")), PathBuf::from("tex.png.meta"));
        assert_eq!(meta_path(Path::new("a/b.sprite")), PathBuf::from("a/b.sprite.meta"));
    }

    #[test]
    fn core_replaces_invalid_ids()
    {
        let core = AssetCore::new(Uuid::INVALID, "x.txt");
        assert!(core.id().is_valid());

        let id = Uuid::create();
        assert_eq!(AssetCore::new(id, "x.txt").id(), id);
    }
}
