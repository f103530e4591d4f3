use crate::{meta_path, Asset, AssetKind, Node, Owner, Ref, RunMode, TypedAsset, Uuid, VirtualFs};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Why a load was refused. Every failure is logged at the point of detection
// and leaves the registry exactly as it was.
#[derive(Debug, Error)]
pub enum LoadError
{
    #[error("empty asset path")]
    EmptyPath,
    #[error("missing asset file {0:?}")]
    Missing(PathBuf),
    #[error("missing meta file for asset {0:?}")]
    MissingMeta(PathBuf),
    #[error("{path:?} is missing {count} dependenc(y/ies)")]
    MissingDependencies { path: PathBuf, count: usize },
    #[error("no loader for {0:?}")]
    UnsupportedKind(PathBuf),
    #[error("{path:?} holds a {found:?}, not a {expected:?}")]
    KindMismatch { path: PathBuf, expected: AssetKind, found: AssetKind },
    #[error("{path:?} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

// which kinds may reference which; used to bound reverse-dependency scans so
// get_dependents never walks buckets that cannot contain a match
const DEPENDENCY_SCHEMA: &[(AssetKind, &[AssetKind])] =
&[
    (AssetKind::ShaderPass, &[AssetKind::Shader]),
    (AssetKind::MaterialTemplate, &[AssetKind::ShaderPass]),
    (AssetKind::Material, &[AssetKind::MaterialTemplate]),
    (AssetKind::Sprite, &[AssetKind::Material, AssetKind::Texture]),
    (AssetKind::Animator, &[AssetKind::Animation]),
];

// The central asset registry: sole owner of every loaded asset, indexed by id
// and by kind. Everything handed out is an observer handle, so unloading here
// genuinely destroys the asset no matter who is still watching.
//
// Single-threaded by construction (assets are Rc-backed); one engine per
// runtime, threaded explicitly to whoever loads or queries.
pub struct AssetEngine
{
    mode: RunMode,
    vfs: VirtualFs,

    // assets and assets_by_kind are updated in lock-step: every id present in
    // one is present in the other, under its asset's kind
    assets: IndexMap<Uuid, Owner<dyn Asset>>,
    assets_by_kind: HashMap<AssetKind, IndexMap<Uuid, Ref<dyn Asset>>>,
}

impl AssetEngine
{
    #[must_use]
    pub fn new(mode: RunMode, vfs: VirtualFs) -> Self
    {
        Self
        {
            mode,
            vfs,
            assets: IndexMap::new(),
            assets_by_kind: HashMap::new(),
        }
    }

    #[inline] #[must_use]
    pub fn mode(&self) -> RunMode { self.mode }

    #[inline] #[must_use]
    pub fn vfs(&self) -> &VirtualFs { &self.vfs }

    #[inline] #[must_use]
    pub fn asset_count(&self) -> usize { self.assets.len() }

    // -- file access ---------------------------------------------------------

    // whether a content file is reachable; in edit mode loose disk files fill
    // in for paths no archive carries
    #[must_use]
    pub fn exists(&self, path: &Path) -> bool
    {
        !path.as_os_str().is_empty()
            && (self.vfs.contains(path) || (self.mode == RunMode::Edit && path.is_file()))
    }

    pub fn read_file(&self, path: &Path) -> Result<Vec<u8>, LoadError>
    {
        if path.as_os_str().is_empty()
        {
            return Err(LoadError::EmptyPath);
        }
        if let Some(bytes) = self.vfs.read(path)
        {
            return Ok(bytes.to_vec());
        }
        if self.mode == RunMode::Edit
        {
            if let Ok(bytes) = std::fs::read(path)
            {
                return Ok(bytes);
            }
        }
        Err(LoadError::Missing(path.to_path_buf()))
    }

    pub fn read_text(&self, path: &Path) -> Result<String, LoadError>
    {
        String::from_utf8(self.read_file(path)?).map_err(|_| LoadError::Malformed
        {
            path: path.to_path_buf(),
            reason: "not valid UTF-8".into(),
        })
    }

    pub fn read_file_node(&self, path: &Path) -> Result<Node, LoadError>
    {
        Ok(Node::parse(&self.read_text(path)?))
    }

    // the parsed sidecar for a content path; absence is MissingMeta, named
    // after the content file rather than the sidecar
    pub fn read_file_meta(&self, path: &Path) -> Result<Node, LoadError>
    {
        match self.read_file_node(&meta_path(path))
        {
            Ok(node) => Ok(node),
            Err(LoadError::Missing(_)) => Err(LoadError::MissingMeta(path.to_path_buf())),
            Err(e) => Err(e),
        }
    }

    // the persistent id recorded in a content file's sidecar, or INVALID when
    // there is no sidecar or no parseable id in it
    #[must_use]
    pub fn read_id(&self, path: &Path) -> Uuid
    {
        self.read_file_meta(path).map_or(Uuid::INVALID, |meta| meta.to_uuid())
    }

    // the common preamble of every loader: path is non-empty, the content file
    // is reachable, and so is its sidecar
    pub(crate) fn check(&self, path: &Path) -> Result<(), LoadError>
    {
        if path.as_os_str().is_empty()
        {
            log::error!("Cannot load an asset from an empty path");
            return Err(LoadError::EmptyPath);
        }
        if !self.exists(path)
        {
            log::error!("Cannot load asset, file does not exist: {path:?}");
            return Err(LoadError::Missing(path.to_path_buf()));
        }
        if !self.exists(&meta_path(path))
        {
            log::error!("Cannot load asset, meta file does not exist: {path:?}");
            return Err(LoadError::MissingMeta(path.to_path_buf()));
        }
        Ok(())
    }

    // -- registration --------------------------------------------------------

    // registers a fully constructed asset and hands back an observer handle.
    // the registry keeps the only owning handle
    pub fn create<A: TypedAsset>(&mut self, asset: A) -> Ref<A>
    {
        let id = asset.id();
        assert!(id.is_valid(), "cannot register an asset with an invalid id");
        assert!(!self.assets.contains_key(&id), "an asset with id {id} is already registered");

        let owner = Owner::new(asset);
        let reference = owner.create_ref();
        self.emplace(owner.into_asset());
        reference
    }

    fn emplace(&mut self, owner: Owner<dyn Asset>)
    {
        let (id, kind) = match owner.get()
        {
            Some(asset) => (asset.id(), asset.kind()),
            None => return,
        };
        self.assets_by_kind.entry(kind).or_default().insert(id, owner.create_ref());
        self.assets.insert(id, owner);
    }

    // -- lookup --------------------------------------------------------------

    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool
    {
        self.assets.contains_key(&id)
    }

    // None when the id is unknown or registered under a different kind
    #[must_use]
    pub fn get<A: TypedAsset>(&self, id: Uuid) -> Option<Ref<A>>
    {
        self.assets.get(&id)?.create_ref_as::<A>()
    }

    // like get, for callers that have already proven presence
    #[must_use]
    pub fn at<A: TypedAsset>(&self, id: Uuid) -> Ref<A>
    {
        match self.get(id)
        {
            Some(reference) => reference,
            None => panic!("no registered {:?} with id {id}", A::KIND),
        }
    }

    #[must_use]
    pub fn get_asset(&self, id: Uuid) -> Option<Ref<dyn Asset>>
    {
        self.assets.get(&id).map(Owner::create_ref)
    }

    // every registered asset of one statically known kind, in load order
    #[must_use]
    pub fn get_by_type<A: TypedAsset>(&self) -> Vec<Ref<A>>
    {
        self.assets_by_kind.get(&A::KIND).map_or_else(Vec::new, |bucket|
        {
            bucket.values().filter_map(Ref::downcast).collect()
        })
    }

    #[must_use]
    pub fn get_by_kind(&self, kind: AssetKind) -> Vec<Ref<dyn Asset>>
    {
        self.assets_by_kind.get(&kind).map_or_else(Vec::new, |bucket|
        {
            bucket.values().cloned().collect()
        })
    }

    // every registered asset that directly references the given one, in load
    // order per kind
    #[must_use]
    pub fn get_dependents(&self, id: Uuid) -> Vec<Ref<dyn Asset>>
    {
        let kind = match self.assets.get(&id).and_then(Owner::get)
        {
            Some(asset) => asset.kind(),
            None => return Vec::new(),
        };

        let mut dependents = Vec::new();
        for (dependent_kind, depends_on) in DEPENDENCY_SCHEMA
        {
            if !depends_on.contains(&kind)
            {
                continue;
            }
            let Some(bucket) = self.assets_by_kind.get(dependent_kind) else { continue; };
            for reference in bucket.values()
            {
                if let Some(asset) = reference.get()
                {
                    if asset.dependencies().contains(&id)
                    {
                        dependents.push(reference.clone());
                    }
                }
            }
        }
        dependents
    }

    // -- unloading -----------------------------------------------------------

    // destroys the asset; every outstanding observer handle goes stale
    pub fn unload(&mut self, id: Uuid)
    {
        let Some(mut owner) = self.assets.shift_remove(&id) else
        {
            panic!("cannot unload unregistered asset {id}");
        };

        if let Some(asset) = owner.get()
        {
            let kind = asset.kind();

            #[cfg(feature = "debug_asset_lifetimes")]
            log::debug!("Unloading {kind:?} {id} ({} observer(s) outstanding)", owner.weak_count());

            if let Some(bucket) = self.assets_by_kind.get_mut(&kind)
            {
                bucket.shift_remove(&id);
                if bucket.is_empty()
                {
                    self.assets_by_kind.remove(&kind);
                }
            }
        }
        owner.release();
    }

    pub fn unload_asset(&mut self, asset: &dyn Asset)
    {
        self.unload(asset.id());
    }

    // destroys every asset, most recently loaded first
    pub fn unload_all(&mut self)
    {
        self.assets_by_kind.clear();
        while let Some((_, mut owner)) = self.assets.pop()
        {
            owner.release();
        }
    }
}
