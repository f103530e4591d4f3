use crate::asset::impl_asset;
use crate::{AssetCore, AssetKind};
use glam::{Vec2, Vec3};
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex
{
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

// Indexed triangle geometry. Buffers are replaceable in place so meshes can
// be (re)built at runtime through the same observer handles.
pub struct MeshAsset
{
    core: AssetCore,
    vertices: RefCell<Vec<Vertex>>,
    indices: RefCell<Vec<u16>>,
}

impl MeshAsset
{
    #[must_use]
    pub fn new(core: AssetCore, vertices: Vec<Vertex>, indices: Vec<u16>) -> Self
    {
        Self { core, vertices: RefCell::new(vertices), indices: RefCell::new(indices) }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize { self.vertices.borrow().len() }

    #[must_use]
    pub fn index_count(&self) -> usize { self.indices.borrow().len() }

    #[must_use]
    pub fn vertices(&self) -> std::cell::Ref<'_, Vec<Vertex>> { self.vertices.borrow() }

    #[must_use]
    pub fn indices(&self) -> std::cell::Ref<'_, Vec<u16>> { self.indices.borrow() }

    pub fn set_data(&self, vertices: Vec<Vertex>, indices: Vec<u16>)
    {
        *self.vertices.borrow_mut() = vertices;
        *self.indices.borrow_mut() = indices;
    }
}

impl_asset!(MeshAsset, AssetKind::Mesh);
