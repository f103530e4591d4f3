use crate::{Node, Uuid};
use glam::Vec2;

// Reads named values out of a parsed node, with default fallbacks.
// Thin convenience over Node::find; loaders should not need to walk children
// by hand for scalar fields.
pub struct Reader<'n>
{
    node: &'n Node,
}

impl<'n> Reader<'n>
{
    #[must_use]
    pub fn new(node: &'n Node) -> Self
    {
        Self { node }
    }

    #[inline] #[must_use]
    pub fn node(&self) -> &Node { self.node }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool
    {
        self.node.find(name).is_some()
    }

    #[must_use]
    pub fn read_string(&self, name: &str, default: &str) -> String
    {
        self.node.find(name).map_or_else(|| default.to_string(), |c| c.data().to_string())
    }

    #[must_use]
    pub fn try_read_string(&self, name: &str) -> Option<String>
    {
        self.node.find(name).map(|c| c.data().to_string())
    }

    #[must_use]
    pub fn read_int(&self, name: &str, default: i32) -> i32
    {
        self.node.find(name).map_or(default, |c| c.to_int(default))
    }

    #[must_use]
    pub fn read_uint(&self, name: &str, default: u32) -> u32
    {
        self.node.find(name).map_or(default, |c| c.to_uint(default))
    }

    #[must_use]
    pub fn read_size(&self, name: &str, default: usize) -> usize
    {
        self.node.find(name).map_or(default, |c| c.to_size(default))
    }

    #[must_use]
    pub fn read_float(&self, name: &str, default: f32) -> f32
    {
        self.node.find(name).map_or(default, |c| c.to_float(default))
    }

    #[must_use]
    pub fn read_bool(&self, name: &str, default: bool) -> bool
    {
        self.node.find(name).map_or(default, |c| c.to_bool(default))
    }

    // absent or unparseable ids read as Uuid::INVALID
    #[must_use]
    pub fn read_uuid(&self, name: &str) -> Uuid
    {
        self.node.find(name).map_or(Uuid::INVALID, Node::to_uuid)
    }

    // a vec2 serialized as a child with x/y children
    #[must_use]
    pub fn read_vec2(&self, name: &str, default: Vec2) -> Vec2
    {
        match self.node.find(name)
        {
            Some(child) =>
            {
                let x = child.find("x").map_or(default.x, |n| n.to_float(default.x));
                let y = child.find("y").map_or(default.y, |n| n.to_float(default.y));
                Vec2::new(x, y)
            },
            None => default,
        }
    }

    // the data of every child of the named node, in order (bullet lists)
    #[must_use]
    pub fn read_strings(&self, name: &str) -> Vec<String>
    {
        match self.node.find(name)
        {
            Some(child) => child.children().iter().map(|c| c.data().to_string()).collect(),
            None => Vec::new(),
        }
    }
}
