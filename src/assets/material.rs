use crate::asset::impl_asset;
use crate::{AssetCore, AssetKind, Uuid};
use indexmap::IndexMap;
use std::cell::RefCell;

// A value bound to one named shader constant.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorValue
{
    // texture ids, one per array slot
    Textures(Vec<Uuid>),
    // raw uniform buffer contents
    Buffer(Vec<u8>),
}

// Pass list plus default constant values; materials instantiate this and
// override what they care about.
pub struct MaterialTemplateAsset
{
    core: AssetCore,
    passes: Vec<Uuid>,
    defaults: IndexMap<String, DescriptorValue>,
}

impl MaterialTemplateAsset
{
    #[must_use]
    pub fn new(core: AssetCore, passes: Vec<Uuid>, defaults: IndexMap<String, DescriptorValue>) -> Self
    {
        Self { core, passes, defaults }
    }

    #[inline] #[must_use]
    pub fn passes(&self) -> &[Uuid] { &self.passes }

    #[inline] #[must_use]
    pub fn defaults(&self) -> &IndexMap<String, DescriptorValue> { &self.defaults }
}

impl_asset!(MaterialTemplateAsset, AssetKind::MaterialTemplate, deps: |t: &MaterialTemplateAsset| t.passes.clone());

// One renderable surface: a template plus this surface's constant values.
// Values start as the template defaults overlaid with the material file's own
// and can be rewritten at runtime (tinting, uv scrolling).
pub struct MaterialAsset
{
    core: AssetCore,
    template: Uuid,
    values: RefCell<IndexMap<String, DescriptorValue>>,
}

impl MaterialAsset
{
    #[must_use]
    pub fn new(core: AssetCore, template: Uuid, values: IndexMap<String, DescriptorValue>) -> Self
    {
        Self { core, template, values: RefCell::new(values) }
    }

    #[inline] #[must_use]
    pub fn template(&self) -> Uuid { self.template }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<DescriptorValue>
    {
        self.values.borrow().get(name).cloned()
    }

    #[must_use]
    pub fn value_names(&self) -> Vec<String>
    {
        self.values.borrow().keys().cloned().collect()
    }

    pub fn set_value(&self, name: impl Into<String>, value: DescriptorValue)
    {
        self.values.borrow_mut().insert(name.into(), value);
    }
}

impl_asset!(MaterialAsset, AssetKind::Material, deps: |m: &MaterialAsset| vec![m.template]);
