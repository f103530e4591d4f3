use crate::asset::impl_asset;
use crate::{AssetCore, AssetKind, Uuid};

// descriptor set index reserved for per-material inputs; sets below it belong
// to the frame and the draw
pub const DESCRIPTOR_SET_MATERIAL: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderStage
{
    #[default]
    Vertex,
    Fragment,
}

impl ShaderStage
{
    #[must_use]
    pub fn parse(text: &str) -> Self
    {
        if text.trim().eq_ignore_ascii_case("fragment") { Self::Fragment } else { Self::Vertex }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PushConstantInfo
{
    pub name: String,
    pub stage: ShaderStage,
    pub offset: u32,
    pub size: u32,
}

// What a uniform binding holds, and therefore how material values for it
// are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UniformKind
{
    #[default]
    Buffer,
    Sampler,
}

impl UniformKind
{
    #[must_use]
    pub fn parse(text: &str) -> Self
    {
        if text.trim().eq_ignore_ascii_case("sampler") { Self::Sampler } else { Self::Buffer }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniformConstantInfo
{
    pub name: String,
    pub stage: ShaderStage,
    pub kind: UniformKind,
    pub set: u32,
    pub binding: u32,
    // buffer size in bytes; samplers have none
    pub size: u32,
    // >1 for arrayed bindings (texture tables)
    pub count: u32,
}

// The shader interface: what constants its programs consume. Pass assets
// carry the actual program code; materials fill the material-set constants.
pub struct ShaderAsset
{
    core: AssetCore,
    push_constants: Vec<PushConstantInfo>,
    uniform_constants: Vec<UniformConstantInfo>,
}

impl ShaderAsset
{
    #[must_use]
    pub fn new(core: AssetCore, push_constants: Vec<PushConstantInfo>, uniform_constants: Vec<UniformConstantInfo>) -> Self
    {
        Self { core, push_constants, uniform_constants }
    }

    #[inline] #[must_use]
    pub fn push_constants(&self) -> &[PushConstantInfo] { &self.push_constants }

    #[inline] #[must_use]
    pub fn uniform_constants(&self) -> &[UniformConstantInfo] { &self.uniform_constants }

    // the constants a material is expected to provide values for
    pub fn material_uniforms(&self) -> impl Iterator<Item = &UniformConstantInfo>
    {
        self.uniform_constants.iter().filter(|u| u.set == DESCRIPTOR_SET_MATERIAL)
    }
}

impl_asset!(ShaderAsset, AssetKind::Shader);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveTopology
{
    #[default]
    TriangleList,
    TriangleStrip,
    LineList,
    PointList,
}

impl PrimitiveTopology
{
    #[must_use]
    pub fn parse(text: &str) -> Self
    {
        match text.trim().to_ascii_lowercase().as_str()
        {
            "trianglestrip" => Self::TriangleStrip,
            "linelist" => Self::LineList,
            "pointlist" => Self::PointList,
            _ => Self::TriangleList,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeFormat
{
    Float,
    Vec2,
    #[default]
    Vec3,
    Vec4,
}

impl AttributeFormat
{
    #[must_use]
    pub fn parse(text: &str) -> Self
    {
        match text.trim().to_ascii_lowercase().as_str()
        {
            "float" => Self::Float,
            "vec2" => Self::Vec2,
            "vec4" => Self::Vec4,
            _ => Self::Vec3,
        }
    }

    #[must_use]
    pub fn size(self) -> u32
    {
        match self
        {
            Self::Float => 4,
            Self::Vec2 => 8,
            Self::Vec3 => 12,
            Self::Vec4 => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolygonMode
{
    #[default]
    Fill,
    Line,
    Point,
}

impl PolygonMode
{
    #[must_use]
    pub fn parse(text: &str) -> Self
    {
        match text.trim().to_ascii_lowercase().as_str()
        {
            "line" => Self::Line,
            "point" => Self::Point,
            _ => Self::Fill,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode
{
    #[default]
    Back,
    Front,
    None,
}

impl CullMode
{
    #[must_use]
    pub fn parse(text: &str) -> Self
    {
        match text.trim().to_ascii_lowercase().as_str()
        {
            "front" => Self::Front,
            "none" => Self::None,
            _ => Self::Back,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontFace
{
    #[default]
    CounterClockwise,
    Clockwise,
}

impl FrontFace
{
    #[must_use]
    pub fn parse(text: &str) -> Self
    {
        if text.trim().eq_ignore_ascii_case("clockwise") { Self::Clockwise } else { Self::CounterClockwise }
    }
}

// Fixed-function rasterizer state for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterState
{
    pub topology: PrimitiveTopology,
    pub polygon_mode: PolygonMode,
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
    pub line_width: f32,
}

impl Default for RasterState
{
    fn default() -> Self
    {
        Self
        {
            topology: PrimitiveTopology::default(),
            polygon_mode: PolygonMode::default(),
            cull_mode: CullMode::default(),
            front_face: FrontFace::default(),
            line_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexBindingInfo
{
    pub binding: u32,
    pub stride: u32,
    // advances per instance instead of per vertex
    pub instanced: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttributeInfo
{
    pub binding: u32,
    pub location: u32,
    pub offset: u32,
    pub format: AttributeFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShaderStageInfo
{
    pub stage: ShaderStage,
    pub entry: String,
    pub code: Vec<u8>,
}

// One configured draw pipeline over a shader: program code per stage, the
// vertex layout feeding it, and fixed-function state.
pub struct ShaderPassAsset
{
    core: AssetCore,
    shader: Uuid,
    raster: RasterState,
    bindings: Vec<VertexBindingInfo>,
    attributes: Vec<VertexAttributeInfo>,
    stages: Vec<ShaderStageInfo>,
}

impl ShaderPassAsset
{
    #[must_use]
    pub fn new(core: AssetCore, shader: Uuid, raster: RasterState, bindings: Vec<VertexBindingInfo>, attributes: Vec<VertexAttributeInfo>, stages: Vec<ShaderStageInfo>) -> Self
    {
        Self { core, shader, raster, bindings, attributes, stages }
    }

    #[inline] #[must_use]
    pub fn shader(&self) -> Uuid { self.shader }

    #[inline] #[must_use]
    pub fn raster(&self) -> RasterState { self.raster }

    #[inline] #[must_use]
    pub fn topology(&self) -> PrimitiveTopology { self.raster.topology }

    #[inline] #[must_use]
    pub fn bindings(&self) -> &[VertexBindingInfo] { &self.bindings }

    #[inline] #[must_use]
    pub fn attributes(&self) -> &[VertexAttributeInfo] { &self.attributes }

    #[inline] #[must_use]
    pub fn stages(&self) -> &[ShaderStageInfo] { &self.stages }

    // bytes per vertex: the declared binding stride, or the packed extent of
    // the attributes when no binding declares one
    #[must_use]
    pub fn vertex_stride(&self) -> u32
    {
        match self.bindings.first()
        {
            Some(binding) => binding.stride,
            None => self.attributes.iter().map(|a| a.offset + a.format.size()).max().unwrap_or(0),
        }
    }
}

impl_asset!(ShaderPassAsset, AssetKind::ShaderPass, deps: |p: &ShaderPassAsset| vec![p.shader]);
