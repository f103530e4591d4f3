use crate::assets::*;
use crate::{Asset, AssetCore, AssetEngine, AssetKind, LoadError, Node, Reader, Ref, TypedAsset, Uuid};
use glam::{Vec2, Vec3};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;

// Loading is all-or-nothing: every read, parse, and dependency gate happens
// before anything is registered, so a failed load leaves the registry
// untouched. Composite kinds require their referenced assets to already be
// loaded; load order is the caller's responsibility.
impl AssetEngine
{
    // loads whatever kind the path's extension names
    pub fn load_asset(&mut self, path: &Path) -> Result<Ref<dyn Asset>, LoadError>
    {
        let Some(kind) = AssetKind::from_path(path) else
        {
            log::error!("Cannot load asset, no loader for: {path:?}");
            return Err(LoadError::UnsupportedKind(path.to_path_buf()));
        };
        self.check(path)?;

        // an id already registered means this content is loaded; hand out
        // another observer instead of reloading
        let id = self.read_id(path);
        if let Some(existing) = self.get_asset(id)
        {
            log::debug!("{path:?} ({id}) is already loaded");
            return Ok(existing);
        }

        match kind
        {
            AssetKind::Text => self.load_generic(path, id),
            AssetKind::Script => Ok(self.create(ScriptAsset::new(id, path)).as_asset()),
            AssetKind::Texture => self.load_texture(path, id),
            AssetKind::Sprite => self.load_sprite(path, id),
            AssetKind::Shader => self.load_shader(path, id),
            AssetKind::ShaderPass => self.load_shader_pass(path, id),
            AssetKind::MaterialTemplate => self.load_material_template(path, id),
            AssetKind::Material => self.load_material(path, id),
            AssetKind::Mesh => self.load_mesh(path, id),
            AssetKind::AudioClip => self.load_audio(path, id),
            AssetKind::Animation => self.load_animation(path, id),
            AssetKind::Animator => self.load_animator(path, id),
        }
    }

    // load with the kind checked up front against the path's extension
    pub fn load<A: TypedAsset>(&mut self, path: &Path) -> Result<Ref<A>, LoadError>
    {
        match AssetKind::from_path(path)
        {
            Some(found) if found == A::KIND => {},
            Some(found) =>
            {
                log::error!("{path:?} holds a {found:?}, not a {:?}", A::KIND);
                return Err(LoadError::KindMismatch { path: path.to_path_buf(), expected: A::KIND, found });
            },
            None =>
            {
                log::error!("Cannot load asset, no loader for: {path:?}");
                return Err(LoadError::UnsupportedKind(path.to_path_buf()));
            },
        }

        let reference = self.load_asset(path)?;
        match reference.downcast::<A>()
        {
            Some(typed) => Ok(typed),
            // the path's id was already registered under another kind
            None =>
            {
                let found = reference.get().map_or(A::KIND, |a| a.kind());
                log::error!("{path:?} resolved to an already-loaded {found:?}, not a {:?}", A::KIND);
                Err(LoadError::KindMismatch { path: path.to_path_buf(), expected: A::KIND, found })
            },
        }
    }

    fn require<A: TypedAsset>(&self, path: &Path, id: Uuid, missing: &mut usize)
    {
        if self.get::<A>(id).is_none()
        {
            log::error!("{path:?} references a {:?} ({id}) that is not loaded", A::KIND);
            *missing += 1;
        }
    }

    fn gate(&self, path: &Path, missing: usize) -> Result<(), LoadError>
    {
        if missing == 0
        {
            return Ok(());
        }
        Err(LoadError::MissingDependencies { path: path.to_path_buf(), count: missing })
    }

    fn load_generic(&mut self, path: &Path, id: Uuid) -> Result<Ref<dyn Asset>, LoadError>
    {
        let text = self.read_text(path)?;
        Ok(self.create(GenericAsset::new(id, path, text)).as_asset())
    }

    fn load_texture(&mut self, path: &Path, id: Uuid) -> Result<Ref<dyn Asset>, LoadError>
    {
        let bytes = self.read_file(path)?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| LoadError::Malformed { path: path.to_path_buf(), reason: e.to_string() })?
            .to_rgba8();

        let meta = self.read_file_meta(path)?;
        let reader = Reader::new(&meta);
        let sampler = SamplerSettings
        {
            filter: TextureFilter::parse(&reader.read_string("filter", "nearest")),
            address_mode: AddressMode::parse(&reader.read_string("addressMode", "repeat")),
            mipmap_mode: MipmapMode::parse(&reader.read_string("mipmapMode", "nearest")),
        };

        let texture = TextureAsset::new(AssetCore::new(id, path), image.width(), image.height(), sampler, image.into_raw());
        Ok(self.create(texture).as_asset())
    }

    fn load_sprite(&mut self, path: &Path, id: Uuid) -> Result<Ref<dyn Asset>, LoadError>
    {
        let node = self.read_file_node(path)?;
        let reader = Reader::new(&node);

        let texture = reader.read_uuid("texture");
        let material = reader.read_uuid("material");
        let mut missing = 0;
        self.require::<TextureAsset>(path, texture, &mut missing);
        self.require::<MaterialAsset>(path, material, &mut missing);
        self.gate(path, missing)?;

        let sprite = SpriteAsset::new(
            AssetCore::new(id, path),
            texture,
            material,
            CoordinateMode::parse(&reader.read_string("coordinateMode", "normalized")),
            reader.read_vec2("min", Vec2::ZERO),
            reader.read_vec2("max", Vec2::ONE),
            reader.read_vec2("pivot", Vec2::splat(0.5)),
            reader.read_float("pixelsPerUnit", 16.0));
        Ok(self.create(sprite).as_asset())
    }

    fn load_shader(&mut self, path: &Path, id: Uuid) -> Result<Ref<dyn Asset>, LoadError>
    {
        let node = self.read_file_node(path)?;

        let mut push_constants = Vec::new();
        if let Some(list) = node.find("push")
        {
            for child in list.children()
            {
                let reader = Reader::new(child);
                push_constants.push(PushConstantInfo
                {
                    name: child.name().to_string(),
                    stage: ShaderStage::parse(&reader.read_string("stage", "vertex")),
                    offset: reader.read_uint("offset", 0),
                    size: reader.read_uint("size", 0),
                });
            }
        }

        let mut uniform_constants = Vec::new();
        if let Some(list) = node.find("uniforms")
        {
            for child in list.children()
            {
                uniform_constants.push(parse_uniform(child));
            }
        }

        let shader = ShaderAsset::new(AssetCore::new(id, path), push_constants, uniform_constants);
        Ok(self.create(shader).as_asset())
    }

    fn load_shader_pass(&mut self, path: &Path, id: Uuid) -> Result<Ref<dyn Asset>, LoadError>
    {
        let node = self.read_file_node(path)?;
        let reader = Reader::new(&node);

        let shader = reader.read_uuid("shader");
        let mut missing = 0;
        self.require::<ShaderAsset>(path, shader, &mut missing);
        self.gate(path, missing)?;

        let raster = RasterState
        {
            topology: PrimitiveTopology::parse(&reader.read_string("primitiveTopology", "trianglelist")),
            polygon_mode: PolygonMode::parse(&reader.read_string("polygonMode", "fill")),
            cull_mode: CullMode::parse(&reader.read_string("cullMode", "back")),
            front_face: FrontFace::parse(&reader.read_string("frontFace", "counterclockwise")),
            line_width: reader.read_float("lineWidth", 1.0),
        };

        let mut bindings = Vec::new();
        if let Some(list) = node.find("bindings")
        {
            for child in list.children()
            {
                let reader = Reader::new(child);
                bindings.push(VertexBindingInfo
                {
                    binding: reader.read_uint("binding", 0),
                    stride: reader.read_uint("stride", 0),
                    instanced: reader.read_bool("instanced", false),
                });
            }
        }

        let mut attributes = Vec::new();
        if let Some(list) = node.find("attributes")
        {
            for child in list.children()
            {
                let reader = Reader::new(child);
                attributes.push(VertexAttributeInfo
                {
                    binding: reader.read_uint("binding", 0),
                    location: reader.read_uint("location", 0),
                    offset: reader.read_uint("offset", 0),
                    format: AttributeFormat::parse(&reader.read_string("format", "vec3")),
                });
            }
        }

        let mut stages = Vec::new();
        if let Some(list) = node.find("stages")
        {
            for child in list.children()
            {
                let reader = Reader::new(child);
                let Some(code_path) = reader.try_read_string("path") else
                {
                    log::error!("{path:?} stage '{}' names no code file", child.name());
                    return Err(LoadError::Malformed
                    {
                        path: path.to_path_buf(),
                        reason: format!("stage '{}' names no code file", child.name()),
                    });
                };
                let code = self.read_file(Path::new(&code_path))?;
                stages.push(ShaderStageInfo
                {
                    stage: ShaderStage::parse(child.name()),
                    entry: reader.read_string("entry", "main"),
                    code,
                });
            }
        }

        let pass = ShaderPassAsset::new(AssetCore::new(id, path), shader, raster, bindings, attributes, stages);
        Ok(self.create(pass).as_asset())
    }

    // the material-set uniforms of the shader driving the first pass; these
    // type every value a template or material carries
    fn material_uniforms_for_passes(&self, passes: &[Uuid]) -> Option<Vec<UniformConstantInfo>>
    {
        let pass = self.get::<ShaderPassAsset>(*passes.first()?)?.get()?;
        let shader = self.get::<ShaderAsset>(pass.shader())?.get()?;
        Some(shader.material_uniforms().cloned().collect())
    }

    fn load_material_template(&mut self, path: &Path, id: Uuid) -> Result<Ref<dyn Asset>, LoadError>
    {
        let node = self.read_file_node(path)?;

        let passes: Vec<Uuid> = node.find_all("pass").iter().map(|n| n.to_uuid()).collect();
        if passes.is_empty()
        {
            log::error!("{path:?} names no passes");
            return Err(LoadError::Malformed { path: path.to_path_buf(), reason: "names no passes".into() });
        }

        let mut missing = 0;
        for pass in &passes
        {
            self.require::<ShaderPassAsset>(path, *pass, &mut missing);
        }
        self.gate(path, missing)?;

        let Some(uniforms) = self.material_uniforms_for_passes(&passes) else
        {
            log::error!("{path:?} references a shader that is not loaded");
            return Err(LoadError::MissingDependencies { path: path.to_path_buf(), count: 1 });
        };

        let source = node.find("defaults");
        let mut defaults = IndexMap::new();
        for uniform in &uniforms
        {
            let value = source.and_then(|s| s.find(&uniform.name))
                .map_or_else(|| default_value(uniform), |n| parse_value(n, uniform));
            defaults.insert(uniform.name.clone(), value);
        }

        let template = MaterialTemplateAsset::new(AssetCore::new(id, path), passes, defaults);
        Ok(self.create(template).as_asset())
    }

    fn load_material(&mut self, path: &Path, id: Uuid) -> Result<Ref<dyn Asset>, LoadError>
    {
        let node = self.read_file_node(path)?;
        let template_id = Reader::new(&node).read_uuid("template");

        let Some(template) = self.get::<MaterialTemplateAsset>(template_id).and_then(|r| r.get()) else
        {
            log::error!("{path:?} references a {:?} ({template_id}) that is not loaded",
                AssetKind::MaterialTemplate);
            return Err(LoadError::MissingDependencies { path: path.to_path_buf(), count: 1 });
        };

        let mut values = template.defaults().clone();
        if let Some(source) = node.find("values")
        {
            let Some(uniforms) = self.material_uniforms_for_passes(template.passes()) else
            {
                log::error!("{path:?} references a shader that is not loaded");
                return Err(LoadError::MissingDependencies { path: path.to_path_buf(), count: 1 });
            };
            for uniform in &uniforms
            {
                if let Some(child) = source.find(&uniform.name)
                {
                    values.insert(uniform.name.clone(), parse_value(child, uniform));
                }
            }
        }

        let material = MaterialAsset::new(AssetCore::new(id, path), template_id, values);
        Ok(self.create(material).as_asset())
    }

    fn load_mesh(&mut self, path: &Path, id: Uuid) -> Result<Ref<dyn Asset>, LoadError>
    {
        let text = self.read_text(path)?;
        let (vertices, indices) = parse_obj(path, &text)?;
        let mesh = MeshAsset::new(AssetCore::new(id, path), vertices, indices);
        Ok(self.create(mesh).as_asset())
    }

    fn load_audio(&mut self, path: &Path, id: Uuid) -> Result<Ref<dyn Asset>, LoadError>
    {
        let data = self.read_file(path)?;
        let meta = self.read_file_meta(path)?;
        let reader = Reader::new(&meta);

        let clip = AudioClipAsset::new(
            AssetCore::new(id, path),
            data,
            reader.read_float("volume", 1.0),
            reader.read_float("attenuation", 0.0),
            reader.read_bool("looping", false),
            reader.read_float("loopingPoint", 0.0),
            reader.read_bool("singleInstance", false));
        Ok(self.create(clip).as_asset())
    }

    fn load_animation(&mut self, path: &Path, id: Uuid) -> Result<Ref<dyn Asset>, LoadError>
    {
        let node = self.read_file_node(path)?;
        let reader = Reader::new(&node);

        let mut steps = Vec::new();
        if let Some(list) = node.find("steps")
        {
            for frame in list.children()
            {
                let Ok(time) = frame.name().trim().parse::<f32>() else
                {
                    log::warn!("Skipping animation step with invalid time '{}' in {path:?}", frame.name());
                    continue;
                };
                for step in frame.children()
                {
                    steps.push(AnimationStep
                    {
                        time,
                        target: step.name().to_string(),
                        value: step.data().to_string(),
                    });
                }
            }
        }
        // file order is preserved for steps sharing a time
        steps.sort_by(|a, b| a.time.total_cmp(&b.time));

        let mut resets = Vec::new();
        if let Some(list) = node.find("resets")
        {
            for reset in list.children()
            {
                resets.push(AnimationReset { target: reset.name().to_string(), value: reset.data().to_string() });
            }
        }

        let animation = AnimationAsset::new(
            AssetCore::new(id, path),
            reader.read_float("length", 1.0),
            reader.read_bool("loops", false),
            steps,
            resets);
        Ok(self.create(animation).as_asset())
    }

    fn load_animator(&mut self, path: &Path, id: Uuid) -> Result<Ref<dyn Asset>, LoadError>
    {
        let node = self.read_file_node(path)?;
        let reader = Reader::new(&node);

        let mut animations = IndexMap::new();
        if let Some(list) = node.find("animations")
        {
            for child in list.children()
            {
                animations.insert(child.name().to_string(), child.to_uuid());
            }
        }

        let mut missing = 0;
        for animation in animations.values()
        {
            self.require::<AnimationAsset>(path, *animation, &mut missing);
        }
        self.gate(path, missing)?;

        let first = animations.keys().next().cloned().unwrap_or_default();
        let initial = reader.read_string("initial", &first);

        let animator = AnimatorAsset::new(AssetCore::new(id, path), animations, initial);
        Ok(self.create(animator).as_asset())
    }
}

fn parse_uniform(node: &Node) -> UniformConstantInfo
{
    let reader = Reader::new(node);
    let size = reader.read_uint("size", 0);
    // undeclared type: a sized binding is a buffer, a sizeless one a sampler
    let kind = match reader.try_read_string("type")
    {
        Some(text) => UniformKind::parse(&text),
        None if size == 0 => UniformKind::Sampler,
        None => UniformKind::Buffer,
    };
    UniformConstantInfo
    {
        name: node.name().to_string(),
        stage: ShaderStage::parse(&reader.read_string("stage", "vertex")),
        kind,
        set: reader.read_uint("set", 0),
        binding: reader.read_uint("binding", 0),
        size,
        count: reader.read_uint("count", 1),
    }
}

fn float_bytes(values: &[f32]) -> Vec<u8>
{
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn parse_value(node: &Node, uniform: &UniformConstantInfo) -> DescriptorValue
{
    if uniform.kind == UniformKind::Sampler
    {
        // sampler: ids come as bullets, or one inline id
        let ids = if node.has_children()
        {
            node.children().iter().map(Node::to_uuid).collect()
        }
        else if node.has_data()
        {
            vec![node.to_uuid()]
        }
        else
        {
            Vec::new()
        };
        DescriptorValue::Textures(ids)
    }
    else
    {
        // buffer: floats as bullets, or inline whitespace-separated
        let floats: Vec<f32> = if node.has_children()
        {
            node.children().iter().map(|c| c.to_float(0.0)).collect()
        }
        else
        {
            node.data().split_whitespace().filter_map(|t| t.parse().ok()).collect()
        };
        DescriptorValue::Buffer(float_bytes(&floats))
    }
}

fn default_value(uniform: &UniformConstantInfo) -> DescriptorValue
{
    if uniform.kind == UniformKind::Sampler
    {
        DescriptorValue::Textures(vec![Uuid::INVALID; uniform.count as usize])
    }
    else
    {
        DescriptorValue::Buffer(vec![0u8; uniform.size as usize])
    }
}

// index 0 means the face corner omitted that component
fn fetch<T: Copy + Default>(list: &[T], index: usize) -> Option<T>
{
    if index == 0
    {
        return Some(T::default());
    }
    list.get(index - 1).copied()
}

fn obj_corner(token: &str) -> Option<(usize, usize, usize)>
{
    let mut parts = token.split('/');
    let position = parts.next()?.parse::<usize>().ok()?;
    let uv = match parts.next()
    {
        Some("") | None => 0,
        Some(s) => s.parse().ok()?,
    };
    let normal = match parts.next()
    {
        Some("") | None => 0,
        Some(s) => s.parse().ok()?,
    };
    Some((position, uv, normal))
}

fn read_f32<'t>(tokens: &mut impl Iterator<Item = &'t str>) -> Option<f32>
{
    tokens.next()?.parse().ok()
}

// Wavefront OBJ, triangulated by fanning. Source data is y-up with uv origin
// at the bottom left, so y and v are flipped on the way in. Corners are
// deduplicated into indexed u16 vertices.
fn parse_obj(path: &Path, text: &str) -> Result<(Vec<Vertex>, Vec<u16>), LoadError>
{
    let malformed = |line: usize, reason: &str| LoadError::Malformed
    {
        path: path.to_path_buf(),
        reason: format!("line {}: {reason}", line + 1),
    };

    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();

    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices: Vec<u16> = Vec::new();
    let mut dedup: HashMap<(usize, usize, usize), u16> = HashMap::new();

    for (line_no, line) in text.lines().enumerate()
    {
        let mut tokens = line.split_whitespace();
        match tokens.next()
        {
            Some("v") =>
            {
                let (x, y, z) = match (read_f32(&mut tokens), read_f32(&mut tokens), read_f32(&mut tokens))
                {
                    (Some(x), Some(y), Some(z)) => (x, y, z),
                    _ => return Err(malformed(line_no, "unreadable position")),
                };
                positions.push(Vec3::new(x, -y, z));
            },
            Some("vt") =>
            {
                let (u, v) = match (read_f32(&mut tokens), read_f32(&mut tokens))
                {
                    (Some(u), Some(v)) => (u, v),
                    _ => return Err(malformed(line_no, "unreadable uv")),
                };
                uvs.push(Vec2::new(u, 1.0 - v));
            },
            Some("vn") =>
            {
                let (x, y, z) = match (read_f32(&mut tokens), read_f32(&mut tokens), read_f32(&mut tokens))
                {
                    (Some(x), Some(y), Some(z)) => (x, y, z),
                    _ => return Err(malformed(line_no, "unreadable normal")),
                };
                normals.push(Vec3::new(x, -y, z));
            },
            Some("f") =>
            {
                let mut corners = Vec::new();
                for token in tokens
                {
                    match obj_corner(token)
                    {
                        Some(corner) => corners.push(corner),
                        None => return Err(malformed(line_no, "unreadable face corner")),
                    }
                }
                if corners.len() < 3
                {
                    return Err(malformed(line_no, "face with fewer than three corners"));
                }

                for i in 1..corners.len() - 1
                {
                    for corner in [corners[0], corners[i], corners[i + 1]]
                    {
                        let index = match dedup.get(&corner)
                        {
                            Some(index) => *index,
                            None =>
                            {
                                if vertices.len() >= usize::from(u16::MAX)
                                {
                                    return Err(malformed(line_no, "too many vertices for 16-bit indices"));
                                }
                                let vertex = Vertex
                                {
                                    position: fetch(&positions, corner.0)
                                        .ok_or_else(|| malformed(line_no, "position index out of range"))?,
                                    uv: fetch(&uvs, corner.1)
                                        .ok_or_else(|| malformed(line_no, "uv index out of range"))?,
                                    normal: fetch(&normals, corner.2)
                                        .ok_or_else(|| malformed(line_no, "normal index out of range"))?,
                                };
                                let index = vertices.len() as u16;
                                vertices.push(vertex);
                                dedup.insert(corner, index);
                                index
                            },
                        };
                        indices.push(index);
                    }
                }
            },
            // objects, groups, smoothing, materials, comments
            _ => {},
        }
    }

    Ok((vertices, indices))
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::{Archive, AssetEngine, RunMode, VirtualFs};

    struct Fixture
    {
        archive: Archive,
    }

    impl Fixture
    {
        fn new() -> Self
        {
            Self { archive: Archive::new("fixture", 1) }
        }

        fn text(mut self, path: &str, content: &str) -> Self
        {
            self.archive.insert(path, content.as_bytes().to_vec());
            self
        }

        fn bytes(mut self, path: &str, content: Vec<u8>) -> Self
        {
            self.archive.insert(path, content);
            self
        }

        fn meta(self, path: &str, id: u64) -> Self
        {
            let meta = format!(": {id:016x}\n");
            let meta_path = format!("{path}.meta");
            self.text(&meta_path, &meta)
        }

        fn build(self) -> AssetEngine
        {
            let mut vfs = VirtualFs::new();
            vfs.mount(self.archive);
            AssetEngine::new(RunMode::Packaged, vfs)
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8>
    {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    const SHADER_SRC: &str = "\
push
    camera
        stage: vertex
        offset: 0
        size: 64
uniforms
    color
        stage: fragment
        set: 2
        binding: 0
        size: 16
    tex
        stage: fragment
        set: 2
        binding: 1
        size: 0
    frame
        stage: vertex
        set: 0
        binding: 0
        size: 128
";

    const PASS_SRC: &str = "\
shader: 1
primitiveTopology: trianglelist
attributes
    position
        location: 0
        offset: 0
        format: vec3
    uv
        location: 1
        offset: 12
        format: vec2
stages
    vertex
        entry: vs_main
        path: shaders/toon.vert.bin
    fragment
        entry: fs_main
        path: shaders/toon.frag.bin
";

    const TEMPLATE_SRC: &str = "\
pass: 2
defaults
    color
        - 1
        - 1
        - 1
        - 1
";

    const MATERIAL_SRC: &str = "\
template: 3
values
    color
        - 1
        - 0
        - 0
        - 1
    tex: 5
";

    const SPRITE_SRC: &str = "\
texture: 5
material: 4
min
    x: 0
    y: 0
max
    x: 0.5
    y: 0.5
pixelsPerUnit: 32
";

    // the full render chain: shader <- pass <- template <- material <- sprite,
    // plus the sprite's texture
    fn studio() -> AssetEngine
    {
        Fixture::new()
            .bytes("shaders/toon.vert.bin", vec![1, 2, 3, 4])
            .bytes("shaders/toon.frag.bin", vec![5, 6])
            .text("shaders/toon.shader", SHADER_SRC).meta("shaders/toon.shader", 1)
            .text("shaders/toon.shaderpass", PASS_SRC).meta("shaders/toon.shaderpass", 2)
            .text("materials/toon.materialtemplate", TEMPLATE_SRC).meta("materials/toon.materialtemplate", 3)
            .text("materials/red.material", MATERIAL_SRC).meta("materials/red.material", 4)
            .bytes("textures/hero.png", png_bytes(2, 2)).meta("textures/hero.png", 5)
            .text("chars/hero.sprite", SPRITE_SRC).meta("chars/hero.sprite", 6)
            .build()
    }

    fn load_chain(engine: &mut AssetEngine)
    {
        engine.load::<ShaderAsset>(Path::new("shaders/toon.shader")).unwrap();
        engine.load::<ShaderPassAsset>(Path::new("shaders/toon.shaderpass")).unwrap();
        engine.load::<MaterialTemplateAsset>(Path::new("materials/toon.materialtemplate")).unwrap();
        engine.load::<TextureAsset>(Path::new("textures/hero.png")).unwrap();
        engine.load::<MaterialAsset>(Path::new("materials/red.material")).unwrap();
        engine.load::<SpriteAsset>(Path::new("chars/hero.sprite")).unwrap();
    }

    mod simple_kinds
    {
        use super::*;

        #[test]
        fn text_files_load_their_contents()
        {
            let mut engine = Fixture::new()
                .text("notes/readme.txt", "hello world")
                .meta("notes/readme.txt", 0x10)
                .build();

            let text = engine.load::<GenericAsset>(Path::new("notes/readme.txt")).unwrap();
            let text = text.get().unwrap();
            assert_eq!(text.id(), Uuid::from_raw(0x10));
            assert_eq!(text.text(), "hello world");
            assert_eq!(text.name(), "readme");
        }

        #[test]
        fn scripts_take_their_class_name_from_the_stem()
        {
            let mut engine = Fixture::new()
                .text("scripts/Player.cs", "class Player {}")
                .meta("scripts/Player.cs", 0x11)
                .build();

            let script = engine.load::<ScriptAsset>(Path::new("scripts/Player.cs")).unwrap();
            assert_eq!(script.get().unwrap().class_name(), "Player");
        }

        #[test]
        fn textures_decode_to_rgba8()
        {
            let mut engine = Fixture::new()
                .bytes("t.png", png_bytes(2, 3))
                .meta("t.png", 0x12)
                .build();

            let texture = engine.load::<TextureAsset>(Path::new("t.png")).unwrap();
            let texture = texture.get().unwrap();
            assert_eq!(texture.width(), 2);
            assert_eq!(texture.height(), 3);
            assert_eq!(texture.pixels().len(), 2 * 3 * 4);
            assert_eq!(texture.filter(), TextureFilter::Nearest);
            assert_eq!(&texture.pixels()[0..4], &[255, 0, 0, 255]);
        }

        #[test]
        fn texture_sampler_settings_come_from_the_meta()
        {
            let mut engine = Fixture::new()
                .bytes("t.png", png_bytes(1, 1))
                .text("t.png.meta", ": 13\nfilter: linear\naddressMode: clamp\nmipmapMode: linear\n")
                .build();

            let texture = engine.load::<TextureAsset>(Path::new("t.png")).unwrap();
            let sampler = texture.get().unwrap().sampler();
            assert_eq!(sampler.filter, TextureFilter::Linear);
            assert_eq!(sampler.address_mode, AddressMode::Clamp);
            assert_eq!(sampler.mipmap_mode, MipmapMode::Linear);
        }

        #[test]
        fn garbage_image_bytes_are_malformed()
        {
            let mut engine = Fixture::new()
                .text("t.png", "this is not a png")
                .meta("t.png", 0x14)
                .build();

            assert!(matches!(
                engine.load::<TextureAsset>(Path::new("t.png")),
                Err(LoadError::Malformed { .. })));
            assert_eq!(engine.asset_count(), 0);
        }

        #[test]
        fn audio_clips_keep_bytes_and_meta_settings()
        {
            let mut engine = Fixture::new()
                .bytes("sfx/jump.wav", vec![0x52, 0x49, 0x46, 0x46])
                .text("sfx/jump.wav.meta", ": 15\nvolume: 0.8\nlooping: true\nloopingPoint: 1.5\nsingleInstance: true\n")
                .build();

            let clip = engine.load::<AudioClipAsset>(Path::new("sfx/jump.wav")).unwrap();
            let clip = clip.get().unwrap();
            assert_eq!(clip.data(), &[0x52, 0x49, 0x46, 0x46]);
            assert_eq!(clip.volume(), 0.8);
            assert_eq!(clip.attenuation(), 0.0);
            assert!(clip.looping());
            assert_eq!(clip.loop_point(), 1.5);
            assert!(clip.single_instance());
        }
    }

    mod preconditions
    {
        use super::*;

        #[test]
        fn missing_meta_refuses_the_load()
        {
            let mut engine = Fixture::new()
                .text("bare.txt", "no sidecar")
                .build();

            assert!(matches!(
                engine.load_asset(Path::new("bare.txt")),
                Err(LoadError::MissingMeta(_))));
            assert_eq!(engine.asset_count(), 0);
        }

        #[test]
        fn unknown_extensions_have_no_loader()
        {
            let mut engine = Fixture::new().build();
            assert!(matches!(
                engine.load_asset(Path::new("thing.xyz")),
                Err(LoadError::UnsupportedKind(_))));
        }

        #[test]
        fn extension_and_requested_kind_must_agree()
        {
            let mut engine = studio();
            load_chain(&mut engine);

            assert!(matches!(
                engine.load::<MaterialAsset>(Path::new("chars/hero.sprite")),
                Err(LoadError::KindMismatch { expected: AssetKind::Material, found: AssetKind::Sprite, .. })));
        }

        #[test]
        fn reloading_a_loaded_path_reuses_the_asset()
        {
            let mut engine = studio();
            load_chain(&mut engine);
            assert_eq!(engine.asset_count(), 6);

            let again = engine.load::<SpriteAsset>(Path::new("chars/hero.sprite")).unwrap();
            assert_eq!(engine.asset_count(), 6);
            assert_eq!(again.get().unwrap().id(), Uuid::from_raw(6));
        }
    }

    mod dependency_gates
    {
        use super::*;

        #[test]
        fn material_without_its_template_counts_one_missing()
        {
            let mut engine = studio();

            assert!(matches!(
                engine.load::<MaterialAsset>(Path::new("materials/red.material")),
                Err(LoadError::MissingDependencies { count: 1, .. })));
            assert_eq!(engine.asset_count(), 0);
        }

        #[test]
        fn sprite_without_anything_counts_both_missing()
        {
            let mut engine = studio();

            assert!(matches!(
                engine.load::<SpriteAsset>(Path::new("chars/hero.sprite")),
                Err(LoadError::MissingDependencies { count: 2, .. })));
            assert_eq!(engine.asset_count(), 0);
        }

        #[test]
        fn failed_loads_register_nothing()
        {
            let mut engine = studio();

            assert!(engine.load::<ShaderPassAsset>(Path::new("shaders/toon.shaderpass")).is_err());
            assert!(!engine.contains(Uuid::from_raw(2)));
            assert_eq!(engine.asset_count(), 0);
        }

        #[test]
        fn animator_requires_every_animation()
        {
            let fixture = Fixture::new()
                .text("anim/walk.animation", "length: 0.5\n").meta("anim/walk.animation", 7)
                .text("anim/hero.animator", "\
initial: walk
animations
    walk: 7
    idle: 8
").meta("anim/hero.animator", 9);
            let mut engine = fixture.build();

            engine.load::<AnimationAsset>(Path::new("anim/walk.animation")).unwrap();
            assert!(matches!(
                engine.load::<AnimatorAsset>(Path::new("anim/hero.animator")),
                Err(LoadError::MissingDependencies { count: 1, .. })));
        }
    }

    mod render_chain
    {
        use super::*;

        #[test]
        fn loads_in_order_and_links_up()
        {
            let mut engine = studio();
            load_chain(&mut engine);
            assert_eq!(engine.asset_count(), 6);

            let sprite = engine.at::<SpriteAsset>(Uuid::from_raw(6));
            let sprite = sprite.get().unwrap();
            assert_eq!(sprite.texture(), Uuid::from_raw(5));
            assert_eq!(sprite.material(), Uuid::from_raw(4));
            assert_eq!(sprite.max(), Vec2::new(0.5, 0.5));
            assert_eq!(sprite.pivot(), Vec2::splat(0.5)); // unspecified, default
            assert_eq!(sprite.pixels_per_unit(), 32.0);
            assert_eq!(sprite.dependencies(), vec![Uuid::from_raw(4), Uuid::from_raw(5)]);
        }

        #[test]
        fn shader_interface_is_parsed()
        {
            let mut engine = studio();
            load_chain(&mut engine);

            let shader = engine.at::<ShaderAsset>(Uuid::from_raw(1));
            let shader = shader.get().unwrap();
            assert_eq!(shader.push_constants().len(), 1);
            assert_eq!(shader.push_constants()[0].size, 64);
            assert_eq!(shader.uniform_constants().len(), 3);

            // only set-2 constants are material inputs
            let names: Vec<&str> = shader.material_uniforms().map(|u| u.name.as_str()).collect();
            assert_eq!(names, vec!["color", "tex"]);

            // no declared type: inferred from the size
            assert_eq!(shader.uniform_constants()[0].kind, UniformKind::Buffer);
            assert_eq!(shader.uniform_constants()[1].kind, UniformKind::Sampler);
        }

        #[test]
        fn pass_reads_its_stage_code()
        {
            let mut engine = studio();
            load_chain(&mut engine);

            let pass = engine.at::<ShaderPassAsset>(Uuid::from_raw(2));
            let pass = pass.get().unwrap();
            assert_eq!(pass.shader(), Uuid::from_raw(1));
            assert_eq!(pass.topology(), PrimitiveTopology::TriangleList);
            assert_eq!(pass.vertex_stride(), 20);

            // unspecified fixed-function state keeps the defaults
            assert_eq!(pass.raster().cull_mode, CullMode::Back);
            assert_eq!(pass.raster().polygon_mode, PolygonMode::Fill);
            assert_eq!(pass.raster().line_width, 1.0);
            assert!(pass.bindings().is_empty());

            assert_eq!(pass.stages().len(), 2);
            assert_eq!(pass.stages()[0].stage, ShaderStage::Vertex);
            assert_eq!(pass.stages()[0].entry, "vs_main");
            assert_eq!(pass.stages()[0].code, vec![1, 2, 3, 4]);
            assert_eq!(pass.stages()[1].stage, ShaderStage::Fragment);
            assert_eq!(pass.stages()[1].code, vec![5, 6]);
        }

        #[test]
        fn pass_raster_state_comes_from_the_file()
        {
            let mut engine = Fixture::new()
                .text("shaders/toon.shader", SHADER_SRC).meta("shaders/toon.shader", 1)
                .text("shaders/wire.shaderpass", "\
shader: 1
primitiveTopology: linelist
polygonMode: line
cullMode: none
frontFace: clockwise
lineWidth: 2
")
                .meta("shaders/wire.shaderpass", 2)
                .build();

            engine.load::<ShaderAsset>(Path::new("shaders/toon.shader")).unwrap();
            let pass = engine.load::<ShaderPassAsset>(Path::new("shaders/wire.shaderpass")).unwrap();
            let raster = pass.get().unwrap().raster();
            assert_eq!(raster.topology, PrimitiveTopology::LineList);
            assert_eq!(raster.polygon_mode, PolygonMode::Line);
            assert_eq!(raster.cull_mode, CullMode::None);
            assert_eq!(raster.front_face, FrontFace::Clockwise);
            assert_eq!(raster.line_width, 2.0);
        }

        #[test]
        fn template_defaults_follow_the_shader_interface()
        {
            let mut engine = studio();
            load_chain(&mut engine);

            let template = engine.at::<MaterialTemplateAsset>(Uuid::from_raw(3));
            let template = template.get().unwrap();
            assert_eq!(template.passes(), &[Uuid::from_raw(2)]);

            assert_eq!(
                template.defaults().get("color"),
                Some(&DescriptorValue::Buffer(float_bytes(&[1.0, 1.0, 1.0, 1.0]))));
            // no default in the file: sampler slots fill with invalid ids
            assert_eq!(
                template.defaults().get("tex"),
                Some(&DescriptorValue::Textures(vec![Uuid::INVALID])));
            // set-0 constants are not material inputs
            assert!(template.defaults().get("frame").is_none());
        }

        #[test]
        fn material_overlays_template_defaults()
        {
            let mut engine = studio();
            load_chain(&mut engine);

            let material = engine.at::<MaterialAsset>(Uuid::from_raw(4));
            let material = material.get().unwrap();
            assert_eq!(material.template(), Uuid::from_raw(3));
            assert_eq!(
                material.value("color"),
                Some(DescriptorValue::Buffer(float_bytes(&[1.0, 0.0, 0.0, 1.0]))));
            assert_eq!(
                material.value("tex"),
                Some(DescriptorValue::Textures(vec![Uuid::from_raw(5)])));

            // values are rewritable through observer handles
            material.set_value("color", DescriptorValue::Buffer(float_bytes(&[0.0, 1.0, 0.0, 1.0])));
            assert_eq!(
                material.value("color"),
                Some(DescriptorValue::Buffer(float_bytes(&[0.0, 1.0, 0.0, 1.0]))));
        }

        #[test]
        fn dependents_walk_back_up_the_chain()
        {
            let mut engine = studio();
            load_chain(&mut engine);

            let of = |id: u64| -> Vec<Uuid>
            {
                engine.get_dependents(Uuid::from_raw(id)).iter()
                    .filter_map(|r| r.get().map(|a| a.id()))
                    .collect()
            };

            assert_eq!(of(1), vec![Uuid::from_raw(2)]); // shader <- pass
            assert_eq!(of(2), vec![Uuid::from_raw(3)]); // pass <- template
            assert_eq!(of(3), vec![Uuid::from_raw(4)]); // template <- material
            assert_eq!(of(4), vec![Uuid::from_raw(6)]); // material <- sprite
            assert_eq!(of(5), vec![Uuid::from_raw(6)]); // texture <- sprite
            assert!(of(6).is_empty());
        }
    }

    mod meshes
    {
        use super::*;

        const QUAD_OBJ: &str = "\
# a unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

        #[test]
        fn obj_quads_fan_into_deduplicated_triangles()
        {
            let mut engine = Fixture::new()
                .text("models/quad.obj", QUAD_OBJ)
                .meta("models/quad.obj", 0x20)
                .build();

            let mesh = engine.load::<MeshAsset>(Path::new("models/quad.obj")).unwrap();
            let mesh = mesh.get().unwrap();
            assert_eq!(mesh.vertex_count(), 4);
            assert_eq!(mesh.index_count(), 6);
            assert_eq!(*mesh.indices(), vec![0, 1, 2, 0, 2, 3]);

            // y and v flip on import
            let vertices = mesh.vertices();
            assert_eq!(vertices[2].position, Vec3::new(1.0, -1.0, 0.0));
            assert_eq!(vertices[0].uv, Vec2::new(0.0, 1.0));
            assert_eq!(vertices[0].normal, Vec3::new(0.0, 0.0, 1.0));
        }

        #[test]
        fn broken_faces_are_malformed()
        {
            let mut engine = Fixture::new()
                .text("models/bad.obj", "v 0 0 0\nf 1/x 2 3\n")
                .meta("models/bad.obj", 0x21)
                .build();

            assert!(matches!(
                engine.load::<MeshAsset>(Path::new("models/bad.obj")),
                Err(LoadError::Malformed { .. })));
        }

        #[test]
        fn out_of_range_corner_indices_are_malformed()
        {
            let mut engine = Fixture::new()
                .text("models/oob.obj", "v 0 0 0\nf 1 2 3\n")
                .meta("models/oob.obj", 0x22)
                .build();

            assert!(matches!(
                engine.load::<MeshAsset>(Path::new("models/oob.obj")),
                Err(LoadError::Malformed { .. })));
        }
    }

    mod animations
    {
        use super::*;

        #[test]
        fn steps_parse_and_sort_by_time()
        {
            let mut engine = Fixture::new()
                .text("anim/walk.animation", "\
length: 0.5
loops: true
steps
    0.25
        body/sprite: bb
    0
        body/sprite: aa
resets
    body/sprite: aa
")
                .meta("anim/walk.animation", 0x30)
                .build();

            let animation = engine.load::<AnimationAsset>(Path::new("anim/walk.animation")).unwrap();
            let animation = animation.get().unwrap();
            assert_eq!(animation.length(), 0.5);
            assert!(animation.loops());

            assert_eq!(animation.steps().len(), 2);
            assert_eq!(animation.steps()[0].time, 0.0);
            assert_eq!(animation.steps()[0].target, "body/sprite");
            assert_eq!(animation.steps()[0].value, "aa");
            assert_eq!(animation.steps()[1].time, 0.25);

            assert_eq!(animation.resets().len(), 1);
            assert_eq!(animation.resets()[0].value, "aa");
        }

        #[test]
        fn animators_resolve_names_to_ids()
        {
            let mut engine = Fixture::new()
                .text("anim/walk.animation", "length: 0.5\n").meta("anim/walk.animation", 7)
                .text("anim/idle.animation", "length: 1\n").meta("anim/idle.animation", 8)
                .text("anim/hero.animator", "\
animations
    walk: 7
    idle: 8
")
                .meta("anim/hero.animator", 9)
                .build();

            engine.load::<AnimationAsset>(Path::new("anim/walk.animation")).unwrap();
            engine.load::<AnimationAsset>(Path::new("anim/idle.animation")).unwrap();

            let animator = engine.load::<AnimatorAsset>(Path::new("anim/hero.animator")).unwrap();
            let animator = animator.get().unwrap();
            assert_eq!(animator.animation("walk"), Some(Uuid::from_raw(7)));
            assert_eq!(animator.animation("idle"), Some(Uuid::from_raw(8)));
            assert_eq!(animator.animation("run"), None);
            // no explicit initial: the first entry
            assert_eq!(animator.initial(), "walk");
            assert_eq!(animator.dependencies(), vec![Uuid::from_raw(7), Uuid::from_raw(8)]);
        }
    }
}
