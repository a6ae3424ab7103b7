//! In-memory backend: no driver, no window.
//!
//! Models the parts of OpenGL state the renderer relies on (buffer storage,
//! vertex array element-buffer binding, texture units, program uniforms) and
//! records every draw call so batching behavior can be inspected.

use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroU32;

use tracing::trace;

use super::{
    BufferId, BufferTarget, BufferUsage, GraphicsApi, ProgramId, ShaderId, ShaderStage, TextureId,
    TextureSampling, UniformLocation, UniformValue, VertexArrayId, VertexAttrib,
};
use crate::error::RenderError;

/// A snapshot of pipeline state taken at each indexed draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub program: Option<ProgramId>,
    pub vertex_array: Option<VertexArrayId>,
    pub index_count: usize,
    /// Indices read from the vertex array's element buffer.
    pub indices: Vec<u32>,
    /// Texture bound on each unit, keyed by unit index.
    pub textures: BTreeMap<u32, TextureId>,
}

/// Owned copy of an uploaded uniform value.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedUniform {
    Int(i32),
    IntArray(Vec<i32>),
    Float(f32),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

impl From<UniformValue<'_>> for RecordedUniform {
    fn from(value: UniformValue<'_>) -> Self {
        match value {
            UniformValue::Int(v) => RecordedUniform::Int(v),
            UniformValue::IntArray(v) => RecordedUniform::IntArray(v.to_vec()),
            UniformValue::Float(v) => RecordedUniform::Float(v),
            UniformValue::Vec4(v) => RecordedUniform::Vec4(v),
            UniformValue::Mat4(v) => RecordedUniform::Mat4(*v),
        }
    }
}

#[derive(Debug, Default)]
struct HeadlessBuffer {
    data: Vec<u8>,
    usage: Option<BufferUsage>,
}

#[derive(Debug, Default)]
struct HeadlessVertexArray {
    element_buffer: Option<BufferId>,
    attributes: BTreeMap<u32, (VertexAttrib, Option<BufferId>)>,
    enabled: Vec<u32>,
}

#[derive(Debug)]
struct HeadlessTexture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    sampling: Option<TextureSampling>,
    mipmapped: bool,
}

#[derive(Debug)]
struct HeadlessShader {
    stage: ShaderStage,
    source: String,
}

#[derive(Debug, Default)]
struct HeadlessProgram {
    attached: Vec<ShaderId>,
    linked: bool,
    uniforms: HashMap<String, UniformLocation>,
    values: HashMap<UniformLocation, RecordedUniform>,
}

/// Recording [`GraphicsApi`] implementation.
///
/// Misuse that a driver would flag with `GL_INVALID_OPERATION` or
/// `GL_INVALID_VALUE` is collected in [`HeadlessBackend::errors`] rather
/// than panicking.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u32,
    buffers: HashMap<BufferId, HeadlessBuffer>,
    array_buffer: Option<BufferId>,
    // Element buffer binding while no vertex array is bound.
    loose_element_buffer: Option<BufferId>,
    vertex_arrays: HashMap<VertexArrayId, HeadlessVertexArray>,
    bound_vertex_array: Option<VertexArrayId>,
    textures: HashMap<TextureId, HeadlessTexture>,
    active_unit: u32,
    units: BTreeMap<u32, TextureId>,
    shaders: HashMap<ShaderId, HeadlessShader>,
    programs: HashMap<ProgramId, HeadlessProgram>,
    current_program: Option<ProgramId>,
    compile_failure: Option<(ShaderStage, String)>,
    link_failure: Option<String>,
    vertex_array_failure: Option<String>,
    location_queries: usize,
    draw_calls: Vec<DrawCall>,
    clears: Vec<[f32; 4]>,
    viewport: Option<[i32; 4]>,
    blending: bool,
    debug_output: bool,
    errors: Vec<String>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent compile of `stage` fail with `log`.
    pub fn fail_compile(&mut self, stage: ShaderStage, log: impl Into<String>) {
        self.compile_failure = Some((stage, log.into()));
    }

    /// Make every subsequent link fail with `log`.
    pub fn fail_link(&mut self, log: impl Into<String>) {
        self.link_failure = Some(log.into());
    }

    /// Make every subsequent vertex array creation fail with `message`.
    pub fn fail_vertex_arrays(&mut self, message: impl Into<String>) {
        self.vertex_array_failure = Some(message.into());
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    pub fn clears(&self) -> &[[f32; 4]] {
        &self.clears
    }

    pub fn viewport_rect(&self) -> Option<[i32; 4]> {
        self.viewport
    }

    pub fn blending_enabled(&self) -> bool {
        self.blending
    }

    pub fn debug_output_enabled(&self) -> bool {
        self.debug_output
    }

    /// Invalid calls observed so far.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn buffer_data(&self, buffer: BufferId) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(|b| b.data.as_slice())
    }

    pub fn buffer_usage(&self, buffer: BufferId) -> Option<BufferUsage> {
        self.buffers.get(&buffer).and_then(|b| b.usage)
    }

    pub fn element_buffer_of(&self, vertex_array: VertexArrayId) -> Option<BufferId> {
        self.vertex_arrays
            .get(&vertex_array)
            .and_then(|v| v.element_buffer)
    }

    /// Attribute bindings of a vertex array with the array buffer each was
    /// sourced from, ordered by attribute index.
    pub fn attributes_of(&self, vertex_array: VertexArrayId) -> Vec<(VertexAttrib, Option<BufferId>)> {
        self.vertex_arrays
            .get(&vertex_array)
            .map(|v| v.attributes.values().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_attribute_enabled(&self, vertex_array: VertexArrayId, index: u32) -> bool {
        self.vertex_arrays
            .get(&vertex_array)
            .is_some_and(|v| v.enabled.contains(&index))
    }

    pub fn bound_vertex_array(&self) -> Option<VertexArrayId> {
        self.bound_vertex_array
    }

    pub fn bound_buffer(&self, target: BufferTarget) -> Option<BufferId> {
        match target {
            BufferTarget::Array => self.array_buffer,
            BufferTarget::ElementArray => self.current_element_buffer(),
        }
    }

    pub fn current_program(&self) -> Option<ProgramId> {
        self.current_program
    }

    /// Textures currently bound, keyed by unit index.
    pub fn bound_textures(&self) -> &BTreeMap<u32, TextureId> {
        &self.units
    }

    pub fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.textures.get(&texture).map(|t| (t.width, t.height))
    }

    pub fn texture_pixels(&self, texture: TextureId) -> Option<&[u8]> {
        self.textures.get(&texture).map(|t| t.pixels.as_slice())
    }

    pub fn texture_sampling_of(&self, texture: TextureId) -> Option<TextureSampling> {
        self.textures.get(&texture).and_then(|t| t.sampling)
    }

    pub fn texture_has_mipmaps(&self, texture: TextureId) -> bool {
        self.textures.get(&texture).is_some_and(|t| t.mipmapped)
    }

    /// Last value uploaded to `name` on `program`.
    pub fn uniform_value(&self, program: ProgramId, name: &str) -> Option<&RecordedUniform> {
        let program = self.programs.get(&program)?;
        let location = program.uniforms.get(name)?;
        program.values.get(location)
    }

    /// Number of `uniform_location` lookups issued.
    pub fn location_queries(&self) -> usize {
        self.location_queries
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.vertex_arrays.len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    fn next_handle(&mut self) -> NonZeroU32 {
        self.next_id += 1;
        NonZeroU32::MIN.saturating_add(self.next_id - 1)
    }

    fn record_error(&mut self, message: String) {
        trace!(%message, "headless GL error");
        self.errors.push(message);
    }

    fn current_element_buffer(&self) -> Option<BufferId> {
        match self.bound_vertex_array {
            Some(vao) => self
                .vertex_arrays
                .get(&vao)
                .and_then(|v| v.element_buffer),
            None => self.loose_element_buffer,
        }
    }

    fn target_buffer(&self, target: BufferTarget) -> Option<BufferId> {
        match target {
            BufferTarget::Array => self.array_buffer,
            BufferTarget::ElementArray => self.current_element_buffer(),
        }
    }

    fn read_indices(&self, count: usize) -> Option<Vec<u32>> {
        let buffer = self.buffers.get(&self.current_element_buffer()?)?;
        let bytes = buffer.data.get(..count * 4)?;
        Some(
            bytes
                .chunks_exact(4)
                .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }
}

/// Names declared with `uniform <type> <name>` in GLSL source.
fn declared_uniforms(source: &str) -> impl Iterator<Item = &str> {
    source.lines().filter_map(|line| {
        let mut tokens = line.trim().strip_prefix("uniform ")?.split_whitespace();
        let _ty = tokens.next()?;
        let name = tokens.next()?.trim_end_matches(';');
        Some(name.split('[').next().unwrap_or(name))
    })
}

impl GraphicsApi for HeadlessBackend {
    fn create_buffer(&mut self) -> Result<BufferId, RenderError> {
        let id = BufferId::new(self.next_handle());
        self.buffers.insert(id, HeadlessBuffer::default());
        Ok(id)
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        if let Some(id) = buffer {
            if !self.buffers.contains_key(&id) {
                self.record_error(format!("bind of unknown buffer {}", id.get()));
                return;
            }
        }
        match target {
            BufferTarget::Array => self.array_buffer = buffer,
            BufferTarget::ElementArray => match self.bound_vertex_array {
                Some(vao) => {
                    if let Some(v) = self.vertex_arrays.get_mut(&vao) {
                        v.element_buffer = buffer;
                    }
                }
                None => self.loose_element_buffer = buffer,
            },
        }
    }

    fn buffer_storage(&mut self, target: BufferTarget, size: usize, usage: BufferUsage) {
        let Some(id) = self.target_buffer(target) else {
            self.record_error(format!("buffer_storage with no {target:?} buffer bound"));
            return;
        };
        if let Some(buffer) = self.buffers.get_mut(&id) {
            buffer.data = vec![0; size];
            buffer.usage = Some(usage);
        }
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        let Some(id) = self.target_buffer(target) else {
            self.record_error(format!("buffer_sub_data with no {target:?} buffer bound"));
            return;
        };
        let Some(buffer) = self.buffers.get_mut(&id) else {
            return;
        };
        let end = offset + data.len();
        if end > buffer.data.len() {
            let size = buffer.data.len();
            self.record_error(format!(
                "buffer_sub_data range {offset}..{end} exceeds storage of {size} bytes"
            ));
            return;
        }
        buffer.data[offset..end].copy_from_slice(data);
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
        if self.array_buffer == Some(buffer) {
            self.array_buffer = None;
        }
        if self.loose_element_buffer == Some(buffer) {
            self.loose_element_buffer = None;
        }
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, RenderError> {
        if let Some(message) = &self.vertex_array_failure {
            return Err(RenderError::Backend(message.clone()));
        }
        let id = VertexArrayId::new(self.next_handle());
        self.vertex_arrays.insert(id, HeadlessVertexArray::default());
        Ok(id)
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) {
        if let Some(id) = vertex_array {
            if !self.vertex_arrays.contains_key(&id) {
                self.record_error(format!("bind of unknown vertex array {}", id.get()));
                return;
            }
        }
        self.bound_vertex_array = vertex_array;
    }

    fn vertex_attrib_pointer(&mut self, attrib: VertexAttrib) {
        let source = self.array_buffer;
        match self
            .bound_vertex_array
            .and_then(|vao| self.vertex_arrays.get_mut(&vao))
        {
            Some(v) => {
                v.attributes.insert(attrib.index, (attrib, source));
            }
            None => self.record_error("vertex_attrib_pointer with no vertex array bound".into()),
        }
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        match self
            .bound_vertex_array
            .and_then(|vao| self.vertex_arrays.get_mut(&vao))
        {
            Some(v) => {
                if !v.enabled.contains(&index) {
                    v.enabled.push(index);
                }
            }
            None => {
                self.record_error("enable_vertex_attrib_array with no vertex array bound".into())
            }
        }
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        self.vertex_arrays.remove(&vertex_array);
        if self.bound_vertex_array == Some(vertex_array) {
            self.bound_vertex_array = None;
        }
    }

    fn create_texture(&mut self) -> Result<TextureId, RenderError> {
        let id = TextureId::new(self.next_handle());
        self.textures.insert(
            id,
            HeadlessTexture {
                width: 0,
                height: 0,
                pixels: Vec::new(),
                sampling: None,
                mipmapped: false,
            },
        );
        Ok(id)
    }

    fn active_texture(&mut self, unit: u32) {
        self.active_unit = unit;
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        match texture {
            Some(id) if !self.textures.contains_key(&id) => {
                self.record_error(format!("bind of unknown texture {}", id.get()));
            }
            Some(id) => {
                self.units.insert(self.active_unit, id);
            }
            None => {
                self.units.remove(&self.active_unit);
            }
        }
    }

    fn texture_sampling(&mut self, sampling: TextureSampling) {
        match self
            .units
            .get(&self.active_unit)
            .and_then(|id| self.textures.get_mut(id))
        {
            Some(t) => t.sampling = Some(sampling),
            None => self.record_error("texture_sampling with no texture bound".into()),
        }
    }

    fn texture_image_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            self.record_error(format!(
                "texture upload of {} bytes for {width}x{height} RGBA8",
                pixels.len()
            ));
            return;
        }
        match self
            .units
            .get(&self.active_unit)
            .and_then(|id| self.textures.get_mut(id))
        {
            Some(t) => {
                t.width = width;
                t.height = height;
                t.pixels = pixels.to_vec();
                t.mipmapped = false;
            }
            None => self.record_error("texture upload with no texture bound".into()),
        }
    }

    fn generate_mipmap(&mut self) {
        match self
            .units
            .get(&self.active_unit)
            .and_then(|id| self.textures.get_mut(id))
        {
            Some(t) => t.mipmapped = true,
            None => self.record_error("generate_mipmap with no texture bound".into()),
        }
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
        self.units.retain(|_, bound| *bound != texture);
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId, RenderError> {
        let id = ShaderId::new(self.next_handle());
        self.shaders.insert(
            id,
            HeadlessShader {
                stage,
                source: String::new(),
            },
        );
        Ok(id)
    }

    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> Result<(), String> {
        let Some(entry) = self.shaders.get_mut(&shader) else {
            return Err(format!("unknown shader {}", shader.get()));
        };
        entry.source = source.to_string();
        match &self.compile_failure {
            Some((stage, log)) if *stage == entry.stage => Err(log.clone()),
            _ => Ok(()),
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.shaders.remove(&shader);
    }

    fn create_program(&mut self) -> Result<ProgramId, RenderError> {
        let id = ProgramId::new(self.next_handle());
        self.programs.insert(id, HeadlessProgram::default());
        Ok(id)
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        match self.programs.get_mut(&program) {
            Some(p) => p.attached.push(shader),
            None => self.record_error(format!("attach to unknown program {}", program.get())),
        }
    }

    fn detach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        if let Some(p) = self.programs.get_mut(&program) {
            p.attached.retain(|s| *s != shader);
        }
    }

    fn link_program(&mut self, program: ProgramId) -> Result<(), String> {
        if let Some(log) = &self.link_failure {
            return Err(log.clone());
        }
        let Some(p) = self.programs.get(&program) else {
            return Err(format!("unknown program {}", program.get()));
        };
        let mut names: Vec<String> = Vec::new();
        for shader in &p.attached {
            if let Some(s) = self.shaders.get(shader) {
                names.extend(declared_uniforms(&s.source).map(str::to_string));
            }
        }
        let Some(p) = self.programs.get_mut(&program) else {
            return Err(format!("unknown program {}", program.get()));
        };
        p.uniforms.clear();
        for name in names {
            let next = UniformLocation(p.uniforms.len() as u32);
            p.uniforms.entry(name).or_insert(next);
        }
        p.linked = true;
        Ok(())
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        if let Some(id) = program {
            if !self.programs.get(&id).is_some_and(|p| p.linked) {
                self.record_error(format!("use of unlinked program {}", id.get()));
                return;
            }
        }
        self.current_program = program;
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
        if self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.location_queries += 1;
        self.programs.get(&program)?.uniforms.get(name).copied()
    }

    fn uniform(&mut self, location: UniformLocation, value: UniformValue<'_>) {
        match self
            .current_program
            .and_then(|id| self.programs.get_mut(&id))
        {
            Some(p) => {
                p.values.insert(location, value.into());
            }
            None => self.record_error("uniform upload with no program in use".into()),
        }
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.clears.push(color);
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.viewport = Some([x, y, width, height]);
    }

    fn enable_alpha_blending(&mut self) {
        self.blending = true;
    }

    fn draw_indexed_triangles(&mut self, index_count: usize) {
        if self.bound_vertex_array.is_none() {
            self.record_error("draw with no vertex array bound".into());
        }
        let indices = match self.read_indices(index_count) {
            Some(indices) => indices,
            None => {
                self.record_error(format!(
                    "draw of {index_count} indices exceeds the bound element buffer"
                ));
                Vec::new()
            }
        };
        self.draw_calls.push(DrawCall {
            program: self.current_program,
            vertex_array: self.bound_vertex_array,
            index_count,
            indices,
            textures: self.units.clone(),
        });
    }

    fn enable_debug_output(&mut self) {
        self.debug_output = true;
    }
}
