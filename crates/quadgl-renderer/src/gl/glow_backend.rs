use std::marker::PhantomData;

use glow::HasContext;
use tracing::{debug, error, info, warn};

use super::{
    BufferId, BufferTarget, BufferUsage, DataType, GraphicsApi, ProgramId, ShaderId, ShaderStage,
    TextureFilter, TextureId, TextureSampling, TextureWrap, UniformLocation, UniformValue,
    VertexArrayId, VertexAttrib,
};
use crate::error::RenderError;

/// [`GraphicsApi`] implementation over a live OpenGL context.
pub struct GlowBackend {
    gl: glow::Context,
    // A GL context is bound to the thread it was made current on.
    _not_send: PhantomData<*const ()>,
}

impl GlowBackend {
    /// Wrap a loaded OpenGL context.
    ///
    /// # Safety
    ///
    /// `gl` must have been loaded from a context that is current on the
    /// calling thread and stays current for as long as the backend is used.
    pub unsafe fn new(gl: glow::Context) -> Self {
        let version = gl.get_parameter_string(glow::VERSION);
        let renderer = gl.get_parameter_string(glow::RENDERER);
        info!(%version, %renderer, "OpenGL context ready");
        Self {
            gl,
            _not_send: PhantomData,
        }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    /// Number of texture image units available to fragment shaders.
    pub fn max_texture_image_units(&self) -> u32 {
        let units = unsafe { self.gl.get_parameter_i32(glow::MAX_TEXTURE_IMAGE_UNITS) };
        units.max(0) as u32
    }
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn buffer_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Static => glow::STATIC_DRAW,
        BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
        BufferUsage::Stream => glow::STREAM_DRAW,
    }
}

fn data_type(data_type: DataType) -> u32 {
    match data_type {
        DataType::Float => glow::FLOAT,
        DataType::Int => glow::INT,
        DataType::UnsignedInt => glow::UNSIGNED_INT,
        DataType::Short => glow::SHORT,
        DataType::UnsignedShort => glow::UNSIGNED_SHORT,
        DataType::Byte => glow::BYTE,
        DataType::UnsignedByte => glow::UNSIGNED_BYTE,
    }
}

fn shader_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn filter(filter: TextureFilter) -> i32 {
    match filter {
        TextureFilter::Linear => glow::LINEAR as i32,
        TextureFilter::Nearest => glow::NEAREST as i32,
    }
}

fn wrap(wrap: TextureWrap) -> i32 {
    match wrap {
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE as i32,
        TextureWrap::Repeat => glow::REPEAT as i32,
    }
}

fn log_debug_message(source: u32, kind: u32, id: u32, severity: u32, message: &str) {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => error!(source, kind, id, "GL: {message}"),
        glow::DEBUG_SEVERITY_MEDIUM => warn!(source, kind, id, "GL: {message}"),
        glow::DEBUG_SEVERITY_LOW => info!(source, kind, id, "GL: {message}"),
        _ => debug!(source, kind, id, "GL: {message}"),
    }
}

impl GraphicsApi for GlowBackend {
    fn create_buffer(&mut self) -> Result<BufferId, RenderError> {
        let buffer = unsafe { self.gl.create_buffer() }.map_err(RenderError::Backend)?;
        Ok(BufferId::new(buffer.0))
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        let buffer = buffer.map(|b| glow::NativeBuffer(b.raw()));
        unsafe { self.gl.bind_buffer(buffer_target(target), buffer) };
    }

    fn buffer_storage(&mut self, target: BufferTarget, size: usize, usage: BufferUsage) {
        unsafe {
            self.gl
                .buffer_data_size(buffer_target(target), size as i32, buffer_usage(usage))
        };
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_sub_data_u8_slice(buffer_target(target), offset as i32, data)
        };
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        unsafe { self.gl.delete_buffer(glow::NativeBuffer(buffer.raw())) };
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, RenderError> {
        let vao = unsafe { self.gl.create_vertex_array() }.map_err(RenderError::Backend)?;
        Ok(VertexArrayId::new(vao.0))
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) {
        let vao = vertex_array.map(|v| glow::NativeVertexArray(v.raw()));
        unsafe { self.gl.bind_vertex_array(vao) };
    }

    fn vertex_attrib_pointer(&mut self, attrib: VertexAttrib) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                attrib.index,
                attrib.count as i32,
                data_type(attrib.data_type),
                attrib.normalized,
                attrib.stride as i32,
                attrib.offset as i32,
            )
        };
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) };
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        unsafe {
            self.gl
                .delete_vertex_array(glow::NativeVertexArray(vertex_array.raw()))
        };
    }

    fn create_texture(&mut self) -> Result<TextureId, RenderError> {
        let texture = unsafe { self.gl.create_texture() }.map_err(RenderError::Backend)?;
        Ok(TextureId::new(texture.0))
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        let texture = texture.map(|t| glow::NativeTexture(t.raw()));
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) };
    }

    fn texture_sampling(&mut self, sampling: TextureSampling) {
        unsafe {
            let gl = &self.gl;
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                filter(sampling.min_filter),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                filter(sampling.mag_filter),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap(sampling.wrap));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap(sampling.wrap));
        }
    }

    fn texture_image_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(pixels),
            )
        };
    }

    fn generate_mipmap(&mut self) {
        unsafe { self.gl.generate_mipmap(glow::TEXTURE_2D) };
    }

    fn delete_texture(&mut self, texture: TextureId) {
        unsafe { self.gl.delete_texture(glow::NativeTexture(texture.raw())) };
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId, RenderError> {
        let shader =
            unsafe { self.gl.create_shader(shader_type(stage)) }.map_err(RenderError::Backend)?;
        Ok(ShaderId::new(shader.0))
    }

    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> Result<(), String> {
        let shader = glow::NativeShader(shader.raw());
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if self.gl.get_shader_compile_status(shader) {
                Ok(())
            } else {
                Err(self.gl.get_shader_info_log(shader))
            }
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        unsafe { self.gl.delete_shader(glow::NativeShader(shader.raw())) };
    }

    fn create_program(&mut self) -> Result<ProgramId, RenderError> {
        let program = unsafe { self.gl.create_program() }.map_err(RenderError::Backend)?;
        Ok(ProgramId::new(program.0))
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        unsafe {
            self.gl.attach_shader(
                glow::NativeProgram(program.raw()),
                glow::NativeShader(shader.raw()),
            )
        };
    }

    fn detach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        unsafe {
            self.gl.detach_shader(
                glow::NativeProgram(program.raw()),
                glow::NativeShader(shader.raw()),
            )
        };
    }

    fn link_program(&mut self, program: ProgramId) -> Result<(), String> {
        let program = glow::NativeProgram(program.raw());
        unsafe {
            self.gl.link_program(program);
            if self.gl.get_program_link_status(program) {
                Ok(())
            } else {
                Err(self.gl.get_program_info_log(program))
            }
        }
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        let program = program.map(|p| glow::NativeProgram(p.raw()));
        unsafe { self.gl.use_program(program) };
    }

    fn delete_program(&mut self, program: ProgramId) {
        unsafe { self.gl.delete_program(glow::NativeProgram(program.raw())) };
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        unsafe {
            self.gl
                .get_uniform_location(glow::NativeProgram(program.raw()), name)
        }
        .map(|location| UniformLocation(location.0))
    }

    fn uniform(&mut self, location: UniformLocation, value: UniformValue<'_>) {
        let location = glow::NativeUniformLocation(location.0);
        let location = Some(&location);
        unsafe {
            match value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, v),
                UniformValue::IntArray(v) => self.gl.uniform_1_i32_slice(location, v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, v),
                UniformValue::Vec4([x, y, z, w]) => self.gl.uniform_4_f32(location, x, y, z, w),
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(location, false, m),
            }
        }
    }

    fn clear(&mut self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) };
    }

    fn enable_alpha_blending(&mut self) {
        unsafe {
            self.gl.enable(glow::BLEND);
            self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        }
    }

    fn draw_indexed_triangles(&mut self, index_count: usize) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0)
        };
    }

    fn enable_debug_output(&mut self) {
        if !self.gl.supports_debug() {
            warn!("GL debug output requested but not supported by this context");
            return;
        }
        unsafe {
            self.gl.enable(glow::DEBUG_OUTPUT);
            self.gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
            self.gl.debug_message_callback(log_debug_message);
        }
        debug!("GL debug output enabled");
    }
}
