//! Compiled shader programs with cached uniform lookups.

use std::collections::HashMap;

use glam::Mat4;
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::gl::{
    BindScope, GraphicsApi, ProgramId, ShaderId, ShaderStage, UniformLocation, UniformValue,
};

/// A linked vertex + fragment program.
///
/// Uniform locations are resolved once per name, including names the
/// program does not expose, which are remembered as absent.
#[derive(Debug)]
pub struct ShaderProgram {
    id: ProgramId,
    locations: HashMap<String, Option<UniformLocation>>,
}

impl ShaderProgram {
    pub fn new<G: GraphicsApi>(
        gl: &mut G,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, RenderError> {
        let vertex = compile_stage(gl, ShaderStage::Vertex, vertex_source)?;
        let fragment = match compile_stage(gl, ShaderStage::Fragment, fragment_source) {
            Ok(shader) => shader,
            Err(e) => {
                gl.delete_shader(vertex);
                return Err(e);
            }
        };

        let id = match gl.create_program() {
            Ok(id) => id,
            Err(e) => {
                gl.delete_shader(vertex);
                gl.delete_shader(fragment);
                return Err(e);
            }
        };
        gl.attach_shader(id, vertex);
        gl.attach_shader(id, fragment);
        let linked = gl.link_program(id);
        for shader in [vertex, fragment] {
            gl.detach_shader(id, shader);
            gl.delete_shader(shader);
        }

        if let Err(log) = linked {
            gl.delete_program(id);
            return Err(RenderError::ShaderLink(log));
        }

        debug!(program = id.get(), "shader program linked");
        Ok(Self {
            id,
            locations: HashMap::new(),
        })
    }

    pub fn bind<G: GraphicsApi>(&self, gl: &mut G) {
        gl.use_program(Some(self.id));
    }

    pub fn unbind<G: GraphicsApi>(&self, gl: &mut G) {
        gl.use_program(None);
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Look up a uniform, consulting the driver only on first use of `name`.
    pub fn uniform_location<G: GraphicsApi>(
        &mut self,
        gl: &mut G,
        name: &str,
    ) -> Option<UniformLocation> {
        if let Some(location) = self.locations.get(name) {
            return *location;
        }
        let location = gl.uniform_location(self.id, name);
        if location.is_none() {
            warn!(uniform = name, program = self.id.get(), "uniform not found");
        }
        self.locations.insert(name.to_string(), location);
        location
    }

    /// Upload `value` to `name`. Names the program does not expose are
    /// skipped.
    pub fn set_uniform<G: GraphicsApi>(&mut self, gl: &mut G, name: &str, value: UniformValue<'_>) {
        let Some(location) = self.uniform_location(gl, name) else {
            return;
        };
        let mut scope = BindScope::new(gl);
        scope.program(self.id);
        scope.uniform(location, value);
    }

    pub fn set_uniform_1i<G: GraphicsApi>(&mut self, gl: &mut G, name: &str, value: i32) {
        self.set_uniform(gl, name, UniformValue::Int(value));
    }

    pub fn set_uniform_1iv<G: GraphicsApi>(&mut self, gl: &mut G, name: &str, values: &[i32]) {
        self.set_uniform(gl, name, UniformValue::IntArray(values));
    }

    pub fn set_uniform_1f<G: GraphicsApi>(&mut self, gl: &mut G, name: &str, value: f32) {
        self.set_uniform(gl, name, UniformValue::Float(value));
    }

    pub fn set_uniform_4f<G: GraphicsApi>(&mut self, gl: &mut G, name: &str, value: [f32; 4]) {
        self.set_uniform(gl, name, UniformValue::Vec4(value));
    }

    pub fn set_uniform_mat4<G: GraphicsApi>(&mut self, gl: &mut G, name: &str, value: &Mat4) {
        self.set_uniform(gl, name, UniformValue::Mat4(&value.to_cols_array()));
    }

    pub fn destroy<G: GraphicsApi>(self, gl: &mut G) {
        gl.delete_program(self.id);
    }
}

fn compile_stage<G: GraphicsApi>(
    gl: &mut G,
    stage: ShaderStage,
    source: &str,
) -> Result<ShaderId, RenderError> {
    let shader = gl.create_shader(stage)?;
    if let Err(log) = gl.compile_shader(shader, source) {
        gl.delete_shader(shader);
        return Err(RenderError::ShaderCompile { stage, log });
    }
    Ok(shader)
}
