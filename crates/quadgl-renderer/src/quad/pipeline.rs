pub(crate) const QUAD_VERTEX_SHADER: &str = r#"#version 460 core

layout (location = 0) in vec4 position;
layout (location = 1) in vec2 texCoord;
layout (location = 2) in float texIndex;

uniform mat4 vp;

out vec2 vTexCoord;
flat out float vTexIndex;

void main() {
    gl_Position = vp * position;
    vTexCoord = texCoord;
    vTexIndex = texIndex;
}
"#;

pub(crate) const QUAD_FRAGMENT_SHADER: &str = r#"#version 460 core

in vec2 vTexCoord;
flat in float vTexIndex;

uniform sampler2D tex[32];

out vec4 fragColor;

void main() {
    fragColor = texture(tex[int(vTexIndex)], vTexCoord);
}
"#;

/// Sampler array uniform in the fragment shader.
pub(crate) const SAMPLER_UNIFORM: &str = "tex";
/// View-projection uniform in the vertex shader.
pub(crate) const VIEW_PROJECTION_UNIFORM: &str = "vp";
