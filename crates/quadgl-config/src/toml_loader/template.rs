//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# quadgl configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[renderer]
# max_quads = 10000          # 1-100000, quads per batch
# max_texture_units = 32     # 1-32, distinct textures per batch
# background = "#334b4b"
# debug_output = false       # forward OpenGL debug messages to the log
# blending = true

[viewport]
# width = 1024
# height = 768

[camera]
# projection = "orthographic"   # orthographic | perspective
# fov_degrees = 45.0            # perspective only, 1-179
# near = 0.1
# far = 10.0
# ortho_height = 2.0            # orthographic only
# position = [0.0, 0.0, 2.0]
# target = [0.0, 0.0, -1.0]

[logging]
# level = "INFO"                # DEBUG | INFO | WARNING | ERROR
"##
    .to_string()
}
