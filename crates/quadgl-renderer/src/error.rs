use std::path::PathBuf;

use crate::gl::ShaderStage;

/// Errors that can occur while creating GPU resources or drawing a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("graphics backend error: {0}")]
    Backend(String),

    #[error("failed to compile {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("failed to link shader program: {0}")]
    ShaderLink(String),

    #[error("failed to decode texture {}: {reason}", path.display())]
    TextureDecode { path: PathBuf, reason: String },

    #[error("texture slot {slot} is out of range [0, {max})")]
    TextureSlotOutOfRange { slot: u32, max: u32 },

    #[error("texture slot {0} is already in use")]
    TextureSlotInUse(u32),

    #[error("maximum texture count reached ({max} texture units per batch)")]
    TextureUnitsExhausted { max: u32 },

    #[error("maximum quad count reached ({max} quads per batch)")]
    QuadCapacityExceeded { max: usize },

    #[error("buffer upload of {requested} bytes exceeds capacity of {capacity} bytes")]
    BufferOverflow { requested: usize, capacity: usize },

    #[error("begin called while a frame is already in progress")]
    FrameAlreadyStarted,

    #[error("no frame in progress; call begin first")]
    FrameNotStarted,
}

impl RenderError {
    /// Whether the error is a per-batch capacity limit. The batch is left
    /// intact, so the caller can flush it and retry.
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            RenderError::TextureUnitsExhausted { .. } | RenderError::QuadCapacityExceeded { .. }
        )
    }
}

impl From<RenderError> for quadgl_common::QuadglError {
    fn from(e: RenderError) -> Self {
        quadgl_common::QuadglError::Renderer(e.to_string())
    }
}
