//! Batched textured quad rendering.
//!
//! Quads are transformed on the CPU into one shared vertex buffer; each
//! vertex carries the slot of its texture, and the fragment shader picks
//! from a sampler array, so a whole frame of quads with up to
//! `max_texture_units` distinct textures is one draw call.

mod batch;
mod pipeline;
mod types;

pub use batch::{BatchData, BatchState, QuadBatch};
pub use types::{
    quad_layout, BatchLimits, FrameStats, QuadVertex, INDICES_PER_QUAD, VERTICES_PER_QUAD,
};

#[cfg(test)]
mod tests;
