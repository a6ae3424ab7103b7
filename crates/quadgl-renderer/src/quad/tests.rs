use std::num::NonZeroU32;

use glam::{Mat4, Vec3};

use super::pipeline::{SAMPLER_UNIFORM, VIEW_PROJECTION_UNIFORM};
use super::types::*;
use super::*;
use crate::error::RenderError;
use crate::gl::{HeadlessBackend, RecordedUniform, TextureId};
use crate::texture::{Texture, TextureHandle, TextureImage, TextureSlot};

fn handle(id: u32, slot: u32) -> TextureHandle {
    TextureHandle {
        id: TextureId::new(NonZeroU32::new(id).unwrap()),
        slot: TextureSlot::new(slot),
    }
}

fn texture(gl: &mut HeadlessBackend, slot: u32) -> Texture {
    let image = TextureImage::solid(2, 2, [255, 255, 255, 255]);
    Texture::new(gl, &image, TextureSlot::new(slot)).unwrap()
}

fn limits(max_quads: usize, max_texture_units: u32) -> BatchLimits {
    BatchLimits {
        max_quads,
        max_texture_units,
    }
}

// ---------------------------------------------------------------------------
// Vertex format
// ---------------------------------------------------------------------------

#[test]
fn quad_vertex_size() {
    assert_eq!(std::mem::size_of::<QuadVertex>(), 28); // 7 floats * 4 bytes
    assert_eq!(quad_layout().stride(), std::mem::size_of::<QuadVertex>());
}

#[test]
fn quad_indices_form_two_triangles() {
    assert_eq!(QUAD_INDICES, [0, 1, 2, 2, 3, 0]);
}

#[test]
fn default_limits() {
    let l = BatchLimits::default();
    assert_eq!(l.max_quads, 10_000);
    assert_eq!(l.max_texture_units, 32);
    assert_eq!(l.max_vertices(), 40_000);
    assert_eq!(l.max_indices(), 60_000);
}

// ---------------------------------------------------------------------------
// BatchData
// ---------------------------------------------------------------------------

#[test]
fn identity_transform_gives_unit_corners() {
    let mut data = BatchData::new(BatchLimits::default());
    data.push_textured(&Mat4::IDENTITY, handle(1, 0)).unwrap();

    let positions: Vec<[f32; 4]> = data.vertices().iter().map(|v| v.position).collect();
    assert_eq!(
        positions,
        vec![
            [-0.5, 0.5, 0.0, 1.0],
            [-0.5, -0.5, 0.0, 1.0],
            [0.5, -0.5, 0.0, 1.0],
            [0.5, 0.5, 0.0, 1.0],
        ]
    );
    let coords: Vec<[f32; 2]> = data.vertices().iter().map(|v| v.tex_coord).collect();
    assert_eq!(coords, vec![[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
}

#[test]
fn transform_is_applied_per_corner() {
    let mut data = BatchData::new(BatchLimits::default());
    let transform =
        Mat4::from_translation(Vec3::new(3.0, -1.0, 0.5)) * Mat4::from_scale(Vec3::splat(2.0));
    data.push_textured(&transform, handle(1, 4)).unwrap();

    let first = data.vertices()[0];
    assert_eq!(first.position, [2.0, 0.0, 0.5, 1.0]);
    assert!(data.vertices().iter().all(|v| v.tex_index == 4.0));
}

#[test]
fn kth_quad_indices_are_offset() {
    let mut data = BatchData::new(BatchLimits::default());
    for _ in 0..3 {
        data.push_textured(&Mat4::IDENTITY, handle(1, 0)).unwrap();
    }
    data.clear();
    for _ in 0..4 {
        data.push_textured(&Mat4::IDENTITY, handle(1, 0)).unwrap();
    }
    for (k, quad) in data.indices().chunks(6).enumerate() {
        let b = 4 * k as u32;
        assert_eq!(quad, [b, b + 1, b + 2, b + 2, b + 3, b]);
    }
}

#[test]
fn readding_a_slot_does_not_grow_texture_set() {
    let mut data = BatchData::new(limits(10, 2));
    data.push_textured(&Mat4::IDENTITY, handle(1, 0)).unwrap();
    data.push_textured(&Mat4::IDENTITY, handle(1, 0)).unwrap();
    data.push_textured(&Mat4::IDENTITY, handle(2, 1)).unwrap();
    data.push_textured(&Mat4::IDENTITY, handle(2, 1)).unwrap();
    assert_eq!(data.texture_count(), 2);
    assert_eq!(data.quad_count(), 4);
}

#[test]
fn extra_texture_fails_and_leaves_data_untouched() {
    let mut data = BatchData::new(limits(10, 2));
    data.push_textured(&Mat4::IDENTITY, handle(1, 0)).unwrap();
    data.push_textured(&Mat4::IDENTITY, handle(2, 1)).unwrap();
    let before_vertices = data.vertices().to_vec();
    let before_indices = data.indices().to_vec();

    let err = data
        .push_textured(&Mat4::IDENTITY, handle(3, 2))
        .unwrap_err();
    assert!(matches!(err, RenderError::TextureUnitsExhausted { max: 2 }));
    assert!(err.is_capacity());
    assert_eq!(data.vertices(), before_vertices.as_slice());
    assert_eq!(data.indices(), before_indices.as_slice());
    assert_eq!(data.texture_count(), 2);
}

#[test]
fn quad_capacity_is_enforced() {
    let mut data = BatchData::new(limits(1, 4));
    data.push_textured(&Mat4::IDENTITY, handle(1, 0)).unwrap();
    let err = data
        .push_textured(&Mat4::IDENTITY, handle(2, 1))
        .unwrap_err();
    assert!(matches!(err, RenderError::QuadCapacityExceeded { max: 1 }));
    assert_eq!(data.quad_count(), 1);
    assert_eq!(data.texture_count(), 1);
}

#[test]
fn slot_outside_wired_samplers_is_rejected() {
    let mut data = BatchData::new(limits(10, 4));
    let err = data
        .push_textured(&Mat4::IDENTITY, handle(1, 4))
        .unwrap_err();
    assert!(matches!(
        err,
        RenderError::TextureSlotOutOfRange { slot: 4, max: 4 }
    ));
    assert!(data.is_empty());
}

// ---------------------------------------------------------------------------
// QuadBatch
// ---------------------------------------------------------------------------

#[test]
fn init_wires_sampler_array() {
    let mut gl = HeadlessBackend::new();
    let batch = QuadBatch::init(&mut gl, limits(4, 3)).unwrap();
    assert_eq!(
        gl.uniform_value(batch.shader().id(), SAMPLER_UNIFORM),
        Some(&RecordedUniform::IntArray(vec![0, 1, 2]))
    );
    assert_eq!(
        gl.element_buffer_of(batch.vertex_array().id()),
        Some(batch.index_buffer().id())
    );
    assert_eq!(batch.vertex_array().attribute_count(), 3);
    assert_eq!(batch.vertex_buffer().capacity(), 4 * 4 * 28);
    assert_eq!(batch.index_buffer().capacity(), 24);
    assert_eq!(batch.state(), BatchState::Idle);
    assert!(gl.errors().is_empty());
}

#[test]
fn init_failure_releases_partial_resources() {
    let mut gl = HeadlessBackend::new();
    gl.fail_vertex_arrays("out of vertex arrays");
    let err = QuadBatch::init(&mut gl, limits(4, 2)).unwrap_err();
    assert!(matches!(err, RenderError::Backend(ref m) if m == "out of vertex arrays"));
    assert_eq!(gl.live_buffers(), 0);
    assert_eq!(gl.live_programs(), 0);
    assert_eq!(gl.live_shaders(), 0);
}

#[test]
fn init_clamps_texture_units_to_sampler_array() {
    let mut gl = HeadlessBackend::new();
    let batch = QuadBatch::init(&mut gl, limits(4, 64)).unwrap();
    assert_eq!(batch.limits().max_texture_units, 32);
}

#[test]
fn begin_uploads_view_projection() {
    let mut gl = HeadlessBackend::new();
    let mut batch = QuadBatch::init(&mut gl, limits(4, 2)).unwrap();
    let vp = Mat4::orthographic_rh_gl(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0);
    batch.begin(&mut gl, &vp).unwrap();
    assert_eq!(
        gl.uniform_value(batch.shader().id(), VIEW_PROJECTION_UNIFORM),
        Some(&RecordedUniform::Mat4(vp.to_cols_array()))
    );
    assert_eq!(batch.state(), BatchState::Accumulating);
}

#[test]
fn two_quads_two_textures_scenario() {
    let mut gl = HeadlessBackend::new();
    let a = texture(&mut gl, 0);
    let b = texture(&mut gl, 1);
    let c = texture(&mut gl, 2);
    let mut batch = QuadBatch::init(&mut gl, limits(2, 2)).unwrap();

    batch.begin(&mut gl, &Mat4::IDENTITY).unwrap();
    batch.add_textured(&Mat4::IDENTITY, &a).unwrap();
    batch
        .add_textured(&Mat4::from_translation(Vec3::X), &b)
        .unwrap();

    assert_eq!(batch.data().vertices().len(), 8);
    assert_eq!(batch.data().indices().len(), 12);

    let err = batch
        .add_textured(&Mat4::from_translation(Vec3::Y), &c)
        .unwrap_err();
    assert!(err.is_capacity());
    assert_eq!(batch.data().vertices().len(), 8);
    assert_eq!(batch.data().indices().len(), 12);
    assert_eq!(batch.data().texture_count(), 2);

    let stats = batch.end(&mut gl).unwrap();
    assert_eq!(
        batch.vertex_buffer().len(),
        8 * std::mem::size_of::<QuadVertex>()
    );
    assert_eq!(batch.index_buffer().count(), 12);
    assert_eq!(
        stats,
        FrameStats {
            quads: 2,
            vertices: 8,
            indices: 12,
            textures: 2,
            draw_calls: 1,
        }
    );

    let draws = gl.draw_calls();
    assert_eq!(draws.len(), 1);
    let draw = &draws[0];
    assert_eq!(draw.index_count, 12);
    assert_eq!(draw.indices, vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
    assert_eq!(draw.textures.len(), 2);
    assert_eq!(draw.textures.get(&0), Some(&a.id()));
    assert_eq!(draw.textures.get(&1), Some(&b.id()));
    assert_eq!(draw.program, Some(batch.shader().id()));
    assert_eq!(draw.vertex_array, Some(batch.vertex_array().id()));

    let bytes = gl.buffer_data(batch.vertex_buffer().id()).unwrap();
    let fifth: QuadVertex = bytemuck::pod_read_unaligned(&bytes[4 * 28..5 * 28]);
    assert_eq!(fifth.position, [0.5, 0.5, 0.0, 1.0]);
    assert_eq!(fifth.tex_index, 1.0);

    assert!(gl.bound_textures().is_empty());
    assert_eq!(gl.current_program(), None);
    assert_eq!(gl.bound_vertex_array(), None);
    assert!(gl.errors().is_empty());
}

#[test]
fn full_batch_rejects_extra_quad() {
    let mut gl = HeadlessBackend::new();
    let a = texture(&mut gl, 0);
    let mut batch = QuadBatch::init(&mut gl, limits(2, 2)).unwrap();
    batch.begin(&mut gl, &Mat4::IDENTITY).unwrap();
    batch.add_textured(&Mat4::IDENTITY, &a).unwrap();
    batch.add_textured(&Mat4::IDENTITY, &a).unwrap();
    let err = batch.add_textured(&Mat4::IDENTITY, &a).unwrap_err();
    assert!(matches!(err, RenderError::QuadCapacityExceeded { max: 2 }));
    assert_eq!(batch.end(&mut gl).unwrap().quads, 2);
}

#[test]
fn begin_resets_previous_frame() {
    let mut gl = HeadlessBackend::new();
    let a = texture(&mut gl, 0);
    let mut batch = QuadBatch::init(&mut gl, limits(10, 2)).unwrap();

    batch.begin(&mut gl, &Mat4::IDENTITY).unwrap();
    for _ in 0..5 {
        batch.add_textured(&Mat4::IDENTITY, &a).unwrap();
    }
    batch.end(&mut gl).unwrap();

    batch.begin(&mut gl, &Mat4::IDENTITY).unwrap();
    let stats = batch.end(&mut gl).unwrap();
    assert_eq!(batch.vertex_buffer().len(), 0);
    assert_eq!(batch.index_buffer().count(), 0);
    assert_eq!(stats.indices, 0);
    assert_eq!(stats.vertices, 0);
    assert_eq!(stats.textures, 0);

    let draws = gl.draw_calls();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].index_count, 30);
    assert_eq!(draws[1].index_count, 0);
    assert!(draws[1].textures.is_empty());
}

#[test]
fn misuse_is_rejected_without_side_effects() {
    let mut gl = HeadlessBackend::new();
    let a = texture(&mut gl, 0);
    let mut batch = QuadBatch::init(&mut gl, limits(4, 2)).unwrap();

    assert!(matches!(
        batch.add_textured(&Mat4::IDENTITY, &a),
        Err(RenderError::FrameNotStarted)
    ));
    assert!(matches!(
        batch.end(&mut gl),
        Err(RenderError::FrameNotStarted)
    ));

    batch.begin(&mut gl, &Mat4::IDENTITY).unwrap();
    batch.add_textured(&Mat4::IDENTITY, &a).unwrap();
    assert!(matches!(
        batch.begin(&mut gl, &Mat4::IDENTITY),
        Err(RenderError::FrameAlreadyStarted)
    ));
    assert_eq!(batch.data().quad_count(), 1);
    assert_eq!(batch.state(), BatchState::Accumulating);
    assert!(gl.draw_calls().is_empty());
}

#[test]
fn destroy_releases_gpu_objects() {
    let mut gl = HeadlessBackend::new();
    let batch = QuadBatch::init(&mut gl, limits(4, 2)).unwrap();
    batch.destroy(&mut gl);
    assert_eq!(gl.live_buffers(), 0);
    assert_eq!(gl.live_vertex_arrays(), 0);
    assert_eq!(gl.live_programs(), 0);
    assert_eq!(gl.live_shaders(), 0);
}
