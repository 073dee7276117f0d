use crate::{
    data_structures::{
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::{Layouts, RasterState, mk_render_pipeline},
};

/**
 * Source-over alpha blending against the already resolved opaque depth.
 *
 * Depth is still tested but not written, so the pane never hides what is
 * drawn behind it later. The pane is a bare quad seen from both sides,
 * hence no culling, and it is submitted as a triangle strip.
 */
pub const GLASS: RasterState = RasterState {
    blend: wgpu::BlendState::ALPHA_BLENDING,
    depth_write: false,
    topology: wgpu::PrimitiveTopology::TriangleStrip,
    cull_mode: None,
};

pub fn mk_glass_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    layouts: &Layouts,
    shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    mk_render_pipeline(
        device,
        &layouts.pipeline,
        color_format,
        Texture::DEPTH_FORMAT,
        &[ModelVertex::desc()],
        shader,
        GLASS,
        "Glass Pipeline",
    )
}
