use crate::{
    data_structures::{
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::{Layouts, RasterState, mk_render_pipeline},
};

/// Depth-written, back-face culled, no blending.
pub const OPAQUE: RasterState = RasterState {
    blend: wgpu::BlendState::REPLACE,
    depth_write: true,
    topology: wgpu::PrimitiveTopology::TriangleList,
    cull_mode: Some(wgpu::Face::Back),
};

pub fn mk_opaque_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    layouts: &Layouts,
    shader: &wgpu::ShaderModule,
    label: &str,
) -> wgpu::RenderPipeline {
    mk_render_pipeline(
        device,
        &layouts.pipeline,
        color_format,
        Texture::DEPTH_FORMAT,
        &[ModelVertex::desc()],
        shader,
        OPAQUE,
        label,
    )
}
