//! Render pipelines and the bind group layouts they share.
//!
//! All pipelines use the same four bind groups so that switching between the
//! textured, untextured and glass pipelines keeps every binding valid:
//!
//! | group | contents                                 |
//! |-------|------------------------------------------|
//! | 0     | camera (binding 0) and lights (binding 1)|
//! | 1     | material                                 |
//! | 2     | model transform                          |
//! | 3     | diffuse texture and sampler              |

pub mod basic;
pub mod light;
pub mod phong;
pub mod transparent;

/// The kind of resource a layout slot accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    Uniform,
    Texture,
    Sampler,
}

/// Every slot of [`Layouts`] as `(group, binding, kind)`. Shaders may use a
/// subset; anything else does not fit the pipeline layout.
pub const LAYOUT_SLOTS: [(u32, u32, SlotKind); 6] = [
    (0, 0, SlotKind::Uniform),
    (0, 1, SlotKind::Uniform),
    (1, 0, SlotKind::Uniform),
    (2, 0, SlotKind::Uniform),
    (3, 0, SlotKind::Texture),
    (3, 1, SlotKind::Sampler),
];

pub fn layout_slot(group: u32, binding: u32) -> Option<SlotKind> {
    LAYOUT_SLOTS
        .iter()
        .find(|(g, b, _)| *g == group && *b == binding)
        .map(|(_, _, kind)| *kind)
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

#[derive(Debug)]
pub struct Layouts {
    pub frame: wgpu::BindGroupLayout,
    pub material: wgpu::BindGroupLayout,
    pub object: wgpu::BindGroupLayout,
    pub texture: wgpu::BindGroupLayout,
    pub pipeline: wgpu::PipelineLayout,
}

impl Layouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_entry(0), uniform_entry(1)],
            label: Some("frame_bind_group_layout"),
        });
        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_entry(0)],
            label: Some("material_bind_group_layout"),
        });
        let object = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_entry(0)],
            label: Some("object_bind_group_layout"),
        });
        let texture = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("texture_bind_group_layout"),
        });
        let pipeline = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Phong Pipeline Layout"),
            bind_group_layouts: &[Some(&frame), Some(&material), Some(&object), Some(&texture)],
            immediate_size: 0,
        });
        Self {
            frame,
            material,
            object,
            texture,
            pipeline,
        }
    }

    pub fn texture_bind_group(
        &self,
        device: &wgpu::Device,
        texture: &crate::data_structures::texture::Texture,
        label: &str,
    ) -> wgpu::BindGroup {
        let fallback;
        let sampler = match &texture.sampler {
            Some(sampler) => sampler,
            None => {
                fallback = crate::data_structures::texture::create_repeat_sampler(device);
                &fallback
            }
        };
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.texture,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some(label),
        })
    }
}

/// The fixed-function choices that differ between opaque and glass drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterState {
    pub blend: wgpu::BlendState,
    pub depth_write: bool,
    pub topology: wgpu::PrimitiveTopology,
    pub cull_mode: Option<wgpu::Face>,
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: &wgpu::ShaderModule,
    state: RasterState,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(state.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: state.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: state.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: depth_format,
            depth_write_enabled: Some(state.depth_write),
            depth_compare: Some(wgpu::CompareFunction::Less),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}
