//! Phong materials and their uniform buffers.

use wgpu::util::DeviceExt;

/// Surface parameters of the Phong model, CPU side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhongMaterial {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    pub alpha: f32,
}

impl PhongMaterial {
    /// Ambient and diffuse take `color`; specular is white when enabled and
    /// black otherwise.
    pub fn basic(color: [f32; 3], specular: bool, shininess: f32, alpha: f32) -> Self {
        Self {
            ambient: color,
            diffuse: color,
            specular: if specular { [1.0; 3] } else { [0.0; 3] },
            shininess,
            alpha,
        }
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        let [ar, ag, ab] = self.ambient;
        let [dr, dg, db] = self.diffuse;
        let [sr, sg, sb] = self.specular;
        MaterialUniform {
            ambient: [ar, ag, ab, 1.0],
            diffuse: [dr, dg, db, self.alpha],
            specular: [sr, sg, sb, self.shininess],
        }
    }
}

/// The material as the shaders see it: alpha rides in `diffuse.w`, shininess
/// in `specular.w`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

/// A material living on the GPU, bound at group 1.
#[derive(Debug)]
pub struct GpuMaterial {
    pub name: String,
    pub material: PhongMaterial,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl GpuMaterial {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        name: &str,
        material: PhongMaterial,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Material Buffer")),
            contents: bytemuck::cast_slice(&[material.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some(&format!("{name} material_bind_group")),
        });
        Self {
            name: name.to_string(),
            material,
            buffer,
            bind_group,
        }
    }
}
