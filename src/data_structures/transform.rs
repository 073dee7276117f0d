//! Per-object model transforms.
//!
//! Each object owns one small uniform buffer holding its model matrix and the
//! matrix used to bring normals into world space.

use cgmath::{Matrix, Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

/**
 * The raw transform is the actual data stored on the GPU.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn new(model: Matrix4<f32>) -> Self {
        // Inverse-transpose keeps normals perpendicular under non-uniform
        // scale (the floor). Singular matrices fall back to the model matrix.
        let normal = model.invert().map(|m| m.transpose()).unwrap_or(model);
        Self {
            model: model.into(),
            normal: normal.into(),
        }
    }

    pub fn model(&self) -> Matrix4<f32> {
        self.model.into()
    }

    pub fn normal(&self) -> Matrix4<f32> {
        self.normal.into()
    }
}

/// A model transform living on the GPU, bound at group 2.
#[derive(Debug)]
pub struct GpuTransform {
    pub uniform: ModelUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl GpuTransform {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, model: Matrix4<f32>) -> Self {
        let uniform = ModelUniform::new(model);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("model_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Vector3, Vector4};

    use super::*;

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let uniform = ModelUniform::new(Matrix4::from_nonuniform_scale(10.0, 0.1, 10.0));
        let n = uniform.normal() * Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert!((n.y - 10.0).abs() < 1e-4);
        assert_eq!(n.x, 0.0);
        assert_eq!(n.z, 0.0);
    }

    #[test]
    fn translation_leaves_normals_untouched() {
        let uniform = ModelUniform::new(Matrix4::from_translation(Vector3::new(3.0, 4.0, 5.0)));
        // Only xyz reaches the shader; w picks up the inverse translation.
        let n = uniform.normal() * Vector4::new(0.0, 0.0, 1.0, 0.0);
        assert!(n.x.abs() < 1e-6);
        assert!(n.y.abs() < 1e-6);
        assert!((n.z - 1.0).abs() < 1e-6);
    }
}
