use wgpu::util::DeviceExt;

/// Matches the fixed-size array in the Phong shaders.
pub const MAX_LIGHTS: usize = 8;

/// One Phong light. `position.w == 0` marks a directional light whose
/// `position.xyz` is the direction towards the light.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PhongLight {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl PhongLight {
    pub fn directional(
        direction: cgmath::Vector3<f32>,
        ambient: [f32; 3],
        diffuse: [f32; 3],
        specular: [f32; 3],
    ) -> Self {
        Self {
            position: [direction.x, direction.y, direction.z, 0.0],
            ambient: [ambient[0], ambient[1], ambient[2], 1.0],
            diffuse: [diffuse[0], diffuse[1], diffuse[2], 1.0],
            specular: [specular[0], specular[1], specular[2], 1.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    global_ambient: [f32; 4],
    // Only `x` is read; the rest pads to 16 bytes.
    count: [u32; 4],
    lights: [PhongLight; MAX_LIGHTS],
}

impl LightsUniform {
    pub fn new(global_ambient: [f32; 3], lights: &[PhongLight]) -> Self {
        if lights.len() > MAX_LIGHTS {
            log::warn!(
                "{} lights requested, only the first {} are used",
                lights.len(),
                MAX_LIGHTS
            );
        }
        let mut uniform = Self {
            global_ambient: [global_ambient[0], global_ambient[1], global_ambient[2], 1.0],
            count: [0; 4],
            lights: [bytemuck::Zeroable::zeroed(); MAX_LIGHTS],
        };
        for (slot, light) in uniform.lights.iter_mut().zip(lights) {
            *slot = *light;
        }
        uniform.count[0] = lights.len().min(MAX_LIGHTS) as u32;
        uniform
    }

    pub fn count(&self) -> u32 {
        self.count[0]
    }

    pub fn light(&self, index: usize) -> Option<&PhongLight> {
        self.lights[..self.count() as usize].get(index)
    }
}

/// Direction towards the sun for the light slider value `p`.
///
/// `p` sweeps the azimuth while `p / 6` slowly raises the elevation, so the
/// slider range 1..=8 goes from a low to a high sun.
pub fn sun_direction(p: f32) -> cgmath::Vector3<f32> {
    let elevation = p / 6.0;
    cgmath::Vector3::new(
        elevation.cos() * p.sin(),
        elevation.sin(),
        elevation.cos() * p.cos(),
    )
}

/// The demo's single white-ish sun.
pub fn sun(p: f32) -> PhongLight {
    PhongLight::directional(sun_direction(p), [0.0; 3], [0.7; 3], [0.3; 3])
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightsUniform,
    pub buffer: wgpu::Buffer,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, uniform: LightsUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self { uniform, buffer }
    }

    pub fn write_to_buffer(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
