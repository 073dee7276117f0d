use std::sync::Arc;

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{self, CameraResources, CameraUniform, Projection},
    config::DemoConfig,
    data_structures::texture,
    pipelines::{
        Layouts,
        light::{LightResources, LightsUniform, sun},
    },
};

/// Device, surface and the per-frame uniforms (camera and lights) shared by
/// every pipeline at bind group 0.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub layouts: Layouts,
    pub camera: CameraResources,
    pub projection: Projection,
    pub lights: LightResources,
    pub frame_bind_group: wgpu::BindGroup,
}

impl Context {
    pub async fn new(window: Arc<Window>, demo: &DemoConfig, light_pos: f32) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("could not create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable graphics adapter")?;

        // Timestamps are optional: the render timer falls back to CPU time.
        let required_features = adapter.features() & wgpu::Features::TIMESTAMP_QUERY;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features,
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                ..Default::default()
            })
            .await
            .context("could not open the graphics device")?;

        // Errors outside an error scope are logged instead of aborting
        device.on_uncaptured_error(Arc::new(|error| {
            log::error!("An error has been reported by wgpu!");
            log::error!("{error}");
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders output linear colour, so prefer an sRGB surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let layouts = Layouts::new(&device);

        let cam = &demo.camera;
        let camera = camera::Camera::new(
            cam.center.into(),
            cam.angle_direction,
            cam.angle_elevation,
            cam.distance,
        );
        let projection = camera::Projection::new(
            config.width,
            config.height,
            cgmath::Deg(cam.fovy_degrees),
            cam.znear,
            cam.zfar,
        );
        let controller = camera::CameraController::new(cam.rotate_speed, cam.zoom_speed);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera = CameraResources {
            camera,
            controller,
            uniform: camera_uniform,
            buffer: camera_buffer,
        };

        let lights = LightResources::new(&device, LightsUniform::new([0.0; 3], &[sun(light_pos)]));

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layouts.frame,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights.buffer.as_entire_binding(),
                },
            ],
            label: Some("frame_bind_group"),
        });

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            layouts,
            camera,
            projection,
            lights,
            frame_bind_group,
        })
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.projection.resize(width, height);
        self.depth_texture =
            texture::Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
    }

    /// Writes camera and light uniforms for the coming frame.
    pub fn update_uniforms(&mut self, light_pos: f32) {
        self.camera
            .uniform
            .update_view_proj(&self.camera.camera, &self.projection);
        self.queue.write_buffer(
            &self.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.camera.uniform]),
        );
        self.lights.uniform = LightsUniform::new([0.0; 3], &[sun(light_pos)]);
        self.lights.write_to_buffer(&self.queue);
    }
}
