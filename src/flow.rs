//! Application event loop.
//!
//! The loop follows this pattern:
//! 1. A fixed tick (20 ms by default) requests a redraw
//! 2. Window events feed the camera controller and the keyboard tweaks
//! 3. On redraw the camera and light uniforms are written
//! 4. The scene is drawn through [`render_frame`]: opaque objects, then glass
//! 5. The render time is read back, shown in the title and the frame presented
//!
//! Everything that can fail during start-up (adapter, device, textures, scene
//! population) stops the loop and is returned from [`run`].

use std::{iter, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::Window,
};

use crate::{
    config::DemoConfig,
    context::Context,
    render::{WgpuTarget, render_frame},
    scene::{Scene, gpu::GpuScene},
    timing::RenderTimer,
    tweaks::{TweakAction, Tweaks},
};

/// Everything that exists once the window is up.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    gpu: GpuScene,
    scene: Scene,
    tweaks: Tweaks,
    timer: RenderTimer,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &DemoConfig) -> anyhow::Result<Self> {
        let tweaks = Tweaks::default();
        let ctx = Context::new(window, config, tweaks.light_pos).await?;
        let (gpu, scene) =
            GpuScene::load(&ctx.device, &ctx.queue, ctx.color_format(), &ctx.layouts, config).await?;
        let timer = RenderTimer::new(&ctx.device, &ctx.queue);
        Ok(Self {
            ctx,
            gpu,
            scene,
            tweaks,
            timer,
            is_surface_configured: true,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.resize(width, height);
            self.is_surface_configured = true;
        } else {
            // Minimised: nothing to draw into until the next real size.
            self.is_surface_configured = false;
        }
    }

    fn reload_shaders(&mut self, async_runtime: &tokio::runtime::Runtime) {
        let format = self.ctx.color_format();
        async_runtime.block_on(self.gpu.programs.reload(&self.ctx.device, format, &self.ctx.layouts));
    }

    fn render(
        &mut self,
        async_runtime: &tokio::runtime::Runtime,
        config: &DemoConfig,
    ) -> Result<(), FrameError> {
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        self.ctx.update_uniforms(self.tweaks.light_pos);

        let mut reconfigure = false;
        let output = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(texture) => texture,
            wgpu::CurrentSurfaceTexture::Suboptimal(texture) => {
                reconfigure = true;
                texture
            }
            // Nothing to draw into right now, the next tick tries again
            wgpu::CurrentSurfaceTexture::Timeout | wgpu::CurrentSurfaceTexture::Occluded => {
                return Ok(());
            }
            wgpu::CurrentSurfaceTexture::Outdated | wgpu::CurrentSurfaceTexture::Lost => {
                return Err(FrameError::Reconfigure);
            }
            wgpu::CurrentSurfaceTexture::Validation => return Err(FrameError::Validation),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.timer.begin();
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(config.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: self.timer.timestamp_writes(),
                multiview_mask: None,
            });

            let mut target = WgpuTarget::new(&mut render_pass, &self.gpu, &self.ctx.frame_bind_group);
            render_frame(&self.scene, &self.gpu.programs, &mut target);
        }
        self.timer.resolve(&mut encoder);
        self.ctx.queue.submit(iter::once(encoder.finish()));

        match async_runtime.block_on(self.timer.finish(&self.ctx.device)) {
            Ok(ms) => self.tweaks.render_time_ms = ms,
            Err(e) => log::warn!("Could not measure the render time: {:#}", e),
        }

        output.present();
        self.ctx
            .window
            .set_title(&self.tweaks.window_title(&config.title));
        if reconfigure {
            return Err(FrameError::Reconfigure);
        }
        Ok(())
    }
}

/// Why a redraw did not go through cleanly.
#[derive(Debug, thiserror::Error)]
enum FrameError {
    #[error("the surface no longer matches the window")]
    Reconfigure,
    #[error("acquiring the surface texture failed validation")]
    Validation,
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: DemoConfig,
    state: Option<AppState>,
    /// Set when start-up failed; returned from [`run`].
    startup_error: Option<anyhow::Error>,
    next_tick: Instant,
}

impl App {
    fn new(config: DemoConfig) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            config,
            state: None,
            startup_error: None,
            next_tick: Instant::now(),
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let window_attributes = Window::default_attributes().with_title(self.config.title.clone());
        let window = Arc::new(event_loop.create_window(window_attributes)?);
        self.async_runtime
            .block_on(AppState::new(window, &self.config))
    }
}

impl ApplicationHandler<()> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(state) => {
                log::info!("Scene ready: {} objects", state.scene.objects.len());
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("Start-up failed: {:#}", e);
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &self.state else {
            return;
        };
        let now = Instant::now();
        if now >= self.next_tick {
            // winit coalesces redraw requests, a slow frame never queues more
            state.ctx.window.request_redraw();
            self.next_tick = now + self.config.tick;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        let camera = &mut state.ctx.camera;
        camera.controller.handle_window_events(&mut camera.camera, &event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match state.tweaks.handle_key(physical_key) {
                Some(TweakAction::Exit) => event_loop.exit(),
                Some(TweakAction::ReloadShaders) => state.reload_shaders(&self.async_runtime),
                Some(TweakAction::Changed) => {
                    log::debug!("Light position {:.2}", state.tweaks.light_pos)
                }
                None => (),
            },
            WindowEvent::RedrawRequested => {
                match state.render(&self.async_runtime, &self.config) {
                    Ok(()) => (),
                    // Reconfigure the surface if it's lost, outdated or suboptimal
                    Err(FrameError::Reconfigure) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Runs the demo with its default configuration until the window closes.
pub fn run() -> anyhow::Result<()> {
    run_with(DemoConfig::default())
}

pub fn run_with(config: DemoConfig) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
