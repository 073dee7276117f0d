//! Per-frame draw ordering.
//!
//! [`render_frame`] walks the opaque object list in insertion order and then
//! draws the glass pane in a separate transparent pass. It talks to the
//! graphics API only through [`DrawTarget`], so the ordering rules can be
//! exercised without a device; [`WgpuTarget`] is the implementation that
//! records into a `wgpu::RenderPass`.
//!
//! Objects are never sorted, neither by depth nor by material.

use wgpu::RenderPass;

use crate::scene::{
    GeometryId, MaterialId, ProgramStatus, Scene, ShadingKind, TextureId, TransformId,
    gpu::GpuScene,
};

/// The state-binding and draw calls the frame renderer issues.
pub trait DrawTarget {
    fn use_program(&mut self, kind: ShadingKind);
    fn bind_material(&mut self, material: MaterialId);
    fn bind_transform(&mut self, transform: TransformId);
    /// `None` binds the "no texture" sentinel.
    fn bind_texture(&mut self, texture: Option<TextureId>);
    fn draw(&mut self, geometry: GeometryId);
    /// Source-over alpha blending on, depth writes off, depth test kept.
    fn begin_transparent(&mut self);
    /// Back to opaque defaults.
    fn end_transparent(&mut self);
}

/// What happened during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub skipped: usize,
    pub glass_drawn: bool,
}

/// Issues one frame worth of draw calls: the opaque pass, then the glass.
pub fn render_frame(
    scene: &Scene,
    programs: &impl ProgramStatus,
    target: &mut impl DrawTarget,
) -> FrameStats {
    let mut stats = FrameStats::default();

    for object in &scene.objects {
        if !object.is_drawable(programs) {
            // Degraded frame while a program is broken, e.g. mid shader edit.
            stats.skipped += 1;
            continue;
        }
        target.use_program(object.shading);
        if let Some(material) = object.material {
            target.bind_material(material);
        }
        if let Some(transform) = object.transform {
            target.bind_transform(transform);
        }
        target.bind_texture(object.texture);
        if let Some(geometry) = object.geometry {
            target.draw(geometry);
            stats.drawn += 1;
        }
    }

    if programs.is_ready(ShadingKind::Untextured) {
        let glass = &scene.glass;
        target.begin_transparent();
        target.bind_material(glass.material);
        target.bind_transform(glass.transform);
        target.bind_texture(None);
        target.use_program(ShadingKind::Untextured);
        target.draw(glass.geometry);
        target.end_transparent();
        stats.glass_drawn = true;
    }

    log::trace!(
        "Frame: {} drawn, {} skipped, glass {}",
        stats.drawn,
        stats.skipped,
        stats.glass_drawn
    );
    stats
}

/// Records [`DrawTarget`] calls into a render pass.
///
/// Blend and depth-write state live in the pipelines, so the transparent pass
/// is a switch of pipeline selection rather than a state toggle. Defaults for
/// every bind group are set up front: a draw never sees an empty slot, even if
/// an object lacks a material or transform.
pub struct WgpuTarget<'a, 'pass> {
    pass: &'a mut RenderPass<'pass>,
    gpu: &'a GpuScene,
    transparent: bool,
}

impl<'a, 'pass> WgpuTarget<'a, 'pass> {
    pub fn new(
        pass: &'a mut RenderPass<'pass>,
        gpu: &'a GpuScene,
        frame_bind_group: &wgpu::BindGroup,
    ) -> Self {
        pass.set_bind_group(0, frame_bind_group, &[]);
        pass.set_bind_group(1, &gpu.default_material().bind_group, &[]);
        pass.set_bind_group(2, &gpu.default_transform().bind_group, &[]);
        pass.set_bind_group(3, &gpu.sentinel_texture, &[]);
        Self {
            pass,
            gpu,
            transparent: false,
        }
    }
}

impl DrawTarget for WgpuTarget<'_, '_> {
    fn use_program(&mut self, kind: ShadingKind) {
        let pipeline = if self.transparent {
            self.gpu.programs.transparent(kind)
        } else {
            self.gpu.programs.opaque(kind)
        };
        match pipeline {
            Some(pipeline) => self.pass.set_pipeline(pipeline),
            None => log::warn!("No {:?} pipeline for this pass", kind),
        }
    }

    fn bind_material(&mut self, material: MaterialId) {
        if let Some(material) = self.gpu.materials.get(material.0) {
            self.pass.set_bind_group(1, &material.bind_group, &[]);
        }
    }

    fn bind_transform(&mut self, transform: TransformId) {
        if let Some(transform) = self.gpu.transforms.get(transform.0) {
            self.pass.set_bind_group(2, &transform.bind_group, &[]);
        }
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        let group = texture
            .and_then(|id| self.gpu.textures.get(id.0))
            .map(|texture| &texture.bind_group)
            .unwrap_or(&self.gpu.sentinel_texture);
        self.pass.set_bind_group(3, group, &[]);
    }

    fn draw(&mut self, geometry: GeometryId) {
        if let Some(mesh) = self.gpu.geometries.get(geometry.0) {
            mesh.draw(self.pass);
        }
    }

    fn begin_transparent(&mut self) {
        self.transparent = true;
    }

    fn end_transparent(&mut self) {
        self.transparent = false;
    }
}
