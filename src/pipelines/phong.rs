//! The two shading variants and their hot reload.
//!
//! Shader sources are read from `assets/shaders/` so they can be edited while
//! the demo runs. A variant whose source fails to load or validate is left
//! "not ready": objects using it are skipped until a later reload succeeds.

use crate::{
    pipelines::{
        Layouts, SlotKind, basic::mk_opaque_pipeline, layout_slot, transparent::mk_glass_pipeline,
    },
    resources::load_string,
    scene::{ProgramStatus, ShadingKind},
};

/// Embedded copies, used when the file on disk is missing.
const NOTEXTURE_WGSL: &str = include_str!("../../assets/shaders/phong_notexture.wgsl");
const TEXTURE_WGSL: &str = include_str!("../../assets/shaders/phong_texture.wgsl");

impl ShadingKind {
    pub fn shader_file(self) -> &'static str {
        match self {
            ShadingKind::Untextured => "shaders/phong_notexture.wgsl",
            ShadingKind::Textured => "shaders/phong_texture.wgsl",
        }
    }

    fn embedded_source(self) -> &'static str {
        match self {
            ShadingKind::Untextured => NOTEXTURE_WGSL,
            ShadingKind::Textured => TEXTURE_WGSL,
        }
    }
}

/// A compiled variant. Only the untextured one has a glass pipeline.
#[derive(Debug)]
pub struct ShadingProgram {
    pub opaque: wgpu::RenderPipeline,
    pub transparent: Option<wgpu::RenderPipeline>,
}

#[derive(Debug, Default)]
pub struct ShadingPrograms {
    untextured: Option<ShadingProgram>,
    textured: Option<ShadingProgram>,
}

impl ShadingPrograms {
    /// Builds both variants from disk (or the embedded fallback).
    pub async fn load(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        layouts: &Layouts,
    ) -> Self {
        let mut programs = Self::default();
        programs.reload(device, color_format, layouts).await;
        programs
    }

    /// Recompiles both variants. Failures are logged and mark the variant as
    /// not ready; they never abort the application.
    pub async fn reload(
        &mut self,
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        layouts: &Layouts,
    ) {
        for kind in [ShadingKind::Untextured, ShadingKind::Textured] {
            let program = match compile(device, color_format, layouts, kind).await {
                Ok(program) => Some(program),
                Err(e) => {
                    log::error!("{:?} shading program is not ready: {:#}", kind, e);
                    None
                }
            };
            *self.slot(kind) = program;
        }
        log::info!("Shaders are reloaded");
    }

    fn slot(&mut self, kind: ShadingKind) -> &mut Option<ShadingProgram> {
        match kind {
            ShadingKind::Untextured => &mut self.untextured,
            ShadingKind::Textured => &mut self.textured,
        }
    }

    fn get(&self, kind: ShadingKind) -> Option<&ShadingProgram> {
        match kind {
            ShadingKind::Untextured => self.untextured.as_ref(),
            ShadingKind::Textured => self.textured.as_ref(),
        }
    }

    pub fn opaque(&self, kind: ShadingKind) -> Option<&wgpu::RenderPipeline> {
        self.get(kind).map(|program| &program.opaque)
    }

    pub fn transparent(&self, kind: ShadingKind) -> Option<&wgpu::RenderPipeline> {
        self.get(kind).and_then(|program| program.transparent.as_ref())
    }
}

impl ProgramStatus for ShadingPrograms {
    fn is_ready(&self, kind: ShadingKind) -> bool {
        self.get(kind).is_some()
    }
}

async fn read_source(kind: ShadingKind) -> String {
    match load_string(kind.shader_file()).await {
        Ok(source) => source,
        Err(e) => {
            log::warn!(
                "Could not read {} ({}), using the built-in shader",
                kind.shader_file(),
                e
            );
            kind.embedded_source().to_string()
        }
    }
}

/// Entry points every variant must export.
const ENTRY_POINTS: [&str; 2] = ["vs_main", "fs_main"];

/// Parses and validates WGSL up front so an edited shader with errors is
/// reported instead of reaching the device. Resource bindings are checked
/// against the shared pipeline layout as well.
pub fn validate_wgsl(source: &str) -> anyhow::Result<()> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow::anyhow!(e.emit_to_string(source)))?;
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| anyhow::anyhow!("{}", e.into_inner()))?;
    for name in ENTRY_POINTS {
        if !module.entry_points.iter().any(|ep| ep.name == name) {
            anyhow::bail!("missing entry point `{}`", name);
        }
    }
    check_bindings(&module)
}

fn check_bindings(module: &naga::Module) -> anyhow::Result<()> {
    for (_, var) in module.global_variables.iter() {
        let Some(naga::ResourceBinding { group, binding }) = var.binding else {
            continue;
        };
        let name = var.name.as_deref().unwrap_or("<unnamed>");
        let declared = match var.space {
            naga::AddressSpace::Uniform => Some(SlotKind::Uniform),
            naga::AddressSpace::Handle => match module.types[var.ty].inner {
                naga::TypeInner::Image { .. } => Some(SlotKind::Texture),
                naga::TypeInner::Sampler { .. } => Some(SlotKind::Sampler),
                _ => None,
            },
            _ => None,
        };
        let Some(expected) = layout_slot(group, binding) else {
            anyhow::bail!(
                "`{}` at @group({}) @binding({}) has no slot in the pipeline layout",
                name,
                group,
                binding
            );
        };
        if declared != Some(expected) {
            anyhow::bail!(
                "`{}` at @group({}) @binding({}) is declared as {:?} ({:?}), the layout expects {:?}",
                name,
                group,
                binding,
                var.space,
                declared,
                expected
            );
        }
    }
    Ok(())
}

async fn compile(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    layouts: &Layouts,
    kind: ShadingKind,
) -> anyhow::Result<ShadingProgram> {
    use anyhow::Context;

    let source = read_source(kind).await;
    validate_wgsl(&source).with_context(|| format!("{} failed to compile", kind.shader_file()))?;

    // Whatever naga lets through can still be rejected by the device
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(kind.shader_file()),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let label = format!("{:?} Pipeline", kind);
    let opaque = mk_opaque_pipeline(device, color_format, layouts, &shader, &label);
    let transparent = match kind {
        ShadingKind::Untextured => Some(mk_glass_pipeline(device, color_format, layouts, &shader)),
        ShadingKind::Textured => None,
    };
    if let Some(error) = scope.pop().await {
        anyhow::bail!("{} was rejected by the device: {}", kind.shader_file(), error);
    }

    Ok(ShadingProgram {
        opaque,
        transparent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_shaders_validate() {
        validate_wgsl(NOTEXTURE_WGSL).unwrap();
        validate_wgsl(TEXTURE_WGSL).unwrap();
    }

    #[test]
    fn broken_source_is_rejected() {
        assert!(validate_wgsl("fn vs_main( {").is_err());
    }

    #[test]
    fn source_without_fragment_stage_is_rejected() {
        let source = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }";
        let err = validate_wgsl(source).unwrap_err();
        assert!(err.to_string().contains("fs_main"));
    }

    #[test]
    fn storage_buffer_in_a_uniform_slot_is_rejected() {
        let source = NOTEXTURE_WGSL.replace(
            "@group(1) @binding(0) var<uniform> material: Material;",
            "@group(1) @binding(0) var<storage, read> material: Material;",
        );
        assert_ne!(source, NOTEXTURE_WGSL);
        let err = validate_wgsl(&source).unwrap_err();
        assert!(err.to_string().contains("@group(1) @binding(0)"), "{err}");
    }

    #[test]
    fn binding_outside_the_layout_is_rejected() {
        let source = NOTEXTURE_WGSL.replace(
            "@group(2) @binding(0) var<uniform> object: Object;",
            "@group(2) @binding(3) var<uniform> object: Object;",
        );
        assert_ne!(source, NOTEXTURE_WGSL);
        let err = validate_wgsl(&source).unwrap_err();
        assert!(err.to_string().contains("no slot"), "{err}");
    }
}
