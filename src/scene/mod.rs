//! Scene description: what is drawn, with which program, material, transform
//! and texture.
//!
//! Everything in here is plain data. GPU handles are referred to by index
//! newtypes ([`GeometryId`], [`MaterialId`], [`TransformId`], [`TextureId`])
//! pointing into the tables owned by [`gpu::GpuScene`], so the scene can be
//! built and inspected without a device.
//!
//! - `populate` builds the seeded grid, the floor and the glass pane
//! - `random` holds the reproducible random stream used by the populator
//! - `gpu` owns the GPU-side tables the ids point into

pub mod gpu;
pub mod populate;
pub mod random;

use cgmath::Matrix4;

/// Index into the geometry table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryId(pub usize);

/// Index into the material table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Index into the model-transform buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransformId(pub usize);

/// Index into the texture table. `None` where a texture is optional means the
/// "no texture" sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// The compiled program an object is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShadingKind {
    Untextured,
    Textured,
}

/// Reports whether a shading variant is currently usable.
///
/// A variant that failed to compile (e.g. after a shader reload with a typo)
/// is "not ready"; objects using it are skipped until it compiles again.
pub trait ProgramStatus {
    fn is_ready(&self, kind: ShadingKind) -> bool;
}

/// One opaque renderable.
///
/// Geometry, material and transform are optional: a missing one is not an
/// error, the renderer just does not rebind that piece of state.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub geometry: Option<GeometryId>,
    pub shading: ShadingKind,
    pub material: Option<MaterialId>,
    pub transform: Option<TransformId>,
    pub texture: Option<TextureId>,
}

impl SceneObject {
    /// Evaluated once per object per frame by the opaque pass.
    pub fn is_drawable(&self, programs: &impl ProgramStatus) -> bool {
        programs.is_ready(self.shading)
    }
}

/// The single transparent pane, drawn in its own pass after all opaque
/// objects.
#[derive(Clone, Debug, PartialEq)]
pub struct GlassObject {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub transform: TransformId,
}

/// Which material a grid cell ended up with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialChoice {
    /// Index into the color table.
    Color(usize),
    /// Index into the texture table.
    Texture(usize),
}

/// The random decisions taken for one grid cell, kept for inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// `(x, z)` grid coordinates.
    pub cell: (usize, usize),
    /// Index into the geometry table.
    pub geometry: usize,
    /// Rotation about +y in radians, in `[0, 2π)`.
    pub rotation: f32,
    pub translation: cgmath::Vector3<f32>,
    pub choice: MaterialChoice,
}

/// The populated scene, owned by the application and passed by reference to
/// the renderer. Never resized after population.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Opaque objects in draw order; the floor is last.
    pub objects: Vec<SceneObject>,
    pub glass: GlassObject,
    /// Model matrices, indexed by [`TransformId`]. Grid cells live at
    /// `z * width + x`, followed by the floor and the glass.
    pub transforms: Vec<Matrix4<f32>>,
    pub placements: Vec<Placement>,
}

impl Scene {
    /// Number of grid objects (everything in `objects` except the floor).
    pub fn grid_len(&self) -> usize {
        self.placements.len()
    }

    pub fn transform(&self, id: TransformId) -> Option<&Matrix4<f32>> {
        self.transforms.get(id.0)
    }
}
