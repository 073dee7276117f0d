#![allow(dead_code)]

use std::collections::VecDeque;

use cgmath::{Matrix4, SquareMatrix, Vector3};
use phong_scene::{
    render::DrawTarget,
    scene::{
        GeometryId, MaterialId, ProgramStatus, ShadingKind, TextureId, TransformId,
        populate::{FloorSpec, GeometryEntry, GlassSpec, Palette},
        random::SceneRng,
    },
};

/// One call made on a [`DrawTarget`].
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    UseProgram(ShadingKind),
    BindMaterial(MaterialId),
    BindTransform(TransformId),
    BindTexture(Option<TextureId>),
    Draw(GeometryId),
    BeginTransparent,
    EndTransparent,
}

/// Records every call and which draws happened with blending on.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub calls: Vec<Call>,
    pub transparent: bool,
    pub blended_draws: Vec<GeometryId>,
}

impl RecordingTarget {
    pub fn draws(&self) -> Vec<GeometryId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Draw(geometry) => Some(*geometry),
                _ => None,
            })
            .collect()
    }
}

impl DrawTarget for RecordingTarget {
    fn use_program(&mut self, kind: ShadingKind) {
        self.calls.push(Call::UseProgram(kind));
    }

    fn bind_material(&mut self, material: MaterialId) {
        self.calls.push(Call::BindMaterial(material));
    }

    fn bind_transform(&mut self, transform: TransformId) {
        self.calls.push(Call::BindTransform(transform));
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.calls.push(Call::BindTexture(texture));
    }

    fn draw(&mut self, geometry: GeometryId) {
        if self.transparent {
            self.blended_draws.push(geometry);
        }
        self.calls.push(Call::Draw(geometry));
    }

    fn begin_transparent(&mut self) {
        self.transparent = true;
        self.calls.push(Call::BeginTransparent);
    }

    fn end_transparent(&mut self) {
        self.transparent = false;
        self.calls.push(Call::EndTransparent);
    }
}

/// Fixed program readiness.
#[derive(Clone, Copy, Debug)]
pub struct Programs {
    pub untextured: bool,
    pub textured: bool,
}

impl Programs {
    pub const READY: Programs = Programs {
        untextured: true,
        textured: true,
    };
}

impl ProgramStatus for Programs {
    fn is_ready(&self, kind: ShadingKind) -> bool {
        match kind {
            ShadingKind::Untextured => self.untextured,
            ShadingKind::Textured => self.textured,
        }
    }
}

/// Replays scripted draws and records the bounds it was asked for.
#[derive(Debug, Default)]
pub struct ScriptedRng {
    pub indices: VecDeque<usize>,
    pub units: VecDeque<f32>,
    pub bounds: Vec<usize>,
}

impl ScriptedRng {
    pub fn new(indices: &[usize], units: &[f32]) -> Self {
        Self {
            indices: indices.iter().copied().collect(),
            units: units.iter().copied().collect(),
            bounds: Vec::new(),
        }
    }
}

impl SceneRng for ScriptedRng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.bounds.push(bound);
        let index = self.indices.pop_front().expect("index script exhausted");
        assert!(index < bound, "scripted index {index} outside 0..{bound}");
        index
    }

    fn next_unit(&mut self) -> f32 {
        self.units.pop_front().expect("unit script exhausted")
    }
}

pub const FLOOR_MATERIAL: MaterialId = MaterialId(7);
pub const GLASS_MATERIAL: MaterialId = MaterialId(8);
pub const GLASS_GEOMETRY: GeometryId = GeometryId(6);

/// Tables shaped like the demo: six geometries (the last without a mesh, to
/// cover missing meshes), seven colors with white last, two textures.
pub struct Tables {
    pub geometries: Vec<GeometryEntry>,
    pub colors: Vec<MaterialId>,
    pub textures: Vec<TextureId>,
}

impl Tables {
    pub fn demo() -> Self {
        let mut geometries: Vec<GeometryEntry> = (0..5)
            .map(|i| GeometryEntry {
                mesh: Some(GeometryId(i)),
                rest_pose: Matrix4::from_translation(Vector3::new(0.0, 1.0, 0.0)),
            })
            .collect();
        geometries.push(GeometryEntry {
            mesh: None,
            rest_pose: Matrix4::identity(),
        });
        Self {
            geometries,
            colors: (0..7).map(MaterialId).collect(),
            textures: vec![TextureId(0), TextureId(1)],
        }
    }

    /// One geometry standing on the ground, one color, no textures.
    pub fn single() -> Self {
        Self {
            geometries: vec![GeometryEntry {
                mesh: Some(GeometryId(0)),
                rest_pose: Matrix4::identity(),
            }],
            colors: vec![MaterialId(0)],
            textures: Vec::new(),
        }
    }

    pub fn palette(&self) -> Palette<'_> {
        Palette {
            geometries: &self.geometries,
            colors: &self.colors,
            textures: &self.textures,
            white: MaterialId(6),
            floor: FloorSpec {
                geometry: GeometryId(0),
                material: FLOOR_MATERIAL,
            },
            glass: GlassSpec {
                geometry: GLASS_GEOMETRY,
                material: GLASS_MATERIAL,
            },
        }
    }
}
