//! Seeded population of the demo grid.
//!
//! Every grid cell gets a random geometry, a random rotation about the
//! vertical axis and a random material that is either a plain color or a
//! texture on a white material. The floor is appended after the grid and
//! the glass pane is returned separately.
//!
//! Per cell the generator is called exactly three times, in this order:
//! geometry index, rotation, material index. Cells are visited with `x` as
//! the outer and `z` as the inner loop. Together with [`CrtRand`](super::random::CrtRand)
//! this makes the output bit-for-bit reproducible.

use std::f32::consts::TAU;

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};
use thiserror::Error;

use super::{
    GeometryId, GlassObject, MaterialChoice, MaterialId, Placement, Scene, SceneObject,
    ShadingKind, TextureId, TransformId, random::SceneRng,
};

/// Grid dimensions and placement of the first cell.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    pub width: usize,
    pub height: usize,
    pub x_start: f32,
    pub z_start: f32,
    pub spacing_x: f32,
    pub spacing_z: f32,
}

impl GridLayout {
    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Where the object of cell `(x, z)` stands on the ground plane.
    pub fn translation(&self, x: usize, z: usize) -> Vector3<f32> {
        Vector3::new(
            self.x_start + x as f32 * self.spacing_x,
            0.0,
            self.z_start + z as f32 * self.spacing_z,
        )
    }

    /// Floor transform: a flattened unit cube covering the grid plus a margin.
    pub fn floor_transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::new(0.0, -0.1, 0.0))
            * Matrix4::from_nonuniform_scale(
                self.spacing_x * self.width as f32 / 2.0 + FLOOR_MARGIN,
                0.1,
                self.spacing_z * self.height as f32 / 2.0 + FLOOR_MARGIN,
            )
    }
}

const FLOOR_MARGIN: f32 = 5.0;

/// A geometry the grid can pick, with the transform that makes it sit on the
/// ground plane. `mesh` may be absent (e.g. an optional asset that failed to
/// load); objects picking it are still placed but have nothing to draw.
#[derive(Clone, Debug)]
pub struct GeometryEntry {
    pub mesh: Option<GeometryId>,
    pub rest_pose: Matrix4<f32>,
}

#[derive(Clone, Debug)]
pub struct FloorSpec {
    pub geometry: GeometryId,
    pub material: MaterialId,
}

#[derive(Clone, Debug)]
pub struct GlassSpec {
    pub geometry: GeometryId,
    pub material: MaterialId,
}

impl GlassSpec {
    /// Raised and tilted about the z axis so it hangs over the grid.
    pub fn transform() -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::new(-5.0, 10.0, 0.0)) * Matrix4::from_angle_z(Rad(0.5))
    }
}

/// The fixed tables the populator draws from.
#[derive(Clone, Debug)]
pub struct Palette<'a> {
    pub geometries: &'a [GeometryEntry],
    pub colors: &'a [MaterialId],
    pub textures: &'a [TextureId],
    /// Material used under textures.
    pub white: MaterialId,
    pub floor: FloorSpec,
    pub glass: GlassSpec,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PopulateError {
    #[error("cannot populate {cells} grid cells without any geometry")]
    EmptyGeometryTable { cells: usize },
    #[error("cannot populate {cells} grid cells without any color or texture")]
    EmptyMaterialTable { cells: usize },
}

/// Maps a drawn material index onto the color table followed by the texture
/// table. Indices past both tables are a caller bug.
pub fn choose_material(index: usize, color_count: usize, texture_count: usize) -> MaterialChoice {
    debug_assert!(index < color_count + texture_count);
    if index < color_count {
        MaterialChoice::Color(index)
    } else {
        MaterialChoice::Texture(index - color_count)
    }
}

/// Builds the scene: one object per grid cell, then the floor, plus the glass.
pub fn populate(
    layout: &GridLayout,
    palette: &Palette<'_>,
    rng: &mut impl SceneRng,
) -> Result<Scene, PopulateError> {
    let cells = layout.cells();
    let material_count = palette.colors.len() + palette.textures.len();
    if cells > 0 {
        if palette.geometries.is_empty() {
            return Err(PopulateError::EmptyGeometryTable { cells });
        }
        if material_count == 0 {
            return Err(PopulateError::EmptyMaterialTable { cells });
        }
    }

    // Grid cells occupy the first `cells` slots, floor and glass follow.
    let mut transforms = vec![Matrix4::identity(); cells + 2];
    let mut objects = Vec::with_capacity(cells + 1);
    let mut placements = Vec::with_capacity(cells);

    for x in 0..layout.width {
        for z in 0..layout.height {
            let geometry = rng.next_index(palette.geometries.len());
            let rotation = rng.next_unit() * TAU;
            let material = rng.next_index(material_count);

            let entry = &palette.geometries[geometry];
            let translation = layout.translation(x, z);
            let slot = z * layout.width + x;
            transforms[slot] = Matrix4::from_translation(translation)
                * Matrix4::from_angle_y(Rad(rotation))
                * entry.rest_pose;

            let choice = choose_material(material, palette.colors.len(), palette.textures.len());
            let (shading, material, texture) = match choice {
                MaterialChoice::Color(i) => (ShadingKind::Untextured, palette.colors[i], None),
                MaterialChoice::Texture(i) => {
                    (ShadingKind::Textured, palette.white, Some(palette.textures[i]))
                }
            };

            objects.push(SceneObject {
                geometry: entry.mesh,
                shading,
                material: Some(material),
                transform: Some(TransformId(slot)),
                texture,
            });
            placements.push(Placement {
                cell: (x, z),
                geometry,
                rotation,
                translation,
                choice,
            });
        }
    }

    let floor_slot = cells;
    transforms[floor_slot] = layout.floor_transform();
    objects.push(SceneObject {
        geometry: Some(palette.floor.geometry),
        shading: ShadingKind::Untextured,
        material: Some(palette.floor.material),
        transform: Some(TransformId(floor_slot)),
        texture: None,
    });

    let glass_slot = cells + 1;
    transforms[glass_slot] = GlassSpec::transform();
    let glass = GlassObject {
        geometry: palette.glass.geometry,
        material: palette.glass.material,
        transform: TransformId(glass_slot),
    };

    log::info!(
        "Populated {}x{} grid: {} opaque objects, {} transforms",
        layout.width,
        layout.height,
        objects.len(),
        transforms.len()
    );

    Ok(Scene {
        objects,
        glass,
        transforms,
        placements,
    })
}
