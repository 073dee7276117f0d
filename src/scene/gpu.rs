//! GPU-side tables the scene ids point into.
//!
//! [`GpuScene::load`] uploads geometries, materials and textures, compiles
//! the shading programs, populates the scene and finally uploads one model
//! transform per scene transform.

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};

use crate::{
    config::DemoConfig,
    data_structures::{
        material::{GpuMaterial, PhongMaterial},
        model::{Mesh, MeshData},
        texture::Texture,
        transform::GpuTransform,
    },
    pipelines::{Layouts, phong::ShadingPrograms},
    resources::{self, mesh::load_obj_mesh, shapes},
    scene::{
        GeometryId, MaterialId, Scene, TextureId,
        populate::{FloorSpec, GeometryEntry, GlassSpec, Palette, populate},
        random::CrtRand,
    },
};

/// The plain colors cells can pick, in table order.
pub const COLORS: [(&str, [f32; 3]); 7] = [
    ("Red", [1.0, 0.0, 0.0]),
    ("Green", [0.0, 1.0, 0.0]),
    ("Blue", [0.0, 0.0, 1.0]),
    ("Cyan", [0.0, 1.0, 1.0]),
    ("Magenta", [1.0, 0.0, 1.0]),
    ("Yellow", [1.0, 1.0, 0.0]),
    ("White", [1.0, 1.0, 1.0]),
];

/// Position of white in [`COLORS`]; textured objects use it.
pub const WHITE: usize = 6;

pub fn color_material(color: [f32; 3]) -> PhongMaterial {
    PhongMaterial::basic(color, true, 200.0, 1.0)
}

pub fn floor_material() -> PhongMaterial {
    PhongMaterial::basic([0.7; 3], true, 200.0, 1.0)
}

pub fn glass_material() -> PhongMaterial {
    PhongMaterial::basic([1.0; 3], false, 0.0, 0.5)
}

/// The built-in shapes with the transforms that make them rest on the
/// ground plane, in geometry table order.
pub fn builtin_shapes() -> Vec<(&'static str, MeshData, Matrix4<f32>)> {
    let up = |y: f32| Matrix4::from_translation(Vector3::new(0.0, y, 0.0));
    let lying = up(0.5) * Matrix4::from_angle_x(Deg(90.0));
    vec![
        ("Cube", shapes::cube(1.0), up(1.0)),
        ("Sphere", shapes::sphere(1.0, 24, 48), up(1.0)),
        ("Torus", shapes::torus(1.0, 0.5, 48, 24), up(0.5)),
        ("Cylinder", shapes::cylinder(0.5, 1.0, 48), lying),
        ("Capsule", shapes::capsule(0.5, 0.5, 12, 48), lying),
        ("Teapot", shapes::teapot(0.5, 10, 48), Matrix4::identity()),
    ]
}

/// Meshes to upload and the geometry table pointing at them, slot `i` being
/// mesh `i`. A teapot read from disk takes the place of the built-in one.
pub fn geometry_table(
    mut teapot: Option<MeshData>,
) -> (Vec<(&'static str, MeshData)>, Vec<GeometryEntry>) {
    let mut meshes = Vec::new();
    let mut entries = Vec::new();
    for (name, data, rest_pose) in builtin_shapes() {
        let data = if name == "Teapot" {
            teapot.take().unwrap_or(data)
        } else {
            data
        };
        entries.push(GeometryEntry {
            mesh: Some(GeometryId(meshes.len())),
            rest_pose,
        });
        meshes.push((name, data));
    }
    (meshes, entries)
}

/// A loaded texture together with its group 3 bind group.
#[derive(Debug)]
pub struct SceneTexture {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
pub struct GpuScene {
    pub programs: ShadingPrograms,
    pub geometries: Vec<Mesh>,
    pub materials: Vec<GpuMaterial>,
    pub transforms: Vec<GpuTransform>,
    pub textures: Vec<SceneTexture>,
    /// 1×1 white texture bound when an object has no texture.
    pub sentinel_texture: wgpu::BindGroup,
    default_material: GpuMaterial,
    default_transform: GpuTransform,
}

impl GpuScene {
    /// Builds every GPU resource and the populated scene.
    ///
    /// A texture that cannot be loaded is an error. A missing teapot model is
    /// not; the procedural one is used instead.
    pub async fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        layouts: &Layouts,
        config: &DemoConfig,
    ) -> anyhow::Result<(Self, Scene)> {
        let programs = ShadingPrograms::load(device, color_format, layouts).await;

        let teapot = match load_obj_mesh(&config.teapot).await {
            Ok(data) => Some(data),
            Err(e) => {
                log::info!("Using the built-in teapot ({:#})", e);
                None
            }
        };
        let (meshes, entries) = geometry_table(teapot);
        let mut geometries: Vec<Mesh> = meshes
            .into_iter()
            .map(|(name, data)| data.upload(device, name))
            .collect();
        let glass_geometry = GeometryId(geometries.len());
        geometries.push(shapes::glass_quad(10.0).upload(device, "Glass"));

        let mut materials: Vec<GpuMaterial> = COLORS
            .iter()
            .map(|(name, color)| GpuMaterial::new(device, &layouts.material, name, color_material(*color)))
            .collect();
        let colors: Vec<MaterialId> = (0..materials.len()).map(MaterialId).collect();
        let floor = MaterialId(materials.len());
        materials.push(GpuMaterial::new(device, &layouts.material, "Floor", floor_material()));
        let glass = MaterialId(materials.len());
        materials.push(GpuMaterial::new(device, &layouts.material, "Glass", glass_material()));

        let loaded = futures::future::try_join_all(
            config
                .textures
                .iter()
                .map(|file_name| resources::load_texture(file_name, device, queue)),
        )
        .await?;
        let textures: Vec<SceneTexture> = loaded
            .into_iter()
            .zip(&config.textures)
            .map(|(texture, file_name)| SceneTexture {
                bind_group: layouts.texture_bind_group(device, &texture, file_name),
                texture,
            })
            .collect();
        let texture_ids: Vec<TextureId> = (0..textures.len()).map(TextureId).collect();

        let sentinel = Texture::create_solid([255; 4], device, queue, "No Texture");
        let sentinel_texture = layouts.texture_bind_group(device, &sentinel, "no_texture_bind_group");

        let palette = Palette {
            geometries: &entries,
            colors: &colors,
            textures: &texture_ids,
            white: colors[WHITE],
            floor: FloorSpec {
                // the cube, flattened by the floor transform
                geometry: GeometryId(0),
                material: floor,
            },
            glass: GlassSpec {
                geometry: glass_geometry,
                material: glass,
            },
        };
        let mut rng = CrtRand::new(config.seed);
        let scene = populate(&config.grid, &palette, &mut rng)?;

        let transforms = scene
            .transforms
            .iter()
            .map(|m| GpuTransform::new(device, &layouts.object, *m))
            .collect();

        log::info!(
            "Uploaded {} geometries, {} materials, {} textures",
            geometries.len(),
            materials.len(),
            textures.len()
        );

        let gpu = Self {
            programs,
            geometries,
            materials,
            transforms,
            textures,
            sentinel_texture,
            default_material: GpuMaterial::new(
                device,
                &layouts.material,
                "Default",
                color_material(COLORS[WHITE].1),
            ),
            default_transform: GpuTransform::new(device, &layouts.object, Matrix4::identity()),
        };
        Ok((gpu, scene))
    }

    /// Bound at the start of every pass so an object without a material
    /// still draws with something valid.
    pub fn default_material(&self) -> &GpuMaterial {
        &self.default_material
    }

    /// Identity transform, bound at the start of every pass.
    pub fn default_transform(&self) -> &GpuTransform {
        &self.default_transform
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Point3, Transform};

    use super::*;

    #[test]
    fn builtin_shapes_rest_on_the_ground() {
        for (name, data, rest_pose) in builtin_shapes() {
            let lowest = data
                .vertices
                .iter()
                .map(|v| rest_pose.transform_point(Point3::from(v.position)).y)
                .fold(f32::INFINITY, f32::min);
            assert!(lowest.abs() < 1e-4, "{name} bottom at {lowest}");
        }
    }

    #[test]
    fn every_geometry_slot_has_a_mesh() {
        let (meshes, entries) = geometry_table(None);
        assert_eq!(meshes.len(), 6);
        assert_eq!(entries.len(), meshes.len());
        for (slot, entry) in entries.iter().enumerate() {
            assert_eq!(entry.mesh, Some(GeometryId(slot)));
            let (name, data) = &meshes[slot];
            assert!(!data.vertices.is_empty(), "{name} has no vertices");
            assert!(
                data.indices.as_ref().is_some_and(|i| !i.is_empty()),
                "{name} has no indices"
            );
        }
    }

    #[test]
    fn loaded_teapot_takes_the_last_slot() {
        let loaded = shapes::cube(0.25);
        let (meshes, entries) = geometry_table(Some(loaded));
        assert_eq!(entries.len(), 6);
        assert_eq!(meshes[5].0, "Teapot");
        assert_eq!(meshes[5].1.vertices.len(), 24);
        assert_eq!(entries[5].rest_pose, Matrix4::identity());
    }

    #[test]
    fn default_grid_draws_something_in_every_cell() {
        let (_, entries) = geometry_table(None);
        let colors: Vec<MaterialId> = (0..COLORS.len()).map(MaterialId).collect();
        let textures = [TextureId(0), TextureId(1)];
        let palette = Palette {
            geometries: &entries,
            colors: &colors,
            textures: &textures,
            white: colors[WHITE],
            floor: FloorSpec {
                geometry: GeometryId(0),
                material: MaterialId(COLORS.len()),
            },
            glass: GlassSpec {
                geometry: GeometryId(entries.len()),
                material: MaterialId(COLORS.len() + 1),
            },
        };
        let config = DemoConfig::default();
        let scene =
            populate(&config.grid, &palette, &mut CrtRand::new(config.seed)).expect("populate");
        assert_eq!(scene.objects.len(), config.grid.cells() + 1);
        assert!(scene.objects.iter().all(|o| o.geometry.is_some()));
    }

    #[test]
    fn white_is_the_last_color() {
        assert_eq!(COLORS[WHITE].1, [1.0, 1.0, 1.0]);
    }
}
