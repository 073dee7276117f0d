mod common;

use std::f32::consts::TAU;

use cgmath::{InnerSpace, Matrix4, Point3, Transform, Vector3, Vector4};
use common::test_utils::{FLOOR_MATERIAL, GLASS_GEOMETRY, GLASS_MATERIAL, ScriptedRng, Tables};
use phong_scene::{
    config::DemoConfig,
    scene::{
        GeometryId, MaterialChoice, MaterialId, ShadingKind, TextureId, TransformId,
        populate::{GlassSpec, GridLayout, PopulateError, choose_material, populate},
        random::{CrtRand, SceneRng},
    },
};

fn layout(width: usize, height: usize) -> GridLayout {
    GridLayout {
        width,
        height,
        x_start: -0.5,
        z_start: -0.5,
        spacing_x: 1.0,
        spacing_z: 1.0,
    }
}

fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
    (a - b).magnitude() < 1e-5
}

#[test]
fn same_seed_gives_same_scene() {
    let tables = Tables::demo();
    let grid = DemoConfig::default().grid;
    let a = populate(&grid, &tables.palette(), &mut CrtRand::new(12345)).unwrap();
    let b = populate(&grid, &tables.palette(), &mut CrtRand::new(12345)).unwrap();
    assert_eq!(a.placements, b.placements);
    assert_eq!(a.transforms, b.transforms);
    assert_eq!(a.objects, b.objects);

    let c = populate(&grid, &tables.palette(), &mut CrtRand::new(54321)).unwrap();
    assert_ne!(a.placements, c.placements);
}

#[test]
fn first_cell_follows_the_generator() {
    let tables = Tables::demo();
    let grid = DemoConfig::default().grid;
    let scene = populate(&grid, &tables.palette(), &mut CrtRand::new(12345)).unwrap();

    let mut rng = CrtRand::new(12345);
    let geometry = rng.next_raw() as usize % 6;
    let rotation = rng.next_raw() as f32 / 32768.0 * TAU;
    let material = rng.next_raw() as usize % 9;

    let first = &scene.placements[0];
    assert_eq!(first.cell, (0, 0));
    assert_eq!(first.geometry, geometry);
    assert!((first.rotation - rotation).abs() < 1e-6);
    assert_eq!(first.choice, choose_material(material, 7, 2));
}

#[test]
fn demo_grid_has_every_cell_plus_floor() {
    let tables = Tables::demo();
    let grid = DemoConfig::default().grid;
    let scene = populate(&grid, &tables.palette(), &mut CrtRand::new(12345)).unwrap();

    assert_eq!(scene.grid_len(), 121);
    assert_eq!(scene.objects.len(), 122);
    assert_eq!(scene.transforms.len(), 123);
    for placement in &scene.placements {
        assert!((0.0..TAU).contains(&placement.rotation));
        assert!(placement.geometry < 6);
    }
}

#[test]
fn empty_grid_has_floor_and_glass_only() {
    let tables = Tables::demo();
    let scene = populate(&layout(0, 0), &tables.palette(), &mut ScriptedRng::default()).unwrap();
    assert_eq!(scene.objects.len(), 1);
    assert_eq!(scene.objects[0].material, Some(FLOOR_MATERIAL));
    assert_eq!(scene.objects[0].transform, Some(TransformId(0)));
    assert_eq!(scene.glass.transform, TransformId(1));
    assert_eq!(scene.transforms.len(), 2);
}

#[test]
fn empty_grid_accepts_empty_tables() {
    let mut tables = Tables::demo();
    tables.geometries.clear();
    tables.colors.clear();
    tables.textures.clear();
    let scene = populate(&layout(0, 3), &tables.palette(), &mut ScriptedRng::default()).unwrap();
    assert_eq!(scene.objects.len(), 1);
}

#[test]
fn cells_without_geometry_are_rejected() {
    let mut tables = Tables::demo();
    tables.geometries.clear();
    let err = populate(&layout(2, 2), &tables.palette(), &mut ScriptedRng::default()).unwrap_err();
    assert_eq!(err, PopulateError::EmptyGeometryTable { cells: 4 });
}

#[test]
fn cells_without_materials_are_rejected() {
    let mut tables = Tables::demo();
    tables.colors.clear();
    tables.textures.clear();
    let err = populate(&layout(1, 1), &tables.palette(), &mut ScriptedRng::default()).unwrap_err();
    assert_eq!(err, PopulateError::EmptyMaterialTable { cells: 1 });
}

#[test]
fn material_index_splits_into_colors_then_textures() {
    assert_eq!(choose_material(0, 7, 2), MaterialChoice::Color(0));
    assert_eq!(choose_material(6, 7, 2), MaterialChoice::Color(6));
    assert_eq!(choose_material(7, 7, 2), MaterialChoice::Texture(0));
    assert_eq!(choose_material(8, 7, 2), MaterialChoice::Texture(1));
}

#[test]
fn two_by_two_grid_places_and_binds_each_cell() {
    let tables = Tables::demo();
    // Per cell: geometry, material. Rotations are all zero.
    let mut rng = ScriptedRng::new(&[0, 2, 1, 6, 2, 7, 5, 8], &[0.0; 4]);
    let scene = populate(&layout(2, 2), &tables.palette(), &mut rng).unwrap();

    assert_eq!(rng.bounds, vec![6, 9, 6, 9, 6, 9, 6, 9]);
    assert_eq!(scene.objects.len(), 5);

    let expected = [
        ((0, 0), Vector3::new(-0.5, 0.0, -0.5)),
        ((0, 1), Vector3::new(-0.5, 0.0, 0.5)),
        ((1, 0), Vector3::new(0.5, 0.0, -0.5)),
        ((1, 1), Vector3::new(0.5, 0.0, 0.5)),
    ];
    for (placement, (cell, translation)) in scene.placements.iter().zip(expected) {
        assert_eq!(placement.cell, cell);
        assert!(close(placement.translation, translation));
    }

    // Plain color.
    assert_eq!(scene.objects[0].shading, ShadingKind::Untextured);
    assert_eq!(scene.objects[0].material, Some(MaterialId(2)));
    assert_eq!(scene.objects[0].texture, None);
    // White as a color is still untextured.
    assert_eq!(scene.objects[1].shading, ShadingKind::Untextured);
    assert_eq!(scene.objects[1].material, Some(MaterialId(6)));
    // Textures ride on the white material.
    assert_eq!(scene.objects[2].shading, ShadingKind::Textured);
    assert_eq!(scene.objects[2].material, Some(MaterialId(6)));
    assert_eq!(scene.objects[2].texture, Some(TextureId(0)));
    assert_eq!(scene.objects[3].texture, Some(TextureId(1)));
    // The geometry without a mesh still gets an object.
    assert_eq!(scene.objects[3].geometry, None);
    assert_eq!(scene.objects[0].geometry, Some(GeometryId(0)));

    // Transform slots are row-major by z.
    assert_eq!(scene.objects[1].transform, Some(TransformId(2)));
    assert_eq!(scene.objects[2].transform, Some(TransformId(1)));

    // The floor comes last.
    let floor = &scene.objects[4];
    assert_eq!(floor.material, Some(FLOOR_MATERIAL));
    assert_eq!(floor.shading, ShadingKind::Untextured);
    assert_eq!(floor.transform, Some(TransformId(4)));
}

#[test]
fn two_by_two_single_geometry_single_color() {
    const S: u32 = 12345;
    let tables = Tables::single();
    let scene = populate(&layout(2, 2), &tables.palette(), &mut CrtRand::new(S)).unwrap();

    assert_eq!(scene.objects.len(), 5);
    assert_eq!(scene.placements.len(), 4);
    for object in &scene.objects[..4] {
        assert_eq!(object.geometry, Some(GeometryId(0)));
        assert_eq!(object.material, Some(MaterialId(0)));
        assert_eq!(object.shading, ShadingKind::Untextured);
        assert_eq!(object.texture, None);
    }

    // Only the rotations vary: three draws per cell, the middle one turns it.
    let mut rng = CrtRand::new(S);
    let expected = [
        ((0, 0), Vector3::new(-0.5, 0.0, -0.5)),
        ((0, 1), Vector3::new(-0.5, 0.0, 0.5)),
        ((1, 0), Vector3::new(0.5, 0.0, -0.5)),
        ((1, 1), Vector3::new(0.5, 0.0, 0.5)),
    ];
    for (placement, (cell, translation)) in scene.placements.iter().zip(expected) {
        rng.next_raw();
        let rotation = rng.next_unit() * TAU;
        rng.next_raw();
        assert_eq!(placement.cell, cell);
        assert!(close(placement.translation, translation));
        assert_eq!(placement.geometry, 0);
        assert_eq!(placement.choice, MaterialChoice::Color(0));
        assert_eq!(placement.rotation, rotation);
    }

    let floor = &scene.objects[4];
    assert_eq!(floor.material, Some(FLOOR_MATERIAL));
    assert_eq!(floor.transform, Some(TransformId(4)));
    assert_eq!(scene.glass.geometry, GLASS_GEOMETRY);
    assert_eq!(scene.glass.transform, TransformId(5));
    assert_eq!(scene.transforms.len(), 6);
}

#[test]
fn transform_applies_rest_pose_then_rotation_then_translation() {
    let tables = Tables::demo();
    // Quarter turn on the single cell.
    let mut rng = ScriptedRng::new(&[0, 0], &[0.25]);
    let scene = populate(&layout(1, 1), &tables.palette(), &mut rng).unwrap();

    let m = scene.transform(TransformId(0)).unwrap();
    // The rest pose lifts by one; the rotation about y leaves that alone.
    let origin = m.transform_point(Point3::new(0.0, 0.0, 0.0));
    assert!((origin.x + 0.5).abs() < 1e-5);
    assert!((origin.y - 1.0).abs() < 1e-5);
    assert!((origin.z + 0.5).abs() < 1e-5);
    // +x turns into -z.
    let x_axis = m.transform_vector(Vector3::unit_x());
    assert!(close(x_axis, Vector3::new(0.0, 0.0, -1.0)));
}

#[test]
fn floor_and_glass_transforms() {
    let tables = Tables::demo();
    let grid = DemoConfig::default().grid;
    let scene = populate(&grid, &tables.palette(), &mut CrtRand::new(1)).unwrap();

    let floor = scene.transforms[121];
    // Unit cube corner maps to the grid extent plus the margin.
    let corner = floor * Vector4::new(1.0, 1.0, 1.0, 1.0);
    assert!((corner.x - (3.5 * 11.0 / 2.0 + 5.0)).abs() < 1e-4);
    assert!(corner.y.abs() < 1e-6);

    assert_eq!(scene.glass.transform, TransformId(122));
    assert_eq!(scene.glass.geometry, GLASS_GEOMETRY);
    assert_eq!(scene.glass.material, GLASS_MATERIAL);
    let glass: Matrix4<f32> = scene.transforms[122];
    assert_eq!(glass, GlassSpec::transform());
}
