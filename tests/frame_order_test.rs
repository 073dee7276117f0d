mod common;

use common::test_utils::{Call, Programs, RecordingTarget, ScriptedRng, Tables};
use phong_scene::{
    render::{FrameStats, render_frame},
    scene::{
        GeometryId, GlassObject, MaterialId, Scene, SceneObject, ShadingKind, TextureId,
        TransformId, populate::GridLayout, populate::populate,
    },
};

fn object(geometry: usize, shading: ShadingKind, texture: Option<usize>) -> SceneObject {
    SceneObject {
        geometry: Some(GeometryId(geometry)),
        shading,
        material: Some(MaterialId(geometry)),
        transform: Some(TransformId(geometry)),
        texture: texture.map(TextureId),
    }
}

fn scene(objects: Vec<SceneObject>) -> Scene {
    Scene {
        objects,
        glass: GlassObject {
            geometry: GeometryId(99),
            material: MaterialId(98),
            transform: TransformId(97),
        },
        transforms: Vec::new(),
        placements: Vec::new(),
    }
}

fn mixed_scene() -> Scene {
    scene(vec![
        object(0, ShadingKind::Untextured, None),
        object(1, ShadingKind::Textured, Some(0)),
        object(2, ShadingKind::Untextured, None),
        object(3, ShadingKind::Textured, Some(1)),
    ])
}

#[test]
fn opaque_objects_draw_in_insertion_order_then_glass() {
    let scene = mixed_scene();
    let mut target = RecordingTarget::default();
    let stats = render_frame(&scene, &Programs::READY, &mut target);

    assert_eq!(
        stats,
        FrameStats {
            drawn: 4,
            skipped: 0,
            glass_drawn: true,
        }
    );
    assert_eq!(
        target.draws(),
        vec![
            GeometryId(0),
            GeometryId(1),
            GeometryId(2),
            GeometryId(3),
            GeometryId(99)
        ]
    );
    assert_eq!(target.blended_draws, vec![GeometryId(99)]);
}

#[test]
fn each_opaque_object_binds_its_own_state() {
    let scene = scene(vec![object(1, ShadingKind::Textured, Some(0))]);
    let mut target = RecordingTarget::default();
    render_frame(&scene, &Programs::READY, &mut target);

    assert_eq!(
        &target.calls[..5],
        &[
            Call::UseProgram(ShadingKind::Textured),
            Call::BindMaterial(MaterialId(1)),
            Call::BindTransform(TransformId(1)),
            Call::BindTexture(Some(TextureId(0))),
            Call::Draw(GeometryId(1)),
        ]
    );
}

#[test]
fn glass_pass_sets_up_blending_around_its_draw() {
    let scene = scene(Vec::new());
    let mut target = RecordingTarget::default();
    render_frame(&scene, &Programs::READY, &mut target);

    assert_eq!(
        target.calls,
        vec![
            Call::BeginTransparent,
            Call::BindMaterial(MaterialId(98)),
            Call::BindTransform(TransformId(97)),
            Call::BindTexture(None),
            Call::UseProgram(ShadingKind::Untextured),
            Call::Draw(GeometryId(99)),
            Call::EndTransparent,
        ]
    );
    assert!(!target.transparent);
}

#[test]
fn objects_with_a_broken_program_are_skipped() {
    let scene = mixed_scene();
    let mut target = RecordingTarget::default();
    let programs = Programs {
        untextured: true,
        textured: false,
    };
    let stats = render_frame(&scene, &programs, &mut target);

    assert_eq!(stats.drawn, 2);
    assert_eq!(stats.skipped, 2);
    assert!(stats.glass_drawn);
    assert_eq!(
        target.draws(),
        vec![GeometryId(0), GeometryId(2), GeometryId(99)]
    );
    assert!(!target.calls.contains(&Call::UseProgram(ShadingKind::Textured)));
}

#[test]
fn no_glass_without_the_untextured_program() {
    let scene = mixed_scene();
    let mut target = RecordingTarget::default();
    let programs = Programs {
        untextured: false,
        textured: true,
    };
    let stats = render_frame(&scene, &programs, &mut target);

    assert!(!stats.glass_drawn);
    assert_eq!(target.draws(), vec![GeometryId(1), GeometryId(3)]);
    assert!(!target.calls.contains(&Call::BeginTransparent));
    assert!(target.blended_draws.is_empty());
}

#[test]
fn missing_references_are_not_bound() {
    let bare = SceneObject {
        geometry: None,
        shading: ShadingKind::Untextured,
        material: None,
        transform: None,
        texture: None,
    };
    let scene = scene(vec![bare]);
    let mut target = RecordingTarget::default();
    let stats = render_frame(&scene, &Programs::READY, &mut target);

    assert_eq!(stats.drawn, 0);
    assert_eq!(stats.skipped, 0);
    assert_eq!(
        &target.calls[..2],
        &[
            Call::UseProgram(ShadingKind::Untextured),
            Call::BindTexture(None),
        ]
    );
    assert_eq!(target.calls[2], Call::BeginTransparent);
}

#[test]
fn populated_scene_draws_glass_last() {
    let tables = Tables::demo();
    let layout = GridLayout {
        width: 2,
        height: 2,
        x_start: -0.5,
        z_start: -0.5,
        spacing_x: 1.0,
        spacing_z: 1.0,
    };
    let mut rng = ScriptedRng::new(&[0, 2, 1, 6, 2, 7, 5, 8], &[0.0; 4]);
    let scene = populate(&layout, &tables.palette(), &mut rng).unwrap();

    let mut target = RecordingTarget::default();
    let stats = render_frame(&scene, &Programs::READY, &mut target);

    // The fourth cell picked the geometry without a mesh.
    assert_eq!(stats.drawn, 4);
    let draws = target.draws();
    assert_eq!(draws.last(), Some(&scene.glass.geometry));
    assert_eq!(target.blended_draws, vec![scene.glass.geometry]);
    // The floor is the last opaque draw.
    assert_eq!(draws[draws.len() - 2], GeometryId(0));
    let begin = target
        .calls
        .iter()
        .position(|c| *c == Call::BeginTransparent)
        .unwrap();
    assert!(target.calls[..begin].iter().all(|c| *c != Call::Draw(scene.glass.geometry)));
}
