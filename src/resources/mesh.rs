use std::io::{BufReader, Cursor};

use cgmath::{InnerSpace, Vector3, Zero};

use crate::{
    data_structures::model::{MeshData, ModelVertex},
    resources::load_string,
};

/**
 * Loads every object of an .obj file into one mesh. Materials referenced by
 * the file are ignored: the scene assigns its own.
 *
 * Files without normals get smooth per-vertex normals averaged from the
 * adjacent faces.
 */
pub async fn load_obj_mesh(file_name: &str) -> anyhow::Result<MeshData> {
    let obj_text = load_string(file_name).await?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, _) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| async move { Err(tobj::LoadError::OpenFileFailed) },
    )
    .await?;

    Ok(merge_models(&models))
}

pub fn merge_models(models: &[tobj::Model]) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for m in models {
        let base = vertices.len() as u32;
        let has_normals = !m.mesh.normals.is_empty();
        let mut mesh_vertices = (0..m.mesh.positions.len() / 3)
            .map(|i| {
                ModelVertex::new(
                    [
                        m.mesh.positions[i * 3],
                        m.mesh.positions[i * 3 + 1],
                        m.mesh.positions[i * 3 + 2],
                    ],
                    [
                        m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                    ],
                    [
                        m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                        1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                    ],
                )
            })
            .collect::<Vec<_>>();
        if !has_normals {
            smooth_normals(&mut mesh_vertices, &m.mesh.indices);
        }
        vertices.extend(mesh_vertices);
        indices.extend(m.mesh.indices.iter().map(|i| base + i));
    }
    MeshData::indexed(vertices, indices)
}

/// Area-weighted average of the face normals around each vertex.
pub fn smooth_normals(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut sums = vec![Vector3::zero(); vertices.len()];
    for c in indices.chunks(3) {
        if c.len() < 3 {
            continue;
        }
        let p0: Vector3<f32> = vertices[c[0] as usize].position.into();
        let p1: Vector3<f32> = vertices[c[1] as usize].position.into();
        let p2: Vector3<f32> = vertices[c[2] as usize].position.into();
        // Unnormalized cross product: its length is twice the face area
        let face = (p1 - p0).cross(p2 - p0);
        for &i in c {
            sums[i as usize] += face;
        }
    }
    for (vertex, sum) in vertices.iter_mut().zip(sums) {
        if sum.magnitude2() > 0.0 {
            vertex.normal = sum.normalize().into();
        }
    }
}
