use crate::data_structures::texture;

/**
 * This module contains all logic for loading shaders, textures and meshes
 * from the `assets/` directory, plus the built-in procedural shapes.
 */
pub mod mesh;
pub mod shapes;

/// `./assets/<file>` when present, otherwise the copy the build script put
/// into `OUT_DIR`.
fn asset_path(file_name: &str) -> std::path::PathBuf {
    let local = std::path::Path::new("./").join("assets").join(file_name);
    if local.exists() {
        return local;
    }
    std::path::Path::new(env!("OUT_DIR"))
        .join("assets")
        .join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    let path = asset_path(file_name);
    let txt = tokio::fs::read_to_string(&path).await?;
    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(file_name);
    let data = tokio::fs::read(&path).await?;
    Ok(data)
}

pub async fn load_texture(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    use anyhow::Context;

    let data = load_binary(file_name)
        .await
        .with_context(|| format!("texture {file_name} could not be read"))?;
    let format = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str());
    texture::Texture::from_bytes(device, queue, &data, file_name, format)
        .with_context(|| format!("texture {file_name} could not be decoded"))
}
