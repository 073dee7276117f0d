//! Engine data structures: meshes, materials, transforms and textures.
//!
//! - `model` contains the vertex layout and GPU meshes
//! - `material` holds Phong material parameters and their uniform buffers
//! - `transform` holds per-object model matrices and their uniform buffers
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod material;
pub mod model;
pub mod texture;
pub mod transform;
