//! phong-scene
//!
//! A fixed demo scene rendered with Blinn-Phong shading: a seeded grid of
//! primitives (cubes, spheres, tori, cylinders, capsules and an optional
//! teapot) in plain colors or textures, standing on a floor, with a
//! translucent glass pane composited over them in a separate pass.
//!
//! High-level modules
//! - `scene`: plain-data scene description, the seeded populator and the GPU tables
//! - `render`: per-frame draw ordering behind the `DrawTarget` seam
//! - `pipelines`: bind group layouts, opaque and glass pipelines, shader reload
//! - `data_structures`: meshes, materials, transforms and textures
//! - `resources`: asset loading and the built-in procedural shapes
//! - `camera`: orbit camera, projection and its uniform
//! - `context`: device, surface and per-frame uniforms
//! - `flow`: the winit event loop
//! - `timing`, `tweaks`, `config`: render timing, keyboard tweaks and constants
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod timing;
pub mod tweaks;

pub use flow::{run, run_with};
