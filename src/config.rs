//! Constants of the demo scene, gathered in one place.

use std::time::Duration;

use crate::scene::populate::GridLayout;

#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub center: [f32; 3],
    pub angle_direction: f32,
    pub angle_elevation: f32,
    pub distance: f32,
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Radians per pixel of left drag.
    pub rotate_speed: f32,
    /// Distance units per pixel of right drag.
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            center: [0.0, 1.0, 0.0],
            angle_direction: 1.25,
            angle_elevation: -0.5,
            distance: 40.0,
            fovy_degrees: 45.0,
            znear: 0.5,
            zfar: 1000.0,
            rotate_speed: 0.01,
            zoom_speed: 0.1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub title: String,
    pub grid: GridLayout,
    pub seed: u32,
    /// Asset paths relative to `assets/`, in texture table order.
    pub textures: Vec<String>,
    pub teapot: String,
    /// Interval between redraw requests.
    pub tick: Duration,
    pub clear_color: wgpu::Color,
    pub camera: CameraConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Phong scene".to_string(),
            grid: GridLayout {
                width: 11,
                height: 11,
                x_start: -18.0,
                z_start: -18.0,
                spacing_x: 3.5,
                spacing_z: 3.5,
            },
            seed: 12345,
            textures: vec!["textures/wood.png".to_string(), "textures/checker.png".to_string()],
            teapot: "models/teapot.obj".to_string(),
            tick: Duration::from_millis(20),
            clear_color: wgpu::Color::BLACK,
            camera: CameraConfig::default(),
        }
    }
}
