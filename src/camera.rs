//! Orbit camera, projection and the camera uniform.
//!
//! The camera circles a fixed centre. Dragging with the left mouse button
//! changes direction and elevation, dragging with the right one changes the
//! distance.

use cgmath::{Matrix4, Point3, Rad, Vector3, perspective};
use winit::event::{ElementState, MouseButton, WindowEvent};

/// Elevation stays just short of the poles so `look_at` keeps a stable up vector.
const MAX_ELEVATION: f32 = 1.5;
const MIN_DISTANCE: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub center: Point3<f32>,
    /// Angle around the y axis in radians.
    pub angle_direction: f32,
    /// Pitch of the view direction in radians. Negative values look down on
    /// the centre from above.
    pub angle_elevation: f32,
    pub distance: f32,
}

impl Camera {
    pub fn new(center: Point3<f32>, angle_direction: f32, angle_elevation: f32, distance: f32) -> Self {
        Self {
            center,
            angle_direction,
            angle_elevation: angle_elevation.clamp(-MAX_ELEVATION, MAX_ELEVATION),
            distance: distance.max(MIN_DISTANCE),
        }
    }

    pub fn eye_position(&self) -> Point3<f32> {
        let (sin_e, cos_e) = self.angle_elevation.sin_cos();
        let (sin_d, cos_d) = self.angle_direction.sin_cos();
        self.center
            + Vector3::new(cos_e * sin_d, -sin_e, cos_e * cos_d) * self.distance
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye_position(), self.center, Vector3::unit_y())
    }

    pub fn rotate(&mut self, d_direction: f32, d_elevation: f32) {
        self.angle_direction += d_direction;
        self.angle_elevation =
            (self.angle_elevation + d_elevation).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    pub fn zoom(&mut self, d_distance: f32) {
        self.distance = (self.distance + d_distance).max(MIN_DISTANCE);
    }
}

/// wgpu's clip space has z in 0..1 while cgmath produces OpenGL's -1..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    eye_position: [f32; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            projection: Matrix4::identity().into(),
            view: Matrix4::identity().into(),
            eye_position: [0.0; 4],
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.eye_position = camera.eye_position().to_homogeneous().into();
        self.view = camera.calc_matrix().into();
        self.projection = projection.calc_matrix().into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns mouse drags into orbit and zoom changes.
#[derive(Debug)]
pub struct CameraController {
    /// Radians per pixel of drag.
    rotate_speed: f32,
    /// Distance units per pixel of drag.
    zoom_speed: f32,
    dragging: Option<MouseButton>,
    last_cursor: Option<(f64, f64)>,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            dragging: None,
            last_cursor: None,
        }
    }

    pub fn handle_window_events(&mut self, camera: &mut Camera, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.dragging = Some(*button),
                ElementState::Released if self.dragging == Some(*button) => self.dragging = None,
                ElementState::Released => (),
            },
            WindowEvent::CursorMoved { position, .. } => {
                let current = (position.x, position.y);
                if let (Some(button), Some(last)) = (self.dragging, self.last_cursor) {
                    let dx = (current.0 - last.0) as f32;
                    let dy = (current.1 - last.1) as f32;
                    match button {
                        MouseButton::Left => {
                            camera.rotate(-dx * self.rotate_speed, -dy * self.rotate_speed)
                        }
                        MouseButton::Right => camera.zoom(dy * self.zoom_speed),
                        _ => (),
                    }
                }
                self.last_cursor = Some(current);
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_cursor = None;
                self.dragging = None;
            }
            _ => (),
        }
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: CameraController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
}
