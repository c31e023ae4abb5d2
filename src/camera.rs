use crate::constants::*;
use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

/// Camera that circles the cake on the XZ plane, always looking at the origin.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub angle: f32,
    pub distance: f32,
    pub height: f32,
    pub aspect: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            angle: 0.0,
            distance: CAMERA_DISTANCE,
            height: CAMERA_HEIGHT,
            aspect: 16.0 / 9.0,
        }
    }
}

impl OrbitCamera {
    /// Advance the auto-rotation by `dt_sec` at `speed` (1.0 = one orbit per
    /// `ORBIT_PERIOD_SEC`).
    pub fn advance(&mut self, dt_sec: f32, speed: f32) {
        self.angle = (self.angle + dt_sec * speed * TAU / ORBIT_PERIOD_SEC).rem_euclid(TAU);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.angle.sin(),
            self.height,
            self.distance * self.angle.cos(),
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            CAMERA_FOVY_DEG.to_radians(),
            self.aspect,
            CAMERA_ZNEAR,
            CAMERA_ZFAR,
        )
    }
}
