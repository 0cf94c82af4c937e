//! Follow camera and viewport
//!
//! Camera hovers above and behind the thief with a slight downward pitch,
//! tracking the player's clamped position every frame.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::consts::*;

/// Drawable surface size in physical pixels, never zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Zero-sized dimensions are clamped to one pixel
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Physical size from CSS size and device pixel ratio (capped at `max_dpr`)
    pub fn from_css(css_width: f64, css_height: f64, dpr: f64, max_dpr: f64) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr.min(max_dpr) } else { 1.0 };
        let w = (css_width.max(0.0) * dpr).round() as u32;
        let h = (css_height.max(0.0) * dpr).round() as u32;
        Self::new(w, h)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Perspective camera that follows the player
#[derive(Debug, Clone)]
pub struct FollowCamera {
    /// Vertical field of view in radians
    fov: f32,
    near: f32,
    far: f32,
    /// Rotation about X (negative looks down)
    pitch: f32,
    /// Position relative to the player
    offset: Vec3,
    aspect: f32,
    position: Vec3,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FollowCamera {
    pub fn new() -> Self {
        let offset = Vec3::new(0.0, CAMERA_HEIGHT, CAMERA_DISTANCE);
        Self {
            fov: CAMERA_FOV_DEG.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            pitch: CAMERA_PITCH,
            offset,
            aspect: 1.0,
            position: offset,
        }
    }

    /// Track a ground-plane player position
    pub fn follow(&mut self, player: Vec2) {
        self.position = Vec3::new(player.x, 0.0, player.y) + self.offset;
    }

    /// Update the projection for a new surface size
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_x(self.pitch), self.position).inverse()
    }

    /// Depth range 0..1 as wgpu expects
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
