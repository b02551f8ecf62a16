use crate::resources::roomlayout::EYE_HEIGHT;
use bevy_ecs::prelude::*;
use glam::Vec3;

/// Camera position and view direction, owned by the host.
///
/// The core reads it for targeting and pursuit, and writes `position` only
/// when placing the player at a room's start point.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, EYE_HEIGHT, 0.0),
            forward: Vec3::NEG_Z,
        }
    }
}

impl PlayerView {
    /// Points the view at `target`.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir != Vec3::ZERO {
            self.forward = dir;
        }
    }
}
