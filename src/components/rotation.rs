use bevy_ecs::prelude::Component;

/// Orientation in radians. `yaw` turns around the vertical axis.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Rotation {
    pub fn from_yaw(yaw: f32) -> Self {
        Self { yaw, pitch: 0.0 }
    }
}
