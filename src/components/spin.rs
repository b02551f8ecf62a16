use bevy_ecs::prelude::Component;

/// Continuous rotation, in radians per second.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Spin {
    pub yaw_rate: f32,
    pub pitch_rate: f32,
}

/// Vertical bobbing around a base height.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Bob {
    pub base_y: f32,
    pub amplitude: f32,
    /// Angular frequency in radians per second.
    pub frequency: f32,
    pub phase: f32,
}

impl Bob {
    pub fn height_at(&self, elapsed: f32) -> f32 {
        self.base_y + (elapsed * self.frequency + self.phase).sin() * self.amplitude
    }
}
