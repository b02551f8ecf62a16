//! Emissive appearance of an entity.
//!
//! The core never draws anything; it only tells the renderer how bright each
//! entity glows. Flashes, highlights and the door's unlocked glow are all
//! expressed as writes to [`Emissive`].
use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Emissive {
    /// RGB color packed as `0xRRGGBB`.
    pub color: u32,
    pub intensity: f32,
}

impl Emissive {
    pub const OFF: Emissive = Emissive {
        color: 0x000000,
        intensity: 0.0,
    };

    /// Override applied to the targeted entity.
    pub const HIGHLIGHT: Emissive = Emissive {
        color: 0x444444,
        intensity: 0.5,
    };

    pub fn new(color: u32, intensity: f32) -> Self {
        Self { color, intensity }
    }
}
