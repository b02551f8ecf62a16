//! World-space placement and hit volumes.
//!
//! [`WorldPosition`] is the center of an entity in world space. [`Extent`]
//! gives the half sizes of its axis-aligned hit box, used both by the
//! centerscreen raycast and by door collision.
use bevy_ecs::prelude::Component;
use glam::Vec3;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPosition {
    pub pos: Vec3,
}

impl WorldPosition {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            pos: Vec3::new(x, y, z),
        }
    }
}

/// Axis-aligned half sizes of an entity's hit box.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub half: Vec3,
}

impl Extent {
    pub fn new(hx: f32, hy: f32, hz: f32) -> Self {
        Self {
            half: Vec3::new(hx, hy, hz),
        }
    }

    /// Cube hit box with the same half size on every axis.
    pub fn cube(half: f32) -> Self {
        Self {
            half: Vec3::splat(half),
        }
    }

    /// Half sizes after a quarter-turn yaw (x and z swap).
    pub fn turned(&self) -> Self {
        Self {
            half: Vec3::new(self.half.z, self.half.y, self.half.x),
        }
    }

    /// Returns the minimum and maximum corners of the box centered on `center`.
    pub fn aabb(&self, center: Vec3) -> (Vec3, Vec3) {
        (center - self.half, center + self.half)
    }

    /// Whether this box centered on `center` overlaps `other` centered on `other_center`.
    pub fn intersects(&self, center: Vec3, other: &Extent, other_center: Vec3) -> bool {
        let (a_min, a_max) = self.aabb(center);
        let (b_min, b_max) = other.aabb(other_center);
        a_min.x <= b_max.x
            && a_max.x >= b_min.x
            && a_min.y <= b_max.y
            && a_max.y >= b_min.y
            && a_min.z <= b_max.z
            && a_max.z >= b_min.z
    }

    /// Distance along the ray to the first intersection with the box, if any.
    ///
    /// `dir` must be normalized. Uses the slab method; an origin inside the
    /// box reports distance 0.
    pub fn ray_distance(&self, center: Vec3, origin: Vec3, dir: Vec3) -> Option<f32> {
        let (min, max) = self.aabb(center);
        let mut t_near = 0.0_f32;
        let mut t_far = f32::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            if d.abs() < f32::EPSILON {
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv;
            let mut t1 = (max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }
        Some(t_near)
    }
}
