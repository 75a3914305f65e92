//! Straight-line navigation over a rectangular walkable region.
//!
//! Stands in for a navmesh: the walkable surface is the square
//! `[-half_extent, half_extent]` on the XZ plane at y = 0, paths are straight
//! lines, and destinations off the region resolve to the nearest point on it.

use glam::Vec3;

use bulwark_core::collaborators::NavAgent;

/// The walkable region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavRegion {
    pub half_extent: f32,
}

impl NavRegion {
    /// Nearest walkable point, on the ground.
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        let h = self.half_extent;
        Vec3::new(point.x.clamp(-h, h), 0.0, point.z.clamp(-h, h))
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x.abs() <= self.half_extent && point.z.abs() <= self.half_extent
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimNav {
    region: NavRegion,
    /// Position on the walkable surface.
    ground: Vec3,
    destination: Vec3,
    speed: f32,
    stopping_distance: f32,
    /// Height of the agent's centre above the surface.
    base_offset: f32,
    enabled: bool,
    obstacle: bool,
}

impl SimNav {
    pub fn new(
        region: NavRegion,
        position: Vec3,
        speed: f32,
        stopping_distance: f32,
        base_offset: f32,
    ) -> Self {
        let ground = region.clamp(position);
        Self {
            region,
            ground,
            destination: ground,
            speed,
            stopping_distance,
            base_offset,
            enabled: false,
            obstacle: false,
        }
    }

    fn target(&self) -> Vec3 {
        self.region.clamp(self.destination)
    }

    /// Walk one step toward the destination.
    pub fn advance(&mut self, dt: f32) {
        if !self.enabled || self.obstacle {
            return;
        }
        let offset = self.target() - self.ground;
        let distance = offset.length();
        if distance <= self.stopping_distance {
            return;
        }
        self.ground += offset / distance * (self.speed * dt).min(distance);
    }
}

impl NavAgent for SimNav {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_obstacle_mode(&mut self, enabled: bool) {
        self.obstacle = enabled;
    }

    fn warp(&mut self, position: Vec3) {
        self.ground = self.region.clamp(position);
    }

    fn destination(&self) -> Vec3 {
        self.destination
    }

    fn set_destination(&mut self, destination: Vec3) {
        self.destination = destination;
    }

    fn remaining_distance(&self) -> f32 {
        self.ground.distance(self.target())
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn has_path(&self) -> bool {
        self.enabled && self.remaining_distance() > self.stopping_distance
    }

    fn path_pending(&self) -> bool {
        false
    }

    fn next_position(&self) -> Vec3 {
        self.ground + Vec3::Y * self.base_offset
    }

    fn sample_position(&self, near: Vec3, max_distance: f32) -> Option<Vec3> {
        let point = self.region.clamp(near);
        (point.distance(near) <= max_distance).then_some(point)
    }
}
