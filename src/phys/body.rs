//! Rigid bodies
//!
//! A body is position, velocity, angle and mass. Shapes hang off bodies by ID;
//! the `World` owns both collections.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{rotate, rotation_vector};

/// Stable handle for a body in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// How a body participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Moved by gravity and collision impulses
    Dynamic,
    /// Velocity set externally, unaffected by forces, still collides
    Kinematic,
    /// Never moves, infinite mass
    Static,
}

/// A rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    pub id: BodyId,
    pub kind: BodyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Orientation in radians
    pub angle: f32,
    /// Angular velocity in rad/s
    pub angular_vel: f32,
    pub mass: f32,
    /// Moment of inertia about the body origin
    pub moment: f32,
}

impl RigidBody {
    /// Dynamic body with the given mass and moment
    pub fn dynamic(id: BodyId, mass: f32, moment: f32) -> Self {
        Self {
            id,
            kind: BodyKind::Dynamic,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            mass,
            moment,
        }
    }

    /// Kinematic body (infinite effective mass)
    pub fn kinematic(id: BodyId) -> Self {
        Self {
            id,
            kind: BodyKind::Kinematic,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            mass: f32::INFINITY,
            moment: f32::INFINITY,
        }
    }

    /// Static body (never moves)
    pub fn fixed(id: BodyId) -> Self {
        Self {
            kind: BodyKind::Static,
            ..Self::kinematic(id)
        }
    }

    /// Inverse mass; zero for static and kinematic bodies so collision
    /// resolution never imparts impulses to them
    #[inline]
    pub fn inv_mass(&self) -> f32 {
        match self.kind {
            BodyKind::Dynamic => 1.0 / self.mass,
            BodyKind::Kinematic | BodyKind::Static => 0.0,
        }
    }

    /// Inverse moment of inertia; zero unless dynamic
    #[inline]
    pub fn inv_moment(&self) -> f32 {
        match self.kind {
            BodyKind::Dynamic => 1.0 / self.moment,
            BodyKind::Kinematic | BodyKind::Static => 0.0,
        }
    }

    /// The body's local +x axis in world space
    #[inline]
    pub fn rotation_vector(&self) -> Vec2 {
        rotation_vector(self.angle)
    }

    /// Transform a body-local point into world space
    #[inline]
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.pos + rotate(local, self.angle)
    }

    /// Velocity of the point `world_point` as carried by this body
    /// (translational velocity plus ω × r)
    #[inline]
    pub fn velocity_at(&self, world_point: Vec2) -> Vec2 {
        let r = world_point - self.pos;
        self.vel + self.angular_vel * crate::perp(r)
    }
}
