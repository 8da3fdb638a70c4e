//! Collision shapes and materials
//!
//! A shape attaches geometry and surface material to exactly one body.
//! Geometry is expressed in body-local coordinates; world-space queries go
//! through the owning body's transform.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BodyId, RigidBody};

/// Stable handle for a shape in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub u32);

/// Classification label used to select a collision dispatch handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionCategory {
    Ball,
    Flipper,
    Wall,
    Alien,
    Launcher,
}

/// Shape geometry in body-local space
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Geometry {
    /// Circle of `radius` centered at `offset` from the body origin
    Circle { radius: f32, offset: Vec2 },
    /// Thick line segment from `a` to `b`
    Segment { a: Vec2, b: Vec2, thickness: f32 },
}

/// A collision shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    /// Owning body; must be present in the world before the shape is added
    pub body: BodyId,
    pub geometry: Geometry,
    /// Bounce in [0, 1]; combined multiplicatively across a contact pair
    pub elasticity: f32,
    /// Surface friction, >= 0; combined multiplicatively
    pub friction: f32,
    pub category: CollisionCategory,
}

impl Shape {
    pub fn circle(id: ShapeId, body: BodyId, radius: f32, category: CollisionCategory) -> Self {
        Self {
            id,
            body,
            geometry: Geometry::Circle {
                radius,
                offset: Vec2::ZERO,
            },
            elasticity: 0.5,
            friction: 0.5,
            category,
        }
    }

    pub fn segment(
        id: ShapeId,
        body: BodyId,
        a: Vec2,
        b: Vec2,
        thickness: f32,
        category: CollisionCategory,
    ) -> Self {
        Self {
            id,
            body,
            geometry: Geometry::Segment { a, b, thickness },
            elasticity: 0.5,
            friction: 0.5,
            category,
        }
    }

    pub fn with_material(mut self, elasticity: f32, friction: f32) -> Self {
        self.elasticity = elasticity;
        self.friction = friction;
        self
    }

    /// Circle center in world space (circle shapes only)
    pub fn world_circle(&self, body: &RigidBody) -> Option<(Vec2, f32)> {
        match self.geometry {
            Geometry::Circle { radius, offset } => Some((body.local_to_world(offset), radius)),
            Geometry::Segment { .. } => None,
        }
    }

    /// Segment endpoints and half-thickness in world space (segment shapes only)
    pub fn world_segment(&self, body: &RigidBody) -> Option<(Vec2, Vec2, f32)> {
        match self.geometry {
            Geometry::Segment { a, b, thickness } => {
                Some((body.local_to_world(a), body.local_to_world(b), thickness))
            }
            Geometry::Circle { .. } => None,
        }
    }
}

/// Moment of inertia for a solid disc of `mass` and `radius` about its center
#[inline]
pub fn moment_for_circle(mass: f32, radius: f32) -> f32 {
    0.5 * mass * radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phys::body::RigidBody;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_world_segment_follows_body_angle() {
        let mut body = RigidBody::kinematic(BodyId(0));
        body.pos = Vec2::new(300.0, 550.0);
        body.angle = FRAC_PI_2;

        let shape = Shape::segment(
            ShapeId(0),
            BodyId(0),
            Vec2::ZERO,
            Vec2::new(80.0, 0.0),
            10.0,
            CollisionCategory::Flipper,
        );

        let (a, b, r) = shape.world_segment(&body).unwrap();
        assert!((a - body.pos).length() < 1e-4);
        // Tip rotated 90°: local (80, 0) -> world offset (0, 80)
        assert!((b.x - 300.0).abs() < 1e-3);
        assert!((b.y - 630.0).abs() < 1e-3);
        assert_eq!(r, 10.0);
    }

    #[test]
    fn test_moment_for_circle() {
        // Solid disc: m r² / 2
        assert!((moment_for_circle(1.0, 10.0) - 50.0).abs() < 1e-6);
    }
}
