//! The physics world
//!
//! Owns every body, shape and joint, and advances them one fixed timestep at
//! a time. `step` is deterministic: identical state and dt produce
//! bit-identical results, so the game can be replayed and unit-tested from
//! recorded inputs.

use std::fmt;

use glam::Vec2;

use super::body::{BodyId, BodyKind, RigidBody};
use super::contact::{Contact, apply_impulse, circle_circle, circle_segment};
use super::dispatch::{CollisionDispatcher, ContactAction};
use super::joint::{JointId, PivotJoint, RotaryLimitJoint};
use super::shape::{CollisionCategory, Geometry, Shape, ShapeId};

/// Setup-time configuration error. Never produced during stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// A shape or joint referenced a body not present in the world
    UnknownBody(BodyId),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::UnknownBody(id) => {
                write!(f, "body {} is not in the world (add the body first)", id.0)
            }
        }
    }
}

impl std::error::Error for WorldError {}

/// The simulation world
pub struct World {
    /// Constant acceleration applied to dynamic bodies every step
    pub gravity: Vec2,
    bodies: Vec<RigidBody>,
    shapes: Vec<Shape>,
    pivots: Vec<PivotJoint>,
    rotary_limits: Vec<RotaryLimitJoint>,
    next_body: u32,
    next_shape: u32,
    next_joint: u32,
}

impl World {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            shapes: Vec::new(),
            pivots: Vec::new(),
            rotary_limits: Vec::new(),
            next_body: 0,
            next_shape: 0,
            next_joint: 0,
        }
    }

    fn alloc_body(&mut self) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body += 1;
        id
    }

    /// Add a dynamic body at `pos` with the given mass and moment of inertia
    pub fn add_dynamic_body(&mut self, pos: Vec2, mass: f32, moment: f32) -> BodyId {
        let id = self.alloc_body();
        let mut body = RigidBody::dynamic(id, mass, moment);
        body.pos = pos;
        self.bodies.push(body);
        id
    }

    /// Add a kinematic body at `pos` (externally driven velocity, infinite
    /// mass)
    pub fn add_kinematic_body(&mut self, pos: Vec2) -> BodyId {
        let id = self.alloc_body();
        let mut body = RigidBody::kinematic(id);
        body.pos = pos;
        self.bodies.push(body);
        id
    }

    /// Add a static body at `pos`
    pub fn add_static_body(&mut self, pos: Vec2) -> BodyId {
        let id = self.alloc_body();
        let mut body = RigidBody::fixed(id);
        body.pos = pos;
        self.bodies.push(body);
        id
    }

    /// Attach a shape to `body`. The body must already be in the world.
    pub fn add_shape(
        &mut self,
        body: BodyId,
        geometry: Geometry,
        elasticity: f32,
        friction: f32,
        category: CollisionCategory,
    ) -> Result<ShapeId, WorldError> {
        if self.body(body).is_none() {
            return Err(WorldError::UnknownBody(body));
        }
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        self.shapes.push(Shape {
            id,
            body,
            geometry,
            elasticity,
            friction,
            category,
        });
        Ok(id)
    }

    /// Pin a local point on each body to coincide
    pub fn add_pivot(
        &mut self,
        body_a: BodyId,
        body_b: BodyId,
        anchor_a: Vec2,
        anchor_b: Vec2,
    ) -> Result<JointId, WorldError> {
        self.check_pair(body_a, body_b)?;
        let id = JointId(self.next_joint);
        self.next_joint += 1;
        self.pivots.push(PivotJoint {
            id,
            body_a,
            body_b,
            anchor_a,
            anchor_b,
        });
        Ok(id)
    }

    /// Bound the relative angle `angle_b - angle_a` to `[min, max]`
    pub fn add_rotary_limit(
        &mut self,
        body_a: BodyId,
        body_b: BodyId,
        min: f32,
        max: f32,
    ) -> Result<JointId, WorldError> {
        self.check_pair(body_a, body_b)?;
        let id = JointId(self.next_joint);
        self.next_joint += 1;
        self.rotary_limits.push(RotaryLimitJoint {
            id,
            body_a,
            body_b,
            min,
            max,
        });
        Ok(id)
    }

    fn check_pair(&self, a: BodyId, b: BodyId) -> Result<(), WorldError> {
        if self.body(a).is_none() {
            return Err(WorldError::UnknownBody(a));
        }
        if self.body(b).is_none() {
            return Err(WorldError::UnknownBody(b));
        }
        Ok(())
    }

    /// Remove a shape. Removing an already-removed shape is a no-op.
    pub fn remove_shape(&mut self, id: ShapeId) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        self.shapes.len() != before
    }

    /// Remove a body along with its shapes and any joints referencing it.
    /// Removing an already-removed body is a no-op.
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.id != id);
        if self.bodies.len() == before {
            return false;
        }
        self.shapes.retain(|s| s.body != id);
        self.pivots.retain(|j| j.body_a != id && j.body_b != id);
        self.rotary_limits.retain(|j| j.body_a != id && j.body_b != id);
        true
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    /// Mutable references to two distinct bodies
    fn body_pair_mut(&mut self, a: BodyId, b: BodyId) -> Option<(&mut RigidBody, &mut RigidBody)> {
        let ia = self.bodies.iter().position(|body| body.id == a)?;
        let ib = self.bodies.iter().position(|body| body.id == b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.bodies.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.bodies.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    /// Advance the world by `dt`.
    ///
    /// Order per step: integrate velocities and positions, enforce joints,
    /// detect contacts (stable shape-id order), dispatch contact events,
    /// then resolve impulses for contacts the dispatcher did not suppress.
    pub fn step<C>(&mut self, dt: f32, dispatcher: &mut CollisionDispatcher<C>, ctx: &mut C) {
        // Integration
        for body in &mut self.bodies {
            match body.kind {
                BodyKind::Dynamic => {
                    body.vel += self.gravity * dt;
                    body.pos += body.vel * dt;
                    body.angle += body.angular_vel * dt;
                }
                BodyKind::Kinematic => {
                    body.pos += body.vel * dt;
                    body.angle += body.angular_vel * dt;
                }
                BodyKind::Static => {}
            }
        }

        // Constraints
        let pivots = std::mem::take(&mut self.pivots);
        for joint in &pivots {
            if let Some((a, b)) = self.body_pair_mut(joint.body_a, joint.body_b) {
                joint.solve(a, b);
            }
        }
        self.pivots = pivots;

        let limits = std::mem::take(&mut self.rotary_limits);
        for joint in &limits {
            if let Some((a, b)) = self.body_pair_mut(joint.body_a, joint.body_b) {
                joint.solve(a, b);
            }
        }
        self.rotary_limits = limits;

        // Narrow phase over shape pairs with at least one dynamic body,
        // in ascending (id, id) order for determinism
        let mut contacts: Vec<(ShapeId, ShapeId, Contact)> = Vec::new();
        for i in 0..self.shapes.len() {
            for j in (i + 1)..self.shapes.len() {
                let sa = &self.shapes[i];
                let sb = &self.shapes[j];
                if sa.body == sb.body {
                    continue;
                }
                let (Some(ba), Some(bb)) = (self.body(sa.body), self.body(sb.body)) else {
                    continue;
                };
                if ba.kind != BodyKind::Dynamic && bb.kind != BodyKind::Dynamic {
                    continue;
                }
                if let Some(contact) = shape_contact(sa, ba, sb, bb) {
                    contacts.push((sa.id, sb.id, contact));
                }
            }
        }

        // Dispatch, then resolve
        for (id_a, id_b, contact) in contacts {
            let (Some(sa), Some(sb)) = (self.shape(id_a), self.shape(id_b)) else {
                continue;
            };
            let action = dispatcher
                .dispatch(ctx, sa, sb)
                .unwrap_or(ContactAction::Resolve);
            if action == ContactAction::Suppress {
                continue;
            }

            let elasticity = sa.elasticity * sb.elasticity;
            let friction = sa.friction * sb.friction;
            let (body_a, body_b) = (sa.body, sb.body);
            if let Some((a, b)) = self.body_pair_mut(body_a, body_b) {
                apply_impulse(a, b, &contact, elasticity, friction);
            }
        }
    }
}

/// Contact between two shapes, if any. Normal points from A toward B.
/// Segment-segment pairs are not supported (no dynamic body in this game
/// carries a segment shape).
fn shape_contact(sa: &Shape, ba: &RigidBody, sb: &Shape, bb: &RigidBody) -> Option<Contact> {
    match (&sa.geometry, &sb.geometry) {
        (Geometry::Circle { .. }, Geometry::Circle { .. }) => {
            let (ca, ra) = sa.world_circle(ba)?;
            let (cb, rb) = sb.world_circle(bb)?;
            circle_circle(ca, ra, cb, rb)
        }
        (Geometry::Circle { .. }, Geometry::Segment { .. }) => {
            let (c, r) = sa.world_circle(ba)?;
            let (p0, p1, thickness) = sb.world_segment(bb)?;
            circle_segment(c, r, p0, p1, thickness)
        }
        (Geometry::Segment { .. }, Geometry::Circle { .. }) => {
            let (c, r) = sb.world_circle(bb)?;
            let (p0, p1, thickness) = sa.world_segment(ba)?;
            circle_segment(c, r, p0, p1, thickness).map(|mut contact| {
                contact.normal = -contact.normal;
                contact
            })
        }
        (Geometry::Segment { .. }, Geometry::Segment { .. }) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phys::shape::moment_for_circle;

    fn no_dispatch() -> CollisionDispatcher<()> {
        CollisionDispatcher::new()
    }

    #[test]
    fn test_add_shape_requires_body() {
        let mut world = World::new(Vec2::new(0.0, 300.0));
        let err = world.add_shape(
            BodyId(42),
            Geometry::Circle {
                radius: 10.0,
                offset: Vec2::ZERO,
            },
            0.95,
            0.9,
            CollisionCategory::Ball,
        );
        assert_eq!(err, Err(WorldError::UnknownBody(BodyId(42))));
    }

    #[test]
    fn test_gravity_only_affects_dynamic() {
        let mut world = World::new(Vec2::new(0.0, 300.0));
        let dynamic = world.add_dynamic_body(Vec2::ZERO, 1.0, moment_for_circle(1.0, 10.0));
        let kinematic = world.add_kinematic_body(Vec2::ZERO);
        let fixed = world.add_static_body(Vec2::ZERO);
        world.body_mut(kinematic).unwrap().vel = Vec2::new(10.0, 0.0);
        world.body_mut(fixed).unwrap().vel = Vec2::new(99.0, 99.0); // ignored

        let dt = 1.0 / 60.0;
        world.step(dt, &mut no_dispatch(), &mut ());

        // Dynamic: gravity pulls toward +y (downward in this world)
        let d = world.body(dynamic).unwrap();
        assert!((d.vel.y - 300.0 * dt).abs() < 1e-5);
        assert!(d.pos.y > 0.0);

        // Kinematic: position integrates its velocity, no gravity
        let k = world.body(kinematic).unwrap();
        assert!((k.pos.x - 10.0 * dt).abs() < 1e-5);
        assert_eq!(k.vel, Vec2::new(10.0, 0.0));

        // Static: never moves
        assert_eq!(world.body(fixed).unwrap().pos, Vec2::ZERO);
    }

    #[test]
    fn test_ball_bounces_off_static_wall() {
        let mut world = World::new(Vec2::ZERO);
        let ball = world.add_dynamic_body(Vec2::new(50.0, 88.0), 1.0, moment_for_circle(1.0, 10.0));
        world.body_mut(ball).unwrap().vel = Vec2::new(0.0, 120.0);
        world
            .add_shape(
                ball,
                Geometry::Circle {
                    radius: 10.0,
                    offset: Vec2::ZERO,
                },
                1.0,
                0.0,
                CollisionCategory::Ball,
            )
            .unwrap();

        let floor = world.add_static_body(Vec2::ZERO);
        world
            .add_shape(
                floor,
                Geometry::Segment {
                    a: Vec2::new(0.0, 100.0),
                    b: Vec2::new(100.0, 100.0),
                    thickness: 5.0,
                },
                1.0,
                0.0,
                CollisionCategory::Wall,
            )
            .unwrap();

        world.step(1.0 / 60.0, &mut no_dispatch(), &mut ());

        let b = world.body(ball).unwrap();
        assert!(b.vel.y < 0.0, "ball should rebound upward, vel={:?}", b.vel);
    }

    #[test]
    fn test_suppressed_contact_skips_resolution() {
        let mut build = |suppress: bool| {
            let mut world = World::new(Vec2::ZERO);
            let ball = world.add_dynamic_body(Vec2::ZERO, 1.0, moment_for_circle(1.0, 10.0));
            world.body_mut(ball).unwrap().vel = Vec2::new(100.0, 0.0);
            world
                .add_shape(
                    ball,
                    Geometry::Circle {
                        radius: 10.0,
                        offset: Vec2::ZERO,
                    },
                    1.0,
                    0.0,
                    CollisionCategory::Ball,
                )
                .unwrap();

            let alien = world.add_kinematic_body(Vec2::new(18.0, 0.0));
            world
                .add_shape(
                    alien,
                    Geometry::Circle {
                        radius: 10.0,
                        offset: Vec2::ZERO,
                    },
                    1.0,
                    0.0,
                    CollisionCategory::Alien,
                )
                .unwrap();

            let mut dispatcher: CollisionDispatcher<()> = CollisionDispatcher::new();
            let action = if suppress {
                ContactAction::Suppress
            } else {
                ContactAction::Resolve
            };
            dispatcher.register(
                CollisionCategory::Ball,
                CollisionCategory::Alien,
                move |_, _, _| action,
            );
            world.step(1.0 / 60.0, &mut dispatcher, &mut ());
            world.body(ball).unwrap().vel.x
        };

        // Suppressed: ball sails on. Resolved: ball rebounds.
        assert!(build(true) > 0.0);
        assert!(build(false) < 0.0);
    }

    #[test]
    fn test_remove_body_drops_shapes_and_joints() {
        let mut world = World::new(Vec2::ZERO);
        let anchor = world.add_static_body(Vec2::ZERO);
        let flipper = world.add_kinematic_body(Vec2::ZERO);
        world
            .add_shape(
                flipper,
                Geometry::Segment {
                    a: Vec2::ZERO,
                    b: Vec2::new(80.0, 0.0),
                    thickness: 10.0,
                },
                0.4,
                0.5,
                CollisionCategory::Flipper,
            )
            .unwrap();
        world
            .add_pivot(anchor, flipper, Vec2::ZERO, Vec2::ZERO)
            .unwrap();
        world.add_rotary_limit(anchor, flipper, 0.0, 1.0).unwrap();

        assert!(world.remove_body(flipper));
        assert!(world.shapes().is_empty());
        assert!(world.pivots.is_empty());
        assert!(world.rotary_limits.is_empty());

        // Idempotent
        assert!(!world.remove_body(flipper));
    }

    #[test]
    fn test_step_is_deterministic() {
        let build = || {
            let mut world = World::new(Vec2::new(0.0, 300.0));
            let ball = world.add_dynamic_body(Vec2::new(400.0, 100.0), 1.0, moment_for_circle(1.0, 10.0));
            world.body_mut(ball).unwrap().vel = Vec2::new(37.0, -10.0);
            world
                .add_shape(
                    ball,
                    Geometry::Circle {
                        radius: 10.0,
                        offset: Vec2::ZERO,
                    },
                    0.95,
                    0.9,
                    CollisionCategory::Ball,
                )
                .unwrap();
            let floor = world.add_static_body(Vec2::ZERO);
            world
                .add_shape(
                    floor,
                    Geometry::Segment {
                        a: Vec2::new(0.0, 600.0),
                        b: Vec2::new(800.0, 600.0),
                        thickness: 5.0,
                    },
                    0.9,
                    0.5,
                    CollisionCategory::Wall,
                )
                .unwrap();
            (world, ball)
        };

        let (mut w1, ball1) = build();
        let (mut w2, ball2) = build();
        for _ in 0..600 {
            w1.step(1.0 / 60.0, &mut no_dispatch(), &mut ());
            w2.step(1.0 / 60.0, &mut no_dispatch(), &mut ());
        }
        let b1 = w1.body(ball1).unwrap();
        let b2 = w2.body(ball2).unwrap();
        assert_eq!(b1.pos, b2.pos);
        assert_eq!(b1.vel, b2.vel);
    }
}
