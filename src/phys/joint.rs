//! Constraint joints
//!
//! Two joint kinds, both solved analytically once per step: a pivot joint
//! pinning a local point on each body to coincide, and a rotary limit joint
//! bounding the relative angle between two bodies.
//!
//! Unlike impulse resolution, constraints also correct kinematic bodies:
//! the non-static partner of an infinite-mass pair takes the full
//! correction. This is what keeps a velocity-driven flipper inside its
//! swing range no matter what angular velocity was commanded.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BodyId, BodyKind, RigidBody};

/// Stable handle for a joint in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JointId(pub u32);

/// Pins `anchor_a` on body A and `anchor_b` on body B to the same world point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivotJoint {
    pub id: JointId,
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// Anchor in body A's local space
    pub anchor_a: Vec2,
    /// Anchor in body B's local space
    pub anchor_b: Vec2,
}

impl PivotJoint {
    /// Drive the anchor separation to zero for this step
    pub fn solve(&self, a: &mut RigidBody, b: &mut RigidBody) {
        let world_a = a.local_to_world(self.anchor_a);
        let world_b = b.local_to_world(self.anchor_b);
        let error = world_a - world_b;
        if error.length_squared() < 1e-10 {
            return;
        }

        let wa = a.inv_mass();
        let wb = b.inv_mass();
        let sum = wa + wb;
        if sum > 0.0 {
            a.pos -= error * (wa / sum);
            b.pos += error * (wb / sum);
        } else if b.kind != BodyKind::Static {
            b.pos += error;
        } else if a.kind != BodyKind::Static {
            a.pos -= error;
        }
    }
}

/// Bounds the relative angle `angle_b - angle_a` to `[min, max]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotaryLimitJoint {
    pub id: JointId,
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub min: f32,
    pub max: f32,
}

impl RotaryLimitJoint {
    /// Clamp the relative angle into range and kill the angular velocity
    /// component still pushing past an active bound
    pub fn solve(&self, a: &mut RigidBody, b: &mut RigidBody) {
        let relative = b.angle - a.angle;
        let rel_vel = b.angular_vel - a.angular_vel;

        let (error, pushing) = if relative < self.min {
            (self.min - relative, rel_vel < 0.0)
        } else if relative > self.max {
            (self.max - relative, rel_vel > 0.0)
        } else {
            return;
        };

        let wa = a.inv_moment();
        let wb = b.inv_moment();
        let sum = wa + wb;
        if sum > 0.0 {
            a.angle -= error * (wa / sum);
            b.angle += error * (wb / sum);
            if pushing {
                a.angular_vel += rel_vel * (wa / sum);
                b.angular_vel -= rel_vel * (wb / sum);
            }
        } else if b.kind != BodyKind::Static {
            b.angle += error;
            if pushing {
                b.angular_vel = a.angular_vel;
            }
        } else if a.kind != BodyKind::Static {
            a.angle -= error;
            if pushing {
                a.angular_vel = b.angular_vel;
            }
        }
    }
}
