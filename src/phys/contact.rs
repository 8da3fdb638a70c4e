//! Narrow-phase collision detection and impulse response
//!
//! Geometry routines work on world-space primitives: circles and thick
//! ("rounded") segments. The contact normal always points from shape A toward
//! shape B; impulses only ever change Dynamic bodies.

use glam::Vec2;

use super::body::RigidBody;
use crate::cross;

/// A single contact between two shapes for one step
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Unit normal pointing from shape A toward shape B
    pub normal: Vec2,
    /// Overlap depth (> 0 when touching)
    pub penetration: f32,
    /// Contact point in world space
    pub point: Vec2,
}

/// Closest point to `p` on the segment `a`-`b`
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Circle-vs-circle contact; normal points from A toward B
pub fn circle_circle(ca: Vec2, ra: f32, cb: Vec2, rb: f32) -> Option<Contact> {
    let delta = cb - ca;
    let dist = delta.length();
    let penetration = ra + rb - dist;
    if penetration <= 0.0 {
        return None;
    }
    // Concentric circles get an arbitrary but fixed axis
    let normal = if dist > 1e-6 { delta / dist } else { Vec2::X };
    Some(Contact {
        normal,
        penetration,
        point: ca + normal * (ra - penetration * 0.5),
    })
}

/// Circle (A) vs thick segment (B); `thickness` is the segment's radius.
/// Normal points from the circle toward the segment surface.
pub fn circle_segment(c: Vec2, r: f32, a: Vec2, b: Vec2, thickness: f32) -> Option<Contact> {
    let closest = closest_point_on_segment(c, a, b);
    let delta = closest - c;
    let dist = delta.length();
    let penetration = r + thickness - dist;
    if penetration <= 0.0 {
        return None;
    }
    let normal = if dist > 1e-6 {
        delta / dist
    } else {
        // Circle center on the segment line; push out perpendicular
        crate::perp((b - a).normalize_or_zero())
    };
    Some(Contact {
        normal,
        penetration,
        point: closest - normal * thickness,
    })
}

/// Apply a restitution + friction impulse for `contact` between bodies `a`
/// and `b`, then separate them positionally. Elasticity and friction are the
/// already-combined pair values. Static and kinematic bodies have zero
/// inverse mass and are unaffected; separating contacts receive no impulse.
pub fn apply_impulse(
    a: &mut RigidBody,
    b: &mut RigidBody,
    contact: &Contact,
    elasticity: f32,
    friction: f32,
) {
    let inv_mass_a = a.inv_mass();
    let inv_mass_b = b.inv_mass();
    let inv_sum = inv_mass_a + inv_mass_b;
    if inv_sum == 0.0 {
        return;
    }

    let n = contact.normal;
    let ra = contact.point - a.pos;
    let rb = contact.point - b.pos;

    let rel_vel = b.velocity_at(contact.point) - a.velocity_at(contact.point);
    let vel_along_normal = rel_vel.dot(n);

    if vel_along_normal < 0.0 {
        let ra_n = cross(ra, n);
        let rb_n = cross(rb, n);
        let k_normal = inv_sum + ra_n * ra_n * a.inv_moment() + rb_n * rb_n * b.inv_moment();

        let jn = -(1.0 + elasticity) * vel_along_normal / k_normal;
        let impulse = n * jn;
        a.vel -= impulse * inv_mass_a;
        a.angular_vel -= cross(ra, impulse) * a.inv_moment();
        b.vel += impulse * inv_mass_b;
        b.angular_vel += cross(rb, impulse) * b.inv_moment();

        // Coulomb friction along the contact tangent, clamped by the
        // normal impulse
        let tangent = rel_vel - n * vel_along_normal;
        if tangent.length_squared() > 1e-8 {
            let t = tangent.normalize();
            let ra_t = cross(ra, t);
            let rb_t = cross(rb, t);
            let k_tangent = inv_sum + ra_t * ra_t * a.inv_moment() + rb_t * rb_t * b.inv_moment();

            let jt = (-rel_vel.dot(t) / k_tangent).clamp(-friction * jn, friction * jn);
            let f_impulse = t * jt;
            a.vel -= f_impulse * inv_mass_a;
            a.angular_vel -= cross(ra, f_impulse) * a.inv_moment();
            b.vel += f_impulse * inv_mass_b;
            b.angular_vel += cross(rb, f_impulse) * b.inv_moment();
        }
    }

    // Positional separation so resting contacts do not sink
    let correction = n * (contact.penetration / inv_sum);
    a.pos -= correction * inv_mass_a;
    b.pos += correction * inv_mass_b;
}
