//! Game entities
//!
//! Each entity is a thin record over bodies and shapes owned by the physics
//! world: the ball, two flippers, the boundary walls, the alien field and
//! the launcher. `Playfield` builds and owns the whole arrangement.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Tuning;
use crate::phys::{
    BodyId, CollisionCategory, Geometry, ShapeId, World, WorldError, moment_for_circle,
};

/// Which side of the table a flipper sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipperSide {
    Left,
    Right,
}

/// The pinball
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub body: BodyId,
    pub shape: ShapeId,
    pub radius: f32,
}

impl Ball {
    /// Reposition the ball (respawn/launch), zeroing all motion. The body is
    /// reused, never recreated.
    pub fn reset_to(&self, world: &mut World, pos: Vec2) {
        if let Some(body) = world.body_mut(self.body) {
            body.pos = pos;
            body.vel = Vec2::ZERO;
            body.angular_vel = 0.0;
        }
    }

    pub fn position(&self, world: &World) -> Vec2 {
        world.body(self.body).map(|b| b.pos).unwrap_or(Vec2::ZERO)
    }
}

/// A flipper: kinematic segment body pinned to a fixed pivot, with a rotary
/// limit bounding the swing.
///
/// The limit joint constrains the relative angle between the static anchor
/// and the flipper body to `[rest_angle, rest_angle + swing]`, where
/// `rest_angle` is the side's mirrored band floor. The joint's body order is
/// mirrored per side so that the left flipper's negative angular velocity and
/// the right flipper's positive angular velocity both drive the relative
/// angle toward its upper bound; both sides rest with the segment tip above
/// the pivot line and the whole sweep stays inside the field.
/// `activate`/`release` only set intent; the limit enforces the physical
/// bound every step.
#[derive(Debug, Clone, Copy)]
pub struct Flipper {
    pub side: FlipperSide,
    pub body: BodyId,
    pub shape: ShapeId,
    pub anchor: BodyId,
    pub pivot: Vec2,
    /// Swing lower bound on the constrained relative angle (radians)
    pub rest_angle: f32,
}

impl Flipper {
    fn flip_sign(&self) -> f32 {
        match self.side {
            FlipperSide::Left => -1.0,
            FlipperSide::Right => 1.0,
        }
    }

    /// Drive the flipper toward its upper limit
    pub fn activate(&self, world: &mut World, flip_rate: f32) {
        if let Some(body) = world.body_mut(self.body) {
            body.angular_vel = self.flip_sign() * flip_rate;
        }
    }

    /// Drive the flipper back toward rest
    pub fn release(&self, world: &mut World, return_rate: f32) {
        if let Some(body) = world.body_mut(self.body) {
            body.angular_vel = -self.flip_sign() * return_rate;
        }
    }

    /// The flipper body's current world angle (for rendering)
    pub fn angle(&self, world: &World) -> f32 {
        world.body(self.body).map(|b| b.angle).unwrap_or(0.0)
    }

    /// The constrained relative angle, in `[rest, rest + swing]` at all times
    pub fn swing_angle(&self, world: &World) -> f32 {
        // Left flipper's limit is registered as (flipper, anchor), so the
        // bounded quantity is the negated body angle
        self.flip_sign() * self.angle(world)
    }
}

/// One boundary wall segment (static)
#[derive(Debug, Clone, Copy)]
pub struct Wall {
    pub shape: ShapeId,
    pub a: Vec2,
    pub b: Vec2,
}

/// A live alien target
#[derive(Debug, Clone, Copy)]
pub struct Alien {
    pub body: BodyId,
    pub shape: ShapeId,
    pub pos: Vec2,
    pub radius: f32,
}

/// Ordered registry of live aliens. An entry is removed exactly once, on the
/// first qualifying ball contact; a removed shape never matches again.
#[derive(Debug, Default)]
pub struct AlienField {
    aliens: Vec<Alien>,
    initial_count: usize,
}

impl AlienField {
    /// Spawn the alien grid into the world
    pub fn spawn_grid(world: &mut World, tuning: &Tuning) -> Result<Self, WorldError> {
        let mut aliens = Vec::new();
        for col in 0..tuning.alien_cols {
            for row in 0..tuning.alien_rows {
                let pos = tuning.alien_origin
                    + Vec2::new(
                        col as f32 * tuning.alien_spacing.x,
                        row as f32 * tuning.alien_spacing.y,
                    );
                let body = world.add_kinematic_body(pos);
                let shape = world.add_shape(
                    body,
                    Geometry::Circle {
                        radius: tuning.alien_radius,
                        offset: Vec2::ZERO,
                    },
                    tuning.alien_elasticity,
                    0.0,
                    CollisionCategory::Alien,
                )?;
                aliens.push(Alien {
                    body,
                    shape,
                    pos,
                    radius: tuning.alien_radius,
                });
            }
        }
        let initial_count = aliens.len();
        Ok(Self {
            aliens,
            initial_count,
        })
    }

    pub fn initial_count(&self) -> usize {
        self.initial_count
    }

    pub fn live_count(&self) -> usize {
        self.aliens.len()
    }

    pub fn destroyed_count(&self) -> usize {
        self.initial_count - self.aliens.len()
    }

    pub fn live(&self) -> &[Alien] {
        &self.aliens
    }

    /// Remove the alien owning `shape`, if still registered. Returns the
    /// removed entry; `None` if it was already removed (idempotent).
    pub fn remove_by_shape(&mut self, shape: ShapeId) -> Option<Alien> {
        let idx = self.aliens.iter().position(|a| a.shape == shape)?;
        Some(self.aliens.remove(idx))
    }
}

/// The ball launcher: a kinematic segment whose commanded velocity imparts
/// the launch impulse through ordinary kinematic-vs-dynamic contact.
#[derive(Debug, Clone, Copy)]
pub struct Launcher {
    pub body: BodyId,
    pub shape: ShapeId,
    pub pos: Vec2,
    /// Load point relative to the launcher pivot
    pub load_offset: Vec2,
}

impl Launcher {
    /// The position a waiting ball is loaded at
    pub fn load_position(&self) -> Vec2 {
        self.pos + self.load_offset
    }

    pub fn set_velocity(&self, world: &mut World, vel: Vec2) {
        if let Some(body) = world.body_mut(self.body) {
            body.vel = vel;
        }
    }

    pub fn velocity(&self, world: &World) -> Vec2 {
        world.body(self.body).map(|b| b.vel).unwrap_or(Vec2::ZERO)
    }
}

/// The fully assembled table: physics world plus every entity in it
pub struct Playfield {
    pub world: World,
    pub ball: Ball,
    pub left_flipper: Flipper,
    pub right_flipper: Flipper,
    pub walls: Vec<Wall>,
    pub aliens: AlienField,
    pub launcher: Launcher,
}

impl Playfield {
    /// Build the table from tuning. Fails only on configuration errors
    /// (which abort startup).
    pub fn new(tuning: &Tuning) -> Result<Self, WorldError> {
        let mut world = World::new(tuning.gravity);

        // Ball
        let ball_body = world.add_dynamic_body(
            tuning.ball_start,
            tuning.ball_mass,
            moment_for_circle(tuning.ball_mass, tuning.ball_radius),
        );
        let ball_shape = world.add_shape(
            ball_body,
            Geometry::Circle {
                radius: tuning.ball_radius,
                offset: Vec2::ZERO,
            },
            tuning.ball_elasticity,
            tuning.ball_friction,
            CollisionCategory::Ball,
        )?;
        let ball = Ball {
            body: ball_body,
            shape: ball_shape,
            radius: tuning.ball_radius,
        };

        let left_flipper = build_flipper(
            &mut world,
            tuning,
            FlipperSide::Left,
            tuning.left_flipper_pivot,
            tuning.left_flipper_rest_deg.to_radians(),
        )?;
        let right_flipper = build_flipper(
            &mut world,
            tuning,
            FlipperSide::Right,
            tuning.right_flipper_pivot,
            tuning.right_flipper_rest_deg.to_radians(),
        )?;

        // Boundary walls: one static body, four segments
        let (w, h) = (tuning.playfield_width, tuning.playfield_height);
        let wall_body = world.add_static_body(Vec2::ZERO);
        let corners = [
            (Vec2::new(0.0, 0.0), Vec2::new(w, 0.0)),
            (Vec2::new(0.0, 0.0), Vec2::new(0.0, h)),
            (Vec2::new(w, 0.0), Vec2::new(w, h)),
            (Vec2::new(0.0, h), Vec2::new(w, h)),
        ];
        let mut walls = Vec::with_capacity(corners.len());
        for (a, b) in corners {
            let shape = world.add_shape(
                wall_body,
                Geometry::Segment {
                    a,
                    b,
                    thickness: tuning.wall_thickness,
                },
                tuning.wall_elasticity,
                tuning.wall_friction,
                CollisionCategory::Wall,
            )?;
            walls.push(Wall { shape, a, b });
        }

        let aliens = AlienField::spawn_grid(&mut world, tuning)?;

        // Launcher: vertical kinematic segment at the table's right edge
        let launcher_body = world.add_kinematic_body(tuning.launcher_pos);
        let launcher_shape = world.add_shape(
            launcher_body,
            Geometry::Segment {
                a: Vec2::ZERO,
                b: Vec2::new(0.0, tuning.launcher_length),
                thickness: tuning.launcher_thickness,
            },
            tuning.launcher_elasticity,
            0.0,
            CollisionCategory::Launcher,
        )?;
        let launcher = Launcher {
            body: launcher_body,
            shape: launcher_shape,
            pos: tuning.launcher_pos,
            load_offset: tuning.launcher_load_offset,
        };

        log::info!(
            "playfield ready: {} aliens, ball at {}",
            aliens.live_count(),
            tuning.ball_start
        );

        Ok(Self {
            world,
            ball,
            left_flipper,
            right_flipper,
            walls,
            aliens,
            launcher,
        })
    }

    pub fn flipper(&self, side: FlipperSide) -> &Flipper {
        match side {
            FlipperSide::Left => &self.left_flipper,
            FlipperSide::Right => &self.right_flipper,
        }
    }
}

fn build_flipper(
    world: &mut World,
    tuning: &Tuning,
    side: FlipperSide,
    pivot: Vec2,
    rest_angle: f32,
) -> Result<Flipper, WorldError> {
    let body = world.add_kinematic_body(pivot);
    let shape = world.add_shape(
        body,
        Geometry::Segment {
            a: Vec2::ZERO,
            b: Vec2::new(tuning.flipper_length, 0.0),
            thickness: tuning.flipper_thickness,
        },
        tuning.flipper_elasticity,
        tuning.flipper_friction,
        CollisionCategory::Flipper,
    )?;

    let anchor = world.add_static_body(pivot);
    world.add_pivot(anchor, body, Vec2::ZERO, Vec2::ZERO)?;

    // Both sides rest at body angle -rest_angle, which mirrors the configured
    // rest direction into the y-down field (segment tip above the pivot
    // line). The joint's body order is mirrored per side so each side's flip
    // direction drives the constrained relative angle toward its upper bound.
    let swing = tuning.flipper_swing_deg.to_radians();
    let (joint_a, joint_b, swing_min) = match side {
        FlipperSide::Left => (body, anchor, rest_angle),
        FlipperSide::Right => (anchor, body, -rest_angle),
    };
    world.add_rotary_limit(joint_a, joint_b, swing_min, swing_min + swing)?;
    if let Some(b) = world.body_mut(body) {
        b.angle = -rest_angle;
    }

    Ok(Flipper {
        side,
        body,
        shape,
        anchor,
        pivot,
        rest_angle: swing_min,
    })
}
