//! Invader Pinball - pinball flippers meet a Space Invaders alien field
//!
//! Core modules:
//! - `phys`: Deterministic 2D rigid-body world (bodies, shapes, joints, contacts)
//! - `game`: Entities, game state machine, fixed-timestep tick
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod phys;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions (y grows downward; the render adapter flips)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Gravity acceleration, world units/s² (positive y = down)
    pub const GRAVITY_Y: f32 = 300.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_MASS: f32 = 1.0;
    pub const BALL_ELASTICITY: f32 = 0.95;
    pub const BALL_FRICTION: f32 = 0.9;

    /// Flipper defaults
    pub const FLIPPER_LENGTH: f32 = 80.0;
    pub const FLIPPER_THICKNESS: f32 = 10.0;
    pub const FLIPPER_ELASTICITY: f32 = 0.4;
    pub const FLIPPER_FRICTION: f32 = 0.5;
    /// Swing above the rest angle (degrees)
    pub const FLIPPER_SWING_DEG: f32 = 60.0;
    /// Angular speed while held (rad/s)
    pub const FLIPPER_FLIP_RATE: f32 = 20.0;
    /// Angular speed returning to rest (rad/s)
    pub const FLIPPER_RETURN_RATE: f32 = 10.0;

    /// Wall defaults
    pub const WALL_THICKNESS: f32 = 5.0;
    pub const WALL_ELASTICITY: f32 = 0.9;
    pub const WALL_FRICTION: f32 = 0.5;

    /// Alien defaults
    pub const ALIEN_RADIUS: f32 = 20.0;
    pub const ALIEN_ELASTICITY: f32 = 0.5;
    pub const ALIEN_COLS: u32 = 5;
    pub const ALIEN_ROWS: u32 = 3;
    pub const POINTS_PER_ALIEN: u32 = 100;

    /// Launcher defaults
    pub const LAUNCHER_LENGTH: f32 = 50.0;
    pub const LAUNCHER_THICKNESS: f32 = 10.0;
    pub const LAUNCHER_ELASTICITY: f32 = 1.0;
    /// Upward launch speed (negative y = up)
    pub const LAUNCH_VELOCITY_Y: f32 = -500.0;
    /// Where a waiting ball loads, relative to the launcher pivot (just
    /// above the segment so the rising launcher strikes it cleanly)
    pub const LAUNCHER_LOAD_OFFSET_Y: f32 = -25.0;

    /// Starting ball stock
    pub const STARTING_BALLS: u32 = 3;
}

/// Normalize angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for an angle (the body's local +x axis in world space)
#[inline]
pub fn rotation_vector(angle: f32) -> glam::Vec2 {
    glam::Vec2::new(angle.cos(), angle.sin())
}

/// Rotate a vector by an angle
#[inline]
pub fn rotate(v: glam::Vec2, angle: f32) -> glam::Vec2 {
    let (sin, cos) = angle.sin_cos();
    glam::Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// 2D cross product (z component of the 3D cross)
#[inline]
pub fn cross(a: glam::Vec2, b: glam::Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Perpendicular vector (rotated +90°)
#[inline]
pub fn perp(v: glam::Vec2) -> glam::Vec2 {
    glam::Vec2::new(-v.y, v.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps_into_half_open_range() {
        assert!((normalize_angle(3.0 * PI) + PI).abs() < 1e-6);
        assert!((normalize_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-6);
        assert_eq!(normalize_angle(0.0), 0.0);
        // PI maps to the low end; the range is half-open
        assert!((normalize_angle(PI) + PI).abs() < 1e-6);
        assert!(normalize_angle(-PI) == -PI);
    }
}
