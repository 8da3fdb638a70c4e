//! Data-driven game balance
//!
//! Every magic number of the table in one serializable struct, so layouts
//! can be tweaked (or loaded from JSON) without touching simulation code.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Full table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Gravity acceleration; positive y points down the playfield
    pub gravity: Vec2,
    pub playfield_width: f32,
    pub playfield_height: f32,

    pub ball_radius: f32,
    pub ball_mass: f32,
    pub ball_elasticity: f32,
    pub ball_friction: f32,
    pub ball_start: Vec2,

    pub flipper_length: f32,
    pub flipper_thickness: f32,
    pub flipper_elasticity: f32,
    pub flipper_friction: f32,
    /// Swing above the rest angle, degrees
    pub flipper_swing_deg: f32,
    /// Angular speed while the flipper key is held, rad/s
    pub flip_rate: f32,
    /// Angular speed returning to rest, rad/s
    pub return_rate: f32,
    pub left_flipper_pivot: Vec2,
    pub left_flipper_rest_deg: f32,
    pub right_flipper_pivot: Vec2,
    pub right_flipper_rest_deg: f32,

    pub wall_thickness: f32,
    pub wall_elasticity: f32,
    pub wall_friction: f32,

    pub alien_radius: f32,
    pub alien_elasticity: f32,
    pub alien_cols: u32,
    pub alien_rows: u32,
    /// Grid top-left alien center
    pub alien_origin: Vec2,
    pub alien_spacing: Vec2,
    pub points_per_alien: u32,

    pub launcher_pos: Vec2,
    pub launcher_length: f32,
    pub launcher_thickness: f32,
    pub launcher_elasticity: f32,
    /// Load point for a waiting ball, relative to the launcher pivot
    pub launcher_load_offset: Vec2,
    /// Launcher velocity while the launch key is held (negative y = up)
    pub launch_velocity: Vec2,

    pub starting_balls: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, GRAVITY_Y),
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            ball_radius: BALL_RADIUS,
            ball_mass: BALL_MASS,
            ball_elasticity: BALL_ELASTICITY,
            ball_friction: BALL_FRICTION,
            ball_start: Vec2::new(400.0, 550.0),

            flipper_length: FLIPPER_LENGTH,
            flipper_thickness: FLIPPER_THICKNESS,
            flipper_elasticity: FLIPPER_ELASTICITY,
            flipper_friction: FLIPPER_FRICTION,
            flipper_swing_deg: FLIPPER_SWING_DEG,
            flip_rate: FLIPPER_FLIP_RATE,
            return_rate: FLIPPER_RETURN_RATE,
            left_flipper_pivot: Vec2::new(300.0, 550.0),
            left_flipper_rest_deg: 120.0,
            right_flipper_pivot: Vec2::new(500.0, 550.0),
            right_flipper_rest_deg: 60.0,

            wall_thickness: WALL_THICKNESS,
            wall_elasticity: WALL_ELASTICITY,
            wall_friction: WALL_FRICTION,

            alien_radius: ALIEN_RADIUS,
            alien_elasticity: ALIEN_ELASTICITY,
            alien_cols: ALIEN_COLS,
            alien_rows: ALIEN_ROWS,
            alien_origin: Vec2::new(100.0, 100.0),
            alien_spacing: Vec2::new(150.0, 80.0),
            points_per_alien: POINTS_PER_ALIEN,

            launcher_pos: Vec2::new(780.0, 550.0),
            launcher_length: LAUNCHER_LENGTH,
            launcher_thickness: LAUNCHER_THICKNESS,
            launcher_elasticity: LAUNCHER_ELASTICITY,
            launcher_load_offset: Vec2::new(0.0, LAUNCHER_LOAD_OFFSET_Y),
            launch_velocity: Vec2::new(0.0, LAUNCH_VELOCITY_Y),

            starting_balls: STARTING_BALLS,
        }
    }
}

impl Tuning {
    /// Y below which the ball counts as lost / waiting to be launched
    pub fn lower_bound(&self) -> f32 {
        self.playfield_height
    }

    pub fn alien_count(&self) -> u32 {
        self.alien_cols * self.alien_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_table_layout() {
        let tuning = Tuning::default();
        assert_eq!(tuning.alien_count(), 15);
        assert_eq!(tuning.lower_bound(), 600.0);
        // Launch goes up (toward smaller y in this convention)
        assert!(tuning.launch_velocity.y < 0.0);
        assert!(tuning.gravity.y > 0.0);
    }

    #[test]
    fn test_tuning_round_trips_through_json() {
        let tuning = Tuning::default();
        let json = serde_json::to_string(&tuning).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(back.launcher_pos, tuning.launcher_pos);
        assert_eq!(back.starting_balls, tuning.starting_balls);
    }
}
