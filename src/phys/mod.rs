//! Deterministic 2D rigid-body world
//!
//! Everything the game simulates lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod contact;
pub mod dispatch;
pub mod joint;
pub mod shape;
pub mod world;

pub use body::{BodyId, BodyKind, RigidBody};
pub use contact::{Contact, circle_circle, circle_segment, closest_point_on_segment};
pub use dispatch::{CollisionDispatcher, ContactAction};
pub use joint::{PivotJoint, RotaryLimitJoint};
pub use shape::{CollisionCategory, Geometry, Shape, ShapeId, moment_for_circle};
pub use world::{World, WorldError};
