//! Game entities, state machine and fixed-timestep tick

pub mod entities;
pub mod state;
pub mod tick;

pub use entities::{Alien, AlienField, Ball, Flipper, FlipperSide, Launcher, Playfield, Wall};
pub use state::{GamePhase, GameState};
pub use tick::{FrameSnapshot, Game, InputEvent, Key, TickOutcome};
