//! Game state machine
//!
//! Score is never stored: it is derived from the alien field every time it
//! is read, so it cannot drift from the thing it counts.

use serde::{Deserialize, Serialize};

use super::entities::AlienField;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active play (including the ball waiting to be launched)
    Playing,
    /// Run ended; terminal
    GameOver,
}

/// Lives, phase and score derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub balls_remaining: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    points_per_alien: u32,
}

impl GameState {
    pub fn new(starting_balls: u32, points_per_alien: u32) -> Self {
        Self {
            balls_remaining: starting_balls,
            phase: GamePhase::Playing,
            time_ticks: 0,
            points_per_alien,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Derived score: destroyed aliens times the per-alien value
    pub fn score(&self, aliens: &AlienField) -> u32 {
        aliens.destroyed_count() as u32 * self.points_per_alien
    }

    /// The ball fell off the playfield. Decrements the stock; returns true
    /// if a fresh ball should be loaded, false when the game just ended.
    /// Must not be called once the game is over.
    pub fn lose_ball(&mut self) -> bool {
        debug_assert!(self.phase == GamePhase::Playing);
        self.balls_remaining = self.balls_remaining.saturating_sub(1);
        if self.balls_remaining == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("game over after {} ticks", self.time_ticks);
            false
        } else {
            log::info!("ball lost, {} remaining", self.balls_remaining);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lose_ball_counts_down_to_game_over() {
        let mut state = GameState::new(3, 100);

        assert!(state.lose_ball());
        assert_eq!(state.balls_remaining, 2);
        assert!(state.lose_ball());
        assert!(!state.lose_ball());
        assert_eq!(state.balls_remaining, 0);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_score_derives_from_field() {
        let state = GameState::new(3, 100);
        let aliens = AlienField::default();
        // Empty field: nothing destroyed yet
        assert_eq!(state.score(&aliens), 0);
    }
}
