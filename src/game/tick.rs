//! Fixed timestep game tick
//!
//! One tick: consume the frame's input events, step the physics world,
//! apply alien removals the collision dispatcher claimed, then run the
//! ball-lost/game-over transitions. Deterministic given identical state and
//! inputs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::{FlipperSide, Playfield};
use super::state::{GamePhase, GameState};
use crate::Tuning;
use crate::phys::{
    BodyId, CollisionCategory, CollisionDispatcher, ContactAction, ShapeId, WorldError,
};

/// Keys the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Flipper(FlipperSide),
    Launch,
}

/// One input event, delivered in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
}

/// What a tick reported back to the shell
#[derive(Debug, Clone, Copy, Default)]
pub struct TickOutcome {
    /// The player asked to quit
    pub quit: bool,
}

/// Per-step contact side effects recorded by dispatch handlers.
///
/// Handlers cannot mutate the stepping world, so destroyed aliens are
/// claimed here and removed right after `step` returns. A shape can be
/// claimed at most once per step.
#[derive(Debug, Default)]
pub struct ContactEvents {
    destroyed: Vec<(BodyId, ShapeId)>,
}

impl ContactEvents {
    fn already_claimed(&self, shape: ShapeId) -> bool {
        self.destroyed.iter().any(|(_, s)| *s == shape)
    }
}

/// Dispatcher for this game: ball-vs-alien destroys the alien, and the ball
/// still bounces off it (the contact resolves normally).
fn build_dispatcher() -> CollisionDispatcher<ContactEvents> {
    let mut dispatcher = CollisionDispatcher::new();
    dispatcher.register(
        CollisionCategory::Ball,
        CollisionCategory::Alien,
        |events: &mut ContactEvents, _ball, alien| {
            if events.already_claimed(alien.id) {
                // Second contact with an alien already destroyed this step
                return ContactAction::Suppress;
            }
            events.destroyed.push((alien.body, alien.id));
            ContactAction::Resolve
        },
    );
    dispatcher
}

/// The whole game: table, state machine and collision dispatch
pub struct Game {
    pub playfield: Playfield,
    pub state: GameState,
    pub tuning: Tuning,
    dispatcher: CollisionDispatcher<ContactEvents>,
    events: ContactEvents,
}

impl Game {
    pub fn new(tuning: Tuning) -> Result<Self, WorldError> {
        let playfield = Playfield::new(&tuning)?;
        let state = GameState::new(tuning.starting_balls, tuning.points_per_alien);
        Ok(Self {
            playfield,
            state,
            tuning,
            dispatcher: build_dispatcher(),
            events: ContactEvents::default(),
        })
    }

    /// Current derived score
    pub fn score(&self) -> u32 {
        self.state.score(&self.playfield.aliens)
    }

    /// Advance the game by one fixed timestep
    pub fn tick(&mut self, inputs: &[InputEvent], dt: f32) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.state.is_game_over() {
            // Terminal: only quit still means anything
            outcome.quit = inputs.contains(&InputEvent::Quit);
            return outcome;
        }

        for event in inputs {
            match *event {
                InputEvent::Quit => outcome.quit = true,
                InputEvent::KeyDown(Key::Flipper(side)) => {
                    let flipper = *self.playfield.flipper(side);
                    flipper.activate(&mut self.playfield.world, self.tuning.flip_rate);
                }
                InputEvent::KeyUp(Key::Flipper(side)) => {
                    let flipper = *self.playfield.flipper(side);
                    flipper.release(&mut self.playfield.world, self.tuning.return_rate);
                }
                InputEvent::KeyDown(Key::Launch) => {
                    // Only a ball waiting off-playfield can be served
                    let ball_pos = self.playfield.ball.position(&self.playfield.world);
                    if ball_pos.y > self.tuning.lower_bound() {
                        let load = self.playfield.launcher.load_position();
                        self.playfield.ball.reset_to(&mut self.playfield.world, load);
                        self.playfield
                            .launcher
                            .set_velocity(&mut self.playfield.world, self.tuning.launch_velocity);
                    }
                }
                InputEvent::KeyUp(Key::Launch) => {
                    self.playfield
                        .launcher
                        .set_velocity(&mut self.playfield.world, Vec2::ZERO);
                }
            }
        }

        self.events.destroyed.clear();
        self.playfield
            .world
            .step(dt, &mut self.dispatcher, &mut self.events);

        // Apply claimed alien removals. The registry drop is idempotent, so
        // a stale claim cannot remove twice.
        for (body, shape) in std::mem::take(&mut self.events.destroyed) {
            if self.playfield.aliens.remove_by_shape(shape).is_some() {
                self.playfield.world.remove_body(body);
                log::debug!(
                    "alien destroyed, {} remain, score {}",
                    self.playfield.aliens.live_count(),
                    self.score()
                );
            }
        }

        self.state.time_ticks += 1;

        // Ball drained off the bottom
        let ball_pos = self.playfield.ball.position(&self.playfield.world);
        if ball_pos.y > self.tuning.lower_bound() && self.state.phase == GamePhase::Playing {
            let load = self.playfield.launcher.load_position();
            if self.state.lose_ball() {
                self.playfield.ball.reset_to(&mut self.playfield.world, load);
            }
        }

        outcome
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self)
    }
}

/// Read-only per-frame view for the render adapter
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub ball_pos: Vec2,
    pub ball_radius: f32,
    pub flippers: Vec<FlipperView>,
    /// Wall segment endpoints
    pub walls: Vec<(Vec2, Vec2)>,
    pub aliens: Vec<AlienView>,
    pub launcher_pos: Vec2,
    pub score: u32,
    pub balls_remaining: u32,
    pub game_over: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlipperView {
    pub side: FlipperSide,
    pub pivot: Vec2,
    /// Body angle wrapped to `[-π, π)`
    pub angle: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlienView {
    pub pos: Vec2,
    pub radius: f32,
}

impl FrameSnapshot {
    pub fn capture(game: &Game) -> Self {
        let playfield = &game.playfield;
        let world = &playfield.world;
        Self {
            ball_pos: playfield.ball.position(world),
            ball_radius: playfield.ball.radius,
            flippers: [playfield.left_flipper, playfield.right_flipper]
                .iter()
                .map(|f| FlipperView {
                    side: f.side,
                    pivot: f.pivot,
                    angle: crate::normalize_angle(f.angle(world)),
                })
                .collect(),
            walls: playfield.walls.iter().map(|w| (w.a, w.b)).collect(),
            aliens: playfield
                .aliens
                .live()
                .iter()
                .map(|a| AlienView {
                    pos: a.pos,
                    radius: a.radius,
                })
                .collect(),
            launcher_pos: playfield.launcher.pos,
            score: game.score(),
            balls_remaining: game.state.balls_remaining,
            game_over: game.state.is_game_over(),
        }
    }
}
