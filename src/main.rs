//! Invader Pinball entry point
//!
//! Headless shell: runs the deterministic sim at 60 Hz behind a scripted
//! input driver and logs state transitions. A windowed render adapter can
//! replace the driver without touching the sim.

use std::time::{Duration, Instant};

use invader_pinball::Tuning;
use invader_pinball::consts::{MAX_SUBSTEPS, SIM_DT};
use invader_pinball::game::{FlipperSide, Game, InputEvent, Key};

/// Scripted stand-in for a real input source: serves the ball, then works
/// both flippers on a fixed cadence.
fn scripted_inputs(tick: u64) -> Vec<InputEvent> {
    match tick {
        30 => vec![InputEvent::KeyDown(Key::Launch)],
        45 => vec![InputEvent::KeyUp(Key::Launch)],
        t if t % 90 == 0 => vec![
            InputEvent::KeyDown(Key::Flipper(FlipperSide::Left)),
            InputEvent::KeyDown(Key::Flipper(FlipperSide::Right)),
        ],
        t if t % 90 == 20 => vec![
            InputEvent::KeyUp(Key::Flipper(FlipperSide::Left)),
            InputEvent::KeyUp(Key::Flipper(FlipperSide::Right)),
        ],
        _ => Vec::new(),
    }
}

fn main() {
    env_logger::init();

    let mut game = match Game::new(Tuning::default()) {
        Ok(game) => game,
        Err(err) => {
            log::error!("failed to build playfield: {err}");
            std::process::exit(1);
        }
    };

    // Cap a headless run at five minutes of sim time
    let max_ticks: u64 = 60 * 60 * 5;
    let frame_budget = Duration::from_secs_f32(SIM_DT);
    let mut accumulator = 0.0f32;
    let mut last = Instant::now();
    let mut last_score = 0;

    'running: while game.state.time_ticks < max_ticks {
        let now = Instant::now();
        accumulator += (now - last).as_secs_f32().min(0.1);
        last = now;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let inputs = scripted_inputs(game.state.time_ticks);
            let outcome = game.tick(&inputs, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
            if outcome.quit {
                break 'running;
            }
        }

        let score = game.score();
        if score != last_score {
            log::info!(
                "score {score}, {} aliens left, {} balls",
                game.playfield.aliens.live_count(),
                game.state.balls_remaining
            );
            last_score = score;
        }

        if game.state.is_game_over() || game.playfield.aliens.live_count() == 0 {
            break;
        }

        // Frame-rate limiter: the only wait point in the loop
        let elapsed = last.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }

    match serde_json::to_string_pretty(&game.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("snapshot serialization failed: {err}"),
    }
}
