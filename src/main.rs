//! Pocket Arcade headless demo
//!
//! Plays one session of each game with a simple autopilot and logs what
//! happens. Run with `RUST_LOG=info` (or `debug`) to see the progress.
//!
//! Usage: `pocket-arcade [seed] [settings.json]`

use pocket_arcade::arcade::{self, ArcadeMode, ArcadeSession, ArcadeStatus, TickInput};
use pocket_arcade::audio::{AudioError, AudioRouter, AudioSink, SoundCue};
use pocket_arcade::consts::{TICK_HZ, TICK_SCALE};
use pocket_arcade::match3::{Coord, MatchEvent, MatchSession, MatchStatus, TileKind};
use pocket_arcade::memory::{MemoryEvent, MemorySession};
use pocket_arcade::scheduler::{DelayReason, TickScheduler};
use pocket_arcade::{Settings, seeded_rng};

/// Host frame time fed to the fixed-step accumulator (60 Hz display)
const FRAME_DT: f32 = 1.0 / 60.0;
/// Cap on simulation ticks per frame
const MAX_SUBSTEPS: u32 = 8;
/// Arcade runs stop after this many seconds of game time
const ARCADE_SECONDS: u32 = 120;
/// Discrete games stop after this many inputs
const MAX_MOVES: u32 = 400;
/// Simulated think time between discrete inputs
const MOVE_MS: u64 = 250;

/// Audio backend that only logs
struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, cue: SoundCue, volume: f32) -> Result<(), AudioError> {
        log::trace!("♪ {} ({:.2})", cue.asset_name(), volume);
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(42);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    log::info!("Pocket Arcade demo starting (seed {})", seed);

    let mut audio = AudioRouter::new(LogSink, &settings.audio);

    let breakout = run_arcade(ArcadeMode::Breakout, &settings, seed, &mut audio);
    let pong = run_arcade(ArcadeMode::Pong, &settings, seed.wrapping_add(1), &mut audio);
    let match_three = run_match_three(&settings, seed.wrapping_add(2), &mut audio);
    let memory = run_memory(&settings, seed.wrapping_add(3), &mut audio);

    println!("Breakout:    {}", breakout);
    println!("Pong:        {}", pong);
    println!("Match-three: {}", match_three);
    println!("Memory:      {}", memory);
}

/// Paddle target: follow the lowest ball that is coming down
fn autopilot_target(session: &ArcadeSession) -> Option<f32> {
    session
        .balls
        .iter()
        .filter(|b| b.vel.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .or_else(|| session.balls.first())
        .map(|b| b.pos.x)
}

fn run_arcade(mode: ArcadeMode, settings: &Settings, seed: u64, audio: &mut AudioRouter<LogSink>) -> String {
    let mut rng = seeded_rng(seed);
    let mut session = ArcadeSession::new(mode, settings.arcade.clone(), &mut rng);
    let sim_dt = 1.0 / TICK_HZ as f32;
    let max_ticks = u64::from(ARCADE_SECONDS * TICK_HZ);
    let mut accumulator = 0.0;

    while session.status != ArcadeStatus::GameOver && session.time_ticks < max_ticks {
        accumulator += FRAME_DT;

        let mut substeps = 0;
        while accumulator >= sim_dt && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                paddle_target: autopilot_target(&session),
            };
            let events = arcade::advance(&mut session, &input, TICK_SCALE, &mut rng);
            audio.arcade_events(&events);
            accumulator -= sim_dt;
            substeps += 1;
        }
    }

    let outcome = if session.status == ArcadeStatus::GameOver {
        "game over"
    } else {
        "time up"
    };
    log::info!(
        "{:?} finished after {} ticks: {} (score {}, level {})",
        mode,
        session.time_ticks,
        outcome,
        session.score,
        session.level
    );
    format!("score {} level {} ({})", session.score, session.level, outcome)
}

/// Any three tiles of one kind
fn find_triple(session: &MatchSession) -> Option<[Coord; 3]> {
    let grid = &session.grid;
    TileKind::ALL.iter().find_map(|kind| {
        let coords: Vec<Coord> = (0..grid.rows())
            .flat_map(|row| (0..grid.cols()).map(move |col| Coord::new(row, col)))
            .filter(|c| grid.get(*c) == Some(Some(*kind)))
            .take(3)
            .collect();
        <[Coord; 3]>::try_from(coords).ok()
    })
}

fn run_match_three(settings: &Settings, seed: u64, audio: &mut AudioRouter<LogSink>) -> String {
    let mut rng = seeded_rng(seed);
    let mut session = MatchSession::new(settings.match_three.clone(), &mut rng);
    let mut scheduler = TickScheduler::new();

    for _ in 0..MAX_MOVES {
        if session.status == MatchStatus::GameOver {
            break;
        }
        let Some(triple) = find_triple(&session) else {
            log::warn!("Autopilot found no triple on a live board");
            break;
        };
        for coord in triple {
            let events = session.select(coord, &mut rng);
            audio.match_events(&events);
            for event in &events {
                if let MatchEvent::DelayRequested(delay) = event {
                    scheduler.schedule(*delay);
                }
            }
        }

        for reason in scheduler.advance(MOVE_MS) {
            if let DelayReason::DismissLevelOverlay { level } = reason {
                log::debug!("Level {} overlay dismissed", level);
                session.resume();
            }
        }
    }
    scheduler.cancel_all();

    log::info!(
        "Match-three finished: {:?} (score {}, level {}, {} rows)",
        session.status,
        session.score,
        session.level,
        session.grid.rows()
    );
    format!("score {} level {} ({:?})", session.score, session.level, session.status)
}

fn run_memory(settings: &Settings, seed: u64, audio: &mut AudioRouter<LogSink>) -> String {
    let mut rng = seeded_rng(seed);
    let mut session = MemorySession::new(settings.memory.clone(), &mut rng);
    let mut scheduler = TickScheduler::new();
    let target_level = 4;

    let mut moves = 0;
    while session.level < target_level && moves < MAX_MOVES {
        // Perfect recall: pick the first unmatched card and its partner
        let Some(first) = (0..session.cards.len()).find(|i| !session.matched.contains(i)) else {
            break;
        };
        let partner = (first + 1..session.cards.len())
            .find(|i| session.cards[*i].pair_id == session.cards[first].pair_id);

        for index in [Some(first), partner].into_iter().flatten() {
            let events = session.flip(index, &mut rng);
            audio.memory_events(&events);
            for event in &events {
                if let MemoryEvent::DelayRequested(delay) = event {
                    scheduler.schedule(*delay);
                }
            }
        }
        moves += 1;

        for reason in scheduler.advance(MOVE_MS) {
            if let DelayReason::UnflipCards { first, second } = reason {
                session.unflip(first, second);
            }
        }
    }
    scheduler.cancel_all();

    log::info!("Memory finished: level {} score {} in {} moves", session.level, session.score, moves);
    format!("score {} level {}", session.score, session.level)
}
