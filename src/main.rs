//! Ring Drop entry point
//!
//! Headless native host: loads an optional board config, then drives the
//! session with a fixed frame clock and a scripted key stream, syncing a
//! logging scene after every frame.
//!
//! Usage: `ring-drop [config.json] [seed]`

use glam::Vec3;

use ring_drop::consts::SIM_DT;
use ring_drop::input::handle_key;
use ring_drop::scene::{SceneGraph, SceneSync};
use ring_drop::sim::{Board, Color, GameState, TickInput, prototype_layout, tick, view_rotation};
use ring_drop::{BoardConfig, ConfigError, GameError};

/// Frames to simulate (one minute at 60 fps)
const DEMO_FRAMES: u32 = 60 * 60;

/// Scene that only counts meshes and logs what it would draw
#[derive(Default)]
struct LoggingScene {
    next_handle: u64,
    live: usize,
}

impl SceneGraph for LoggingScene {
    type Handle = u64;

    fn add_wedge(&mut self, corners: [Vec3; 8], color: Color) -> u64 {
        self.next_handle += 1;
        self.live += 1;
        log::trace!(
            "add wedge #{} {} (#{:06x}, emissive #{:06x}) at {:?}",
            self.next_handle,
            color.as_str(),
            color.rgb(),
            color.emissive(),
            corners[0]
        );
        self.next_handle
    }

    fn remove(&mut self, handle: u64) {
        self.live -= 1;
        log::trace!("remove wedge #{}", handle);
    }

    fn set_rotation(&mut self, angle: f32) {
        log::trace!("scene rotation {:.3}", angle);
    }
}

/// Key pressed on a given frame
fn scripted_key(frame: u32) -> Option<&'static str> {
    match frame % 240 {
        30 => Some("KeyA"),
        90 => Some("KeyD"),
        120 | 125 | 130 => Some("KeyS"),
        150 if frame % 960 == 150 => Some("KeyW"),
        200 => Some("KeyD"),
        _ => None,
    }
}

fn load_config(path: Option<&str>) -> Result<BoardConfig, ConfigError> {
    match path {
        Some(path) => BoardConfig::load(path),
        None => Ok(BoardConfig::default()),
    }
}

fn main() {
    env_logger::init();
    log::info!("Ring Drop (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match load_config(args.first().map(String::as_str)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(12345);

    let board = Board::from_cells(config.ring_count, config.segment_count, prototype_layout());
    let mut state = match GameState::with_board(config, board, seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Could not start: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "View rotation {:.3} rad brings segment {} to the front",
        view_rotation(&state.config),
        state.config.spawn_segment
    );

    let mut scene = LoggingScene::default();
    let mut sync = SceneSync::new();
    sync.rebuild(&state, &mut scene);

    let input = TickInput::default();
    for frame in 0..DEMO_FRAMES {
        if let Some(code) = scripted_key(frame) {
            match handle_key(&mut state, code) {
                Some(Err(GameError::NotImplemented(what))) => {
                    log::warn!("{} ({}) ignored", code, what)
                }
                Some(Err(GameError::GameOver)) | None => {}
                Some(Err(e)) => log::warn!("{}: {}", code, e),
                Some(Ok(_)) => {}
            }
        }

        if let Err(e) = tick(&mut state, &input, SIM_DT) {
            log::info!("Frame {}: {}", frame, e);
        }

        for event in state.drain_events() {
            log::debug!("{:?}", event);
        }
        sync.sync(&state, &mut scene);

        if state.is_game_over() {
            break;
        }
    }

    log::info!(
        "Done after {} ticks: {} pieces settled, {} rings cleared, {} meshes live{}",
        state.time_ticks,
        state.pieces_settled,
        state.rings_cleared,
        scene.live,
        if state.is_game_over() { " (game over)" } else { "" }
    );
}
