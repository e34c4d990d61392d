pub mod config;
pub mod entities;
pub mod error;
pub mod field;
pub mod field_gen;
pub mod physics;
pub mod scoring;
pub mod session;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use skyhop_core::game_trait::{ArcadeGame, GameEvent, GameMetadata, GamePhase};
use skyhop_core::input::FrameInput;

use config::JumperConfig;
use entities::{Platform, Player};
use error::ConfigError;
use session::Session;

/// Everything the presentation adapter needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub player: Player,
    /// Field in container order, springs embedded.
    pub platforms: Vec<Platform>,
    pub score: u64,
    /// Show the "press jump" prompt: playing, but the jump gate is still closed.
    pub awaiting_jump: bool,
    pub width: f32,
    pub height: f32,
    /// Events raised since the previous snapshot.
    pub events: Vec<GameEvent>,
}

/// The endless jumper: start / playing / game-over around one owned `Session`.
pub struct SkyJumper {
    config: JumperConfig,
    seed: u64,
    /// Master RNG; every new session is seeded from it.
    rng: StdRng,
    phase: GamePhase,
    session: Session,
    pending_events: Vec<GameEvent>,
}

impl SkyJumper {
    /// Build from `config/jumper.toml` (or `SKYHOP_JUMPER_CONFIG`), defaults otherwise.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config(JumperConfig::load())
    }

    pub fn with_config(config: JumperConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = config
            .session
            .seed
            .unwrap_or_else(|| rand::rng().random());
        tracing::info!(seed, "Skyhop jumper seeded");

        let mut rng = StdRng::seed_from_u64(seed);
        let session = Session::new(&config, rng.random());

        Ok(Self {
            config,
            seed,
            rng,
            phase: GamePhase::Start,
            session,
            pending_events: Vec::new(),
        })
    }

    pub fn config(&self) -> &JumperConfig {
        &self.config
    }

    /// Seed of the master RNG, for reproducing a run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Throw away the current run and begin a new one.
    pub fn start_game(&mut self) {
        self.session = Session::new(&self.config, self.rng.random());
        self.set_phase(GamePhase::Playing);
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        tracing::info!(?from, ?to, score = self.session.score(), "Phase change");
        self.phase = to;
        self.pending_events.push(GameEvent::PhaseChanged { from, to });
    }

    fn snapshot(&mut self) -> RenderSnapshot {
        RenderSnapshot {
            phase: self.phase,
            player: self.session.player().clone(),
            platforms: self.session.field().platforms().to_vec(),
            score: self.session.score(),
            awaiting_jump: self.phase == GamePhase::Playing && !self.session.jump_ready(),
            width: self.config.window.width,
            height: self.config.window.height,
            events: std::mem::take(&mut self.pending_events),
        }
    }
}

impl ArcadeGame for SkyJumper {
    type Snapshot = RenderSnapshot;

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Skyhop".to_string(),
            description: "Bounce up an endless tower of platforms. Don't fall!".to_string(),
        }
    }

    fn tick(&mut self, input: &FrameInput) -> RenderSnapshot {
        if input.confirm {
            self.on_confirm_pressed();
        }
        if input.jump {
            self.on_jump_pressed();
        }

        if self.phase.is_active() {
            let report = self.session.step(input, &self.config);
            if report.scored > 0 {
                self.pending_events.push(GameEvent::ScoreUpdate {
                    score: self.session.score(),
                });
            }
            if report.fell_out {
                self.set_phase(GamePhase::GameOver);
            }
        }

        self.snapshot()
    }

    fn on_confirm_pressed(&mut self) {
        match self.phase {
            GamePhase::Start | GamePhase::GameOver => self.start_game(),
            GamePhase::Playing => {},
        }
    }

    fn on_jump_pressed(&mut self) {
        if self.phase.is_active() {
            self.session.jump();
        }
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn score(&self) -> u64 {
        self.session.score()
    }
}
