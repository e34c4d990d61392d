use serde::{Deserialize, Serialize};

use crate::input::FrameInput;

/// Core trait that every Skyhop game implements.
///
/// The adapter owns the frame loop and rendering;
/// the game only handles its own simulation and phase transitions.
pub trait ArcadeGame {
    /// Everything the adapter needs to draw one frame.
    type Snapshot;

    /// Game metadata for the title screen.
    fn metadata(&self) -> GameMetadata;

    /// Called once per frame in every phase. Discrete presses in `input`
    /// are dispatched before the simulation advances.
    fn tick(&mut self, input: &FrameInput) -> Self::Snapshot;

    /// Confirm/start press. Only meaningful in `Start` and `GameOver`.
    fn on_confirm_pressed(&mut self);

    /// Jump press. Only meaningful in `Playing`.
    fn on_jump_pressed(&mut self);

    /// Current phase of the state machine.
    fn phase(&self) -> GamePhase;

    /// Score of the current (or last finished) run.
    fn score(&self) -> u64;

    /// Frame rate in Hz the simulation constants are tuned for.
    fn tick_rate(&self) -> f32 {
        60.0
    }
}

/// Phase of a single-player arcade session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, waiting for the first confirm.
    Start,
    /// Full simulation active.
    Playing,
    /// Run ended, waiting for a confirm to replay.
    GameOver,
}

impl GamePhase {
    /// Whether the simulation runs in this phase.
    pub fn is_active(self) -> bool {
        self == GamePhase::Playing
    }
}

/// Game metadata for the title screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
}

/// Events emitted by a game during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreUpdate { score: u64 },
    PhaseChanged { from: GamePhase, to: GamePhase },
}
