pub mod frame;
pub mod game_trait;
pub mod input;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::convert::Infallible;

    use crate::frame::{Presenter, drive_frame};
    use crate::game_trait::{ArcadeGame, GamePhase};
    use crate::input::FrameInput;

    /// Presenter that keeps every snapshot it was handed.
    pub struct RecordingPresenter<S> {
        pub frames: Vec<S>,
    }

    impl<S> RecordingPresenter<S> {
        pub fn new() -> Self {
            Self { frames: Vec::new() }
        }
    }

    impl<S> Default for RecordingPresenter<S> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<S: Clone> Presenter<S> for RecordingPresenter<S> {
        type Error = Infallible;

        fn render(&mut self, snapshot: &S) -> Result<(), Infallible> {
            self.frames.push(snapshot.clone());
            Ok(())
        }
    }

    /// Run N ticks with the same input, returning the last snapshot.
    pub fn run_ticks<G: ArcadeGame>(
        game: &mut G,
        n: usize,
        input: &FrameInput,
    ) -> Option<G::Snapshot> {
        let mut last = None;
        for _ in 0..n {
            last = Some(game.tick(input));
        }
        last
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // These functions form a generic test suite that every ArcadeGame
    // implementation must pass. Game crates call them from their own
    // #[cfg(test)] modules with a freshly constructed game.

    /// A new game sits in `Start` and idles there until confirm.
    pub fn contract_starts_idle<G: ArcadeGame>(game: &mut G) {
        assert_eq!(game.phase(), GamePhase::Start, "New game must start idle");
        run_ticks(game, 30, &FrameInput::jump());
        assert_eq!(
            game.phase(),
            GamePhase::Start,
            "Jump must not leave the start screen"
        );
        assert_eq!(game.score(), 0, "Idle ticks must not score");
    }

    /// Confirm from `Start` begins a run; confirm while playing is ignored.
    pub fn contract_confirm_starts_playing<G: ArcadeGame>(game: &mut G) {
        game.on_confirm_pressed();
        assert_eq!(game.phase(), GamePhase::Playing);
        game.on_confirm_pressed();
        assert_eq!(
            game.phase(),
            GamePhase::Playing,
            "Confirm while playing must be ignored"
        );
    }

    /// Score never decreases while the game is running.
    pub fn contract_score_monotonic<G: ArcadeGame>(game: &mut G, inputs: &[FrameInput]) {
        if game.phase() != GamePhase::Playing {
            game.on_confirm_pressed();
        }
        let mut last = game.score();
        for input in inputs {
            game.tick(input);
            if game.phase() != GamePhase::Playing {
                break;
            }
            let now = game.score();
            assert!(now >= last, "Score went backwards: {last} -> {now}");
            last = now;
        }
    }

    /// The presenter is called exactly once per tick, whatever the phase.
    pub fn contract_renders_every_tick<G>(game: &mut G, ticks: usize)
    where
        G: ArcadeGame,
        G::Snapshot: Clone,
    {
        let mut presenter = RecordingPresenter::new();
        let idle = FrameInput::default();
        for _ in 0..ticks {
            let _ = drive_frame(game, &mut presenter, &idle);
        }
        let _ = drive_frame(game, &mut presenter, &FrameInput::confirm());
        for _ in 0..ticks {
            let _ = drive_frame(game, &mut presenter, &idle);
        }
        assert_eq!(
            presenter.frames.len(),
            ticks * 2 + 1,
            "One render per tick in every phase"
        );
    }
}
