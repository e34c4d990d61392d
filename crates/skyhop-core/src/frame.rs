use crate::game_trait::ArcadeGame;
use crate::input::FrameInput;

/// Draws a game snapshot. Implemented by the presentation adapter.
pub trait Presenter<S> {
    type Error;

    /// Called exactly once per tick, in every phase.
    fn render(&mut self, snapshot: &S) -> Result<(), Self::Error>;
}

/// Advance the game by one tick and hand the resulting snapshot to the presenter.
pub fn drive_frame<G, P>(game: &mut G, presenter: &mut P, input: &FrameInput) -> Result<(), P::Error>
where
    G: ArcadeGame,
    P: Presenter<G::Snapshot>,
{
    let snapshot = game.tick(input);
    presenter.render(&snapshot)
}
