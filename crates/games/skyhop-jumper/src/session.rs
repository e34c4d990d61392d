use skyhop_core::input::FrameInput;

use crate::config::JumperConfig;
use crate::entities::Player;
use crate::field::PlatformField;
use crate::field_gen::FieldGenerator;
use crate::physics::{self, Contact};
use crate::scoring;

/// What one simulation step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Points added this step.
    pub scored: u64,
    pub contact: Contact,
    /// Platforms despawned and replaced this step.
    pub replaced: usize,
    /// The player fell out of the window; the run is over.
    pub fell_out: bool,
    /// Gravity and scrolling were held back by the jump gate.
    pub gated: bool,
}

/// One run: the player, the platform field, the score, and the jump gate.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) player: Player,
    pub(crate) field: PlatformField,
    pub(crate) score: u64,
    pub(crate) jump_ready: bool,
}

impl Session {
    /// Fresh run: new field from `seed`, player resting on the anchor platform.
    pub fn new(config: &JumperConfig, seed: u64) -> Self {
        let generator = FieldGenerator::new(config.field.clone(), &config.window, seed);
        let anchor = generator.anchor();
        let field = PlatformField::new(generator, &config.window, &config.physics);

        let mut player = Player::new(
            anchor.x,
            anchor.top() - config.physics.player_size / 2.0,
            &config.physics,
        );
        player.on_platform = true;

        if field.placement_fallbacks() > 0 {
            tracing::debug!(
                fallbacks = field.placement_fallbacks(),
                "Initial field accepted overlapping platforms"
            );
        }

        Self {
            player,
            field,
            score: 0,
            jump_ready: !config.session.jump_gate,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn field(&self) -> &PlatformField {
        &self.field
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// False while the jump gate is holding the session.
    pub fn jump_ready(&self) -> bool {
        self.jump_ready
    }

    /// Handle a jump press. The first press opens the gate; later presses
    /// only jump from a resting position. Returns whether a jump happened.
    pub fn jump(&mut self) -> bool {
        if !self.jump_ready {
            self.jump_ready = true;
            self.player.jump();
            return true;
        }
        if self.player.on_platform {
            self.player.jump();
            return true;
        }
        false
    }

    /// Advance the run by one tick.
    pub fn step(&mut self, input: &FrameInput, config: &JumperConfig) -> StepReport {
        let window = &config.window;
        let physics_cfg = &config.physics;

        physics::apply_horizontal_input(&mut self.player, input, window.width);

        let mut report = StepReport {
            scored: 0,
            contact: Contact::None,
            replaced: 0,
            fell_out: false,
            gated: !self.jump_ready,
        };

        if self.jump_ready {
            physics::integrate_vertical(&mut self.player);

            let diff = physics::scroll_camera(&mut self.player, window.midpoint(), &mut self.field);
            report.scored = scoring::scroll_score(diff);
            self.score += report.scored;

            report.contact = physics::resolve_collisions(
                &mut self.player,
                self.field.platforms_mut(),
                config.session.landing,
                physics_cfg.spring_trigger_radius,
                window.width,
            );

            report.replaced = self.field.tick();
        }

        report.fell_out =
            physics::is_below_window(&self.player, window.height, physics_cfg.game_over_margin);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LandingPolicy;
    use crate::entities::PlatformKind;

    fn config(jump_gate: bool) -> JumperConfig {
        let mut cfg = JumperConfig::default();
        cfg.session.jump_gate = jump_gate;
        cfg
    }

    #[test]
    fn player_starts_on_anchor() {
        let s = Session::new(&JumperConfig::default(), 3);
        let anchor = &s.field().platforms()[0];
        assert_eq!(anchor.kind, PlatformKind::Solid);
        assert_eq!(s.player().x, anchor.x);
        assert_eq!(s.player().feet_y(), anchor.top());
        assert!(s.player().on_platform);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn gate_holds_gravity_and_scroll() {
        let cfg = config(true);
        let mut s = Session::new(&cfg, 3);
        let y = s.player().y;
        for _ in 0..120 {
            let report = s.step(&FrameInput::default(), &cfg);
            assert!(report.gated);
        }
        assert_eq!(s.player().y, y);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn gated_player_can_still_steer() {
        let cfg = config(true);
        let mut s = Session::new(&cfg, 3);
        let input = FrameInput {
            left: true,
            ..Default::default()
        };
        s.step(&input, &cfg);
        assert_eq!(s.player().x, 195.0);
    }

    #[test]
    fn first_jump_opens_gate() {
        let cfg = config(true);
        let mut s = Session::new(&cfg, 3);
        assert!(s.jump());
        assert!(s.jump_ready());
        assert_eq!(s.player().vy, -12.0);

        let y = s.player().y;
        let report = s.step(&FrameInput::default(), &cfg);
        assert!(!report.gated);
        assert!(s.player().y < y, "Player should rise after the first jump");
    }

    #[test]
    fn resting_player_stays_on_anchor_without_gate() {
        let cfg = config(false);
        let mut s = Session::new(&cfg, 3);
        let y = s.player().y;
        for _ in 0..60 {
            let report = s.step(&FrameInput::default(), &cfg);
            assert!(matches!(report.contact, Contact::Platform { index: 0, .. }));
        }
        assert_eq!(s.player().y, y);
        assert!(s.player().on_platform);
        assert_eq!(s.player().vy, 0.0);
    }

    #[test]
    fn airborne_jump_is_ignored() {
        let cfg = config(false);
        let mut s = Session::new(&cfg, 3);
        assert!(s.jump());
        s.step(&FrameInput::default(), &cfg);
        let vy = s.player().vy;
        assert!(!s.jump(), "No jumping mid-air");
        assert_eq!(s.player().vy, vy);
    }

    #[test]
    fn jump_lands_back_on_anchor() {
        let cfg = config(false);
        let mut s = Session::new(&cfg, 3);
        let anchor = s.field().platforms()[0].clone();
        s.field.replace_platforms(vec![anchor]);
        let y = s.player().y;
        s.jump();
        for _ in 0..120 {
            s.step(&FrameInput::default(), &cfg);
        }
        assert!(s.player().on_platform, "Player should land again");
        assert_eq!(s.player().y, y);
    }

    #[test]
    fn falling_past_margin_ends_run() {
        let cfg = config(false);
        let mut s = Session::new(&cfg, 3);
        s.player.y = cfg.window.height + 150.0;
        s.player.on_platform = false;
        let report = s.step(&FrameInput::default(), &cfg);
        assert!(report.fell_out);
    }

    #[test]
    fn launch_policy_climbs_and_scores() {
        let mut cfg = config(false);
        cfg.session.landing = LandingPolicy::Launch;
        let mut s = Session::new(&cfg, 11);
        s.jump();

        let mut scored = 0;
        for _ in 0..600 {
            let report = s.step(&FrameInput::default(), &cfg);
            scored += report.scored;
            assert_eq!(s.field().len(), cfg.field.platform_count as usize);
            if report.fell_out {
                break;
            }
        }
        assert_eq!(s.score(), scored);
    }
}
