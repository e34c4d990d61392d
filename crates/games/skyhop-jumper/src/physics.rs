use serde::{Deserialize, Serialize};

use skyhop_core::input::FrameInput;

use crate::config::LandingPolicy;
use crate::entities::{CollisionResponse, Platform, Player};
use crate::field::PlatformField;

/// Outcome of collision resolution for one tick. At most one contact takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    None,
    /// The spring on the platform at `index` launched the player.
    Spring { index: usize },
    /// The player landed on the platform at `index`.
    Platform {
        index: usize,
        response: CollisionResponse,
    },
}

/// Set vx from held input, move, and wrap around the window edges.
pub fn apply_horizontal_input(player: &mut Player, input: &FrameInput, width: f32) {
    player.vx = input.horizontal() * player.move_speed;
    player.x += player.vx;
    wrap_horizontal(player, width);
}

/// Leaving one side of the window re-enters from the other.
pub fn wrap_horizontal(player: &mut Player, width: f32) {
    if player.x < 0.0 {
        player.x = width;
    } else if player.x > width {
        player.x = 0.0;
    }
}

/// Apply gravity unless resting, then integrate y.
pub fn integrate_vertical(player: &mut Player) {
    let resting = player.on_platform && player.vy == 0.0;
    if !resting {
        player.vy += player.gravity;
    }
    player.y += player.vy;
}

/// Keep the player at or below `midpoint` by moving the field down instead.
/// Returns the scroll distance (0.0 when the player is below the line).
pub fn scroll_camera(player: &mut Player, midpoint: f32, field: &mut PlatformField) -> f32 {
    if player.y >= midpoint {
        return 0.0;
    }
    let diff = midpoint - player.y;
    player.y = midpoint;
    field.scroll(diff);
    diff
}

/// Resolve spring and platform contacts for a falling (or still) player.
///
/// Springs are checked first across the whole field; a spring launch skips the
/// platform pass. Otherwise the first platform in container order whose top band
/// holds the player's feet wins.
pub fn resolve_collisions(
    player: &mut Player,
    platforms: &mut [Platform],
    landing: LandingPolicy,
    spring_radius: f32,
    width: f32,
) -> Contact {
    player.on_platform = false;

    // Rising players pass through everything.
    if player.vy < 0.0 {
        return Contact::None;
    }

    let feet = player.feet_y();

    if player.vy > 0.0 {
        for (index, p) in platforms.iter_mut().enumerate() {
            let armed = p.spring.as_ref().is_some_and(|s| !s.used);
            let Some((sx, sy)) = p.spring_top() else {
                continue;
            };
            if !armed {
                continue;
            }
            let dx = player.x - sx;
            let dy = feet - sy;
            if dx * dx + dy * dy <= spring_radius * spring_radius {
                if let Some(spring) = p.spring.as_mut() {
                    spring.used = true;
                }
                player.vy = player.spring_velocity;
                tracing::debug!(index, x = sx, y = sy, "Spring launch");
                return Contact::Spring { index };
            }
        }
    }

    for (index, p) in platforms.iter_mut().enumerate() {
        let within_span = player.x > p.left() && player.x < p.right();
        let within_band = feet >= p.top() && feet <= p.bottom();
        if !(within_span && within_band) {
            continue;
        }

        let response = p.kind.response();
        match response {
            CollisionResponse::Rest => {
                player.y = p.top() - player.size / 2.0;
                match landing {
                    LandingPolicy::Rest => {
                        player.vy = 0.0;
                        player.on_platform = true;
                    },
                    LandingPolicy::Launch => player.vy = player.jump_velocity,
                }
            },
            CollisionResponse::BreakAndLaunch => {
                if !p.broken {
                    tracing::debug!(index, kind = ?p.kind, "Platform broke");
                }
                p.break_apart();
                land(player, landing);
            },
            CollisionResponse::RideAndLaunch => {
                land(player, landing);
                player.x += p.dx;
                wrap_horizontal(player, width);
            },
        }
        return Contact::Platform { index, response };
    }

    Contact::None
}

/// Vertical outcome of touching a non-resting platform.
fn land(player: &mut Player, landing: LandingPolicy) {
    player.vy = match landing {
        LandingPolicy::Rest => 0.0,
        LandingPolicy::Launch => player.jump_velocity,
    };
}

/// Whether the player fell far enough below the window to end the run.
pub fn is_below_window(player: &Player, height: f32, margin: f32) -> bool {
    player.y > height + margin
}
