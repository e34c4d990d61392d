use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;

/// The jumping character. Position is the circle centre; y grows downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Diameter.
    pub size: f32,
    pub gravity: f32,
    /// Base jump impulse (negative = up).
    pub jump_velocity: f32,
    /// Spring-boosted impulse (negative = up).
    pub spring_velocity: f32,
    pub move_speed: f32,
    /// Resting on a solid platform.
    pub on_platform: bool,
}

impl Player {
    pub fn new(x: f32, y: f32, physics: &PhysicsConfig) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size: physics.player_size,
            gravity: physics.gravity,
            jump_velocity: -physics.jump_speed,
            spring_velocity: -physics.spring_speed,
            move_speed: physics.move_speed,
            on_platform: false,
        }
    }

    /// Y of the lowest point of the player.
    pub fn feet_y(&self) -> f32 {
        self.y + self.size / 2.0
    }

    pub fn jump(&mut self) {
        self.vy = self.jump_velocity;
        self.on_platform = false;
    }
}

/// Platform variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Permanent; the player can rest on it.
    Solid,
    /// Breaks on first contact.
    Breakable,
    /// Drifts horizontally, bouncing off the window edges.
    Moving,
    /// Breaks instantly on contact, like `Breakable`, drawn as a warning.
    Hazard,
}

/// What a landing on a platform does to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionResponse {
    Rest,
    BreakAndLaunch,
    RideAndLaunch,
}

impl PlatformKind {
    pub const ALL: [PlatformKind; 4] = [
        PlatformKind::Solid,
        PlatformKind::Breakable,
        PlatformKind::Moving,
        PlatformKind::Hazard,
    ];

    pub fn response(self) -> CollisionResponse {
        match self {
            PlatformKind::Solid => CollisionResponse::Rest,
            PlatformKind::Breakable | PlatformKind::Hazard => CollisionResponse::BreakAndLaunch,
            PlatformKind::Moving => CollisionResponse::RideAndLaunch,
        }
    }

    /// Kinds that break on contact.
    pub fn breaks(self) -> bool {
        self.response() == CollisionResponse::BreakAndLaunch
    }
}

/// Launch pad sitting on top of a platform. Position is always derived from the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    /// Horizontal offset of the spring centre from the platform centre.
    pub offset_x: f32,
    pub width: f32,
    pub height: f32,
    /// One-shot: once set, the spring never fires again.
    pub used: bool,
}

impl Spring {
    pub fn new(offset_x: f32, width: f32, height: f32) -> Self {
        Self {
            offset_x,
            width,
            height,
            used: false,
        }
    }
}

/// A platform in the field. Position is the rectangle centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
    /// One-way: never resets once set.
    pub broken: bool,
    /// Horizontal velocity; zero unless `Moving`.
    pub dx: f32,
    pub spring: Option<Spring>,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32, kind: PlatformKind) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
            broken: false,
            dx: 0.0,
            spring: None,
        }
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn break_apart(&mut self) {
        self.broken = true;
    }

    /// Centre of the attached spring in world space.
    pub fn spring_position(&self) -> Option<(f32, f32)> {
        self.spring
            .as_ref()
            .map(|s| (self.x + s.offset_x, self.top() - s.height / 2.0))
    }

    /// Top centre of the attached spring, where the player's feet touch it.
    pub fn spring_top(&self) -> Option<(f32, f32)> {
        self.spring
            .as_ref()
            .map(|s| (self.x + s.offset_x, self.top() - s.height))
    }
}
