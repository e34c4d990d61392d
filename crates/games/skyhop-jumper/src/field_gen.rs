use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{FieldConfig, PlacementPolicy, SpringGate, WindowConfig};
use crate::entities::{Platform, PlatformKind, Spring};

/// Result of laying out the initial field.
#[derive(Debug, Clone)]
pub struct InitialField {
    /// Anchor platform first, then the rest in placement order.
    pub platforms: Vec<Platform>,
    /// Platforms accepted despite overlapping a neighbour after the retry cap.
    pub fallbacks: u32,
}

/// Produces platforms: the initial layout and replacements above the window.
#[derive(Debug, Clone)]
pub struct FieldGenerator {
    config: FieldConfig,
    width: f32,
    height: f32,
    rng: StdRng,
}

impl FieldGenerator {
    /// Build a deterministic generator from a seed.
    pub fn new(config: FieldConfig, window: &WindowConfig, seed: u64) -> Self {
        Self {
            config,
            width: window.width,
            height: window.height,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// The solid platform the player starts on, centred near the window bottom.
    pub fn anchor(&self) -> Platform {
        Platform::new(
            self.width / 2.0,
            self.height - self.config.anchor_offset,
            self.config.platform_width,
            self.config.platform_height,
            PlatformKind::Solid,
        )
    }

    /// Lay out `count` platforms: the anchor plus `count - 1` placed by policy.
    pub fn spawn_initial_field(&mut self, count: u32) -> InitialField {
        let anchor = self.anchor();
        let anchor_y = anchor.y;
        let mut platforms = Vec::with_capacity(count as usize);
        platforms.push(anchor);
        let mut fallbacks = 0;

        for i in 1..count {
            let platform = match self.config.placement {
                PlacementPolicy::RandomRejection => {
                    let (x, y, accepted) = self.sample_free_position(&platforms);
                    if !accepted {
                        fallbacks += 1;
                        tracing::debug!(
                            x,
                            y,
                            attempts = self.config.max_placement_attempts,
                            "Placement retries exhausted, accepting overlap"
                        );
                    }
                    self.build_platform(x, y)
                },
                PlacementPolicy::FixedGap => {
                    let x = self.random_x();
                    let y = anchor_y - i as f32 * self.config.gap;
                    self.build_platform(x, y)
                },
            };
            platforms.push(platform);
        }

        InitialField {
            platforms,
            fallbacks,
        }
    }

    /// New platform one gap above the current highest one (smallest y).
    pub fn spawn_replacement(&mut self, highest_y: Option<f32>) -> Platform {
        let x = self.random_x();
        let y = highest_y.unwrap_or(0.0) - self.config.gap;
        self.build_platform(x, y)
    }

    /// Sample a kind from the configured weights.
    pub fn select_kind(&mut self) -> PlatformKind {
        let w = &self.config.kind_weights;
        let r = self.rng.random::<f32>() * w.total();
        if r < w.hazard {
            PlatformKind::Hazard
        } else if r < w.hazard + w.breakable {
            PlatformKind::Breakable
        } else if r < w.hazard + w.breakable + w.moving {
            PlatformKind::Moving
        } else {
            PlatformKind::Solid
        }
    }

    /// Rejection-sample a position. Returns `(x, y, accepted)`; `accepted` is
    /// false when every attempt overlapped and the last candidate was kept.
    fn sample_free_position(&mut self, placed: &[Platform]) -> (f32, f32, bool) {
        let min_x = self.config.min_separation_x;
        let min_y = self.config.min_separation_y;
        let attempts = self.config.max_placement_attempts.max(1);

        let mut candidate = (0.0, 0.0);
        for _ in 0..attempts {
            candidate = (self.random_x(), self.random_y());
            if !placed
                .iter()
                .any(|p| too_close(candidate.0, candidate.1, p, min_x, min_y))
            {
                return (candidate.0, candidate.1, true);
            }
        }
        (candidate.0, candidate.1, false)
    }

    fn build_platform(&mut self, x: f32, y: f32) -> Platform {
        let kind = self.select_kind();
        let mut platform = Platform::new(
            x,
            y,
            self.config.platform_width,
            self.config.platform_height,
            kind,
        );

        if kind == PlatformKind::Moving {
            let speed = self
                .rng
                .random_range(self.config.moving_speed_min..=self.config.moving_speed_max);
            platform.dx = if self.rng.random_bool(0.5) {
                speed
            } else {
                -speed
            };
        }

        let spring = &self.config.spring;
        if spring_admitted(spring.gate, kind, y) && self.rng.random::<f32>() < spring.chance {
            let slack = ((platform.width - spring.width) / 2.0).max(0.0);
            let offset_x = self.rng.random_range(-slack..=slack);
            platform.spring = Some(Spring::new(offset_x, spring.width, spring.height));
        }

        platform
    }

    fn random_x(&mut self) -> f32 {
        let m = self.config.edge_margin;
        self.rng.random_range(m..=self.width - m)
    }

    fn random_y(&mut self) -> f32 {
        let m = self.config.edge_margin;
        self.rng.random_range(m..=self.height - m)
    }
}

/// Whether a candidate centre is within the minimum separation of a placed platform.
pub fn too_close(x: f32, y: f32, other: &Platform, min_x: f32, min_y: f32) -> bool {
    (x - other.x).abs() < min_x && (y - other.y).abs() < min_y
}

/// Spring gating predicate, evaluated on the new platform's kind and y.
pub fn spring_admitted(gate: SpringGate, kind: PlatformKind, y: f32) -> bool {
    match gate {
        SpringGate::OddYUnbreakable => !kind.breaks() && (y.floor() as i64).rem_euclid(2) == 1,
        SpringGate::Unbreakable => !kind.breaks(),
        SpringGate::Always => true,
        SpringGate::Never => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::KindWeights;

    fn generator(config: FieldConfig, seed: u64) -> FieldGenerator {
        FieldGenerator::new(config, &WindowConfig::default(), seed)
    }

    #[test]
    fn deterministic_generation() {
        let a = generator(FieldConfig::default(), 42).spawn_initial_field(10);
        let b = generator(FieldConfig::default(), 42).spawn_initial_field(10);
        assert_eq!(a.platforms, b.platforms, "Same seed must produce same field");
    }

    #[test]
    fn different_seeds_different_fields() {
        let a = generator(FieldConfig::default(), 42).spawn_initial_field(10);
        let b = generator(FieldConfig::default(), 123).spawn_initial_field(10);
        assert_ne!(a.platforms, b.platforms);
    }

    #[test]
    fn anchor_is_first_solid_and_springless() {
        let field = generator(FieldConfig::default(), 7).spawn_initial_field(10);
        let anchor = &field.platforms[0];
        assert_eq!(anchor.kind, PlatformKind::Solid);
        assert_eq!((anchor.x, anchor.y), (200.0, 550.0));
        assert!(anchor.spring.is_none());
    }

    #[test]
    fn initial_field_has_requested_count() {
        for count in [1, 2, 10] {
            let field = generator(FieldConfig::default(), 1).spawn_initial_field(count);
            assert_eq!(field.platforms.len(), count as usize);
        }
    }

    #[test]
    fn random_rejection_keeps_separation() {
        for seed in 0..50 {
            let field = generator(FieldConfig::default(), seed).spawn_initial_field(10);
            if field.fallbacks > 0 {
                continue;
            }
            for (i, a) in field.platforms.iter().enumerate() {
                for b in &field.platforms[i + 1..] {
                    assert!(
                        (a.x - b.x).abs() >= 80.0 || (a.y - b.y).abs() >= 50.0,
                        "seed {seed}: ({}, {}) and ({}, {}) overlap",
                        a.x,
                        a.y,
                        b.x,
                        b.y
                    );
                }
            }
        }
    }

    #[test]
    fn saturated_window_terminates_and_counts_fallbacks() {
        let config = FieldConfig {
            min_separation_x: 1000.0,
            min_separation_y: 1000.0,
            max_placement_attempts: 5,
            ..FieldConfig::default()
        };
        let field = generator(config, 3).spawn_initial_field(10);
        assert_eq!(field.platforms.len(), 10);
        assert_eq!(field.fallbacks, 9, "Every non-anchor platform had to fall back");
    }

    #[test]
    fn fixed_gap_spacing() {
        let config = FieldConfig {
            placement: PlacementPolicy::FixedGap,
            gap: 70.0,
            ..FieldConfig::default()
        };
        let field = generator(config, 5).spawn_initial_field(6);
        for pair in field.platforms.windows(2) {
            assert!((pair[0].y - pair[1].y - 70.0).abs() < 1e-3);
        }
        assert_eq!(field.fallbacks, 0);
    }

    #[test]
    fn platforms_within_margins() {
        let field = generator(FieldConfig::default(), 11).spawn_initial_field(10);
        for p in &field.platforms {
            assert!((50.0..=350.0).contains(&p.x), "x={} outside margins", p.x);
            assert!((50.0..=550.0).contains(&p.y), "y={} outside margins", p.y);
        }
    }

    #[test]
    fn replacement_sits_one_gap_above_highest() {
        let mut g = generator(FieldConfig::default(), 9);
        let p = g.spawn_replacement(Some(-30.0));
        assert_eq!(p.y, -90.0);
        let p = g.spawn_replacement(None);
        assert_eq!(p.y, -60.0);
    }

    #[test]
    fn classic_distribution_roughly_matches_weights() {
        let mut g = generator(FieldConfig::default(), 2024);
        let mut counts: HashMap<PlatformKind, u32> = HashMap::new();
        let n = 20_000;
        for _ in 0..n {
            *counts.entry(g.select_kind()).or_default() += 1;
        }
        let frac = |k: PlatformKind| *counts.get(&k).unwrap_or(&0) as f32 / n as f32;
        assert!((frac(PlatformKind::Hazard) - 0.10).abs() < 0.02);
        assert!((frac(PlatformKind::Breakable) - 0.15).abs() < 0.02);
        assert!((frac(PlatformKind::Moving) - 0.15).abs() < 0.02);
        assert!((frac(PlatformKind::Solid) - 0.60).abs() < 0.02);
    }

    #[test]
    fn green_heavy_never_spawns_hazards() {
        let config = FieldConfig {
            kind_weights: KindWeights::green_heavy(),
            ..FieldConfig::default()
        };
        let mut g = generator(config, 77);
        for _ in 0..2000 {
            assert_ne!(g.select_kind(), PlatformKind::Hazard);
        }
    }

    #[test]
    fn moving_platforms_get_speed_in_range() {
        let config = FieldConfig {
            kind_weights: KindWeights {
                hazard: 0.0,
                breakable: 0.0,
                moving: 1.0,
                solid: 0.0,
            },
            ..FieldConfig::default()
        };
        let mut g = generator(config, 8);
        for _ in 0..200 {
            let p = g.spawn_replacement(Some(0.0));
            assert_eq!(p.kind, PlatformKind::Moving);
            assert!((1.0..=3.0).contains(&p.dx.abs()), "dx={}", p.dx);
        }
    }

    #[test]
    fn static_platforms_have_no_drift() {
        let mut g = generator(FieldConfig::default(), 8);
        for _ in 0..200 {
            let p = g.spawn_replacement(Some(0.0));
            if p.kind != PlatformKind::Moving {
                assert_eq!(p.dx, 0.0);
            }
        }
    }

    #[test]
    fn odd_y_gate() {
        let gate = SpringGate::OddYUnbreakable;
        assert!(spring_admitted(gate, PlatformKind::Solid, 101.4));
        assert!(!spring_admitted(gate, PlatformKind::Solid, 100.9));
        assert!(spring_admitted(gate, PlatformKind::Moving, -0.5), "floor(-0.5) = -1 is odd");
        assert!(!spring_admitted(gate, PlatformKind::Breakable, 101.0));
        assert!(!spring_admitted(gate, PlatformKind::Hazard, 101.0));
    }

    #[test]
    fn other_gates() {
        assert!(spring_admitted(SpringGate::Always, PlatformKind::Hazard, 2.0));
        assert!(!spring_admitted(SpringGate::Never, PlatformKind::Solid, 3.0));
        assert!(spring_admitted(SpringGate::Unbreakable, PlatformKind::Solid, 2.0));
        assert!(!spring_admitted(SpringGate::Unbreakable, PlatformKind::Breakable, 3.0));
    }

    #[test]
    fn springs_respect_gate_and_stay_on_platform() {
        let mut config = FieldConfig::default();
        config.spring.chance = 1.0;
        let mut g = generator(config, 31);
        let mut spawned = 0;
        for i in 0..500 {
            let p = g.spawn_replacement(Some(i as f32 * 0.37));
            match &p.spring {
                Some(s) => {
                    spawned += 1;
                    assert!(spring_admitted(SpringGate::OddYUnbreakable, p.kind, p.y));
                    assert!(s.offset_x.abs() <= (p.width - s.width) / 2.0);
                    assert!(!s.used);
                },
                None => {
                    assert!(!spring_admitted(SpringGate::OddYUnbreakable, p.kind, p.y));
                },
            }
        }
        assert!(spawned > 0, "With chance 1.0 some springs must spawn");
    }

    #[test]
    fn zero_chance_never_spawns_springs() {
        let mut config = FieldConfig::default();
        config.spring.chance = 0.0;
        config.spring.gate = SpringGate::Always;
        let field = generator(config, 4).spawn_initial_field(10);
        assert!(field.platforms.iter().all(|p| p.spring.is_none()));
    }
}
