use crate::config::{PhysicsConfig, WindowConfig};
use crate::entities::{Platform, PlatformKind};
use crate::field_gen::FieldGenerator;

/// The live platform collection plus the generator that keeps it full.
#[derive(Debug, Clone)]
pub struct PlatformField {
    platforms: Vec<Platform>,
    generator: FieldGenerator,
    width: f32,
    despawn_y: f32,
    broken_fall_speed: f32,
    placement_fallbacks: u32,
}

impl PlatformField {
    /// Lay out the initial field with the generator's configured count.
    pub fn new(
        mut generator: FieldGenerator,
        window: &WindowConfig,
        physics: &PhysicsConfig,
    ) -> Self {
        let count = generator.config().platform_count;
        let initial = generator.spawn_initial_field(count);
        let despawn_y = window.height + generator.config().despawn_margin;
        Self {
            platforms: initial.platforms,
            generator,
            width: window.width,
            despawn_y,
            broken_fall_speed: physics.broken_fall_speed,
            placement_fallbacks: initial.fallbacks,
        }
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn platforms_mut(&mut self) -> &mut [Platform] {
        &mut self.platforms
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Initial placements that had to accept an overlap.
    pub fn placement_fallbacks(&self) -> u32 {
        self.placement_fallbacks
    }

    /// Smallest y in the field, i.e. the platform highest on screen.
    pub fn highest_y(&self) -> Option<f32> {
        self.platforms.iter().map(|p| p.y).reduce(f32::min)
    }

    /// Shift every platform down by `diff` (camera moving up). Springs follow.
    pub fn scroll(&mut self, diff: f32) {
        for p in &mut self.platforms {
            p.y += diff;
        }
    }

    /// Advance platform motion, then replace everything that fell out of view.
    /// Returns how many platforms were replaced.
    pub fn tick(&mut self) -> usize {
        for p in &mut self.platforms {
            if p.kind == PlatformKind::Moving {
                p.x += p.dx;
                if p.x < 0.0 || p.x > self.width {
                    p.dx = -p.dx;
                }
            }
            if p.broken {
                p.y += self.broken_fall_speed;
            }
        }

        let before = self.platforms.len();
        let despawn_y = self.despawn_y;
        self.platforms.retain(|p| p.y <= despawn_y);
        let removed = before - self.platforms.len();

        for _ in 0..removed {
            let highest = self.highest_y();
            let replacement = self.generator.spawn_replacement(highest);
            tracing::trace!(
                x = replacement.x,
                y = replacement.y,
                kind = ?replacement.kind,
                "Spawned replacement platform"
            );
            self.platforms.push(replacement);
        }

        removed
    }

    #[cfg(test)]
    pub(crate) fn replace_platforms(&mut self, platforms: Vec<Platform>) {
        self.platforms = platforms;
    }
}
