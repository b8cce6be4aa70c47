use rand::Rng;
use vello::kurbo::{Point, Size, Vec2};

pub const PARTICLE_COUNT: usize = 50;

/// Largest per-axis speed, in pixels per tick.
pub const MAX_SPEED: f64 = 0.25;

/// One decorative point in the background field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: u32,
    pub position: Point,
    /// Displacement per tick.
    pub velocity: Vec2,
    /// Diameter in logical pixels.
    pub size: f64,
    pub opacity: f64,
    /// Seconds for one full twinkle cycle.
    pub pulse_period: f64,
}

/// Opacity multiplier and scale of a particle at some point of its twinkle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Twinkle {
    pub opacity: f64,
    pub scale: f64,
}

impl Twinkle {
    pub const REST: Self = Self {
        opacity: 1.0,
        scale: 1.0,
    };
}

impl Particle {
    /// Moves by one tick, wrapping around the edges of `bounds`.
    pub fn step(&mut self, bounds: Size) {
        let moved = self.position + self.velocity;
        self.position = Point::new(wrap(moved.x, bounds.width), wrap(moved.y, bounds.height));
    }

    /// Dims to `dip` of its opacity and grows to 1.5x halfway through each
    /// cycle, easing in and out.
    pub fn twinkle(&self, elapsed_secs: f64, dip: f64) -> Twinkle {
        if self.pulse_period <= 0.0 {
            return Twinkle::REST;
        }
        let phase = (elapsed_secs / self.pulse_period).fract();
        let triangle = 1.0 - (2.0 * phase - 1.0).abs();
        let eased = triangle * triangle * (3.0 - 2.0 * triangle);
        Twinkle {
            opacity: 1.0 - (1.0 - dip) * eased,
            scale: 1.0 + 0.5 * eased,
        }
    }
}

/// Wraps `value` into `[0, max)`.
fn wrap(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(max);
    // rem_euclid can round up to `max` for tiny negative inputs
    if wrapped >= max {
        0.0
    } else {
        wrapped
    }
}

/// The animated set of background particles, seeded from an injected random source.
pub struct ParticleField<R> {
    particles: Vec<Particle>,
    bounds: Size,
    rng: R,
}

impl<R: Rng> ParticleField<R> {
    /// Creates an empty field; call [`ParticleField::regenerate`] once the viewport is known.
    pub fn new(rng: R) -> Self {
        Self {
            particles: Vec::with_capacity(PARTICLE_COUNT),
            bounds: Size::ZERO,
            rng,
        }
    }

    /// Replaces the whole set with fresh random particles covering the viewport.
    ///
    /// Viewports with no area (e.g. a minimised window) are ignored.
    pub fn regenerate(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            log::debug!("Skipping particle regeneration for empty viewport {width}x{height}");
            return;
        }

        let rng = &mut self.rng;
        self.particles = (0..PARTICLE_COUNT as u32)
            .map(|id| Particle {
                id,
                position: Point::new(rng.random_range(0.0..width), rng.random_range(0.0..height)),
                velocity: Vec2::new(
                    rng.random_range(-MAX_SPEED..MAX_SPEED),
                    rng.random_range(-MAX_SPEED..MAX_SPEED),
                ),
                size: rng.random_range(1.0..4.0),
                opacity: rng.random_range(0.2..1.0),
                pulse_period: rng.random_range(3.0..5.0),
            })
            .collect();
        self.bounds = Size::new(width, height);
        log::debug!("Regenerated {} particles for {width}x{height}", self.particles.len());
    }

    /// Advances every particle by its velocity.
    pub fn tick(&mut self) {
        let bounds = self.bounds;
        for particle in &mut self.particles {
            particle.step(bounds);
        }
    }

    /// Current particles, for rendering.
    pub fn snapshot(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_field(seed: u64) -> ParticleField<StdRng> {
        ParticleField::new(StdRng::seed_from_u64(seed))
    }

    fn particle_at(x: f64, y: f64, dx: f64, dy: f64) -> Particle {
        Particle {
            id: 0,
            position: Point::new(x, y),
            velocity: Vec2::new(dx, dy),
            size: 2.0,
            opacity: 0.5,
            pulse_period: 4.0,
        }
    }

    #[test]
    fn regenerate_yields_fifty_particles_within_ranges() {
        let mut field = seeded_field(7);
        field.regenerate(1280.0, 720.0);

        let particles = field.snapshot();
        assert_eq!(particles.len(), PARTICLE_COUNT);
        for particle in particles {
            assert!((0.0..1280.0).contains(&particle.position.x));
            assert!((0.0..720.0).contains(&particle.position.y));
            assert!((-MAX_SPEED..MAX_SPEED).contains(&particle.velocity.x));
            assert!((-MAX_SPEED..MAX_SPEED).contains(&particle.velocity.y));
            assert!((1.0..4.0).contains(&particle.size));
            assert!((0.2..1.0).contains(&particle.opacity));
        }
    }

    #[test]
    fn ids_are_stable_indices() {
        let mut field = seeded_field(1);
        field.regenerate(100.0, 100.0);
        let ids: Vec<u32> = field.snapshot().iter().map(|p| p.id).collect();
        assert_eq!(ids, (0..PARTICLE_COUNT as u32).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_regenerates_same_field() {
        let mut first = seeded_field(42);
        let mut second = seeded_field(42);
        first.regenerate(800.0, 600.0);
        second.regenerate(800.0, 600.0);
        assert_eq!(first.snapshot(), second.snapshot());
    }

    #[test]
    fn regenerate_replaces_the_whole_set() {
        let mut field = seeded_field(3);
        field.regenerate(800.0, 600.0);
        let before = field.snapshot().to_vec();

        field.regenerate(200.0, 100.0);

        assert_eq!(field.snapshot().len(), PARTICLE_COUNT);
        assert_ne!(field.snapshot(), before.as_slice());
        assert_eq!(field.bounds(), Size::new(200.0, 100.0));
        assert!(field
            .snapshot()
            .iter()
            .all(|p| p.position.x < 200.0 && p.position.y < 100.0));
    }

    #[test]
    fn empty_viewport_keeps_previous_field() {
        let mut field = seeded_field(9);
        field.regenerate(400.0, 300.0);
        let before = field.snapshot().to_vec();

        field.regenerate(0.0, 300.0);

        assert_eq!(field.snapshot(), before.as_slice());
        assert_eq!(field.bounds(), Size::new(400.0, 300.0));
    }

    #[test]
    fn step_wraps_past_right_edge() {
        let width = 100.0;
        let mut particle = particle_at(width - 0.1, 50.0, 0.5, 0.0);

        particle.step(Size::new(width, 100.0));

        assert!((0.0..=0.4 + 1e-9).contains(&particle.position.x));
        assert!((particle.position.x - 0.4).abs() < 1e-9);
    }

    #[test]
    fn step_wraps_below_zero() {
        let mut particle = particle_at(0.1, 0.05, -0.2, -0.1);

        particle.step(Size::new(100.0, 80.0));

        assert!((particle.position.x - 99.9).abs() < 1e-9);
        assert!((particle.position.y - 79.95).abs() < 1e-9);
    }

    #[test]
    fn tick_keeps_every_particle_inside_viewport() {
        let mut field = seeded_field(11);
        field.regenerate(50.0, 30.0);

        for _ in 0..2_000 {
            field.tick();
            for particle in field.snapshot() {
                assert!((0.0..50.0).contains(&particle.position.x));
                assert!((0.0..30.0).contains(&particle.position.y));
            }
        }
    }

    #[test]
    fn tick_moves_by_velocity() {
        let mut field = seeded_field(5);
        field.regenerate(10_000.0, 10_000.0);
        let before = field.snapshot().to_vec();

        field.tick();

        for (old, new) in before.iter().zip(field.snapshot()) {
            let expected_x = (old.position.x + old.velocity.x).rem_euclid(10_000.0);
            assert!((new.position.x - expected_x).abs() < 1e-9);
        }
    }

    #[test]
    fn wrap_never_returns_max() {
        assert_eq!(wrap(-1e-20, 100.0), 0.0);
        assert_eq!(wrap(100.0, 100.0), 0.0);
        assert_eq!(wrap(5.0, 0.0), 0.0);
    }

    #[test]
    fn twinkle_dims_halfway_and_rests_at_cycle_start() {
        let particle = particle_at(0.0, 0.0, 0.0, 0.0);

        let start = particle.twinkle(0.0, 0.3);
        assert!((start.opacity - 1.0).abs() < 1e-9);
        assert!((start.scale - 1.0).abs() < 1e-9);

        let middle = particle.twinkle(particle.pulse_period / 2.0, 0.3);
        assert!((middle.opacity - 0.3).abs() < 1e-9);
        assert!((middle.scale - 1.5).abs() < 1e-9);
    }

    #[test]
    fn light_twinkle_dims_from_sixty_to_twenty_percent() {
        let particle = particle_at(0.0, 0.0, 0.0, 0.0);
        let palette = crate::ui::Palette::light();
        let base = palette.particle_opacity as f64;

        let middle = particle.twinkle(particle.pulse_period / 2.0, palette.twinkle_dip);

        assert!((base * middle.opacity - 0.2).abs() < 1e-6);
    }
}
