use std::time::{Duration, Instant};

use rand::Rng;
use vello::kurbo::{Affine, Circle, Line, Point, Rect, Size, Stroke};
use vello::peniko::{Brush, Color, Fill, Gradient};
use vello::Scene;

use crate::error::FolioError;
use crate::particles::{ParticleField, Twinkle};
use crate::schedule::{Scheduler, TaskGuard};
use crate::theme::ThemeHandle;
use crate::ui::{DrawContext, Palette};
use crate::viewport::{ResizeSignal, ResizeSubscription};

/// Particle tick period (~60 Hz).
pub const TICK_PERIOD: Duration = Duration::from_millis(16);

const GRID_CELL: f64 = 100.0;
const GRID_DRIFT_SECS: f64 = 20.0;
const BEAM_THICKNESS: f64 = 2.0;
/// (vertical position as a fraction of height, cycle seconds, delay seconds)
const BEAMS: [(f64, f64, f64); 2] = [(0.25, 4.0, 0.0), (0.75, 5.0, 1.0)];
const CORNER_GLOW_RADIUS: f64 = 192.0;
const CENTER_GLOW_RADIUS: f64 = 400.0;

/// Animated backdrop: drifting grid, twinkling particles, energy beams and ambient glows.
///
/// Owns its tick task and resize subscription; both are released when the
/// animator is dropped.
pub struct BackgroundAnimator<R> {
    field: ParticleField<R>,
    theme: ThemeHandle,
    ticker: TaskGuard,
    resizes: ResizeSubscription,
}

impl<R: Rng> BackgroundAnimator<R> {
    /// Subscribes to resizes, starts ticking and fills the current viewport.
    pub fn mount(
        theme: ThemeHandle,
        scheduler: &Scheduler,
        viewport: &mut ResizeSignal,
        rng: R,
        now: Instant,
    ) -> Self {
        let mut field = ParticleField::new(rng);
        let size = viewport.current();
        field.regenerate(size.width, size.height);

        Self {
            field,
            theme,
            ticker: scheduler.repeat_every(TICK_PERIOD, now),
            resizes: viewport.subscribe(),
        }
    }

    /// Applies the latest resize, then runs every tick that fell due.
    pub fn update(&mut self, now: Instant) {
        if let Some(size) = self.resizes.latest() {
            self.field.regenerate(size.width, size.height);
        }
        for _ in 0..self.ticker.take_due(now) {
            self.field.tick();
        }
    }

    pub fn field(&self) -> &ParticleField<R> {
        &self.field
    }

    /// Paints the backdrop. With `animate` off, time-driven effects are drawn at rest.
    pub fn paint(
        &self,
        ctx: &mut DrawContext,
        elapsed: Duration,
        animate: bool,
    ) -> Result<(), FolioError> {
        let palette = Palette::for_mode(self.theme.current()?);
        let bounds = self.field.bounds();
        let seconds = if animate { elapsed.as_secs_f64() } else { 0.0 };

        self.paint_grid(ctx.scene, &palette, seconds);
        paint_glows(ctx.scene, &palette, bounds);
        self.paint_particles(ctx.scene, &palette, seconds, animate);
        if animate {
            paint_beams(ctx.scene, &palette, bounds.width, bounds.height, seconds);
        }
        Ok(())
    }

    fn paint_grid(&self, scene: &mut Scene, palette: &Palette, seconds: f64) {
        let bounds = self.field.bounds();
        let offset = (seconds / GRID_DRIFT_SECS).fract() * GRID_CELL;
        let stroke = Stroke::new(1.0);
        let brush = Brush::Solid(palette.grid);

        let mut x = offset - GRID_CELL;
        while x < bounds.width {
            let line = Line::new((x, 0.0), (x, bounds.height));
            scene.stroke(&stroke, Affine::IDENTITY, &brush, None, &line);
            x += GRID_CELL;
        }
        let mut y = offset - GRID_CELL;
        while y < bounds.height {
            let line = Line::new((0.0, y), (bounds.width, y));
            scene.stroke(&stroke, Affine::IDENTITY, &brush, None, &line);
            y += GRID_CELL;
        }
    }

    fn paint_particles(&self, scene: &mut Scene, palette: &Palette, seconds: f64, animate: bool) {
        for particle in self.field.snapshot() {
            let twinkle = if animate {
                particle.twinkle(seconds, palette.twinkle_dip)
            } else {
                Twinkle::REST
            };
            let opacity = (particle.opacity * twinkle.opacity) as f32 * palette.particle_opacity;
            let radius = particle.size / 2.0 * twinkle.scale;

            let glow = Circle::new(particle.position, particle.size * palette.glow_factor / 2.0);
            scene.fill(
                Fill::NonZero,
                Affine::IDENTITY,
                &Brush::Solid(palette.accent.with_alpha(opacity * 0.25)),
                None,
                &glow,
            );
            scene.fill(
                Fill::NonZero,
                Affine::IDENTITY,
                &Brush::Solid(palette.particle.with_alpha(opacity)),
                None,
                &Circle::new(particle.position, radius),
            );
        }
    }
}

/// Glow centres, radii and colours: top-left, bottom-right, then the viewport centre.
fn glows(bounds: Size, palette: &Palette) -> [(Point, f64, Color); 3] {
    let [top_left, bottom_right] = palette.corner_glows;
    [
        (Point::ZERO, CORNER_GLOW_RADIUS, top_left),
        (
            Point::new(bounds.width, bounds.height),
            CORNER_GLOW_RADIUS,
            bottom_right,
        ),
        (
            Point::new(bounds.width / 2.0, bounds.height / 2.0),
            CENTER_GLOW_RADIUS,
            palette.center_glow,
        ),
    ]
}

fn paint_glows(scene: &mut Scene, palette: &Palette, bounds: Size) {
    for (center, radius, color) in glows(bounds, palette) {
        scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            &Brush::Solid(color),
            None,
            &Circle::new(center, radius),
        );
    }
}

/// Horizontal beams that stretch from the centre and fade out on a loop.
fn paint_beams(scene: &mut Scene, palette: &Palette, width: f64, height: f64, seconds: f64) {
    for (index, (fraction, cycle, delay)) in BEAMS.into_iter().enumerate() {
        let local = seconds - delay;
        if local < 0.0 {
            continue;
        }
        let strength = pulse((local / cycle).fract());
        if strength <= 0.0 {
            continue;
        }

        let (color, peak) = palette.beams[index];
        let span = width * strength;
        let y = height * fraction;
        let (left, right) = ((width - span) / 2.0, (width + span) / 2.0);
        let beam = Rect::new(
            left,
            y - BEAM_THICKNESS / 2.0,
            right,
            y + BEAM_THICKNESS / 2.0,
        );
        let gradient = beam_gradient(left, right, y, color.with_alpha(peak * strength as f32));
        scene.fill(Fill::NonZero, Affine::IDENTITY, &gradient, None, &beam);
    }
}

/// Transparent at both ends, `color` in the middle.
fn beam_gradient(left: f64, right: f64, y: f64, color: Color) -> Gradient {
    let clear = color.with_alpha(0.0);
    Gradient::new_linear((left, y), (right, y)).with_stops([
        (0.0, clear),
        (0.5, color),
        (1.0, clear),
    ])
}

/// 0 → 1 → 0 over one cycle with ease-in-out.
fn pulse(phase: f64) -> f64 {
    let triangle = 1.0 - (2.0 * phase - 1.0).abs();
    triangle * triangle * (3.0 - 2.0 * triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::PARTICLE_COUNT;
    use crate::theme::{MemoryPreferences, ThemeStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mount(
        store: &ThemeStore,
        scheduler: &Scheduler,
        viewport: &mut ResizeSignal,
        now: Instant,
    ) -> BackgroundAnimator<StdRng> {
        BackgroundAnimator::mount(
            store.handle(),
            scheduler,
            viewport,
            StdRng::seed_from_u64(21),
            now,
        )
    }

    #[test]
    fn mount_fills_current_viewport() {
        let store = ThemeStore::initialize(Box::new(MemoryPreferences::new()));
        let scheduler = Scheduler::new();
        let mut viewport = ResizeSignal::new(Size::new(900.0, 600.0));

        let animator = mount(&store, &scheduler, &mut viewport, Instant::now());

        assert_eq!(animator.field().snapshot().len(), PARTICLE_COUNT);
        assert_eq!(animator.field().bounds(), Size::new(900.0, 600.0));
        assert_eq!(scheduler.active_tasks(), 1);
        assert_eq!(viewport.subscriber_count(), 1);
    }

    #[test]
    fn update_runs_due_ticks_only() {
        let store = ThemeStore::initialize(Box::new(MemoryPreferences::new()));
        let scheduler = Scheduler::new();
        let mut viewport = ResizeSignal::new(Size::new(10_000.0, 10_000.0));
        let start = Instant::now();
        let mut animator = mount(&store, &scheduler, &mut viewport, start);
        let initial = animator.field().snapshot().to_vec();

        animator.update(start + Duration::from_millis(5));
        assert_eq!(animator.field().snapshot(), initial.as_slice());

        animator.update(start + TICK_PERIOD * 2);
        for (old, new) in initial.iter().zip(animator.field().snapshot()) {
            let expected = old.position.x + old.velocity.x * 2.0;
            assert!((new.position.x - expected.rem_euclid(10_000.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn resize_regenerates_field() {
        let store = ThemeStore::initialize(Box::new(MemoryPreferences::new()));
        let scheduler = Scheduler::new();
        let mut viewport = ResizeSignal::new(Size::new(900.0, 600.0));
        let start = Instant::now();
        let mut animator = mount(&store, &scheduler, &mut viewport, start);

        viewport.emit(Size::new(320.0, 240.0));
        animator.update(start);

        assert_eq!(animator.field().bounds(), Size::new(320.0, 240.0));
        assert_eq!(animator.field().snapshot().len(), PARTICLE_COUNT);
    }

    #[test]
    fn dropping_animator_releases_timer_and_listener() {
        let store = ThemeStore::initialize(Box::new(MemoryPreferences::new()));
        let scheduler = Scheduler::new();
        let mut viewport = ResizeSignal::new(Size::new(900.0, 600.0));
        let animator = mount(&store, &scheduler, &mut viewport, Instant::now());

        drop(animator);
        viewport.emit(Size::new(100.0, 100.0));

        assert_eq!(scheduler.active_tasks(), 0);
        assert_eq!(viewport.subscriber_count(), 0);
    }

    #[test]
    fn field_stays_static_without_scheduler() {
        let store = ThemeStore::initialize(Box::new(MemoryPreferences::new()));
        let scheduler = Scheduler::new();
        let mut viewport = ResizeSignal::new(Size::new(900.0, 600.0));
        let start = Instant::now();
        let mut animator = mount(&store, &scheduler, &mut viewport, start);
        let initial = animator.field().snapshot().to_vec();
        drop(scheduler);

        animator.update(start + Duration::from_secs(1));

        assert_eq!(animator.field().snapshot(), initial.as_slice());
    }

    #[test]
    fn paint_fails_once_theme_store_is_gone() {
        let store = ThemeStore::initialize(Box::new(MemoryPreferences::new()));
        let scheduler = Scheduler::new();
        let mut viewport = ResizeSignal::new(Size::new(200.0, 200.0));
        let animator = mount(&store, &scheduler, &mut viewport, Instant::now());
        drop(store);

        let mut scene = vello::Scene::new();
        let mut text = crate::text::TextSystem::new();
        let palette = Palette::dark();
        let mut ctx = DrawContext {
            scene: &mut scene,
            text: &mut text,
            palette: &palette,
        };

        let result = animator.paint(&mut ctx, Duration::ZERO, true);
        assert!(matches!(result, Err(FolioError::ThemeOutOfScope)));
    }

    #[test]
    fn glows_include_centre_of_viewport() {
        let palette = Palette::dark();
        let glows = glows(Size::new(800.0, 600.0), &palette);

        let (center, radius, color) = glows[2];
        assert_eq!(center, Point::new(400.0, 300.0));
        assert_eq!(radius, CENTER_GLOW_RADIUS);
        assert_eq!(color.components, palette.center_glow.components);
        assert_eq!(glows[1].0, Point::new(800.0, 600.0));
    }

    #[test]
    fn beams_fade_out_at_both_ends() {
        let color = Palette::dark().beams[0].0.with_alpha(0.5);
        let gradient = beam_gradient(100.0, 500.0, 40.0, color);

        let offsets: Vec<f32> = gradient.stops.iter().map(|stop| stop.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
        assert_eq!(gradient.stops[0].color.components[3], 0.0);
        assert_eq!(gradient.stops[2].color.components[3], 0.0);
        assert!(gradient.stops[1].color.components[3] > 0.0);
    }

    #[test]
    fn pulse_peaks_mid_cycle() {
        assert_eq!(pulse(0.0), 0.0);
        assert!((pulse(0.5) - 1.0).abs() < 1e-9);
        assert!(pulse(0.25) > 0.0 && pulse(0.25) < 1.0);
    }
}
