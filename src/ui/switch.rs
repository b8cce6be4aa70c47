use vello::kurbo::{Affine, Circle, Stroke};
use vello::peniko::{Brush, Fill};

use crate::ui::canvas::DrawContext;
use crate::ui::hit_test::{HitId, HitSink};
use crate::ui::rect::Rect;

pub const SWITCH_WIDTH: f32 = 64.0;
pub const SWITCH_HEIGHT: f32 = 32.0;
const PADDING: f32 = 4.0;
const KNOB_DIAMETER: f32 = SWITCH_HEIGHT - 2.0 * PADDING;

/// Horizontal travel of the knob between its two resting positions.
pub const KNOB_TRAVEL: f32 = SWITCH_WIDTH - KNOB_DIAMETER - 2.0 * PADDING;

/// Builder for the pill-shaped theme switch.
pub struct ToggleSwitch {
    bounds: Rect,
    progress: f32,
    hit_id: Option<HitId>,
}

impl ToggleSwitch {
    /// `progress` is 0.0 with the knob on the left (dark) and 1.0 on the right (light).
    pub fn new(bounds: Rect, progress: f32) -> Self {
        Self {
            bounds,
            progress: progress.clamp(0.0, 1.0),
            hit_id: None,
        }
    }

    pub fn hit_id(mut self, id: HitId) -> Self {
        self.hit_id = Some(id);
        self
    }

    /// Centre of the knob for the current progress.
    pub fn knob_center(&self) -> (f32, f32) {
        let radius = KNOB_DIAMETER / 2.0;
        (
            self.bounds.x + PADDING + radius + KNOB_TRAVEL * self.progress,
            self.bounds.y + self.bounds.height / 2.0,
        )
    }

    pub fn paint(self, ctx: &mut DrawContext, hits: &mut HitSink) {
        let track = self.bounds.to_rounded(self.bounds.height as f64 / 2.0);
        ctx.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            &Brush::Solid(ctx.palette.switch_track),
            None,
            &track,
        );
        ctx.scene.stroke(
            &Stroke::new(1.0),
            Affine::IDENTITY,
            &Brush::Solid(ctx.palette.switch_border),
            None,
            &track,
        );

        let (center_x, center_y) = self.knob_center();
        let radius = (KNOB_DIAMETER / 2.0) as f64;
        let knob = Circle::new((center_x as f64, center_y as f64), radius);
        let halo = Circle::new((center_x as f64, center_y as f64), radius * 1.3);
        ctx.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            &Brush::Solid(ctx.palette.switch_knob.with_alpha(0.35)),
            None,
            &halo,
        );
        ctx.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            &Brush::Solid(ctx.palette.switch_knob),
            None,
            &knob,
        );

        if let Some(id) = self.hit_id {
            hits.push(id, self.bounds);
        }
    }
}
