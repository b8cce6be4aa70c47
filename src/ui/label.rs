use crate::text::{draw_text, measure_text};
use crate::ui::canvas::DrawContext;
use crate::ui::rect::Rect;
use vello::peniko::Color;

/// Horizontal alignment for label text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Align {
    Left,
    Center,
}

/// Builder for a single line of text, vertically centred in its bounds.
pub struct Label<'a> {
    text: &'a str,
    font_size: f32,
    color: Color,
    align: Align,
}

impl<'a> Label<'a> {
    pub fn new(text: &'a str, font_size: f32, color: Color) -> Self {
        Self {
            text,
            font_size,
            color,
            align: Align::Left,
        }
    }

    pub fn align(mut self, value: Align) -> Self {
        self.align = value;
        self
    }

    pub fn paint(self, ctx: &mut DrawContext, bounds: Rect) {
        let x = match self.align {
            Align::Left => bounds.x,
            Align::Center => {
                let width = measure_text(ctx.text, self.text, self.font_size).width;
                bounds.x + (bounds.width - width) / 2.0
            }
        };
        let line_height = self.font_size * ctx.palette.typography.line_height_factor;
        let y = bounds.y + (bounds.height - line_height) / 2.0;

        draw_text(
            ctx.scene,
            ctx.text,
            self.text,
            self.font_size,
            (x, y),
            self.color,
        );
    }
}
