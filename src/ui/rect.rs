use vello::kurbo::RoundedRect;

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Places a Taffy layout box relative to its parent's origin.
    pub fn from_layout(layout: &taffy::Layout, parent_x: f32, parent_y: f32) -> Self {
        Self::new(
            parent_x + layout.location.x,
            parent_y + layout.location.y,
            layout.size.width,
            layout.size.height,
        )
    }

    /// Inclusive on all edges.
    pub fn contains(&self, point_x: f32, point_y: f32) -> bool {
        point_x >= self.x
            && point_x <= self.x + self.width
            && point_y >= self.y
            && point_y <= self.y + self.height
    }

    pub fn to_kurbo(self) -> vello::kurbo::Rect {
        vello::kurbo::Rect::new(
            self.x as f64,
            self.y as f64,
            (self.x + self.width) as f64,
            (self.y + self.height) as f64,
        )
    }

    pub fn to_rounded(self, radius: f64) -> RoundedRect {
        self.to_kurbo().to_rounded_rect(radius)
    }
}
