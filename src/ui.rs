mod canvas;
mod label;
mod palette;
mod rect;
mod switch;

pub use canvas::DrawContext;
pub use hit_test::{HitId, HitSink};
pub use label::{Align, Label};
pub use palette::Palette;
pub use rect::Rect;
pub use switch::{ToggleSwitch, SWITCH_HEIGHT, SWITCH_WIDTH};
