use std::collections::HashMap;
use std::sync::Arc;

use cosmic_text::fontdb;
use cosmic_text::{Attrs, Buffer, FontSystem, Metrics, Shaping};
use vello::kurbo::Affine;
use vello::peniko::{Blob, Brush, Color, Fill, FontData};
use vello::{Glyph, Scene};

/// Line height as a multiple of font size used for shaping.
const LINE_HEIGHT: f32 = 1.2;

/// Width and height of a shaped line.
#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
}

/// System fonts plus the vello copies of every face used so far.
pub struct TextSystem {
    font_system: FontSystem,
    faces: HashMap<fontdb::ID, FontData>,
}

impl Default for TextSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSystem {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            faces: HashMap::new(),
        }
    }

    fn shape(&mut self, text: &str, font_size: f32) -> Buffer {
        let metrics = Metrics::new(font_size, font_size * LINE_HEIGHT);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, Attrs::new(), Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    fn face(&mut self, id: fontdb::ID) -> Option<FontData> {
        if let Some(face) = self.faces.get(&id) {
            return Some(face.clone());
        }
        // collections (.ttc) hold several faces; the index picks ours
        let (bytes, index) = self
            .font_system
            .db()
            .with_face_data(id, |data, index| (data.to_vec(), index))?;
        let face = FontData::new(Blob::new(Arc::new(bytes)), index);
        self.faces.insert(id, face.clone());
        Some(face)
    }
}

fn line_width(buffer: &Buffer) -> f32 {
    buffer
        .layout_runs()
        .flat_map(|run| run.glyphs.iter())
        .map(|glyph| glyph.x + glyph.w)
        .fold(0.0, f32::max)
}

/// Measures a single line without drawing it.
pub fn measure_text(text_system: &mut TextSystem, text: &str, font_size: f32) -> TextMetrics {
    let buffer = text_system.shape(text, font_size);
    TextMetrics {
        width: line_width(&buffer),
        height: font_size * LINE_HEIGHT,
    }
}

/// Draws a single line with its top-left corner at `position`.
pub fn draw_text(
    scene: &mut Scene,
    text_system: &mut TextSystem,
    text: &str,
    font_size: f32,
    position: (f32, f32),
    color: Color,
) -> TextMetrics {
    let buffer = text_system.shape(text, font_size);
    let baseline = Affine::translate((
        position.0 as f64,
        (position.1 + font_size * LINE_HEIGHT) as f64,
    ));
    let brush = Brush::Solid(color);

    // Consecutive glyphs from the same face are drawn as one batch
    let mut batch: Vec<Glyph> = Vec::new();
    let mut batch_face: Option<fontdb::ID> = None;

    for run in buffer.layout_runs() {
        for glyph in run.glyphs.iter() {
            if batch_face != Some(glyph.font_id) {
                flush(scene, text_system, batch_face, &mut batch, font_size, baseline, &brush);
                batch_face = Some(glyph.font_id);
            }
            batch.push(Glyph {
                id: glyph.glyph_id as u32,
                x: glyph.x,
                y: 0.0,
            });
        }
    }
    flush(scene, text_system, batch_face, &mut batch, font_size, baseline, &brush);

    TextMetrics {
        width: line_width(&buffer),
        height: font_size * LINE_HEIGHT,
    }
}

fn flush(
    scene: &mut Scene,
    text_system: &mut TextSystem,
    face_id: Option<fontdb::ID>,
    batch: &mut Vec<Glyph>,
    font_size: f32,
    transform: Affine,
    brush: &Brush,
) {
    if batch.is_empty() {
        return;
    }
    if let Some(face) = face_id.and_then(|id| text_system.face(id)) {
        scene
            .draw_glyphs(&face)
            .font_size(font_size)
            .transform(transform)
            .brush(brush)
            .draw(Fill::NonZero, batch.iter().copied());
    }
    batch.clear();
}
