use vello::peniko::Color;

use crate::theme::ThemeMode;

/// Colour tokens for one theme mode.
pub struct Palette {
    pub background: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub grid: Color,
    pub particle: Color,
    /// Multiplier applied to every particle's opacity.
    pub particle_opacity: f32,
    /// Glow radius as a multiple of particle size.
    pub glow_factor: f64,
    /// Fraction of a particle's opacity left at the bottom of a twinkle.
    pub twinkle_dip: f64,
    /// Beam colours and peak opacities, top beam first.
    pub beams: [(Color, f32); 2],
    /// Soft glows anchored top-left and bottom-right.
    pub corner_glows: [Color; 2],
    pub center_glow: Color,
    pub switch_track: Color,
    pub switch_border: Color,
    pub switch_knob: Color,
    pub typography: Typography,
}

/// Font size and spacing tokens.
pub struct Typography {
    pub title_size: f32,
    pub body_size: f32,
    pub small_size: f32,
    pub line_height_factor: f32,
}

const TYPOGRAPHY: Typography = Typography {
    title_size: 48.0,
    body_size: 18.0,
    small_size: 13.0,
    line_height_factor: 1.4,
};

const PURPLE: Color = Color::from_rgb8(155, 77, 255);
const CYAN: Color = Color::from_rgb8(34, 211, 238);
const BLUE: Color = Color::from_rgb8(59, 130, 246);
const LAVENDER: Color = Color::from_rgb8(192, 132, 252);

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Black backdrop with purple and cyan glows.
    pub fn dark() -> Self {
        Self {
            background: Color::from_rgb8(0, 0, 0),
            text_primary: Color::from_rgb8(0xf4, 0xf4, 0xf5),
            text_secondary: Color::from_rgb8(0xa7, 0x8b, 0xfa),
            accent: PURPLE,
            grid: PURPLE.with_alpha(0.1 * 0.2),
            particle: LAVENDER,
            particle_opacity: 1.0,
            glow_factor: 3.0,
            twinkle_dip: 0.3,
            beams: [(PURPLE, 0.5), (CYAN, 0.3)],
            corner_glows: [
                Color::from_rgb8(147, 51, 234).with_alpha(0.1),
                Color::from_rgb8(8, 145, 178).with_alpha(0.1),
            ],
            center_glow: Color::from_rgb8(168, 85, 247).with_alpha(0.05),
            switch_track: Color::from_rgb8(88, 28, 135),
            switch_border: PURPLE.with_alpha(0.5),
            switch_knob: Color::from_rgb8(168, 85, 247),
            typography: TYPOGRAPHY,
        }
    }

    /// Pale blue backdrop with softer blue and purple glows.
    pub fn light() -> Self {
        Self {
            background: Color::from_rgb8(0xef, 0xf6, 0xff),
            text_primary: Color::from_rgb8(0x1e, 0x29, 0x3b),
            text_secondary: Color::from_rgb8(0x25, 0x63, 0xeb),
            accent: BLUE,
            grid: BLUE.with_alpha(0.08 * 0.1),
            particle: Color::from_rgb8(96, 165, 250),
            particle_opacity: 0.6,
            glow_factor: 2.0,
            // 0.6 dims to 0.2
            twinkle_dip: 0.2 / 0.6,
            beams: [(Color::from_rgb8(96, 165, 250), 0.25), (LAVENDER, 0.15)],
            corner_glows: [
                Color::from_rgb8(96, 165, 250).with_alpha(0.05),
                LAVENDER.with_alpha(0.05),
            ],
            center_glow: Color::from_rgb8(147, 197, 253).with_alpha(0.03),
            switch_track: Color::from_rgb8(0xbf, 0xdb, 0xfe),
            switch_border: Color::from_rgb8(147, 197, 253).with_alpha(0.5),
            switch_knob: Color::from_rgb8(251, 146, 60),
            typography: TYPOGRAPHY,
        }
    }
}
