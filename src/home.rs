use std::time::Duration;

use taffy::style_helpers::{length, zero, TaffyMaxContent};
use taffy::{AlignItems, FlexDirection, NodeId, Size, Style, TaffyTree};

use crate::config::SiteConfig;
use crate::error::FolioError;
use crate::theme::{ThemeHandle, ThemeMode};
use crate::ui::{
    Align, DrawContext, HitId, HitSink, Label, Rect, ToggleSwitch, SWITCH_HEIGHT, SWITCH_WIDTH,
};

const SECTION_GAP: f32 = 32.0;
const HINT_GAP: f32 = 12.0;
/// Exponential approach rate of the switch knob, per second.
const KNOB_RATE: f32 = 18.0;
const KNOB_EPSILON: f32 = 0.001;

pub const HIT_THEME_TOGGLE: HitId = HitId(1);

/// Action returned by hit-testing the home screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HomeAction {
    ToggleTheme,
    None,
}

impl HomeAction {
    pub fn from_hit(id: HitId) -> Self {
        if id == HIT_THEME_TOGGLE {
            Self::ToggleTheme
        } else {
            Self::None
        }
    }
}

/// Centered hero: headline, tagline, theme switch and a keyboard hint.
pub struct HomeScreen {
    headline: String,
    tagline: String,
    theme: ThemeHandle,
    /// Knob position, 0.0 = dark, 1.0 = light. `None` until the first frame.
    knob: Option<f32>,
}

impl HomeScreen {
    pub fn new(site: &SiteConfig, theme: ThemeHandle) -> Self {
        Self {
            headline: site.headline.clone(),
            tagline: site.tagline.clone(),
            theme,
            knob: None,
        }
    }

    pub fn handle_action(&mut self, action: HomeAction) -> Result<(), FolioError> {
        match action {
            HomeAction::ToggleTheme => {
                let mode = self.theme.toggle()?;
                log::debug!("Toggle switch flipped to {mode}");
            }
            HomeAction::None => {}
        }
        Ok(())
    }

    /// Moves the knob toward the active mode; snaps while transitions are suppressed.
    pub fn advance(&mut self, dt: Duration) -> Result<(), FolioError> {
        let target = match self.theme.current()? {
            ThemeMode::Dark => 0.0,
            ThemeMode::Light => 1.0,
        };
        let knob = match self.knob {
            Some(knob) if !self.theme.transitions_suppressed()? => {
                let blend = 1.0 - (-dt.as_secs_f32() * KNOB_RATE).exp();
                let next = knob + (target - knob) * blend;
                if (target - next).abs() < KNOB_EPSILON {
                    target
                } else {
                    next
                }
            }
            _ => target,
        };
        self.knob = Some(knob);
        Ok(())
    }

    /// True while the knob is still travelling.
    pub fn is_animating(&self) -> bool {
        self.knob.is_some_and(|knob| knob != 0.0 && knob != 1.0)
    }

    pub fn render(
        &self,
        ctx: &mut DrawContext,
        hits: &mut HitSink,
        bounds: Rect,
    ) -> Result<(), FolioError> {
        let typography = &ctx.palette.typography;
        let title_height = typography.title_size * typography.line_height_factor;
        let body_height = typography.body_size * typography.line_height_factor;
        let hint_height = typography.small_size * typography.line_height_factor;
        let content_height =
            title_height + body_height + SECTION_GAP + SWITCH_HEIGHT + HINT_GAP + hint_height;
        let padding_top = bounds.height * 0.45 - content_height / 2.0;

        let mut tree: TaffyTree<()> = TaffyTree::new();
        let headline_node = fixed_leaf(&mut tree, bounds.width, title_height)?;
        let tagline_node = fixed_leaf(&mut tree, bounds.width, body_height)?;
        let gap_node = fixed_leaf(&mut tree, 0.0, SECTION_GAP)?;
        let switch_node = fixed_leaf(&mut tree, SWITCH_WIDTH, SWITCH_HEIGHT)?;
        let hint_gap_node = fixed_leaf(&mut tree, 0.0, HINT_GAP)?;
        let hint_node = fixed_leaf(&mut tree, bounds.width, hint_height)?;

        let content = tree.new_with_children(
            Style {
                flex_direction: FlexDirection::Column,
                align_items: Some(AlignItems::Center),
                size: Size {
                    width: length(bounds.width),
                    height: taffy::Dimension::Auto,
                },
                ..Default::default()
            },
            &[
                headline_node,
                tagline_node,
                gap_node,
                switch_node,
                hint_gap_node,
                hint_node,
            ],
        )?;

        let root = tree.new_with_children(
            Style {
                flex_direction: FlexDirection::Column,
                size: Size {
                    width: length(bounds.width),
                    height: length(bounds.height),
                },
                padding: taffy::Rect {
                    top: length(padding_top.max(0.0)),
                    left: zero(),
                    right: zero(),
                    bottom: zero(),
                },
                ..Default::default()
            },
            &[content],
        )?;

        tree.compute_layout(root, Size::MAX_CONTENT)?;

        let root_rect = Rect::from_layout(tree.layout(root)?, bounds.x, bounds.y);
        let content_rect = Rect::from_layout(tree.layout(content)?, root_rect.x, root_rect.y);
        let place = |node| -> Result<Rect, FolioError> {
            Ok(Rect::from_layout(
                tree.layout(node)?,
                content_rect.x,
                content_rect.y,
            ))
        };

        let mode = self.theme.current()?;
        let hint = match mode {
            ThemeMode::Dark => "Press T or click the switch for light mode",
            ThemeMode::Light => "Press T or click the switch for dark mode",
        };

        Label::new(&self.headline, ctx.palette.typography.title_size, ctx.palette.text_primary)
            .align(Align::Center)
            .paint(ctx, place(headline_node)?);
        Label::new(&self.tagline, ctx.palette.typography.body_size, ctx.palette.text_secondary)
            .align(Align::Center)
            .paint(ctx, place(tagline_node)?);

        let progress = self.knob.unwrap_or(match mode {
            ThemeMode::Dark => 0.0,
            ThemeMode::Light => 1.0,
        });
        ToggleSwitch::new(place(switch_node)?, progress)
            .hit_id(HIT_THEME_TOGGLE)
            .paint(ctx, hits);

        Label::new(hint, ctx.palette.typography.small_size, ctx.palette.text_secondary)
            .align(Align::Center)
            .paint(ctx, place(hint_node)?);

        Ok(())
    }
}

fn fixed_leaf(tree: &mut TaffyTree<()>, width: f32, height: f32) -> Result<NodeId, FolioError> {
    Ok(tree.new_leaf(Style {
        size: Size {
            width: length(width),
            height: length(height),
        },
        ..Default::default()
    })?)
}
