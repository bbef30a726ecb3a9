//! Stacking layout
//!
//! Sections are stacked top to bottom. The hero fills the viewport; every
//! other section is as tall as its padded content. Inside a section, flow
//! slots are stacked in a centered content column, fill slots cover the whole
//! section and anchored slots sit at a fractional position.

use crate::error::{Result, SiteError};
use crate::page::{Page, Placement, Section, SectionKind, Slot};
use folio_core::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Viewport and spacing settings
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Maximum width of the content column
    pub content_width: f32,
    /// Vertical padding above and below section content
    pub section_padding: f32,
    /// Space between stacked slots
    pub block_gap: f32,
    /// Base font size used to estimate text heights
    pub font_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            content_width: 1152.0,
            section_padding: 128.0,
            block_gap: 48.0,
            font_size: 18.0,
        }
    }
}

/// Size of anchored decorations
const ANCHOR_SIZE: f32 = 24.0;

/// Floating navigation bar geometry (viewport coordinates)
const NAV_TOP: f32 = 32.0;
const NAV_HEIGHT: f32 = 56.0;
const NAV_ITEM_WIDTH: f32 = 112.0;

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("content_width", self.content_width),
            ("font_size", self.font_size),
        ];
        for (name, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(SiteError::InvalidLayout(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("section_padding", self.section_padding),
            ("block_gap", self.block_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SiteError::InvalidLayout(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Width actually available to the content column
    pub fn column_width(&self) -> f32 {
        self.content_width.min(self.viewport_width)
    }

    pub fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport_width, self.viewport_height)
    }

    /// Estimated height of a text block at `scale` times the base font size
    ///
    /// Each paragraph wraps independently; glyphs are assumed half as wide
    /// as they are tall.
    pub fn text_height(&self, text: &str, scale: f32) -> f32 {
        let font = self.font_size * scale;
        let per_line = ((self.column_width() / (font * 0.5)).floor() as usize).max(1);
        let lines: usize = text
            .lines()
            .map(|paragraph| paragraph.chars().count().div_ceil(per_line).max(1))
            .sum();
        lines.max(1) as f32 * font * 1.5
    }

    /// Height a section needs for its flow content
    pub fn section_height(&self, kind: SectionKind, slots: &[Slot]) -> f32 {
        let flow: Vec<f32> = slots
            .iter()
            .filter(|slot| slot.placement == Placement::Flow)
            .map(|slot| slot.height)
            .collect();
        let gaps = flow.len().saturating_sub(1) as f32 * self.block_gap;
        let content = flow.iter().sum::<f32>() + gaps;

        match kind {
            // Full-screen and vertically centered, so no padding
            SectionKind::Hero => content.max(self.viewport_height),
            _ => content + self.section_padding * 2.0,
        }
    }

    /// Place every section and slot; returns the total page height
    pub fn apply(&self, page: &mut Page) -> f32 {
        let mut y = 0.0;
        for section in page.sections.iter_mut() {
            y += self.place_section(section, y);
        }
        self.place_overlay(&mut page.overlay);
        page.viewport = self.viewport();
        page.height = y;

        tracing::debug!(
            sections = page.sections.len(),
            height = y,
            "Layout applied"
        );
        y
    }

    fn place_section(&self, section: &mut Section, top: f32) -> f32 {
        let height = self.section_height(section.kind, &section.slots);
        section.rect = Rect::new(0.0, top, self.viewport_width, height);

        let column = self.column_width();
        let column_x = (self.viewport_width - column) * 0.5;
        let flow_total = section
            .slots
            .iter()
            .filter(|slot| slot.placement == Placement::Flow)
            .map(|slot| slot.height + self.block_gap)
            .sum::<f32>()
            - self.block_gap;
        // Hero content is vertically centered; other sections start below padding
        let mut cursor = match section.kind {
            SectionKind::Hero => top + ((height - flow_total.max(0.0)) * 0.5),
            _ => top + self.section_padding,
        };

        let bounds = section.rect;
        for slot in section.slots.iter_mut() {
            slot.rect = match slot.placement {
                Placement::Flow => {
                    let rect = Rect::new(column_x, cursor, column, slot.height);
                    cursor += slot.height + self.block_gap;
                    rect
                }
                Placement::Fill => bounds,
                Placement::Anchor { x, y } => Rect::new(
                    bounds.x + bounds.width * x - ANCHOR_SIZE * 0.5,
                    bounds.y + bounds.height * y - ANCHOR_SIZE * 0.5,
                    ANCHOR_SIZE,
                    slot.height.max(ANCHOR_SIZE),
                ),
            };
        }
        height
    }

    fn place_overlay(&self, overlay: &mut [Slot]) {
        for slot in overlay.iter_mut() {
            let items = slot.text.split(" · ").count().max(1) as f32;
            let width = (items * NAV_ITEM_WIDTH).min(self.viewport_width);
            slot.rect = Rect::new(
                (self.viewport_width - width) * 0.5,
                NAV_TOP,
                width,
                NAV_HEIGHT,
            );
        }
    }
}
