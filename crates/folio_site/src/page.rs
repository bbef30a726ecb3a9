//! Composed page structure
//!
//! A [`Page`] is a list of [`Section`]s plus a fixed overlay (the floating
//! navigation). Each section holds [`Slot`]s: one animated element with its
//! text, motion and layout rectangle.

use folio_animation::Motion;
use folio_core::geometry::Rect;

/// Role of a section on the page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Hero,
    About,
    /// Scroll-driven story chapter
    Story,
    Projects,
    Contact,
    Footer,
}

impl SectionKind {
    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::About => "about",
            SectionKind::Story => "story",
            SectionKind::Projects => "projects",
            SectionKind::Contact => "contact",
            SectionKind::Footer => "footer",
        }
    }
}

/// Where a slot sits inside its section
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Placement {
    /// Stacked in the content column
    #[default]
    Flow,
    /// Covers the whole section (backgrounds)
    Fill,
    /// Fractional position within the section (decorations)
    Anchor { x: f32, y: f32 },
}

/// Text revealed one character at a time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypewriterSpec {
    pub text: String,
    pub delay_ms: u32,
    pub speed_ms: u32,
}

/// One animated element
#[derive(Clone, Debug)]
pub struct Slot {
    pub id: String,
    pub text: String,
    pub motion: Motion,
    pub typewriter: Option<TypewriterSpec>,
    pub placement: Placement,
    /// Flow height before layout
    pub height: f32,
    /// Page coordinates (viewport coordinates for overlay slots)
    pub rect: Rect,
}

impl Slot {
    pub fn new(id: impl Into<String>, text: impl Into<String>, height: f32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            motion: Motion::Static,
            typewriter: None,
            placement: Placement::Flow,
            height,
            rect: Rect::default(),
        }
    }

    pub fn motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Builder: type `text` out instead of showing it at once
    pub fn typewriter(mut self, text: impl Into<String>, delay_ms: u32, speed_ms: u32) -> Self {
        self.typewriter = Some(TypewriterSpec {
            text: text.into(),
            delay_ms,
            speed_ms,
        });
        self
    }
}

#[derive(Clone, Debug)]
pub struct Section {
    pub id: String,
    pub kind: SectionKind,
    pub slots: Vec<Slot>,
    pub rect: Rect,
}

impl Section {
    pub fn new(id: impl Into<String>, kind: SectionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            slots: Vec::new(),
            rect: Rect::default(),
        }
    }

    pub fn push(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id == id)
    }
}

/// A fully composed and laid out page
#[derive(Clone, Debug, Default)]
pub struct Page {
    pub sections: Vec<Section>,
    /// Fixed-position slots, unaffected by scrolling
    pub overlay: Vec<Slot>,
    /// Navigation targets as `(label, section id)`
    pub nav: Vec<(String, String)>,
    /// Viewport the page was laid out for
    pub viewport: Rect,
    pub height: f32,
}

impl Page {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            ..Default::default()
        }
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Section ids in page order
    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|section| section.id.as_str())
    }

    /// Find a slot anywhere on the page
    pub fn slot(&self, id: &str) -> Option<&Slot> {
        self.overlay
            .iter()
            .chain(self.sections.iter().flat_map(|section| section.slots.iter()))
            .find(|slot| slot.id == id)
    }

    pub fn slot_count(&self) -> usize {
        self.overlay.len()
            + self
                .sections
                .iter()
                .map(|section| section.slots.len())
                .sum::<usize>()
    }

    /// Largest useful scroll offset
    pub fn max_scroll(&self) -> f32 {
        (self.height - self.viewport.height).max(0.0)
    }

    /// Scroll offset that brings a section's top to the top of the viewport
    pub fn scroll_offset_of(&self, id: &str) -> Option<f32> {
        self.section(id).map(|section| section.rect.top())
    }
}
