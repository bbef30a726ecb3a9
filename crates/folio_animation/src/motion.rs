//! Motion descriptions
//!
//! A [`Motion`] says how a slot's style is driven: by time since mount, by a
//! reveal gate, by the element's own scroll progress, or by raw page scroll.
//! Sampling is a pure function of a [`MotionInput`], so the runtime only has
//! to keep the per-element state (reveal time) and feed it back in.

use crate::progress::{ScrollProgress, Tween};
use crate::reveal::InViewOptions;
use crate::transform::{Style, TransformMapper};
use folio_core::geometry::Rect;

/// Everything a motion may depend on for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionInput {
    /// Milliseconds since the element was mounted
    pub elapsed_ms: u64,
    /// Page scroll offset
    pub scroll_y: f32,
    pub viewport_height: f32,
    /// Element bounds in page coordinates
    pub target: Rect,
    /// Mount-relative time the element's reveal gate opened
    pub revealed_at_ms: Option<u64>,
}

/// How a slot animates
#[derive(Clone, Debug, Default)]
pub enum Motion {
    /// Always the identity style
    #[default]
    Static,
    /// Plays once (or loops) from mount
    Timed {
        mapper: TransformMapper,
        tween: Tween,
    },
    /// Holds the hidden endpoint until the element enters view, then tweens
    /// to the revealed endpoint
    Reveal {
        mapper: TransformMapper,
        tween: Tween,
        options: InViewOptions,
    },
    /// Follows the element's progress through the viewport
    Scroll {
        mapper: TransformMapper,
        progress: ScrollProgress,
    },
    /// Follows the page scroll offset (mapper domain in pixels)
    PageScroll { mapper: TransformMapper },
}

impl Motion {
    pub fn timed(mapper: TransformMapper, tween: Tween) -> Self {
        Motion::Timed { mapper, tween }
    }

    pub fn reveal(mapper: TransformMapper, tween: Tween, options: InViewOptions) -> Self {
        Motion::Reveal {
            mapper,
            tween,
            options,
        }
    }

    pub fn scroll(mapper: TransformMapper, progress: ScrollProgress) -> Self {
        Motion::Scroll { mapper, progress }
    }

    pub fn page_scroll(mapper: TransformMapper) -> Self {
        Motion::PageScroll { mapper }
    }

    /// Short label used in listings and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Motion::Static => "static",
            Motion::Timed { .. } => "timed",
            Motion::Reveal { .. } => "reveal",
            Motion::Scroll { .. } => "scroll",
            Motion::PageScroll { .. } => "page-scroll",
        }
    }

    /// Reveal options if this motion is gated on visibility
    pub fn reveal_options(&self) -> Option<&InViewOptions> {
        match self {
            Motion::Reveal { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Whether this motion keeps changing with time alone
    pub fn is_time_driven(&self) -> bool {
        matches!(self, Motion::Timed { .. } | Motion::Reveal { .. })
    }

    pub fn sample(&self, input: &MotionInput) -> Style {
        match self {
            Motion::Static => Style::IDENTITY,
            Motion::Timed { mapper, tween } => mapper.map(tween.progress_at(input.elapsed_ms)),
            Motion::Reveal { mapper, tween, .. } => match input.revealed_at_ms {
                Some(at) => {
                    mapper.map(tween.progress_at(input.elapsed_ms.saturating_sub(at)))
                }
                None => mapper.map_gate(false),
            },
            Motion::Scroll { mapper, progress } => mapper.map(progress.at(
                &input.target,
                input.viewport_height,
                input.scroll_y,
            )),
            Motion::PageScroll { mapper } => mapper.map_raw(input.scroll_y),
        }
    }
}
