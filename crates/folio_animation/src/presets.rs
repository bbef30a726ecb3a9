//! Motion presets for the portfolio page
//!
//! Pre-built [`Motion`]s for entrances, scroll reveals, story scrolling,
//! parallax backgrounds and ambient loops.

use crate::easing::Easing;
use crate::motion::Motion;
use crate::progress::{ScrollProgress, Tween};
use crate::reveal::InViewOptions;
use crate::transform::{Track, TransformMapper};
use folio_core::geometry::Margin;
use serde::{Deserialize, Serialize};

/// Distance a scroll reveal travels, in pixels
pub const REVEAL_DISTANCE: f32 = 60.0;

/// Default scroll reveal duration
pub const REVEAL_DURATION_MS: u32 = 600;

/// Viewport margin for scroll reveals
pub const REVEAL_MARGIN: Margin = Margin::uniform(-100.0);

/// The direction an element travels when it is revealed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Rises from below
    #[default]
    Up,
    /// Drops from above
    Down,
    /// Slides in from the right
    Left,
    /// Slides in from the left
    Right,
}

impl Direction {
    /// Hidden-state offset `(x, y)`
    pub fn initial_offset(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, REVEAL_DISTANCE),
            Direction::Down => (0.0, -REVEAL_DISTANCE),
            Direction::Left => (REVEAL_DISTANCE, 0.0),
            Direction::Right => (-REVEAL_DISTANCE, 0.0),
        }
    }

    /// Alternating direction for the n-th item in a list
    pub fn alternating(index: usize) -> Self {
        if index % 2 == 0 {
            Direction::Left
        } else {
            Direction::Right
        }
    }
}

/// Pre-built motions for common patterns
pub struct MotionPreset;

impl MotionPreset {
    // ========================================================================
    // Entrances (play from mount)
    // ========================================================================

    /// Fade and grow from 80% scale
    pub fn title_entrance(duration_ms: u32) -> Motion {
        Motion::timed(
            TransformMapper::new()
                .opacity(Track::between(0.0, 1.0))
                .scale(Track::between(0.8, 1.0)),
            Tween::new(duration_ms).easing(Easing::SMOOTH_OUT),
        )
    }

    /// Fade in while rising `distance` pixels
    pub fn rise_in(distance: f32, duration_ms: u32, delay_ms: u32) -> Motion {
        Motion::timed(
            TransformMapper::new()
                .opacity(Track::between(0.0, 1.0))
                .offset_y(Track::between(distance, 0.0)),
            Tween::new(duration_ms)
                .delay(delay_ms)
                .easing(Easing::SMOOTH_OUT),
        )
    }

    // ========================================================================
    // Scroll-triggered
    // ========================================================================

    /// Slide and fade into place the first time the element is in view
    pub fn scroll_reveal(direction: Direction, delay_ms: u32) -> Motion {
        Self::scroll_reveal_with(direction, delay_ms, REVEAL_DURATION_MS)
    }

    pub fn scroll_reveal_with(direction: Direction, delay_ms: u32, duration_ms: u32) -> Motion {
        let (x, y) = direction.initial_offset();
        Motion::reveal(
            TransformMapper::new()
                .opacity(Track::between(0.0, 1.0))
                .offset_x(Track::between(x, 0.0))
                .offset_y(Track::between(y, 0.0)),
            Tween::new(duration_ms)
                .delay(delay_ms)
                .easing(Easing::SMOOTH_OUT),
            InViewOptions::default().margin(REVEAL_MARGIN),
        )
    }

    /// Fade in from `offset` the first time any part of the element is on
    /// screen (no viewport margin)
    pub fn in_view(offset: (f32, f32), duration_ms: u32, delay_ms: u32) -> Motion {
        let (x, y) = offset;
        Motion::reveal(
            TransformMapper::new()
                .opacity(Track::between(0.0, 1.0))
                .offset_x(Track::between(x, 0.0))
                .offset_y(Track::between(y, 0.0)),
            Tween::new(duration_ms).delay(delay_ms),
            InViewOptions::default(),
        )
    }

    /// Fade in and widen from zero width the first time the element is on
    /// screen (dividers)
    pub fn in_view_widen(duration_ms: u32, delay_ms: u32) -> Motion {
        Motion::reveal(
            TransformMapper::new()
                .opacity(Track::between(0.0, 1.0))
                .scale_x(Track::between(0.0, 1.0)),
            Tween::new(duration_ms).delay(delay_ms),
            InViewOptions::default(),
        )
    }

    /// Drift through the viewport: fade and grow in, hold, then fade and
    /// shrink out while travelling from +100 to -100 pixels
    pub fn story_scroll() -> Motion {
        let stops = [0.0, 0.3, 0.7, 1.0];
        Motion::scroll(
            TransformMapper::new()
                .offset_y(Track::between(100.0, -100.0))
                .opacity(Track::from_pairs(&stops, &[0.0, 1.0, 1.0, 0.0]))
                .scale(Track::from_pairs(&stops, &[0.8, 1.0, 1.0, 0.8])),
            ScrollProgress::enter_to_exit(),
        )
    }

    /// Whole-chapter transform while the chapter crosses the viewport: rises
    /// by `rise` pixels and zooms through `scale` (entering, centred, leaving)
    pub fn chapter_container(rise: f32, scale: [f32; 3]) -> Motion {
        Motion::scroll(
            TransformMapper::new()
                .offset_y(Track::between(0.0, -rise))
                .scale(Track::from_pairs(&[0.0, 0.5, 1.0], &scale)),
            ScrollProgress::enter_to_exit(),
        )
    }

    /// Background of a section that starts on screen: sinks by half its
    /// height and fades out by 80% of the way through
    pub fn parallax(section_height: f32) -> Motion {
        Motion::scroll(
            TransformMapper::new()
                .offset_y(Track::between(0.0, section_height * 0.5))
                .opacity(Track::from_pairs(&[0.0, 0.8], &[1.0, 0.0])),
            ScrollProgress::pinned_to_exit(),
        )
    }

    /// Background that sinks by `distance` while its section crosses the viewport
    pub fn drift(distance: f32) -> Motion {
        Motion::scroll(
            TransformMapper::new().offset_y(Track::between(0.0, distance)),
            ScrollProgress::enter_to_exit(),
        )
    }

    /// Fixed navigation that fades in and rises over the first 100px of scroll
    pub fn floating_nav() -> Motion {
        Motion::page_scroll(
            TransformMapper::new()
                .opacity(Track::between(0.0, 1.0))
                .offset_y(Track::between(40.0, 0.0))
                .domain(0.0, 100.0),
        )
    }

    // ========================================================================
    // Ambient loops
    // ========================================================================

    /// Bob down by `distance` and back, forever
    pub fn bob(distance: f32, period_ms: u32) -> Motion {
        Motion::timed(
            TransformMapper::new().offset_y(
                Track::from_pairs(&[0.0, 0.5, 1.0], &[0.0, distance, 0.0])
                    .with_easing(Easing::EaseInOut),
            ),
            Tween::new(period_ms).loop_infinite(),
        )
    }

    /// Background particle wandering around its anchor, forever
    ///
    /// Travels `(+dx, -dy)`, then `(-dx, +dy)`, then home while pulsing
    /// between the two opacities.
    pub fn particle(spread: (f32, f32), opacity: (f32, f32), period_ms: u32) -> Motion {
        let (dx, dy) = spread;
        let (dim, bright) = opacity;
        let stops = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
        Motion::timed(
            TransformMapper::new()
                .offset_x(Track::from_pairs(&stops, &[0.0, dx, -dx, 0.0]))
                .offset_y(Track::from_pairs(&stops, &[0.0, -dy, dy, 0.0]))
                .opacity(Track::from_pairs(&[0.0, 0.5, 1.0], &[dim, bright, dim])),
            Tween::new(period_ms).loop_infinite(),
        )
    }

    /// Floating glyph that rises and drifts sideways while pulsing, forever
    pub fn float_glyph(index: usize) -> Motion {
        let drift = if index % 2 == 0 { 50.0 } else { -50.0 };
        Motion::timed(
            TransformMapper::new()
                .opacity(Track::from_pairs(&[0.0, 0.5, 1.0], &[0.0, 0.3, 0.0]))
                .offset_y(Track::between(-20.0, -100.0))
                .offset_x(Track::between(0.0, drift)),
            Tween::new(8_000)
                .delay(index as u32 * 1_500)
                .loop_infinite(),
        )
    }

    /// Full turn, forever
    pub fn spin(period_ms: u32) -> Motion {
        Motion::timed(
            TransformMapper::new().rotate(Track::between(0.0, 360.0)),
            Tween::new(period_ms).loop_infinite(),
        )
    }
}
