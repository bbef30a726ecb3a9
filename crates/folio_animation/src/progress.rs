//! Progress sources
//!
//! Normalized [0, 1] progress derived from scroll position ([`ScrollProgress`])
//! or from elapsed time ([`Tween`]). Both are pure functions of their input so
//! a frame can be recomputed at any time without hidden state.

use crate::easing::Easing;
use crate::transform::clamp_progress;
use folio_core::geometry::Rect;

// ============================================================================
// Scroll-linked progress
// ============================================================================

/// A position along an element or the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    Start,
    Center,
    End,
    /// Fraction of the length from the start (0.0 = start, 1.0 = end)
    Fraction(f32),
}

impl Edge {
    fn fraction(self) -> f32 {
        match self {
            Edge::Start => 0.0,
            Edge::Center => 0.5,
            Edge::End => 1.0,
            Edge::Fraction(f) => f,
        }
    }
}

/// "When this edge of the target meets that edge of the viewport"
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollOffset {
    pub target: Edge,
    pub viewport: Edge,
}

impl ScrollOffset {
    pub const fn new(target: Edge, viewport: Edge) -> Self {
        Self { target, viewport }
    }

    /// Scroll position at which the two edges line up
    fn scroll_position(&self, target: &Rect, viewport_height: f32) -> f32 {
        target.top() + target.height * self.target.fraction()
            - viewport_height * self.viewport.fraction()
    }
}

/// Progress of a target element through the viewport as the page scrolls
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollProgress {
    pub start: ScrollOffset,
    pub end: ScrollOffset,
}

impl ScrollProgress {
    pub const fn new(start: ScrollOffset, end: ScrollOffset) -> Self {
        Self { start, end }
    }

    /// From the target's top touching the viewport bottom to its bottom
    /// leaving the viewport top
    pub const fn enter_to_exit() -> Self {
        Self::new(
            ScrollOffset::new(Edge::Start, Edge::End),
            ScrollOffset::new(Edge::End, Edge::Start),
        )
    }

    /// From the target's top at the viewport top until its bottom reaches the
    /// viewport top (parallax on a section that starts on screen)
    pub const fn pinned_to_exit() -> Self {
        Self::new(
            ScrollOffset::new(Edge::Start, Edge::Start),
            ScrollOffset::new(Edge::End, Edge::Start),
        )
    }

    /// Progress for a target (in page coordinates) at a scroll offset
    pub fn at(&self, target: &Rect, viewport_height: f32, scroll_y: f32) -> f32 {
        let from = self.start.scroll_position(target, viewport_height);
        let to = self.end.scroll_position(target, viewport_height);
        let span = to - from;

        if span.abs() <= f32::EPSILON {
            return if scroll_y >= to { 1.0 } else { 0.0 };
        }
        clamp_progress((scroll_y - from) / span)
    }
}

// ============================================================================
// Time-linked progress
// ============================================================================

/// How many times a tween plays
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    #[default]
    Once,
    Times(u32),
    Infinite,
}

/// A timed transition: delay, duration, easing, and repetition
///
/// Progress is computed from elapsed time since activation, so the same tween
/// can be sampled by any number of frames in any order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    duration_ms: u32,
    delay_ms: u32,
    easing: Easing,
    repeat: Repeat,
    /// Play every other iteration backwards (ping-pong)
    alternate: bool,
}

impl Tween {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            delay_ms: 0,
            easing: Easing::Linear,
            repeat: Repeat::Once,
            alternate: false,
        }
    }

    /// Builder: set delay before the first iteration
    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn loop_infinite(self) -> Self {
        self.repeat(Repeat::Infinite)
    }

    pub fn ping_pong(mut self) -> Self {
        self.alternate = true;
        self
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Total time from activation to the final frame, or `None` when looping forever
    pub fn total_duration_ms(&self) -> Option<u64> {
        let iterations = match self.repeat {
            Repeat::Once => 1,
            Repeat::Times(n) => n.max(1) as u64,
            Repeat::Infinite => return None,
        };
        Some(self.delay_ms as u64 + self.duration_ms as u64 * iterations)
    }

    pub fn is_finished_at(&self, elapsed_ms: u64) -> bool {
        self.total_duration_ms()
            .map_or(false, |total| elapsed_ms >= total)
    }

    /// Eased progress `elapsed_ms` after activation
    pub fn progress_at(&self, elapsed_ms: u64) -> f32 {
        let Some(active) = elapsed_ms.checked_sub(self.delay_ms as u64) else {
            return self.easing.apply(0.0);
        };
        if self.duration_ms == 0 {
            return 1.0;
        }

        let duration = self.duration_ms as u64;
        let (iteration, within) = if self.is_finished_at(elapsed_ms) {
            // Hold the final frame of the last iteration
            let last = self
                .total_duration_ms()
                .map_or(0, |total| (total - self.delay_ms as u64) / duration - 1);
            (last, duration)
        } else {
            (active / duration, active % duration)
        };

        let mut linear = within as f32 / duration as f32;
        if self.alternate && iteration % 2 == 1 {
            linear = 1.0 - linear;
        }
        self.easing.apply(linear)
    }
}
