//! Viewport geometry
//!
//! Rectangles in page coordinates (y grows downward) and CSS-style margins used
//! to grow or shrink the viewport before intersection tests.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An axis-aligned rectangle in page pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
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

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Translate the rectangle vertically
    pub fn offset_y(&self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..*self
        }
    }

    /// Grow (positive values) or shrink (negative values) each side by the margin
    ///
    /// A shrunk rectangle never has negative extent; it collapses to zero size.
    pub fn inset(&self, margin: Margin) -> Self {
        let width = (self.width + margin.left + margin.right).max(0.0);
        let height = (self.height + margin.top + margin.bottom).max(0.0);
        Self {
            x: self.x - margin.left,
            y: self.y - margin.top,
            width,
            height,
        }
    }

    /// Overlapping region of two rectangles, if it has positive area
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Fraction of `target` covered by `self`, in [0, 1]
    ///
    /// Zero-area targets report 1.0 when they lie inside `self` and 0.0 otherwise.
    pub fn coverage_of(&self, target: &Rect) -> f32 {
        let area = target.area();
        if area <= 0.0 {
            let inside = target.left() >= self.left()
                && target.right() <= self.right()
                && target.top() >= self.top()
                && target.bottom() <= self.bottom();
            return if inside { 1.0 } else { 0.0 };
        }

        match self.intersection(target) {
            Some(overlap) => (overlap.area() / area).clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}

/// Per-side margin in pixels, following CSS `rootMargin` conventions
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margin {
    pub const ZERO: Margin = Margin {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Error returned when a margin string cannot be parsed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarginParseError {
    #[error("margin is empty")]
    Empty,

    #[error("margin has {0} values, expected 1 to 4")]
    TooManyValues(usize),

    #[error("invalid margin value '{0}' (expected a pixel length like -100px)")]
    InvalidValue(String),
}

fn parse_length(token: &str) -> Result<f32, MarginParseError> {
    let number = token.strip_suffix("px").unwrap_or(token);
    match number.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(MarginParseError::InvalidValue(token.to_string())),
    }
}

impl FromStr for Margin {
    type Err = MarginParseError;

    /// Parse the CSS shorthand: `"-100px"`, `"10px 20px"`, `"1px 2px 3px"`, or four values
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(parse_length)
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [] => Err(MarginParseError::Empty),
            [all] => Ok(Margin::uniform(*all)),
            [vertical, horizontal] => Ok(Margin::new(*vertical, *horizontal, *vertical, *horizontal)),
            [top, horizontal, bottom] => Ok(Margin::new(*top, *horizontal, *bottom, *horizontal)),
            [top, right, bottom, left] => Ok(Margin::new(*top, *right, *bottom, *left)),
            more => Err(MarginParseError::TooManyValues(more.len())),
        }
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_margin_shrinks_viewport() {
        let viewport = Rect::new(0.0, 1000.0, 1280.0, 800.0);
        let shrunk = viewport.inset(Margin::uniform(-100.0));

        assert_eq!(shrunk, Rect::new(100.0, 1100.0, 1080.0, 600.0));
    }

    #[test]
    fn test_oversized_negative_margin_collapses() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        let collapsed = viewport.inset(Margin::uniform(-80.0));

        assert_eq!(collapsed.width, 0.0);
        assert_eq!(collapsed.height, 0.0);
        assert!(!collapsed.intersects(&viewport));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 10.0, 10.0, 10.0);

        assert!(!a.intersects(&b));
        assert_eq!(a.coverage_of(&b), 0.0);
    }

    #[test]
    fn test_coverage_of_partially_visible_target() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        let target = Rect::new(0.0, 75.0, 100.0, 50.0);

        assert!((viewport.coverage_of(&target) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_margin_shorthand() {
        assert_eq!("-100px".parse::<Margin>(), Ok(Margin::uniform(-100.0)));
        assert_eq!(
            "10px 20px".parse::<Margin>(),
            Ok(Margin::new(10.0, 20.0, 10.0, 20.0))
        );
        assert_eq!(
            "1 2px 3px 4".parse::<Margin>(),
            Ok(Margin::new(1.0, 2.0, 3.0, 4.0))
        );
    }

    #[test]
    fn test_margin_parse_errors() {
        assert_eq!("".parse::<Margin>(), Err(MarginParseError::Empty));
        assert_eq!(
            "1px 2px 3px 4px 5px".parse::<Margin>(),
            Err(MarginParseError::TooManyValues(5))
        );
        assert_eq!(
            "10em".parse::<Margin>(),
            Err(MarginParseError::InvalidValue("10em".to_string()))
        );
    }
}
