//! Transform mapping
//!
//! Maps a progress value to visual style by piecewise interpolation over
//! per-channel breakpoint tracks. Mapping is a pure function of
//! `(progress, tracks)`; nothing is cached between frames.

use crate::easing::Easing;
use serde::Serialize;
use smallvec::SmallVec;

// ============================================================================
// Breakpoints and tracks
// ============================================================================

/// One `(input, output)` pair of a track
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breakpoint {
    /// Progress position (0.0 to 1.0)
    pub input: f32,
    /// Channel value at this position
    pub output: f32,
    /// Easing used on the segment that ends at this breakpoint
    pub easing: Easing,
}

impl Breakpoint {
    pub fn new(input: f32, output: f32) -> Self {
        Self {
            input,
            output,
            easing: Easing::Linear,
        }
    }

    pub fn eased(input: f32, output: f32, easing: Easing) -> Self {
        Self {
            input,
            output,
            easing,
        }
    }

    fn is_finite(&self) -> bool {
        self.input.is_finite() && self.output.is_finite()
    }
}

/// A sorted list of breakpoints for one style channel
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    breakpoints: SmallVec<[Breakpoint; 4]>,
}

impl Track {
    /// Build a track, dropping non-finite breakpoints and sorting by input
    ///
    /// The sort is stable, so breakpoints sharing an input keep their order.
    pub fn new(breakpoints: impl IntoIterator<Item = Breakpoint>) -> Self {
        let mut breakpoints: SmallVec<[Breakpoint; 4]> = breakpoints
            .into_iter()
            .filter(Breakpoint::is_finite)
            .collect();
        breakpoints.sort_by(|a, b| a.input.total_cmp(&b.input));
        Self { breakpoints }
    }

    /// Build a linear track from parallel input/output lists
    ///
    /// Extra entries in the longer list are ignored.
    pub fn from_pairs(inputs: &[f32], outputs: &[f32]) -> Self {
        Self::new(
            inputs
                .iter()
                .zip(outputs)
                .map(|(&input, &output)| Breakpoint::new(input, output)),
        )
    }

    /// A two-point linear track from `from` at 0.0 to `to` at 1.0
    pub fn between(from: f32, to: f32) -> Self {
        Self::from_pairs(&[0.0, 1.0], &[from, to])
    }

    /// Apply one easing to every segment
    pub fn with_easing(mut self, easing: Easing) -> Self {
        for point in &mut self.breakpoints {
            point.easing = easing;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Sample the track at a progress value
    ///
    /// Progress is clamped to [0, 1] (NaN counts as 0). Positions before the
    /// first or after the last breakpoint hold the nearest endpoint. Returns
    /// `None` for an empty track.
    pub fn sample(&self, progress: f32) -> Option<f32> {
        let first = self.breakpoints.first()?;
        let last = self.breakpoints.last()?;
        let progress = clamp_progress(progress);

        if progress <= first.input {
            return Some(first.output);
        }
        if progress >= last.input {
            return Some(last.output);
        }

        // First breakpoint at or after the progress; everything before it is <= progress
        let next_idx = self
            .breakpoints
            .iter()
            .position(|bp| bp.input >= progress)
            .unwrap_or(self.breakpoints.len() - 1);
        let next = &self.breakpoints[next_idx];
        if next.input == progress {
            return Some(next.output);
        }
        let prev = &self.breakpoints[next_idx - 1];

        let span = next.input - prev.input;
        if span <= f32::EPSILON {
            return Some(prev.output);
        }

        let local = (progress - prev.input) / span;
        let eased = next.easing.apply(local);
        Some(prev.output + (next.output - prev.output) * eased)
    }
}

/// Clamp a progress value into [0, 1], treating NaN as 0
pub fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

// ============================================================================
// Style
// ============================================================================

/// Animatable style channels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Opacity,
    OffsetX,
    OffsetY,
    Scale,
    /// Horizontal-only scale, applied on top of `Scale`
    ScaleX,
    Rotate,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Opacity,
        Channel::OffsetX,
        Channel::OffsetY,
        Channel::Scale,
        Channel::ScaleX,
        Channel::Rotate,
    ];

    /// Value of the channel when nothing animates it
    pub fn identity(self) -> f32 {
        match self {
            Channel::Opacity | Channel::Scale | Channel::ScaleX => 1.0,
            Channel::OffsetX | Channel::OffsetY | Channel::Rotate => 0.0,
        }
    }
}

/// Resolved visual style for one element
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Style {
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
    /// Translation X in pixels
    pub offset_x: f32,
    /// Translation Y in pixels
    pub offset_y: f32,
    /// Uniform scale factor
    pub scale: f32,
    /// Extra horizontal scale factor (dividers growing from the centre)
    pub scale_x: f32,
    /// Rotation in degrees
    pub rotate: f32,
}

impl Style {
    pub const IDENTITY: Style = Style {
        opacity: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
        scale_x: 1.0,
        rotate: 0.0,
    };

    pub fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Opacity => self.opacity,
            Channel::OffsetX => self.offset_x,
            Channel::OffsetY => self.offset_y,
            Channel::Scale => self.scale,
            Channel::ScaleX => self.scale_x,
            Channel::Rotate => self.rotate,
        }
    }

    pub fn set(&mut self, channel: Channel, value: f32) {
        match channel {
            Channel::Opacity => self.opacity = value,
            Channel::OffsetX => self.offset_x = value,
            Channel::OffsetY => self.offset_y = value,
            Channel::Scale => self.scale = value,
            Channel::ScaleX => self.scale_x = value,
            Channel::Rotate => self.rotate = value,
        }
    }

    /// Stack another layer on top of this one
    ///
    /// Opacity and scale multiply; offsets and rotation add.
    pub fn then(&self, layer: &Style) -> Style {
        Style {
            opacity: self.opacity * layer.opacity,
            offset_x: self.offset_x + layer.offset_x,
            offset_y: self.offset_y + layer.offset_y,
            scale: self.scale * layer.scale,
            scale_x: self.scale_x * layer.scale_x,
            rotate: self.rotate + layer.rotate,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0 && self.scale > 0.0 && self.scale_x > 0.0
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ============================================================================
// Transform mapper
// ============================================================================

/// Maps progress to a [`Style`] through one track per channel
///
/// # Example
///
/// ```rust
/// use folio_animation::transform::{Track, TransformMapper};
///
/// let mapper = TransformMapper::new()
///     .opacity(Track::from_pairs(&[0.0, 0.3, 0.7, 1.0], &[0.0, 1.0, 1.0, 0.0]))
///     .offset_y(Track::between(100.0, -100.0));
///
/// let style = mapper.map(0.5);
/// assert_eq!(style.opacity, 1.0);
/// assert_eq!(style.offset_y, 0.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformMapper {
    opacity: Track,
    offset_x: Track,
    offset_y: Track,
    scale: Track,
    scale_x: Track,
    rotate: Track,
    /// Raw input range normalized to [0, 1] before mapping
    domain: Option<(f32, f32)>,
}

impl TransformMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the track for a channel
    pub fn channel(mut self, channel: Channel, track: Track) -> Self {
        *self.track_mut(channel) = track;
        self
    }

    pub fn opacity(self, track: Track) -> Self {
        self.channel(Channel::Opacity, track)
    }

    pub fn offset_x(self, track: Track) -> Self {
        self.channel(Channel::OffsetX, track)
    }

    pub fn offset_y(self, track: Track) -> Self {
        self.channel(Channel::OffsetY, track)
    }

    pub fn scale(self, track: Track) -> Self {
        self.channel(Channel::Scale, track)
    }

    pub fn scale_x(self, track: Track) -> Self {
        self.channel(Channel::ScaleX, track)
    }

    pub fn rotate(self, track: Track) -> Self {
        self.channel(Channel::Rotate, track)
    }

    /// Builder: accept raw input in `[start, end]` (e.g. scroll pixels)
    pub fn domain(mut self, start: f32, end: f32) -> Self {
        self.domain = Some((start, end));
        self
    }

    pub fn track(&self, channel: Channel) -> &Track {
        match channel {
            Channel::Opacity => &self.opacity,
            Channel::OffsetX => &self.offset_x,
            Channel::OffsetY => &self.offset_y,
            Channel::Scale => &self.scale,
            Channel::ScaleX => &self.scale_x,
            Channel::Rotate => &self.rotate,
        }
    }

    fn track_mut(&mut self, channel: Channel) -> &mut Track {
        match channel {
            Channel::Opacity => &mut self.opacity,
            Channel::OffsetX => &mut self.offset_x,
            Channel::OffsetY => &mut self.offset_y,
            Channel::Scale => &mut self.scale,
            Channel::ScaleX => &mut self.scale_x,
            Channel::Rotate => &mut self.rotate,
        }
    }

    /// Map a progress value (clamped to [0, 1]) to a style
    pub fn map(&self, progress: f32) -> Style {
        let mut style = Style::IDENTITY;
        for channel in Channel::ALL {
            if let Some(value) = self.track(channel).sample(progress) {
                style.set(channel, value);
            }
        }
        style
    }

    /// Map a reveal gate: `false` is the hidden endpoint, `true` the revealed one
    pub fn map_gate(&self, revealed: bool) -> Style {
        self.map(if revealed { 1.0 } else { 0.0 })
    }

    /// Map a raw input through the configured domain
    ///
    /// Without a domain the raw value is treated as progress.
    pub fn map_raw(&self, raw: f32) -> Style {
        self.map(self.normalize(raw))
    }

    fn normalize(&self, raw: f32) -> f32 {
        match self.domain {
            None => raw,
            Some((start, end)) if (end - start).abs() <= f32::EPSILON => {
                if raw >= end {
                    1.0
                } else {
                    0.0
                }
            }
            Some((start, end)) => (raw - start) / (end - start),
        }
    }
}
