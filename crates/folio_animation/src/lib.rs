//! Folio Animation System
//!
//! Scroll- and time-driven motion for presentational page elements.
//!
//! # Features
//!
//! - **Transform Mapping**: Piecewise-linear breakpoint tracks from progress to style
//! - **Progress Sources**: Scroll progress through the viewport and timed tweens
//! - **Reveal Triggers**: One-shot in-view gates with viewport margins
//! - **Typewriter**: Per-character text reveal on cancellable timers
//! - **Scheduling**: Virtual-clock timers whose handles cancel on drop

pub mod easing;
pub mod motion;
pub mod presets;
pub mod progress;
pub mod reveal;
pub mod scheduler;
pub mod transform;
pub mod typewriter;

pub use easing::Easing;
pub use motion::{Motion, MotionInput};
pub use presets::{Direction, MotionPreset};
pub use progress::{Edge, Repeat, ScrollOffset, ScrollProgress, Tween};
pub use reveal::{Amount, InViewOptions, RevealState, RevealTrigger};
pub use scheduler::{SchedulerHandle, TaskHandle, TaskId, Tick, TimerScheduler};
pub use transform::{Breakpoint, Channel, Style, Track, TransformMapper};
pub use typewriter::{CursorEmission, Typewriter, TypewriterState};
