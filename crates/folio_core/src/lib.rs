//! Folio Core
//!
//! Foundational primitives shared by the Folio animation engine and page runtime:
//!
//! - **Geometry**: Rectangles, viewport margins, and intersection ratios
//! - **Events**: Lifecycle, scroll, and visibility events with a small dispatcher
//! - **State Machines**: Typed finite state machines for element lifecycles
//!
//! # Example
//!
//! ```rust
//! use folio_core::geometry::{Margin, Rect};
//!
//! let viewport = Rect::new(0.0, 0.0, 1280.0, 800.0);
//! let shrunk = viewport.inset(Margin::uniform(-100.0));
//! assert_eq!(shrunk.height, 600.0);
//!
//! let card = Rect::new(0.0, 720.0, 400.0, 200.0);
//! assert!(viewport.intersects(&card));
//! assert!(!shrunk.intersects(&card));
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;

pub use events::{Event, EventData, EventDispatcher, EventType};
pub use fsm::{StateMachine, StateMachineBuilder};
pub use geometry::{Margin, MarginParseError, Rect};
