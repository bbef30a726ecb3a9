//! Folio Site
//!
//! Portfolio content, section composition and the page session runtime.
//!
//! # Example
//!
//! ```rust
//! use folio_site::{PageSession, Portfolio, SectionComposer};
//!
//! let portfolio = Portfolio::sample().unwrap();
//! let page = SectionComposer::default().compose(&portfolio).unwrap();
//! let mut session = PageSession::mount(page);
//!
//! session.advance(3_000);
//! assert_eq!(session.text_of("hero.line.0"), Some("Developer"));
//!
//! session.scroll_to_section("about");
//! assert_eq!(session.is_revealed("about.heading"), Some(true));
//! ```

pub mod compose;
pub mod content;
pub mod error;
pub mod layout;
pub mod page;
pub mod session;

pub use compose::SectionComposer;
pub use content::Portfolio;
pub use error::{Result, SiteError};
pub use layout::LayoutConfig;
pub use page::{Page, Placement, Section, SectionKind, Slot};
pub use session::{ElementId, Frame, PageSession, SlotFrame};
