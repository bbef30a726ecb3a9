//! Integration tests for the composed portfolio page
//!
//! These tests verify that:
//! - The sample content composes into the expected section order
//! - Entrance, typewriter, reveal and scroll motions behave on a live session
//! - Independent elements never affect each other
//! - Unmounting releases every timer

use folio_animation::Style;
use folio_core::events::{event_types, EventData};
use folio_site::{LayoutConfig, PageSession, Portfolio, SectionComposer, SectionKind};

fn sample_session() -> PageSession {
    let portfolio = Portfolio::sample().unwrap();
    let page = SectionComposer::default().compose(&portfolio).unwrap();
    PageSession::mount(page)
}

/// The five page sections appear in order, with story chapters between
#[test]
fn test_sample_page_section_order() {
    let session = sample_session();
    let kinds: Vec<SectionKind> = session
        .page()
        .sections
        .iter()
        .map(|section| section.kind)
        .filter(|kind| *kind != SectionKind::Story)
        .collect();

    assert_eq!(
        kinds,
        vec![
            SectionKind::Hero,
            SectionKind::About,
            SectionKind::Projects,
            SectionKind::Contact,
            SectionKind::Footer,
        ]
    );
}

/// Hero entrance plays from mount and settles on the identity style
#[test]
fn test_hero_entrance_settles() {
    let mut session = sample_session();

    let start = session.style_of("hero.title").unwrap();
    assert_eq!(start.opacity, 0.0);
    assert_eq!(start.scale, 0.8);

    session.advance(1_000);
    assert_eq!(session.style_of("hero.title"), Some(Style::IDENTITY));

    // Subtitle is still inside its 300ms delay at t=0, settled by 1100ms
    session.advance(100);
    assert_eq!(session.style_of("hero.subtitle"), Some(Style::IDENTITY));
}

/// Typewriter lines type out on their own schedules
#[test]
fn test_typewriter_lines() {
    let mut session = sample_session();

    session.advance(2_000);
    assert_eq!(session.text_of("hero.line.0"), Some(""));
    session.advance(300);
    assert_eq!(session.text_of("hero.line.0"), Some("Dev"));
    assert_eq!(session.text_of("hero.line.1"), Some(""));

    session.advance(3_000);
    assert_eq!(session.text_of("hero.line.0"), Some("Developer"));
    assert_eq!(session.text_of("hero.line.1"), Some("Has a Story"));

    let done = session
        .take_events()
        .into_iter()
        .filter(|e| e.event_type == event_types::CURSOR_DONE)
        .filter_map(|e| session.slot_id_of(e.target).map(str::to_string))
        .filter(|id| id.starts_with("hero.line."))
        .count();
    assert_eq!(done, 2);
}

/// Closing chapter lines type on the session clock from mount
#[test]
fn test_final_chapter_lines() {
    let mut session = sample_session();

    session.advance(600);
    assert_eq!(session.text_of("final.line.0"), Some("Th"));
    assert_eq!(session.text_of("final.line.1"), Some(""));

    session.advance(1_460);
    assert_eq!(session.text_of("final.line.1"), Some("Y"));

    session.advance(5_000);
    assert_eq!(
        session.text_of("final.line.1"),
        Some("Your story + My expertise = Extraordinary results")
    );
    assert!(session
        .text_of("final.line.0")
        .is_some_and(|text| text.ends_with("their medium.")));
}

/// Floating nav fades in over the first 100px of scroll
#[test]
fn test_floating_nav_tracks_scroll() {
    let mut session = sample_session();
    assert_eq!(session.style_of("nav").map(|s| s.opacity), Some(0.0));

    session.scroll_to(50.0);
    let half = session.style_of("nav").unwrap();
    assert_eq!((half.opacity, half.offset_y), (0.5, 20.0));

    session.scroll_to(2_000.0);
    assert_eq!(session.style_of("nav"), Some(Style::IDENTITY));

    // Fixed overlay stays at its viewport position
    let frame = session.frame();
    assert_eq!(frame.slot("nav").map(|s| s.screen_y), Some(32.0));
}

/// Content reveals fire once and stay revealed when scrolling back up
#[test]
fn test_reveals_are_one_shot() {
    let mut session = sample_session();
    assert_eq!(session.is_revealed("projects.heading"), Some(false));

    session.scroll_to_section("projects");
    assert_eq!(session.is_revealed("projects.heading"), Some(true));
    session.advance(1_000);
    assert_eq!(session.style_of("projects.heading"), Some(Style::IDENTITY));

    session.scroll_to(0.0);
    assert_eq!(session.is_revealed("projects.heading"), Some(true));
    assert_eq!(session.style_of("projects.heading"), Some(Style::IDENTITY));

    // Sections further down were never seen
    assert_eq!(session.is_revealed("contact.card"), Some(false));
}

/// Revealing one element leaves every other element untouched
#[test]
fn test_elements_are_independent() {
    let mut session = sample_session();
    session.scroll_to_section("about");

    assert_eq!(session.is_revealed("about.heading"), Some(true));
    assert_eq!(session.is_revealed("footer.identity"), Some(false));
    let hidden = session.style_of("footer.identity").unwrap();
    assert_eq!(hidden.opacity, 0.0);
    assert_eq!(hidden.offset_y, 20.0);

    let reveal_targets: Vec<_> = session
        .take_events()
        .into_iter()
        .filter(|e| e.event_type == event_types::REVEAL)
        .filter_map(|e| session.slot_id_of(e.target).map(str::to_string))
        .collect();
    assert!(reveal_targets.iter().all(|id| !id.starts_with("footer.")));
}

/// Story chapters follow their progress through the viewport
#[test]
fn test_story_scroll_is_reversible() {
    let mut session = sample_session();
    let header = session.page().slot("evolution.header").unwrap().rect;

    // Header top meets viewport bottom: start of the story range
    session.scroll_to(header.top() - 800.0);
    let entering = session.style_of("evolution.header").unwrap();
    assert_eq!(entering.opacity, 0.0);
    assert_eq!(entering.offset_y, 100.0);

    // Halfway through the range the block is fully shown
    let midpoint = (header.top() - 800.0 + header.bottom()) / 2.0;
    session.scroll_to(midpoint);
    let middle = session.style_of("evolution.header").unwrap();
    assert!((middle.opacity - 1.0).abs() < 1e-3);

    // Scrolling back restores the entering style
    session.scroll_to(header.top() - 800.0);
    assert_eq!(session.style_of("evolution.header"), Some(entering));
}

/// Unmounting removes every pending timer and emits unmount events
#[test]
fn test_unmount_releases_everything() {
    let mut session = sample_session();
    session.advance(2_050);
    assert!(session.pending_timers() > 0);
    let elements = session.element_count();
    session.take_events();

    session.unmount();
    assert_eq!(session.pending_timers(), 0);

    let unmounts = session
        .take_events()
        .into_iter()
        .filter(|e| e.event_type == event_types::UNMOUNT)
        .count();
    assert_eq!(unmounts, elements);

    session.advance(10_000);
    assert!(session
        .take_events()
        .iter()
        .all(|e| !matches!(e.data, EventData::Cursor { .. })));
}

/// A smaller viewport changes the layout, not the composition
#[test]
fn test_custom_viewport() {
    let portfolio = Portfolio::sample().unwrap();
    let layout = LayoutConfig {
        viewport_width: 390.0,
        viewport_height: 844.0,
        ..Default::default()
    };
    let page = SectionComposer::new(layout).compose(&portfolio).unwrap();

    assert_eq!(page.section("hero").map(|s| s.rect.height), Some(844.0));
    let default_page = SectionComposer::default().compose(&portfolio).unwrap();
    assert_eq!(page.slot_count(), default_page.slot_count());
    assert!(page.height > default_page.height);
}
