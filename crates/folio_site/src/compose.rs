//! Section composer
//!
//! Turns [`Portfolio`] content into a laid-out [`Page`], wiring each block to
//! its motion: entrance animations and typewriter lines in the hero, scroll
//! reveals in the content sections, story scrolling in chapters, and in-view
//! fades in the footer.

use crate::content::{About, Chapter, Contact, Portfolio, Projects, TypewriterLine};
use crate::error::{Result, SiteError};
use crate::layout::LayoutConfig;
use crate::page::{Page, Placement, Section, SectionKind, Slot};
use folio_animation::{Direction, MotionPreset};
use rustc_hash::FxHashSet;

/// Stagger between skill group reveals
const SKILL_STAGGER_MS: u32 = 200;
/// Stagger between contact link reveals
const LINK_STAGGER_MS: u32 = 100;
/// Project reveal delay and per-item stagger
const PROJECT_DELAY_MS: u32 = 300;
const PROJECT_STAGGER_MS: u32 = 200;
/// Decorative particles behind the contact section
const CONTACT_PARTICLES: usize = 8;

pub struct SectionComposer {
    layout: LayoutConfig,
}

impl SectionComposer {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Compose, lay out and validate the page
    pub fn compose(&self, portfolio: &Portfolio) -> Result<Page> {
        self.layout.validate()?;
        portfolio.validate()?;

        let mut sections = vec![self.hero(portfolio), self.about(&portfolio.about)];
        sections.extend(portfolio.chapters.iter().map(|chapter| self.chapter(chapter)));
        sections.push(self.projects(&portfolio.projects));
        sections.push(self.contact(&portfolio.contact));
        sections.push(self.footer(portfolio));

        let mut page = Page::new(sections);
        check_unique_sections(&page)?;

        page.nav = portfolio
            .nav
            .iter()
            .map(|entry| (entry.label.clone(), entry.id.clone()))
            .collect();
        for (_, target) in &page.nav {
            if page.section(target).is_none() {
                return Err(SiteError::UnknownNavTarget(target.clone()));
            }
        }
        if !page.nav.is_empty() {
            let labels: Vec<&str> = page.nav.iter().map(|(label, _)| label.as_str()).collect();
            page.overlay.push(
                Slot::new("nav", labels.join(" · "), 0.0).motion(MotionPreset::floating_nav()),
            );
        }

        self.layout.apply(&mut page);
        tracing::debug!(
            sections = page.sections.len(),
            slots = page.slot_count(),
            height = page.height,
            "Page composed"
        );
        Ok(page)
    }

    fn text(&self, text: &str, scale: f32) -> f32 {
        self.layout.text_height(text, scale)
    }

    fn hero(&self, portfolio: &Portfolio) -> Section {
        let hero = &portfolio.hero;
        let owner = &portfolio.owner;
        let mut section = Section::new("hero", SectionKind::Hero);

        for i in 0..hero.particles {
            section.push(
                Slot::new(format!("hero.particle.{i}"), "", 0.0)
                    .placement(Placement::Anchor {
                        x: (0.2 + i as f32 * 0.15).min(1.0),
                        y: (0.3 + i as f32 * 0.1).min(1.0),
                    })
                    .motion(MotionPreset::particle(
                        (100.0, 100.0),
                        (0.3, 0.8),
                        10_000 + i as u32 * 2_000,
                    )),
            );
        }

        section.push(
            Slot::new("hero.title", owner.name.as_str(), self.text(&owner.name, 4.0))
                .motion(MotionPreset::title_entrance(1000)),
        );
        for (i, line) in hero.typewriter.iter().enumerate() {
            section.push(self.typed_line(format!("hero.line.{i}"), line, 3.0));
        }

        let subtitle = format!("{}\n{}", owner.role, owner.summary);
        section.push(
            Slot::new("hero.subtitle", subtitle.trim(), self.text(&subtitle, 1.2))
                .motion(MotionPreset::rise_in(30.0, 800, 300)),
        );
        if !hero.cta.is_empty() {
            let cta = hero.cta.join(" | ");
            section.push(
                Slot::new("hero.cta", cta.as_str(), self.text(&cta, 1.2))
                    .motion(MotionPreset::rise_in(30.0, 800, 600)),
            );
        }
        section.push(
            Slot::new("hero.scroll_hint", hero.scroll_hint.as_str(), 0.0)
                .placement(Placement::Anchor { x: 0.5, y: 0.9 })
                .motion(MotionPreset::bob(10.0, 2000)),
        );
        for (i, glyph) in hero.glyphs.iter().enumerate() {
            section.push(
                Slot::new(format!("hero.glyph.{i}"), glyph.as_str(), 0.0)
                    .placement(Placement::Anchor {
                        x: (0.2 + i as f32 * 0.12).min(1.0),
                        y: 0.8,
                    })
                    .motion(MotionPreset::float_glyph(i)),
            );
        }

        // Parallax depth follows the hero's laid-out height
        let height = self.layout.section_height(section.kind, &section.slots);
        section.slots.insert(
            0,
            Slot::new("hero.background", "", 0.0)
                .placement(Placement::Fill)
                .motion(MotionPreset::parallax(height)),
        );
        section
    }

    fn typed_line(&self, id: String, line: &TypewriterLine, scale: f32) -> Slot {
        Slot::new(id, "", self.text(&line.text, scale)).typewriter(
            line.text.as_str(),
            line.delay_ms,
            line.speed_ms,
        )
    }

    fn about(&self, about: &About) -> Section {
        let mut section = Section::new("about", SectionKind::About);

        let heading = join_blocks(&[&about.heading, &about.intro]);
        section.push(
            Slot::new("about.heading", heading.as_str(), self.text(&heading, 2.0))
                .motion(MotionPreset::scroll_reveal(Direction::Up, 200)),
        );

        let mut story = vec![about.story_title.as_str()];
        story.extend(about.story.iter().map(String::as_str));
        let story = join_blocks(&story);
        section.push(
            Slot::new("about.story", story.as_str(), self.text(&story, 1.0))
                .motion(MotionPreset::scroll_reveal(Direction::Left, 300)),
        );

        if !about.stats.is_empty() {
            let stats = about
                .stats
                .iter()
                .map(|stat| format!("{} {}", stat.value, stat.label))
                .collect::<Vec<_>>()
                .join("\n");
            section.push(
                Slot::new("about.stats", stats.as_str(), self.text(&stats, 1.5))
                    .motion(MotionPreset::scroll_reveal(Direction::Right, 500)),
            );
            section.push(
                Slot::new("about.ring", "", 0.0)
                    .placement(Placement::Anchor { x: 0.9, y: 0.45 })
                    .motion(MotionPreset::spin(20_000)),
            );
        }

        section.push(
            Slot::new(
                "about.skills",
                about.skills_title.as_str(),
                self.text(&about.skills_title, 2.0),
            )
            .motion(MotionPreset::scroll_reveal(Direction::Up, 700)),
        );
        for (i, group) in about.skills.iter().enumerate() {
            let text = format!("{}\n{}", group.category, group.items.join(", "));
            section.push(
                Slot::new(format!("about.skill.{i}"), text.as_str(), self.text(&text, 1.0))
                    .motion(MotionPreset::in_view(
                        (0.0, 30.0),
                        600,
                        i as u32 * SKILL_STAGGER_MS,
                    )),
            );
        }
        section
    }

    fn chapter(&self, chapter: &Chapter) -> Section {
        let mut section = Section::new(chapter.id.as_str(), SectionKind::Story);

        let header = join_blocks(&[&chapter.label, &chapter.title, &chapter.body]);
        section.push(
            Slot::new(
                format!("{}.header", chapter.id),
                header.as_str(),
                self.text(&header, 2.0),
            )
            .motion(MotionPreset::story_scroll()),
        );
        for (i, milestone) in chapter.milestones.iter().enumerate() {
            let text = join_blocks(&[&milestone.period, &milestone.title, &milestone.description]);
            section.push(
                Slot::new(
                    format!("{}.milestone.{i}", chapter.id),
                    text.as_str(),
                    self.text(&text, 1.2),
                )
                .motion(MotionPreset::story_scroll()),
            );
        }
        for (i, line) in chapter.typewriter.iter().enumerate() {
            section.push(
                self.typed_line(format!("{}.line.{i}", chapter.id), line, 1.5)
                    .motion(MotionPreset::story_scroll()),
            );
        }

        let height = self.layout.section_height(section.kind, &section.slots);
        if let Some(container) = &chapter.container {
            // Hosts apply this to the chapter's content group as a whole
            section.slots.insert(
                0,
                Slot::new(format!("{}.container", chapter.id), "", 0.0)
                    .placement(Placement::Fill)
                    .motion(MotionPreset::chapter_container(container.rise, container.scale)),
            );
        }
        section.slots.insert(
            0,
            Slot::new(format!("{}.background", chapter.id), "", 0.0)
                .placement(Placement::Fill)
                .motion(MotionPreset::drift(height * 0.5)),
        );
        section
    }

    fn projects(&self, projects: &Projects) -> Section {
        let mut section = Section::new("projects", SectionKind::Projects);

        let heading = join_blocks(&[&projects.heading, &projects.intro]);
        section.push(
            Slot::new("projects.heading", heading.as_str(), self.text(&heading, 2.0))
                .motion(MotionPreset::scroll_reveal(Direction::Up, 200)),
        );

        for (i, project) in projects.items.iter().enumerate() {
            let badge = if project.featured { "Featured Project" } else { "" };
            let tech = project.tech.join(" · ");
            let text = join_blocks(&[badge, &project.title, &project.description, &tech]);
            section.push(
                Slot::new(format!("projects.item.{i}"), text.as_str(), self.text(&text, 1.2))
                    .motion(MotionPreset::scroll_reveal(
                        Direction::alternating(i),
                        PROJECT_DELAY_MS + i as u32 * PROJECT_STAGGER_MS,
                    )),
            );
        }

        if let Some(label) = &projects.show_all {
            section.push(
                Slot::new("projects.show_all", label.as_str(), self.text(label, 1.2))
                    .motion(MotionPreset::scroll_reveal(Direction::Up, 800)),
            );
        }
        section
    }

    fn contact(&self, contact: &Contact) -> Section {
        let mut section = Section::new("contact", SectionKind::Contact);

        for i in 0..CONTACT_PARTICLES {
            section.push(
                Slot::new(format!("contact.particle.{i}"), "", 0.0)
                    .placement(Placement::Anchor {
                        x: 0.1 + i as f32 * 0.1,
                        y: 0.2 + i as f32 * 0.08,
                    })
                    .motion(MotionPreset::particle(
                        (200.0, 150.0),
                        (0.2, 0.8),
                        15_000 + i as u32 * 3_000,
                    )),
            );
        }

        let heading = join_blocks(&[&contact.heading, &contact.blurb]);
        section.push(
            Slot::new("contact.heading", heading.as_str(), self.text(&heading, 2.0))
                .motion(MotionPreset::scroll_reveal(Direction::Up, 200)),
        );

        let pitch = join_blocks(&[&contact.pitch_title, &contact.pitch]);
        section.push(
            Slot::new("contact.pitch", pitch.as_str(), self.text(&pitch, 1.0))
                .motion(MotionPreset::scroll_reveal(Direction::Left, 400)),
        );
        for (i, link) in contact.links.iter().enumerate() {
            let text = format!("{}: {}", link.label, link.value);
            section.push(
                Slot::new(format!("contact.link.{i}"), text.as_str(), self.text(&text, 1.0))
                    .motion(MotionPreset::in_view(
                        (-30.0, 0.0),
                        500,
                        i as u32 * LINK_STAGGER_MS,
                    )),
            );
        }

        let card = join_blocks(&[&contact.card_title, &contact.card_text, &contact.response_note]);
        section.push(
            Slot::new("contact.card", card.as_str(), self.text(&card, 1.0))
                .motion(MotionPreset::scroll_reveal(Direction::Right, 600)),
        );
        section.push(
            Slot::new("contact.badge", "", 0.0)
                .placement(Placement::Anchor { x: 0.75, y: 0.6 })
                .motion(MotionPreset::spin(10_000)),
        );
        section
    }

    fn footer(&self, portfolio: &Portfolio) -> Section {
        let footer = &portfolio.footer;
        let mut section = Section::new("footer", SectionKind::Footer);

        let identity = join_blocks(&[&portfolio.owner.name, portfolio.footer_tagline()]);
        section.push(
            Slot::new("footer.identity", identity.as_str(), self.text(&identity, 1.3))
                .motion(MotionPreset::in_view((0.0, 20.0), 600, 0)),
        );

        let credits = join_blocks(&[&footer.copyright, &footer.credits]);
        section.push(
            Slot::new("footer.credits", credits.as_str(), self.text(&credits, 1.0))
                .motion(MotionPreset::in_view((0.0, 20.0), 600, 200)),
        );
        if !footer.quote.is_empty() {
            section.push(
                Slot::new("footer.quote", footer.quote.as_str(), self.text(&footer.quote, 0.9))
                    .motion(MotionPreset::in_view_widen(1000, 400)),
            );
        }
        section
    }
}

impl Default for SectionComposer {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

fn join_blocks(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_unique_sections(page: &Page) -> Result<()> {
    let mut seen = FxHashSet::default();
    for id in page.section_ids() {
        if !seen.insert(id) {
            return Err(SiteError::DuplicateSection(id.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NavEntry;
    use folio_animation::{MotionInput, Style};

    fn style_at(slot: &Slot, viewport_height: f32, scroll_y: f32) -> Style {
        slot.motion.sample(&MotionInput {
            elapsed_ms: 0,
            scroll_y,
            viewport_height,
            target: slot.rect,
            revealed_at_ms: None,
        })
    }

    fn sample() -> Portfolio {
        Portfolio::sample().unwrap()
    }

    #[test]
    fn test_section_order() {
        let page = SectionComposer::default().compose(&sample()).unwrap();
        assert_eq!(
            page.section_ids().collect::<Vec<_>>(),
            vec!["hero", "about", "evolution", "final", "projects", "contact", "footer"]
        );
    }

    #[test]
    fn test_nav_resolves_to_sections() {
        let page = SectionComposer::default().compose(&sample()).unwrap();

        assert_eq!(page.nav.len(), 4);
        for (_, target) in &page.nav {
            assert!(page.section(target).is_some(), "{target}");
        }
        assert_eq!(page.overlay[0].text, "Home · About · Projects · Contact");
        assert_eq!(page.overlay[0].motion.kind(), "page-scroll");
    }

    #[test]
    fn test_unknown_nav_target_rejected() {
        let mut portfolio = sample();
        portfolio.nav.push(NavEntry {
            id: "blog".into(),
            label: "Blog".into(),
        });
        match SectionComposer::default().compose(&portfolio) {
            Err(SiteError::UnknownNavTarget(id)) => assert_eq!(id, "blog"),
            other => panic!("expected unknown nav target, got {other:?}"),
        }
    }

    #[test]
    fn test_chapter_id_collision_rejected() {
        let mut portfolio = sample();
        portfolio.chapters[0].id = "projects".into();
        assert!(matches!(
            SectionComposer::default().compose(&portfolio),
            Err(SiteError::DuplicateSection(id)) if id == "projects"
        ));
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let composer = SectionComposer::new(LayoutConfig {
            viewport_width: 0.0,
            ..Default::default()
        });
        assert!(matches!(
            composer.compose(&sample()),
            Err(SiteError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_hero_wiring() {
        let page = SectionComposer::default().compose(&sample()).unwrap();
        let hero = page.section("hero").unwrap();

        assert_eq!(hero.rect.height, 800.0);
        assert_eq!(hero.slot("hero.title").unwrap().text, "Alex Chen");
        assert_eq!(hero.slot("hero.background").unwrap().motion.kind(), "scroll");
        assert_eq!(hero.slot("hero.scroll_hint").unwrap().motion.kind(), "timed");

        let lines: Vec<_> = hero
            .slots
            .iter()
            .filter_map(|slot| slot.typewriter.as_ref())
            .map(|t| (t.text.as_str(), t.delay_ms, t.speed_ms))
            .collect();
        assert_eq!(lines, vec![("Developer", 2000, 100), ("Has a Story", 3500, 80)]);

        let particles = hero
            .slots
            .iter()
            .filter(|slot| slot.id.starts_with("hero.particle."))
            .count();
        assert_eq!(particles, 5);

        let glyphs: Vec<_> = hero
            .slots
            .iter()
            .filter(|slot| slot.id.starts_with("hero.glyph."))
            .map(|slot| (slot.text.as_str(), slot.motion.kind()))
            .collect();
        assert_eq!(glyphs.len(), 6);
        assert_eq!(glyphs[0], ("</>", "timed"));
        assert_eq!(hero.slots[0].id, "hero.background");
    }

    #[test]
    fn test_parallax_follows_hero_height() {
        let composer = SectionComposer::new(LayoutConfig {
            viewport_height: 200.0,
            ..Default::default()
        });
        let page = composer.compose(&sample()).unwrap();
        let hero = page.section("hero").unwrap();
        assert!(hero.rect.height > 200.0);

        let background = hero.slot("hero.background").unwrap();
        assert_eq!(background.rect, hero.rect);
        let offset = style_at(background, 200.0, hero.rect.height).offset_y;
        assert!((offset - hero.rect.height * 0.5).abs() < 1e-3, "{offset}");
    }

    #[test]
    fn test_final_chapter_wiring() {
        let page = SectionComposer::default().compose(&sample()).unwrap();
        let chapter = page.section("final").unwrap();

        assert_eq!(chapter.kind, SectionKind::Story);
        assert_eq!(chapter.slots[0].id, "final.background");
        assert_eq!(chapter.slots[1].id, "final.container");
        assert_eq!(chapter.slots[1].placement, Placement::Fill);

        let lines: Vec<_> = chapter
            .slots
            .iter()
            .filter_map(|slot| slot.typewriter.as_ref().map(|t| (slot.id.as_str(), t.delay_ms)))
            .collect();
        assert_eq!(lines, vec![("final.line.0", 500), ("final.line.1", 2000)]);
        assert_eq!(page.slot("final.line.0").unwrap().motion.kind(), "scroll");

        // Evolution has no container
        assert!(page.slot("evolution.container").is_none());
    }

    #[test]
    fn test_chapter_container_rises_and_zooms() {
        let page = SectionComposer::default().compose(&sample()).unwrap();
        let chapter = page.section("final").unwrap();
        let container = chapter.slot("final.container").unwrap();
        assert_eq!(container.rect, chapter.rect);

        let entering = style_at(container, 800.0, chapter.rect.top() - 800.0);
        assert!(entering.offset_y.abs() < 1e-3);
        assert!((entering.scale - 0.8).abs() < 1e-3);

        let leaving = style_at(container, 800.0, chapter.rect.bottom());
        assert!((leaving.offset_y + 100.0).abs() < 1e-3);
        assert!((leaving.scale - 1.2).abs() < 1e-3);
    }

    #[test]
    fn test_content_sections_use_reveals() {
        let page = SectionComposer::default().compose(&sample()).unwrap();

        for id in ["about.heading", "about.story", "projects.item.0", "contact.card"] {
            let slot = page.slot(id).unwrap();
            assert_eq!(slot.motion.kind(), "reveal", "{id}");
        }
        for id in ["evolution.header", "evolution.milestone.2"] {
            assert_eq!(page.slot(id).unwrap().motion.kind(), "scroll", "{id}");
        }
    }

    #[test]
    fn test_sections_do_not_overlap() {
        let page = SectionComposer::default().compose(&sample()).unwrap();

        let mut bottom = 0.0;
        for section in &page.sections {
            assert_eq!(section.rect.top(), bottom, "{}", section.id);
            assert!(section.rect.height > 0.0);
            bottom = section.rect.bottom();
        }
        assert_eq!(page.height, bottom);
    }

    #[test]
    fn test_join_blocks_skips_empty() {
        assert_eq!(join_blocks(&["A", " ", "", "B "]), "A\nB");
    }
}
