//! Portfolio content model (portfolio.toml)

use crate::error::{Result, SiteError};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Built-in sample content
pub const SAMPLE_TOML: &str = include_str!("../assets/portfolio.toml");

/// Everything shown on the page
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Portfolio {
    pub owner: Owner,
    #[serde(default)]
    pub nav: Vec<NavEntry>,
    #[serde(default)]
    pub hero: Hero,
    pub about: About,
    /// Story chapters shown between the about and projects sections
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    pub projects: Projects,
    pub contact: Contact,
    #[serde(default)]
    pub footer: Footer,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Owner {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub summary: String,
}

/// Floating navigation entry; `id` names the target section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NavEntry {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Hero {
    /// Lines typed out under the title
    #[serde(default)]
    pub typewriter: Vec<TypewriterLine>,
    /// Call-to-action button labels
    #[serde(default)]
    pub cta: Vec<String>,
    #[serde(default = "default_scroll_hint")]
    pub scroll_hint: String,
    /// Number of ambient background particles
    #[serde(default = "default_particles")]
    pub particles: usize,
    /// Code symbols floating up from the bottom of the hero
    #[serde(default)]
    pub glyphs: Vec<String>,
}

fn default_scroll_hint() -> String {
    "Scroll to explore".to_string()
}

fn default_particles() -> usize {
    5
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            typewriter: Vec::new(),
            cta: Vec::new(),
            scroll_hint: default_scroll_hint(),
            particles: default_particles(),
            glyphs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TypewriterLine {
    pub text: String,
    #[serde(default)]
    pub delay_ms: u32,
    #[serde(default = "default_type_speed")]
    pub speed_ms: u32,
}

fn default_type_speed() -> u32 {
    50
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct About {
    pub heading: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub story_title: String,
    #[serde(default)]
    pub story: Vec<String>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub skills_title: String,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SkillGroup {
    pub category: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Chapter {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    /// Lines typed out after the milestones
    #[serde(default)]
    pub typewriter: Vec<TypewriterLine>,
    /// Scroll transform applied to the chapter content as a whole
    #[serde(default)]
    pub container: Option<ChapterMotion>,
}

/// Rise and zoom of a chapter while it crosses the viewport
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChapterMotion {
    /// Pixels the content rises from entering to leaving
    #[serde(default = "default_chapter_rise")]
    pub rise: f32,
    /// Scale when entering, centred and leaving
    #[serde(default = "default_chapter_scale")]
    pub scale: [f32; 3],
}

fn default_chapter_rise() -> f32 {
    100.0
}

fn default_chapter_scale() -> [f32; 3] {
    [0.8, 1.0, 1.2]
}

impl Default for ChapterMotion {
    fn default() -> Self {
        Self {
            rise: default_chapter_rise(),
            scale: default_chapter_scale(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Milestone {
    pub title: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Projects {
    pub heading: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub items: Vec<Project>,
    /// Label of the trailing "see everything" button
    #[serde(default)]
    pub show_all: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub code_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Contact {
    pub heading: String,
    #[serde(default)]
    pub blurb: String,
    #[serde(default)]
    pub pitch_title: String,
    #[serde(default)]
    pub pitch: String,
    #[serde(default)]
    pub links: Vec<ContactLink>,
    #[serde(default)]
    pub card_title: String,
    #[serde(default)]
    pub card_text: String,
    #[serde(default)]
    pub response_note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContactLink {
    pub label: String,
    pub value: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Footer {
    /// Defaults to the owner's role
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub copyright: String,
    #[serde(default)]
    pub credits: String,
    #[serde(default)]
    pub quote: String,
}

impl Portfolio {
    /// Parse and validate content from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let portfolio: Portfolio = toml::from_str(text)?;
        portfolio.validate()?;
        tracing::debug!(
            owner = %portfolio.owner.name,
            projects = portfolio.projects.items.len(),
            chapters = portfolio.chapters.len(),
            "Portfolio content loaded"
        );
        Ok(portfolio)
    }

    /// The built-in sample portfolio
    pub fn sample() -> Result<Self> {
        Self::from_toml_str(SAMPLE_TOML)
    }

    /// Content-level checks (cross-section checks happen at composition)
    pub fn validate(&self) -> Result<()> {
        if self.owner.name.trim().is_empty() {
            return Err(SiteError::MissingOwnerName);
        }

        let mut seen = FxHashSet::default();
        for entry in &self.nav {
            if !seen.insert(entry.id.as_str()) {
                return Err(SiteError::DuplicateNav(entry.id.clone()));
            }
        }
        Ok(())
    }

    pub fn footer_tagline(&self) -> &str {
        self.footer.tagline.as_deref().unwrap_or(&self.owner.role)
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [owner]
        name = "Sam Doe"

        [about]
        heading = "About"

        [projects]
        heading = "Work"

        [contact]
        heading = "Contact"
    "#;

    #[test]
    fn test_sample_parses() {
        let portfolio = Portfolio::sample().unwrap();

        assert_eq!(portfolio.owner.name, "Alex Chen");
        assert_eq!(portfolio.nav.len(), 4);
        assert_eq!(portfolio.hero.typewriter[0].text, "Developer");
        assert_eq!(portfolio.hero.typewriter[1].delay_ms, 3500);
        assert_eq!(portfolio.about.skills.len(), 3);
        assert_eq!(portfolio.projects.items.len(), 3);
        assert!(portfolio.projects.items[0].featured);
        assert!(!portfolio.projects.items[1].featured);
        assert_eq!(portfolio.contact.links.len(), 4);
        assert_eq!(portfolio.chapters[0].milestones.len(), 3);
        assert_eq!(portfolio.hero.glyphs.len(), 6);
    }

    #[test]
    fn test_final_chapter_lines_and_container() {
        let portfolio = Portfolio::sample().unwrap();
        let last = portfolio.chapters.last().unwrap();

        assert_eq!(last.id, "final");
        let lines: Vec<_> = last
            .typewriter
            .iter()
            .map(|line| (line.delay_ms, line.speed_ms))
            .collect();
        assert_eq!(lines, vec![(500, 50), (2000, 60)]);
        assert_eq!(last.container, Some(ChapterMotion::default()));

        // The evolution chapter has neither
        assert!(portfolio.chapters[0].typewriter.is_empty());
        assert!(portfolio.chapters[0].container.is_none());
    }

    #[test]
    fn test_chapter_container_defaults() {
        let text = format!(
            "{MINIMAL}\n[[chapters]]\nid = \"next\"\ntitle = \"Next\"\n[chapters.container]\nrise = 40.0\n"
        );
        let portfolio = Portfolio::from_toml_str(&text).unwrap();
        let container = portfolio.chapters[0].container.as_ref().unwrap();

        assert_eq!(container.rise, 40.0);
        assert_eq!(container.scale, [0.8, 1.0, 1.2]);
    }

    #[test]
    fn test_minimal_content_uses_defaults() {
        let portfolio = Portfolio::from_toml_str(MINIMAL).unwrap();

        assert!(portfolio.nav.is_empty());
        assert_eq!(portfolio.hero.scroll_hint, "Scroll to explore");
        assert_eq!(portfolio.hero.particles, 5);
        assert!(portfolio.hero.glyphs.is_empty());
        assert!(portfolio.chapters.is_empty());
        assert_eq!(portfolio.footer_tagline(), "");
    }

    #[test]
    fn test_footer_tagline_falls_back_to_role() {
        let portfolio = Portfolio::sample().unwrap();
        assert_eq!(
            portfolio.footer_tagline(),
            "Full-Stack Developer & Digital Craftsman"
        );
    }

    #[test]
    fn test_empty_owner_name_rejected() {
        let text = MINIMAL.replace("Sam Doe", "  ");
        assert!(matches!(
            Portfolio::from_toml_str(&text),
            Err(SiteError::MissingOwnerName)
        ));
    }

    #[test]
    fn test_duplicate_nav_rejected() {
        let text = format!(
            "{MINIMAL}\n[[nav]]\nid = \"about\"\nlabel = \"A\"\n[[nav]]\nid = \"about\"\nlabel = \"B\"\n"
        );
        match Portfolio::from_toml_str(&text) {
            Err(SiteError::DuplicateNav(id)) => assert_eq!(id, "about"),
            other => panic!("expected duplicate nav error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        assert!(matches!(
            Portfolio::from_toml_str("[owner"),
            Err(SiteError::Parse(_))
        ));
    }

    #[test]
    fn test_serialize_round_trip_keeps_content() {
        let portfolio = Portfolio::sample().unwrap();
        let text = portfolio.to_toml_string().unwrap();
        assert_eq!(Portfolio::from_toml_str(&text).unwrap(), portfolio);
    }
}
