//! Site error types

use thiserror::Error;

/// Content and composition errors
#[derive(Error, Debug)]
pub enum SiteError {
    /// Content file is not valid TOML or does not match the content model
    #[error("Content parse failed: {0}")]
    Parse(#[from] toml::de::Error),

    /// The portfolio owner has no name
    #[error("Owner name must not be empty")]
    MissingOwnerName,

    /// Two navigation entries share an id
    #[error("Duplicate navigation id: {0}")]
    DuplicateNav(String),

    /// Two sections share an id
    #[error("Duplicate section id: {0}")]
    DuplicateSection(String),

    /// A navigation entry points at a section that does not exist
    #[error("Navigation entry '{0}' does not match any section")]
    UnknownNavTarget(String),

    /// Viewport or spacing values are unusable
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

/// Result type for site operations
pub type Result<T> = std::result::Result<T, SiteError>;
