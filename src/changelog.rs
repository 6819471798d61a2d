pub mod escape;
pub mod generator;
pub mod render;
pub mod sections;

pub use escape::escape_title;
pub use generator::{ChangelogGenerator, ChangelogSettings};
pub use render::{render, ExternalLink, DEFAULT_CONTRIBUTORS_TITLE, DEFAULT_ISSUE_FORMAT};
pub use sections::{default_sections, CollatedSection, Section, Sections, DEFAULT_GROUP};
