//! Error taxonomy for changelog generation.
//!
//! Usage and configuration problems are raised before any request is made.
//! A single-issue "not found" is never an error: it surfaces as `Ok(None)`
//! from [`crate::services::GitHubApi::fetch_issue`].

use thiserror::Error;

pub type Result<T, E = ChangelogError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Repository references must look like `owner/name`.
    #[error("GitHub repository reference '{0}' must be in the form 'owner/name'")]
    InvalidRepository(String),

    /// A milestone passed by id was not a number.
    #[error("Milestone reference '{0}' is not a numeric milestone id")]
    InvalidMilestoneId(String),

    #[error("Unable to find milestone with title '{0}'")]
    MilestoneNotFound(String),

    #[error("Invalid body expression for ported issue label '{label}': {source}")]
    InvalidPortExpression {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid section '{title}': {reason}")]
    InvalidSection { title: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Could not determine GitHub credentials: {0}")]
    Credentials(String),

    /// The API answered with a status other than success or a single-issue 404.
    #[error("GitHub API request to {url} failed with status {status}")]
    Api {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for ChangelogError {
    fn from(err: serde_yaml::Error) -> Self {
        ChangelogError::Config(err.to_string())
    }
}
