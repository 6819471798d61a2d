//! YAML configuration.
//!
//! ```yaml
//! changelog:
//!   repository: owner/name
//!   milestone-reference: title
//!   sections:
//!     - title: ":star: New Features"
//!       labels: ["enhancement"]
//!   issues:
//!     excludes:
//!       labels: ["wontfix"]
//! github:
//!   token: ghp_...
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::changelog::{ChangelogSettings, ExternalLink, Section, Sections};
use crate::data::{IssueSort, IssueType, MilestoneReference, Repository};
use crate::error::{ChangelogError, Result};
use crate::services::{get_github_token, Credentials, PortedIssue, DEFAULT_API_URL};
use crate::utils::get_current_repo;

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub changelog: ChangelogProperties,
    pub github: GitHubProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ChangelogProperties {
    /// `owner/name`; the `origin` git remote is used when absent.
    pub repository: Option<String>,
    pub milestone_reference: MilestoneReference,
    /// Keep the default sections and append the configured ones after them.
    pub add_sections: bool,
    pub sections: Vec<SectionProperties>,
    pub issues: IssuesProperties,
    pub contributors: ContributorsProperties,
    pub external_links: Vec<ExternalLink>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SectionProperties {
    pub title: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub sort: Option<IssueSort>,
    #[serde(default, rename = "type")]
    pub issue_type: IssueType,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IssuesProperties {
    pub sort: Option<IssueSort>,
    pub excludes: IssueExcludes,
    pub ports: Vec<PortProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IssueExcludes {
    pub labels: HashSet<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PortProperties {
    pub label: String,
    #[serde(alias = "bodyExpression")]
    pub body_expression: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContributorsProperties {
    pub title: Option<String>,
    pub exclude: ContributorExcludes,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContributorExcludes {
    pub names: HashSet<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GitHubProperties {
    pub api_url: String,
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for GitHubProperties {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            username: None,
            password: None,
        }
    }
}

impl GitHubProperties {
    /// Configured token, then `GITHUB_TOKEN`, then basic auth, then the `gh`
    /// CLI. Falls back to anonymous access.
    pub fn credentials(&self) -> Credentials {
        let env_token = std::env::var(TOKEN_ENV).ok();
        if let Some(credentials) = self.configured_credentials(env_token) {
            return credentials;
        }
        match get_github_token() {
            Ok(token) if !token.is_empty() => Credentials::Token(token),
            _ => {
                warn!("no GitHub credentials found, using anonymous access");
                Credentials::Anonymous
            }
        }
    }

    fn configured_credentials(&self, env_token: Option<String>) -> Option<Credentials> {
        if let Some(token) = self.token.clone().or(env_token).filter(|t| !t.is_empty()) {
            return Some(Credentials::Token(token));
        }
        match (&self.username, &self.password) {
            (Some(username), password) if !username.is_empty() => Some(Credentials::Basic {
                username: username.clone(),
                password: password.clone().unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ChangelogError::Config(format!("unable to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load `explicit` if given, otherwise the first existing file of
    /// [`Config::search_paths`], otherwise defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration");
                Self::load(&path)
            }
            None => {
                debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".github").join("changelog.yml"),
            PathBuf::from("changelog.yml"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("ghchangelog").join("config.yml"));
        }
        paths
    }

    /// Validate into run settings. `repository` overrides the configured one.
    pub fn changelog_settings(&self, repository: Option<&str>) -> Result<ChangelogSettings> {
        let properties = &self.changelog;
        let repository = match repository.or(properties.repository.as_deref()) {
            Some(reference) => reference.parse::<Repository>()?,
            None => get_current_repo().ok_or_else(|| {
                ChangelogError::Config(
                    "no repository configured and none found in the 'origin' git remote"
                        .to_string(),
                )
            })?,
        };

        let custom = properties
            .sections
            .iter()
            .map(SectionProperties::to_section)
            .collect::<Result<Vec<_>>>()?;

        let ports = properties
            .issues
            .ports
            .iter()
            .map(|port| PortedIssue::new(port.label.clone(), &port.body_expression))
            .collect::<Result<Vec<_>>>()?;

        Ok(ChangelogSettings {
            repository,
            milestone_reference: properties.milestone_reference,
            sections: Sections::with_defaults(custom, properties.add_sections),
            default_sort: properties.issues.sort,
            excluded_labels: properties.issues.excludes.labels.clone(),
            ports,
            excluded_contributors: properties.contributors.exclude.names.clone(),
            contributors_title: properties.contributors.title.clone(),
            external_links: properties.external_links.clone(),
        })
    }
}

impl SectionProperties {
    fn to_section(&self) -> Result<Section> {
        let mut section = Section::new(self.title.clone(), self.labels.clone())?
            .with_sort(self.sort)
            .with_type(self.issue_type)
            .with_format(self.format.clone());
        if let Some(group) = self.group.as_deref().filter(|g| !g.is_empty()) {
            section = section.with_group(group);
        }
        Ok(section)
    }
}
