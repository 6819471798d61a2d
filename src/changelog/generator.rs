use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use super::render::{render, ExternalLink};
use super::sections::Sections;
use crate::data::{Issue, IssueSort, MilestoneReference, Repository};
use crate::error::Result;
use crate::services::{collect_contributors, resolve_milestone_number, GitHubApi, PortedIssue};

/// Validated settings for one changelog run.
#[derive(Debug, Clone)]
pub struct ChangelogSettings {
    pub repository: Repository,
    pub milestone_reference: MilestoneReference,
    pub sections: Sections,
    pub default_sort: Option<IssueSort>,
    /// Issues carrying any of these labels (exact name) are left out entirely.
    pub excluded_labels: HashSet<String>,
    pub ports: Vec<PortedIssue>,
    pub excluded_contributors: HashSet<String>,
    pub contributors_title: Option<String>,
    pub external_links: Vec<ExternalLink>,
}

impl ChangelogSettings {
    /// Default sections and no exclusions.
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            milestone_reference: MilestoneReference::default(),
            sections: Sections::with_defaults(Vec::new(), false),
            default_sort: None,
            excluded_labels: HashSet::new(),
            ports: Vec::new(),
            excluded_contributors: HashSet::new(),
            contributors_title: None,
            external_links: Vec::new(),
        }
    }
}

/// Builds the changelog for a milestone and writes it to disk.
pub struct ChangelogGenerator<'a> {
    api: &'a dyn GitHubApi,
    settings: ChangelogSettings,
}

impl<'a> ChangelogGenerator<'a> {
    pub fn new(api: &'a dyn GitHubApi, settings: ChangelogSettings) -> Self {
        Self { api, settings }
    }

    /// Write the changelog for `milestone` to `path`, replacing any existing
    /// file. Nothing is written unless the whole document was built.
    pub async fn generate(&self, milestone: &str, path: &Path) -> Result<()> {
        let content = self.generate_content(milestone).await?;
        std::fs::write(path, &content)?;
        info!(path = %path.display(), bytes = content.len(), "changelog written");
        Ok(())
    }

    pub async fn generate_content(&self, milestone: &str) -> Result<String> {
        let number = resolve_milestone_number(
            self.api,
            &self.settings.repository,
            milestone,
            self.settings.milestone_reference,
        )
        .await?;
        let issues = self.fetch_issues(number).await?;
        self.content_for(&issues).await
    }

    async fn fetch_issues(&self, milestone: u64) -> Result<Vec<Issue>> {
        let mut issues = self
            .api
            .fetch_issues(milestone, &self.settings.repository)
            .await?;
        let fetched = issues.len();
        issues.retain(|issue| !self.is_excluded(issue));
        info!(
            milestone,
            fetched,
            excluded = fetched - issues.len(),
            "collected milestone issues"
        );
        Ok(issues)
    }

    fn is_excluded(&self, issue: &Issue) -> bool {
        issue
            .label_names()
            .any(|name| self.settings.excluded_labels.contains(name))
    }

    /// Render already fetched issues.
    pub async fn content_for(&self, issues: &[Issue]) -> Result<String> {
        let mut collated = self.settings.sections.collate(issues);
        for section in &mut collated {
            section.sort(self.settings.default_sort);
            debug!(section = %section.section.title, issues = section.issues.len(), "collated section");
        }

        let contributors = collect_contributors(
            self.api,
            &self.settings.repository,
            &self.settings.ports,
            &self.settings.excluded_contributors,
            issues,
        )
        .await?;

        Ok(render(
            &collated,
            &contributors,
            self.settings.contributors_title.as_deref(),
            &self.settings.external_links,
        ))
    }
}
