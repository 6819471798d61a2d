use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::github::GitHubApi;
use crate::data::{Issue, Repository, User};
use crate::error::{ChangelogError, Result};

/// Longest forward-port / back-port chain that will be followed.
pub const MAX_PORT_CHAIN: usize = 16;

/// Excluding this name drops every contributor.
pub const EXCLUDE_ALL: &str = "*";

/// A label marking an issue as a port, and how to find the original issue
/// number in its body.
#[derive(Debug, Clone)]
pub struct PortedIssue {
    label: String,
    body_expression: Regex,
}

impl PortedIssue {
    /// The expression must match the whole body and capture the referenced
    /// issue number in its first group.
    pub fn new(label: impl Into<String>, body_expression: &str) -> Result<Self> {
        let label = label.into();
        let anchored = format!("^(?:{body_expression})$");
        let body_expression =
            Regex::new(&anchored).map_err(|source| ChangelogError::InvalidPortExpression {
                label: label.clone(),
                source,
            })?;
        if body_expression.captures_len() < 2 {
            return Err(ChangelogError::Config(format!(
                "body expression for ported issue label '{label}' needs a capture group"
            )));
        }
        Ok(Self {
            label,
            body_expression,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The issue number this port points at, if the issue carries the label
    /// and its body matches.
    pub fn referenced_issue(&self, issue: &Issue) -> Option<u64> {
        if !issue.has_label(&self.label) {
            return None;
        }
        let body = issue.body.as_deref()?;
        let captures = self.body_expression.captures(body)?;
        captures
            .get(1)?
            .as_str()
            .trim()
            .trim_start_matches('#')
            .parse()
            .ok()
    }
}

/// Walk the port chain from `issue` to the issue whose author deserves credit.
///
/// References that can't be found end the chain at the current issue. A
/// revisited issue or a chain longer than [`MAX_PORT_CHAIN`] also stops the walk.
pub async fn resolve_origin(
    api: &dyn GitHubApi,
    repo: &Repository,
    ports: &[PortedIssue],
    issue: &Issue,
) -> Result<Issue> {
    let mut current = issue.clone();
    let mut visited = HashSet::from([current.number]);

    for _ in 0..MAX_PORT_CHAIN {
        let Some(next) = follow_port(api, repo, ports, &current).await? else {
            return Ok(current);
        };
        if !visited.insert(next.number) {
            warn!(
                from = current.number,
                to = next.number,
                "ported issue chain loops back, stopping"
            );
            return Ok(current);
        }
        debug!(from = current.number, to = next.number, "following ported issue");
        current = next;
    }

    warn!(
        start = issue.number,
        stop = current.number,
        "ported issue chain exceeds {MAX_PORT_CHAIN} hops, stopping"
    );
    Ok(current)
}

async fn follow_port(
    api: &dyn GitHubApi,
    repo: &Repository,
    ports: &[PortedIssue],
    issue: &Issue,
) -> Result<Option<Issue>> {
    for port in ports {
        if let Some(number) = port.referenced_issue(issue) {
            if let Some(referenced) = api.fetch_issue(number, repo).await? {
                return Ok(Some(referenced));
            }
        }
    }
    Ok(None)
}

/// Pull request authors to thank, deduplicated by login and sorted
/// case-insensitively.
pub async fn collect_contributors(
    api: &dyn GitHubApi,
    repo: &Repository,
    ports: &[PortedIssue],
    excluded: &HashSet<String>,
    issues: &[Issue],
) -> Result<Vec<User>> {
    if excluded.contains(EXCLUDE_ALL) {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let mut contributors = Vec::new();
    for issue in issues {
        let origin = resolve_origin(api, repo, ports, issue).await?;
        if !origin.is_pull_request() {
            continue;
        }
        let Some(author) = origin.author else {
            continue;
        };
        if excluded.contains(&author.name) {
            continue;
        }
        if seen.insert(author.clone()) {
            contributors.push(author);
        }
    }

    contributors.sort_by_key(|user| user.name.to_lowercase());
    Ok(contributors)
}
