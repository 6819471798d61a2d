use serde::Deserialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::ChangelogError;

/// A GitHub repository, parsed from `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for Repository {
    type Err = ChangelogError;

    fn from_str(reference: &str) -> Result<Self, Self::Err> {
        let reference = reference.trim();
        match reference.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
                Ok(Repository::new(owner, name))
            }
            _ => Err(ChangelogError::InvalidRepository(reference.to_string())),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A GitHub account. Two users are the same contributor when their logins match.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(rename = "login")]
    pub name: String,
    #[serde(rename = "html_url", default)]
    pub url: String,
}

impl User {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Present on issues that are really pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestRef {
    #[serde(rename = "html_url", default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(rename = "user", default)]
    pub author: Option<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(rename = "html_url")]
    pub url: String,
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Exact label name lookup, used for exclusions and port rules.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name == name)
    }

    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|label| label.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_parses_owner_and_name() {
        let repo: Repository = "spring-io/github-changelog-generator".parse().unwrap();
        assert_eq!(repo.owner(), "spring-io");
        assert_eq!(repo.name(), "github-changelog-generator");
        assert_eq!(repo.to_string(), "spring-io/github-changelog-generator");
    }

    #[test]
    fn repository_without_slash_is_rejected() {
        let err = "just-a-name".parse::<Repository>().unwrap_err();
        assert!(matches!(err, ChangelogError::InvalidRepository(r) if r == "just-a-name"));
        assert!("/name".parse::<Repository>().is_err());
        assert!("owner/".parse::<Repository>().is_err());
    }

    #[test]
    fn users_compare_by_login_only() {
        let a = User::new("alice", "https://github.com/alice");
        let b = User::new("alice", "");
        assert_eq!(a, b);
        assert_ne!(a, User::new("bob", "https://github.com/alice"));
    }

    #[test]
    fn issue_deserializes_from_api_payload() {
        let json = serde_json::json!({
            "number": 12,
            "title": "Fix thing",
            "html_url": "https://github.com/o/r/pull/12",
            "user": { "login": "bob", "html_url": "https://github.com/bob" },
            "labels": [{ "name": "type: bug", "color": "ff0000" }],
            "pull_request": { "html_url": "https://github.com/o/r/pull/12" },
            "body": null
        });
        let issue: Issue = serde_json::from_value(json).unwrap();
        assert_eq!(issue.number, 12);
        assert!(issue.is_pull_request());
        assert!(issue.has_label("type: bug"));
        assert!(!issue.has_label("bug"));
        assert_eq!(issue.author.unwrap().name, "bob");
        assert!(issue.body.is_none());
    }

    #[test]
    fn plain_issue_has_no_pull_request_marker() {
        let json = serde_json::json!({
            "number": 3,
            "title": "Docs",
            "html_url": "https://github.com/o/r/issues/3",
            "user": null
        });
        let issue: Issue = serde_json::from_value(json).unwrap();
        assert!(!issue.is_pull_request());
        assert!(issue.labels.is_empty());
        assert!(issue.author.is_none());
    }

    #[test]
    fn milestone_deserializes() {
        let json = r#"{"number": 94, "title": "General Backlog", "state": "open"}"#;
        let milestone: Milestone = serde_json::from_str(json).unwrap();
        assert_eq!(milestone.number, 94);
        assert_eq!(milestone.title, "General Backlog");
    }
}
