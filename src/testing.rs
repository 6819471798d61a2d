//! Builders and an in-memory [`GitHubApi`] shared by the unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::data::{Issue, Label, Milestone, PullRequestRef, Repository, User};
use crate::error::Result;
use crate::services::GitHubApi;

pub fn issue(number: u64, title: &str, labels: &[&str]) -> Issue {
    Issue {
        number,
        title: title.to_string(),
        author: None,
        labels: labels.iter().map(|name| Label::new(*name)).collect(),
        url: format!("https://github.com/org/name/issues/{number}"),
        pull_request: None,
        body: None,
    }
}

pub fn pull_request(number: u64, title: &str, labels: &[&str], author: &str) -> Issue {
    Issue {
        author: Some(user(author)),
        pull_request: Some(PullRequestRef {
            url: Some(format!("https://github.com/org/name/pull/{number}")),
        }),
        url: format!("https://github.com/org/name/pull/{number}"),
        ..issue(number, title, labels)
    }
}

pub fn user(login: &str) -> User {
    User::new(login, format!("https://github.com/{login}"))
}

pub fn with_body(mut issue: Issue, body: &str) -> Issue {
    issue.body = Some(body.to_string());
    issue
}

#[derive(Default)]
pub struct FakeGitHub {
    pub milestones: Vec<Milestone>,
    pub milestone_issues: HashMap<u64, Vec<Issue>>,
    pub issues: HashMap<u64, Issue>,
    pub lookups: AtomicUsize,
}

impl FakeGitHub {
    pub fn with_issues(issues: impl IntoIterator<Item = Issue>) -> Self {
        Self {
            issues: issues.into_iter().map(|i| (i.number, i)).collect(),
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn fetch_milestones(&self, _repo: &Repository) -> Result<Vec<Milestone>> {
        Ok(self.milestones.clone())
    }

    async fn fetch_issues(&self, milestone: u64, _repo: &Repository) -> Result<Vec<Issue>> {
        Ok(self
            .milestone_issues
            .get(&milestone)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_issue(&self, number: u64, _repo: &Repository) -> Result<Option<Issue>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.issues.get(&number).cloned())
    }
}
