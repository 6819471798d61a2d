use serde::Deserialize;
use std::cmp::Ordering;

use super::models::Issue;

// Issue type filter applied per section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    #[default]
    Any,
    Issue,
    PullRequest,
}

impl IssueType {
    pub fn matches(self, issue: &Issue) -> bool {
        match self {
            IssueType::Any => true,
            IssueType::Issue => !issue.is_pull_request(),
            IssueType::PullRequest => issue.is_pull_request(),
        }
    }
}

// Ordering of issues inside a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueSort {
    /// Keep the order the API returned.
    Created,
    /// Case-insensitive by title.
    Title,
}

impl IssueSort {
    pub fn sort(self, issues: &mut [Issue]) {
        if self == IssueSort::Title {
            issues.sort_by(compare_titles);
        }
    }
}

fn compare_titles(a: &Issue, b: &Issue) -> Ordering {
    a.title.to_lowercase().cmp(&b.title.to_lowercase())
}

// How the milestone argument is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneReference {
    #[default]
    Title,
    Id,
}
