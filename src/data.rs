pub mod models;
pub mod types;

pub use models::{Issue, Label, Milestone, PullRequestRef, Repository, User};
pub use types::{IssueSort, IssueType, MilestoneReference};
