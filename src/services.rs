pub mod contributors;
pub mod github;
pub mod pagination;

pub use contributors::{collect_contributors, resolve_origin, PortedIssue, EXCLUDE_ALL};
pub use github::{
    get_github_token, resolve_milestone_number, Credentials, GitHubApi, GitHubClient,
    DEFAULT_API_URL,
};
pub use pagination::next_link;
