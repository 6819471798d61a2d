use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::process::Command;
use tracing::{debug, info};

use super::pagination::next_link;
use crate::data::{Issue, Milestone, MilestoneReference, Repository};
use crate::error::{ChangelogError, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// The slice of the GitHub REST API needed to build a changelog.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// All milestones of the repository, newest due date first.
    async fn fetch_milestones(&self, repo: &Repository) -> Result<Vec<Milestone>>;

    /// Closed issues and pull requests assigned to the milestone, in API order.
    async fn fetch_issues(&self, milestone: u64, repo: &Repository) -> Result<Vec<Issue>>;

    /// A single issue, or `None` when GitHub reports it as not found.
    async fn fetch_issue(&self, number: u64, repo: &Repository) -> Result<Option<Issue>>;
}

/// How requests authenticate against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Basic { username: String, password: String },
    Anonymous,
}

/// Read a token from the `gh` CLI, for users who are already logged in there.
pub fn get_github_token() -> Result<String> {
    let output = Command::new("gh").args(["auth", "token"]).output()?;

    if !output.status.success() {
        return Err(ChangelogError::Credentials(
            "Failed to get GitHub token. Run 'gh auth login' first.".to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// `reqwest` backed implementation of [`GitHubApi`].
///
/// Requests are issued one at a time; list endpoints follow the `Link`
/// header until no `next` relation is left.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    credentials: Credentials,
}

impl GitHubClient {
    pub fn new(api_url: &str, credentials: Credentials) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("ghchangelog/", env!("CARGO_PKG_VERSION"))),
        );
        if let Credentials::Token(token) = &credentials {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ChangelogError::Credentials(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn endpoint(&self, repo: &Repository, rest: &str) -> Result<Url> {
        let url = format!(
            "{}/repos/{}/{}/{}",
            self.api_url,
            urlencoding::encode(repo.owner()),
            urlencoding::encode(repo.name()),
            rest
        );
        Url::parse(&url).map_err(|e| ChangelogError::InvalidUrl {
            url,
            reason: e.to_string(),
        })
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self.http.get(url);
        match &self.credentials {
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            _ => request,
        }
    }

    async fn get_all<T: DeserializeOwned>(&self, first: Url) -> Result<Vec<T>> {
        let mut all = Vec::new();
        let mut next = Some(first);

        while let Some(url) = next.take() {
            debug!(%url, "fetching page");
            let response = self.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ChangelogError::Api {
                    url: url.to_string(),
                    status,
                });
            }

            if let Some(link) = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_link)
            {
                let resolved = url.join(&link).map_err(|e| ChangelogError::InvalidUrl {
                    url: link.clone(),
                    reason: e.to_string(),
                })?;
                next = Some(resolved);
            }

            let page: Vec<T> = response.json().await?;
            all.extend(page);
        }

        Ok(all)
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn fetch_milestones(&self, repo: &Repository) -> Result<Vec<Milestone>> {
        let url = self.endpoint(
            repo,
            "milestones?state=all&sort=due_on&direction=desc&per_page=50",
        )?;
        self.get_all(url).await
    }

    async fn fetch_issues(&self, milestone: u64, repo: &Repository) -> Result<Vec<Issue>> {
        let url = self.endpoint(repo, &format!("issues?milestone={milestone}&state=closed"))?;
        let issues: Vec<Issue> = self.get_all(url).await?;
        debug!(milestone, count = issues.len(), "fetched milestone issues");
        Ok(issues)
    }

    async fn fetch_issue(&self, number: u64, repo: &Repository) -> Result<Option<Issue>> {
        let url = self.endpoint(repo, &format!("issues/{number}"))?;
        let response = self.get(url.clone()).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(number, "issue not found");
                Ok(None)
            }
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(ChangelogError::Api {
                url: url.to_string(),
                status,
            }),
        }
    }
}

/// Turn the milestone argument into a milestone number.
///
/// By title the match is case-insensitive and the first milestone in API
/// order wins.
pub async fn resolve_milestone_number(
    api: &dyn GitHubApi,
    repo: &Repository,
    reference: &str,
    mode: MilestoneReference,
) -> Result<u64> {
    match mode {
        MilestoneReference::Id => reference
            .trim()
            .parse()
            .map_err(|_| ChangelogError::InvalidMilestoneId(reference.to_string())),
        MilestoneReference::Title => {
            let wanted = reference.to_lowercase();
            let milestone = api
                .fetch_milestones(repo)
                .await?
                .into_iter()
                .find(|m| m.title.to_lowercase() == wanted)
                .ok_or_else(|| ChangelogError::MilestoneNotFound(reference.to_string()))?;
            info!(title = %milestone.title, number = milestone.number, "resolved milestone");
            Ok(milestone.number)
        }
    }
}
