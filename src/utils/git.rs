use std::process::Command;

use crate::data::Repository;

/// The GitHub repository behind the `origin` remote of the working directory.
pub fn get_current_repo() -> Option<Repository> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    parse_github_url(&url)
}

pub fn parse_github_url(url: &str) -> Option<Repository> {
    // Handle SSH: git@github.com:owner/repo.git
    if let Some(path) = url.strip_prefix("git@github.com:") {
        return repository_from_path(path);
    }

    // Handle HTTPS: https://github.com/owner/repo.git
    if url.contains("github.com") {
        let path = url.split("github.com").nth(1)?;
        let path = path.trim_start_matches('/').trim_start_matches(':');
        return repository_from_path(path);
    }

    None
}

fn repository_from_path(path: &str) -> Option<Repository> {
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
            Some(Repository::new(owner, name))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ssh_remote() {
        let repo = parse_github_url("git@github.com:spring-io/github-changelog-generator.git");
        assert_eq!(
            repo,
            Some(Repository::new("spring-io", "github-changelog-generator"))
        );
    }

    #[test]
    fn parses_https_remote() {
        assert_eq!(
            parse_github_url("https://github.com/tokio-rs/tokio.git"),
            Some(Repository::new("tokio-rs", "tokio"))
        );
        assert_eq!(
            parse_github_url("https://github.com/tokio-rs/tokio"),
            Some(Repository::new("tokio-rs", "tokio"))
        );
    }

    #[test]
    fn rejects_other_hosts() {
        assert_eq!(parse_github_url("https://gitlab.com/owner/repo"), None);
        assert_eq!(parse_github_url("git@github.com:owner"), None);
    }
}
