//! Markdown rendering of collated sections, contributors and links.
//!
//! Issue lines come from a template. The placeholders are `{title}` (escaped),
//! `{number}`, `{url}`, `{link}` (`[#number](url)`) and `{author}`.

use serde::Deserialize;

use super::escape::escape_title;
use super::sections::CollatedSection;
use crate::data::{Issue, User};

pub const DEFAULT_ISSUE_FORMAT: &str = "- {title} {link}";
pub const DEFAULT_CONTRIBUTORS_TITLE: &str = ":heart: Contributors";
const THANK_YOU: &str = "Thank you to all the contributors who worked on this release:";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalLink {
    pub name: String,
    pub location: String,
}

pub fn render(
    sections: &[CollatedSection<'_>],
    contributors: &[User],
    contributors_title: Option<&str>,
    external_links: &[ExternalLink],
) -> String {
    let mut blocks: Vec<String> = sections.iter().map(render_section).collect();

    if !contributors.is_empty() {
        blocks.push(render_contributors(
            contributors_title.unwrap_or(DEFAULT_CONTRIBUTORS_TITLE),
            contributors,
        ));
    }
    if !external_links.is_empty() {
        blocks.push(render_external_links(external_links));
    }

    blocks.join("\n")
}

fn render_section(collated: &CollatedSection<'_>) -> String {
    let format = collated
        .section
        .format
        .as_deref()
        .unwrap_or(DEFAULT_ISSUE_FORMAT);
    let mut block = format!("## {}\n\n", collated.section.title);
    for issue in &collated.issues {
        block.push_str(&format_issue(issue, format));
        block.push('\n');
    }
    block
}

pub fn format_issue(issue: &Issue, format: &str) -> String {
    let link = format!("[#{}]({})", issue.number, issue.url);
    let author = issue.author.as_ref().map(|a| a.name.as_str()).unwrap_or("");
    // Single pass so substituted values are never re-expanded.
    let mut line = String::with_capacity(format.len() + issue.title.len());
    let mut rest = format;
    while let Some(start) = rest.find('{') {
        line.push_str(&rest[..start]);
        let after = &rest[start..];
        let Some(end) = after.find('}') else {
            line.push_str(after);
            return line;
        };
        let value = match &after[1..end] {
            "title" => escape_title(&issue.title),
            "number" => issue.number.to_string(),
            "url" => issue.url.clone(),
            "link" => link.clone(),
            "author" => author.to_string(),
            _ => after[..=end].to_string(),
        };
        line.push_str(&value);
        rest = &after[end + 1..];
    }
    line.push_str(rest);
    line
}

fn render_contributors(title: &str, contributors: &[User]) -> String {
    let names: Vec<String> = contributors.iter().map(contributor_link).collect();
    format!("## {title}\n\n{THANK_YOU}\n\n{}\n", join_names(&names))
}

fn contributor_link(user: &User) -> String {
    if user.url.is_empty() {
        format!("@{}", user.name)
    } else {
        format!("[@{}]({})", user.name, user.url)
    }
}

/// `a`, `a and b`, `a, b, and c`.
pub fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

fn render_external_links(links: &[ExternalLink]) -> String {
    let mut block = String::from("## External Links\n\n");
    for link in links {
        block.push_str(&format!("- [{}]({})\n", link.name, link.location));
    }
    block
}
