use std::collections::HashSet;

use crate::data::{Issue, IssueSort, IssueType};
use crate::error::{ChangelogError, Result};

pub const DEFAULT_GROUP: &str = "default";

/// A changelog bucket and the predicate deciding which issues land in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub group: String,
    pub sort: Option<IssueSort>,
    pub issue_type: IssueType,
    /// Matched by substring against every label name on the issue.
    pub labels: Vec<String>,
    /// Line template, see [`crate::changelog::render`].
    pub format: Option<String>,
}

impl Section {
    pub fn new<I, S>(title: impl Into<String>, labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let title = title.into();
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if title.trim().is_empty() {
            return Err(ChangelogError::InvalidSection {
                title,
                reason: "title must not be empty".to_string(),
            });
        }
        if labels.is_empty() || labels.iter().any(|l| l.is_empty()) {
            return Err(ChangelogError::InvalidSection {
                title,
                reason: "at least one non-empty label is required".to_string(),
            });
        }
        Ok(Self {
            title,
            group: DEFAULT_GROUP.to_string(),
            sort: None,
            issue_type: IssueType::Any,
            labels,
            format: None,
        })
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_sort(mut self, sort: Option<IssueSort>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_type(mut self, issue_type: IssueType) -> Self {
        self.issue_type = issue_type;
        self
    }

    pub fn with_format(mut self, format: Option<String>) -> Self {
        self.format = format;
        self
    }

    pub fn is_match_for(&self, issue: &Issue) -> bool {
        self.issue_type.matches(issue) && self.matches_labels(issue)
    }

    fn matches_labels(&self, issue: &Issue) -> bool {
        issue
            .label_names()
            .any(|name| self.labels.iter().any(|token| name.contains(token.as_str())))
    }
}

/// The sections used when none are configured.
pub fn default_sections() -> Vec<Section> {
    [
        (":star: New Features", &["enhancement"][..]),
        (":lady_beetle: Bug Fixes", &["bug", "regression"][..]),
        (":notebook_with_decorative_cover: Documentation", &["documentation"][..]),
        (":hammer: Dependency Upgrades", &["dependency-upgrade"][..]),
    ]
    .into_iter()
    .map(|(title, labels)| Section {
        title: title.to_string(),
        group: DEFAULT_GROUP.to_string(),
        sort: None,
        issue_type: IssueType::Any,
        labels: labels.iter().map(|l| l.to_string()).collect(),
        format: None,
    })
    .collect()
}

/// Issues that landed in one section, in arrival order until sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct CollatedSection<'a> {
    pub section: &'a Section,
    pub issues: Vec<Issue>,
}

impl CollatedSection<'_> {
    /// Apply the section's own sort, falling back to `default`.
    pub fn sort(&mut self, default: Option<IssueSort>) {
        if let Some(sort) = self.section.sort.or(default) {
            sort.sort(&mut self.issues);
        }
    }
}

/// The ordered section list an issue set is classified against.
#[derive(Debug, Clone)]
pub struct Sections {
    sections: Vec<Section>,
}

impl Sections {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Custom sections replace the defaults, unless `add_defaults` is set, in
    /// which case they follow them. No custom sections means the defaults.
    pub fn with_defaults(custom: Vec<Section>, add_defaults: bool) -> Self {
        if custom.is_empty() {
            return Self::new(default_sections());
        }
        if add_defaults {
            let mut merged = default_sections();
            merged.extend(custom);
            return Self::new(merged);
        }
        Self::new(custom)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Sections an issue belongs to: the first match of each group.
    pub fn sections_for(&self, issue: &Issue) -> Vec<usize> {
        let mut claimed = HashSet::new();
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, section)| section.is_match_for(issue))
            .filter(|(_, section)| claimed.insert(section.group.as_str()))
            .map(|(index, _)| index)
            .collect()
    }

    /// Group issues by section, in configured section order. Sections that
    /// receive no issue are left out, as are issues matching no section.
    pub fn collate(&self, issues: &[Issue]) -> Vec<CollatedSection<'_>> {
        let mut buckets: Vec<Vec<Issue>> = vec![Vec::new(); self.sections.len()];
        for issue in issues {
            for index in self.sections_for(issue) {
                buckets[index].push(issue.clone());
            }
        }
        self.sections
            .iter()
            .zip(buckets)
            .filter(|(_, issues)| !issues.is_empty())
            .map(|(section, issues)| CollatedSection { section, issues })
            .collect()
    }
}
