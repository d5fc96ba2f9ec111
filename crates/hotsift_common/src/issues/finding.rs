//! Findings and the capabilities the collector works against.

use serde::Serialize;

use super::bug::{Bug, TrackerKind};
use super::category::IssueCategory;
use crate::error::{Result, TriageError};

/// Anything that is reported under a category with a message
pub trait Categorized {
    fn category(&self) -> &'static str;
    fn message(&self) -> &str;
}

/// A finding backed by an external tracker entry
pub trait Resolvable: Categorized {
    fn tracker_id(&self) -> &str;
    fn base_url(&self) -> &'static str;

    fn url(&self) -> String {
        format!("{}{}", self.base_url(), self.tracker_id())
    }
}

/// A detected issue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Issue {
    category: IssueCategory,
    message: String,
}

impl Issue {
    pub fn new(category: IssueCategory, message: impl Into<String>) -> Result<Self> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(TriageError::EmptyMessage);
        }
        Ok(Self { category, message })
    }

    pub fn kind(&self) -> IssueCategory {
        self.category
    }
}

impl Categorized for Issue {
    fn category(&self) -> &'static str {
        self.category.as_str()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

impl Categorized for Bug {
    fn category(&self) -> &'static str {
        self.tracker().category()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

impl Resolvable for Bug {
    fn tracker_id(&self) -> &str {
        &self.id
    }

    fn base_url(&self) -> &'static str {
        self.tracker().base_url()
    }
}

/// Issue or known bug, as handed to the collector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Finding {
    Issue(Issue),
    Bug(Bug),
}

impl Finding {
    pub fn new_issue(category: IssueCategory, message: impl Into<String>) -> Result<Self> {
        Issue::new(category, message).map(Finding::Issue)
    }

    pub fn new_bug(
        tracker: TrackerKind,
        id: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self> {
        Bug::new(tracker, id, message).map(Finding::Bug)
    }

    /// Tracker view of this finding, if it is a bug
    pub fn as_resolvable(&self) -> Option<&dyn Resolvable> {
        match self {
            Finding::Issue(_) => None,
            Finding::Bug(b) => Some(b),
        }
    }

    /// URL of the tracker entry, if any
    pub fn url(&self) -> Option<String> {
        self.as_resolvable().map(|r| r.url())
    }
}

impl Categorized for Finding {
    fn category(&self) -> &'static str {
        match self {
            Finding::Issue(i) => i.category(),
            Finding::Bug(b) => b.category(),
        }
    }

    fn message(&self) -> &str {
        match self {
            Finding::Issue(i) => i.message(),
            Finding::Bug(b) => b.message(),
        }
    }
}

impl From<Issue> for Finding {
    fn from(issue: Issue) -> Self {
        Finding::Issue(issue)
    }
}

impl From<Bug> for Finding {
    fn from(bug: Bug) -> Self {
        Finding::Bug(bug)
    }
}
