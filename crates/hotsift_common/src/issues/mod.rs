//! Issue and known-bug taxonomy.
//!
//! Producers build `Finding` values; consumers only rely on the
//! `Categorized` and `Resolvable` capabilities.

pub mod bug;
pub mod category;
pub mod finding;

pub use bug::{Bug, TrackerKind};
pub use category::IssueCategory;
pub use finding::{Categorized, Finding, Issue, Resolvable};

/// Whether `tag` names a category a finding can be reported under
pub fn is_known_category(tag: &str) -> bool {
    IssueCategory::all().iter().any(|c| c.as_str() == tag)
        || TrackerKind::all().iter().any(|t| t.category() == tag)
}
