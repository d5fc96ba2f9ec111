//! Findings collector.
//!
//! One collector per analysis run. Producers `add` findings as they detect
//! them; `finalize` groups them by category, folds duplicates and orders the
//! groups by priority for the report writer.

use std::collections::{HashMap, HashSet};

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::error::Result;
use crate::issues::{Categorized, Finding, IssueCategory, TrackerKind};

/// One deduplicated entry of a group
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FindingEntry {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// All findings of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingGroup {
    pub category: String,
    pub priority: Option<u32>,
    pub entries: Vec<FindingEntry>,
}

/// Finalized findings, in report order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingsReport {
    groups: Vec<FindingGroup>,
}

impl FindingsReport {
    pub fn groups(&self) -> &[FindingGroup] {
        &self.groups
    }

    pub fn get(&self, category: &str) -> Option<&FindingGroup> {
        self.groups.iter().find(|g| g.category == category)
    }

    /// Total entries across groups
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }
}

// Serialized as an ordered map so group order survives into the document.
impl Serialize for FindingsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.category, &group.entries)?;
        }
        map.end()
    }
}

/// Accumulates findings for one run
#[derive(Debug, Default)]
pub struct FindingsCollector {
    findings: Vec<Finding>,
    priorities: HashMap<String, u32>,
}

impl FindingsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Category tag -> priority; lower sorts first
    pub fn with_priorities(mut self, priorities: HashMap<String, u32>) -> Self {
        self.priorities = priorities;
        self
    }

    pub fn set_priority(&mut self, category: &str, priority: u32) {
        self.priorities.insert(category.to_string(), priority);
    }

    pub fn add(&mut self, finding: impl Into<Finding>) {
        self.findings.push(finding.into());
    }

    pub fn add_issue(&mut self, category: IssueCategory, message: impl Into<String>) -> Result<()> {
        self.findings.push(Finding::new_issue(category, message)?);
        Ok(())
    }

    pub fn add_bug(
        &mut self,
        tracker: TrackerKind,
        id: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<()> {
        self.findings.push(Finding::new_bug(tracker, id, message)?);
        Ok(())
    }

    /// Raw count, duplicates included
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Group, dedupe and order. `None` if nothing was added.
    ///
    /// Entries fold on (message, url): one message against two tracker ids
    /// stays as two entries.
    pub fn finalize(&self) -> Option<FindingsReport> {
        if self.findings.is_empty() {
            return None;
        }

        let mut groups: Vec<FindingGroup> = Vec::new();
        let mut index: HashMap<&'static str, usize> = HashMap::new();
        // (group slot, message, url) already emitted
        let mut seen: HashSet<(usize, &str, Option<String>)> = HashSet::new();

        for finding in &self.findings {
            let category = finding.category();
            let slot = *index.entry(category).or_insert_with(|| {
                groups.push(FindingGroup {
                    category: category.to_string(),
                    priority: self.priorities.get(category).copied(),
                    entries: Vec::new(),
                });
                groups.len() - 1
            });

            let url = finding.url();
            if seen.insert((slot, finding.message(), url.clone())) {
                groups[slot].entries.push(FindingEntry {
                    message: finding.message().to_string(),
                    url,
                });
            }
        }

        // Stable: equal priorities keep first-insertion order.
        groups.sort_by_key(|g| g.priority.unwrap_or(u32::MAX));

        let report = FindingsReport { groups };
        debug!(
            "finalized {} findings into {} entries across {} categories",
            self.findings.len(),
            report.entry_count(),
            report.groups.len()
        );
        Some(report)
    }
}
