//! Line checks that raise findings.
//!
//! A check is a pattern plus the finding it raises when at least one line
//! matches: either an issue of some category or a known bug. Checks come
//! from code (`CheckSet::builtin`) or from `[[checks]]` in the config file.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collector::FindingsCollector;
use crate::error::{Result, TriageError};
use crate::issues::{Finding, IssueCategory, TrackerKind};

/// Placeholder replaced by the number of matching lines
pub const COUNT_PLACEHOLDER: &str = "{count}";

/// Check as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDefinition {
    pub name: String,
    pub pattern: String,
    pub message: String,
    /// Issue category tag; mutually exclusive with `tracker`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Tracker tag; requires `bug_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bug_id: Option<String>,
}

/// What a check raises
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Raises {
    Issue(IssueCategory),
    Bug { tracker: TrackerKind, id: String },
}

/// A compiled check
#[derive(Debug, Clone)]
pub struct LineCheck {
    name: String,
    regex: Regex,
    raises: Raises,
    message: String,
}

impl LineCheck {
    pub fn new(name: &str, pattern: &str, raises: Raises, message: &str) -> Result<Self> {
        let check = Self {
            name: name.to_string(),
            regex: Regex::new(pattern)?,
            raises,
            message: message.to_string(),
        };
        // Catches empty messages and tracker ids up front.
        check.finding(1)?;
        Ok(check)
    }

    pub fn from_definition(def: &CheckDefinition) -> Result<Self> {
        let raises = match (&def.category, &def.tracker, &def.bug_id) {
            (Some(category), None, None) => Raises::Issue(category.parse()?),
            (None, Some(tracker), Some(id)) => Raises::Bug {
                tracker: tracker.parse()?,
                id: id.clone(),
            },
            _ => {
                return Err(TriageError::Config(format!(
                    "check '{}' needs either a category or a tracker with bug_id",
                    def.name
                )))
            }
        };
        Self::new(&def.name, &def.pattern, raises, &def.message)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raises(&self) -> &Raises {
        &self.raises
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Finding for `count` matching lines
    pub fn finding(&self, count: usize) -> Result<Finding> {
        let message = self.message.replace(COUNT_PLACEHOLDER, &count.to_string());
        match &self.raises {
            Raises::Issue(category) => Finding::new_issue(*category, message),
            Raises::Bug { tracker, id } => Finding::new_bug(*tracker, id.clone(), message),
        }
    }
}

/// Ordered list of checks run over the same lines
#[derive(Debug, Clone, Default)]
pub struct CheckSet {
    checks: Vec<LineCheck>,
}

impl CheckSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kernel log checks shipped with the crate
    pub fn builtin() -> Result<Self> {
        let mut set = Self::new();
        set.push(LineCheck::new(
            "oom-killer",
            r"Out of memory: Kill(ed)? process \d+",
            Raises::Issue(IssueCategory::MemoryWarning),
            "kernel OOM killer was invoked {count} time(s)",
        )?);
        set.push(LineCheck::new(
            "hung-task",
            r"INFO: task \S+ blocked for more than \d+ seconds",
            Raises::Issue(IssueCategory::KernelWarning),
            "{count} hung task report(s) found in kernel log",
        )?);
        Ok(set)
    }

    pub fn from_definitions(defs: &[CheckDefinition]) -> Result<Self> {
        let checks = defs
            .iter()
            .map(LineCheck::from_definition)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { checks })
    }

    pub fn push(&mut self, check: LineCheck) {
        self.checks.push(check);
    }

    pub fn extend(&mut self, other: CheckSet) {
        self.checks.extend(other.checks);
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check over `lines` in one pass. Each check that matched at
    /// least once adds one finding. Returns the number of findings added.
    pub fn scan<I, S>(&self, lines: I, collector: &mut FindingsCollector) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts = vec![0usize; self.checks.len()];
        for line in lines {
            let line = line.as_ref();
            for (check, count) in self.checks.iter().zip(counts.iter_mut()) {
                if check.is_match(line) {
                    *count += 1;
                }
            }
        }

        let mut raised = 0;
        for (check, count) in self.checks.iter().zip(counts) {
            if count == 0 {
                continue;
            }
            match check.finding(count) {
                Ok(finding) => {
                    collector.add(finding);
                    raised += 1;
                }
                Err(e) => warn!("check {} could not raise a finding: {}", check.name(), e),
            }
        }

        debug!("{} of {} checks raised findings", raised, self.checks.len());
        raised
    }
}
