//! Externally tracked bugs.
//!
//! Each tracker kind only differs by its base URL. The URL of a bug is the
//! base URL followed by the tracker id, verbatim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};

/// Bug tracking system a known bug lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackerKind {
    Launchpad,
    Storyboard,
    Bugzilla,
    CephTracker,
}

impl TrackerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerKind::Launchpad => "launchpad",
            TrackerKind::Storyboard => "storyboard",
            TrackerKind::Bugzilla => "bugzilla",
            TrackerKind::CephTracker => "ceph-tracker",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            TrackerKind::Launchpad => "https://bugs.launchpad.net/bugs/",
            TrackerKind::Storyboard => "https://storyboard.openstack.org/#!/story/",
            TrackerKind::Bugzilla => "https://bugzilla.redhat.com/show_bug.cgi?id=",
            TrackerKind::CephTracker => "https://tracker.ceph.com/issues/",
        }
    }

    /// Category tag under which bugs of this tracker are reported
    pub fn category(&self) -> &'static str {
        match self {
            TrackerKind::Launchpad => "launchpad-bug",
            TrackerKind::Storyboard => "storyboard-bug",
            TrackerKind::Bugzilla => "bugzilla-bug",
            TrackerKind::CephTracker => "ceph-tracker-bug",
        }
    }

    pub fn all() -> &'static [TrackerKind] {
        &[
            TrackerKind::Launchpad,
            TrackerKind::Storyboard,
            TrackerKind::Bugzilla,
            TrackerKind::CephTracker,
        ]
    }
}

impl fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackerKind {
    type Err = TriageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let tag = s.trim();
        TrackerKind::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| TriageError::UnknownTracker(tag.to_string()))
    }
}

/// A known bug matched on this host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Bug {
    tracker: TrackerKind,
    pub(super) id: String,
    pub(super) message: String,
}

impl Bug {
    /// Build a bug reference. The id is not escaped or validated beyond
    /// being non-empty; whatever is passed ends up in the URL.
    pub fn new(tracker: TrackerKind, id: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let message = message.into();
        if id.trim().is_empty() {
            return Err(TriageError::EmptyTrackerId);
        }
        if message.trim().is_empty() {
            return Err(TriageError::EmptyMessage);
        }
        Ok(Self {
            tracker,
            id,
            message,
        })
    }

    pub fn launchpad(id: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        Self::new(TrackerKind::Launchpad, id, message)
    }

    pub fn storyboard(id: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        Self::new(TrackerKind::Storyboard, id, message)
    }

    pub fn bugzilla(id: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        Self::new(TrackerKind::Bugzilla, id, message)
    }

    pub fn ceph_tracker(id: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        Self::new(TrackerKind::CephTracker, id, message)
    }

    pub fn tracker(&self) -> TrackerKind {
        self.tracker
    }
}
