//! Issue categories.
//!
//! The set is closed: a new kind of issue means a new variant here, never a
//! runtime registration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TriageError;

/// Category of a detected issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    SystemWarning,
    KernelError,
    KernelWarning,
    MemoryWarning,
    NetworkWarning,
    SysctlWarning,
    BcacheWarning,
    CephWarning,
    CephHealthWarning,
    CephOsdError,
    CephCrushError,
    CephDaemonWarning,
    OpenstackWarning,
    OpenstackError,
    #[serde(rename = "neutron-l3ha-warning")]
    NeutronL3haWarning,
    #[serde(rename = "rabbitmq-warning")]
    RabbitmqWarning,
    KubernetesWarning,
    JujuWarning,
    #[serde(rename = "sosreport-warning")]
    SosreportWarning,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::SystemWarning => "system-warning",
            IssueCategory::KernelError => "kernel-error",
            IssueCategory::KernelWarning => "kernel-warning",
            IssueCategory::MemoryWarning => "memory-warning",
            IssueCategory::NetworkWarning => "network-warning",
            IssueCategory::SysctlWarning => "sysctl-warning",
            IssueCategory::BcacheWarning => "bcache-warning",
            IssueCategory::CephWarning => "ceph-warning",
            IssueCategory::CephHealthWarning => "ceph-health-warning",
            IssueCategory::CephOsdError => "ceph-osd-error",
            IssueCategory::CephCrushError => "ceph-crush-error",
            IssueCategory::CephDaemonWarning => "ceph-daemon-warning",
            IssueCategory::OpenstackWarning => "openstack-warning",
            IssueCategory::OpenstackError => "openstack-error",
            IssueCategory::NeutronL3haWarning => "neutron-l3ha-warning",
            IssueCategory::RabbitmqWarning => "rabbitmq-warning",
            IssueCategory::KubernetesWarning => "kubernetes-warning",
            IssueCategory::JujuWarning => "juju-warning",
            IssueCategory::SosreportWarning => "sosreport-warning",
        }
    }

    /// Every category, in declaration order
    pub fn all() -> &'static [IssueCategory] {
        &[
            IssueCategory::SystemWarning,
            IssueCategory::KernelError,
            IssueCategory::KernelWarning,
            IssueCategory::MemoryWarning,
            IssueCategory::NetworkWarning,
            IssueCategory::SysctlWarning,
            IssueCategory::BcacheWarning,
            IssueCategory::CephWarning,
            IssueCategory::CephHealthWarning,
            IssueCategory::CephOsdError,
            IssueCategory::CephCrushError,
            IssueCategory::CephDaemonWarning,
            IssueCategory::OpenstackWarning,
            IssueCategory::OpenstackError,
            IssueCategory::NeutronL3haWarning,
            IssueCategory::RabbitmqWarning,
            IssueCategory::KubernetesWarning,
            IssueCategory::JujuWarning,
            IssueCategory::SosreportWarning,
        ]
    }

    /// Whether this category reports an error rather than a warning
    pub fn is_error(&self) -> bool {
        self.as_str().ends_with("-error")
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueCategory {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        IssueCategory::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == tag)
            .ok_or_else(|| TriageError::UnknownCategory(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for category in IssueCategory::all() {
            let parsed: IssueCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, *category);
        }
    }

    #[test]
    fn test_serde_matches_as_str() {
        for category in IssueCategory::all() {
            let json = serde_json::to_string(category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = "disk-warning".parse::<IssueCategory>().unwrap_err();
        assert!(matches!(err, TriageError::UnknownCategory(ref t) if t == "disk-warning"));
        assert!(err.is_invalid_variant());
    }

    #[test]
    fn test_is_error() {
        assert!(IssueCategory::KernelError.is_error());
        assert!(IssueCategory::CephOsdError.is_error());
        assert!(!IssueCategory::SystemWarning.is_error());
    }
}
