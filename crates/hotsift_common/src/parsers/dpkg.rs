//! Package inventory from `dpkg -l` output.
//!
//! Built per run and handed around by value; there is no shared package
//! table.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

/// Installed packages of interest, sorted by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PackageInventory {
    packages: BTreeMap<String, String>,
}

impl PackageInventory {
    /// Parse `dpkg -l` rows. Only rows in state `ii` count. With filters,
    /// a package is kept when its name matches any of them.
    ///
    /// Returns `None` when nothing was kept.
    pub fn from_dpkg_lines<I, S>(lines: I, filters: &[Regex]) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut packages = BTreeMap::new();

        for line in lines {
            let mut fields = line.as_ref().split_whitespace();
            if fields.next() != Some("ii") {
                continue;
            }
            let (Some(name), Some(version)) = (fields.next(), fields.next()) else {
                continue;
            };
            // "libc6:amd64" -> "libc6"
            let name = name.split(':').next().unwrap_or(name);

            if !filters.is_empty() && !filters.iter().any(|f| f.is_match(name)) {
                continue;
            }
            packages.insert(name.to_string(), version.to_string());
        }

        if packages.is_empty() {
            None
        } else {
            Some(Self { packages })
        }
    }

    pub fn version(&self, name: &str) -> Option<&str> {
        self.packages.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.packages.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DPKG_L: &str = "\
Desired=Unknown/Install/Remove/Purge/Hold
| Status=Not/Inst/Conf-files/Unpacked/halF-conf/Half-inst/trig-aWait/Trig-pend
|/ Err?=(none)/Reinst-required (Status,Err: uppercase=bad)
||/ Name                     Version                 Architecture Description
+++-========================-=======================-============-====================
ii  ceph-osd                 17.2.6-0ubuntu0.22.04.1 amd64        OSD server for the ceph storage system
ii  libc6:amd64              2.35-0ubuntu3.1         amd64        GNU C Library: Shared libraries
rc  neutron-common           2:20.3.0-0ubuntu1       all          Neutron is a virtual network service
ii  neutron-openvswitch-agent 2:20.3.0-0ubuntu1      all          Neutron is a virtual network service
ii  python3-neutron          2:20.3.0-0ubuntu1       all          Neutron is a virtual network service
";

    #[test]
    fn test_unfiltered() {
        let inv = PackageInventory::from_dpkg_lines(DPKG_L.lines(), &[]).unwrap();
        assert_eq!(inv.len(), 4);
        assert_eq!(inv.version("libc6"), Some("2.35-0ubuntu3.1"));
        assert!(!inv.contains("neutron-common"));
    }

    #[test]
    fn test_filtered_and_sorted() {
        let filters = [Regex::new(r"^neutron-").unwrap(), Regex::new(r"^ceph").unwrap()];
        let inv = PackageInventory::from_dpkg_lines(DPKG_L.lines(), &filters).unwrap();
        let names: Vec<&str> = inv.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["ceph-osd", "neutron-openvswitch-agent"]);
    }

    #[test]
    fn test_nothing_kept_is_none() {
        let filters = [Regex::new(r"^rabbitmq").unwrap()];
        assert!(PackageInventory::from_dpkg_lines(DPKG_L.lines(), &filters).is_none());
        assert!(PackageInventory::from_dpkg_lines(Vec::<&str>::new(), &[]).is_none());
    }

    #[test]
    fn test_serializes_as_map() {
        let inv = PackageInventory::from_dpkg_lines(DPKG_L.lines(), &[]).unwrap();
        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(json["ceph-osd"], "17.2.6-0ubuntu0.22.04.1");
    }
}
