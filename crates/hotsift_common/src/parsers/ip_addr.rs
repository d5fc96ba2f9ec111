//! Parser for `ip -d address` output.
//!
//! Lines are classified one at a time and fed to a small state machine:
//! `SeekingBlock` until an interface header, `InBlock` while collecting that
//! interface's addresses and tunnel details, `Done` once a lookup is
//! satisfied. No line ever looks back at earlier lines.

use serde::{Deserialize, Serialize};

const TUNNEL_KINDS: &[&str] = &["vxlan", "gre", "gretap", "ip6gre", "geneve", "ipip"];

/// Address assigned to an interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceAddress {
    pub address: String,
    pub prefix_len: u8,
}

/// Tunnel endpoint details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tunnel {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

/// One interface block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    pub addresses: Vec<InterfaceAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tunnel: Option<Tunnel>,
}

impl NetworkInterface {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            addresses: Vec::new(),
            tunnel: None,
        }
    }

    pub fn has_address(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a.address == address)
    }
}

/// What a single line is
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineKind {
    Header(String),
    Address(InterfaceAddress),
    Tunnel(Tunnel),
    Other,
}

fn classify(line: &str) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Other;
    }

    let indented = line.starts_with(char::is_whitespace);
    let mut tokens = line.split_whitespace();
    let first = tokens.next().unwrap_or("");

    if !indented {
        // "2: ens3: <BROADCAST,...>" or "7: gre-tun1@NONE: <...>"
        let is_index = first
            .strip_suffix(':')
            .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false);
        if let (true, Some(name)) = (is_index, tokens.next()) {
            if let Some(name) = name.strip_suffix(':') {
                let name = name.split('@').next().unwrap_or(name);
                return LineKind::Header(name.to_string());
            }
        }
        return LineKind::Other;
    }

    match first {
        "inet" | "inet6" => {
            let Some(cidr) = tokens.next() else {
                return LineKind::Other;
            };
            let (address, prefix) = cidr.split_once('/').unwrap_or((cidr, ""));
            let prefix_len = prefix.parse().unwrap_or(if first == "inet" { 32 } else { 128 });
            LineKind::Address(InterfaceAddress {
                address: address.to_string(),
                prefix_len,
            })
        }
        kind if TUNNEL_KINDS.contains(&kind) => {
            let rest: Vec<&str> = tokens.collect();
            let value_of = |key: &str| {
                rest.windows(2)
                    .find(|w| w[0] == key)
                    .map(|w| w[1].to_string())
            };
            LineKind::Tunnel(Tunnel {
                kind: kind.to_string(),
                id: value_of("id").and_then(|v| v.parse().ok()),
                local: value_of("local"),
                remote: value_of("remote"),
            })
        }
        _ => LineKind::Other,
    }
}

#[derive(Debug)]
enum ScanState {
    SeekingBlock,
    InBlock(NetworkInterface),
    Done,
}

/// Scanner over `ip -d address` lines
#[derive(Debug)]
pub struct AddressScanner<'a> {
    target: Option<&'a str>,
    state: ScanState,
    completed: Vec<NetworkInterface>,
}

impl<'a> AddressScanner<'a> {
    /// Collect every interface
    pub fn all() -> Self {
        Self {
            target: None,
            state: ScanState::SeekingBlock,
            completed: Vec::new(),
        }
    }

    /// Stop at the interface that holds `address`
    pub fn for_address(address: &'a str) -> Self {
        Self {
            target: Some(address),
            ..Self::all()
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, ScanState::Done)
    }

    pub fn feed(&mut self, line: &str) {
        let state = std::mem::replace(&mut self.state, ScanState::Done);
        let next = match (state, classify(line)) {
            (ScanState::Done, _) => ScanState::Done,
            (ScanState::SeekingBlock, LineKind::Header(name)) => {
                ScanState::InBlock(NetworkInterface::new(&name))
            }
            (ScanState::SeekingBlock, _) => ScanState::SeekingBlock,
            (ScanState::InBlock(iface), LineKind::Header(name)) => {
                if self.close_block(iface) {
                    ScanState::Done
                } else {
                    ScanState::InBlock(NetworkInterface::new(&name))
                }
            }
            (ScanState::InBlock(mut iface), LineKind::Address(addr)) => {
                iface.addresses.push(addr);
                ScanState::InBlock(iface)
            }
            (ScanState::InBlock(mut iface), LineKind::Tunnel(tunnel)) => {
                iface.tunnel = Some(tunnel);
                ScanState::InBlock(iface)
            }
            (ScanState::InBlock(iface), LineKind::Other) => ScanState::InBlock(iface),
        };
        self.state = next;
    }

    /// Returns true when the closed block satisfies the lookup
    fn close_block(&mut self, iface: NetworkInterface) -> bool {
        let satisfied = self.target.map(|t| iface.has_address(t)).unwrap_or(false);
        if self.target.is_none() || satisfied {
            self.completed.push(iface);
        }
        satisfied
    }

    pub fn finish(mut self) -> Vec<NetworkInterface> {
        if let ScanState::InBlock(iface) = std::mem::replace(&mut self.state, ScanState::Done) {
            self.close_block(iface);
        }
        self.completed
    }
}

/// Every interface block, in output order
pub fn parse_interfaces<I, S>(lines: I) -> Vec<NetworkInterface>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scanner = AddressScanner::all();
    for line in lines {
        scanner.feed(line.as_ref());
    }
    scanner.finish()
}

/// The interface holding `address`, reading no further than its block
pub fn find_interface_with_address<I, S>(lines: I, address: &str) -> Option<NetworkInterface>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scanner = AddressScanner::for_address(address);
    for line in lines {
        scanner.feed(line.as_ref());
        if scanner.is_done() {
            break;
        }
    }
    scanner.finish().into_iter().next()
}
