//! Parsers for command output captured alongside the logs.
//!
//! # Supported inputs
//!
//! - `ip -d address`: interface blocks, addresses, tunnel endpoints
//! - `dpkg -l`: installed package versions

pub mod dpkg;
pub mod ip_addr;

pub use dpkg::PackageInventory;
pub use ip_addr::{
    find_interface_with_address, parse_interfaces, AddressScanner, InterfaceAddress,
    NetworkInterface, Tunnel,
};
