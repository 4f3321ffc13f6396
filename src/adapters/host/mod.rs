use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

const UNKNOWN_OS: &str = "Unknown OS";

/// Properties published once at startup.
///
/// Address lists are JSON-encoded strings, which is what the backend stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostProperties {
    pub os: String,
    pub ipv4: String,
    pub ipv6: String,
}

impl HostProperties {
    pub fn detect() -> Self {
        let addresses = interface_addresses();

        Self {
            os: os_name_and_version(),
            ipv4: encode(public_ipv4(&addresses)),
            ipv6: encode(public_ipv6(&addresses)),
        }
    }
}

fn encode(addresses: Vec<String>) -> String {
    serde_json::to_string(&addresses).unwrap_or_else(|_| "[]".to_string())
}

/// Human-readable distribution name, e.g. "Ubuntu 22.04.4 LTS"
pub fn os_name_and_version() -> String {
    read_pretty_name(Path::new("/etc/os-release")).unwrap_or_else(|| UNKNOWN_OS.to_string())
}

fn read_pretty_name(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_pretty_name(&content)
}

fn parse_pretty_name(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim().trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

fn interface_addresses() -> Vec<IpAddr> {
    let addrs = match nix::ifaddrs::getifaddrs() {
        Ok(addrs) => addrs,
        Err(e) => {
            warn!(error = %e, "Failed to enumerate interface addresses");
            return Vec::new();
        }
    };

    addrs
        .filter_map(|ifaddr| ifaddr.address)
        .filter_map(|address| {
            if let Some(v4) = address.as_sockaddr_in() {
                Some(IpAddr::V4(v4.ip()))
            } else {
                address.as_sockaddr_in6().map(|v6| IpAddr::V6(v6.ip()))
            }
        })
        .collect()
}

fn is_reportable_v4(ip: &Ipv4Addr) -> bool {
    !ip.is_unspecified() && !ip.is_loopback() && !ip.is_multicast() && !ip.is_link_local()
}

fn is_reportable_v6(ip: &Ipv6Addr) -> bool {
    !ip.is_unspecified() && !ip.is_loopback()
}

fn public_ipv4(addresses: &[IpAddr]) -> Vec<String> {
    addresses
        .iter()
        .filter_map(|ip| match ip {
            IpAddr::V4(v4) if is_reportable_v4(v4) => Some(v4.to_string()),
            _ => None,
        })
        .collect()
}

fn public_ipv6(addresses: &[IpAddr]) -> Vec<String> {
    addresses
        .iter()
        .filter_map(|ip| match ip {
            IpAddr::V6(v6) if is_reportable_v6(v6) => Some(v6.to_string()),
            _ => None,
        })
        .collect()
}
