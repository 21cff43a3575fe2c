//! # Scan Target Model
//!
//! Defines the possible inputs for a port scan.
//!
//! A target can be:
//! * A single IP address (host).
//! * A hostname, resolved right before probing.
//! * An IPv4 Range (e.g., `192.168.1.1-100`).
//! * A CIDR block (e.g., `192.168.1.0/24`).
//! * The local LAN, whose hosts come from device discovery.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::network::range::{self, Ipv4Range};
use crate::{info, success};

/// Upper bound on the number of addresses a single range or CIDR may expand to.
pub const MAX_RANGE_ADDRESSES: usize = 65_536;

/// Represents a distinct target to be scanned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Every device found by LAN discovery.
    LAN,
    /// Scan a single specific host.
    Host { target_addr: IpAddr },
    /// Scan a host known by name.
    Hostname { name: String },
    /// Scan a range of IPv4 addresses.
    Range { ipv4_range: Ipv4Range },
    /// Holds a list of different targets
    Multi { targets: Vec<Target> },
}

/// The flattened form of one or more targets.
///
/// Hosts keep the operator's spelling (IP literal or hostname) since it is
/// also the key of the scan result. Insertion order is preserved.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostList {
    hosts: Vec<String>,
    seen: HashSet<String>,
    pub include_lan: bool,
}

impl HostList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list that asks for LAN discovery and holds no explicit hosts yet.
    pub fn lan() -> Self {
        Self {
            include_lan: true,
            ..Self::default()
        }
    }

    /// Appends `host` unless it is already listed.
    pub fn add(&mut self, host: String) {
        if self.seen.insert(host.clone()) {
            self.hosts.push(host);
        }
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && !self.include_lan
    }
}

impl FromStr for Target {
    type Err = String;

    /// Parses a string into a `Target`.
    ///
    /// Supported formats:
    /// * **Keyword**: "lan" (case-insensitive).
    /// * **Host**: Single IPv4/IPv6 address (e.g., "192.168.1.5").
    /// * **Range**: "Start-End" (e.g., "192.168.1.1-50", "192.168.1.1-192.168.1.50").
    /// * **CIDR**: "Network/Prefix" (e.g., "192.168.1.0/24").
    /// * **Hostname**: anything else that is a syntactically valid DNS name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        if let Some(target) = parse_keyword(&lower) {
            return Ok(target);
        }

        if s.contains(',') {
            return parse_commas(s);
        }

        if let Some(target) = parse_host(s) {
            return Ok(target);
        }

        if let Some(target) = parse_ip_range(s)? {
            return Ok(target);
        }

        if let Some(target) = parse_cidr_range(s)? {
            return Ok(target);
        }

        if let Some(target) = parse_hostname(s) {
            return Ok(target);
        }

        Err(format!("invalid target: {s}"))
    }
}

fn resolve_target(target: Target, list: &mut HostList) -> Result<(), String> {
    match target {
        Target::LAN => {
            list.include_lan = true;
        }
        Target::Host { target_addr } => {
            list.add(target_addr.to_string());
        }
        Target::Hostname { name } => {
            list.add(name);
        }
        Target::Range { ipv4_range } => {
            if ipv4_range.len() > MAX_RANGE_ADDRESSES {
                return Err(format!(
                    "range {}-{} spans {} addresses, the limit is {MAX_RANGE_ADDRESSES}",
                    ipv4_range.start_addr,
                    ipv4_range.end_addr,
                    ipv4_range.len()
                ));
            }
            info!(
                "Expanding {} to {}",
                ipv4_range.start_addr, ipv4_range.end_addr
            );
            for ip in ipv4_range.to_iter() {
                list.add(ip.to_string());
            }
        }
        Target::Multi { targets } => {
            for target in targets {
                resolve_target(target, list)?;
            }
        }
    }
    Ok(())
}

/// Flattens targets into the host list handed to the scanner.
pub fn to_host_list(targets: Vec<Target>) -> Result<HostList, String> {
    let mut list = HostList::new();

    for target in targets {
        resolve_target(target, &mut list)?;
    }

    let len: usize = list.len();
    if len > 0 {
        let unit: &str = if len == 1 { "target has been" } else { "targets have been" };
        success!("{len} {unit} parsed successfully");
    }

    Ok(list)
}

/// Parses a comma-separated list of targets (e.g., "192.168.1.5, 10.0.0.1-50, lan").
pub fn parse_commas(s: &str) -> Result<Target, String> {
    let mut targets = Vec::new();

    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let target = Target::from_str(part)
            .map_err(|e| format!("Failed to parse target '{part}': {e}"))?;

        targets.push(target);
    }

    Ok(Target::Multi { targets })
}

fn parse_keyword(s_lower: &str) -> Option<Target> {
    match s_lower {
        "lan" => Some(Target::LAN),
        _ => None,
    }
}

fn parse_host(s: &str) -> Option<Target> {
    s.parse::<IpAddr>()
        .ok()
        .map(|target_addr| Target::Host { target_addr })
}

fn looks_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Parses a range string like "1.1.1.1-2.2.2.2" or "1.1.1.1-50".
///
/// Strings whose left side is not dotted-numeric are left for the hostname
/// parser, so names such as `my-host` are not mistaken for ranges.
fn parse_ip_range(s: &str) -> Result<Option<Target>, String> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    if !looks_numeric(start_str) {
        return Ok(None);
    }

    let start_addr = start_str
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("Invalid start IP in range '{start_str}': {e}"))?;

    let end_addr = parse_range_end_addr(end_str, &start_addr, s)?;

    let ipv4_range = Ipv4Range::new(start_addr, end_addr);
    Ok(Some(Target::Range { ipv4_range }))
}

/// Handles abbreviated forms like "192.168.1.1-50" (implies 192.168.1.50)
/// and full forms like "192.168.1.1-192.168.1.255".
fn parse_range_end_addr(
    end_str: &str,
    start_addr: &Ipv4Addr,
    original_s: &str,
) -> Result<Ipv4Addr, String> {
    if let Ok(full_addr) = end_str.parse::<Ipv4Addr>() {
        return Ok(full_addr);
    }

    if end_str.is_empty() {
        return Err(format!("End range cannot be empty: {original_s}"));
    }

    let mut end_octets = start_addr.octets();
    let partial_octets: Vec<u8> = end_str
        .split('.')
        .map(|octet_str| octet_str.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|e| format!("Invalid end range '{end_str}': {e}"))?;

    if partial_octets.len() > 4 {
        return Err(format!("End range has too many octets: {end_str}"));
    }

    let start_index = 4 - partial_octets.len();
    end_octets[start_index..].copy_from_slice(&partial_octets);

    Ok(Ipv4Addr::from(end_octets))
}

/// Parses CIDR notation like "192.168.1.0/24".
fn parse_cidr_range(s: &str) -> Result<Option<Target>, String> {
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Ok(None);
    };

    let ipv4_addr = ip_str
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("Invalid IP in CIDR '{ip_str}': {e}"))?;

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|e| format!("Invalid prefix in CIDR '{prefix_str}': {e}"))?;

    let ipv4_range = range::cidr_range(ipv4_addr, prefix).map_err(|e| e.to_string())?;

    Ok(Some(Target::Range { ipv4_range }))
}

/// Accepts RFC 1123 style names: dot-separated labels of letters, digits and
/// hyphens, no label starting or ending with a hyphen, not all-numeric.
fn parse_hostname(s: &str) -> Option<Target> {
    let name = s.strip_suffix('.').unwrap_or(s);
    if name.is_empty() || name.len() > 253 || looks_numeric(name) {
        return None;
    }

    let valid = name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    valid.then(|| Target::Hostname {
        name: name.to_string(),
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_parse_range_end_addr_helper() {
        let start = Ipv4Addr::new(192, 168, 1, 10);
        let s = "192.168.1.10-255";

        assert_eq!(
            parse_range_end_addr("192.168.1.50", &start, s),
            Ok(Ipv4Addr::new(192, 168, 1, 50))
        );
        assert_eq!(
            parse_range_end_addr("50", &start, s),
            Ok(Ipv4Addr::new(192, 168, 1, 50))
        );
        assert_eq!(
            parse_range_end_addr("2.66", &start, s),
            Ok(Ipv4Addr::new(192, 168, 2, 66))
        );
        assert_eq!(
            parse_range_end_addr("10.2.1", &start, s),
            Ok(Ipv4Addr::new(192, 10, 2, 1))
        );

        // --- Error Cases ---
        assert!(parse_range_end_addr("2.256", &start, "192.168.1.10-2.256").is_err());
        assert!(parse_range_end_addr("1.2.3.4.5", &start, "192.168.1.10-1.2.3.4.5").is_err());
        assert!(parse_range_end_addr("", &start, "192.168.1.10-").is_err());
    }

    #[test]
    fn test_from_str_full_parsing() {
        assert_eq!(Target::from_str("LAN"), Ok(Target::LAN));

        assert!(matches!(
            Target::from_str("1.1.1.1"),
            Ok(Target::Host { .. })
        ));
        assert!(matches!(Target::from_str("::1"), Ok(Target::Host { .. })));

        assert!(matches!(
            Target::from_str("10.0.0.1-10.0.0.255"),
            Ok(Target::Range { .. })
        ));
        assert!(matches!(
            Target::from_str("192.168.1.1-2.255"),
            Ok(Target::Range { .. })
        ));
        assert!(matches!(
            Target::from_str("10.0.0.0/24"),
            Ok(Target::Range { .. })
        ));

        assert!(Target::from_str("10.0.0.1/33").is_err());
        assert!(Target::from_str("10.0.0.256-1.1.1.1").is_err());
        assert!(Target::from_str("not_a_host!").is_err());
    }

    #[test]
    fn hostnames_with_hyphens_are_not_ranges() {
        assert_eq!(
            Target::from_str("my-router.local"),
            Ok(Target::Hostname {
                name: "my-router.local".to_string()
            })
        );
        assert_eq!(
            Target::from_str("example.com."),
            Ok(Target::Hostname {
                name: "example.com".to_string()
            })
        );
        assert!(Target::from_str("-bad.example").is_err());
        assert!(Target::from_str("999.1.2.3").is_err());
    }

    #[test]
    fn comma_lists_flatten_in_order_without_duplicates() {
        let target = Target::from_str("10.0.0.1-3, router.lan, 10.0.0.2, lan").unwrap();
        let list = to_host_list(vec![target]).unwrap();
        assert_eq!(
            list.hosts(),
            vec!["10.0.0.1", "10.0.0.2", "10.0.0.3", "router.lan"]
        );
        assert!(list.include_lan);
    }

    #[test]
    fn slash_16_expands_to_every_address() {
        let target = Target::from_str("10.0.0.0/16").unwrap();
        let list = to_host_list(vec![target]).unwrap();
        assert_eq!(list.len(), MAX_RANGE_ADDRESSES);
        assert_eq!(list.hosts().first().map(String::as_str), Some("10.0.0.0"));
        assert_eq!(list.hosts().last().map(String::as_str), Some("10.0.255.255"));
    }

    #[test]
    fn repeated_ranges_are_listed_once() {
        let targets = vec![
            Target::from_str("10.0.0.0/16").unwrap(),
            Target::from_str("10.0.128.0/17").unwrap(),
        ];
        let list = to_host_list(targets).unwrap();
        assert_eq!(list.len(), MAX_RANGE_ADDRESSES);
    }

    #[test]
    fn lan_list_starts_empty() {
        let list = HostList::lan();
        assert!(list.include_lan);
        assert!(list.hosts().is_empty());
        assert!(!list.is_empty());
    }

    #[test]
    fn oversized_ranges_are_rejected() {
        let target = Target::from_str("10.0.0.0/8").unwrap();
        assert!(to_host_list(vec![target]).is_err());
    }

    #[test]
    fn empty_host_list_without_lan_is_empty() {
        let list = to_host_list(Vec::new()).unwrap();
        assert!(list.is_empty());
    }
}
