//! IPv4 address arithmetic.
//!
//! Everything in here is pure: no I/O, no allocation beyond the returned
//! collections.

use std::net::{IpAddr, Ipv4Addr};

use pnet::ipnetwork::Ipv4Network;

/// Prefix length of the block enumerated during LAN discovery.
pub const LAN_PREFIX: u8 = 24;

/// Largest block [`subnet_addresses`] will materialise.
const MAX_ENUMERATED_PREFIX: u8 = LAN_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    /// Yields every address from start to end inclusive.
    ///
    /// A range whose end lies before its start is empty.
    pub fn to_iter(&self) -> impl Iterator<Item = IpAddr> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(|ip| IpAddr::V4(Ipv4Addr::from(ip)))
    }

    pub fn len(&self) -> usize {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        end.checked_sub(start).map_or(0, |diff| diff as usize + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn cidr_range(ip: Ipv4Addr, prefix: u8) -> anyhow::Result<Ipv4Range> {
    let network = Ipv4Network::new(ip, prefix)?;
    let start = network.network();
    let end = network.broadcast();

    Ok(Ipv4Range::new(start, end))
}

/// Applies `mask` to `ip`.
pub fn network_address(ip: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(ip) & u32::from(mask))
}

/// Builds the netmask for a prefix length, saturating at /32.
pub fn prefix_mask(prefix: u8) -> Ipv4Addr {
    match prefix {
        0 => Ipv4Addr::UNSPECIFIED,
        p if p >= 32 => Ipv4Addr::BROADCAST,
        p => Ipv4Addr::from(u32::MAX << (32 - p)),
    }
}

/// Increments `ip` by one, carrying leftward across octets.
///
/// `255.255.255.255` wraps around to `0.0.0.0`.
pub fn next_address(ip: Ipv4Addr) -> Ipv4Addr {
    let mut octets = ip.octets();
    for octet in octets.iter_mut().rev() {
        let (value, overflow) = octet.overflowing_add(1);
        *octet = value;
        if !overflow {
            break;
        }
    }
    Ipv4Addr::from(octets)
}

/// Enumerates every address of `network`, network and broadcast included,
/// in ascending order.
///
/// Blocks wider than a /24 are narrowed to the /24 around the network's
/// address, so the result never exceeds 256 entries.
pub fn subnet_addresses(network: Ipv4Network) -> Vec<Ipv4Addr> {
    let prefix = network.prefix().max(MAX_ENUMERATED_PREFIX);
    let first = network_address(network.ip(), prefix_mask(prefix));
    let count: usize = 1 << (32 - u32::from(prefix));

    let mut addresses = Vec::with_capacity(count);
    let mut current = first;
    for _ in 0..count {
        addresses.push(current);
        current = next_address(current);
    }
    addresses
}

/// Removes `addr` from an enumerated block, and always drops the block's
/// first (network) and last (broadcast) entries.
pub fn exclude_address(mut candidates: Vec<Ipv4Addr>, addr: Ipv4Addr) -> Vec<Ipv4Addr> {
    if candidates.len() <= 2 {
        return Vec::new();
    }
    candidates.pop();
    candidates.remove(0);
    candidates.retain(|candidate| *candidate != addr);
    candidates
}

/// The /24 that `ip` lives in.
pub fn lan_network(ip: Ipv4Addr) -> Ipv4Network {
    let network = network_address(ip, prefix_mask(LAN_PREFIX));
    // The address is already masked, so this cannot fail for a valid prefix.
    Ipv4Network::new(network, LAN_PREFIX).unwrap_or_else(|_| Ipv4Network::from(network))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
