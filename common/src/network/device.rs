//! Devices found on the local network.

use std::fmt;
use std::net::Ipv4Addr;

/// Role of a device on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceKind {
    Unknown,
    Router,
    Current,
    Peer,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceKind::Unknown => "unknown",
            DeviceKind::Router => "router",
            DeviceKind::Current => "this device",
            DeviceKind::Peer => "peer",
        };
        f.write_str(name)
    }
}

/// A host identified during one discovery run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    kind: DeviceKind,
    hostname: String,
    local_ip: Ipv4Addr,
    remote_ip: Option<Ipv4Addr>,
}

impl Device {
    /// The machine running the discovery.
    ///
    /// `remote_ip` stays `None` when the external address could not be learned.
    pub fn current(local_ip: Ipv4Addr, hostname: String, remote_ip: Option<Ipv4Addr>) -> Self {
        Self {
            kind: DeviceKind::Current,
            hostname,
            local_ip,
            remote_ip,
        }
    }

    pub fn router(local_ip: Ipv4Addr, hostname: String) -> Self {
        Self {
            kind: DeviceKind::Router,
            hostname,
            local_ip,
            remote_ip: None,
        }
    }

    pub fn peer(local_ip: Ipv4Addr, hostname: String) -> Self {
        Self {
            kind: DeviceKind::Peer,
            hostname,
            local_ip,
            remote_ip: None,
        }
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Empty when reverse lookup failed.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn local_ip(&self) -> Ipv4Addr {
        self.local_ip
    }

    pub fn remote_ip(&self) -> Option<Ipv4Addr> {
        self.remote_ip
    }
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

    #[test]
    fn only_current_device_carries_remote_ip() {
        let local = Ipv4Addr::new(192, 168, 1, 42);
        let remote = Some(Ipv4Addr::new(203, 0, 113, 9));

        let current = Device::current(local, "laptop".to_string(), remote);
        assert_eq!(current.kind(), DeviceKind::Current);
        assert_eq!(current.remote_ip(), remote);

        let router = Device::router(Ipv4Addr::new(192, 168, 1, 1), "gw".to_string());
        assert_eq!(router.kind(), DeviceKind::Router);
        assert_eq!(router.remote_ip(), None);

        let peer = Device::peer(Ipv4Addr::new(192, 168, 1, 7), String::new());
        assert_eq!(peer.kind(), DeviceKind::Peer);
        assert!(peer.hostname().is_empty());
        assert_eq!(peer.remote_ip(), None);
    }
}
