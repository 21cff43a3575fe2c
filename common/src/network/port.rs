use std::ops::RangeInclusive;

pub const WELL_KNOWN_PORTS: RangeInclusive<u16> = 0..=1023;
pub const ALL_PORTS: RangeInclusive<u16> = 0..=u16::MAX;

/// Ports probed on every host of a scan. Fixed for the scan's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortRange {
    /// 0 through 1023.
    #[default]
    WellKnown,
    /// 0 through 65535.
    All,
}

impl PortRange {
    pub fn from_scan_all(scan_all: bool) -> Self {
        if scan_all { PortRange::All } else { PortRange::WellKnown }
    }

    pub fn ports(&self) -> RangeInclusive<u16> {
        match self {
            PortRange::WellKnown => WELL_KNOWN_PORTS,
            PortRange::All => ALL_PORTS,
        }
    }

    /// Number of ports probed per host.
    pub fn port_count(&self) -> usize {
        let ports = self.ports();
        usize::from(*ports.end()) - usize::from(*ports.start()) + 1
    }

    pub fn contains(&self, port: u16) -> bool {
        self.ports().contains(&port)
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
