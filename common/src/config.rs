use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_IN_FLIGHT: usize = 512;
pub const DEFAULT_ECHO_URL: &str = "http://api.ipify.org";
pub const DEFAULT_EXTERNAL_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_ROUTE_PROBE: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 80);

/// Tunables shared by device discovery and port scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Connect timeout for a single TCP probe.
    pub probe_timeout: Duration,

    /// Upper bound on concurrently running probe tasks.
    ///
    /// Applies to reverse lookups during discovery as well as port probes.
    pub max_in_flight: usize,

    /// Remote address used to ask the routing table which local address
    /// it would pick. No packet is sent to it.
    pub route_probe: SocketAddr,

    /// Whether discovery asks `echo_url` for the externally visible address.
    pub external_lookup: bool,

    /// Plain-HTTP endpoint answering with the caller's IPv4 as text.
    pub echo_url: String,

    pub external_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            route_probe: DEFAULT_ROUTE_PROBE,
            external_lookup: true,
            echo_url: DEFAULT_ECHO_URL.to_string(),
            external_timeout: DEFAULT_EXTERNAL_TIMEOUT,
        }
    }
}

impl ScanConfig {
    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    /// A limit of zero is treated as one.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn without_external_lookup(mut self) -> Self {
        self.external_lookup = false;
        self
    }
}
