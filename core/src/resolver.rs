//! Name and route resolution.
//!
//! The engines only talk to the outside world through [`Resolver`], so they
//! can run against the operating system ([`SystemResolver`]) or against a
//! scripted double in tests.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use netbelt_common::config::ScanConfig;
use netbelt_common::error::ResolveError;
use tracing::debug;

use crate::network::route;

mod gateway;

#[async_trait]
pub trait Resolver: Send + Sync {
    /// Reverse DNS. Only the first name is kept, further PTR records are
    /// discarded.
    async fn hostname_for_ip(&self, ip: IpAddr) -> Result<String, ResolveError>;

    /// Forward DNS. The first IPv4 record wins.
    async fn address_for_hostname(&self, host: &str) -> Result<Ipv4Addr, ResolveError>;

    /// Address of the default route's next hop.
    async fn discover_gateway(&self) -> Result<IpAddr, ResolveError>;

    /// Externally visible address of this machine.
    async fn external_address(&self) -> Result<Ipv4Addr, ResolveError>;

    /// Local address the routing table picks towards `probe`.
    fn route_source_address(&self, probe: SocketAddr) -> io::Result<IpAddr>;
}

/// Resolver backed by the operating system's resolver and routing table.
#[derive(Debug, Clone)]
pub struct SystemResolver {
    echo_url: String,
    external_timeout: Duration,
}

impl SystemResolver {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            echo_url: config.echo_url.clone(),
            external_timeout: config.external_timeout,
        }
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

#[async_trait]
impl Resolver for SystemResolver {
    async fn hostname_for_ip(&self, ip: IpAddr) -> Result<String, ResolveError> {
        let target = ip.to_string();
        let lookup = tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&ip))
            .await
            .map_err(|e| ResolveError::Lookup {
                target: target.clone(),
                source: io::Error::other(e),
            })?;

        match lookup {
            Ok(name) => normalize_hostname(&name, &target).ok_or(ResolveError::NotFound(target)),
            Err(source) => Err(ResolveError::Lookup { target, source }),
        }
    }

    async fn address_for_hostname(&self, host: &str) -> Result<Ipv4Addr, ResolveError> {
        let addrs = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|source| ResolveError::Lookup {
                target: host.to_string(),
                source,
            })?;

        first_ipv4(addrs.map(|addr| addr.ip()))
            .ok_or_else(|| ResolveError::NotFound(host.to_string()))
    }

    async fn discover_gateway(&self) -> Result<IpAddr, ResolveError> {
        tokio::task::spawn_blocking(gateway::default_gateway)
            .await
            .map_err(|e| ResolveError::Lookup {
                target: "default route".to_string(),
                source: io::Error::other(e),
            })?
    }

    async fn external_address(&self) -> Result<Ipv4Addr, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(self.external_timeout)
            .build()
            .map_err(|e| ResolveError::External(e.to_string()))?;

        let body = client
            .get(&self.echo_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ResolveError::External(format!("{}: {e}", self.echo_url)))?
            .text()
            .await
            .map_err(|e| ResolveError::External(e.to_string()))?;

        debug!(url = %self.echo_url, "external address endpoint answered");
        parse_echo_body(&body)
    }

    fn route_source_address(&self, probe: SocketAddr) -> io::Result<IpAddr> {
        route::route_source_address(probe)
    }
}

/// Strips the root dot and rejects the numeric form getnameinfo falls back
/// to when no PTR record exists.
fn normalize_hostname(name: &str, numeric: &str) -> Option<String> {
    let name = name.trim().trim_end_matches('.');
    if name.is_empty() || name == numeric || name.parse::<IpAddr>().is_ok() {
        return None;
    }
    Some(name.to_string())
}

fn first_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|addr| match addr {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(_) => None,
    })
}

fn parse_echo_body(body: &str) -> Result<Ipv4Addr, ResolveError> {
    let trimmed = body.trim();
    trimmed
        .parse::<Ipv4Addr>()
        .map_err(|_| ResolveError::External(format!("unexpected response body '{trimmed}'")))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
