//! # Device Discovery
//!
//! Enumerates the operator's /24 and classifies what it finds.
//!
//! The discoverer works in two phases:
//! 1. **Context**: local address, network, gateway and the router's name.
//!    Any failure here is fatal, there is no network to talk about.
//! 2. **Fan-out**: every remaining address of the /24 is reverse-resolved
//!    concurrently. Addresses without a name are dropped silently, most LAN
//!    hosts are unnamed.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use netbelt_common::config::ScanConfig;
use netbelt_common::error::ReconError;
use netbelt_common::network::device::{Device, DeviceKind};
use netbelt_common::network::range;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ProgressFn;
use crate::fanout::{self, Completion};
use crate::resolver::{Resolver, SystemResolver};

/// Result of one discovery run.
///
/// Devices are ordered current, router, then peers by ascending address.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    pub devices: Vec<Device>,
    pub completion: Completion,
}

impl DiscoveryReport {
    pub fn current(&self) -> Option<&Device> {
        self.devices.iter().find(|d| d.kind() == DeviceKind::Current)
    }

    pub fn router(&self) -> Option<&Device> {
        self.devices.iter().find(|d| d.kind() == DeviceKind::Router)
    }

    pub fn peers(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| d.kind() == DeviceKind::Peer)
    }

    /// Every device address, in report order.
    pub fn addresses(&self) -> Vec<Ipv4Addr> {
        self.devices.iter().map(Device::local_ip).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.completion.is_complete()
    }
}

pub struct DeviceDiscoverer {
    resolver: Arc<dyn Resolver>,
    config: ScanConfig,
    on_device_found: Option<ProgressFn>,
}

impl DeviceDiscoverer {
    pub fn new(resolver: Arc<dyn Resolver>, config: ScanConfig) -> Self {
        Self {
            resolver,
            config,
            on_device_found: None,
        }
    }

    /// Called with the running device count whenever a peer is identified.
    pub fn with_progress(mut self, on_device_found: ProgressFn) -> Self {
        self.on_device_found = Some(on_device_found);
        self
    }

    /// Runs one discovery cycle.
    ///
    /// Returns after every reverse lookup finished, or early with
    /// [`Completion::Interrupted`] and the devices found so far when `cancel`
    /// fires.
    pub async fn discover(&self, cancel: &CancellationToken) -> Result<DiscoveryReport, ReconError> {
        let local_ip: Ipv4Addr = self.local_address()?;
        let network = range::lan_network(local_ip);
        info!("Local address is {local_ip}, searching {network}");

        let router: Option<Device> = self.identify_router(local_ip).await?;
        let gateway_ip: Ipv4Addr = router.as_ref().map_or(local_ip, Device::local_ip);

        let mut candidates: Vec<Ipv4Addr> =
            range::exclude_address(range::subnet_addresses(network), gateway_ip);
        candidates.retain(|ip| *ip != local_ip);

        let current: Device = self.identify_current(local_ip).await;

        let mut devices: Vec<Device> = Vec::with_capacity(candidates.len() + 2);
        devices.push(current);
        devices.extend(router);

        let mut seen: HashSet<Ipv4Addr> = devices.iter().map(Device::local_ip).collect();
        let mut peers: Vec<Device> = Vec::new();
        let base_count: usize = devices.len();

        debug!(candidates = candidates.len(), "dispatching reverse lookups");
        let resolver: Arc<dyn Resolver> = self.resolver.clone();
        let completion: Completion = fanout::fan_out(
            candidates,
            self.config.max_in_flight,
            cancel,
            |ip: Ipv4Addr| {
                let resolver = resolver.clone();
                async move { (ip, resolver.hostname_for_ip(IpAddr::V4(ip)).await) }
            },
            |(ip, lookup)| match lookup {
                Ok(hostname) => {
                    if seen.insert(ip) {
                        peers.push(Device::peer(ip, hostname));
                        if let Some(cb) = &self.on_device_found {
                            cb(base_count + peers.len());
                        }
                    }
                }
                Err(e) => debug!(%ip, "dropping candidate: {e}"),
            },
        )
        .await;

        if !completion.is_complete() {
            warn!("Discovery interrupted, {} peers identified before stopping", peers.len());
        }

        peers.sort_by_key(Device::local_ip);
        devices.extend(peers);

        Ok(DiscoveryReport {
            devices,
            completion,
        })
    }

    fn local_address(&self) -> Result<Ipv4Addr, ReconError> {
        let probe = self.config.route_probe;
        let addr = self
            .resolver
            .route_source_address(probe)
            .map_err(|source| ReconError::NoLocalRoute { probe, source })?;

        match addr {
            IpAddr::V4(v4) => Ok(v4),
            IpAddr::V6(_) => Err(ReconError::UnsupportedAddress { addr }),
        }
    }

    /// The router is the gateway, named by reverse DNS.
    ///
    /// `None` when this machine is itself the gateway; it is reported as the
    /// current device instead so no address appears twice.
    async fn identify_router(&self, local_ip: Ipv4Addr) -> Result<Option<Device>, ReconError> {
        let gateway: IpAddr = self
            .resolver
            .discover_gateway()
            .await
            .map_err(ReconError::NoGateway)?;

        let IpAddr::V4(gateway_v4) = gateway else {
            return Err(ReconError::UnsupportedAddress { addr: gateway });
        };

        if gateway_v4 == local_ip {
            warn!("This machine is its own gateway, not listing a separate router");
            return Ok(None);
        }

        let hostname: String = self
            .resolver
            .hostname_for_ip(gateway)
            .await
            .map_err(|source| ReconError::RouterIdentity {
                addr: gateway,
                source,
            })?;

        info!("Router {gateway_v4} answers to {hostname}");
        Ok(Some(Device::router(gateway_v4, hostname)))
    }

    async fn identify_current(&self, local_ip: Ipv4Addr) -> Device {
        let hostname: String = match self.resolver.hostname_for_ip(IpAddr::V4(local_ip)).await {
            Ok(name) => name,
            Err(e) => {
                debug!(%local_ip, "no hostname for this machine: {e}");
                String::new()
            }
        };

        let remote_ip: Option<Ipv4Addr> = if self.config.external_lookup {
            match self.resolver.external_address().await {
                Ok(addr) => Some(addr),
                Err(e) => {
                    warn!("Could not learn the external address: {e}");
                    None
                }
            }
        } else {
            None
        };

        Device::current(local_ip, hostname, remote_ip)
    }
}

/// Discovers devices on the local /24 using the system resolver.
pub async fn discover_devices(
    config: &ScanConfig,
    cancel: &CancellationToken,
) -> Result<DiscoveryReport, ReconError> {
    let resolver: Arc<dyn Resolver> = Arc::new(SystemResolver::new(config));
    DeviceDiscoverer::new(resolver, config.clone())
        .discover(cancel)
        .await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
