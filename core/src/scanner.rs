//! # Port Scanning
//!
//! TCP connect scanning across a set of hosts.
//!
//! Every `(host, port)` pair becomes one probe. Probes run through the shared
//! [`fan_out`](crate::fanout::fan_out) pool, so the number of sockets open at
//! any moment is capped by [`ScanConfig::max_in_flight`] no matter how many
//! hosts or ports are requested.

use std::collections::{BTreeMap, BTreeSet};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use netbelt_common::config::ScanConfig;
use netbelt_common::error::ReconError;
use netbelt_common::network::port::PortRange;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ProgressFn;
use crate::fanout::{self, Completion};
use crate::network::tcp;
use crate::resolver::{Resolver, SystemResolver};

/// A scan target after name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHost {
    /// The name the caller asked for, used as the report key.
    pub name: String,
    pub addr: IpAddr,
}

impl ResolvedHost {
    pub fn new(name: impl Into<String>, addr: IpAddr) -> Self {
        Self {
            name: name.into(),
            addr,
        }
    }
}

/// Open ports per host.
///
/// Every requested host has an entry, hosts without open ports map to an
/// empty list. Port lists are ascending and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub hosts: BTreeMap<String, Vec<u16>>,
    pub completion: Completion,
}

impl ScanReport {
    pub fn open_ports(&self, host: &str) -> Option<&[u16]> {
        self.hosts.get(host).map(Vec::as_slice)
    }

    pub fn total_open(&self) -> usize {
        self.hosts.values().map(Vec::len).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.completion.is_complete()
    }
}

pub struct PortScanner {
    config: ScanConfig,
    on_port_found: Option<ProgressFn>,
}

impl PortScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            on_port_found: None,
        }
    }

    /// Called with the running open-port count whenever a probe succeeds.
    pub fn with_progress(mut self, on_port_found: ProgressFn) -> Self {
        self.on_port_found = Some(on_port_found);
        self
    }

    /// Probes `range` on every host.
    pub async fn scan(
        &self,
        hosts: &[ResolvedHost],
        range: PortRange,
        cancel: &CancellationToken,
    ) -> ScanReport {
        info!(
            "Probing {} ports on {} host(s) with a {:?} timeout",
            range.port_count(),
            hosts.len(),
            self.config.probe_timeout
        );
        self.scan_ports(hosts, range.ports(), cancel).await
    }

    /// Probes an explicit port list on every host.
    pub async fn scan_ports(
        &self,
        hosts: &[ResolvedHost],
        ports: impl IntoIterator<Item = u16>,
        cancel: &CancellationToken,
    ) -> ScanReport {
        let ports: Vec<u16> = ports.into_iter().collect();
        let mut open: Vec<BTreeSet<u16>> = vec![BTreeSet::new(); hosts.len()];
        let mut found: usize = 0;

        let probes = hosts.iter().enumerate().flat_map(|(index, host)| {
            ports
                .iter()
                .map(move |port| (index, SocketAddr::new(host.addr, *port)))
        });

        let probe_timeout = self.config.probe_timeout;
        let completion: Completion = fanout::fan_out(
            probes,
            self.config.max_in_flight,
            cancel,
            |(index, addr)| async move { (index, addr, tcp::is_open(addr, probe_timeout).await) },
            |(index, addr, is_open)| {
                if !is_open {
                    return;
                }
                debug!(%addr, "port open");
                if open[index].insert(addr.port()) {
                    found += 1;
                    if let Some(cb) = &self.on_port_found {
                        cb(found);
                    }
                }
            },
        )
        .await;

        if !completion.is_complete() {
            warn!("Scan interrupted, {found} open port(s) recorded before stopping");
        }

        let mut report: BTreeMap<String, Vec<u16>> = BTreeMap::new();
        for (host, ports) in hosts.iter().zip(open) {
            let entry = report.entry(host.name.clone()).or_default();
            entry.extend(ports);
            entry.sort_unstable();
            entry.dedup();
        }

        ScanReport {
            hosts: report,
            completion,
        }
    }
}

/// Turns names into addresses.
///
/// IP literals are taken as they are. Any name that cannot be resolved fails
/// the whole batch before a single probe is sent.
pub async fn resolve_hosts(
    resolver: &dyn Resolver,
    names: &[String],
) -> Result<Vec<ResolvedHost>, ReconError> {
    let mut resolved: Vec<ResolvedHost> = Vec::with_capacity(names.len());
    for name in names {
        let addr: IpAddr = match name.parse::<IpAddr>() {
            Ok(addr) => addr,
            Err(_) => resolver
                .address_for_hostname(name)
                .await
                .map(IpAddr::V4)
                .map_err(|source| ReconError::UnresolvedTarget {
                    host: name.clone(),
                    source,
                })?,
        };
        debug!(host = %name, %addr, "target resolved");
        resolved.push(ResolvedHost::new(name.clone(), addr));
    }
    Ok(resolved)
}

/// Resolves `names` with the system resolver and scans them.
///
/// `scan_all` selects the full port space, otherwise the well-known ports.
pub async fn scan_hosts(
    config: &ScanConfig,
    names: &[String],
    scan_all: bool,
    cancel: &CancellationToken,
) -> Result<ScanReport, ReconError> {
    let resolver: Arc<dyn Resolver> = Arc::new(SystemResolver::new(config));
    let hosts: Vec<ResolvedHost> = resolve_hosts(resolver.as_ref(), names).await?;
    Ok(PortScanner::new(config.clone())
        .scan(&hosts, PortRange::from_scan_all(scan_all), cancel)
        .await)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
