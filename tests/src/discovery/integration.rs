#![cfg(test)]
use async_trait::async_trait;
use netbelt_common::config::ScanConfig;
use netbelt_common::error::{ReconError, ResolveError};
use netbelt_common::network::device::DeviceKind;
use netbelt_core::{Completion, DeviceDiscoverer, Resolver, discover_devices};
use std::collections::{HashMap, HashSet};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Resolver with a scripted network: 10.20.30.0/24, gateway .1, this host .50.
struct ScriptedNetwork {
    names: HashMap<Ipv4Addr, String>,
    gateway: Result<Ipv4Addr, ()>,
    lookup_delay: Duration,
}

impl ScriptedNetwork {
    const LOCAL: Ipv4Addr = Ipv4Addr::new(10, 20, 30, 50);

    fn new() -> Self {
        let mut names = HashMap::new();
        names.insert(Ipv4Addr::new(10, 20, 30, 1), "gw.office".to_string());
        names.insert(Self::LOCAL, "workstation.office".to_string());
        for last in [7u8, 12, 99, 200, 254] {
            names.insert(Ipv4Addr::new(10, 20, 30, last), format!("host-{last}.office"));
        }
        Self {
            names,
            gateway: Ok(Ipv4Addr::new(10, 20, 30, 1)),
            lookup_delay: Duration::ZERO,
        }
    }
}

#[async_trait]
impl Resolver for ScriptedNetwork {
    async fn hostname_for_ip(&self, ip: IpAddr) -> Result<String, ResolveError> {
        if !self.lookup_delay.is_zero() {
            tokio::time::sleep(self.lookup_delay).await;
        }
        let IpAddr::V4(v4) = ip else {
            return Err(ResolveError::NotFound(ip.to_string()));
        };
        self.names
            .get(&v4)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(ip.to_string()))
    }

    async fn address_for_hostname(&self, host: &str) -> Result<Ipv4Addr, ResolveError> {
        self.names
            .iter()
            .find(|(_, name)| name.as_str() == host)
            .map(|(ip, _)| *ip)
            .ok_or_else(|| ResolveError::NotFound(host.to_string()))
    }

    async fn discover_gateway(&self) -> Result<IpAddr, ResolveError> {
        self.gateway
            .map(IpAddr::V4)
            .map_err(|_| ResolveError::NoDefaultRoute("scripted".to_string()))
    }

    async fn external_address(&self) -> Result<Ipv4Addr, ResolveError> {
        Ok(Ipv4Addr::new(198, 51, 100, 23))
    }

    fn route_source_address(&self, _probe: SocketAddr) -> io::Result<IpAddr> {
        Ok(IpAddr::V4(Self::LOCAL))
    }
}

#[tokio::test]
async fn discovery_maps_scripted_network() {
    let cancel = CancellationToken::new();
    let report = DeviceDiscoverer::new(Arc::new(ScriptedNetwork::new()), ScanConfig::default())
        .discover(&cancel)
        .await
        .expect("discovery failed");

    assert!(report.is_complete());
    assert_eq!(report.devices.len(), 7);

    let current: Vec<_> = report
        .devices
        .iter()
        .filter(|device| device.kind() == DeviceKind::Current)
        .collect();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].hostname(), "workstation.office");
    assert_eq!(current[0].remote_ip(), Some(Ipv4Addr::new(198, 51, 100, 23)));

    let router = report.router().expect("router missing");
    assert_eq!(router.hostname(), "gw.office");

    let unique: HashSet<Ipv4Addr> = report.addresses().into_iter().collect();
    assert_eq!(unique.len(), report.devices.len());

    let peers: Vec<u8> = report.peers().map(|d| d.local_ip().octets()[3]).collect();
    assert_eq!(peers, vec![7, 12, 99, 200, 254]);
}

#[tokio::test]
async fn discovery_is_stable_across_runs_and_limits() {
    let cancel = CancellationToken::new();
    let resolver: Arc<dyn Resolver> = Arc::new(ScriptedNetwork::new());

    let wide = DeviceDiscoverer::new(resolver.clone(), ScanConfig::default())
        .discover(&cancel)
        .await
        .unwrap();
    let narrow = DeviceDiscoverer::new(resolver, ScanConfig::default().with_max_in_flight(1))
        .discover(&cancel)
        .await
        .unwrap();

    assert_eq!(wide.devices, narrow.devices);
}

#[tokio::test]
async fn discovery_without_gateway_is_fatal() {
    let mut network = ScriptedNetwork::new();
    network.gateway = Err(());
    let cancel = CancellationToken::new();

    let result = DeviceDiscoverer::new(Arc::new(network), ScanConfig::default())
        .discover(&cancel)
        .await;

    assert!(matches!(result, Err(ReconError::NoGateway(_))));
}

#[tokio::test]
async fn discovery_cancelled_midway_keeps_context_devices() {
    let mut network = ScriptedNetwork::new();
    network.lookup_delay = Duration::from_millis(50);
    let cancel = CancellationToken::new();
    let stopper = cancel.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        stopper.cancel();
    });

    let config = ScanConfig::default().with_max_in_flight(2);
    let report = DeviceDiscoverer::new(Arc::new(network), config)
        .discover(&cancel)
        .await
        .unwrap();

    assert_eq!(report.completion, Completion::Interrupted);
    assert!(report.current().is_some());
    assert!(report.router().is_some());
    assert!(report.peers().count() < 5);
}

/// Runs against the real network of the machine, so it needs a default route.
#[tokio::test]
#[ignore]
async fn discover_devices_on_host_network() {
    let config = ScanConfig::default().without_external_lookup();
    let cancel = CancellationToken::new();

    let report = discover_devices(&config, &cancel)
        .await
        .expect("discovery needs a default route and a named gateway");

    assert!(report.is_complete());
    assert_eq!(report.devices[0].kind(), DeviceKind::Current);
    assert_eq!(report.current().and_then(|d| d.remote_ip()), None);
    let unique: HashSet<Ipv4Addr> = report.addresses().into_iter().collect();
    assert_eq!(unique.len(), report.devices.len());
}
