#![cfg(test)]
use netbelt_common::config::ScanConfig;
use netbelt_common::error::ReconError;
use netbelt_common::network::port::PortRange;
use netbelt_core::{Completion, PortScanner, ResolvedHost, SystemResolver, resolve_hosts, scan_hosts};
use std::net::{IpAddr, Ipv4Addr, TcpListener};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn fast_config() -> ScanConfig {
    ScanConfig::default()
        .with_probe_timeout(Duration::from_millis(500))
        .without_external_lookup()
}

fn released_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// A listener on 127.0.0.1:8080 must show up in a well-known-range-or-all scan
/// of 127.0.0.1 and nowhere else.
#[tokio::test]
async fn scan_finds_listener_on_8080() {
    let Ok(listener) = TcpListener::bind("127.0.0.1:8080") else {
        eprintln!("127.0.0.1:8080 is busy, skipping");
        return;
    };

    let cancel = CancellationToken::new();
    let report = scan_hosts(&fast_config(), &["127.0.0.1".to_string()], true, &cancel)
        .await
        .expect("scan of a literal address cannot fail to resolve");

    assert_eq!(report.completion, Completion::Complete);
    let ports = report.open_ports("127.0.0.1").unwrap();
    assert!(ports.contains(&8080), "8080 missing from {ports:?}");
    assert!(ports.windows(2).all(|pair| pair[0] < pair[1]), "ports not ascending: {ports:?}");
    drop(listener);
}

#[tokio::test]
async fn well_known_scan_ignores_ephemeral_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    assert!(!PortRange::WellKnown.contains(port));

    let hosts = vec![ResolvedHost::new("127.0.0.1", IpAddr::V4(Ipv4Addr::LOCALHOST))];
    let cancel = CancellationToken::new();

    let well_known = PortScanner::new(fast_config())
        .scan(&hosts, PortRange::WellKnown, &cancel)
        .await;
    assert!(!well_known.open_ports("127.0.0.1").unwrap().contains(&port));

    let targeted = PortScanner::new(fast_config())
        .scan_ports(&hosts, [port], &cancel)
        .await;
    assert_eq!(targeted.open_ports("127.0.0.1"), Some(&[port][..]));
}

#[tokio::test]
async fn every_host_is_reported_even_without_open_ports() {
    let closed = released_port();
    let names: Vec<String> = (1..=4).map(|last| format!("127.0.0.{last}")).collect();

    let resolver = SystemResolver::new(&fast_config());
    let hosts = resolve_hosts(&resolver, &names).await.unwrap();
    let cancel = CancellationToken::new();
    let report = PortScanner::new(fast_config())
        .scan_ports(&hosts, [closed], &cancel)
        .await;

    assert_eq!(report.hosts.len(), names.len());
    for name in &names {
        assert_eq!(report.open_ports(name), Some(&[][..]), "{name} should be empty");
    }
    assert_eq!(report.total_open(), 0);
}

#[tokio::test]
async fn scan_is_repeatable() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let hosts = vec![ResolvedHost::new("localhost", IpAddr::V4(Ipv4Addr::LOCALHOST))];
    let scanner = PortScanner::new(fast_config());
    let cancel = CancellationToken::new();

    let first = scanner.scan_ports(&hosts, [port, released_port()], &cancel).await;
    let second = scanner.scan_ports(&hosts, [port, released_port()], &cancel).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn cancelled_scan_returns_promptly_with_partial_result() {
    let hosts = vec![ResolvedHost::new("127.0.0.1", IpAddr::V4(Ipv4Addr::LOCALHOST))];
    let cancel = CancellationToken::new();
    let stopper = cancel.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        stopper.cancel();
    });

    let config = fast_config().with_max_in_flight(4);
    let report = tokio::time::timeout(
        Duration::from_secs(10),
        PortScanner::new(config).scan(&hosts, PortRange::All, &cancel),
    )
    .await
    .expect("cancellation should stop the scan");

    assert_eq!(report.completion, Completion::Interrupted);
    assert!(report.open_ports("127.0.0.1").is_some());
}

#[tokio::test]
async fn unresolvable_target_aborts_before_probing() {
    let cancel = CancellationToken::new();
    let names = vec!["127.0.0.1".to_string(), "no-such-host.invalid".to_string()];
    let result = scan_hosts(&fast_config(), &names, false, &cancel).await;
    assert!(matches!(result, Err(ReconError::UnresolvedTarget { .. })));
}
