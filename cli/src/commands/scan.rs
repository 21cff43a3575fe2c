use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use netbelt_common::config::ScanConfig;
use netbelt_common::network::port::PortRange;
use netbelt_common::network::target::{self, HostList, Target};
use netbelt_common::{success, warn};
use netbelt_core::{
    DiscoveryReport, PortScanner, ResolvedHost, ScanReport, SystemResolver, resolve_hosts,
};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::commands::{Options, devices};
use crate::nprint;
use crate::terminal::input::InputHandle;
use crate::terminal::{colors, format, print, spinner};

pub async fn scan(
    targets: Vec<Target>,
    scan_all: bool,
    cfg: &ScanConfig,
    opts: Options,
    cancel: &CancellationToken,
    input: Option<InputHandle>,
) -> anyhow::Result<()> {
    let show_tip: bool = input.is_some();
    let start_time: Instant = Instant::now();

    let mut list: HostList = if targets.is_empty() {
        HostList::lan()
    } else {
        target::to_host_list(targets).map_err(anyhow::Error::msg)?
    };

    let mut labels: HashMap<String, String> = HashMap::new();
    if list.include_lan {
        print::header("device discovery", opts.quiet);
        let report = devices::discover(cfg, cancel, show_tip)
            .await
            .context("cannot scan the LAN without discovering it first")?;
        if !add_discovered(&report, &mut list, &mut labels) {
            drop(input);
            warn!("Discovery was interrupted, no ports were probed");
            devices::discovery_ends(&report, start_time.elapsed(), opts);
            return Ok(());
        }
    }

    if list.hosts().is_empty() {
        drop(input);
        print::no_results("hosts to scan");
        return Ok(());
    }

    print::header("port scan", opts.quiet);
    let resolver = SystemResolver::new(cfg);
    let hosts: Vec<ResolvedHost> = resolve_hosts(&resolver, list.hosts()).await?;

    let range: PortRange = PortRange::from_scan_all(scan_all);
    let span = spinner::activity(
        &format!("Probing {} ports on {} host(s)", range.port_count(), hosts.len()),
        show_tip,
    );
    let report: ScanReport = PortScanner::new(cfg.clone())
        .with_progress(spinner::count_reporter(&span, "open ports"))
        .scan(&hosts, range, cancel)
        .instrument(span)
        .await;
    drop(input);

    scan_ends(&hosts, &labels, &report, start_time.elapsed(), opts);
    Ok(())
}

/// Queues every discovered device for scanning.
///
/// Returns `false`, leaving `list` untouched, when discovery was cut short:
/// the cancellation that stopped it would stop the scan before its first
/// probe and every host would wrongly read as closed.
fn add_discovered(
    report: &DiscoveryReport,
    list: &mut HostList,
    labels: &mut HashMap<String, String>,
) -> bool {
    if !report.is_complete() {
        return false;
    }
    for device in &report.devices {
        let ip = device.local_ip().to_string();
        if !device.hostname().is_empty() {
            labels.insert(ip.clone(), device.hostname().to_string());
        }
        list.add(ip);
    }
    true
}

fn scan_ends(
    hosts: &[ResolvedHost],
    labels: &HashMap<String, String>,
    report: &ScanReport,
    total_time: Duration,
    opts: Options,
) {
    if opts.quiet > 0 {
        nprint!();
    }

    print::header("open ports", opts.quiet);
    for (idx, host) in hosts.iter().enumerate() {
        let ports: &[u16] = report.open_ports(&host.name).unwrap_or_default();
        match opts.quiet {
            0 | 1 => {
                print::tree_head(idx, &host_title(host, labels));
                print::as_tree_one_level(format::port_details(ports));
                if idx + 1 != hosts.len() {
                    nprint!();
                }
            }
            _ => {
                for port in ports {
                    print::print(&format!("{}:{}", host.name, port));
                }
            }
        }
    }

    print_summary(report, total_time, opts);
}

fn host_title(host: &ResolvedHost, labels: &HashMap<String, String>) -> String {
    let addr: String = host.addr.to_string();
    match labels.get(&host.name) {
        Some(label) => format!("{} ({})", label, host.name),
        None if addr != host.name => format!("{} ({})", host.name, addr),
        None => host.name.clone(),
    }
}

fn print_summary(report: &ScanReport, total_time: Duration, opts: Options) {
    if opts.quiet > 1 {
        return;
    }

    let open: ColoredString = format!("{} open ports", report.total_open()).bold().green();
    let hosts: ColoredString = format!("{} hosts", report.hosts.len()).bold();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let verb: &str = if report.is_complete() {
        "Scan Complete"
    } else {
        "Scan Interrupted"
    };
    let output: String = format!("{verb}: {open} on {hosts} in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();

    match opts.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => {
            nprint!();
            success!("{}", output)
        }
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
