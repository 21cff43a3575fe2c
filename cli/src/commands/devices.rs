use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::*;
use netbelt_common::config::ScanConfig;
use netbelt_common::network::device::Device;
use netbelt_common::success;
use netbelt_core::{DeviceDiscoverer, DiscoveryReport, Resolver, SystemResolver};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::commands::Options;
use crate::nprint;
use crate::terminal::input::InputHandle;
use crate::terminal::{colors, format, print, spinner};

pub async fn devices(
    cfg: &ScanConfig,
    opts: Options,
    cancel: &CancellationToken,
    input: Option<InputHandle>,
) -> anyhow::Result<()> {
    print::header("device discovery", opts.quiet);

    let start_time: Instant = Instant::now();
    let report: DiscoveryReport = discover(cfg, cancel, input.is_some()).await?;
    drop(input);

    discovery_ends(&report, start_time.elapsed(), opts);
    Ok(())
}

/// Runs discovery behind a spinner.
pub async fn discover(
    cfg: &ScanConfig,
    cancel: &CancellationToken,
    show_tip: bool,
) -> anyhow::Result<DiscoveryReport> {
    let span = spinner::activity("Resolving every address of the local network", show_tip);
    let resolver: Arc<dyn Resolver> = Arc::new(SystemResolver::new(cfg));
    let discoverer = DeviceDiscoverer::new(resolver, cfg.clone())
        .with_progress(spinner::count_reporter(&span, "devices"));

    let report = discoverer.discover(cancel).instrument(span).await?;
    Ok(report)
}

pub(crate) fn discovery_ends(report: &DiscoveryReport, total_time: Duration, opts: Options) {
    if opts.quiet > 0 {
        nprint!();
    }

    print::header("local network", opts.quiet);
    print_devices(&report.devices, opts);
    print_summary(report, total_time, opts);
}

fn print_devices(devices: &[Device], opts: Options) {
    for (idx, device) in devices.iter().enumerate() {
        match opts.quiet {
            0 | 1 => {
                print::tree_head(idx, &format::device_title(device));
                print::as_tree_one_level(format::device_details(device));
                if idx + 1 != devices.len() {
                    nprint!();
                }
            }
            _ => print::print(&format!("{}\t{}", device.local_ip(), device.hostname())),
        }
    }
}

fn print_summary(report: &DiscoveryReport, total_time: Duration, opts: Options) {
    if opts.quiet > 1 {
        return;
    }

    let found: ColoredString = format!("{} devices", report.devices.len()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let verb: &str = if report.is_complete() {
        "Discovery Complete"
    } else {
        "Discovery Interrupted"
    };
    let output: String = format!("{verb}: {found} identified in {total_time}")
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
