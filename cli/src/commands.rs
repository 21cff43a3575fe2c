pub mod devices;
pub mod scan;

use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use netbelt_common::config::{self, ScanConfig};
use netbelt_common::network::target::Target;

#[derive(Parser)]
#[command(name = "netbelt")]
#[command(version, about = "Find devices on your LAN and the services they expose.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Connect timeout per port probe, in milliseconds
    #[arg(long = "timeout", global = true, value_name = "MS", default_value_t = config::DEFAULT_PROBE_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,

    /// Maximum number of probes in flight
    #[arg(long, global = true, value_name = "N", default_value_t = config::DEFAULT_MAX_IN_FLIGHT)]
    pub concurrency: usize,

    /// Do not ask an external service for this machine's public address
    #[arg(long, global = true)]
    pub no_external: bool,

    /// Endpoint that echoes the caller's IPv4 address as plain text
    #[arg(long, global = true, value_name = "URL", default_value = config::DEFAULT_ECHO_URL)]
    pub echo_url: String,

    /// Less output, repeat for results only
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Do not listen for 'q' on the terminal
    #[arg(long, global = true)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the devices on the local network
    #[command(alias = "d")]
    Devices,
    /// Scan TCP ports on one or more hosts (default: every LAN device)
    #[command(alias = "s")]
    Scan {
        /// IPs, hostnames, ranges, CIDR blocks or 'lan', comma separated or repeated
        target: Vec<Target>,
        /// Probe all 65536 ports instead of the well-known ones
        #[arg(short, long)]
        all: bool,
    },
}

/// Presentation options shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub quiet: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn scan_config(&self) -> ScanConfig {
        let mut cfg = ScanConfig::default()
            .with_probe_timeout(Duration::from_millis(self.timeout_ms))
            .with_max_in_flight(self.concurrency);
        cfg.echo_url = self.echo_url.clone();
        if self.no_external {
            cfg = cfg.without_external_lookup();
        }
        cfg
    }

    pub fn options(&self) -> Options {
        Options { quiet: self.quiet }
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
