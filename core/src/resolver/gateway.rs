//! Default-gateway lookup from the platform routing table.

use std::net::{IpAddr, Ipv4Addr};

use netbelt_common::error::ResolveError;

#[cfg(target_os = "linux")]
const PROC_NET_ROUTE: &str = "/proc/net/route";

/// `RTF_GATEWAY` from `<linux/route.h>`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
const RTF_GATEWAY: u32 = 0x0002;

pub fn default_gateway() -> Result<IpAddr, ResolveError> {
    #[cfg(target_os = "linux")]
    {
        let table = std::fs::read_to_string(PROC_NET_ROUTE).map_err(|source| {
            ResolveError::Lookup {
                target: PROC_NET_ROUTE.to_string(),
                source,
            }
        })?;
        parse_proc_net_route(&table)
            .map(IpAddr::V4)
            .ok_or_else(|| ResolveError::NoDefaultRoute(format!("none listed in {PROC_NET_ROUTE}")))
    }

    #[cfg(target_os = "macos")]
    {
        let output = run_route(&["-n", "get", "default"])?;
        parse_route_get(&output)
            .ok_or_else(|| ResolveError::NoDefaultRoute("route -n get default".to_string()))
    }

    #[cfg(target_os = "windows")]
    {
        let output = run_route(&["print", "0.0.0.0"])?;
        parse_route_print(&output)
            .map(IpAddr::V4)
            .ok_or_else(|| ResolveError::NoDefaultRoute("route print 0.0.0.0".to_string()))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        Err(ResolveError::NoDefaultRoute(
            "gateway discovery is not supported on this platform".to_string(),
        ))
    }
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn run_route(args: &[&str]) -> Result<String, ResolveError> {
    let output = std::process::Command::new("route")
        .args(args)
        .output()
        .map_err(|source| ResolveError::Lookup {
            target: "route".to_string(),
            source,
        })?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Reads the default route out of `/proc/net/route`.
///
/// Addresses in that table are the kernel's in-memory (network order) value
/// printed as a host-order hex word, hence the little-endian decode.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_proc_net_route(table: &str) -> Option<Ipv4Addr> {
    table.lines().skip(1).find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (destination, gateway, flags) = (fields.get(1)?, fields.get(2)?, fields.get(3)?);

        if *destination != "00000000" {
            return None;
        }
        let flags = u32::from_str_radix(flags, 16).ok()?;
        if flags & RTF_GATEWAY == 0 {
            return None;
        }

        let raw = u32::from_str_radix(gateway, 16).ok()?;
        let addr = Ipv4Addr::from(raw.to_le_bytes());
        (!addr.is_unspecified()).then_some(addr)
    })
}

/// Parses `route -n get default` (BSD/macOS).
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn parse_route_get(output: &str) -> Option<IpAddr> {
    output.lines().find_map(|line| {
        let value = line.trim().strip_prefix("gateway:")?.trim();
        value.parse::<IpAddr>().ok()
    })
}

/// Parses `route print 0.0.0.0` (Windows).
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn parse_route_print(output: &str) -> Option<Ipv4Addr> {
    output.lines().find_map(|line| {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 || parts[0] != "0.0.0.0" {
            return None;
        }
        let gateway = parts[2].parse::<Ipv4Addr>().ok()?;
        (!gateway.is_unspecified()).then_some(gateway)
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
