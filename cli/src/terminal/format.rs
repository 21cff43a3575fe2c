use colored::*;
use netbelt_common::network::device::{Device, DeviceKind};

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

/// Ports per line before the list wraps.
const PORTS_PER_LINE: usize = 8;

pub fn device_title(device: &Device) -> String {
    match device.hostname() {
        "" => "No hostname".to_string(),
        name => name.to_string(),
    }
}

pub fn device_details(device: &Device) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![(
        "IPv4".to_string(),
        device.local_ip().to_string().color(colors::IPV4_ADDR),
    )];

    if let Some(remote) = device.remote_ip() {
        details.push((
            "External".to_string(),
            remote.to_string().color(colors::IPV4_ADDR),
        ));
    }

    details.push(("Role".to_string(), role(device.kind())));
    details
}

fn role(kind: DeviceKind) -> ColoredString {
    match kind {
        DeviceKind::Current => "This machine".color(colors::ACCENT),
        DeviceKind::Router => "Router".color(colors::SECONDARY),
        DeviceKind::Peer => "Peer".color(colors::TEXT_DEFAULT),
        DeviceKind::Unknown => "Unknown".dimmed(),
    }
}

/// Renders a port list, wrapped into rows for the tree view.
pub fn port_rows(ports: &[u16]) -> Vec<String> {
    if ports.is_empty() {
        return vec!["none open".to_string()];
    }
    ports
        .chunks(PORTS_PER_LINE)
        .map(|chunk| {
            chunk
                .iter()
                .map(u16::to_string)
                .collect::<Vec<String>>()
                .join(", ")
        })
        .collect()
}

pub fn port_details(ports: &[u16]) -> Vec<Detail> {
    port_rows(ports)
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let key = if idx == 0 { "Open" } else { "" };
            let value = if ports.is_empty() {
                row.dimmed()
            } else {
                row.color(colors::PORT_OPEN)
            };
            (key.to_string(), value)
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn device_title_falls_back_for_unnamed_device() {
        let unnamed = Device::current(Ipv4Addr::new(10, 0, 0, 2), String::new(), None);
        let named = Device::peer(Ipv4Addr::new(10, 0, 0, 3), "nas.lan".to_string());
        assert_eq!(device_title(&unnamed), "No hostname");
        assert_eq!(device_title(&named), "nas.lan");
    }

    #[test]
    fn device_details_list_external_address_when_known() {
        let local = Ipv4Addr::new(10, 0, 0, 2);
        let with_remote = Device::current(local, "me".to_string(), Some(Ipv4Addr::new(1, 2, 3, 4)));
        let without = Device::current(local, "me".to_string(), None);

        assert_eq!(device_details(&with_remote).len(), 3);
        assert_eq!(device_details(&without).len(), 2);
        assert_eq!(device_details(&with_remote)[1].0, "External");
    }

    #[test]
    fn port_rows_wrap() {
        let ports: Vec<u16> = (1..=10).collect();
        assert_eq!(
            port_rows(&ports),
            vec!["1, 2, 3, 4, 5, 6, 7, 8".to_string(), "9, 10".to_string()]
        );
        assert_eq!(port_rows(&[]), vec!["none open".to_string()]);
    }

    #[test]
    fn port_details_label_first_row_only() {
        let ports: Vec<u16> = (1..=9).collect();
        let details = port_details(&ports);
        assert_eq!(details[0].0, "Open");
        assert_eq!(details[1].0, "");
    }
}
