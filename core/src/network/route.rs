use std::io;
use std::net::{IpAddr, SocketAddr, UdpSocket};

/// Asks the routing table which local address it would use towards `probe`.
///
/// Connecting a UDP socket only selects a route, nothing is transmitted.
pub fn route_source_address(probe: SocketAddr) -> io::Result<IpAddr> {
    let bind_addr = if probe.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
    let socket = UdpSocket::bind(bind_addr)?;
    socket.connect(probe)?;
    let local = socket.local_addr()?.ip();

    if local.is_unspecified() {
        return Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no route towards {probe}"),
        ));
    }
    Ok(local)
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
    fn route_source_address_localhost() {
        let probe = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 53);
        let result = route_source_address(probe);
        assert!(result.is_ok(), "Should be able to resolve route to localhost");
        assert_eq!(result.unwrap(), IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn route_source_address_public_internet() {
        // Fails on machines without a default route, so only the shape is checked.
        let probe = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 80);
        match route_source_address(probe) {
            Ok(src_ip) => {
                assert!(src_ip.is_ipv4());
                assert!(!src_ip.is_loopback());
                assert!(!src_ip.is_unspecified());
            }
            Err(e) => eprintln!("WARNING: Could not resolve route to 8.8.8.8 ({e})"),
        }
    }
}
