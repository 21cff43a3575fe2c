use std::net::SocketAddr;
use std::time::Duration;

use tracing::trace;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Attempts a full TCP handshake with `addr`.
///
/// `true` only when the connection is established; it is closed right away.
/// Refused, unreachable and timed out all read as `false`, closed and
/// filtered ports are not told apart.
pub async fn is_open(addr: SocketAddr, probe_timeout: Duration) -> bool {
    match timeout(probe_timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            true
        }
        Ok(Err(e)) => {
            trace!(%addr, "connect failed: {e}");
            false
        }
        Err(_elapsed) => {
            trace!(%addr, "connect timed out");
            false
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::net::TcpListener;

    const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

    #[tokio::test]
    async fn is_open_should_find_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(is_open(addr, PROBE_TIMEOUT).await);
    }

    #[tokio::test]
    async fn is_open_should_report_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        assert!(!is_open(addr, PROBE_TIMEOUT).await);
    }

    #[tokio::test]
    #[ignore]
    async fn is_open_should_find_known_open_port() {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)), 443);
        assert!(is_open(addr, PROBE_TIMEOUT).await);
    }

    #[tokio::test]
    #[ignore]
    async fn is_open_should_timeout_on_unreachable_ip() {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 1)), 443);
        assert!(!is_open(addr, Duration::from_millis(100)).await);
    }
}
