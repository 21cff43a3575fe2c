use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Failure to resolve a single entity (an address, a hostname, the gateway).
///
/// Inside the fan-out these never abort an operation; the entity is dropped.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The lookup succeeded but returned zero usable records.
    #[error("no records found for {0}")]
    NotFound(String),

    /// Transport or protocol failure while talking to the resolver.
    #[error("lookup for {target} failed: {source}")]
    Lookup {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// The routing table has no default route.
    #[error("no default route: {0}")]
    NoDefaultRoute(String),

    /// The external "echo my IP" endpoint failed or answered garbage.
    #[error("external address lookup failed: {0}")]
    External(String),
}

/// Fatal errors: the operation cannot establish its starting context.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("could not determine the local address routed towards {probe}: {source}")]
    NoLocalRoute {
        probe: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("{addr} is not an IPv4 address, only IPv4 networks can be enumerated")]
    UnsupportedAddress { addr: IpAddr },

    #[error("could not discover the default gateway: {0}")]
    NoGateway(#[source] ResolveError),

    #[error("failed to identify router {addr}: {source}")]
    RouterIdentity {
        addr: IpAddr,
        #[source]
        source: ResolveError,
    },

    #[error("failed to resolve scan target '{host}': {source}")]
    UnresolvedTarget {
        host: String,
        #[source]
        source: ResolveError,
    },
}
