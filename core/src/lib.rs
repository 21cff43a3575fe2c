//! Discovery and scanning engines.
//!
//! [`discovery`] maps the local /24 into named devices, [`scanner`] probes
//! TCP ports on a set of hosts. Both run their probes through the bounded
//! [`fanout`] pool and talk to DNS and the routing table only via
//! [`resolver::Resolver`].

use std::sync::Arc;

pub mod discovery;
pub mod fanout;
pub mod network;
pub mod resolver;
pub mod scanner;

pub use discovery::{DeviceDiscoverer, DiscoveryReport, discover_devices};
pub use fanout::Completion;
pub use resolver::{Resolver, SystemResolver};
pub use scanner::{PortScanner, ResolvedHost, ScanReport, resolve_hosts, scan_hosts};

/// Progress hook, called with a running count from the aggregating task.
pub type ProgressFn = Arc<dyn Fn(usize) + Send + Sync>;
