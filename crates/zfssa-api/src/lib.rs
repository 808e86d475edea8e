// zfssa-api: Async Rust client for the ZFS Storage Appliance REST API

pub mod client;
pub mod error;
pub mod transport;

pub use client::{ApplianceClient, Credentials, fault_message};
pub use error::Error;
pub use transport::{DEFAULT_TIMEOUT_SECS, TlsPolicy, TransportConfig};
