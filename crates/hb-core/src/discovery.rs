use serde::{Deserialize, Serialize};

/// Service type advertised by the wireless debug transport for TLS connects.
pub const TLS_CONNECT_SERVICE: &str = "_adb-tls-connect._tcp";

/// Port used when the platform cannot run service discovery.
pub const FALLBACK_PORT: u16 = 5555;

/// A usable debug endpoint reported by a discovery session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscoveryResult {
    pub host: String,
    pub port: u16,
}

impl DiscoveryResult {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Validate a raw candidate port as reported by discovery.
    ///
    /// Only ports in `1..=65535` are usable.
    pub fn from_candidate(host: &str, candidate: u32) -> Option<Self> {
        match u16::try_from(candidate) {
            Ok(port) if port != 0 => Some(Self::new(host, port)),
            _ => None,
        }
    }
}

impl std::fmt::Display for DiscoveryResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
