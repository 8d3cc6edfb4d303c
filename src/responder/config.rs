use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use bon::Builder;

use crate::DEFAULT_PORT;

/// How long in-flight calls get to finish once a stop is requested.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(30);

/// Configuration for the responder endpoint.
#[derive(Debug, Clone, Builder)]
pub struct ResponderConfig {
    /// Address to listen on. Port `0` picks a free port; the bound address is
    /// reported by [`ResponderHandle::local_addr`](super::ResponderHandle::local_addr).
    #[builder(default = SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))]
    pub addr: SocketAddr,

    /// Upper bound on the wait for in-flight calls during shutdown.
    #[builder(default = DEFAULT_GRACE_PERIOD)]
    pub grace_period: Duration,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResponderConfig::default();
        assert_eq!(config.addr.port(), DEFAULT_PORT);
        assert!(config.addr.ip().is_unspecified());
        assert_eq!(config.grace_period, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let config = ResponderConfig::builder()
            .addr(addr)
            .grace_period(Duration::from_millis(250))
            .build();
        assert_eq!(config.addr, addr);
        assert_eq!(config.grace_period, Duration::from_millis(250));
    }
}
