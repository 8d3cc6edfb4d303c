use std::time::Duration;

use bon::Builder;

/// Bound on establishing the connection to the responder.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for a [`Caller`](super::Caller).
#[derive(Debug, Clone, Builder)]
pub struct CallerConfig {
    /// Responder address. A bare `host:port` is dialed over plaintext HTTP/2.
    #[builder(into, default = crate::default_target())]
    pub endpoint: String,

    #[builder(default = DEFAULT_CONNECT_TIMEOUT)]
    pub connect_timeout: Duration,

    /// Deadline applied to every call unless one is passed explicitly.
    pub deadline: Option<Duration>,
}

impl CallerConfig {
    /// The endpoint as a URI tonic can dial.
    pub(crate) fn endpoint_uri(&self) -> String {
        if self.endpoint.contains("://") {
            self.endpoint.clone()
        } else {
            format!("http://{}", self.endpoint)
        }
    }
}

impl Default for CallerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CallerConfig::default();
        assert_eq!(config.endpoint, "http://localhost:50051");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert!(config.deadline.is_none());
    }

    #[test]
    fn test_bare_address_gets_scheme() {
        let config = CallerConfig::builder().endpoint("localhost:6000").build();
        assert_eq!(config.endpoint_uri(), "http://localhost:6000");
    }

    #[test]
    fn test_explicit_scheme_is_kept() {
        let config = CallerConfig::builder()
            .endpoint("http://[::1]:50051")
            .deadline(Duration::from_secs(2))
            .build();
        assert_eq!(config.endpoint_uri(), "http://[::1]:50051");
        assert_eq!(config.deadline, Some(Duration::from_secs(2)));
    }
}
