//! Transport and provider configuration.

use std::time::Duration;

use tether_core::{ClassifyPolicy, DefaultHeaders};

use crate::StubBehavior;

// ============================================================================
// Transport
// ============================================================================

/// Configuration for [`crate::HyperTransport`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout duration.
    pub timeout: Duration,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
        }
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Configuration for [`crate::Provider`].
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Status codes treated as success when no policy is given per call.
    pub policy: ClassifyPolicy,
    /// Headers sent with every request.
    pub default_headers: DefaultHeaders,
    /// Minimum interval between two calls to the same endpoint, if any.
    pub throttle: Option<Duration>,
    /// Whether to answer from [`tether_core::Target::sample_data`].
    pub stub: StubBehavior,
}

impl ProviderConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ProviderConfigBuilder {
        ProviderConfigBuilder::default()
    }
}

/// Builder for [`ProviderConfig`].
#[derive(Debug, Clone, Default)]
pub struct ProviderConfigBuilder {
    policy: Option<ClassifyPolicy>,
    default_headers: Option<DefaultHeaders>,
    throttle: Option<Duration>,
    stub: Option<StubBehavior>,
}

impl ProviderConfigBuilder {
    /// Set the classification policy.
    #[must_use]
    pub const fn policy(mut self, policy: ClassifyPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Set the default header table.
    #[must_use]
    pub fn default_headers(mut self, headers: DefaultHeaders) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Set the minimum interval between calls to the same endpoint.
    #[must_use]
    pub const fn throttle(mut self, interval: Duration) -> Self {
        self.throttle = Some(interval);
        self
    }

    /// Set the stub behavior.
    #[must_use]
    pub const fn stub(mut self, stub: StubBehavior) -> Self {
        self.stub = Some(stub);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ProviderConfig {
        let defaults = ProviderConfig::default();
        ProviderConfig {
            policy: self.policy.unwrap_or(defaults.policy),
            default_headers: self.default_headers.unwrap_or(defaults.default_headers),
            throttle: self.throttle.or(defaults.throttle),
            stub: self.stub.unwrap_or(defaults.stub),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_client_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.pool_idle_per_host, 32);
    }

    #[test]
    fn client_builder_overrides() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(90));
    }

    #[test]
    fn default_provider_config() {
        let config = ProviderConfig::default();
        assert_eq!(config.policy, ClassifyPolicy::standard());
        assert_eq!(config.default_headers, DefaultHeaders::standard());
        assert_eq!(config.throttle, None);
        assert_eq!(config.stub, StubBehavior::Never);
    }

    #[test]
    fn provider_builder_overrides() {
        let config = ProviderConfig::builder()
            .policy(ClassifyPolicy::allow_500())
            .throttle(Duration::from_millis(250))
            .stub(StubBehavior::Immediate)
            .default_headers(DefaultHeaders::empty())
            .build();

        assert_eq!(config.policy, ClassifyPolicy::allow_500());
        assert_eq!(config.throttle, Some(Duration::from_millis(250)));
        assert_eq!(config.stub, StubBehavior::Immediate);
        assert!(config.default_headers.is_empty());
    }
}
