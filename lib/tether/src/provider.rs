//! The provider: one entry point per target family.
//!
//! A [`Provider`] turns a [`Target`] into a [`Request`], dispatches it through
//! a [`Transport`] (or answers from sample data when stubbed) and classifies
//! what came back. The delivery adapters in [`crate::adapters`] all sit on
//! top of [`Provider::send`] and [`Provider::request`].

use std::marker::PhantomData;
use std::time::Duration;

use tether_core::{
    ClassifyPolicy, Decodable, DefaultHeaders, RawOutcome, Request, Result, Target, Transport,
    classify,
};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::gate::ThrottleGate;
use crate::stub::{StubBehavior, sample_outcome};
use crate::transport::HyperTransport;

/// Status-aware HTTP provider for targets of type `T`.
///
/// Cloning is cheap when the transport is: clones share the connection pool
/// and the throttle gate.
///
/// # Example
///
/// ```ignore
/// use tether::{NoContent, Provider};
///
/// let provider = Provider::<GitHub>::new();
/// let user: User = provider.request(&GitHub::User("octocat".into())).await?;
/// let _: NoContent = provider.request(&GitHub::Star("tether".into())).await?;
/// ```
pub struct Provider<T, C = HyperTransport> {
    transport: C,
    config: ProviderConfig,
    gate: Option<ThrottleGate>,
    _target: PhantomData<fn(&T)>,
}

impl<T, C: Clone> Clone for Provider<T, C> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            config: self.config.clone(),
            gate: self.gate.clone(),
            _target: PhantomData,
        }
    }
}

impl<T, C: std::fmt::Debug> std::fmt::Debug for Provider<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("transport", &self.transport)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T> Provider<T> {
    /// Provider over a default [`HyperTransport`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(HyperTransport::new())
    }
}

impl<T> Default for Provider<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Provider<T, C> {
    /// Provider over the given transport with default configuration.
    pub fn with_transport(transport: C) -> Self {
        Self::with_config(transport, ProviderConfig::default())
    }

    /// Provider over the given transport and configuration.
    pub fn with_config(transport: C, config: ProviderConfig) -> Self {
        let gate = config.throttle.and_then(ThrottleGate::new);
        Self {
            transport,
            config,
            gate,
            _target: PhantomData,
        }
    }

    /// Set the policy used by [`Provider::request`].
    #[must_use]
    pub fn policy(mut self, policy: ClassifyPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Replace the default header table.
    #[must_use]
    pub fn default_headers(mut self, headers: DefaultHeaders) -> Self {
        self.config.default_headers = headers;
        self
    }

    /// Space out calls to the same endpoint by at least `interval`.
    ///
    /// A zero interval removes the gate.
    #[must_use]
    pub fn throttle(mut self, interval: Duration) -> Self {
        self.gate = ThrottleGate::new(interval);
        self.config.throttle = self.gate.as_ref().map(ThrottleGate::interval);
        self
    }

    /// Answer from sample data instead of the transport.
    #[must_use]
    pub fn stub(mut self, behavior: StubBehavior) -> Self {
        self.config.stub = behavior;
        self
    }

    /// The provider configuration.
    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &C {
        &self.transport
    }
}

impl<T, C> Provider<T, C>
where
    T: Target,
    C: Transport,
{
    /// Dispatch `target` and return what happened, unclassified.
    ///
    /// Request construction failures come back as
    /// [`RawOutcome::Failure`] without touching the network.
    pub async fn send(&self, target: &T) -> RawOutcome {
        let request = match Request::from_target(target, &self.config.default_headers) {
            Ok(request) => request,
            Err(error) => {
                debug!(error = %error, "request construction failed");
                return RawOutcome::failure(error);
            }
        };

        if let Some(gate) = &self.gate {
            gate.wait(&target.endpoint_key()).await;
        }

        if self.config.stub.is_stubbed() {
            return sample_outcome(target, self.config.stub).await;
        }

        self.transport.execute(request).await.into()
    }

    /// Dispatch `target` and classify the outcome with the provider policy.
    pub async fn request<R: Decodable>(&self, target: &T) -> Result<R> {
        self.request_with(target, self.config.policy).await
    }

    /// Dispatch `target` and classify the outcome with `policy`.
    pub async fn request_with<R: Decodable>(
        &self,
        target: &T,
        policy: ClassifyPolicy,
    ) -> Result<R> {
        let outcome = self.send(target).await;
        classify(&outcome, policy)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use assert2::{check, let_assert};
    use tether_core::{ApiError, NoContent};

    use super::*;
    use crate::testing::{Endpoint, Routes, User};

    fn provider() -> (Provider<Endpoint, Routes>, Routes) {
        let routes = Routes::default();
        (Provider::with_transport(routes.clone()), routes)
    }

    #[tokio::test]
    async fn request_decodes_accepted_body() {
        let (provider, routes) = provider();

        let user: User = provider.request(&Endpoint("/users/1")).await.expect("user");

        check!(user == User { id: 1, name: "Ada".to_string() });
        check!(routes.calls() == 1);
    }

    #[tokio::test]
    async fn request_classifies_errors() {
        let (provider, _) = provider();

        let_assert!(Err(ApiError::StatusCode(400)) = provider.request::<User>(&Endpoint("/bad")).await);
        let_assert!(
            Err(ApiError::CustomServer { detail, code }) =
                provider.request::<User>(&Endpoint("/missing")).await
        );
        check!(detail == "no such user");
        check!(code == "E404");
        let_assert!(Err(ApiError::UnhandledStatusCode(418)) = provider.request::<User>(&Endpoint("/teapot")).await);
        let_assert!(Err(ApiError::Transport(error)) = provider.request::<User>(&Endpoint("/down")).await);
        check!(error.is_connection());
    }

    #[tokio::test]
    async fn request_accepts_no_content() {
        let (provider, _) = provider();
        let result = provider.request::<NoContent>(&Endpoint("/empty")).await;
        check!(result == Ok(NoContent));

        let_assert!(Err(ApiError::EmptyValue) = provider.request::<User>(&Endpoint("/empty")).await);
    }

    #[tokio::test]
    async fn request_with_overrides_policy() {
        let (provider, _) = provider();

        let_assert!(Err(ApiError::StatusCode(500)) = provider.request::<NoContent>(&Endpoint("/boom")).await);
        let_assert!(
            Err(ApiError::Decoding(_)) = provider
                .request_with::<User>(&Endpoint("/boom"), ClassifyPolicy::allow_500())
                .await
        );
        let provider = provider.policy(ClassifyPolicy::allow_500());
        let_assert!(Ok(NoContent) = provider.request::<NoContent>(&Endpoint("/boom")).await);
    }

    #[tokio::test]
    async fn send_returns_raw_outcome() {
        let (provider, _) = provider();

        let outcome = provider.send(&Endpoint("/missing")).await;
        check!(outcome.status() == Some(404));

        let outcome = provider.send(&Endpoint("/down")).await;
        let_assert!(RawOutcome::Failure(_) = outcome);
    }

    #[tokio::test]
    async fn stub_skips_transport() {
        let (provider, routes) = provider();
        let provider = provider.stub(StubBehavior::Immediate);

        let user: User = provider.request(&Endpoint("/down")).await.expect("sample");

        check!(user == User { id: 7, name: "Sample".to_string() });
        check!(routes.calls() == 0);
    }

    #[tokio::test]
    async fn throttle_delays_same_endpoint() {
        let (provider, routes) = provider();
        let provider = provider.throttle(Duration::from_millis(150));
        check!(provider.config().throttle == Some(Duration::from_millis(150)));

        let start = Instant::now();
        let _ = provider.send(&Endpoint("/users/1")).await;
        let _ = provider.send(&Endpoint("/users/1")).await;

        check!(start.elapsed() >= Duration::from_millis(130));
        check!(routes.calls() == 2);
    }

    #[test]
    fn zero_throttle_removes_gate() {
        let (provider, _) = provider();
        let provider = provider.throttle(Duration::ZERO);
        check!(provider.config().throttle.is_none());
    }
}
