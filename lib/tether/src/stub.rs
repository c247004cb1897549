//! Answering requests from target sample data instead of the network.

use std::time::Duration;

use tether_core::{RawOutcome, Target};
use tracing::debug;

/// Whether and how a provider answers from [`Target::sample_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StubBehavior {
    /// Use the transport.
    #[default]
    Never,
    /// Answer right away.
    Immediate,
    /// Answer after the given delay.
    Delayed(Duration),
}

impl StubBehavior {
    /// Returns `true` unless requests go to the network.
    #[must_use]
    pub const fn is_stubbed(&self) -> bool {
        !matches!(self, Self::Never)
    }
}

/// Outcome of a stubbed call: status 200 carrying the sample data.
pub(crate) async fn sample_outcome<T: Target + ?Sized>(
    target: &T,
    behavior: StubBehavior,
) -> RawOutcome {
    if let StubBehavior::Delayed(delay) = behavior {
        tokio::time::sleep(delay).await;
    }
    let sample = target.sample_data();
    debug!(endpoint = %target.endpoint_key(), bytes = sample.len(), "stubbed response");
    RawOutcome::delivered(200, sample)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use tether_core::Method;
    use url::Url;

    use super::*;

    struct Sample;

    impl Target for Sample {
        fn base_url(&self) -> Url {
            Url::parse("https://example.com").expect("valid URL")
        }

        fn path(&self) -> String {
            "/sample".to_string()
        }

        fn method(&self) -> Method {
            Method::GET
        }

        fn sample_data(&self) -> Bytes {
            Bytes::from_static(b"[1,2,3]")
        }
    }

    #[test]
    fn stub_behavior_flags() {
        assert!(!StubBehavior::Never.is_stubbed());
        assert!(StubBehavior::Immediate.is_stubbed());
        assert!(StubBehavior::Delayed(Duration::from_millis(5)).is_stubbed());
    }

    #[tokio::test]
    async fn sample_outcome_is_ok_with_sample_data() {
        let outcome = sample_outcome(&Sample, StubBehavior::Immediate).await;
        assert_eq!(outcome, RawOutcome::delivered(200, "[1,2,3]"));
    }

    #[tokio::test(start_paused = true)]
    async fn sample_outcome_waits_for_delay() {
        let start = tokio::time::Instant::now();
        let _ = sample_outcome(&Sample, StubBehavior::Delayed(Duration::from_secs(2))).await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
