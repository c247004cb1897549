//! Stream delivery.
//!
//! Two termination modes exist. In *results* mode every outcome becomes an
//! item, errors included, and the stream goes on. In *values* mode the first
//! error is the last item: nothing is pulled from upstream after it, so no
//! further request is issued.

use futures_core::Stream;
use futures_util::{StreamExt, stream};
use tether_core::{ClassifyPolicy, Decodable, RawOutcome, Result, Target, Transport, classify};

use crate::Provider;

/// Classify each outcome, keeping errors as items.
pub fn classify_results<S, R>(outcomes: S, policy: ClassifyPolicy) -> impl Stream<Item = Result<R>>
where
    S: Stream<Item = RawOutcome>,
    R: Decodable,
{
    outcomes.map(move |outcome| classify(&outcome, policy))
}

/// Classify each outcome, ending the stream after the first error.
pub fn classify_values<S, R>(outcomes: S, policy: ClassifyPolicy) -> impl Stream<Item = Result<R>>
where
    S: Stream<Item = RawOutcome>,
    R: Decodable,
{
    until_error(classify_results(outcomes, policy))
}

/// Forward items up to and including the first `Err`, then end.
///
/// The upstream is dropped as soon as the error is yielded.
pub fn until_error<S, R>(results: S) -> impl Stream<Item = Result<R>>
where
    S: Stream<Item = Result<R>>,
{
    stream::unfold(Some(Box::pin(results)), |upstream| async move {
        let mut upstream = upstream?;
        let item = upstream.next().await?;
        let next = if item.is_ok() { Some(upstream) } else { None };
        Some((item, next))
    })
}

impl<T, C> Provider<T, C>
where
    T: Target + 'static,
    C: Transport + Clone + 'static,
{
    /// A single-item stream carrying the result for `target`.
    ///
    /// Nothing is sent until the stream is polled.
    pub fn request_stream<R>(
        &self,
        target: T,
    ) -> impl Stream<Item = Result<R>> + Send + 'static + use<T, C, R>
    where
        R: Decodable + Send + 'static,
    {
        let provider = self.clone();
        stream::once(async move { provider.request::<R>(&target).await })
    }

    /// One result per target, in order, errors included.
    ///
    /// Targets are dispatched one at a time as the stream is polled.
    pub fn results<R, S>(
        &self,
        targets: S,
    ) -> impl Stream<Item = Result<R>> + Send + 'static + use<T, C, R, S>
    where
        R: Decodable + Send + 'static,
        S: Stream<Item = T> + Send + 'static,
    {
        let provider = self.clone();
        targets.then(move |target| {
            let provider = provider.clone();
            async move { provider.request::<R>(&target).await }
        })
    }

    /// One value per target, in order, ending with the first error.
    ///
    /// Targets after a failing one are never dispatched.
    pub fn values<R, S>(
        &self,
        targets: S,
    ) -> impl Stream<Item = Result<R>> + Send + 'static + use<T, C, R, S>
    where
        R: Decodable + Send + 'static,
        S: Stream<Item = T> + Send + 'static,
    {
        until_error(self.results(targets))
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use tether_core::{ApiError, NoContent};

    use super::*;
    use crate::testing::{Endpoint, Routes, User};

    fn names(results: &[Result<User>]) -> Vec<String> {
        results
            .iter()
            .map(|result| match result {
                Ok(user) => user.name.clone(),
                Err(error) => format!("error: {error}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn request_stream_yields_once() {
        let routes = Routes::default();
        let provider = Provider::<Endpoint, _>::with_transport(routes.clone());

        let stream = provider.request_stream::<User>(Endpoint("/users/1"));
        check!(routes.calls() == 0);

        let items: Vec<_> = stream.collect().await;
        check!(names(&items) == ["Ada"]);
        check!(routes.calls() == 1);
    }

    #[tokio::test]
    async fn results_mode_keeps_going_after_errors() {
        let routes = Routes::default();
        let provider = Provider::<Endpoint, _>::with_transport(routes.clone());
        let targets = stream::iter([
            Endpoint("/users/1"),
            Endpoint("/bad"),
            Endpoint("/users/2"),
        ]);

        let items: Vec<Result<User>> = provider.results(targets).collect().await;

        check!(names(&items) == ["Ada", "error: HTTP status error 400", "Grace"]);
        check!(routes.calls() == 3);
    }

    #[tokio::test]
    async fn values_mode_stops_at_first_error() {
        let routes = Routes::default();
        let provider = Provider::<Endpoint, _>::with_transport(routes.clone());
        let targets = stream::iter([
            Endpoint("/users/1"),
            Endpoint("/down"),
            Endpoint("/users/2"),
        ]);

        let items: Vec<Result<User>> = provider.values(targets).collect().await;

        check!(items.len() == 2);
        let_assert!(Some(Err(ApiError::Transport(_))) = items.last());
        check!(routes.calls() == 2);
    }

    #[tokio::test]
    async fn classify_modes_over_outcomes() {
        let outcomes = || {
            stream::iter([
                RawOutcome::delivered(204, ""),
                RawOutcome::without_status(""),
                RawOutcome::delivered(201, ""),
            ])
        };

        let results: Vec<Result<NoContent>> =
            classify_results(outcomes(), ClassifyPolicy::strict()).collect().await;
        check!(results == [Ok(NoContent), Err(ApiError::NoResponse), Ok(NoContent)]);

        let values: Vec<Result<NoContent>> =
            classify_values(outcomes(), ClassifyPolicy::strict()).collect().await;
        check!(values == [Ok(NoContent), Err(ApiError::NoResponse)]);
    }

    #[tokio::test]
    async fn until_error_passes_clean_streams_through() {
        let items: Vec<Result<u8>> = until_error(stream::iter([Ok(1), Ok(2), Ok(3)]))
            .collect()
            .await;
        check!(items == [Ok(1), Ok(2), Ok(3)]);
    }
}
