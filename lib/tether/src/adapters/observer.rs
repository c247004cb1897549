//! Observer delivery.

use std::pin::pin;

use futures_core::Stream;
use futures_util::StreamExt;
use tether_core::{ApiError, Decodable, Result, Target, Transport};
use tokio::task::JoinHandle;
use tracing::trace;

use crate::Provider;

/// Receives the values of a subscription.
///
/// Exactly one terminal event is delivered: [`Observer::on_error`] after the
/// first failure, or [`Observer::on_completed`] once the source is exhausted.
/// Nothing is delivered after it, nor after the subscription is disposed.
pub trait Observer<R>: Send + 'static {
    /// A value arrived.
    fn on_next(&mut self, value: R);

    /// The source failed. Terminal.
    fn on_error(&mut self, error: ApiError);

    /// The source is exhausted. Terminal.
    fn on_completed(&mut self) {}
}

/// Handle to a running subscription.
///
/// Dropping the handle does not dispose the subscription.
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Stop delivering events and stop pulling from the source.
    pub fn dispose(&self) {
        self.handle.abort();
    }

    /// Whether the subscription is over, terminated or disposed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the subscription to end.
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

/// Drive `source` in the background, feeding `observer`.
///
/// Must be called from within a tokio runtime.
pub fn observe<S, R, O>(source: S, mut observer: O) -> Subscription
where
    S: Stream<Item = Result<R>> + Send + 'static,
    R: Send + 'static,
    O: Observer<R>,
{
    let handle = tokio::spawn(async move {
        let mut source = pin!(source);
        while let Some(item) = source.next().await {
            match item {
                Ok(value) => observer.on_next(value),
                Err(error) => {
                    trace!(error = %error, "subscription failed");
                    observer.on_error(error);
                    return;
                }
            }
        }
        observer.on_completed();
    });
    Subscription { handle }
}

impl<T, C> Provider<T, C>
where
    T: Target + 'static,
    C: Transport + Clone + 'static,
{
    /// Dispatch `target` and deliver its result to `observer`.
    ///
    /// A success is delivered as one value followed by completion.
    pub fn subscribe<R, O>(&self, target: T, observer: O) -> Subscription
    where
        R: Decodable + Send + 'static,
        O: Observer<R>,
    {
        observe(self.request_stream::<R>(target), observer)
    }

    /// Dispatch each target in turn, delivering values to `observer` until
    /// the first error.
    pub fn subscribe_each<R, S, O>(&self, targets: S, observer: O) -> Subscription
    where
        R: Decodable + Send + 'static,
        S: Stream<Item = T> + Send + 'static,
        O: Observer<R>,
    {
        observe(self.values::<R, S>(targets), observer)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use assert2::check;
    use futures_util::stream;

    use super::*;
    use crate::StubBehavior;
    use crate::testing::{Endpoint, Routes, User};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Next(String),
        Error(String),
        Completed,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.events.lock().expect("lock").clone()
        }

        fn push(&self, event: Event) {
            self.events.lock().expect("lock").push(event);
        }
    }

    impl Observer<User> for Recorder {
        fn on_next(&mut self, value: User) {
            self.push(Event::Next(value.name));
        }

        fn on_error(&mut self, error: ApiError) {
            self.push(Event::Error(error.to_string()));
        }

        fn on_completed(&mut self) {
            self.push(Event::Completed);
        }
    }

    #[tokio::test]
    async fn success_is_value_then_completion() {
        let provider = Provider::<Endpoint, _>::with_transport(Routes::default());
        let recorder = Recorder::default();

        provider
            .subscribe::<User, _>(Endpoint("/users/1"), recorder.clone())
            .join()
            .await;

        check!(recorder.events() == [Event::Next("Ada".to_string()), Event::Completed]);
    }

    #[tokio::test]
    async fn failure_is_single_error() {
        let provider = Provider::<Endpoint, _>::with_transport(Routes::default());
        let recorder = Recorder::default();

        provider
            .subscribe::<User, _>(Endpoint("/teapot"), recorder.clone())
            .join()
            .await;

        check!(recorder.events() == [Event::Error("unhandled HTTP status code 418".to_string())]);
    }

    #[tokio::test]
    async fn each_stops_at_first_error() {
        let routes = Routes::default();
        let provider = Provider::<Endpoint, _>::with_transport(routes.clone());
        let recorder = Recorder::default();
        let targets = stream::iter([
            Endpoint("/users/2"),
            Endpoint("/bad"),
            Endpoint("/users/1"),
        ]);

        provider
            .subscribe_each::<User, _, _>(targets, recorder.clone())
            .join()
            .await;

        check!(
            recorder.events()
                == [
                    Event::Next("Grace".to_string()),
                    Event::Error("HTTP status error 400".to_string()),
                ]
        );
        check!(routes.calls() == 2);
    }

    #[tokio::test]
    async fn disposed_subscription_delivers_nothing() {
        let provider = Provider::<Endpoint, _>::with_transport(Routes::default())
            .stub(StubBehavior::Delayed(Duration::from_millis(200)));
        let recorder = Recorder::default();

        let subscription = provider.subscribe::<User, _>(Endpoint("/users/1"), recorder.clone());
        subscription.dispose();
        tokio::time::sleep(Duration::from_millis(300)).await;

        check!(subscription.is_finished());
        check!(recorder.events().is_empty());
    }
}
