//! Completion-callback delivery.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tether_core::{Decodable, Result, Target, Transport};
use tokio::task::JoinHandle;
use tracing::trace;

use crate::Provider;

/// Handle to an in-flight callback request.
///
/// Dropping the handle does not cancel the request.
#[derive(Debug)]
pub struct Cancellable {
    handle: JoinHandle<bool>,
    cancelled: Arc<AtomicBool>,
}

impl Cancellable {
    /// Cancel the request. The completion will not be invoked afterwards.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.handle.abort();
    }

    /// Whether [`Cancellable::cancel`] was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Whether the request is over, completed or cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the request to end. Returns `true` if the completion ran.
    pub async fn join(self) -> bool {
        matches!(self.handle.await, Ok(true))
    }
}

impl<T, C> Provider<T, C>
where
    T: Target + 'static,
    C: Transport + Clone + 'static,
{
    /// Dispatch `target` in the background and hand the result to `completion`.
    ///
    /// The completion is invoked exactly once, unless the returned handle is
    /// cancelled first. Must be called from within a tokio runtime.
    pub fn request_callback<R, F>(&self, target: T, completion: F) -> Cancellable
    where
        R: Decodable + Send + 'static,
        F: FnOnce(Result<R>) + Send + 'static,
    {
        let provider = self.clone();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let handle = tokio::spawn(async move {
            let result = provider.request::<R>(&target).await;
            if flag.load(Ordering::SeqCst) {
                trace!("completion skipped, request cancelled");
                return false;
            }
            completion(result);
            true
        });

        Cancellable { handle, cancelled }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert2::{check, let_assert};
    use tether_core::ApiError;
    use tokio::sync::oneshot;

    use crate::StubBehavior;
    use crate::testing::{Endpoint, Routes, User};

    use super::*;

    #[tokio::test]
    async fn completion_receives_classified_result() {
        let provider = Provider::<Endpoint, _>::with_transport(Routes::default());
        let (tx, rx) = oneshot::channel();

        let handle = provider.request_callback(Endpoint("/users/2"), move |result: Result<User>| {
            let _ = tx.send(result);
        });

        let result = rx.await.expect("completion invoked");
        check!(result.map(|user| user.name) == Ok("Grace".to_string()));
        check!(handle.join().await);
    }

    #[tokio::test]
    async fn completion_receives_errors() {
        let provider = Provider::<Endpoint, _>::with_transport(Routes::default());
        let (tx, rx) = oneshot::channel();

        let _handle = provider.request_callback(Endpoint("/bad"), move |result: Result<User>| {
            let _ = tx.send(result);
        });

        let_assert!(Err(ApiError::StatusCode(400)) = rx.await.expect("completion invoked"));
    }

    #[tokio::test]
    async fn cancelled_completion_never_runs() {
        let provider = Provider::<Endpoint, _>::with_transport(Routes::default())
            .stub(StubBehavior::Delayed(Duration::from_millis(200)));
        let invoked = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&invoked);

        let handle = provider.request_callback(Endpoint("/users/1"), move |_: Result<User>| {
            seen.store(true, Ordering::SeqCst);
        });
        handle.cancel();
        check!(handle.is_cancelled());

        tokio::time::sleep(Duration::from_millis(300)).await;
        check!(handle.is_finished());
        check!(!handle.join().await);
        check!(!invoked.load(Ordering::SeqCst));
    }
}
