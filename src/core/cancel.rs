//! Cancelable request module.
//!
//! This module provides [`CancelableRequest`], the future type returned by
//! every broker call. On top of the usual resolved/rejected outcomes it
//! supports a third one: cooperative cancellation requested by the caller
//! through [`CancelableRequest::cancel`] or a detached [`CancelHandle`].
//!
//! The producer side drives the request through a [`Settlement`], which
//! exposes resolve/reject hooks, cancel-handler registration and the
//! settlement flags, so the executor can check the request state at any
//! point of its own logic.

use std::{
    future::Future,
    mem,
    panic::{catch_unwind, AssertUnwindSafe},
    pin::Pin,
    sync::{Arc, Mutex},
    task::{Context, Poll, Waker},
};

use futures::future::BoxFuture;
use log::warn;

use crate::core::BrokerError;

type CancelHandler = Box<dyn FnOnce() + Send>;

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
enum State {
    Pending,
    Resolved,
    Rejected,
    Cancelled,
}

struct Shared<T> {
    state: State,
    settled: Option<Result<T, BrokerError>>,
    handlers: Vec<CancelHandler>,
    waker: Option<Waker>,
}

/// Producer-side handle of a [`CancelableRequest`].
///
/// The executor uses it to settle the request and to register cleanup
/// callbacks that run when cancellation is requested before settlement.
pub struct Settlement<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T> Clone for Settlement<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Settlement<T> {
    /// Settle the request with a value.
    ///
    /// A no-op if the request is already resolved, rejected or cancelled;
    /// the first settlement wins.
    pub fn resolve(&self, value: T) {
        self.settle(State::Resolved, Ok(value));
    }

    /// Settle the request with an error.
    ///
    /// A no-op if the request is already resolved, rejected or cancelled.
    pub fn reject(&self, error: BrokerError) {
        self.settle(State::Rejected, Err(error));
    }

    /// Register a handler to run when the request is cancelled.
    ///
    /// Handlers run in registration order. Registering after settlement or
    /// after cancellation is a silent no-op.
    pub fn on_cancel(&self, handler: impl FnOnce() + Send + 'static) {
        let mut shared = self.lock();
        if shared.state != State::Pending {
            return;
        }
        shared.handlers.push(Box::new(handler));
    }

    /// `true` once the request settled with a value.
    pub fn is_resolved(&self) -> bool {
        self.lock().state == State::Resolved
    }

    /// `true` once the request settled with an error.
    pub fn is_rejected(&self) -> bool {
        self.lock().state == State::Rejected
    }

    /// `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.lock().state == State::Cancelled
    }

    fn settle(&self, state: State, result: Result<T, BrokerError>) {
        let mut shared = self.lock();
        if shared.state != State::Pending {
            return;
        }
        shared.state = state;
        shared.settled = Some(result);
        shared.handlers.clear();
        if let Some(waker) = shared.waker.take() {
            waker.wake();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared<T>> {
        self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

trait Cancellation: Send + Sync {
    fn cancel(&self);
    fn is_cancelled(&self) -> bool;
}

impl<T: Send> Cancellation for Mutex<Shared<T>> {
    fn cancel(&self) {
        let mut shared = self.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if shared.state != State::Pending {
            return;
        }
        shared.state = State::Cancelled;
        let handlers = mem::take(&mut shared.handlers);
        drop(shared);

        // Handlers run outside the lock, in registration order. A panicking
        // handler is only logged; the remaining handlers are skipped and the
        // request stays pending forever instead of rejecting.
        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(handler)).is_err() {
                warn!("Cancellation handler panicked");
                return;
            }
        }

        // The waker is taken only after the rejection is written: a poll
        // landing while the handlers ran has stored a fresh waker, and that
        // is the one that must fire.
        let mut shared = self.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        shared.settled = Some(Err(BrokerError::Cancelled("Request aborted".into())));
        let waker = shared.waker.take();
        drop(shared);
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    fn is_cancelled(&self) -> bool {
        let shared = self.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        shared.state == State::Cancelled
    }
}

/// Detached cancellation handle of a [`CancelableRequest`].
///
/// The handle can be cloned and moved to another task while the request
/// itself is being awaited. It stays valid after the request settled;
/// cancelling a settled request is a no-op.
#[derive(Clone)]
pub struct CancelHandle {
    inner: Arc<dyn Cancellation>,
}

impl CancelHandle {
    /// Request cancellation. See [`CancelableRequest::cancel`].
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }
}

/// A future with a third outcome: cancellation.
///
/// Awaiting the request yields `Result<T, BrokerError>`. Cancellation is
/// observed as a rejection with [`BrokerError::Cancelled`] so that chained
/// continuations only need one failure path, while
/// [`CancelableRequest::is_cancelled`] still exposes the true state.
///
/// # Examples
/// ```
/// use idsbroker::core::{BrokerError, CancelableRequest};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let request: CancelableRequest<u32> = CancelableRequest::new(|settlement| async move {
///     settlement.resolve(42);
/// });
///
/// let handle = request.handle();
/// assert_eq!(request.await, Ok(42));
/// // cancelling after settlement is a no-op
/// handle.cancel();
/// assert!(!handle.is_cancelled());
/// # }
/// ```
pub struct CancelableRequest<T> {
    shared: Arc<Mutex<Shared<T>>>,
    driver: Option<BoxFuture<'static, ()>>,
}

impl<T: Send + 'static> CancelableRequest<T> {
    /// Create a new request from an executor.
    ///
    /// The executor closure is invoked immediately, exactly once; the future
    /// it produces is driven while the request is polled. The executor
    /// receives a [`Settlement`] carrying the resolve/reject hooks, the
    /// cancel-handler registration and the settlement flags.
    pub fn new<F, Fut>(executor: F) -> Self
    where
        F: FnOnce(Settlement<T>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let shared = Arc::new(Mutex::new(Shared {
            state: State::Pending,
            settled: None,
            handlers: Vec::new(),
            waker: None,
        }));
        let driver = Box::pin(executor(Settlement {
            shared: shared.clone(),
        }));

        Self {
            shared,
            driver: Some(driver),
        }
    }

    /// Create a request that is already rejected with `error`.
    pub fn rejected(error: BrokerError) -> Self {
        Self::new(move |settlement| async move { settlement.reject(error) })
    }

    /// Request cancellation.
    ///
    /// A no-op once the request settled or was already cancelled. Otherwise
    /// every registered cancel handler runs in registration order, the
    /// handler list is cleared and the request rejects with
    /// [`BrokerError::Cancelled`]. Work already handed to the transport is
    /// not interrupted by this call; its result is discarded.
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    /// `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        Cancellation::is_cancelled(&*self.shared)
    }

    /// A detached [`CancelHandle`] for this request.
    pub fn handle(&self) -> CancelHandle {
        CancelHandle {
            inner: self.shared.clone(),
        }
    }
}

impl<T: Send + 'static> Future for CancelableRequest<T> {
    type Output = Result<T, BrokerError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        {
            let mut shared = this
                .shared
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(result) = shared.settled.take() {
                drop(shared);
                this.driver = None;
                return Poll::Ready(result);
            }
            shared.waker = Some(cx.waker().clone());
            if shared.state == State::Cancelled {
                // A cancel handler panicked before the rejection was written;
                // the request stays pending forever.
                return Poll::Pending;
            }
        }

        if let Some(driver) = this.driver.as_mut() {
            if driver.as_mut().poll(cx).is_ready() {
                this.driver = None;
            }
        }

        // the executor may have settled synchronously during the poll above
        let mut shared = this
            .shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(result) = shared.settled.take() {
            drop(shared);
            this.driver = None;
            return Poll::Ready(result);
        }
        Poll::Pending
    }
}
