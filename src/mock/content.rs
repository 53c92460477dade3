//! The content mock: entry point and settlement controls.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::mock::chain::ContentQuery;
use crate::mock::history::EntryHistory;
use crate::mock::queue::{PendingQueue, PendingRequest};
use crate::mock::record::IntoArgs;
use crate::mock::view::ChainView;

const DEFAULT_LABEL: &str = "content";

/// Configuration for a [`ContentMock`].
#[derive(Debug, Clone)]
pub struct MockOptions {
    /// How many times a [`Settled`] future yields to the scheduler before
    /// handing over its [`ChainView`].
    ///
    /// Each yield lets tasks woken by the settlement run one more step. On a
    /// `current_thread` runtime one is enough for a continuation that awaits
    /// the fetch directly. Multi-thread runtimes give no such ordering; use
    /// [`ContentMock::wait_for_request`] there.
    pub settle_yields: usize,
    /// Name included in log events, to tell mock instances apart.
    pub label: Option<String>,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            settle_yields: 1,
            label: None,
        }
    }
}

impl MockOptions {
    /// Create a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many times [`Settled`] yields before completing.
    #[must_use]
    pub fn settle_yields(mut self, yields: usize) -> Self {
        self.settle_yields = yields;
        self
    }

    /// Set the label used in log events.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// State owned by one mock instance and shared with its chains.
pub(crate) struct Shared<T, E> {
    queue: Mutex<PendingQueue<T, E>>,
    /// Tasks waiting for a fetch to be queued.
    waiters: Mutex<Vec<Waker>>,
    history: EntryHistory,
    next_request: AtomicU64,
    options: MockOptions,
}

impl<T, E> Shared<T, E> {
    fn new(options: MockOptions) -> Self {
        Self {
            queue: Mutex::new(PendingQueue::new()),
            waiters: Mutex::new(Vec::new()),
            history: EntryHistory::new(),
            next_request: AtomicU64::new(0),
            options,
        }
    }

    pub(crate) fn label(&self) -> &str {
        self.options.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    pub(crate) fn next_request_id(&self) -> u64 {
        self.next_request.fetch_add(1, Ordering::SeqCst)
    }

    pub(crate) fn enqueue(&self, request: PendingRequest<T, E>) {
        self.queue.lock().enqueue(request);
        let waiters = std::mem::take(&mut *self.waiters.lock());
        for waker in waiters {
            waker.wake();
        }
    }

    fn dequeue_oldest(&self) -> Result<PendingRequest<T, E>> {
        self.queue
            .lock()
            .dequeue_oldest()
            .ok_or(Error::NoPendingRequest)
    }
}

/// A test double for a chainable content-query client.
///
/// Calls to [`content`](Self::content) start a new chain. Each chain's
/// [`fetch`](ContentQuery::fetch) stays pending until the test settles it
/// with [`respond_with`](Self::respond_with) or [`fail_with`](Self::fail_with).
/// Requests are settled strictly in the order they were fetched.
///
/// Cloning a `ContentMock` yields another handle to the same instance;
/// separately constructed mocks share nothing.
///
/// # Type Parameters
///
/// - `T` - The value a fetch resolves with (defaults to [`serde_json::Value`])
/// - `E` - The reason a fetch rejects with (defaults to [`serde_json::Value`])
///
/// # Example
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use mock_content::mock::ContentMock;
/// use serde_json::json;
///
/// let mock = ContentMock::new();
///
/// let res = mock.content(("blog",)).sort_by(("id",)).fetch();
/// assert!(mock.was_called_with(&[json!("blog")]));
///
/// let chain = mock.respond_with(json!([{ "id": "test" }])).unwrap().await;
/// assert_eq!(chain.count(), 1);
/// assert_eq!(chain.at(0).unwrap().name(), "sortBy");
///
/// assert_eq!(res.await, Ok(json!([{ "id": "test" }])));
/// # }
/// ```
pub struct ContentMock<T = Value, E = Value> {
    shared: Arc<Shared<T, E>>,
}

impl ContentMock {
    /// Create a mock whose fetches settle with JSON values.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(MockOptions::default())
    }
}

impl<T, E> ContentMock<T, E> {
    /// Create a mock with the given options.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_content::mock::{ContentMock, MockOptions};
    ///
    /// let mock: ContentMock<Vec<String>, String> =
    ///     ContentMock::with_options(MockOptions::new().label("posts"));
    /// assert_eq!(mock.pending_count(), 0);
    /// ```
    #[must_use]
    pub fn with_options(options: MockOptions) -> Self {
        Self {
            shared: Arc::new(Shared::new(options)),
        }
    }

    /// The entry point: record the call and start a new chain.
    pub fn content(&self, args: impl IntoArgs) -> ContentQuery<T, E> {
        let args = args.into_args();
        tracing::trace!(mock = self.shared.label(), ?args, "entry point called");
        self.shared.history.track(args.clone());
        ContentQuery::new(Arc::clone(&self.shared), args)
    }

    /// Resolve the oldest pending fetch with `value`.
    ///
    /// Settlement happens before this returns. The returned future yields to
    /// the scheduler (see [`MockOptions::settle_yields`]) and then delivers
    /// the settled request's chain.
    ///
    /// On a `current_thread` runtime, a task awaiting the settled fetch has
    /// run up to its next suspension point by the time the chain arrives. On
    /// a multi-thread runtime that task may still be running on another
    /// worker; await [`wait_for_request`](Self::wait_for_request) before
    /// settling a fetch it issues next.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPendingRequest`] if no fetch is awaiting settlement.
    pub fn respond_with(&self, value: T) -> Result<Settled> {
        let request = self.shared.dequeue_oldest()?;
        tracing::debug!(
            mock = self.shared.label(),
            request = request.id(),
            "resolving fetch"
        );
        Ok(self.settled(request.resolve(value)))
    }

    /// Reject the oldest pending fetch with `reason`.
    ///
    /// The reason reaches the fetch unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPendingRequest`] if no fetch is awaiting settlement.
    pub fn fail_with(&self, reason: E) -> Result<Settled> {
        let request = self.shared.dequeue_oldest()?;
        tracing::debug!(
            mock = self.shared.label(),
            request = request.id(),
            "rejecting fetch"
        );
        Ok(self.settled(request.reject(reason)))
    }

    fn settled(&self, view: ChainView) -> Settled {
        Settled {
            view: Some(view),
            yields_left: self.shared.options.settle_yields,
        }
    }

    /// Number of fetches awaiting settlement.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.shared.queue.lock().len()
    }

    /// Check if any fetch is awaiting settlement.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.shared.queue.lock().is_empty()
    }

    /// Wait until at least one fetch is awaiting settlement.
    ///
    /// Completes immediately if a fetch is already queued. The entry-point
    /// call behind a queued fetch is always recorded before it completes.
    ///
    /// # Example
    ///
    /// ```rust
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// use mock_content::mock::ContentMock;
    /// use serde_json::json;
    ///
    /// let mock = ContentMock::new();
    /// let client = mock.clone();
    /// let task = tokio::spawn(async move { client.content(("blog",)).fetch().await });
    ///
    /// mock.wait_for_request().await;
    /// assert!(mock.was_called_with(&[json!("blog")]));
    ///
    /// let _chain = mock.respond_with(json!([])).unwrap().await;
    /// assert_eq!(task.await.unwrap(), Ok(json!([])));
    /// # }
    /// ```
    pub fn wait_for_request(&self) -> RequestQueued<'_, T, E> {
        RequestQueued {
            shared: &self.shared,
        }
    }

    /// Get the arguments of every entry-point call, in call order.
    pub fn calls(&self) -> Vec<Vec<Value>> {
        self.shared.history.calls()
    }

    /// Get the number of entry-point calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.shared.history.call_count()
    }

    /// Check if the entry point was called at least once.
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Check if the entry point was called exactly N times.
    #[must_use]
    pub fn was_called_times(&self, n: usize) -> bool {
        self.call_count() == n
    }

    /// Check if any entry-point call received exactly these arguments.
    #[must_use]
    pub fn was_called_with(&self, expected: &[Value]) -> bool {
        self.shared.history.was_called_with(expected)
    }

    /// Get the arguments of the Nth entry-point call (0-indexed).
    pub fn nth_call(&self, n: usize) -> Option<Vec<Value>> {
        self.shared.history.nth_call(n)
    }

    /// Get the arguments of the most recent entry-point call.
    pub fn last_call(&self) -> Option<Vec<Value>> {
        self.shared.history.last_call()
    }

    /// The options this mock was built with.
    #[must_use]
    pub fn options(&self) -> &MockOptions {
        &self.shared.options
    }
}

impl<T, E> Default for ContentMock<T, E> {
    fn default() -> Self {
        Self::with_options(MockOptions::default())
    }
}

impl<T, E> Clone for ContentMock<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E> Debug for ContentMock<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentMock")
            .field("label", &self.shared.label())
            .field("pending", &*self.shared.queue.lock())
            .field("history", &self.shared.history)
            .finish()
    }
}

/// Future returned by [`ContentMock::respond_with`] and
/// [`ContentMock::fail_with`].
///
/// The fetch is already settled; awaiting this yields to the scheduler
/// before the [`ChainView`] is handed over, so on a `current_thread` runtime
/// the settled fetch's continuation runs first.
#[must_use = "the chain view is only available by awaiting"]
#[derive(Debug)]
pub struct Settled {
    view: Option<ChainView>,
    yields_left: usize,
}

impl Future for Settled {
    type Output = ChainView;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.yields_left > 0 {
            self.yields_left -= 1;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        match self.view.take() {
            Some(view) => Poll::Ready(view),
            None => panic!("polled after completion"),
        }
    }
}

/// Future returned by [`ContentMock::wait_for_request`].
#[must_use = "futures do nothing unless awaited"]
pub struct RequestQueued<'a, T, E> {
    shared: &'a Shared<T, E>,
}

impl<T, E> Future for RequestQueued<'_, T, E> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if !self.shared.queue.lock().is_empty() {
            return Poll::Ready(());
        }
        // Register before re-checking so an enqueue in between still wakes us.
        {
            let mut waiters = self.shared.waiters.lock();
            if !waiters.iter().any(|w| w.will_wake(cx.waker())) {
                waiters.push(cx.waker().clone());
            }
        }
        if self.shared.queue.lock().is_empty() {
            Poll::Pending
        } else {
            Poll::Ready(())
        }
    }
}

impl<T, E> Debug for RequestQueued<'_, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestQueued")
            .field("pending", &self.shared.queue.lock().len())
            .finish()
    }
}
