//! The chain recorder and its deferred fetch.
//!
//! Every call to [`ContentMock::content`](crate::mock::ContentMock::content)
//! yields a fresh [`ContentQuery`]. Modifier methods append a
//! [`CallRecord`] and hand the query back, so calls compose in any order.
//! [`ContentQuery::fetch`] consumes the query, queues it for settlement and
//! returns a [`Fetch`] future.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use serde_json::Value;

use crate::error::Result;
use crate::mock::content::Shared;
use crate::mock::queue::PendingRequest;
use crate::mock::record::{CallRecord, ChainMethod, IntoArgs, Modifier};

/// A chain of query modifiers that has not been fetched yet.
///
/// # Example
///
/// ```rust
/// use mock_content::mock::ContentMock;
/// use mock_content::args;
///
/// let mock = ContentMock::new();
/// let query = mock
///     .content(("blog",))
///     .only(args![["title"]])
///     .sort_by(("id",))
///     .limit((10,));
///
/// assert_eq!(query.len(), 3);
/// let _fetch = query.fetch();
/// assert_eq!(mock.pending_count(), 1);
/// ```
#[must_use = "a query is only queued for settlement once fetched"]
pub struct ContentQuery<T, E> {
    shared: Arc<Shared<T, E>>,
    entry_args: Vec<Value>,
    records: Vec<CallRecord>,
}

impl<T, E> ContentQuery<T, E> {
    pub(crate) fn new(shared: Arc<Shared<T, E>>, entry_args: Vec<Value>) -> Self {
        Self {
            shared,
            entry_args,
            records: Vec::new(),
        }
    }

    /// Record a call to `only`.
    pub fn only(self, args: impl IntoArgs) -> Self {
        self.record(Modifier::Only, args)
    }

    /// Record a call to `without`.
    pub fn without(self, args: impl IntoArgs) -> Self {
        self.record(Modifier::Without, args)
    }

    /// Record a call to `where`.
    pub fn r#where(self, args: impl IntoArgs) -> Self {
        self.record(Modifier::Where, args)
    }

    /// Record a call to `sortBy`.
    pub fn sort_by(self, args: impl IntoArgs) -> Self {
        self.record(Modifier::SortBy, args)
    }

    /// Record a call to `limit`.
    pub fn limit(self, args: impl IntoArgs) -> Self {
        self.record(Modifier::Limit, args)
    }

    /// Record a call to `skip`.
    pub fn skip(self, args: impl IntoArgs) -> Self {
        self.record(Modifier::Skip, args)
    }

    /// Record a call to `search`.
    pub fn search(self, args: impl IntoArgs) -> Self {
        self.record(Modifier::Search, args)
    }

    /// Record a call to `surround`.
    pub fn surround(self, args: impl IntoArgs) -> Self {
        self.record(Modifier::Surround, args)
    }

    /// Record a call to the given modifier.
    pub fn record(mut self, method: Modifier, args: impl IntoArgs) -> Self {
        let args = args.into_args();
        tracing::trace!(
            mock = self.shared.label(),
            %method,
            ?args,
            "recorded chain call"
        );
        self.records.push(CallRecord::new(method, args));
        self
    }

    /// Call a chain method by name.
    ///
    /// Names follow the query client's spelling (`"sortBy"`, `"fetch"`).
    /// Arguments passed to `"fetch"` are not recorded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMethod`](crate::Error::UnknownMethod) if `name`
    /// is not a chain method.
    pub fn invoke(self, name: &str, args: impl IntoArgs) -> Result<Invocation<T, E>> {
        let invocation = match name.parse::<ChainMethod>()? {
            ChainMethod::Modifier(method) => Invocation::Chained(self.record(method, args)),
            ChainMethod::Fetch => Invocation::Fetched(self.fetch()),
        };
        Ok(invocation)
    }

    /// Seal the chain and queue it for settlement.
    ///
    /// The request is queued immediately, before the returned future is
    /// first polled.
    pub fn fetch(self) -> Fetch<T, E> {
        let (settlement, receiver) = oneshot::channel();
        let id = self.shared.next_request_id();
        tracing::debug!(
            mock = self.shared.label(),
            request = id,
            records = self.records.len(),
            "fetch queued"
        );
        let request = PendingRequest::new(id, self.entry_args, self.records, settlement);
        self.shared.enqueue(request);
        Fetch {
            id,
            receiver,
            orphaned: false,
        }
    }

    /// Records made so far.
    #[must_use]
    pub fn records(&self) -> &[CallRecord] {
        &self.records
    }

    /// Number of records made so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no modifier has been called yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Arguments of the entry-point call that started this chain.
    #[must_use]
    pub fn entry_args(&self) -> &[Value] {
        &self.entry_args
    }
}

impl<T, E> Debug for ContentQuery<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentQuery")
            .field("entry_args", &self.entry_args)
            .field("records", &self.records)
            .finish()
    }
}

/// Outcome of [`ContentQuery::invoke`].
#[derive(Debug)]
pub enum Invocation<T, E> {
    /// A modifier was recorded; the chain continues.
    Chained(ContentQuery<T, E>),
    /// `fetch` was called; the chain is sealed.
    Fetched(Fetch<T, E>),
}

impl<T, E> Invocation<T, E> {
    /// The continued chain, if a modifier was invoked.
    #[must_use]
    pub fn into_query(self) -> Option<ContentQuery<T, E>> {
        match self {
            Self::Chained(query) => Some(query),
            Self::Fetched(_) => None,
        }
    }

    /// The pending fetch, if `fetch` was invoked.
    #[must_use]
    pub fn into_fetch(self) -> Option<Fetch<T, E>> {
        match self {
            Self::Chained(_) => None,
            Self::Fetched(fetch) => Some(fetch),
        }
    }
}

/// Future returned by [`ContentQuery::fetch`].
///
/// Completes with `Ok(value)` after
/// [`respond_with`](crate::mock::ContentMock::respond_with) or `Err(reason)`
/// after [`fail_with`](crate::mock::ContentMock::fail_with) settles the
/// matching request. A fetch whose mock is dropped unsettled stays pending.
#[must_use = "dropping a fetch discards the value it is settled with"]
pub struct Fetch<T, E> {
    id: u64,
    receiver: oneshot::Receiver<std::result::Result<T, E>>,
    orphaned: bool,
}

impl<T, E> Fetch<T, E> {
    /// Sequence number of this fetch within its mock.
    #[must_use]
    pub fn request_id(&self) -> u64 {
        self.id
    }
}

impl<T, E> Future for Fetch<T, E> {
    type Output = std::result::Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.orphaned {
            return Poll::Pending;
        }
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(oneshot::Canceled)) => {
                tracing::warn!(request = self.id, "mock dropped with fetch unsettled");
                self.orphaned = true;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T, E> Debug for Fetch<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetch")
            .field("id", &self.id)
            .field("orphaned", &self.orphaned)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mock::ContentMock;
    use crate::{args, assert_settled, assert_unsettled};
    use serde_json::json;

    #[test]
    fn test_modifiers_append_in_order() {
        let mock = ContentMock::new();
        let query = mock
            .content(("blog",))
            .only(())
            .without(())
            .r#where(())
            .sort_by(())
            .limit(())
            .skip(())
            .search(())
            .surround(());

        let names: Vec<_> = query.records().iter().map(CallRecord::name).collect();
        assert_eq!(
            names,
            vec!["only", "without", "where", "sortBy", "limit", "skip", "search", "surround"]
        );
        assert_eq!(query.len(), 8);
    }

    #[test]
    fn test_repeated_modifier_records_separately() {
        let mock = ContentMock::new();
        let query = mock
            .content(("blog",))
            .sort_by(("id",))
            .only(args![["title"]])
            .sort_by(("title",));

        let records = query.records();
        assert_eq!(records.len(), 3);
        assert!(records[0].was_called_with(&[json!("id")]));
        assert!(records[1].was_called_with(&[json!(["title"])]));
        assert!(records[2].was_called_with(&[json!("title")]));
        assert!(records.iter().all(|r| r.call_count() == 1));
    }

    #[test]
    fn test_invoke_by_name() {
        let mock = ContentMock::new();
        let query = mock
            .content(("blog",))
            .invoke("sortBy", ("id",))
            .unwrap()
            .into_query()
            .unwrap();
        assert_eq!(query.records()[0].method(), Modifier::SortBy);

        let fetch = query.invoke("fetch", ()).unwrap().into_fetch().unwrap();
        assert_eq!(fetch.request_id(), 0);
        assert_eq!(mock.pending_count(), 1);
    }

    #[test]
    fn test_invoke_unknown_method() {
        let mock = ContentMock::new();
        let err = mock
            .content(("blog",))
            .invoke("filter", ("x",))
            .unwrap_err();

        assert_eq!(err, Error::UnknownMethod("filter".into()));
        assert_eq!(mock.pending_count(), 0);
    }

    #[test]
    fn test_fetch_queues_immediately() {
        let mock = ContentMock::new();
        assert_eq!(mock.pending_count(), 0);

        let first = mock.content(("blog",)).fetch();
        let second = mock.content(("blog",)).fetch();

        assert_eq!(mock.pending_count(), 2);
        assert_eq!(first.request_id(), 0);
        assert_eq!(second.request_id(), 1);
    }

    #[test]
    fn test_fetch_pending_until_settled() {
        let mock = ContentMock::new();
        let mut fetch = mock.content(("blog",)).fetch();

        assert_unsettled!(&mut fetch);
        drop(mock.respond_with(json!({ "id": "test" })).unwrap());

        let value = assert_settled!(&mut fetch);
        assert_eq!(value, Ok(json!({ "id": "test" })));
    }

    #[test]
    fn test_fetch_stays_pending_when_mock_dropped() {
        let mock = ContentMock::new();
        let mut fetch = mock.content(("blog",)).fetch();
        drop(mock);

        assert_unsettled!(&mut fetch);
        assert_unsettled!(&mut fetch);
    }

    #[test]
    fn test_query_debug() {
        let mock = ContentMock::new();
        let query = mock.content(("blog",)).limit((5,));

        let debug = format!("{query:?}");
        assert!(debug.contains("ContentQuery"));
        assert!(debug.contains("Limit"));
    }
}
