//! FIFO holding area for fetches awaiting settlement.

use std::collections::VecDeque;
use std::fmt::Debug;

use futures::channel::oneshot;
use serde_json::Value;

use crate::mock::record::CallRecord;
use crate::mock::view::ChainView;

/// One-shot settlement handle for a single fetch.
pub(crate) type Settlement<T, E> = oneshot::Sender<Result<T, E>>;

/// A fetch that has been issued but not yet settled.
pub(crate) struct PendingRequest<T, E> {
    id: u64,
    entry_args: Vec<Value>,
    records: Vec<CallRecord>,
    settlement: Settlement<T, E>,
}

impl<T, E> PendingRequest<T, E> {
    pub(crate) fn new(
        id: u64,
        entry_args: Vec<Value>,
        records: Vec<CallRecord>,
        settlement: Settlement<T, E>,
    ) -> Self {
        Self {
            id,
            entry_args,
            records,
            settlement,
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Resolve the fetch with `value` and hand back its chain.
    pub(crate) fn resolve(self, value: T) -> ChainView {
        self.settle(Ok(value))
    }

    /// Reject the fetch with `reason` and hand back its chain.
    pub(crate) fn reject(self, reason: E) -> ChainView {
        self.settle(Err(reason))
    }

    fn settle(self, outcome: Result<T, E>) -> ChainView {
        if self.settlement.send(outcome).is_err() {
            // The caller dropped its `Fetch`; the chain is still worth inspecting.
            tracing::debug!(request = self.id, "fetch dropped before settlement");
        }
        ChainView::new(self.id, self.entry_args, self.records)
    }
}

impl<T, E> Debug for PendingRequest<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequest")
            .field("id", &self.id)
            .field("entry_args", &self.entry_args)
            .field("records", &self.records)
            .field("canceled", &self.settlement.is_canceled())
            .finish()
    }
}

/// Strict FIFO queue of pending requests.
pub(crate) struct PendingQueue<T, E> {
    requests: VecDeque<PendingRequest<T, E>>,
}

impl<T, E> PendingQueue<T, E> {
    pub(crate) fn new() -> Self {
        Self {
            requests: VecDeque::new(),
        }
    }

    pub(crate) fn enqueue(&mut self, request: PendingRequest<T, E>) {
        self.requests.push_back(request);
    }

    /// Remove the oldest request, or `None` when nothing is pending.
    pub(crate) fn dequeue_oldest(&mut self) -> Option<PendingRequest<T, E>> {
        self.requests.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.requests.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl<T, E> Debug for PendingQueue<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.requests.iter().map(PendingRequest::id)).finish()
    }
}
