//! Call history for the content entry point.

use std::fmt::Debug;

use parking_lot::Mutex;
use serde_json::Value;

/// Ordered history of entry-point invocations, one argument list per call.
pub(crate) struct EntryHistory {
    calls: Mutex<Vec<Vec<Value>>>,
}

impl EntryHistory {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Record a call with the given arguments.
    pub(crate) fn track(&self, args: Vec<Value>) {
        self.calls.lock().push(args);
    }

    pub(crate) fn calls(&self) -> Vec<Vec<Value>> {
        self.calls.lock().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub(crate) fn nth_call(&self, n: usize) -> Option<Vec<Value>> {
        self.calls.lock().get(n).cloned()
    }

    pub(crate) fn last_call(&self) -> Option<Vec<Value>> {
        self.calls.lock().last().cloned()
    }

    /// Check if any call received exactly these arguments.
    pub(crate) fn was_called_with(&self, expected: &[Value]) -> bool {
        self.calls.lock().iter().any(|args| args == expected)
    }
}

impl Debug for EntryHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let calls = self.calls.lock();
        f.debug_struct("EntryHistory")
            .field("call_count", &calls.len())
            .field("calls", &*calls)
            .finish()
    }
}
