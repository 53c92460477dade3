//! Read-only queries over a settled chain.

use std::slice;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::mock::record::{CallRecord, Modifier};

/// A read-only view over the records of a settled chain.
///
/// Returned by [`ContentMock::respond_with`](crate::mock::ContentMock::respond_with)
/// and [`ContentMock::fail_with`](crate::mock::ContentMock::fail_with), or by
/// [`ChainView::find_all`] as a filtered sub-view.
///
/// # Example
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use mock_content::mock::{ContentMock, Modifier};
/// use serde_json::json;
///
/// let mock = ContentMock::new();
/// let _res = mock.content(("blog",)).sort_by(("id",)).limit((10,)).fetch();
///
/// let chain = mock.respond_with(json!([])).unwrap().await;
/// assert_eq!(chain.count(), 2);
/// assert_eq!(chain.at(0).unwrap().name(), "sortBy");
/// assert!(chain.find(Modifier::Limit).unwrap().was_called_with(&[json!(10)]));
/// assert_eq!(chain.find_all(Modifier::Skip).count(), 0);
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChainView {
    request_id: u64,
    entry_args: Vec<Value>,
    records: Vec<CallRecord>,
}

impl ChainView {
    pub(crate) fn new(request_id: u64, entry_args: Vec<Value>, records: Vec<CallRecord>) -> Self {
        Self {
            request_id,
            entry_args,
            records,
        }
    }

    /// Number of records in the view.
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Check if the view holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the Nth record (0-indexed).
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&CallRecord> {
        self.records.get(index)
    }

    /// Get the first record made with the given modifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no such record exists.
    pub fn find(&self, method: Modifier) -> Result<&CallRecord> {
        self.records
            .iter()
            .find(|r| r.method() == method)
            .ok_or(Error::RecordNotFound(method))
    }

    /// Get every record made with the given modifier, in call order.
    ///
    /// Never fails; the returned view is empty when nothing matches.
    #[must_use]
    pub fn find_all(&self, method: Modifier) -> ChainView {
        let records = self
            .records
            .iter()
            .filter(|r| r.method() == method)
            .cloned()
            .collect();
        ChainView::new(self.request_id, self.entry_args.clone(), records)
    }

    /// Iterate over the records in call order.
    pub fn iter(&self) -> slice::Iter<'_, CallRecord> {
        self.records.iter()
    }

    /// Names of the recorded modifiers, in call order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.records.iter().map(CallRecord::name).collect()
    }

    /// Sequence number of the fetch this chain belongs to (0 for the first
    /// fetch issued through a mock).
    #[must_use]
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Arguments of the entry-point call that started this chain.
    #[must_use]
    pub fn entry_args(&self) -> &[Value] {
        &self.entry_args
    }
}

impl<'a> IntoIterator for &'a ChainView {
    type Item = &'a CallRecord;
    type IntoIter = slice::Iter<'a, CallRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
