//! Assertions on fetch and settlement futures without an executor.
//!
//! - [`poll_once`] - Poll a future once and return the result
//! - [`assert_settled!`](crate::assert_settled) - Assert a future is ready and take its output
//! - [`assert_unsettled!`](crate::assert_unsettled) - Assert a future is still pending
//!
//! # Example
//!
//! ```rust
//! use mock_content::mock::ContentMock;
//! use mock_content::{assert_settled, assert_unsettled};
//! use serde_json::json;
//!
//! let mock = ContentMock::new();
//! let mut res = mock.content(("blog",)).fetch();
//! assert_unsettled!(&mut res);
//!
//! drop(mock.respond_with(json!("done")).unwrap());
//! assert_eq!(assert_settled!(&mut res), Ok(json!("done")));
//! ```

use std::future::Future;
use std::task::{Context, Poll};

use futures::task::noop_waker;

/// Poll a future once and return the result.
///
/// Pass `&mut future` to keep polling the same future afterwards.
///
/// # Example
///
/// ```rust
/// use mock_content::assertions::poll_once;
/// use std::task::Poll;
///
/// assert_eq!(poll_once(async { 42 }), Poll::Ready(42));
/// ```
pub fn poll_once<F: Future>(future: F) -> Poll<F::Output> {
    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);
    let mut pinned = Box::pin(future);
    pinned.as_mut().poll(&mut cx)
}

/// Assert that a future completes on its next poll and return its output.
///
/// # Panics
///
/// Panics if the future returns `Poll::Pending`.
#[macro_export]
macro_rules! assert_settled {
    ($future:expr) => {{
        match $crate::assertions::poll_once($future) {
            ::std::task::Poll::Ready(value) => value,
            ::std::task::Poll::Pending => {
                panic!("assertion failed: expected future to be settled, but it was pending");
            }
        }
    }};
    ($future:expr, $($arg:tt)+) => {{
        match $crate::assertions::poll_once($future) {
            ::std::task::Poll::Ready(value) => value,
            ::std::task::Poll::Pending => {
                panic!(
                    "assertion failed: expected future to be settled, but it was pending: {}",
                    format_args!($($arg)+)
                );
            }
        }
    }};
}

/// Assert that a future is still pending after one more poll.
///
/// # Panics
///
/// Panics if the future returns `Poll::Ready`.
#[macro_export]
macro_rules! assert_unsettled {
    ($future:expr) => {{
        if let ::std::task::Poll::Ready(value) = $crate::assertions::poll_once($future) {
            panic!(
                "assertion failed: expected future to be pending, but it settled with {:?}",
                value
            );
        }
    }};
    ($future:expr, $($arg:tt)+) => {{
        if let ::std::task::Poll::Ready(value) = $crate::assertions::poll_once($future) {
            panic!(
                "assertion failed: expected future to be pending, but it settled with {:?}: {}",
                value,
                format_args!($($arg)+)
            );
        }
    }};
}
