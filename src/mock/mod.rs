//! A test double for chainable async content-query clients.
//!
//! This module provides:
//!
//! - [`ContentMock`] - The mock itself: entry point plus settlement controls
//! - [`ContentQuery`] - A chain being recorded, with the terminal [`ContentQuery::fetch`]
//! - [`Fetch`] - The deferred result of a fetch
//! - [`ChainView`] - Read-only queries over a settled chain
//! - [`CallRecord`] / [`Modifier`] - What was called, with which arguments
//!
//! # Lifecycle
//!
//! A chain is recording until `fetch` is called, then awaits settlement in a
//! FIFO queue. [`ContentMock::respond_with`] and [`ContentMock::fail_with`]
//! settle the oldest queued fetch and deliver its [`ChainView`].
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use mock_content::mock::{ContentMock, Modifier};
//! use mock_content::args;
//! use serde_json::json;
//!
//! let mock = ContentMock::new();
//!
//! let first = mock.content(("blog", "id1")).only(args![["title"]]).fetch();
//! let second = mock.content(("blog", "id2")).only(args![["id"]]).fetch();
//!
//! let chain1 = mock.respond_with(json!({ "title": "title1" })).unwrap().await;
//! let chain2 = mock.fail_with(json!("not found")).unwrap().await;
//!
//! assert!(chain1.find(Modifier::Only).unwrap().was_called_with(&[json!(["title"])]));
//! assert_eq!(chain2.entry_args(), &[json!("blog"), json!("id2")]);
//!
//! assert_eq!(first.await, Ok(json!({ "title": "title1" })));
//! assert_eq!(second.await, Err(json!("not found")));
//! # }
//! ```

mod chain;
mod content;
mod history;
mod queue;
mod record;
mod view;

pub use chain::{ContentQuery, Fetch, Invocation};
pub use content::{ContentMock, MockOptions, RequestQueued, Settled};
pub use record::{CallRecord, ChainMethod, IntoArgs, Modifier};
pub use view::ChainView;
