//! # mock-content
//!
//! > A test double for chainable async content-query clients
//!
//! Headless-CMS clients expose fluent queries such as
//! `content("blog").sortBy("id").fetch()`. **mock-content** records every
//! call in such a chain and keeps each `fetch` pending until the test settles
//! it, so tests can check exactly what was queried and control what comes
//! back, and when.
//!
//! ## Quick Start
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use mock_content::prelude::*;
//! use serde_json::json;
//!
//! let mock = ContentMock::new();
//!
//! let res = mock.content(("blog",)).sort_by(("id",)).fetch();
//! assert!(mock.was_called_with(&[json!("blog")]));
//!
//! let chain = mock.respond_with(json!([{ "id": "test" }])).unwrap().await;
//! assert_eq!(chain.count(), 1);
//! assert!(chain.at(0).unwrap().was_called_with(&[json!("id")]));
//!
//! assert_eq!(res.await, Ok(json!([{ "id": "test" }])));
//! # }
//! ```
//!
//! ## Features
//!
//! - **Chain recording** - Every modifier call, in order, with its arguments
//! - **Deferred settlement** - Fetches resolve or reject when the test says so
//! - **FIFO control** - Concurrent fetches settle in the order they were issued
//! - **Chain queries** - Look up records by position or modifier name

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assertions;
pub mod error;
pub mod mock;

/// Prelude for convenient imports
///
/// ```rust
/// use mock_content::prelude::*;
/// ```
pub mod prelude {
    pub use crate::args;
    pub use crate::error::{Error, Result};
    pub use crate::mock::{
        CallRecord, ChainView, ContentMock, ContentQuery, Fetch, IntoArgs, MockOptions, Modifier,
    };
}

// Re-exports
pub use error::{Error, Result};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::{json, Value};
}
