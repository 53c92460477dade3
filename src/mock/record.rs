//! Call records for the chain recorder.
//!
//! A [`CallRecord`] captures one modifier invocation: which [`Modifier`] was
//! called and with which arguments. Arguments are stored as
//! [`serde_json::Value`]s so any shape a query client accepts can be recorded
//! and compared later.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::Error;

/// The closed set of query modifiers a content chain exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// `only(...)` - restrict returned fields.
    Only,
    /// `without(...)` - drop fields from the result.
    Without,
    /// `where(...)` - filter documents.
    Where,
    /// `sortBy(...)` - order results.
    SortBy,
    /// `limit(...)` - cap the result count.
    Limit,
    /// `skip(...)` - offset into the results.
    Skip,
    /// `search(...)` - full-text search.
    Search,
    /// `surround(...)` - fetch neighbours of a document.
    Surround,
}

impl Modifier {
    /// Every modifier, in declaration order.
    pub const ALL: [Modifier; 8] = [
        Modifier::Only,
        Modifier::Without,
        Modifier::Where,
        Modifier::SortBy,
        Modifier::Limit,
        Modifier::Skip,
        Modifier::Search,
        Modifier::Surround,
    ];

    /// The method name as the query client spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Only => "only",
            Self::Without => "without",
            Self::Where => "where",
            Self::SortBy => "sortBy",
            Self::Limit => "limit",
            Self::Skip => "skip",
            Self::Search => "search",
            Self::Surround => "surround",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modifier {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| Error::unknown_method(name))
    }
}

/// Any method reachable on a content chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainMethod {
    /// A recorded query modifier.
    Modifier(Modifier),
    /// The terminal `fetch`.
    Fetch,
}

impl FromStr for ChainMethod {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name == "fetch" {
            Ok(Self::Fetch)
        } else {
            name.parse().map(Self::Modifier)
        }
    }
}

impl fmt::Display for ChainMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modifier(m) => fmt::Display::fmt(m, f),
            Self::Fetch => f.write_str("fetch"),
        }
    }
}

/// A record of a single modifier call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    method: Modifier,
    args: Vec<Value>,
}

impl CallRecord {
    pub(crate) fn new(method: Modifier, args: Vec<Value>) -> Self {
        Self { method, args }
    }

    /// The modifier that was called.
    #[must_use]
    pub fn method(&self) -> Modifier {
        self.method
    }

    /// The modifier name, e.g. `"sortBy"`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.method.as_str()
    }

    /// The arguments passed to the call, in order.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The Nth argument (0-indexed).
    #[must_use]
    pub fn arg(&self, n: usize) -> Option<&Value> {
        self.args.get(n)
    }

    /// Number of invocations this record stands for.
    ///
    /// Records are never shared between calls, so this is always 1 even when
    /// the same modifier appears several times in one chain.
    #[must_use]
    pub fn call_count(&self) -> usize {
        1
    }

    /// Check if the call received exactly these arguments.
    #[must_use]
    pub fn was_called_with(&self, expected: &[Value]) -> bool {
        self.args == expected
    }
}

/// Conversion into a recorded argument list.
///
/// Implemented for `()`, tuples of up to six `Into<Value>` items and
/// `Vec<Value>`. The [`args!`](crate::args) macro builds a `Vec<Value>` from
/// anything serializable.
pub trait IntoArgs {
    /// Convert into the ordered argument list.
    fn into_args(self) -> Vec<Value>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Value> {
        Vec::new()
    }
}

impl IntoArgs for Vec<Value> {
    fn into_args(self) -> Vec<Value> {
        self
    }
}

macro_rules! impl_into_args_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: Into<Value>),+> IntoArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<Value> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

impl_into_args_for_tuple!(A);
impl_into_args_for_tuple!(A, B);
impl_into_args_for_tuple!(A, B, C);
impl_into_args_for_tuple!(A, B, C, D);
impl_into_args_for_tuple!(A, B, C, D, E);
impl_into_args_for_tuple!(A, B, C, D, E, F);

/// Build an argument list, each argument written as a `json!` literal.
///
/// Every argument is a single token tree, so JSON objects, arrays, `null`,
/// literals and variables work directly. Wrap anything longer (a negative
/// number, a method call) in parentheses.
///
/// ```rust
/// use mock_content::args;
/// use serde_json::json;
///
/// let limit = 10;
/// let args = args!["blog", { "draft": false }, ["title"], null, limit, (-1)];
/// assert_eq!(
///     args,
///     vec![json!("blog"), json!({ "draft": false }), json!(["title"]), json!(null), json!(10), json!(-1)]
/// );
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::__private::Value>::new()
    };
    ($($arg:tt),+ $(,)?) => {
        ::std::vec![$($crate::__private::json!($arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_modifier_names_round_trip() {
        for modifier in Modifier::ALL {
            assert_eq!(modifier.as_str().parse::<Modifier>().unwrap(), modifier);
        }
        assert_eq!(Modifier::SortBy.to_string(), "sortBy");
    }

    #[test]
    fn test_modifier_rejects_unknown_name() {
        let err = "sort_by".parse::<Modifier>().unwrap_err();
        assert_eq!(err, Error::UnknownMethod("sort_by".into()));
    }

    #[test]
    fn test_chain_method_parse() {
        assert_eq!("fetch".parse::<ChainMethod>().unwrap(), ChainMethod::Fetch);
        assert_eq!(
            "where".parse::<ChainMethod>().unwrap(),
            ChainMethod::Modifier(Modifier::Where)
        );
        assert!("filter".parse::<ChainMethod>().is_err());
        assert_eq!(ChainMethod::Fetch.to_string(), "fetch");
    }

    #[test]
    fn test_call_record_accessors() {
        let record = CallRecord::new(Modifier::Limit, vec![json!(10)]);

        assert_eq!(record.method(), Modifier::Limit);
        assert_eq!(record.name(), "limit");
        assert_eq!(record.args(), &[json!(10)]);
        assert_eq!(record.arg(0), Some(&json!(10)));
        assert!(record.arg(1).is_none());
        assert_eq!(record.call_count(), 1);
        assert!(record.was_called_with(&[json!(10)]));
        assert!(!record.was_called_with(&[json!(5)]));
    }

    #[test]
    fn test_into_args() {
        assert!(().into_args().is_empty());
        assert_eq!(("id",).into_args(), vec![json!("id")]);
        assert_eq!(
            ("title", "desc", 3).into_args(),
            vec![json!("title"), json!("desc"), json!(3)]
        );
        assert_eq!(vec![json!(null)].into_args(), vec![json!(null)]);
    }

    #[test]
    fn test_args_macro() {
        let empty: Vec<Value> = args![];
        assert!(empty.is_empty());
        assert_eq!(
            args!["blog", ["title"], 10],
            vec![json!("blog"), json!(["title"]), json!(10)]
        );
    }

    #[test]
    fn test_args_macro_takes_json_literals() {
        let offset = 5;
        let args = args![{ "draft": false, "tags": ["rust"] }, null, true, offset, (2 * 3)];

        assert_eq!(
            args,
            vec![
                json!({ "draft": false, "tags": ["rust"] }),
                Value::Null,
                json!(true),
                json!(5),
                json!(6),
            ]
        );
    }
}
