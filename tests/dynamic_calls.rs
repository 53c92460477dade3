//! Chains driven by method name, as a dynamic client wrapper would.

use mock_content::mock::{ContentMock, ContentQuery, Invocation, Modifier};
use mock_content::Error;
use serde_json::{json, Value};

fn replay(
    mut query: ContentQuery<Value, Value>,
    calls: &[(&str, Vec<Value>)],
) -> Result<ContentQuery<Value, Value>, Error> {
    for (name, args) in calls {
        query = match query.invoke(name, args.clone())? {
            Invocation::Chained(next) => next,
            Invocation::Fetched(_) => panic!("`{name}` unexpectedly fetched"),
        };
    }
    Ok(query)
}

#[tokio::test]
async fn test_replayed_calls_are_recorded() {
    let mock = ContentMock::new();

    let query = replay(
        mock.content(("articles",)),
        &[
            ("where", vec![json!({ "published": true })]),
            ("sortBy", vec![json!("createdAt"), json!("desc")]),
            ("limit", vec![json!(5)]),
        ],
    )
    .unwrap();

    let res = query.invoke("fetch", ()).unwrap().into_fetch().unwrap();
    let chain = mock.respond_with(json!([])).unwrap().await;

    assert_eq!(chain.names(), vec!["where", "sortBy", "limit"]);
    assert!(chain
        .find(Modifier::SortBy)
        .unwrap()
        .was_called_with(&[json!("createdAt"), json!("desc")]));
    assert_eq!(res.await, Ok(json!([])));
}

#[test]
fn test_unknown_method_is_rejected() {
    let mock = ContentMock::new();

    let err = replay(
        mock.content(("articles",)),
        &[("limit", vec![json!(5)]), ("orderBy", vec![json!("id")])],
    )
    .unwrap_err();

    assert_eq!(err, Error::UnknownMethod("orderBy".into()));
    assert!(err.to_string().contains("orderBy"));
    assert_eq!(mock.pending_count(), 0);
}

#[test]
fn test_method_names_are_case_sensitive() {
    let mock = ContentMock::new();

    assert!(mock.content(()).invoke("sortby", ()).is_err());
    assert!(mock.content(()).invoke("Fetch", ()).is_err());
    assert!(mock.content(()).invoke("sortBy", ()).is_ok());
}
