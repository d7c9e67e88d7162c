use arrange::http::{
    ArrangementBuilder, BodyExtractExt, CancellationToken, Content, Method, OriginalRequest,
    StatusCode, UnhandledRequestError, UriExt,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Number {
    n: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Doubled {
    result: i64,
}

#[tokio::test]
async fn health_check() {
    let client = ArrangementBuilder::new()
        .with_handler("health", |case| {
            case.accept_route(Method::GET, "/health")
                .respond_static_content(StatusCode::OK, Content::text("ok"))
        })
        .build_client();

    let response = client.get("/health").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    assert!(response.extensions().get::<OriginalRequest>().is_none());
    assert_eq!(response.try_into_string().await.unwrap(), "ok");

    let err = client
        .request(Method::POST, "/health", None)
        .await
        .unwrap_err();
    let unhandled = err.downcast_ref::<UnhandledRequestError>().unwrap();
    assert_eq!(unhandled.method(), Method::POST);
    assert_eq!(unhandled.uri(), "/health");
}

#[tokio::test]
async fn derived_json_falls_back_to_default() {
    let client = ArrangementBuilder::new()
        .with_handler("double", |case| {
            case.accept_route(Method::POST, "/double")
                .respond_derived_json(Number::default(), |number: Number| {
                    (StatusCode::OK, Doubled { result: number.n * 2 })
                })
        })
        .build_client();

    let response = client
        .post_json("/double", &serde_json::json!({ "n": 21 }))
        .await
        .unwrap();
    assert!(response.extensions().get::<OriginalRequest>().is_some());
    let doubled: Doubled = response.try_into_json().await.unwrap();
    assert_eq!(doubled, Doubled { result: 42 });

    // not a number: the default is used
    let response = client
        .post_json("/double", &serde_json::json!({ "n": "many" }))
        .await
        .unwrap();
    let doubled: Doubled = response.try_into_json().await.unwrap();
    assert_eq!(doubled, Doubled { result: 0 });

    // no body at all
    let response = client
        .request(Method::POST, "/double", None)
        .await
        .unwrap();
    let doubled: Doubled = response.try_into_json().await.unwrap();
    assert_eq!(doubled, Doubled { result: 0 });
}

#[tokio::test]
async fn stateful_collection() {
    let items = Arc::new(Mutex::new(Vec::<i64>::new()));

    let add_items = items.clone();
    let remove_items = items.clone();
    let list_items = items.clone();

    let client = ArrangementBuilder::new()
        .with_handler("add", move |case| {
            case.accept_route(Method::POST, "/items")
                .respond_derived_json(Number::default(), move |number: Number| {
                    add_items.lock().push(number.n);
                    (StatusCode::CREATED, number)
                })
        })
        .with_handler("remove", move |case| {
            case.accept_route_fn(|method, uri| method == Method::DELETE && uri.path() == "/items")
                .respond_with(move |builder, request| {
                    let value = request
                        .uri()
                        .query_value("value")
                        .and_then(|value| value.parse::<i64>().ok());
                    let mut items = remove_items.lock();
                    let index = value.and_then(|value| items.iter().position(|item| *item == value));
                    match index {
                        Some(index) => {
                            items.remove(index);
                            builder.with_status(StatusCode::NO_CONTENT)
                        }
                        None => builder.with_status(StatusCode::NOT_FOUND),
                    }
                })
        })
        .with_handler("list", move |case| {
            case.accept_route(Method::GET, "/items")
                .respond_request_json_async(move |_, _: CancellationToken| {
                    let snapshot = list_items.lock().clone();
                    async move { (StatusCode::OK, snapshot) }
                })
        })
        .build_client();

    for n in [3, 5] {
        let response = client
            .post_json("/items", &Number { n })
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let listed: Vec<i64> = client.get("/items").await.unwrap().try_into_json().await.unwrap();
    assert_eq!(listed, [3, 5]);

    let response = client
        .request(Method::DELETE, "/items?value=3", None)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .request(Method::DELETE, "/items?value=3", None)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let listed: Vec<i64> = client.get("/items").await.unwrap().try_into_json().await.unwrap();
    assert_eq!(listed, [5]);
    assert_eq!(*items.lock(), [5]);
}

#[tokio::test]
async fn api_with_fallback() {
    let client = ArrangementBuilder::new()
        .with_handler("sum", |case| {
            case.accept_route_fn(|method, uri| {
                method == Method::GET && uri.path() == "/sum" && uri.query_values("n").len() > 1
            })
            .respond_with(|builder, request| {
                let sum: i64 = request
                    .uri()
                    .query_values("n")
                    .iter()
                    .filter_map(|n| n.parse::<i64>().ok())
                    .sum();
                builder
                    .with_status(StatusCode::OK)
                    .with_content(Content::text(sum.to_string()))
            })
        })
        .with_anonymous_handler(|case| {
            case.accept_all()
                .respond_static_content(StatusCode::NOT_FOUND, Content::text("no such route"))
        })
        .build_client();

    let response = client.get("/sum?n=1&n=2&n=39").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.try_into_string().await.unwrap(), "42");

    let response = client.get("/sum?n=1").await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.try_into_string().await.unwrap(), "no such route");
}
