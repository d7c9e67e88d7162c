use arrange::http::dep::encoding_rs::WINDOWS_1252;
use arrange::http::{ArrangementBuilder, BodyExtractExt, Content, Method, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Terms {
    a: i64,
    b: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Count {
    n: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Total {
    total: i64,
}

#[tokio::test]
async fn json_request_and_response() {
    let client = ArrangementBuilder::new()
        .with_handler("add", |case| {
            case.accept_route_json(Terms::default(), |method, uri, terms: &Terms| {
                method == Method::POST && uri.path() == "/add" && terms.a >= 0
            })
            .respond_derived_json(Terms::default(), |terms: Terms| {
                (StatusCode::OK, Total { total: terms.a + terms.b })
            })
        })
        .build_client();

    let response = client
        .post_json("/add", &Terms { a: 40, b: 2 })
        .await
        .unwrap();
    assert_eq!(
        response.headers()["content-type"],
        "application/json; charset=utf-8"
    );
    let total: Total = response.try_into_json().await.unwrap();
    assert_eq!(total, Total { total: 42 });

    // rejected by the body aware accept rule
    let err = client
        .post_json("/add", &Terms { a: -1, b: 2 })
        .await
        .unwrap_err();
    assert!(err.is::<arrange::http::UnhandledRequestError>());
}

#[tokio::test]
async fn undecodable_body_falls_back_to_default_and_is_rejected() {
    let client = ArrangementBuilder::new()
        .with_handler("non-zero", |case| {
            case.accept_route_json(Count::default(), |method, uri, count: &Count| {
                method == Method::POST && uri.path() == "/count" && count.n != 0
            })
            .respond_status(StatusCode::ACCEPTED)
        })
        .build_client();

    let response = client.post_json("/count", &Count { n: 4 }).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    // `{bad` does not parse, so the rule sees `{n: 0}` and declines
    let content = Content::new("{bad", "application/json".parse().unwrap());
    let err = client
        .request(Method::POST, "/count", Some(content))
        .await
        .unwrap_err();
    let unhandled = err
        .downcast_ref::<arrange::http::UnhandledRequestError>()
        .unwrap();
    assert_eq!(unhandled.decoded_body(), Some("{bad"));
}

#[cfg(feature = "xml")]
#[tokio::test]
async fn xml_request_and_response() {
    let client = ArrangementBuilder::new()
        .with_handler("add", |case| {
            case.accept_route(Method::POST, "/add")
                .respond_derived_xml(Terms::default(), |terms: Terms| {
                    (StatusCode::OK, Total { total: terms.a + terms.b })
                })
        })
        .build_client();

    let content = Content::xml(&Terms { a: 40, b: 2 }).unwrap();
    let response = client
        .request(Method::POST, "/add", Some(content))
        .await
        .unwrap();
    assert_eq!(response.headers()["content-type"], "application/xml");
    assert_eq!(
        response.try_into_string().await.unwrap(),
        "<Total><total>42</total></Total>"
    );

    // garbage falls back to the default terms
    let response = client
        .request(Method::POST, "/add", Some(Content::text("<not xml")))
        .await
        .unwrap();
    assert_eq!(
        response.try_into_string().await.unwrap(),
        "<Total><total>0</total></Total>"
    );
}

#[tokio::test]
async fn request_body_is_decoded_with_its_charset() {
    let client = ArrangementBuilder::new()
        .with_handler("echo", |case| {
            case.accept_route(Method::POST, "/echo")
                .respond_with(|builder, request| {
                    let raw_len = request.raw_body().map_or(0, |body| body.len());
                    let text = request.decoded_body().unwrap_or("<undecodable>");
                    builder
                        .with_status(StatusCode::OK)
                        .with_content(Content::text(format!("{raw_len}:{text}")))
                })
        })
        .build_client();

    let content = Content::text_with_charset("café", WINDOWS_1252);
    assert_eq!(content.content_type(), "text/plain; charset=windows-1252");

    let response = client
        .request(Method::POST, "/echo", Some(content))
        .await
        .unwrap();
    assert_eq!(response.try_into_string().await.unwrap(), "4:café");
}
