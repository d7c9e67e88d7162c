use arrange::error::BoxError;
use arrange::http::{
    ArrangedClient, ArrangedService, ArrangementBuilder, CancellationToken, CapturedRequest,
    CaseHandler, Content, DispatchCancelledError, Method, ResponseNotConfiguredError, StatusCode,
    UnhandledRequestError,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn counting_rule(
    counter: &Arc<AtomicUsize>,
    accepts: bool,
) -> impl Fn(&CapturedRequest) -> bool + Send + Sync + 'static {
    let counter = counter.clone();
    move |_: &CapturedRequest| {
        counter.fetch_add(1, Ordering::SeqCst);
        accepts
    }
}

#[tokio::test]
async fn accept_rules_short_circuit() {
    let counters: Vec<_> = (0..4).map(|_| Arc::new(AtomicUsize::new(0))).collect();

    let client = ArrangementBuilder::new()
        .with_handler("counted", |case| {
            case.accept_when(counting_rule(&counters[0], false))
                .accept_when(counting_rule(&counters[1], true))
                .accept_when(counting_rule(&counters[2], true))
                .respond_status(StatusCode::OK)
        })
        .with_handler("later", |case| {
            case.accept_when(counting_rule(&counters[3], true))
                .respond_status(StatusCode::ACCEPTED)
        })
        .build_client();

    let response = client.get("/").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let counts: Vec<_> = counters.iter().map(|c| c.load(Ordering::SeqCst)).collect();
    assert_eq!(counts, [1, 1, 0, 0]);
}

#[tokio::test]
async fn first_registered_match_wins() {
    let service = ArrangedService::new();
    service.add(
        "first",
        CaseHandler::builder()
            .accept_all()
            .respond_status(StatusCode::OK)
            .build(),
    );
    service.add(
        "second",
        CaseHandler::builder()
            .accept_all()
            .respond_status(StatusCode::ACCEPTED)
            .build(),
    );
    let client = ArrangedClient::from(service.clone());

    assert_eq!(client.get("/").await.unwrap().status(), StatusCode::OK);

    // replacing keeps the position of the original registration
    service.add(
        "first",
        CaseHandler::builder()
            .accept_all()
            .respond_status(StatusCode::IM_A_TEAPOT)
            .build(),
    );
    assert_eq!(service.ids(), ["first", "second"]);
    assert_eq!(client.get("/").await.unwrap().status(), StatusCode::IM_A_TEAPOT);

    assert!(service.remove("first"));
    assert!(!service.remove("first"));
    assert_eq!(client.get("/").await.unwrap().status(), StatusCode::ACCEPTED);

    service.clear();
    let err = client.get("/").await.unwrap_err();
    assert!(err.is::<UnhandledRequestError>());
}

#[tokio::test]
async fn unhandled_request_carries_the_request() {
    let client = ArrangementBuilder::new()
        .with_handler("only-get", |case| {
            case.accept_method(Method::GET)
                .respond_status(StatusCode::OK)
        })
        .build_client();

    let err = client
        .request(Method::PUT, "/things/1", Some(Content::text("payload")))
        .await
        .unwrap_err();
    let err = err.downcast_ref::<UnhandledRequestError>().unwrap();
    assert_eq!(err.method(), Method::PUT);
    assert_eq!(err.uri(), "/things/1");
    assert_eq!(err.headers()["content-type"], "text/plain; charset=utf-8");
    assert_eq!(err.decoded_body(), Some("payload"));
    assert_eq!(err.to_string(), "no handlers registered for request: PUT /things/1");
}

#[tokio::test]
async fn matched_handler_without_responder() {
    let client = ArrangementBuilder::new()
        .with_handler("silent", |case| case.accept_all())
        .build_client();

    let err = client.get("/").await.unwrap_err();
    assert!(err.is::<ResponseNotConfiguredError>());
    assert!(!err.is::<UnhandledRequestError>());
}

#[tokio::test]
async fn empty_arrangement_handles_nothing() {
    let client = ArrangementBuilder::new().build_client();
    for path in ["/", "/a", "/a/b?c=d"] {
        let err = client.get(path).await.unwrap_err();
        assert!(err.is::<UnhandledRequestError>());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dispatch() {
    let client = ArrangementBuilder::new()
        .with_handler("even", |case| {
            case.accept_uri_fn(|uri| {
                uri.path()
                    .trim_start_matches('/')
                    .parse::<u32>()
                    .is_ok_and(|n| n % 2 == 0)
            })
            .respond_status(StatusCode::OK)
        })
        .with_handler("odd", |case| {
            case.accept_all().respond_status(StatusCode::ACCEPTED)
        })
        .build_client();

    let tasks: Vec<_> = (0..64u32)
        .map(|n| {
            let client = client.clone();
            tokio::spawn(async move { (n, client.get(format!("/{n}")).await) })
        })
        .collect();

    for task in tasks {
        let (n, result) = task.await.unwrap();
        let expected = if n % 2 == 0 {
            StatusCode::OK
        } else {
            StatusCode::ACCEPTED
        };
        assert_eq!(result.unwrap().status(), expected);
    }
}

#[tokio::test]
async fn cancel_pending_response() {
    let client = ArrangementBuilder::new()
        .with_handler("slow", |case| {
            case.accept_all().respond_with_async(|builder, _, _| async move {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok::<_, BoxError>(builder.with_status(StatusCode::OK))
            })
        })
        .build_client();

    let cancel = CancellationToken::new();
    let task = tokio::spawn({
        let client = client.clone();
        let cancel = cancel.clone();
        async move {
            client
                .send_with_cancel(
                    arrange::http::Request::new(arrange::http::Body::empty()),
                    cancel,
                )
                .await
        }
    });

    tokio::task::yield_now().await;
    cancel.cancel();

    let err = task.await.unwrap().unwrap_err();
    assert!(err.is::<DispatchCancelledError>());
}

#[tokio::test]
async fn responder_observes_cancellation() {
    let client = ArrangementBuilder::new()
        .with_handler("observer", |case| {
            case.accept_all()
                .respond_with_async(|builder, _, cancel: CancellationToken| async move {
                    let status = if cancel.is_cancelled() {
                        StatusCode::SERVICE_UNAVAILABLE
                    } else {
                        StatusCode::OK
                    };
                    Ok::<_, BoxError>(builder.with_status(status))
                })
        })
        .build_client();

    let response = client
        .send_with_cancel(
            arrange::http::Request::new(arrange::http::Body::empty()),
            CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
