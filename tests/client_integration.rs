mod common;

use std::time::Duration;

use agileplace_http::{
    AgilePlaceError, ApiRequest, CancellationToken, ClientOptions, Query, QueryValue,
};
use axum::http::StatusCode;
use common::{client_for, secs, spawn_server, MockResponse};
use serde_json::json;

fn opts(max_retries: usize) -> ClientOptions {
    ClientOptions {
        max_retries,
        ..ClientOptions::default()
    }
}

#[tokio::test]
async fn rate_limited_twice_then_succeeds() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::TOO_MANY_REQUESTS, json!({"message": "slow down"})),
        MockResponse::json(StatusCode::TOO_MANY_REQUESTS, json!({"message": "slow down"})),
        MockResponse::json(StatusCode::OK, json!({"boards": []})),
    ])
    .await;
    let (client, sleeper) = client_for(&server.base_url, opts(2));

    let result = client
        .get("/boards", ())
        .await
        .expect("request must succeed after retries");

    assert_eq!(result, json!({"boards": []}));
    assert_eq!(server.hits(), 3);
    assert_eq!(sleeper.delays(), secs(&[1, 2]));

    let request = server.last_request();
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/boards");
    assert_eq!(request.authorization.as_deref(), Some("Bearer t1"));
    assert_eq!(request.accept.as_deref(), Some("application/json"));
    assert_eq!(request.content_type, None);
}

#[tokio::test]
async fn retry_after_header_overrides_computed_backoff() {
    let server = spawn_server(vec![
        MockResponse::raw(StatusCode::TOO_MANY_REQUESTS, "").with_header("retry-after", "2"),
        MockResponse::json(StatusCode::OK, json!({"ok": true})),
    ])
    .await;
    let (client, sleeper) = client_for(&server.base_url, opts(3));

    client.get("/board", ()).await.expect("must succeed");

    assert_eq!(sleeper.delays(), secs(&[2]));
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn retry_after_date_is_capped() {
    let server = spawn_server(vec![
        MockResponse::raw(StatusCode::TOO_MANY_REQUESTS, "")
            .with_header("retry-after", "Thu, 01 Jan 2099 00:00:00 GMT"),
        MockResponse::raw(StatusCode::TOO_MANY_REQUESTS, "")
            .with_header("retry-after", "Thu, 01 Jan 2015 00:00:00 GMT"),
        MockResponse::json(StatusCode::OK, json!({"ok": true})),
    ])
    .await;
    let (client, sleeper) = client_for(&server.base_url, opts(3));

    client.get("/board", ()).await.expect("must succeed");

    assert_eq!(sleeper.delays(), secs(&[60, 0]));
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn backoff_without_header_doubles_each_retry() {
    let server = spawn_server(vec![
        MockResponse::raw(StatusCode::TOO_MANY_REQUESTS, ""),
        MockResponse::raw(StatusCode::TOO_MANY_REQUESTS, ""),
        MockResponse::raw(StatusCode::TOO_MANY_REQUESTS, ""),
        MockResponse::json(StatusCode::OK, json!({})),
    ])
    .await;
    let (client, sleeper) = client_for(&server.base_url, opts(3));

    client.get("/board", ()).await.expect("must succeed");

    assert_eq!(sleeper.delays(), secs(&[1, 2, 4]));
    assert_eq!(server.hits(), 4);
}

#[tokio::test]
async fn exhausted_retries_surface_rate_limit_exceeded() {
    let limited = || {
        MockResponse::raw(StatusCode::TOO_MANY_REQUESTS, "")
            .with_header("x-ratelimit-limit", "100")
            .with_header("x-ratelimit-remaining", "0")
    };
    let server = spawn_server(vec![limited(), limited(), limited(), limited(), limited()]).await;
    let (client, sleeper) = client_for(&server.base_url, opts(3));

    let err = client
        .get("/board", ())
        .await
        .expect_err("must give up");

    match err {
        AgilePlaceError::RateLimitExceeded {
            status,
            attempts,
            rate_limit,
        } => {
            assert_eq!(status, 429);
            assert_eq!(attempts, 4);
            assert_eq!(rate_limit.limit, Some(100));
            assert_eq!(rate_limit.remaining, Some(0));
        }
        other => panic!("expected rate limit error, got {other:?}"),
    }
    assert_eq!(server.hits(), 4);
    assert_eq!(sleeper.delays().len(), 3);
}

#[tokio::test]
async fn zero_retries_means_single_attempt() {
    let server = spawn_server(vec![
        MockResponse::raw(StatusCode::TOO_MANY_REQUESTS, ""),
        MockResponse::json(StatusCode::OK, json!({})),
    ])
    .await;
    let (client, sleeper) = client_for(&server.base_url, opts(0));

    let err = client.get("/board", ()).await.expect_err("must fail");

    assert!(matches!(
        err,
        AgilePlaceError::RateLimitExceeded { attempts: 1, .. }
    ));
    assert_eq!(server.hits(), 1);
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn auth_failures_are_never_retried() {
    for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
        let server = spawn_server(vec![
            MockResponse::json(status, json!({"message": "nope"})),
            MockResponse::json(StatusCode::OK, json!({})),
        ])
        .await;
        let (client, sleeper) = client_for(&server.base_url, opts(3));

        let err = client.get("/user/me", ()).await.expect_err("must fail");

        match err {
            AgilePlaceError::Auth { status: got, message } => {
                assert_eq!(got, status.as_u16());
                assert!(message.contains("AGILEPLACE_API_TOKEN"));
            }
            other => panic!("expected auth error, got {other:?}"),
        }
        assert_eq!(server.hits(), 1);
        assert!(sleeper.delays().is_empty());
    }
}

#[tokio::test]
async fn bad_request_fails_immediately_with_body() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::BAD_REQUEST,
        json!({"error": "bad title"}),
    )])
    .await;
    let (client, _) = client_for(&server.base_url, opts(3));

    let err = client
        .post("/cards", &json!({"title": "x"}))
        .await
        .expect_err("must fail");

    match err {
        AgilePlaceError::ApiRequest { status, body, .. } => {
            assert_eq!(status, 400);
            assert!(body.contains("bad title"));
        }
        other => panic!("expected request error, got {other:?}"),
    }
    assert_eq!(server.hits(), 1);

    let request = server.last_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    assert_eq!(request.json_body(), json!({"title": "x"}));
}

#[tokio::test]
async fn server_errors_surface_without_retry_by_default() {
    let server = spawn_server(vec![
        MockResponse::raw(StatusCode::SERVICE_UNAVAILABLE, "maintenance"),
        MockResponse::json(StatusCode::OK, json!({})),
    ])
    .await;
    let (client, _) = client_for(&server.base_url, opts(3));

    let err = client.get("/board", ()).await.expect_err("must fail");

    match err {
        AgilePlaceError::ApiServer { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected server error, got {other:?}"),
    }
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn server_errors_retry_when_enabled() {
    let server = spawn_server(vec![
        MockResponse::raw(StatusCode::BAD_GATEWAY, "upstream"),
        MockResponse::json(StatusCode::OK, json!({"id": "1"})),
    ])
    .await;
    let (client, sleeper) = client_for(
        &server.base_url,
        ClientOptions {
            retry_server_errors: true,
            ..ClientOptions::default()
        },
    );

    let result = client.get("/board/1", ()).await.expect("must succeed");

    assert_eq!(result, json!({"id": "1"}));
    assert_eq!(server.hits(), 2);
    assert_eq!(sleeper.delays(), secs(&[1]));
}

#[tokio::test]
async fn non_json_success_body_is_decode_error() {
    let server = spawn_server(vec![MockResponse::raw(StatusCode::OK, "<html>hi</html>")]).await;
    let (client, _) = client_for(&server.base_url, opts(3));

    let err = client.get("/board", ()).await.expect_err("must fail");

    match err {
        AgilePlaceError::Decode { body, .. } => assert_eq!(body, "<html>hi</html>"),
        other => panic!("expected decode error, got {other:?}"),
    }
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn no_content_is_empty_object() {
    let server = spawn_server(vec![MockResponse::raw(StatusCode::NO_CONTENT, "")]).await;
    let (client, _) = client_for(&server.base_url, opts(3));

    let result = client.delete("/card/1").await.expect("must succeed");

    assert_eq!(result, json!({}));
    assert_eq!(server.last_request().method, "DELETE");
}

#[tokio::test]
async fn echoed_body_round_trips_unchanged() {
    let server = spawn_server(Vec::new()).await;
    let (client, _) = client_for(&server.base_url, opts(0));
    let payload = json!({
        "title": "Parent",
        "size": 5,
        "blocked": false,
        "tags": ["a", "b"],
        "customFields": { "risk": { "level": 3, "notes": null } },
        "ratio": 0.25
    });

    let echoed = client.post("echo", &payload).await.expect("must echo");

    assert_eq!(echoed, payload);
}

#[tokio::test]
async fn concurrent_calls_keep_their_own_results() {
    let server = spawn_server(Vec::new()).await;
    let (client, _) = client_for(&server.base_url, opts(0));

    let tasks: Vec<_> = (0..10u32)
        .map(|id| {
            let client = client.clone();
            tokio::spawn(async move {
                let value = client
                    .get(&format!("/items/{id}"), Query::new().with("call", id))
                    .await
                    .expect("call must succeed");
                (id, value)
            })
        })
        .collect();

    for task in tasks {
        let (id, value) = task.await.expect("task must not panic");
        assert_eq!(value, json!({ "id": id, "query": format!("call={id}") }));
    }
}

#[tokio::test]
async fn list_query_values_repeat_the_key() {
    let server = spawn_server(vec![MockResponse::json(StatusCode::OK, json!({}))]).await;
    let (client, _) = client_for(&server.base_url, opts(0));

    client
        .get(
            "/card",
            Query::new()
                .with("lanes", QueryValue::list(["a", "b"]))
                .with("limit", 5u32),
        )
        .await
        .expect("must succeed");

    assert_eq!(
        server.last_request().query.as_deref(),
        Some("lanes=a&lanes=b&limit=5")
    );
}

#[tokio::test]
async fn request_timeout_surfaces_transport_error() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::OK, json!({})).with_delay(Duration::from_millis(150)),
    ])
    .await;
    let (client, _) = client_for(
        &server.base_url,
        ClientOptions {
            timeout_ms: 20,
            max_retries: 0,
            ..ClientOptions::default()
        },
    );

    let err = client.get("/board", ()).await.expect_err("must time out");

    match err {
        AgilePlaceError::Transport { attempts, source } => {
            assert_eq!(attempts, 1);
            assert!(source.is_timeout());
        }
        other => panic!("expected transport timeout error, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_failures_are_retried_then_surfaced() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind");
    let address = listener.local_addr().expect("must have local addr");
    drop(listener);
    let (client, sleeper) = client_for(&format!("http://{address}"), opts(2));

    let err = client.get("/board", ()).await.expect_err("must fail");

    assert!(matches!(err, AgilePlaceError::Transport { attempts: 3, .. }));
    assert_eq!(sleeper.delays(), secs(&[1, 2]));
}

#[tokio::test]
async fn cancellation_interrupts_backoff() {
    let server = spawn_server(vec![
        MockResponse::raw(StatusCode::TOO_MANY_REQUESTS, "").with_header("retry-after", "30"),
        MockResponse::json(StatusCode::OK, json!({})),
    ])
    .await;
    let (client, _) = client_for(&server.base_url, opts(3));
    // Real timer, so the call would otherwise wait 30 seconds.
    let client = client.with_sleeper(agileplace_http::TokioSleeper);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client.request_with_cancel(ApiRequest::get("/board"), &cancel),
    )
    .await
    .expect("cancellation must be observed promptly");

    assert!(matches!(result, Err(AgilePlaceError::Cancelled)));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn cancellation_interrupts_round_trip() {
    let server = spawn_server(vec![MockResponse::json(StatusCode::OK, json!({"boards": []}))
        .with_delay(Duration::from_secs(10))])
    .await;
    let (client, sleeper) = client_for(&server.base_url, opts(3));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let result = tokio::time::timeout(
        Duration::from_secs(2),
        client.request_with_cancel(ApiRequest::get("/board"), &cancel),
    )
    .await
    .expect("in-flight request must stop when cancelled");

    assert!(matches!(result, Err(AgilePlaceError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(server.hits() <= 1);
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn cancelled_token_prevents_any_attempt() {
    let server = spawn_server(vec![MockResponse::json(StatusCode::OK, json!({}))]).await;
    let (client, _) = client_for(&server.base_url, opts(3));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = client
        .request_with_cancel(ApiRequest::get("/board"), &cancel)
        .await;

    assert!(matches!(result, Err(AgilePlaceError::Cancelled)));
    assert_eq!(server.hits(), 0);
}
