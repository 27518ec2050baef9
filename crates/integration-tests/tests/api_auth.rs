//! Gate behaviour at the HTTP boundary.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use integration_tests::fixtures::{body_text, get, location, token_for, TestApp};

#[tokio::test]
async fn missing_token_redirects_to_login() {
    let app = TestApp::new();

    for uri in ["/dashboard", "/search?query=math", "/dashboard/get-board-data?name=x"] {
        let response = app
            .send(Request::get(uri).body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/auth/login");
    }
}

#[tokio::test]
async fn invalid_token_redirects_to_login() {
    let app = TestApp::new();

    let response = app.send(get("/dashboard", "not-a-token")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn token_without_profile_redirects_to_login() {
    let app = TestApp::new();

    let response = app.send(get("/dashboard", &token_for("stranger"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn id_token_cookie_and_bearer_header_are_accepted() {
    let app = TestApp::new();
    let token = app.sign_in("u1", "Ada").await;

    let by_cookie = Request::get("/dashboard")
        .header(header::COOKIE, format!("theme=dark; idToken={token}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(by_cookie).await.status(), StatusCode::OK);

    let by_header = Request::get("/dashboard")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.send(by_header).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Ada"));
}

#[tokio::test]
async fn health_and_metrics_are_public() {
    let app = TestApp::new();

    let health = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(body_text(health).await, "ok");

    app.send(Request::get("/dashboard").body(Body::empty()).unwrap()).await;
    let metrics = app
        .send(Request::get("/metrics").body(Body::empty()).unwrap())
        .await;
    assert_eq!(metrics.status(), StatusCode::OK);
    assert!(body_text(metrics).await.contains("whiteboard_unauthenticated_requests_total 1"));
}
