//! Admin login, logout and access control.
//!
//! These run without a database, so they stay away from `GET /admin` once
//! logged in (the dashboard queries submissions). The live tests cover it.

use axum::http::{StatusCode, header};
use portfolio_integration_tests::{
    ADMIN_PASSWORD, ADMIN_USERNAME, TestClient, body_text, location, offset_for_local_hour,
    test_config,
};

const LOGIN_FAILED: &str = "Invalid username or password";

#[tokio::test]
async fn test_admin_without_login_redirects_home() {
    let mut client = TestClient::at_local_hour(12);

    let resp = client.get("/admin").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
}

#[tokio::test]
async fn test_admin_endpoints_reject_anonymous() {
    let mut client = TestClient::at_local_hour(12);

    assert_eq!(
        client.get("/admin/submissions").await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        client.get("/admin/submissions/events").await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        client
            .post_form("/admin/submissions/1/read", &[])
            .await
            .status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        client
            .post_form("/admin/submissions/1/delete", &[])
            .await
            .status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_login_page_renders() {
    let mut client = TestClient::at_local_hour(12);

    let resp = client.get("/admin/login").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains(r#"name="username""#));
    assert!(html.contains(r#"type="password""#));
}

#[tokio::test]
async fn test_wrong_credentials_rerender_form() {
    let mut client = TestClient::at_local_hour(12);

    for (username, password) in [
        (ADMIN_USERNAME, "not-the-password"),
        ("someone", ADMIN_PASSWORD),
        ("", ""),
    ] {
        let resp = client
            .post_form(
                "/admin/login",
                &[("username", username), ("password", password)],
            )
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let html = body_text(resp).await;
        assert!(html.contains(LOGIN_FAILED));
    }

    assert_eq!(
        client.get("/admin/submissions/events").await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_login_grants_admin_session() {
    let mut client = TestClient::at_local_hour(12);

    let resp = client.login().await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/admin"));
    assert!(client.has_session());

    // Already logged in: the form sends us on
    let resp = client.get("/admin/login").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/admin"));

    let resp = client.get("/admin/submissions/events").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/event-stream"));

    // Pages show the admin link
    let html = body_text(client.get("/about").await).await;
    assert!(html.contains(r#"href="/admin""#));
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let mut client = TestClient::at_local_hour(12);
    client.login().await;

    for _ in 0..2 {
        let resp = client.post_form("/admin/logout", &[]).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), Some("/"));
    }

    let resp = client.get("/admin").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
    assert_eq!(
        client.get("/admin/submissions/events").await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_logout_without_login() {
    let mut client = TestClient::at_local_hour(12);

    let resp = client.post_form("/admin/logout", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
}

#[tokio::test]
async fn test_theme_choice_survives_login() {
    let mut client = TestClient::at_local_hour(12);

    client.post_json("/theme/toggle").await;
    client.login().await;

    let html = body_text(client.get("/about").await).await;
    assert!(html.contains(r#"class="theme-dark""#));
}

#[tokio::test]
async fn test_login_limit_keys_on_peer_without_trusted_proxy() {
    let mut config = test_config(offset_for_local_hour(12));
    config.trust_proxy_headers = false;
    // Every request still carries a fresh X-Forwarded-For
    let mut client = TestClient::with_config(config)
        .with_peer("192.0.2.10:40000".parse().expect("valid socket address"));

    for _ in 0..5 {
        let resp = client
            .post_form(
                "/admin/login",
                &[("username", ADMIN_USERNAME), ("password", "wrong")],
            )
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    let resp = client.login().await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}
