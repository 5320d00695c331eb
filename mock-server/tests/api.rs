use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::{Service, ServiceExt};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, auth: Option<&str>, body: Option<Value>) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(http::header::AUTHORIZATION, auth);
    }
    builder
        .body(body.map(|b| b.to_string()).unwrap_or_default())
        .unwrap()
}

async fn send(app: &mut Router, req: Request<String>) -> axum::response::Response {
    ServiceExt::<Request<String>>::ready(app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap()
}

/// Sign up and return `(token, access_token, user_id)`.
async fn signup(app: &mut Router, email: &str, account_type: &str) -> (String, String, String) {
    let resp = send(
        app,
        request(
            "POST",
            "/api/auth/signup/",
            None,
            Some(json!({
                "email": email,
                "password": "long-enough",
                "full_name": email.split('@').next().unwrap(),
                "account_type": account_type,
            })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    (
        body["token"].as_str().unwrap().to_string(),
        body["access_token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

// --- health ---

#[tokio::test]
async fn health_returns_ok_json() {
    let resp = app()
        .oneshot(request("GET", "/api/health/", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn ping_returns_plain_text() {
    let resp = app()
        .oneshot(request("GET", "/api/ping/", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "pong");
}

#[tokio::test]
async fn debug_error_is_plain_text_500() {
    let resp = app()
        .oneshot(request("GET", "/api/debug/error/", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_bytes(resp).await, "Internal Server Error");
}

// --- auth ---

#[tokio::test]
async fn missing_credentials_is_401_with_detail() {
    let resp = app()
        .oneshot(request("GET", "/api/profile/", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp).await["detail"],
        "Authentication credentials were not provided."
    );
}

#[tokio::test]
async fn signup_rejects_short_password() {
    let resp = app()
        .oneshot(request(
            "POST",
            "/api/auth/signup/",
            None,
            Some(json!({
                "email": "a@b.c",
                "password": "short",
                "full_name": "A",
                "account_type": "worker",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await.get("password").is_some());
}

#[tokio::test]
async fn each_credential_family_needs_its_scheme() {
    let mut app = app();
    let (token, access, _) = signup(&mut app, "w@example.com", "worker").await;

    for (auth, expected) in [
        (format!("Token {token}"), StatusCode::OK),
        (format!("Bearer {access}"), StatusCode::OK),
        (format!("Bearer {token}"), StatusCode::UNAUTHORIZED),
        (format!("Token {access}"), StatusCode::UNAUTHORIZED),
        ("Basic d3Vzcjpw".to_string(), StatusCode::UNAUTHORIZED),
    ] {
        let resp = send(&mut app, request("GET", "/api/profile/", Some(&auth), None)).await;
        assert_eq!(resp.status(), expected, "{auth}");
    }
}

#[tokio::test]
async fn login_with_bad_password_is_401() {
    let mut app = app();
    signup(&mut app, "w@example.com", "worker").await;
    let resp = send(
        &mut app,
        request(
            "POST",
            "/api/auth/login/",
            None,
            Some(json!({"email": "w@example.com", "password": "nope"})),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({"detail": "Invalid credentials"}));
}

// --- jobs ---

#[tokio::test]
async fn job_lifecycle() {
    let mut app = app();
    let (company, _, _) = signup(&mut app, "c@example.com", "company").await;
    let (worker, _, _) = signup(&mut app, "w@example.com", "worker").await;
    let company = format!("Token {company}");
    let worker = format!("Token {worker}");

    let new_job = json!({
        "title": "Roofer",
        "description": "Shingles",
        "job_type": "full_time",
        "salary_min": 40000,
        "salary_max": 30000
    });
    let resp = send(&mut app, request("POST", "/api/jobs/", Some(&company), Some(new_job))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await.get("salary_max").is_some());

    let new_job = json!({"title": "Roofer", "description": "Shingles", "job_type": "full_time"});
    let resp = send(
        &mut app,
        request("POST", "/api/jobs/", Some(&worker), Some(new_job.clone())),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = send(&mut app, request("POST", "/api/jobs/", Some(&company), Some(new_job))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let job = body_json(resp).await;
    let id = job["id"].as_str().unwrap().to_string();
    assert_eq!(job["is_active"], true);

    // public listing, no credentials
    let resp = send(&mut app, request("GET", "/api/jobs/public/?job_type=full_time", None, None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["next"], Value::Null);
    assert_eq!(page["previous"], Value::Null);

    // apply
    let apply_uri = format!("/api/jobs/{id}/apply/");
    let resp = send(&mut app, request("POST", &apply_uri, Some(&worker), Some(json!({})))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["status"], "pending");
    let resp = send(&mut app, request("POST", &apply_uri, Some(&worker), Some(json!({})))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let resp = send(&mut app, request("POST", &apply_uri, Some(&company), Some(json!({})))).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // deactivate, then it disappears from the public list
    let job_uri = format!("/api/jobs/{id}/");
    let resp = send(
        &mut app,
        request("PATCH", &job_uri, Some(&company), Some(json!({"is_active": false}))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(&mut app, request("GET", "/api/jobs/public/", None, None)).await;
    assert_eq!(body_json(resp).await["count"], 0);

    // delete
    let resp = send(&mut app, request("DELETE", &job_uri, Some(&worker), None)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = send(&mut app, request("DELETE", &job_uri, Some(&company), None)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
    let resp = send(&mut app, request("GET", &job_uri, Some(&company), None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_jobs_paginate_by_ten() {
    let mut app = app();
    let (company, _, _) = signup(&mut app, "c@example.com", "company").await;
    let company = format!("Token {company}");
    for n in 0..12 {
        let job = json!({"title": format!("Job {n}"), "description": "d", "job_type": "contract"});
        let resp = send(&mut app, request("POST", "/api/jobs/", Some(&company), Some(job))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = send(&mut app, request("GET", "/api/jobs/public/", None, None)).await;
    let first = body_json(resp).await;
    assert_eq!(first["count"], 12);
    assert_eq!(first["results"].as_array().unwrap().len(), 10);
    assert_eq!(first["next"], 2);

    let resp = send(&mut app, request("GET", "/api/jobs/public/?page=2", None, None)).await;
    let second = body_json(resp).await;
    assert_eq!(second["results"].as_array().unwrap().len(), 2);
    assert_eq!(second["previous"], 1);
    assert_eq!(second["next"], Value::Null);

    let resp = send(&mut app, request("GET", "/api/jobs/public/?page=3", None, None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- messaging ---

#[tokio::test]
async fn messages_share_one_conversation_per_pair() {
    let mut app = app();
    let (a, _, a_id) = signup(&mut app, "a@example.com", "worker").await;
    let (b, _, b_id) = signup(&mut app, "b@example.com", "company").await;
    let a = format!("Token {a}");
    let b = format!("Token {b}");

    let resp = send(
        &mut app,
        request("POST", "/api/messages/", Some(&a), Some(json!({"recipient_id": b_id, "body": "hi"}))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let first = body_json(resp).await;

    let resp = send(
        &mut app,
        request("POST", "/api/messages/", Some(&b), Some(json!({"recipient_id": a_id, "body": "hello"}))),
    )
    .await;
    let second = body_json(resp).await;
    assert_eq!(first["conversation_id"], second["conversation_id"]);

    let resp = send(&mut app, request("GET", "/api/messages/conversations/", Some(&a), None)).await;
    let list = body_json(resp).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["last_message"]["body"], "hello");

    let resp = send(
        &mut app,
        request("POST", "/api/messages/", Some(&a), Some(json!({"recipient_id": a_id, "body": "me"}))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
