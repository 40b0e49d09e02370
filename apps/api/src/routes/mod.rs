pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::roadmap::handlers as roadmap;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/me", get(auth::handle_me))
        // Roadmap / task tracking
        .route("/api/auth/update-task", put(roadmap::handle_update_task))
        .route("/api/auth/roadmap", put(roadmap::handle_replace_roadmap))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    // ─── Test helpers ───────────────────────────────────────────────────────

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("x-auth-token", token);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register_alice(app: &Router) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/auth/register",
            Some(json!({"username": "alice", "email": "a@x.com", "password": "pw123"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    async fn update_task(
        app: &Router,
        user_id: &str,
        week: i64,
        task: i64,
        done: bool,
    ) -> (StatusCode, Value) {
        send(
            app,
            Method::PUT,
            "/api/auth/update-task",
            Some(json!({
                "userId": user_id,
                "weekIndex": week,
                "taskIndex": task,
                "completed": done
            })),
            None,
        )
        .await
    }

    // ─── Scenarios ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_health() {
        let app = build_router(AppState::for_tests());
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_register_then_duplicate() {
        let app = build_router(AppState::for_tests());

        let body = register_alice(&app).await;
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["user"]["username"], "alice");
        assert_eq!(body["user"]["email"], "a@x.com");
        assert_eq!(body["user"]["roadmap"], json!([]));
        assert!(body["user"].get("password").is_none());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            Some(json!({"username": "alice2", "email": "a@x.com", "password": "other"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"msg": "User already exists"}));
    }

    #[tokio::test]
    async fn test_login_scenarios() {
        let app = build_router(AppState::for_tests());
        let registered = register_alice(&app).await;

        let (status, wrong_pw) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            Some(json!({"email": "a@x.com", "password": "wrongpw"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(wrong_pw, json!({"msg": "Invalid Credentials"}));

        let (status, unknown) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            Some(json!({"email": "nobody@x.com", "password": "pw123"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(unknown, wrong_pw);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            Some(json!({"email": "a@x.com", "password": "pw123"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].is_string());
        assert_eq!(body["user"]["id"], registered["user"]["id"]);
        assert_eq!(body["user"]["username"], "alice");
        assert_eq!(body["user"]["roadmap"], json!([]));
        assert_eq!(body["user"]["analysis"], json!({}));
    }

    #[tokio::test]
    async fn test_toggle_scenario() {
        let app = build_router(AppState::for_tests());
        let registered = register_alice(&app).await;
        let user_id = registered["user"]["id"].as_str().unwrap().to_string();

        let (status, body) = update_task(&app, &user_id, 3, 2, true).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["w3-t2"]));

        let (status, body) = update_task(&app, &user_id, 3, 2, false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_toggle_unknown_user() {
        let app = build_router(AppState::for_tests());
        let (status, body) = update_task(&app, "nonexistent-id", 0, 0, true).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"msg": "User not found"}));
    }

    #[tokio::test]
    async fn test_me_requires_valid_token() {
        let app = build_router(AppState::for_tests());
        let registered = register_alice(&app).await;
        let token = registered["token"].as_str().unwrap();

        let (status, body) = send(&app, Method::GET, "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"msg": "No token, authorization denied"}));

        let (status, body) =
            send(&app, Method::GET, "/api/auth/me", None, Some("not.a.jwt")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"msg": "Token is not valid"}));

        let (status, body) = send(&app, Method::GET, "/api/auth/me", None, Some(token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "a@x.com");
    }

    #[tokio::test]
    async fn test_bearer_header_accepted() {
        let app = build_router(AppState::for_tests());
        let registered = register_alice(&app).await;
        let token = registered["token"].as_str().unwrap();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_replace_roadmap_then_login_echoes_it() {
        let app = build_router(AppState::for_tests());
        let registered = register_alice(&app).await;
        let token = registered["token"].as_str().unwrap();
        let user_id = registered["user"]["id"].as_str().unwrap().to_string();

        update_task(&app, &user_id, 0, 0, true).await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/auth/roadmap",
            Some(json!({
                "targetRole": "Backend Engineer",
                "analysis": {"missing_skills": ["GraphQL"], "current_level": "Junior"},
                "roadmap": [{
                    "week": 1,
                    "title": "APIs",
                    "description": "Schema design",
                    "tasks": ["Read the GraphQL spec", "Build a resolver"],
                    "resources": ["https://graphql.org/learn"]
                }]
            })),
            Some(token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["completedTasks"], json!([]));
        assert_eq!(body["roadmap"][0]["completed"], json!(false));

        let (_, login) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            Some(json!({"email": "a@x.com", "password": "pw123"})),
            None,
        )
        .await;
        assert_eq!(login["user"]["targetRole"], "Backend Engineer");
        assert_eq!(login["user"]["roadmap"][0]["tasks"][1], "Build a resolver");
        let keys: Vec<&String> = login["user"]["analysis"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, vec!["missing_skills", "current_level"]);
    }

    #[tokio::test]
    async fn test_replace_roadmap_requires_token() {
        let app = build_router(AppState::for_tests());
        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/auth/roadmap",
            Some(json!({"roadmap": []})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_replace_roadmap_accepts_nulls() {
        let app = build_router(AppState::for_tests());
        let registered = register_alice(&app).await;
        let token = registered["token"].as_str().unwrap();

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/auth/roadmap",
            Some(json!({"analysis": null, "roadmap": []})),
            Some(token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"], json!({}));

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/auth/roadmap",
            Some(json!({
                "roadmap": [{
                    "week": 1,
                    "title": "Foundations",
                    "description": null,
                    "tasks": ["Install Rust"],
                    "resources": null
                }]
            })),
            Some(token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["roadmap"][0]["description"], "");
        assert_eq!(body["roadmap"][0]["resources"], json!([]));
        assert_eq!(body["roadmap"][0]["tasks"][0], "Install Rust");
    }
}
