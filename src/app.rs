// src/app.rs

use axum::{
    Json, Router,
    extract::Extension,
    http::{HeaderValue, Method, header},
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::auth::jwt::JwtManager;
use crate::auth::services::AuthService;
use crate::db::Repositories;
use crate::docs::ApiDoc;
use crate::handlers::auth::{change_password, change_username, login, logout, me};
use crate::handlers::health::health;
use crate::handlers::{admin, posts};
use crate::posts::services::PostService;

/// Authentication routes, nested under `/auth`
pub fn auth_routes(jwt_manager: JwtManager, auth_service: Arc<AuthService>) -> Router {
    // Public endpoints (state: AuthService)
    let public = Router::new()
        .route("/login", post(login))
        .with_state(auth_service.clone());

    // Protected endpoints (state: JwtManager) using AuthClaims
    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/username", patch(change_username))
        .route("/change-password", post(change_password))
        .with_state(jwt_manager)
        .layer(Extension(auth_service));

    public.merge(protected)
}

/// Read-only routes for blog readers
pub fn post_routes(post_service: Arc<PostService>) -> Router {
    Router::new()
        .route("/posts", get(posts::list_posts))
        .route("/posts/categories", get(posts::list_categories))
        .route("/posts/{slug}", get(posts::get_post))
        .with_state(post_service)
}

/// Post management routes, every one behind the bearer token
pub fn admin_routes(jwt_manager: JwtManager, post_service: Arc<PostService>) -> Router {
    Router::new()
        .route(
            "/admin/posts",
            get(admin::list_posts).post(admin::create_post),
        )
        .route(
            "/admin/posts/{id}",
            get(admin::get_post)
                .put(admin::update_post)
                .delete(admin::delete_post),
        )
        // JwtManager as state for the AuthClaims extractor
        .with_state(jwt_manager)
        .layer(Extension(post_service))
}

fn cors_layer(origin: Option<HeaderValue>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match origin {
        Some(origin) => cors.allow_origin(origin),
        None => cors,
    }
}

/// Builds the complete application
pub fn build_router(
    jwt_manager: JwtManager,
    repositories: &Repositories,
    cors_origin: Option<HeaderValue>,
) -> Router {
    let auth_service = Arc::new(AuthService::new(jwt_manager.clone(), repositories));
    let post_service = Arc::new(PostService::new(repositories));

    Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/auth", auth_routes(jwt_manager.clone(), auth_service))
        .merge(post_routes(post_service.clone()))
        .merge(admin_routes(jwt_manager, post_service))
        .layer(cors_layer(cors_origin))
        // Global tracing middleware
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use blog_api::LoginRequest;
    use lambda_http::tower::ServiceExt; // for oneshot
    use serde_json::{Value, json};

    const OWNER: &str = "owner";
    const PASSWORD: &str = "OwnerPass123";

    fn test_jwt() -> JwtManager {
        JwtManager::new("test_secret_for_blog_routes", 1)
    }

    /// Router over a fresh in-memory store with a seeded owner, plus a valid token.
    fn test_app() -> (Router, String) {
        let jwt = test_jwt();
        let repositories = Repositories::in_memory();

        let auth_service = AuthService::new(jwt.clone(), &repositories);
        auth_service
            .ensure_owner(OWNER, PASSWORD)
            .expect("seed owner");
        let token = auth_service
            .login(&LoginRequest {
                username: OWNER.to_string(),
                password: PASSWORD.to_string(),
            })
            .expect("login")
            .access_token;

        (build_router(jwt, &repositories, None), token)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri).method(method);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn new_post(title: &str, category: &str, published: bool) -> Value {
        json!({
            "title": title,
            "description": "Summary",
            "content": "Body",
            "category": category,
            "published": published
        })
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (app, _) = test_app();

        let (status, body) = send(&app, "GET", "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let (app, _) = test_app();

        let (status, body) = send(&app, "GET", "/openapi.json", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/admin/posts/{id}"].is_object());
        assert!(body["paths"]["/auth/username"].is_object());
    }

    #[tokio::test]
    async fn login_returns_bearer_token() {
        let (app, _) = test_app();
        let req = Request::builder()
            .uri("/auth/login")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"username": OWNER, "password": PASSWORD}).to_string(),
            ))
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let (app, _) = test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"username": OWNER, "password": "nope"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn admin_routes_require_authorization() {
        let (app, _) = test_app();

        let (status, body) = send(&app, "GET", "/admin/posts", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "INVALID_TOKEN_FORMAT");

        let (status, body) = send(&app, "GET", "/admin/posts", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn me_returns_current_user() {
        let (app, token) = test_app();

        let (status, body) = send(&app, "GET", "/auth/me", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], OWNER);
        assert!(body.get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn logout_requires_and_accepts_token() {
        let (app, token) = test_app();

        let (status, _) = send(&app, "POST", "/auth/logout", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(&app, "POST", "/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Logged out successfully");
    }

    #[tokio::test]
    async fn change_username_reports_field_errors() {
        let (app, token) = test_app();

        let (status, body) = send(
            &app,
            "PATCH",
            "/auth/username",
            Some(&token),
            Some(json!({"currentPassword": PASSWORD, "newUsername": "ab"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "newUsername must be at least 3 characters");
        assert_eq!(body["errors"][0]["field"], "newUsername");
    }

    #[tokio::test]
    async fn change_username_checks_current_password() {
        let (app, token) = test_app();

        let (status, body) = send(
            &app,
            "PATCH",
            "/auth/username",
            Some(&token),
            Some(json!({"currentPassword": "WrongPass1", "newUsername": "writer"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "INVALID_PASSWORD");
    }

    #[tokio::test]
    async fn change_username_succeeds() {
        let (app, token) = test_app();

        let (status, body) = send(
            &app,
            "PATCH",
            "/auth/username",
            Some(&token),
            Some(json!({"currentPassword": PASSWORD, "newUsername": "writer"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "writer");
    }

    #[tokio::test]
    async fn change_password_rejects_weak_password() {
        let (app, token) = test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/auth/change-password",
            Some(&token),
            Some(json!({"currentPassword": PASSWORD, "newPassword": "alllowercase"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "WEAK_PASSWORD");
    }

    #[tokio::test]
    async fn post_crud_round_trip() {
        let (app, token) = test_app();

        let (status, created) = send(
            &app,
            "POST",
            "/admin/posts",
            Some(&token),
            Some(new_post("First Post", "rust", true)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["slug"], "first-post");
        let id = created["id"].as_str().unwrap().to_string();

        let (status, public) = send(&app, "GET", "/posts/first-post", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(public["id"], id.as_str());

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/admin/posts/{id}"),
            Some(&token),
            Some(json!({"content": "Edited body"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["content"], "Edited body");
        assert_eq!(updated["title"], "First Post");

        let (status, body) = send(
            &app,
            "DELETE",
            &format!("/admin/posts/{id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = send(
            &app,
            "GET",
            &format!("/admin/posts/{id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn create_post_validates_payload() {
        let (app, token) = test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/admin/posts",
            Some(&token),
            Some(new_post("", "rust", true)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["errors"][0]["field"], "title");
    }

    #[tokio::test]
    async fn drafts_stay_off_public_routes() {
        let (app, token) = test_app();
        send(
            &app,
            "POST",
            "/admin/posts",
            Some(&token),
            Some(new_post("Hidden Draft", "rust", false)),
        )
        .await;

        let (status, list) = send(&app, "GET", "/posts", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([]));

        let (status, _) = send(&app, "GET", "/posts/hidden-draft", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, all) = send(&app, "GET", "/admin/posts", Some(&token), None).await;
        assert_eq!(all.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn public_list_filters_by_category() {
        let (app, token) = test_app();
        for (title, category) in [("One", "rust"), ("Two", "life")] {
            send(
                &app,
                "POST",
                "/admin/posts",
                Some(&token),
                Some(new_post(title, category, true)),
            )
            .await;
        }

        let (_, rust) = send(&app, "GET", "/posts?category=rust", None, None).await;
        assert_eq!(rust.as_array().unwrap().len(), 1);
        assert_eq!(rust[0]["title"], "One");

        // Empty category means no filter
        let (_, all) = send(&app, "GET", "/posts?category=", None, None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (_, categories) = send(&app, "GET", "/posts/categories", None, None).await;
        assert_eq!(categories, json!(["life", "rust"]));
    }

    #[tokio::test]
    async fn post_titled_like_a_static_route_stays_reachable() {
        let (app, token) = test_app();

        let (_, created) = send(
            &app,
            "POST",
            "/admin/posts",
            Some(&token),
            Some(new_post("Categories", "meta", true)),
        )
        .await;
        let slug = created["slug"].as_str().unwrap().to_string();
        assert_ne!(slug, "categories");

        let (status, post) = send(&app, "GET", &format!("/posts/{slug}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(post["title"], "Categories");

        let (_, categories) = send(&app, "GET", "/posts/categories", None, None).await;
        assert_eq!(categories, json!(["meta"]));
    }

    #[tokio::test]
    async fn malformed_post_id_is_invalid_input() {
        let (app, token) = test_app();

        let (status, body) =
            send(&app, "GET", "/admin/posts/not-a-uuid", Some(&token), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
    }
}
