use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, require_superuser};
use crate::state::AppState;

/// Full application router, shared by the binary and the tests.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(public::health))
        .merge(user_public_routes())
        .merge(user_self_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn user_public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users/register", post(public::user_register))
        .route("/api/v1/users/login", post(public::user_login))
}

fn user_self_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/users/self",
            get(protected::self_get).delete(protected::self_delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    use elevated::admin;

    // The last layer added runs first: JWT, then the gate.
    Router::new()
        .route("/api/v1/admin/users", get(admin::user_list).post(admin::user_create))
        .route(
            "/api/v1/admin/users/:id",
            put(admin::user_update).delete(admin::user_delete),
        )
        .route("/api/v1/admin/users/:id/superuser", put(admin::user_set_superuser))
        .route_layer(middleware::from_fn(require_superuser))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::{generate_jwt, Claims, Role};
    use crate::database::models::UserCreate;
    use crate::database::{GroupStore, MemoryStore, Store, UserStore};
    use crate::testing::{fast_hasher, test_config, FlakyStore};

    async fn seed_user(store: &MemoryStore, email: &str, is_superuser: bool) -> (Uuid, Uuid) {
        let group = store.create_group("Admin Group").await.unwrap();
        let user = store
            .create(UserCreate {
                name: "Someone".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                is_superuser,
                is_owner: true,
                group_id: group.id,
            })
            .await
            .unwrap();
        (user.id, group.id)
    }

    fn app_with(store: impl Store + 'static) -> Router {
        app(AppState::new(Arc::new(store), fast_hasher(), test_config()))
    }

    fn token(user_id: Uuid, group_id: Uuid) -> String {
        let claims = Claims::new(user_id, group_id, vec![Role::User], 1).unwrap();
        generate_jwt(&claims, &test_config().security).unwrap()
    }

    fn request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json");
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
        builder.body(body).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn admin_routes_reject_plain_users() {
        let store = MemoryStore::new();
        let (user_id, group_id) = seed_user(&store, "plain@x.test", false).await;

        let response = app_with(store)
            .oneshot(request("GET", "/api/v1/admin/users", &token(user_id, group_id), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_routes_require_a_token() {
        let response = app_with(MemoryStore::new())
            .oneshot(Request::get("/api/v1/admin/users").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn list_uses_results_and_count() {
        let store = MemoryStore::new();
        let (admin_id, group_id) = seed_user(&store, "root@x.test", true).await;

        let response = app_with(store)
            .oneshot(request("GET", "/api/v1/admin/users", &token(admin_id, group_id), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["count"], 1);
        assert_eq!(body["data"]["results"][0]["email"], "root@x.test");
    }

    #[tokio::test]
    async fn partial_update_surfaces_its_own_code() {
        let memory = MemoryStore::new();
        let (admin_id, group_id) = seed_user(&memory, "root@x.test", true).await;
        let (target_id, _) = seed_user(&memory, "target@x.test", false).await;
        let store = FlakyStore::new(memory.clone());
        store.fail_set_superuser();

        let response = app_with(store)
            .oneshot(request(
                "PUT",
                &format!("/api/v1/admin/users/{target_id}"),
                &token(admin_id, group_id),
                Some(json!({ "name": "Target", "email": "target@x.test", "is_superuser": true })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "PRIVILEGE_NOT_APPLIED");
        assert_eq!(body["user_id"], json!(target_id));

        let target = memory.get_by_id(target_id).await.unwrap();
        assert_eq!(target.name, "Target");
        assert!(!target.is_superuser);
    }

    #[tokio::test]
    async fn self_delete_through_admin_route_is_forbidden() {
        let store = MemoryStore::new();
        let (admin_id, group_id) = seed_user(&store, "root@x.test", true).await;

        let response = app_with(store.clone())
            .oneshot(request(
                "DELETE",
                &format!("/api/v1/admin/users/{admin_id}"),
                &token(admin_id, group_id),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(store.get_by_id(admin_id).await.is_ok());
    }

    #[tokio::test]
    async fn demo_mode_blocks_both_delete_routes() {
        let store = MemoryStore::new();
        let (admin_id, group_id) = seed_user(&store, "root@x.test", true).await;
        let (target_id, target_group) = seed_user(&store, "target@x.test", false).await;

        let mut config = test_config();
        config.security.demo = true;
        let app = app(AppState::new(Arc::new(store.clone()), fast_hasher(), config));

        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/v1/admin/users/{target_id}"),
                &token(admin_id, group_id),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(request("DELETE", "/api/v1/users/self", &token(target_id, target_group), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["code"], "FORBIDDEN");

        assert!(store.get_by_id(target_id).await.is_ok());
    }
}
