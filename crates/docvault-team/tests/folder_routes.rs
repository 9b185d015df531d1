use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use docvault_team::models::{Document, Role, Team, TeamMembership, User};
use docvault_team::routes::{configure, VaultState};
use docvault_team::services::MemoryStore;
use docvault_team::{AuthenticatedUserId, VaultConfig};

const TEAM: &str = "acme";

async fn app() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::new());
    let mut team = Team::new("Acme".into(), "admin".into());
    team.id = TEAM.to_string();
    store.put_team(team).await;

    for (id, role) in [
        ("admin", Role::Admin),
        ("emp", Role::Employee),
        ("con", Role::Contractor),
    ] {
        let mut user = User::new(id, id, format!("{}@acme.test", id));
        user.join_team(TeamMembership::new(TEAM, role)).unwrap();
        store.put_user(user).await;
    }

    let router = configure(VaultState::new(store.clone(), VaultConfig::default()));
    (store, router)
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.extension(AuthenticatedUserId(user.to_string()));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(router: &Router, user: &str, body: Value) -> (StatusCode, Value) {
    send(
        router,
        Method::POST,
        &format!("/teams/{}/folders", TEAM),
        Some(user),
        Some(body),
    )
    .await
}

#[tokio::test]
async fn test_requests_without_identity_are_rejected() {
    let (_, router) = app().await;
    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/teams/{}/folders", TEAM),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let (status, _) = send(
        &router,
        Method::GET,
        &format!("/teams/{}/folders", TEAM),
        Some("ghost"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_by_role() {
    let (_, router) = app().await;
    let (status, finance) = create(&router, "admin", json!({"name": "Finance"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(finance["path"], "finance");
    assert_eq!(finance["color"], "blue");
    assert_eq!(finance["permissions"][0]["role"], "ADMIN");

    let (status, reports) = create(
        &router,
        "admin",
        json!({"name": "Reports", "parentFolderId": finance["id"]}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reports["path"], "finance/reports");
    assert_eq!(reports["lineage"].as_array().unwrap().len(), 2);

    let uri = format!("/teams/{}/folders", TEAM);
    let (_, listing) = send(&router, Method::GET, &uri, Some("emp"), None).await;
    assert_eq!(listing["count"], 1);
    let (_, listing) = send(&router, Method::GET, &uri, Some("con"), None).await;
    assert_eq!(listing["count"], 0);

    let uri = format!(
        "/teams/{}/folders?parent={}",
        TEAM,
        finance["id"].as_str().unwrap()
    );
    let (_, listing) = send(&router, Method::GET, &uri, Some("emp"), None).await;
    assert_eq!(listing["folders"][0]["name"], "Reports");
}

#[tokio::test]
async fn test_create_validation_and_missing_parent() {
    let (store, router) = app().await;
    let (status, body) = create(&router, "admin", json!({"name": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = create(
        &router,
        "admin",
        json!({"name": "X", "permissions": [{"role": "OWNER", "actions": ["view"]}]}),
    )
    .await;
    assert!(status.is_client_error());

    let (status, body) = create(
        &router,
        "admin",
        json!({"name": "Orphan", "parentFolderId": "missing"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "PARENT_NOT_FOUND");
    assert_eq!(store.folder_count().await, 0);

    let (status, _) = create(&router, "con", json!({"name": "Mine"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_contractor_access_via_settings() {
    let (_, router) = app().await;
    let (_, folder) = create(&router, "admin", json!({"name": "Vendors"})).await;
    let id = folder["id"].as_str().unwrap();

    let (status, _) = send(&router, Method::GET, &format!("/folders/{}", id), Some("con"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &router,
        Method::PUT,
        &format!("/folders/{}/settings", id),
        Some("emp"),
        Some(json!({"contractorAccess": ["con"]})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(
        &router,
        Method::PUT,
        &format!("/folders/{}/settings", id),
        Some("admin"),
        Some(json!({"contractorAccess": ["con"], "color": "green"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["color"], "green");

    let (status, _) = send(&router, Method::GET, &format!("/folders/{}", id), Some("con"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, access) = send(
        &router,
        Method::GET,
        &format!("/folders/{}/access?action=edit", id),
        Some("con"),
        None,
    )
    .await;
    assert_eq!(access["allowed"], false);
}

#[tokio::test]
async fn test_recursive_delete_over_http() {
    let (store, router) = app().await;
    let (_, root) = create(&router, "admin", json!({"name": "Projects"})).await;
    let (_, child) = create(
        &router,
        "admin",
        json!({"name": "Alpha", "parentFolderId": root["id"]}),
    )
    .await;
    store
        .put_document(Document::new(
            TEAM.into(),
            child["id"].as_str().unwrap().into(),
            "brief.pdf".into(),
            "admin".into(),
        ))
        .await;

    let root_id = root["id"].as_str().unwrap();
    let (status, plan) = send(
        &router,
        Method::GET,
        &format!("/folders/{}/deletion-plan", root_id),
        Some("admin"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["folders"].as_array().unwrap().len(), 2);
    assert_eq!(plan["documents"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &router,
        Method::DELETE,
        &format!("/folders/{}", root_id),
        Some("emp"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(store.folder_count().await, 2);

    let (status, deleted) = send(
        &router,
        Method::DELETE,
        &format!("/folders/{}", root_id),
        Some("admin"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["deletedDocuments"], 1);
    assert_eq!(store.folder_count().await, 0);
    assert_eq!(store.document_count().await, 0);
}

#[tokio::test]
async fn test_team_listings() {
    let (_, router) = app().await;
    let (status, members) = send(
        &router,
        Method::GET,
        &format!("/teams/{}/members", TEAM),
        Some("emp"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members["count"], 3);

    let uri = format!("/teams/{}/contractors", TEAM);
    let (status, contractors) = send(&router, Method::GET, &uri, Some("admin"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(contractors["contractors"][0]["id"], "con");

    let (status, _) = send(&router, Method::GET, &uri, Some("emp"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_employee_cannot_choose_grants() {
    let (store, router) = app().await;
    let (status, body) = create(
        &router,
        "emp",
        json!({
            "name": "Mine",
            "permissions": [{"role": "EMPLOYEE", "actions": ["view", "edit", "delete"]}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "PERMISSION_DENIED");
    assert_eq!(store.folder_count().await, 0);

    let (status, folder) = create(&router, "emp", json!({"name": "Mine"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &router,
        Method::GET,
        &format!("/folders/{}", folder["id"].as_str().unwrap()),
        Some("admin"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_deletion_plan_hides_restricted_subfolders() {
    let (_, router) = app().await;
    let (_, root) = create(
        &router,
        "admin",
        json!({
            "name": "Projects",
            "permissions": [
                {"role": "ADMIN", "actions": ["view", "edit", "delete"]},
                {"role": "EMPLOYEE", "actions": ["view", "edit", "delete"]}
            ]
        }),
    )
    .await;
    let (status, secret) = create(
        &router,
        "admin",
        json!({
            "name": "Secret Payroll",
            "parentFolderId": root["id"],
            "permissions": [{"role": "ADMIN", "actions": ["view", "edit", "delete"]}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &router,
        Method::GET,
        &format!("/folders/{}", secret["id"].as_str().unwrap()),
        Some("emp"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/folders/{}/deletion-plan", root["id"].as_str().unwrap());
    let (status, body) = send(&router, Method::GET, &uri, Some("emp"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(!body.to_string().contains("Secret Payroll"));

    let (status, plan) = send(&router, Method::GET, &uri, Some("admin"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["folders"][0]["name"], "Secret Payroll");
}
