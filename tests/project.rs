use dokploy_provider::testing::{
    assert_plan_changes, assert_plan_creates, ProviderTester, TestError,
};
use dokploy_provider::ProviderError;
use httpmock::prelude::*;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_with_description_and_env() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/project.create")
                .header("x-api-key", "test-api-key")
                .json_body(json!({"name": "shop", "description": "Storefront", "env": "TZ=UTC"}));
            then.status(200)
                .json_body(json!({"projectId": "p-2", "name": "shop"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/project.one")
                .query_param("projectId", "p-2");
            then.status(200).json_body(json!({
                "projectId": "p-2",
                "name": "shop",
                "description": "Storefront",
                "env": "TZ=UTC",
                "environments": [{"environmentId": "e-5", "name": "production", "isDefault": true}]
            }));
        })
        .await;

    let tester = ProviderTester::configured(&server.base_url()).await.unwrap();
    let (plan, state) = tester
        .apply_create(
            "dokploy_project",
            json!({"name": "shop", "description": "Storefront", "env": "TZ=UTC"}),
        )
        .await
        .unwrap();

    assert_plan_creates(&plan);
    assert_eq!(
        state,
        json!({
            "id": "p-2",
            "name": "shop",
            "description": "Storefront",
            "env": "TZ=UTC",
            "default_environment_id": "e-5"
        })
    );
    create.assert_async().await;
}

#[tokio::test]
async fn test_update_clears_removed_attributes() {
    let server = MockServer::start_async().await;
    let update = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/project.update").json_body(json!({
                "projectId": "p-1",
                "name": "web",
                "description": "Public site",
                "env": ""
            }));
            then.status(200).json_body(json!(true));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/project.one")
                .query_param("projectId", "p-1");
            then.status(200).json_body(json!({
                "projectId": "p-1",
                "name": "web",
                "description": "Public site",
                "env": "",
                "environments": [{"environmentId": "e-1"}]
            }));
        })
        .await;

    let prior = json!({
        "id": "p-1",
        "name": "web",
        "description": null,
        "env": "DEBUG=1",
        "default_environment_id": "e-1"
    });
    let tester = ProviderTester::configured(&server.base_url()).await.unwrap();
    let (plan, state) = tester
        .apply_update(
            "dokploy_project",
            prior,
            json!({"name": "web", "description": "Public site"}),
        )
        .await
        .unwrap();

    assert_plan_changes(&plan, &["description", "env"]);
    assert_eq!(state["description"], "Public site");
    assert_eq!(state["env"], Value::Null);
    assert_eq!(state["default_environment_id"], "e-1");
    update.assert_async().await;
}

#[tokio::test]
async fn test_refresh_of_deleted_project_is_null() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/project.one");
            then.status(404)
                .json_body(json!({"message": "Project not found"}));
        })
        .await;

    let tester = ProviderTester::configured(&server.base_url()).await.unwrap();
    let state = tester
        .refresh("dokploy_project", json!({"id": "p-gone", "name": "web"}))
        .await
        .unwrap();
    assert_eq!(state, Value::Null);
}

#[tokio::test]
async fn test_delete_of_missing_project_succeeds() {
    let server = MockServer::start_async().await;
    let remove = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/project.remove");
            then.status(400)
                .json_body(json!({"error": {"json": {"message": "Project not found"}}}));
        })
        .await;

    let tester = ProviderTester::configured(&server.base_url()).await.unwrap();
    tester
        .apply_destroy("dokploy_project", json!({"id": "p-gone", "name": "web"}))
        .await
        .unwrap();
    remove.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_is_permission_denied() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/project.one");
            then.status(401)
                .json_body(json!({"message": "Unauthorized"}));
        })
        .await;

    let tester = ProviderTester::configured(&server.base_url()).await.unwrap();
    let err = tester
        .refresh("dokploy_project", json!({"id": "p-1"}))
        .await
        .unwrap_err();
    assert!(matches!(err, TestError::Provider(ProviderError::PermissionDenied(_))));
}

#[tokio::test]
async fn test_import_missing_project() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/project.one")
                .query_param("projectId", "p-404");
            then.status(404).body("");
        })
        .await;

    let tester = ProviderTester::configured(&server.base_url()).await.unwrap();
    let err = tester.import("dokploy_project", "p-404").await.unwrap_err();
    match err {
        TestError::Provider(ProviderError::NotFound(message)) => assert!(message.contains("p-404")),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_import_environment() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/environment.one")
                .query_param("environmentId", "e-9");
            then.status(200).json_body(json!({
                "environmentId": "e-9",
                "projectId": "p-1",
                "name": "staging",
                "description": ""
            }));
        })
        .await;

    let tester = ProviderTester::configured(&server.base_url()).await.unwrap();
    let imported = tester.import("dokploy_environment", "e-9").await.unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].resource_type, "dokploy_environment");
    assert_eq!(
        imported[0].state,
        json!({"id": "e-9", "project_id": "p-1", "name": "staging", "description": null})
    );
}

#[tokio::test]
async fn test_environment_create_then_clear_description() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/environment.create").json_body(json!({
                "projectId": "p-1",
                "name": "staging",
                "description": "Pre-release"
            }));
            then.status(200).json_body(json!({"environmentId": "e-9"}));
        })
        .await;
    let mut one = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/environment.one")
                .query_param("environmentId", "e-9");
            then.status(200).json_body(json!({
                "environmentId": "e-9",
                "projectId": "p-1",
                "name": "staging",
                "description": "Pre-release"
            }));
        })
        .await;

    let tester = ProviderTester::configured(&server.base_url()).await.unwrap();
    let (_, state) = tester
        .apply_create(
            "dokploy_environment",
            json!({"project_id": "p-1", "name": "staging", "description": "Pre-release"}),
        )
        .await
        .unwrap();
    assert_eq!(
        state,
        json!({"id": "e-9", "project_id": "p-1", "name": "staging", "description": "Pre-release"})
    );
    create.assert_async().await;

    let update = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/environment.update").json_body(json!({
                "environmentId": "e-9",
                "name": "staging",
                "description": ""
            }));
            then.status(200).json_body(json!(true));
        })
        .await;
    one.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/environment.one")
                .query_param("environmentId", "e-9");
            then.status(200).json_body(json!({
                "environmentId": "e-9",
                "projectId": "p-1",
                "name": "staging",
                "description": ""
            }));
        })
        .await;

    let (plan, state) = tester
        .apply_update(
            "dokploy_environment",
            state,
            json!({"project_id": "p-1", "name": "staging"}),
        )
        .await
        .unwrap();
    assert_plan_changes(&plan, &["description"]);
    assert_eq!(state["description"], Value::Null);
    update.assert_async().await;
}
