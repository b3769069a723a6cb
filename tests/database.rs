use dokploy_provider::testing::{
    assert_plan_changes, assert_plan_creates, assert_plan_replaces, ProviderTester,
};
use httpmock::prelude::*;
use serde_json::{json, Value};

#[tokio::test]
async fn test_postgres_create_chain() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/postgres.create").json_body(json!({
                "name": "db",
                "environmentId": "e-1",
                "dockerImage": "postgres:15",
                "databaseName": "app",
                "databaseUser": "app",
                "databasePassword": "s3cret"
            }));
            then.status(200)
                .json_body(json!({"postgresId": "pg-1", "name": "db", "appName": "db-x1"}));
        })
        .await;
    let settings = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/postgres.update")
                .json_body(json!({"postgresId": "pg-1", "env": "TZ=UTC", "memoryLimit": "512m"}));
            then.status(200).json_body(json!(true));
        })
        .await;
    let external_port = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/postgres.saveExternalPort")
                .json_body(json!({"postgresId": "pg-1", "externalPort": 5433}));
            then.status(200).json_body(json!(true));
        })
        .await;
    let deploy = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/postgres.deploy")
                .json_body(json!({"postgresId": "pg-1"}));
            then.status(200).json_body(json!(true));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/postgres.one")
                .query_param("postgresId", "pg-1");
            then.status(200).json_body(json!({
                "postgresId": "pg-1",
                "environmentId": "e-1",
                "name": "db",
                "appName": "db-x1",
                "description": "",
                "dockerImage": "postgres:15",
                "databaseName": "app",
                "databaseUser": "app",
                "externalPort": 5433,
                "env": "TZ=UTC",
                "memoryLimit": "512m",
                "applicationStatus": "running"
            }));
        })
        .await;

    let tester = ProviderTester::configured(&server.base_url()).await.unwrap();
    let (plan, state) = tester
        .apply_create(
            "dokploy_postgres",
            json!({
                "environment_id": "e-1",
                "name": "db",
                "database_name": "app",
                "database_user": "app",
                "database_password": "s3cret",
                "external_port": 5433.0,
                "env": "TZ=UTC",
                "memory_limit": "512m",
                "deploy_on_create": true
            }),
        )
        .await
        .unwrap();

    assert_plan_creates(&plan);
    assert_eq!(plan.planned_state["external_port"], json!(5433));

    assert_eq!(state["id"], "pg-1");
    assert_eq!(state["app_name"], "db-x1");
    assert_eq!(state["description"], Value::Null);
    // The API never echoes the password back.
    assert_eq!(state["database_password"], "s3cret");
    assert_eq!(state["external_port"], 5433);
    assert_eq!(state["application_status"], "running");
    assert!(state.get("database_root_password").is_none());

    create.assert_async().await;
    settings.assert_async().await;
    external_port.assert_async().await;
    deploy.assert_async().await;
}

#[tokio::test]
async fn test_redis_create_skips_optional_steps() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/redis.create").json_body(json!({
                "name": "cache",
                "environmentId": "e-1",
                "dockerImage": "redis:7",
                "databasePassword": "pw"
            }));
            then.status(200).json_body(json!({"redisId": "r-1"}));
        })
        .await;
    let follow_ups = [
        "/api/redis.update",
        "/api/redis.saveExternalPort",
        "/api/redis.deploy",
    ];
    let mut skipped = Vec::new();
    for path in follow_ups {
        skipped.push(
            server
                .mock_async(|when, then| {
                    when.method(POST).path(path);
                    then.status(200).json_body(json!(true));
                })
                .await,
        );
    }
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/redis.one")
                .query_param("redisId", "r-1");
            then.status(200).json_body(json!({
                "redisId": "r-1",
                "environmentId": "e-1",
                "name": "cache",
                "appName": "cache-q2",
                "dockerImage": "redis:7",
                "databasePassword": "pw",
                "applicationStatus": "idle"
            }));
        })
        .await;

    let tester = ProviderTester::configured(&server.base_url()).await.unwrap();
    let (_, state) = tester
        .apply_create(
            "dokploy_redis",
            json!({"environment_id": "e-1", "name": "cache", "database_password": "pw"}),
        )
        .await
        .unwrap();

    assert_eq!(state["id"], "r-1");
    assert_eq!(state["external_port"], Value::Null);
    assert_eq!(state["deploy_on_create"], false);
    assert!(state.get("database_user").is_none());
    create.assert_async().await;
    for mock in &skipped {
        assert_eq!(mock.hits_async().await, 0);
    }
}

fn mariadb_state() -> Value {
    json!({
        "id": "m-1",
        "environment_id": "e-1",
        "name": "db",
        "app_name": "db-m1",
        "description": "Orders",
        "server_id": null,
        "docker_image": "mariadb:11",
        "database_name": "orders",
        "database_user": "orders",
        "database_password": "pw",
        "database_root_password": "root",
        "external_port": 3307,
        "env": null,
        "command": null,
        "memory_reservation": null,
        "memory_limit": null,
        "cpu_reservation": null,
        "cpu_limit": null,
        "deploy_on_create": false,
        "application_status": "running"
    })
}

fn mariadb_config() -> Value {
    json!({
        "environment_id": "e-1",
        "name": "db",
        "database_name": "orders",
        "database_user": "orders",
        "database_password": "pw",
        "database_root_password": "root"
    })
}

#[tokio::test]
async fn test_mariadb_update_clears_settings_and_closes_port() {
    let server = MockServer::start_async().await;
    let update = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/mariadb.update").json_body(json!({
                "mariadbId": "m-1",
                "name": "db",
                "description": "",
                "dockerImage": "mariadb:11",
                "env": "",
                "command": "",
                "memoryReservation": "",
                "memoryLimit": "",
                "cpuReservation": "",
                "cpuLimit": ""
            }));
            then.status(200).json_body(json!(true));
        })
        .await;
    let external_port = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/mariadb.saveExternalPort")
                .json_body(json!({"mariadbId": "m-1", "externalPort": null}));
            then.status(200).json_body(json!(true));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/mariadb.one")
                .query_param("mariadbId", "m-1");
            then.status(200).json_body(json!({
                "mariadbId": "m-1",
                "environmentId": "e-1",
                "name": "db",
                "appName": "db-m1",
                "description": "",
                "dockerImage": "mariadb:11",
                "databaseName": "orders",
                "databaseUser": "orders",
                "externalPort": null,
                "applicationStatus": "running"
            }));
        })
        .await;

    let tester = ProviderTester::configured(&server.base_url()).await.unwrap();
    let (plan, state) = tester
        .apply_update("dokploy_mariadb", mariadb_state(), mariadb_config())
        .await
        .unwrap();

    assert_plan_changes(&plan, &["description", "external_port"]);
    assert_eq!(state["description"], Value::Null);
    assert_eq!(state["external_port"], Value::Null);
    assert_eq!(state["database_root_password"], "root");
    update.assert_async().await;
    external_port.assert_async().await;
}

#[tokio::test]
async fn test_new_password_replaces_database() {
    let tester = ProviderTester::configured("http://127.0.0.1:1").await.unwrap();
    let mut config = mariadb_config();
    config["database_password"] = json!("rotated");
    config["description"] = json!("Orders");
    config["external_port"] = json!(3307);

    let plan = tester
        .plan("dokploy_mariadb", Some(mariadb_state()), config)
        .await
        .unwrap();
    assert_plan_replaces(&plan);
    assert!(plan.planned_state["id"].is_null());
    assert!(plan.planned_state["application_status"].is_null());
}

#[tokio::test]
async fn test_delete_uses_engine_procedure() {
    let server = MockServer::start_async().await;
    let remove = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/mariadb.remove")
                .json_body(json!({"mariadbId": "m-1"}));
            then.status(200).json_body(json!(true));
        })
        .await;

    let tester = ProviderTester::configured(&server.base_url()).await.unwrap();
    let plan = tester
        .apply_destroy("dokploy_mariadb", mariadb_state())
        .await
        .unwrap();
    assert!(plan.is_destroy());
    remove.assert_async().await;
}
