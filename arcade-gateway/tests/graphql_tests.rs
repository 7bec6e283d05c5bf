
use serde_json::{Value, json};

use arcade_gateway::dispatch::DispatchPolicy;
use test_helpers::*;

#[tokio::test]
async fn test_query_game_by_id() {
    let gateway = setup_gateway(DispatchPolicy::all_rpc()).await;
    let app = gateway.app();
    gateway.games.insert(
        "g-1",
        json!({"id": "g-1", "title": "Pong", "description": "Paddles"}),
    );

    let response = warp::test::request()
        .method("POST")
        .path("/graphql")
        .json(&json!({"query": r#"{ game(id: "g-1") { id title description } }"#}))
        .reply(&app)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(
        body["data"]["game"],
        json!({"id": "g-1", "title": "Pong", "description": "Paddles"})
    );
}

#[tokio::test]
async fn test_query_missing_game_reports_not_found() {
    let gateway = setup_gateway(DispatchPolicy::all_rpc()).await;
    let app = gateway.app();

    let response = warp::test::request()
        .method("POST")
        .path("/graphql")
        .json(&json!({"query": r#"{ game(id: "missing") { id } }"#}))
        .reply(&app)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert!(body["data"].is_null());
    assert_eq!(body["errors"][0]["extensions"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_games_query_supports_search() {
    let gateway = setup_gateway(DispatchPolicy::all_rpc()).await;
    let app = gateway.app();
    gateway.games.insert(
        "g-1",
        json!({"id": "g-1", "title": "Chess", "description": "Board game"}),
    );
    gateway.games.insert(
        "g-2",
        json!({"id": "g-2", "title": "Go", "description": "Stones"}),
    );

    let response = warp::test::request()
        .method("POST")
        .path("/graphql")
        .json(&json!({"query": "{ games { id } }"}))
        .reply(&app)
        .await;
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["data"]["games"].as_array().unwrap().len(), 2);

    let response = warp::test::request()
        .method("POST")
        .path("/graphql")
        .json(&json!({"query": r#"{ games(query: "Che") { title } }"#}))
        .reply(&app)
        .await;
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["data"]["games"], json!([{"title": "Chess"}]));
}

#[tokio::test]
async fn test_create_mutation_always_uses_rpc() {
    // Even with every REST create routed through the queue, the mutation
    // must come back with a backend-assigned id
    let gateway = setup_gateway(DispatchPolicy::all_enqueue()).await;
    let app = gateway.app();

    let response = warp::test::request()
        .method("POST")
        .path("/graphql")
        .json(&json!({
            "query": r#"mutation { createGame(input: {title: "Chess", description: "Board game"}) { id title } }"#
        }))
        .reply(&app)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    let id = body["data"]["createGame"]["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_eq!(body["data"]["createGame"]["title"], "Chess");

    assert_eq!(gateway.games.create_call_count(), 1);
    assert!(gateway.sink.records().is_empty());
    assert!(gateway.games.store.get(id).is_some());
}

#[tokio::test]
async fn test_update_mutation_is_a_partial_update() {
    let gateway = setup_gateway(DispatchPolicy::all_rpc()).await;
    let app = gateway.app();
    gateway.stages.insert(
        "s-1",
        json!({"id": "s-1", "title": "Asteroid Belt", "description": "Dodge the rocks"}),
    );

    let response = warp::test::request()
        .method("POST")
        .path("/graphql")
        .json(&json!({
            "query": r#"mutation { updateStage(id: "s-1", input: {title: "Asteroid Belt II"}) { id title description } }"#
        }))
        .reply(&app)
        .await;

    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(
        body["data"]["updateStage"],
        json!({
            "id": "s-1",
            "title": "Asteroid Belt II",
            "description": "Dodge the rocks"
        })
    );
}

#[tokio::test]
async fn test_delete_mutation_then_not_found() {
    let gateway = setup_gateway(DispatchPolicy::all_rpc()).await;
    let app = gateway.app();
    gateway.users.insert(
        "u-1",
        json!({
            "id": "u-1",
            "username": "kara",
            "password": "hunter2",
            "email": "kara@example.com"
        }),
    );

    let response = warp::test::request()
        .method("POST")
        .path("/graphql")
        .json(&json!({"query": r#"mutation { deleteUser(id: "u-1") }"#}))
        .reply(&app)
        .await;
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["data"]["deleteUser"], true);
    assert!(gateway.users.store.is_empty());

    let response = warp::test::request()
        .method("POST")
        .path("/graphql")
        .json(&json!({"query": r#"mutation { deleteUser(id: "u-1") }"#}))
        .reply(&app)
        .await;
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["errors"][0]["extensions"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_rest_and_graphql_read_identically() {
    let gateway = setup_gateway(DispatchPolicy::all_rpc()).await;
    let app = gateway.app();
    gateway.games.insert(
        "g-1",
        json!({"id": "g-1", "title": "Pong", "description": "Paddles"}),
    );

    let rest = warp::test::request()
        .method("GET")
        .path("/games/g-1")
        .reply(&app)
        .await;
    let rest_body: Value = serde_json::from_slice(rest.body()).unwrap();

    let graphql = warp::test::request()
        .method("POST")
        .path("/graphql")
        .json(&json!({"query": r#"{ game(id: "g-1") { id title description } }"#}))
        .reply(&app)
        .await;
    let graphql_body: Value = serde_json::from_slice(graphql.body()).unwrap();

    assert_eq!(rest_body, graphql_body["data"]["game"]);
}

#[tokio::test]
async fn test_user_password_passes_through_untouched() {
    let gateway = setup_gateway(DispatchPolicy::all_rpc()).await;
    let app = gateway.app();
    gateway.users.insert(
        "u-1",
        json!({
            "id": "u-1",
            "username": "kara",
            "password": "hunter2",
            "email": "kara@example.com"
        }),
    );

    let response = warp::test::request()
        .method("POST")
        .path("/graphql")
        .json(&json!({"query": r#"{ user(id: "u-1") { username password } }"#}))
        .reply(&app)
        .await;
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["data"]["user"]["password"], "hunter2");
}
