use std::sync::Arc;

use serde::Deserialize;
use warp::Filter;
use warp::http::StatusCode;

use arcade_types::ErrorBody;

use crate::dispatch::{
    CreateGameRequest, CreateOutcome, CreateStageRequest, CreateUserRequest, Dispatcher,
    UpdateGameRequest, UpdateStageRequest, UpdateUserRequest,
};
use crate::error::GatewayError;
use crate::graphql::ArcadeSchema;

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

pub mod config;
pub mod dispatch;
pub mod error;
pub mod graphql;
pub mod sink;

const BODY_LIMIT: u64 = 1024 * 16;

pub fn create_routes(
    dispatcher: Arc<Dispatcher>,
    schema: ArcadeSchema,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let dispatcher_filter = warp::any().map({
        let dispatcher = dispatcher.clone();
        move || dispatcher.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // GraphQL endpoint, resolved through the same dispatcher as REST
    let graphql = warp::path("graphql").and(async_graphql_warp::graphql(schema).and_then(
        |(schema, request): (ArcadeSchema, async_graphql::Request)| async move {
            let response = schema.execute(request).await;
            Ok::<_, warp::Rejection>(async_graphql_warp::GraphQLResponse::from(response))
        },
    ));

    // Game routes
    let list_games = warp::path!("games")
        .and(warp::get())
        .and(warp::query::<SearchQuery>())
        .and(dispatcher_filter.clone())
        .and_then(handle_list_games);
    let get_game = warp::path!("games" / String)
        .and(warp::get())
        .and(dispatcher_filter.clone())
        .and_then(handle_get_game);
    let create_game = warp::path!("games")
        .and(warp::post())
        .and(json_body())
        .and(dispatcher_filter.clone())
        .and_then(handle_create_game);
    let update_game = warp::path!("games" / String)
        .and(warp::put())
        .and(json_body())
        .and(dispatcher_filter.clone())
        .and_then(handle_update_game);
    let delete_game = warp::path!("games" / String)
        .and(warp::delete())
        .and(dispatcher_filter.clone())
        .and_then(handle_delete_game);
    let games = list_games
        .or(get_game)
        .or(create_game)
        .or(update_game)
        .or(delete_game);

    // Stage routes
    let list_stages = warp::path!("stages")
        .and(warp::get())
        .and(warp::query::<SearchQuery>())
        .and(dispatcher_filter.clone())
        .and_then(handle_list_stages);
    let get_stage = warp::path!("stages" / String)
        .and(warp::get())
        .and(dispatcher_filter.clone())
        .and_then(handle_get_stage);
    let create_stage = warp::path!("stages")
        .and(warp::post())
        .and(json_body())
        .and(dispatcher_filter.clone())
        .and_then(handle_create_stage);
    let update_stage = warp::path!("stages" / String)
        .and(warp::put())
        .and(json_body())
        .and(dispatcher_filter.clone())
        .and_then(handle_update_stage);
    let delete_stage = warp::path!("stages" / String)
        .and(warp::delete())
        .and(dispatcher_filter.clone())
        .and_then(handle_delete_stage);
    let stages = list_stages
        .or(get_stage)
        .or(create_stage)
        .or(update_stage)
        .or(delete_stage);

    // User routes
    let list_users = warp::path!("users")
        .and(warp::get())
        .and(warp::query::<SearchQuery>())
        .and(dispatcher_filter.clone())
        .and_then(handle_list_users);
    let get_user = warp::path!("users" / String)
        .and(warp::get())
        .and(dispatcher_filter.clone())
        .and_then(handle_get_user);
    let create_user = warp::path!("users")
        .and(warp::post())
        .and(json_body())
        .and(dispatcher_filter.clone())
        .and_then(handle_create_user);
    let update_user = warp::path!("users" / String)
        .and(warp::put())
        .and(json_body())
        .and(dispatcher_filter.clone())
        .and_then(handle_update_user);
    let delete_user = warp::path!("users" / String)
        .and(warp::delete())
        .and(dispatcher_filter.clone())
        .and_then(handle_delete_user);
    let users = list_users
        .or(get_user)
        .or(create_user)
        .or(update_user)
        .or(delete_user);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    health
        .or(graphql)
        .or(games)
        .or(stages)
        .or(users)
        .recover(handle_rejection)
        .with(cors)
        .with(warp::log("arcade_gateway"))
}

fn json_body<T: serde::de::DeserializeOwned + Send>()
-> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(BODY_LIMIT).and(warp::body::json())
}

fn json_reply<T: serde::Serialize>(
    status: StatusCode,
    value: &T,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(value), status)
}

fn error_reply(err: &GatewayError) -> warp::reply::WithStatus<warp::reply::Json> {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("request failed: {}", err);
    }
    json_reply(status, &ErrorBody::new(err.to_string()))
}

async fn handle_list_games(
    query: SearchQuery,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match dispatcher.list_games(query.q).await {
        Ok(games) => Ok(json_reply(StatusCode::OK, &games)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_get_game(
    id: String,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match dispatcher.get_game(&id).await {
        Ok(game) => Ok(json_reply(StatusCode::OK, &game)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_create_game(
    body: CreateGameRequest,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match dispatcher.create_game(body).await {
        Ok(CreateOutcome::Created(game)) => Ok(json_reply(StatusCode::CREATED, &game)),
        Ok(CreateOutcome::Enqueued(ack)) => Ok(json_reply(StatusCode::ACCEPTED, &ack)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_update_game(
    id: String,
    body: UpdateGameRequest,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match dispatcher.update_game(&id, body).await {
        Ok(game) => Ok(json_reply(StatusCode::OK, &game)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_delete_game(
    id: String,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    use warp::Reply;
    match dispatcher.delete_game(&id).await {
        Ok(()) => {
            Ok(warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT).into_response())
        }
        Err(err) => Ok(error_reply(&err).into_response()),
    }
}

async fn handle_list_stages(
    query: SearchQuery,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match dispatcher.list_stages(query.q).await {
        Ok(stages) => Ok(json_reply(StatusCode::OK, &stages)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_get_stage(
    id: String,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match dispatcher.get_stage(&id).await {
        Ok(stage) => Ok(json_reply(StatusCode::OK, &stage)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_create_stage(
    body: CreateStageRequest,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match dispatcher.create_stage(body).await {
        Ok(CreateOutcome::Created(stage)) => Ok(json_reply(StatusCode::CREATED, &stage)),
        Ok(CreateOutcome::Enqueued(ack)) => Ok(json_reply(StatusCode::ACCEPTED, &ack)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_update_stage(
    id: String,
    body: UpdateStageRequest,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match dispatcher.update_stage(&id, body).await {
        Ok(stage) => Ok(json_reply(StatusCode::OK, &stage)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_delete_stage(
    id: String,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    use warp::Reply;
    match dispatcher.delete_stage(&id).await {
        Ok(()) => {
            Ok(warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT).into_response())
        }
        Err(err) => Ok(error_reply(&err).into_response()),
    }
}

async fn handle_list_users(
    query: SearchQuery,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match dispatcher.list_users(query.q).await {
        Ok(users) => Ok(json_reply(StatusCode::OK, &users)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_get_user(
    id: String,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match dispatcher.get_user(&id).await {
        Ok(user) => Ok(json_reply(StatusCode::OK, &user)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_create_user(
    body: CreateUserRequest,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match dispatcher.create_user(body).await {
        Ok(CreateOutcome::Created(user)) => Ok(json_reply(StatusCode::CREATED, &user)),
        Ok(CreateOutcome::Enqueued(ack)) => Ok(json_reply(StatusCode::ACCEPTED, &ack)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_update_user(
    id: String,
    body: UpdateUserRequest,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match dispatcher.update_user(&id, body).await {
        Ok(user) => Ok(json_reply(StatusCode::OK, &user)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_delete_user(
    id: String,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    use warp::Reply;
    match dispatcher.delete_user(&id).await {
        Ok(()) => {
            Ok(warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT).into_response())
        }
        Err(err) => Ok(error_reply(&err).into_response()),
    }
}

/// Maps shape-level failures (undecodable body, oversized payload, bad
/// method) onto the same `{"error": ...}` body the handlers produce.
async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, warp::Rejection> {
    if err.is_not_found() {
        return Ok(json_reply(
            StatusCode::NOT_FOUND,
            &ErrorBody::new("route not found"),
        ));
    }
    if let Some(body_err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        return Ok(json_reply(
            StatusCode::BAD_REQUEST,
            &ErrorBody::new(body_err.to_string()),
        ));
    }
    if let Some(bad_request) = err.find::<async_graphql_warp::GraphQLBadRequest>() {
        return Ok(json_reply(
            StatusCode::BAD_REQUEST,
            &ErrorBody::new(bad_request.0.to_string()),
        ));
    }
    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        return Ok(json_reply(
            StatusCode::PAYLOAD_TOO_LARGE,
            &ErrorBody::new("payload too large"),
        ));
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(json_reply(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorBody::new("method not allowed"),
        ));
    }
    Err(err)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::time::Duration;

    use arcade_rpc::{GameClient, StageClient, UserClient};

    use crate::dispatch::DispatchPolicy;
    use crate::graphql::build_schema;
    use crate::sink::MemorySink;

    /// Loopback address with nothing listening, so RPC calls fail fast
    fn dead_backend_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn create_test_app(
        policy: DispatchPolicy,
        sink: Arc<MemorySink>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let timeout = Duration::from_millis(500);
        let dispatcher = Arc::new(Dispatcher::new(
            GameClient::new(dead_backend_url(), timeout),
            StageClient::new(dead_backend_url(), timeout),
            UserClient::new(dead_backend_url(), timeout),
            sink,
            policy,
        ));
        let schema = build_schema(dispatcher.clone());
        create_routes(dispatcher, schema)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app(DispatchPolicy::all_enqueue(), Arc::new(MemorySink::new()));

        let response = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), "OK");
    }

    #[tokio::test]
    async fn test_enqueue_create_returns_202_with_ack() {
        let sink = Arc::new(MemorySink::new());
        let app = create_test_app(DispatchPolicy::all_enqueue(), sink.clone());

        let response = warp::test::request()
            .method("POST")
            .path("/games")
            .json(&serde_json::json!({"title": "Chess", "description": "Board game"}))
            .reply(&app)
            .await;

        assert_eq!(response.status(), 202);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "message": "Game created",
                "data": {"title": "Chess", "description": "Board game"}
            })
        );

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, "games_topic");
    }

    #[tokio::test]
    async fn test_stage_and_user_creates_use_their_own_topics() {
        let sink = Arc::new(MemorySink::new());
        let app = create_test_app(DispatchPolicy::all_enqueue(), sink.clone());

        let response = warp::test::request()
            .method("POST")
            .path("/stages")
            .json(&serde_json::json!({"title": "Lava Fields", "description": "Hot floor"}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 202);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["message"], "Stage created");

        let response = warp::test::request()
            .method("POST")
            .path("/users")
            .json(&serde_json::json!({
                "username": "kara",
                "password": "hunter2",
                "email": "kara@example.com"
            }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 202);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["message"], "User created");

        let topics: Vec<String> = sink.records().into_iter().map(|(topic, _)| topic).collect();
        assert_eq!(topics, vec!["stages_topic", "users_topic"]);
    }

    #[tokio::test]
    async fn test_enqueue_failure_maps_to_502_not_an_ack() {
        let sink = Arc::new(MemorySink::new());
        sink.set_failing(true);
        let app = create_test_app(DispatchPolicy::all_enqueue(), sink.clone());

        let response = warp::test::request()
            .method("POST")
            .path("/games")
            .json(&serde_json::json!({"title": "Chess", "description": "Board game"}))
            .reply(&app)
            .await;

        assert_eq!(response.status(), 502);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert!(body["error"].as_str().unwrap().contains("queue"));
        assert!(sink.records().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_maps_to_502() {
        let app = create_test_app(DispatchPolicy::all_rpc(), Arc::new(MemorySink::new()));

        let response = warp::test::request()
            .method("GET")
            .path("/games/g-1")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 502);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_malformed_body_returns_400() {
        let app = create_test_app(DispatchPolicy::all_enqueue(), Arc::new(MemorySink::new()));

        let response = warp::test::request()
            .method("POST")
            .path("/games")
            .header("content-type", "application/json")
            .body("{\"title\": 12}")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 400);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404_error_body() {
        let app = create_test_app(DispatchPolicy::all_enqueue(), Arc::new(MemorySink::new()));

        let response = warp::test::request()
            .method("GET")
            .path("/nope")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 404);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], "route not found");
    }

    #[tokio::test]
    async fn test_method_not_allowed_maps_to_405() {
        let app = create_test_app(DispatchPolicy::all_enqueue(), Arc::new(MemorySink::new()));

        let response = warp::test::request()
            .method("PATCH")
            .path("/games")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 405);
    }

    #[tokio::test]
    async fn test_graphql_mutation_ignores_enqueue_policy() {
        let sink = Arc::new(MemorySink::new());
        let app = create_test_app(DispatchPolicy::all_enqueue(), sink.clone());

        let response = warp::test::request()
            .method("POST")
            .path("/graphql")
            .json(&serde_json::json!({
                "query": "mutation { createGame(input: {title: \"Chess\", description: \"Board game\"}) { id } }"
            }))
            .reply(&app)
            .await;

        // The dead backend fails the call, which proves the mutation took
        // the RPC path instead of the queue
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["errors"][0]["extensions"]["code"], "UNAVAILABLE");
        assert!(sink.records().is_empty());
    }
}
