use std::sync::Arc;

use warp::Filter;
use warp::http::StatusCode;

use arcade_types::{CreateStageParams, ErrorBody, SearchParams, StageIdParams, UpdateStageParams};

pub mod config;
pub mod connection;
pub mod entities;
pub mod repository;

use repository::{StageRepository, StoreError};

pub fn create_routes(
    repository: Arc<StageRepository>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let repo_filter = warp::any().map({
        let repository = repository.clone();
        move || repository.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let create_stage = warp::path!("rpc" / "create_stage")
        .and(warp::post())
        .and(warp::body::json())
        .and(repo_filter.clone())
        .and_then(handle_create_stage);
    let get_stage = warp::path!("rpc" / "get_stage")
        .and(warp::post())
        .and(warp::body::json())
        .and(repo_filter.clone())
        .and_then(handle_get_stage);
    let search_stages = warp::path!("rpc" / "search_stages")
        .and(warp::post())
        .and(warp::body::json())
        .and(repo_filter.clone())
        .and_then(handle_search_stages);
    let update_stage = warp::path!("rpc" / "update_stage")
        .and(warp::post())
        .and(warp::body::json())
        .and(repo_filter.clone())
        .and_then(handle_update_stage);
    let delete_stage = warp::path!("rpc" / "delete_stage")
        .and(warp::post())
        .and(warp::body::json())
        .and(repo_filter.clone())
        .and_then(handle_delete_stage);

    health
        .or(create_stage)
        .or(get_stage)
        .or(search_stages)
        .or(update_stage)
        .or(delete_stage)
        .with(warp::log("stage_service"))
}

fn json_reply<T: serde::Serialize>(
    status: StatusCode,
    value: &T,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(value), status)
}

fn error_reply(err: &StoreError) -> warp::reply::WithStatus<warp::reply::Json> {
    let status = match err {
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("stage store failure: {}", err);
    }
    json_reply(status, &ErrorBody::new(err.to_string()))
}

async fn handle_create_stage(
    params: CreateStageParams,
    repository: Arc<StageRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match repository
        .create(params.stage_id, params.title, params.description)
        .await
    {
        Ok(stage) => Ok(json_reply(StatusCode::OK, &stage)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_get_stage(
    params: StageIdParams,
    repository: Arc<StageRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match repository.find_by_id(&params.stage_id).await {
        Ok(Some(stage)) => Ok(json_reply(StatusCode::OK, &stage)),
        Ok(None) => Ok(error_reply(&StoreError::NotFound)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_search_stages(
    params: SearchParams,
    repository: Arc<StageRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match repository.search(params.query).await {
        Ok(stages) => Ok(json_reply(StatusCode::OK, &stages)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_update_stage(
    params: UpdateStageParams,
    repository: Arc<StageRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match repository
        .update(&params.stage_id, params.title, params.description)
        .await
    {
        Ok(stage) => Ok(json_reply(StatusCode::OK, &stage)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_delete_stage(
    params: StageIdParams,
    repository: Arc<StageRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match repository.delete(&params.stage_id).await {
        // Delete replies with an empty object
        Ok(()) => Ok(json_reply(StatusCode::OK, &serde_json::json!({}))),
        Err(err) => Ok(error_reply(&err)),
    }
}
