use serde::{Deserialize, Serialize};

// Parameter objects for the backend RPC operations. Field names are the
// wire contract: ids travel as `<domain>_id`, never `id`.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameIdParams {
    pub game_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameParams {
    pub game_id: Option<String>,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGameParams {
    pub game_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageIdParams {
    pub stage_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStageParams {
    pub stage_id: Option<String>,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStageParams {
    pub stage_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdParams {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserParams {
    pub user_id: Option<String>,
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserParams {
    pub user_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

// Shared across all three search operations: substring match on title
// (games, stages) or username (users). Empty query lists everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

// Failure reply body, used by backend RPC endpoints and by the gateway's
// own REST error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// 202 body for enqueue-routed creates: the submitted payload echoed back
// under `data`, processed later by the queue consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAck {
    pub message: String,
    pub data: serde_json::Value,
}
