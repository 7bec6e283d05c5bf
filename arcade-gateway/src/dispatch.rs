use std::sync::Arc;

use serde::Deserialize;

use arcade_rpc::{GameClient, StageClient, UserClient};
use arcade_types::{
    CreateAck, CreateGameParams, CreateStageParams, CreateUserParams, Game, SearchParams, Stage,
    UpdateGameParams, UpdateStageParams, UpdateUserParams, User,
};

use crate::error::GatewayError;
use crate::sink::WriteSink;

pub const GAMES_TOPIC: &str = "games_topic";
pub const STAGES_TOPIC: &str = "stages_topic";
pub const USERS_TOPIC: &str = "users_topic";

/// Every topic the enqueue path can publish to, in one place so the NATS
/// stream can be declared over exactly this set.
pub const WRITE_TOPICS: [&str; 3] = [GAMES_TOPIC, STAGES_TOPIC, USERS_TOPIC];

/// How a create route reaches the backend: straight RPC, or detached
/// through the write queue. Decided once at startup, never per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    SyncRpc,
    AsyncEnqueue,
}

impl DispatchMode {
    pub fn parse(value: &str) -> Option<DispatchMode> {
        match value {
            "rpc" => Some(DispatchMode::SyncRpc),
            "enqueue" => Some(DispatchMode::AsyncEnqueue),
            _ => None,
        }
    }
}

/// One dispatch mode per create route. Reads, updates and deletes always
/// go over RPC; only creation supports the detached path.
#[derive(Debug, Clone, Copy)]
pub struct DispatchPolicy {
    pub games: DispatchMode,
    pub stages: DispatchMode,
    pub users: DispatchMode,
}

impl DispatchPolicy {
    pub fn all_rpc() -> Self {
        Self {
            games: DispatchMode::SyncRpc,
            stages: DispatchMode::SyncRpc,
            users: DispatchMode::SyncRpc,
        }
    }

    pub fn all_enqueue() -> Self {
        Self {
            games: DispatchMode::AsyncEnqueue,
            stages: DispatchMode::AsyncEnqueue,
            users: DispatchMode::AsyncEnqueue,
        }
    }
}

// Inbound creation/update bodies. Ids live under plain `id` here; the
// translation onto `<domain>_id` wire keys happens in this module.

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGameRequest {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGameRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStageRequest {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStageRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub id: Option<String>,
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl CreateGameRequest {
    /// Queue payload: exactly the submitted fields, no null id key.
    fn into_payload(self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "title": self.title,
            "description": self.description,
        });
        if let Some(id) = self.id {
            payload["id"] = serde_json::Value::String(id);
        }
        payload
    }
}

impl CreateStageRequest {
    fn into_payload(self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "title": self.title,
            "description": self.description,
        });
        if let Some(id) = self.id {
            payload["id"] = serde_json::Value::String(id);
        }
        payload
    }
}

impl CreateUserRequest {
    fn into_payload(self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "username": self.username,
            "password": self.password,
            "email": self.email,
        });
        if let Some(id) = self.id {
            payload["id"] = serde_json::Value::String(id);
        }
        payload
    }
}

/// What a create route produced: a backend-confirmed entity (sync path)
/// or a queue acknowledgment (detached path).
pub enum CreateOutcome<T> {
    Created(T),
    Enqueued(CreateAck),
}

/// The protocol translator. Owns the RPC clients and the write sink, and
/// maps every inbound operation, REST or GraphQL, onto exactly one RPC
/// call or one enqueue. Holds no per-request state.
pub struct Dispatcher {
    games: GameClient,
    stages: StageClient,
    users: UserClient,
    sink: Arc<dyn WriteSink>,
    policy: DispatchPolicy,
}

impl Dispatcher {
    pub fn new(
        games: GameClient,
        stages: StageClient,
        users: UserClient,
        sink: Arc<dyn WriteSink>,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            games,
            stages,
            users,
            sink,
            policy,
        }
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    async fn enqueue_create(
        &self,
        topic: &str,
        message: &str,
        payload: serde_json::Value,
    ) -> Result<CreateAck, GatewayError> {
        self.sink.enqueue(topic, payload.clone()).await?;
        tracing::info!("accepted create for {}", topic);
        Ok(CreateAck {
            message: message.to_string(),
            data: payload,
        })
    }

    // games

    pub async fn list_games(&self, query: Option<String>) -> Result<Vec<Game>, GatewayError> {
        Ok(self.games.search(SearchParams { query }).await?)
    }

    pub async fn get_game(&self, id: &str) -> Result<Game, GatewayError> {
        Ok(self.games.get_by_id(id).await?)
    }

    pub async fn create_game(
        &self,
        body: CreateGameRequest,
    ) -> Result<CreateOutcome<Game>, GatewayError> {
        match self.policy.games {
            DispatchMode::SyncRpc => {
                let game = self.create_game_via_rpc(body).await?;
                Ok(CreateOutcome::Created(game))
            }
            DispatchMode::AsyncEnqueue => {
                let ack = self
                    .enqueue_create(GAMES_TOPIC, "Game created", body.into_payload())
                    .await?;
                Ok(CreateOutcome::Enqueued(ack))
            }
        }
    }

    pub async fn create_game_via_rpc(
        &self,
        body: CreateGameRequest,
    ) -> Result<Game, GatewayError> {
        let params = CreateGameParams {
            game_id: body.id,
            title: body.title,
            description: body.description,
        };
        Ok(self.games.create(params).await?)
    }

    pub async fn update_game(
        &self,
        id: &str,
        body: UpdateGameRequest,
    ) -> Result<Game, GatewayError> {
        // Path id wins over any id carried in the body
        let params = UpdateGameParams {
            game_id: id.to_string(),
            title: body.title,
            description: body.description,
        };
        Ok(self.games.update(params).await?)
    }

    pub async fn delete_game(&self, id: &str) -> Result<(), GatewayError> {
        Ok(self.games.delete(id).await?)
    }

    // stages

    pub async fn list_stages(&self, query: Option<String>) -> Result<Vec<Stage>, GatewayError> {
        Ok(self.stages.search(SearchParams { query }).await?)
    }

    pub async fn get_stage(&self, id: &str) -> Result<Stage, GatewayError> {
        Ok(self.stages.get_by_id(id).await?)
    }

    pub async fn create_stage(
        &self,
        body: CreateStageRequest,
    ) -> Result<CreateOutcome<Stage>, GatewayError> {
        match self.policy.stages {
            DispatchMode::SyncRpc => {
                let stage = self.create_stage_via_rpc(body).await?;
                Ok(CreateOutcome::Created(stage))
            }
            DispatchMode::AsyncEnqueue => {
                let ack = self
                    .enqueue_create(STAGES_TOPIC, "Stage created", body.into_payload())
                    .await?;
                Ok(CreateOutcome::Enqueued(ack))
            }
        }
    }

    pub async fn create_stage_via_rpc(
        &self,
        body: CreateStageRequest,
    ) -> Result<Stage, GatewayError> {
        let params = CreateStageParams {
            stage_id: body.id,
            title: body.title,
            description: body.description,
        };
        Ok(self.stages.create(params).await?)
    }

    pub async fn update_stage(
        &self,
        id: &str,
        body: UpdateStageRequest,
    ) -> Result<Stage, GatewayError> {
        let params = UpdateStageParams {
            stage_id: id.to_string(),
            title: body.title,
            description: body.description,
        };
        Ok(self.stages.update(params).await?)
    }

    pub async fn delete_stage(&self, id: &str) -> Result<(), GatewayError> {
        Ok(self.stages.delete(id).await?)
    }

    // users

    pub async fn list_users(&self, query: Option<String>) -> Result<Vec<User>, GatewayError> {
        Ok(self.users.search(SearchParams { query }).await?)
    }

    pub async fn get_user(&self, id: &str) -> Result<User, GatewayError> {
        Ok(self.users.get_by_id(id).await?)
    }

    pub async fn create_user(
        &self,
        body: CreateUserRequest,
    ) -> Result<CreateOutcome<User>, GatewayError> {
        match self.policy.users {
            DispatchMode::SyncRpc => {
                let user = self.create_user_via_rpc(body).await?;
                Ok(CreateOutcome::Created(user))
            }
            DispatchMode::AsyncEnqueue => {
                let ack = self
                    .enqueue_create(USERS_TOPIC, "User created", body.into_payload())
                    .await?;
                Ok(CreateOutcome::Enqueued(ack))
            }
        }
    }

    pub async fn create_user_via_rpc(
        &self,
        body: CreateUserRequest,
    ) -> Result<User, GatewayError> {
        let params = CreateUserParams {
            user_id: body.id,
            username: body.username,
            password: body.password,
            email: body.email,
        };
        Ok(self.users.create(params).await?)
    }

    pub async fn update_user(
        &self,
        id: &str,
        body: UpdateUserRequest,
    ) -> Result<User, GatewayError> {
        let params = UpdateUserParams {
            user_id: id.to_string(),
            username: body.username,
            password: body.password,
            email: body.email,
        };
        Ok(self.users.update(params).await?)
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), GatewayError> {
        Ok(self.users.delete(id).await?)
    }
}
