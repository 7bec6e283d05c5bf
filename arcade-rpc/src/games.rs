use std::time::Duration;

use arcade_types::{CreateGameParams, Game, GameIdParams, SearchParams, UpdateGameParams};

use crate::error::RpcError;
use crate::transport::RpcTransport;

pub struct GameClient {
    transport: RpcTransport,
}

impl GameClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport: RpcTransport::new("game-service", base_url, timeout),
        }
    }

    pub async fn create(&self, params: CreateGameParams) -> Result<Game, RpcError> {
        self.transport.call("create_game", &params).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Game, RpcError> {
        let params = GameIdParams {
            game_id: id.to_string(),
        };
        self.transport.call("get_game", &params).await
    }

    pub async fn search(&self, params: SearchParams) -> Result<Vec<Game>, RpcError> {
        self.transport.call("search_games", &params).await
    }

    pub async fn update(&self, params: UpdateGameParams) -> Result<Game, RpcError> {
        self.transport.call("update_game", &params).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), RpcError> {
        let params = GameIdParams {
            game_id: id.to_string(),
        };
        // Delete replies with an empty object
        let _: serde_json::Value = self.transport.call("delete_game", &params).await?;
        Ok(())
    }
}
