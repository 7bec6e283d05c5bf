use std::time::Duration;

use arcade_types::{CreateUserParams, SearchParams, UpdateUserParams, User, UserIdParams};

use crate::error::RpcError;
use crate::transport::RpcTransport;

pub struct UserClient {
    transport: RpcTransport,
}

impl UserClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport: RpcTransport::new("user-service", base_url, timeout),
        }
    }

    pub async fn create(&self, params: CreateUserParams) -> Result<User, RpcError> {
        self.transport.call("create_user", &params).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<User, RpcError> {
        let params = UserIdParams {
            user_id: id.to_string(),
        };
        self.transport.call("get_user", &params).await
    }

    pub async fn search(&self, params: SearchParams) -> Result<Vec<User>, RpcError> {
        self.transport.call("search_users", &params).await
    }

    pub async fn update(&self, params: UpdateUserParams) -> Result<User, RpcError> {
        self.transport.call("update_user", &params).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), RpcError> {
        let params = UserIdParams {
            user_id: id.to_string(),
        };
        let _: serde_json::Value = self.transport.call("delete_user", &params).await?;
        Ok(())
    }
}
