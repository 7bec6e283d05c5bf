use std::time::Duration;

use arcade_types::{CreateStageParams, SearchParams, Stage, StageIdParams, UpdateStageParams};

use crate::error::RpcError;
use crate::transport::RpcTransport;

pub struct StageClient {
    transport: RpcTransport,
}

impl StageClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport: RpcTransport::new("stage-service", base_url, timeout),
        }
    }

    pub async fn create(&self, params: CreateStageParams) -> Result<Stage, RpcError> {
        self.transport.call("create_stage", &params).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Stage, RpcError> {
        let params = StageIdParams {
            stage_id: id.to_string(),
        };
        self.transport.call("get_stage", &params).await
    }

    pub async fn search(&self, params: SearchParams) -> Result<Vec<Stage>, RpcError> {
        self.transport.call("search_stages", &params).await
    }

    pub async fn update(&self, params: UpdateStageParams) -> Result<Stage, RpcError> {
        self.transport.call("update_stage", &params).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), RpcError> {
        let params = StageIdParams {
            stage_id: id.to_string(),
        };
        let _: serde_json::Value = self.transport.call("delete_stage", &params).await?;
        Ok(())
    }
}
