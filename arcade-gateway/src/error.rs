use warp::http::StatusCode;

use arcade_rpc::RpcError;

use crate::sink::SinkError;

/// Terminal failure for one request. No retries happen behind this type;
/// whatever the backend or queue reported is what the caller learns.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("enqueue failed: {0}")]
    Queue(#[from] SinkError),
}

impl GatewayError {
    /// Outbound REST status. Not-found, unreachable-backend, timed-out
    /// and backend-failure outcomes stay distinguishable to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Rpc(RpcError::NotFound { .. }) => StatusCode::NOT_FOUND,
            GatewayError::Rpc(RpcError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Rpc(RpcError::Unavailable { .. }) => StatusCode::BAD_GATEWAY,
            GatewayError::Rpc(RpcError::Protocol { .. }) => StatusCode::BAD_GATEWAY,
            GatewayError::Rpc(RpcError::Backend { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Queue(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Stable machine tag, surfaced as the GraphQL error extension code.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Rpc(RpcError::NotFound { .. }) => "NOT_FOUND",
            GatewayError::Rpc(RpcError::Timeout { .. }) => "TIMEOUT",
            GatewayError::Rpc(RpcError::Unavailable { .. }) => "UNAVAILABLE",
            GatewayError::Rpc(RpcError::Protocol { .. }) => "UNAVAILABLE",
            GatewayError::Rpc(RpcError::Backend { .. }) => "BACKEND",
            GatewayError::Queue(_) => "QUEUE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc(err: RpcError) -> GatewayError {
        GatewayError::Rpc(err)
    }

    #[test]
    fn test_status_codes_stay_distinguishable() {
        let not_found = rpc(RpcError::NotFound {
            service: "game-service",
            message: "Game not found".to_string(),
        });
        let timeout = rpc(RpcError::Timeout {
            service: "game-service",
        });
        let unavailable = rpc(RpcError::Unavailable {
            service: "game-service",
            message: "connection refused".to_string(),
        });
        let backend = rpc(RpcError::Backend {
            service: "game-service",
            message: "constraint violated".to_string(),
        });
        let queue = GatewayError::Queue(SinkError::Transport("down".to_string()));

        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(unavailable.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(backend.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(queue.status_code(), StatusCode::BAD_GATEWAY);

        assert_eq!(not_found.code(), "NOT_FOUND");
        assert_eq!(timeout.code(), "TIMEOUT");
        assert_eq!(unavailable.code(), "UNAVAILABLE");
        assert_eq!(backend.code(), "BACKEND");
        assert_eq!(queue.code(), "QUEUE");
    }
}
