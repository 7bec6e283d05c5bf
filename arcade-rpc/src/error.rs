#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("{service}: {message}")]
    NotFound {
        service: &'static str,
        message: String,
    },
    #[error("{service} request timed out")]
    Timeout { service: &'static str },
    #[error("{service} unreachable: {message}")]
    Unavailable {
        service: &'static str,
        message: String,
    },
    #[error("{service} sent an undecodable reply: {message}")]
    Protocol {
        service: &'static str,
        message: String,
    },
    #[error("{service} failure: {message}")]
    Backend {
        service: &'static str,
        message: String,
    },
}

impl RpcError {
    /// True for errors caused by the transport rather than the backend's
    /// own logic (unreachable service, timed-out call, garbled reply).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RpcError::Timeout { .. } | RpcError::Unavailable { .. } | RpcError::Protocol { .. }
        )
    }
}
