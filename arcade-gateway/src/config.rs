use std::env;
use std::time::Duration;

use crate::dispatch::{DispatchMode, DispatchPolicy};

/// Which write sink backs the enqueue path. `Memory` keeps acks local and
/// is meant for tests and queue-less development.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    Nats,
    Memory,
}

impl SinkMode {
    pub fn parse(value: &str) -> Option<SinkMode> {
        match value {
            "nats" => Some(SinkMode::Nats),
            "memory" => Some(SinkMode::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub game_service_url: String,
    pub stage_service_url: String,
    pub user_service_url: String,
    pub nats_url: String,
    pub sink: SinkMode,
    pub rpc_timeout_secs: u64,
    pub dispatch_games: DispatchMode,
    pub dispatch_stages: DispatchMode,
    pub dispatch_users: DispatchMode,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("Invalid PORT"),
            game_service_url: env::var("GAME_SERVICE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:50051".to_string()),
            stage_service_url: env::var("STAGE_SERVICE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:50052".to_string()),
            user_service_url: env::var("USER_SERVICE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:50053".to_string()),
            nats_url: env::var("NATS_URL").unwrap_or_else(|_| "nats://127.0.0.1:4222".to_string()),
            sink: SinkMode::parse(&env::var("SINK").unwrap_or_else(|_| "nats".to_string()))
                .expect("Invalid SINK (use \"nats\" or \"memory\")"),
            rpc_timeout_secs: env::var("RPC_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("Invalid RPC_TIMEOUT_SECS"),
            dispatch_games: DispatchMode::parse(
                &env::var("DISPATCH_GAMES").unwrap_or_else(|_| "enqueue".to_string()),
            )
            .expect("Invalid DISPATCH_GAMES (use \"rpc\" or \"enqueue\")"),
            dispatch_stages: DispatchMode::parse(
                &env::var("DISPATCH_STAGES").unwrap_or_else(|_| "enqueue".to_string()),
            )
            .expect("Invalid DISPATCH_STAGES (use \"rpc\" or \"enqueue\")"),
            dispatch_users: DispatchMode::parse(
                &env::var("DISPATCH_USERS").unwrap_or_else(|_| "enqueue".to_string()),
            )
            .expect("Invalid DISPATCH_USERS (use \"rpc\" or \"enqueue\")"),
        }
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn policy(&self) -> DispatchPolicy {
        DispatchPolicy {
            games: self.dispatch_games,
            stages: self.dispatch_stages,
            users: self.dispatch_users,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_mode_parsing() {
        assert_eq!(SinkMode::parse("nats"), Some(SinkMode::Nats));
        assert_eq!(SinkMode::parse("memory"), Some(SinkMode::Memory));
        assert_eq!(SinkMode::parse("kafka"), None);
    }
}
