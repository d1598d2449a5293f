use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::engine::MoveSource;

/// Application state shared between connections
pub struct AppState {
    pub config: AppConfig,
    pub engine: Arc<dyn MoveSource + Send + Sync>,
    connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: AppConfig, engine: Arc<dyn MoveSource + Send + Sync>) -> Self {
        AppState {
            config,
            engine,
            connections: AtomicUsize::new(0),
        }
    }

    /// Count a new connection; returns the live total.
    pub fn connection_opened(&self) -> usize {
        self.connections.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Drop a closed connection from the count; returns the live total.
    pub fn connection_closed(&self) -> usize {
        let previous = self
            .connections
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)))
            .unwrap_or(0);
        previous.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineReply, MoveRequest};
    use crate::error::RemoteError;
    use clap::Parser;
    use futures::future::LocalBoxFuture;
    use futures::FutureExt;

    struct Idle;

    impl MoveSource for Idle {
        fn request_move(&self, _request: MoveRequest) -> LocalBoxFuture<'static, Result<EngineReply, RemoteError>> {
            async { Err(RemoteError::Timeout) }.boxed_local()
        }
    }

    #[test]
    fn connection_count_follows_open_and_close() {
        let config = AppConfig::parse_from(["chess_session"]);
        let state = AppState::new(config, Arc::new(Idle));
        assert_eq!(state.connection_opened(), 1);
        assert_eq!(state.connection_opened(), 2);
        assert_eq!(state.connection_closed(), 1);
        assert_eq!(state.connection_closed(), 0);
        assert_eq!(state.connection_closed(), 0);
    }
}
