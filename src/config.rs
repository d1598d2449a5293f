use clap::Parser;
use std::time::Duration;

use crate::engine::SelectionMethod;

/// Server configuration, read from flags or `CHESS_*` environment variables.
#[derive(Parser, Debug, Clone)]
#[command(name = "chess_session", about = "Play chess against a remote move service")]
pub struct AppConfig {
    #[arg(long, env = "CHESS_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Base URL of the move service; requests go to `<url>/move`.
    #[arg(long, env = "CHESS_ENGINE_URL", default_value = "http://127.0.0.1:8000")]
    pub engine_url: String,

    #[arg(long, env = "CHESS_ENGINE_DEPTH", default_value_t = 3)]
    pub engine_depth: u32,

    #[arg(long, env = "CHESS_ENGINE_METHOD", value_enum, default_value_t = SelectionMethod::Best)]
    pub engine_method: SelectionMethod,

    /// Seconds before an engine request is abandoned. 0 waits forever.
    #[arg(long, env = "CHESS_ENGINE_TIMEOUT_SECS", default_value_t = 30)]
    pub engine_timeout_secs: u64,

    /// Starting clock for each side, in seconds.
    #[arg(long, env = "CHESS_START_TIME_SECS", default_value_t = 600)]
    pub start_time_secs: u64,

    #[arg(long, env = "CHESS_STATIC_DIR", default_value = "./static")]
    pub static_dir: String,
}

impl AppConfig {
    /// Load `.env` (if any) and parse the process arguments.
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }
        AppConfig::parse()
    }

    pub fn engine_timeout(&self) -> Option<Duration> {
        match self.engine_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
