//! Client side of the remote move service.
//!
//! The service receives a position and a selection method and answers with
//! one engine move token (UCI long algebraic, e.g. `e7e5` or `a2a1q`), a
//! game-over notice, or an error.

pub mod http;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

pub use http::HttpMoveSource;

/// How the service picks its move.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMethod {
    Best,
    Random,
}

impl SelectionMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "best" => Some(SelectionMethod::Best),
            "random" => Some(SelectionMethod::Random),
            _ => None,
        }
    }
}

/// Body posted to the service.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MoveRequest {
    pub fen: String,
    pub depth: u32,
    pub method: SelectionMethod,
}

/// Decoded service answer.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineReply {
    Move(String),
    GameOver(String),
    Error(String),
}

/// Wire shape of the service answer, tagged by `status`.
#[derive(Deserialize, Debug)]
#[serde(tag = "status", rename_all = "snake_case")]
enum EngineResponse {
    Ok {
        #[serde(rename = "move")]
        mv: String,
    },
    GameOver {
        #[serde(default)]
        reason: String,
    },
    Error {
        #[serde(default)]
        reason: String,
    },
}

impl From<EngineResponse> for EngineReply {
    fn from(response: EngineResponse) -> Self {
        match response {
            EngineResponse::Ok { mv } => EngineReply::Move(mv),
            EngineResponse::GameOver { reason } => EngineReply::GameOver(reason),
            EngineResponse::Error { reason } => EngineReply::Error(reason),
        }
    }
}

/// Decode a response body.
pub fn decode_reply(body: &str) -> Result<EngineReply, RemoteError> {
    serde_json::from_str::<EngineResponse>(body)
        .map(EngineReply::from)
        .map_err(|e| RemoteError::Malformed(e.to_string()))
}

/// Anything that can be asked for the next move.
///
/// Futures run on the connection's actor context, so they need not be `Send`.
pub trait MoveSource {
    fn request_move(&self, request: MoveRequest) -> LocalBoxFuture<'static, Result<EngineReply, RemoteError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ok_reply_and_ignores_extras() {
        let body = r#"{"status":"ok","method":"best","move":"e7e5","fen_after":"x","eval":12,"depth":3}"#;
        assert_eq!(decode_reply(body).unwrap(), EngineReply::Move("e7e5".to_string()));
    }

    #[test]
    fn decodes_game_over_and_error() {
        assert_eq!(
            decode_reply(r#"{"status":"game_over","reason":"No legal moves"}"#).unwrap(),
            EngineReply::GameOver("No legal moves".to_string())
        );
        assert_eq!(
            decode_reply(r#"{"status":"error","reason":"timeout"}"#).unwrap(),
            EngineReply::Error("timeout".to_string())
        );
    }

    #[test]
    fn unknown_status_is_malformed() {
        assert!(matches!(
            decode_reply(r#"{"status":"thinking"}"#),
            Err(RemoteError::Malformed(_))
        ));
        assert!(matches!(decode_reply("<html>"), Err(RemoteError::Malformed(_))));
        assert!(matches!(decode_reply(r#"{"status":"ok"}"#), Err(RemoteError::Malformed(_))));
    }

    #[test]
    fn request_serializes_like_the_service_expects() {
        let request = MoveRequest {
            fen: "8/8/8/8/8/8/8/8 w - - 0 1".to_string(),
            depth: 3,
            method: SelectionMethod::Random,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "random");
        assert_eq!(json["depth"], 3);
    }

    #[test]
    fn selection_method_parse() {
        assert_eq!(SelectionMethod::parse("BEST"), Some(SelectionMethod::Best));
        assert_eq!(SelectionMethod::parse("random"), Some(SelectionMethod::Random));
        assert_eq!(SelectionMethod::parse("deep"), None);
    }
}
