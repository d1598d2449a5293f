use serde::{Deserialize, Serialize};

use crate::session::Snapshot;

/// Message sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ClientMessage {
    pub message_type: String,
    pub move_from: Option<String>,
    pub move_to: Option<String>,
    pub promote_to: Option<String>,
    pub color_preference: Option<String>,
    pub start_time_seconds: Option<u64>,
    pub method: Option<String>,
    pub depth: Option<u32>,
}

/// Message sent from server to client
#[derive(Serialize, Debug, Clone)]
pub struct ServerMessage {
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Snapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_moves: Option<Vec<String>>,
}

impl ServerMessage {
    fn empty(message_type: &str) -> Self {
        ServerMessage {
            message_type: message_type.to_string(),
            state: None,
            fen: None,
            error: None,
            available_moves: None,
        }
    }

    /// Full session snapshot for the board surface
    pub fn state(snapshot: Snapshot) -> Self {
        ServerMessage {
            state: Some(snapshot),
            ..Self::empty("state")
        }
    }

    /// Tells the surface to snap the piece back to the given position
    pub fn move_rejected(reason: String, fen: String) -> Self {
        ServerMessage {
            error: Some(reason),
            fen: Some(fen),
            ..Self::empty("move_rejected")
        }
    }

    pub fn available_moves(moves: Vec<String>) -> Self {
        ServerMessage {
            available_moves: Some(moves),
            ..Self::empty("available_moves")
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        ServerMessage {
            error: Some(reason.into()),
            ..Self::empty("error")
        }
    }
}
