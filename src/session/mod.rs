//! Turn and clock state machine for one human-vs-engine game.
//!
//! Every transition is a method on [`Session`] that mutates the session and
//! returns the [`Effect`]s its host must carry out: re-render, arm or disarm
//! the one-second tick, or ask the remote engine for a move. The host owns
//! all timers and I/O, so the session itself is plain synchronous state.

pub mod captures;
pub mod clock;
pub mod controller;
pub mod ledger;

use serde::Serialize;

use crate::engine::{MoveRequest, SelectionMethod};

pub use captures::CaptureTracker;
pub use clock::{Clock, Tick};
pub use controller::Session;
pub use ledger::{LedgerRow, MoveLedger};

pub const DEFAULT_START_SECS: u64 = 600;
pub const DEFAULT_DEPTH: u32 = 3;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    InProgress,
    Ended,
}

/// Which color the human plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SideChoice {
    #[default]
    White,
    Black,
    Random,
}

impl SideChoice {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "white" | "w" => Some(SideChoice::White),
            "black" | "b" => Some(SideChoice::Black),
            "random" => Some(SideChoice::Random),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartParams {
    pub side: SideChoice,
    pub start_secs: u64,
    pub method: SelectionMethod,
    pub depth: u32,
}

impl Default for StartParams {
    fn default() -> Self {
        StartParams {
            side: SideChoice::White,
            start_secs: DEFAULT_START_SECS,
            method: SelectionMethod::Best,
            depth: DEFAULT_DEPTH,
        }
    }
}

/// Work the host must do after a transition, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Push a fresh [`Snapshot`] to the board surface.
    Render,
    /// (Re)start the one-second tick.
    ArmClock,
    /// Cancel the one-second tick.
    DisarmClock,
    /// Ask the engine for a move; the reply must carry `generation` back.
    RequestRemoteMove { generation: u64, request: MoveRequest },
    /// Return the dragged piece to where it came from.
    RejectMove(String),
}

/// Everything the board surface displays.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    pub status: String,
    pub fen: String,
    pub human_side: Option<String>,
    pub side_on_move: String,
    pub running_clock: Option<String>,
    pub white_clock: String,
    pub black_clock: String,
    pub captured_by_white: Vec<String>,
    pub captured_by_black: Vec<String>,
    pub moves: Vec<LedgerRow>,
    pub thinking: bool,
    pub fault: Option<String>,
}
