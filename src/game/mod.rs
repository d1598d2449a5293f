pub mod rules;
pub mod utils;

pub use rules::{AppliedMove, CapturedPiece, ChessRules, RulesEngine};
