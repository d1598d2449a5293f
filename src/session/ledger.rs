use chess::Color;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::LedgerError;

/// Both halves of one numbered turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveRecord {
    pub turn: u32,
    pub white: Option<String>,
    pub white_secs: Option<f64>,
    pub black: Option<String>,
    pub black_secs: Option<f64>,
}

/// Display form of a record; empty strings for halves not yet played.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub turn: u32,
    pub white: String,
    pub white_time: String,
    pub black: String,
    pub black_time: String,
}

impl MoveRecord {
    pub fn row(&self) -> LedgerRow {
        let secs = |t: Option<f64>| t.map(|s| format!("{:.2}s", s)).unwrap_or_default();
        LedgerRow {
            turn: self.turn,
            white: self.white.clone().unwrap_or_default(),
            white_time: secs(self.white_secs),
            black: self.black.clone().unwrap_or_default(),
            black_time: secs(self.black_secs),
        }
    }
}

/// Turn-indexed record of applied moves and their think time.
#[derive(Debug, Clone, Default)]
pub struct MoveLedger {
    records: BTreeMap<u32, MoveRecord>,
}

/// Turn a move belongs to, given how many moves the rules engine has applied
/// including that move.
pub fn turn_for(applied_moves: usize) -> u32 {
    (applied_moves.saturating_sub(1) / 2 + 1) as u32
}

impl MoveLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or merge one half-move into its turn.
    pub fn record_move(&mut self, turn: u32, side: Color, notation: &str, secs: f64) -> Result<(), LedgerError> {
        let secs = secs.max(0.0);
        match side {
            Color::White => {
                let record = self.records.entry(turn).or_insert_with(|| MoveRecord {
                    turn,
                    ..MoveRecord::default()
                });
                record.white = Some(notation.to_string());
                record.white_secs = Some(secs);
            }
            Color::Black => {
                let record = self
                    .records
                    .get_mut(&turn)
                    .filter(|r| r.white.is_some())
                    .ok_or(LedgerError::OutOfOrder(turn))?;
                record.black = Some(notation.to_string());
                record.black_secs = Some(secs);
            }
        }
        Ok(())
    }

    /// Records in turn order. Each call starts a fresh pass.
    pub fn records(&self) -> impl Iterator<Item = &MoveRecord> + '_ {
        self.records.values()
    }

    pub fn rows(&self) -> Vec<LedgerRow> {
        self.records().map(MoveRecord::row).collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
impl MoveLedger {
    pub fn get(&self, turn: u32) -> Option<&MoveRecord> {
        self.records.get(&turn)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
