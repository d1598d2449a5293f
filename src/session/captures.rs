use chess::Color;

use crate::game::{AppliedMove, CapturedPiece};

/// Pieces taken by each side, in capture order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureTracker {
    by_white: Vec<CapturedPiece>,
    by_black: Vec<CapturedPiece>,
}

impl CaptureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the piece `applied` took, if any, to the mover's list.
    pub fn record_if_capture(&mut self, applied: &AppliedMove) {
        if let Some(piece) = applied.captured {
            match applied.side {
                Color::White => self.by_white.push(piece),
                Color::Black => self.by_black.push(piece),
            }
        }
    }

    pub fn captured_by(&self, side: Color) -> &[CapturedPiece] {
        match side {
            Color::White => &self.by_white,
            Color::Black => &self.by_black,
        }
    }

    pub fn codes(&self, side: Color) -> Vec<String> {
        self.captured_by(side).iter().map(CapturedPiece::code).collect()
    }

    pub fn clear(&mut self) {
        self.by_white.clear();
        self.by_black.clear();
    }
}
