use chess::{Board, BoardStatus, ChessMove, Color, Game, MoveGen, Piece, Rank, Square};
use std::str::FromStr;

use crate::game::utils::has_insufficient_material;

/// A piece taken off the board: its kind and the side that owned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedPiece {
    pub piece: Piece,
    pub owner: Color,
}

impl CapturedPiece {
    /// Two-letter code such as `bP` (black pawn) or `wQ`.
    pub fn code(&self) -> String {
        let owner = match self.owner {
            Color::White => 'w',
            Color::Black => 'b',
        };
        format!("{}{}", owner, piece_letter(self.piece))
    }
}

/// Side effects of a move the rules engine accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMove {
    pub side: Color,
    pub from: Square,
    pub to: Square,
    pub captured: Option<CapturedPiece>,
    pub san: String,
    pub fen: String,
}

/// The game-rules collaborator consumed by the session controller.
pub trait RulesEngine {
    /// Apply a board-surface move. `None` means the move is illegal.
    fn apply_move(&mut self, from: Square, to: Square, promotion: Option<Piece>) -> Option<AppliedMove>;
    /// Apply an engine move token such as `e2e4` or `e7e8q`.
    fn apply_engine_move(&mut self, token: &str) -> Option<AppliedMove>;
    fn is_checkmate(&self) -> bool;
    fn is_draw(&self) -> bool;
    fn is_in_check(&self) -> bool;
    fn turn_to_move(&self) -> Color;
    fn fen(&self) -> String;
    fn applied_move_count(&self) -> usize;
    fn legal_destinations(&self, from: Square) -> Vec<Square>;
    fn reset(&mut self);
}

/// Rules engine backed by the `chess` crate.
pub struct ChessRules {
    game: Game,
    applied: usize,
}

impl Default for ChessRules {
    fn default() -> Self {
        ChessRules {
            game: Game::new(),
            applied: 0,
        }
    }
}

impl ChessRules {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_fen(fen: &str) -> Option<Self> {
        Game::from_str(fen).ok().map(|game| ChessRules { game, applied: 0 })
    }

    fn apply(&mut self, chess_move: ChessMove) -> Option<AppliedMove> {
        let board = self.game.current_position();
        if !board.legal(chess_move) {
            return None;
        }

        let side = board.side_to_move();
        let from = chess_move.get_source();
        let to = chess_move.get_dest();
        let captured = captured_by(&board, chess_move);
        let mut san = san_without_suffix(&board, chess_move);

        if !self.game.make_move(chess_move) {
            return None;
        }
        self.applied += 1;

        let after = self.game.current_position();
        match after.status() {
            BoardStatus::Checkmate => san.push('#'),
            _ if after.checkers().popcnt() > 0 => san.push('+'),
            _ => {}
        }

        Some(AppliedMove {
            side,
            from,
            to,
            captured,
            san,
            fen: after.to_string(),
        })
    }
}

impl RulesEngine for ChessRules {
    fn apply_move(&mut self, from: Square, to: Square, promotion: Option<Piece>) -> Option<AppliedMove> {
        let board = self.game.current_position();
        let promotion = promotion.or_else(|| default_promotion(&board, from, to));
        self.apply(ChessMove::new(from, to, promotion))
    }

    fn apply_engine_move(&mut self, token: &str) -> Option<AppliedMove> {
        let chess_move = ChessMove::from_str(token.trim()).ok()?;
        self.apply(chess_move)
    }

    fn is_checkmate(&self) -> bool {
        self.game.current_position().status() == BoardStatus::Checkmate
    }

    fn is_draw(&self) -> bool {
        let board = self.game.current_position();
        board.status() == BoardStatus::Stalemate
            || has_insufficient_material(&board)
            || self.game.can_declare_draw()
    }

    fn is_in_check(&self) -> bool {
        self.game.current_position().checkers().popcnt() > 0
    }

    fn turn_to_move(&self) -> Color {
        self.game.side_to_move()
    }

    fn fen(&self) -> String {
        self.game.current_position().to_string()
    }

    fn applied_move_count(&self) -> usize {
        self.applied
    }

    fn legal_destinations(&self, from: Square) -> Vec<Square> {
        let board = self.game.current_position();
        MoveGen::new_legal(&board)
            .filter(|m| m.get_source() == from)
            .map(|m| m.get_dest())
            .collect()
    }

    fn reset(&mut self) {
        *self = ChessRules::new();
    }
}

/// Map the board surface's promotion letter (`q`, `r`, `b`, `n`) to a piece.
pub fn promotion_piece(c: char) -> Option<Piece> {
    match c.to_ascii_lowercase() {
        'q' => Some(Piece::Queen),
        'r' => Some(Piece::Rook),
        'b' => Some(Piece::Bishop),
        'n' => Some(Piece::Knight),
        _ => None,
    }
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

// The board surface promotes to a queen unless told otherwise.
fn default_promotion(board: &Board, from: Square, to: Square) -> Option<Piece> {
    if board.piece_on(from) != Some(Piece::Pawn) {
        return None;
    }
    match to.get_rank() {
        Rank::First | Rank::Eighth => Some(Piece::Queen),
        _ => None,
    }
}

fn captured_by(board: &Board, chess_move: ChessMove) -> Option<CapturedPiece> {
    let from = chess_move.get_source();
    let to = chess_move.get_dest();
    let mover = board.color_on(from)?;
    if let (Some(piece), Some(owner)) = (board.piece_on(to), board.color_on(to)) {
        return Some(CapturedPiece { piece, owner });
    }
    // En passant: a pawn changing file onto an empty square.
    if board.piece_on(from) == Some(Piece::Pawn) && from.get_file() != to.get_file() {
        return Some(CapturedPiece {
            piece: Piece::Pawn,
            owner: !mover,
        });
    }
    None
}

fn san_without_suffix(board: &Board, chess_move: ChessMove) -> String {
    let from = chess_move.get_source();
    let to = chess_move.get_dest();
    let piece = match board.piece_on(from) {
        Some(piece) => piece,
        None => return chess_move.to_string(),
    };
    let is_capture = captured_by(board, chess_move).is_some();
    let file_char = |sq: Square| (b'a' + sq.get_file().to_index() as u8) as char;
    let rank_char = |sq: Square| (b'1' + sq.get_rank().to_index() as u8) as char;

    if piece == Piece::King {
        let span = to.get_file().to_index() as i32 - from.get_file().to_index() as i32;
        if span == 2 {
            return "O-O".to_string();
        }
        if span == -2 {
            return "O-O-O".to_string();
        }
    }

    let mut san = String::new();
    if piece == Piece::Pawn {
        if is_capture {
            san.push(file_char(from));
        }
    } else {
        san.push(piece_letter(piece));
        let rivals: Vec<Square> = MoveGen::new_legal(board)
            .filter(|m| m.get_dest() == to && m.get_source() != from)
            .map(|m| m.get_source())
            .filter(|sq| board.piece_on(*sq) == Some(piece))
            .collect();
        if !rivals.is_empty() {
            if rivals.iter().all(|sq| sq.get_file() != from.get_file()) {
                san.push(file_char(from));
            } else if rivals.iter().all(|sq| sq.get_rank() != from.get_rank()) {
                san.push(rank_char(from));
            } else {
                san.push(file_char(from));
                san.push(rank_char(from));
            }
        }
    }
    if is_capture {
        san.push('x');
    }
    san.push_str(&to.to_string());
    if let Some(promoted) = chess_move.get_promotion() {
        san.push('=');
        san.push(piece_letter(promoted));
    }
    san
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_str(name).unwrap()
    }

    fn play(rules: &mut ChessRules, moves: &[&str]) -> Vec<AppliedMove> {
        moves
            .iter()
            .map(|m| rules.apply_engine_move(m).unwrap_or_else(|| panic!("illegal {}", m)))
            .collect()
    }

    #[test]
    fn pawn_push_notation() {
        let mut rules = ChessRules::new();
        let applied = rules.apply_move(sq("e2"), sq("e4"), None).unwrap();
        assert_eq!(applied.san, "e4");
        assert_eq!(applied.side, Color::White);
        assert_eq!(applied.captured, None);
        assert_eq!(rules.applied_move_count(), 1);
        assert_eq!(rules.turn_to_move(), Color::Black);
    }

    #[test]
    fn illegal_move_is_rejected_without_change() {
        let mut rules = ChessRules::new();
        let fen = rules.fen();
        assert!(rules.apply_move(sq("e2"), sq("e5"), None).is_none());
        assert!(rules.apply_engine_move("zz99").is_none());
        assert_eq!(rules.fen(), fen);
        assert_eq!(rules.applied_move_count(), 0);
    }

    #[test]
    fn capture_reports_taken_piece() {
        let mut rules = ChessRules::new();
        let applied = play(&mut rules, &["e2e4", "d7d5", "e4d5"]);
        assert_eq!(applied[2].san, "exd5");
        assert_eq!(
            applied[2].captured,
            Some(CapturedPiece {
                piece: Piece::Pawn,
                owner: Color::Black
            })
        );
        assert_eq!(applied[2].captured.unwrap().code(), "bP");
    }

    #[test]
    fn en_passant_captures_a_pawn() {
        let mut rules = ChessRules::new();
        let applied = play(&mut rules, &["e2e4", "a7a6", "e4e5", "d7d5", "e5d6"]);
        assert_eq!(applied[4].san, "exd6");
        assert_eq!(applied[4].captured.map(|c| c.piece), Some(Piece::Pawn));
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut rules = ChessRules::new();
        let applied = play(&mut rules, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(applied[3].san, "Qh4#");
        assert!(rules.is_checkmate());
        assert!(rules.is_in_check());
        assert!(!rules.is_draw());
    }

    #[test]
    fn castling_and_knight_disambiguation() {
        let mut rules = ChessRules::from_fen("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1").unwrap();
        let applied = rules.apply_move(sq("b1"), sq("d2"), None).unwrap();
        assert_eq!(applied.san, "Nbd2");

        let mut rules = ChessRules::from_fen("5k2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let applied = rules.apply_move(sq("e1"), sq("g1"), None).unwrap();
        assert_eq!(applied.san, "O-O+");
    }

    #[test]
    fn promotion_capture_notation() {
        let mut rules = ChessRules::from_fen("3r4/4P2k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let applied = rules.apply_move(sq("e7"), sq("d8"), None).unwrap();
        assert_eq!(applied.san, "exd8=Q");
        assert_eq!(applied.captured.map(|c| c.code()), Some("bR".to_string()));
    }

    #[test]
    fn rook_disambiguated_by_rank() {
        let mut rules = ChessRules::from_fen("7k/8/8/R7/8/8/8/R6K w - - 0 1").unwrap();
        let applied = rules.apply_move(sq("a1"), sq("a3"), None).unwrap();
        assert_eq!(applied.san, "R1a3");
    }

    #[test]
    fn engine_tokens_tolerate_whitespace() {
        let mut rules = ChessRules::new();
        let applied = rules.apply_engine_move(" g1f3\n").unwrap();
        assert_eq!(applied.san, "Nf3");
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let mut rules = ChessRules::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
        let applied = rules.apply_move(sq("a7"), sq("a8"), None).unwrap();
        assert_eq!(applied.san, "a8=Q+");

        let mut rules = ChessRules::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
        let applied = rules.apply_engine_move("a7a8n").unwrap();
        assert_eq!(applied.san, "a8=N");
    }

    #[test]
    fn bare_kings_are_a_draw() {
        let rules = ChessRules::from_fen("8/8/8/8/8/8/1q6/k6K w - - 0 1").unwrap();
        assert!(!rules.is_draw());
        let rules = ChessRules::from_fen("8/8/8/8/8/8/8/k6K w - - 0 1").unwrap();
        assert!(rules.is_draw());
    }

    #[test]
    fn legal_destinations_for_a_knight() {
        let rules = ChessRules::new();
        let mut targets: Vec<String> = rules.legal_destinations(sq("g1")).iter().map(|s| s.to_string()).collect();
        targets.sort();
        assert_eq!(targets, vec!["f3", "h3"]);
    }

    #[test]
    fn reset_restores_start_position() {
        let mut rules = ChessRules::new();
        let start = rules.fen();
        play(&mut rules, &["e2e4"]);
        rules.reset();
        assert_eq!(rules.fen(), start);
        assert_eq!(rules.applied_move_count(), 0);
    }
}
