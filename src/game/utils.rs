use chess::{BitBoard, Board, Color, Piece, EMPTY};

/// Convert a chess color to a string
pub fn color_to_string(color: Color) -> String {
    match color {
        Color::White => "white".to_string(),
        Color::Black => "black".to_string(),
    }
}

/// Capitalised side name for status text
pub fn side_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

/// Format remaining seconds as `MM:SS`
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Check if the board has insufficient material for checkmate
pub fn has_insufficient_material(board: &Board) -> bool {
    let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
    if heavy != EMPTY {
        return false;
    }

    let knights = *board.pieces(Piece::Knight);
    let bishops = *board.pieces(Piece::Bishop);
    let minors = (knights | bishops).popcnt();

    // King vs King, or a lone minor piece
    if minors <= 1 {
        return true;
    }

    // Only bishops left, all on the same square color
    if knights == EMPTY {
        let on_light = bishops_on_light(bishops).popcnt();
        return on_light == 0 || on_light == bishops.popcnt();
    }

    false
}

fn bishops_on_light(bishops: BitBoard) -> BitBoard {
    let mut light = EMPTY;
    for square in bishops {
        if (square.get_rank().to_index() + square.get_file().to_index()) % 2 == 1 {
            light |= BitBoard::from_square(square);
        }
    }
    light
}
