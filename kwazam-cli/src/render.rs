//! Plain-text board rendering.
//!
//! ```text
//!      0  1  2  3  4  5  6
//!   0 b+ bH bT bS bT bH b+
//!   1 bv bv bv bv bv bv bv
//!   2 .  .  .  .  .  .  .
//! ```
//!
//! Each cell is the side's initial in lowercase (`y`/`b`) followed by the
//! kind. Points show their heading, `^` toward row 0 and `v` away from it.

use std::fmt::Write;

use kwazam_core::{Game, Piece, PieceKind, Pos, SWITCH_COUNTER};

fn cell(piece: Option<&Piece>) -> String {
    let Some(piece) = piece else {
        return ". ".to_string();
    };
    let side = match piece.side().index() {
        0 => 'y',
        _ => 'b',
    };
    let kind = match piece.kind() {
        PieceKind::Point if piece.is_flipped() => 'v',
        PieceKind::Point => '^',
        PieceKind::Plus => '+',
        PieceKind::Hourglass => 'H',
        PieceKind::Sun => 'S',
        PieceKind::Time => 'T',
    };
    format!("{}{}", side, kind)
}

/// Render the grid, marking `highlight` squares with `*`.
pub fn board(game: &Game, highlight: &[Pos]) -> String {
    let board = game.board();
    let mut out = String::from("    ");
    for x in 0..board.cols() {
        let _ = write!(out, " {} ", x);
    }
    out.push('\n');

    for y in 0..board.rows() as i8 {
        let _ = write!(out, "  {} ", y);
        for x in 0..board.cols() as i8 {
            let pos = Pos::new(x, y);
            let mut text = cell(game.piece_at(pos));
            if highlight.contains(&pos) {
                text.replace_range(1..2, "*");
            }
            let _ = write!(out, "{} ", text);
        }
        out.push('\n');
    }
    out
}

/// One-line summary of whose turn it is and what is pending.
pub fn status(game: &Game) -> String {
    if let Some(winner) = game.winner() {
        return format!("{} wins", winner);
    }
    let side = game.current_side();
    let until_swap = SWITCH_COUNTER.saturating_sub(game.total_play_count());
    if game.has_played() {
        format!("{} has moved; switch the turn ({} plies until Time/Plus swap)", side, until_swap)
    } else {
        format!("{} to move ({} plies until Time/Plus swap)", side, until_swap)
    }
}
