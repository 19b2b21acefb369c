//! Pieces and their movement rules.
//!
//! Every kind is a pure predicate over the board: given the piece's current
//! square and a target square, decide whether the move is geometrically
//! possible. Nothing here mutates the board.

use serde::{Deserialize, Serialize};

use crate::{Board, PieceKind, Pos, Side};

/// Stable identity of a piece instance.
///
/// Ids are allocated by the [`Board`]. A Time/Plus swap destroys the old
/// piece and creates a new one, so the replacement gets a fresh id.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

/// A piece on the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    side: Side,
    pos: Pos,
    flipped: bool,
}

impl Piece {
    pub fn new(id: PieceId, kind: PieceKind, side: Side, pos: Pos, flipped: bool) -> Piece {
        Piece { id, kind, side, pos, flipped }
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Current square. Always equal to the cell holding this piece.
    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Orientation. An un-flipped Point moves toward row 0.
    #[inline]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub(crate) fn set_pos(&mut self, pos: Pos) {
        self.pos = pos;
    }

    pub(crate) fn toggle_flipped(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Check whether this piece may move to `to` on `board`.
    ///
    /// Rejects off-board targets, targets holding a piece of the same side
    /// (including this piece's own square) and anything outside the kind's
    /// geometry.
    pub fn is_movable_to(&self, board: &Board, to: Pos) -> bool {
        if !to.is_valid() {
            return false;
        }
        if let Some(target) = board.piece_at(to) {
            if target.side == self.side {
                return false;
            }
        }

        let dx = to.x - self.pos.x;
        let dy = to.y - self.pos.y;

        match self.kind {
            PieceKind::Point => self.point_reaches(board, dx, dy),
            PieceKind::Plus => (dx == 0) != (dy == 0) && board.is_path_clear(self.pos, to),
            PieceKind::Hourglass => matches!((dx.abs(), dy.abs()), (1, 2) | (2, 1)),
            PieceKind::Sun => dx.abs() <= 1 && dy.abs() <= 1 && (dx, dy) != (0, 0),
            PieceKind::Time => dx != 0 && dx.abs() == dy.abs() && board.is_path_clear(self.pos, to),
        }
    }

    /// Point: 1 or 2 cells straight ahead, the middle cell must be empty.
    fn point_reaches(&self, board: &Board, dx: i8, dy: i8) -> bool {
        if dx != 0 {
            return false;
        }
        let step = self.forward();
        if dy == step {
            true
        } else if dy == 2 * step {
            board.piece_at(self.pos.offset(0, step)).is_none()
        } else {
            false
        }
    }

    /// Row delta of one step "forward" for this piece.
    #[inline]
    pub fn forward(&self) -> i8 {
        if self.flipped {
            1
        } else {
            -1
        }
    }

    /// A copy of this piece as a different kind under a new id.
    pub fn clone_as(&self, kind: PieceKind, id: PieceId) -> Piece {
        Piece { id, kind, ..*self }
    }

    /// A Plus with this piece's square, side and orientation.
    pub fn clone_to_plus(&self, id: PieceId) -> Piece {
        self.clone_as(PieceKind::Plus, id)
    }

    /// A Time with this piece's square, side and orientation.
    pub fn clone_to_time(&self, id: PieceId) -> Piece {
        self.clone_as(PieceKind::Time, id)
    }

    /// Icon path for front ends, e.g. `"BluePieces/Point(down).png"`.
    pub fn image_key(&self) -> String {
        let file = match self.kind {
            PieceKind::Point if self.flipped => "Point(down).png",
            PieceKind::Point => "Point(up).png",
            PieceKind::Plus => "Plus.png",
            PieceKind::Hourglass => "Hourglass.png",
            PieceKind::Sun => "Sun.png",
            PieceKind::Time => "Time.png",
        };
        format!("{}Pieces/{}", self.side.name(), file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Place a piece and return a copy of it as stored.
    fn put(board: &mut Board, kind: PieceKind, side: Side, x: i8, y: i8, flipped: bool) -> Piece {
        let id = board.allocate_id();
        let piece = Piece::new(id, kind, side, Pos::new(x, y), flipped);
        assert!(board.place(piece).is_none());
        piece
    }

    fn destinations(board: &Board, piece: &Piece) -> Vec<Pos> {
        Pos::all().filter(|&to| piece.is_movable_to(board, to)).collect()
    }

    #[test]
    fn test_point_one_or_two_forward() {
        let mut board = Board::new();
        let point = put(&mut board, PieceKind::Point, Side::Yellow, 3, 5, false);

        assert!(point.is_movable_to(&board, Pos::new(3, 4)));
        assert!(point.is_movable_to(&board, Pos::new(3, 3)));
        assert!(!point.is_movable_to(&board, Pos::new(3, 2)));
        assert!(!point.is_movable_to(&board, Pos::new(2, 4)));
        assert!(!point.is_movable_to(&board, Pos::new(3, 5)));
    }

    #[test]
    fn test_point_blocked_by_middle_piece() {
        let mut board = Board::new();
        let point = put(&mut board, PieceKind::Point, Side::Yellow, 3, 5, false);
        put(&mut board, PieceKind::Sun, Side::Blue, 3, 4, true);

        assert!(!point.is_movable_to(&board, Pos::new(3, 3)));
        // The blocker itself can still be captured.
        assert!(point.is_movable_to(&board, Pos::new(3, 4)));
    }

    #[test]
    fn test_point_never_moves_backward() {
        let mut board = Board::new();
        let point = put(&mut board, PieceKind::Point, Side::Yellow, 3, 2, false);
        assert!(!point.is_movable_to(&board, Pos::new(3, 3)));
        assert!(!point.is_movable_to(&board, Pos::new(3, 4)));

        let flipped = put(&mut board, PieceKind::Point, Side::Blue, 5, 2, true);
        assert!(flipped.is_movable_to(&board, Pos::new(5, 3)));
        assert!(flipped.is_movable_to(&board, Pos::new(5, 4)));
        assert!(!flipped.is_movable_to(&board, Pos::new(5, 1)));
    }

    #[test]
    fn test_point_at_edge_stays_on_board() {
        let mut board = Board::new();
        let point = put(&mut board, PieceKind::Point, Side::Yellow, 0, 0, false);
        assert!(destinations(&board, &point).is_empty());
    }

    #[test]
    fn test_plus_orthogonal_slides() {
        let mut board = Board::new();
        let plus = put(&mut board, PieceKind::Plus, Side::Yellow, 3, 3, false);

        let dests = destinations(&board, &plus);
        // 6 cells along the row, 5 along the column.
        assert_eq!(dests.len(), 11);
        assert!(dests.iter().all(|d| d.x == 3 || d.y == 3));
        assert!(!plus.is_movable_to(&board, Pos::new(4, 4)));
    }

    #[test]
    fn test_plus_blocked_path() {
        let mut board = Board::new();
        let plus = put(&mut board, PieceKind::Plus, Side::Yellow, 0, 5, false);
        put(&mut board, PieceKind::Point, Side::Blue, 0, 2, true);
        put(&mut board, PieceKind::Point, Side::Yellow, 3, 5, false);

        assert!(plus.is_movable_to(&board, Pos::new(0, 3)));
        assert!(plus.is_movable_to(&board, Pos::new(0, 2)));
        assert!(!plus.is_movable_to(&board, Pos::new(0, 1)));
        assert!(plus.is_movable_to(&board, Pos::new(2, 5)));
        assert!(!plus.is_movable_to(&board, Pos::new(3, 5)));
        assert!(!plus.is_movable_to(&board, Pos::new(4, 5)));
    }

    #[test]
    fn test_hourglass_jumps() {
        let mut board = Board::new();
        let hourglass = put(&mut board, PieceKind::Hourglass, Side::Yellow, 3, 3, false);
        // Surround it completely; jumps ignore blockers.
        for (dx, dy) in [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)] {
            put(&mut board, PieceKind::Point, Side::Yellow, 3 + dx, 3 + dy, false);
        }

        let dests = destinations(&board, &hourglass);
        assert_eq!(dests.len(), 8);
        for d in dests {
            let (dx, dy) = ((d.x - 3).abs(), (d.y - 3).abs());
            assert!((dx, dy) == (1, 2) || (dx, dy) == (2, 1));
        }
    }

    #[test]
    fn test_sun_single_step() {
        let mut board = Board::new();
        let sun = put(&mut board, PieceKind::Sun, Side::Blue, 3, 0, true);

        let dests = destinations(&board, &sun);
        assert_eq!(dests.len(), 5);
        assert!(!sun.is_movable_to(&board, Pos::new(3, 2)));
        assert!(!sun.is_movable_to(&board, Pos::new(3, 0)));
    }

    #[test]
    fn test_time_diagonal_slides() {
        let mut board = Board::new();
        let time = put(&mut board, PieceKind::Time, Side::Yellow, 2, 5, false);
        put(&mut board, PieceKind::Point, Side::Blue, 4, 3, true);

        assert!(time.is_movable_to(&board, Pos::new(1, 4)));
        assert!(time.is_movable_to(&board, Pos::new(0, 3)));
        assert!(time.is_movable_to(&board, Pos::new(3, 4)));
        assert!(time.is_movable_to(&board, Pos::new(4, 3)));
        assert!(!time.is_movable_to(&board, Pos::new(5, 2)));
        assert!(!time.is_movable_to(&board, Pos::new(2, 3)));
        assert!(!time.is_movable_to(&board, Pos::new(3, 5)));
    }

    #[test]
    fn test_no_kind_captures_own_side() {
        for kind in PieceKind::all() {
            let mut board = Board::new();
            let piece = put(&mut board, kind, Side::Yellow, 3, 3, false);
            for pos in Pos::all() {
                if pos != piece.pos() && board.piece_at(pos).is_none() {
                    put(&mut board, PieceKind::Point, Side::Yellow, pos.x, pos.y, false);
                }
            }
            assert!(destinations(&board, &piece).is_empty(), "{:?} captured a friend", kind);
        }
    }

    #[test]
    fn test_off_board_targets_rejected() {
        let mut board = Board::new();
        let plus = put(&mut board, PieceKind::Plus, Side::Yellow, 0, 0, false);
        assert!(!plus.is_movable_to(&board, Pos::new(-1, 0)));
        assert!(!plus.is_movable_to(&board, Pos::new(0, 6)));
        assert!(!plus.is_movable_to(&board, Pos::new(7, 0)));
    }

    #[test]
    fn test_clone_preserves_everything_but_kind_and_id() {
        let piece = Piece::new(PieceId(7), PieceKind::Time, Side::Blue, Pos::new(2, 0), true);
        let plus = piece.clone_to_plus(PieceId(9));
        assert_eq!(plus.kind(), PieceKind::Plus);
        assert_eq!(plus.id(), PieceId(9));
        assert_eq!(plus.pos(), piece.pos());
        assert_eq!(plus.side(), piece.side());
        assert_eq!(plus.is_flipped(), piece.is_flipped());

        let time = plus.clone_to_time(PieceId(10));
        assert_eq!(time.kind(), PieceKind::Time);
        assert_eq!(time.pos(), piece.pos());
    }

    #[test]
    fn test_image_key() {
        let up = Piece::new(PieceId(0), PieceKind::Point, Side::Yellow, Pos::new(0, 4), false);
        let down = Piece::new(PieceId(1), PieceKind::Point, Side::Blue, Pos::new(0, 1), true);
        let sun = Piece::new(PieceId(2), PieceKind::Sun, Side::Blue, Pos::new(3, 0), true);
        assert_eq!(up.image_key(), "YellowPieces/Point(up).png");
        assert_eq!(down.image_key(), "BluePieces/Point(down).png");
        assert_eq!(sun.image_key(), "BluePieces/Sun.png");
    }
}
