//! The 6x7 grid.
//!
//! Cells hold pieces by value. Each piece also records its own square, and
//! every mutation here keeps the two in agreement.

use crate::{Piece, PieceId, Player, Pos, COLS, ROWS};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    cells: [[Option<Piece>; COLS]; ROWS],
    next_id: u32,
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Board {
        Board {
            cells: [[None; COLS]; ROWS],
            next_id: 0,
        }
    }

    /// Number of rows (6).
    #[inline]
    pub fn rows(&self) -> usize {
        ROWS
    }

    /// Number of columns (7).
    #[inline]
    pub fn cols(&self) -> usize {
        COLS
    }

    /// Hand out a fresh piece id.
    pub fn allocate_id(&mut self) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Get the piece at a square. Off-board squares are simply empty.
    #[inline]
    pub fn piece_at(&self, pos: Pos) -> Option<&Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.cells[pos.y as usize][pos.x as usize].as_ref()
    }

    /// Find a piece by id.
    pub fn find(&self, id: PieceId) -> Option<&Piece> {
        self.pieces().find(|piece| piece.id() == id)
    }

    /// Iterate over all pieces, row by row.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().flatten().flatten()
    }

    /// Number of occupied cells.
    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    fn cell_mut(&mut self, pos: Pos) -> &mut Option<Piece> {
        &mut self.cells[pos.y as usize][pos.x as usize]
    }

    /// Put a piece on the cell named by its own position.
    ///
    /// Returns whatever the cell held before. Off-board pieces are handed
    /// straight back.
    pub fn place(&mut self, piece: Piece) -> Option<Piece> {
        if !piece.pos().is_valid() {
            return Some(piece);
        }
        self.cell_mut(piece.pos()).replace(piece)
    }

    /// Move a piece to `to`, clearing its previous cell.
    ///
    /// Returns false (and changes nothing) if the piece is not on the board,
    /// `to` is off the board, or `to` holds a different piece. Capture the
    /// occupant first with [`Board::remove_piece`].
    pub fn set_piece_at(&mut self, id: PieceId, to: Pos) -> bool {
        if !to.is_valid() {
            return false;
        }
        let Some(from) = self.find(id).map(Piece::pos) else {
            return false;
        };
        if self.piece_at(to).is_some_and(|occupant| occupant.id() != id) {
            return false;
        }

        let Some(mut piece) = self.cell_mut(from).take() else {
            return false;
        };
        piece.set_pos(to);
        *self.cell_mut(to) = Some(piece);
        true
    }

    /// Toggle the orientation of a single piece in place.
    pub(crate) fn toggle_flipped(&mut self, id: PieceId) -> bool {
        let Some(pos) = self.find(id).map(Piece::pos) else {
            return false;
        };
        match self.cell_mut(pos) {
            Some(piece) => {
                piece.toggle_flipped();
                true
            }
            None => false,
        }
    }

    /// Take a piece off the board and out of `owner`'s set.
    ///
    /// No-op returning `None` if the piece is not on the board.
    pub fn remove_piece(&mut self, id: PieceId, owner: &mut Player) -> Option<Piece> {
        let pos = self.find(id)?.pos();
        owner.remove_piece(id);
        self.cell_mut(pos).take()
    }

    /// Rotate the whole grid by 180°.
    ///
    /// Both axes invert: `(x, y)` goes to `(COLS-1-x, ROWS-1-y)`. Every moved
    /// piece has its square rewritten and its orientation toggled, so after
    /// the flip an un-flipped piece belongs to the side now at the bottom.
    /// Mirroring a single axis would break every direction-sensitive rule.
    pub fn flip(&mut self) {
        let mut rotated = [[None; COLS]; ROWS];
        for piece in self.pieces() {
            let mut piece = *piece;
            let to = piece.pos().rotated();
            piece.set_pos(to);
            piece.toggle_flipped();
            rotated[to.y as usize][to.x as usize] = Some(piece);
        }
        self.cells = rotated;
    }

    /// Empty every cell. Id allocation continues where it left off.
    pub fn clear_pieces(&mut self) {
        self.cells = [[None; COLS]; ROWS];
    }

    /// Check that every square strictly between `from` and `to` is empty.
    ///
    /// The two squares must share a row, column or diagonal; anything else
    /// is reported as blocked.
    pub fn is_path_clear(&self, from: Pos, to: Pos) -> bool {
        if !from.is_valid() || !to.is_valid() {
            return false;
        }
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if !(dx == 0 || dy == 0 || dx.abs() == dy.abs()) {
            return false;
        }

        let (sx, sy) = (dx.signum(), dy.signum());
        let mut cur = from.offset(sx, sy);
        while cur != to {
            if !cur.is_valid() || self.piece_at(cur).is_some() {
                return false;
            }
            cur = cur.offset(sx, sy);
        }
        true
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
