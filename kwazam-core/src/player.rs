//! Per-side bookkeeping: owned pieces, ply counter and the "has played this
//! slot" flag.

use std::collections::BTreeSet;

use crate::{Board, Piece, PieceId, PieceKind, Pos, Side};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Player {
    side: Side,
    pieces: BTreeSet<PieceId>,
    play_count: u32,
    has_played: bool,
}

impl Player {
    /// Create a player with no pieces.
    pub fn new(side: Side) -> Player {
        Player {
            side,
            pieces: BTreeSet::new(),
            play_count: 0,
            has_played: false,
        }
    }

    /// Player index (0 or 1).
    #[inline]
    pub fn index(&self) -> usize {
        self.side.index()
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    pub fn pieces(&self) -> &BTreeSet<PieceId> {
        &self.pieces
    }

    #[inline]
    pub fn owns(&self, id: PieceId) -> bool {
        self.pieces.contains(&id)
    }

    pub fn add_piece(&mut self, id: PieceId) {
        self.pieces.insert(id);
    }

    pub fn remove_piece(&mut self, id: PieceId) -> bool {
        self.pieces.remove(&id)
    }

    pub fn clear_pieces(&mut self) {
        self.pieces.clear();
    }

    /// Check whether any owned piece on `board` is of `kind`.
    pub fn has_kind(&self, board: &Board, kind: PieceKind) -> bool {
        self.pieces
            .iter()
            .filter_map(|&id| board.find(id))
            .any(|piece| piece.kind() == kind)
    }

    /// Plies made since the last Time/Plus swap.
    #[inline]
    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    pub fn set_play_count(&mut self, count: u32) {
        self.play_count = count;
    }

    pub fn increment_play_count(&mut self) {
        self.play_count += 1;
    }

    pub fn reset_play_count(&mut self) {
        self.play_count = 0;
    }

    /// Whether this player already moved in the current slot.
    #[inline]
    pub fn has_played(&self) -> bool {
        self.has_played
    }

    pub fn set_has_played(&mut self, has_played: bool) {
        self.has_played = has_played;
    }

    pub fn reset_has_played(&mut self) {
        self.has_played = false;
    }

    /// Seed the starting army at one end of the board.
    ///
    /// Seven Points fill one row; the back rank is
    /// `Plus Hourglass Time Sun Time Hourglass Plus`. With `opposite` set the
    /// Points sit on the inner row `offset_y + 1`, the back rank on `offset_y`,
    /// and every piece starts flipped so it faces the other side.
    pub fn initialize_pieces(&mut self, board: &mut Board, offset_x: i8, offset_y: i8, opposite: bool) {
        const BACK_RANK: [PieceKind; 7] = [
            PieceKind::Plus,
            PieceKind::Hourglass,
            PieceKind::Time,
            PieceKind::Sun,
            PieceKind::Time,
            PieceKind::Hourglass,
            PieceKind::Plus,
        ];

        let (point_row, back_row) = if opposite {
            (offset_y + 1, offset_y)
        } else {
            (offset_y, offset_y + 1)
        };

        let layout = (0..7)
            .map(|i| (PieceKind::Point, Pos::new(offset_x + i, point_row)))
            .chain(
                BACK_RANK
                    .iter()
                    .enumerate()
                    .map(|(i, &kind)| (kind, Pos::new(offset_x + i as i8, back_row))),
            );

        for (kind, pos) in layout {
            let id = board.allocate_id();
            board.place(Piece::new(id, kind, self.side, pos, opposite));
            self.add_piece(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_new() {
        let player = Player::new(Side::Blue);
        assert_eq!(player.index(), 1);
        assert_eq!(player.side(), Side::Blue);
        assert!(player.pieces().is_empty());
        assert_eq!(player.play_count(), 0);
        assert!(!player.has_played());
    }

    #[test]
    fn test_play_count() {
        let mut player = Player::new(Side::Yellow);
        player.increment_play_count();
        player.increment_play_count();
        assert_eq!(player.play_count(), 2);
        player.reset_play_count();
        assert_eq!(player.play_count(), 0);
        player.set_play_count(3);
        assert_eq!(player.play_count(), 3);
    }

    #[test]
    fn test_has_played_flag() {
        let mut player = Player::new(Side::Yellow);
        player.set_has_played(true);
        assert!(player.has_played());
        player.reset_has_played();
        assert!(!player.has_played());
    }

    #[test]
    fn test_piece_membership() {
        let mut player = Player::new(Side::Yellow);
        player.add_piece(PieceId(3));
        assert!(player.owns(PieceId(3)));
        assert!(player.remove_piece(PieceId(3)));
        assert!(!player.remove_piece(PieceId(3)));
        player.add_piece(PieceId(4));
        player.clear_pieces();
        assert!(player.pieces().is_empty());
    }

    #[test]
    fn test_initialize_pieces_near_side() {
        let mut board = Board::new();
        let mut player = Player::new(Side::Yellow);
        player.initialize_pieces(&mut board, 0, 4, false);

        assert_eq!(player.pieces().len(), 14);
        for x in 0..7 {
            let point = board.piece_at(Pos::new(x, 4)).unwrap();
            assert_eq!(point.kind(), PieceKind::Point);
            assert!(!point.is_flipped());
        }
        let back: Vec<PieceKind> = (0..7).map(|x| board.piece_at(Pos::new(x, 5)).unwrap().kind()).collect();
        assert_eq!(
            back,
            vec![
                PieceKind::Plus,
                PieceKind::Hourglass,
                PieceKind::Time,
                PieceKind::Sun,
                PieceKind::Time,
                PieceKind::Hourglass,
                PieceKind::Plus,
            ]
        );
        assert!(player.has_kind(&board, PieceKind::Sun));
    }

    #[test]
    fn test_initialize_pieces_opposite_side() {
        let mut board = Board::new();
        let mut player = Player::new(Side::Blue);
        player.initialize_pieces(&mut board, 0, 0, true);

        for x in 0..7 {
            let point = board.piece_at(Pos::new(x, 1)).unwrap();
            assert_eq!(point.kind(), PieceKind::Point);
            assert!(point.is_flipped());
            assert_eq!(point.side(), Side::Blue);
        }
        assert_eq!(board.piece_at(Pos::new(3, 0)).unwrap().kind(), PieceKind::Sun);
        assert!(board.pieces().all(|p| player.owns(p.id())));
    }

    #[test]
    fn test_has_kind_ignores_captured() {
        let mut board = Board::new();
        let mut player = Player::new(Side::Yellow);
        player.initialize_pieces(&mut board, 0, 4, false);
        let sun = board.piece_at(Pos::new(3, 5)).unwrap().id();

        board.remove_piece(sun, &mut player);
        assert!(!player.has_kind(&board, PieceKind::Sun));
        assert!(player.has_kind(&board, PieceKind::Time));
    }
}
