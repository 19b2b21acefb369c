//! Game orchestration: turn cadence, move validation and application, the
//! periodic Time/Plus swap, win detection and save/load.
//!
//! # Turn Cadence
//!
//! ```text
//! AwaitingMove(turn) --play_piece_move--> AwaitingMove(turn), has_played = true
//!                    --switch_turn------> AwaitingMove(other), board flipped
//!                    --Sun captured-----> GameOver(winner)
//! GameOver(winner)   --new_game / load--> AwaitingMove(..)
//! ```
//!
//! A player moves at most once per slot. The slot ends only when the turn is
//! switched, either by the caller or automatically when
//! [`GameOptions::auto_switch_turn`] is set.

use std::io::{Read, Write};

use tracing::{debug, info, warn};

use crate::event::Listeners;
use crate::{
    Board, GameEvent, GameOptions, Piece, PieceId, PieceKind, PieceRecord, Player, Pos, SaveData, SaveError,
    SaveResult, Side, ROWS, SWITCH_COUNTER,
};

/// What a successful move did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveReport {
    pub from: Pos,
    /// The moved piece after the move.
    pub piece: Piece,
    pub captured: Option<Piece>,
    /// A Point reached the first or last row and turned around.
    pub reversed: bool,
    /// Set when the move ended the game.
    pub winner: Option<Side>,
}

#[derive(Debug)]
pub struct Game {
    players: [Player; 2],
    board: Board,
    turn: Side,
    last_moved: Option<PieceId>,
    winner: Option<Side>,
    options: GameOptions,
    listeners: Listeners,
}

/// Fresh players and board in the starting layout.
fn starting_position() -> ([Player; 2], Board) {
    let mut board = Board::new();
    let mut yellow = Player::new(Side::Yellow);
    let mut blue = Player::new(Side::Blue);
    yellow.initialize_pieces(&mut board, 0, 4, false);
    blue.initialize_pieces(&mut board, 0, 0, true);
    ([yellow, blue], board)
}

/// A side with no Sun left loses.
fn winner_of(players: &[Player; 2], board: &Board) -> Option<Side> {
    players
        .iter()
        .find(|player| !player.has_kind(board, PieceKind::Sun))
        .map(|loser| loser.side().opponent())
}

impl Game {
    /// Start a match with default options.
    pub fn new() -> Game {
        Game::with_options(GameOptions::default())
    }

    pub fn with_options(options: GameOptions) -> Game {
        let (players, board) = starting_position();
        Game {
            players,
            board,
            turn: Side::Yellow,
            last_moved: None,
            winner: None,
            options,
            listeners: Listeners::new(),
        }
    }

    // ========== Queries ==========

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// Index of the player to move (0 or 1).
    pub fn turn(&self) -> usize {
        self.turn.index()
    }

    pub fn current_side(&self) -> Side {
        self.turn
    }

    pub fn current_player(&self) -> &Player {
        self.player(self.turn)
    }

    /// Whether the player to move already used this slot.
    pub fn has_played(&self) -> bool {
        self.current_player().has_played()
    }

    pub fn piece_at(&self, pos: Pos) -> Option<&Piece> {
        self.board.piece_at(pos)
    }

    pub fn last_moved_piece(&self) -> Option<&Piece> {
        self.last_moved.and_then(|id| self.board.find(id))
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn options(&self) -> GameOptions {
        self.options
    }

    /// Plies made by both players since the last swap.
    pub fn total_play_count(&self) -> u32 {
        self.players.iter().map(Player::play_count).sum()
    }

    /// Register a callback for [`GameEvent`]s.
    pub fn subscribe<F>(&mut self, callback: F) -> usize
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    fn notify(&mut self, event: GameEvent) {
        self.listeners.notify(&event);
    }

    // ========== Move Validation ==========

    /// Check that the piece on `pos` may be picked up: it belongs to the
    /// player to move, that player has not played this slot, and the game is
    /// still running.
    pub fn check_piece_playability(&self, pos: Pos) -> bool {
        if self.is_over() || self.current_player().has_played() {
            return false;
        }
        self.board
            .piece_at(pos)
            .is_some_and(|piece| piece.side() == self.turn)
    }

    /// Check a full move from `from` to `to`.
    pub fn check_piece_move(&self, from: Pos, to: Pos) -> bool {
        if from == to || !self.check_piece_playability(from) {
            return false;
        }
        self.board
            .piece_at(from)
            .is_some_and(|piece| piece.is_movable_to(&self.board, to))
    }

    /// Every square the piece on `from` may move to right now.
    pub fn legal_destinations(&self, from: Pos) -> Vec<Pos> {
        if !self.check_piece_playability(from) {
            return Vec::new();
        }
        Pos::all().filter(|&to| self.check_piece_move(from, to)).collect()
    }

    // ========== Mutation ==========

    /// Play a move. Returns `None` and changes nothing if the move is not
    /// legal.
    pub fn play_piece_move(&mut self, from: Pos, to: Pos) -> Option<MoveReport> {
        if !self.check_piece_move(from, to) {
            return None;
        }
        let mover = *self.board.piece_at(from)?;

        let captured = self.board.piece_at(to).copied();
        if let Some(target) = captured {
            let owner = &mut self.players[target.side().index()];
            self.board.remove_piece(target.id(), owner);
            if self.last_moved == Some(target.id()) {
                self.last_moved = None;
            }
        }

        self.board.set_piece_at(mover.id(), to);

        let reversed = mover.kind() == PieceKind::Point && (to.y == 0 || to.y as usize == ROWS - 1);
        if reversed {
            self.board.toggle_flipped(mover.id());
        }
        let piece = *self.board.find(mover.id())?;

        debug!(
            side = %self.turn,
            kind = %piece.kind(),
            %from,
            %to,
            captured = ?captured.map(|c| c.kind()),
            reversed,
            "piece moved"
        );
        self.notify(GameEvent::PieceMove);
        self.end_turn(mover.id());

        if self.options.auto_switch_turn && !self.is_over() {
            self.switch_turn();
        }

        Some(MoveReport {
            from,
            piece,
            captured,
            reversed,
            winner: self.winner,
        })
    }

    /// Close out the mover's ply: either declare the winner or charge the
    /// ply to the mover and mark the slot as used.
    fn end_turn(&mut self, moved: PieceId) {
        if let Some(winner) = self.check_winner() {
            self.winner = Some(winner);
            info!(%winner, "game over");
            self.notify(GameEvent::PlayerWin(winner.index()));
        } else {
            let player = &mut self.players[self.turn.index()];
            player.increment_play_count();
            player.set_has_played(true);
            self.last_moved = Some(moved);
        }
    }

    /// The winner if exactly one side still has its Sun.
    pub fn check_winner(&self) -> Option<Side> {
        winner_of(&self.players, &self.board)
    }

    /// Hand the turn to the other player and rotate the board to face them.
    ///
    /// Returns false once the game is over.
    pub fn switch_turn_and_flip_board(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        self.turn = self.turn.opponent();
        self.players[self.turn.index()].reset_has_played();
        self.board.flip();
        debug!(side = %self.turn, "turn switched");
        true
    }

    /// Swap every Time with a Plus and vice versa once both players together
    /// have made [`SWITCH_COUNTER`] plies, then restart the count.
    ///
    /// Each swapped piece is replaced by a new piece (new id) on the same
    /// square with the same side and orientation.
    pub fn switch_pieces_if_play_count_reached(&mut self) -> bool {
        if self.is_over() || self.total_play_count() != SWITCH_COUNTER {
            return false;
        }

        let mut swapped = 0;
        for player in &mut self.players {
            let owned: Vec<PieceId> = player.pieces().iter().copied().collect();
            for id in owned {
                let Some(old) = self.board.find(id).copied() else {
                    continue;
                };
                let new_id = self.board.allocate_id();
                let replacement = match old.kind() {
                    PieceKind::Time => old.clone_to_plus(new_id),
                    PieceKind::Plus => old.clone_to_time(new_id),
                    _ => continue,
                };

                self.board.place(replacement);
                player.remove_piece(id);
                player.add_piece(new_id);
                if self.last_moved == Some(id) {
                    self.last_moved = Some(new_id);
                }
                swapped += 1;
            }
            player.reset_play_count();
        }

        debug!(swapped, "time and plus pieces switched");
        self.notify(GameEvent::PieceSwitch);
        true
    }

    /// The full "switch turn" action: flip to the other player, then apply
    /// the Time/Plus swap if it is due.
    pub fn switch_turn(&mut self) -> bool {
        if !self.switch_turn_and_flip_board() {
            return false;
        }
        self.switch_pieces_if_play_count_reached();
        true
    }

    /// Throw away the current match and start over. Options and listeners
    /// are kept.
    pub fn new_game(&mut self) {
        let (players, board) = starting_position();
        self.players = players;
        self.board = board;
        self.turn = Side::Yellow;
        self.last_moved = None;
        self.winner = None;
        info!("new game");
        self.notify(GameEvent::NewGame);
    }

    // ========== Save / Load ==========

    /// Snapshot the game in save-file order.
    pub fn to_save_data(&self) -> SaveData {
        let mut pieces = Vec::with_capacity(self.board.piece_count());
        for x in 0..self.board.cols() as i8 {
            for y in 0..self.board.rows() as i8 {
                if let Some(piece) = self.board.piece_at(Pos::new(x, y)) {
                    pieces.push(PieceRecord::from_piece(piece));
                }
            }
        }

        SaveData {
            turn: self.turn(),
            play_counts: [self.players[0].play_count(), self.players[1].play_count()],
            last_moved: self.last_moved_piece().map(PieceRecord::from_piece),
            pieces,
            has_played: self.has_played(),
        }
    }

    /// Replace the whole game state with `data`.
    ///
    /// The new board and players are built off to the side and swapped in
    /// only once everything checks out.
    pub fn restore(&mut self, data: &SaveData) -> SaveResult<()> {
        let turn = Side::from_index(data.turn).ok_or(SaveError::InvalidTurn(data.turn))?;
        data.check_play_counts()?;

        let mut board = Board::new();
        let mut players = [Player::new(Side::Yellow), Player::new(Side::Blue)];
        for (i, record) in data.pieces.iter().enumerate() {
            let line = 6 + 2 * i;
            if !record.pos.is_valid() {
                return Err(SaveError::OffBoard { line, pos: record.pos });
            }
            if board.piece_at(record.pos).is_some() {
                return Err(SaveError::DuplicateCell { line, pos: record.pos });
            }
            let id = board.allocate_id();
            board.place(Piece::new(id, record.kind, record.side, record.pos, record.flipped));
            players[record.side.index()].add_piece(id);
        }

        let last_moved = match &data.last_moved {
            Some(record) => Some(
                board
                    .piece_at(record.pos)
                    .filter(|piece| record.matches(piece))
                    .map(Piece::id)
                    .ok_or(SaveError::LastMovedMismatch { pos: record.pos })?,
            ),
            None => None,
        };

        for (player, &count) in players.iter_mut().zip(&data.play_counts) {
            player.set_play_count(count);
        }
        players[turn.index()].set_has_played(data.has_played);

        self.winner = winner_of(&players, &board);
        self.players = players;
        self.board = board;
        self.turn = turn;
        self.last_moved = last_moved;
        Ok(())
    }

    /// Write the game to `writer` in the save format.
    pub fn try_save<W: Write>(&self, writer: W) -> SaveResult<()> {
        self.to_save_data().write_to(writer)
    }

    /// Read a saved game from `reader`. On error the game is untouched.
    pub fn try_load<R: Read>(&mut self, reader: R) -> SaveResult<()> {
        let data = SaveData::read_from(reader)?;
        self.restore(&data)?;
        debug!(turn = data.turn, pieces = data.pieces.len(), "game loaded");
        Ok(())
    }

    /// Boolean form of [`Game::try_save`] for front ends.
    pub fn save_game_data<W: Write>(&self, writer: W) -> bool {
        match self.try_save(writer) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to save game");
                false
            }
        }
    }

    /// Boolean form of [`Game::try_load`] for front ends.
    pub fn load_game_data<R: Read>(&mut self, reader: R) -> bool {
        match self.try_load(reader) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to load game");
                false
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
