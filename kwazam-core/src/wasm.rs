//! WASM bindings for kwazam-core
//!
//! Exposes the front-end contract: cell queries, piece icons, turn state and
//! the move/switch/save/load entry points. Engine events are queued and
//! handed out by `takeEvents`.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{EventQueue, Game, GameOptions, Piece, Pos, SaveData};

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
    events: EventQueue,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a new match
    #[wasm_bindgen(constructor)]
    pub fn new(auto_switch_turn: Option<bool>) -> WasmGame {
        let options = GameOptions::default().with_auto_switch_turn(auto_switch_turn.unwrap_or(false));
        let mut inner = Game::with_options(options);
        let events = EventQueue::new();
        inner.subscribe(events.sink());
        WasmGame { inner, events }
    }

    /// Number of rows (6)
    pub fn rows(&self) -> usize {
        self.inner.board().rows()
    }

    /// Number of columns (7)
    pub fn cols(&self) -> usize {
        self.inner.board().cols()
    }

    /// Player to move (0 = Yellow, 1 = Blue)
    pub fn turn(&self) -> usize {
        self.inner.turn()
    }

    #[wasm_bindgen(js_name = hasPlayed)]
    pub fn has_played(&self) -> bool {
        self.inner.has_played()
    }

    /// Winner index, or undefined while the game is running
    pub fn winner(&self) -> Option<usize> {
        self.inner.winner().map(|side| side.index())
    }

    /// Piece on a cell as `{ kind, side, flipped, image }`, or null
    #[wasm_bindgen(js_name = getPieceAt)]
    pub fn get_piece_at(&self, x: i8, y: i8) -> JsValue {
        match self.inner.piece_at(Pos::new(x, y)) {
            Some(piece) => to_js(&PieceView::from(piece)),
            None => JsValue::NULL,
        }
    }

    /// Icon path for the piece on a cell, or undefined if empty
    #[wasm_bindgen(js_name = imageAt)]
    pub fn image_at(&self, x: i8, y: i8) -> Option<String> {
        self.inner.piece_at(Pos::new(x, y)).map(Piece::image_key)
    }

    /// Squares the piece on `(x, y)` may move to, as flattened `[x, y]` pairs
    #[wasm_bindgen(js_name = legalDestinations)]
    pub fn legal_destinations(&self, x: i8, y: i8) -> Vec<i8> {
        self.inner
            .legal_destinations(Pos::new(x, y))
            .into_iter()
            .flat_map(|pos| [pos.x, pos.y])
            .collect()
    }

    #[wasm_bindgen(js_name = checkPiecePlayability)]
    pub fn check_piece_playability(&self, x: i8, y: i8) -> bool {
        self.inner.check_piece_playability(Pos::new(x, y))
    }

    #[wasm_bindgen(js_name = checkPieceMove)]
    pub fn check_piece_move(&self, from_x: i8, from_y: i8, to_x: i8, to_y: i8) -> bool {
        self.inner.check_piece_move(Pos::new(from_x, from_y), Pos::new(to_x, to_y))
    }

    /// Apply a move. Returns true if it was legal.
    #[wasm_bindgen(js_name = playPieceMove)]
    pub fn play_piece_move(&mut self, from_x: i8, from_y: i8, to_x: i8, to_y: i8) -> bool {
        self.inner
            .play_piece_move(Pos::new(from_x, from_y), Pos::new(to_x, to_y))
            .is_some()
    }

    /// Hand over the turn (flip, then swap Time/Plus if due)
    #[wasm_bindgen(js_name = switchTurn)]
    pub fn switch_turn(&mut self) -> bool {
        self.inner.switch_turn()
    }

    #[wasm_bindgen(js_name = newGame)]
    pub fn new_game(&mut self) {
        self.inner.new_game();
    }

    /// Events raised since the last call, oldest first, e.g.
    /// `["PieceMove", "PieceSwitch", { "PlayerWin": 0 }]`
    #[wasm_bindgen(js_name = takeEvents)]
    pub fn take_events(&mut self) -> JsValue {
        to_js(&self.events.drain())
    }

    /// Save-file text for the current state
    #[wasm_bindgen(js_name = saveGameData)]
    pub fn save_game_data(&self) -> String {
        self.inner.to_save_data().to_text()
    }

    /// Load save-file text. Returns false and keeps the current game on error.
    #[wasm_bindgen(js_name = loadGameData)]
    pub fn load_game_data(&mut self, text: &str) -> bool {
        match SaveData::parse(text) {
            Ok(data) => self.inner.restore(&data).is_ok(),
            Err(_) => false,
        }
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new(None)
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// Serializable piece for JavaScript
#[derive(Serialize)]
struct PieceView {
    kind: &'static str,
    side: usize,
    flipped: bool,
    image: String,
}

impl From<&Piece> for PieceView {
    fn from(piece: &Piece) -> Self {
        PieceView {
            kind: piece.kind().token(),
            side: piece.side().index(),
            flipped: piece.is_flipped(),
            image: piece.image_key(),
        }
    }
}
