//! Kwazam chess rule engine.
//!
//! # Board Geometry
//!
//! ```text
//! 7 columns (x = 0..6) by 6 rows (y = 0..5), origin at the top-left:
//!
//!        x=0 x=1 x=2 x=3 x=4 x=5 x=6
//!   y=0   +   H   T   S   T   H   +     <- Blue back rank (flipped)
//!   y=1   .   .   .   .   .   .   .     <- Blue Points
//!   y=2
//!   y=3
//!   y=4   .   .   .   .   .   .   .     <- Yellow Points
//!   y=5   +   H   T   S   T   H   +     <- Yellow back rank
//! ```
//!
//! The side to move always sits at the bottom. Switching the turn rotates the
//! whole grid by 180° (both axes), so "forward" for an un-flipped piece is
//! always toward row 0.
//!
//! # Time/Plus Swap
//!
//! Every [`SWITCH_COUNTER`] plies (summed over both players) all Time pieces
//! become Plus pieces and vice versa. The swap is checked when the turn is
//! switched.

pub mod board;
pub mod error;
pub mod event;
pub mod game;
pub mod options;
pub mod piece;
pub mod player;
pub mod save;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use board::Board;
pub use error::{SaveError, SaveResult};
pub use event::{EventQueue, GameEvent, Listeners};
pub use game::{Game, MoveReport};
pub use options::GameOptions;
pub use piece::{Piece, PieceId};
pub use player::Player;
pub use save::{PieceRecord, SaveData};

/// Number of rows on the board.
pub const ROWS: usize = 6;

/// Number of columns on the board.
pub const COLS: usize = 7;

/// Total plies (both players) after which Time and Plus pieces swap.
pub const SWITCH_COUNTER: u32 = 4;

/// One of the two sides. The discriminant is the player index.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    Yellow = 0,
    Blue = 1,
}

impl Side {
    /// Get the opposing side.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Yellow => Side::Blue,
            Side::Blue => Side::Yellow,
        }
    }

    /// Player index (0 or 1).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Convert from a player index.
    #[inline]
    pub fn from_index(idx: usize) -> Option<Side> {
        match idx {
            0 => Some(Side::Yellow),
            1 => Some(Side::Blue),
            _ => None,
        }
    }

    /// RGB triple used for this side's pieces.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Side::Yellow => (255, 255, 0),
            Side::Blue => (0, 0, 255),
        }
    }

    /// Reverse of [`Side::rgb`].
    pub fn from_rgb(rgb: (u8, u8, u8)) -> Option<Side> {
        Side::all().find(|side| side.rgb() == rgb)
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Side::Yellow => "Yellow",
            Side::Blue => "Blue",
        }
    }

    /// Both sides in player-index order.
    pub fn all() -> impl Iterator<Item = Side> {
        [Side::Yellow, Side::Blue].into_iter()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The five piece kinds.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    /// Forward-only, 1 or 2 cells along its column.
    Point,
    /// Orthogonal slider.
    Plus,
    /// (1,2)/(2,1) jumper.
    Hourglass,
    /// One step in any direction. Losing it loses the game.
    Sun,
    /// Diagonal slider.
    Time,
}

impl PieceKind {
    /// Token used by the save format.
    pub fn token(self) -> &'static str {
        match self {
            PieceKind::Point => "Point",
            PieceKind::Plus => "Plus",
            PieceKind::Hourglass => "Hourglass",
            PieceKind::Sun => "Sun",
            PieceKind::Time => "Time",
        }
    }

    /// Parse a save-format token. Case sensitive.
    pub fn from_token(token: &str) -> Option<PieceKind> {
        PieceKind::all().find(|kind| kind.token() == token)
    }

    /// The kind this one turns into at a Time/Plus swap, if any.
    #[inline]
    pub fn swapped(self) -> Option<PieceKind> {
        match self {
            PieceKind::Plus => Some(PieceKind::Time),
            PieceKind::Time => Some(PieceKind::Plus),
            _ => None,
        }
    }

    /// All kinds.
    pub fn all() -> impl Iterator<Item = PieceKind> {
        [
            PieceKind::Point,
            PieceKind::Plus,
            PieceKind::Hourglass,
            PieceKind::Sun,
            PieceKind::Time,
        ]
        .into_iter()
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A board coordinate. `x` is the column, `y` the row.
///
/// Coordinates are signed so that off-board squares can be expressed and
/// rejected instead of wrapping.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i8,
    pub y: i8,
}

impl Pos {
    #[inline]
    pub const fn new(x: i8, y: i8) -> Pos {
        Pos { x, y }
    }

    /// Check if this square lies on the 6x7 board.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.x >= 0 && (self.x as usize) < COLS && self.y >= 0 && (self.y as usize) < ROWS
    }

    /// The square this one lands on after a 180° board rotation.
    #[inline]
    pub fn rotated(self) -> Pos {
        Pos::new(COLS as i8 - 1 - self.x, ROWS as i8 - 1 - self.y)
    }

    /// Offset by `(dx, dy)`. The result may be off the board.
    #[inline]
    pub fn offset(self, dx: i8, dy: i8) -> Pos {
        Pos::new(self.x + dx, self.y + dy)
    }

    /// Iterate over all 42 squares, row by row.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..ROWS as i8).flat_map(|y| (0..COLS as i8).map(move |x| Pos::new(x, y)))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
