//! Line-oriented save format.
//!
//! # Layout
//!
//! ```text
//! line 1        current turn index (0 or 1)
//! line 2        player 0 play count
//! line 3        player 1 play count
//! lines 4-5     last moved piece: "x,y,KIND,flipped" then "R,G,B"
//!               (both lines read "none" when nothing has moved yet)
//! lines 6..N    one descriptor/color pair per occupied cell,
//!               columns outer, rows inner
//! line N+1      has-played flag of the current player
//! ```
//!
//! Colors are re-read by taking the last run of digits in each comma
//! separated field, so both `255,255,0` and `java.awt.Color[r=255,g=255,b=0]`
//! parse. Text is fully parsed and validated before anything is handed to
//! the game, so a bad file never leaves a half-loaded state behind.

use std::collections::BTreeSet;
use std::fmt;
use std::io::{Read, Write};

use serde::Serialize;

use crate::{Piece, PieceKind, Pos, SaveError, SaveResult, Side, SWITCH_COUNTER};

const NONE: &str = "none";

/// Everything needed to place one piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct PieceRecord {
    pub pos: Pos,
    pub kind: PieceKind,
    pub side: Side,
    pub flipped: bool,
}

impl PieceRecord {
    pub fn from_piece(piece: &Piece) -> PieceRecord {
        PieceRecord {
            pos: piece.pos(),
            kind: piece.kind(),
            side: piece.side(),
            flipped: piece.is_flipped(),
        }
    }

    /// Check whether a live piece matches this record.
    pub fn matches(&self, piece: &Piece) -> bool {
        *self == PieceRecord::from_piece(piece)
    }

    /// `"x,y,KIND,flipped"`.
    pub fn descriptor(&self) -> String {
        format!("{},{},{},{}", self.pos.x, self.pos.y, self.kind.token(), self.flipped)
    }

    /// `"R,G,B"`.
    pub fn color_line(&self) -> String {
        let (r, g, b) = self.side.rgb();
        format!("{},{},{}", r, g, b)
    }
}

/// A complete, validated snapshot of a game.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct SaveData {
    pub turn: usize,
    pub play_counts: [u32; 2],
    pub last_moved: Option<PieceRecord>,
    pub pieces: Vec<PieceRecord>,
    /// Has-played flag of the player whose turn it is.
    pub has_played: bool,
}

impl SaveData {
    /// Render to the text format.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Write the text format to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> SaveResult<()> {
        write!(writer, "{}", self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reject play counts that could never occur between two swaps.
    pub fn check_play_counts(&self) -> SaveResult<()> {
        let [a, b] = self.play_counts;
        match a.checked_add(b) {
            Some(total) if total <= SWITCH_COUNTER => Ok(()),
            _ => Err(SaveError::InvalidPlayCount {
                counts: self.play_counts,
                limit: SWITCH_COUNTER,
            }),
        }
    }

    /// Read and parse the text format from `reader`.
    pub fn read_from<R: Read>(mut reader: R) -> SaveResult<SaveData> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        SaveData::parse(&text)
    }

    /// Parse and validate the text format.
    pub fn parse(text: &str) -> SaveResult<SaveData> {
        let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        let count = lines.len();
        if count < 6 || (count - 6) % 2 != 0 {
            return Err(SaveError::Truncated { lines: count });
        }

        let turn: usize = parse_number(lines[0], 1, "turn index")?;
        if Side::from_index(turn).is_none() {
            return Err(SaveError::InvalidTurn(turn));
        }
        let play_counts = [
            parse_number(lines[1], 2, "play count")?,
            parse_number(lines[2], 3, "play count")?,
        ];

        let last_moved = if lines[3] == NONE && lines[4] == NONE {
            None
        } else {
            Some(parse_record(lines[3], lines[4], 4)?)
        };

        let mut pieces = Vec::with_capacity((count - 6) / 2);
        let mut occupied = BTreeSet::new();
        for (i, pair) in lines[5..count - 1].chunks(2).enumerate() {
            let line = 6 + 2 * i;
            let record = parse_record(pair[0], pair[1], line)?;
            if !occupied.insert(record.pos) {
                return Err(SaveError::DuplicateCell { line, pos: record.pos });
            }
            pieces.push(record);
        }

        if let Some(record) = &last_moved {
            if !pieces.contains(record) {
                return Err(SaveError::LastMovedMismatch { pos: record.pos });
            }
        }

        let has_played = parse_bool(lines[count - 1], count)?;

        let data = SaveData {
            turn,
            play_counts,
            last_moved,
            pieces,
            has_played,
        };
        data.check_play_counts()?;
        Ok(data)
    }
}

impl fmt::Display for SaveData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.turn)?;
        writeln!(f, "{}", self.play_counts[0])?;
        writeln!(f, "{}", self.play_counts[1])?;
        match &self.last_moved {
            Some(record) => {
                writeln!(f, "{}", record.descriptor())?;
                writeln!(f, "{}", record.color_line())?;
            }
            None => {
                writeln!(f, "{}", NONE)?;
                writeln!(f, "{}", NONE)?;
            }
        }
        for record in &self.pieces {
            writeln!(f, "{}", record.descriptor())?;
            writeln!(f, "{}", record.color_line())?;
        }
        writeln!(f, "{}", self.has_played)
    }
}

fn parse_number<T: std::str::FromStr>(s: &str, line: usize, expected: &'static str) -> SaveResult<T> {
    s.parse().map_err(|_| SaveError::Malformed {
        line,
        expected,
        found: s.to_string(),
    })
}

fn parse_bool(s: &str, line: usize) -> SaveResult<bool> {
    if s.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if s.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(SaveError::Malformed {
            line,
            expected: "true or false",
            found: s.to_string(),
        })
    }
}

/// Parse a descriptor line and the color line that follows it.
fn parse_record(descriptor: &str, color: &str, line: usize) -> SaveResult<PieceRecord> {
    let fields: Vec<&str> = descriptor.split(',').map(str::trim).collect();
    let [x, y, kind, flipped] = fields[..] else {
        return Err(SaveError::Malformed {
            line,
            expected: "x,y,KIND,flipped",
            found: descriptor.to_string(),
        });
    };

    let pos = Pos::new(
        parse_number(x, line, "column")?,
        parse_number(y, line, "row")?,
    );
    if !pos.is_valid() {
        return Err(SaveError::OffBoard { line, pos });
    }
    let kind = PieceKind::from_token(kind).ok_or_else(|| SaveError::UnknownKind {
        line,
        token: kind.to_string(),
    })?;
    let flipped = parse_bool(flipped, line)?;
    let side = parse_color(color, line + 1)?;

    Ok(PieceRecord {
        pos,
        kind,
        side,
        flipped,
    })
}

fn parse_color(s: &str, line: usize) -> SaveResult<Side> {
    let malformed = || SaveError::Malformed {
        line,
        expected: "R,G,B",
        found: s.to_string(),
    };

    let fields: Vec<&str> = s.split(',').collect();
    if fields.len() != 3 {
        return Err(malformed());
    }
    let mut rgb = [0u8; 3];
    for (channel, field) in rgb.iter_mut().zip(&fields) {
        let digits = last_digit_run(field).ok_or_else(malformed)?;
        *channel = digits.parse().map_err(|_| malformed())?;
    }

    let [r, g, b] = rgb;
    Side::from_rgb((r, g, b)).ok_or(SaveError::UnknownColor { line, r, g, b })
}

/// The last maximal run of ASCII digits in `field`.
fn last_digit_run(field: &str) -> Option<&str> {
    let end = field.rfind(|c: char| c.is_ascii_digit())? + 1;
    let head = field[..end].trim_end_matches(|c: char| c.is_ascii_digit());
    Some(&field[head.len()..end])
}
