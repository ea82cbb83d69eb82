//! Cell positions and A1 notation.
//!
//! A [`Position`] is the identity of a cell within a sheet. Positions are
//! zero-indexed and bounded by [`Position::MAX_ROWS`] / [`Position::MAX_COLS`];
//! anything outside that box (including [`Position::NONE`]) is invalid and is
//! never used as a storage key.
//!
//! # Examples
//!
//! ```ignore
//! let pos = Position::from_a1("B3");
//! assert_eq!(pos.row, 2);  // 0-indexed
//! assert_eq!(pos.col, 1);
//! assert_eq!(pos.to_string(), "B3");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A cell coordinate (0-indexed). Hashing is order-sensitive, so (r, c) and
/// (c, r) are distinct keys.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[0-9]+)$").unwrap())
}

impl Position {
    pub const MAX_ROWS: i32 = 16384;
    pub const MAX_COLS: i32 = 16384;

    /// The invalid sentinel.
    pub const NONE: Position = Position { row: -1, col: -1 };

    pub const fn new(row: i32, col: i32) -> Position {
        Position { row, col }
    }

    pub fn is_valid(&self) -> bool {
        (0..Self::MAX_ROWS).contains(&self.row) && (0..Self::MAX_COLS).contains(&self.col)
    }

    /// Parse A1 notation (upper-case column letters followed by a 1-based row).
    ///
    /// Malformed text yields [`Position::NONE`]. Well-formed text that points
    /// outside the sheet (e.g. `XFE1`) yields an invalid position as well, so
    /// callers only need to check [`Position::is_valid`].
    pub fn from_a1(name: &str) -> Position {
        let Some(caps) = a1_re().captures(name) else {
            return Position::NONE;
        };

        let mut col: i64 = 0;
        for c in caps["letters"].bytes() {
            col = col * 26 + (c - b'A') as i64 + 1;
            if col > Self::MAX_COLS as i64 {
                return Position::NONE;
            }
        }

        let Ok(row) = caps["numbers"].parse::<i64>() else {
            return Position::NONE;
        };
        if row < 1 || row > Self::MAX_ROWS as i64 {
            return Position::NONE;
        }

        Position::new((row - 1) as i32, (col - 1) as i32)
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    /// Negative columns have no letters.
    pub fn col_to_letters(col: i32) -> String {
        let mut result = String::new();
        if col < 0 {
            return result;
        }
        let mut n = col as u32 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pos = Position::from_a1(s.trim());
        if pos.is_valid() {
            Ok(pos)
        } else {
            Err(format!("Invalid cell reference: {}", s))
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}{}", Position::col_to_letters(self.col), self.row + 1)
    }
}
