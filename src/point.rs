//! Board cells and the small value types that describe them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::group::GroupId;

/// Board coordinate as `(x, y)`, with `y = 0` the top row.
pub type Coord = (usize, usize);

/// Stone color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Parse a color as written by request layers: `black`, `b`, `white`, `w`.
    pub fn parse(s: &str) -> Option<Color> {
        match s.to_ascii_lowercase().as_str() {
            "black" | "b" => Some(Color::Black),
            "white" | "w" => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// Per-color legality of playing on a point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permit {
    pub black: bool,
    pub white: bool,
}

impl Permit {
    /// Playable for both colors.
    pub const OPEN: Permit = Permit {
        black: true,
        white: true,
    };

    /// Playable for neither color (occupied points, the ko point).
    pub const CLOSED: Permit = Permit {
        black: false,
        white: false,
    };

    pub fn allows(self, color: Color) -> bool {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }
}

impl Default for Permit {
    fn default() -> Self {
        Permit::OPEN
    }
}

/// Territory tag left on points by [`Board::score`](crate::board::Board::score).
///
/// `None` marks stones and empty regions that touch no stone at all; `Both`
/// marks neutral regions bordered by both colors.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Territory {
    #[default]
    None,
    Black,
    White,
    Both,
}

impl Territory {
    /// Fold one more bordering tag into a region's tag.
    pub(crate) fn blend(self, other: Territory) -> Territory {
        match (self, other) {
            (t, Territory::None) => t,
            (Territory::None, o) => o,
            (t, o) if t == o => t,
            _ => Territory::Both,
        }
    }

    /// The color this region scores for, if any.
    pub fn owner(self) -> Option<Color> {
        match self {
            Territory::Black => Some(Color::Black),
            Territory::White => Some(Color::White),
            Territory::None | Territory::Both => None,
        }
    }
}

impl From<Color> for Territory {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Territory::Black,
            Color::White => Territory::White,
        }
    }
}

/// A single board cell.
///
/// Points are `Copy` so that cloning a board is a bulk copy of the cell array.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: usize,
    pub y: usize,
    pub color: Option<Color>,
    pub group: Option<GroupId>,
    pub permit: Permit,
    pub territory: Territory,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Point {
            x,
            y,
            color: None,
            group: None,
            permit: Permit::OPEN,
            territory: Territory::None,
        }
    }

    pub fn coord(&self) -> Coord {
        (self.x, self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none()
    }

    /// Reset to an empty, fully playable cell.
    pub(crate) fn clear(&mut self) {
        self.color = None;
        self.group = None;
        self.permit = Permit::OPEN;
        self.territory = Territory::None;
    }
}
