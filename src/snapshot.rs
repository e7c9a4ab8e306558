//! Serializable shapes of a game: a lossless persistence snapshot and the
//! read-only views handed to request layers for display.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::game::{Game, Tally};
use crate::point::{Color, Coord, Permit, Point, Territory};

/// Everything needed to bring a game back: one color per coordinate plus the
/// game's scalar state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub size: usize,
    /// Row-major, `size * size` entries.
    pub board: Vec<Option<Color>>,
    pub captures: Tally,
    pub score: Tally,
    pub ko: Option<Coord>,
    pub turn: Option<Color>,
    pub passed: bool,
    pub ended: bool,
    pub winner: Option<Color>,
    pub moves: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    ZeroSize,
    BoardLength { expected: usize, found: usize },
    KoOffBoard(Coord),
    KoOccupied(Coord),
    /// No color to play in a game that has not ended.
    MissingTurn,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::ZeroSize => write!(f, "board size must be positive"),
            SnapshotError::BoardLength { expected, found } => {
                write!(f, "expected {expected} board entries, found {found}")
            }
            SnapshotError::KoOffBoard((x, y)) => write!(f, "ko point ({x},{y}) is off the board"),
            SnapshotError::KoOccupied((x, y)) => write!(f, "ko point ({x},{y}) is occupied"),
            SnapshotError::MissingTurn => write!(f, "game in progress has no color to play"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl Game {
    /// Capture the stones and scalar state for storage.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            size: self.size(),
            board: self.board.cells().iter().map(|p| p.color).collect(),
            captures: self.captures,
            score: self.score,
            ko: self.ko,
            turn: self.turn,
            passed: self.passed,
            ended: self.ended,
            winner: self.winner,
            moves: self.moves,
        }
    }

    /// Rebuild a game from a snapshot. Groups, permissions and territory tags
    /// are derived from the stones; the scalar fields are taken as stored.
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Result<Game, SnapshotError> {
        let size = snapshot.size;
        if size == 0 {
            return Err(SnapshotError::ZeroSize);
        }
        if snapshot.board.len() != size * size {
            return Err(SnapshotError::BoardLength {
                expected: size * size,
                found: snapshot.board.len(),
            });
        }
        if snapshot.turn.is_none() && !snapshot.ended {
            return Err(SnapshotError::MissingTurn);
        }

        let mut board = Board::new(size);
        for (i, color) in snapshot.board.iter().enumerate() {
            if let Some(color) = *color {
                board.add_point((i % size, i / size), color);
            }
        }
        if let Some(ko) = snapshot.ko {
            match board.get(ko) {
                None => return Err(SnapshotError::KoOffBoard(ko)),
                Some(p) if !p.is_empty() => return Err(SnapshotError::KoOccupied(ko)),
                Some(_) => {}
            }
        }
        board.apply_permissions(snapshot.ko);
        board.score();

        Ok(Game {
            board,
            captures: snapshot.captures,
            score: snapshot.score,
            ko: snapshot.ko,
            turn: snapshot.turn,
            passed: snapshot.passed,
            ended: snapshot.ended,
            winner: snapshot.winner,
            moves: snapshot.moves,
            last: None,
        })
    }

    /// Read-only view for display.
    pub fn view(&self) -> GameView {
        GameView {
            board: self.board.points(),
            score: self.score,
            captures: self.captures,
            ko: self.ko,
            turn: self.turn,
            passed: self.passed,
            ended: self.ended,
            winner: self.winner,
        }
    }
}

/// A point as shown to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointView {
    pub x: usize,
    pub y: usize,
    pub color: Option<Color>,
    pub permit: Permit,
    pub territory: Territory,
}

impl From<&Point> for PointView {
    fn from(p: &Point) -> Self {
        PointView {
            x: p.x,
            y: p.y,
            color: p.color,
            permit: p.permit,
            territory: p.territory,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub board: Vec<Vec<PointView>>,
    pub score: Tally,
    pub captures: Tally,
    pub ko: Option<Coord>,
    pub turn: Option<Color>,
    pub passed: bool,
    pub ended: bool,
    pub winner: Option<Color>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_lengths() {
        let mut snapshot = Game::new(3).snapshot();
        snapshot.board.pop();
        assert_eq!(
            Game::from_snapshot(&snapshot),
            Err(SnapshotError::BoardLength {
                expected: 9,
                found: 8
            })
        );
    }

    #[test]
    fn rejects_bad_ko() {
        let mut snapshot = Game::new(3).snapshot();
        snapshot.ko = Some((3, 0));
        assert_eq!(
            Game::from_snapshot(&snapshot),
            Err(SnapshotError::KoOffBoard((3, 0)))
        );
        snapshot.ko = Some((0, 0));
        snapshot.board[0] = Some(Color::White);
        assert_eq!(
            Game::from_snapshot(&snapshot),
            Err(SnapshotError::KoOccupied((0, 0)))
        );
    }

    #[test]
    fn rejects_game_in_progress_without_turn() {
        let mut snapshot = Game::new(3).snapshot();
        snapshot.turn = None;
        assert_eq!(
            Game::from_snapshot(&snapshot),
            Err(SnapshotError::MissingTurn)
        );
        snapshot.ended = true;
        assert!(Game::from_snapshot(&snapshot).is_ok());
    }

    #[test]
    fn view_hides_group_ids() {
        let mut game = Game::new(3);
        game.play((0, 0), Color::Black);
        let view = game.view();
        assert_eq!(view.board.len(), 3);
        assert_eq!(view.board[0][0].color, Some(Color::Black));
        assert_eq!(view.board[0][0].permit, Permit::CLOSED);
        assert_eq!(view.board[2][1].territory, Territory::Black);
        assert_eq!(view.turn, Some(Color::White));
    }
}
