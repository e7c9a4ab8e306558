//! Game state: turn order, passes, ko, captures and the running score.
//!
//! [`Game::play`], [`Game::pass`] and [`Game::resign`] are the only ways to
//! mutate a game. Legality is reported as a boolean by
//! [`Game::is_valid_move`]; [`Game::check_move`] gives the reason.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::board::Board;
use crate::point::{Color, Coord};

/// A counter per color (scores, captures).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tally {
    pub black: u32,
    pub white: u32,
}

impl Tally {
    /// Count for `color`.
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    /// Mutable count for `color`.
    pub fn get_mut(&mut self, color: Color) -> &mut u32 {
        match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        }
    }

    /// The color with the strictly higher count, `None` on a tie.
    pub fn leader(&self) -> Option<Color> {
        match self.black.cmp(&self.white) {
            std::cmp::Ordering::Greater => Some(Color::Black),
            std::cmp::Ordering::Less => Some(Color::White),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A move for the color to play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Play(Coord),
    Pass,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Play((x, y)) => write!(f, "({x},{y})"),
            Move::Pass => write!(f, "pass"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Ended,
}

/// Why a move was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The game has ended
    GameOver,
    /// Coordinate is not on the board
    OffBoard,
    /// It is the other color's turn
    OutOfTurn,
    /// Point is not empty
    Occupied,
    /// Move retakes a ko
    Ko,
    /// Move would leave the stone without liberties and capture nothing
    Suicide,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::GameOver => write!(f, "game is over"),
            MoveError::OffBoard => write!(f, "point not on board"),
            MoveError::OutOfTurn => write!(f, "out of turn"),
            MoveError::Occupied => write!(f, "point not empty"),
            MoveError::Ko => write!(f, "retakes ko"),
            MoveError::Suicide => write!(f, "suicide"),
        }
    }
}

impl std::error::Error for MoveError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    pub(crate) board: Board,
    pub(crate) captures: Tally,
    pub(crate) score: Tally,
    pub(crate) ko: Option<Coord>,
    pub(crate) turn: Option<Color>,
    pub(crate) passed: bool,
    pub(crate) ended: bool,
    pub(crate) winner: Option<Color>,
    pub(crate) moves: usize,
    pub(crate) last: Option<Move>,
}

impl Game {
    /// A fresh game on an empty `size`x`size` board, black to play.
    pub fn new(size: usize) -> Self {
        Game {
            board: Board::new(size),
            captures: Tally::default(),
            score: Tally::default(),
            ko: None,
            turn: Some(Color::Black),
            passed: false,
            ended: false,
            winner: None,
            moves: 0,
            last: None,
        }
    }

    /// The board being played on.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Board side length.
    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Stones captured by each color.
    pub fn captures(&self) -> Tally {
        self.captures
    }

    /// Area score as of the last move.
    pub fn score(&self) -> Tally {
        self.score
    }

    /// Point closed by the ko rule for the current turn.
    pub fn ko(&self) -> Option<Coord> {
        self.ko
    }

    /// Color to play, `None` once two passes have ended the game.
    pub fn turn(&self) -> Option<Color> {
        self.turn
    }

    /// Whether the previous turn was a pass.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Whether two passes or a resignation have ended the game.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Current phase of the game.
    pub fn phase(&self) -> Phase {
        if self.ended {
            Phase::Ended
        } else {
            Phase::InProgress
        }
    }

    /// Winner of an ended game, `None` while playing or on a tie.
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Number of plays and passes made so far.
    pub fn move_number(&self) -> usize {
        self.moves
    }

    /// The most recent play or pass.
    pub fn last_move(&self) -> Option<Move> {
        self.last
    }

    /// Fraction of the board covered by stones.
    pub fn coverage(&self) -> f64 {
        let total = self.size() * self.size();
        if total == 0 {
            return 1.0;
        }
        self.board.stone_count() as f64 / total as f64
    }

    /// Check whether `color` may play at `at` right now.
    pub fn check_move(&self, at: Coord, color: Color) -> Result<(), MoveError> {
        if self.ended {
            return Err(MoveError::GameOver);
        }
        let Some(point) = self.board.get(at) else {
            return Err(MoveError::OffBoard);
        };
        if self.turn != Some(color) {
            return Err(MoveError::OutOfTurn);
        }
        if point.permit.allows(color) {
            return Ok(());
        }
        if !point.is_empty() {
            Err(MoveError::Occupied)
        } else if self.ko == Some(at) {
            Err(MoveError::Ko)
        } else {
            Err(MoveError::Suicide)
        }
    }

    /// Whether `color` may play at `at` right now.
    pub fn is_valid_move(&self, at: Coord, color: Color) -> bool {
        self.check_move(at, color).is_ok()
    }

    /// Points the color to play may legally play on, row-major.
    pub fn legal_points(&self) -> Vec<Coord> {
        let Some(color) = self.turn else {
            return Vec::new();
        };
        self.board
            .coords()
            .filter(|&at| self.is_valid_move(at, color))
            .collect()
    }

    /// Place a stone, resolve captures and ko, refresh permissions and score.
    ///
    /// The caller is responsible for checking legality first.
    pub fn play(&mut self, at: Coord, color: Color) -> Tally {
        debug_assert!(
            self.is_valid_move(at, color),
            "illegal play at {at:?} for {color}"
        );
        self.board.add_point(at, color);
        let captured = self.board.do_captures(color);
        let enemy = color.opponent();
        *self.captures.get_mut(color) += captured.of(enemy).len() as u32;
        *self.captures.get_mut(enemy) += captured.of(color).len() as u32;

        // Single-stone recapture ban: one stone taken by a lone stone that is
        // itself left in atari.
        self.ko = None;
        if captured.total() == 1 {
            if let [taken] = captured.of(enemy) {
                let in_atari = self
                    .board
                    .group_at(at)
                    .is_some_and(|g| g.size() == 1 && g.liberties(&self.board) == 1);
                if in_atari {
                    self.ko = Some(*taken);
                }
            }
        }
        self.board.apply_permissions(self.ko);

        self.turn = Some(enemy);
        self.passed = false;
        self.moves += 1;
        self.last = Some(Move::Play(at));
        self.score = self.board.score();
        self.score
    }

    /// Check, then play.
    pub fn try_play(&mut self, at: Coord, color: Color) -> Result<Tally, MoveError> {
        self.check_move(at, color)?;
        Ok(self.play(at, color))
    }

    /// Pass the turn. A second consecutive pass ends the game and awards it
    /// to the color with the higher score.
    pub fn pass(&mut self) {
        if self.ended {
            return;
        }
        self.moves += 1;
        self.last = Some(Move::Pass);
        if self.passed {
            self.ended = true;
            self.turn = None;
            self.winner = self.score.leader();
            trace!(score = ?self.score, winner = ?self.winner, "game ended by passes");
        } else {
            self.passed = true;
            self.turn = self.turn.map(Color::opponent);
            self.ko = None;
            self.board.apply_permissions(None);
        }
    }

    /// End the game immediately in favor of `color`'s opponent.
    pub fn resign(&mut self, color: Color) {
        self.ended = true;
        self.winner = Some(color.opponent());
        info!(%color, "resigned");
    }

    /// Apply a move for the color to play. Returns false, leaving the game
    /// untouched, when the move is not legal.
    pub fn apply(&mut self, mv: Move) -> bool {
        match (mv, self.turn) {
            (_, None) => false,
            _ if self.ended => false,
            (Move::Pass, Some(_)) => {
                self.pass();
                true
            }
            (Move::Play(at), Some(color)) => {
                if !self.is_valid_move(at, color) {
                    return false;
                }
                self.play(at, color);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_is_black_to_play() {
        let game = Game::new(9);
        assert_eq!(game.turn(), Some(Color::Black));
        assert_eq!(game.phase(), Phase::InProgress);
        assert_eq!(game.score(), Tally::default());
        assert_eq!(game.ko(), None);
    }

    #[test]
    fn first_stone_on_empty_board() {
        let mut game = Game::new(9);
        let score = game.play((4, 4), Color::Black);
        assert_eq!(score, Tally { black: 81, white: 0 });
        assert_eq!(game.board().stone_count(), 1);
        let group = game.board().group_at((4, 4)).unwrap();
        assert_eq!(group.liberties(game.board()), 4);
        assert_eq!(game.turn(), Some(Color::White));
    }

    #[test]
    fn check_move_reasons() {
        let mut game = Game::new(5);
        assert_eq!(game.check_move((5, 0), Color::Black), Err(MoveError::OffBoard));
        assert_eq!(game.check_move((0, 0), Color::White), Err(MoveError::OutOfTurn));
        game.play((0, 0), Color::Black);
        assert_eq!(game.check_move((0, 0), Color::White), Err(MoveError::Occupied));
        game.resign(Color::White);
        assert_eq!(game.check_move((1, 1), Color::White), Err(MoveError::GameOver));
    }

    #[test]
    fn play_flips_turn_and_clears_pass() {
        let mut game = Game::new(5);
        game.pass();
        assert!(game.passed());
        assert_eq!(game.turn(), Some(Color::White));
        game.play((2, 2), Color::White);
        assert!(!game.passed());
        assert_eq!(game.turn(), Some(Color::Black));
        assert_eq!(game.last_move(), Some(Move::Play((2, 2))));
        assert_eq!(game.move_number(), 2);
    }

    #[test]
    fn suicide_is_refused() {
        let mut game = Game::new(3);
        game.play((1, 0), Color::Black);
        game.pass();
        game.play((0, 1), Color::Black);
        assert_eq!(game.check_move((0, 0), Color::White), Err(MoveError::Suicide));
        assert!(!game.apply(Move::Play((0, 0))));
        assert_eq!(game.move_number(), 3);
    }

    #[test]
    fn tally_leader() {
        assert_eq!(Tally { black: 3, white: 2 }.leader(), Some(Color::Black));
        assert_eq!(Tally { black: 1, white: 2 }.leader(), Some(Color::White));
        assert_eq!(Tally { black: 2, white: 2 }.leader(), None);
    }

    #[test]
    fn try_play_reports_errors() {
        let mut game = Game::new(3);
        assert!(game.try_play((1, 1), Color::Black).is_ok());
        assert_eq!(game.try_play((1, 1), Color::White), Err(MoveError::Occupied));
    }
}
