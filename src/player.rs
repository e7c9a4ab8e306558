//! Automated players behind a single "propose a move" contract.

use crate::encoding::{Predictor, encode_move};
use crate::eval::Evaluator;
use crate::game::{Game, Move};
use crate::search::{Searcher, UniqueCoords};

/// Something that picks a move for the color to play.
///
/// Proposals are always legal for `game`; [`Move::Pass`] is the fallback when
/// nothing else is.
pub trait Player {
    fn propose(&mut self, game: &Game) -> Move;
}

impl<E: Evaluator> Player for Searcher<E> {
    fn propose(&mut self, game: &Game) -> Move {
        self.choose_move(game)
    }
}

/// Plays a uniformly random legal point, passing when there is none.
pub struct RandomPlayer {
    rng: fastrand::Rng,
}

impl RandomPlayer {
    pub fn new(rng: fastrand::Rng) -> Self {
        Self { rng }
    }
}

impl Player for RandomPlayer {
    fn propose(&mut self, game: &Game) -> Move {
        let legal = game.legal_points();
        if legal.is_empty() {
            return Move::Pass;
        }
        Move::Play(legal[self.rng.usize(..legal.len())])
    }
}

/// One ply lookahead: maximise own area score minus the opponent's right
/// after the move, uniform among ties.
pub struct GreedyPlayer {
    rng: fastrand::Rng,
}

impl GreedyPlayer {
    pub fn new(rng: fastrand::Rng) -> Self {
        Self { rng }
    }
}

impl Player for GreedyPlayer {
    fn propose(&mut self, game: &Game) -> Move {
        let Some(color) = game.turn() else {
            return Move::Pass;
        };
        let mut best = i64::MIN;
        let mut moves = Vec::new();
        for at in game.legal_points() {
            let mut child = game.clone();
            let score = child.play(at, color);
            let margin = score.get(color) as i64 - score.get(color.opponent()) as i64;
            if margin > best {
                best = margin;
                moves.clear();
                moves.push(at);
            } else if margin == best {
                moves.push(at);
            }
        }
        if moves.is_empty() {
            return Move::Pass;
        }
        Move::Play(moves[self.rng.usize(..moves.len())])
    }
}

/// Scans the board in random order and keeps the move the predictor rates
/// highest.
pub struct PredictorPlayer<P> {
    predictor: P,
    rng: fastrand::Rng,
}

impl<P: Predictor> PredictorPlayer<P> {
    pub fn new(predictor: P, rng: fastrand::Rng) -> Self {
        Self { predictor, rng }
    }
}

impl<P: Predictor> Player for PredictorPlayer<P> {
    fn propose(&mut self, game: &Game) -> Move {
        let Some(color) = game.turn() else {
            return Move::Pass;
        };
        let mut best = f64::NEG_INFINITY;
        let mut choice = Move::Pass;
        for at in UniqueCoords::new(game.size(), &mut self.rng) {
            if !game.is_valid_move(at, color) {
                continue;
            }
            let mv = Move::Play(at);
            let value = self.predictor.predict(&encode_move(game, mv));
            if value > best {
                best = value;
                choice = mv;
            }
        }
        choice
    }
}
