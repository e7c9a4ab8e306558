//! Feature encoding for a learned move evaluator.
//!
//! Layout of [`encode_move`] for a board of size `n`:
//!
//! | slice | width | meaning |
//! |---|---|---|
//! | turn | 1 | 1.0 when black is to play |
//! | passed | 1 | 1.0 when the previous turn was a pass |
//! | ko x, ko y | `n + 1` each | one-hot, last slot = no ko |
//! | move x, move y | `n + 1` each | one-hot, last slot = pass |
//! | score ratio | 1 | black / (black + white), 0.5 when both are 0 |
//! | capture ratio | 1 | same, for captures |
//! | board | `2 * n * n` | per cell row-major: is-white, is-black |
//!
//! Training a predictor is out of scope; anything implementing [`Predictor`]
//! can drive a [`PredictorPlayer`](crate::player::PredictorPlayer) or stand in
//! for the heuristic evaluator at search leaves via [`PredictorEvaluator`].

use crate::eval::Evaluator;
use crate::game::{Game, Move, Tally};
use crate::point::Color;

/// A trained model mapping an encoded move to a desirability score.
pub trait Predictor {
    fn predict(&self, input: &[f64]) -> f64;
}

impl<F: Fn(&[f64]) -> f64> Predictor for F {
    fn predict(&self, input: &[f64]) -> f64 {
        self(input)
    }
}

/// Length of [`encode_move`]'s output for a board of `size`.
pub fn encoded_len(size: usize) -> usize {
    2 + 4 * (size + 1) + 2 + 2 * size * size
}

fn one_hot(out: &mut Vec<f64>, size: usize, value: Option<usize>) {
    let slot = value.unwrap_or(size);
    out.extend((0..=size).map(|i| if i == slot { 1.0 } else { 0.0 }));
}

fn black_ratio(tally: Tally) -> f64 {
    let total = tally.black + tally.white;
    if total == 0 {
        0.5
    } else {
        tally.black as f64 / total as f64
    }
}

/// Encode `mv` played from `game`.
pub fn encode_move(game: &Game, mv: Move) -> Vec<f64> {
    let size = game.size();
    let mut out = Vec::with_capacity(encoded_len(size));
    out.push(if game.turn() == Some(Color::Black) { 1.0 } else { 0.0 });
    out.push(if game.passed() { 1.0 } else { 0.0 });

    let ko = game.ko();
    one_hot(&mut out, size, ko.map(|(x, _)| x));
    one_hot(&mut out, size, ko.map(|(_, y)| y));

    let at = match mv {
        Move::Play(at) => Some(at),
        Move::Pass => None,
    };
    one_hot(&mut out, size, at.map(|(x, _)| x));
    one_hot(&mut out, size, at.map(|(_, y)| y));

    out.push(black_ratio(game.score()));
    out.push(black_ratio(game.captures()));

    for p in game.board().cells() {
        out.push(if p.color == Some(Color::White) { 1.0 } else { 0.0 });
        out.push(if p.color == Some(Color::Black) { 1.0 } else { 0.0 });
    }
    out
}

/// Leaf evaluator backed by a predictor.
///
/// The predictor rates the last move played; the rating counts for the color
/// that made it and against its opponent. Positions with no stone played yet
/// are even.
pub struct PredictorEvaluator<P> {
    predictor: P,
}

impl<P: Predictor> PredictorEvaluator<P> {
    pub fn new(predictor: P) -> Self {
        Self { predictor }
    }
}

impl<P: Predictor> Evaluator for PredictorEvaluator<P> {
    fn evaluate(&self, game: &Game, color: Color) -> f64 {
        let Some(mv) = game.last_move() else {
            return 0.0;
        };
        // The mover is whoever is not to play now; after a game-ending pass
        // there is no turn, so fall back on move parity.
        let mover = match game.turn() {
            Some(turn) => turn.opponent(),
            None if game.move_number() % 2 == 1 => Color::Black,
            None => Color::White,
        };
        let value = self.predictor.predict(&encode_move(game, mv));
        if mover == color { value } else { -value }
    }
}
