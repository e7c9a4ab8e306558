//! Static evaluation of a position.
//!
//! The heuristic evaluator scores each group from its eyes, liberties,
//! boundary area, density and closeness to friendly reinforcement, averages
//! those per color, and combines the averages with the area score, the
//! capture balance and an active-ko adjustment.

use std::collections::VecDeque;

use crate::board::Board;
use crate::constants::{
    AREA_WEIGHT, CAPTURE_WEIGHT, CONNECTION_WEIGHT, DENSITY_WEIGHT, EYE_SCAN_DEPTH, EYE_WEIGHT,
    KO_WEIGHT, LIBERTY_WEIGHT, TERRITORY_WEIGHT, TWO_EYES_BONUS,
};
use crate::game::Game;
use crate::group::Group;
use crate::point::{Color, Coord};

/// Scores a position from one color's point of view. Higher is better for
/// `color`. Implementations must only read the game.
pub trait Evaluator {
    fn evaluate(&self, game: &Game, color: Color) -> f64;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, game: &Game, color: Color) -> f64 {
        (**self).evaluate(game, color)
    }
}

/// Weights of the heuristic evaluator.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalWeights {
    pub territory: f64,
    pub eye: f64,
    pub two_eyes: f64,
    pub liberty: f64,
    pub area: f64,
    pub density: f64,
    pub connection: f64,
    pub capture: f64,
    pub ko: f64,
    /// Steps through empty points the eye/connection scan may take.
    pub eye_depth: usize,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            territory: TERRITORY_WEIGHT,
            eye: EYE_WEIGHT,
            two_eyes: TWO_EYES_BONUS,
            liberty: LIBERTY_WEIGHT,
            area: AREA_WEIGHT,
            density: DENSITY_WEIGHT,
            connection: CONNECTION_WEIGHT,
            capture: CAPTURE_WEIGHT,
            ko: KO_WEIGHT,
            eye_depth: EYE_SCAN_DEPTH,
        }
    }
}

/// Raw per-group features.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupFeatures {
    /// Enclosed empty regions touching the group.
    pub eyes: usize,
    pub liberties: usize,
    /// Bounding-box area of the group's boundary.
    pub area: usize,
    /// Stones per unit of `area`.
    pub density: f64,
    /// `eye_depth + 1 - d` for the smallest scan depth `d` at which another
    /// friendly group is reached, 0 if none is.
    pub connection: usize,
}

/// Result of flooding an empty region outward from one liberty.
struct Scan {
    /// No enemy stone touched and the region closed within the depth bound.
    enclosed: bool,
    /// Depth at which a different friendly group was first touched.
    reach: Option<usize>,
    region: Vec<Coord>,
}

fn scan(board: &Board, start: Coord, group: &Group, max_depth: usize) -> Scan {
    let size = board.size();
    let mut visited = vec![false; size * size];
    visited[start.1 * size + start.0] = true;
    let mut queue = VecDeque::from([(start, 0usize)]);
    let mut result = Scan {
        enclosed: true,
        reach: None,
        region: Vec::new(),
    };

    while let Some((at, depth)) = queue.pop_front() {
        result.region.push(at);
        for n in board.neighbors(at) {
            let p = board.point(n);
            match p.color {
                Some(c) if c != group.color() => result.enclosed = false,
                Some(_) => {
                    if p.group != Some(group.id()) && result.reach.is_none() {
                        result.reach = Some(depth);
                    }
                }
                None => {
                    let i = n.1 * size + n.0;
                    if visited[i] {
                        continue;
                    }
                    if depth >= max_depth {
                        result.enclosed = false;
                    } else {
                        visited[i] = true;
                        queue.push_back((n, depth + 1));
                    }
                }
            }
        }
    }
    result
}

#[derive(Clone, Debug, Default)]
pub struct HeuristicEvaluator {
    weights: EvalWeights,
}

impl HeuristicEvaluator {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    pub fn group_features(&self, board: &Board, group: &Group) -> GroupFeatures {
        let depth = self.weights.eye_depth;
        let mut seen: Vec<Coord> = Vec::new();
        let mut eyes = 0;
        let mut connection = 0;
        let mut liberties = 0;

        for lib in group.liberty_points(board) {
            liberties += 1;
            let s = scan(board, lib, group, depth);
            if let Some(d) = s.reach {
                connection = connection.max(depth + 1 - d);
            }
            if seen.contains(&lib) {
                continue;
            }
            if s.enclosed {
                eyes += 1;
            }
            seen.extend(s.region);
        }

        let area = match group.bounding_box() {
            Some((x0, y0, x1, y1)) => (x1 - x0 + 1) * (y1 - y0 + 1),
            None => group.size().max(1),
        };
        GroupFeatures {
            eyes,
            liberties,
            area,
            density: group.size() as f64 / area as f64,
            connection,
        }
    }

    fn group_score(&self, board: &Board, group: &Group) -> f64 {
        let w = &self.weights;
        let f = self.group_features(board, group);
        let mut score = f.eyes as f64 * w.eye
            + f.liberties as f64 * w.liberty
            + f.area as f64 * w.area
            + f.density * w.density
            + f.connection as f64 * w.connection;
        if f.eyes >= 2 {
            score += w.two_eyes;
        }
        score
    }

    /// Mean group score for a color, so many weak groups do not outweigh a
    /// few strong ones.
    fn color_score(&self, board: &Board, color: Color) -> f64 {
        let (total, count) = board
            .groups()
            .filter(|g| g.color() == color)
            .fold((0.0, 0usize), |(t, n), g| (t + self.group_score(board, g), n + 1));
        if count == 0 { 0.0 } else { total / count as f64 }
    }
}

impl Evaluator for HeuristicEvaluator {
    fn evaluate(&self, game: &Game, color: Color) -> f64 {
        let w = &self.weights;
        let board = game.board();
        let enemy = color.opponent();
        let score = game.score();
        let captures = game.captures();

        let own = self.color_score(board, color) + w.territory * score.get(color) as f64;
        let opp = self.color_score(board, enemy) + w.territory * score.get(enemy) as f64;
        let capture_delta =
            w.capture * (captures.get(color) as f64 - captures.get(enemy) as f64);
        // An open ko binds the side to move.
        let ko = match (game.ko(), game.turn()) {
            (Some(_), Some(turn)) if turn == color => -w.ko,
            (Some(_), Some(_)) => w.ko,
            _ => 0.0,
        };
        own - opp + capture_delta + ko
    }
}
