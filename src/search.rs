//! Minimax search with alpha-beta pruning and an adaptive depth bound.
//!
//! Every explored move is played on a private clone of the game; the game
//! handed to [`Searcher::search`] is never touched. Leaves are scored by an
//! [`Evaluator`] from the point of view of the color to move at the root.
//!
//! The depth is chosen per search so that the estimated branching product
//! `open * (open - 1) * ... * (open - depth + 1)` stays within
//! [`SearchConfig::complexity_budget`]: the fuller the board, the deeper the
//! search can afford to go.
//!
//! All root moves sharing the best value are kept and the move actually
//! played is picked uniformly among them.

use tracing::{debug, trace};

use crate::constants::{COMPLEXITY_BUDGET, MAX_SEARCH_DEPTH, PASS_COVERAGE};
use crate::eval::Evaluator;
use crate::game::{Game, Move};
use crate::point::{Color, Coord};

#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Never search deeper than this.
    pub max_depth: usize,
    /// Upper bound on the estimated number of leaf paths.
    pub complexity_budget: u64,
    /// Pass is a candidate only above this board coverage.
    pub pass_coverage: f64,
    /// Alpha-beta cutoffs; turning this off gives plain minimax.
    pub pruning: bool,
    /// Visit candidates in a random order instead of row-major.
    pub shuffle: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_SEARCH_DEPTH,
            complexity_budget: COMPLEXITY_BUDGET,
            pass_coverage: PASS_COVERAGE,
            pruning: true,
            shuffle: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Best minimax value at the root, `-inf` when there was no candidate.
    pub value: f64,
    /// Every root move achieving `value`, in visiting order.
    pub moves: Vec<Move>,
    pub depth: usize,
    pub nodes: u64,
}

/// Yields every coordinate of a board exactly once, in random order.
pub struct UniqueCoords {
    order: std::vec::IntoIter<Coord>,
}

impl UniqueCoords {
    pub fn new(size: usize, rng: &mut fastrand::Rng) -> Self {
        let mut order: Vec<Coord> = (0..size * size).map(|i| (i % size, i / size)).collect();
        rng.shuffle(&mut order);
        Self {
            order: order.into_iter(),
        }
    }
}

impl Iterator for UniqueCoords {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        self.order.next()
    }
}

/// Deepest `depth <= cap` with `open * (open - 1) * ... * (open - depth + 1)`
/// within `budget`. Always at least 1.
pub fn adaptive_depth(open: usize, budget: u64, cap: usize) -> usize {
    let mut depth = 0;
    let mut product: u64 = 1;
    while depth < cap && depth < open {
        let next = product.saturating_mul((open - depth) as u64);
        if next > budget {
            break;
        }
        product = next;
        depth += 1;
    }
    depth.max(1)
}

/// Largest float strictly below `x`.
fn just_below(x: f64) -> f64 {
    if x.is_nan() || x == f64::NEG_INFINITY {
        return x;
    }
    if x == 0.0 {
        return -f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits - 1)
    } else {
        f64::from_bits(bits + 1)
    }
}

/// Per-search state shared by every node.
struct Frame<'a> {
    /// Color to move at the root; leaves are scored for it.
    root: Color,
    /// Candidate visiting order.
    order: &'a [Coord],
}

/// Play a pre-validated candidate on a private copy of `game`.
fn child_of(game: &Game, mv: Move) -> Game {
    let mut child = game.clone();
    let applied = child.apply(mv);
    debug_assert!(applied, "candidate {mv} must be legal");
    child
}

pub struct Searcher<E> {
    evaluator: E,
    config: SearchConfig,
    rng: fastrand::Rng,
    nodes: u64,
}

impl<E: Evaluator> Searcher<E> {
    pub fn new(evaluator: E, config: SearchConfig, rng: fastrand::Rng) -> Self {
        Self {
            evaluator,
            config,
            rng,
            nodes: 0,
        }
    }

    /// Search settings in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Leaf evaluator in use.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Depth the next search of `game` will use.
    pub fn depth_for(&self, game: &Game) -> usize {
        let total = game.size() * game.size();
        let open = total - game.board().stone_count();
        adaptive_depth(open, self.config.complexity_budget, self.config.max_depth)
    }

    fn candidates(&self, game: &Game, order: &[Coord]) -> Vec<Move> {
        let Some(color) = game.turn() else {
            return Vec::new();
        };
        let mut moves: Vec<Move> = order
            .iter()
            .copied()
            .filter(|&at| game.is_valid_move(at, color))
            .map(Move::Play)
            .collect();
        if game.coverage() > self.config.pass_coverage {
            moves.push(Move::Pass);
        }
        moves
    }

    /// Search `game` and return every best root move.
    pub fn search(&mut self, game: &Game) -> SearchResult {
        self.nodes = 0;
        let depth = self.depth_for(game);
        let order: Vec<Coord> = if self.config.shuffle {
            UniqueCoords::new(game.size(), &mut self.rng).collect()
        } else {
            game.board().coords().collect()
        };

        let mut best = f64::NEG_INFINITY;
        let mut moves = Vec::new();
        let Some(root) = game.turn().filter(|_| !game.is_ended()) else {
            return SearchResult {
                value: best,
                moves,
                depth,
                nodes: 0,
            };
        };

        let frame = Frame {
            root,
            order: &order,
        };
        for mv in self.candidates(game, &order) {
            let child = child_of(game, mv);
            // Searching each root child against a bound just below the best
            // value so far keeps equal-valued siblings exact, so ties survive
            // pruning.
            let alpha = if self.config.pruning {
                just_below(best)
            } else {
                f64::NEG_INFINITY
            };
            let value = self.minimax(&child, depth - 1, alpha, f64::INFINITY, false, &frame);
            trace!(%mv, value, "root candidate");
            if value > best {
                best = value;
                moves.clear();
                moves.push(mv);
            } else if value == best {
                moves.push(mv);
            }
        }

        debug!(
            depth,
            nodes = self.nodes,
            value = best,
            ties = moves.len(),
            "search finished"
        );
        SearchResult {
            value: best,
            moves,
            depth,
            nodes: self.nodes,
        }
    }

    fn minimax(
        &mut self,
        game: &Game,
        depth: usize,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
        frame: &Frame<'_>,
    ) -> f64 {
        self.nodes += 1;
        if depth == 0 || game.is_ended() {
            return self.evaluator.evaluate(game, frame.root);
        }
        let candidates = self.candidates(game, frame.order);
        if candidates.is_empty() {
            return self.evaluator.evaluate(game, frame.root);
        }

        let pruning = self.config.pruning;
        if maximizing {
            let mut value = f64::NEG_INFINITY;
            for mv in candidates {
                let child = child_of(game, mv);
                value = value.max(self.minimax(&child, depth - 1, alpha, beta, false, frame));
                if pruning {
                    alpha = alpha.max(value);
                    if beta <= alpha {
                        break;
                    }
                }
            }
            value
        } else {
            let mut value = f64::INFINITY;
            for mv in candidates {
                let child = child_of(game, mv);
                value = value.min(self.minimax(&child, depth - 1, alpha, beta, true, frame));
                if pruning {
                    beta = beta.min(value);
                    if beta <= alpha {
                        break;
                    }
                }
            }
            value
        }
    }

    /// Search and pick uniformly among the best moves; pass when there is no
    /// candidate at all.
    pub fn choose_move(&mut self, game: &Game) -> Move {
        let result = self.search(game);
        if result.moves.is_empty() {
            return Move::Pass;
        }
        let pick = self.rng.usize(..result.moves.len());
        result.moves[pick]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptive_depth_grows_as_board_fills() {
        assert_eq!(adaptive_depth(81, 100_000, 4), 2);
        assert_eq!(adaptive_depth(40, 100_000, 4), 3);
        assert_eq!(adaptive_depth(10, 100_000, 4), 4);
        assert_eq!(adaptive_depth(2, 100_000, 4), 2);
        assert_eq!(adaptive_depth(0, 100_000, 4), 1);
        assert_eq!(adaptive_depth(500, 10, 4), 1);
    }

    #[test]
    fn unique_coords_cover_board_once() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut seen: Vec<Coord> = UniqueCoords::new(5, &mut rng).collect();
        assert_eq!(seen.len(), 25);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 25);
    }

    #[test]
    fn child_of_plays_on_a_copy() {
        let game = Game::new(3);
        let child = child_of(&game, Move::Play((1, 1)));
        assert_eq!(child.board().stone_count(), 1);
        assert_eq!(child.turn(), Some(Color::White));
        assert_eq!(game.board().stone_count(), 0);
        assert!(child_of(&child, Move::Pass).passed());
    }

    #[test]
    fn unpruned_search_matches_pruned_from_the_root() {
        let mut game = Game::new(3);
        game.play((1, 1), Color::Black);
        let config = SearchConfig {
            max_depth: 2,
            shuffle: false,
            ..SearchConfig::default()
        };
        let mut pruned = Searcher::new(
            crate::eval::HeuristicEvaluator::default(),
            config.clone(),
            fastrand::Rng::with_seed(4),
        );
        let mut plain = Searcher::new(
            crate::eval::HeuristicEvaluator::default(),
            SearchConfig {
                pruning: false,
                ..config
            },
            fastrand::Rng::with_seed(4),
        );
        let a = pruned.search(&game);
        let b = plain.search(&game);
        assert_eq!(a.depth, 2);
        assert_eq!(a.value, b.value);
        assert_eq!(a.moves, b.moves);
    }

    #[test]
    fn just_below_is_strictly_smaller() {
        for x in [1.5, -2.25, 0.0, 1e300, -1e-300] {
            let y = just_below(x);
            assert!(y < x);
        }
        assert_eq!(just_below(f64::NEG_INFINITY), f64::NEG_INFINITY);
        assert!(just_below(f64::INFINITY) < f64::INFINITY);
    }
}
