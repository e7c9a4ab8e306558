//! Tengen: Go rules with a minimax player.
//!
//! The crate keeps a board of points and stone groups up to date move by
//! move, enforces capture, suicide and single-stone ko rules, scores
//! positions by area, and searches for moves with depth-limited alpha-beta
//! minimax over a heuristic evaluator.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits, search policy and evaluator defaults
//! - [`point`] - Colors, coordinates and the per-point legality record
//! - [`group`] - Connected stone groups and their liberties
//! - [`board`] - Board state, captures, permissions and area scoring
//! - [`game`] - Turn order, passes, ko and game end
//! - [`eval`] - Static position evaluation
//! - [`search`] - Minimax search with adaptive depth
//! - [`player`] - Automated players behind one interface
//! - [`encoding`] - Feature encoding for learned evaluators
//! - [`snapshot`] - Persistence snapshot and display views
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use tengen::eval::HeuristicEvaluator;
//! use tengen::game::{Game, Move};
//! use tengen::point::Color;
//! use tengen::search::{SearchConfig, Searcher};
//!
//! let mut game = Game::new(5);
//! game.play((2, 2), Color::Black);
//!
//! let mut searcher = Searcher::new(
//!     HeuristicEvaluator::default(),
//!     SearchConfig::default(),
//!     fastrand::Rng::with_seed(42),
//! );
//! let reply = searcher.choose_move(&game);
//! assert!(matches!(reply, Move::Play(_)));
//! assert!(game.apply(reply));
//! ```

pub mod board;
pub mod constants;
pub mod encoding;
pub mod eval;
pub mod game;
pub mod group;
pub mod gtp;
pub mod player;
pub mod point;
pub mod search;
pub mod snapshot;
