//! Constants for board defaults, evaluator weights, and search policy.
//!
//! These are the compile-time defaults. The runtime knobs live in
//! [`SearchConfig`](crate::search::SearchConfig) and
//! [`EvalWeights`](crate::eval::EvalWeights), whose `Default` impls are built
//! from the values below.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN). Board size is a construction parameter, this is
/// only what the CLI and `Default` impls reach for.
pub const DEFAULT_SIZE: usize = 9;

/// Smallest board the request layer accepts.
pub const MIN_SIZE: usize = 2;

/// Largest board the request layer accepts (GTP vertex letters run out at 25).
pub const MAX_SIZE: usize = 25;

// =============================================================================
// Search Parameters
// =============================================================================

/// Upper bound on the estimated branching product
/// `open * (open - 1) * ... * (open - depth + 1)` for one search.
pub const COMPLEXITY_BUDGET: u64 = 100_000;

/// Hard cap on search depth, whatever the budget allows.
pub const MAX_SEARCH_DEPTH: usize = 4;

/// Passing is only considered once more than this fraction of the board is
/// covered by stones.
pub const PASS_COVERAGE: f64 = 0.75;

// =============================================================================
// Evaluator Weights
// =============================================================================

/// Weight of the area score difference (stones plus owned territory).
pub const TERRITORY_WEIGHT: f64 = 1.0;

/// Weight per enclosed eye region of a group.
pub const EYE_WEIGHT: f64 = 4.0;

/// Flat bonus for a group with two or more eyes.
pub const TWO_EYES_BONUS: f64 = 20.0;

/// Weight per liberty.
pub const LIBERTY_WEIGHT: f64 = 1.0;

/// Weight of the bounding-box area of a group's boundary.
pub const AREA_WEIGHT: f64 = 0.1;

/// Weight of group density (stones / bounding-box area).
pub const DENSITY_WEIGHT: f64 = 2.0;

/// Weight of the closeness to a friendly group found by the boundary scan.
pub const CONNECTION_WEIGHT: f64 = 0.5;

/// Weight per stone of capture difference.
pub const CAPTURE_WEIGHT: f64 = 2.0;

/// Adjustment applied while a ko is active.
pub const KO_WEIGHT: f64 = 1.5;

/// How many steps through empty points the eye scan may take.
pub const EYE_SCAN_DEPTH: usize = 2;
