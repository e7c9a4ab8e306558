//! Search behaviour on small, hand-built positions.

use std::collections::HashSet;

use tengen::eval::HeuristicEvaluator;
use tengen::game::{Game, Move};
use tengen::point::{Color, Coord};
use tengen::search::{SearchConfig, Searcher};

fn setup_game(size: usize, moves: &[Option<Coord>]) -> Game {
    let mut game = Game::new(size);
    for mv in moves {
        assert!(game.apply(mv.map_or(Move::Pass, Move::Play)));
    }
    game
}

fn searcher(config: SearchConfig, seed: u64) -> Searcher<HeuristicEvaluator> {
    Searcher::new(
        HeuristicEvaluator::default(),
        config,
        fastrand::Rng::with_seed(seed),
    )
}

/// Black to play on 3x3 with (2,2) as the only legal point:
///
/// ```text
/// . X O
/// X X O
/// O O .
/// ```
fn single_move_position() -> Game {
    setup_game(
        3,
        &[
            Some((1, 0)),
            Some((2, 0)),
            Some((0, 1)),
            Some((2, 1)),
            Some((1, 1)),
            Some((0, 2)),
            None,
            Some((1, 2)),
        ],
    )
}

#[test]
fn only_legal_move_is_always_chosen() {
    let game = single_move_position();
    assert_eq!(game.turn(), Some(Color::Black));
    assert_eq!(game.legal_points(), vec![(2, 2)]);

    let config = SearchConfig {
        pass_coverage: 1.0,
        ..SearchConfig::default()
    };
    for seed in 0..20 {
        let mut s = searcher(config.clone(), seed);
        assert_eq!(s.choose_move(&game), Move::Play((2, 2)));
    }
}

#[test]
fn pass_joins_the_candidates_on_a_full_board() {
    let game = single_move_position();
    let mut s = searcher(SearchConfig::default(), 3);
    let result = s.search(&game);
    // Capturing both white groups beats passing.
    assert_eq!(result.moves, vec![Move::Play((2, 2))]);
    assert!(result.nodes > 1);
}

#[test]
fn no_candidate_means_pass() {
    // White has only black eyes left and too little of the board is covered
    // for passing to be searched.
    let game = setup_game(2, &[Some((0, 0)), None, Some((1, 1))]);
    assert_eq!(game.turn(), Some(Color::White));
    assert!(game.legal_points().is_empty());

    let mut s = searcher(SearchConfig::default(), 5);
    let result = s.search(&game);
    assert!(result.moves.is_empty());
    assert_eq!(result.value, f64::NEG_INFINITY);
    assert_eq!(s.choose_move(&game), Move::Pass);
}

#[test]
fn ended_game_has_no_moves() {
    let game = setup_game(3, &[None, None]);
    let mut s = searcher(SearchConfig::default(), 1);
    assert!(s.search(&game).moves.is_empty());
    assert_eq!(s.choose_move(&game), Move::Pass);
}

#[test]
fn pruning_does_not_change_the_answer() {
    let game = setup_game(
        4,
        &[Some((1, 1)), Some((2, 2)), Some((2, 1)), Some((1, 2))],
    );
    let base = SearchConfig {
        max_depth: 3,
        shuffle: false,
        ..SearchConfig::default()
    };
    let mut pruned = searcher(base.clone(), 11);
    let mut plain = searcher(
        SearchConfig {
            pruning: false,
            ..base
        },
        11,
    );

    let a = pruned.search(&game);
    let b = plain.search(&game);
    assert_eq!(a.depth, 3);
    assert_eq!(a.value, b.value);
    assert_eq!(
        a.moves.iter().collect::<HashSet<_>>(),
        b.moves.iter().collect::<HashSet<_>>()
    );
    assert!(a.nodes <= b.nodes);
}

#[test]
fn search_leaves_the_game_untouched() {
    let game = setup_game(5, &[Some((2, 2)), Some((1, 1))]);
    let before = game.clone();
    let mut s = searcher(SearchConfig::default(), 2);
    s.search(&game);
    assert_eq!(game, before);
}

#[test]
fn depth_follows_board_fill() {
    let s = searcher(SearchConfig::default(), 0);
    assert_eq!(s.depth_for(&Game::new(9)), 2);
    assert_eq!(s.depth_for(&single_move_position()), 2);

    let shallow = searcher(
        SearchConfig {
            max_depth: 1,
            ..SearchConfig::default()
        },
        0,
    );
    assert_eq!(shallow.depth_for(&Game::new(3)), 1);
}

#[test]
fn chosen_moves_are_legal() {
    let mut game = Game::new(4);
    let mut s = searcher(SearchConfig::default(), 8);
    for _ in 0..12 {
        if game.is_ended() {
            break;
        }
        let mv = s.choose_move(&game);
        assert!(game.apply(mv), "{mv} should be legal");
    }
}
