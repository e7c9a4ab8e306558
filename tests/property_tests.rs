//! Structural invariants under random play.

use quickcheck::{Arbitrary, Gen, quickcheck};

use tengen::board::Board;
use tengen::game::{Game, Move};

/// A board size and a stream of picks; each pick selects a legal point of
/// the position it is applied to, or a pass.
#[derive(Clone, Debug)]
struct RandomGame {
    size: usize,
    picks: Vec<u8>,
}

impl Arbitrary for RandomGame {
    fn arbitrary(g: &mut Gen) -> Self {
        let size = 2 + usize::arbitrary(g) % 6;
        let len = usize::arbitrary(g) % 120;
        let picks = (0..len).map(|_| u8::arbitrary(g)).collect();
        RandomGame { size, picks }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let size = self.size;
        Box::new(
            self.picks
                .shrink()
                .map(move |picks| RandomGame { size, picks }),
        )
    }
}

/// Replays the picks, calling `check` after every move.
fn replay(input: &RandomGame, mut check: impl FnMut(&Game) -> bool) -> bool {
    let mut game = Game::new(input.size);
    for &pick in &input.picks {
        if game.is_ended() {
            break;
        }
        let legal = game.legal_points();
        // Passing is rare so games run long enough to see captures.
        let mv = if pick == u8::MAX || legal.is_empty() {
            Move::Pass
        } else {
            Move::Play(legal[pick as usize % legal.len()])
        };
        if !game.apply(mv) || !check(&game) {
            return false;
        }
    }
    true
}

fn groups_consistent(board: &Board) -> bool {
    for p in board.cells() {
        match (p.color, p.group) {
            (None, None) => {}
            (Some(color), Some(id)) => {
                let Some(group) = board.group(id) else {
                    return false;
                };
                if group.color() != color || !group.points().contains(&p.coord()) {
                    return false;
                }
            }
            _ => return false,
        }
    }

    for group in board.groups() {
        for &at in group.points() {
            if board.point(at).group != Some(group.id()) {
                return false;
            }
        }

        let mut expected: Vec<_> = group
            .points()
            .iter()
            .flat_map(|&at| board.neighbors(at))
            .filter(|&n| board.point(n).group != Some(group.id()))
            .collect();
        expected.sort();
        expected.dedup();
        let mut bounds = group.bounds().to_vec();
        bounds.sort();
        bounds.dedup();
        if bounds.len() != group.bounds().len() || bounds != expected {
            return false;
        }

        let libs = group.liberties(board);
        if libs == 0 || libs > bounds.len() {
            return false;
        }
    }
    true
}

quickcheck! {
    fn random_play_keeps_groups_consistent(input: RandomGame) -> bool {
        replay(&input, |game| groups_consistent(game.board()))
    }

    fn rescoring_changes_nothing(input: RandomGame) -> bool {
        replay(&input, |game| {
            let mut board = game.board().clone();
            board.score() == game.score() && board.score() == game.score() && &board == game.board()
        })
    }

    fn stones_plus_captures_account_for_every_play(input: RandomGame) -> bool {
        let mut plays = 0u32;
        let mut game = Game::new(input.size);
        replay(&input, |after| {
            if after.last_move() != Some(Move::Pass) {
                plays += 1;
            }
            game = after.clone();
            true
        }) && {
            let captured = game.captures().black + game.captures().white;
            game.board().stone_count() as u32 + captured == plays
        }
    }
}
