//! Shared helpers for integration tests

#![allow(dead_code)]

use cup_stack::core::SimpleRng;
use cup_stack::engine::{Game, TurnReport};
use cup_stack::types::{Cup, CupId};

pub fn cup(id: u32, size: u8, linked: bool) -> Cup {
    Cup {
        id: CupId(id),
        size,
        linked,
    }
}

/// Play up to `turns` random turns (a random legal move or a skip), calling
/// `visit` after the opening and after every resolved turn.
pub fn play_random(seed: u32, turns: usize, mut visit: impl FnMut(&Game, &TurnReport)) {
    let (mut game, opening) = Game::new(seed).expect("new game");
    visit(&game, &opening);

    let mut chooser = SimpleRng::new(seed ^ 0x9e37_79b9);
    for _ in 0..turns {
        if game.phase().is_terminal() {
            break;
        }
        game.finish_animation().expect("finish playback");

        let moves = game.legal_moves();
        let pick = chooser.next_range(moves.len() as u32 + 1) as usize;
        let report = match moves.get(pick) {
            Some(mv) => game.play_move(mv.from, mv.to),
            None => game.skip(),
        }
        .expect("turn");
        visit(&game, &report);
    }
}
