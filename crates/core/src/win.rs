//! Win detector - look for a finished 5-4-3-2-1 chain

use crate::board::Board;
use crate::types::{Cup, WIN_PATTERN};

/// Whether any lane holds a winning window.
pub fn check_win(board: &Board) -> bool {
    winning_lane(board).is_some()
}

/// First lane holding a winning window
pub fn winning_lane(board: &Board) -> Option<usize> {
    board.lanes().position(lane_has_win)
}

/// A window wins when its sizes read 5,4,3,2,1 bottom-up and every cup above the
/// base is linked. The base's own link does not matter.
pub fn lane_has_win(lane: &[Cup]) -> bool {
    lane.windows(WIN_PATTERN.len()).any(|window| {
        window
            .iter()
            .zip(WIN_PATTERN)
            .all(|(cup, size)| cup.size == size)
            && window[1..].iter().all(|cup| cup.linked)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CupId;

    fn chain(sizes: &[u8], links: &[bool], first_id: u32) -> Vec<Cup> {
        sizes
            .iter()
            .zip(links)
            .enumerate()
            .map(|(i, (&size, &linked))| Cup {
                id: CupId(first_id + i as u32),
                size,
                linked,
            })
            .collect()
    }

    #[test]
    fn empty_board_has_no_win() {
        assert!(!check_win(&Board::new()));
    }

    #[test]
    fn linked_chain_wins() {
        let lane = chain(&[5, 4, 3, 2, 1], &[false, true, true, true, true], 1);
        assert!(lane_has_win(&lane));
    }

    #[test]
    fn base_link_is_irrelevant() {
        let lane = chain(&[5, 5, 4, 3, 2, 1], &[false, false, true, true, true, true], 1);
        assert!(lane_has_win(&lane));
    }

    #[test]
    fn unlinked_upper_cup_does_not_win() {
        let lane = chain(&[5, 4, 3, 2, 1], &[false, true, true, false, true], 1);
        assert!(!lane_has_win(&lane));
    }

    #[test]
    fn wrong_order_does_not_win() {
        let lane = chain(&[1, 2, 3, 4, 5], &[false; 5], 1);
        assert!(!lane_has_win(&lane));
    }

    #[test]
    fn winning_lane_reports_index() {
        let board = Board::with_lanes([
            vec![],
            vec![],
            chain(&[5, 4, 3, 2, 1], &[false, true, true, true, true], 1),
            vec![],
        ])
        .unwrap();
        assert_eq!(winning_lane(&board), Some(2));
    }

    #[test]
    fn ids_do_not_matter() {
        let links = [false, true, true, true, true];
        for first in [1, 100, 9000] {
            let board = Board::with_lanes([
                chain(&[5, 4, 3, 2, 1], &links, first),
                vec![],
                vec![],
                vec![],
            ])
            .unwrap();
            assert!(check_win(&board));
        }
    }
}
