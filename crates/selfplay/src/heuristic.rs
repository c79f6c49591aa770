//! Greedy one-step baseline: pick the move whose successor scores best.

use sokozero_core::Puzzle;
use sokozero_sokoban::{score, Action, Board, Sokoban};

/// Greedy player over [`score::score`].
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicPlayer;

impl HeuristicPlayer {
    /// Legal action whose successor has the highest score, lowest action
    /// index on ties.
    pub fn best_action(&self, game: &Sokoban, board: &Board) -> Action {
        let mut best: Option<(f32, usize, Action)> = None;

        for action in game.legal_actions(board) {
            let value = score::score(&game.apply(board, action));
            let index = game.action_to_index(action);
            let better = match best {
                None => true,
                Some((best_value, best_index, _)) => {
                    value > best_value || (value == best_value && index < best_index)
                }
            };
            if better {
                best = Some((value, index, action));
            }
        }

        // legal_actions is never empty
        best.map(|(_, _, action)| action).unwrap_or(Action::Pass)
    }

    /// Index of [`best_action`](Self::best_action), for arena play.
    pub fn choose_index(&self, game: &Sokoban, board: &Board) -> usize {
        game.action_to_index(self.best_action(game, board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{Arena, ArenaOutcome};

    #[test]
    fn test_prefers_push_toward_goal() {
        let game = Sokoban::from_level("#######\n# @$ .#\n#######").unwrap();
        let board = game.initial_state();
        assert_eq!(
            HeuristicPlayer.best_action(&game, &board),
            Action::Step { row: 1, col: 3 }
        );
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        // no box moves, so both steps score the same
        let game = Sokoban::from_level("#######\n#*  @ #\n#######").unwrap();
        let board = game.initial_state();
        assert_eq!(
            HeuristicPlayer.best_action(&game, &board),
            Action::Step { row: 1, col: 3 }
        );
    }

    #[test]
    fn test_solves_corridor_in_arena() {
        let game = Sokoban::from_level("#######\n#@ $ .#\n#######").unwrap();
        let arena = Arena::new(&game, 10);
        let mut policy = |board: &Board| Ok(HeuristicPlayer.choose_index(&game, board));
        assert_eq!(arena.play_episode(&mut policy).unwrap(), ArenaOutcome::Solved);
    }

    #[test]
    fn test_deadlock_passes() {
        let game = Sokoban::from_level("#####\n#@$##\n#####").unwrap();
        let board = game.initial_state();
        assert_eq!(HeuristicPlayer.best_action(&game, &board), Action::Pass);
    }
}
