use sokozero_core::{Outcome, Puzzle, Result, SokoZeroError};

use crate::action::{Action, ActionSpace};
use crate::{observation, symmetry, Board};

/// A Sokoban level as a searchable puzzle.
///
/// The action space is sized by the initial board; every state reached from
/// it shares the same dimensions.
#[derive(Clone, Debug)]
pub struct Sokoban {
    initial: Board,
    actions: ActionSpace,
}

impl Sokoban {
    pub fn new(initial: Board) -> Self {
        let actions = ActionSpace::for_board(&initial);
        Self { initial, actions }
    }

    /// Parse a level in the standard text format.
    pub fn from_level(text: &str) -> Result<Self> {
        Ok(Self::new(Board::parse(text)?))
    }

    pub fn initial_board(&self) -> &Board {
        &self.initial
    }

    pub fn action_space(&self) -> ActionSpace {
        self.actions
    }

    /// Apply an action, reporting illegal ones as errors.
    ///
    /// Pass is legal only when the player cannot move.
    pub fn try_apply(&self, board: &Board, action: Action) -> Result<Board> {
        match action {
            Action::Pass if board.legal_moves().is_empty() => Ok(board.clone()),
            Action::Pass => Err(SokoZeroError::IllegalMove(
                "pass while moves are available".to_string(),
            )),
            Action::Step { .. } => {
                let dir = action.to_move(board).ok_or_else(|| {
                    SokoZeroError::IllegalMove(format!("{} is not next to the player", action))
                })?;
                board.apply(dir)
            }
        }
    }
}

impl Puzzle for Sokoban {
    type State = Board;
    type Action = Action;
    type Key = String;
    type Observation = Vec<f32>;

    fn initial_state(&self) -> Board {
        self.initial.clone()
    }

    fn legal_actions(&self, state: &Board) -> Vec<Action> {
        let actions: Vec<Action> = state
            .legal_moves()
            .into_iter()
            .filter_map(|dir| Action::from_move(state, dir))
            .collect();

        if actions.is_empty() {
            vec![Action::Pass]
        } else {
            actions
        }
    }

    fn apply(&self, state: &Board, action: Action) -> Board {
        match self.try_apply(state, action) {
            Ok(next) => next,
            Err(e) => panic!("BUG: {} on board\n{}", e, state),
        }
    }

    fn outcome(&self, state: &Board) -> Option<Outcome> {
        if state.is_solved() {
            Some(Outcome::Solved)
        } else if state.legal_moves().is_empty() {
            Some(Outcome::Deadlocked)
        } else {
            None
        }
    }

    fn state_key(&self, state: &Board) -> String {
        state.render()
    }

    fn observe(&self, state: &Board) -> Vec<f32> {
        observation::encode(state)
    }

    fn action_to_index(&self, action: Action) -> usize {
        self.actions.index(action)
    }

    fn index_to_action(&self, index: usize) -> Option<Action> {
        self.actions.action(index)
    }

    fn num_actions(&self) -> usize {
        self.actions.size()
    }

    fn symmetries(&self, observation: &Vec<f32>, policy: &[f32]) -> Vec<(Vec<f32>, Vec<f32>)> {
        symmetry::symmetries(
            observation,
            policy,
            self.initial.height(),
            self.initial.width(),
        )
    }
}
