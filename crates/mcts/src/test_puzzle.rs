//! A tiny puzzle for unit tests: walk forward along a corridor to the goal.
//! Stepping into the pit deadlocks.

use sokozero_core::{Outcome, Puzzle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Spot {
    At(u8),
    Pit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Move {
    Back,
    Forward,
    Drop,
    Pass,
}

const MOVES: [Move; 4] = [Move::Back, Move::Forward, Move::Drop, Move::Pass];

#[derive(Clone, Debug)]
pub(crate) struct Corridor {
    goal: u8,
}

impl Corridor {
    pub(crate) fn new(goal: u8) -> Self {
        Self { goal }
    }
}

impl Puzzle for Corridor {
    type State = Spot;
    type Action = Move;
    type Key = Spot;
    type Observation = ();

    fn initial_state(&self) -> Spot {
        Spot::At(0)
    }

    fn legal_actions(&self, state: &Spot) -> Vec<Move> {
        let mut actions = Vec::new();
        if let Spot::At(p) = *state {
            if p > 0 {
                actions.push(Move::Back);
            }
            if p < self.goal {
                actions.push(Move::Forward);
            }
            if p > 0 {
                actions.push(Move::Drop);
            }
        }
        if actions.is_empty() {
            actions.push(Move::Pass);
        }
        actions
    }

    fn apply(&self, state: &Spot, action: Move) -> Spot {
        assert!(
            self.legal_actions(state).contains(&action),
            "BUG: {:?} is illegal at {:?}",
            action,
            state
        );
        match (*state, action) {
            (Spot::At(p), Move::Back) => Spot::At(p - 1),
            (Spot::At(p), Move::Forward) => Spot::At(p + 1),
            (Spot::At(_), Move::Drop) => Spot::Pit,
            (state, _) => state,
        }
    }

    fn outcome(&self, state: &Spot) -> Option<Outcome> {
        match *state {
            Spot::At(p) if p == self.goal => Some(Outcome::Solved),
            Spot::At(_) => None,
            Spot::Pit => Some(Outcome::Deadlocked),
        }
    }

    fn state_key(&self, state: &Spot) -> Spot {
        *state
    }

    fn observe(&self, _state: &Spot) {}

    fn action_to_index(&self, action: Move) -> usize {
        action as usize
    }

    fn index_to_action(&self, index: usize) -> Option<Move> {
        MOVES.get(index).copied()
    }

    fn num_actions(&self) -> usize {
        MOVES.len()
    }
}
