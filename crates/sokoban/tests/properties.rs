//! Property tests for the Sokoban rules.
//!
//! Random walled levels are generated, then random walks over legal actions
//! check that moves conserve boxes, goals and walls, and that the encoding
//! helpers stay consistent along the way.

use proptest::prelude::*;
use sokozero_core::{Outcome, Puzzle};
use sokozero_sokoban::{observation, Action, Board, Cell, Sokoban, Symmetry};

const INTERIOR: [char; 6] = [' ', ' ', '#', '$', '.', '*'];

/// A walled level with random interior and a single player.
fn level() -> impl Strategy<Value = String> {
    (3usize..7, 3usize..7)
        .prop_flat_map(|(width, height)| {
            let inner = (width - 2) * (height - 2);
            (
                Just(width),
                Just(height),
                prop::collection::vec(0..INTERIOR.len(), inner),
                0..inner,
            )
        })
        .prop_map(|(width, height, picks, player)| {
            let mut rows = Vec::with_capacity(height);
            rows.push("#".repeat(width));
            for row in 0..height - 2 {
                let mut line = String::from("#");
                for col in 0..width - 2 {
                    let i = row * (width - 2) + col;
                    let c = INTERIOR[picks[i]];
                    line.push(match (i == player, c) {
                        (true, '.') | (true, '*') => '+',
                        (true, _) => '@',
                        (false, c) => c,
                    });
                }
                line.push('#');
                rows.push(line);
            }
            rows.push("#".repeat(width));
            rows.join("\n")
        })
}

fn boxes(board: &Board) -> usize {
    board.cells().iter().filter(|c| c.has_box()).count()
}

fn goals(board: &Board) -> usize {
    board.cells().iter().filter(|c| c.is_goal()).count()
}

fn walls(board: &Board) -> Vec<bool> {
    board.cells().iter().map(|c| c.is_wall()).collect()
}

proptest! {
    #[test]
    fn render_parse_roundtrip(text in level()) {
        let board = Board::parse(&text).unwrap();
        prop_assert_eq!(board.render(), text);
        prop_assert_eq!(Board::parse(&board.render()).unwrap(), board);
    }

    #[test]
    fn random_walk_conserves_pieces(
        text in level(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..30)
    ) {
        let game = Sokoban::from_level(&text).unwrap();
        let mut state = game.initial_state();
        let (box_count, goal_count, wall_map) = (boxes(&state), goals(&state), walls(&state));

        for pick in picks {
            let legal = game.legal_actions(&state);
            prop_assert!(!legal.is_empty());

            match game.outcome(&state) {
                Some(Outcome::Solved) => {
                    prop_assert_eq!(state.count(Cell::Box), 0);
                    break;
                }
                Some(Outcome::Deadlocked) => {
                    prop_assert_eq!(&legal, &vec![Action::Pass]);
                    break;
                }
                None => prop_assert!(!legal.contains(&Action::Pass)),
            }

            let action = legal[pick.index(legal.len())];
            prop_assert!(game.legal_mask(&state).is_legal(game.action_to_index(action)));
            state = game.apply(&state, action);

            prop_assert_eq!(boxes(&state), box_count);
            prop_assert_eq!(goals(&state), goal_count);
            prop_assert_eq!(walls(&state), wall_map.clone());
            prop_assert_eq!(
                state.cells().iter().filter(|c| c.has_player()).count(),
                1
            );
        }
    }

    #[test]
    fn symmetries_invert_and_decode(text in level(), hot in any::<prop::sample::Index>()) {
        let game = Sokoban::from_level(&text).unwrap();
        let board = game.initial_state();
        let (height, width) = (board.height(), board.width());

        let obs = game.observe(&board);
        let n = game.num_actions();
        let mut policy = vec![0.0; n];
        policy[hot.index(n)] = 1.0;

        let shapes = Symmetry::for_shape(height, width);
        let variants = game.symmetries(&obs, &policy);
        prop_assert_eq!(variants.len(), shapes.len());

        for (s, (o, p)) in shapes.into_iter().zip(variants) {
            let (h, w) = s.output_shape(height, width);
            let decoded = observation::decode(&o, w, h).unwrap();
            prop_assert_eq!(decoded.count(Cell::Box), board.count(Cell::Box));
            prop_assert_eq!(Board::parse(&decoded.render()).unwrap(), decoded.clone());
            prop_assert_eq!(p[width * height], policy[width * height]);

            let inv = s.inverse();
            prop_assert_eq!(inv.apply_grid(&o, h, w), obs.clone());
            prop_assert_eq!(inv.apply_policy(&p, h, w), policy.clone());
        }
    }
}
