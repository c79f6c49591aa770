//! Heuristic board score used by the greedy baseline player.

use crate::{Board, Cell};

const DISTANCE_WEIGHT: f32 = 100.0;

/// Boxes on goals plus a bonus that shrinks as the free boxes drift away from
/// the free goals: `placed + 100 * (1 - sigmoid(median distance))`.
///
/// With no free box the median distance is 0; with free boxes but no free
/// goal the bonus is 0.
pub fn score(board: &Board) -> f32 {
    let placed = board.count(Cell::BoxOnGoal) as f32;
    let bonus = match median_distance(board) {
        Some(distance) => DISTANCE_WEIGHT * (1.0 - sigmoid(distance)),
        None => 0.0,
    };
    placed + bonus
}

/// Median over free boxes of the Manhattan distance to the nearest free goal.
///
/// Returns None if there are free boxes but no free goal.
pub fn median_distance(board: &Board) -> Option<f32> {
    let mut boxes = Vec::new();
    let mut goals = Vec::new();
    for row in 0..board.height() {
        for col in 0..board.width() {
            match board.cell(row, col) {
                Some(Cell::Box) => boxes.push((row, col)),
                Some(Cell::Goal | Cell::PlayerOnGoal) => goals.push((row, col)),
                _ => {}
            }
        }
    }

    if boxes.is_empty() {
        return Some(0.0);
    }

    let mut distances = boxes
        .iter()
        .map(|&(br, bc)| {
            goals
                .iter()
                .map(|&(gr, gc)| br.abs_diff(gr) + bc.abs_diff(gc))
                .min()
        })
        .collect::<Option<Vec<usize>>>()?;
    distances.sort_unstable();

    let mid = distances.len() / 2;
    let median = if distances.len() % 2 == 0 {
        (distances[mid - 1] + distances[mid]) as f32 / 2.0
    } else {
        distances[mid] as f32
    };
    Some(median)
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_distance() {
        let board = Board::parse("#######\n#@$ . #\n#######").unwrap();
        assert_eq!(median_distance(&board), Some(2.0));

        let board = Board::parse("########\n#@$$ ..#\n########").unwrap();
        // distances 3 and 2
        assert_eq!(median_distance(&board), Some(2.5));
    }

    #[test]
    fn test_solved_board_gets_full_bonus() {
        let board = Board::parse("####\n#@*#\n####").unwrap();
        assert_eq!(median_distance(&board), Some(0.0));
        assert!((score(&board) - 51.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_free_goal() {
        let board = Board::parse("######\n#@$ *#\n######").unwrap();
        assert_eq!(median_distance(&board), None);
        assert!((score(&board) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_closer_box_scores_higher() {
        let far = Board::parse("#######\n#@$  .#\n#######").unwrap();
        let near = Board::parse("#######\n# @$ .#\n#######").unwrap();
        assert!(score(&near) > score(&far));
    }
}
