//! Observation encoding for estimator input.
//!
//! A board is encoded as one plane of cell codes (see [`Cell::code`]) in
//! row-major order, `height * width` floats in total.

use sokozero_core::{Result, SokoZeroError};

use crate::{Board, Cell};

/// Encode a board as a flat vector of cell codes.
pub fn encode(board: &Board) -> Vec<f32> {
    board.cells().iter().map(|cell| cell.code() as f32).collect()
}

/// Decode an observation back into a board.
///
/// # Errors
/// Returns `MalformedLevel` if a value is not a cell code or the decoded
/// board is invalid.
pub fn decode(observation: &[f32], width: usize, height: usize) -> Result<Board> {
    let cells = observation
        .iter()
        .map(|&value| {
            let code = value as u8;
            if value.fract() != 0.0 || value < 0.0 || value != code as f32 {
                return None;
            }
            Cell::from_code(code)
        })
        .collect::<Option<Vec<Cell>>>()
        .ok_or_else(|| {
            SokoZeroError::MalformedLevel("observation contains an unknown cell code".to_string())
        })?;

    Board::from_cells(width, height, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_codes() {
        let board = Board::parse("#@$.*").unwrap();
        assert_eq!(encode(&board), vec![2.0, 1.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_decode_roundtrip() {
        let board = Board::parse("####\n#+$#\n#  #\n####").unwrap();
        let obs = encode(&board);
        assert_eq!(decode(&obs, 4, 4).unwrap(), board);
    }

    #[test]
    fn test_decode_rejects_bad_codes() {
        assert!(decode(&[1.0, 7.0], 2, 1).is_err());
        assert!(decode(&[1.0, 0.5], 2, 1).is_err());
        assert!(decode(&[1.0, -1.0], 2, 1).is_err());
    }
}
