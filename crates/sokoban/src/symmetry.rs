//! Dihedral transforms of the board grid.
//!
//! Training examples are augmented by rotating and mirroring the observation
//! together with the policy. Step actions are indexed by destination cell, so
//! the first `height * width` policy entries transform like the board; the
//! pass entry is copied unchanged.

/// A rotation by `quarter_turns` counter-clockwise quarter turns, followed
/// by an optional left-right mirror.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Symmetry {
    quarter_turns: u8,
    flip: bool,
}

impl Symmetry {
    pub const IDENTITY: Symmetry = Symmetry {
        quarter_turns: 0,
        flip: false,
    };

    pub fn new(quarter_turns: u8, flip: bool) -> Self {
        Self {
            quarter_turns: quarter_turns % 4,
            flip,
        }
    }

    /// All eight symmetries of a square grid, identity first.
    pub fn all() -> [Symmetry; 8] {
        let mut out = [Symmetry::IDENTITY; 8];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = Symmetry::new((i / 2) as u8, i % 2 == 1);
        }
        out
    }

    /// Symmetries that keep a `height x width` grid's shape.
    ///
    /// Square grids admit all eight. Other grids only admit the four
    /// transforms with an even number of quarter turns.
    pub fn for_shape(height: usize, width: usize) -> Vec<Symmetry> {
        Self::all()
            .into_iter()
            .filter(|s| height == width || s.quarter_turns % 2 == 0)
            .collect()
    }

    pub fn quarter_turns(self) -> u8 {
        self.quarter_turns
    }

    pub fn flip(self) -> bool {
        self.flip
    }

    /// Shape of a `height x width` grid after this transform
    pub fn output_shape(self, height: usize, width: usize) -> (usize, usize) {
        if self.quarter_turns % 2 == 1 {
            (width, height)
        } else {
            (height, width)
        }
    }

    /// Where cell (row, col) of a `height x width` grid lands.
    pub fn map(self, row: usize, col: usize, height: usize, width: usize) -> (usize, usize) {
        let (mut r, mut c) = (row, col);
        let (mut h, mut w) = (height, width);

        for _ in 0..self.quarter_turns {
            (r, c) = (w - 1 - c, r);
            std::mem::swap(&mut h, &mut w);
        }
        if self.flip {
            c = w - 1 - c;
        }
        (r, c)
    }

    /// Transform a row-major grid.
    ///
    /// # Panics
    /// Panics if `grid.len() != height * width`.
    pub fn apply_grid<T: Copy>(self, grid: &[T], height: usize, width: usize) -> Vec<T> {
        assert_eq!(grid.len(), height * width, "BUG: grid does not match its shape");

        let (_, out_width) = self.output_shape(height, width);
        let mut out = grid.to_vec();
        for row in 0..height {
            for col in 0..width {
                let (r, c) = self.map(row, col, height, width);
                out[r * out_width + c] = grid[row * width + col];
            }
        }
        out
    }

    /// Transform a policy whose first `height * width` entries are cells.
    /// Trailing entries (the pass action) are copied unchanged.
    pub fn apply_policy(self, policy: &[f32], height: usize, width: usize) -> Vec<f32> {
        let cells = height * width;
        let mut out = self.apply_grid(&policy[..cells], height, width);
        out.extend_from_slice(&policy[cells..]);
        out
    }

    /// The transform undoing this one.
    pub fn inverse(self) -> Symmetry {
        if self.flip {
            // a mirrored rotation is an involution
            self
        } else {
            Symmetry::new((4 - self.quarter_turns) % 4, false)
        }
    }
}

/// Every shape-preserving transform of an (observation, policy) pair.
///
/// The identity comes first.
pub fn symmetries(
    observation: &[f32],
    policy: &[f32],
    height: usize,
    width: usize,
) -> Vec<(Vec<f32>, Vec<f32>)> {
    Symmetry::for_shape(height, width)
        .into_iter()
        .map(|s| {
            (
                s.apply_grid(observation, height, width),
                s.apply_policy(policy, height, width),
            )
        })
        .collect()
}
