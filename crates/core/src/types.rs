//! SokoZero domain types with enforced invariants.
//!
//! These types ensure critical invariants are maintained at the type level:
//! - Policy: probability distribution summing to 1.0
//! - Value: value estimate in range [-1, 1]
//! - LegalMask: which action indices are legal in a state

use crate::{Result, SokoZeroError};

/// Tolerance for policy sum validation.
const POLICY_SUM_TOLERANCE: f32 = 1e-5;

/// A probability distribution over actions.
///
/// Invariant: All values are non-negative and sum to 1.0 (±1e-5).
///
/// # Example
/// ```
/// use sokozero_core::Policy;
///
/// let policy = Policy::new(vec![0.3, 0.5, 0.2]).unwrap();
/// assert!((policy.sum() - 1.0).abs() < 1e-5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Policy(Vec<f32>);

impl Policy {
    /// Create a new policy from a probability distribution.
    ///
    /// # Errors
    /// Returns `SokoZeroError::InvalidPolicy` if:
    /// - Any value is negative or not finite
    /// - Values don't sum to 1.0 (±1e-5)
    /// - Vector is empty
    pub fn new(probs: Vec<f32>) -> Result<Self> {
        check_entries(&probs)?;

        let sum: f32 = probs.iter().sum();
        if (sum - 1.0).abs() > POLICY_SUM_TOLERANCE {
            return Err(SokoZeroError::InvalidPolicy(format!(
                "policy sum {} is not 1.0 (tolerance {})",
                sum, POLICY_SUM_TOLERANCE
            )));
        }

        Ok(Self(probs))
    }

    /// Create a policy from raw values, normalizing them to sum to 1.0.
    ///
    /// # Errors
    /// Returns error if any value is negative or all values are zero.
    pub fn from_unnormalized(values: Vec<f32>) -> Result<Self> {
        check_entries(&values)?;

        let sum: f32 = values.iter().sum();
        if sum == 0.0 {
            return Err(SokoZeroError::InvalidPolicy(
                "cannot normalize: all values are zero".to_string(),
            ));
        }

        Ok(Self(values.iter().map(|&v| v / sum).collect()))
    }

    /// Get the probability at the given index.
    pub fn get(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied()
    }

    /// Get the probability at the given index, returning 0 if out of bounds.
    pub fn get_or_zero(&self, index: usize) -> f32 {
        self.0.get(index).copied().unwrap_or(0.0)
    }

    /// Get the number of actions in this policy.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the policy is empty (never true for valid policies).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the sum of all probabilities (should be ~1.0).
    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }

    /// Get the underlying vector (consumes self).
    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// Get a reference to the underlying slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

fn check_entries(values: &[f32]) -> Result<()> {
    if values.is_empty() {
        return Err(SokoZeroError::InvalidPolicy(
            "policy cannot be empty".to_string(),
        ));
    }

    if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(SokoZeroError::InvalidPolicy(format!(
            "policy contains invalid entry {}",
            bad
        )));
    }

    Ok(())
}

impl std::ops::Index<usize> for Policy {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// A value estimate for a puzzle state.
///
/// Invariant: Value is in range [-1, 1]. Puzzles use +1 for a solved state;
/// estimators may report either [0, 1] or [-1, 1] for unsolved ones.
///
/// # Example
/// ```
/// use sokozero_core::Value;
///
/// let value = Value::new(0.5).unwrap();
/// assert!(value.get() >= -1.0 && value.get() <= 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Value(f32);

impl Value {
    /// Create a new value.
    ///
    /// # Errors
    /// Returns `SokoZeroError::InvalidValue` if the value is NaN or outside [-1, 1].
    pub fn new(value: f32) -> Result<Self> {
        if !(-1.0..=1.0).contains(&value) {
            return Err(SokoZeroError::InvalidValue(format!(
                "value {} is outside range [-1, 1]",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Value of a solved puzzle.
    pub const SOLVED: Self = Self(1.0);

    /// Value of a puzzle that was not solved.
    pub const UNSOLVED: Self = Self(0.0);

    /// Get the underlying value.
    pub fn get(self) -> f32 {
        self.0
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<Value> for f32 {
    fn from(v: Value) -> f32 {
        v.0
    }
}

/// Legal-action mask over the full action space.
///
/// Carried alongside raw estimator policies so that masking and
/// renormalization have one well-defined implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegalMask {
    legal: Vec<bool>,
    count: usize,
}

impl LegalMask {
    /// Create a mask with no legal actions.
    pub fn new(num_actions: usize) -> Self {
        Self {
            legal: vec![false; num_actions],
            count: 0,
        }
    }

    /// Create a mask from the indices of the legal actions.
    ///
    /// Indices outside the action space are ignored.
    pub fn from_indices(num_actions: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut mask = Self::new(num_actions);
        for index in indices {
            mask.set(index);
        }
        mask
    }

    /// Mark an action index as legal.
    pub fn set(&mut self, index: usize) {
        if let Some(slot) = self.legal.get_mut(index) {
            if !*slot {
                *slot = true;
                self.count += 1;
            }
        }
    }

    /// Whether the action at `index` is legal.
    pub fn is_legal(&self, index: usize) -> bool {
        self.legal.get(index).copied().unwrap_or(false)
    }

    /// Size of the action space.
    pub fn len(&self) -> usize {
        self.legal.len()
    }

    /// True if the action space is empty.
    pub fn is_empty(&self) -> bool {
        self.legal.is_empty()
    }

    /// Number of legal actions.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Iterate over the legal action indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.legal
            .iter()
            .enumerate()
            .filter(|(_, legal)| **legal)
            .map(|(i, _)| i)
    }

    /// Zero out illegal entries of `raw` and renormalize.
    ///
    /// # Errors
    /// - `InvalidPolicy` if `raw` has the wrong length or invalid entries
    /// - `DegenerateMask` if no probability mass remains on legal actions
    pub fn renormalize(&self, raw: &[f32]) -> Result<Policy> {
        if raw.len() != self.legal.len() {
            return Err(SokoZeroError::InvalidPolicy(format!(
                "policy has {} entries, action space has {}",
                raw.len(),
                self.legal.len()
            )));
        }

        let masked: Vec<f32> = raw
            .iter()
            .zip(&self.legal)
            .map(|(&p, &legal)| if legal { p } else { 0.0 })
            .collect();
        check_entries(&masked)?;

        let sum: f32 = masked.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(SokoZeroError::DegenerateMask);
        }

        Policy::from_unnormalized(masked)
    }

    /// Uniform distribution over the legal actions.
    ///
    /// # Errors
    /// Returns `NoLegalActions` if the mask is empty.
    pub fn uniform(&self) -> Result<Policy> {
        if self.count == 0 {
            return Err(SokoZeroError::NoLegalActions);
        }

        let prob = 1.0 / self.count as f32;
        Ok(Policy(
            self.legal
                .iter()
                .map(|&legal| if legal { prob } else { 0.0 })
                .collect(),
        ))
    }
}

/// How a terminal puzzle state ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Every box rests on a goal.
    Solved,
    /// No move other than passing is available; the puzzle can never be solved.
    Deadlocked,
}

impl Outcome {
    /// True for `Outcome::Solved`.
    pub fn is_solved(self) -> bool {
        matches!(self, Outcome::Solved)
    }
}
