//! Bounded history of training examples across coach iterations.
//!
//! Each iteration keeps at most `max_examples_per_iteration` of its newest
//! examples, and only the newest `max_iterations` iterations are retained.
//! The history is checkpointed as MessagePack so the external trainer can
//! read it.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::episode::TrainingExample;

#[derive(Clone, Debug)]
pub struct TrainingHistory {
    iterations: VecDeque<Vec<TrainingExample>>,
    max_iterations: usize,
    max_examples_per_iteration: usize,
    skip_first: bool,
}

impl TrainingHistory {
    pub fn new(max_iterations: usize, max_examples_per_iteration: usize) -> Self {
        Self {
            iterations: VecDeque::new(),
            max_iterations,
            max_examples_per_iteration,
            skip_first: false,
        }
    }

    /// Add one iteration's examples, evicting the oldest iterations beyond
    /// capacity. Returns how many iterations were evicted.
    pub fn push_iteration(&mut self, mut examples: Vec<TrainingExample>) -> usize {
        if examples.len() > self.max_examples_per_iteration {
            let excess = examples.len() - self.max_examples_per_iteration;
            examples.drain(..excess);
        }
        self.iterations.push_back(examples);

        let mut evicted = 0;
        while self.iterations.len() > self.max_iterations {
            self.iterations.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Number of retained iterations.
    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    /// Total retained examples.
    pub fn num_examples(&self) -> usize {
        self.iterations.iter().map(Vec::len).sum()
    }

    /// All retained examples, oldest iteration first.
    pub fn examples(&self) -> impl Iterator<Item = &TrainingExample> {
        self.iterations.iter().flatten()
    }

    /// All retained examples in random order, ready for a training pass.
    pub fn shuffled<R: Rng>(&self, rng: &mut R) -> Vec<TrainingExample> {
        let mut examples: Vec<TrainingExample> = self.examples().cloned().collect();
        examples.shuffle(rng);
        examples
    }

    /// True once after loading a checkpoint: the examples for the first
    /// iteration are already present and should not be generated again.
    pub fn take_skip_first(&mut self) -> bool {
        std::mem::take(&mut self.skip_first)
    }

    /// File name used for the checkpoint of `iteration`.
    pub fn checkpoint_path(dir: &Path, iteration: usize) -> PathBuf {
        dir.join(format!("checkpoint_{}.examples", iteration))
    }

    /// Write the history to `dir`, returning the file written.
    pub fn save(&self, dir: &Path, iteration: usize) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create checkpoint directory: {:?}", dir))?;

        let path = Self::checkpoint_path(dir, iteration);
        let file =
            File::create(&path).with_context(|| format!("Failed to create file: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        // Use named fields to serialize structs as maps (not arrays)
        rmp_serde::encode::write_named(&mut writer, &self.iterations)
            .with_context(|| format!("Failed to serialize history to {:?}", path))?;

        Ok(path)
    }

    /// Read a history written by [`save`](Self::save), applying the given caps.
    pub fn load(
        path: &Path,
        max_iterations: usize,
        max_examples_per_iteration: usize,
    ) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
        let iterations: VecDeque<Vec<TrainingExample>> =
            rmp_serde::from_read(BufReader::new(file))
                .with_context(|| format!("Failed to deserialize history from {:?}", path))?;

        let mut history = Self::new(max_iterations, max_examples_per_iteration);
        for examples in iterations {
            history.push_iteration(examples);
        }
        history.skip_first = true;
        Ok(history)
    }
}
