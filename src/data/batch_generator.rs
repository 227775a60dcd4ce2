// ============================================================
// Layer 4 — Batch Generator
// ============================================================
// Turns a VectorizedDataset into a lazy, finite sequence of
// batches:
//
//   indices 0..n ──shuffle?──▶ [7 2 9 0 | 4 1 8 3 | 6 5]
//                               batch 1   batch 2   short tail
//
//   drop_last = true   → 2 batches, tail discarded
//   drop_last = false  → 3 batches, last one has 2 rows
//
// The generator owns one RNG, seeded once at construction.
// Every call to generate_batches() advances it and draws a new
// permutation, so a generator can be traversed once per epoch
// and each traversal differs from the previous one. Two
// generators built with the same seed produce the same
// sequence of epochs.
//
// Batches are plain ndarray arrays. Relocation to a compute
// device happens through SurnameBatch::to_device (batcher.rs)
// or the generate_batches() free function below.

use std::cell::RefCell;

use burn::tensor::backend::Backend;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::data::batcher::SurnameTensorBatch;
use crate::data::dataset::VectorizedDataset;

/// How a dataset is cut into batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub batch_size: usize,
    /// Draw a fresh permutation for every traversal.
    pub shuffle:    bool,
    /// Discard a final batch smaller than `batch_size`.
    pub drop_last:  bool,
    /// Seed for a reproducible sequence of shuffles across runs.
    pub seed:       Option<u64>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            shuffle:    true,
            drop_last:  true,
            seed:       None,
        }
    }
}

impl BatchConfig {
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// One batch of rows. All three arrays share the first
/// dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct SurnameBatch {
    /// `[batch, max_seq_length]`
    pub x_surnames:      Array2<i64>,
    /// `[batch]`
    pub y_nationalities: Array1<i64>,
    /// `[batch]`, count of non-padding positions per row
    pub x_lengths:       Array1<i64>,
}

impl SurnameBatch {
    pub fn len(&self) -> usize {
        self.y_nationalities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct BatchGenerator {
    config: BatchConfig,
    rng:    RefCell<StdRng>,
}

impl BatchGenerator {
    pub fn new(config: BatchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        Self { config, rng: RefCell::new(rng) }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Number of batches a traversal over `n` rows yields.
    /// A zero batch size yields nothing.
    pub fn num_batches(&self, n: usize) -> usize {
        let bs = self.config.batch_size;
        if bs == 0 {
            0
        } else if self.config.drop_last {
            n / bs
        } else {
            n.div_ceil(bs)
        }
    }

    /// Start a new traversal over `dataset`.
    pub fn generate_batches<'a>(&self, dataset: &'a VectorizedDataset) -> Batches<'a> {
        let mut order: Vec<usize> = (0..dataset.len()).collect();
        if self.config.shuffle {
            order.shuffle(&mut *self.rng.borrow_mut());
        }

        let remaining = self.num_batches(dataset.len());
        tracing::debug!(
            "Starting traversal: {} rows, batch_size={}, {} batches",
            dataset.len(),
            self.config.batch_size,
            remaining,
        );

        Batches {
            dataset,
            order,
            batch_size: self.config.batch_size,
            cursor: 0,
            remaining,
        }
    }
}

/// A single traversal. Yields `SurnameBatch`es until the
/// permutation is exhausted.
pub struct Batches<'a> {
    dataset:    &'a VectorizedDataset,
    order:      Vec<usize>,
    batch_size: usize,
    cursor:     usize,
    remaining:  usize,
}

impl Iterator for Batches<'_> {
    type Item = SurnameBatch;

    fn next(&mut self) -> Option<SurnameBatch> {
        if self.remaining == 0 {
            return None;
        }
        let end = (self.cursor + self.batch_size).min(self.order.len());
        let batch = self.dataset.select(&self.order[self.cursor..end]);
        self.cursor = end;
        self.remaining -= 1;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Batches<'_> {}

/// Batches of `dataset` relocated to `device`, one per step.
/// Each call builds its own generator, so this is one epoch.
pub fn generate_batches<'a, B: Backend>(
    dataset: &'a VectorizedDataset,
    config:  &BatchConfig,
    device:  &'a B::Device,
) -> impl Iterator<Item = SurnameTensorBatch<B>> + 'a {
    BatchGenerator::new(config.clone())
        .generate_batches(dataset)
        .map(move |batch| batch.to_device::<B>(device))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// `n` rows whose label equals their original index.
    fn dataset(n: usize) -> VectorizedDataset {
        let mut x = Array2::<i64>::zeros((n, 4));
        for i in 0..n {
            x[[i, 0]] = 1;
            x[[i, 1]] = 3 + i as i64;
            x[[i, 2]] = 2;
        }
        let y = Array1::from_iter(0..n as i64);
        VectorizedDataset::new(x, y).unwrap()
    }

    fn labels(batches: Batches<'_>) -> Vec<Vec<i64>> {
        batches.map(|b| b.y_nationalities.to_vec()).collect()
    }

    #[test]
    fn test_drop_last_discards_short_tail() {
        let ds        = dataset(10);
        let generator = BatchGenerator::new(BatchConfig::default().batch_size(4).shuffle(false));
        let batches: Vec<_> = generator.generate_batches(&ds).collect();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 4));
        assert_eq!(batches[0].x_surnames.dim(), (4, 4));
    }

    #[test]
    fn test_keep_last_yields_short_tail() {
        let ds        = dataset(10);
        let generator = BatchGenerator::new(
            BatchConfig::default().batch_size(4).shuffle(false).drop_last(false),
        );
        let sizes: Vec<usize> = generator.generate_batches(&ds).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(generator.generate_batches(&ds).len(), 3);
    }

    #[test]
    fn test_unshuffled_traversals_are_identical() {
        let ds        = dataset(10);
        let generator = BatchGenerator::new(
            BatchConfig::default().batch_size(3).shuffle(false).drop_last(false),
        );
        let first  = labels(generator.generate_batches(&ds));
        let second = labels(generator.generate_batches(&ds));
        assert_eq!(first, second);
        assert_eq!(first[0], vec![0, 1, 2]);
    }

    #[test]
    fn test_shuffle_preserves_multiset() {
        let ds        = dataset(10);
        let generator = BatchGenerator::new(BatchConfig::default().batch_size(5).drop_last(false));
        for _ in 0..3 {
            let mut seen: Vec<i64> = labels(generator.generate_batches(&ds)).concat();
            seen.sort_unstable();
            assert_eq!(seen, (0..10).collect::<Vec<i64>>());
        }
    }

    #[test]
    fn test_shuffle_reorders_and_restarts_fresh() {
        let ds        = dataset(64);
        let generator = BatchGenerator::new(BatchConfig::default().batch_size(64));
        let identity: Vec<i64> = (0..64).collect();

        let first  = labels(generator.generate_batches(&ds)).concat();
        let second = labels(generator.generate_batches(&ds)).concat();
        assert_ne!(first, identity);
        assert_ne!(first, second);
    }

    #[test]
    fn test_seeded_epochs_differ_but_replay_across_generators() {
        let ds     = dataset(50);
        let config = BatchConfig::default().batch_size(50).seed(7);
        let epochs = |generator: &BatchGenerator| -> Vec<Vec<i64>> {
            (0..5).map(|_| labels(generator.generate_batches(&ds)).concat()).collect()
        };

        let run_a = epochs(&BatchGenerator::new(config.clone()));
        let run_b = epochs(&BatchGenerator::new(config));
        assert_eq!(run_a, run_b);
        assert!(run_a.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn test_lengths_follow_rows() {
        let ds        = dataset(6);
        let generator = BatchGenerator::new(BatchConfig::default().batch_size(6));
        let batch = generator.generate_batches(&ds).next().unwrap();
        assert!(batch.x_lengths.iter().all(|&l| l == 3));
    }

    #[test]
    fn test_empty_dataset_and_zero_batch_size() {
        let empty = dataset(0);
        let generator = BatchGenerator::new(BatchConfig::default().drop_last(false));
        assert_eq!(generator.generate_batches(&empty).count(), 0);

        let zero = BatchGenerator::new(BatchConfig::default().batch_size(0));
        assert_eq!(zero.generate_batches(&dataset(4)).count(), 0);
    }
}
