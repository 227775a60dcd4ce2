// ============================================================
// Layer 2 — VectorizeUseCase
// ============================================================
// Orchestrates the pipeline in order:
//
//   Step 1: Load the surname file          (Layer 4 - data)
//   Step 2: Apply the nationality filter   (Layer 4 - data)
//   Step 3: Fit or reuse the vectorizer    (Layer 6 - infra)
//   Step 4: Vectorize the requested split  (Layer 4 - data)
//   Step 5: Traverse the batches once      (Layer 4 - data)

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    batch_generator::{BatchConfig, BatchGenerator},
    dataset::VectorizedDataset,
    loader::{LoaderConfig, RawLoader},
    vectorizer::SurnameVectorizer,
};
use crate::domain::record::{Split, SurnameTable};
use crate::infra::vectorizer_store::VectorizerStore;

// ─── Pipeline Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub loader:            LoaderConfig,
    pub vectorizer_file:   PathBuf,
    pub split:             Split,
    pub batch:             BatchConfig,
    /// Empty means every nationality.
    pub nationalities:     Vec<String>,
    /// Reuse `vectorizer_file` if it exists instead of refitting.
    pub reload_from_files: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            loader:            LoaderConfig::default(),
            vectorizer_file:   PathBuf::from("model_storage/vectorizer.json"),
            split:             Split::Train,
            batch:             BatchConfig::default(),
            nationalities:     Vec::new(),
            reload_from_files: false,
        }
    }
}

impl PipelineConfig {
    pub fn nationality_filter(&self) -> Option<HashSet<String>> {
        if self.nationalities.is_empty() {
            None
        } else {
            Some(self.nationalities.iter().cloned().collect())
        }
    }
}

/// What one run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizeReport {
    pub split:                  Split,
    pub rows:                   usize,
    pub max_seq_length:         usize,
    pub surname_vocab_size:     usize,
    pub nationality_vocab_size: usize,
    pub batches:                usize,
    pub rows_batched:           usize,
    /// Inverse label frequency in this split, by nationality index
    pub class_weights:          Vec<f32>,
}

pub struct VectorizeUseCase {
    config: PipelineConfig,
}

impl VectorizeUseCase {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<VectorizeReport> {
        let cfg = &self.config;

        // ── Steps 1-2: Load rows ──────────────────────────────────────────────
        let table = load_table(cfg)?;

        // ── Step 3: Fit or reuse the vectorizer ──────────────────────────────
        let store = VectorizerStore::new(&cfg.vectorizer_file);
        let vectorizer = if cfg.reload_from_files {
            store.load_or_fit(&table)?
        } else {
            store.fit_and_save(&table)?
        };

        // ── Step 4: Vectorize one split ───────────────────────────────────────
        let dataset = vectorizer.transform(&table, cfg.split)?;
        tracing::info!("Split '{}': {} rows vectorized", cfg.split, dataset.len());

        // ── Step 5: One traversal ─────────────────────────────────────────────
        let (batches, rows_batched) = traverse(&dataset, &cfg.batch);
        tracing::info!(
            "{} batches of up to {} rows ({} rows dropped)",
            batches,
            cfg.batch.batch_size,
            dataset.len() - rows_batched,
        );

        Ok(report(cfg.split, &vectorizer, &dataset, batches, rows_batched))
    }
}

/// Read the configured file and apply the nationality filter.
pub fn load_table(cfg: &PipelineConfig) -> Result<SurnameTable> {
    let loader = RawLoader::load(cfg.loader.clone())?;
    let filter = cfg.nationality_filter();
    Ok(loader.get_data(filter.as_ref()))
}

fn traverse(dataset: &VectorizedDataset, batch: &BatchConfig) -> (usize, usize) {
    let generator = BatchGenerator::new(batch.clone());
    let mut batches = 0;
    let mut rows    = 0;
    for b in generator.generate_batches(dataset) {
        tracing::debug!(
            "batch {}: x_surnames={:?} y_nationalities={:?} x_lengths={:?}",
            batches,
            b.x_surnames.shape(),
            b.y_nationalities.shape(),
            b.x_lengths.shape(),
        );
        batches += 1;
        rows    += b.len();
    }
    (batches, rows)
}

fn report(
    split:        Split,
    vectorizer:   &SurnameVectorizer,
    dataset:      &VectorizedDataset,
    batches:      usize,
    rows_batched: usize,
) -> VectorizeReport {
    VectorizeReport {
        split,
        rows:                   dataset.len(),
        max_seq_length:         vectorizer.max_seq_length(),
        surname_vocab_size:     vectorizer.surname_vocab().len(),
        nationality_vocab_size: vectorizer.nationality_vocab().len(),
        batches,
        rows_batched,
        class_weights:          dataset.class_weights(vectorizer.nationality_vocab().len()),
    }
}
