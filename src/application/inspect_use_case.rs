// ============================================================
// Layer 2 — Inspect Use Cases
// ============================================================
// Small workflows on top of a saved vectorizer:
//   - encode: one surname → its padded index row
//   - embed:  first batch of a split → embedding lookup and
//             channels-first permutation, reporting shapes

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::vectorize_use_case::{load_table, PipelineConfig};
use crate::data::batch_generator::generate_batches;
use crate::data::vectorizer::SurnameVectorizer;
use crate::domain::traits::Persistable;
use crate::ml::embedding::SurnameEmbedderConfig;

type DemoBackend = burn::backend::NdArray;

/// Encode `surname` with the vectorizer stored at `vectorizer_file`.
pub fn encode_surname(vectorizer_file: &Path, surname: &str) -> Result<Vec<i64>> {
    let vectorizer = SurnameVectorizer::load(vectorizer_file)?;
    let row = vectorizer
        .vectorize(surname)
        .with_context(|| format!("Cannot encode surname {surname:?}"))?;
    Ok(row)
}

/// Tensor shapes seen along the embedding path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReport {
    pub batch:    [usize; 2],
    pub embedded: [usize; 3],
    pub permuted: [usize; 3],
}

pub struct EmbedUseCase {
    config:        PipelineConfig,
    embedding_dim: usize,
}

impl EmbedUseCase {
    pub fn new(config: PipelineConfig, embedding_dim: usize) -> Self {
        Self { config, embedding_dim }
    }

    /// `Ok(None)` when the split yields no batch.
    pub fn execute(&self) -> Result<Option<EmbedReport>> {
        let cfg    = &self.config;
        let device = burn::backend::ndarray::NdArrayDevice::default();

        let vectorizer = SurnameVectorizer::load(&cfg.vectorizer_file)?;
        let table      = load_table(cfg)?;
        let dataset    = vectorizer.transform(&table, cfg.split)?;

        let Some(batch) = generate_batches::<DemoBackend>(&dataset, &cfg.batch, &device).next() else {
            tracing::warn!("Split '{}' produced no batch to embed", cfg.split);
            return Ok(None);
        };

        let embedder = SurnameEmbedderConfig::new(vectorizer.surname_vocab().len(), self.embedding_dim)
            .init::<DemoBackend>(&device);

        let embedded = embedder.forward(batch.x_surnames.clone());
        let permuted = embedder.forward_channels_first(batch.x_surnames.clone());

        let report = EmbedReport {
            batch:    batch.x_surnames.dims(),
            embedded: embedded.dims(),
            permuted: permuted.dims(),
        };
        tracing::info!(
            "Embedded batch {:?} → {:?}, permuted → {:?}",
            report.batch,
            report.embedded,
            report.permuted,
        );
        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batch_generator::BatchConfig;
    use crate::data::loader::LoaderConfig;
    use crate::domain::record::Split;
    use crate::infra::vectorizer_store::VectorizerStore;
    use std::fs;

    fn setup(dir: &std::path::Path) -> PipelineConfig {
        let csv = dir.join("surnames.csv");
        fs::write(
            &csv,
            "split,surname,nationality\ntrain,Hadad,Arabic\ntrain,Rossi,Italian\ntrain,Smith,English\n",
        )
        .unwrap();
        let cfg = PipelineConfig {
            loader:          LoaderConfig::new(csv),
            vectorizer_file: dir.join("vectorizer.json"),
            batch:           BatchConfig::default().batch_size(2).shuffle(false),
            ..PipelineConfig::default()
        };
        let table = load_table(&cfg).unwrap();
        VectorizerStore::new(&cfg.vectorizer_file).fit_and_save(&table).unwrap();
        cfg
    }

    #[test]
    fn test_encode_surname_uses_saved_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = setup(dir.path());
        let row = encode_surname(&cfg.vectorizer_file, "Hadad").unwrap();
        assert_eq!(row, vec![1, 3, 4, 5, 4, 5, 2]);
        assert!(encode_surname(&cfg.vectorizer_file, "Quirk").is_err());
    }

    #[test]
    fn test_embed_reports_shapes() {
        let dir    = tempfile::tempdir().unwrap();
        let cfg    = setup(dir.path());
        let report = EmbedUseCase::new(cfg, 8).execute().unwrap().unwrap();
        assert_eq!(report.batch, [2, 7]);
        assert_eq!(report.embedded, [2, 7, 8]);
        assert_eq!(report.permuted, [2, 8, 7]);
    }

    #[test]
    fn test_embed_empty_split() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PipelineConfig { split: Split::Test, ..setup(dir.path()) };
        assert_eq!(EmbedUseCase::new(cfg, 4).execute().unwrap(), None);
    }
}
