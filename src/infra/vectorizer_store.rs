// ============================================================
// Layer 6 — Vectorizer Store
// ============================================================
// Persists a fitted SurnameVectorizer as pretty-printed JSON:
//
//   {
//     "surname_vocab":     { "token_to_idx": {...}, "mask_token": "<MASK>", ... },
//     "nationality_vocab": { "token_to_idx": {...}, "mask_token": null, ... },
//     "max_seq_length":    17
//   }
//
// Vocabulary contents are validated while deserialising, so a
// file with gaps in its indices or a missing special token
// fails here instead of producing bad encodings later.

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::data::vectorizer::SurnameVectorizer;
use crate::domain::record::SurnameTable;
use crate::domain::traits::Persistable;

impl Persistable for SurnameVectorizer {
    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write vectorizer to '{}'", path.display()))?;

        tracing::debug!("Saved vectorizer to '{}'", path.display());
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read vectorizer from '{}'", path.display()))?;

        let vectorizer: SurnameVectorizer = serde_json::from_str(&json)
            .with_context(|| format!("Malformed vectorizer file '{}'", path.display()))?;

        tracing::info!(
            "Loaded vectorizer from '{}' (max_seq_length={})",
            path.display(),
            vectorizer.max_seq_length()
        );
        Ok(vectorizer)
    }
}

/// Owns the location of the vectorizer file.
pub struct VectorizerStore {
    path: PathBuf,
}

impl VectorizerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reuse a previously saved vectorizer, or fit one on
    /// `table` and save it.
    pub fn load_or_fit(&self, table: &SurnameTable) -> Result<SurnameVectorizer> {
        if self.exists() {
            tracing::info!("Reusing vectorizer at '{}'", self.path.display());
            SurnameVectorizer::load(&self.path)
        } else {
            self.fit_and_save(table)
        }
    }

    /// Fit on `table` and overwrite whatever is stored.
    pub fn fit_and_save(&self, table: &SurnameTable) -> Result<SurnameVectorizer> {
        let vectorizer = SurnameVectorizer::fit(table)?;
        vectorizer.save(&self.path)?;
        tracing::info!("Vectorizer written to '{}'", self.path.display());
        Ok(vectorizer)
    }
}
