// ============================================================
// Layer 4 — Surname Vectorizer
// ============================================================
// Fits two vocabularies over a SurnameTable and turns one
// split of it into fixed-width integer arrays.
//
//   fit:        every row, every split
//                 surname chars → surname_vocab  (mask/^/_ reserved)
//                 nationality   → nationality_vocab
//                 max_seq_length = longest surname + 2
//
//   transform:  rows of one split only
//                 "Hadad" → [^, H, a, d, a, d, _, 0, 0, ...]
//                         → [1, 3, 4, 5, 4, 5, 2, 0, 0, ...]
//
// Both vocabularies are frozen at the end of fit(), so an
// unseen character at transform time is a lookup error rather
// than a silent new index.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::data::dataset::VectorizedDataset;
use crate::domain::error::PipelineError;
use crate::domain::record::{Split, SurnameTable};
use crate::domain::vocabulary::{SpecialTokens, Vocabulary};

/// Start and end markers wrapped around every surname.
const BOUNDARY_TOKENS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurnameVectorizer {
    surname_vocab:     Vocabulary,
    nationality_vocab: Vocabulary,
    max_seq_length:    usize,
}

impl SurnameVectorizer {
    pub fn new(surname_vocab: Vocabulary, nationality_vocab: Vocabulary, max_seq_length: usize) -> Self {
        Self { surname_vocab, nationality_vocab, max_seq_length }
    }

    /// Build both vocabularies from every row of `table`, in row
    /// order, so index assignment is reproducible for a fixed file.
    pub fn fit(table: &SurnameTable) -> Result<Self, PipelineError> {
        let mut surname_vocab     = Vocabulary::new(SpecialTokens::sequence());
        let mut nationality_vocab = Vocabulary::new(SpecialTokens::none());
        let mut longest = 0usize;

        let mut buf = [0u8; 4];
        for record in table.iter() {
            let mut length = 0usize;
            for c in record.surname.chars() {
                surname_vocab.add_token(c.encode_utf8(&mut buf))?;
                length += 1;
            }
            nationality_vocab.add_token(&record.nationality)?;
            longest = longest.max(length);
        }

        if nationality_vocab.is_empty() {
            tracing::warn!("Fitting on an empty table; every lookup will fail");
        }
        surname_vocab.freeze();
        nationality_vocab.freeze();

        let vectorizer = Self::new(surname_vocab, nationality_vocab, longest + BOUNDARY_TOKENS);
        tracing::info!(
            "Fitted vectorizer: {} surname tokens, {} nationalities, max_seq_length={}",
            vectorizer.surname_vocab.len(),
            vectorizer.nationality_vocab.len(),
            vectorizer.max_seq_length,
        );
        Ok(vectorizer)
    }

    /// Encode the rows of `split` into a dataset. A split with no
    /// rows yields an empty dataset.
    pub fn transform(&self, table: &SurnameTable, split: Split) -> Result<VectorizedDataset, PipelineError> {
        let rows: Vec<_> = table.split(split).collect();

        let mut x_surnames = Array2::<i64>::zeros((rows.len(), self.max_seq_length));
        let mut y_nationalities = Array1::<i64>::zeros(rows.len());

        for (i, record) in rows.iter().enumerate() {
            let encoded = self.encode_surname(&record.surname)?;
            for (j, &idx) in encoded.iter().enumerate() {
                x_surnames[[i, j]] = idx;
            }
            y_nationalities[i] = self.encode_nationality(&record.nationality)?;
        }

        tracing::debug!("Vectorized {} rows of split '{}'", rows.len(), split);
        VectorizedDataset::new(x_surnames, y_nationalities)
    }

    pub fn fit_transform(table: &SurnameTable, split: Split) -> Result<(Self, VectorizedDataset), PipelineError> {
        let vectorizer = Self::fit(table)?;
        let dataset    = vectorizer.transform(table, split)?;
        Ok((vectorizer, dataset))
    }

    /// One padded row of width `max_seq_length`.
    pub fn vectorize(&self, surname: &str) -> Result<Vec<i64>, PipelineError> {
        let mut row = self.encode_surname(surname)?;
        row.resize(self.max_seq_length, 0);
        Ok(row)
    }

    /// Begin marker, character indices, end marker. No padding.
    /// Fails if the result would not fit in `max_seq_length`.
    pub fn encode_surname(&self, surname: &str) -> Result<Vec<i64>, PipelineError> {
        let begin = self.boundary_index(self.surname_vocab.begin_seq_index(), "begin-of-sequence")?;
        let end   = self.boundary_index(self.surname_vocab.end_seq_index(), "end-of-sequence")?;

        let mut encoded = Vec::with_capacity(self.max_seq_length);
        encoded.push(begin);
        let mut buf = [0u8; 4];
        for c in surname.chars() {
            encoded.push(self.surname_vocab.lookup_token(c.encode_utf8(&mut buf))? as i64);
        }
        encoded.push(end);

        if encoded.len() > self.max_seq_length {
            return Err(PipelineError::SequenceTooLong {
                surname: surname.to_string(),
                length:  encoded.len(),
                max:     self.max_seq_length,
            });
        }
        Ok(encoded)
    }

    pub fn encode_nationality(&self, nationality: &str) -> Result<i64, PipelineError> {
        Ok(self.nationality_vocab.lookup_token(nationality)? as i64)
    }

    /// Label string for a predicted class index.
    pub fn nationality_of(&self, index: usize) -> Result<&str, PipelineError> {
        self.nationality_vocab.lookup_index(index)
    }

    fn boundary_index(&self, index: Option<usize>, what: &str) -> Result<i64, PipelineError> {
        index.map(|i| i as i64).ok_or_else(|| {
            PipelineError::MalformedVocabulary(format!("surname vocabulary has no {what} token"))
        })
    }

    pub fn surname_vocab(&self) -> &Vocabulary {
        &self.surname_vocab
    }

    pub fn nationality_vocab(&self) -> &Vocabulary {
        &self.nationality_vocab
    }

    pub fn max_seq_length(&self) -> usize {
        self.max_seq_length
    }
}
