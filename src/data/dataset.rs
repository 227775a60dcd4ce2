use burn::data::dataset::Dataset;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::data::batch_generator::SurnameBatch;
use crate::domain::error::PipelineError;

/// One encoded row: `^ c1 c2 .. cn _ 0 0 ..`, its label, and the
/// number of non-padding positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurnameItem {
    pub x_surname:     Vec<i64>,
    pub y_nationality: i64,
    pub x_length:      usize,
}

/// Encoded surnames and their labels for a single split.
/// Row `i` of both arrays describes the same input record.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizedDataset {
    x_surnames:      Array2<i64>,
    y_nationalities: Array1<i64>,
}

impl VectorizedDataset {
    pub fn new(x_surnames: Array2<i64>, y_nationalities: Array1<i64>) -> Result<Self, PipelineError> {
        if x_surnames.nrows() != y_nationalities.len() {
            return Err(PipelineError::ShapeMismatch {
                x_rows: x_surnames.nrows(),
                y_rows: y_nationalities.len(),
            });
        }
        Ok(Self { x_surnames, y_nationalities })
    }

    pub fn len(&self) -> usize {
        self.y_nationalities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_seq_length(&self) -> usize {
        self.x_surnames.ncols()
    }

    pub fn x_surnames(&self) -> &Array2<i64> {
        &self.x_surnames
    }

    pub fn y_nationalities(&self) -> &Array1<i64> {
        &self.y_nationalities
    }

    /// `(row, label, effective length)`; the length is counted
    /// on every call rather than cached.
    pub fn get(&self, index: usize) -> Option<SurnameItem> {
        if index >= self.len() {
            return None;
        }
        let row = self.x_surnames.row(index);
        Some(SurnameItem {
            x_surname:     row.to_vec(),
            y_nationality: self.y_nationalities[index],
            x_length:      effective_length(row),
        })
    }

    /// Gather the given rows, in the given order, into one batch.
    pub fn select(&self, indices: &[usize]) -> SurnameBatch {
        let x_surnames      = self.x_surnames.select(Axis(0), indices);
        let y_nationalities = self.y_nationalities.select(Axis(0), indices);
        let x_lengths = Array1::from_iter(
            x_surnames.rows().into_iter().map(|row| effective_length(row) as i64),
        );
        SurnameBatch { x_surnames, y_nationalities, x_lengths }
    }

    /// Inverse-frequency weight per label index, for weighted
    /// losses over unbalanced nationalities. Labels that never
    /// occur get weight 0.
    pub fn class_weights(&self, num_classes: usize) -> Vec<f32> {
        let mut counts = vec![0usize; num_classes];
        for &label in self.y_nationalities.iter() {
            if let Some(c) = usize::try_from(label).ok().and_then(|l| counts.get_mut(l)) {
                *c += 1;
            }
        }
        counts
            .into_iter()
            .map(|c| if c == 0 { 0.0 } else { 1.0 / c as f32 })
            .collect()
    }
}

/// Count of non-padding (non-zero) positions.
pub fn effective_length(row: ArrayView1<'_, i64>) -> usize {
    row.iter().filter(|&&v| v != 0).count()
}

impl Dataset<SurnameItem> for VectorizedDataset {
    fn get(&self, index: usize) -> Option<SurnameItem> {
        VectorizedDataset::get(self, index)
    }

    fn len(&self) -> usize {
        VectorizedDataset::len(self)
    }
}
