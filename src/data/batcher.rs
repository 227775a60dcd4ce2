// ============================================================
// Layer 4 — Surname Batcher
// ============================================================
// The consumer boundary: plain integer arrays become Burn
// tensors on a specific device.
//
//   SurnameBatch (ndarray, host)  ──to_device──▶  SurnameTensorBatch<B>
//   Vec<SurnameItem>              ──Batcher────▶  SurnameTensorBatch<B>
//
// The Batcher impl lets the same dataset feed Burn's own
// DataLoaderBuilder; to_device serves the BatchGenerator path.
// Both flatten rows into one Vec and reshape to
// [batch_size, max_seq_length] on the target device.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::batch_generator::SurnameBatch;
use crate::data::dataset::SurnameItem;

// ─── SurnameTensorBatch ───────────────────────────────────────────────────────
/// A batch ready for an embedding layer. B is the Burn
/// Backend, so the same code serves any device.
#[derive(Debug, Clone)]
pub struct SurnameTensorBatch<B: Backend> {
    /// `[batch_size, max_seq_length]`
    pub x_surnames: Tensor<B, 2, Int>,

    /// `[batch_size]`
    pub y_nationalities: Tensor<B, 1, Int>,

    /// `[batch_size]`
    pub x_lengths: Tensor<B, 1, Int>,
}

impl SurnameBatch {
    /// Copy this batch onto `device`.
    pub fn to_device<B: Backend>(&self, device: &B::Device) -> SurnameTensorBatch<B> {
        let (batch_size, seq_len) = self.x_surnames.dim();
        SurnameTensorBatch {
            x_surnames:      int_tensor_2d(self.x_surnames.iter().copied().collect(), batch_size, seq_len, device),
            y_nationalities: int_tensor_1d(self.y_nationalities.to_vec(), device),
            x_lengths:       int_tensor_1d(self.x_lengths.to_vec(), device),
        }
    }
}

// ─── SurnameBatcher ───────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct SurnameBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SurnameBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SurnameItem, SurnameTensorBatch<B>> for SurnameBatcher<B> {
    /// Items from one dataset share a row width; an empty Vec
    /// gives `[0, 0]` tensors.
    fn batch(&self, items: Vec<SurnameItem>) -> SurnameTensorBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map_or(0, |item| item.x_surname.len());

        let flat: Vec<i64> = items
            .iter()
            .flat_map(|item| item.x_surname.iter().copied())
            .collect();
        let labels:  Vec<i64> = items.iter().map(|item| item.y_nationality).collect();
        let lengths: Vec<i64> = items.iter().map(|item| item.x_length as i64).collect();

        SurnameTensorBatch {
            x_surnames:      int_tensor_2d(flat, batch_size, seq_len, &self.device),
            y_nationalities: int_tensor_1d(labels, &self.device),
            x_lengths:       int_tensor_1d(lengths, &self.device),
        }
    }
}

fn int_tensor_2d<B: Backend>(
    values: Vec<i64>,
    rows:   usize,
    cols:   usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    Tensor::<B, 2, Int>::from_data(TensorData::new(values, [rows, cols]), device)
}

fn int_tensor_1d<B: Backend>(values: Vec<i64>, device: &B::Device) -> Tensor<B, 1, Int> {
    let len = values.len();
    Tensor::<B, 1, Int>::from_data(TensorData::new(values, [len]), device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::VectorizedDataset;
    use burn::backend::NdArray;
    use ndarray::array;

    type TestBackend = NdArray;

    fn ints<const D: usize>(t: Tensor<TestBackend, D, Int>) -> Vec<i64> {
        t.into_data().convert::<i64>().to_vec::<i64>().unwrap()
    }

    fn dataset() -> VectorizedDataset {
        VectorizedDataset::new(
            array![[1, 3, 4, 2, 0], [1, 5, 2, 0, 0]],
            array![1, 0],
        )
        .unwrap()
    }

    #[test]
    fn test_to_device_keeps_shapes_and_values() {
        let device = Default::default();
        let batch  = dataset().select(&[1, 0]).to_device::<TestBackend>(&device);

        assert_eq!(batch.x_surnames.dims(), [2, 5]);
        assert_eq!(batch.y_nationalities.dims(), [2]);
        assert_eq!(ints(batch.x_surnames), vec![1, 5, 2, 0, 0, 1, 3, 4, 2, 0]);
        assert_eq!(ints(batch.y_nationalities), vec![0, 1]);
        assert_eq!(ints(batch.x_lengths), vec![3, 4]);
    }

    #[test]
    fn test_batcher_matches_to_device() {
        let device  = Default::default();
        let ds      = dataset();
        let batcher = SurnameBatcher::<TestBackend>::new(device);
        let items   = vec![ds.get(0).unwrap(), ds.get(1).unwrap()];

        let from_items = batcher.batch(items);
        let from_array = ds.select(&[0, 1]).to_device::<TestBackend>(&batcher.device);

        assert_eq!(ints(from_items.x_surnames), ints(from_array.x_surnames));
        assert_eq!(ints(from_items.x_lengths), ints(from_array.x_lengths));
        assert_eq!(ints(from_items.y_nationalities), ints(from_array.y_nationalities));
    }

    #[test]
    fn test_generate_batches_relocates_every_batch() {
        use crate::data::batch_generator::{generate_batches, BatchConfig};

        let device  = Default::default();
        let ds      = dataset();
        let config  = BatchConfig::default().batch_size(1).shuffle(false);
        let batches: Vec<SurnameTensorBatch<TestBackend>> =
            generate_batches::<TestBackend>(&ds, &config, &device).collect();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].x_surnames.dims(), [1, 5]);
        assert_eq!(ints(batches[1].y_nationalities.clone()), vec![0]);
    }
}
