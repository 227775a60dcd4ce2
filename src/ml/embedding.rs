use burn::{
    nn::{Embedding, EmbeddingConfig},
    prelude::*,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct SurnameEmbedderConfig {
    /// Size of the surname character vocabulary.
    pub num_embeddings: usize,
    pub embedding_dim:  usize,
}

impl SurnameEmbedderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SurnameEmbedder<B> {
        SurnameEmbedder {
            embedding: EmbeddingConfig::new(self.num_embeddings, self.embedding_dim).init(device),
        }
    }
}

/// Character embedding lookup for encoded surnames.
#[derive(Module, Debug)]
pub struct SurnameEmbedder<B: Backend> {
    pub embedding: Embedding<B>,
}

impl<B: Backend> SurnameEmbedder<B> {
    /// x_surnames: [batch, seq_len] → [batch, seq_len, embedding_dim]
    pub fn forward(&self, x_surnames: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        self.embedding.forward(x_surnames)
    }

    /// x_surnames: [batch, seq_len] → [batch, embedding_dim, seq_len]
    /// (channels-first, the layout 1-D convolutions expect)
    pub fn forward_channels_first(&self, x_surnames: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        self.forward(x_surnames).swap_dims(1, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::TensorData;

    type TestBackend = NdArray;

    #[test]
    fn test_embedding_and_permutation_shapes() {
        let device   = Default::default();
        let embedder = SurnameEmbedderConfig::new(10, 4).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 2, Int>::from_data(
            TensorData::new(vec![1i64, 3, 4, 2, 0, 0, 1, 5, 2, 0, 0, 0], [2, 6]),
            &device,
        );

        let embedded = embedder.forward(x.clone());
        assert_eq!(embedded.dims(), [2, 6, 4]);

        let permuted = embedder.forward_channels_first(x);
        assert_eq!(permuted.dims(), [2, 4, 6]);
    }

    #[test]
    fn test_permutation_moves_values() {
        let device   = Default::default();
        let embedder = SurnameEmbedderConfig::new(6, 3).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 2, Int>::from_data(
            TensorData::new(vec![1i64, 2], [1, 2]),
            &device,
        );

        let embedded = embedder.forward(x.clone());
        let permuted = embedder.forward_channels_first(x);
        // Element [0, t, d] of the embedding is element [0, d, t] after the swap.
        let a = embedded.slice([0..1, 1..2, 2..3]).into_scalar();
        let b = permuted.slice([0..1, 2..3, 1..2]).into_scalar();
        assert_eq!(a, b);
    }
}
