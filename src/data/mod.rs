// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw surname file to device-ready
// tensor batches.
//
//   surnames_with_splits.csv
//       │
//       ▼
//   RawLoader          → reads rows, filters by nationality
//       │
//       ▼
//   SurnameVectorizer  → fit: vocabularies + max_seq_length
//       │                transform: one split → arrays
//       ▼
//   VectorizedDataset  → indexable rows, Burn Dataset trait
//       │
//       ▼
//   BatchGenerator     → shuffled fixed-size batches
//       │
//       ▼
//   SurnameBatcher     → tensors on the target device
//
// Each module is responsible for exactly one step.

/// Reads the delimited input file
pub mod loader;

/// Character and nationality vocabularies, encoding
pub mod vectorizer;

/// Encoded rows with on-demand effective lengths
pub mod dataset;

/// Shuffling, batching, drop_last
pub mod batch_generator;

/// Host arrays → Burn tensors on a device
pub mod batcher;
