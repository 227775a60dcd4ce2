// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// The only layer that builds Burn modules. Batches reach it
// already on the target device (see data/batcher.rs).
//
//   embedding.rs — Character embedding lookup
//                  [batch, seq] indices → [batch, seq, dim]
//                  plus the swap to [batch, dim, seq] that
//                  convolutional sequence models consume

/// Surname character embedding and dimension permutation
pub mod embedding;
