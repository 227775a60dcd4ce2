// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in a business
// layer:
//
//   vectorizer_store.rs — Vectorizer persistence
//                         Saves the fitted vocabularies and
//                         max_seq_length as JSON, reloads them
//                         with validation, and decides whether
//                         to reuse a stored vectorizer or fit
//                         a new one.

/// Vectorizer JSON save / load / reuse
pub mod vectorizer_store;
