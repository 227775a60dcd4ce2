// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal per
// command. No array manipulation or file formats here, only
// workflow coordination.

// Load → fit → transform → batch, the main pipeline
pub mod vectorize_use_case;

// Encode a single surname, embed a batch
pub mod inspect_use_case;
