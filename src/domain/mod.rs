// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that define what the pipeline works on:
// raw rows, the vocabulary type, the error kinds, and the
// traits other layers implement.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only structs, enums, and traits

// Raw (split, surname, nationality) rows and the table of them
pub mod record;

// Token ↔ index mapping with frozen/unfrozen modes
pub mod vocabulary;

// Typed failure kinds
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
