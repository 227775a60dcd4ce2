// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these instead of
// the concrete CSV reader and JSON store:
//   - CsvSource implements RecordSource
//   - SurnameVectorizer implements Persistable (infra layer)
//
// An in-memory source in tests implements RecordSource too,
// so the loader can be exercised without touching disk.

use std::path::Path;

use anyhow::Result;

use crate::domain::record::SurnameTable;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can produce the raw surname table.
pub trait RecordSource {
    /// Load every row, in source order.
    fn load_all(&self) -> Result<SurnameTable>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
pub trait Persistable: Sized {
    fn save(&self, path: &Path) -> Result<()>;

    fn load(path: &Path) -> Result<Self>;
}
