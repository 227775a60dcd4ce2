// ============================================================
// Layer 4 — Raw Loader
// ============================================================
// Reads the delimited surname file into a SurnameTable.
//
// Expected header (extra columns are ignored):
//
//   split,surname,nationality
//   train,Hadad,Arabic
//   val,Smith,English
//
// Rows are deserialised straight into SurnameRecord through
// the csv crate's serde support, so the `split` column is
// parsed into the Split enum on the way in and an unknown
// split value fails the load with the offending row number.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;
use crate::domain::record::{SurnameRecord, SurnameTable};
use crate::domain::traits::RecordSource;

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["split", "surname", "nationality"];

/// Where to read surnames from and how fields are separated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub surname_csv: PathBuf,
    pub delimiter:   char,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            surname_csv: PathBuf::from("data/surnames_with_splits.csv"),
            delimiter:   ',',
        }
    }
}

impl LoaderConfig {
    pub fn new(surname_csv: impl Into<PathBuf>) -> Self {
        Self { surname_csv: surname_csv.into(), ..Self::default() }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// The csv crate splits on a single byte.
    pub fn delimiter_byte(&self) -> Result<u8, PipelineError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(PipelineError::InvalidDelimiter(self.delimiter))
        }
    }
}

// ─── CsvSource ────────────────────────────────────────────────────────────────
/// Reads a delimited file from disk. Implements RecordSource.
pub struct CsvSource {
    config: LoaderConfig,
}

impl CsvSource {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.surname_csv
    }
}

impl RecordSource for CsvSource {
    fn load_all(&self) -> Result<SurnameTable> {
        let path = self.path();
        let mut reader = ReaderBuilder::new()
            .delimiter(self.config.delimiter_byte()?)
            .has_headers(true)
            .from_path(path)
            .with_context(|| format!("Cannot read surname file '{}'", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Cannot read header row of '{}'", path.display()))?;
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(PipelineError::MissingColumn(column.to_string()).into());
            }
        }

        let mut records = Vec::new();
        for (row, result) in reader.deserialize::<SurnameRecord>().enumerate() {
            // +2: one for the header, one for 1-based line numbers
            let record = result.with_context(|| {
                format!("Malformed row on line {} of '{}'", row + 2, path.display())
            })?;
            records.push(record);
        }

        tracing::debug!("Read {} rows from '{}'", records.len(), path.display());
        Ok(SurnameTable::new(records))
    }
}

// ─── RawLoader ────────────────────────────────────────────────────────────────
/// Holds the loaded table and hands out (optionally filtered)
/// copies of it.
pub struct RawLoader {
    table: SurnameTable,
}

impl RawLoader {
    /// Read `config.surname_csv` once.
    pub fn load(config: LoaderConfig) -> Result<Self> {
        Self::from_source(&CsvSource::new(config))
    }

    pub fn from_source(source: &impl RecordSource) -> Result<Self> {
        let table = source.load_all()?;

        let counts = table
            .split_counts()
            .iter()
            .map(|(split, n)| format!("{split}={n}"))
            .collect::<Vec<_>>()
            .join(", ");
        tracing::info!("Loaded {} surname rows ({})", table.len(), counts);

        Ok(Self { table })
    }

    pub fn from_table(table: SurnameTable) -> Self {
        Self { table }
    }

    /// The full table, or only the rows whose nationality is in
    /// `filter_to_nationality`, in original order.
    pub fn get_data(&self, filter_to_nationality: Option<&HashSet<String>>) -> SurnameTable {
        match filter_to_nationality {
            Some(nationalities) => {
                let filtered = self.table.filter_to_nationality(nationalities);
                tracing::debug!(
                    "Nationality filter kept {} of {} rows",
                    filtered.len(),
                    self.table.len()
                );
                filtered
            }
            None => self.table.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Split;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_loads_rows_in_order_and_ignores_extra_columns() {
        let f = write_csv(
            "nationality,nationality_index,split,surname\n\
             Arabic,15,train,Totah\n\
             English,12,val,Smith\n\
             Arabic,15,test,Hadad\n",
        );
        let loader = RawLoader::load(LoaderConfig::new(f.path())).unwrap();
        let table  = loader.get_data(None);
        assert_eq!(table.len(), 3);
        assert_eq!(table.records()[0], SurnameRecord::new(Split::Train, "Totah", "Arabic"));
        assert_eq!(table.records()[2].split, Split::Test);
    }

    #[test]
    fn test_custom_delimiter() {
        let f = write_csv("split;surname;nationality\ntrain;Rossi;Italian\n");
        let config = LoaderConfig::new(f.path()).with_delimiter(';');
        let table  = RawLoader::load(config).unwrap().get_data(None);
        assert_eq!(table.records()[0].surname, "Rossi");
    }

    #[test]
    fn test_missing_column_is_reported() {
        let f = write_csv("split,surname\ntrain,Rossi\n");
        let err = RawLoader::load(LoaderConfig::new(f.path())).err().unwrap();
        assert_eq!(
            err.downcast_ref::<PipelineError>(),
            Some(&PipelineError::MissingColumn("nationality".to_string()))
        );
    }

    #[test]
    fn test_unreadable_path_fails() {
        let result = RawLoader::load(LoaderConfig::new("/nonexistent/surnames.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_split_value_fails() {
        let f = write_csv("split,surname,nationality\nholdout,Rossi,Italian\n");
        assert!(RawLoader::load(LoaderConfig::new(f.path())).is_err());
    }

    #[test]
    fn test_padded_split_value_fails() {
        let f = write_csv("split,surname,nationality\n val,Rossi,Italian\n");
        assert!(RawLoader::load(LoaderConfig::new(f.path())).is_err());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let config = LoaderConfig::default().with_delimiter('§');
        assert_eq!(config.delimiter_byte(), Err(PipelineError::InvalidDelimiter('§')));
    }

    struct InMemory(Vec<SurnameRecord>);

    impl RecordSource for InMemory {
        fn load_all(&self) -> Result<SurnameTable> {
            Ok(SurnameTable::new(self.0.clone()))
        }
    }

    #[test]
    fn test_from_source_without_disk() {
        let source = InMemory(vec![
            SurnameRecord::new(Split::Train, "Koury", "Arabic"),
            SurnameRecord::new(Split::Test,  "Kato",  "Japanese"),
        ]);
        let table = RawLoader::from_source(&source).unwrap().get_data(None);
        assert_eq!(table.split_counts(), [(Split::Train, 1), (Split::Val, 0), (Split::Test, 1)]);
    }

    #[test]
    fn test_get_data_filters_by_nationality() {
        let table = SurnameTable::new(vec![
            SurnameRecord::new(Split::Train, "Totah", "Arabic"),
            SurnameRecord::new(Split::Train, "Smith", "English"),
            SurnameRecord::new(Split::Val,   "Hadad", "Arabic"),
        ]);
        let loader = RawLoader::from_table(table);
        let keep: HashSet<String> = ["Arabic".to_string()].into_iter().collect();
        let filtered = loader.get_data(Some(&keep));
        let names: Vec<&str> = filtered.iter().map(|r| r.surname.as_str()).collect();
        assert_eq!(names, vec!["Totah", "Hadad"]);
    }
}
