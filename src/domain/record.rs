// ============================================================
// Layer 3 — Surname Records
// ============================================================
// One row of the input file and the in-memory table of rows.
//
// Every row already carries its partition label (train / val
// / test); this crate never re-splits data, it only selects
// rows by the label they arrived with.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Partition label assigned to each row before it reaches us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val   => "val",
            Split::Test  => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "val"   => Ok(Split::Val),
            "test"  => Ok(Split::Test),
            other   => Err(format!("unknown split '{other}', expected train, val or test")),
        }
    }
}

/// A raw `(split, surname, nationality)` row.
/// Field names match the column headers of the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurnameRecord {
    pub split:       Split,
    pub surname:     String,
    pub nationality: String,
}

impl SurnameRecord {
    pub fn new(split: Split, surname: impl Into<String>, nationality: impl Into<String>) -> Self {
        Self {
            split,
            surname:     surname.into(),
            nationality: nationality.into(),
        }
    }
}

/// Rows in file order. Never mutated once built; filtering
/// produces a new table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurnameTable {
    records: Vec<SurnameRecord>,
}

impl SurnameTable {
    pub fn new(records: Vec<SurnameRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SurnameRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SurnameRecord> {
        self.records.iter()
    }

    /// Rows belonging to one split, in table order.
    pub fn split(&self, split: Split) -> impl Iterator<Item = &SurnameRecord> {
        self.records.iter().filter(move |r| r.split == split)
    }

    /// Keep only rows whose nationality is in `nationalities`,
    /// preserving order.
    pub fn filter_to_nationality(&self, nationalities: &HashSet<String>) -> SurnameTable {
        self.records
            .iter()
            .filter(|r| nationalities.contains(&r.nationality))
            .cloned()
            .collect()
    }

    /// Row count per split, in `Split::ALL` order.
    pub fn split_counts(&self) -> [(Split, usize); 3] {
        Split::ALL.map(|s| (s, self.split(s).count()))
    }
}

impl FromIterator<SurnameRecord> for SurnameTable {
    fn from_iter<I: IntoIterator<Item = SurnameRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SurnameTable {
        SurnameTable::new(vec![
            SurnameRecord::new(Split::Train, "Hadad",  "Arabic"),
            SurnameRecord::new(Split::Val,   "Smith",  "English"),
            SurnameRecord::new(Split::Train, "Rossi",  "Italian"),
            SurnameRecord::new(Split::Test,  "Nassar", "Arabic"),
        ])
    }

    #[test]
    fn test_split_parsing() {
        assert_eq!("train".parse::<Split>(), Ok(Split::Train));
        assert!("holdout".parse::<Split>().is_err());
        assert_eq!(Split::Test.to_string(), "test");
    }

    #[test]
    fn test_cli_and_file_parsing_agree_on_padding() {
        assert!(" val ".parse::<Split>().is_err());
        assert!(serde_json::from_str::<Split>(r#"" val""#).is_err());
        assert_eq!(serde_json::from_str::<Split>(r#""val""#).unwrap(), "val".parse::<Split>().unwrap());
    }

    #[test]
    fn test_split_selection_keeps_order() {
        let t = table();
        let names: Vec<&str> = t.split(Split::Train).map(|r| r.surname.as_str()).collect();
        assert_eq!(names, vec!["Hadad", "Rossi"]);
    }

    #[test]
    fn test_filter_to_nationality() {
        let keep: HashSet<String> = ["Arabic".to_string()].into_iter().collect();
        let filtered = table().filter_to_nationality(&keep);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.records()[0].surname, "Hadad");
        assert_eq!(filtered.records()[1].surname, "Nassar");
    }

    #[test]
    fn test_split_counts() {
        let counts = table().split_counts();
        assert_eq!(counts, [(Split::Train, 2), (Split::Val, 1), (Split::Test, 1)]);
    }
}
