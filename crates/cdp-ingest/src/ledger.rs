//! Append-only ledger of source files that have been folded already.
//!
//! The ledger is a plain text file with one file name per line. It is read
//! once when a run starts; every successful fold appends one line straight
//! away so an interrupted run does not re-read the files it finished.
//!
//! A crash between the fold and the downstream write leaves a file marked
//! without its rows stored; the ledger does not try to detect that.

use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{IngestError, Result};

#[derive(Debug, Clone)]
pub struct IngestionLedger {
    path: PathBuf,
    snapshot: BTreeSet<String>,
}

impl IngestionLedger {
    /// Reads the ledger at `path`. A missing file is an empty ledger.
    pub fn load(path: &Path) -> Result<Self> {
        let snapshot = match std::fs::read_to_string(path) {
            Ok(content) => {
                let entries: BTreeSet<String> = content
                    .lines()
                    .map(|line| line.trim_end_matches('\r'))
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_string)
                    .collect();
                info!(
                    path = %path.display(),
                    entries = entries.len(),
                    "loaded ingestion ledger"
                );
                entries
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no ingestion ledger found, starting empty");
                BTreeSet::new()
            }
            Err(source) => {
                return Err(IngestError::FileRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            snapshot,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, name: &str) -> bool {
        self.snapshot.contains(name)
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Candidates that are not in the ledger, in their original order.
    pub fn filter_unprocessed<'a, I>(&self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates
            .into_iter()
            .filter(|name| !self.snapshot.contains(*name))
            .map(str::to_string)
            .collect()
    }

    /// Appends `name` to the ledger file and syncs it to disk.
    ///
    /// Names already recorded are not written twice.
    pub fn mark_processed(&mut self, name: &str) -> Result<()> {
        if self.snapshot.contains(name) {
            debug!(file = name, "already recorded in ledger");
            return Ok(());
        }
        let write_err = |source| IngestError::LedgerWrite {
            path: self.path.clone(),
            entry: name.to_string(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        writeln!(file, "{name}").map_err(write_err)?;
        file.sync_data().map_err(write_err)?;
        self.snapshot.insert(name.to_string());
        info!(file = name, ledger = %self.path.display(), "updated ledger");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = IngestionLedger::load(&dir.path().join("ledger.txt")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn filters_against_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.txt");
        std::fs::write(&path, "a.xlsx\n").unwrap();

        let ledger = IngestionLedger::load(&path).unwrap();
        let pending = ledger.filter_unprocessed(["a.xlsx", "b.xlsx"]);
        assert_eq!(pending, vec!["b.xlsx"]);
    }

    #[test]
    fn marks_are_visible_to_a_fresh_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.txt");
        std::fs::write(&path, "a.xlsx\n").unwrap();

        let mut ledger = IngestionLedger::load(&path).unwrap();
        ledger.mark_processed("b.xlsx").unwrap();

        let reloaded = IngestionLedger::load(&path).unwrap();
        assert!(reloaded.contains("a.xlsx"));
        assert!(reloaded.contains("b.xlsx"));
        assert!(
            reloaded
                .filter_unprocessed(["a.xlsx", "b.xlsx"])
                .is_empty()
        );
    }

    #[test]
    fn ignores_blank_lines_and_carriage_returns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.txt");
        std::fs::write(&path, "a.xlsx\r\n\r\n  \nb.xlsx\n").unwrap();

        let ledger = IngestionLedger::load(&path).unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains("a.xlsx"));
    }

    #[test]
    fn marking_twice_appends_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.txt");

        let mut ledger = IngestionLedger::load(&path).unwrap();
        ledger.mark_processed("c.xlsx").unwrap();
        ledger.mark_processed("c.xlsx").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "c.xlsx\n");
    }
}
