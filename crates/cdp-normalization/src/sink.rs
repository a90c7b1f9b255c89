//! Destinations for cleaned datasets.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{NormalizationError, Result};

/// Receives one cleaned dataset per destination table.
///
/// Whether rows are inserted, upserted or replace earlier rows is up to the
/// implementation.
pub trait DatasetSink {
    /// Writes `data` to `table`, returning the number of rows written.
    fn write(&mut self, table: &str, data: &mut DataFrame) -> Result<usize>;
}

/// Appends each table to `<dir>/<table>.csv`.
///
/// The header row is written only when the file is created. Later writes are
/// aligned to that header: columns are put in the file's order, columns the
/// dataset lacks are written empty, and a dataset with columns the file does
/// not have is rejected.
#[derive(Debug, Clone)]
pub struct CsvDirectorySink {
    dir: PathBuf,
}

impl CsvDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }
}

impl DatasetSink for CsvDirectorySink {
    fn write(&mut self, table: &str, data: &mut DataFrame) -> Result<usize> {
        fs::create_dir_all(&self.dir).map_err(|source| NormalizationError::Sink {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.table_path(table);
        let header = existing_header(&path)?;
        let mut aligned = match &header {
            Some(columns) => align_to_header(&path, data, columns)?,
            None => data.clone(),
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| NormalizationError::Sink {
                path: path.clone(),
                source,
            })?;

        CsvWriter::new(file)
            .include_header(header.is_none())
            .finish(&mut aligned)?;
        info!(table, path = %path.display(), rows = aligned.height(), "dataset written");
        Ok(aligned.height())
    }
}

/// Column names on the first line of `path`; `None` if the file is missing
/// or empty.
fn existing_header(path: &Path) -> Result<Option<Vec<String>>> {
    if !path.is_file() {
        return Ok(None);
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| NormalizationError::SinkHeader {
            path: path.to_path_buf(),
            source,
        })?;
    let header = reader
        .headers()
        .map_err(|source| NormalizationError::SinkHeader {
            path: path.to_path_buf(),
            source,
        })?;
    if header.is_empty() {
        return Ok(None);
    }
    Ok(Some(header.iter().map(str::to_string).collect()))
}

fn align_to_header(path: &Path, data: &DataFrame, header: &[String]) -> Result<DataFrame> {
    let extra: Vec<&str> = data
        .get_column_names_str()
        .into_iter()
        .filter(|name| !header.iter().any(|h| h == name))
        .collect();
    if !extra.is_empty() {
        return Err(NormalizationError::SinkColumns {
            path: path.to_path_buf(),
            columns: extra.join(", "),
        });
    }

    let mut aligned = data.clone();
    for name in header {
        if aligned.column(name).is_err() {
            debug!(path = %path.display(), column = %name, "column missing from dataset, written empty");
            aligned.with_column(Column::full_null(
                name.as_str().into(),
                aligned.height(),
                &DataType::String,
            ))?;
        }
    }
    Ok(aligned.select(header.iter().map(String::as_str))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_under_a_single_header() {
        let dir = TempDir::new().unwrap();
        let mut sink = CsvDirectorySink::new(dir.path().join("out"));
        let mut first = df!("region" => ["Stockholm"], "num_individuals" => [5123i64]).unwrap();
        let mut second = df!("region" => ["Kiruna"], "num_individuals" => [901i64]).unwrap();

        assert_eq!(sink.write("scb_marital_status_data", &mut first).unwrap(), 1);
        sink.write("scb_marital_status_data", &mut second).unwrap();

        let written =
            fs::read_to_string(sink.table_path("scb_marital_status_data")).unwrap();
        assert_eq!(
            written,
            "region,num_individuals\nStockholm,5123\nKiruna,901\n"
        );
    }

    #[test]
    fn later_writes_follow_the_file_header() {
        let dir = TempDir::new().unwrap();
        let mut sink = CsvDirectorySink::new(dir.path());
        let mut first = df!(
            "Brottstyp" => ["Rån"],
            "Antal" => ["4"],
            "kommun" => ["Solna"]
        )
        .unwrap();
        let mut reordered = df!("kommun" => ["Kiruna"], "Brottstyp" => ["Stöld"]).unwrap();

        sink.write("bra_data", &mut first).unwrap();
        assert_eq!(sink.write("bra_data", &mut reordered).unwrap(), 1);

        let written = fs::read_to_string(sink.table_path("bra_data")).unwrap();
        assert_eq!(written, "Brottstyp,Antal,kommun\nRån,4,Solna\nStöld,,Kiruna\n");
    }

    #[test]
    fn columns_missing_from_the_file_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut sink = CsvDirectorySink::new(dir.path());
        let mut first = df!("Brottstyp" => ["Rån"], "Antal" => ["4"], "kommun" => ["Solna"]).unwrap();
        let mut wider = df!(
            "Brottstyp" => ["Stöld"],
            "kommun" => ["Kiruna"],
            "lagrum" => ["x"],
            "Antal" => ["9"]
        )
        .unwrap();

        sink.write("bra_data", &mut first).unwrap();
        let err = sink.write("bra_data", &mut wider).unwrap_err();
        assert!(matches!(err, NormalizationError::SinkColumns { ref columns, .. } if columns == "lagrum"));

        let written = fs::read_to_string(sink.table_path("bra_data")).unwrap();
        assert_eq!(written, "Brottstyp,Antal,kommun\nRån,4,Solna\n");
    }
}
