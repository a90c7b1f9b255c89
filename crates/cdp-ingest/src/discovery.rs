//! Workbook discovery for spreadsheet folders.

use std::path::{Path, PathBuf};

use cdp_model::SourceFileMeta;

use crate::error::{IngestError, Result};
use crate::file_meta::parse_source_file_name;

/// A workbook found in a spreadsheet folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredWorkbook {
    pub path: PathBuf,
    pub file_name: String,
    pub meta: SourceFileMeta,
}

/// Lists workbooks (`.xlsx` / `.xls`, case-insensitive) in a directory.
///
/// Workbook exports are directories named like the workbook they came from,
/// so directory entries with a workbook extension are listed too. Returns
/// entries sorted by file name.
pub fn list_workbooks(dir: &Path) -> Result<Vec<DiscoveredWorkbook>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut workbooks = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();

        let is_workbook = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls"))
            .unwrap_or(false);
        if !is_workbook {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string)
        else {
            tracing::warn!(path = %path.display(), "skipping workbook with non UTF-8 name");
            continue;
        };
        let meta = parse_source_file_name(&file_name);
        workbooks.push(DiscoveredWorkbook {
            path,
            file_name,
            meta,
        });
    }

    workbooks.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(workbooks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in &["b_Skane-2022.xlsx", "a_Uppsala-2016.XLS", "notes.txt", "data.csv"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("c_Gotland-2023.xlsx")).unwrap();
        dir
    }

    #[test]
    fn test_list_workbooks() {
        let dir = create_test_dir();
        let workbooks = list_workbooks(dir.path()).unwrap();

        let names: Vec<&str> = workbooks.iter().map(|w| w.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["a_Uppsala-2016.XLS", "b_Skane-2022.xlsx", "c_Gotland-2023.xlsx"]
        );
        assert_eq!(workbooks[0].meta.region, "Uppsala");
        assert_eq!(workbooks[1].meta.year, "2022");
    }

    #[test]
    fn test_list_workbooks_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("x.xlsx");
        std::fs::write(&file_path, "data").unwrap();

        let result = list_workbooks(&file_path);
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }
}
