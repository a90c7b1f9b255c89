//! Discovery, ledger filtering and sheet reading working together.

use std::fs;
use std::path::Path;

use cdp_ingest::{
    CsvWorkbookExport, IngestionLedger, SheetLayout, WorkbookSource, list_workbooks, select_sheets,
};
use tempfile::TempDir;

fn write_export(root: &Path, workbook: &str, sheets: &[(&str, &str)]) {
    let dir = root.join(workbook);
    fs::create_dir(&dir).unwrap();
    for (name, content) in sheets {
        fs::write(dir.join(format!("{name}.csv")), content).unwrap();
    }
}

#[test]
fn pending_workbooks_are_read_with_their_year_layout() {
    let root = TempDir::new().unwrap();
    let headerless = "t\nt\nt\nt\nt\nt\nt\nt\nt\nt\nRån,12,3.4\nStöld,40,11.2\n";
    write_export(
        root.path(),
        "Anmalda_Stockholm-2018.xlsx",
        &[("0 Sammanfattning", "x\n"), ("Solna", headerless), ("Information", "x\n")],
    );
    write_export(
        root.path(),
        "Anmalda_Uppsala-2023.xlsx",
        &[("0 Sammanfattning", "x\n"), ("Uppsala", "title\nBrottstyp,Antal\nRån,7\n")],
    );

    let ledger_path = root.path().join("ledger.txt");
    fs::write(&ledger_path, "Anmalda_Uppsala-2023.xlsx\n").unwrap();
    let ledger = IngestionLedger::load(&ledger_path).unwrap();

    let workbooks = list_workbooks(root.path()).unwrap();
    let pending = ledger.filter_unprocessed(workbooks.iter().map(|w| w.file_name.as_str()));
    assert_eq!(pending, vec!["Anmalda_Stockholm-2018.xlsx"]);

    let workbook = workbooks
        .iter()
        .find(|w| w.file_name == pending[0])
        .unwrap();
    let source = CsvWorkbookExport::new();
    let sheets = select_sheets(&source.sheet_names(&workbook.path).unwrap());
    assert_eq!(sheets, vec!["Solna"]);

    let layout = SheetLayout::for_year(workbook.meta.year_number());
    let df = source.read_sheet(&workbook.path, &sheets[0], &layout).unwrap();
    assert_eq!(df.height(), 2);
    assert_eq!(
        df.get_column_names_str(),
        vec![
            "Brottstyp",
            "Antal anmälda brott, totalt",
            "Antal brott per 100 000 invånare"
        ]
    );
}
