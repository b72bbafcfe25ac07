use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

use super::model::{ExportRow, EXPORT_HEADERS};

/// Name of the single output sheet.
pub const SHEET_NAME: &str = "Arkusz1";

/// File name suggested by the save dialog.
pub const DEFAULT_FILE_NAME: &str = "example.xlsx";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing xlsx: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("writing csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported export extension: .{0}")]
    UnsupportedExtension(String),
}

/// Write rows to `path`, choosing the format from the extension.
/// A path without extension is written as xlsx.
pub fn export_file(rows: &[ExportRow], path: &Path) -> Result<(), ExportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("xlsx")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" => write_xlsx(rows, path),
        "csv" => write_csv(rows, path),
        other => Err(ExportError::UnsupportedExtension(other.to_string())),
    }?;

    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn build_workbook(rows: &[ExportRow]) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, &row.ean)?;
        sheet.write_string(r, 1, &row.name)?;
        sheet.write_number(r, 2, row.price)?;
        sheet.write_string(r, 3, &row.tag)?;
        sheet.write_string(r, 4, &row.difference)?;
    }

    Ok(workbook)
}

/// Single-sheet xlsx: header line, then one line per row. EAN is text.
pub fn write_xlsx(rows: &[ExportRow], path: &Path) -> Result<(), ExportError> {
    build_workbook(rows)?.save(path)?;
    Ok(())
}

pub fn write_csv(rows: &[ExportRow], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        writer.write_record(EXPORT_HEADERS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use calamine::{open_workbook_auto, Data, Reader};

    use super::*;

    fn rows() -> Vec<ExportRow> {
        vec![
            ExportRow {
                ean: "5901234123457".into(),
                name: "Kawa".into(),
                price: 15.5,
                tag: "B".into(),
                difference: "3.49 zł".into(),
            },
            ExportRow {
                ean: "42".into(),
                name: "Sok".into(),
                price: 2.0,
                tag: String::new(),
                difference: "1 zł".into(),
            },
        ]
    }

    #[test]
    fn xlsx_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        export_file(&rows(), &path).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.height(), 3);
        assert_eq!(range.get((0, 4)), Some(&Data::String("ROZNICA".into())));
        assert_eq!(range.get((1, 0)), Some(&Data::String("5901234123457".into())));
        assert_eq!(range.get((1, 2)), Some(&Data::Float(15.5)));
        assert_eq!(range.get((2, 4)), Some(&Data::String("1 zł".into())));
    }

    #[test]
    fn csv_uses_spreadsheet_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        export_file(&rows(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("EAN,NAZWA,CENA,DYS,ROZNICA"));
        assert_eq!(lines.next(), Some("5901234123457,Kawa,15.5,B,3.49 zł"));
    }

    #[test]
    fn empty_csv_still_has_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv(&[], &path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap().trim_end(),
            "EAN,NAZWA,CENA,DYS,ROZNICA"
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_file(&rows(), &dir.path().join("out.pdf")).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedExtension(ext) if ext == "pdf"));
    }
}
