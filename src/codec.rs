use std::path::Path;

use calamine::{Data, Reader};

use crate::error::{AppError, Result};
use crate::models::Apartment;

pub const HEADER: [&str; 4] = ["ID", "Owner", "Resident", "Same"];
pub const SHEET_NAME: &str = "Sheet1";

// ---------------------------------------------------------------------------
// Format selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Csv,
    Xlsx,
}

impl Format {
    /// Pick the codec from the file's lowercase extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "" => Err(AppError::UnsupportedFormat("(no extension)".to_string())),
            other => Err(AppError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    pub fn read(&self, path: &Path) -> Result<Vec<Apartment>> {
        match self {
            Self::Csv => read_csv(path),
            Self::Xlsx => read_xlsx(path),
        }
    }

    pub fn write(&self, path: &Path, apartments: &[Apartment]) -> Result<()> {
        match self {
            Self::Csv => write_csv(path, apartments),
            Self::Xlsx => write_xlsx(path, apartments),
        }
    }
}

/// Decode one data row. `line` is 1-based and counts the header.
fn decode_row(fields: &[String], line: usize) -> Result<Apartment> {
    if fields.len() < 3 {
        return Err(AppError::Format(format!(
            "line {line}: expected at least 3 columns (ID, Owner, Resident), found {}",
            fields.len()
        )));
    }
    Ok(Apartment::new(&fields[0], &fields[1], &fields[2]))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Vec<Apartment>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        if i == 0 {
            continue;
        }
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        rows.push(decode_row(&fields, i + 1)?);
    }
    Ok(rows)
}

fn write_csv(path: &Path, apartments: &[Apartment]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(HEADER)?;
    for apt in apartments {
        let same = apt.same_flag.to_string();
        wtr.write_record([apt.id.as_str(), apt.owner.as_str(), apt.resident.as_str(), same.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn read_xlsx(path: &Path) -> Result<Vec<Apartment>> {
    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| AppError::Format(format!("failed to open workbook: {e}")))?;
    let range = workbook
        .worksheet_range(SHEET_NAME)
        .map_err(|e| AppError::Format(format!("{SHEET_NAME}: {e}")))?;

    let mut rows = Vec::new();
    for (i, row) in range.rows().enumerate() {
        if i == 0 {
            continue;
        }
        let fields: Vec<String> = row.iter().map(cell_text).collect();
        rows.push(decode_row(&fields, i + 1)?);
    }
    Ok(rows)
}

fn write_xlsx(path: &Path, apartments: &[Apartment]) -> Result<()> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string(0, col as u16, *title)?;
    }
    for (i, apt) in apartments.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, apt.id.as_str())?;
        sheet.write_string(row, 1, apt.owner.as_str())?;
        sheet.write_string(row, 2, apt.resident.as_str())?;
        sheet.write_boolean(row, 3, apt.same_flag)?;
    }
    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Apartment> {
        vec![
            Apartment::new("101", "Asha Rao", "Asha Rao"),
            Apartment::new("102", "Vikram Shah", "Meera Iyer"),
            Apartment::new("103", "Dev Patel", ""),
        ]
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("units.CSV")).unwrap(), Format::Csv);
        assert_eq!(Format::from_path(Path::new("/tmp/units.xlsx")).unwrap(), Format::Xlsx);
        match Format::from_path(Path::new("units.txt")) {
            Err(AppError::UnsupportedFormat(ext)) => assert_eq!(ext, ".txt"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
        assert!(matches!(
            Format::from_path(Path::new("units")),
            Err(AppError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_csv_export_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        Format::Csv.write(&path, &sample()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "ID,Owner,Resident,Same");
        assert_eq!(lines[1], "101,Asha Rao,Asha Rao,true");
        assert_eq!(lines[2], "102,Vikram Shah,Meera Iyer,false");
        assert_eq!(lines[3], "103,Dev Patel,Vacant,false");
    }

    #[test]
    fn test_csv_import_ignores_same_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, "ID,Owner,Resident,Same\nA1,Smith,,true\nA2,Lee,Lee,false\n").unwrap();
        let rows = Format::Csv.read(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].resident, "Vacant");
        assert!(!rows[0].same_flag);
        assert!(rows[1].same_flag);
    }

    #[test]
    fn test_csv_import_rejects_short_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, "ID,Owner,Resident,Same\nA1,Smith,Smith,true\nA2,Lee\n").unwrap();
        match Format::Csv.read(&path) {
            Err(AppError::Format(msg)) => assert!(msg.contains("line 3"), "{msg}"),
            other => panic!("expected Format error, got {other:?}"),
        }
    }

    #[test]
    fn test_csv_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, "ID,Owner,Resident,Same\n").unwrap();
        assert!(Format::Csv.read(&path).unwrap().is_empty());
    }

    #[test]
    fn test_xlsx_roundtrip_normalizes_vacant() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("units.xlsx");
        let original = sample();
        Format::Xlsx.write(&path, &original).unwrap();
        let back = Format::Xlsx.read(&path).unwrap();
        assert_eq!(back, original);
        assert_eq!(back[2].resident, "Vacant");
    }

    #[test]
    fn test_xlsx_export_uses_boolean_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("units.xlsx");
        Format::Xlsx.write(&path, &sample()).unwrap();
        let mut workbook = calamine::open_workbook_auto(&path).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        let header: Vec<String> = range.rows().next().unwrap().iter().map(cell_text).collect();
        assert_eq!(header, HEADER);
        assert_eq!(range.get((1, 3)), Some(&Data::Bool(true)));
        assert_eq!(range.get((2, 3)), Some(&Data::Bool(false)));
    }

    #[test]
    fn test_xlsx_narrow_sheet_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("narrow.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "ID").unwrap();
        sheet.write_string(0, 1, "Owner").unwrap();
        sheet.write_string(1, 0, "A1").unwrap();
        sheet.write_string(1, 1, "Smith").unwrap();
        workbook.save(&path).unwrap();
        assert!(matches!(Format::Xlsx.read(&path), Err(AppError::Format(_))));
    }

    #[test]
    fn test_xlsx_numeric_ids_read_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numeric.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, title) in HEADER.iter().enumerate() {
            sheet.write_string(0, col as u16, *title).unwrap();
        }
        sheet.write_number(1, 0, 204.0).unwrap();
        sheet.write_string(1, 1, "Nair").unwrap();
        sheet.write_string(1, 2, "Nair").unwrap();
        workbook.save(&path).unwrap();
        let rows = Format::Xlsx.read(&path).unwrap();
        assert_eq!(rows[0].id, "204");
        assert!(rows[0].same_flag);
    }

    #[test]
    fn test_xlsx_missing_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Units").unwrap();
        sheet.write_string(0, 0, "ID").unwrap();
        workbook.save(&path).unwrap();
        assert!(matches!(Format::Xlsx.read(&path), Err(AppError::Format(_))));
    }
}
