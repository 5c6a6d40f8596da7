use std::path::Path;
use crate::data::datetime;
use crate::data::mapping::{RawRow, RawValue};
use crate::error::LoadError;

/// A source table: header names plus one keyed row per data line.
#[derive(Debug, Clone, Default)]
pub struct LoadedTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl LoadedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Load a CSV or Excel file. The first row is the header.
pub fn load_file(path: &Path) -> Result<LoadedTable, LoadError> {
    let ext = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "xls" | "xlsx" => load_excel(path)?,
        _ => return Err(LoadError::UnsupportedFormat(ext)),
    };
    tracing::info!(
        "Loaded {} rows x {} columns from {:?}",
        table.row_count(),
        table.columns.len(),
        path
    );
    Ok(table)
}

fn load_csv(path: &Path) -> Result<LoadedTable, LoadError> {
    let content = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Fall back to latin1 when the file is not valid UTF-8.
    let text = match String::from_utf8(content) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    };
    parse_csv(&text)
}

/// Parse CSV text. Short rows are padded with empty cells, unreadable lines
/// are skipped.
pub fn parse_csv(text: &str) -> Result<LoadedTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(LoadError::NoHeader);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping unreadable CSV line: {e}");
                continue;
            }
        };
        let row: RawRow = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), RawValue::from(record.get(i).unwrap_or(""))))
            .collect();
        rows.push(row);
    }

    Ok(LoadedTable { columns, rows })
}

fn load_excel(path: &Path) -> Result<LoadedTable, LoadError> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook.sheet_names().first()
        .ok_or(LoadError::NoSheets)?
        .clone();
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut all_rows = range.rows();
    let header = all_rows.next().ok_or(LoadError::NoHeader)?;
    let columns: Vec<String> = header.iter().map(|c| c.to_string().trim().to_string()).collect();

    let rows = all_rows
        .map(|cells| {
            columns
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = match cells.get(i) {
                        None | Some(Data::Empty) => RawValue::Empty,
                        Some(Data::String(s)) => RawValue::from(s.as_str()),
                        Some(Data::Float(f)) => RawValue::Number(*f),
                        Some(Data::Int(n)) => RawValue::Number(*n as f64),
                        Some(Data::Bool(b)) => RawValue::Bool(*b),
                        Some(Data::DateTime(dt)) => datetime::excel_serial_to_game_date(dt.as_f64())
                            .map(RawValue::Text)
                            .unwrap_or(RawValue::Number(dt.as_f64())),
                        Some(Data::DateTimeIso(s)) => RawValue::from(s.as_str()),
                        Some(Data::DurationIso(s)) => RawValue::from(s.as_str()),
                        Some(Data::Error(_)) => RawValue::Empty,
                    };
                    (name.clone(), value)
                })
                .collect::<RawRow>()
        })
        .collect();

    Ok(LoadedTable { columns, rows })
}
