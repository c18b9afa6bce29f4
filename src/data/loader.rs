use std::path::Path;

use crate::data::datetime::{detect_date_format, parse_to_timestamp};
use crate::data::parser;
use crate::error::DataError;
use crate::state::sample_series::SampleSeries;

/// Result of loading a data file: column names and column data as strings
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub columns: Vec<String>,
    pub column_data: Vec<Vec<String>>, // column-major: column_data[col_idx][row_idx]
    pub row_count: usize,
}

impl LoadedData {
    /// Resolve a column by header name (case-insensitive) or 0-based index.
    pub fn column_index(&self, selector: &str) -> Result<usize, DataError> {
        let wanted = selector.trim();
        if let Some(i) = self.columns.iter().position(|c| c.eq_ignore_ascii_case(wanted)) {
            return Ok(i);
        }
        match wanted.parse::<usize>() {
            Ok(i) if i < self.columns.len() => Ok(i),
            _ => Err(DataError::ColumnNotFound(wanted.to_string())),
        }
    }

    pub fn column(&self, selector: &str) -> Result<&[String], DataError> {
        let idx = self.column_index(selector)?;
        Ok(&self.column_data[idx])
    }
}

/// Load a CSV or Excel file and return the column names and raw string data.
pub fn load_file(path: &Path) -> Result<LoadedData, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let rows = match ext.as_str() {
        "csv" => read_csv_rows(path)?,
        "xls" | "xlsx" => read_excel_rows(path)?,
        _ => return Err(DataError::UnsupportedFormat(ext)),
    };

    let data = rows_to_columns(rows)?;
    tracing::info!(
        "Loaded {} rows x {} columns from {:?}",
        data.row_count,
        data.columns.len(),
        path
    );
    Ok(data)
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>, DataError> {
    let content = std::fs::read(path)?;
    // Fallback: treat non-UTF-8 input as latin1
    let text = String::from_utf8(content)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(record.iter().map(|s| s.to_string()).collect()),
            Err(e) => tracing::warn!("Skipping malformed CSV record: {e}"),
        }
    }
    Ok(rows)
}

fn read_excel_rows(path: &Path) -> Result<Vec<Vec<String>>, DataError> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook =
        open_workbook_auto(path).map_err(|e| DataError::Excel(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DataError::Excel("no sheets found".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DataError::Excel(e.to_string()))?;

    let rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty | Data::Error(_) => String::new(),
                    Data::String(s) => s.clone(),
                    Data::Float(f) => f.to_string(),
                    Data::Int(i) => i.to_string(),
                    Data::Bool(b) => b.to_string(),
                    Data::DateTime(dt) => dt.as_f64().to_string(),
                    Data::DateTimeIso(s) => s.clone(),
                    Data::DurationIso(s) => s.clone(),
                })
                .collect()
        })
        .collect();
    Ok(rows)
}

fn rows_to_columns(all_rows: Vec<Vec<String>>) -> Result<LoadedData, DataError> {
    let all_rows: Vec<Vec<String>> = all_rows.into_iter().filter(|r| !r.is_empty()).collect();
    let header_row = parser::detect_header_row(&all_rows);
    if all_rows.len() <= header_row + 1 {
        return Err(DataError::NoData);
    }

    let columns: Vec<String> = all_rows[header_row].iter().map(|s| s.trim().to_string()).collect();

    let data_rows = &all_rows[header_row + 1..];
    let mut column_data: Vec<Vec<String>> = vec![Vec::with_capacity(data_rows.len()); columns.len()];
    for row in data_rows {
        for (col_idx, col_data) in column_data.iter_mut().enumerate() {
            col_data.push(row.get(col_idx).cloned().unwrap_or_default());
        }
    }

    Ok(LoadedData {
        columns,
        column_data,
        row_count: data_rows.len(),
    })
}

/// Turn a string column into samples. Blank or non-numeric cells are absent.
pub fn column_to_series(cells: &[String]) -> SampleSeries {
    cells.iter().map(|s| s.trim().parse::<f64>().ok()).collect()
}

/// Turn a column into x-axis positions: plain numbers when most cells are
/// numeric, otherwise Unix timestamps when the column holds dates.
pub fn column_to_x_values(cells: &[String]) -> Option<SampleSeries> {
    let numeric = column_to_series(cells);
    if valid_fraction(numeric.present_count(), cells.len()) > 0.7 {
        return Some(numeric);
    }

    let format = detect_date_format(cells)?;
    let timestamps: SampleSeries = cells
        .iter()
        .map(|s| parse_to_timestamp(s.trim(), format))
        .collect();
    if valid_fraction(timestamps.present_count(), cells.len()) > 0.7 {
        Some(timestamps)
    } else {
        None
    }
}

fn valid_fraction(valid: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        valid as f64 / total as f64
    }
}
