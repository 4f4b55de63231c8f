use std::io::BufRead;
use std::path::Path;

use calamine::{Reader, open_workbook_auto};
use eyre::{Result, WrapErr, eyre};
use log::debug;

use crate::Error;

const URL_COLUMN: &str = "URL";

/// Read the `URL` column from a CSV file or the first sheet of a spreadsheet.
///
/// Blank cells are skipped.
pub fn read_urls(path: &Path) -> Result<Vec<String>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let urls = match extension.as_str() {
        "csv" => read_csv(path)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet(path)?,
        _ => return Err(Error::UnsupportedInput(path.display().to_string()).into()),
    };

    debug!("Read {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}

/// One reference per line, blank lines skipped
pub fn read_url_lines(reader: impl BufRead) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    for line in reader.lines() {
        if let Some(url) = non_blank(&line?) {
            urls.push(url);
        }
    }
    Ok(urls)
}

fn read_csv(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .wrap_err_with(|| format!("failed to open {}", path.display()))?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let column = url_column(&headers)?;

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record.wrap_err_with(|| format!("failed to read {}", path.display()))?;
        if let Some(url) = record.get(column).and_then(non_blank) {
            urls.push(url);
        }
    }
    Ok(urls)
}

fn read_spreadsheet(path: &Path) -> Result<Vec<String>> {
    let mut workbook = open_workbook_auto(path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| eyre!("{} has no worksheets", path.display()))?
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();
    let column = url_column(&headers)?;

    Ok(rows
        .filter_map(|row| row.get(column))
        .filter_map(|cell| non_blank(&cell.to_string()))
        .collect())
}

fn url_column(headers: &[String]) -> Result<usize, Error> {
    headers
        .iter()
        .position(|h| h.trim() == URL_COLUMN)
        .ok_or(Error::MissingUrlColumn)
}

fn non_blank(cell: &str) -> Option<String> {
    let cell = cell.trim();
    (!cell.is_empty()).then(|| cell.to_string())
}
