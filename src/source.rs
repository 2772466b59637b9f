//! Loading grade sheets from disk or over HTTP.
//!
//! [`WorkbookReader`] is the seam between file formats and the aggregator:
//! it names the first sheet and returns its rows as strings.
//! [`SpreadsheetWorkbook`] reads anything calamine recognizes (xlsx, xlsm,
//! xlsb, xls, ods); [`CsvWorkbook`] treats a CSV file as a single sheet.

use crate::error::{GradeError, Result};
use crate::fetch::{BasicClient, fetch_bytes};
use calamine::{Data, Reader, Sheets, open_workbook_auto_from_rs};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Rows of the first sheet of a workbook, header included.
#[derive(Debug, Clone)]
pub struct SheetRows {
    pub sheet_name: String,
    pub rows: Vec<Vec<String>>,
}

/// Read access to the sheets of an opened workbook.
pub trait WorkbookReader {
    /// Name of the first sheet.
    fn first_sheet_name(&self) -> Result<String>;

    /// All rows of `sheet` as strings.
    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>>;
}

/// Converts a calamine cell into the string the aggregator sees.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.clone(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.clone(),
        Data::DurationIso(v) => v.clone(),
        Data::Error(e) => format!("#ERROR: {e:?}"),
        Data::Empty => String::new(),
    }
}

/// A spreadsheet held in memory, format detected from its content.
pub struct SpreadsheetWorkbook {
    sheets: Sheets<Cursor<Vec<u8>>>,
}

impl SpreadsheetWorkbook {
    /// Opens the workbook in `bytes`. `source` is only used in errors.
    pub fn from_bytes(source: &str, bytes: Vec<u8>) -> Result<Self> {
        let sheets =
            open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| GradeError::FileOpen {
                path: source.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { sheets })
    }
}

impl WorkbookReader for SpreadsheetWorkbook {
    fn first_sheet_name(&self) -> Result<String> {
        self.sheets
            .sheet_names()
            .into_iter()
            .next()
            .ok_or(GradeError::NoSheet)
    }

    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>> {
        let range = self
            .sheets
            .worksheet_range(sheet)
            .map_err(|e| GradeError::RowsRead {
                sheet: sheet.to_string(),
                message: e.to_string(),
            })?;

        // The range begins at the first used cell; pad it back out to A1.
        let (first_row, first_col) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Vec<String>> = vec![Vec::new(); first_row as usize];
        rows.extend(range.rows().map(|r| {
            std::iter::repeat_n(String::new(), first_col as usize)
                .chain(r.iter().map(cell_to_string))
                .collect()
        }));

        Ok(rows)
    }
}

/// A CSV file exposed as a workbook with one sheet.
///
/// The delimiter is `;` when the first non-blank line contains `;` but no
/// `,` (the usual export of Czech-locale spreadsheets), otherwise `,`.
/// Blank lines are kept as empty rows so row numbers match file lines.
pub struct CsvWorkbook {
    name: String,
    data: Vec<u8>,
}

impl CsvWorkbook {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    fn content(&self) -> &[u8] {
        self.data.strip_prefix(UTF8_BOM).unwrap_or(&self.data)
    }

    fn delimiter(&self) -> u8 {
        let content = self.content();
        let first_line = content
            .split(|b| *b == b'\n')
            .find(|line| !line.trim_ascii().is_empty())
            .unwrap_or_default();
        if first_line.contains(&b';') && !first_line.contains(&b',') {
            b';'
        } else {
            b','
        }
    }
}

impl WorkbookReader for CsvWorkbook {
    fn first_sheet_name(&self) -> Result<String> {
        Ok(self.name.clone())
    }

    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>> {
        if sheet != self.name {
            return Err(GradeError::RowsRead {
                sheet: sheet.to_string(),
                message: format!("CSV source only contains sheet '{}'", self.name),
            });
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter())
            .from_reader(self.content());

        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut next_line = 1u64;
        for record in rdr.records() {
            let record = record.map_err(|e| GradeError::RowsRead {
                sheet: sheet.to_string(),
                message: e.to_string(),
            })?;

            // The csv reader skips blank lines; put them back.
            let line = record.position().map_or(next_line, |p| p.line());
            while next_line < line {
                rows.push(Vec::new());
                next_line += 1;
            }

            let embedded_newlines: usize = record.iter().map(|f| f.matches('\n').count()).sum();
            next_line = line + 1 + embedded_newlines as u64;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(rows)
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Path part of a source, without any URL query or fragment.
fn source_path(source: &str) -> &Path {
    Path::new(source.split(['?', '#']).next().unwrap_or(source))
}

fn is_csv(source: &str) -> bool {
    source_path(source)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

async fn read_source(source: &str) -> Result<Vec<u8>> {
    let open_error = |message: String| GradeError::FileOpen {
        path: source.to_string(),
        message,
    };

    if is_remote(source) {
        let client = BasicClient::new().map_err(|e| open_error(e.to_string()))?;
        fetch_bytes(&client, source)
            .await
            .map_err(|e| open_error(format!("{e:#}")))
    } else {
        std::fs::read(source).map_err(|e| open_error(e.to_string()))
    }
}

/// Picks a reader for `source` based on its extension.
pub fn open_workbook(source: &str, bytes: Vec<u8>) -> Result<Box<dyn WorkbookReader>> {
    if is_csv(source) {
        let name = source_path(source)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("Sheet1");
        Ok(Box::new(CsvWorkbook::new(name, bytes)))
    } else {
        Ok(Box::new(SpreadsheetWorkbook::from_bytes(source, bytes)?))
    }
}

/// Reads every row of the workbook's first sheet.
pub fn read_first_sheet(workbook: &mut dyn WorkbookReader) -> Result<SheetRows> {
    let sheet_name = workbook.first_sheet_name()?;
    let rows = workbook.rows(&sheet_name)?;
    debug!(sheet = %sheet_name, rows = rows.len(), "Sheet rows read");
    Ok(SheetRows { sheet_name, rows })
}

/// Loads the first sheet of a local file or an `http(s)` URL.
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn load_sheet(source: &str) -> Result<SheetRows> {
    let bytes = read_source(source).await?;
    info!(bytes = bytes.len(), "Grade source loaded");

    let mut workbook = open_workbook(source, bytes)?;
    read_first_sheet(workbook.as_mut())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(2.0)), "2");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(3)), "3");
        assert_eq!(cell_to_string(&Data::String("Math".into())), "Math");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn test_is_csv() {
        assert!(is_csv("grades.csv"));
        assert!(is_csv("dir/GRADES.CSV"));
        assert!(is_csv("https://example.com/grades.csv?token=1"));
        assert!(!is_csv("grades.xlsx"));
        assert!(!is_csv("grades"));
    }

    #[test]
    fn test_csv_workbook_reads_short_rows() {
        let data = "Předmět,Váha,Výsledek\nMath,1,2\nMath,2\n".as_bytes().to_vec();
        let mut workbook = CsvWorkbook::new("grades", data);
        let sheet = read_first_sheet(&mut workbook).unwrap();

        assert_eq!(sheet.sheet_name, "grades");
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[1], vec!["Math", "1", "2"]);
        assert_eq!(sheet.rows[2], vec!["Math", "2"]);
    }

    #[test]
    fn test_csv_workbook_semicolon_and_bom() {
        let mut data = UTF8_BOM.to_vec();
        data.extend_from_slice("Předmět;Váha;Výsledek\nMath;0,5;1\n".as_bytes());
        let mut workbook = CsvWorkbook::new("grades", data);
        let rows = workbook.rows("grades").unwrap();

        assert_eq!(rows[0], vec!["Předmět", "Váha", "Výsledek"]);
        assert_eq!(rows[1], vec!["Math", "0,5", "1"]);
    }

    #[test]
    fn test_csv_workbook_keeps_blank_lines() {
        let data = "Předmět,Váha,Výsledek\n\nMath,1,2\nMath,x,2\n".as_bytes().to_vec();
        let mut workbook = CsvWorkbook::new("grades", data);
        let rows = workbook.rows("grades").unwrap();

        assert_eq!(rows.len(), 4);
        assert!(rows[1].is_empty());
        assert_eq!(rows[3], vec!["Math", "x", "2"]);
    }

    #[test]
    fn test_csv_workbook_leading_blank_line_and_quoted_newline() {
        let data = "\nPředmět;Váha;Výsledek\n\"Math\nextra\";1;2\nArt;1;1\n"
            .as_bytes()
            .to_vec();
        let mut workbook = CsvWorkbook::new("grades", data);
        let rows = workbook.rows("grades").unwrap();

        assert!(rows[0].is_empty());
        assert_eq!(rows[1], vec!["Předmět", "Váha", "Výsledek"]);
        assert_eq!(rows[2], vec!["Math\nextra", "1", "2"]);
        assert_eq!(rows[3], vec!["Art", "1", "1"]);
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_csv_workbook_unknown_sheet() {
        let mut workbook = CsvWorkbook::new("grades", Vec::new());
        assert!(matches!(
            workbook.rows("other"),
            Err(GradeError::RowsRead { .. })
        ));
    }

    #[test]
    fn test_open_workbook_rejects_garbage() {
        let result = open_workbook("grades.xlsx", b"not a spreadsheet".to_vec());
        assert!(matches!(result, Err(GradeError::FileOpen { .. })));
    }

    #[test]
    fn test_open_workbook_names_csv_sheet_after_file() {
        let workbook = open_workbook("data/grades.csv", Vec::new()).unwrap();
        assert_eq!(workbook.first_sheet_name().unwrap(), "grades");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_sheet("definitely/not/here.xlsx").await;
        assert!(matches!(result, Err(GradeError::FileOpen { .. })));
    }
}
