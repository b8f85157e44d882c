// ==========================================
// 咖啡售货亭配置器 - 表格文件解析
// ==========================================
// 支持: Excel (.xlsx) / CSV (.csv)
// 规则:
// - 第一行为表头，去空白；去空白后为空的表头连同其下整列忽略
// - 其余每行映射为 表头 -> 原始单元值
// - 所有已映射列均为空的行跳过
// ==========================================

use crate::tabular::cell::CellValue;
use crate::tabular::error::{TabularError, TabularResult};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// 表格文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Xlsx,
    Csv,
}

impl TabularFormat {
    /// 按扩展名判断格式
    pub fn from_path(path: &Path) -> TabularResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "xlsx" => Ok(TabularFormat::Xlsx),
            "csv" => Ok(TabularFormat::Csv),
            _ => Err(TabularError::UnsupportedFormat(ext)),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TabularFormat::Xlsx => "xlsx",
            TabularFormat::Csv => "csv",
        }
    }
}

/// 一行原始数据
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize, // 1 基行号（表头为第 1 行）
    pub values: HashMap<String, CellValue>,
}

/// 按表头组装行（两种格式共用）
fn assemble_rows<I>(header_row_number: usize, header: Vec<CellValue>, data_rows: I) -> Vec<RawRow>
where
    I: IntoIterator<Item = Vec<CellValue>>,
{
    let headers: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| (idx, cell.to_string().trim().to_string()))
        .filter(|(_, name)| !name.is_empty())
        .collect();

    if headers.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    for (offset, cells) in data_rows.into_iter().enumerate() {
        let values: HashMap<String, CellValue> = headers
            .iter()
            .map(|(idx, name)| {
                let cell = cells.get(*idx).cloned().unwrap_or(CellValue::Empty);
                (name.clone(), cell)
            })
            .collect();

        if values.values().all(CellValue::is_blank) {
            continue;
        }

        rows.push(RawRow {
            row_number: header_row_number + 1 + offset,
            values,
        });
    }
    rows
}

fn convert_excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Float(*f),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::DateTime(naive),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(CellValue::DateTime)
            .unwrap_or_else(|_| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

// ==========================================
// Excel 解析
// ==========================================

/// 解析 xlsx 内容（第一个工作表）
pub fn parse_xlsx_bytes(data: &[u8]) -> TabularResult<Vec<RawRow>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(data))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| TabularError::ExcelParseError("Excel 文件无工作表".to_string()))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    // 区域可能不从 A1 开始
    let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);

    let mut rows = range.rows();
    let header = match rows.next() {
        Some(cells) => cells.iter().map(convert_excel_cell).collect(),
        None => return Ok(Vec::new()),
    };
    let data_rows = rows.map(|cells| cells.iter().map(convert_excel_cell).collect());

    let parsed = assemble_rows(first_row + 1, header, data_rows);
    debug!(sheet = %sheet_name, rows = parsed.len(), "Excel 解析完成");
    Ok(parsed)
}

// ==========================================
// CSV 解析
// ==========================================

// CSV 中存在的单元一律是文本（含空串），空串的含义交给列类型决定
fn csv_cell(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

/// 解析 CSV 内容（所有单元均为文本）
pub fn parse_csv_bytes(data: &[u8]) -> TabularResult<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // 允许行长度不一致
        .from_reader(data);

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record?.iter().map(csv_cell).collect(),
        None => return Ok(Vec::new()),
    };

    let mut data_rows = Vec::new();
    for record in records {
        data_rows.push(record?.iter().map(csv_cell).collect::<Vec<_>>());
    }

    let parsed = assemble_rows(1, header, data_rows);
    debug!(rows = parsed.len(), "CSV 解析完成");
    Ok(parsed)
}

/// 按格式解析内存中的文件内容
pub fn parse_bytes(data: &[u8], format: TabularFormat) -> TabularResult<Vec<RawRow>> {
    match format {
        TabularFormat::Xlsx => parse_xlsx_bytes(data),
        TabularFormat::Csv => parse_csv_bytes(data),
    }
}

/// 解析磁盘文件（格式由扩展名决定）
pub fn parse_file(path: &Path) -> TabularResult<Vec<RawRow>> {
    if !path.exists() {
        return Err(TabularError::FileNotFound(path.display().to_string()));
    }
    let format = TabularFormat::from_path(path)?;
    let data = std::fs::read(path)?;
    parse_bytes(&data, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_headers_trimmed_and_empty_dropped() {
        let data = " id ,,name\n1,ignored,Jura\n";
        let rows = parse_csv_bytes(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].values.len(), 2);
        assert_eq!(rows[0].values["id"], CellValue::Text("1".to_string()));
        assert_eq!(rows[0].values["name"], CellValue::Text("Jura".to_string()));
    }

    #[test]
    fn test_csv_skips_empty_rows_and_pads_short_rows() {
        let data = "id,name,price\n,,\n7\n";
        let rows = parse_csv_bytes(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_number, 3);
        assert_eq!(rows[0].values["price"], CellValue::Empty);
    }

    #[test]
    fn test_csv_whitespace_only_row_is_skipped() {
        let data = "id,name,price\n  , \t,\n5,Jura,10\n";
        let rows = parse_csv_bytes(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_number, 3);
    }

    #[test]
    fn test_csv_empty_cell_is_empty_text() {
        let data = "id,active
1,
";
        let rows = parse_csv_bytes(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values["active"], CellValue::Text(String::new()));
    }

    #[test]
    fn test_csv_only_blank_headers_yields_nothing() {
        let rows = parse_csv_bytes(" , \n1,2\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_file_checks_existence_and_extension() {
        let err = parse_file(Path::new("/nonexistent/file.xlsx")).unwrap_err();
        assert!(matches!(err, TabularError::FileNotFound(_)));

        let mut temp = NamedTempFile::with_suffix(".txt").unwrap();
        writeln!(temp, "id").unwrap();
        let err = parse_file(temp.path()).unwrap_err();
        assert!(matches!(err, TabularError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_parse_csv_file() {
        let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(temp, "name,active").unwrap();
        writeln!(temp, "Белый,Да").unwrap();
        let rows = parse_file(temp.path()).unwrap();
        assert_eq!(rows[0].values["active"], CellValue::Text("Да".to_string()));
    }
}
