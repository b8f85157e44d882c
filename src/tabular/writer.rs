// ==========================================
// 咖啡售货亭配置器 - 表格文件生成
// ==========================================
// 表头 + 每条记录一行；列顺序与列清单完全一致
// NULL 写为空单元
// xlsx 样式: 表头白色粗体、#2F5496 底色；偶数行 #F4F6FD 斑马纹
// ==========================================

use crate::tabular::cell::{format_float, FieldValue};
use crate::tabular::error::{TabularError, TabularResult};
use crate::tabular::file_parser::TabularFormat;
use rust_xlsxwriter::{Color, ColNum, Format, RowNum, Workbook, Worksheet};

const HEADER_BACKGROUND: u32 = 0x2F5496;
const STRIPE_BACKGROUND: u32 = 0xF4F6FD;

/// 工作表名最大长度（Excel 限制）
const MAX_SHEET_NAME_LEN: usize = 31;

fn sheet_name(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

fn write_value(
    sheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    value: &FieldValue,
    format: Option<&Format>,
) -> TabularResult<()> {
    match (value, format) {
        (FieldValue::Null, Some(fmt)) => {
            sheet.write_blank(row, col, fmt)?;
        }
        (FieldValue::Null, None) => {}
        (FieldValue::Bool(b), Some(fmt)) => {
            sheet.write_boolean_with_format(row, col, *b, fmt)?;
        }
        (FieldValue::Bool(b), None) => {
            sheet.write_boolean(row, col, *b)?;
        }
        (FieldValue::Int(i), Some(fmt)) => {
            sheet.write_number_with_format(row, col, *i as f64, fmt)?;
        }
        (FieldValue::Int(i), None) => {
            sheet.write_number(row, col, *i as f64)?;
        }
        (FieldValue::Float(f), Some(fmt)) => {
            sheet.write_number_with_format(row, col, *f, fmt)?;
        }
        (FieldValue::Float(f), None) => {
            sheet.write_number(row, col, *f)?;
        }
        (FieldValue::Text(s), Some(fmt)) => {
            sheet.write_string_with_format(row, col, s, fmt)?;
        }
        (FieldValue::Text(s), None) => {
            sheet.write_string(row, col, s)?;
        }
        (FieldValue::Timestamp(dt), fmt) => {
            let text = dt.format("%Y-%m-%d %H:%M:%S").to_string();
            match fmt {
                Some(fmt) => sheet.write_string_with_format(row, col, &text, fmt)?,
                None => sheet.write_string(row, col, &text)?,
            };
        }
    }
    Ok(())
}

/// 生成 xlsx 内容
///
/// # 参数
/// - label: 工作表名（本地化的实体复数名）
/// - columns: 表头（有序）
/// - rows: 与表头等长的值行
pub fn write_xlsx(label: &str, columns: &[&str], rows: &[Vec<FieldValue>]) -> TabularResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name(label))?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_BACKGROUND));
    let stripe_format = Format::new().set_background_color(Color::RGB(STRIPE_BACKGROUND));

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as ColNum, *name, &header_format)?;
    }

    for (idx, values) in rows.iter().enumerate() {
        let row = (idx + 1) as RowNum;
        // Excel 行号 = row + 1，偶数行加斑马纹
        let format = if (row + 1) % 2 == 0 { Some(&stripe_format) } else { None };
        for (col, value) in values.iter().enumerate().take(columns.len()) {
            write_value(sheet, row, col as ColNum, value, format)?;
        }
    }

    sheet.autofit();
    let buffer = workbook.save_to_buffer()?;
    Ok(buffer)
}

fn csv_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Float(f) => format_float(*f),
        FieldValue::Text(s) => s.clone(),
        FieldValue::Timestamp(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// 生成 CSV 内容（UTF-8）
pub fn write_csv(columns: &[&str], rows: &[Vec<FieldValue>]) -> TabularResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;
    for values in rows {
        writer.write_record(values.iter().take(columns.len()).map(csv_text))?;
    }
    writer
        .into_inner()
        .map_err(|e| TabularError::WriteError(e.to_string()))
}

/// 按格式生成文件内容
pub fn write_table(
    format: TabularFormat,
    label: &str,
    columns: &[&str],
    rows: &[Vec<FieldValue>],
) -> TabularResult<Vec<u8>> {
    match format {
        TabularFormat::Xlsx => write_xlsx(label, columns, rows),
        TabularFormat::Csv => write_csv(columns, rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::cell::CellValue;
    use crate::tabular::file_parser::{parse_csv_bytes, parse_xlsx_bytes};

    fn sample_rows() -> Vec<Vec<FieldValue>> {
        vec![
            vec![FieldValue::Int(1), FieldValue::Text("Jura".to_string()), FieldValue::Null],
            vec![FieldValue::Int(2), FieldValue::Text("Saeco".to_string()), FieldValue::Text("x.jpg".to_string())],
        ]
    }

    #[test]
    fn test_sheet_name_sanitized() {
        assert_eq!(sheet_name("Кофемашины"), "Кофемашины");
        assert_eq!(sheet_name("a/b"), "ab");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), MAX_SHEET_NAME_LEN);
        assert_eq!(sheet_name("[]"), "Sheet1");
    }

    #[test]
    fn test_xlsx_output_parses_back() {
        let bytes = write_xlsx("Кофемашины", &["id", "name", "main_image"], &sample_rows()).unwrap();
        let rows = parse_xlsx_bytes(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].values["id"], CellValue::Float(1.0));
        assert_eq!(rows[0].values["main_image"], CellValue::Empty);
        assert_eq!(rows[1].values["name"], CellValue::Text("Saeco".to_string()));
    }

    #[test]
    fn test_csv_output() {
        let bytes = write_csv(&["id", "name", "main_image"], &sample_rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "id,name,main_image\n1,Jura,\n2,Saeco,x.jpg\n");
        assert_eq!(parse_csv_bytes(text.as_bytes()).unwrap().len(), 2);
    }
}
