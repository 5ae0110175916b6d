use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use crate::error::CleanError;
use crate::model::{FieldValue, RecordSet};

/// Name of the single worksheet in every cleaned workbook.
pub const SHEET_NAME: &str = "Table 1";

pub const CURRENCY_FORMAT: &str = "$#,##0.00";
pub const DATE_FORMAT: &str = "mm/dd/yyyy";

/// Serialize a record set to xlsx bytes.
///
/// Row 0 holds the column names in bold. Currency and date values are
/// written as native cells with a number format so they stay sortable;
/// empty values leave the cell unwritten. Column widths are autofit.
pub fn write_record_set(records: &RecordSet) -> Result<Vec<u8>, CleanError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let currency_format = Format::new().set_num_format(CURRENCY_FORMAT);
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in records.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, name, &header_format)?;
    }

    for (i, record) in records.records.iter().enumerate() {
        let row = u32::try_from(i + 1)
            .map_err(|_| CleanError::Write(format!("too many rows ({})", i + 1)))?;
        for (col, value) in record.values.iter().enumerate() {
            let col = column_index(col)?;
            match value {
                FieldValue::Empty => {}
                FieldValue::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                FieldValue::Currency(amount) => {
                    let amount = amount.to_f64().ok_or_else(|| {
                        CleanError::Write(format!("amount {amount} does not fit a spreadsheet cell"))
                    })?;
                    worksheet.write_number_with_format(row, col, amount, &currency_format)?;
                }
                FieldValue::Date(date) => {
                    let excel_date = ExcelDateTime::from_ymd(
                        date.year() as u16,
                        date.month() as u8,
                        date.day() as u8,
                    )?;
                    worksheet.write_datetime_with_format(row, col, &excel_date, &date_format)?;
                }
            }
        }
    }

    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

fn column_index(col: usize) -> Result<u16, CleanError> {
    u16::try_from(col).map_err(|_| CleanError::Write(format!("too many columns ({})", col + 1)))
}
