use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::CleanError;
use crate::model::{Cell, FieldValue, NOT_APPLICABLE, SELECT_PLACEHOLDER};
use crate::templates::schema::FieldFormat;

/// Where a value is read from and how it is rendered.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Slot<'a> {
    pub column: &'a str,
    pub row: u32,
    pub col: u32,
    pub format: FieldFormat,
    pub blank: Option<&'a str>,
    pub placeholder: bool,
}

/// Turn one cell into a field value according to its slot.
pub(crate) fn resolve(cell: &Cell, slot: &Slot<'_>) -> Result<FieldValue, CleanError> {
    if slot.placeholder && is_placeholder(cell) {
        return Ok(FieldValue::text(NOT_APPLICABLE));
    }

    if cell.is_blank() {
        return Ok(match slot.blank {
            Some(literal) => FieldValue::text(literal),
            None => FieldValue::Empty,
        });
    }

    match slot.format {
        FieldFormat::Text => Ok(FieldValue::Text(cell.to_string())),
        FieldFormat::Currency => parse_currency(cell)
            .map(FieldValue::Currency)
            .ok_or_else(|| CleanError::NotNumeric {
                field: slot.column.to_string(),
                row: slot.row,
                col: slot.col,
                value: cell.to_string(),
            }),
        FieldFormat::Date => parse_date(cell)
            .map(FieldValue::Date)
            .ok_or_else(|| CleanError::NotDate {
                field: slot.column.to_string(),
                row: slot.row,
                col: slot.col,
                value: cell.to_string(),
            }),
    }
}

fn is_placeholder(cell: &Cell) -> bool {
    match cell {
        Cell::Text(s) => s.is_empty() || s == SELECT_PLACEHOLDER,
        other => other.is_blank(),
    }
}

/// Coerce a cell to an amount. Accepts numbers and text like `$1,234.50`.
fn parse_currency(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(f) => f64_to_decimal(*f),
        Cell::Text(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            Decimal::from_str(&cleaned).ok()
        }
        _ => None,
    }
}

/// Convert f64 to Decimal, preserving reasonable precision.
///
/// Uses string round-trip to avoid floating-point artifacts
/// (e.g., 1234.1_f64 becoming 1234.09999...).
fn f64_to_decimal(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    format!("{f}")
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::try_from(f).ok())
}

const TEXT_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Largest serial in the 1900 date system (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Coerce a cell to a calendar date. Accepts date cells, Excel serial
/// numbers (1900 date system) and common textual forms. Dates outside the
/// years 1900..=9999 cannot be written back to a spreadsheet and are rejected.
fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    let date = match cell {
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Number(serial) => from_excel_serial(*serial),
        Cell::Text(s) => {
            let s = s.trim();
            TEXT_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                        .ok()
                        .map(|dt| dt.date())
                })
        }
        _ => None,
    }?;
    (1900..=9999).contains(&date.year()).then_some(date)
}

/// Serial 1 is 1900-01-01. Excel counts a 1900-02-29 that never existed as
/// serial 60, so serials from 61 on are one day ahead and serial 60 itself
/// has no date.
fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let days = serial.trunc() as i64;
    let epoch = match days {
        ..=59 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        60 => return None,
        _ => NaiveDate::from_ymd_opt(1899, 12, 30)?,
    };
    epoch.checked_add_signed(Duration::try_days(days)?)
}
