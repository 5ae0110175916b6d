use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder written in place of blank or "Select" cells.
pub const NOT_APPLICABLE: &str = "N/A";

/// Literal a template dropdown shows before anything was picked.
pub const SELECT_PLACEHOLDER: &str = "Select";

/// A single cell of an input sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Error(String),
}

impl Cell {
    /// Blank means nothing was entered. Whitespace-only text is not blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) => write!(f, "{}", format_number(*n)),
            Cell::Bool(true) => write!(f, "TRUE"),
            Cell::Bool(false) => write!(f, "FALSE"),
            Cell::DateTime(dt) if dt.time() == NaiveTime::MIN => {
                write!(f, "{}", dt.format(DATE_FORMAT))
            }
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%m/%d/%Y %H:%M:%S")),
            Cell::Error(e) => write!(f, "#{e}"),
        }
    }
}

/// Render a float the way a spreadsheet shows it in a General cell:
/// whole numbers without a fractional part.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

pub(crate) const DATE_FORMAT: &str = "%m/%d/%Y";

/// The typed value of one output field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Empty,
    Text(String),
    Currency(Decimal),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> FieldValue {
        FieldValue::Text(s.into())
    }

    pub fn as_currency(&self) -> Option<Decimal> {
        match self {
            FieldValue::Currency(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Empty => Ok(()),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Currency(d) => write!(f, "{}", format_currency(*d)),
            FieldValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Format an amount as `$1,234.50` (negative amounts as `-$1,234.50`).
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded = rounded.abs();
    rounded.rescale(2);

    let digits = rounded.to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

/// One output row: values are aligned with `RecordSet::columns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    pub values: Vec<FieldValue>,
}

/// All records cleaned out of one source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSet {
    /// Filename stem of the source file.
    pub source: String,
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Look up a value by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&FieldValue> {
        let idx = self.column_index(column)?;
        self.records.get(row)?.values.get(idx)
    }
}
