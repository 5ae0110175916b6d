use crate::extraction::Extracted;
use crate::model::{FieldValue, Record, RecordSet};
use crate::templates::schema::TemplateDef;

pub const PRIME: &str = "Prime";
pub const SUB: &str = "Sub";

/// Reshape extracted values into one record per table row.
///
/// Header and trailer values are repeated on every row. The classification
/// column is "Prime" when the row's name renders exactly like the prime
/// contractor header field (case-sensitive, untrimmed), otherwise "Sub".
pub fn build_records(template: &TemplateDef, extracted: Extracted, source: &str) -> RecordSet {
    let columns = template.output_columns();

    let prime_name = template
        .header
        .iter()
        .position(|f| f.column == template.prime_field)
        .and_then(|i| extracted.header.get(i))
        .map(|v| v.to_string());

    let records = extracted
        .rows
        .into_iter()
        .map(|row| {
            let mut cells = row.into_iter();
            let name = cells.next().unwrap_or(FieldValue::Empty);
            let is_prime = prime_name.as_deref() == Some(name.to_string().as_str());

            let mut values = Vec::with_capacity(columns.len());
            values.extend(extracted.header.iter().cloned());
            values.push(name);
            values.push(FieldValue::text(if is_prime { PRIME } else { SUB }));
            values.extend(cells);
            values.extend(extracted.trailer.iter().cloned());
            values.push(FieldValue::text(source));
            Record { values }
        })
        .collect();

    RecordSet {
        source: source.to_string(),
        columns,
        records,
    }
}

/// Strip directories and everything from the first `.` of a file name.
///
/// `"Invoice 12.final.xlsx"` becomes `"Invoice 12"`.
pub fn file_stem(file_name: &str) -> &str {
    let base = file_name
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or(file_name);
    base.split('.').next().unwrap_or(base)
}
