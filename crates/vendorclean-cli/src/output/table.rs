use vendorclean_core::model::RecordSet;

/// Render a record set one record per block, since cleaned rows are far
/// too wide for a terminal.
pub fn format_records(records: &RecordSet) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{}: {} record(s)\n",
        records.source,
        records.len()
    ));

    if records.is_empty() {
        out.push_str("\n  (no vendor rows found in the table body)\n");
        return out;
    }

    let width = records
        .columns
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(10);

    for (i, record) in records.records.iter().enumerate() {
        out.push_str(&format!("\n--- Record {} ---\n", i + 1));
        for (column, value) in records.columns.iter().zip(&record.values) {
            out.push_str(&format!("  {:<width$}  {}\n", column, value, width = width));
        }
    }

    out
}
