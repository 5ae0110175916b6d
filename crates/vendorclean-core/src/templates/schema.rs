use serde::{Deserialize, Serialize};

/// How a raw cell is turned into an output value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    #[default]
    Text,
    Date,
    Currency,
}

/// A fixed layout describing where a template keeps its values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Appended to the source stem when naming the archive entry.
    #[serde(default)]
    pub entry_suffix: String,
    /// Single cells broadcast to every output row, before the table columns.
    pub header: Vec<CellFieldDef>,
    pub table: TableDef,
    /// Single cells broadcast to every output row, after the table columns.
    #[serde(default)]
    pub trailer: Vec<CellFieldDef>,
    /// Output column of the header field holding the prime contractor name.
    pub prime_field: String,
    #[serde(default = "default_classification_column")]
    pub classification_column: String,
    #[serde(default = "default_source_column")]
    pub source_column: String,
}

fn default_classification_column() -> String {
    "Prime/Sub".into()
}

fn default_source_column() -> String {
    "Original file name".into()
}

/// One scalar value read from a fixed cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellFieldDef {
    pub column: String,
    pub row: u32,
    pub col: u32,
    #[serde(default)]
    pub format: FieldFormat,
    /// Literal substituted when the cell is blank.
    #[serde(default)]
    pub blank: Option<String>,
    /// Render blank and "Select" cells as "N/A".
    #[serde(default)]
    pub placeholder: bool,
}

/// The variable-length vendor table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDef {
    /// First row of the table body (inclusive).
    pub first_row: u32,
    /// Last row of the table body (inclusive).
    pub last_row: u32,
    /// Column whose non-blank cells decide which rows are vendors.
    pub name: TableColumnDef,
    /// Remaining columns, in output order.
    pub columns: Vec<TableColumnDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumnDef {
    pub column: String,
    pub col: u32,
    #[serde(default)]
    pub format: FieldFormat,
    #[serde(default)]
    pub placeholder: bool,
}

impl TemplateDef {
    /// Output column names in record order.
    pub fn output_columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.header.len() + self.table.columns.len() + 4);
        columns.extend(self.header.iter().map(|f| f.column.clone()));
        columns.push(self.table.name.column.clone());
        columns.push(self.classification_column.clone());
        columns.extend(self.table.columns.iter().map(|c| c.column.clone()));
        columns.extend(self.trailer.iter().map(|f| f.column.clone()));
        columns.push(self.source_column.clone());
        columns
    }
}
