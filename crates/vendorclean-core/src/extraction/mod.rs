pub(crate) mod cells;
pub mod grid;

use crate::error::CleanError;
use crate::model::FieldValue;
use crate::templates::schema::{CellFieldDef, TableColumnDef, TemplateDef};
use cells::{resolve, Slot};
use grid::Grid;

/// Values pulled out of one grid, before they are reshaped into records.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    /// Header values in template order.
    pub header: Vec<FieldValue>,
    /// One entry per qualifying table row: name value first, then the
    /// remaining table columns in template order.
    pub rows: Vec<Vec<FieldValue>>,
    /// Trailer values in template order.
    pub trailer: Vec<FieldValue>,
}

/// Read every fixed cell and the table body described by `template`.
pub fn extract(grid: &Grid, template: &TemplateDef) -> Result<Extracted, CleanError> {
    let header = read_cells(grid, &template.header)?;
    let trailer = read_cells(grid, &template.trailer)?;
    let rows = read_table(grid, template)?;
    Ok(Extracted {
        header,
        rows,
        trailer,
    })
}

fn read_cells(grid: &Grid, fields: &[CellFieldDef]) -> Result<Vec<FieldValue>, CleanError> {
    fields
        .iter()
        .map(|f| {
            let slot = Slot {
                column: &f.column,
                row: f.row,
                col: f.col,
                format: f.format,
                blank: f.blank.as_deref(),
                placeholder: f.placeholder,
            };
            let cell = grid.get(f.row, f.col).ok_or_else(|| out_of_range(&slot))?;
            resolve(cell, &slot)
        })
        .collect()
}

/// Sample the table body. Rows whose name cell is blank are skipped, and a
/// blank row does not end the table: later vendors are still picked up.
fn read_table(grid: &Grid, template: &TemplateDef) -> Result<Vec<Vec<FieldValue>>, CleanError> {
    let table = &template.table;
    let columns: Vec<&TableColumnDef> = std::iter::once(&table.name)
        .chain(table.columns.iter())
        .collect();

    for column in &columns {
        if column.col as usize >= grid.width() {
            return Err(CleanError::CellOutOfRange {
                field: column.column.clone(),
                row: table.first_row,
                col: column.col,
            });
        }
    }

    // The range is clamped to the sheet like a slice; a short sheet simply
    // has fewer candidate rows.
    let last_row = match u32::try_from(grid.height()) {
        Ok(0) => return Ok(Vec::new()),
        Ok(h) => table.last_row.min(h - 1),
        Err(_) => table.last_row,
    };

    let mut rows = Vec::new();
    for row in table.first_row..=last_row {
        let is_vendor = grid
            .get(row, table.name.col)
            .map(|c| !c.is_blank())
            .unwrap_or(false);
        if !is_vendor {
            continue;
        }

        let values = columns
            .iter()
            .map(|c| {
                let slot = Slot {
                    column: &c.column,
                    row,
                    col: c.col,
                    format: c.format,
                    blank: None,
                    placeholder: c.placeholder,
                };
                let cell = grid.get(row, c.col).ok_or_else(|| out_of_range(&slot))?;
                resolve(cell, &slot)
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(values);
    }

    Ok(rows)
}

fn out_of_range(slot: &Slot<'_>) -> CleanError {
    CleanError::CellOutOfRange {
        field: slot.column.to_string(),
        row: slot.row,
        col: slot.col,
    }
}
