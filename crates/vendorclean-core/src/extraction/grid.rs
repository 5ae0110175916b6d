use std::collections::BTreeMap;
use std::io::Cursor;

use calamine::{Data, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::CleanError;
use crate::model::Cell;

/// Options controlling which sheet of a workbook becomes the grid.
#[derive(Debug, Clone, Default)]
pub struct ReaderOptions {
    /// Sheet to read. `None` reads the first sheet in the workbook.
    pub sheet: Option<String>,
}

/// A rectangular block of cells addressed by absolute sheet coordinates.
///
/// Row 0 is the first row of the sheet; nothing is promoted to a header.
/// Only non-empty cells are stored. Every other position inside the
/// rectangle reads as `Cell::Empty`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    cells: BTreeMap<(u32, u32), Cell>,
    height: usize,
    width: usize,
}

static EMPTY: Cell = Cell::Empty;

impl Grid {
    /// Build a grid from rows of cells. Short rows count as padded with
    /// `Cell::Empty` up to the widest row.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Grid {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let cells = rows
            .into_iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.into_iter()
                    .enumerate()
                    .map(move |(c, cell)| ((r as u32, c as u32), cell))
            })
            .filter(|(_, cell)| *cell != Cell::Empty)
            .collect();
        Grid {
            cells,
            height,
            width,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&Cell> {
        if row as usize >= self.height || col as usize >= self.width {
            return None;
        }
        Some(self.cells.get(&(row, col)).unwrap_or(&EMPTY))
    }
}

/// Load the selected sheet of a workbook (xlsx, xlsm, xlsb, xls or ods) into a grid.
pub fn read_grid(bytes: &[u8], options: &ReaderOptions) -> Result<Grid, CleanError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| CleanError::Parse(format!("unsupported or corrupted workbook: {e}")))?;

    let sheet_name = match &options.sheet {
        Some(name) => name.clone(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| CleanError::Parse("workbook contains no sheets".into()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| CleanError::Parse(format!("sheet '{sheet_name}' not readable: {e}")))?;

    // calamine trims the range to the used area and indexes `used_cells`
    // from its start; shift back to A1 so template offsets stay absolute.
    let (Some((first_row, first_col)), Some((last_row, last_col))) = (range.start(), range.end())
    else {
        return Ok(Grid::default());
    };

    let cells = range
        .used_cells()
        .map(|(r, c, data)| {
            (
                (first_row + r as u32, first_col + c as u32),
                cell_from_data(data),
            )
        })
        .filter(|(_, cell)| *cell != Cell::Empty)
        .collect();

    Ok(Grid {
        cells,
        height: last_row as usize + 1,
        width: last_col as usize + 1,
    })
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => Cell::DateTime(ndt),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_datetime(s).map_or_else(|| Cell::Text(s.clone()), Cell::DateTime),
        Data::Error(e) => Cell::Error(format!("{e:?}")),
        _ => Cell::Text(data.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}
