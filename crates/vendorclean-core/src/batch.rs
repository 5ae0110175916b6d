use tracing::{debug, info, warn};

use crate::error::CleanError;
use crate::extraction::extract;
use crate::extraction::grid::{read_grid, ReaderOptions};
use crate::model::RecordSet;
use crate::records::{build_records, file_stem};
use crate::templates::schema::TemplateDef;

/// A spreadsheet handed in for cleaning.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name as uploaded, including the extension.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadedFile {
            name: name.into(),
            bytes,
        }
    }
}

/// Records cleaned out of one file, keyed by the file's stem.
#[derive(Debug, Clone)]
pub struct CleanedFile {
    pub name: String,
    pub records: RecordSet,
}

/// A file that was left out of the batch, and why.
#[derive(Debug)]
pub struct FileFailure {
    pub file_name: String,
    pub error: CleanError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successful files in upload order.
    pub cleaned: Vec<CleanedFile>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    /// Number of files that will be packaged.
    pub fn count(&self) -> usize {
        self.cleaned.len()
    }
}

/// Read, extract and reshape a single file.
pub fn clean_file(
    file: &UploadedFile,
    template: &TemplateDef,
    options: &ReaderOptions,
) -> Result<RecordSet, CleanError> {
    let grid = read_grid(&file.bytes, options)?;
    let extracted = extract(&grid, template)?;
    let stem = file_stem(&file.name);
    let records = build_records(template, extracted, stem);
    debug!(
        file = %file.name,
        rows = grid.height(),
        records = records.len(),
        "cleaned file"
    );
    Ok(records)
}

/// Clean every file independently, in order.
///
/// A failing file is recorded in `BatchReport::failures` and skipped; it
/// never affects the other files. Two files with the same stem share one
/// slot: the later one replaces the earlier.
pub fn process_batch(
    files: &[UploadedFile],
    template: &TemplateDef,
    options: &ReaderOptions,
) -> BatchReport {
    let mut report = BatchReport::default();

    for file in files {
        match clean_file(file, template, options) {
            Ok(records) => {
                let name = records.source.clone();
                match report.cleaned.iter_mut().find(|c| c.name == name) {
                    Some(existing) => {
                        warn!(file = %file.name, stem = %name, "replacing earlier file with the same name");
                        existing.records = records;
                    }
                    None => report.cleaned.push(CleanedFile { name, records }),
                }
            }
            Err(error) => {
                warn!(file = %file.name, %error, "skipping file");
                report.failures.push(FileFailure {
                    file_name: file.name.clone(),
                    error,
                });
            }
        }
    }

    info!(
        template = %template.name,
        cleaned = report.count(),
        failed = report.failures.len(),
        "batch finished"
    );
    report
}
