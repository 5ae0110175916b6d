pub mod archive;
pub mod batch;
pub mod error;
pub mod extraction;
pub mod model;
pub mod records;
pub mod templates;
pub mod writer;

use archive::{Archive, ArchiveClock};
use batch::{BatchReport, UploadedFile};
use error::CleanError;
use extraction::grid::ReaderOptions;
use templates::schema::TemplateDef;

/// Result of cleaning and packaging one batch.
#[derive(Debug)]
pub struct CleanRun {
    pub report: BatchReport,
    pub archive: Archive,
}

/// Main API entry point: clean every file and bundle the results.
///
/// Per-file failures end up in `CleanRun::report` and never abort the run.
/// An error is returned only when the archive itself cannot be built.
pub fn clean_and_package(
    files: &[UploadedFile],
    template: &TemplateDef,
    options: &ReaderOptions,
    clock: &ArchiveClock,
) -> Result<CleanRun, CleanError> {
    let report = batch::process_batch(files, template, options);
    let archive = archive::package(&report, template, clock)?;
    Ok(CleanRun { report, archive })
}
