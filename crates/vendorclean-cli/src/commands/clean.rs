use std::path::PathBuf;
use tracing::warn;
use vendorclean_core::archive::ArchiveClock;
use vendorclean_core::batch::UploadedFile;
use vendorclean_core::error::CleanError;
use vendorclean_core::extraction::grid::ReaderOptions;

use crate::commands::{read_upload, resolve_template};

pub struct CleanArgs {
    pub input_files: Vec<PathBuf>,
    pub template: String,
    pub template_file: Option<PathBuf>,
    pub sheet: Option<String>,
    pub out_dir: PathBuf,
    pub timezone: String,
}

/// Clean the batch and write the archive. Returns the archive path.
pub fn run(args: CleanArgs) -> Result<PathBuf, CleanError> {
    let template = resolve_template(&args.template, args.template_file.as_deref())?;
    let clock = ArchiveClock::with_timezone(&args.timezone)?;
    let options = ReaderOptions { sheet: args.sheet };

    // An unreadable path is one more failed file, not a fatal error.
    let mut uploads: Vec<UploadedFile> = Vec::with_capacity(args.input_files.len());
    let mut unreadable = 0;
    for path in &args.input_files {
        match read_upload(path) {
            Ok(upload) => uploads.push(upload),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read input");
                eprintln!("error with file {}: {e}", path.display());
                unreadable += 1;
            }
        }
    }

    let run = vendorclean_core::clean_and_package(&uploads, &template, &options, &clock)?;

    for failure in &run.report.failures {
        eprintln!("error with file {}: {}", failure.file_name, failure.error);
    }

    std::fs::create_dir_all(&args.out_dir)?;
    let archive_path = args.out_dir.join(&run.archive.name);
    std::fs::write(&archive_path, &run.archive.bytes)?;

    println!("Total files processed: {}", run.archive.entries);
    if unreadable + run.report.failures.len() > 0 {
        println!(
            "Skipped {} file(s)",
            unreadable + run.report.failures.len()
        );
    }
    println!("Archive written to {}", archive_path.display());

    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_inputs_still_produce_archive() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.xlsx");
        std::fs::write(&broken, b"nope").unwrap();

        let path = run(CleanArgs {
            input_files: vec![broken, dir.path().join("missing.xlsx")],
            template: "invoice".into(),
            template_file: None,
            sheet: None,
            out_dir: dir.path().join("out"),
            timezone: "America/New_York".into(),
        })
        .unwrap();

        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("cleaned_files_") && name.ends_with(".zip"));
    }

    #[test]
    fn test_bad_timezone_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(CleanArgs {
            input_files: vec![],
            template: "invoice".into(),
            template_file: None,
            sheet: None,
            out_dir: dir.path().to_path_buf(),
            timezone: "Mars/Olympus".into(),
        });
        assert!(matches!(result, Err(CleanError::InvalidTimezone(_))));
    }
}
