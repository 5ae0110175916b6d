pub mod clean;
pub mod parse;
pub mod templates;

use std::path::Path;
use vendorclean_core::batch::UploadedFile;
use vendorclean_core::error::CleanError;
use vendorclean_core::templates::builtin;
use vendorclean_core::templates::schema::TemplateDef;

/// A custom template file wins over the preset name.
pub fn resolve_template(
    preset: &str,
    template_file: Option<&Path>,
) -> Result<TemplateDef, CleanError> {
    match template_file {
        Some(path) => vendorclean_core::templates::load_template(path),
        None => builtin::load_preset(preset),
    }
}

/// Read a file from disk, keeping only its file name for reporting.
pub fn read_upload(path: &Path) -> Result<UploadedFile, CleanError> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedFile::new(name, bytes))
}
