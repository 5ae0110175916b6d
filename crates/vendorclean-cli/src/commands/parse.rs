use std::path::PathBuf;
use vendorclean_core::batch::clean_file;
use vendorclean_core::error::CleanError;
use vendorclean_core::extraction::grid::ReaderOptions;

use crate::commands::{read_upload, resolve_template};
use crate::output;

pub fn run(
    input_file: PathBuf,
    template: &str,
    template_file: Option<PathBuf>,
    sheet: Option<String>,
    output_format: &str,
) -> Result<(), CleanError> {
    let template = resolve_template(template, template_file.as_deref())?;
    let upload = read_upload(&input_file)?;
    let records = clean_file(&upload, &template, &ReaderOptions { sheet })?;

    match output_format {
        "json" => output::json::print(&records)?,
        _ => println!("{}", output::table::format_records(&records)),
    }

    Ok(())
}
