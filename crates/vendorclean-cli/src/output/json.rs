use vendorclean_core::error::CleanError;
use vendorclean_core::model::RecordSet;

pub fn print(records: &RecordSet) -> Result<(), CleanError> {
    let json = serde_json::to_string_pretty(records)?;
    println!("{json}");
    Ok(())
}
