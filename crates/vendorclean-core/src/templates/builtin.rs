use crate::error::CleanError;
use crate::templates::parse_template_str;
use crate::templates::schema::TemplateDef;

const INVOICE_JSON: &str = include_str!("../../../../templates/abi-invoice.json");
const BID_JSON: &str = include_str!("../../../../templates/bid-compliance.json");

/// Available predefined templates.
pub const PRESETS: &[&str] = &["invoice", "bid"];

/// Preset used when no template is specified.
pub const DEFAULT_PRESET: &str = "invoice";

/// Load a predefined template by name.
pub fn load_preset(name: &str) -> Result<TemplateDef, CleanError> {
    match name {
        "invoice" => parse_template_str(INVOICE_JSON),
        "bid" => parse_template_str(BID_JSON),
        _ => Err(CleanError::TemplateInvalid(format!(
            "unknown template '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}
