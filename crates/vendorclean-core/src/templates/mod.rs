pub mod builtin;
pub mod schema;

use crate::error::CleanError;
use schema::TemplateDef;
use std::collections::HashSet;
use std::path::Path;

/// Load a template descriptor from a JSON file.
pub fn load_template(path: &Path) -> Result<TemplateDef, CleanError> {
    let content = std::fs::read_to_string(path).map_err(|e| CleanError::TemplateLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let template: TemplateDef =
        serde_json::from_str(&content).map_err(|e| CleanError::TemplateLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_template(&template)?;
    Ok(template)
}

/// Parse a template descriptor from a JSON string (no file path context).
pub fn parse_template_str(json: &str) -> Result<TemplateDef, CleanError> {
    let template: TemplateDef = serde_json::from_str(json)?;
    validate_template(&template)?;
    Ok(template)
}

/// Validate that a template is well-formed.
pub fn validate_template(template: &TemplateDef) -> Result<(), CleanError> {
    if template.name.trim().is_empty() {
        return Err(CleanError::TemplateInvalid(
            "name must not be empty".into(),
        ));
    }

    if template.table.first_row > template.table.last_row {
        return Err(CleanError::TemplateInvalid(format!(
            "table first_row {} is after last_row {}",
            template.table.first_row, template.table.last_row
        )));
    }

    if !template.header.iter().any(|f| f.column == template.prime_field) {
        return Err(CleanError::TemplateInvalid(format!(
            "prime_field '{}' does not name a header field",
            template.prime_field
        )));
    }

    let mut seen = HashSet::new();
    for column in template.output_columns() {
        if column.is_empty() {
            return Err(CleanError::TemplateInvalid(
                "column names must not be empty".into(),
            ));
        }
        if !seen.insert(column.clone()) {
            return Err(CleanError::TemplateInvalid(format!(
                "duplicate output column '{column}'"
            )));
        }
    }

    Ok(())
}
