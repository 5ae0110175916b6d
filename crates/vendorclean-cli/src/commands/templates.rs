use std::path::Path;
use vendorclean_core::error::CleanError;
use vendorclean_core::templates::builtin;
use vendorclean_core::templates::schema::FieldFormat;

pub fn list() -> Result<(), CleanError> {
    println!("Available predefined templates:\n");
    for name in builtin::PRESETS {
        let t = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " (default)"
        } else {
            ""
        };
        println!("  {:<8} {} (v{}){}", name, t.name, t.version, default_marker);
        if let Some(ref desc) = t.description {
            println!("           {}", desc);
        }
        println!(
            "           table rows {}-{}, {} output columns",
            t.table.first_row,
            t.table.last_row,
            t.output_columns().len()
        );
        println!();
    }
    Ok(())
}

pub fn show(name: &str) -> Result<(), CleanError> {
    let t = builtin::load_preset(name)?;
    println!("{}", serde_json::to_string_pretty(&t)?);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), CleanError> {
    let t = vendorclean_core::templates::load_template(file)?;

    println!("Template '{}' (v{}) is valid.", t.name, t.version);
    println!("  Header fields: {}", t.header.len());
    println!(
        "  Table: rows {}-{}, {} columns",
        t.table.first_row,
        t.table.last_row,
        t.table.columns.len() + 1
    );
    println!("  Output columns: {}", t.output_columns().join(", "));

    // Warnings only; the template is still usable.
    let mut warnings = Vec::new();
    for f in t.header.iter().chain(t.trailer.iter()) {
        if f.row >= t.table.first_row && f.row <= t.table.last_row {
            warnings.push(format!(
                "field '{}' at row {} sits inside the table body",
                f.column, f.row
            ));
        }
        if f.blank.is_some() && f.format != FieldFormat::Text {
            warnings.push(format!(
                "field '{}' substitutes text into a {:?} field",
                f.column, f.format
            ));
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
