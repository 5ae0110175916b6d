use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::batch::BatchReport;
use crate::error::CleanError;
use crate::templates::schema::TemplateDef;
use crate::writer::write_record_set;

/// Timezone the archive timestamp is rendered in unless overridden.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Source of the archive timestamp.
#[derive(Debug, Clone)]
pub struct ArchiveClock {
    pub timezone: Tz,
    /// Freeze the clock at this instant instead of reading the system time.
    pub fixed: Option<DateTime<Utc>>,
}

impl Default for ArchiveClock {
    fn default() -> Self {
        ArchiveClock {
            timezone: DEFAULT_TIMEZONE,
            fixed: None,
        }
    }
}

impl ArchiveClock {
    /// Clock for an IANA timezone name such as `America/Chicago`.
    pub fn with_timezone(name: &str) -> Result<Self, CleanError> {
        let timezone = name
            .parse::<Tz>()
            .map_err(|_| CleanError::InvalidTimezone(name.to_string()))?;
        Ok(ArchiveClock {
            timezone,
            fixed: None,
        })
    }

    pub fn now(&self) -> DateTime<Tz> {
        self.fixed
            .unwrap_or_else(Utc::now)
            .with_timezone(&self.timezone)
    }
}

/// A finished zip archive, ready to be saved or sent.
#[derive(Debug, Clone)]
pub struct Archive {
    pub name: String,
    pub bytes: Vec<u8>,
    /// Number of spreadsheets inside.
    pub entries: usize,
}

/// `cleaned_files_MM-DD-YYYY_HH.MMAM.zip`, on a 12-hour clock.
pub fn archive_name(timestamp: &DateTime<Tz>) -> String {
    format!("cleaned_files_{}.zip", timestamp.format("%m-%d-%Y_%I.%M%p"))
}

pub fn entry_name(stem: &str, template: &TemplateDef) -> String {
    format!("{stem}{}.xlsx", template.entry_suffix)
}

/// Bundle one formatted spreadsheet per cleaned file into a zip archive.
///
/// An empty batch still produces a valid, empty archive.
pub fn package(
    report: &BatchReport,
    template: &TemplateDef,
    clock: &ArchiveClock,
) -> Result<Archive, CleanError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0;
    for cleaned in &report.cleaned {
        let xlsx = write_record_set(&cleaned.records)?;
        let name = entry_name(&cleaned.name, template);
        zip.start_file(name.as_str(), options)?;
        zip.write_all(&xlsx)?;
        debug!(entry = %name, bytes = xlsx.len(), "added archive entry");
        entries += 1;
    }

    let bytes = zip.finish()?.into_inner();

    Ok(Archive {
        name: archive_name(&clock.now()),
        bytes,
        entries,
    })
}
