//! End-to-end tests: fixture workbooks are generated with rust_xlsxwriter,
//! pushed through the batch pipeline and read back out of the archive.

use std::io::{Cursor, Read};

use calamine::{Reader, Xlsx};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use vendorclean_core::archive::ArchiveClock;
use vendorclean_core::batch::{clean_file, process_batch, UploadedFile};
use vendorclean_core::clean_and_package;
use vendorclean_core::error::CleanError;
use vendorclean_core::extraction::grid::{read_grid, ReaderOptions};
use vendorclean_core::model::RecordSet;
use vendorclean_core::templates::builtin::load_preset;
use vendorclean_core::writer::SHEET_NAME;
use zip::ZipArchive;

struct Vendor {
    row: u32,
    name: &'static str,
    certification: &'static str,
    newly_added: &'static str,
}

fn vendor(row: u32, name: &'static str) -> Vendor {
    Vendor {
        row,
        name,
        certification: "DBE",
        newly_added: "No",
    }
}

/// Build an invoice-template workbook with the prime contractor "Acme Co".
fn invoice_xlsx(vendors: &[Vendor], work_order: Option<&str>) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let ws = workbook.add_worksheet();

    let labels = [
        "Invoice Date",
        "Vendor Invoice #",
        "Contract Name",
        "Contract #",
        "Project/WO Name",
        "Project #",
        "WO #",
        "Contract/WO Amount",
        "Current Invoice Amount",
        "Cost Code",
        "Prime Contractor",
    ];
    for (row, label) in labels.iter().enumerate() {
        ws.write_string(row as u32, 0, *label).unwrap();
    }

    let date = ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
    ws.write_datetime_with_format(0, 1, &date, &date_format).unwrap();
    ws.write_string(1, 1, "INV-0042").unwrap();
    ws.write_string(2, 1, "Airfield Paving").unwrap();
    ws.write_number(3, 1, 77120.0).unwrap();
    ws.write_string(4, 1, "Taxiway B").unwrap();
    ws.write_number(5, 1, 5501.0).unwrap();
    if let Some(wo) = work_order {
        ws.write_string(6, 1, wo).unwrap();
    }
    ws.write_number(7, 1, 2_500_000.0).unwrap();
    ws.write_number(8, 1, 12345.67).unwrap();
    ws.write_string(9, 1, "CC-19").unwrap();
    ws.write_string(10, 1, "Acme Co").unwrap();

    let table_headers = [
        "Vendor", "Cert", "Race", "Additional", "Net Invoice", "Net Contracted", "To Date",
        "Newly added",
    ];
    for (col, h) in table_headers.iter().enumerate() {
        ws.write_string(12, col as u16, *h).unwrap();
    }

    let mut total = 0.0;
    for v in vendors {
        ws.write_string(v.row, 0, v.name).unwrap();
        ws.write_string(v.row, 1, v.certification).unwrap();
        ws.write_string(v.row, 2, "Select").unwrap();
        ws.write_number(v.row, 4, 1000.0).unwrap();
        ws.write_number(v.row, 5, 20000.0).unwrap();
        ws.write_number(v.row, 6, 5000.5).unwrap();
        if !v.newly_added.is_empty() {
            ws.write_string(v.row, 7, v.newly_added).unwrap();
        }
        total += 1000.0;
    }
    ws.write_string(33, 0, "Total").unwrap();
    ws.write_number(33, 4, total).unwrap();

    workbook.save_to_buffer().unwrap()
}

fn clean_invoice(bytes: Vec<u8>) -> RecordSet {
    let template = load_preset("invoice").unwrap();
    clean_file(
        &UploadedFile::new("march.xlsx", bytes),
        &template,
        &ReaderOptions::default(),
    )
    .unwrap()
}

fn column(rs: &RecordSet, name: &str) -> Vec<String> {
    (0..rs.len())
        .map(|i| rs.value(i, name).map(|v| v.to_string()).unwrap_or_default())
        .collect()
}

// ---------------------------------------------------------------------------
// Prime/Sub classification and date rendering on the invoice template
// ---------------------------------------------------------------------------
#[test]
fn invoice_prime_and_sub_rows() {
    let rs = clean_invoice(invoice_xlsx(&[vendor(13, "Acme Co"), vendor(14, "Beta LLC")], None));

    assert_eq!(rs.len(), 2);
    assert_eq!(column(&rs, "Prime/Sub"), vec!["Prime", "Sub"]);
    assert_eq!(column(&rs, "Invoice Date"), vec!["01/15/2024", "01/15/2024"]);
    assert_eq!(column(&rs, "Vendor/Subcontractor"), vec!["Acme Co", "Beta LLC"]);
    assert_eq!(column(&rs, "Original file name"), vec!["march", "march"]);
}

// ---------------------------------------------------------------------------
// Blank rows inside the table body do not end it
// ---------------------------------------------------------------------------
#[test]
fn invoice_rows_after_gaps_are_kept() {
    let rs = clean_invoice(invoice_xlsx(
        &[vendor(13, "A"), vendor(20, "B"), vendor(31, "C")],
        Some("WO-9"),
    ));

    assert_eq!(column(&rs, "Vendor/Subcontractor"), vec!["A", "B", "C"]);
    assert_eq!(column(&rs, "ABI Work Order #"), vec!["WO-9"; 3]);
    assert_eq!(column(&rs, "Invoice Total"), vec!["$3,000.00"; 3]);
}

// ---------------------------------------------------------------------------
// Placeholder handling and currency rendering
// ---------------------------------------------------------------------------
#[test]
fn invoice_placeholders_and_currency() {
    let vendors = [
        Vendor {
            row: 13,
            name: "Acme Co",
            certification: "Select",
            newly_added: "",
        },
        vendor(15, "Gamma Inc"),
    ];
    let rs = clean_invoice(invoice_xlsx(&vendors, None));

    assert_eq!(column(&rs, "Certification"), vec!["N/A", "DBE"]);
    assert_eq!(column(&rs, "Race/Ethnicity"), vec!["N/A", "N/A"]);
    assert_eq!(column(&rs, "Additional DBE Types"), vec!["N/A", "N/A"]);
    assert_eq!(column(&rs, "Newly added?"), vec!["N/A", "No"]);
    assert_eq!(column(&rs, "ABI Work Order #"), vec!["N/A", "N/A"]);
    assert_eq!(column(&rs, "ABI Contract #"), vec!["77120", "77120"]);
    assert_eq!(column(&rs, "Current Invoice Amount"), vec!["$12,345.67"; 2]);
    assert_eq!(column(&rs, "Total Contract/Work Order Amt"), vec!["$2,500,000.00"; 2]);
    assert_eq!(column(&rs, "Total Invoiced to Date ($)"), vec!["$5,000.50"; 2]);
}

// ---------------------------------------------------------------------------
// A corrupted file is reported and skipped; the good file is untouched
// ---------------------------------------------------------------------------
#[test]
fn batch_isolates_corrupted_file() {
    let template = load_preset("invoice").unwrap();
    let good = invoice_xlsx(&[vendor(13, "Acme Co"), vendor(14, "Beta LLC")], None);
    let alone = clean_invoice(good.clone());

    let files = vec![
        UploadedFile::new("good.xlsx", good),
        UploadedFile::new("broken.xlsx", b"PK\x03\x04 truncated".to_vec()),
    ];
    let run = clean_and_package(&files, &template, &ReaderOptions::default(), &ArchiveClock::default())
        .unwrap();

    assert_eq!(run.report.count(), 1);
    assert_eq!(run.report.failures.len(), 1);
    assert_eq!(run.report.failures[0].file_name, "broken.xlsx");
    assert!(matches!(run.report.failures[0].error, CleanError::Parse(_)));

    let cleaned = &run.report.cleaned[0].records;
    assert_eq!(cleaned.len(), alone.len());
    for name in &alone.columns {
        if name != "Original file name" {
            assert_eq!(column(cleaned, name), column(&alone, name), "column {name}");
        }
    }

    let mut zip = ZipArchive::new(Cursor::new(run.archive.bytes)).unwrap();
    assert_eq!(run.archive.entries, 1);
    assert_eq!(zip.len(), 1);
    assert_eq!(zip.by_index(0).unwrap().name(), "good_clean.xlsx");
}

// ---------------------------------------------------------------------------
// Archive entries re-read with the defined header row
// ---------------------------------------------------------------------------
#[test]
fn archive_entry_header_round_trips() {
    let template = load_preset("invoice").unwrap();
    let files = vec![UploadedFile::new(
        "april.xlsx",
        invoice_xlsx(&[vendor(13, "Acme Co")], None),
    )];
    let run = clean_and_package(&files, &template, &ReaderOptions::default(), &ArchiveClock::default())
        .unwrap();

    let mut zip = ZipArchive::new(Cursor::new(run.archive.bytes)).unwrap();
    let mut xlsx = Vec::new();
    zip.by_name("april_clean.xlsx")
        .unwrap()
        .read_to_end(&mut xlsx)
        .unwrap();

    let mut wb: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(xlsx)).unwrap();
    let range = wb.worksheet_range(SHEET_NAME).unwrap();
    let expected = template.output_columns();
    let header: Vec<String> = (0..expected.len() as u32)
        .map(|c| range.get_value((0, c)).map(|d| d.to_string()).unwrap_or_default())
        .collect();
    assert_eq!(header, expected);
    assert_eq!(range.height(), 2);
}

// ---------------------------------------------------------------------------
// A sheet smaller than the template is an extraction failure
// ---------------------------------------------------------------------------
#[test]
fn small_sheet_fails_extraction() {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.write_string(0, 0, "Invoice Date").unwrap();
    ws.write_string(0, 1, "01/15/2024").unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let template = load_preset("invoice").unwrap();
    let report = process_batch(
        &[UploadedFile::new("tiny.xlsx", bytes)],
        &template,
        &ReaderOptions::default(),
    );
    assert_eq!(report.count(), 0);
    assert!(report.failures[0].error.is_extraction());
}

// ---------------------------------------------------------------------------
// Same stem uploaded twice: the later file wins
// ---------------------------------------------------------------------------
#[test]
fn duplicate_stems_keep_latest() {
    let template = load_preset("invoice").unwrap();
    let files = vec![
        UploadedFile::new("may.xlsx", invoice_xlsx(&[vendor(13, "A")], None)),
        UploadedFile::new("may.xls.xlsx", invoice_xlsx(&[vendor(13, "A"), vendor(14, "B")], None)),
    ];
    let report = process_batch(&files, &template, &ReaderOptions::default());
    assert_eq!(report.count(), 1);
    assert_eq!(report.cleaned[0].name, "may");
    assert_eq!(report.cleaned[0].records.len(), 2);
}

// ---------------------------------------------------------------------------
// Bid-compliance template end to end
// ---------------------------------------------------------------------------
/// How the bid template's Date cell is filled in.
enum DateCell {
    Text(&'static str),
    Serial(f64),
}

/// Build a bid-compliance workbook for "Prime Builders" with two contractors.
fn bid_xlsx(date: DateCell) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.write_string(0, 1, "Prime Builders").unwrap();
    ws.write_string(1, 1, "Runway 9 Rehab").unwrap();
    ws.write_string(2, 1, "P-2207").unwrap();
    ws.write_number(3, 1, 1_250_000.0).unwrap();
    for (col, h) in ["Contractor", "Agency", "Cert", "Race", "Group", "Work", "Value"]
        .iter()
        .enumerate()
    {
        ws.write_string(5, col as u16, *h).unwrap();
    }
    ws.write_string(6, 0, "Prime Builders").unwrap();
    ws.write_number(6, 6, 900_000.0).unwrap();
    ws.write_string(8, 0, "Delta Electric").unwrap();
    ws.write_string(8, 1, "GDOT").unwrap();
    ws.write_string(8, 2, "DBE").unwrap();
    ws.write_string(8, 5, "Select").unwrap();
    ws.write_number(8, 6, 350_000.0).unwrap();
    ws.write_string(21, 1, "Pat Doe").unwrap();
    ws.write_string(22, 1, "555-0100").unwrap();
    ws.write_string(23, 1, "pat@example.com").unwrap();
    match date {
        DateCell::Text(text) => ws.write_string(24, 1, text).unwrap(),
        DateCell::Serial(serial) => ws.write_number(24, 1, serial).unwrap(),
    };
    workbook.save_to_buffer().unwrap()
}

#[test]
fn bid_template_end_to_end() {
    let bytes = bid_xlsx(DateCell::Text("2024-03-02"));

    let template = load_preset("bid").unwrap();
    let files = vec![UploadedFile::new("runway.xlsx", bytes)];
    let run = clean_and_package(&files, &template, &ReaderOptions::default(), &ArchiveClock::default())
        .unwrap();

    let rs = &run.report.cleaned[0].records;
    assert_eq!(column(rs, "Prime/Sub"), vec!["Prime", "Sub"]);
    assert_eq!(column(rs, "Certifying Agency"), vec!["", "GDOT"]);
    assert_eq!(column(rs, "Certification"), vec!["N/A", "DBE"]);
    assert_eq!(column(rs, "Description of Work"), vec!["N/A", "N/A"]);
    assert_eq!(column(rs, "Dollar Value"), vec!["$900,000.00", "$350,000.00"]);
    assert_eq!(column(rs, "Date"), vec!["03/02/2024"; 2]);

    let zip = ZipArchive::new(Cursor::new(run.archive.bytes)).unwrap();
    assert_eq!(zip.file_names().collect::<Vec<_>>(), vec!["runway.xlsx"]);
}

// ---------------------------------------------------------------------------
// Reader: missing sheet name
// ---------------------------------------------------------------------------
#[test]
fn missing_sheet_is_parse_error() {
    let bytes = invoice_xlsx(&[vendor(13, "A")], None);
    let options = ReaderOptions {
        sheet: Some("Nope".into()),
    };
    assert!(matches!(read_grid(&bytes, &options), Err(CleanError::Parse(_))));

    let grid = read_grid(&bytes, &ReaderOptions::default()).unwrap();
    assert_eq!(grid.height(), 34);
    assert_eq!(grid.width(), 8);
}

// ---------------------------------------------------------------------------
// Dates no spreadsheet can hold fail their own file, not the batch
// ---------------------------------------------------------------------------
#[test]
fn unwritable_dates_fail_only_their_file() {
    let template = load_preset("bid").unwrap();
    let files = vec![
        UploadedFile::new("good.xlsx", bid_xlsx(DateCell::Text("2024-03-02"))),
        UploadedFile::new("old.xlsx", bid_xlsx(DateCell::Text("01/01/1850"))),
        UploadedFile::new("far.xlsx", bid_xlsx(DateCell::Serial(1e15))),
    ];
    let run = clean_and_package(&files, &template, &ReaderOptions::default(), &ArchiveClock::default())
        .unwrap();

    assert_eq!(run.report.count(), 1);
    let failed: Vec<&str> = run.report.failures.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(failed, vec!["old.xlsx", "far.xlsx"]);
    assert!(run
        .report
        .failures
        .iter()
        .all(|f| matches!(f.error, CleanError::NotDate { ref field, .. } if field == "Date")));

    let zip = ZipArchive::new(Cursor::new(run.archive.bytes)).unwrap();
    assert_eq!(zip.file_names().collect::<Vec<_>>(), vec!["good.xlsx"]);
}
