//! XLSX workbook export.
//!
//! One workbook per clinic with three sheets, columns matching the CSV
//! downloads: Stock, DispatchLog, MonthlyReport.

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use medstock_ledger::{DispatchRecord, MonthlyReportRow, StockEntry};

use crate::csv_export::{DISPATCH_HEADERS, ExportError, REPORT_HEADERS, STOCK_HEADERS};

pub const STOCK_SHEET_NAME: &str = "Stock";
pub const DISPATCH_SHEET_NAME: &str = "DispatchLog";
pub const REPORT_SHEET_NAME: &str = "MonthlyReport";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Build the full clinic workbook and return the serialized `.xlsx` bytes.
pub fn workbook_bytes(
    stock: &[StockEntry],
    dispatch_log: &[DispatchRecord],
    report: &[MonthlyReportRow],
) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(STOCK_SHEET_NAME)?;
        write_headers(sheet, &STOCK_HEADERS, &header_format)?;

        for (i, entry) in stock.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, &entry.name)?;
            sheet.write_number(row, 1, f64::from(entry.quantity))?;
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(DISPATCH_SHEET_NAME)?;
        write_headers(sheet, &DISPATCH_HEADERS, &header_format)?;

        for (i, record) in dispatch_log.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, record.id.to_string())?;
            sheet.write_string(row, 1, &record.transaction_number)?;
            sheet.write_string(row, 2, &record.medicine_name)?;
            sheet.write_number(row, 3, f64::from(record.count))?;
            sheet.write_string(
                row,
                4,
                record.dispatched_at.format(TIMESTAMP_FORMAT).to_string(),
            )?;
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(REPORT_SHEET_NAME)?;
        write_headers(sheet, &REPORT_HEADERS, &header_format)?;

        for (i, row_data) in report.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, &row_data.medicine_name)?;
            sheet.write_string(row, 1, &row_data.month)?;
            sheet.write_number(row, 2, row_data.total as f64)?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    Ok(bytes)
}

fn write_headers(
    sheet: &mut Worksheet,
    headers: &[&str],
    format: &Format,
) -> Result<(), ExportError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use medstock_core::DispatchId;

    use super::*;

    #[test]
    fn workbook_builds_with_all_three_sheets() {
        let stock = vec![StockEntry::new("Paracetamol", 20)];
        let log = vec![DispatchRecord {
            id: DispatchId::new(),
            transaction_number: "TR1".to_string(),
            medicine_name: "Paracetamol".to_string(),
            count: 5,
            dispatched_at: Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap(),
        }];
        let report = vec![MonthlyReportRow {
            medicine_name: "Paracetamol".to_string(),
            month: "July 2025".to_string(),
            total: 5,
        }];

        let bytes = workbook_bytes(&stock, &log, &report).unwrap();

        // XLSX is a zip container; checking the magic is enough to know the
        // workbook serialized.
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn empty_tables_still_produce_a_workbook() {
        let bytes = workbook_bytes(&[], &[], &[]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
