//! CSV encoding/decoding.
//!
//! Download and upload share one column layout per table, so a stock export
//! can be edited and uploaded back unchanged.

use thiserror::Error;

use medstock_ledger::{DispatchRecord, MonthlyReportRow, StockEntry};

pub const STOCK_HEADERS: [&str; 2] = ["Medicine", "Quantity"];

pub const DISPATCH_HEADERS: [&str; 5] = [
    "Dispatch Id",
    "Transaction No",
    "Medicine",
    "Count",
    "Timestamp",
];

pub const REPORT_HEADERS: [&str; 3] = ["Medicine", "Month", "Total Dispatched"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("output is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("invalid upload row {line}: {message}")]
    InvalidRow { line: usize, message: String },
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Encode a stock table as CSV.
pub fn stock_to_csv(entries: &[StockEntry]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(STOCK_HEADERS)?;
    for entry in entries {
        writer.write_record([entry.name.as_str(), &entry.quantity.to_string()])?;
    }
    into_string(writer)
}

/// Encode a dispatch log as CSV.
pub fn dispatch_log_to_csv(records: &[DispatchRecord]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(DISPATCH_HEADERS)?;
    for record in records {
        writer.write_record([
            record.id.to_string().as_str(),
            &record.transaction_number,
            &record.medicine_name,
            &record.count.to_string(),
            &record.dispatched_at.format(TIMESTAMP_FORMAT).to_string(),
        ])?;
    }
    into_string(writer)
}

/// Encode a monthly report as CSV.
pub fn report_to_csv(rows: &[MonthlyReportRow]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_HEADERS)?;
    for row in rows {
        writer.write_record([
            row.medicine_name.as_str(),
            &row.month,
            &row.total.to_string(),
        ])?;
    }
    into_string(writer)
}

/// Parse a bulk stock upload (same layout as [`stock_to_csv`] output).
///
/// The header row is required. Quantities must parse as non-negative
/// integers; the row's 1-based line number is reported on failure so the
/// uploader can fix the file.
pub fn parse_stock_csv(input: &str) -> Result<Vec<StockEntry>, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let mut entries = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Header is line 1; data starts on line 2.
        let line = idx + 2;
        let record = result?;

        let name = record
            .get(0)
            .filter(|n| !n.is_empty())
            .ok_or(ExportError::InvalidRow {
                line,
                message: "missing medicine name".to_string(),
            })?;
        let quantity: u32 = record
            .get(1)
            .unwrap_or_default()
            .parse()
            .map_err(|_| ExportError::InvalidRow {
                line,
                message: format!(
                    "quantity must be a non-negative integer, got '{}'",
                    record.get(1).unwrap_or_default()
                ),
            })?;

        entries.push(StockEntry::new(name, quantity));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use medstock_core::DispatchId;
    use medstock_ledger::monthly_report;

    use super::*;

    #[test]
    fn stock_csv_round_trips_through_upload_parser() {
        let entries = vec![
            StockEntry::new("Paracetamol", 20),
            StockEntry::new("Aspirin", 0),
        ];

        let csv = stock_to_csv(&entries).unwrap();
        assert!(csv.starts_with("Medicine,Quantity\n"));

        let parsed = parse_stock_csv(&csv).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn upload_rejects_negative_quantity_with_line_number() {
        let input = "Medicine,Quantity\nAspirin,10\nParacetamol,-3\n";

        let err = parse_stock_csv(input).unwrap_err();
        match err {
            ExportError::InvalidRow { line, .. } => assert_eq!(line, 3),
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn upload_rejects_missing_name() {
        let input = "Medicine,Quantity\n,10\n";
        assert!(matches!(
            parse_stock_csv(input),
            Err(ExportError::InvalidRow { line: 2, .. })
        ));
    }

    #[test]
    fn dispatch_csv_uses_spreadsheet_timestamp_format() {
        let record = DispatchRecord {
            id: DispatchId::new(),
            transaction_number: "TR1".to_string(),
            medicine_name: "Aspirin".to_string(),
            count: 5,
            dispatched_at: Utc.with_ymd_and_hms(2025, 7, 1, 9, 30, 0).unwrap(),
        };

        let csv = dispatch_log_to_csv(&[record]).unwrap();
        assert!(csv.contains("TR1,Aspirin,5,2025-07-01 09:30:00"));
    }

    #[test]
    fn report_csv_rows_follow_report_order() {
        let records = vec![
            DispatchRecord {
                id: DispatchId::new(),
                transaction_number: "TR1".to_string(),
                medicine_name: "Aspirin".to_string(),
                count: 10,
                dispatched_at: Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap(),
            },
            DispatchRecord {
                id: DispatchId::new(),
                transaction_number: "TR2".to_string(),
                medicine_name: "Aspirin".to_string(),
                count: 3,
                dispatched_at: Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap(),
            },
        ];

        let csv = report_to_csv(&monthly_report(&records)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Medicine,Month,Total Dispatched",
                "Aspirin,July 2025,10",
                "Aspirin,August 2025,3",
            ]
        );
    }
}
