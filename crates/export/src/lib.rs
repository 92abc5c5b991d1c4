//! File-format encoders for stock tables, dispatch logs and the monthly
//! report: CSV downloads, the CSV bulk-upload parser, and the XLSX workbook.

pub mod csv_export;
pub mod xlsx_export;

pub use csv_export::{
    ExportError, dispatch_log_to_csv, parse_stock_csv, report_to_csv, stock_to_csv,
};
pub use xlsx_export::{DISPATCH_SHEET_NAME, REPORT_SHEET_NAME, STOCK_SHEET_NAME, workbook_bytes};
