use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use medstock_core::DispatchId;

/// One dispatch event in a clinic's dispatch log.
///
/// The log is append-mostly and insertion-ordered; records are identified by
/// their stable [`DispatchId`], never by row position. `medicine_name` holds
/// the stock table's canonical spelling of the matched entry, so a later
/// reversal and the monthly report agree with the stock table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRecord {
    pub id: DispatchId,
    pub transaction_number: String,
    pub medicine_name: String,
    pub count: u32,
    pub dispatched_at: DateTime<Utc>,
}

/// Year+month filter over dispatch timestamps (e.g. 2025-07).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthFilter {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
}

impl MonthFilter {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn matches(&self, at: &DateTime<Utc>) -> bool {
        at.year() == self.year && at.month() == self.month
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn filter_matches_same_year_and_month_only() {
        let filter = MonthFilter::new(2025, 7);

        let july = Utc.with_ymd_and_hms(2025, 7, 15, 9, 30, 0).unwrap();
        let august = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let july_prev_year = Utc.with_ymd_and_hms(2024, 7, 15, 9, 30, 0).unwrap();

        assert!(filter.matches(&july));
        assert!(!filter.matches(&august));
        assert!(!filter.matches(&july_prev_year));
    }
}
