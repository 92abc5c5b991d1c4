//! Monthly dispatch aggregation.

use std::collections::HashMap;

use chrono::Datelike;
use serde::Serialize;

use crate::dispatch::DispatchRecord;

/// One row of the monthly report: total dispatched count for a medicine in
/// one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyReportRow {
    pub medicine_name: String,
    /// Human-readable month label, e.g. "July 2025".
    pub month: String,
    pub total: u64,
}

/// Group dispatch records by (medicine name, month), summing counts.
///
/// Row order is deterministic: medicine name ascending (case-insensitive),
/// then month in chronological order.
pub fn monthly_report(records: &[DispatchRecord]) -> Vec<MonthlyReportRow> {
    let mut totals: HashMap<(String, i32, u32), u64> = HashMap::new();

    for record in records {
        let key = (
            record.medicine_name.clone(),
            record.dispatched_at.year(),
            record.dispatched_at.month(),
        );
        *totals.entry(key).or_insert(0) += u64::from(record.count);
    }

    let mut keyed: Vec<((String, i32, u32), u64)> = totals.into_iter().collect();
    keyed.sort_by(|((name_a, year_a, month_a), _), ((name_b, year_b, month_b), _)| {
        name_a
            .to_lowercase()
            .cmp(&name_b.to_lowercase())
            .then_with(|| name_a.cmp(name_b))
            .then_with(|| (year_a, month_a).cmp(&(year_b, month_b)))
    });

    keyed
        .into_iter()
        .map(|((name, year, month), total)| MonthlyReportRow {
            medicine_name: name,
            month: month_label(year, month),
            total,
        })
        .collect()
}

fn month_label(year: i32, month: u32) -> String {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    // `month` comes from chrono's Datelike::month, always 1..=12.
    let name = MONTHS
        .get((month as usize).saturating_sub(1))
        .copied()
        .unwrap_or("Unknown");
    format!("{name} {year}")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use medstock_core::DispatchId;

    use super::*;

    fn record(name: &str, count: u32, year: i32, month: u32, day: u32) -> DispatchRecord {
        DispatchRecord {
            id: DispatchId::new(),
            transaction_number: "TR1".to_string(),
            medicine_name: name.to_string(),
            count,
            dispatched_at: Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn groups_by_medicine_and_month() {
        let records = vec![
            record("Aspirin", 10, 2025, 7, 1),
            record("Aspirin", 5, 2025, 7, 15),
            record("Aspirin", 3, 2025, 8, 1),
        ];

        let report = monthly_report(&records);

        assert_eq!(
            report,
            vec![
                MonthlyReportRow {
                    medicine_name: "Aspirin".to_string(),
                    month: "July 2025".to_string(),
                    total: 15,
                },
                MonthlyReportRow {
                    medicine_name: "Aspirin".to_string(),
                    month: "August 2025".to_string(),
                    total: 3,
                },
            ]
        );
    }

    #[test]
    fn rows_sorted_by_name_then_month() {
        let records = vec![
            record("zinc", 1, 2025, 3, 1),
            record("Aspirin", 2, 2025, 12, 1),
            record("Aspirin", 4, 2025, 1, 1),
            record("Ibuprofen", 7, 2024, 12, 1),
        ];

        let report = monthly_report(&records);
        let rows: Vec<(&str, &str)> = report
            .iter()
            .map(|r| (r.medicine_name.as_str(), r.month.as_str()))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("Aspirin", "January 2025"),
                ("Aspirin", "December 2025"),
                ("Ibuprofen", "December 2024"),
                ("zinc", "March 2025"),
            ]
        );
    }

    #[test]
    fn empty_log_yields_empty_report() {
        assert!(monthly_report(&[]).is_empty());
    }
}
