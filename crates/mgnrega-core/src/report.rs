//! Month-by-month comparison of the current fiscal year with the previous one.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Record, ThreeYearResult, CURRENT_YEAR, PREVIOUS_YEAR};

/// Months of an Indian fiscal year, April first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Month {
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
    Jan,
    Feb,
    Mar,
}

impl Month {
    pub const FISCAL_ORDER: [Month; 12] = [
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
        Month::Jan,
        Month::Feb,
        Month::Mar,
    ];

    /// Parse a free-form month label ("Apr", "APRIL", " april ") by its first
    /// three letters.
    pub fn parse(label: &str) -> Option<Self> {
        let prefix: String = label
            .trim()
            .chars()
            .take(3)
            .collect::<String>()
            .to_lowercase();
        match prefix.as_str() {
            "apr" => Some(Month::Apr),
            "may" => Some(Month::May),
            "jun" => Some(Month::Jun),
            "jul" => Some(Month::Jul),
            "aug" => Some(Month::Aug),
            "sep" => Some(Month::Sep),
            "oct" => Some(Month::Oct),
            "nov" => Some(Month::Nov),
            "dec" => Some(Month::Dec),
            "jan" => Some(Month::Jan),
            "feb" => Some(Month::Feb),
            "mar" => Some(Month::Mar),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
        }
    }
}

/// Sums for one month of one year.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthTotals {
    pub total_exp: f64,
    pub households: f64,
    wage_sum: f64,
    wage_count: u32,
}

impl MonthTotals {
    fn add(&mut self, record: &Record) {
        self.total_exp += record.total_exp;
        self.households += record.total_households_worked;
        if record.average_wage_rate != 0.0 {
            self.wage_sum += record.average_wage_rate;
            self.wage_count += 1;
        }
    }

    /// Mean wage over the records that reported one, `0` when none did.
    pub fn average_wage(&self) -> f64 {
        if self.wage_count == 0 {
            0.0
        } else {
            self.wage_sum / f64::from(self.wage_count)
        }
    }
}

/// Aggregate records by month. Records whose month cannot be read are
/// skipped.
pub fn totals_by_month(records: &[Record]) -> HashMap<Month, MonthTotals> {
    let mut totals: HashMap<Month, MonthTotals> = HashMap::new();
    for record in records {
        if let Some(month) = Month::parse(record.month_label()) {
            totals.entry(month).or_default().add(record);
        }
    }
    totals
}

/// A figure for the current year next to the same month last year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Comparison {
    pub current: f64,
    pub previous: f64,
}

impl Comparison {
    pub fn change(&self) -> f64 {
        self.current - self.previous
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    pub month: Month,
    pub total_exp: Comparison,
    pub households: Comparison,
    pub average_wage: Comparison,
}

/// Twelve rows, April to March, comparing `current` with `previous`.
/// Months without data read as zero.
pub fn compare_years(current: &[Record], previous: &[Record]) -> Vec<MonthRow> {
    let current = totals_by_month(current);
    let previous = totals_by_month(previous);

    Month::FISCAL_ORDER
        .iter()
        .map(|&month| {
            let curr = current.get(&month).copied().unwrap_or_default();
            let prev = previous.get(&month).copied().unwrap_or_default();
            MonthRow {
                month,
                total_exp: Comparison {
                    current: curr.total_exp,
                    previous: prev.total_exp,
                },
                households: Comparison {
                    current: curr.households,
                    previous: prev.households,
                },
                average_wage: Comparison {
                    current: curr.average_wage(),
                    previous: prev.average_wage(),
                },
            }
        })
        .collect()
}

/// Monthly rows for the dashboard's current year against the previous year.
pub fn monthly_rows(result: &ThreeYearResult) -> Vec<MonthRow> {
    compare_years(result.records(CURRENT_YEAR), result.records(PREVIOUS_YEAR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(month: &str, exp: f64, households: f64, wage: f64) -> Record {
        Record {
            district_name: Some("Gaya".into()),
            month: Some(month.into()),
            total_exp: exp,
            total_households_worked: households,
            average_wage_rate: wage,
            ..Default::default()
        }
    }

    #[test]
    fn test_month_parse_variants() {
        assert_eq!(Month::parse("Apr"), Some(Month::Apr));
        assert_eq!(Month::parse(" APRIL "), Some(Month::Apr));
        assert_eq!(Month::parse("sept"), Some(Month::Sep));
        assert_eq!(Month::parse("March"), Some(Month::Mar));
        assert_eq!(Month::parse(""), None);
        assert_eq!(Month::parse("Q1"), None);
    }

    #[test]
    fn test_rows_follow_fiscal_order() {
        let rows = compare_years(&[], &[]);
        let labels: Vec<&str> = rows.iter().map(|r| r.month.label()).collect();
        assert_eq!(
            labels,
            vec!["Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]
        );
        assert!(rows.iter().all(|r| r.total_exp == Comparison::default()));
    }

    #[test]
    fn test_same_month_records_are_merged() {
        let current = vec![rec("Apr", 100.0, 10.0, 200.0), rec("april", 50.0, 5.0, 0.0), rec("APR", 0.0, 0.0, 220.0)];
        let previous = vec![rec("Apr", 120.0, 20.0, 190.0)];

        let rows = compare_years(&current, &previous);
        let april = &rows[0];
        assert_eq!(april.total_exp, Comparison { current: 150.0, previous: 120.0 });
        assert_eq!(april.households.current, 15.0);
        assert_eq!(april.average_wage.current, 210.0);
        assert_eq!(april.average_wage.previous, 190.0);
        assert_eq!(april.total_exp.change(), 30.0);
        assert_eq!(april.households.change(), -5.0);
    }

    #[test]
    fn test_unreadable_months_are_skipped() {
        let totals = totals_by_month(&[rec("", 10.0, 1.0, 1.0), rec("Total", 10.0, 1.0, 1.0)]);
        assert!(totals.is_empty());
    }

    #[test]
    fn test_average_wage_without_reports_is_zero() {
        let rows = compare_years(&[rec("Jan", 10.0, 1.0, 0.0)], &[]);
        let january = rows.iter().find(|r| r.month == Month::Jan).unwrap();
        assert_eq!(january.average_wage.current, 0.0);
        assert_eq!(january.total_exp.current, 10.0);
    }
}
