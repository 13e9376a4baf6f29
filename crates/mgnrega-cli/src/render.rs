//! Plain-text rendering of a three-year result.

use std::fmt::Write;

use chrono::Local;
use mgnrega_core::report::{monthly_rows, MonthRow};
use mgnrega_core::{OverallSource, ThreeYearResult, CURRENT_YEAR, PREVIOUS_YEAR};

use crate::format::{format_change, format_number, pad_left, pad_right};

/// Provenance lines: the overall source, then one line per year.
pub fn render_provenance(result: &ThreeYearResult) -> String {
    let mut out = String::new();
    let overall = result.overall_source();
    let _ = write!(out, "Data source: {}", overall);
    if overall != OverallSource::Network {
        out.push_str(" (showing most recent cached results where network failed)");
    }
    out.push('\n');

    for year in result.years() {
        let Some(entry) = result.provenance(year) else {
            continue;
        };
        let _ = write!(out, "  {}: {}", year, entry.source);
        if let Some(fetched_at) = entry.fetched_at {
            let local = fetched_at.with_timezone(&Local);
            let _ = write!(out, " (updated: {})", local.format("%b %d, %Y %H:%M"));
        }
        out.push('\n');
    }
    out
}

fn row_cells(row: &MonthRow) -> Vec<String> {
    vec![
        row.month.label().to_string(),
        format_number(row.total_exp.current, 2),
        format_change(row.total_exp.change(), 2),
        format_number(row.households.current, 0),
        format_change(row.households.change(), 0),
        format_number(row.average_wage.current, 2),
        format_change(row.average_wage.change(), 2),
    ]
}

/// Month table for the current year with changes against the previous year.
pub fn render_table(rows: &[MonthRow]) -> String {
    let current = short_year(CURRENT_YEAR);
    let previous = short_year(PREVIOUS_YEAR);
    let vs = format!("Change vs {}", previous);
    let headers = [
        "Month".to_string(),
        format!("Total Exp (₹) {}", current),
        vs.clone(),
        format!("Households Worked {}", current),
        vs.clone(),
        format!("Avg Wage/Day {}", current),
        vs,
    ];

    let body: Vec<Vec<String>> = rows.iter().map(row_cells).collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .map(|cells| cells[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .enumerate()
        .map(|(i, (h, &w))| if i == 0 { pad_right(h, w) } else { pad_left(h, w) })
        .collect();
    let _ = writeln!(out, "{}", header_line.join("  "));
    let _ = writeln!(out, "{}", "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));

    for cells in &body {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (c, &w))| if i == 0 { pad_right(c, w) } else { pad_left(c, w) })
            .collect();
        let _ = writeln!(out, "{}", line.join("  "));
    }
    out
}

/// Full dashboard text for `district`.
pub fn render_dashboard(district: &str, result: &ThreeYearResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Bihar MGNREGA: {} monthly figures ({})", district, CURRENT_YEAR);
    let _ = writeln!(out);
    out.push_str(&render_provenance(result));
    let _ = writeln!(out);

    if result.records(CURRENT_YEAR).is_empty() && result.records(PREVIOUS_YEAR).is_empty() {
        let _ = writeln!(out, "No {} data found for \"{}\".", CURRENT_YEAR, district);
        return out;
    }

    out.push_str(&render_table(&monthly_rows(result)));
    let _ = writeln!(
        out,
        "\nDisplayed: {} months. Change columns compare the same month in {}.",
        CURRENT_YEAR, PREVIOUS_YEAR
    );
    out
}

/// "2024-2025" -> "2024-25"
fn short_year(year: &str) -> String {
    match year.split_once('-') {
        Some((start, end)) if end.len() == 4 => format!("{}-{}", start, &end[2..]),
        _ => year.to_string(),
    }
}
