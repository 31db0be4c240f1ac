use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{CohortCountRow, CohortMeanRow, Discipline, Gender, TopEntry, NATIONAL_CODE};

/// "S14/15 BY1998" for the 2015 list of the 1998 class.
pub fn season_label(season: i32, birth_year: i32) -> String {
    let end = season.rem_euclid(100);
    let start = (end + 99) % 100;
    format!("S{start}/{end} BY{birth_year}")
}

fn format_mean(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{value:.2}")
    }
}

fn write_mean_table(output: &mut String, rows: &[CohortMeanRow]) {
    let _ = writeln!(output, "| Season | Int | {NATIONAL_CODE} |");
    let _ = writeln!(output, "|---|---:|---:|");
    for row in rows {
        let _ = writeln!(
            output,
            "| {} | {} | {} |",
            season_label(row.season, row.birth_year),
            format_mean(row.mean_int),
            format_mean(row.mean_sui)
        );
    }
}

/// Mean world-ranking positions per birth-year class, one table per top-N.
pub fn mean_report(
    discipline: Discipline,
    gender: Gender,
    generated: NaiveDate,
    series: &[(usize, Vec<CohortMeanRow>)],
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# FIS Points List - {} {}", discipline.label(), gender);
    let _ = writeln!(output, "Generated {generated}");

    for (top, rows) in series {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Top {top} {discipline}");
        write_mean_table(&mut output, rows);
    }

    output
}

pub fn count_report(
    discipline: Discipline,
    gender: Gender,
    generated: NaiveDate,
    rows: &[CohortCountRow],
) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "# Number of {NATIONAL_CODE} Athletes in Top 30, 50, and 70 - {} {}",
        discipline.label(),
        gender
    );
    let _ = writeln!(output, "Generated {generated}");
    let _ = writeln!(output);
    let _ = writeln!(output, "| Season | Top 30 | Top 50 | Top 70 |");
    let _ = writeln!(output, "|---|---:|---:|---:|");
    for row in rows {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} |",
            season_label(row.season, row.birth_year),
            row.top30,
            row.top50,
            row.top70
        );
    }

    output
}

pub fn development_report(
    birth_year: i32,
    gender: Gender,
    top: usize,
    generated: NaiveDate,
    series: &[(Discipline, Vec<CohortMeanRow>)],
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Development of Birth Year {birth_year} {gender}");
    let _ = writeln!(output, "Generated {generated}");

    for (discipline, rows) in series {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Top {top} {discipline}");
        write_mean_table(&mut output, rows);
    }

    output
}

pub fn ranked_report(
    birth_year: i32,
    gender: Gender,
    generated: NaiveDate,
    sections: &[(String, Vec<TopEntry>)],
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# FIS List - Birth Year {birth_year} {gender}");
    let _ = writeln!(output, "Generated {generated}");

    for (title, entries) in sections {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {title}");

        if entries.is_empty() {
            let _ = writeln!(output, "No ranked athletes.");
            continue;
        }

        let _ = writeln!(output, "| Name | Nat | Best | Rank |");
        let _ = writeln!(output, "|---|---|---:|---:|");
        for entry in entries {
            let nation = if entry.nation == NATIONAL_CODE {
                format!("**{}**", entry.nation)
            } else {
                entry.nation.clone()
            };
            let best = entry
                .points
                .map(|points| format!("{points:.2}"))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                entry.name, nation, best, entry.rank
            );
        }
    }

    output
}

/// Pretty JSON; NaN means become `null`.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 23).unwrap()
    }

    #[test]
    fn labels_season_with_two_digit_years() {
        assert_eq!(season_label(2015, 1998), "S14/15 BY1998");
        assert_eq!(season_label(2000, 1983), "S99/0 BY1983");
        assert_eq!(season_label(i32::MIN, 0), "S51/52 BY0");
        assert_eq!(season_label(i32::MAX, 0), "S46/47 BY0");
    }

    #[test]
    fn mean_report_renders_missing_as_dash() {
        let rows = vec![CohortMeanRow {
            birth_year: 2000,
            season: 2017,
            mean_int: 4.0,
            mean_sui: f64::NAN,
        }];
        let report = mean_report(Discipline::Downhill, Gender::W, generated(), &[(3, rows)]);
        assert!(report.contains("## Top 3 DH"));
        assert!(report.contains("| S16/17 BY2000 | 4.00 | - |"));
    }

    #[test]
    fn count_report_lists_every_row() {
        let rows = vec![
            CohortCountRow {
                birth_year: 2000,
                season: 2017,
                top30: 1,
                top50: 2,
                top70: 3,
            },
            CohortCountRow {
                birth_year: 2001,
                season: 2018,
                top30: 0,
                top50: 0,
                top70: 1,
            },
        ];
        let report = count_report(Discipline::Slalom, Gender::M, generated(), &rows);
        assert!(report.contains("| S16/17 BY2000 | 1 | 2 | 3 |"));
        assert!(report.contains("| S17/18 BY2001 | 0 | 0 | 1 |"));
    }

    #[test]
    fn ranked_report_highlights_national_athletes() {
        let entries = vec![
            TopEntry {
                name: "Anna Muster".into(),
                nation: "SUI".into(),
                points: Some(12.5),
                rank: 1,
            },
            TopEntry {
                name: "Berit Nord".into(),
                nation: "NOR".into(),
                points: None,
                rank: 2,
            },
        ];
        let sections = [
            ("Slalom".to_string(), entries),
            ("Downhill".to_string(), Vec::new()),
        ];
        let report = ranked_report(2004, Gender::W, generated(), &sections);
        assert!(report.contains("| Anna Muster | **SUI** | 12.50 | 1 |"));
        assert!(report.contains("| Berit Nord | NOR | - | 2 |"));
        assert!(report.contains("No ranked athletes."));
    }

    #[test]
    fn json_uses_camel_case_and_null_for_nan() {
        let rows = vec![CohortMeanRow {
            birth_year: 2000,
            season: 2017,
            mean_int: f64::NAN,
            mean_sui: 2.5,
        }];
        let json = to_json(&rows).unwrap();
        assert!(json.contains("\"birthYear\": 2000"));
        assert!(json.contains("\"meanInt\": null"));
        assert!(json.contains("\"meanSui\": 2.5"));
    }
}
