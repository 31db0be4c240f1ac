use crate::models::{AthleteSeasonRecord, Discipline, Gender, NationScope, TopCounts, TopEntry};
use crate::table::RankingTable;

/// Thresholds reported by [`count_top_x_national`].
pub const COUNT_THRESHOLDS: [usize; 3] = [30, 50, 70];

/// Ranked rows of `slice`, best first. Unranked rows are dropped; equal ranks keep input order.
fn ranked<'a>(
    slice: &[&'a AthleteSeasonRecord],
    discipline: Discipline,
) -> Vec<(&'a AthleteSeasonRecord, u32)> {
    let mut rows: Vec<(&AthleteSeasonRecord, u32)> = slice
        .iter()
        .filter_map(|record| record.pos(discipline).map(|pos| (*record, pos)))
        .collect();
    rows.sort_by_key(|(_, pos)| *pos);
    rows
}

fn mean(values: impl Iterator<Item = u32>) -> f64 {
    let (sum, count) = values.fold((0u64, 0usize), |(sum, count), v| {
        (sum + u64::from(v), count + 1)
    });
    if count == 0 {
        f64::NAN
    } else {
        sum as f64 / count as f64
    }
}

/// Mean rank of the `top` best-ranked rows inside `scope`. NaN when no row qualifies.
pub fn mean_top_x(
    slice: &[&AthleteSeasonRecord],
    discipline: Discipline,
    top: usize,
    scope: NationScope,
) -> f64 {
    let in_scope: Vec<&AthleteSeasonRecord> = slice
        .iter()
        .copied()
        .filter(|record| scope.contains(&record.nation_code))
        .collect();
    mean(
        ranked(&in_scope, discipline)
            .into_iter()
            .take(top)
            .map(|(_, pos)| pos),
    )
}

pub fn mean_top_x_international(
    slice: &[&AthleteSeasonRecord],
    discipline: Discipline,
    top: usize,
) -> f64 {
    mean_top_x(slice, discipline, top, NationScope::International)
}

pub fn mean_top_x_national(
    slice: &[&AthleteSeasonRecord],
    discipline: Discipline,
    top: usize,
) -> f64 {
    mean_top_x(slice, discipline, top, NationScope::National)
}

/// Mean rank of the `scope` rows found among the `top` best of the whole slice.
pub fn mean_within_overall_top(
    slice: &[&AthleteSeasonRecord],
    discipline: Discipline,
    top: usize,
    scope: NationScope,
) -> f64 {
    mean(
        ranked(slice, discipline)
            .into_iter()
            .take(top)
            .filter(|(record, _)| scope.contains(&record.nation_code))
            .map(|(_, pos)| pos),
    )
}

/// National athletes among the best 30, 50 and 70 ranks of the whole slice.
pub fn count_top_x_national(slice: &[&AthleteSeasonRecord], discipline: Discipline) -> TopCounts {
    let rows = ranked(slice, discipline);
    let [top30, top50, top70] = COUNT_THRESHOLDS.map(|limit| {
        rows.iter()
            .take(limit)
            .filter(|(record, _)| record.is_national())
            .count()
    });
    TopCounts {
        top30,
        top50,
        top70,
    }
}

pub fn top_ranked(
    records: &[&AthleteSeasonRecord],
    discipline: Discipline,
    top: usize,
) -> Vec<TopEntry> {
    ranked(records, discipline)
        .into_iter()
        .take(top)
        .map(|(record, rank)| TopEntry {
            name: record.competitor_name.clone(),
            nation: record.nation_code.clone(),
            points: record.points(discipline),
            rank,
        })
        .collect()
}

/// Ranked list of one birth year and gender, optionally restricted to national athletes.
pub fn top_ranked_for(
    table: &RankingTable,
    birth_year: i32,
    gender: Gender,
    discipline: Discipline,
    top: usize,
    national_only: bool,
) -> Vec<TopEntry> {
    let cohort: Vec<&AthleteSeasonRecord> = table
        .cohort(birth_year, gender)
        .into_iter()
        .filter(|record| !national_only || record.is_national())
        .collect();
    top_ranked(&cohort, discipline, top)
}

/// Row limits of the ranked-list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedLimits {
    /// Entries in the all-nations sections.
    pub overall: usize,
    /// Entries in the national sections.
    pub national: usize,
}

/// Titled sections of the ranked-list view: all nations per discipline, then national athletes.
pub fn ranked_sections(
    table: &RankingTable,
    birth_year: i32,
    gender: Gender,
    disciplines: &[Discipline],
    limits: RankedLimits,
    national_only: bool,
) -> Vec<(String, Vec<TopEntry>)> {
    let mut sections = Vec::new();

    if !national_only {
        for &discipline in disciplines {
            let entries =
                top_ranked_for(table, birth_year, gender, discipline, limits.overall, false);
            sections.push((discipline.label().to_string(), entries));
        }
    }

    for &discipline in disciplines {
        let entries = top_ranked_for(table, birth_year, gender, discipline, limits.national, true);
        sections.push((format!("{} SUI", discipline.label()), entries));
    }

    sections
}
