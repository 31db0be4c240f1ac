use tracing::debug;

use crate::error::StatsError;
use crate::models::{CohortCountRow, CohortMeanRow, Discipline, Gender};
use crate::table::RankingTable;
use crate::topn;

/// Rows produced by every collector.
pub const SERIES_LEN: i32 = 11;

/// Years between birth and the first FIS season.
pub const DEBUT_AGE: i32 = 16;

/// Which key moves forward from one row to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advance {
    BirthYear,
    Season,
}

fn season_of(birth_year: i32, fis_year_offset: i32, step: i32) -> Option<i32> {
    let season = i64::from(birth_year)
        + i64::from(DEBUT_AGE)
        + i64::from(fis_year_offset)
        + i64::from(step);
    i32::try_from(season).ok()
}

/// `None` when the season does not fit in an `i32`.
pub fn first_season(birth_year: i32, fis_year_offset: i32) -> Option<i32> {
    season_of(birth_year, fis_year_offset, 0)
}

/// (birth year, season) of every row, or an error if any of them is unrepresentable.
fn series_keys(
    birth_year: i32,
    fis_year_offset: i32,
    advance: Advance,
) -> Result<Vec<(i32, i32)>, StatsError> {
    (0..SERIES_LEN)
        .map(|step| {
            let key = match advance {
                Advance::BirthYear => birth_year.checked_add(step).and_then(|cohort| {
                    season_of(cohort, fis_year_offset, 0).map(|season| (cohort, season))
                }),
                Advance::Season => season_of(birth_year, fis_year_offset, step)
                    .map(|season| (birth_year, season)),
            };
            key.ok_or(StatsError::SeasonOutOfRange {
                birth_year,
                fis_year_offset,
            })
        })
        .collect()
}

fn mean_row(
    table: &RankingTable,
    birth_year: i32,
    season: i32,
    gender: Gender,
    top: usize,
    discipline: Discipline,
) -> CohortMeanRow {
    let slice = table.season_slice(birth_year, season, gender);
    CohortMeanRow {
        birth_year,
        season,
        mean_int: topn::mean_top_x_international(&slice, discipline, top),
        mean_sui: topn::mean_top_x_national(&slice, discipline, top),
    }
}

/// Compares consecutive birth-year classes at the same competitive age.
pub fn collect_mean_series(
    birth_year: i32,
    fis_year_offset: i32,
    gender: Gender,
    top: usize,
    discipline: Discipline,
    table: &RankingTable,
) -> Result<Vec<CohortMeanRow>, StatsError> {
    table.require_for_cohort(discipline)?;
    let keys = series_keys(birth_year, fis_year_offset, Advance::BirthYear)?;
    debug!(birth_year, fis_year_offset, %gender, top, %discipline, "collecting mean series");

    Ok(keys
        .into_iter()
        .map(|(cohort, season)| mean_row(table, cohort, season, gender, top, discipline))
        .collect())
}

pub fn collect_count_series(
    birth_year: i32,
    fis_year_offset: i32,
    gender: Gender,
    discipline: Discipline,
    table: &RankingTable,
) -> Result<Vec<CohortCountRow>, StatsError> {
    table.require_for_cohort(discipline)?;
    let keys = series_keys(birth_year, fis_year_offset, Advance::BirthYear)?;
    debug!(birth_year, fis_year_offset, %gender, %discipline, "collecting count series");

    Ok(keys
        .into_iter()
        .map(|(cohort, season)| {
            let slice = table.season_slice(cohort, season, gender);
            let counts = topn::count_top_x_national(&slice, discipline);
            CohortCountRow {
                birth_year: cohort,
                season,
                top30: counts.top30,
                top50: counts.top50,
                top70: counts.top70,
            }
        })
        .collect())
}

/// Follows a single birth year across consecutive seasons.
pub fn collect_development_series(
    birth_year: i32,
    fis_year_offset: i32,
    gender: Gender,
    top: usize,
    discipline: Discipline,
    table: &RankingTable,
) -> Result<Vec<CohortMeanRow>, StatsError> {
    table.require_for_cohort(discipline)?;
    let keys = series_keys(birth_year, fis_year_offset, Advance::Season)?;
    debug!(
        birth_year,
        fis_year_offset,
        %gender,
        top,
        %discipline,
        "collecting development series"
    );

    Ok(keys
        .into_iter()
        .map(|(cohort, season)| mean_row(table, cohort, season, gender, top, discipline))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AthleteSeasonRecord;

    fn ranked(
        id: &str,
        nation: &str,
        birth_year: i32,
        list_year: i32,
        pos: u32,
    ) -> AthleteSeasonRecord {
        AthleteSeasonRecord::new(id, nation, birth_year, Gender::W, list_year)
            .with_pos(Discipline::GiantSlalom, pos)
    }

    fn sample_table() -> RankingTable {
        RankingTable::from_records(vec![
            // 2000 class, first FIS year season 2017
            ranked("a", "SUI", 2000, 2017, 10),
            ranked("b", "AUT", 2000, 2017, 2),
            ranked("c", "AUT", 2000, 2017, 6),
            // 2000 class one season later
            ranked("a", "SUI", 2000, 2018, 4),
            ranked("b", "AUT", 2000, 2018, 1),
            // 2001 class, first FIS year season 2018
            ranked("d", "SUI", 2001, 2018, 3),
            ranked("e", "NOR", 2001, 2018, 8),
            // wrong gender never matches
            AthleteSeasonRecord::new("f", "SUI", 2000, Gender::M, 2017)
                .with_pos(Discipline::GiantSlalom, 1),
        ])
    }

    #[test]
    fn mean_series_advances_birth_year_and_season() {
        let table = sample_table();
        let rows =
            collect_mean_series(2000, 1, Gender::W, 3, Discipline::GiantSlalom, &table).unwrap();
        assert_eq!(rows.len(), 11);
        for (step, row) in rows.iter().enumerate() {
            assert_eq!(row.birth_year, 2000 + step as i32);
            assert_eq!(row.season, 2017 + step as i32);
        }
        assert_eq!(rows[0].mean_int, 4.0);
        assert_eq!(rows[0].mean_sui, 10.0);
        assert_eq!(rows[1].mean_int, 8.0);
        assert_eq!(rows[1].mean_sui, 3.0);
        assert!(rows[2..]
            .iter()
            .all(|row| row.mean_int.is_nan() && row.mean_sui.is_nan()));
    }

    #[test]
    fn development_series_holds_birth_year() {
        let table = sample_table();
        let rows =
            collect_development_series(2000, 1, Gender::W, 3, Discipline::GiantSlalom, &table)
                .unwrap();
        assert_eq!(rows.len(), 11);
        assert!(rows.iter().all(|row| row.birth_year == 2000));
        for pair in rows.windows(2) {
            assert_eq!(pair[1].season, pair[0].season + 1);
        }
        assert_eq!(rows[0].season, 2017);
        assert_eq!(rows[1].mean_int, 1.0);
        assert_eq!(rows[1].mean_sui, 4.0);
    }

    #[test]
    fn count_series_counts_per_class() {
        let table = sample_table();
        let rows =
            collect_count_series(2000, 1, Gender::W, Discipline::GiantSlalom, &table).unwrap();
        assert_eq!(rows.len(), 11);
        assert_eq!((rows[0].top30, rows[0].top50, rows[0].top70), (1, 1, 1));
        assert_eq!(rows[1].birth_year, 2001);
        assert_eq!(rows[1].season, 2018);
        assert_eq!(rows[1].top30, 1);
        assert!(rows[2..].iter().all(|row| row.top70 == 0));
        for pair in rows.windows(2) {
            assert_eq!(pair[1].birth_year, pair[0].birth_year + 1);
            assert_eq!(pair[1].season, pair[0].season + 1);
        }
    }

    #[test]
    fn empty_table_still_yields_full_series() {
        let table = RankingTable::from_records(Vec::new());
        let rows = collect_count_series(1998, 2, Gender::M, Discipline::Downhill, &table).unwrap();
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].season, 2016);
        assert!(rows
            .iter()
            .all(|row| row.top30 == 0 && row.top50 == 0 && row.top70 == 0));
    }

    #[test]
    fn missing_discipline_column_aborts() {
        let table = RankingTable::with_columns(
            Vec::new(),
            ["nationcode", "birthyear", "gender", "listyear", "dhpos"],
        );
        assert!(collect_mean_series(2000, 1, Gender::M, 3, Discipline::Downhill, &table).is_ok());
        let err = collect_development_series(2000, 1, Gender::M, 3, Discipline::Slalom, &table)
            .unwrap_err();
        assert!(matches!(err, StatsError::MissingColumn(ref name) if name == "slpos"));
    }

    #[test]
    fn seasons_past_i32_range_are_rejected() {
        let table = RankingTable::from_records(Vec::new());
        let birth_year = i32::MAX - 20;

        let development =
            collect_development_series(birth_year, 1, Gender::M, 3, Discipline::Downhill, &table);
        match development {
            Err(StatsError::SeasonOutOfRange {
                birth_year: rejected,
                fis_year_offset,
            }) => {
                assert_eq!(rejected, birth_year);
                assert_eq!(fis_year_offset, 1);
            }
            other => panic!("expected out of range, got {other:?}"),
        }

        let mean = collect_mean_series(birth_year, 1, Gender::M, 3, Discipline::Downhill, &table);
        assert!(matches!(mean, Err(StatsError::SeasonOutOfRange { .. })));

        let count = collect_count_series(i32::MIN, -20, Gender::M, Discipline::Downhill, &table);
        assert!(matches!(count, Err(StatsError::SeasonOutOfRange { .. })));

        assert_eq!(first_season(i32::MAX, 1), None);
        assert_eq!(first_season(1998, 1), Some(2015));
    }

    #[test]
    fn series_may_end_exactly_at_i32_max() {
        let table = RankingTable::from_records(Vec::new());
        let birth_year = i32::MAX - 27;

        let mean =
            collect_mean_series(birth_year, 1, Gender::M, 3, Discipline::Downhill, &table).unwrap();
        assert_eq!(mean.len(), 11);
        assert_eq!(mean[10].season, i32::MAX);

        let development =
            collect_development_series(birth_year, 1, Gender::M, 3, Discipline::Downhill, &table)
                .unwrap();
        assert_eq!(development.len(), 11);
        assert_eq!(development[10].season, i32::MAX);
    }

    #[test]
    fn collectors_are_idempotent() {
        let table = sample_table();
        let first =
            collect_count_series(2000, 1, Gender::W, Discipline::GiantSlalom, &table).unwrap();
        let second =
            collect_count_series(2000, 1, Gender::W, Discipline::GiantSlalom, &table).unwrap();
        assert_eq!(first, second);
    }
}
