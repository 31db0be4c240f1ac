use std::collections::BTreeSet;

use tracing::debug;

use crate::error::StatsError;
use crate::models::{AthleteSeasonRecord, Discipline, Gender};

/// Canonical (lowercase) column names of a points list.
pub mod column {
    pub const COMPETITOR_ID: &str = "competitorid";
    pub const COMPETITOR_NAME: &str = "competitorname";
    pub const NATION_CODE: &str = "nationcode";
    pub const BIRTH_YEAR: &str = "birthyear";
    pub const GENDER: &str = "gender";
    pub const LIST_YEAR: &str = "listyear";
    pub const LIST_NAME: &str = "listname";
}

pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn canonical_columns() -> BTreeSet<String> {
    let mut columns: BTreeSet<String> = [
        column::COMPETITOR_ID,
        column::COMPETITOR_NAME,
        column::NATION_CODE,
        column::BIRTH_YEAR,
        column::GENDER,
        column::LIST_YEAR,
    ]
    .into_iter()
    .map(String::from)
    .collect();

    for discipline in Discipline::ALL {
        columns.insert(discipline.pos_column().to_string());
        columns.insert(discipline.points_column().to_string());
    }
    columns
}

/// Read-only ranking data plus the set of columns the source provided.
#[derive(Debug, Clone, Default)]
pub struct RankingTable {
    records: Vec<AthleteSeasonRecord>,
    columns: BTreeSet<String>,
}

impl RankingTable {
    /// Builds a table that carries every canonical column.
    pub fn from_records(records: Vec<AthleteSeasonRecord>) -> Self {
        RankingTable {
            records,
            columns: canonical_columns(),
        }
    }

    pub fn with_columns<I, S>(records: Vec<AthleteSeasonRecord>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RankingTable {
            records,
            columns: columns
                .into_iter()
                .map(|name| normalize_column_name(name.as_ref()))
                .collect(),
        }
    }

    pub fn records(&self) -> &[AthleteSeasonRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn require_columns(&self, names: &[&str]) -> Result<(), StatsError> {
        match names.iter().find(|name| !self.has_column(name)) {
            Some(missing) => Err(StatsError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Columns every cohort query over `discipline` reads.
    pub fn require_for_cohort(&self, discipline: Discipline) -> Result<(), StatsError> {
        self.require_columns(&[
            column::NATION_CODE,
            column::BIRTH_YEAR,
            column::GENDER,
            column::LIST_YEAR,
            discipline.pos_column(),
        ])
    }

    pub fn season_slice(
        &self,
        birth_year: i32,
        list_year: i32,
        gender: Gender,
    ) -> Vec<&AthleteSeasonRecord> {
        let slice: Vec<&AthleteSeasonRecord> = self
            .records
            .iter()
            .filter(|record| {
                record.birth_year == Some(birth_year)
                    && record.list_year == Some(list_year)
                    && record.gender == Some(gender)
            })
            .collect();
        debug!(birth_year, list_year, %gender, rows = slice.len(), "season slice");
        slice
    }

    pub fn cohort(&self, birth_year: i32, gender: Gender) -> Vec<&AthleteSeasonRecord> {
        self.records
            .iter()
            .filter(|record| record.birth_year == Some(birth_year) && record.gender == Some(gender))
            .collect()
    }

    /// Distinct birth years, most recent first.
    pub fn birth_years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.records.iter().filter_map(|r| r.birth_year).collect();
        years.into_iter().rev().collect()
    }
}
