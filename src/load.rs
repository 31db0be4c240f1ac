use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::StatsError;
use crate::models::{AthleteSeasonRecord, Discipline, DisciplineResult, Gender};
use crate::table::{column, normalize_column_name, RankingTable};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawRow {
    pub(crate) competitorid: Option<String>,
    pub(crate) competitorname: Option<String>,
    pub(crate) nationcode: Option<String>,
    pub(crate) birthyear: Option<String>,
    pub(crate) gender: Option<String>,
    pub(crate) listyear: Option<String>,
    pub(crate) listname: Option<String>,
    pub(crate) dhpos: Option<String>,
    pub(crate) dhpoints: Option<String>,
    pub(crate) slpos: Option<String>,
    pub(crate) slpoints: Option<String>,
    pub(crate) gspos: Option<String>,
    pub(crate) gspoints: Option<String>,
    pub(crate) sgpos: Option<String>,
    pub(crate) sgpoints: Option<String>,
    pub(crate) acpos: Option<String>,
    pub(crate) acpoints: Option<String>,
}

impl RawRow {
    fn discipline_cells(&self, discipline: Discipline) -> (Option<&str>, Option<&str>) {
        let (pos, points) = match discipline {
            Discipline::Downhill => (&self.dhpos, &self.dhpoints),
            Discipline::Slalom => (&self.slpos, &self.slpoints),
            Discipline::GiantSlalom => (&self.gspos, &self.gspoints),
            Discipline::SuperG => (&self.sgpos, &self.sgpoints),
            Discipline::AlpineCombined => (&self.acpos, &self.acpoints),
        };
        (cell(pos), cell(points))
    }
}

fn cell(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(row: usize, column: &str, value: &str) -> StatsError {
    StatsError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn parse_float(row: usize, column: &str, value: Option<&str>) -> Result<Option<f64>, StatsError> {
    value
        .map(|v| v.parse::<f64>().map_err(|_| invalid(row, column, v)))
        .transpose()
}

/// Accepts "2004" as well as the "2004.0" spreadsheets export for integer columns.
fn parse_int(row: usize, column: &str, value: Option<&str>) -> Result<Option<i64>, StatsError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    if let Ok(parsed) = raw.parse::<i64>() {
        return Ok(Some(parsed));
    }
    match raw.parse::<f64>() {
        Ok(parsed) if parsed.fract() == 0.0 && parsed.is_finite() => Ok(Some(parsed as i64)),
        _ => Err(invalid(row, column, raw)),
    }
}

fn parse_year(row: usize, column: &str, value: Option<&str>) -> Result<Option<i32>, StatsError> {
    parse_int(row, column, value)?
        .map(|year| {
            i32::try_from(year).map_err(|_| invalid(row, column, value.unwrap_or_default()))
        })
        .transpose()
}

fn parse_rank(row: usize, column: &str, value: Option<&str>) -> Result<Option<u32>, StatsError> {
    match parse_int(row, column, value)? {
        Some(rank) if rank > 0 => u32::try_from(rank)
            .map(Some)
            .map_err(|_| invalid(row, column, value.unwrap_or_default())),
        Some(_) => Err(invalid(row, column, value.unwrap_or_default())),
        None => Ok(None),
    }
}

/// List year encoded at the end of a list name, e.g. "... 2024" or "... 2024/25".
pub fn list_year_from_name(name: &str) -> Option<i32> {
    let name = name.trim();
    let tail: String = name
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if tail.len() == 4 && tail.chars().all(|c| c.is_ascii_digit()) {
        return tail.parse().ok();
    }
    match tail.split_once('/') {
        Some((start, end))
            if start.len() == 1
                && end.len() == 2
                && start.chars().chain(end.chars()).all(|c| c.is_ascii_digit()) =>
        {
            end.parse::<i32>().ok().map(|yy| 2000 + yy)
        }
        _ => None,
    }
}

pub(crate) fn to_record(
    index: usize,
    raw: RawRow,
    derive_list_year: bool,
) -> Result<AthleteSeasonRecord, StatsError> {
    let row = index + 1;

    let gender = cell(&raw.gender)
        .map(|value| value.parse::<Gender>().map_err(|_| invalid(row, column::GENDER, value)))
        .transpose()?;

    let list_year = if derive_list_year {
        match cell(&raw.listname) {
            Some(name) => {
                let year = list_year_from_name(name);
                if year.is_none() {
                    warn!(row, list_name = name, "cannot derive list year from list name");
                }
                year
            }
            None => None,
        }
    } else {
        parse_year(row, column::LIST_YEAR, cell(&raw.listyear))?
    };

    let mut results = [DisciplineResult::default(); 5];
    for discipline in Discipline::ALL {
        let (pos, points) = raw.discipline_cells(discipline);
        results[discipline.index()] = DisciplineResult {
            pos: parse_rank(row, discipline.pos_column(), pos)?,
            points: parse_float(row, discipline.points_column(), points)?,
        };
    }

    Ok(AthleteSeasonRecord {
        competitor_id: cell(&raw.competitorid).unwrap_or_default().to_string(),
        competitor_name: cell(&raw.competitorname).unwrap_or_default().to_string(),
        nation_code: cell(&raw.nationcode).unwrap_or_default().to_string(),
        birth_year: parse_year(row, column::BIRTH_YEAR, cell(&raw.birthyear))?,
        gender,
        list_year,
        results,
    })
}

pub fn read_csv<R: io::Read>(source: R) -> Result<RankingTable, StatsError> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: csv::StringRecord = reader
        .headers()?
        .iter()
        .map(normalize_column_name)
        .collect();
    reader.set_headers(headers.clone());

    let mut columns: Vec<String> = headers.iter().map(String::from).collect();
    let has_column = |name: &str| columns.iter().any(|c| c == name);
    let derive_list_year = !has_column(column::LIST_YEAR) && has_column(column::LIST_NAME);
    if derive_list_year {
        columns.push(column::LIST_YEAR.to_string());
    }

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<RawRow>().enumerate() {
        records.push(to_record(index, result?, derive_list_year)?);
    }

    Ok(RankingTable::with_columns(records, columns))
}

pub fn load_csv(path: &Path) -> Result<RankingTable, StatsError> {
    let file = std::fs::File::open(path)?;
    let table = read_csv(io::BufReader::new(file))?;
    info!(path = %path.display(), rows = table.len(), "loaded points list");
    Ok(table)
}
