use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::StatsError;

/// Nation code of the athletes tracked as "national" throughout the reports.
pub const NATIONAL_CODE: &str = "SUI";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    M,
    W,
}

impl FromStr for Gender {
    type Err = StatsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "M" => Ok(Gender::M),
            "W" => Ok(Gender::W),
            _ => Err(StatsError::UnknownGender(value.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::M => write!(f, "M"),
            Gender::W => write!(f, "W"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Discipline {
    #[serde(rename = "DH")]
    Downhill,
    #[serde(rename = "SL")]
    Slalom,
    #[serde(rename = "GS")]
    GiantSlalom,
    #[serde(rename = "SG")]
    SuperG,
    #[serde(rename = "AC")]
    AlpineCombined,
}

impl Discipline {
    pub const ALL: [Discipline; 5] = [
        Discipline::Downhill,
        Discipline::Slalom,
        Discipline::GiantSlalom,
        Discipline::SuperG,
        Discipline::AlpineCombined,
    ];

    pub fn index(self) -> usize {
        match self {
            Discipline::Downhill => 0,
            Discipline::Slalom => 1,
            Discipline::GiantSlalom => 2,
            Discipline::SuperG => 3,
            Discipline::AlpineCombined => 4,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Discipline::Downhill => "DH",
            Discipline::Slalom => "SL",
            Discipline::GiantSlalom => "GS",
            Discipline::SuperG => "SG",
            Discipline::AlpineCombined => "AC",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Discipline::Downhill => "Downhill",
            Discipline::Slalom => "Slalom",
            Discipline::GiantSlalom => "Giant Slalom",
            Discipline::SuperG => "Super G",
            Discipline::AlpineCombined => "Alpine Combined",
        }
    }

    pub fn pos_column(self) -> &'static str {
        match self {
            Discipline::Downhill => "dhpos",
            Discipline::Slalom => "slpos",
            Discipline::GiantSlalom => "gspos",
            Discipline::SuperG => "sgpos",
            Discipline::AlpineCombined => "acpos",
        }
    }

    pub fn points_column(self) -> &'static str {
        match self {
            Discipline::Downhill => "dhpoints",
            Discipline::Slalom => "slpoints",
            Discipline::GiantSlalom => "gspoints",
            Discipline::SuperG => "sgpoints",
            Discipline::AlpineCombined => "acpoints",
        }
    }
}

impl FromStr for Discipline {
    type Err = StatsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = value.trim().to_ascii_uppercase();
        Discipline::ALL
            .into_iter()
            .find(|discipline| discipline.code() == code)
            .ok_or_else(|| StatsError::UnknownDiscipline(value.to_string()))
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which side of the national/international split a statistic covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NationScope {
    International,
    National,
}

impl NationScope {
    pub fn contains(self, nation_code: &str) -> bool {
        match self {
            NationScope::International => nation_code != NATIONAL_CODE,
            NationScope::National => nation_code == NATIONAL_CODE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisciplineResult {
    pub pos: Option<u32>,
    pub points: Option<f64>,
}

/// One row of a FIS points list: an athlete as ranked in one published list.
#[derive(Debug, Clone, PartialEq)]
pub struct AthleteSeasonRecord {
    pub competitor_id: String,
    pub competitor_name: String,
    pub nation_code: String,
    pub birth_year: Option<i32>,
    pub gender: Option<Gender>,
    pub list_year: Option<i32>,
    pub results: [DisciplineResult; 5],
}

impl AthleteSeasonRecord {
    pub fn new(
        competitor_id: impl Into<String>,
        nation_code: impl Into<String>,
        birth_year: i32,
        gender: Gender,
        list_year: i32,
    ) -> Self {
        AthleteSeasonRecord {
            competitor_id: competitor_id.into(),
            competitor_name: String::new(),
            nation_code: nation_code.into(),
            birth_year: Some(birth_year),
            gender: Some(gender),
            list_year: Some(list_year),
            results: [DisciplineResult::default(); 5],
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.competitor_name = name.into();
        self
    }

    pub fn with_pos(mut self, discipline: Discipline, pos: u32) -> Self {
        self.results[discipline.index()].pos = Some(pos);
        self
    }

    pub fn with_result(
        mut self,
        discipline: Discipline,
        pos: Option<u32>,
        points: Option<f64>,
    ) -> Self {
        self.results[discipline.index()] = DisciplineResult { pos, points };
        self
    }

    pub fn pos(&self, discipline: Discipline) -> Option<u32> {
        self.results[discipline.index()].pos
    }

    pub fn points(&self, discipline: Discipline) -> Option<f64> {
        self.results[discipline.index()].points
    }

    pub fn is_national(&self) -> bool {
        self.nation_code == NATIONAL_CODE
    }
}

/// Mean ranking positions of one season slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortMeanRow {
    pub birth_year: i32,
    pub season: i32,
    pub mean_int: f64,
    pub mean_sui: f64,
}

/// National athletes within the top 30, 50 and 70 of one season slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopCounts {
    pub top30: usize,
    pub top50: usize,
    pub top70: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortCountRow {
    pub birth_year: i32,
    pub season: i32,
    pub top30: usize,
    pub top50: usize,
    pub top70: usize,
}

/// A line of the ranked-list view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEntry {
    pub name: String,
    pub nation: String,
    pub points: Option<f64>,
    pub rank: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discipline_parses_case_insensitively() {
        assert_eq!("dh".parse::<Discipline>().unwrap(), Discipline::Downhill);
        assert_eq!(
            " Gs ".parse::<Discipline>().unwrap(),
            Discipline::GiantSlalom
        );
        assert!(matches!(
            "XX".parse::<Discipline>(),
            Err(StatsError::UnknownDiscipline(_))
        ));
    }

    #[test]
    fn discipline_columns_are_lowercase() {
        assert_eq!(Discipline::SuperG.pos_column(), "sgpos");
        assert_eq!(Discipline::AlpineCombined.points_column(), "acpoints");
    }

    #[test]
    fn gender_parses_known_codes() {
        assert_eq!("w".parse::<Gender>().unwrap(), Gender::W);
        assert_eq!("M".parse::<Gender>().unwrap(), Gender::M);
        assert!(matches!(
            "L".parse::<Gender>(),
            Err(StatsError::UnknownGender(_))
        ));
    }

    #[test]
    fn nation_scope_splits_on_national_code() {
        assert!(NationScope::National.contains("SUI"));
        assert!(!NationScope::National.contains("AUT"));
        assert!(NationScope::International.contains("AUT"));
        assert!(!NationScope::International.contains("SUI"));
    }

    #[test]
    fn record_builder_sets_discipline_slot() {
        let record = AthleteSeasonRecord::new("1", "SUI", 2004, Gender::M, 2021)
            .with_pos(Discipline::Slalom, 12);
        assert_eq!(record.pos(Discipline::Slalom), Some(12));
        assert_eq!(record.pos(Discipline::Downhill), None);
        assert!(record.is_national());
    }
}
