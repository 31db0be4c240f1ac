use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("invalid value {value:?} in column {column} (row {row})")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("birth year {birth_year} with FIS year offset {fis_year_offset} is out of range")]
    SeasonOutOfRange {
        birth_year: i32,
        fis_year_offset: i32,
    },

    #[error("unknown discipline: {0}")]
    UnknownDiscipline(String),

    #[error("unknown gender: {0}")]
    UnknownGender(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
