//! Cohort statistics over FIS points lists.
//!
//! The aggregation core (`topn`, `cohort`) works on an in-memory
//! [`RankingTable`]; `load` and `db` build that table from a CSV export or
//! the warehouse, and `report` renders the resulting rows.

pub mod cohort;
pub mod db;
pub mod error;
pub mod load;
pub mod models;
pub mod report;
pub mod table;
pub mod topn;

pub use error::StatsError;
pub use models::{
    AthleteSeasonRecord, CohortCountRow, CohortMeanRow, Discipline, Gender, NationScope, TopCounts,
    TopEntry,
};
pub use table::RankingTable;
