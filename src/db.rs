use sqlx::{PgPool, Row};
use tracing::info;

use crate::error::StatsError;
use crate::load::{to_record, RawRow};
use crate::table::{column, RankingTable};

const LATEST_LIST_QUERY: &str = r#"
    SELECT competitorid::text AS competitorid,
           competitorname::text AS competitorname,
           nationcode::text AS nationcode,
           birthyear::text AS birthyear,
           gender::text AS gender,
           listname::text AS listname,
           dhpos::text AS dhpos, dhpoints::text AS dhpoints,
           slpos::text AS slpos, slpoints::text AS slpoints,
           gspos::text AS gspos, gspoints::text AS gspoints,
           sgpos::text AS sgpos, sgpoints::text AS sgpoints,
           acpos::text AS acpos, acpoints::text AS acpoints
    FROM fis_points
    WHERE listid = (SELECT MAX(listid) FROM fis_points)
    "#;

const SELECTED_COLUMNS: [&str; 16] = [
    column::COMPETITOR_ID,
    column::COMPETITOR_NAME,
    column::NATION_CODE,
    column::BIRTH_YEAR,
    column::GENDER,
    column::LIST_NAME,
    "dhpos",
    "dhpoints",
    "slpos",
    "slpoints",
    "gspos",
    "gspoints",
    "sgpos",
    "sgpoints",
    "acpos",
    "acpoints",
];

/// Loads the most recently published points list from the warehouse.
pub async fn fetch_latest_list(pool: &PgPool) -> Result<RankingTable, StatsError> {
    let rows = sqlx::query(LATEST_LIST_QUERY).fetch_all(pool).await?;
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let raw = RawRow {
            competitorid: row.try_get("competitorid")?,
            competitorname: row.try_get("competitorname")?,
            nationcode: row.try_get("nationcode")?,
            birthyear: row.try_get("birthyear")?,
            gender: row.try_get("gender")?,
            listyear: None,
            listname: row.try_get("listname")?,
            dhpos: row.try_get("dhpos")?,
            dhpoints: row.try_get("dhpoints")?,
            slpos: row.try_get("slpos")?,
            slpoints: row.try_get("slpoints")?,
            gspos: row.try_get("gspos")?,
            gspoints: row.try_get("gspoints")?,
            sgpos: row.try_get("sgpos")?,
            sgpoints: row.try_get("sgpoints")?,
            acpos: row.try_get("acpos")?,
            acpoints: row.try_get("acpoints")?,
        };
        records.push(to_record(index, raw, true)?);
    }

    info!(rows = records.len(), "loaded latest points list from warehouse");
    let columns = SELECTED_COLUMNS.iter().copied().chain(std::iter::once(column::LIST_YEAR));
    Ok(RankingTable::with_columns(records, columns))
}
