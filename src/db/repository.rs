use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DatabaseError;
use crate::models::{DatasetRow, HealthRecord, RiskLevel};

// ═══════════════════════════════════════════
// Assessment entries
// ═══════════════════════════════════════════

/// Insert an accepted assessment. Returns the generated id.
pub fn insert_entry(
    conn: &Connection,
    record: &HealthRecord,
    risk_score: u32,
    risk_level: RiskLevel,
) -> Result<Uuid, DatabaseError> {
    let id = Uuid::new_v4();
    let symptoms: Vec<&str> = record.symptoms.iter().collect();

    conn.execute(
        "INSERT INTO pcos_entries (id, age, cycle_length, period_length, symptoms, city,
         payload, risk_score, risk_level, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            id.to_string(),
            record.age,
            record.cycle_length,
            record.period_length,
            serde_json::to_string(&symptoms)?,
            record.city,
            serde_json::to_string(record)?,
            risk_score,
            risk_level.as_str(),
            Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(id)
}

pub fn count_entries(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM pcos_entries", [], |row| row.get(0))?;
    Ok(count)
}

// ═══════════════════════════════════════════
// Historical dataset
// ═══════════════════════════════════════════

/// Fetch up to `limit` dataset rows in insertion order.
pub fn fetch_dataset_rows(conn: &Connection, limit: usize) -> Result<Vec<DatasetRow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT age, cycle_length, period_length, pcos, irregular_missed_periods,
         hair_growth_chin, acne_or_skin_tags, weight_change, hair_thinning_or_hair_loss,
         always_tired
         FROM pcos_dataset_raw ORDER BY id LIMIT ?1",
    )?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt
        .query_map(params![limit], |row| {
            Ok(DatasetRow {
                age: row.get(0)?,
                cycle_length: row.get(1)?,
                period_length: row.get(2)?,
                pcos: row.get(3)?,
                irregular_missed_periods: row.get(4)?,
                hair_growth_chin: row.get(5)?,
                acne_or_skin_tags: row.get(6)?,
                weight_change: row.get(7)?,
                hair_thinning_or_hair_loss: row.get(8)?,
                always_tired: row.get(9)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn insert_dataset_row(conn: &Connection, row: &DatasetRow) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO pcos_dataset_raw (age, cycle_length, period_length, pcos,
         irregular_missed_periods, hair_growth_chin, acne_or_skin_tags, weight_change,
         hair_thinning_or_hair_loss, always_tired)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            row.age,
            row.cycle_length,
            row.period_length,
            row.pcos,
            row.irregular_missed_periods,
            row.hair_growth_chin,
            row.acne_or_skin_tags,
            row.weight_change,
            row.hair_thinning_or_hair_loss,
            row.always_tired,
        ],
    )?;
    Ok(())
}

/// Insert many dataset rows in one transaction. Returns the number inserted.
pub fn import_dataset_rows(conn: &mut Connection, rows: &[DatasetRow]) -> Result<usize, DatabaseError> {
    let tx = conn.transaction()?;
    for row in rows {
        insert_dataset_row(&tx, row)?;
    }
    tx.commit()?;
    Ok(rows.len())
}

pub fn count_dataset_rows(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM pcos_dataset_raw", [], |row| row.get(0))?;
    Ok(count)
}

/// Read a JSON array of dataset rows from disk.
pub fn read_dataset_file(path: &Path) -> Result<Vec<DatasetRow>, DatabaseError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
