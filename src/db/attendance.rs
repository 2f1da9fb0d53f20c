//! Attendance records, one per laborer per working day.
//!
//! Responses carry the laborer's name, joined in at read time. The `present`
//! column stores whatever label the client sent.

use crate::libs::error::{AppError, Result};
use crate::libs::lenient;
use crate::libs::messages::Message;
use crate::libs::pagination::PageParams;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const SELECT_ATTENDANCE: &str = "SELECT a.id, a.laborer_id, l.name, a.date, a.present, a.hours_worked, a.site_name
    FROM attendance a JOIN laborers l ON l.id = a.laborer_id";

const INSERT_ATTENDANCE: &str = "INSERT INTO attendance (laborer_id, date, present, hours_worked, site_name) VALUES (?1, ?2, ?3, ?4, ?5)";

const UPDATE_ATTENDANCE: &str = "UPDATE attendance SET
    date = COALESCE(?2, date),
    present = COALESCE(?3, present),
    hours_worked = COALESCE(?4, hours_worked),
    site_name = COALESCE(?5, site_name)
    WHERE id = ?1";

const DELETE_ATTENDANCE: &str = "DELETE FROM attendance WHERE id = ?1";

const COUNT_ATTENDANCE: &str = "SELECT COUNT(*) FROM attendance";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: i64,
    pub laborer_id: i64,
    pub laborer_name: String,
    pub date: NaiveDate,
    pub present: String,
    pub hours_worked: f64,
    pub site_name: String,
}

/// Body of `POST /labours/:id/attendance/`.
///
/// The laborer comes from the path; a `laborer_id` in the body is accepted
/// only when it agrees with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttendance {
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub laborer_id: Option<i64>,
    pub date: NaiveDate,
    pub present: String,
    #[serde(deserialize_with = "lenient::number")]
    pub hours_worked: f64,
    pub site_name: String,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceUpdate {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub present: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub hours_worked: Option<f64>,
    #[serde(default)]
    pub site_name: Option<String>,
}

impl Attendance {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Attendance {
            id: row.get(0)?,
            laborer_id: row.get(1)?,
            laborer_name: row.get(2)?,
            date: row.get(3)?,
            present: row.get(4)?,
            hours_worked: row.get(5)?,
            site_name: row.get(6)?,
        })
    }
}

pub struct AttendanceRecords<'a> {
    conn: &'a Connection,
}

impl<'a> AttendanceRecords<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Records a day for `laborer_id`.
    ///
    /// Fails with `NotFound` when the laborer does not exist and with
    /// `Invalid` when the body names a different laborer than the path.
    pub fn insert(&self, laborer_id: i64, record: &NewAttendance) -> Result<Attendance> {
        if let Some(body_id) = record.laborer_id {
            if body_id != laborer_id {
                return Err(AppError::Invalid(Message::LaborerMismatch {
                    path: laborer_id,
                    body: body_id,
                }));
            }
        }

        let laborer_name: Option<String> = self
            .conn
            .query_row("SELECT name FROM laborers WHERE id = ?1", params![laborer_id], |row| row.get(0))
            .optional()?;
        let Some(laborer_name) = laborer_name else {
            return Err(AppError::NotFound(Message::LaborerNotFound));
        };

        self.conn.execute(
            INSERT_ATTENDANCE,
            params![laborer_id, record.date, record.present, record.hours_worked, record.site_name],
        )?;

        Ok(Attendance {
            id: self.conn.last_insert_rowid(),
            laborer_id,
            laborer_name,
            date: record.date,
            present: record.present.clone(),
            hours_worked: record.hours_worked,
            site_name: record.site_name.clone(),
        })
    }

    pub fn get(&self, id: i64) -> Result<Option<Attendance>> {
        let sql = format!("{} WHERE a.id = ?1", SELECT_ATTENDANCE);
        let record = self.conn.query_row(&sql, params![id], Attendance::from_row).optional()?;
        Ok(record)
    }

    pub fn list(&self, page: PageParams) -> Result<Vec<Attendance>> {
        let (limit, offset) = page.sql_bounds();
        let sql = format!("{} ORDER BY a.id LIMIT ?1 OFFSET ?2", SELECT_ATTENDANCE);
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![limit, offset], Attendance::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn count(&self) -> Result<u64> {
        let total: i64 = self.conn.query_row(COUNT_ATTENDANCE, [], |row| row.get(0))?;
        Ok(total.max(0) as u64)
    }

    /// Every record of one laborer, oldest first.
    pub fn list_by_laborer(&self, laborer_id: i64) -> Result<Vec<Attendance>> {
        let sql = format!("{} WHERE a.laborer_id = ?1 ORDER BY a.id", SELECT_ATTENDANCE);
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![laborer_id], Attendance::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn update(&self, id: i64, patch: &AttendanceUpdate) -> Result<Option<Attendance>> {
        let changed = self.conn.execute(
            UPDATE_ATTENDANCE,
            params![id, patch.date, patch.present, patch.hours_worked, patch.site_name],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get(id)
    }

    pub fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.conn.execute(DELETE_ATTENDANCE, params![id])? > 0)
    }
}
