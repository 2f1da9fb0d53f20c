//! Laborer records.
//!
//! A laborer owns its attendance rows and payments; deleting one removes
//! both through `ON DELETE CASCADE`.
//!
//! ```rust,no_run
//! use sitelog::db::db::Db;
//! use sitelog::db::laborers::{Laborers, NewLaborer};
//! use chrono::NaiveDate;
//! # use std::path::Path;
//!
//! let db = Db::init(Path::new("labour_management.db"))?;
//! let laborer = Laborers::new(&db.conn).insert(&NewLaborer {
//!     name: "Ravi Kumar".to_string(),
//!     age: 32,
//!     gender: "Male".to_string(),
//!     daily_wage: 650.0,
//!     date_of_joining: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//! })?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::error::Result;
use crate::libs::lenient;
use crate::libs::pagination::PageParams;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const COLUMNS: &str = "id, name, age, gender, daily_wage, date_of_joining";

const INSERT_LABORER: &str = "INSERT INTO laborers (name, age, gender, daily_wage, date_of_joining) VALUES (?1, ?2, ?3, ?4, ?5)";

const UPDATE_LABORER: &str = "UPDATE laborers SET name = ?2, age = ?3, gender = ?4, daily_wage = ?5, date_of_joining = ?6 WHERE id = ?1";

const DELETE_LABORER: &str = "DELETE FROM laborers WHERE id = ?1";

const EXISTS_LABORER: &str = "SELECT EXISTS(SELECT 1 FROM laborers WHERE id = ?1)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laborer {
    pub id: i64,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub daily_wage: f64,
    pub date_of_joining: NaiveDate,
}

/// Body of a create or full-replace request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLaborer {
    pub name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub age: u32,
    pub gender: String,
    #[serde(deserialize_with = "lenient::number")]
    pub daily_wage: f64,
    pub date_of_joining: NaiveDate,
}

impl Laborer {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Laborer {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            gender: row.get(3)?,
            daily_wage: row.get(4)?,
            date_of_joining: row.get(5)?,
        })
    }
}

pub struct Laborers<'a> {
    conn: &'a Connection,
}

impl<'a> Laborers<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, laborer: &NewLaborer) -> Result<Laborer> {
        self.conn.execute(
            INSERT_LABORER,
            params![laborer.name, laborer.age, laborer.gender, laborer.daily_wage, laborer.date_of_joining],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(Laborer {
            id,
            name: laborer.name.clone(),
            age: laborer.age,
            gender: laborer.gender.clone(),
            daily_wage: laborer.daily_wage,
            date_of_joining: laborer.date_of_joining,
        })
    }

    pub fn get(&self, id: i64) -> Result<Option<Laborer>> {
        let sql = format!("SELECT {} FROM laborers WHERE id = ?1", COLUMNS);
        let laborer = self.conn.query_row(&sql, params![id], Laborer::from_row).optional()?;
        Ok(laborer)
    }

    pub fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.conn.query_row(EXISTS_LABORER, params![id], |row| row.get(0))?)
    }

    pub fn list(&self, page: PageParams) -> Result<Vec<Laborer>> {
        let (limit, offset) = page.sql_bounds();
        let sql = format!("SELECT {} FROM laborers ORDER BY id LIMIT ?1 OFFSET ?2", COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let laborers = stmt
            .query_map(params![limit, offset], Laborer::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(laborers)
    }

    /// Case-insensitive substring match on the name.
    ///
    /// Both sides go through SQLite's `LOWER`, which folds ASCII only, so
    /// non-ASCII letters match when their case is the same.
    pub fn search(&self, name: &str) -> Result<Vec<Laborer>> {
        let pattern = format!("%{}%", escape_like(name));
        let sql = format!(
            "SELECT {} FROM laborers WHERE LOWER(name) LIKE LOWER(?1) ESCAPE '\\' ORDER BY id",
            COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let laborers = stmt
            .query_map(params![pattern], Laborer::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(laborers)
    }

    /// Overwrites every field. Returns `None` if no laborer has this id.
    pub fn update(&self, id: i64, laborer: &NewLaborer) -> Result<Option<Laborer>> {
        let changed = self.conn.execute(
            UPDATE_LABORER,
            params![id, laborer.name, laborer.age, laborer.gender, laborer.daily_wage, laborer.date_of_joining],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get(id)
    }

    /// Removes the laborer with its attendance and payments.
    pub fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.conn.execute(DELETE_LABORER, params![id])? > 0)
    }
}

/// Escapes `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
