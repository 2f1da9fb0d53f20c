//! Construction sites.
//!
//! Site names are unique. A site cannot be deleted while materials or
//! payments still point at it.

use crate::libs::error::{is_unique_violation, AppError, Result};
use crate::libs::messages::Message;
use crate::libs::pagination::PageParams;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const INSERT_SITE: &str = "INSERT INTO sites (name, location) VALUES (?1, ?2)";

const UPDATE_SITE: &str = "UPDATE sites SET name = ?2, location = ?3 WHERE id = ?1";

const DELETE_SITE: &str = "DELETE FROM sites WHERE id = ?1";

const SELECT_SITE: &str = "SELECT id, name, location FROM sites WHERE id = ?1";

const SELECT_SITES: &str = "SELECT id, name, location FROM sites ORDER BY id LIMIT ?1 OFFSET ?2";

const EXISTS_SITE: &str = "SELECT EXISTS(SELECT 1 FROM sites WHERE id = ?1)";

const COUNT_REFERENCES: &str = "SELECT
    (SELECT COUNT(*) FROM materials WHERE site_id = ?1),
    (SELECT COUNT(*) FROM payments WHERE site_id = ?1)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSite {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl Site {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Site {
            id: row.get(0)?,
            name: row.get(1)?,
            location: row.get(2)?,
        })
    }
}

pub struct Sites<'a> {
    conn: &'a Connection,
}

impl<'a> Sites<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Fails with `Conflict` if the name is already used.
    pub fn insert(&self, site: &NewSite) -> Result<Site> {
        self.conn
            .execute(INSERT_SITE, params![site.name, site.location])
            .map_err(|e| name_conflict(e, &site.name))?;
        Ok(Site {
            id: self.conn.last_insert_rowid(),
            name: site.name.clone(),
            location: site.location.clone(),
        })
    }

    pub fn get(&self, id: i64) -> Result<Option<Site>> {
        Ok(self.conn.query_row(SELECT_SITE, params![id], Site::from_row).optional()?)
    }

    pub fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.conn.query_row(EXISTS_SITE, params![id], |row| row.get(0))?)
    }

    pub fn list(&self, page: PageParams) -> Result<Vec<Site>> {
        let (limit, offset) = page.sql_bounds();
        let mut stmt = self.conn.prepare(SELECT_SITES)?;
        let sites = stmt
            .query_map(params![limit, offset], Site::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sites)
    }

    pub fn update(&self, id: i64, site: &NewSite) -> Result<Option<Site>> {
        let changed = self
            .conn
            .execute(UPDATE_SITE, params![id, site.name, site.location])
            .map_err(|e| name_conflict(e, &site.name))?;
        if changed == 0 {
            return Ok(None);
        }
        Ok(Some(Site {
            id,
            name: site.name.clone(),
            location: site.location.clone(),
        }))
    }

    /// Deletes an unreferenced site.
    ///
    /// Returns `Ok(false)` when the site does not exist and `Conflict` while
    /// materials or payments still reference it.
    pub fn delete(&self, id: i64) -> Result<bool> {
        if !self.exists(id)? {
            return Ok(false);
        }
        let (materials, payments): (i64, i64) = self.conn.query_row(COUNT_REFERENCES, params![id], |row| Ok((row.get(0)?, row.get(1)?)))?;
        if materials > 0 || payments > 0 {
            return Err(AppError::Conflict(Message::SiteInUse { materials, payments }));
        }
        Ok(self.conn.execute(DELETE_SITE, params![id])? > 0)
    }
}

fn name_conflict(err: rusqlite::Error, name: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict(Message::SiteNameTaken(name.to_string()))
    } else {
        AppError::Database(err)
    }
}
