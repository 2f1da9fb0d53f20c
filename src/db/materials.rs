//! Material deliveries to sites.
//!
//! Every material belongs to an existing site; the site is checked before any
//! row is written so a bad `site_id` never reaches the table.

use crate::libs::error::{AppError, Result};
use crate::libs::lenient;
use crate::libs::messages::Message;
use crate::libs::pagination::PageParams;
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SELECT_MATERIAL: &str = "SELECT m.id, m.name, m.quantity, m.unit, m.site_id, s.name, m.arrival_date, m.transport_type
    FROM materials m JOIN sites s ON s.id = m.site_id";

const INSERT_MATERIAL: &str =
    "INSERT INTO materials (name, quantity, unit, site_id, arrival_date, transport_type) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const UPDATE_MATERIAL: &str =
    "UPDATE materials SET name = ?2, quantity = ?3, unit = ?4, site_id = ?5, arrival_date = ?6, transport_type = ?7 WHERE id = ?1";

const DELETE_MATERIAL: &str = "DELETE FROM materials WHERE id = ?1";

const EXISTS_SITE: &str = "SELECT EXISTS(SELECT 1 FROM sites WHERE id = ?1)";

/// Unit a material quantity is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Kg,
    Ton,
    Bag,
    Litre,
    CubicMeter,
    SquareMeter,
    Piece,
    TruckLoad,
}

impl UnitType {
    pub const ALL: [UnitType; 8] = [
        UnitType::Kg,
        UnitType::Ton,
        UnitType::Bag,
        UnitType::Litre,
        UnitType::CubicMeter,
        UnitType::SquareMeter,
        UnitType::Piece,
        UnitType::TruckLoad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Kg => "kg",
            UnitType::Ton => "ton",
            UnitType::Bag => "bag",
            UnitType::Litre => "litre",
            UnitType::CubicMeter => "cubic_meter",
            UnitType::SquareMeter => "square_meter",
            UnitType::Piece => "piece",
            UnitType::TruckLoad => "truck_load",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = Message;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitType::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| Message::UnknownUnit(s.to_string()))
    }
}

impl ToSql for UnitType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for UnitType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse().map_err(|e: Message| FromSqlError::Other(e.to_string().into()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: UnitType,
    pub site_id: i64,
    pub site_name: String,
    pub arrival_date: NaiveDate,
    pub transport_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMaterial {
    pub name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub quantity: f64,
    pub unit: UnitType,
    #[serde(deserialize_with = "lenient::number")]
    pub site_id: i64,
    pub arrival_date: NaiveDate,
    #[serde(default)]
    pub transport_type: Option<String>,
}

impl Material {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Material {
            id: row.get(0)?,
            name: row.get(1)?,
            quantity: row.get(2)?,
            unit: row.get(3)?,
            site_id: row.get(4)?,
            site_name: row.get(5)?,
            arrival_date: row.get(6)?,
            transport_type: row.get(7)?,
        })
    }
}

pub struct Materials<'a> {
    conn: &'a Connection,
}

impl<'a> Materials<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Fails with `NotFound` when the site does not exist; nothing is written then.
    pub fn insert(&self, material: &NewMaterial) -> Result<Material> {
        self.require_site(material.site_id)?;
        self.conn.execute(
            INSERT_MATERIAL,
            params![
                material.name,
                material.quantity,
                material.unit,
                material.site_id,
                material.arrival_date,
                material.transport_type
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get(id)?.ok_or(AppError::NotFound(Message::MaterialNotFound))
    }

    pub fn get(&self, id: i64) -> Result<Option<Material>> {
        let sql = format!("{} WHERE m.id = ?1", SELECT_MATERIAL);
        Ok(self.conn.query_row(&sql, params![id], Material::from_row).optional()?)
    }

    pub fn list(&self, page: PageParams) -> Result<Vec<Material>> {
        let (limit, offset) = page.sql_bounds();
        let sql = format!("{} ORDER BY m.id LIMIT ?1 OFFSET ?2", SELECT_MATERIAL);
        let mut stmt = self.conn.prepare(&sql)?;
        let materials = stmt
            .query_map(params![limit, offset], Material::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(materials)
    }

    /// Full replace. `None` when the material is missing; `NotFound` when the new site is.
    pub fn update(&self, id: i64, material: &NewMaterial) -> Result<Option<Material>> {
        if self.get(id)?.is_none() {
            return Ok(None);
        }
        self.require_site(material.site_id)?;
        self.conn.execute(
            UPDATE_MATERIAL,
            params![
                id,
                material.name,
                material.quantity,
                material.unit,
                material.site_id,
                material.arrival_date,
                material.transport_type
            ],
        )?;
        self.get(id)
    }

    /// Deletes and returns the removed material.
    pub fn delete(&self, id: i64) -> Result<Option<Material>> {
        let Some(material) = self.get(id)? else {
            return Ok(None);
        };
        self.conn.execute(DELETE_MATERIAL, params![id])?;
        Ok(Some(material))
    }

    fn require_site(&self, site_id: i64) -> Result<()> {
        let exists: bool = self.conn.query_row(EXISTS_SITE, params![site_id], |row| row.get(0))?;
        if !exists {
            return Err(AppError::NotFound(Message::SiteNotFound));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::UnitType;

    #[test]
    fn unit_names_match_serde_names() {
        for unit in UnitType::ALL {
            let json = serde_json::to_string(&unit).unwrap();
            assert_eq!(json, format!("\"{}\"", unit.as_str()));
            assert_eq!(unit.as_str().parse::<UnitType>().unwrap(), unit);
        }
    }

    #[test]
    fn unknown_unit_is_rejected() {
        assert!("gallon".parse::<UnitType>().is_err());
        assert!(serde_json::from_str::<UnitType>("\"gallon\"").is_err());
    }
}
