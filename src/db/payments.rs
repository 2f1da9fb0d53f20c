//! Wage payments to laborers, booked against a site.

use crate::libs::error::{AppError, Result};
use crate::libs::lenient;
use crate::libs::messages::Message;
use crate::libs::pagination::PageParams;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const SELECT_PAYMENT: &str = "SELECT p.id, p.amount, p.date, p.labor_id, l.name, p.site_id, s.name, p.material_name, p.description
    FROM payments p
    JOIN laborers l ON l.id = p.labor_id
    JOIN sites s ON s.id = p.site_id";

const INSERT_PAYMENT: &str =
    "INSERT INTO payments (amount, date, labor_id, site_id, material_name, description) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const UPDATE_PAYMENT: &str =
    "UPDATE payments SET amount = ?2, date = ?3, labor_id = ?4, site_id = ?5, material_name = ?6, description = ?7 WHERE id = ?1";

const DELETE_PAYMENT: &str = "DELETE FROM payments WHERE id = ?1";

const COUNT_PAYMENTS: &str = "SELECT COUNT(*) FROM payments";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    pub labor_id: i64,
    pub labor_name: String,
    pub site_id: i64,
    pub site_name: String,
    pub material_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    #[serde(deserialize_with = "lenient::number")]
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(deserialize_with = "lenient::number")]
    pub labor_id: i64,
    #[serde(deserialize_with = "lenient::number")]
    pub site_id: i64,
    #[serde(default)]
    pub material_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Payment {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Payment {
            id: row.get(0)?,
            amount: row.get(1)?,
            date: row.get(2)?,
            labor_id: row.get(3)?,
            labor_name: row.get(4)?,
            site_id: row.get(5)?,
            site_name: row.get(6)?,
            material_name: row.get(7)?,
            description: row.get(8)?,
        })
    }
}

pub struct Payments<'a> {
    conn: &'a Connection,
}

impl<'a> Payments<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, payment: &NewPayment) -> Result<Payment> {
        self.require_references(payment)?;
        self.conn.execute(
            INSERT_PAYMENT,
            params![
                payment.amount,
                payment.date,
                payment.labor_id,
                payment.site_id,
                payment.material_name,
                payment.description
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get(id)?.ok_or(AppError::NotFound(Message::PaymentNotFound))
    }

    pub fn get(&self, id: i64) -> Result<Option<Payment>> {
        let sql = format!("{} WHERE p.id = ?1", SELECT_PAYMENT);
        Ok(self.conn.query_row(&sql, params![id], Payment::from_row).optional()?)
    }

    pub fn list(&self, page: PageParams) -> Result<Vec<Payment>> {
        let (limit, offset) = page.sql_bounds();
        let sql = format!("{} ORDER BY p.id LIMIT ?1 OFFSET ?2", SELECT_PAYMENT);
        let mut stmt = self.conn.prepare(&sql)?;
        let payments = stmt
            .query_map(params![limit, offset], Payment::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(payments)
    }

    pub fn count(&self) -> Result<u64> {
        let total: i64 = self.conn.query_row(COUNT_PAYMENTS, [], |row| row.get(0))?;
        Ok(total.max(0) as u64)
    }

    pub fn update(&self, id: i64, payment: &NewPayment) -> Result<Option<Payment>> {
        if self.get(id)?.is_none() {
            return Ok(None);
        }
        self.require_references(payment)?;
        self.conn.execute(
            UPDATE_PAYMENT,
            params![
                id,
                payment.amount,
                payment.date,
                payment.labor_id,
                payment.site_id,
                payment.material_name,
                payment.description
            ],
        )?;
        self.get(id)
    }

    pub fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.conn.execute(DELETE_PAYMENT, params![id])? > 0)
    }

    fn require_references(&self, payment: &NewPayment) -> Result<()> {
        let (laborer, site): (bool, bool) = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM laborers WHERE id = ?1), EXISTS(SELECT 1 FROM sites WHERE id = ?2)",
            params![payment.labor_id, payment.site_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        if !laborer {
            return Err(AppError::NotFound(Message::LaborerNotFound));
        }
        if !site {
            return Err(AppError::NotFound(Message::SiteNotFound));
        }
        Ok(())
    }
}
