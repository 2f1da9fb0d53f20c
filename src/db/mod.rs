//! SQLite persistence.
//!
//! [`db::Db`] opens the database file and applies migrations. Each entity has
//! a repository that borrows a connection for the duration of one call:
//!
//! ```rust,no_run
//! use sitelog::db::{db::Db, sites::{NewSite, Sites}};
//! # use std::path::Path;
//!
//! let db = Db::init(Path::new("labour_management.db"))?;
//! let site = Sites::new(&db.conn).insert(&NewSite {
//!     name: "Tower B".to_string(),
//!     location: Some("Sector 62".to_string()),
//! })?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup and WAL checkpointing.
pub mod db;

/// Versioned schema changes and their history.
pub mod migrations;

pub mod attendance;
pub mod laborers;
pub mod materials;
pub mod payments;
pub mod sites;
