//! # sitelog
//!
//! Admin web service for construction sites: laborers, their daily
//! attendance and wages, material deliveries per site and wage payments.
//!
//! - **REST API** over a single SQLite file (`server`, `db`)
//! - **Admin pages** behind a cookie-session login
//! - **Backups** of the database file to a Google Drive folder (`api`)
//! - **CLI** to run the server, write the config and manage backups (`commands`)
//!
//! ```rust,no_run
//! use sitelog::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
pub mod server;
