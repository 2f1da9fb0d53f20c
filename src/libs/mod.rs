//! Shared building blocks for the sitelog service.
//!
//! - configuration and the platform data directory
//! - the [`error::AppError`] type and user-facing [`messages`]
//! - paging, lenient number parsing, sessions and admin authentication
//! - logging setup

pub mod auth;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod lenient;
pub mod logging;
pub mod messages;
pub mod pagination;
pub mod session;
