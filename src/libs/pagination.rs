//! Offset/limit paging.
//!
//! List endpoints take `skip` and `limit` query parameters. The attendance and
//! payment listings wrap their rows in a [`Page`] that also reports the total
//! row count and the offsets of the neighbouring pages.

use crate::libs::error::{AppError, Result};
use crate::libs::messages::Message;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageParams {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    /// Rejects a zero limit or one above [`MAX_LIMIT`].
    pub fn validate(self) -> Result<Self> {
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(AppError::Invalid(Message::LimitOutOfRange {
                limit: self.limit,
                max: MAX_LIMIT,
            }));
        }
        Ok(self)
    }

    /// `(limit, offset)` as SQLite integers.
    pub fn sql_bounds(&self) -> (i64, i64) {
        let limit = i64::try_from(self.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(self.skip).unwrap_or(i64::MAX);
        (limit, offset)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub next: Option<u64>,
    pub prev: Option<u64>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, params: PageParams, total: u64) -> Self {
        let end = params.skip.saturating_add(params.limit);
        let next = (end < total).then_some(end);
        // Clamp at zero when skip is not a multiple of limit
        let prev = (params.skip > 0).then(|| params.skip.saturating_sub(params.limit));
        Self {
            results,
            next,
            prev,
            total,
        }
    }
}
