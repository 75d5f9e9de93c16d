//! Service catalog domain types.

use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{DEFAULT_LIST_LIMIT, DEFAULT_LIST_OFFSET, ORDER_DESC_KEYWORD};

/// Direction for ordering services by creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only the exact keyword `DESC` selects descending order.
    pub fn from_keyword(keyword: &str) -> Self {
        if keyword == ORDER_DESC_KEYWORD {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

/// Owner-scoped listing parameters after defaults are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceListQuery {
    pub limit: u64,
    pub offset: u64,
    pub name_filter: String,
    pub order: SortOrder,
}

impl ServiceListQuery {
    /// Normalize raw caller input; non-positive limit and offset fall back to defaults.
    pub fn new(limit: i64, offset: i64, name_filter: impl Into<String>, order: SortOrder) -> Self {
        Self {
            limit: u64::try_from(limit)
                .ok()
                .filter(|l| *l > 0)
                .unwrap_or(DEFAULT_LIST_LIMIT),
            offset: u64::try_from(offset)
                .ok()
                .filter(|o| *o > 0)
                .unwrap_or(DEFAULT_LIST_OFFSET),
            name_filter: name_filter.into(),
            order,
        }
    }
}

impl Default for ServiceListQuery {
    fn default() -> Self {
        Self::new(0, 0, "", SortOrder::Asc)
    }
}

/// One service in a listing, with its version count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult, ToSchema)]
pub struct ServiceSummary {
    #[schema(example = 1)]
    pub service_id: i32,
    #[schema(example = "backend")]
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[schema(example = 2)]
    pub versions_count: i64,
}

/// A service joined with one of its versions.
///
/// A service without versions yields a single row with the version fields unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult, ToSchema)]
pub struct ServiceVersionRow {
    pub service_id: i32,
    pub name: String,
    pub description: String,
    pub sv_id: Option<i32>,
    pub version: Option<String>,
    pub changelog: Option<String>,
}
