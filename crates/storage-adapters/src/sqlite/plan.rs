//! Compiles a [`ListQuery`] into one of four static statements.
//!
//! The sort column and direction select the statement text; prices, limit
//! and offset are always bound parameters.

use domains::{DomainError, ListQuery, Result, SortDirection, SortField};

macro_rules! list_ads_sql {
    ($order:literal) => {
        concat!(
            "SELECT ads.id, ads.user_id, users.username, ads.title, ads.text, ",
            "ads.image_url, ads.price ",
            "FROM ads JOIN users ON users.id = ads.user_id ",
            "WHERE (?1 IS NULL OR ads.price >= ?1) AND (?2 IS NULL OR ads.price <= ?2) ",
            "ORDER BY ",
            $order,
            ", ads.id ASC ",
            "LIMIT ?3 OFFSET ?4"
        )
    };
}

const BY_CREATED_ASC: &str = list_ads_sql!("ads.created_at ASC");
const BY_CREATED_DESC: &str = list_ads_sql!("ads.created_at DESC");
const BY_PRICE_ASC: &str = list_ads_sql!("ads.price ASC");
const BY_PRICE_DESC: &str = list_ads_sql!("ads.price DESC");

/// A ready-to-bind listing statement.
#[derive(Debug, Clone, PartialEq)]
pub struct AdQueryPlan {
    pub sql: &'static str,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub limit: i64,
    pub offset: i64,
}

impl AdQueryPlan {
    pub fn compile(query: &ListQuery) -> Result<Self> {
        let sql = match (query.sort, query.direction) {
            (SortField::CreatedAt, SortDirection::Asc) => BY_CREATED_ASC,
            (SortField::CreatedAt, SortDirection::Desc) => BY_CREATED_DESC,
            (SortField::Price, SortDirection::Asc) => BY_PRICE_ASC,
            (SortField::Price, SortDirection::Desc) => BY_PRICE_DESC,
        };
        let limit = i64::try_from(query.limit())
            .map_err(|_| DomainError::validation("page size out of range"))?;
        let offset = i64::try_from(query.offset())
            .map_err(|_| DomainError::validation("page out of range"))?;

        Ok(Self {
            sql,
            price_min: query.price.min,
            price_max: query.price.max,
            limit,
            offset,
        })
    }
}
