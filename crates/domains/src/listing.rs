//! # Ad listing queries
//!
//! Turns untrusted query-string parameters into a validated [`ListQuery`].
//! Sort selectors are closed enums, so a caller-supplied column name can
//! never reach the store.

use serde::Deserialize;

use crate::error::{DomainError, Result};

/// Number of ads per page when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Raw listing parameters exactly as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListParams {
    pub page: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
}

/// Allow-listed sort columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Price,
}

impl SortField {
    /// Unknown or empty selectors fall back to creation time.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("price") => Self::Price,
            _ => Self::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Anything other than `desc` sorts ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// Inclusive price bounds. A bound is only present when it is greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }
}

/// A validated listing request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort: SortField,
    pub direction: SortDirection,
    pub price: PriceRange,
}

impl ListQuery {
    /// Validates raw parameters. Malformed numbers are client errors; every
    /// other parameter has a safe default.
    pub fn parse(raw: &RawListParams, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(DomainError::internal("page size must be positive"));
        }

        let page = match non_empty(raw.page.as_deref()) {
            None => 1,
            Some(s) => s
                .parse::<u32>()
                .map_err(|_| DomainError::validation(format!("invalid page: {s:?}")))?,
        };

        Ok(Self {
            page: page.max(1),
            page_size,
            sort: SortField::parse(raw.sort_by.as_deref()),
            direction: SortDirection::parse(raw.sort_dir.as_deref()),
            price: PriceRange {
                min: parse_bound("price_min", raw.price_min.as_deref())?,
                max: parse_bound("price_max", raw.price_max.as_deref())?,
            },
        })
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    /// Rows to skip: `(page - 1) * page_size`, so page 1 starts at 0.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortField::default(),
            direction: SortDirection::default(),
            price: PriceRange::default(),
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<f64>> {
    let Some(s) = non_empty(raw) else {
        return Ok(None);
    };
    let value: f64 = s
        .parse()
        .map_err(|_| DomainError::validation(format!("invalid {name}: {s:?}")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{name} must be a non-negative number"
        )));
    }
    Ok((value > 0.0).then_some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> RawListParams {
        let mut raw = RawListParams::default();
        for (key, value) in pairs {
            let value = Some((*value).to_string());
            match *key {
                "page" => raw.page = value,
                "sort_by" => raw.sort_by = value,
                "sort_dir" => raw.sort_dir = value,
                "price_min" => raw.price_min = value,
                "price_max" => raw.price_max = value,
                other => panic!("unknown param {other}"),
            }
        }
        raw
    }

    #[test]
    fn defaults_when_nothing_supplied() {
        let q = ListQuery::parse(&RawListParams::default(), 10).unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.offset(), 0);
        assert_eq!(q.limit(), 10);
        assert_eq!(q.sort, SortField::CreatedAt);
        assert_eq!(q.direction, SortDirection::Asc);
        assert_eq!(q.price, PriceRange::default());
    }

    #[test]
    fn offset_is_zero_based() {
        for (page, expected) in [("0", 0), ("1", 0), ("2", 10), ("3", 20), ("17", 160)] {
            let q = ListQuery::parse(&params(&[("page", page)]), 10).unwrap();
            assert_eq!(q.offset(), expected, "page {page}");
        }
        let q = ListQuery::parse(&params(&[("page", "4")]), 25).unwrap();
        assert_eq!(q.offset(), 75);
    }

    #[test]
    fn offset_does_not_overflow_on_large_pages() {
        let q = ListQuery::parse(&params(&[("page", &u32::MAX.to_string())]), u32::MAX).unwrap();
        assert_eq!(q.offset(), u64::from(u32::MAX - 1) * u64::from(u32::MAX));
    }

    #[test]
    fn non_numeric_page_is_rejected() {
        for bad in ["abc", "-1", "1.5", "1e3"] {
            let err = ListQuery::parse(&params(&[("page", bad)]), 10).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{bad}");
        }
    }

    #[test]
    fn unknown_sort_fields_fall_back_to_created_at() {
        for raw in ["", "title", "ads.price; DROP TABLE ads", "users.username", "id"] {
            let q = ListQuery::parse(&params(&[("sort_by", raw)]), 10).unwrap();
            assert_eq!(q.sort, SortField::CreatedAt, "{raw:?}");
        }
        let q = ListQuery::parse(&params(&[("sort_by", "PRICE")]), 10).unwrap();
        assert_eq!(q.sort, SortField::Price);
    }

    #[test]
    fn unknown_directions_sort_ascending() {
        let q = ListQuery::parse(&params(&[("sort_dir", "DESC")]), 10).unwrap();
        assert_eq!(q.direction, SortDirection::Desc);
        for raw in ["", "down", "desc; --", "ascending"] {
            let q = ListQuery::parse(&params(&[("sort_dir", raw)]), 10).unwrap();
            assert_eq!(q.direction, SortDirection::Asc, "{raw:?}");
        }
    }

    #[test]
    fn price_bounds_only_filter_when_positive() {
        let q = ListQuery::parse(&params(&[("price_min", "0"), ("price_max", "250.5")]), 10)
            .unwrap();
        assert_eq!(q.price.min, None);
        assert_eq!(q.price.max, Some(250.5));
    }

    #[test]
    fn malformed_price_bounds_are_rejected() {
        for (key, bad) in [("price_min", "cheap"), ("price_max", "-5"), ("price_min", "inf")] {
            let err = ListQuery::parse(&params(&[(key, bad)]), 10).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{key}={bad}");
        }
    }

    #[test]
    fn inverted_range_contains_nothing() {
        let q = ListQuery::parse(&params(&[("price_min", "300"), ("price_max", "100")]), 10)
            .unwrap();
        assert!([0.0, 100.0, 200.0, 300.0, 1000.0]
            .iter()
            .all(|p| !q.price.contains(*p)));
    }
}
