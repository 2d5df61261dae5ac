//! Query parameter types for the read endpoints

use almacen_common::Pagination;
use almacen_errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::movement_type::MovementType;
use crate::domain::repositories::{AuditFilter, MovementFilter, StockFilter};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovementListQuery {
    #[serde(rename = "type")]
    pub movement_type: Option<String>,
    pub product_id: Option<Uuid>,
    pub warehouse_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl MovementListQuery {
    pub fn filter(&self) -> AppResult<MovementFilter> {
        let movement_type = match self.movement_type.as_deref() {
            Some(raw) => Some(MovementType::parse(raw)?),
            None => None,
        };
        Ok(MovementFilter {
            movement_type,
            product_id: self.product_id,
            warehouse_id: self.warehouse_id,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from_params(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockListQuery {
    pub product_id: Option<Uuid>,
    pub warehouse_id: Option<Uuid>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl StockListQuery {
    pub fn filter(&self) -> StockFilter {
        StockFilter {
            product_id: self.product_id,
            warehouse_id: self.warehouse_id,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from_params(self.page, self.limit)
    }
}

/// Summary window, one calendar month; defaults to the current month
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryQuery {
    /// `YYYY-MM`
    pub month: Option<String>,
}

impl SummaryQuery {
    /// Resolve the month into a half-open `[start, end)` interval
    pub fn range(&self) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
        let (year, month) = match self.month.as_deref() {
            Some(raw) => parse_month(raw)?,
            None => {
                let today = Utc::now().date_naive();
                (today.year(), today.month())
            }
        };

        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::validation("invalid month"))?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| AppError::validation("invalid month"))?;

        let start = Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap_or_default());
        let end = Utc.from_utc_datetime(&end.and_hms_opt(0, 0, 0).unwrap_or_default());
        Ok((start, end))
    }
}

fn parse_month(raw: &str) -> AppResult<(i32, u32)> {
    let invalid = || AppError::validation("month must be formatted as YYYY-MM");
    let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditListQuery {
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
    pub entity: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl AuditListQuery {
    pub fn filter(&self) -> AuditFilter {
        AuditFilter {
            user_id: self.user_id,
            action: self.action.clone(),
            entity: self.entity.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from_params(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_month_range() {
        let query = SummaryQuery {
            month: Some("2026-08".to_string()),
        };
        let (start, end) = query.range().unwrap();
        assert_eq!(start.to_rfc3339(), "2026-08-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-09-01T00:00:00+00:00");
    }

    #[test]
    fn test_summary_december_rolls_over() {
        let query = SummaryQuery {
            month: Some("2025-12".to_string()),
        };
        let (start, end) = query.range().unwrap();
        assert_eq!(start.year(), 2025);
        assert_eq!(end.year(), 2026);
        assert_eq!(end.month(), 1);
    }

    #[test]
    fn test_summary_bad_month_rejected() {
        for raw in ["2026", "2026-13", "2026-00", "abc-01"] {
            let query = SummaryQuery {
                month: Some(raw.to_string()),
            };
            assert!(query.range().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_movement_filter_parses_type() {
        let query = MovementListQuery {
            movement_type: Some("salida".to_string()),
            ..Default::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.movement_type, Some(MovementType::Salida));

        let query = MovementListQuery {
            movement_type: Some("bogus".to_string()),
            ..Default::default()
        };
        assert!(query.filter().is_err());
    }
}
