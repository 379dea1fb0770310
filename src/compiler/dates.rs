//! Date range conditions on `orders.order_date`
//!
//! A start bound is inclusive. A date-only end bound covers that whole day;
//! an end bound with a time of day is inclusive of that instant.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::catalog::ORDERS;
use crate::plan::{BinaryOperator, Expr, Literal};
use crate::query::DateRange;
use super::error::CompileError;

const START_KEY: &str = "date_range.start_date";
const END_KEY: &str = "date_range.end_date";

enum Bound {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

fn parse_bound(key: &str, raw: &str) -> Result<Bound, CompileError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Bound::Date(date));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Bound::DateTime(ts));
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Bound::DateTime(dt.naive_utc()))
        .map_err(|_| CompileError::invalid_value(key, raw))
}

fn midnight(key: &str, date: NaiveDate) -> Result<NaiveDateTime, CompileError> {
    date.and_hms_opt(0, 0, 0)
        .ok_or_else(|| CompileError::invalid_value(key, date))
}

fn order_date(op: BinaryOperator, ts: NaiveDateTime) -> Expr {
    Expr::binary(
        Expr::column(ORDERS, "order_date"),
        op,
        Expr::Param(Literal::Timestamp(ts)),
    )
}

/// Non-empty, trimmed bound text
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Lower bound first, then upper bound.
pub fn date_conditions(range: Option<&DateRange>) -> Result<Vec<Expr>, CompileError> {
    let Some(range) = range else {
        return Ok(vec![]);
    };

    let mut conditions = Vec::new();

    if let Some(raw) = present(&range.start_date) {
        let ts = match parse_bound(START_KEY, raw)? {
            Bound::Date(date) => midnight(START_KEY, date)?,
            Bound::DateTime(ts) => ts,
        };
        conditions.push(order_date(BinaryOperator::GtEq, ts));
    }

    if let Some(raw) = present(&range.end_date) {
        let condition = match parse_bound(END_KEY, raw)? {
            Bound::Date(date) => {
                let next = date
                    .succ_opt()
                    .ok_or_else(|| CompileError::invalid_value(END_KEY, raw))?;
                order_date(BinaryOperator::Lt, midnight(END_KEY, next)?)
            }
            Bound::DateTime(ts) => order_date(BinaryOperator::LtEq, ts),
        };
        conditions.push(condition);
    }

    Ok(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: Option<&str>, end: Option<&str>) -> DateRange {
        DateRange {
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
    }

    fn split(expr: &Expr) -> (BinaryOperator, Literal) {
        match expr {
            Expr::BinaryOp { op, right, .. } => match right.as_ref() {
                Expr::Param(lit) => (*op, lit.clone()),
                other => panic!("expected parameter, got {:?}", other),
            },
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_no_range() {
        assert!(date_conditions(None).unwrap().is_empty());
        assert!(date_conditions(Some(&range(None, None))).unwrap().is_empty());
        assert!(date_conditions(Some(&range(Some(""), Some("  ")))).unwrap().is_empty());
    }

    #[test]
    fn test_start_date_is_inclusive_midnight() {
        let conds = date_conditions(Some(&range(Some("2024-01-01"), None))).unwrap();
        assert_eq!(conds.len(), 1);
        assert_eq!(
            split(&conds[0]),
            (BinaryOperator::GtEq, Literal::Timestamp(ts(2024, 1, 1, 0, 0, 0)))
        );
    }

    #[test]
    fn test_end_date_covers_whole_day() {
        let conds = date_conditions(Some(&range(None, Some("2024-02-29")))).unwrap();
        assert_eq!(
            split(&conds[0]),
            (BinaryOperator::Lt, Literal::Timestamp(ts(2024, 3, 1, 0, 0, 0)))
        );
    }

    #[test]
    fn test_end_timestamp_is_inclusive() {
        let conds = date_conditions(Some(&range(None, Some("2024-02-10T18:30:00")))).unwrap();
        assert_eq!(
            split(&conds[0]),
            (BinaryOperator::LtEq, Literal::Timestamp(ts(2024, 2, 10, 18, 30, 0)))
        );
    }

    #[test]
    fn test_rfc3339_normalized_to_utc() {
        let conds = date_conditions(Some(&range(Some("2024-01-01T00:00:00-03:00"), None))).unwrap();
        assert_eq!(
            split(&conds[0]),
            (BinaryOperator::GtEq, Literal::Timestamp(ts(2024, 1, 1, 3, 0, 0)))
        );
    }

    #[test]
    fn test_both_bounds_in_order() {
        let conds = date_conditions(Some(&range(Some("2024-01-01"), Some("2024-01-31")))).unwrap();
        assert_eq!(conds.len(), 2);
        assert_eq!(split(&conds[0]).0, BinaryOperator::GtEq);
        assert_eq!(split(&conds[1]).0, BinaryOperator::Lt);
    }

    #[test]
    fn test_garbage_date_rejected() {
        let err = date_conditions(Some(&range(Some("2024-01-01' OR 1=1 --"), None))).unwrap_err();
        assert_eq!(
            err,
            CompileError::InvalidFilterValue {
                key: START_KEY.into(),
                value: "2024-01-01' OR 1=1 --".into(),
            }
        );
    }
}
