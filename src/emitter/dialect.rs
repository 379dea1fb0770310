//! SQL dialects the emitter can target

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::plan::TimeUnit;

/// Target SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Placeholder for the 1-based parameter `index`
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index),
            Dialect::Sqlite => format!("?{}", index),
        }
    }

    /// Floating point type used for division
    pub fn float_type(&self) -> &'static str {
        match self {
            Dialect::Postgres => "DOUBLE PRECISION",
            Dialect::Sqlite => "REAL",
        }
    }

    /// Render a time bucket over an already-rendered timestamp expression
    pub fn time_bucket(&self, unit: TimeUnit, ts: &str) -> String {
        match self {
            Dialect::Postgres => match unit {
                TimeUnit::HourOfDay => format!("EXTRACT(HOUR FROM {})", ts),
                TimeUnit::DayOfWeek => format!("EXTRACT(DOW FROM {})", ts),
                TimeUnit::Day => format!("CAST({} AS DATE)", ts),
                TimeUnit::Week => format!("DATE_TRUNC('week', {})", ts),
                TimeUnit::Month => format!("DATE_TRUNC('month', {})", ts),
                TimeUnit::Quarter => format!("DATE_TRUNC('quarter', {})", ts),
            },
            Dialect::Sqlite => match unit {
                TimeUnit::HourOfDay => format!("CAST(strftime('%H', {}) AS INTEGER)", ts),
                TimeUnit::DayOfWeek => format!("CAST(strftime('%w', {}) AS INTEGER)", ts),
                TimeUnit::Day => format!("date({})", ts),
                // Monday of the week: forward to Sunday, back six days
                TimeUnit::Week => format!("date({}, 'weekday 0', '-6 days')", ts),
                TimeUnit::Month => format!("date({}, 'start of month')", ts),
                TimeUnit::Quarter => format!(
                    "date({ts}, 'start of month', '-' || ((CAST(strftime('%m', {ts}) AS INTEGER) - 1) % 3) || ' months')"
                ),
            },
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            other => Err(format!("unknown dialect '{}', expected postgres or sqlite", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(Dialect::Postgres.placeholder(3), "$3");
        assert_eq!(Dialect::Sqlite.placeholder(3), "?3");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("PostgreSQL".parse::<Dialect>(), Ok(Dialect::Postgres));
        assert_eq!("sqlite".parse::<Dialect>(), Ok(Dialect::Sqlite));
        assert!("mysql".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_quarter_bucket_sqlite() {
        let sql = Dialect::Sqlite.time_bucket(TimeUnit::Quarter, "o.order_date");
        assert!(sql.starts_with("date(o.order_date, 'start of month'"));
        assert!(sql.contains("strftime('%m', o.order_date)"));
    }
}
