//! Expression types for the logical plan

use chrono::NaiveDateTime;
use serde_json::Value;

use super::node::AggregatePlan;

/// A column reference
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Table alias (empty for unqualified references)
    pub table: String,
    /// Column name
    pub name: String,
}

impl Column {
    pub fn new(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
        }
    }

    /// Create an unqualified column reference (no table prefix)
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            table: String::new(),
            name: name.into(),
        }
    }

    /// Fully qualified name: table.column
    pub fn qualified_name(&self) -> String {
        if self.table.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.table, self.name)
        }
    }
}

/// Aggregation functions available to metric expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Avg,
    Count,
    CountDistinct,
}

/// Calendar units for derived time-bucket dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// Hour of day (0-23)
    HourOfDay,
    /// Day of week (0 = Sunday)
    DayOfWeek,
    /// Calendar day
    Day,
    /// Week starting on Monday
    Week,
    /// First day of the month
    Month,
    /// First day of the quarter
    Quarter,
}

/// Scalar expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference
    Column(Column),
    /// `*`, only meaningful inside COUNT
    Wildcard,
    /// Trusted constant owned by the catalog, rendered inline
    Constant(Literal),
    /// Caller-supplied value, always rendered as a bound parameter
    Param(Literal),
    /// Binary comparison (e.g., a = b, a > 5)
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    /// Membership test (expr IN (values)). An empty list matches nothing.
    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
    },
    /// Semi-join: expr IN (SELECT ...). The subquery has one output column.
    InSubquery {
        expr: Box<Expr>,
        subquery: Box<AggregatePlan>,
    },
    /// Aggregate function call
    Aggregate {
        func: Aggregation,
        expr: Box<Expr>,
    },
    /// Multiplication: a * b
    Multiply(Box<Expr>, Box<Expr>),
    /// Floating point division: a / b
    Divide(Box<Expr>, Box<Expr>),
    /// NULLIF(a, b)
    NullIf(Box<Expr>, Box<Expr>),
    /// Round to a fixed number of decimal places
    Round {
        expr: Box<Expr>,
        places: u32,
    },
    /// CASE WHEN expression
    Case {
        /// List of (condition, result) pairs
        when_then: Vec<(Expr, Expr)>,
        /// Optional ELSE result
        else_result: Option<Box<Expr>>,
    },
    /// Dialect-specific time bucket of a timestamp expression
    TimeBucket {
        unit: TimeUnit,
        expr: Box<Expr>,
    },
}

impl Expr {
    pub fn column(table: &str, name: &str) -> Self {
        Expr::Column(Column::new(table, name))
    }

    pub fn aggregate(func: Aggregation, expr: Expr) -> Self {
        Expr::Aggregate {
            func,
            expr: Box::new(expr),
        }
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn time_bucket(unit: TimeUnit, expr: Expr) -> Self {
        Expr::TimeBucket {
            unit,
            expr: Box::new(expr),
        }
    }

    /// Collect every bound parameter in the expression, in render order.
    pub fn params(&self) -> Vec<&Literal> {
        let mut out = Vec::new();
        self.collect_params(&mut out);
        out
    }

    fn collect_params<'a>(&'a self, out: &mut Vec<&'a Literal>) {
        match self {
            Expr::Param(lit) => out.push(lit),
            Expr::Column(_) | Expr::Wildcard | Expr::Constant(_) => {}
            Expr::BinaryOp { left, right, .. } => {
                left.collect_params(out);
                right.collect_params(out);
            }
            Expr::In { expr, values } => {
                expr.collect_params(out);
                for v in values {
                    v.collect_params(out);
                }
            }
            Expr::InSubquery { expr, subquery } => {
                expr.collect_params(out);
                for condition in &subquery.predicate {
                    condition.collect_params(out);
                }
            }
            Expr::Aggregate { expr, .. }
            | Expr::Round { expr, .. }
            | Expr::TimeBucket { expr, .. } => expr.collect_params(out),
            Expr::Multiply(a, b) | Expr::Divide(a, b) | Expr::NullIf(a, b) => {
                a.collect_params(out);
                b.collect_params(out);
            }
            Expr::Case { when_then, else_result } => {
                for (cond, then) in when_then {
                    cond.collect_params(out);
                    then.collect_params(out);
                }
                if let Some(el) = else_result {
                    el.collect_params(out);
                }
            }
        }
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    String(String),
    Timestamp(NaiveDateTime),
}

/// Text form used when a timestamp is bound as a string
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl Literal {
    /// JSON rendering for diagnostics and request echoes
    pub fn to_json(&self) -> Value {
        match self {
            Literal::Int(i) => Value::from(*i),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Timestamp(ts) => Value::String(ts.format(TIMESTAMP_FORMAT).to_string()),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
        }
    }
}
