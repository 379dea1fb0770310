//! SQL emitter
//!
//! Transforms an AggregatePlan into SQL text plus the ordered list of bound
//! parameters. Caller-supplied values never appear in the text.

use crate::plan::{
    AggregatePlan, Aggregation, Column, Expr, JoinClause, JoinSource, JoinType, Literal,
    SortDirection, TIMESTAMP_FORMAT,
};
use super::dialect::Dialect;
use super::error::EmitError;

/// SQL text and the values for its numbered placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    pub sql: String,
    /// Parameter `i` binds to placeholder `i + 1`
    pub params: Vec<Literal>,
}

/// Emit a pretty-printed SQL statement for the given dialect.
pub fn emit_sql(plan: &AggregatePlan, dialect: Dialect) -> Result<RenderedQuery, EmitError> {
    let mut emitter = SqlEmitter {
        dialect,
        params: Vec::new(),
    };
    let sql = emitter.emit_plan(plan, 0)?;
    Ok(RenderedQuery {
        sql,
        params: emitter.params,
    })
}

fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

struct SqlEmitter {
    dialect: Dialect,
    params: Vec<Literal>,
}

impl SqlEmitter {
    // -----------------------------------------------------------------------
    // Statement
    // -----------------------------------------------------------------------

    fn emit_plan(&mut self, plan: &AggregatePlan, indent: usize) -> Result<String, EmitError> {
        if plan.projections.is_empty() {
            return Err(EmitError::InvalidPlan(
                "SELECT list must not be empty".to_string(),
            ));
        }
        let p = pad(indent);
        let mut lines = Vec::new();

        let select_items: Vec<String> = plan
            .projections
            .iter()
            .map(|pe| Ok(format!("{} AS {}", self.emit_expr(&pe.expr)?, quote_ident(&pe.alias))))
            .collect::<Result<Vec<_>, EmitError>>()?;
        lines.push(format!("{p}SELECT {}", select_items.join(", ")));

        let source = &plan.source;
        match &source.alias {
            Some(alias) if alias != &source.table => {
                lines.push(format!("{p}FROM {} AS {}", source.table, alias))
            }
            _ => lines.push(format!("{p}FROM {}", source.table)),
        }

        for join in &plan.joins {
            lines.push(self.emit_join(join, indent)?);
        }

        if !plan.predicate.is_empty() {
            let conditions: Vec<String> = plan
                .predicate
                .iter()
                .map(|e| self.emit_expr(e))
                .collect::<Result<Vec<_>, _>>()?;
            lines.push(format!("{p}WHERE {}", conditions.join(" AND ")));
        }

        if !plan.group_by.is_empty() {
            let groups: Vec<String> = plan
                .group_by
                .iter()
                .map(|e| self.emit_expr(e))
                .collect::<Result<Vec<_>, _>>()?;
            lines.push(format!("{p}GROUP BY {}", groups.join(", ")));
        }

        if !plan.order_by.is_empty() {
            let keys: Vec<String> = plan
                .order_by
                .iter()
                .map(|k| {
                    let dir = match k.direction {
                        SortDirection::Ascending => "ASC",
                        SortDirection::Descending => "DESC",
                    };
                    format!("{} {}", quote_ident(&k.column), dir)
                })
                .collect();
            lines.push(format!("{p}ORDER BY {}", keys.join(", ")));
        }

        if let Some(limit) = plan.limit {
            if limit < 0 {
                return Err(EmitError::InvalidPlan(format!("negative LIMIT {}", limit)));
            }
            lines.push(format!("{p}LIMIT {}", limit));
        }

        Ok(lines.join("\n"))
    }

    fn emit_join(&mut self, join: &JoinClause, indent: usize) -> Result<String, EmitError> {
        let p = pad(indent);
        let join_kw = match join.join_type {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        };
        let on = format!(
            "ON {} = {}",
            emit_column(&join.left_key),
            emit_column(&join.right_key)
        );
        match &join.source {
            JoinSource::Table(table) => Ok(format!(
                "{p}{join_kw} {table} AS {alias} {on}",
                alias = join.alias
            )),
            JoinSource::Subquery(plan) => {
                let inner = self.emit_plan(plan, indent + 1)?;
                Ok(format!(
                    "{p}{join_kw} (\n{inner}\n{p}) AS {alias} {on}",
                    alias = join.alias
                ))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------------

    fn emit_expr(&mut self, expr: &Expr) -> Result<String, EmitError> {
        match expr {
            Expr::Column(col) => Ok(emit_column(col)),
            Expr::Wildcard => Ok("*".to_string()),
            Expr::Constant(lit) => Ok(self.emit_literal(lit)),
            Expr::Param(lit) => Ok(self.bind(lit)),
            Expr::BinaryOp { left, op, right } => {
                let l = self.emit_expr(left)?;
                let r = self.emit_expr(right)?;
                Ok(format!("{} {} {}", l, op.as_str(), r))
            }
            Expr::In { expr, values } => {
                if values.is_empty() {
                    return Ok("1 = 0".to_string());
                }
                let needle = self.emit_expr(expr)?;
                let vals: Vec<String> = values
                    .iter()
                    .map(|v| self.emit_expr(v))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{} IN ({})", needle, vals.join(", ")))
            }
            Expr::InSubquery { expr, subquery } => {
                if subquery.projections.len() != 1 {
                    return Err(EmitError::InvalidPlan(format!(
                        "IN subquery must select one column, got {}",
                        subquery.projections.len()
                    )));
                }
                let needle = self.emit_expr(expr)?;
                let inner = self.emit_plan(subquery, 1)?;
                Ok(format!("{} IN (\n{}\n)", needle, inner))
            }
            Expr::Aggregate { func, expr } => {
                let inner = self.emit_expr(expr)?;
                if matches!(**expr, Expr::Wildcard) && *func != Aggregation::Count {
                    return Err(EmitError::InvalidPlan(format!(
                        "{:?} cannot aggregate *",
                        func
                    )));
                }
                Ok(match func {
                    Aggregation::Sum => format!("SUM({})", inner),
                    Aggregation::Avg => format!("AVG({})", inner),
                    Aggregation::Count => format!("COUNT({})", inner),
                    Aggregation::CountDistinct => format!("COUNT(DISTINCT {})", inner),
                })
            }
            Expr::Multiply(a, b) => Ok(format!("({} * {})", self.emit_expr(a)?, self.emit_expr(b)?)),
            Expr::Divide(a, b) => {
                let float = self.dialect.float_type();
                Ok(format!(
                    "(CAST({} AS {float}) / CAST({} AS {float}))",
                    self.emit_expr(a)?,
                    self.emit_expr(b)?,
                ))
            }
            Expr::NullIf(a, b) => Ok(format!("NULLIF({}, {})", self.emit_expr(a)?, self.emit_expr(b)?)),
            Expr::Round { expr, places } => {
                let inner = self.emit_expr(expr)?;
                Ok(match self.dialect {
                    Dialect::Postgres => format!("ROUND(CAST({} AS NUMERIC), {})", inner, places),
                    Dialect::Sqlite => format!("ROUND({}, {})", inner, places),
                })
            }
            Expr::Case { when_then, else_result } => {
                let mut sql = String::from("CASE");
                for (cond, then) in when_then {
                    let c = self.emit_expr(cond)?;
                    let t = self.emit_expr(then)?;
                    sql.push_str(&format!(" WHEN {} THEN {}", c, t));
                }
                if let Some(el) = else_result {
                    sql.push_str(&format!(" ELSE {}", self.emit_expr(el)?));
                }
                sql.push_str(" END");
                Ok(sql)
            }
            Expr::TimeBucket { unit, expr } => {
                let ts = self.emit_expr(expr)?;
                Ok(self.dialect.time_bucket(*unit, &ts))
            }
        }
    }

    /// Record a parameter and return its placeholder
    fn bind(&mut self, lit: &Literal) -> String {
        self.params.push(lit.clone());
        let placeholder = self.dialect.placeholder(self.params.len());
        match (self.dialect, lit) {
            (Dialect::Postgres, Literal::Timestamp(_)) => format!("CAST({} AS TIMESTAMP)", placeholder),
            _ => placeholder,
        }
    }

    /// Inline rendering, reserved for catalog-owned constants
    fn emit_literal(&self, lit: &Literal) -> String {
        match lit {
            Literal::Int(i) => i.to_string(),
            Literal::String(s) => quote_string(s),
            Literal::Timestamp(ts) => {
                let text = quote_string(&ts.format(TIMESTAMP_FORMAT).to_string());
                match self.dialect {
                    Dialect::Postgres => format!("TIMESTAMP {}", text),
                    Dialect::Sqlite => text,
                }
            }
        }
    }
}

fn emit_column(col: &Column) -> String {
    col.qualified_name()
}
