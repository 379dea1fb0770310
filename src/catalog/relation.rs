//! Relations that can be joined onto the orders table

use crate::plan::{
    AggregatePlan, Aggregation, Column, Expr, JoinClause, JoinSource, JoinType, ProjectExpr, Scan,
};

/// Alias of the driving `orders` table
pub const ORDERS: &str = "o";

/// A relation reachable from `orders`.
///
/// Variant order is the join emission order; prerequisites always sort
/// before the relations that need them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relation {
    Stores,
    Customers,
    OrderItems,
    Products,
    /// Derived per-customer order counts
    CustomerOrderCount,
}

impl Relation {
    pub const ALL: [Relation; 5] = [
        Relation::Stores,
        Relation::Customers,
        Relation::OrderItems,
        Relation::Products,
        Relation::CustomerOrderCount,
    ];

    /// Alias used in column references
    pub fn alias(&self) -> &'static str {
        match self {
            Relation::Stores => "s",
            Relation::Customers => "c",
            Relation::OrderItems => "oi",
            Relation::Products => "p",
            Relation::CustomerOrderCount => "customer_order_count",
        }
    }

    /// Relations that must be joined before this one
    pub fn requires(&self) -> &'static [Relation] {
        match self {
            Relation::Products => &[Relation::OrderItems],
            _ => &[],
        }
    }

    /// Whether joining this relation repeats order rows (one per line item)
    pub fn is_item_level(&self) -> bool {
        matches!(self, Relation::OrderItems | Relation::Products)
    }

    /// Build the join clause for this relation
    pub fn join_clause(&self) -> JoinClause {
        let alias = self.alias();
        let (source, left_key, right_key) = match self {
            Relation::Stores => (
                JoinSource::Table("stores".into()),
                Column::new(ORDERS, "store_id"),
                Column::new(alias, "id"),
            ),
            Relation::Customers => (
                JoinSource::Table("customers".into()),
                Column::new(ORDERS, "customer_id"),
                Column::new(alias, "id"),
            ),
            Relation::OrderItems => (
                JoinSource::Table("order_items".into()),
                Column::new(ORDERS, "id"),
                Column::new(alias, "order_id"),
            ),
            Relation::Products => (
                JoinSource::Table("products".into()),
                Column::new(Relation::OrderItems.alias(), "product_id"),
                Column::new(alias, "id"),
            ),
            Relation::CustomerOrderCount => (
                JoinSource::Subquery(Box::new(customer_order_count())),
                Column::new(ORDERS, "customer_id"),
                Column::new(alias, "customer_id"),
            ),
        };
        JoinClause {
            join_type: JoinType::Left,
            source,
            alias: alias.to_string(),
            left_key,
            right_key,
        }
    }
}

/// SELECT customer_id, COUNT(*) AS order_count FROM orders GROUP BY customer_id
fn customer_order_count() -> AggregatePlan {
    let mut plan = AggregatePlan::new(Scan::new("orders"));
    plan.projections = vec![
        ProjectExpr {
            expr: Expr::Column(Column::unqualified("customer_id")),
            alias: "customer_id".into(),
        },
        ProjectExpr {
            expr: Expr::aggregate(Aggregation::Count, Expr::Wildcard),
            alias: "order_count".into(),
        },
    ];
    plan.group_by = vec![Expr::Column(Column::unqualified("customer_id"))];
    plan
}

/// `o.id IN (SELECT oi.order_id FROM order_items AS oi ... WHERE condition)`
///
/// Restricts orders by a line-item condition without joining items into the
/// outer query. `relations` must all be item-level; they are inner-joined
/// inside the subquery.
pub fn item_semi_join(relations: &[Relation], condition: Expr) -> Expr {
    let items = Relation::OrderItems.alias();
    let mut plan = AggregatePlan::new(Scan::new("order_items").with_alias(items));
    plan.projections = vec![ProjectExpr {
        expr: Expr::column(items, "order_id"),
        alias: "order_id".into(),
    }];
    plan.joins = relations
        .iter()
        .filter(|r| **r != Relation::OrderItems)
        .map(|r| JoinClause {
            join_type: JoinType::Inner,
            ..r.join_clause()
        })
        .collect();
    plan.predicate = vec![condition];

    Expr::InSubquery {
        expr: Box::new(Expr::column(ORDERS, "id")),
        subquery: Box::new(plan),
    }
}

/// Expand a set of relations with their prerequisites, sorted in join order.
pub fn join_closure(relations: impl IntoIterator<Item = Relation>) -> Vec<Relation> {
    let mut out: Vec<Relation> = Vec::new();
    let mut stack: Vec<Relation> = relations.into_iter().collect();
    while let Some(rel) = stack.pop() {
        if !out.contains(&rel) {
            out.push(rel);
            stack.extend_from_slice(rel.requires());
        }
    }
    out.sort();
    out
}
