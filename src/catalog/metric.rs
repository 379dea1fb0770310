//! Metric catalog - the aggregates a caller may request

use crate::plan::{Aggregation, BinaryOperator, Expr, Literal};
use super::relation::{Relation, ORDERS};
use super::Registry;

/// A registered metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    TotalRevenue,
    TotalOrders,
    AvgTicket,
    TotalItems,
    AvgDeliveryTime,
    AvgPreparationTime,
    AvgRating,
    DeliveryFeeTotal,
    DiscountTotal,
    TaxTotal,
    UniqueCustomers,
    /// Customers with more than one order overall
    RepeatCustomers,
    /// Percentage of orders that were delivered
    ConversionRate,
}

impl Metric {
    pub const ALL: [Metric; 13] = [
        Metric::TotalRevenue,
        Metric::TotalOrders,
        Metric::AvgTicket,
        Metric::TotalItems,
        Metric::AvgDeliveryTime,
        Metric::AvgPreparationTime,
        Metric::AvgRating,
        Metric::DeliveryFeeTotal,
        Metric::DiscountTotal,
        Metric::TaxTotal,
        Metric::UniqueCustomers,
        Metric::RepeatCustomers,
        Metric::ConversionRate,
    ];
}

fn orders(column: &str) -> Expr {
    Expr::column(ORDERS, column)
}

fn sum(expr: Expr) -> Expr {
    Expr::aggregate(Aggregation::Sum, expr)
}

fn avg(expr: Expr) -> Expr {
    Expr::aggregate(Aggregation::Avg, expr)
}

fn count_distinct(expr: Expr) -> Expr {
    Expr::aggregate(Aggregation::CountDistinct, expr)
}

/// CASE WHEN cond THEN then END
fn when(cond: Expr, then: Expr) -> Expr {
    Expr::Case {
        when_then: vec![(cond, then)],
        else_result: None,
    }
}

impl Registry for Metric {
    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn name(&self) -> &'static str {
        match self {
            Metric::TotalRevenue => "total_revenue",
            Metric::TotalOrders => "total_orders",
            Metric::AvgTicket => "avg_ticket",
            Metric::TotalItems => "total_items",
            Metric::AvgDeliveryTime => "avg_delivery_time",
            Metric::AvgPreparationTime => "avg_preparation_time",
            Metric::AvgRating => "avg_rating",
            Metric::DeliveryFeeTotal => "delivery_fee_total",
            Metric::DiscountTotal => "discount_total",
            Metric::TaxTotal => "tax_total",
            Metric::UniqueCustomers => "unique_customers",
            Metric::RepeatCustomers => "repeat_customers",
            Metric::ConversionRate => "conversion_rate",
        }
    }

    fn expression(&self) -> Expr {
        match self {
            Metric::TotalRevenue => sum(orders("total_amount")),
            Metric::TotalOrders => count_distinct(orders("id")),
            Metric::AvgTicket => avg(orders("total_amount")),
            Metric::TotalItems => sum(Expr::column(Relation::OrderItems.alias(), "quantity")),
            Metric::AvgDeliveryTime => avg(orders("delivery_time_minutes")),
            Metric::AvgPreparationTime => avg(orders("preparation_time_minutes")),
            Metric::AvgRating => avg(orders("rating")),
            Metric::DeliveryFeeTotal => sum(orders("delivery_fee")),
            Metric::DiscountTotal => sum(orders("discount_amount")),
            Metric::TaxTotal => sum(orders("tax_amount")),
            Metric::UniqueCustomers => count_distinct(orders("customer_id")),
            Metric::RepeatCustomers => count_distinct(when(
                Expr::binary(
                    Expr::column(Relation::CustomerOrderCount.alias(), "order_count"),
                    BinaryOperator::Gt,
                    Expr::Constant(Literal::Int(1)),
                ),
                orders("customer_id"),
            )),
            Metric::ConversionRate => {
                let delivered = count_distinct(when(
                    Expr::binary(
                        orders("status"),
                        BinaryOperator::Eq,
                        Expr::Constant(Literal::String("delivered".into())),
                    ),
                    orders("id"),
                ));
                let all = count_distinct(orders("id"));
                Expr::Round {
                    expr: Box::new(Expr::Multiply(
                        Box::new(Expr::Divide(
                            Box::new(delivered),
                            Box::new(Expr::NullIf(
                                Box::new(all),
                                Box::new(Expr::Constant(Literal::Int(0))),
                            )),
                        )),
                        Box::new(Expr::Constant(Literal::Int(100))),
                    )),
                    places: 2,
                }
            }
        }
    }

    fn relations(&self) -> &'static [Relation] {
        match self {
            Metric::TotalItems => &[Relation::OrderItems],
            Metric::RepeatCustomers => &[Relation::CustomerOrderCount],
            _ => &[],
        }
    }
}
